use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating a [`crate::config::MovementConfig`].
///
/// Nothing on the per-tick path returns this; it only surfaces at startup or on reload.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("invalid config: {0}")]
    Invalid(String),
}
