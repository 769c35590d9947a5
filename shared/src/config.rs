//! Movement configuration, types and defaults.
//!
//! The configuration is a plain RON document (see `config/movement.ron`). Every
//! section and field is optional; anything missing falls back to the values in
//! [`crate::constants`], so a file only has to mention what it overrides.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{collision::Vec3, constants::*, error::ConfigError};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlayerSettings {
    pub height: f32,
    pub radius: f32,
    pub gravity: f32,
    pub eye_height_ratio: f32,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            height: PLAYER_HEIGHT,
            radius: PLAYER_RADIUS,
            gravity: GRAVITY_MPS2,
            eye_height_ratio: EYE_HEIGHT_RATIO,
        }
    }
}

impl PlayerSettings {
    #[inline]
    pub fn half_height(&self) -> f32 {
        self.height * 0.5
    }

    /// Eye position relative to the capsule center.
    #[inline]
    pub fn eye_offset(&self) -> f32 {
        self.height * self.eye_height_ratio
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LocomotionSettings {
    pub walk_speed: f32,
    pub normal_speed: f32,
    pub sprint_speed: f32,
}

impl Default for LocomotionSettings {
    fn default() -> Self {
        Self {
            walk_speed: WALK_SPEED_MPS,
            normal_speed: NORMAL_SPEED_MPS,
            sprint_speed: SPRINT_SPEED_MPS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CollisionConfig {
    pub step_height: f32,
    pub ground_check_offset: f32,
    pub margin: f32,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            step_height: STEP_HEIGHT,
            ground_check_offset: GROUND_CHECK_OFFSET,
            margin: COLLISION_MARGIN,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VaultConfig {
    pub distance: f32,
    pub min_height_diff: f32,
    pub max_height_diff: f32,
    pub duration: f32,
    /// Radians.
    pub facing_tolerance: f32,
    pub probe_drop: f32,
    pub landing_reach: f32,
    pub arc_clearance: f32,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            distance: VAULT_DISTANCE,
            min_height_diff: VAULT_MIN_HEIGHT_DIFF,
            max_height_diff: VAULT_MAX_HEIGHT_DIFF,
            duration: VAULT_DURATION,
            facing_tolerance: VAULT_FACING_TOLERANCE,
            probe_drop: VAULT_PROBE_DROP,
            landing_reach: VAULT_LANDING_REACH,
            arc_clearance: VAULT_ARC_CLEARANCE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraSettings {
    pub default_fov: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            default_fov: DEFAULT_FOV_DEG,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AimSettings {
    pub ads_fov: f32,
    pub ads_weapon_position: [f32; 3],
    pub hip_weapon_position: [f32; 3],
    pub transition_speed: f32,
    pub move_speed_multiplier: f32,
    pub bob_intensity_multiplier: f32,
}

impl Default for AimSettings {
    fn default() -> Self {
        Self {
            ads_fov: ADS_FOV_DEG,
            ads_weapon_position: ADS_WEAPON_POSITION,
            hip_weapon_position: HIP_WEAPON_POSITION,
            transition_speed: ADS_TRANSITION_SPEED,
            move_speed_multiplier: ADS_MOVE_SPEED_MULTIPLIER,
            bob_intensity_multiplier: ADS_BOB_INTENSITY_MULTIPLIER,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LeanSettings {
    pub amount_multiplier: f32,
    pub roll_multiplier: f32,
    pub gun_offset_multiplier: f32,
    pub transition_speed: f32,
}

impl Default for LeanSettings {
    fn default() -> Self {
        Self {
            amount_multiplier: LEAN_AMOUNT_MULTIPLIER,
            roll_multiplier: LEAN_ROLL_MULTIPLIER,
            gun_offset_multiplier: LEAN_GUN_OFFSET_MULTIPLIER,
            transition_speed: LEAN_TRANSITION_SPEED,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WeaponBobSettings {
    pub intensity: f32,
    pub speed_factor_walk: f32,
    pub speed_factor_normal: f32,
    pub speed_factor_sprint: f32,
}

impl Default for WeaponBobSettings {
    fn default() -> Self {
        Self {
            intensity: BOB_INTENSITY,
            speed_factor_walk: BOB_SPEED_FACTOR_WALK,
            speed_factor_normal: BOB_SPEED_FACTOR_NORMAL,
            speed_factor_sprint: BOB_SPEED_FACTOR_SPRINT,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RecoilSettings {
    pub kick_back: f32,
    pub pitch: f32,
    pub recovery_speed: f32,
}

impl Default for RecoilSettings {
    fn default() -> Self {
        Self {
            kick_back: RECOIL_KICK_BACK,
            pitch: RECOIL_PITCH,
            recovery_speed: RECOIL_RECOVERY_SPEED,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RespawnSettings {
    pub kill_height: f32,
    pub delay: f32,
    pub spawn_position: [f32; 3],
}

impl Default for RespawnSettings {
    fn default() -> Self {
        Self {
            kill_height: KILL_HEIGHT,
            delay: RESPAWN_DELAY_SECS,
            spawn_position: SPAWN_POSITION,
        }
    }
}

impl RespawnSettings {
    #[inline]
    pub fn spawn(&self) -> Vec3 {
        Vec3::from(self.spawn_position)
    }
}

/// Root of the movement configuration tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MovementConfig {
    pub player: PlayerSettings,
    pub movement: LocomotionSettings,
    pub collision: CollisionConfig,
    pub vaulting: VaultConfig,
    pub camera: CameraSettings,
    pub aiming: AimSettings,
    pub leaning: LeanSettings,
    pub weapon_bob: WeaponBobSettings,
    pub recoil: RecoilSettings,
    pub respawn: RespawnSettings,
}

impl MovementConfig {
    /// Parse and validate a RON document.
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        let config: MovementConfig = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate the RON file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_ron_str(&text)?;
        log::info!("loaded movement config from {}", path.display());
        Ok(config)
    }

    /// Like [`MovementConfig::load`], but falls back to defaults on any error.
    #[must_use]
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("{err}; using default movement config");
                Self::default()
            }
        }
    }

    /// Check the cross-field invariants the controller relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(name: &str, value: f32) -> Result<(), ConfigError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid(format!("{name} must be > 0, got {value}")))
            }
        }
        fn non_negative(name: &str, value: f32) -> Result<(), ConfigError> {
            if value.is_finite() && value >= 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid(format!("{name} must be >= 0, got {value}")))
            }
        }

        positive("player.height", self.player.height)?;
        positive("player.radius", self.player.radius)?;
        non_negative("player.gravity", self.player.gravity)?;

        non_negative("movement.walk_speed", self.movement.walk_speed)?;
        non_negative("movement.normal_speed", self.movement.normal_speed)?;
        non_negative("movement.sprint_speed", self.movement.sprint_speed)?;

        non_negative("collision.step_height", self.collision.step_height)?;
        non_negative("collision.ground_check_offset", self.collision.ground_check_offset)?;
        non_negative("collision.margin", self.collision.margin)?;
        if self.collision.step_height >= self.player.height {
            return Err(ConfigError::Invalid(
                "collision.step_height must be below player.height".into(),
            ));
        }

        positive("vaulting.distance", self.vaulting.distance)?;
        non_negative("vaulting.duration", self.vaulting.duration)?;
        non_negative("vaulting.facing_tolerance", self.vaulting.facing_tolerance)?;
        if self.vaulting.min_height_diff > self.vaulting.max_height_diff {
            return Err(ConfigError::Invalid(format!(
                "vaulting.min_height_diff ({}) exceeds max_height_diff ({})",
                self.vaulting.min_height_diff, self.vaulting.max_height_diff
            )));
        }

        positive("camera.default_fov", self.camera.default_fov)?;
        positive("aiming.ads_fov", self.aiming.ads_fov)?;
        non_negative("aiming.transition_speed", self.aiming.transition_speed)?;
        non_negative("leaning.transition_speed", self.leaning.transition_speed)?;
        non_negative("recoil.recovery_speed", self.recoil.recovery_speed)?;
        non_negative("respawn.delay", self.respawn.delay)?;

        Ok(())
    }
}
