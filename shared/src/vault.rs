//! Vault state machine.
//!
//! `Idle -> Detected(candidate) -> Active(session) -> Idle`
//!
//! Detection is a single forward ray cast from below the capsule center. A
//! candidate is only a hint for the HUD: the trigger re-runs detection against
//! the statics of *that* tick and fails closed if the obstacle is gone.

use thiserror::Error;

use crate::{
    collision::{CollidableVolume, Vec3, cast_ray_nearest},
    config::{MovementConfig, VaultConfig},
};

/// Vault tuning plus the player dimensions it depends on.
#[derive(Clone, Debug, PartialEq)]
pub struct VaultSettings {
    pub vault: VaultConfig,
    pub player_height: f32,
    pub player_radius: f32,
}

impl VaultSettings {
    pub fn from_config(config: &MovementConfig) -> Self {
        Self {
            vault: config.vaulting.clone(),
            player_height: config.player.height,
            player_radius: config.player.radius,
        }
    }

    #[inline]
    fn half_height(&self) -> f32 {
        self.player_height * 0.5
    }
}

impl Default for VaultSettings {
    fn default() -> Self {
        Self::from_config(&MovementConfig::default())
    }
}

/// An obstacle that passed every detection check.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VaultCandidate {
    /// Capsule center at the end of the vault.
    pub landing: Vec3,
    /// World Y of the obstacle's top face.
    pub obstacle_top: f32,
    /// `obstacle_top - feet`.
    pub height_difference: f32,
}

/// A vault in progress. Only ever lives inside [`VaultState::Active`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VaultSession {
    pub start: Vec3,
    pub landing: Vec3,
    /// Height of the Bezier control point.
    pub peak_height: f32,
    pub elapsed: f32,
    pub duration: f32,
}

impl VaultSession {
    fn new(start: Vec3, candidate: &VaultCandidate, settings: &VaultSettings) -> Self {
        let peak_height = start
            .y
            .max(candidate.landing.y)
            .max(candidate.obstacle_top + settings.vault.arc_clearance);
        Self {
            start,
            landing: candidate.landing,
            peak_height,
            elapsed: 0.0,
            duration: settings.vault.duration.max(0.0),
        }
    }

    /// `elapsed / duration`, clamped to `[0, 1]`. A zero duration is already complete.
    #[inline]
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        (self.elapsed / self.duration).clamp(0.0, 1.0)
    }

    /// Point on the quadratic arc at `progress`. Returns `landing` bit-for-bit at 1.
    pub fn position_at(&self, progress: f32) -> Vec3 {
        if progress >= 1.0 {
            return self.landing;
        }
        let t = progress.max(0.0);
        let control = Vec3::new(
            (self.start.x + self.landing.x) * 0.5,
            self.peak_height,
            (self.start.z + self.landing.z) * 0.5,
        );
        let u = 1.0 - t;
        self.start * (u * u) + control * (2.0 * u * t) + self.landing * (t * t)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum VaultState {
    #[default]
    Idle,
    Detected(VaultCandidate),
    Active(VaultSession),
}

/// Why a trigger attempt did not start a vault.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum VaultRejected {
    #[error("a vault is already in progress")]
    AlreadyActive,
    #[error("no vault candidate")]
    NoCandidate,
    #[error("vault candidate no longer valid")]
    Stale,
}

/// Output of [`VaultMachine::advance`] for one tick of an active vault.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VaultStep {
    pub position: Vec3,
    pub progress: f32,
    /// The session ended this tick and `position` is the landing point.
    pub finished: bool,
}

/// Look for a vaultable obstacle straight ahead.
///
/// `facing` must be a unit horizontal vector. Only the nearest hit is
/// considered; anything behind it is occluded.
pub fn detect(
    statics: &[CollidableVolume],
    settings: &VaultSettings,
    position: Vec3,
    facing: Vec3,
) -> Option<VaultCandidate> {
    let cfg = &settings.vault;
    let origin = position - Vec3::new(0.0, cfg.probe_drop, 0.0);
    let hit = cast_ray_nearest(statics, origin, facing, cfg.distance)?;

    hit.volume.vaultable?;

    // Glancing hits along a wall are not vaults.
    if facing.dot(&-hit.normal) < cfg.facing_tolerance.cos() {
        return None;
    }

    let obstacle_top = hit.volume_top();
    let feet = position.y - settings.half_height();
    let height_difference = obstacle_top - feet;
    if height_difference < cfg.min_height_diff || height_difference > cfg.max_height_diff {
        return None;
    }

    let mut landing = hit.point + facing * (settings.player_radius * cfg.landing_reach);
    landing.y = obstacle_top + settings.half_height();

    Some(VaultCandidate {
        landing,
        obstacle_top,
        height_difference,
    })
}

/// Owns the vault state for one player.
#[derive(Clone, Debug, Default)]
pub struct VaultMachine {
    settings: VaultSettings,
    state: VaultState,
}

impl VaultMachine {
    pub fn new(settings: VaultSettings) -> Self {
        Self {
            settings,
            state: VaultState::Idle,
        }
    }

    #[inline]
    pub fn state(&self) -> &VaultState {
        &self.state
    }

    #[inline]
    pub fn settings(&self) -> &VaultSettings {
        &self.settings
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        matches!(self.state, VaultState::Active(_))
    }

    /// Whether the HUD should show the vault prompt.
    #[inline]
    pub fn can_vault(&self) -> bool {
        matches!(self.state, VaultState::Detected(_))
    }

    pub fn candidate(&self) -> Option<&VaultCandidate> {
        match &self.state {
            VaultState::Detected(c) => Some(c),
            _ => None,
        }
    }

    pub fn session(&self) -> Option<&VaultSession> {
        match &self.state {
            VaultState::Active(s) => Some(s),
            _ => None,
        }
    }

    /// Refresh the candidate. Does nothing while a vault is active.
    pub fn scan(
        &mut self,
        statics: &[CollidableVolume],
        position: Vec3,
        facing: Option<Vec3>,
        grounded: bool,
    ) {
        if self.is_active() {
            return;
        }

        let found = self.probe(statics, position, facing, grounded);

        match (&self.state, found) {
            (VaultState::Idle, Some(c)) => {
                log::debug!(
                    "vault candidate detected (height diff {:.2})",
                    c.height_difference
                );
            }
            (VaultState::Detected(_), None) => log::debug!("vault candidate lost"),
            _ => {}
        }

        self.state = found.map_or(VaultState::Idle, VaultState::Detected);
    }

    /// Start a vault from `position`.
    ///
    /// The candidate from the last scan is not trusted: detection is re-run
    /// against `statics` and the fresh result is used for the session.
    pub fn try_trigger(
        &mut self,
        statics: &[CollidableVolume],
        position: Vec3,
        facing: Option<Vec3>,
        grounded: bool,
    ) -> Result<VaultSession, VaultRejected> {
        match self.state {
            VaultState::Active(_) => return Err(VaultRejected::AlreadyActive),
            VaultState::Idle => return Err(VaultRejected::NoCandidate),
            VaultState::Detected(_) => {}
        }

        let Some(candidate) = self.probe(statics, position, facing, grounded) else {
            self.state = VaultState::Idle;
            return Err(VaultRejected::Stale);
        };

        let session = VaultSession::new(position, &candidate, &self.settings);
        log::debug!(
            "vault start {:?} -> {:?} over {:.2}s",
            session.start,
            session.landing,
            session.duration
        );
        self.state = VaultState::Active(session);
        Ok(session)
    }

    /// Advance an active vault. Returns `None` when no vault is running.
    pub fn advance(&mut self, dt: f32) -> Option<VaultStep> {
        let VaultState::Active(session) = &mut self.state else {
            return None;
        };

        session.elapsed += dt.max(0.0);
        let progress = session.progress();
        let position = session.position_at(progress);
        let finished = progress >= 1.0;

        if finished {
            log::debug!("vault landed at {position:?}");
            self.state = VaultState::Idle;
        }

        Some(VaultStep {
            position,
            progress,
            finished,
        })
    }

    fn probe(
        &self,
        statics: &[CollidableVolume],
        position: Vec3,
        facing: Option<Vec3>,
        grounded: bool,
    ) -> Option<VaultCandidate> {
        match facing {
            Some(f) if grounded => detect(statics, &self.settings, position, f),
            _ => None,
        }
    }

    /// Drop any candidate or session.
    pub fn reset(&mut self) {
        self.state = VaultState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forward() -> Vec3 {
        Vec3::new(0.0, 0.0, -1.0)
    }

    /// A 1.0 tall box whose near face is at z = -0.6.
    fn table() -> CollidableVolume {
        CollidableVolume::cuboid(Vec3::new(0.0, 0.5, -1.1), Vec3::new(2.0, 1.0, 1.0)).vaultable(1.0)
    }

    fn start() -> Vec3 {
        Vec3::new(0.0, 0.8, 0.0)
    }

    #[test]
    fn detects_table_ahead() {
        let statics = vec![CollidableVolume::floor(0.0), table()];
        let c = detect(&statics, &VaultSettings::default(), start(), forward()).unwrap();
        assert!((c.height_difference - 1.0).abs() < 1.0e-5);
        assert!((c.landing.y - 1.8).abs() < 1.0e-5);
        assert!((c.landing.z - (-0.6 - 0.6)).abs() < 1.0e-4);
    }

    #[test]
    fn untagged_obstacle_is_not_a_candidate() {
        let mut wall = table();
        wall.vaultable = None;
        assert!(detect(&[wall], &VaultSettings::default(), start(), forward()).is_none());
    }

    #[test]
    fn glancing_hit_is_suppressed() {
        let statics = vec![
            CollidableVolume::cuboid(Vec3::new(0.0, 0.5, -0.9), Vec3::new(20.0, 1.0, 1.0))
                .vaultable(1.0),
        ];
        let angle = 70.0_f32.to_radians();
        let glancing = Vec3::new(angle.sin(), 0.0, -angle.cos());
        let s = VaultSettings::default();
        assert!(detect(&statics, &s, start(), glancing).is_none());
        assert!(detect(&statics, &s, start(), forward()).is_some());
    }

    #[test]
    fn nearest_hit_occludes_vaultable_behind_it() {
        let wall = CollidableVolume::cuboid(Vec3::new(0.0, 1.5, -0.5), Vec3::new(2.0, 3.0, 0.1));
        let statics = vec![wall, table()];
        assert!(detect(&statics, &VaultSettings::default(), start(), forward()).is_none());
    }

    #[test]
    fn scan_requires_ground_and_facing() {
        let statics = vec![table()];
        let mut m = VaultMachine::default();
        m.scan(&statics, start(), Some(forward()), false);
        assert_eq!(*m.state(), VaultState::Idle);
        m.scan(&statics, start(), None, true);
        assert_eq!(*m.state(), VaultState::Idle);
        m.scan(&statics, start(), Some(forward()), true);
        assert!(m.can_vault());
    }

    #[test]
    fn trigger_without_candidate_is_rejected() {
        let mut m = VaultMachine::default();
        let err = m.try_trigger(&[table()], start(), Some(forward()), true).unwrap_err();
        assert_eq!(err, VaultRejected::NoCandidate);
    }

    #[test]
    fn arc_rises_above_the_obstacle_and_lands_exactly() {
        let statics = vec![table()];
        let mut m = VaultMachine::default();
        m.scan(&statics, start(), Some(forward()), true);
        let session = m.try_trigger(&statics, start(), Some(forward()), true).unwrap();
        assert!((session.peak_height - 1.8).abs() < 1.0e-5);

        let mid = m.advance(0.2).unwrap();
        assert!(!mid.finished);
        assert!(mid.position.y > 1.0);

        let end = m.advance(0.2).unwrap();
        assert!(end.finished);
        assert_eq!(end.position, session.landing);
        assert_eq!(*m.state(), VaultState::Idle);
        assert!(m.advance(0.1).is_none());
    }

    #[test]
    fn zero_duration_lands_on_first_advance() {
        let mut settings = VaultSettings::default();
        settings.vault.duration = 0.0;
        let statics = vec![table()];
        let mut m = VaultMachine::new(settings);
        m.scan(&statics, start(), Some(forward()), true);
        let landing = m.try_trigger(&statics, start(), Some(forward()), true).unwrap().landing;
        let step = m.advance(0.0).unwrap();
        assert!(step.finished);
        assert_eq!(step.position, landing);
    }
}
