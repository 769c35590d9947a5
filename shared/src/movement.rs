use crate::{
    collision::{
        CollidableVolume, CollisionSettings, Quat, Vec3, ground::snapped_center_y, resolve,
    },
    config::MovementConfig,
    constants::MAX_TICK_DT,
    input::{FocusGate, InputAction, InputSource},
    motion::{DesiredMotion, desired_motion},
    scheduler::{Liveness, TickScheduler},
    snapshot::PlayerSnapshot,
    utils::{planar_forward, sanitize_dt},
    vault::{VaultMachine, VaultRejected, VaultSettings, VaultState},
    view::{LeanMode, ViewBlender, ViewMotion, ViewPose, ViewSettings},
};

/// Physical state of the local player's capsule.
///
/// Invariant: while `grounded`, the feet (`position.y - height/2`) rest on the
/// supporting surface found by the last ground probe.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerPhysicsState {
    /// Capsule center, world space.
    pub position: Vec3,
    pub velocity: Vec3,
    pub grounded: bool,
    pub height: f32,
    pub radius: f32,
    /// Yaw-only facing from the last tick; `None` while looking straight up or down.
    pub facing: Option<Vec3>,
}

impl PlayerPhysicsState {
    pub fn new(position: Vec3, height: f32, radius: f32) -> Self {
        Self {
            position,
            velocity: Vec3::zeros(),
            grounded: false,
            height,
            radius,
            facing: None,
        }
    }

    #[inline]
    pub fn feet_y(&self) -> f32 {
        self.position.y - self.height * 0.5
    }
}

/// Deferred work the controller queues for itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControllerEvent {
    Respawn,
}

/// What happened during one [`PlayerController::tick`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickOutcome {
    pub pose: ViewPose,
    pub vault_started: bool,
    pub vault_finished: bool,
    /// Set when a vault press did not start a vault.
    pub vault_rejected: Option<VaultRejected>,
    /// The player crossed the kill plane this tick.
    pub died: bool,
    pub respawned: bool,
}

impl TickOutcome {
    fn new(pose: ViewPose) -> Self {
        Self {
            pose,
            vault_started: false,
            vault_finished: false,
            vault_rejected: None,
            died: false,
            respawned: false,
        }
    }
}

/// Movement integrator for the local player.
///
/// Due scheduled events (respawn) run first. Then, in order:
/// 1. an active vault, which overrides everything else and ends the tick
/// 2. vault scan and trigger; a successful trigger ends the tick
/// 3. intent velocity and gravity
/// 4. collision resolution, then integration
/// 5. ground snap
/// 6. kill plane
/// 7. view blending
pub struct PlayerController {
    config: MovementConfig,
    collision: CollisionSettings,
    state: PlayerPhysicsState,
    camera_rotation: Quat,
    vault: VaultMachine,
    view: ViewBlender,
    scheduler: TickScheduler<ControllerEvent>,
    liveness: Liveness,
    dead: bool,
    pose: ViewPose,
}

impl PlayerController {
    /// A controller standing at the configured spawn point.
    pub fn new(config: MovementConfig) -> Self {
        let spawn = config.respawn.spawn();
        Self::with_position(config, spawn)
    }

    pub fn with_position(config: MovementConfig, position: Vec3) -> Self {
        let view = ViewBlender::new(ViewSettings::from_config(&config));
        let pose = view.pose();
        Self {
            collision: CollisionSettings::from_config(&config),
            state: PlayerPhysicsState::new(position, config.player.height, config.player.radius),
            camera_rotation: Quat::identity(),
            vault: VaultMachine::new(VaultSettings::from_config(&config)),
            view,
            scheduler: TickScheduler::new(),
            liveness: Liveness::new(),
            dead: false,
            pose,
            config,
        }
    }

    #[inline]
    pub fn config(&self) -> &MovementConfig {
        &self.config
    }

    #[inline]
    pub fn state(&self) -> &PlayerPhysicsState {
        &self.state
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.state.position
    }

    #[inline]
    pub fn velocity(&self) -> Vec3 {
        self.state.velocity
    }

    #[inline]
    pub fn is_grounded(&self) -> bool {
        self.state.grounded
    }

    /// Camera position: capsule center raised by the eye offset.
    pub fn eye_position(&self) -> Vec3 {
        self.state.position + Vec3::new(0.0, self.config.player.eye_offset(), 0.0)
    }

    #[inline]
    pub fn vault_state(&self) -> &VaultState {
        self.vault.state()
    }

    #[inline]
    pub fn can_vault(&self) -> bool {
        self.vault.can_vault()
    }

    #[inline]
    pub fn is_vaulting(&self) -> bool {
        self.vault.is_active()
    }

    #[inline]
    pub fn view(&self) -> &ViewBlender {
        &self.view
    }

    #[inline]
    pub fn pose(&self) -> &ViewPose {
        &self.pose
    }

    #[inline]
    pub fn lean_amount(&self) -> f32 {
        self.pose.lean_amount
    }

    #[inline]
    pub fn lean_mode(&self) -> LeanMode {
        self.pose.lean_mode
    }

    #[inline]
    pub fn is_aiming(&self) -> bool {
        self.pose.is_aiming
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.dead
    }

    #[inline]
    pub fn is_despawned(&self) -> bool {
        !self.liveness.is_alive()
    }

    /// Move the player without simulating the path. Cancels any vault.
    pub fn teleport(&mut self, position: Vec3) {
        self.state.position = position;
        self.state.velocity = Vec3::zeros();
        self.state.grounded = false;
        self.vault.reset();
    }

    /// Remove the player. Pending respawns are dropped when they come due.
    pub fn despawn(&mut self) {
        log::info!("player despawned");
        self.liveness.kill();
    }

    /// Outbound state for the network relay.
    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot::new(self.state.position, &self.camera_rotation, self.pose.lean_amount)
    }

    /// Advance the controller by `dt` seconds.
    ///
    /// `statics` is borrowed for this tick only; the caller may hand a different
    /// list to the next tick.
    pub fn tick<I: InputSource + ?Sized>(
        &mut self,
        input: &I,
        statics: &[CollidableVolume],
        camera_rotation: &Quat,
        dt: f32,
    ) -> TickOutcome {
        if dt > MAX_TICK_DT {
            log::warn!("tick dt {dt:.3}s clamped to {MAX_TICK_DT}s");
        }
        let dt = sanitize_dt(dt);
        let input = FocusGate(input);

        self.camera_rotation = *camera_rotation;
        self.state.facing = planar_forward(camera_rotation);

        let mut respawned = false;
        for event in self.scheduler.advance(dt) {
            match event {
                ControllerEvent::Respawn => {
                    self.respawn();
                    respawned = true;
                }
            }
        }

        let mut outcome = TickOutcome::new(self.pose);
        outcome.respawned = respawned;

        if self.is_despawned() || self.dead {
            return outcome;
        }

        // 1) Active vault owns the position.
        if let Some(step) = self.vault.advance(dt) {
            self.state.position = step.position;
            self.state.velocity = Vec3::zeros();
            self.state.grounded = false;
            outcome.vault_finished = step.finished;
            outcome.pose = self.blend_view(&input, &DesiredMotion::default(), dt);
            return outcome;
        }

        // 2) Detect and trigger before any physics.
        self.vault.scan(
            statics,
            self.state.position,
            self.state.facing,
            self.state.grounded,
        );
        if input.is_pressed(InputAction::Vault) {
            match self.vault.try_trigger(
                statics,
                self.state.position,
                self.state.facing,
                self.state.grounded,
            ) {
                Ok(_) => {
                    self.state.velocity = Vec3::zeros();
                    self.state.grounded = false;
                    outcome.vault_started = true;
                    outcome.pose = self.blend_view(&input, &DesiredMotion::default(), dt);
                    return outcome;
                }
                Err(reason) => {
                    log::debug!("vault rejected: {reason}");
                    outcome.vault_rejected = Some(reason);
                }
            }
        }

        // 3) Intent and gravity.
        let desired = desired_motion(
            &input,
            camera_rotation,
            &self.config.movement,
            &self.config.aiming,
            ViewBlender::wants_aim(&input),
        );
        let mut velocity = self.state.velocity;
        velocity.x = desired.velocity.x;
        velocity.z = desired.velocity.z;
        velocity.y -= self.config.player.gravity * dt;

        // 4) Collision, then integrate.
        let resolution = resolve(statics, &self.collision, self.state.position, velocity, dt);
        self.state.velocity = resolution.velocity;
        self.state.grounded = resolution.grounded;
        self.state.position += resolution.velocity * dt;

        // 5) Keep the feet on the support.
        if let Some(contact) = resolution.ground.as_ref() {
            if self.state.velocity.y <= 0.0 {
                self.state.position.y = snapped_center_y(contact, &self.collision);
            }
        }

        // 6) Kill plane.
        if self.state.position.y < self.config.respawn.kill_height {
            self.die();
            outcome.died = true;
        }

        // 7) View.
        outcome.pose = self.blend_view(&input, &desired, dt);
        outcome
    }

    fn blend_view(
        &mut self,
        input: &impl InputSource,
        desired: &DesiredMotion,
        dt: f32,
    ) -> ViewPose {
        let motion = ViewMotion {
            locomotion: desired.locomotion,
            speed: desired.speed,
            has_input: desired.has_input,
            grounded: self.state.grounded,
        };
        self.pose = self.view.update(input, &motion, dt);
        self.pose
    }

    fn die(&mut self) {
        self.dead = true;
        self.state.velocity = Vec3::zeros();
        self.vault.reset();
        let delay = self.config.respawn.delay;
        self.scheduler
            .schedule(delay, &self.liveness, ControllerEvent::Respawn);
        log::info!(
            "player fell below {:.1}; respawn in {delay:.1}s",
            self.config.respawn.kill_height
        );
    }

    fn respawn(&mut self) {
        let spawn = self.config.respawn.spawn();
        self.teleport(spawn);
        self.view.reset();
        self.pose = self.view.pose();
        self.dead = false;
        log::info!("player respawned at {spawn:?}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::InputSnapshot;

    const DT: f32 = 1.0 / 60.0;

    fn at(y: f32) -> PlayerController {
        PlayerController::with_position(MovementConfig::default(), Vec3::new(0.0, y, 0.0))
    }

    fn on_floor() -> (PlayerController, Vec<CollidableVolume>) {
        (at(0.8), vec![CollidableVolume::floor(0.0)])
    }

    #[test]
    fn standing_on_floor_stays_put_and_grounded() {
        let (mut c, statics) = on_floor();
        for _ in 0..30 {
            c.tick(&InputSnapshot::focused(), &statics, &Quat::identity(), DT);
        }
        assert!(c.is_grounded());
        assert!((c.position().y - 0.8).abs() < 1.0e-5);
        assert_eq!(c.velocity().y, 0.0);
    }

    #[test]
    fn walking_forward_moves_along_minus_z() {
        let (mut c, statics) = on_floor();
        let input = InputSnapshot::focused().holding(InputAction::MoveForward);
        for _ in 0..60 {
            c.tick(&input, &statics, &Quat::identity(), DT);
        }
        assert!((c.position().z + 5.0).abs() < 1.0e-2);
        assert!(c.position().x.abs() < 1.0e-5);
    }

    #[test]
    fn unfocused_input_is_ignored_but_gravity_applies() {
        let mut c = at(5.0);
        let mut input = InputSnapshot::focused().holding(InputAction::MoveForward);
        input.focused = false;
        c.tick(&input, &[], &Quat::identity(), 0.1);
        assert_eq!(c.position().z, 0.0);
        assert!(c.velocity().y < 0.0);
    }

    #[test]
    fn falling_past_kill_plane_schedules_respawn() {
        let mut c = at(-49.9);
        let out = c.tick(&InputSnapshot::focused(), &[], &Quat::identity(), 0.1);
        assert!(out.died);
        assert!(c.is_dead());

        // Frozen while waiting.
        let frozen = c.position();
        c.tick(&InputSnapshot::focused(), &[], &Quat::identity(), 0.1);
        assert_eq!(c.position(), frozen);

        let mut respawned = false;
        for _ in 0..30 {
            let out = c.tick(&InputSnapshot::focused(), &[], &Quat::identity(), 0.1);
            respawned |= out.respawned;
        }
        assert!(respawned);
        assert!(!c.is_dead());
    }

    #[test]
    fn despawn_drops_pending_respawn() {
        let mut c = at(-49.9);
        c.tick(&InputSnapshot::focused(), &[], &Quat::identity(), 0.1);
        c.despawn();
        for _ in 0..30 {
            let out = c.tick(&InputSnapshot::focused(), &[], &Quat::identity(), 0.1);
            assert!(!out.respawned);
        }
        assert!(c.is_dead());
        assert!(c.is_despawned());
    }

    #[test]
    fn snapshot_carries_position_and_lean_only() {
        let (mut c, statics) = on_floor();
        c.tick(&InputSnapshot::focused(), &statics, &Quat::identity(), DT);
        let snap = c.snapshot();
        assert_eq!(Vec3::from(snap.position), c.position());
        assert_eq!(snap.lean_amount, 0.0);
    }
}
