//! View state blender.
//!
//! Maps lean, aim, gait and recoil to a camera-local offset, a roll angle, a
//! field of view and a weapon-local position. Every output eases toward its
//! target with single-pole exponential smoothing, so the result does not
//! depend on frame rate.

use serde::{Deserialize, Serialize};

use crate::{
    collision::Vec3,
    config::{
        AimSettings, CameraSettings, LeanSettings, MovementConfig, RecoilSettings,
        WeaponBobSettings,
    },
    input::{InputAction, InputSource},
    motion::Locomotion,
    utils::{smooth_toward, smooth_toward_vec},
};

/// How the lean keys drive the lean target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeanMode {
    /// Target follows whichever lean key is held; nothing held returns to center.
    #[default]
    Hold,
    /// Each press latches a side; pressing the same side again re-centers.
    Toggle,
}

impl LeanMode {
    pub fn toggled(self) -> Self {
        match self {
            LeanMode::Hold => LeanMode::Toggle,
            LeanMode::Toggle => LeanMode::Hold,
        }
    }

    /// Display name for the HUD.
    pub fn label(self) -> &'static str {
        match self {
            LeanMode::Hold => "HOLD",
            LeanMode::Toggle => "TOGGLE",
        }
    }
}

/// Lean in `[-1, 1]`; negative is left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeanState {
    pub amount: f32,
    pub target: f32,
    pub rate: f32,
    pub mode: LeanMode,
}

impl LeanState {
    pub fn new(rate: f32) -> Self {
        Self {
            amount: 0.0,
            target: 0.0,
            rate,
            mode: LeanMode::default(),
        }
    }

    /// Update the target from this frame's lean intents.
    pub fn apply_input(&mut self, input: &impl InputSource) {
        if input.is_pressed(InputAction::ToggleLeanMode) {
            self.mode = self.mode.toggled();
            self.target = 0.0;
            log::debug!("lean mode -> {:?}", self.mode);
        }

        match self.mode {
            LeanMode::Hold => {
                let left = input.is_active(InputAction::LeanLeft) as i8;
                let right = input.is_active(InputAction::LeanRight) as i8;
                self.target = (right - left) as f32;
            }
            LeanMode::Toggle => {
                if input.is_pressed(InputAction::LeanLeft) {
                    self.target = if self.target < 0.0 { 0.0 } else { -1.0 };
                }
                if input.is_pressed(InputAction::LeanRight) {
                    self.target = if self.target > 0.0 { 0.0 } else { 1.0 };
                }
            }
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.target = self.target.clamp(-1.0, 1.0);
        self.amount = smooth_toward(self.amount, self.target, self.rate, dt).clamp(-1.0, 1.0);
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AimState {
    pub is_aiming: bool,
    pub fov: f32,
    pub target_fov: f32,
    /// Aim/hip base the weapon is heading for, before bob and lean.
    pub target_weapon_offset: Vec3,
    pub rate: f32,
}

impl AimState {
    fn new(camera: &CameraSettings, aim: &AimSettings) -> Self {
        Self {
            is_aiming: false,
            fov: camera.default_fov,
            target_fov: camera.default_fov,
            target_weapon_offset: Vec3::from(aim.hip_weapon_position),
            rate: aim.transition_speed,
        }
    }
}

/// Everything the blender needs to know about the body this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewMotion {
    pub locomotion: Locomotion,
    /// Planar move speed (m/s).
    pub speed: f32,
    pub has_input: bool,
    pub grounded: bool,
}

/// Camera and weapon pose produced for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewPose {
    /// Camera-local translation (lean sway).
    pub camera_offset: Vec3,
    /// Camera roll in radians.
    pub roll: f32,
    /// Vertical field of view in degrees.
    pub fov: f32,
    /// Weapon position in camera space.
    pub weapon_position: Vec3,
    /// Extra camera pitch from recoil, radians.
    pub recoil_pitch: f32,
    pub lean_amount: f32,
    pub lean_mode: LeanMode,
    pub is_aiming: bool,
}

/// Subset of the movement configuration the blender reads.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewSettings {
    pub camera: CameraSettings,
    pub aim: AimSettings,
    pub lean: LeanSettings,
    pub bob: WeaponBobSettings,
    pub recoil: RecoilSettings,
}

impl ViewSettings {
    pub fn from_config(config: &MovementConfig) -> Self {
        Self {
            camera: config.camera.clone(),
            aim: config.aiming.clone(),
            lean: config.leaning.clone(),
            bob: config.weapon_bob.clone(),
            recoil: config.recoil.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ViewBlender {
    settings: ViewSettings,
    lean: LeanState,
    aim: AimState,
    weapon_position: Vec3,
    bob_phase: f32,
    recoil_back: f32,
    recoil_pitch: f32,
}

impl ViewBlender {
    pub fn new(settings: ViewSettings) -> Self {
        let lean = LeanState::new(settings.lean.transition_speed);
        let aim = AimState::new(&settings.camera, &settings.aim);
        Self {
            weapon_position: aim.target_weapon_offset,
            settings,
            lean,
            aim,
            bob_phase: 0.0,
            recoil_back: 0.0,
            recoil_pitch: 0.0,
        }
    }

    #[inline]
    pub fn lean(&self) -> &LeanState {
        &self.lean
    }

    #[inline]
    pub fn aim(&self) -> &AimState {
        &self.aim
    }

    #[inline]
    pub fn bob_phase(&self) -> f32 {
        self.bob_phase
    }

    /// Whether aim is held. The integrator reads this before moving so aiming
    /// slows the same tick it starts.
    pub fn wants_aim(input: &impl InputSource) -> bool {
        input.is_active(InputAction::Aim)
    }

    /// Advance one tick and return the new pose.
    pub fn update(&mut self, input: &impl InputSource, motion: &ViewMotion, dt: f32) -> ViewPose {
        let s = &self.settings;

        // Lean.
        self.lean.apply_input(input);
        self.lean.update(dt);

        // Aim.
        self.aim.is_aiming = Self::wants_aim(input);
        let (fov, base) = if self.aim.is_aiming {
            (s.aim.ads_fov, Vec3::from(s.aim.ads_weapon_position))
        } else {
            (s.camera.default_fov, Vec3::from(s.aim.hip_weapon_position))
        };
        self.aim.target_fov = fov;
        self.aim.target_weapon_offset = base;
        self.aim.fov = smooth_toward(self.aim.fov, fov, self.aim.rate, dt);

        // Bob.
        let bob = if motion.has_input && motion.grounded {
            let factor = motion.locomotion.bob_factor(&s.bob);
            self.bob_phase += motion.speed.max(0.0) * factor * dt;
            let mut intensity = s.bob.intensity;
            if self.aim.is_aiming {
                intensity *= s.aim.bob_intensity_multiplier;
            }
            bob_offset(self.bob_phase, intensity)
        } else {
            self.bob_phase = 0.0;
            Vec3::zeros()
        };

        // Lean shifts the weapon only beyond what the camera already carries.
        let lean_shift =
            self.lean.amount * s.lean.amount_multiplier * (s.lean.gun_offset_multiplier - 1.0);
        let target = base + bob + Vec3::new(lean_shift, 0.0, 0.0);
        self.weapon_position = smooth_toward_vec(self.weapon_position, target, self.aim.rate, dt);

        // Recoil: kick on the press edge, then recover.
        if input.is_pressed(InputAction::Shoot) {
            self.recoil_back += s.recoil.kick_back;
            self.recoil_pitch += s.recoil.pitch;
        }
        self.recoil_back = smooth_toward(self.recoil_back, 0.0, s.recoil.recovery_speed, dt);
        self.recoil_pitch = smooth_toward(self.recoil_pitch, 0.0, s.recoil.recovery_speed, dt);

        self.pose()
    }

    /// Pose from the current state without advancing time.
    pub fn pose(&self) -> ViewPose {
        let s = &self.settings;
        let lean = self.lean.amount;
        ViewPose {
            camera_offset: Vec3::new(lean * s.lean.amount_multiplier, 0.0, 0.0),
            roll: -lean * s.lean.roll_multiplier,
            fov: self.aim.fov,
            weapon_position: self.weapon_position + Vec3::new(0.0, 0.0, self.recoil_back),
            recoil_pitch: self.recoil_pitch,
            lean_amount: lean,
            lean_mode: self.lean.mode,
            is_aiming: self.aim.is_aiming,
        }
    }

    /// Back to rest: centered, hip-fire, no recoil. The lean mode is kept.
    pub fn reset(&mut self) {
        let mode = self.lean.mode;
        *self = Self::new(self.settings.clone());
        self.lean.mode = mode;
    }
}

/// Weapon sway for a bob phase: one side-to-side swing per cycle, and a dip at
/// each end of it. Zero at phase 0 so the bob starts from the base target.
fn bob_offset(phase: f32, intensity: f32) -> Vec3 {
    Vec3::new(
        phase.sin() * intensity,
        ((phase * 2.0).cos() - 1.0) * intensity * 0.5,
        0.0,
    )
}
