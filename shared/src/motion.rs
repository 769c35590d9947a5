use crate::{
    collision::{Quat, Vec3},
    config::{AimSettings, LocomotionSettings, WeaponBobSettings},
    constants::DIST_EPS,
    input::{InputAction, InputSource},
    utils::{planar_forward, planar_right},
};

/// Gait selected from the held modifier keys.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Locomotion {
    Walk,
    #[default]
    Normal,
    Sprint,
}

impl Locomotion {
    /// Walk wins over sprint when both modifiers are held.
    pub fn from_input(input: &impl InputSource) -> Self {
        if input.is_active(InputAction::Walk) {
            Locomotion::Walk
        } else if input.is_active(InputAction::Sprint) {
            Locomotion::Sprint
        } else {
            Locomotion::Normal
        }
    }

    #[inline]
    pub fn speed(self, settings: &LocomotionSettings) -> f32 {
        match self {
            Locomotion::Walk => settings.walk_speed,
            Locomotion::Normal => settings.normal_speed,
            Locomotion::Sprint => settings.sprint_speed,
        }
    }

    #[inline]
    pub fn bob_factor(self, settings: &WeaponBobSettings) -> f32 {
        match self {
            Locomotion::Walk => settings.speed_factor_walk,
            Locomotion::Normal => settings.speed_factor_normal,
            Locomotion::Sprint => settings.speed_factor_sprint,
        }
    }
}

/// Result of turning one frame of movement intent into a planar velocity.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DesiredMotion {
    /// Horizontal velocity (Y is always zero).
    pub velocity: Vec3,
    /// Scalar speed after the aim multiplier (m/s); zero when there is no intent.
    pub speed: f32,
    pub locomotion: Locomotion,
    /// Any movement key is held and the keys do not cancel out.
    pub has_input: bool,
}

/// Compute the desired horizontal velocity from held movement keys.
///
/// - Forward/right are the camera's yaw-only axes; pitch never slows the player.
/// - Diagonals are normalized, so strafing forward is no faster than running forward.
/// - While aiming the speed is scaled by `aim.move_speed_multiplier`.
/// - A degenerate facing (looking straight up or down) yields no motion this tick.
pub fn desired_motion(
    input: &impl InputSource,
    camera_rotation: &Quat,
    locomotion: &LocomotionSettings,
    aim: &AimSettings,
    aiming: bool,
) -> DesiredMotion {
    let axis = |pos: InputAction, neg: InputAction| -> f32 {
        (input.is_active(pos) as i8 - input.is_active(neg) as i8) as f32
    };
    let fwd_axis = axis(InputAction::MoveForward, InputAction::MoveBackward);
    let right_axis = axis(InputAction::MoveRight, InputAction::MoveLeft);

    if fwd_axis == 0.0 && right_axis == 0.0 {
        return DesiredMotion::default();
    }

    let (Some(forward), Some(right)) = (planar_forward(camera_rotation), planar_right(camera_rotation))
    else {
        return DesiredMotion::default();
    };

    let wish = forward * fwd_axis + right * right_axis;
    let len = wish.norm();
    if len <= DIST_EPS {
        return DesiredMotion::default();
    }

    let gait = Locomotion::from_input(input);
    let mut speed = gait.speed(locomotion).max(0.0);
    if aiming {
        speed *= aim.move_speed_multiplier;
    }

    DesiredMotion {
        velocity: wish / len * speed,
        speed,
        locomotion: gait,
        has_input: true,
    }
}
