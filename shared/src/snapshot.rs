//! Outbound player state for the network relay.
//!
//! Only what remote peers render crosses this boundary. Velocity, grounded
//! state and vault sessions stay local.

use serde::{Deserialize, Serialize};

use crate::{
    collision::{Quat, Vec3},
    utils::euler_xyz,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapVec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl From<Vec3> for SnapVec3 {
    fn from(v: Vec3) -> Self {
        Self {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}

impl From<SnapVec3> for Vec3 {
    fn from(v: SnapVec3) -> Self {
        Vec3::new(v.x, v.y, v.z)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSnapshot {
    /// Capsule center, world space.
    pub position: SnapVec3,
    /// Camera orientation as XYZ-order Euler angles (radians).
    pub rotation: SnapVec3,
    pub lean_amount: f32,
}

impl PlayerSnapshot {
    pub fn new(position: Vec3, camera_rotation: &Quat, lean_amount: f32) -> Self {
        Self {
            position: position.into(),
            rotation: euler_xyz(camera_rotation).into(),
            lean_amount: lean_amount.clamp(-1.0, 1.0),
        }
    }
}
