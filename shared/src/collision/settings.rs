/*!
Collision resolver settings.

The resolver only needs the player's capsule dimensions and three tolerances.
They are bundled here so callers build them once from the loaded
[`MovementConfig`](crate::config::MovementConfig) rather than threading the
whole config through every probe.

Notes
- Distances are in meters.
- Favor practical world-space tolerances over machine epsilon for robust behavior.
*/

use crate::{config::MovementConfig, constants::MIN_HORIZONTAL_SPEED};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CollisionSettings {
    /// Total player height.
    pub height: f32,
    /// Player radius.
    pub radius: f32,
    /// Obstacles whose top is at or below `feet + step_height` never block walking.
    pub step_height: f32,
    /// Upward offset of the ground ray origin above the capsule center.
    pub ground_check_offset: f32,
    /// Tolerance added to every probe range.
    pub margin: f32,
    /// Horizontal speeds at or below this skip the horizontal probe.
    pub min_horizontal_speed: f32,
}

impl Default for CollisionSettings {
    fn default() -> Self {
        Self::from_config(&MovementConfig::default())
    }
}

impl CollisionSettings {
    pub fn from_config(config: &MovementConfig) -> Self {
        Self {
            height: config.player.height,
            radius: config.player.radius,
            step_height: config.collision.step_height,
            ground_check_offset: config.collision.ground_check_offset,
            margin: config.collision.margin,
            min_horizontal_speed: MIN_HORIZONTAL_SPEED,
        }
    }

    #[inline]
    pub fn half_height(&self) -> f32 {
        self.height * 0.5
    }

    /// Maximum ground ray length: anything closer counts as support.
    #[inline]
    pub fn ground_probe_range(&self) -> f32 {
        self.half_height() + self.ground_check_offset + self.margin
    }

    /// A horizontal hit at or below this distance blocks motion.
    #[inline]
    pub fn blocking_distance(&self) -> f32 {
        self.radius + self.margin
    }

    /// Heights above the feet at which horizontal probes are cast:
    /// just above step height, mid-capsule and just below the head.
    #[inline]
    pub fn horizontal_probe_heights(&self) -> [f32; 3] {
        [
            self.step_height + self.margin,
            self.half_height(),
            self.height - self.margin,
        ]
    }
}

