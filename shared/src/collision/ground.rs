use super::{
    query,
    settings::CollisionSettings,
    types::{CollidableVolume, Vec3},
};

/// Support found beneath the player by the ground probe.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GroundContact {
    /// World-space point the probe struck.
    pub point: Vec3,
    /// Surface normal at `point`.
    pub normal: Vec3,
    /// Distance from the probe origin (center + `ground_check_offset`).
    pub distance: f32,
}

/// Probe straight down from slightly above the capsule center.
///
/// Returns the nearest blocking surface within
/// `half_height + ground_check_offset + margin` of the probe origin, or `None`
/// when the player is unsupported (including when `statics` is empty).
pub fn probe_ground(
    statics: &[CollidableVolume],
    settings: &CollisionSettings,
    position: Vec3,
) -> Option<GroundContact> {
    let origin = position + Vec3::new(0.0, settings.ground_check_offset, 0.0);
    let range = settings.ground_probe_range();

    query::cast_ray_nearest(statics, origin, -Vec3::y(), range)
        .filter(|hit| hit.distance <= range)
        .map(|hit| GroundContact {
            point: hit.point,
            normal: hit.normal,
            distance: hit.distance,
        })
}

/// Extend the ground probe by this tick's fall distance.
///
/// Only reports support the regular probe would miss: a surface below the
/// grounded range but within `fall` of it. The resolver uses it to land the feet
/// on that surface instead of tunnelling past it in one long tick.
pub fn sweep_ground(
    statics: &[CollidableVolume],
    settings: &CollisionSettings,
    position: Vec3,
    fall: f32,
) -> Option<GroundContact> {
    if !(fall > 0.0) {
        return None;
    }
    let origin = position + Vec3::new(0.0, settings.ground_check_offset, 0.0);
    let range = settings.ground_probe_range();

    query::cast_ray_nearest(statics, origin, -Vec3::y(), range + fall)
        .filter(|hit| hit.distance > range)
        .map(|hit| GroundContact {
            point: hit.point,
            normal: hit.normal,
            distance: hit.distance,
        })
}

/// Capsule center height that puts the feet exactly on `contact`.
#[inline]
pub fn snapped_center_y(contact: &GroundContact, settings: &CollisionSettings) -> f32 {
    contact.point.y + settings.half_height()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standing_on_floor_is_supported() {
        let settings = CollisionSettings::default();
        let statics = vec![CollidableVolume::floor(0.0)];
        let contact = probe_ground(&statics, &settings, Vec3::new(0.0, 0.8, 0.0)).unwrap();
        assert!((contact.distance - 0.9).abs() < 1.0e-5);
        assert!((snapped_center_y(&contact, &settings) - 0.8).abs() < 1.0e-6);
    }

    #[test]
    fn support_just_outside_the_probe_is_ignored() {
        let settings = CollisionSettings::default();
        let statics = vec![CollidableVolume::floor(0.0)];
        // Probe range is 0.8 + 0.1 + 0.05 = 0.95 below center + 0.1.
        assert!(probe_ground(&statics, &settings, Vec3::new(0.0, 0.86, 0.0)).is_none());
        assert!(probe_ground(&statics, &settings, Vec3::new(0.0, 0.84, 0.0)).is_some());
    }

    #[test]
    fn sweep_reaches_past_the_probe_by_the_fall_distance() {
        let settings = CollisionSettings::default();
        let statics = vec![CollidableVolume::floor(0.0)];
        let position = Vec3::new(0.0, 2.0, 0.0);
        assert!(probe_ground(&statics, &settings, position).is_none());
        assert!(sweep_ground(&statics, &settings, position, 1.0).is_none());

        let contact = sweep_ground(&statics, &settings, position, 1.5).unwrap();
        assert!(contact.point.y.abs() < 1.0e-5);
        assert!(sweep_ground(&statics, &settings, position, 0.0).is_none());
    }

    #[test]
    fn no_statics_means_no_support() {
        let settings = CollisionSettings::default();
        assert!(probe_ground(&[], &settings, Vec3::new(0.0, 0.8, 0.0)).is_none());
    }
}
