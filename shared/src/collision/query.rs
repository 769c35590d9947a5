//! Geometry query layer.
//!
//! Stateless ray casts against the current collidable set. Everything here is a
//! pure function of its arguments: the caller passes the slice it wants queried,
//! so a roster swap between ticks is picked up on the next call with no cache to
//! invalidate.

use super::{
    narrow_phase,
    settings::CollisionSettings,
    types::{CollidableVolume, RayHit, Transform, Vec3},
};
use crate::constants::DIST_EPS;

/// Cast a ray and return every hit within `max_distance`, nearest first.
///
/// - `direction` does not need to be normalized; a degenerate direction yields no hits.
/// - Volumes with `fully_collidable == Some(false)` are skipped together with their parts.
/// - Compound volumes are searched recursively and each hit reports the struck part.
pub fn cast_ray<'a>(
    statics: &'a [CollidableVolume],
    origin: Vec3,
    direction: Vec3,
    max_distance: f32,
) -> Vec<RayHit<'a>> {
    let mut hits = Vec::new();

    let len = direction.norm();
    if len <= DIST_EPS || !(max_distance > 0.0) {
        return hits;
    }
    let dir = direction / len;

    let root = Transform::default();
    for volume in statics {
        collect_hits(volume, &root, origin, dir, max_distance, &mut hits);
    }

    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    hits
}

/// Nearest hit only. Equivalent to `cast_ray(..).first()`.
pub fn cast_ray_nearest<'a>(
    statics: &'a [CollidableVolume],
    origin: Vec3,
    direction: Vec3,
    max_distance: f32,
) -> Option<RayHit<'a>> {
    cast_ray(statics, origin, direction, max_distance)
        .into_iter()
        .next()
}

fn collect_hits<'a>(
    volume: &'a CollidableVolume,
    parent: &Transform,
    origin: Vec3,
    dir: Vec3,
    max_distance: f32,
    hits: &mut Vec<RayHit<'a>>,
) {
    if !volume.is_blocking() {
        return;
    }

    let world = parent.compose(&volume.transform);

    if let Some(shape) = volume.shape.as_ref() {
        if let Some(hit) =
            narrow_phase::cast_ray_against_shape(shape, &world.iso(), origin, dir, max_distance)
        {
            hits.push(RayHit {
                distance: hit.distance,
                point: origin + dir * hit.distance,
                normal: hit.normal,
                volume,
                world,
            });
        }
    }

    for part in &volume.parts {
        collect_hits(part, &world, origin, dir, max_distance, hits);
    }
}

/// Obstacles whose top sits within step height of the feet are walked over and
/// never count as horizontal blockers (or vault candidates).
#[inline]
pub fn is_step_obstacle(hit: &RayHit<'_>, feet_y: f32, settings: &CollisionSettings) -> bool {
    hit.volume_top() - feet_y <= settings.step_height
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wall(z: f32) -> CollidableVolume {
        CollidableVolume::cuboid(Vec3::new(0.0, 1.0, z), Vec3::new(4.0, 2.0, 0.2))
    }

    #[test]
    fn hits_are_ordered_nearest_first() {
        let statics = vec![wall(-6.0), wall(-2.0), wall(-4.0)];
        let hits = cast_ray(&statics, Vec3::new(0.0, 1.0, 0.0), -Vec3::z(), 10.0);
        assert_eq!(hits.len(), 3);
        assert!(hits.windows(2).all(|w| w[0].distance <= w[1].distance));
        assert!((hits[0].distance - 1.9).abs() < 1.0e-4);
    }

    #[test]
    fn explicitly_non_blocking_volumes_are_ignored() {
        let statics = vec![wall(-2.0).non_blocking(), wall(-4.0)];
        let hit = cast_ray_nearest(&statics, Vec3::new(0.0, 1.0, 0.0), -Vec3::z(), 10.0).unwrap();
        assert!((hit.distance - 3.9).abs() < 1.0e-4);
    }

    #[test]
    fn compound_parts_are_searched_and_reported() {
        let table = CollidableVolume::group(Transform::from_translation(Vec3::new(0.0, 0.0, -3.0)))
            .named("table")
            .with_part(
                CollidableVolume::cuboid(Vec3::new(0.0, 0.5, 0.0), Vec3::new(1.0, 1.0, 1.0))
                    .named("top")
                    .vaultable(1.0),
            );
        let statics = vec![table];
        let hit = cast_ray_nearest(&statics, Vec3::new(0.0, 0.5, 0.0), -Vec3::z(), 5.0).unwrap();
        assert_eq!(hit.volume.name.as_deref(), Some("top"));
        assert!((hit.world.translation.z + 3.0).abs() < 1.0e-6);
        assert!((hit.volume_top() - 1.0).abs() < 1.0e-6);
    }

    #[test]
    fn degenerate_inputs_yield_no_hits() {
        let statics = vec![wall(-2.0)];
        assert!(cast_ray(&statics, Vec3::zeros(), Vec3::zeros(), 10.0).is_empty());
        assert!(cast_ray(&statics, Vec3::zeros(), -Vec3::z(), 0.0).is_empty());
        assert!(cast_ray(&[], Vec3::zeros(), -Vec3::z(), 10.0).is_empty());
    }
}
