use nalgebra as na;
use rapier3d::parry::{
    query::{PointQuery, Ray, RayCast},
    shape as pshape,
};

use super::types::{Iso, Point3, Vec3, VolumeShape};

/// Result of a ray against a single primitive.
#[derive(Clone, Copy, Debug)]
pub struct ShapeHit {
    /// Distance along the ray (the ray direction is unit length).
    pub distance: f32,
    /// World-space outward normal at the impact point.
    pub normal: Vec3,
}

/// Run `f` against the parry equivalent of `shape`.
fn with_parry_shape<R>(shape: &VolumeShape, f: impl FnOnce(&dyn pshape::Shape) -> R) -> R {
    match *shape {
        VolumeShape::Cuboid { half_extents } => f(&pshape::Cuboid::new(half_extents)),
        VolumeShape::Ball { radius } => f(&pshape::Ball::new(radius)),
        VolumeShape::Capsule {
            half_height,
            radius,
        } => f(&pshape::Capsule::new_y(half_height, radius)),
        VolumeShape::Cylinder {
            half_height,
            radius,
        } => f(&pshape::Cylinder::new(half_height, radius)),
        VolumeShape::Plane => f(&pshape::HalfSpace::new(na::Vector3::y_axis())),
    }
}

/// Cast a ray against a single posed primitive and return the entry hit (if any).
///
/// - `origin`: world-space ray start.
/// - `dir`: world-space unit direction.
/// - `max_distance`: hits further than this are ignored.
///
/// A ray that starts inside the shape reports nothing: the player's own probes
/// regularly begin inside whatever they are standing in front of, and only the
/// surfaces facing the origin should count.
pub fn cast_ray_against_shape(
    shape: &VolumeShape,
    iso: &Iso,
    origin: Vec3,
    dir: Vec3,
    max_distance: f32,
) -> Option<ShapeHit> {
    let origin = Point3::from(origin);
    let ray = Ray::new(origin, dir);

    with_parry_shape(shape, |s| {
        if s.contains_point(iso, &origin) {
            return None;
        }
        s.cast_ray_and_get_normal(iso, &ray, max_distance, true)
            .map(|hit| ShapeHit {
                distance: hit.time_of_impact,
                normal: hit.normal,
            })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ray_hits_cuboid_face_with_outward_normal() {
        let shape = VolumeShape::Cuboid {
            half_extents: Vec3::new(1.0, 1.0, 1.0),
        };
        let iso = Iso::translation(0.0, 0.0, -5.0);
        let hit = cast_ray_against_shape(&shape, &iso, Vec3::zeros(), -Vec3::z(), 10.0).unwrap();
        assert!((hit.distance - 4.0).abs() < 1.0e-5);
        assert!((hit.normal - Vec3::z()).norm() < 1.0e-5);
    }

    #[test]
    fn ray_respects_max_distance() {
        let shape = VolumeShape::Ball { radius: 0.5 };
        let iso = Iso::translation(0.0, 0.0, -5.0);
        assert!(cast_ray_against_shape(&shape, &iso, Vec3::zeros(), -Vec3::z(), 4.0).is_none());
    }

    #[test]
    fn ray_starting_inside_reports_nothing() {
        let shape = VolumeShape::Cuboid {
            half_extents: Vec3::new(1.0, 1.0, 1.0),
        };
        let iso = Iso::identity();
        assert!(cast_ray_against_shape(&shape, &iso, Vec3::zeros(), Vec3::x(), 10.0).is_none());
    }

    #[test]
    fn plane_is_hit_from_above() {
        let iso = Iso::translation(0.0, -0.5, 0.0);
        let hit =
            cast_ray_against_shape(&VolumeShape::Plane, &iso, Vec3::zeros(), -Vec3::y(), 1.0)
                .unwrap();
        assert!((hit.distance - 0.5).abs() < 1.0e-5);
        assert!((hit.normal - Vec3::y()).norm() < 1.0e-5);
    }
}
