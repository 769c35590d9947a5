/*!
Collision root module.

Hand-rolled ray-based collision for the player controller. parry (via rapier3d)
only supplies the ray-vs-primitive maths; hit ordering, filtering, and every
movement decision live here. The code is split for clarity:

- types:        shared data types (Transform, CollidableVolume, RayHit, etc.)
- settings:     capsule dimensions and probe tolerances
- narrow_phase: a ray against a single posed primitive
- query:        ordered ray casts against the whole collidable set
- ground:       downward support probe
- resolver:     ground / horizontal / ceiling velocity correction
*/

pub mod ground;
pub mod narrow_phase;
pub mod query;
pub mod resolver;
pub mod settings;
pub mod types;

// Re-export commonly used types and functions.
pub use ground::{GroundContact, probe_ground};
pub use query::{cast_ray, cast_ray_nearest};
pub use resolver::{Resolution, resolve};
pub use settings::CollisionSettings;
pub use types::{
    CollidableVolume, Iso, Point3, Quat, RayHit, Transform, Vec3, VaultTag, VolumeShape,
};
