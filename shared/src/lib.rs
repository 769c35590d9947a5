pub mod bitmask_flags;
pub mod collision;
pub mod config;
pub mod constants;
pub mod error;
pub mod input;
pub mod motion;
pub mod movement;
pub mod scheduler;
pub mod snapshot;
pub mod utils;
pub mod vault;
pub mod view;

pub use collision::{
    CollidableVolume, CollisionSettings, GroundContact, RayHit, Resolution, Transform, VaultTag,
    VolumeShape, cast_ray, cast_ray_nearest, probe_ground, resolve,
};
pub use config::MovementConfig;
pub use error::ConfigError;
pub use input::{ActionTracker, InputAction, InputSnapshot, InputSource};
pub use motion::Locomotion;
pub use movement::{PlayerController, PlayerPhysicsState, TickOutcome};
pub use scheduler::{Liveness, ScheduleHandle, TickScheduler};
pub use snapshot::PlayerSnapshot;
pub use vault::{VaultCandidate, VaultMachine, VaultRejected, VaultSession, VaultState};
pub use view::{LeanMode, ViewBlender, ViewPose};
