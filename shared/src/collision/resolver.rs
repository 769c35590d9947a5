use super::{
    ground::{GroundContact, probe_ground, snapped_center_y, sweep_ground},
    query,
    settings::CollisionSettings,
    types::{CollidableVolume, Vec3},
};

/// Output of a single [`resolve`] call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Resolution {
    /// Velocity that is safe to integrate for this tick.
    pub velocity: Vec3,
    /// Whether the ground probe found support.
    pub grounded: bool,
    /// The supporting surface, if any.
    pub ground: Option<GroundContact>,
    /// Horizontal motion was stopped or shortened by an obstacle.
    pub blocked: bool,
    /// The head probe struck something.
    pub hit_ceiling: bool,
}

/// Correct `velocity` so that `position + velocity * dt` does not penetrate the statics.
///
/// Algorithm:
/// - Ground: a ray straight down from `position + ground_check_offset`. Any hit within
///   `half_height + offset + margin` means grounded, and downward velocity is zeroed.
///   Otherwise, when falling, the ray is extended by the fall distance of this tick and
///   a surface found there caps the fall so the feet land on it.
/// - Horizontal: only when moving. Rays at three heights (above step height, mid-capsule,
///   near the head) along the horizontal velocity, reaching `radius + travel + margin`.
///   A hit within `radius + margin` zeroes *both* horizontal components. A farther hit
///   shortens the horizontal velocity so the capsule stops `radius + margin` short of it.
///   There is no sliding along the obstacle.
/// - Ceiling: a short ray up from just below the head. A hit zeroes upward velocity.
///
/// Obstacles whose top is within step height of the feet are ignored by the horizontal
/// test so the player walks over them.
///
/// This is a pure function: identical inputs always produce identical output.
pub fn resolve(
    statics: &[CollidableVolume],
    settings: &CollisionSettings,
    position: Vec3,
    velocity: Vec3,
    dt: f32,
) -> Resolution {
    let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
    let mut velocity = velocity;

    // 1) Ground.
    let ground = probe_ground(statics, settings, position);
    let grounded = ground.is_some();
    if velocity.y < 0.0 {
        if grounded {
            velocity.y = 0.0;
        } else if let Some(landing) =
            sweep_ground(statics, settings, position, -velocity.y * dt)
        {
            let drop = (position.y - snapped_center_y(&landing, settings)).max(0.0);
            velocity.y = velocity.y.max(-drop / dt);
        }
    }

    // 2) Horizontal.
    let mut blocked = false;
    let horizontal = Vec3::new(velocity.x, 0.0, velocity.z);
    let speed = horizontal.norm();
    if speed > settings.min_horizontal_speed {
        if let Some(distance) = nearest_obstacle(statics, settings, position, horizontal, dt) {
            let allowed = distance - settings.blocking_distance();
            let travel = speed * dt;
            if allowed <= 0.0 {
                velocity.x = 0.0;
                velocity.z = 0.0;
                blocked = true;
            } else if allowed < travel {
                let scale = allowed / travel;
                velocity.x *= scale;
                velocity.z *= scale;
                blocked = true;
            }
        }
    }

    // 3) Ceiling.
    let hit_ceiling = probe_ceiling(statics, settings, position);
    if hit_ceiling && velocity.y > 0.0 {
        velocity.y = 0.0;
    }

    Resolution {
        velocity,
        grounded,
        ground,
        blocked,
        hit_ceiling,
    }
}

/// Distance to the nearest non-step obstacle along `horizontal`, over all probe heights.
fn nearest_obstacle(
    statics: &[CollidableVolume],
    settings: &CollisionSettings,
    position: Vec3,
    horizontal: Vec3,
    dt: f32,
) -> Option<f32> {
    let speed = horizontal.norm();
    let dir = horizontal / speed;
    let range = settings.radius + speed * dt + settings.margin;
    let feet_y = position.y - settings.half_height();

    settings
        .horizontal_probe_heights()
        .iter()
        .filter_map(|&h| {
            let origin = Vec3::new(position.x, feet_y + h, position.z);
            query::cast_ray(statics, origin, dir, range)
                .into_iter()
                .find(|hit| !query::is_step_obstacle(hit, feet_y, settings))
                .map(|hit| hit.distance)
        })
        .min_by(f32::total_cmp)
}

fn probe_ceiling(statics: &[CollidableVolume], settings: &CollisionSettings, position: Vec3) -> bool {
    let origin = position + Vec3::new(0.0, settings.half_height() - settings.margin, 0.0);
    query::cast_ray_nearest(statics, origin, Vec3::y(), settings.margin * 2.0).is_some()
}
