/*!
Tuning defaults for the player controller.

Every value here is the default for a field of [`crate::config::MovementConfig`].
Keeping them in one place makes tuning easier and lets tests reference the same
numbers the game ships with.

Notes
- Distances are in meters, time in seconds, angles in radians unless stated.
- Field of view values are in degrees (vertical FOV).
*/

use std::f32::consts::PI;

// --- Player capsule ---

/// Total standing height of the player's collision volume.
pub const PLAYER_HEIGHT: f32 = 1.6;

/// Radius of the player's collision volume.
pub const PLAYER_RADIUS: f32 = 0.4;

/// Gravity magnitude in meters per second squared (positive value).
/// Integrated as a downward acceleration while airborne.
pub const GRAVITY_MPS2: f32 = 30.0;

/// Eye level above the capsule center, as a fraction of player height.
pub const EYE_HEIGHT_RATIO: f32 = 0.4;

// --- Locomotion ---

pub const WALK_SPEED_MPS: f32 = 3.0;
pub const NORMAL_SPEED_MPS: f32 = 5.0;
pub const SPRINT_SPEED_MPS: f32 = 8.0;

// --- Collision ---

/// Obstacles whose top is at or below this height above the feet never block walking.
pub const STEP_HEIGHT: f32 = 0.5;

/// Upward offset applied to the ground ray origin.
pub const GROUND_CHECK_OFFSET: f32 = 0.1;

/// Tolerance margin used by every collision probe (meters).
pub const COLLISION_MARGIN: f32 = 0.05;

/// Horizontal speeds at or below this are treated as standing still (m/s).
pub const MIN_HORIZONTAL_SPEED: f32 = 1.0e-3;

/// Practical small distance for comparisons (meters).
/// Use for vector length guards before normalization.
pub const DIST_EPS: f32 = 1.0e-6;

/// Upper bound on a single tick's delta time (seconds).
/// Long frames (tab switches, debugger pauses) are clamped so one step can't tunnel.
pub const MAX_TICK_DT: f32 = 0.125;

// --- Vaulting ---

/// How far ahead of the player the vault probe reaches.
pub const VAULT_DISTANCE: f32 = 1.5;

/// Lowest obstacle top (relative to the feet) that can be vaulted.
pub const VAULT_MIN_HEIGHT_DIFF: f32 = 0.2;

/// Highest obstacle top (relative to the feet) that can be vaulted.
pub const VAULT_MAX_HEIGHT_DIFF: f32 = 1.3;

/// Duration of the vault arc.
pub const VAULT_DURATION: f32 = 0.4;

/// Maximum angle between facing and the obstacle's face normal for a vault to be offered.
pub const VAULT_FACING_TOLERANCE: f32 = PI / 3.0;

/// The vault probe starts this far below the capsule center.
pub const VAULT_PROBE_DROP: f32 = 0.3;

/// Landing point sits this many player radii past the probe hit.
pub const VAULT_LANDING_REACH: f32 = 1.5;

/// The arc's control point is at least this far above the obstacle top.
pub const VAULT_ARC_CLEARANCE: f32 = 0.5;

// --- Camera / aiming ---

pub const DEFAULT_FOV_DEG: f32 = 60.0;
pub const ADS_FOV_DEG: f32 = 30.0;

/// Weapon position relative to the camera when aiming down sights.
pub const ADS_WEAPON_POSITION: [f32; 3] = [0.0, -0.05, -0.35];

/// Weapon position relative to the camera when firing from the hip.
pub const HIP_WEAPON_POSITION: [f32; 3] = [0.2, -0.2, -0.45];

/// Rate of the FOV and weapon-position transition (1/s).
pub const ADS_TRANSITION_SPEED: f32 = 12.0;

/// Move speed multiplier while aiming.
pub const ADS_MOVE_SPEED_MULTIPLIER: f32 = 0.7;

/// Weapon bob multiplier while aiming.
pub const ADS_BOB_INTENSITY_MULTIPLIER: f32 = 0.3;

// --- Leaning ---

/// Camera lateral offset at full lean (meters).
pub const LEAN_AMOUNT_MULTIPLIER: f32 = 0.5;

/// Camera roll at full lean (radians).
pub const LEAN_ROLL_MULTIPLIER: f32 = PI / 12.0;

/// Weapon lateral offset relative to the camera offset. 1.0 rides exactly with the camera.
pub const LEAN_GUN_OFFSET_MULTIPLIER: f32 = 1.0;

/// Rate at which the lean amount approaches its target (1/s).
pub const LEAN_TRANSITION_SPEED: f32 = 8.0;

// --- Weapon bob ---

pub const BOB_INTENSITY: f32 = 0.015;
pub const BOB_SPEED_FACTOR_WALK: f32 = 1.0;
pub const BOB_SPEED_FACTOR_NORMAL: f32 = 1.5;
pub const BOB_SPEED_FACTOR_SPRINT: f32 = 2.0;

// --- Recoil ---

/// Weapon kick back along +Z (towards the camera) per shot.
pub const RECOIL_KICK_BACK: f32 = 0.04;

/// Camera pitch kick per shot (radians).
pub const RECOIL_PITCH: f32 = 0.02;

/// Rate at which recoil recovers (1/s).
pub const RECOIL_RECOVERY_SPEED: f32 = 10.0;

// --- Respawn ---

/// Falling below this height counts as leaving the arena.
pub const KILL_HEIGHT: f32 = -50.0;

/// Delay before a player that left the arena is respawned.
pub const RESPAWN_DELAY_SECS: f32 = 2.0;

/// Default spawn point (capsule center).
pub const SPAWN_POSITION: [f32; 3] = [0.0, PLAYER_HEIGHT / 2.0, 5.0];
