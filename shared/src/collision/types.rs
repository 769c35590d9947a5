/*!
Core collision types and math aliases shared by the collision submodules.

This module contains no algorithms. It defines the data exchanged between:
- the geometry query layer (ray casts against the collidable set)
- the collision resolver (ground / horizontal / ceiling probes)
- the vault state machine (obstacle detection)

Collidable volumes are plain records owned by whoever builds the level. The
controller only ever borrows a `&[CollidableVolume]` for the duration of a tick,
so the owner is free to swap the whole list between ticks.
*/

use nalgebra as na;

/// Common math aliases for clarity and consistency.
pub type Vec3 = na::Vector3<f32>;
pub type Point3 = na::Point3<f32>;
pub type Quat = na::UnitQuaternion<f32>;
pub type Iso = na::Isometry3<f32>;

/// A rigid transform (isometry) in world space, or relative to a parent volume.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::zeros(),
            rotation: Quat::identity(),
        }
    }
}

impl Transform {
    #[inline]
    pub fn new(translation: Vec3, rotation: Quat) -> Self {
        Self {
            translation,
            rotation,
        }
    }

    #[inline]
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            rotation: Quat::identity(),
        }
    }

    /// Convert to nalgebra `Isometry3` for use with parry ray queries.
    #[inline]
    pub fn iso(&self) -> Iso {
        Iso::from_parts(
            na::Translation3::new(self.translation.x, self.translation.y, self.translation.z),
            self.rotation,
        )
    }

    /// Compose a child transform expressed relative to `self` into world space.
    #[inline]
    pub fn compose(&self, child: &Transform) -> Transform {
        Transform {
            translation: self.translation + self.rotation * child.translation,
            rotation: self.rotation * child.rotation,
        }
    }
}

/// Geometry of a collidable volume, in the volume's local space.
///
/// Every shape is centered on its transform's origin, so a volume's `position.y`
/// is the middle of its vertical extent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum VolumeShape {
    /// Oriented box with local half-extents (hx, hy, hz).
    Cuboid { half_extents: Vec3 },
    /// Sphere of the given radius.
    Ball { radius: f32 },
    /// Y-aligned capsule; total height is `2*half_height + 2*radius`.
    Capsule { half_height: f32, radius: f32 },
    /// Y-aligned cylinder.
    Cylinder { half_height: f32, radius: f32 },
    /// Infinite plane through the origin with normal local +Y (a floor).
    Plane,
}

impl VolumeShape {
    /// Local vertical extent of the shape, ignoring rotation.
    pub fn height(&self) -> f32 {
        match *self {
            VolumeShape::Cuboid { half_extents } => half_extents.y * 2.0,
            VolumeShape::Ball { radius } => radius * 2.0,
            VolumeShape::Capsule {
                half_height,
                radius,
            } => (half_height + radius) * 2.0,
            VolumeShape::Cylinder { half_height, .. } => half_height * 2.0,
            VolumeShape::Plane => 0.0,
        }
    }
}

/// Marks a volume as something the player may vault over.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct VaultTag {
    /// Explicit obstacle height. When `None`, the geometry-derived height is used.
    pub height: Option<f32>,
}

/// A static obstacle the player's motion must not penetrate.
///
/// `fully_collidable` is a tri-state: `None` and `Some(true)` block, `Some(false)`
/// makes every query skip the volume (and its parts).
///
/// A volume may carry named `parts`, each positioned relative to it. Queries
/// recurse into parts, and a hit reports the part that was struck.
#[derive(Clone, Debug, PartialEq)]
pub struct CollidableVolume {
    pub name: Option<String>,
    pub transform: Transform,
    pub shape: Option<VolumeShape>,
    pub fully_collidable: Option<bool>,
    pub vaultable: Option<VaultTag>,
    pub parts: Vec<CollidableVolume>,
}

impl CollidableVolume {
    pub fn new(shape: VolumeShape, transform: Transform) -> Self {
        Self {
            name: None,
            transform,
            shape: Some(shape),
            fully_collidable: None,
            vaultable: None,
            parts: Vec::new(),
        }
    }

    /// A box with full extents `size`, centered at `center`.
    pub fn cuboid(center: Vec3, size: Vec3) -> Self {
        Self::new(
            VolumeShape::Cuboid {
                half_extents: size * 0.5,
            },
            Transform::from_translation(center),
        )
    }

    pub fn ball(center: Vec3, radius: f32) -> Self {
        Self::new(VolumeShape::Ball { radius }, Transform::from_translation(center))
    }

    pub fn capsule(center: Vec3, half_height: f32, radius: f32) -> Self {
        Self::new(
            VolumeShape::Capsule {
                half_height,
                radius,
            },
            Transform::from_translation(center),
        )
    }

    pub fn cylinder(center: Vec3, half_height: f32, radius: f32) -> Self {
        Self::new(
            VolumeShape::Cylinder {
                half_height,
                radius,
            },
            Transform::from_translation(center),
        )
    }

    /// A horizontal floor at height `y`.
    pub fn floor(y: f32) -> Self {
        Self::new(
            VolumeShape::Plane,
            Transform::from_translation(Vec3::new(0.0, y, 0.0)),
        )
    }

    /// A shapeless group whose parts carry the geometry.
    pub fn group(transform: Transform) -> Self {
        Self {
            name: None,
            transform,
            shape: None,
            fully_collidable: None,
            vaultable: None,
            parts: Vec::new(),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Tag as vaultable with an explicit height.
    pub fn vaultable(mut self, height: f32) -> Self {
        self.vaultable = Some(VaultTag {
            height: Some(height),
        });
        self
    }

    /// Tag as vaultable, deriving the height from the geometry.
    pub fn vaultable_by_geometry(mut self) -> Self {
        self.vaultable = Some(VaultTag { height: None });
        self
    }

    /// Mark as explicitly non-blocking (`fully_collidable = Some(false)`).
    pub fn non_blocking(mut self) -> Self {
        self.fully_collidable = Some(false);
        self
    }

    /// Attach a sub-part positioned relative to this volume.
    pub fn with_part(mut self, part: CollidableVolume) -> Self {
        self.parts.push(part);
        self
    }

    /// Only an explicit `false` opts out of collision.
    #[inline]
    pub fn is_blocking(&self) -> bool {
        self.fully_collidable != Some(false)
    }

    /// Vertical extent used for step and vault classification.
    ///
    /// Prefers the vault tag's explicit height; otherwise derives it from the shape.
    pub fn world_height(&self) -> f32 {
        self.vaultable
            .and_then(|tag| tag.height)
            .or_else(|| self.shape.map(|s| s.height()))
            .unwrap_or(0.0)
    }
}

/// A single ray hit against the collidable set.
#[derive(Clone, Copy, Debug)]
pub struct RayHit<'a> {
    /// Distance from the ray origin along the (unit) ray direction.
    pub distance: f32,
    /// World-space impact point.
    pub point: Vec3,
    /// World-space surface normal at the impact point.
    pub normal: Vec3,
    /// The volume (or sub-part) that was struck.
    pub volume: &'a CollidableVolume,
    /// The struck volume's world transform (parent transforms applied).
    pub world: Transform,
}

impl RayHit<'_> {
    /// World-space Y of the struck volume's top face.
    #[inline]
    pub fn volume_top(&self) -> f32 {
        self.world.translation.y + self.volume.world_height() * 0.5
    }
}
