// scene/components.rs
// hecs components making up a scene node

use glam::{Mat4, Quat, Vec3};

use crate::scene::Transform;

pub use crate::asset::Renderable;

// ============================================================================
// Core Node Components
// ============================================================================

/// Local transform of a node
#[derive(Debug, Clone, Copy)]
pub struct TransformComponent(pub Transform);

/// World-space pose, recomputed top-down every update
#[derive(Debug, Clone, Copy)]
pub struct WorldTransform {
    /// Rigid pose (orbit, translation, rotation) handed down to children
    pub pose: Mat4,
    /// Pose plus the node's own scale and joint offset
    pub model: Mat4,
}

impl WorldTransform {
    pub const IDENTITY: Self = Self {
        pose: Mat4::IDENTITY,
        model: Mat4::IDENTITY,
    };

    pub fn compose(parent: &Mat4, local: &Transform) -> Self {
        let pose = *parent * local.pose_matrix();
        Self {
            pose,
            model: pose * Mat4::from_scale(local.scale) * Mat4::from_translation(local.joint),
        }
    }

    pub fn position(&self) -> Vec3 {
        self.pose.w_axis.truncate()
    }

    pub fn rotation(&self) -> Quat {
        let (_, rotation, _) = self.pose.to_scale_rotation_translation();
        rotation
    }
}

/// Visibility component
#[derive(Debug, Clone, Copy)]
pub struct Visible(pub bool);

impl Default for Visible {
    fn default() -> Self {
        Self(true)
    }
}

/// Gameplay flags shared by every node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeFlags {
    pub active: bool,
    /// Highlighted, e.g. the beacon the player should head for next
    pub inverted: bool,
    pub lives: i32,
}

impl Default for NodeFlags {
    fn default() -> Self {
        Self {
            active: true,
            inverted: false,
            lives: 0,
        }
    }
}

/// Name component for debugging; not required to be unique
#[derive(Debug, Clone)]
pub struct Name(pub String);

impl Name {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

// ============================================================================
// Hierarchy Components
// ============================================================================

/// Parent entity reference, used for lookups only
#[derive(Debug, Clone, Copy)]
pub struct Parent(pub hecs::Entity);

/// Owned children in traversal order
#[derive(Debug, Clone, Default)]
pub struct Children(pub Vec<hecs::Entity>);
