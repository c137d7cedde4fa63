// scene/builder.rs
// Fluent construction of scene nodes

use glam::{Quat, Vec3};

use super::components::*;
use crate::agent::Agent;
use crate::behaviours::{Enemy, Spin, Sway};
use crate::scene::Transform;

/// Collects the components of a node before it is added to a
/// [`SceneGraph`](super::SceneGraph). Every node gets a name, a transform,
/// visibility and gameplay flags; the rest is optional.
pub struct NodeBuilder {
    builder: hecs::EntityBuilder,
}

impl NodeBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        let mut builder = hecs::EntityBuilder::new();
        builder
            .add(Name::new(name))
            .add(TransformComponent(Transform::IDENTITY))
            .add(Visible(true))
            .add(NodeFlags::default());
        Self { builder }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.builder.add(TransformComponent(transform));
        self
    }

    pub fn with_position(self, position: Vec3) -> Self {
        self.with_transform(Transform::from_position(position))
    }

    pub fn with_pose(self, position: Vec3, orientation: Quat) -> Self {
        self.with_transform(Transform::from_trs(position, orientation, Vec3::ONE))
    }

    pub fn with_renderable(mut self, renderable: Renderable) -> Self {
        self.builder.add(renderable);
        self
    }

    pub fn visible(mut self, visible: bool) -> Self {
        self.builder.add(Visible(visible));
        self
    }

    pub fn with_flags(mut self, flags: NodeFlags) -> Self {
        self.builder.add(flags);
        self
    }

    pub fn with_agent(mut self, agent: Agent) -> Self {
        self.builder.add(agent);
        self
    }

    pub fn with_enemy(mut self, enemy: Enemy) -> Self {
        self.builder.add(enemy);
        self
    }

    pub fn with_spin(mut self, angular_momentum: Quat) -> Self {
        self.builder.add(Spin { angular_momentum });
        self
    }

    pub fn with_sway(mut self, sway: Sway) -> Self {
        self.builder.add(sway);
        self
    }

    pub(crate) fn spawn(mut self, world: &mut hecs::World) -> hecs::Entity {
        world.spawn(self.builder.build())
    }
}
