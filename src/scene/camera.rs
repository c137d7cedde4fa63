use glam::Vec3;

use crate::scene::SceneGraph;

/// Viewpoint that can follow a scene node.
///
/// The attachment is a plain entity id: the followed node is unaware of the
/// camera, and a despawned node just stops moving it.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub forward: Vec3,
    pub up: Vec3,
    attached: Option<hecs::Entity>,
}

impl Camera {
    pub fn attach(&mut self, entity: hecs::Entity) {
        self.attached = Some(entity);
    }

    pub fn detach(&mut self) {
        self.attached = None;
    }

    pub fn attached(&self) -> Option<hecs::Entity> {
        self.attached
    }

    pub fn target(&self) -> Vec3 {
        self.eye + self.forward
    }

    /// Copies the attached node's world pose.
    pub fn follow(&mut self, scene: &SceneGraph) {
        let Some(entity) = self.attached else {
            return;
        };

        match scene.world_transform(entity) {
            Some(world) => {
                let rotation = world.rotation();
                self.eye = world.position();
                self.forward = rotation * Vec3::NEG_Z;
                self.up = rotation * Vec3::Y;
            }
            None => log::debug!("Camera target {:?} no longer exists", entity),
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, 10.0),
            forward: Vec3::NEG_Z,
            up: Vec3::Y,
            attached: None,
        }
    }
}
