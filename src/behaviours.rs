//! Non-locomotion node behaviours: homing enemies, tumbling asteroids and
//! wind-swayed tree parts.

use glam::{Quat, Vec3};

use crate::scene::Transform;

/// Homes toward a target node at a constant speed.
#[derive(Debug, Clone, Copy)]
pub struct Enemy {
    /// Weak reference; a despawned target is simply ignored
    pub target: Option<hecs::Entity>,
    pub move_speed: f32,
    pub velocity: Vec3,
    pub angular_velocity: Vec3,
}

impl Enemy {
    pub fn new(target: Option<hecs::Entity>, move_speed: f32) -> Self {
        Self {
            target,
            move_speed,
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
        }
    }

    pub fn update(&mut self, transform: &mut Transform, target_position: Option<Vec3>, dt: f32) {
        self.velocity = match target_position {
            Some(target) => (target - transform.position()).normalize_or_zero() * self.move_speed,
            None => Vec3::ZERO,
        };
        transform.position += self.velocity * dt;

        if self.angular_velocity != Vec3::ZERO {
            let spin = Quat::from_scaled_axis(self.angular_velocity * dt);
            transform.set_orientation(spin * transform.orientation());
        }
    }
}

/// Constant tumble: the orientation is pre-multiplied by `angular_momentum`
/// once per update.
#[derive(Debug, Clone, Copy)]
pub struct Spin {
    pub angular_momentum: Quat,
}

impl Spin {
    pub fn update(&self, transform: &mut Transform) {
        transform.set_orientation(self.angular_momentum * transform.orientation());
    }
}

/// Wind sway. Rocks the orbit rotation about Z so the node and everything
/// attached to it swing about the joint.
#[derive(Debug, Clone, Copy)]
pub struct Sway {
    pub offset: f32,
    pub speed: f32,
    pub strength: f32,
    elapsed: f32,
}

impl Sway {
    pub fn new(offset: f32, speed: f32, strength: f32) -> Self {
        Self {
            offset,
            speed,
            strength,
            elapsed: 0.0,
        }
    }

    pub fn update(&mut self, transform: &mut Transform, dt: f32) {
        self.elapsed += dt;
        if self.strength == 0.0 {
            return;
        }
        let angle = (self.elapsed * self.speed + self.offset).sin() * self.strength;
        transform.orbit = (transform.orbit * Quat::from_rotation_z(angle)).normalize();
    }
}
