//! Polled input snapshot and the first-person controller that feeds it to
//! an agent. Device handling lives outside the crate; whoever owns the
//! window fills an [`InputState`] once per frame.

use bitflags::bitflags;
use glam::{Vec2, Vec3};

use crate::agent::Agent;
use crate::scene::Transform;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Keys: u32 {
        const FORWARD = 1 << 0;
        const BACKWARD = 1 << 1;
        const LEFT = 1 << 2;
        const RIGHT = 1 << 3;
        const JUMP = 1 << 4;
        const TURN_LEFT = 1 << 5;
        const TURN_RIGHT = 1 << 6;
        const SPRINT = 1 << 7;
        const CROUCH = 1 << 8;
        const DASH = 1 << 9;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputState {
    /// Keys held this frame
    pub keys: Keys,
    /// Mouse movement since the previous snapshot, in pixels
    pub look_delta: Vec2,
}

impl InputState {
    pub fn holding(keys: Keys) -> Self {
        Self {
            keys,
            look_delta: Vec2::ZERO,
        }
    }

    pub fn pressed(&self, key: Keys) -> bool {
        self.keys.contains(key)
    }
}

/// Maps input snapshots onto the agent control-setter contract.
#[derive(Debug, Clone)]
pub struct PlayerController {
    pub look_sensitivity: f32,
    /// Radians per second for keyboard turning
    pub turn_speed: f32,
    /// Walk speed multiplier while sprinting
    pub sprint_multiplier: f32,
    /// Walk speed multiplier while crouching; overrides sprinting
    pub crouch_multiplier: f32,
    /// Fraction of the standing height kept while crouching
    pub crouch_stance: f32,
    pub dash_speed: f32,
    /// Elevation of the dash above the horizontal, in degrees
    pub dash_angle: f32,
    has_dashed: bool,
    previous: Keys,
}

impl PlayerController {
    pub fn new(look_sensitivity: f32) -> Self {
        Self {
            look_sensitivity,
            turn_speed: 0.75,
            sprint_multiplier: 2.0,
            crouch_multiplier: 0.5,
            crouch_stance: 0.5,
            dash_speed: 40.0,
            dash_angle: 15.0,
            has_dashed: false,
            previous: Keys::empty(),
        }
    }

    pub fn apply(&mut self, input: &InputState, agent: &mut Agent, transform: &mut Transform, dt: f32) {
        if input.pressed(Keys::FORWARD) {
            agent.set_forward(1.0);
        } else {
            agent.unset_forward();
        }
        if input.pressed(Keys::BACKWARD) {
            agent.set_backward(1.0);
        } else {
            agent.unset_backward();
        }
        if input.pressed(Keys::LEFT) {
            agent.set_left(1.0);
        } else {
            agent.unset_left();
        }
        if input.pressed(Keys::RIGHT) {
            agent.set_right(1.0);
        } else {
            agent.unset_right();
        }

        let crouching = input.pressed(Keys::CROUCH);
        let multiplier = if crouching {
            self.crouch_multiplier
        } else if input.pressed(Keys::SPRINT) {
            self.sprint_multiplier
        } else {
            1.0
        };
        agent.set_speed_multiplier(multiplier);
        agent.set_stance(if crouching { self.crouch_stance } else { 1.0 });

        if agent.on_ground() {
            self.has_dashed = false;
        }

        if self.just_pressed(input, Keys::JUMP) && agent.on_ground() {
            agent.jump(Vec3::ZERO);
        }

        // One air dash per jump, along the facing direction tilted upwards
        if self.just_pressed(input, Keys::DASH) && !agent.on_ground() && !self.has_dashed {
            let planar = Vec3::new(transform.forward().x, 0.0, transform.forward().z)
                .normalize_or_zero();
            if planar != Vec3::ZERO {
                let elevation = self.dash_angle.to_radians();
                let axis = planar * elevation.cos() + Vec3::Y * elevation.sin();
                agent.jump(axis * self.dash_speed);
                self.has_dashed = true;
            }
        }

        let mut turn = 0.0;
        if input.pressed(Keys::TURN_LEFT) {
            turn += self.turn_speed * dt;
        }
        if input.pressed(Keys::TURN_RIGHT) {
            turn -= self.turn_speed * dt;
        }
        if turn != 0.0 {
            transform.yaw(turn);
        }

        let look = -input.look_delta * self.look_sensitivity;
        if look.y != 0.0 {
            transform.pitch(look.y);
        }
        if look.x != 0.0 {
            transform.yaw(look.x);
        }

        self.previous = input.keys;
    }

    fn just_pressed(&self, input: &InputState, key: Keys) -> bool {
        input.pressed(key) && !self.previous.contains(key)
    }
}

impl Default for PlayerController {
    fn default() -> Self {
        Self::new(0.001)
    }
}
