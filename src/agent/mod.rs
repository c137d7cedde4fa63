//! Kinematic locomotion for terrain-bound agents.
//!
//! An [`Agent`] is the behaviour component of a walking scene node. Each
//! update integrates vertical velocity, then resolves motion in three
//! passes against the terrain: an upward pass (jump rise plus step lift), a
//! horizontal walking pass and a downward pass that lands the agent on the
//! terrain. Candidates are checked before they are committed, so the node's
//! transform only ever holds validated positions.
//!
//! Grounded, rising, falling and jumping are derived from the continuous
//! state on demand rather than stored.

pub mod motion;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::scene::Transform;
use crate::terrain::TerrainSampler;
use motion::{damp, damping_factor, integrate_gravity, is_grounded};

/// Walk intents shorter than this are ignored.
pub const MOVE_THRESHOLD: f32 = 0.001;

/// Terrain steeper than this cannot be walked up while grounded.
pub const TRAVERSABLE_SLOPE: f32 = 0.5;

/// Agents higher than this many body heights above the next terrain sample
/// may move regardless of slope.
pub const AIRBORNE_CLEARANCE: f32 = 4.0;

/// Scale applied to the committed walking step.
pub const WALK_STEP_SCALE: f32 = 100.0;

/// Tunables shared by all agents built from a config.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub speed: f32,
    /// Distance from the terrain surface to the agent's origin when standing
    pub height: f32,
    pub step_height: f32,
    pub fall_speed: f32,
    pub jump_speed: f32,
    pub base_jump_speed: f32,
    pub gravity: f32,
    pub movement_damping: f32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            speed: 0.1,
            height: 1.8,
            step_height: 0.35,
            fall_speed: 55.0,
            jump_speed: 10.0,
            base_jump_speed: 10.0,
            gravity: 29.4,
            movement_damping: 0.2,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Agent {
    strafe_left: Vec3,
    strafe_right: Vec3,
    forward: Vec3,
    backward: Vec3,
    walk_direction: Vec3,

    vertical_velocity: f32,
    vertical_offset: f32,
    step_offset: f32,

    target_position: Vec3,
    prev_position: Vec3,

    on_ground: bool,
    jumping: bool,
    jump_axis: Vec3,

    /// Scales `speed` while walking, e.g. for sprinting
    speed_multiplier: f32,
    /// Scales `height` while crouching
    stance_scale: f32,

    pub speed: f32,
    pub height: f32,
    pub step_height: f32,
    pub fall_speed: f32,
    pub jump_speed: f32,
    pub base_jump_speed: f32,
    pub gravity: f32,
    pub movement_damping: f32,
}

impl Agent {
    pub fn new(config: &AgentConfig) -> Self {
        Self {
            strafe_left: Vec3::ZERO,
            strafe_right: Vec3::ZERO,
            forward: Vec3::ZERO,
            backward: Vec3::ZERO,
            walk_direction: Vec3::ZERO,
            vertical_velocity: 0.0,
            vertical_offset: 0.0,
            step_offset: 0.0,
            target_position: Vec3::ZERO,
            prev_position: Vec3::ZERO,
            on_ground: false,
            jumping: false,
            jump_axis: Vec3::Y,
            speed_multiplier: 1.0,
            stance_scale: 1.0,
            speed: config.speed,
            height: config.height,
            step_height: config.step_height,
            fall_speed: config.fall_speed,
            jump_speed: config.jump_speed,
            base_jump_speed: config.base_jump_speed,
            gravity: config.gravity,
            movement_damping: config.movement_damping,
        }
    }

    // ------------------------------------------------------------------
    // Derived state
    // ------------------------------------------------------------------

    pub fn on_ground(&self) -> bool {
        is_grounded(self.vertical_velocity, self.vertical_offset)
    }

    pub fn is_rising(&self) -> bool {
        self.vertical_velocity > 0.0
    }

    pub fn is_falling(&self) -> bool {
        self.vertical_velocity < 0.0 && !self.on_ground()
    }

    pub fn is_jumping(&self) -> bool {
        self.jumping
    }

    pub fn vertical_velocity(&self) -> f32 {
        self.vertical_velocity
    }

    pub fn vertical_offset(&self) -> f32 {
        self.vertical_offset
    }

    pub fn walk_direction(&self) -> Vec3 {
        self.walk_direction
    }

    pub fn target_position(&self) -> Vec3 {
        self.target_position
    }

    pub fn prev_position(&self) -> Vec3 {
        self.prev_position
    }

    pub fn jump_axis(&self) -> Vec3 {
        self.jump_axis
    }

    pub fn speed_multiplier(&self) -> f32 {
        self.speed_multiplier
    }

    /// Height above the terrain the agent currently stands at.
    pub fn standing_height(&self) -> f32 {
        self.height * self.stance_scale
    }

    /// Moves the agent without terrain validation, e.g. at spawn.
    pub fn teleport(&mut self, transform: &mut Transform, position: Vec3) {
        transform.set_position(position);
        self.target_position = position;
        self.prev_position = position;
    }

    // ------------------------------------------------------------------
    // Control setters
    // ------------------------------------------------------------------

    pub fn set_left(&mut self, amount: f32) {
        self.strafe_left = Vec3::NEG_X * amount;
    }

    pub fn set_right(&mut self, amount: f32) {
        self.strafe_right = Vec3::X * amount;
    }

    pub fn set_forward(&mut self, amount: f32) {
        self.forward = Vec3::NEG_Z * amount;
    }

    pub fn set_backward(&mut self, amount: f32) {
        self.backward = Vec3::Z * amount;
    }

    pub fn unset_left(&mut self) {
        self.strafe_left = Vec3::ZERO;
    }

    pub fn unset_right(&mut self) {
        self.strafe_right = Vec3::ZERO;
    }

    pub fn unset_forward(&mut self) {
        self.forward = Vec3::ZERO;
    }

    pub fn unset_backward(&mut self) {
        self.backward = Vec3::ZERO;
    }

    /// Walking step scale; 1.0 walks at `speed`. Negative values are clamped to zero.
    pub fn set_speed_multiplier(&mut self, multiplier: f32) {
        self.speed_multiplier = multiplier.max(0.0);
    }

    /// Fraction of `height` to stand at; 1.0 is upright. The agent sinks
    /// under gravity when lowered and snaps up when raised.
    pub fn set_stance(&mut self, scale: f32) {
        self.stance_scale = scale.clamp(0.0, 1.0);
    }

    /// Launches the agent along `impulse`. A zero vector jumps straight up
    /// at the base jump speed.
    pub fn jump(&mut self, impulse: Vec3) {
        let len = impulse.length();
        if len == 0.0 {
            self.jump_speed = self.base_jump_speed;
            self.jump_axis = Vec3::Y;
        } else {
            self.jump_speed = len;
            self.jump_axis = impulse / len;
        }
        self.vertical_velocity = self.jump_speed;
        self.jumping = true;
    }

    // ------------------------------------------------------------------
    // Per-frame update
    // ------------------------------------------------------------------

    pub fn update(&mut self, transform: &mut Transform, terrain: &dyn TerrainSampler, dt: f32) {
        self.prev_position = transform.position();
        self.target_position = self.prev_position;

        self.on_ground = self.on_ground();

        let decay = damping_factor(self.movement_damping, dt);
        if self.walk_direction.length() > 0.0 {
            self.walk_direction *= decay;
        }
        self.vertical_velocity = damp(self.vertical_velocity, self.movement_damping, dt);

        self.vertical_velocity = integrate_gravity(
            self.vertical_velocity,
            self.gravity,
            dt,
            self.fall_speed,
            self.jump_speed,
        );
        self.vertical_offset = self.vertical_velocity * dt;

        self.up_move(transform, terrain);

        let intent = self.strafe_left + self.strafe_right + self.forward + self.backward;
        self.walk_direction = intent.normalize_or_zero();

        self.walking_move(transform, terrain, self.walk_direction, dt);
        self.down_move(transform, terrain, dt);
    }

    fn up_move(&mut self, transform: &mut Transform, terrain: &dyn TerrainSampler) {
        self.step_offset = 0.0;
        if !self.is_rising() {
            return;
        }

        let step = self.step_height;
        let candidate = transform.position()
            + Vec3::Y * step
            + self.jump_axis * self.vertical_offset.max(0.0);

        if terrain.sample_passable(candidate.x, candidate.z) {
            return;
        }

        self.target_position = candidate;
        transform.set_position(candidate);
        self.step_offset = step;
    }

    /// Checks passability one `speed` ahead but commits `speed * dt * 100`,
    /// so a long committed step can end inside a blocked cell.
    fn walking_move(
        &mut self,
        transform: &mut Transform,
        terrain: &dyn TerrainSampler,
        direction: Vec3,
        dt: f32,
    ) {
        if direction.length() <= MOVE_THRESHOLD {
            return;
        }

        let speed = self.speed * self.speed_multiplier;
        let forward = transform
            .rotate_direction(direction.normalize())
            .normalize_or_zero();
        let step_target = self.target_position + forward * speed;
        if terrain.sample_passable(step_target.x, step_target.z) {
            return;
        }

        let here = terrain.sample_height(self.target_position.x, self.target_position.z);
        let next = terrain.sample_height(step_target.x, step_target.z);
        let sampled_slope = terrain.sample_slope(step_target.x, step_target.z);
        log::trace!(
            "Slope {} Sampled {}",
            (here - next).abs(),
            sampled_slope
        );

        let clears_terrain =
            self.target_position.y > next + self.standing_height() * AIRBORNE_CLEARANCE;
        if sampled_slope < TRAVERSABLE_SLOPE || clears_terrain {
            self.target_position += forward * speed * dt * WALK_STEP_SCALE;
            transform.set_position(self.target_position);
        }
    }

    fn down_move(&mut self, transform: &mut Transform, terrain: &dyn TerrainSampler, dt: f32) {
        let mut down_velocity = (-self.vertical_velocity).max(0.0) * dt;
        if down_velocity > self.fall_speed && (self.on_ground || !self.jumping) {
            down_velocity = self.fall_speed;
        }

        self.target_position -= Vec3::Y * (self.step_offset + down_velocity);

        let ground = terrain.sample_height(self.target_position.x, self.target_position.z);
        let standing = ground + self.standing_height();
        if self.target_position.y < standing {
            self.target_position.y = standing;
            transform.set_position(self.target_position);
            self.land();
        } else {
            transform.set_position(self.target_position);
        }
    }

    fn land(&mut self) {
        self.vertical_velocity = 0.0;
        self.vertical_offset = 0.0;
        self.jumping = false;
    }

    // ------------------------------------------------------------------
    // Post-hoc collision response
    // ------------------------------------------------------------------

    /// Responds to a floor contact detected after the move was applied.
    /// Blends the height back toward the previous frame and lands the agent.
    pub fn down_collision(&mut self, transform: &mut Transform, collision_point_y: f32) {
        let standing = collision_point_y + self.standing_height();
        if self.target_position.y > standing {
            return;
        }

        let position = transform.position();
        let fraction = (position.y - standing) * 0.5;
        let y = self.prev_position.y + (position.y - self.prev_position.y) * fraction;
        transform.set_position(Vec3::new(position.x, y, position.z));
        self.target_position = transform.position();
        self.land();
    }

    /// Responds to a ceiling contact: vertical motion stops, the jump continues.
    pub fn up_collision(&mut self) {
        self.vertical_velocity = 0.0;
        self.vertical_offset = 0.0;
    }
}

impl Default for Agent {
    fn default() -> Self {
        Self::new(&AgentConfig::default())
    }
}
