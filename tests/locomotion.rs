//! Agent locomotion against small hand-built terrains.
//!
//! Conventions: agents face -Z, +Y is up, `sample_passable` returning true
//! means the cell cannot be entered.
use beacon_course::agent::{Agent, AIRBORNE_CLEARANCE};
use beacon_course::scene::Transform;
use beacon_course::terrain::{FlatTerrain, TerrainSampler};
use glam::Vec3;

const DT: f32 = 0.05;

/// Flat ground with a constant reported slope.
struct Incline {
    slope: f32,
}

impl TerrainSampler for Incline {
    fn sample_height(&self, _x: f32, _z: f32) -> f32 {
        0.0
    }

    fn sample_passable(&self, _x: f32, _z: f32) -> bool {
        false
    }

    fn sample_slope(&self, _x: f32, _z: f32) -> f32 {
        self.slope
    }
}

/// Flat ground that cannot be entered beyond `x > wall_x`.
struct Wall {
    wall_x: f32,
}

impl TerrainSampler for Wall {
    fn sample_height(&self, _x: f32, _z: f32) -> f32 {
        0.0
    }

    fn sample_passable(&self, x: f32, _z: f32) -> bool {
        x > self.wall_x
    }

    fn sample_slope(&self, _x: f32, _z: f32) -> f32 {
        0.0
    }
}

/// Ground that cannot be entered anywhere.
struct Enclosed;

impl TerrainSampler for Enclosed {
    fn sample_height(&self, _x: f32, _z: f32) -> f32 {
        0.0
    }

    fn sample_passable(&self, _x: f32, _z: f32) -> bool {
        true
    }

    fn sample_slope(&self, _x: f32, _z: f32) -> f32 {
        0.0
    }
}

fn standing_agent(ground: f32) -> (Agent, Transform) {
    let agent = Agent::default();
    let transform = Transform::from_position(Vec3::new(0.0, ground + agent.height, 0.0));
    (agent, transform)
}

fn planar(v: Vec3) -> (f32, f32) {
    (v.x, v.z)
}

#[test]
fn falling_agent_settles_at_standing_height() {
    let terrain = FlatTerrain::new(3.0);
    let mut agent = Agent::default();
    let mut transform = Transform::from_position(Vec3::new(0.0, 40.0, 0.0));

    for _ in 0..200 {
        agent.update(&mut transform, &terrain, DT);
    }

    assert!((transform.position().y - (3.0 + agent.height)).abs() < 1e-5);
    assert_eq!(agent.vertical_velocity(), 0.0);
    assert!(agent.on_ground());
    assert!(!agent.is_falling());
}

#[test]
fn falling_agent_descends_monotonically() {
    let terrain = FlatTerrain::new(0.0);
    let mut agent = Agent::default();
    let mut transform = Transform::from_position(Vec3::new(0.0, 30.0, 0.0));

    let mut last = transform.position().y;
    for _ in 0..50 {
        agent.update(&mut transform, &terrain, DT);
        let y = transform.position().y;
        assert!(y <= last);
        assert!(y >= agent.height - 1e-5);
        last = y;
    }
}

#[test]
fn blocked_step_leaves_planar_position_unchanged() {
    let terrain = Wall { wall_x: 0.05 };
    let (mut agent, mut transform) = standing_agent(0.0);
    let before = transform.position();

    agent.set_right(1.0);
    for _ in 0..10 {
        agent.update(&mut transform, &terrain, DT);
    }

    assert_eq!(planar(transform.position()), planar(before));
}

#[test]
fn open_direction_still_moves_next_to_wall() {
    let terrain = Wall { wall_x: 0.05 };
    let (mut agent, mut transform) = standing_agent(0.0);

    agent.set_left(1.0);
    agent.update(&mut transform, &terrain, DT);

    assert!(transform.position().x < 0.0);
}

#[test]
fn committed_step_can_pass_the_passability_check() {
    let terrain = Wall { wall_x: 0.3 };
    let (mut agent, mut transform) = standing_agent(0.0);
    agent.speed = 0.1;

    agent.set_right(1.0);
    agent.update(&mut transform, &terrain, DT);

    // Checked 0.1 ahead, but the committed step is 0.1 * DT * 100.
    assert!((transform.position().x - 0.5).abs() < 1e-5);
    assert!(terrain.sample_passable(transform.position().x, 0.0));
}

#[test]
fn steep_slope_blocks_grounded_agent() {
    let terrain = Incline { slope: 0.6 };
    let (mut agent, mut transform) = standing_agent(0.0);
    let before = transform.position();

    agent.set_forward(1.0);
    agent.update(&mut transform, &terrain, DT);

    assert_eq!(planar(transform.position()), planar(before));
}

#[test]
fn gentle_slope_lets_agent_walk() {
    let terrain = Incline { slope: 0.4 };
    let (mut agent, mut transform) = standing_agent(0.0);

    agent.set_forward(1.0);
    agent.update(&mut transform, &terrain, DT);

    let expected = -agent.speed * DT * 100.0;
    assert!((transform.position().z - expected).abs() < 1e-5);
}

#[test]
fn slope_gate_is_exclusive_at_threshold() {
    let terrain = Incline { slope: 0.5 };
    let (mut agent, mut transform) = standing_agent(0.0);

    agent.set_forward(1.0);
    agent.update(&mut transform, &terrain, DT);

    assert_eq!(transform.position().z, 0.0);
}

#[test]
fn high_above_terrain_ignores_slope() {
    let terrain = Incline { slope: 5.0 };
    let mut agent = Agent::default();
    let start = AIRBORNE_CLEARANCE * agent.height + 50.0;
    let mut transform = Transform::from_position(Vec3::new(0.0, start, 0.0));

    agent.set_forward(1.0);
    agent.update(&mut transform, &terrain, DT);

    assert!(transform.position().z < 0.0);
}

#[test]
fn jump_rises_then_lands() {
    let terrain = FlatTerrain::new(0.0);
    let (mut agent, mut transform) = standing_agent(0.0);
    agent.update(&mut transform, &terrain, DT);
    assert!(agent.on_ground());

    agent.jump(Vec3::ZERO);
    agent.update(&mut transform, &terrain, DT);
    assert!(transform.position().y > agent.height);
    assert!(agent.is_rising());
    assert!(agent.is_jumping());

    let mut peak = transform.position().y;
    for _ in 0..100 {
        agent.update(&mut transform, &terrain, DT);
        peak = peak.max(transform.position().y);
    }

    assert!(peak > agent.height + 1.0);
    assert!((transform.position().y - agent.height).abs() < 1e-5);
    assert!(!agent.is_jumping());
    assert!(agent.on_ground());
}

#[test]
fn blocked_jump_lift_leaves_agent_in_place() {
    let terrain = Enclosed;
    let (mut agent, mut transform) = standing_agent(0.0);
    let before = transform.position();

    agent.jump(Vec3::ZERO);
    agent.update(&mut transform, &terrain, DT);

    // No lift was applied, so none is taken back and the agent stays airborne.
    assert_eq!(transform.position(), before);
    assert!(agent.vertical_velocity() > 0.0);
    assert!(agent.is_jumping());
}

#[test]
fn vertical_velocity_never_exceeds_fall_speed() {
    let terrain = FlatTerrain::new(-10_000.0);
    let mut agent = Agent::default();
    agent.fall_speed = 5.0;
    let mut transform = Transform::from_position(Vec3::new(0.0, 0.0, 0.0));

    for _ in 0..100 {
        agent.update(&mut transform, &terrain, DT);
        assert!(agent.vertical_velocity() >= -5.0);
    }
}
