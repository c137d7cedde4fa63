use std::f32::consts::PI;
use std::sync::Arc;

use glam::{Quat, Vec3};
use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::tree::{plant_tree, TreeParts};
use super::Level;
use crate::agent::Agent;
use crate::asset::{Assets, MaterialDesc, MeshDesc};
use crate::behaviours::Enemy;
use crate::config::GameConfig;
use crate::error::SceneError;
use crate::scene::{NodeBuilder, NodeFlags, SceneGraph};
use crate::terrain::heightmap::Heightmap;
use crate::terrain::TerrainSampler;

pub const OBJECT_MATERIAL: &str = "ObjectMaterial";

/// Registers the primitive meshes and the shared material used by the
/// course level.
pub fn register_resources(assets: &mut Assets, config: &GameConfig) {
    let hitboxes = &config.hitboxes;

    assets.meshes.insert(
        "SimpleObject",
        MeshDesc::Sphere {
            radius: 0.8,
            segments: 5,
            rings: 5,
        },
    );
    assets.meshes.insert(
        "Beacon",
        MeshDesc::Torus {
            loop_radius: config.beacon_radius,
            circle_radius: config.beacon_radius - hitboxes.beacon,
            loop_samples: 20,
            circle_samples: 20,
        },
    );
    assets.meshes.insert(
        "Player",
        MeshDesc::Torus {
            loop_radius: hitboxes.player,
            circle_radius: 0.1,
            loop_samples: 15,
            circle_samples: 15,
        },
    );
    assets.meshes.insert(
        "Enemy",
        MeshDesc::Sphere {
            radius: hitboxes.enemy,
            segments: 5,
            rings: 5,
        },
    );
    assets.meshes.insert(
        "Powerup",
        MeshDesc::Cylinder {
            radius: hitboxes.powerup,
            height: hitboxes.powerup,
            samples: 10,
        },
    );
    assets.meshes.insert(
        "Branch",
        MeshDesc::Cone {
            radius: 1.0,
            height: 1.0,
            samples: 10,
        },
    );
    assets.meshes.insert(
        "Leaf",
        MeshDesc::Sphere {
            radius: 1.0,
            segments: 4,
            rings: 10,
        },
    );

    assets.materials.insert(
        OBJECT_MATERIAL,
        MaterialDesc {
            path: "shaders/material".to_string(),
        },
    );

    info!(
        "Registered {} meshes and {} materials",
        assets.meshes.len(),
        assets.materials.len()
    );
}

/// Keeps the x/z of `position` and puts it `lift` above the terrain, or
/// returns it untouched when snapping is off.
fn place(terrain: &dyn TerrainSampler, position: Vec3, lift: f32, snap: bool) -> Vec3 {
    if !snap {
        return position;
    }
    let ground = terrain.sample_height(position.x, position.z);
    Vec3::new(position.x, ground + lift, position.z)
}

/// Builds the beacon course: terrain, player, beacons, enemies, powerups,
/// a tree near the start and a field of tumbling asteroids.
pub fn build_course_level(assets: &Assets, config: &GameConfig) -> Result<Level, SceneError> {
    let mut rng = StdRng::seed_from_u64(config.rng_seed);

    let terrain = Arc::new(Heightmap::rolling_hills(&config.terrain, config.rng_seed));
    let mut scene = SceneGraph::new(terrain.clone());
    scene.set_background(config.background);

    let snap = config.snap_to_terrain;
    let lift = config.agent.height;

    // Player
    let player_mesh = assets.renderable("Player", OBJECT_MATERIAL)?;
    let start = place(terrain.as_ref(), config.player_start, lift, true);
    let player = scene.add_node(
        NodeBuilder::new("Player")
            .with_position(start)
            .with_renderable(player_mesh)
            .visible(false)
            .with_agent(Agent::new(&config.agent))
            .with_flags(NodeFlags {
                lives: config.player_lives,
                ..NodeFlags::default()
            }),
    );
    let mut level = Level::new(scene, player);

    // Tree
    let parts = TreeParts {
        branch: assets.renderable("Branch", OBJECT_MATERIAL)?,
        leaf: assets.renderable("Leaf", OBJECT_MATERIAL)?,
    };
    let tree_base = place(
        terrain.as_ref(),
        config.player_start - Vec3::new(0.0, 0.0, 20.0),
        0.0,
        true,
    );
    plant_tree(&mut level.scene, parts, &config.tree, tree_base, &mut rng)?;

    // Race track
    let beacon_mesh = assets.renderable("Beacon", OBJECT_MATERIAL)?;
    for (i, placement) in config.beacons.iter().enumerate() {
        let position = place(terrain.as_ref(), placement.position, lift, snap);
        let beacon = level.scene.add_node(
            NodeBuilder::new(format!("Beacon{}", i))
                .with_pose(position, placement.orientation)
                .with_renderable(beacon_mesh)
                .with_flags(NodeFlags {
                    inverted: i == 0,
                    ..NodeFlags::default()
                }),
        );
        level.beacons.push(beacon);
    }

    // Enemies
    let enemy_mesh = assets.renderable("Enemy", OBJECT_MATERIAL)?;
    for (i, &p) in config.enemy_positions.iter().enumerate() {
        let position = place(terrain.as_ref(), p, lift, snap);
        let enemy = level.scene.add_node(
            NodeBuilder::new(format!("Enemy{}", i))
                .with_position(position)
                .with_renderable(enemy_mesh)
                .with_enemy(Enemy::new(Some(player), config.enemy_move_speed)),
        );
        level.enemies.push(enemy);
    }

    // Powerups
    let powerup_mesh = assets.renderable("Powerup", OBJECT_MATERIAL)?;
    let on_beacons = config
        .beacons
        .iter()
        .map(|b| b.position)
        .filter(|_| config.powerups_on_beacons);
    for p in on_beacons.chain(config.powerup_positions.iter().copied()) {
        let position = place(terrain.as_ref(), p, lift, snap);
        let powerup = level.scene.add_node(
            NodeBuilder::new("Powerup")
                .with_position(position)
                .with_renderable(powerup_mesh)
                .with_flags(NodeFlags {
                    inverted: true,
                    ..NodeFlags::default()
                }),
        );
        level.powerups.push(powerup);
    }

    // Asteroids
    let asteroid_mesh = assets.renderable("SimpleObject", OBJECT_MATERIAL)?;
    for i in 0..config.asteroid_count {
        let position = Vec3::new(
            rng.gen_range(-300.0..300.0),
            rng.gen_range(-300.0..300.0),
            rng.gen_range(0.0..600.0),
        );
        let orientation = random_rotation(&mut rng, PI);
        let spin = random_rotation(&mut rng, 0.05 * PI);
        level.scene.add_node(
            NodeBuilder::new(format!("AsteroidInstance{}", i))
                .with_pose(position, orientation)
                .with_renderable(asteroid_mesh)
                .with_spin(spin),
        );
    }

    level.scene.refresh_world_transforms();
    info!(
        "Built course level: {} beacons, {} enemies, {} powerups, {} nodes",
        level.beacons.len(),
        level.enemies.len(),
        level.powerups.len(),
        level.scene.node_count()
    );
    Ok(level)
}

/// Rotation by up to `max_angle` about a random axis in the positive octant.
fn random_rotation<R: Rng>(rng: &mut R, max_angle: f32) -> Quat {
    let angle = max_angle * rng.gen::<f32>();
    let axis = Vec3::new(rng.gen(), rng.gen(), rng.gen()).normalize_or_zero();
    if axis == Vec3::ZERO {
        return Quat::IDENTITY;
    }
    Quat::from_axis_angle(axis, angle).normalize()
}
