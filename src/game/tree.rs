//! Procedural tree made of scene nodes: branches hang off their parent
//! branch, leaves off the last level of branches. Every part sways, and
//! because children compose with their parent's pose the sway carries
//! through the whole tree.

use std::f32::consts::{FRAC_PI_3, FRAC_PI_6, TAU};

use glam::{Quat, Vec3};
use hecs::Entity;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::asset::Renderable;
use crate::behaviours::Sway;
use crate::error::SceneError;
use crate::scene::{NodeBuilder, SceneGraph, Transform};

/// Puts the base of a unit-height mesh at the node origin.
const BASE_JOINT: Vec3 = Vec3::new(0.0, 0.5, 0.0);

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeParams {
    pub branches: u32,
    pub iterations: u32,
    pub leaves_per_tip: u32,
    pub min_height: f32,
    pub max_height: f32,
    pub width: f32,
    pub leaf_sway_speed: f32,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            branches: 3,
            iterations: 4,
            leaves_per_tip: 81,
            min_height: 10.0,
            max_height: 20.0,
            width: 0.25,
            leaf_sway_speed: 2.5,
        }
    }
}

impl TreeParams {
    /// Branch and leaf node count, excluding the trunk.
    pub fn node_count(&self) -> usize {
        let mut level_nodes = 1usize;
        let mut branches = 0usize;
        for _ in 0..self.iterations {
            level_nodes *= self.branches as usize;
            branches += level_nodes;
        }
        branches + level_nodes * self.leaves_per_tip as usize
    }
}

/// Renderables for the tree parts.
#[derive(Debug, Clone, Copy)]
pub struct TreeParts {
    pub branch: Renderable,
    pub leaf: Renderable,
}

/// Uniform sample between `a` and `b`. Tolerates `b < a`, which happens for
/// short parent branches.
fn between<R: Rng>(rng: &mut R, a: f32, b: f32) -> f32 {
    a + (b - a) * rng.gen::<f32>()
}

fn random_sign<R: Rng>(rng: &mut R) -> f32 {
    if rng.gen::<bool>() {
        1.0
    } else {
        -1.0
    }
}

fn random_tilt<R: Rng>(rng: &mut R) -> Quat {
    let yaw = Quat::from_rotation_y(between(rng, 0.0, TAU));
    let roll = Quat::from_rotation_z(random_sign(rng) * between(rng, FRAC_PI_6, FRAC_PI_3));
    yaw * roll
}

/// Adds a tree rooted at `base` and returns the trunk.
pub fn plant_tree<R: Rng>(
    scene: &mut SceneGraph,
    parts: TreeParts,
    params: &TreeParams,
    base: Vec3,
    rng: &mut R,
) -> Result<Entity, SceneError> {
    let height = between(rng, params.min_height, params.max_height);
    let mut transform = Transform::from_trs(
        base,
        Quat::IDENTITY,
        Vec3::new(params.width, height, params.width),
    );
    transform.joint = BASE_JOINT;

    let trunk = scene.add_node(
        NodeBuilder::new("Tree")
            .with_transform(transform)
            .with_renderable(parts.branch),
    );

    let added = grow(scene, trunk, parts, params, height, params.width, 0, rng)?;
    log::info!("Planted tree with {} branches and leaves", added);
    Ok(trunk)
}

#[allow(clippy::too_many_arguments)]
fn grow<R: Rng>(
    scene: &mut SceneGraph,
    parent: Entity,
    parts: TreeParts,
    params: &TreeParams,
    parent_height: f32,
    parent_width: f32,
    level: u32,
    rng: &mut R,
) -> Result<usize, SceneError> {
    if level >= params.iterations {
        return grow_leaves(scene, parent, parts, params, parent_height, rng);
    }

    let mut added = 0;
    for _ in 0..params.branches {
        let sway = Sway::new(0.0, between(rng, 1.0, 2.0), between(rng, 0.0004, 0.001));
        let along = between(rng, 0.0, parent_height / 2.0);
        let length = between(rng, 5.0, parent_height - 1.0);
        let width = between(rng, 0.1, parent_width / 2.0);

        let mut transform = Transform::from_trs(
            Vec3::new(0.0, along, 0.0),
            Quat::IDENTITY,
            Vec3::new(width, length, width),
        );
        transform.orbit = random_tilt(rng);
        transform.joint = BASE_JOINT;

        let branch = scene.add_child(
            parent,
            NodeBuilder::new("Branch")
                .with_transform(transform)
                .with_renderable(parts.branch)
                .with_sway(sway),
        )?;
        added += 1 + grow(scene, branch, parts, params, length, width, level + 1, rng)?;
    }
    Ok(added)
}

fn grow_leaves<R: Rng>(
    scene: &mut SceneGraph,
    parent: Entity,
    parts: TreeParts,
    params: &TreeParams,
    parent_length: f32,
    rng: &mut R,
) -> Result<usize, SceneError> {
    for _ in 0..params.leaves_per_tip {
        let sway = Sway::new(
            between(rng, 0.0, TAU),
            params.leaf_sway_speed,
            between(rng, 0.006, 0.015),
        );
        let along = between(rng, 0.0, parent_length / 1.25);
        let length = between(rng, 0.5, 1.0);
        let width = between(rng, 0.05, 0.1);

        let mut transform = Transform::from_trs(
            Vec3::new(0.0, along, 0.0),
            Quat::IDENTITY,
            Vec3::new(width, length, width),
        );
        transform.orbit = random_tilt(rng);
        transform.joint = BASE_JOINT;

        scene.add_child(
            parent,
            NodeBuilder::new("Leaf")
                .with_transform(transform)
                .with_renderable(parts.leaf)
                .with_sway(sway),
        )?;
    }
    Ok(params.leaves_per_tip as usize)
}
