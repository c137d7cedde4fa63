//! Proximity checks between the player and the tracked course entities.
//!
//! Every check is a plain distance test against the sum of two hitbox
//! radii, run once per frame over every tracked entity. There is no spatial
//! partitioning; the course holds a few dozen entities at most.

use glam::Vec3;
use hecs::Entity;
use log::debug;

use super::Level;
use crate::config::Hitboxes;
use crate::scene::SceneGraph;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionEvent {
    /// The player passed beacon `index`.
    BeaconReached { index: usize },
    /// The last beacon was passed.
    CourseCompleted,
    EnemyHit { enemy: Entity, lives: i32 },
    PowerupCollected { powerup: Entity, lives: i32 },
    /// Lives dropped below one.
    PlayerDefeated,
}

/// Tunables used by the collision pass.
#[derive(Debug, Clone, Copy)]
pub struct CollisionRules {
    pub hitboxes: Hitboxes,
    /// Speed and lives gained per powerup, lost per enemy hit
    pub speed_upgrade: f32,
}

fn within(a: Vec3, b: Vec3, radius: f32) -> bool {
    a.distance(b) < radius
}

/// Runs every check for one frame and returns what happened, in order.
pub fn check_collisions(level: &mut Level, rules: &CollisionRules) -> Vec<CollisionEvent> {
    let mut events = Vec::new();
    let Some(player_pos) = level.scene.world_position(level.player) else {
        return events;
    };

    check_beacons(level, rules, player_pos, &mut events);
    check_enemies(level, rules, player_pos, &mut events);
    check_powerups(level, rules, player_pos, &mut events);
    events
}

fn check_beacons(
    level: &mut Level,
    rules: &CollisionRules,
    player_pos: Vec3,
    events: &mut Vec<CollisionEvent>,
) {
    let index = level.active_beacon_index;
    let Some(&beacon) = level.beacons.get(index) else {
        return;
    };
    let Some(beacon_pos) = level.scene.world_position(beacon) else {
        return;
    };
    if !within(
        player_pos,
        beacon_pos,
        rules.hitboxes.player + rules.hitboxes.beacon,
    ) {
        return;
    }

    debug!("Reached beacon {}", index);
    set_inverted(&mut level.scene, beacon, false);
    level.active_beacon_index += 1;
    events.push(CollisionEvent::BeaconReached { index });

    match level.beacons.get(level.active_beacon_index) {
        Some(&next) => set_inverted(&mut level.scene, next, true),
        None => events.push(CollisionEvent::CourseCompleted),
    }
}

fn check_enemies(
    level: &mut Level,
    rules: &CollisionRules,
    player_pos: Vec3,
    events: &mut Vec<CollisionEvent>,
) {
    let radius = rules.hitboxes.player + rules.hitboxes.enemy;
    let mut defeated = false;

    for &enemy in &level.enemies {
        if !is_active(&level.scene, enemy) {
            continue;
        }
        let Some(enemy_pos) = level.scene.world_position(enemy) else {
            continue;
        };
        if !within(player_pos, enemy_pos, radius) {
            continue;
        }

        if let Some(flags) = level.scene.flags_mut(enemy) {
            flags.active = false;
        }
        let lives = adjust_player(&mut level.scene, level.player, -1, -rules.speed_upgrade);
        debug!("Hit by enemy {:?}, {} lives left", enemy, lives);
        events.push(CollisionEvent::EnemyHit { enemy, lives });
        defeated |= lives < 1;
    }

    if defeated {
        events.push(CollisionEvent::PlayerDefeated);
    }
}

fn check_powerups(
    level: &mut Level,
    rules: &CollisionRules,
    player_pos: Vec3,
    events: &mut Vec<CollisionEvent>,
) {
    let radius = rules.hitboxes.player + rules.hitboxes.powerup;

    for &powerup in &level.powerups {
        if !is_active(&level.scene, powerup) {
            continue;
        }
        let Some(powerup_pos) = level.scene.world_position(powerup) else {
            continue;
        };
        if !within(player_pos, powerup_pos, radius) {
            continue;
        }

        if let Some(flags) = level.scene.flags_mut(powerup) {
            flags.active = false;
            flags.inverted = false;
        }
        let lives = adjust_player(&mut level.scene, level.player, 1, rules.speed_upgrade);
        debug!("Collected powerup {:?}, {} lives", powerup, lives);
        events.push(CollisionEvent::PowerupCollected { powerup, lives });
    }
}

fn is_active(scene: &SceneGraph, entity: Entity) -> bool {
    scene.flags(entity).is_some_and(|f| f.active)
}

fn set_inverted(scene: &mut SceneGraph, entity: Entity, inverted: bool) {
    if let Some(flags) = scene.flags_mut(entity) {
        flags.inverted = inverted;
    }
}

/// Applies a lives and speed change to the player, returning the new lives.
/// Speed never drops below zero.
fn adjust_player(scene: &mut SceneGraph, player: Entity, lives: i32, speed: f32) -> i32 {
    if let Some((agent, _)) = scene.agent_mut(player) {
        agent.speed = (agent.speed + speed).max(0.0);
    }
    match scene.flags_mut(player) {
        Some(flags) => {
            flags.lives += lives;
            flags.lives
        }
        None => 0,
    }
}
