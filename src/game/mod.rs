//! Game orchestrator: owns the pre-built levels and runs the per-frame
//! pipeline of input, scene update, collision checks and camera follow.

pub mod collision;
pub mod setup;
pub mod tree;

use hecs::Entity;
use log::info;

use crate::asset::Assets;
use crate::config::GameConfig;
use crate::environment::Environment;
use crate::error::SceneError;
use crate::input::{InputState, PlayerController};
use crate::scene::{Camera, SceneGraph};
use crate::time::FrameLimiter;
use collision::{check_collisions, CollisionEvent, CollisionRules};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Running,
    Win,
    Lose,
}

/// One playable scene and the entities the collision pass tracks in it.
pub struct Level {
    pub scene: SceneGraph,
    pub player: Entity,
    /// Course order; the player must pass them one after another
    pub beacons: Vec<Entity>,
    pub enemies: Vec<Entity>,
    pub powerups: Vec<Entity>,
    pub active_beacon_index: usize,
}

impl Level {
    pub fn new(scene: SceneGraph, player: Entity) -> Self {
        Self {
            scene,
            player,
            beacons: Vec::new(),
            enemies: Vec::new(),
            powerups: Vec::new(),
            active_beacon_index: 0,
        }
    }

    /// The beacon the player should head for, if the course is not done.
    pub fn active_beacon(&self) -> Option<Entity> {
        self.beacons.get(self.active_beacon_index).copied()
    }
}

pub struct Game {
    levels: Vec<Level>,
    active: usize,
    config: GameConfig,
    state: GameState,
    controller: PlayerController,
    camera: Camera,
    limiter: FrameLimiter,
}

impl Game {
    /// Registers resources and builds the course level from `config`.
    pub fn new(config: GameConfig) -> Result<Self, SceneError> {
        let mut assets = Assets::new();
        setup::register_resources(&mut assets, &config);
        let level = setup::build_course_level(&assets, &config)?;
        Self::with_levels(config, vec![level])
    }

    /// Wraps already-built levels; the first one becomes active.
    pub fn with_levels(config: GameConfig, levels: Vec<Level>) -> Result<Self, SceneError> {
        let mut game = Self {
            controller: PlayerController::new(config.look_sensitivity),
            limiter: FrameLimiter::new(config.min_frame_dt),
            levels,
            active: 0,
            config,
            state: GameState::Running,
            camera: Camera::default(),
        };
        game.set_active_scene(0)?;
        Ok(game)
    }

    /// Switches to level `index` and attaches the camera to its player.
    pub fn set_active_scene(&mut self, index: usize) -> Result<(), SceneError> {
        let Some(level) = self.levels.get(index) else {
            return Err(SceneError::MissingResource {
                kind: "level",
                name: index.to_string(),
            });
        };
        self.active = index;
        self.camera.attach(level.player);
        self.camera.follow(&level.scene);
        info!("Active level is now {}", index);
        Ok(())
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn active_level(&self) -> &Level {
        &self.levels[self.active]
    }

    pub fn active_level_mut(&mut self) -> &mut Level {
        &mut self.levels[self.active]
    }

    /// Wall-clock driven frame: advances only when the limiter lets it.
    pub fn frame(&mut self, now: f64, input: &InputState) -> Option<Vec<CollisionEvent>> {
        let dt = self.limiter.tick(now)?;
        Some(self.update(dt, input))
    }

    /// Advances the active level by `dt` seconds. Does nothing once the
    /// game is won or lost.
    pub fn update(&mut self, dt: f64, input: &InputState) -> Vec<CollisionEvent> {
        if self.state != GameState::Running {
            return Vec::new();
        }

        let rules = CollisionRules {
            hitboxes: self.config.hitboxes,
            speed_upgrade: self.config.speed_upgrade,
        };
        let level = &mut self.levels[self.active];

        if let Some((agent, transform)) = level.scene.agent_mut(level.player) {
            self.controller.apply(input, agent, transform, dt as f32);
        }
        level.scene.update(dt);

        let events = check_collisions(level, &rules);
        for event in &events {
            match event {
                CollisionEvent::CourseCompleted if self.state == GameState::Running => {
                    info!("Course completed");
                    self.state = GameState::Win;
                    level.scene.set_background(Environment::WIN_COLOR);
                }
                CollisionEvent::PlayerDefeated if self.state == GameState::Running => {
                    info!("Out of lives");
                    self.state = GameState::Lose;
                    level.scene.set_background(Environment::LOSE_COLOR);
                }
                _ => {}
            }
        }

        self.camera.follow(&level.scene);
        events
    }
}
