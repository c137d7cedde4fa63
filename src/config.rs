use glam::{Quat, Vec3};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::agent::AgentConfig;
use crate::error::SceneError;
use crate::game::tree::TreeParams;
use crate::terrain::heightmap::TerrainConfig;

/// Collision radii of the tracked entity kinds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hitboxes {
    pub player: f32,
    pub beacon: f32,
    pub enemy: f32,
    pub powerup: f32,
}

impl Default for Hitboxes {
    fn default() -> Self {
        Self {
            player: 0.5,
            beacon: 15.0,
            enemy: 0.5,
            powerup: 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BeaconPlacement {
    pub position: Vec3,
    pub orientation: Quat,
}

/// Scene-wide tunables and level layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub hitboxes: Hitboxes,
    pub beacon_radius: f32,
    /// Lives and speed gained per powerup, lost per enemy hit
    pub speed_upgrade: f32,
    pub player_start: Vec3,
    pub player_lives: i32,
    pub beacons: Vec<BeaconPlacement>,
    pub enemy_positions: Vec<Vec3>,
    pub powerup_positions: Vec<Vec3>,
    /// Also place a powerup at every beacon
    pub powerups_on_beacons: bool,
    /// Drop course entities onto the terrain, keeping only their x/z
    pub snap_to_terrain: bool,
    pub agent: AgentConfig,
    pub enemy_move_speed: f32,
    pub look_sensitivity: f32,
    pub min_frame_dt: f64,
    pub background: Vec3,
    pub terrain: TerrainConfig,
    pub tree: TreeParams,
    pub asteroid_count: usize,
    pub rng_seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            hitboxes: Hitboxes::default(),
            beacon_radius: 20.0,
            speed_upgrade: 0.5,
            player_start: Vec3::new(0.0, 0.0, 800.0),
            player_lives: 3,
            beacons: default_beacons(),
            enemy_positions: vec![
                Vec3::new(108.0, 0.0, 689.0),
                Vec3::new(34.1823, 64.8259, 525.166),
                Vec3::new(13.7887, 117.501, 307.928),
                Vec3::new(151.521, -16.012, 259.632),
                Vec3::new(19.4067, -17.1548, 638.167),
                Vec3::new(73.5702, 85.7602, 379.409),
            ],
            powerup_positions: vec![
                Vec3::new(-39.1208, 77.1831, 524.026),
                Vec3::new(6.96003, 85.8356, 427.861),
                Vec3::new(101.604, 8.05086, 365.088),
            ],
            powerups_on_beacons: true,
            snap_to_terrain: true,
            agent: AgentConfig::default(),
            enemy_move_speed: 2.75,
            look_sensitivity: 0.001,
            min_frame_dt: 0.05,
            background: Vec3::ZERO,
            terrain: TerrainConfig::default(),
            tree: TreeParams::default(),
            asteroid_count: 100,
            rng_seed: 1804289383,
        }
    }
}

fn default_beacons() -> Vec<BeaconPlacement> {
    // (x, y, z) and (w, x, y, z)
    const COURSE: [([f32; 3], [f32; 4]); 14] = [
        ([0.0, 0.0, 731.0], [1.0, 0.0, 0.0, 0.0]),
        ([-36.2169, 26.1707, 665.71], [0.921649, 0.229045, 0.3132, -0.00270161]),
        ([-71.7758, 77.3913, 586.664], [0.964975, 0.227993, 0.10694, -0.0735319]),
        ([-81.4512, 127.351, 466.188], [0.990901, 0.0835413, -0.0349064, -0.0995837]),
        ([-74.1859, 121.125, 271.9], [0.994095, -0.033332, -0.0190866, -0.101492]),
        ([-6.60791, 143.437, 186.731], [0.831337, 0.294662, -0.470931, -0.016675]),
        ([91.6369, 182.934, 226.512], [0.281068, 0.405307, -0.863279, -0.10713]),
        ([127.061, 171.769, 338.286], [0.0346075, 0.398591, -0.910368, -0.10563]),
        ([129.616, 149.748, 421.257], [-0.194923, 0.366005, -0.892426, -0.177824]),
        ([82.3724, 17.3056, 480.708], [-0.320758, 0.455473, -0.590345, -0.584082]),
        ([96.9571, -86.6217, 441.634], [-0.442946, 0.264096, -0.297878, -0.803319]),
        ([92.5081, -146.151, 349.63], [-0.513011, 0.030545, -0.23939, -0.823759]),
        ([30.3872, -143.304, 222.383], [-0.567791, -0.320068, -0.0383407, -0.75743]),
        ([-33.0518, -71.9166, 171.495], [-0.517779, -0.576523, 0.100737, -0.624001]),
    ];

    COURSE
        .iter()
        .map(|&(p, [w, x, y, z])| BeaconPlacement {
            position: Vec3::from_array(p),
            orientation: Quat::from_xyzw(x, y, z, w).normalize(),
        })
        .collect()
}

impl GameConfig {
    /// Reads `path`, falling back to defaults when the file is missing or
    /// malformed. The result is always validated.
    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str::<GameConfig>(&contents) {
                Ok(config) => {
                    info!("Loaded game config from {:?}", path);
                    config.validate()
                }
                Err(err) => {
                    warn!(
                        "Failed to parse {:?} ({}). Falling back to default game config.",
                        path, err
                    );
                    GameConfig::default()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                info!("Game config {:?} not found. Using defaults.", path);
                GameConfig::default()
            }
            Err(err) => {
                warn!(
                    "Failed to read {:?} ({}). Falling back to default game config.",
                    path, err
                );
                GameConfig::default()
            }
        }
    }

    /// Strict variant: any read or parse failure is an error.
    pub fn load_strict<P: AsRef<std::path::Path>>(path: P) -> Result<Self, SceneError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn from_json_str(json: &str) -> Result<Self, SceneError> {
        let config: GameConfig = serde_json::from_str(json)?;
        Ok(config.validate())
    }

    pub fn validate(mut self) -> Self {
        let defaults = AgentConfig::default();
        let agent = &mut self.agent;

        if !(0.0..1.0).contains(&agent.movement_damping) {
            warn!(
                "Movement damping {} outside [0, 1). Using {}.",
                agent.movement_damping, defaults.movement_damping
            );
            agent.movement_damping = defaults.movement_damping;
        }

        if agent.height.is_nan() || agent.height <= 0.0 {
            warn!("Agent height must be positive. Using default value.");
            agent.height = defaults.height;
        }

        if agent.gravity.is_nan() || agent.fall_speed.is_nan() || agent.jump_speed.is_nan() {
            warn!("Agent gravity and speed limits must be numbers. Using defaults.");
            agent.gravity = defaults.gravity;
            agent.fall_speed = defaults.fall_speed;
            agent.jump_speed = defaults.jump_speed;
        }

        let hitbox_defaults = Hitboxes::default();
        let hitboxes = &mut self.hitboxes;
        for (value, fallback, name) in [
            (&mut hitboxes.player, hitbox_defaults.player, "player"),
            (&mut hitboxes.beacon, hitbox_defaults.beacon, "beacon"),
            (&mut hitboxes.enemy, hitbox_defaults.enemy, "enemy"),
            (&mut hitboxes.powerup, hitbox_defaults.powerup, "powerup"),
        ] {
            if value.is_nan() || *value <= 0.0 {
                warn!("{} hitbox must be positive. Using {}.", name, fallback);
                *value = fallback;
            }
        }

        if self.min_frame_dt.is_nan() || self.min_frame_dt < 0.0 {
            warn!("Minimum frame time must not be negative. Using default value.");
            self.min_frame_dt = GameConfig::default().min_frame_dt;
        }

        if self.beacons.is_empty() {
            warn!("No beacons configured; the course cannot be won.");
        }

        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_replaces_invalid_values_with_defaults() {
        let mut config = GameConfig::default();
        config.agent.movement_damping = 1.5;
        config.agent.height = 0.0;
        config.hitboxes.beacon = -1.0;
        config.min_frame_dt = -0.1;

        let validated = config.validate();

        assert_eq!(
            validated.agent.movement_damping,
            AgentConfig::default().movement_damping
        );
        assert_eq!(validated.agent.height, AgentConfig::default().height);
        assert_eq!(validated.hitboxes.beacon, Hitboxes::default().beacon);
        assert_eq!(validated.min_frame_dt, 0.05);
    }

    #[test]
    fn validate_preserves_valid_values() {
        let mut config = GameConfig::default();
        config.agent.movement_damping = 0.0;
        config.hitboxes.player = 1.25;

        let validated = config.validate();

        assert_eq!(validated.agent.movement_damping, 0.0);
        assert_eq!(validated.hitboxes.player, 1.25);
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let config =
            GameConfig::from_json_str(r#"{ "speed_upgrade": 1.0, "hitboxes": { "beacon": 3.0 } }"#)
                .unwrap();
        assert_eq!(config.speed_upgrade, 1.0);
        assert_eq!(config.hitboxes.beacon, 3.0);
        assert_eq!(config.hitboxes.player, 0.5);
        assert_eq!(config.beacons.len(), 14);
    }

    #[test]
    fn malformed_json_is_config_error() {
        let err = GameConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, SceneError::Config(_)));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = GameConfig::load_from_path("definitely/not/here/settings.json");
        assert_eq!(config.rng_seed, 1804289383);
    }

    #[test]
    fn default_course_orientations_are_unit() {
        for beacon in GameConfig::default().beacons {
            assert!(beacon.orientation.is_normalized());
        }
    }
}
