//! Game tunables and player preferences
//!
//! Persisted as `settings.json` in the per-user config directory. Every
//! field has a default so partial or older files still load.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::audio::Channel;
use crate::persistence;
use crate::sim::grid::GridSize;
use crate::sim::powerup::PowerUpKind;

/// Simulation tunables, fixed for the lifetime of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Grid ===
    pub grid_cols: i32,
    pub grid_rows: i32,

    // === Timing ===
    /// Render/update loop rate (frames per second)
    pub frame_rate: u32,
    /// Snake moves per second at the start of a round
    pub base_game_speed: u32,

    // === Obstacles ===
    pub obstacle_count: usize,
    /// Extra points per food item in obstacle mode
    pub obstacle_bonus: u64,

    // === Particles ===
    pub particle_count: usize,
    /// Maximum particle speed in cells per frame
    pub particle_speed: f32,
    /// Particle lifetime in frames
    pub particle_lifetime: u32,

    // === Scoring ===
    /// Entries kept per mode on the leaderboard
    pub max_scores: usize,
    /// Longest name accepted on the game over screen
    pub max_name_len: usize,

    // === Power-ups ===
    pub powerup_kinds: Vec<PowerUpKind>,
    /// Frames between spawn attempts
    pub powerup_spawn_interval: u32,
    /// Frames an effect lasts, and frames an uncollected power-up stays
    pub powerup_duration: u32,
    /// Maximum uncollected power-ups on the board
    pub powerup_count: usize,
    /// Speed added by a speed boost
    pub speed_boost_amount: u32,
    /// Points for collecting a power-up (scaled by the multiplier)
    pub powerup_bonus: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_cols: 30,
            grid_rows: 20,

            frame_rate: 60,
            base_game_speed: 10,

            obstacle_count: 20,
            obstacle_bonus: 2,

            particle_count: 12,
            particle_speed: 0.15,
            particle_lifetime: 30,

            max_scores: 5,
            max_name_len: 15,

            powerup_kinds: vec![
                PowerUpKind::SpeedBoost,
                PowerUpKind::Invincibility,
                PowerUpKind::ScoreMultiplier,
            ],
            powerup_spawn_interval: 500,
            powerup_duration: 300,
            powerup_count: 3,
            speed_boost_amount: 5,
            powerup_bonus: 5,
        }
    }
}

impl GameConfig {
    pub fn grid(&self) -> GridSize {
        GridSize::new(self.grid_cols, self.grid_rows)
    }

    /// Clamp values that would break the simulation.
    ///
    /// The starting snake occupies columns 3..=5 of row 5, so the grid must
    /// be large enough to hold it with room to move.
    pub fn sanitized(mut self) -> Self {
        self.grid_cols = self.grid_cols.max(8);
        self.grid_rows = self.grid_rows.max(6);
        self.frame_rate = self.frame_rate.max(1);
        self.base_game_speed = self.base_game_speed.clamp(1, self.frame_rate);
        self.particle_speed = self.particle_speed.max(0.0);
        self.max_scores = self.max_scores.max(1);
        self.powerup_spawn_interval = self.powerup_spawn_interval.max(1);
        if self.powerup_kinds.is_empty() {
            log::warn!("No power-up kinds configured, power-ups disabled");
            self.powerup_count = 0;
        }
        self
    }
}

/// Audio preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Per-category volumes (0.0 - 1.0)
    pub movement_volume: f32,
    pub pickup_volume: f32,
    pub effect_volume: f32,
    pub ui_volume: f32,
    /// Background track volume (0.0 - 1.0)
    pub music_volume: f32,
    pub muted: bool,
    /// Background track; relative paths resolve against the working directory
    pub music_path: Option<PathBuf>,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            movement_volume: 0.3,
            pickup_volume: 0.8,
            effect_volume: 0.9,
            ui_volume: 1.0,
            music_volume: 0.5,
            muted: false,
            music_path: Some(PathBuf::from("resources/audio/background.ogg")),
        }
    }
}

impl AudioSettings {
    pub fn category_volume(&self, category: Channel) -> f32 {
        match category {
            Channel::Movement => self.movement_volume,
            Channel::Pickup => self.pickup_volume,
            Channel::Effect => self.effect_volume,
            Channel::Ui => self.ui_volume,
        }
    }
}

/// Top-level settings file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub game: GameConfig,
    pub audio: AudioSettings,
    /// Obstacle mode on the menu at startup
    pub obstacles_enabled: bool,
    /// Fixed RNG seed; a fresh one is drawn per run when unset
    pub seed: Option<u64>,
    /// Rounds the headless autopilot plays before quitting
    pub autopilot_rounds: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            audio: AudioSettings::default(),
            obstacles_enabled: false,
            seed: None,
            autopilot_rounds: 3,
        }
    }
}

impl Settings {
    /// Load settings from a specific file, falling back to defaults.
    ///
    /// A missing file is created with the defaults so there is something to
    /// edit; an unreadable one is left alone.
    pub fn load_from(path: &Path) -> Self {
        match persistence::load_json::<Settings>(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) if e.is_not_found() => {
                log::info!("No settings at {}, writing defaults", path.display());
                let settings = Self::default();
                if let Err(e) = settings.save_to(path) {
                    log::warn!("Could not write default settings: {e}");
                }
                settings
            }
            Err(e) => {
                log::warn!("Ignoring unreadable settings {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Load settings from the per-user config directory
    pub fn load() -> Self {
        match persistence::settings_path() {
            Some(path) => Self::load_from(&path),
            None => {
                log::warn!("No config directory available, using default settings");
                Self::default()
            }
        }
    }

    /// Save settings to a specific file
    pub fn save_to(&self, path: &Path) -> Result<(), persistence::PersistenceError> {
        persistence::save_json(path, self)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_classic_tuning() {
        let config = GameConfig::default();
        assert_eq!(config.grid(), GridSize::new(30, 20));
        assert_eq!(config.frame_rate, 60);
        assert_eq!(config.base_game_speed, 10);
        assert_eq!(config.powerup_count, 3);
        assert_eq!(config.max_scores, 5);
        assert_eq!(config.powerup_kinds.len(), 3);
    }

    #[test]
    fn test_sanitized_clamps() {
        let config = GameConfig {
            grid_cols: 2,
            grid_rows: 1,
            frame_rate: 0,
            base_game_speed: 500,
            powerup_kinds: Vec::new(),
            ..Default::default()
        }
        .sanitized();
        assert_eq!(config.grid_cols, 8);
        assert_eq!(config.grid_rows, 6);
        assert_eq!(config.frame_rate, 1);
        assert_eq!(config.base_game_speed, 1);
        assert_eq!(config.powerup_count, 0);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"obstacles_enabled": true, "game": {"grid_cols": 40}}"#).unwrap();

        let settings = Settings::load_from(&path);
        assert!(settings.obstacles_enabled);
        assert_eq!(settings.game.grid_cols, 40);
        assert_eq!(settings.game.grid_rows, 20);
        assert_eq!(settings.audio, AudioSettings::default());
    }

    #[test]
    fn test_corrupt_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "not json").unwrap();
        assert_eq!(Settings::load_from(&path), Settings::default());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "not json");
    }

    #[test]
    fn test_first_run_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config").join("settings.json");
        assert_eq!(Settings::load_from(&path), Settings::default());
        assert!(path.is_file());

        let written: Settings = persistence::load_json(&path).unwrap();
        assert_eq!(written, Settings::default());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let settings = Settings {
            seed: Some(42),
            ..Default::default()
        };
        settings.save_to(&path).unwrap();
        assert_eq!(Settings::load_from(&path), settings);
    }
}
