//! Metal Snake - a grid snake arcade game
//!
//! Core modules:
//! - `sim`: Fixed-tick simulation (snake, power-ups, particles, scoring)
//! - `audio`: Procedural sound synthesis and channel management
//! - `game`: Menu/Play/GameOver/Highscores state machine
//! - `highscores`: Per-mode leaderboard persisted as JSON
//! - `settings`: Tunables and audio preferences
//! - `persistence`: Per-user directories and JSON load/save
//! - `platform`: Input intents, frame clock, headless autopilot
//! - `renderer`: Per-frame snapshot consumed by the display layer

pub mod audio;
pub mod game;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use game::{Game, GameMode, Screen};
pub use highscores::HighScores;
pub use settings::{AudioSettings, GameConfig, Settings};

/// Game-wide constants that are not user tunable
pub mod consts {
    /// Application name used for window titles and data directories
    pub const APP_NAME: &str = "MetalSnake";
    /// Qualifier/organization pair for platform directories
    pub const APP_QUALIFIER: &str = "io";
    pub const APP_ORGANIZATION: &str = "metalsnake";

    /// Starting snake body, head first
    pub const SNAKE_START: [(i32, i32); 3] = [(5, 5), (4, 5), (3, 5)];

    /// Name recorded when the player submits an empty name
    pub const DEFAULT_PLAYER_NAME: &str = "Player";

    /// Minimum gap between two movement sounds (milliseconds)
    pub const MOVEMENT_SOUND_INTERVAL_MS: u64 = 150;

    /// File names inside the per-user directories
    pub const HIGHSCORES_FILE: &str = "highscores.json";
    pub const SETTINGS_FILE: &str = "settings.json";
    pub const LOG_FILE: &str = "metal_snake.log";
}

/// An opaque RGB color handed to the render layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Named colors used by the simulation for themed effects
pub mod palette {
    use super::Color;

    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(200, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 200, 0);
    pub const YELLOW: Color = Color::rgb(200, 200, 0);
    pub const CYAN: Color = Color::rgb(0, 200, 200);
    pub const MAGENTA: Color = Color::rgb(200, 0, 200);
    pub const ORANGE: Color = Color::rgb(255, 165, 0);
}
