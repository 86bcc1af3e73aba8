//! Render contract
//!
//! The game hands a borrowed [`FrameView`] to a [`Renderer`] once per frame.
//! Drawing backends only read the view; they never touch game state.

use std::collections::{BTreeMap, HashSet};

use crate::game::Screen;
use crate::highscores::HighScores;
use crate::sim::grid::{Cell, GridSize};
use crate::sim::particles::Particle;
use crate::sim::powerup::{PowerUp, PowerUpKind};
use crate::sim::snake::Snake;

/// Everything needed to draw one frame
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    pub frame: u64,
    pub frame_rate: u32,
    pub screen: &'a Screen,
    /// Menu toggle; the running round keeps the mode it started with
    pub obstacles_enabled: bool,
    pub grid: GridSize,
    pub snake: &'a Snake,
    pub food: Option<Cell>,
    pub obstacles: &'a HashSet<Cell>,
    pub powerups: &'a [PowerUp],
    /// Remaining frames per active effect
    pub active_effects: &'a BTreeMap<PowerUpKind, u32>,
    pub multiplier: u32,
    pub particles: &'a [Particle],
    pub score: u64,
    pub highscores: &'a HighScores,
}

pub trait Renderer {
    fn draw(&mut self, view: &FrameView<'_>);
}

/// Renderer for headless runs: logs screen changes, plus a play summary
/// once per second at debug level
#[derive(Debug, Default)]
pub struct LogRenderer {
    last_screen: Option<&'static str>,
    frames_drawn: u64,
}

impl LogRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }
}

impl Renderer for LogRenderer {
    fn draw(&mut self, view: &FrameView<'_>) {
        self.frames_drawn += 1;

        let name = view.screen.name();
        if self.last_screen != Some(name) {
            match view.screen {
                Screen::Menu => log::info!(
                    "Menu (obstacles {})",
                    if view.obstacles_enabled { "ON" } else { "OFF" }
                ),
                Screen::Play => log::info!("Round started"),
                Screen::GameOver { pending, .. } => log::info!(
                    "Game over: {} points in {} mode",
                    pending.score,
                    pending.mode.as_str()
                ),
                Screen::Highscores => {
                    for mode in view.highscores.modes() {
                        let entries = view.highscores.entries(mode);
                        let line: Vec<_> = entries
                            .iter()
                            .map(|e| format!("{} {}", e.name, e.score))
                            .collect();
                        log::info!("Highscores {mode}: [{}]", line.join(", "));
                    }
                }
            }
            self.last_screen = Some(name);
        }

        let one_second = u64::from(view.frame_rate.max(1));
        if matches!(view.screen, Screen::Play) && view.frame % one_second == 0 {
            log::debug!(
                "score {} x{} | length {} | head {:?} | power-ups {} | effects {:?} | particles {}",
                view.score,
                view.multiplier,
                view.snake.len(),
                view.snake.head(),
                view.powerups.len(),
                view.active_effects,
                view.particles.len(),
            );
        }
    }
}
