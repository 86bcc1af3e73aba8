//! Round state and core simulation types
//!
//! Everything a single round mutates lives here; a new `GameState` is built
//! for every round.

use std::collections::HashSet;

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::grid::{Cell, GridSize, random_free_cell};
use super::particles::ParticleSystem;
use super::powerup::{PowerUpKind, PowerUpManager};
use super::snake::Snake;
use crate::game::GameMode;
use crate::settings::GameConfig;

/// Something that happened during a frame, for audio and logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// The snake advanced one cell
    SnakeMoved,
    FoodEaten { cell: Cell, points: u64 },
    PowerUpSpawned { kind: PowerUpKind, cell: Cell },
    PowerUpCollected { kind: PowerUpKind, cell: Cell, points: u64 },
    /// An uncollected power-up timed out
    PowerUpVanished { kind: PowerUpKind, cell: Cell },
    /// An active effect ran out
    EffectExpired { kind: PowerUpKind },
    SnakeDied { score: u64 },
}

/// The mutable playfield that power-up effects act upon
#[derive(Debug, Clone)]
pub struct World {
    pub grid: GridSize,
    pub snake: Snake,
    /// None only when the snake and obstacles fill the board
    pub food: Option<Cell>,
    pub obstacles: HashSet<Cell>,
    pub obstacles_enabled: bool,
    pub score: u64,
    pub multiplier: u32,
    /// Snake moves per second; raised while a speed boost is active
    pub game_speed: u32,
    pub rng: Pcg32,
}

impl World {
    /// Fresh playfield: starting snake, obstacles (if enabled), then food
    pub fn new(config: &GameConfig, obstacles_enabled: bool, seed: u64) -> Self {
        let mut world = Self {
            grid: config.grid(),
            snake: Snake::default(),
            food: None,
            obstacles: HashSet::new(),
            obstacles_enabled,
            score: 0,
            multiplier: 1,
            game_speed: config.base_game_speed,
            rng: Pcg32::seed_from_u64(seed),
        };

        if obstacles_enabled {
            world.generate_obstacles(config.obstacle_count);
        }
        world.respawn_food();
        world
    }

    /// True if the snake or an obstacle covers the cell
    pub fn is_occupied(&self, cell: Cell) -> bool {
        self.snake.contains(cell) || self.obstacles.contains(&cell)
    }

    fn generate_obstacles(&mut self, count: usize) {
        for _ in 0..count {
            let cell = random_free_cell(&mut self.rng, self.grid, |c| {
                self.snake.contains(c) || self.obstacles.contains(&c)
            });
            match cell {
                Some(cell) => {
                    self.obstacles.insert(cell);
                }
                None => break,
            }
        }
        log::info!("Generated {} obstacles", self.obstacles.len());
    }

    /// Move the food to a random free cell
    pub fn respawn_food(&mut self) {
        self.food = random_free_cell(&mut self.rng, self.grid, |c| {
            self.snake.contains(c) || self.obstacles.contains(&c)
        });
        if self.food.is_none() {
            log::warn!("No free cell left for food");
        }
    }
}

/// Complete state of one round
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the round was created from
    pub seed: u64,
    pub config: GameConfig,
    pub world: World,
    pub powerups: PowerUpManager,
    pub particles: ParticleSystem,
    /// Snake moves performed this round
    pub time_ticks: u64,
    pub alive: bool,
}

impl GameState {
    pub fn new(config: GameConfig, obstacles_enabled: bool, seed: u64) -> Self {
        let world = World::new(&config, obstacles_enabled, seed);
        let particles = ParticleSystem::new(config.particle_speed, config.particle_lifetime);
        log::info!(
            "New round (seed {seed}, obstacles {})",
            if obstacles_enabled { "on" } else { "off" }
        );
        Self {
            seed,
            config,
            world,
            powerups: PowerUpManager::new(),
            particles,
            time_ticks: 0,
            alive: true,
        }
    }

    /// Start a fresh round in place.
    ///
    /// Everything round-scoped is rebuilt; the particle pool is kept.
    pub fn reset(&mut self, obstacles_enabled: bool, seed: u64) {
        self.seed = seed;
        self.world = World::new(&self.config, obstacles_enabled, seed);
        self.powerups.clear();
        self.particles.clear();
        self.time_ticks = 0;
        self.alive = true;
        log::info!(
            "Round reset (seed {seed}, obstacles {})",
            if obstacles_enabled { "on" } else { "off" }
        );
    }

    pub fn mode(&self) -> GameMode {
        GameMode::from_obstacles(self.world.obstacles_enabled)
    }

    pub fn score(&self) -> u64 {
        self.world.score
    }
}
