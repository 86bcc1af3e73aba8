//! Power-up entities, spawn policy and timed effects
//!
//! Each kind carries a small profile table (apply/expire hooks plus the
//! visuals the renderer needs) instead of matching on the kind at every
//! call site.

use std::collections::BTreeMap;

use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use super::grid::{Cell, random_free_cell};
use super::particles::ParticleSystem;
use super::state::{GameEvent, World};
use crate::settings::GameConfig;
use crate::{Color, palette};

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PowerUpKind {
    SpeedBoost,
    Invincibility,
    ScoreMultiplier,
}

/// Icon shape drawn for a power-up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Triangle,
    Shield,
    Star,
}

/// Behaviour and visuals of one power-up kind
pub struct KindProfile {
    pub label: &'static str,
    pub color: Color,
    pub shape: Shape,
    /// Third argument is true when the kind is already active
    apply: fn(&mut World, &GameConfig, bool),
    expire: fn(&mut World, &GameConfig),
}

static SPEED_BOOST: KindProfile = KindProfile {
    label: "Speed Boost",
    color: palette::YELLOW,
    shape: Shape::Triangle,
    apply: apply_speed_boost,
    expire: expire_speed_boost,
};

static INVINCIBILITY: KindProfile = KindProfile {
    label: "Invincibility",
    color: palette::CYAN,
    shape: Shape::Shield,
    apply: apply_invincibility,
    expire: expire_invincibility,
};

static SCORE_MULTIPLIER: KindProfile = KindProfile {
    label: "Score Multiplier",
    color: palette::MAGENTA,
    shape: Shape::Star,
    apply: apply_score_multiplier,
    expire: expire_score_multiplier,
};

impl PowerUpKind {
    pub fn profile(self) -> &'static KindProfile {
        match self {
            PowerUpKind::SpeedBoost => &SPEED_BOOST,
            PowerUpKind::Invincibility => &INVINCIBILITY,
            PowerUpKind::ScoreMultiplier => &SCORE_MULTIPLIER,
        }
    }
}

// The boost only lands once; re-collecting refreshes the timer. The
// original game added the boost on every pickup, which left the snake
// permanently faster once the single countdown expired.
fn apply_speed_boost(world: &mut World, config: &GameConfig, already_active: bool) {
    if !already_active {
        world.game_speed += config.speed_boost_amount;
    }
}

fn expire_speed_boost(world: &mut World, config: &GameConfig) {
    world.game_speed = world
        .game_speed
        .saturating_sub(config.speed_boost_amount)
        .max(1);
}

fn apply_invincibility(world: &mut World, _config: &GameConfig, _already_active: bool) {
    world.snake.invincible = true;
}

fn expire_invincibility(world: &mut World, _config: &GameConfig) {
    world.snake.invincible = false;
}

// Stacks on every collection while only one countdown is kept
fn apply_score_multiplier(world: &mut World, _config: &GameConfig, _already_active: bool) {
    world.multiplier += 1;
}

fn expire_score_multiplier(world: &mut World, _config: &GameConfig) {
    world.multiplier = world.multiplier.saturating_sub(1).max(1);
}

/// An uncollected power-up on the board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PowerUp {
    pub cell: Cell,
    pub kind: PowerUpKind,
    /// Frames before it disappears uncollected
    pub remaining: u32,
}

/// Spawns power-ups and tracks the effects they grant
#[derive(Debug, Clone, Default)]
pub struct PowerUpManager {
    board: Vec<PowerUp>,
    active: BTreeMap<PowerUpKind, u32>,
    spawn_timer: u32,
}

impl PowerUpManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uncollected power-ups
    pub fn board(&self) -> &[PowerUp] {
        &self.board
    }

    /// Remaining effect frames per active kind
    pub fn active(&self) -> &BTreeMap<PowerUpKind, u32> {
        &self.active
    }

    pub fn is_active(&self, kind: PowerUpKind) -> bool {
        self.active.contains_key(&kind)
    }

    pub fn spawn_timer(&self) -> u32 {
        self.spawn_timer
    }

    /// Drop every power-up and effect without running expire hooks
    pub fn clear(&mut self) {
        self.board.clear();
        self.active.clear();
        self.spawn_timer = 0;
    }

    /// Place a power-up on a free cell with a random kind.
    ///
    /// No-op when the board already holds `powerup_count` power-ups or no
    /// free cell is left.
    pub fn spawn(&mut self, world: &mut World, config: &GameConfig) -> Option<&PowerUp> {
        if self.board.len() >= config.powerup_count {
            return None;
        }

        let board = &self.board;
        let cell = random_free_cell(&mut world.rng, world.grid, |c| {
            world.snake.contains(c)
                || world.obstacles.contains(&c)
                || board.iter().any(|p| p.cell == c)
        })?;
        let kind = *config.powerup_kinds.choose(&mut world.rng)?;

        self.spawn_at(cell, kind, config)
    }

    /// Place a specific power-up, subject to the board limit
    pub fn spawn_at(&mut self, cell: Cell, kind: PowerUpKind, config: &GameConfig) -> Option<&PowerUp> {
        if self.board.len() >= config.powerup_count {
            return None;
        }
        log::debug!("Spawned power-up {kind:?} at ({}, {})", cell.x, cell.y);
        self.board.push(PowerUp {
            cell,
            kind,
            remaining: config.powerup_duration,
        });
        self.board.last()
    }

    /// Start (or refresh) an effect
    pub fn apply(&mut self, kind: PowerUpKind, world: &mut World, config: &GameConfig) {
        let profile = kind.profile();
        (profile.apply)(world, config, self.is_active(kind));
        self.active.insert(kind, config.powerup_duration);
        log::info!(
            "{} activated (speed {}, multiplier x{})",
            profile.label,
            world.game_speed,
            world.multiplier
        );
    }

    /// End an effect. Returns false if the kind was not active.
    pub fn expire(&mut self, kind: PowerUpKind, world: &mut World, config: &GameConfig) -> bool {
        if self.active.remove(&kind).is_none() {
            return false;
        }
        let profile = kind.profile();
        (profile.expire)(world, config);
        log::info!(
            "{} expired (speed {}, multiplier x{})",
            profile.label,
            world.game_speed,
            world.multiplier
        );
        true
    }

    /// Advance one frame: spawn, count down, expire and collect
    pub fn update(
        &mut self,
        world: &mut World,
        particles: &mut ParticleSystem,
        config: &GameConfig,
        events: &mut Vec<GameEvent>,
    ) {
        // Uncollected power-ups fade away without touching any effect
        self.board.retain_mut(|p| {
            p.remaining = p.remaining.saturating_sub(1);
            if p.remaining == 0 {
                events.push(GameEvent::PowerUpVanished {
                    kind: p.kind,
                    cell: p.cell,
                });
            }
            p.remaining > 0
        });

        self.spawn_timer += 1;
        if self.spawn_timer >= config.powerup_spawn_interval {
            if let Some(p) = self.spawn(world, config) {
                events.push(GameEvent::PowerUpSpawned {
                    kind: p.kind,
                    cell: p.cell,
                });
            }
            self.spawn_timer = 0;
        }

        for remaining in self.active.values_mut() {
            *remaining = remaining.saturating_sub(1);
        }
        let expired: Vec<PowerUpKind> = self
            .active
            .iter()
            .filter(|(_, remaining)| **remaining == 0)
            .map(|(kind, _)| *kind)
            .collect();
        for kind in expired {
            if self.expire(kind, world, config) {
                events.push(GameEvent::EffectExpired { kind });
            }
        }

        let head = world.snake.head();
        while let Some(index) = self.board.iter().position(|p| p.cell == head) {
            let powerup = self.board.remove(index);
            self.apply(powerup.kind, world, config);

            let points = config.powerup_bonus * u64::from(world.multiplier);
            world.score += points;
            particles.emit(
                &mut world.rng,
                powerup.cell.center(),
                config.particle_count,
                powerup.kind.profile().color,
            );
            events.push(GameEvent::PowerUpCollected {
                kind: powerup.kind,
                cell: powerup.cell,
                points,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::grid::Direction;
    use crate::sim::snake::Snake;
    use proptest::prelude::*;

    fn world(config: &GameConfig) -> World {
        World::new(config, false, 11)
    }

    fn run(
        manager: &mut PowerUpManager,
        world: &mut World,
        config: &GameConfig,
        frames: u32,
    ) -> Vec<GameEvent> {
        let mut particles = ParticleSystem::new(config.particle_speed, config.particle_lifetime);
        let mut events = Vec::new();
        for _ in 0..frames {
            manager.update(world, &mut particles, config, &mut events);
        }
        events
    }

    #[test]
    fn test_score_multiplier_stacks_with_single_timer() {
        let config = GameConfig::default();
        let mut world = world(&config);
        let mut manager = PowerUpManager::new();

        manager.apply(PowerUpKind::ScoreMultiplier, &mut world, &config);
        manager.apply(PowerUpKind::ScoreMultiplier, &mut world, &config);

        assert_eq!(world.multiplier, 3);
        assert_eq!(manager.active().len(), 1);
        assert_eq!(
            manager.active().get(&PowerUpKind::ScoreMultiplier),
            Some(&config.powerup_duration)
        );

        // One countdown means one decrement when it runs out
        manager.expire(PowerUpKind::ScoreMultiplier, &mut world, &config);
        assert_eq!(world.multiplier, 2);
    }

    #[test]
    fn test_speed_boost_does_not_stack() {
        let config = GameConfig::default();
        let mut world = world(&config);
        let mut manager = PowerUpManager::new();

        manager.apply(PowerUpKind::SpeedBoost, &mut world, &config);
        manager.apply(PowerUpKind::SpeedBoost, &mut world, &config);
        assert_eq!(world.game_speed, config.base_game_speed + config.speed_boost_amount);

        manager.expire(PowerUpKind::SpeedBoost, &mut world, &config);
        assert_eq!(world.game_speed, config.base_game_speed);
    }

    #[test]
    fn test_effects_expire_after_duration() {
        let config = GameConfig {
            powerup_spawn_interval: u32::MAX,
            ..Default::default()
        };
        let mut world = world(&config);
        let mut manager = PowerUpManager::new();

        manager.apply(PowerUpKind::Invincibility, &mut world, &config);
        manager.apply(PowerUpKind::SpeedBoost, &mut world, &config);
        assert!(world.snake.invincible);

        run(&mut manager, &mut world, &config, config.powerup_duration - 1);
        assert!(world.snake.invincible);
        assert_eq!(manager.active().len(), 2);

        let events = run(&mut manager, &mut world, &config, 1);
        assert!(!world.snake.invincible);
        assert_eq!(world.game_speed, config.base_game_speed);
        assert!(manager.active().is_empty());
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, GameEvent::EffectExpired { .. }))
                .count(),
            2
        );
    }

    #[test]
    fn test_expire_without_entry_is_noop() {
        let config = GameConfig::default();
        let mut world = world(&config);
        let mut manager = PowerUpManager::new();

        assert!(!manager.expire(PowerUpKind::SpeedBoost, &mut world, &config));
        assert_eq!(world.game_speed, config.base_game_speed);
        assert_eq!(world.multiplier, 1);
    }

    #[test]
    fn test_collection_awards_bonus_and_particles() {
        let config = GameConfig::default();
        let mut world = world(&config);
        let mut manager = PowerUpManager::new();
        let mut particles = ParticleSystem::new(config.particle_speed, config.particle_lifetime);
        let mut events = Vec::new();

        let head = world.snake.head();
        manager.spawn_at(head, PowerUpKind::ScoreMultiplier, &config);
        manager.update(&mut world, &mut particles, &config, &mut events);

        assert!(manager.board().is_empty());
        assert_eq!(world.multiplier, 2);
        // Bonus uses the multiplier after the effect applied
        assert_eq!(world.score, 10);
        assert_eq!(particles.live_count(), config.particle_count);
        assert!(events.contains(&GameEvent::PowerUpCollected {
            kind: PowerUpKind::ScoreMultiplier,
            cell: head,
            points: 10,
        }));
    }

    #[test]
    fn test_spawn_avoids_snake_and_obstacles() {
        let config = GameConfig {
            powerup_count: 100,
            ..Default::default()
        };
        let mut world = World::new(&config, true, 5);
        world.snake =
            Snake::from_cells((0..10).map(|x| Cell::new(x, 0)).rev(), Direction::Right).unwrap();
        let mut manager = PowerUpManager::new();

        for _ in 0..50 {
            manager.spawn(&mut world, &config);
        }
        assert_eq!(manager.board().len(), 50);
        for p in manager.board() {
            assert!(!world.snake.contains(p.cell));
            assert!(!world.obstacles.contains(&p.cell));
        }
        let mut cells: Vec<Cell> = manager.board().iter().map(|p| p.cell).collect();
        cells.sort();
        cells.dedup();
        assert_eq!(cells.len(), 50);
    }

    #[test]
    fn test_uncollected_powerups_vanish() {
        let config = GameConfig {
            powerup_spawn_interval: u32::MAX,
            powerup_duration: 10,
            ..Default::default()
        };
        let mut world = world(&config);
        let mut manager = PowerUpManager::new();
        manager.spawn_at(Cell::new(20, 15), PowerUpKind::SpeedBoost, &config);

        let events = run(&mut manager, &mut world, &config, 10);
        assert!(manager.board().is_empty());
        assert_eq!(world.game_speed, config.base_game_speed);
        assert!(matches!(events[0], GameEvent::PowerUpVanished { .. }));
    }

    #[test]
    fn test_spawn_attempt_every_interval() {
        let config = GameConfig {
            powerup_spawn_interval: 5,
            powerup_count: 1,
            ..Default::default()
        };
        let mut world = world(&config);
        let mut manager = PowerUpManager::new();

        run(&mut manager, &mut world, &config, 4);
        assert!(manager.board().is_empty());
        assert_eq!(manager.spawn_timer(), 4);

        let events = run(&mut manager, &mut world, &config, 1);
        assert_eq!(manager.board().len(), 1);
        assert_eq!(manager.spawn_timer(), 0);
        assert!(matches!(events[..], [GameEvent::PowerUpSpawned { .. }]));

        // A full board still resets the timer
        run(&mut manager, &mut world, &config, 4);
        assert_eq!(manager.spawn_timer(), 4);
        let events = run(&mut manager, &mut world, &config, 1);
        assert_eq!(manager.spawn_timer(), 0);
        assert_eq!(manager.board().len(), 1);
        assert!(events.is_empty());
    }

    proptest! {
        #[test]
        fn prop_board_never_exceeds_limit(
            interval in 1u32..20,
            count in 0usize..5,
            duration in 1u32..200,
            frames in 1u32..400,
            seed in any::<u64>(),
        ) {
            let config = GameConfig {
                powerup_spawn_interval: interval,
                powerup_count: count,
                powerup_duration: duration,
                ..Default::default()
            };
            let mut world = World::new(&config, false, seed);
            let mut manager = PowerUpManager::new();
            let mut particles = ParticleSystem::new(config.particle_speed, config.particle_lifetime);
            let mut events = Vec::new();
            for _ in 0..frames {
                manager.update(&mut world, &mut particles, &config, &mut events);
                prop_assert!(manager.board().len() <= count);
            }
        }
    }
}
