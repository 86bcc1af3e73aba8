//! Game simulation module
//!
//! All gameplay logic lives here:
//! - Seeded RNG only (one `Pcg32` per round)
//! - Frame-counted timers, snake moves on a speed-derived sub-rate
//! - No rendering, audio or platform dependencies

pub mod grid;
pub mod particles;
pub mod powerup;
pub mod snake;
pub mod state;
pub mod tick;

pub use grid::{Cell, Direction, GridSize, random_free_cell};
pub use particles::{Particle, ParticleSystem};
pub use powerup::{KindProfile, PowerUp, PowerUpKind, PowerUpManager, Shape};
pub use snake::Snake;
pub use state::{GameEvent, GameState, World};
pub use tick::{advance_frame, is_tick_frame, tick, tick_period};
