//! Platform abstraction layer
//!
//! Handles the outside world for the game loop:
//! - Input intents and their sources
//! - Frame pacing
//! - A headless autopilot player

pub mod autopilot;
pub mod input;
pub mod time;

pub use autopilot::Autopilot;
pub use input::{InputEvent, InputSource, ScriptedInput};
pub use time::FrameClock;
