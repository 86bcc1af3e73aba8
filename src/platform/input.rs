//! Input intents
//!
//! Devices are mapped to a small set of intents before they reach the game,
//! so the state machine never sees raw key codes.

use std::collections::VecDeque;

use crate::renderer::FrameView;
use crate::sim::grid::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Steer the snake
    Direction(Direction),
    /// Start a round from the menu, submit a name on game over
    Confirm,
    /// Leave the current screen
    Back,
    ToggleObstacles,
    ShowHighscores,
    /// Printable character for name entry
    Char(char),
    Backspace,
    /// Exit the program (honoured on the menu only)
    Quit,
}

/// Anything that produces intents once per frame
pub trait InputSource {
    /// Intents for this frame, given what is currently shown
    fn poll(&mut self, view: &FrameView<'_>) -> Vec<InputEvent>;
}

/// Replays a fixed list of per-frame batches, then reports nothing
#[derive(Debug, Default, Clone)]
pub struct ScriptedInput {
    frames: VecDeque<Vec<InputEvent>>,
}

impl ScriptedInput {
    pub fn new(frames: impl IntoIterator<Item = Vec<InputEvent>>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.frames.is_empty()
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self, _view: &FrameView<'_>) -> Vec<InputEvent> {
        self.frames.pop_front().unwrap_or_default()
    }
}
