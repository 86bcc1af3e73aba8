//! Audio system
//!
//! Procedurally generated sound effects - no external files needed!
//! The synthesized bank is played through an [`AudioBackend`] by the
//! [`SoundManager`], which owns channels, volumes and music control.

pub mod backend;
pub mod manager;
pub mod synth;

use std::path::PathBuf;

use thiserror::Error;

pub use backend::{AudioBackend, SilentBackend};
pub use manager::SoundManager;
pub use synth::{Adsr, SoundBank, SoundBuffer, SynthError};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Snake moved one cell
    Movement,
    /// Food eaten
    Food,
    /// Power-up collected
    PowerUp,
    /// Snake died
    GameOver,
}

impl SoundEffect {
    pub const ALL: [SoundEffect; 4] = [
        SoundEffect::Movement,
        SoundEffect::Food,
        SoundEffect::PowerUp,
        SoundEffect::GameOver,
    ];

    /// Channel the effect plays on by default; also its volume category
    pub fn channel(self) -> Channel {
        match self {
            SoundEffect::Movement => Channel::Movement,
            SoundEffect::Food => Channel::Pickup,
            SoundEffect::PowerUp => Channel::Effect,
            SoundEffect::GameOver => Channel::Ui,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SoundEffect::Movement => "movement",
            SoundEffect::Food => "food",
            SoundEffect::PowerUp => "powerup",
            SoundEffect::GameOver => "game_over",
        }
    }
}

/// Logical playback channel. A channel plays one sound at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Movement,
    Pickup,
    Effect,
    Ui,
}

impl Channel {
    pub const ALL: [Channel; 4] = [
        Channel::Movement,
        Channel::Pickup,
        Channel::Effect,
        Channel::Ui,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Where a sound should be played
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelRequest {
    Specific(Channel),
    /// First idle channel, or the effect's own channel if all are busy
    AnyFree,
}

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("audio asset not found: {}", .0.display())]
    MissingAsset(PathBuf),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_indices_are_dense() {
        for (i, channel) in Channel::ALL.iter().enumerate() {
            assert_eq!(channel.index(), i);
        }
    }

    #[test]
    fn test_effects_use_distinct_channels() {
        let mut seen = std::collections::HashSet::new();
        for effect in SoundEffect::ALL {
            assert!(seen.insert(effect.channel()));
        }
    }
}
