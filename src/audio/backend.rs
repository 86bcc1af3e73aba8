//! Audio output backends
//!
//! A backend turns PCM buffers into sound on a channel and controls the
//! streamed background track.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use super::{AudioError, Channel, SoundBuffer};

pub trait AudioBackend {
    /// Start `buffer` on `channel`, replacing whatever it was playing
    fn play(&mut self, channel: Channel, buffer: &SoundBuffer, volume: f32);

    /// True while `channel` is still playing
    fn is_busy(&self, channel: Channel) -> bool;

    fn load_music(&mut self, path: &Path) -> Result<(), AudioError>;

    /// Start the loaded track from the beginning, looping forever
    fn play_music(&mut self);

    fn pause_music(&mut self);

    fn resume_music(&mut self);

    fn set_music_volume(&mut self, volume: f32);
}

/// Backend for headless runs: tracks channel occupancy and music state
/// without producing output
#[derive(Debug, Default)]
pub struct SilentBackend {
    busy_until: [Option<Instant>; Channel::ALL.len()],
    music: Option<PathBuf>,
    music_playing: bool,
    music_volume: f32,
    plays: u64,
}

impl SilentBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sounds started since creation
    pub fn plays(&self) -> u64 {
        self.plays
    }

    pub fn music(&self) -> Option<&Path> {
        self.music.as_deref()
    }

    pub fn is_music_playing(&self) -> bool {
        self.music_playing
    }

    pub fn music_volume(&self) -> f32 {
        self.music_volume
    }
}

impl AudioBackend for SilentBackend {
    fn play(&mut self, channel: Channel, buffer: &SoundBuffer, volume: f32) {
        let length = Duration::from_secs_f32(buffer.duration_secs());
        self.busy_until[channel.index()] = Some(Instant::now() + length);
        self.plays += 1;
        log::trace!("{channel:?}: {} samples at volume {volume:.2}", buffer.len());
    }

    fn is_busy(&self, channel: Channel) -> bool {
        self.busy_until[channel.index()].is_some_and(|until| Instant::now() < until)
    }

    fn load_music(&mut self, path: &Path) -> Result<(), AudioError> {
        if !path.is_file() {
            return Err(AudioError::MissingAsset(path.to_path_buf()));
        }
        self.music = Some(path.to_path_buf());
        self.music_playing = false;
        Ok(())
    }

    fn play_music(&mut self) {
        self.music_playing = self.music.is_some();
    }

    fn pause_music(&mut self) {
        self.music_playing = false;
    }

    fn resume_music(&mut self) {
        self.music_playing = self.music.is_some();
    }

    fn set_music_volume(&mut self, volume: f32) {
        self.music_volume = volume;
    }
}
