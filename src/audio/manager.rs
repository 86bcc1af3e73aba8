//! Sound playback policy
//!
//! Picks channels, composes volumes, rate-limits the movement sound and
//! controls background music. The backend does the actual output.

use std::path::Path;
use std::time::{Duration, Instant};

use super::{AudioBackend, Channel, ChannelRequest, SoundBank, SoundEffect};
use crate::consts::MOVEMENT_SOUND_INTERVAL_MS;
use crate::settings::AudioSettings;

pub struct SoundManager<B: AudioBackend> {
    backend: B,
    bank: SoundBank,
    settings: AudioSettings,
    last_movement: Option<Instant>,
    music_loaded: bool,
}

impl<B: AudioBackend> SoundManager<B> {
    pub fn new(mut backend: B, bank: SoundBank, settings: AudioSettings) -> Self {
        backend.set_music_volume(music_volume(&settings));
        Self {
            backend,
            bank,
            settings,
            last_movement: None,
            music_loaded: false,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn settings(&self) -> &AudioSettings {
        &self.settings
    }

    /// Play an effect on its own channel
    pub fn play(&mut self, effect: SoundEffect) -> bool {
        self.play_at(
            effect,
            ChannelRequest::Specific(effect.channel()),
            1.0,
            Instant::now(),
        )
    }

    pub fn play_on(&mut self, effect: SoundEffect, request: ChannelRequest) -> bool {
        self.play_at(effect, request, 1.0, Instant::now())
    }

    /// Play with an explicit per-call volume and clock reading.
    ///
    /// Returns false when the sound was suppressed (muted, silent or rate
    /// limited).
    pub fn play_at(
        &mut self,
        effect: SoundEffect,
        request: ChannelRequest,
        volume: f32,
        now: Instant,
    ) -> bool {
        let volume = self.effective_volume(effect, volume);
        if volume <= 0.0 {
            return false;
        }

        if effect == SoundEffect::Movement {
            let interval = Duration::from_millis(MOVEMENT_SOUND_INTERVAL_MS);
            let too_soon = self
                .last_movement
                .is_some_and(|last| now.saturating_duration_since(last) < interval);
            if too_soon {
                return false;
            }
            self.last_movement = Some(now);
        }

        let channel = self.resolve_channel(effect, request);
        self.backend.play(channel, self.bank.get(effect), volume);
        true
    }

    fn resolve_channel(&self, effect: SoundEffect, request: ChannelRequest) -> Channel {
        match request {
            ChannelRequest::Specific(channel) => channel,
            ChannelRequest::AnyFree => Channel::ALL
                .into_iter()
                .find(|&c| !self.backend.is_busy(c))
                .unwrap_or(effect.channel()),
        }
    }

    /// master × category × per-call, clamped; zero when muted
    pub fn effective_volume(&self, effect: SoundEffect, volume: f32) -> f32 {
        if self.settings.muted {
            return 0.0;
        }
        let category = self.settings.category_volume(effect.channel());
        (self.settings.master_volume * category * volume).clamp(0.0, 1.0)
    }

    pub fn set_master_volume(&mut self, volume: f32) {
        self.settings.master_volume = volume.clamp(0.0, 1.0);
        self.backend.set_music_volume(music_volume(&self.settings));
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.settings.muted = muted;
        self.backend.set_music_volume(music_volume(&self.settings));
    }

    pub fn is_muted(&self) -> bool {
        self.settings.muted
    }

    /// Load a background track. A missing file disables music.
    pub fn load_music(&mut self, path: &Path) -> bool {
        match self.backend.load_music(path) {
            Ok(()) => {
                log::info!("Background music loaded from {}", path.display());
                self.music_loaded = true;
            }
            Err(e) => {
                log::warn!("Background music disabled: {e}");
                self.music_loaded = false;
            }
        }
        self.music_loaded
    }

    pub fn has_music(&self) -> bool {
        self.music_loaded
    }

    pub fn start_music(&mut self) {
        if self.music_loaded {
            self.backend.play_music();
            log::info!("Background music playing");
        }
    }

    pub fn pause_music(&mut self) {
        if self.music_loaded {
            self.backend.pause_music();
        }
    }

    pub fn resume_music(&mut self) {
        if self.music_loaded {
            self.backend.resume_music();
        }
    }
}

fn music_volume(settings: &AudioSettings) -> f32 {
    if settings.muted {
        0.0
    } else {
        (settings.master_volume * settings.music_volume).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::audio::{AudioError, SoundBuffer};
    use std::path::PathBuf;

    /// Backend that records every call
    #[derive(Debug, Default)]
    pub(crate) struct RecordingBackend {
        pub played: Vec<(Channel, usize, f32)>,
        pub busy: Vec<Channel>,
        pub music: Option<PathBuf>,
        pub music_playing: bool,
        pub music_volume: f32,
    }

    impl AudioBackend for RecordingBackend {
        fn play(&mut self, channel: Channel, buffer: &SoundBuffer, volume: f32) {
            self.played.push((channel, buffer.len(), volume));
        }

        fn is_busy(&self, channel: Channel) -> bool {
            self.busy.contains(&channel)
        }

        fn load_music(&mut self, path: &Path) -> Result<(), AudioError> {
            if path.extension().is_some_and(|e| e == "ogg") {
                self.music = Some(path.to_path_buf());
                Ok(())
            } else {
                Err(AudioError::MissingAsset(path.to_path_buf()))
            }
        }

        fn play_music(&mut self) {
            self.music_playing = true;
        }

        fn pause_music(&mut self) {
            self.music_playing = false;
        }

        fn resume_music(&mut self) {
            self.music_playing = true;
        }

        fn set_music_volume(&mut self, volume: f32) {
            self.music_volume = volume;
        }
    }

    pub(crate) fn manager() -> SoundManager<RecordingBackend> {
        let bank = SoundBank::synthesize_at(8_000).unwrap();
        SoundManager::new(RecordingBackend::default(), bank, AudioSettings::default())
    }

    #[test]
    fn test_plays_on_category_channel() {
        let mut sound = manager();
        assert!(sound.play(SoundEffect::Food));
        assert!(sound.play(SoundEffect::GameOver));
        let channels: Vec<_> = sound.backend().played.iter().map(|p| p.0).collect();
        assert_eq!(channels, vec![Channel::Pickup, Channel::Ui]);
    }

    #[test]
    fn test_volume_composition() {
        let mut sound = manager();
        let now = Instant::now();
        sound.play_at(
            SoundEffect::Food,
            ChannelRequest::Specific(Channel::Pickup),
            0.5,
            now,
        );
        let (_, _, volume) = sound.backend().played[0];
        // master 0.8 × pickup 0.8 × call 0.5
        assert!((volume - 0.32).abs() < 1e-6);

        sound.set_master_volume(4.0);
        assert_eq!(sound.settings().master_volume, 1.0);
        assert_eq!(sound.effective_volume(SoundEffect::GameOver, 2.0), 1.0);
    }

    #[test]
    fn test_muted_is_silent() {
        let mut sound = manager();
        sound.set_muted(true);
        assert!(!sound.play(SoundEffect::PowerUp));
        assert!(sound.backend().played.is_empty());
        assert_eq!(sound.backend().music_volume, 0.0);
    }

    #[test]
    fn test_movement_rate_limit() {
        let mut sound = manager();
        let start = Instant::now();
        let request = ChannelRequest::Specific(Channel::Movement);

        assert!(sound.play_at(SoundEffect::Movement, request, 1.0, start));
        assert!(!sound.play_at(
            SoundEffect::Movement,
            request,
            1.0,
            start + Duration::from_millis(100)
        ));
        assert!(sound.play_at(
            SoundEffect::Movement,
            request,
            1.0,
            start + Duration::from_millis(150)
        ));
        // Other effects are never limited
        assert!(sound.play_at(SoundEffect::Food, request, 1.0, start));
        assert!(sound.play_at(SoundEffect::Food, request, 1.0, start));
        assert_eq!(sound.backend().played.len(), 4);
    }

    #[test]
    fn test_any_free_channel() {
        let mut sound = manager();
        sound.backend.busy = vec![Channel::Movement, Channel::Pickup];
        sound.play_on(SoundEffect::Food, ChannelRequest::AnyFree);
        assert_eq!(sound.backend().played[0].0, Channel::Effect);

        sound.backend.busy = Channel::ALL.to_vec();
        sound.play_on(SoundEffect::Food, ChannelRequest::AnyFree);
        assert_eq!(sound.backend().played[1].0, Channel::Pickup);
    }

    #[test]
    fn test_music_control() {
        let mut sound = manager();
        assert!(!sound.load_music(Path::new("missing.mp3")));
        sound.start_music();
        assert!(!sound.backend().music_playing);

        assert!(sound.load_music(Path::new("background.ogg")));
        sound.start_music();
        assert!(sound.backend().music_playing);
        sound.pause_music();
        assert!(!sound.backend().music_playing);
        sound.resume_music();
        assert!(sound.backend().music_playing);
    }
}
