//! Procedural sound synthesis
//!
//! Every effect is built once at startup from sine tones, frequency sweeps
//! and filtered noise, shaped by an ADSR envelope and stored as 16-bit mono
//! PCM. No audio files are needed.

use std::sync::Arc;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use thiserror::Error;

use super::SoundEffect;

/// Output sample rate in Hz
pub const SAMPLE_RATE: u32 = 44_100;

/// Normalised peak, kept below full scale to avoid clipping
const PEAK_LEVEL: f32 = 0.8;

/// Noise is seeded so the bank is identical on every run
const NOISE_SEED: u64 = 0x5EED_50DA;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SynthError {
    #[error(
        "envelope leaves no room for sustain (attack {attack} + decay {decay} + release {release} must be < 1)"
    )]
    InvalidEnvelope { attack: f32, decay: f32, release: f32 },
}

/// Attack-Decay-Sustain-Release envelope.
///
/// Attack, decay and release are fractions of the whole buffer, so one
/// envelope fits any duration. Sustain is an amplitude level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Adsr {
    attack: f32,
    decay: f32,
    sustain: f32,
    release: f32,
}

impl Adsr {
    pub fn new(attack: f32, decay: f32, sustain: f32, release: f32) -> Result<Self, SynthError> {
        let phases_valid = attack >= 0.0 && decay >= 0.0 && release >= 0.0;
        if !phases_valid || attack + decay + release >= 1.0 {
            return Err(SynthError::InvalidEnvelope {
                attack,
                decay,
                release,
            });
        }
        Ok(Self {
            attack,
            decay,
            sustain: sustain.clamp(0.0, 1.0),
            release,
        })
    }

    /// Amplitude at sample `i` of a buffer `len` samples long
    pub fn amplitude(&self, i: usize, len: usize) -> f32 {
        let n = len as f32;
        let attack_end = (self.attack * n) as usize;
        let decay_end = attack_end + (self.decay * n) as usize;
        let release_start = len - ((self.release * n) as usize).min(len);

        if i < attack_end {
            i as f32 / attack_end as f32
        } else if i < decay_end {
            let progress = (i - attack_end) as f32 / (decay_end - attack_end) as f32;
            1.0 - progress * (1.0 - self.sustain)
        } else if i < release_start {
            self.sustain
        } else {
            let release_len = (len - release_start).max(1) as f32;
            self.sustain * (1.0 - (i - release_start) as f32 / release_len)
        }
    }

    pub fn apply(&self, samples: &mut [f32]) {
        let len = samples.len();
        for (i, sample) in samples.iter_mut().enumerate() {
            *sample *= self.amplitude(i, len);
        }
    }
}

/// Sample count for a duration, rounded to the nearest sample
pub fn sample_count(duration: f32, sample_rate: u32) -> usize {
    (duration * sample_rate as f32).round() as usize
}

/// Sine tone at a fixed frequency
pub fn sine(freq: f32, len: usize, sample_rate: u32) -> Vec<f32> {
    let step = std::f32::consts::TAU * freq / sample_rate as f32;
    (0..len).map(|i| (step * i as f32).sin()).collect()
}

/// Linear frequency sweep; phase is accumulated so the waveform stays continuous
pub fn sweep(start_freq: f32, end_freq: f32, len: usize, sample_rate: u32) -> Vec<f32> {
    let mut phase = 0.0f32;
    let mut out = Vec::with_capacity(len);
    for i in 0..len {
        let t = i as f32 / len.max(1) as f32;
        let freq = start_freq + (end_freq - start_freq) * t;
        out.push(phase.sin());
        phase = (phase + std::f32::consts::TAU * freq / sample_rate as f32)
            % std::f32::consts::TAU;
    }
    out
}

/// White noise in [-1, 1]
pub fn noise(rng: &mut impl Rng, len: usize) -> Vec<f32> {
    (0..len).map(|_| rng.random_range(-1.0..=1.0)).collect()
}

/// Moving-average lowpass with a window of `sample_rate / cutoff` samples
pub fn lowpass(samples: &[f32], cutoff: f32, sample_rate: u32) -> Vec<f32> {
    let window = ((sample_rate as f32 / cutoff.max(1.0)) as usize).max(1);
    let mut out = Vec::with_capacity(samples.len());
    let mut sum = 0.0f32;
    for (i, &s) in samples.iter().enumerate() {
        sum += s;
        if i >= window {
            sum -= samples[i - window];
        }
        out.push(sum / (i + 1).min(window) as f32);
    }
    out
}

/// Sum signals scaled by their gains; the result takes the longest length
pub fn mix(signals: &[(&[f32], f32)]) -> Vec<f32> {
    let len = signals.iter().map(|(s, _)| s.len()).max().unwrap_or(0);
    let mut out = vec![0.0f32; len];
    for (samples, gain) in signals {
        for (o, s) in out.iter_mut().zip(samples.iter()) {
            *o += s * gain;
        }
    }
    out
}

/// Scale so the loudest sample sits at `peak`
pub fn normalize(samples: &mut [f32], peak: f32) {
    let max = samples.iter().fold(0.0f32, |m, s| m.max(s.abs()));
    if max > f32::EPSILON {
        let scale = peak / max;
        samples.iter_mut().for_each(|s| *s *= scale);
    }
}

/// Convert [-1, 1] samples to signed 16-bit PCM
pub fn to_pcm_i16(samples: &[f32]) -> Vec<i16> {
    samples
        .iter()
        .map(|s| (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)
        .collect()
}

/// Immutable mono PCM buffer, cheap to clone
#[derive(Debug, Clone, PartialEq)]
pub struct SoundBuffer {
    samples: Arc<[i16]>,
    sample_rate: u32,
}

impl SoundBuffer {
    pub fn from_f32(samples: &[f32], sample_rate: u32) -> Self {
        Self {
            samples: to_pcm_i16(samples).into(),
            sample_rate,
        }
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_secs(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate as f32
    }

    /// Largest absolute sample value
    pub fn peak(&self) -> i32 {
        self.samples
            .iter()
            .map(|&s| i32::from(s).abs())
            .max()
            .unwrap_or(0)
    }
}

/// The four game effects, synthesised once
#[derive(Debug, Clone)]
pub struct SoundBank {
    movement: SoundBuffer,
    food: SoundBuffer,
    powerup: SoundBuffer,
    game_over: SoundBuffer,
}

impl SoundBank {
    pub fn synthesize() -> Result<Self, SynthError> {
        Self::synthesize_at(SAMPLE_RATE)
    }

    pub fn synthesize_at(sample_rate: u32) -> Result<Self, SynthError> {
        let mut rng = Pcg32::seed_from_u64(NOISE_SEED);
        let bank = Self {
            movement: movement_sound(&mut rng, sample_rate)?,
            food: food_sound(sample_rate)?,
            powerup: powerup_sound(sample_rate)?,
            game_over: game_over_sound(&mut rng, sample_rate)?,
        };
        log::info!("Synthesized {} sound effects at {sample_rate} Hz", SoundEffect::ALL.len());
        Ok(bank)
    }

    pub fn get(&self, effect: SoundEffect) -> &SoundBuffer {
        match effect {
            SoundEffect::Movement => &self.movement,
            SoundEffect::Food => &self.food,
            SoundEffect::PowerUp => &self.powerup,
            SoundEffect::GameOver => &self.game_over,
        }
    }

    /// Write every effect as `<name>.wav` into `dir`
    #[cfg(feature = "wav-export")]
    pub fn export_wav(&self, dir: &std::path::Path) -> std::io::Result<()> {
        use hound::{SampleFormat, WavSpec, WavWriter};

        std::fs::create_dir_all(dir)?;
        for effect in SoundEffect::ALL {
            let buffer = self.get(effect);
            let spec = WavSpec {
                channels: 1,
                sample_rate: buffer.sample_rate(),
                bits_per_sample: 16,
                sample_format: SampleFormat::Int,
            };
            let path = dir.join(format!("{}.wav", effect.name()));
            let mut writer = WavWriter::create(&path, spec).map_err(std::io::Error::other)?;
            for &sample in buffer.samples() {
                writer.write_sample(sample).map_err(std::io::Error::other)?;
            }
            writer.finalize().map_err(std::io::Error::other)?;
            log::info!("Wrote {}", path.display());
        }
        Ok(())
    }
}

fn finish(mut samples: Vec<f32>, envelope: Adsr, sample_rate: u32) -> SoundBuffer {
    envelope.apply(&mut samples);
    normalize(&mut samples, PEAK_LEVEL);
    SoundBuffer::from_f32(&samples, sample_rate)
}

/// Short filtered hiss over a low tone
fn movement_sound(rng: &mut Pcg32, sample_rate: u32) -> Result<SoundBuffer, SynthError> {
    let len = sample_count(0.15, sample_rate);
    let hiss = lowpass(&noise(rng, len), 1000.0, sample_rate);
    let tone = sine(200.0, len, sample_rate);
    let samples = mix(&[(&hiss, 0.3), (&tone, 0.2)]);
    Ok(finish(samples, Adsr::new(0.1, 0.2, 0.5, 0.3)?, sample_rate))
}

/// Bright chime with two overtones
fn food_sound(sample_rate: u32) -> Result<SoundBuffer, SynthError> {
    let len = sample_count(0.2, sample_rate);
    let base = sine(440.0, len, sample_rate);
    let octave = sine(880.0, len, sample_rate);
    let fifth = sine(1320.0, len, sample_rate);
    let samples = mix(&[(&base, 1.0), (&octave, 0.5), (&fifth, 0.25)]);
    Ok(finish(samples, Adsr::new(0.05, 0.15, 0.6, 0.3)?, sample_rate))
}

/// Rising sweep with harmonics
fn powerup_sound(sample_rate: u32) -> Result<SoundBuffer, SynthError> {
    let len = sample_count(0.5, sample_rate);
    let base = sweep(220.0, 880.0, len, sample_rate);
    let second = sweep(440.0, 1760.0, len, sample_rate);
    let third = sweep(660.0, 2640.0, len, sample_rate);
    let samples = mix(&[(&base, 1.0), (&second, 0.5), (&third, 0.25)]);
    Ok(finish(samples, Adsr::new(0.1, 0.2, 0.7, 0.3)?, sample_rate))
}

/// Falling sweep with a sub layer and rumble
fn game_over_sound(rng: &mut Pcg32, sample_rate: u32) -> Result<SoundBuffer, SynthError> {
    let len = sample_count(1.0, sample_rate);
    let fall = sweep(440.0, 110.0, len, sample_rate);
    let sub = sweep(220.0, 55.0, len, sample_rate);
    let rumble = lowpass(&noise(rng, len), 300.0, sample_rate);
    let samples = mix(&[(&fall, 0.6), (&sub, 0.3), (&rumble, 0.1)]);
    Ok(finish(samples, Adsr::new(0.05, 0.2, 0.6, 0.5)?, sample_rate))
}
