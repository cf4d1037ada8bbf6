//! Sound effects
//!
//! Procedurally generated - no external files needed! Effects are rendered to
//! mono sample buffers here and handed to an [`AudioBackend`]. The game runs
//! the same with no backend at all.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use thiserror::Error;

use crate::settings::Settings;
use crate::sim::GameEvent;

/// Output sample rate (mono)
pub const SAMPLE_RATE: u32 = 22_050;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Bomb destroyed a block
    BlockDestroyed,
    /// Plane flew into a tower
    PlaneCrash,
    /// Every block of the level is gone
    LevelClear,
}

impl SoundEffect {
    /// Sound cue for a game event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::BlockDestroyed { .. } => Some(SoundEffect::BlockDestroyed),
            GameEvent::PlaneCrashed { .. } => Some(SoundEffect::PlaneCrash),
            GameEvent::LevelCleared { .. } => Some(SoundEffect::LevelClear),
            _ => None,
        }
    }

    /// Crash and level-clear cues hold the game until they finish; they are
    /// always followed by a restart anyway.
    pub fn is_blocking(self) -> bool {
        !matches!(self, SoundEffect::BlockDestroyed)
    }
}

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no audio output device: {0}")]
    NoDevice(String),
    #[error("playback failed: {0}")]
    Playback(String),
}

/// Something that can play a mono sample buffer
pub trait AudioBackend {
    fn play(&mut self, samples: Vec<f32>, volume: f32, blocking: bool) -> Result<(), AudioError>;
}

/// Audio manager for the game
pub struct AudioManager {
    backend: Option<Box<dyn AudioBackend>>,
    master_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::silent()
    }
}

impl AudioManager {
    /// Open the default output device if the settings ask for sound
    pub fn new(settings: &Settings) -> Self {
        if !settings.sound {
            log::info!("Sound disabled in settings");
            return Self::silent();
        }
        match open_default_backend() {
            Ok(backend) => Self::with_backend(backend, settings.master_volume),
            Err(e) => {
                log::warn!("{} - audio disabled", e);
                Self::silent()
            }
        }
    }

    /// No output at all
    pub fn silent() -> Self {
        Self {
            backend: None,
            master_volume: 0.8,
            muted: false,
        }
    }

    pub fn with_backend(backend: Box<dyn AudioBackend>, master_volume: f32) -> Self {
        Self {
            backend: Some(backend),
            master_volume: master_volume.clamp(0.0, 1.0),
            muted: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.backend.is_some()
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.master_volume }
    }

    /// Play a sound effect. Failures are logged and otherwise ignored.
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        let Some(backend) = self.backend.as_mut() else {
            return;
        };

        if let Err(e) = backend.play(synthesize(effect), vol, effect.is_blocking()) {
            log::debug!("{:?}: {}", effect, e);
        }
    }

    /// Play the cue for an event, if any
    pub fn on_event(&mut self, event: &GameEvent) {
        if let Some(effect) = SoundEffect::for_event(event) {
            self.play(effect);
        }
    }
}

#[cfg(feature = "sound")]
fn open_default_backend() -> Result<Box<dyn AudioBackend>, AudioError> {
    Ok(Box::new(device::DeviceBackend::open()?))
}

#[cfg(not(feature = "sound"))]
fn open_default_backend() -> Result<Box<dyn AudioBackend>, AudioError> {
    Err(AudioError::NoDevice("built without the `sound` feature".into()))
}

/// Output through the system audio device
#[cfg(feature = "sound")]
pub mod device {
    use rodio::buffer::SamplesBuffer;
    use rodio::{OutputStream, OutputStreamHandle, Sink};

    use super::{AudioBackend, AudioError, SAMPLE_RATE};

    pub struct DeviceBackend {
        _stream: OutputStream,
        handle: OutputStreamHandle,
    }

    impl DeviceBackend {
        pub fn open() -> Result<Self, AudioError> {
            let (stream, handle) =
                OutputStream::try_default().map_err(|e| AudioError::NoDevice(e.to_string()))?;
            log::info!("Audio output opened");
            Ok(Self {
                _stream: stream,
                handle,
            })
        }
    }

    impl AudioBackend for DeviceBackend {
        fn play(
            &mut self,
            samples: Vec<f32>,
            volume: f32,
            blocking: bool,
        ) -> Result<(), AudioError> {
            let sink =
                Sink::try_new(&self.handle).map_err(|e| AudioError::Playback(e.to_string()))?;
            sink.set_volume(volume);
            sink.append(SamplesBuffer::new(1, SAMPLE_RATE, samples));
            if blocking {
                sink.sleep_until_end();
            } else {
                sink.detach();
            }
            Ok(())
        }
    }
}

// === Sound generators ===

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Noise,
}

/// One oscillator with an exponential pitch sweep and decay
#[derive(Debug, Clone, Copy)]
struct Voice {
    wave: Waveform,
    freq_start: f32,
    freq_end: f32,
    gain: f32,
    /// Seconds from the start of the effect
    delay: f32,
    duration: f32,
}

impl Voice {
    const fn new(wave: Waveform, freq_start: f32, freq_end: f32, gain: f32, duration: f32) -> Self {
        Self {
            wave,
            freq_start,
            freq_end,
            gain,
            delay: 0.0,
            duration,
        }
    }

    const fn at(mut self, delay: f32) -> Self {
        self.delay = delay;
        self
    }

    fn end(&self) -> f32 {
        self.delay + self.duration
    }

    /// Mix this voice into `out`
    fn render_into(&self, out: &mut [f32], rng: &mut Pcg32) {
        let sr = SAMPLE_RATE as f32;
        let start = (self.delay * sr) as usize;
        let len = (self.duration * sr) as usize;
        let mut phase = 0.0f32;

        for (i, sample) in out.iter_mut().skip(start).take(len).enumerate() {
            let t = i as f32 / len as f32;
            let freq = self.freq_start * (self.freq_end / self.freq_start).powf(t);
            // Exponential decay to 1% like a gain ramp
            let env = self.gain * 0.01f32.powf(t);

            let value = match self.wave {
                Waveform::Sine => (phase * std::f32::consts::TAU).sin(),
                Waveform::Square => {
                    if phase < 0.5 {
                        1.0
                    } else {
                        -1.0
                    }
                }
                Waveform::Sawtooth => 2.0 * phase - 1.0,
                Waveform::Noise => rng.random_range(-1.0..=1.0),
            };
            *sample += value * env;

            phase = (phase + freq / sr).fract();
        }
    }
}

fn voices(effect: SoundEffect) -> Vec<Voice> {
    use Waveform::*;
    match effect {
        // Crackling zap with a bass thump
        SoundEffect::BlockDestroyed => vec![
            Voice::new(Sawtooth, 900.0, 80.0, 0.35, 0.18),
            Voice::new(Noise, 1.0, 1.0, 0.15, 0.1),
            Voice::new(Sine, 90.0, 50.0, 0.3, 0.12),
        ],
        // Long falling roar
        SoundEffect::PlaneCrash => vec![
            Voice::new(Noise, 1.0, 1.0, 0.5, 0.9),
            Voice::new(Sawtooth, 240.0, 35.0, 0.35, 0.9),
            Voice::new(Sine, 60.0, 30.0, 0.5, 0.45),
        ],
        // Rising arpeggio, last note held
        SoundEffect::LevelClear => vec![
            Voice::new(Square, 523.25, 523.25, 0.2, 0.14),
            Voice::new(Square, 659.25, 659.25, 0.2, 0.14).at(0.12),
            Voice::new(Square, 783.99, 783.99, 0.2, 0.14).at(0.24),
            Voice::new(Square, 1046.5, 1046.5, 0.22, 0.5).at(0.36),
            Voice::new(Sine, 523.25, 523.25, 0.15, 0.5).at(0.36),
        ],
    }
}

/// Render an effect to mono samples in `[-1, 1]`
pub fn synthesize(effect: SoundEffect) -> Vec<f32> {
    let voices = voices(effect);
    let total = voices.iter().map(Voice::end).fold(0.0f32, f32::max);
    let mut out = vec![0.0f32; (total * SAMPLE_RATE as f32).ceil() as usize];

    // Fixed seed: the same effect always sounds the same
    let mut rng = Pcg32::seed_from_u64(effect as u64);
    for voice in &voices {
        voice.render_into(&mut out, &mut rng);
    }
    for sample in &mut out {
        *sample = sample.clamp(-1.0, 1.0);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records what it was asked to play
    #[derive(Default, Clone)]
    struct Recorder {
        played: Rc<RefCell<Vec<(usize, f32, bool)>>>,
        fail: bool,
    }

    impl AudioBackend for Recorder {
        fn play(
            &mut self,
            samples: Vec<f32>,
            volume: f32,
            blocking: bool,
        ) -> Result<(), AudioError> {
            if self.fail {
                return Err(AudioError::Playback("device unplugged".into()));
            }
            self.played.borrow_mut().push((samples.len(), volume, blocking));
            Ok(())
        }
    }

    #[test]
    fn test_synthesized_effects_are_bounded_and_audible() {
        for effect in [
            SoundEffect::BlockDestroyed,
            SoundEffect::PlaneCrash,
            SoundEffect::LevelClear,
        ] {
            let samples = synthesize(effect);
            assert!(!samples.is_empty());
            assert!(samples.iter().all(|s| (-1.0..=1.0).contains(s)));
            assert!(samples.iter().any(|s| s.abs() > 0.05), "{:?} is silent", effect);
        }
    }

    #[test]
    fn test_effect_lengths() {
        let seconds = |effect| synthesize(effect).len() as f32 / SAMPLE_RATE as f32;
        assert!((seconds(SoundEffect::BlockDestroyed) - 0.18).abs() < 0.001);
        assert!((seconds(SoundEffect::LevelClear) - 0.86).abs() < 0.001);
    }

    #[test]
    fn test_synthesis_is_deterministic() {
        assert_eq!(synthesize(SoundEffect::PlaneCrash), synthesize(SoundEffect::PlaneCrash));
    }

    #[test]
    fn test_event_mapping_and_blocking() {
        let crash = GameEvent::PlaneCrashed { at: Vec2::ZERO };
        assert_eq!(SoundEffect::for_event(&crash), Some(SoundEffect::PlaneCrash));
        assert_eq!(SoundEffect::for_event(&GameEvent::BombLanded), None);
        assert!(!SoundEffect::BlockDestroyed.is_blocking());
        assert!(SoundEffect::PlaneCrash.is_blocking());
        assert!(SoundEffect::LevelClear.is_blocking());
    }

    #[test]
    fn test_manager_passes_volume_and_blocking() {
        let recorder = Recorder::default();
        let played = recorder.played.clone();
        let mut audio = AudioManager::with_backend(Box::new(recorder), 0.5);

        audio.on_event(&GameEvent::BlockDestroyed {
            at: Vec2::ZERO,
            block: crate::sim::BlockRef { tower: 0, block: 0 },
            score: 10,
        });
        audio.on_event(&GameEvent::BombLanded);
        audio.on_event(&GameEvent::LevelCleared { score: 10 });

        let played = played.borrow();
        assert_eq!(played.len(), 2);
        assert_eq!((played[0].1, played[0].2), (0.5, false));
        assert_eq!((played[1].1, played[1].2), (0.5, true));
    }

    #[test]
    fn test_muted_manager_plays_nothing() {
        let recorder = Recorder::default();
        let played = recorder.played.clone();
        let mut audio = AudioManager::with_backend(Box::new(recorder), 0.5);
        audio.set_muted(true);
        audio.play(SoundEffect::PlaneCrash);
        audio.set_muted(false);
        audio.set_master_volume(0.0);
        audio.play(SoundEffect::PlaneCrash);
        assert!(played.borrow().is_empty());
    }

    #[test]
    fn test_failing_backend_is_harmless() {
        let recorder = Recorder {
            fail: true,
            ..Default::default()
        };
        let mut audio = AudioManager::with_backend(Box::new(recorder), 1.0);
        audio.play(SoundEffect::PlaneCrash);
        assert!(audio.is_enabled());
    }

    #[test]
    fn test_sound_disabled_in_settings() {
        let settings = Settings {
            sound: false,
            ..Default::default()
        };
        let mut audio = AudioManager::new(&settings);
        assert!(!audio.is_enabled());
        audio.play(SoundEffect::LevelClear);
    }
}
