#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{sample::KeyRange, synth::params::EnvelopeParameters};

/// Static engine configuration, fixed for the lifetime of a processor.
///
/// Defaults mirror a plain single-sample instrument: three voices, the sample
/// rooted at middle C and mapped across the whole keyboard.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone)]
pub struct SamplerConfig {
    /// Size of the voice pool.
    pub voices: usize,
    /// MIDI note at which loaded samples play at their recorded pitch.
    pub root_note: u8,
    /// Notes the loaded sample responds to.
    pub key_range: KeyRange,
    /// Fade-in applied at the start of the sample data.
    pub attack_fade_secs: f32,
    /// Fade-out applied before the end of the playable length.
    pub release_fade_secs: f32,
    /// Samples longer than this are truncated.
    pub max_sample_secs: f32,
    /// Envelope in effect until the first parameter update.
    pub initial_envelope: EnvelopeParameters,
    /// Capacity of the control and garbage rings.
    pub queue_capacity: usize,
    /// MIDI channel (0-15) accepted from raw MIDI input; `None` is omni.
    pub midi_channel: Option<u8>,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            voices: 3,
            root_note: 60,
            key_range: KeyRange::FULL,
            attack_fade_secs: 0.001,
            release_fade_secs: 0.001,
            max_sample_secs: 10.0,
            initial_envelope: EnvelopeParameters::default(),
            queue_capacity: 64,
            midi_channel: None,
        }
    }
}

impl SamplerConfig {
    pub fn with_voices(mut self, voices: usize) -> Self {
        self.voices = voices.max(1);
        self
    }

    pub fn with_root_note(mut self, root_note: u8) -> Self {
        self.root_note = root_note.min(127);
        self
    }

    pub fn with_envelope(mut self, envelope: EnvelopeParameters) -> Self {
        self.initial_envelope = envelope.clamped();
        self
    }
}
