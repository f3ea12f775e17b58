//! Loaded sample data shared read-only by every voice.

use std::sync::atomic::{AtomicU64, Ordering};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{config::SamplerConfig, error::LoadError};

pub mod loader;
pub mod waveform;

pub use loader::{load_sample, SampleDecoder, SymphoniaDecoder};
pub use waveform::Peak;

/// Source of unique asset ids, so voices can tell which asset they were
/// started on.
static NEXT_ASSET_ID: AtomicU64 = AtomicU64::new(1);

/// Inclusive range of MIDI notes a sample responds to.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyRange {
    pub low: u8,
    pub high: u8,
}

impl KeyRange {
    pub const FULL: KeyRange = KeyRange { low: 0, high: 127 };

    pub fn new(a: u8, b: u8) -> Self {
        Self {
            low: a.min(b),
            high: a.max(b),
        }
    }

    pub fn contains(&self, note: u8) -> bool {
        (self.low..=self.high).contains(&note)
    }
}

impl Default for KeyRange {
    fn default() -> Self {
        Self::FULL
    }
}

/// Flat PCM handed over by a codec: interleaved samples plus their layout.
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    pub channels: usize,
    pub sample_rate: u32,
    pub samples: Vec<f32>,
}

/// Metadata describing a loaded asset without borrowing its PCM data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleInfo {
    pub id: u64,
    pub channels: usize,
    pub frames: usize,
    pub sample_rate: u32,
    pub root_note: u8,
    pub key_range: KeyRange,
}

impl SampleInfo {
    pub fn duration_secs(&self) -> f64 {
        self.frames as f64 / self.sample_rate as f64
    }
}

/// One loaded sample, immutable after construction.
///
/// The data is interleaved and already truncated to the maximum playable
/// length.
#[derive(Debug)]
pub struct SampleAsset {
    id: u64,
    name: String,
    channels: usize,
    frames: usize,
    sample_rate: u32,
    data: Vec<f32>,
    key_range: KeyRange,
    root_note: u8,
    attack_fade_frames: f64,
    release_fade_frames: f64,
}

impl SampleAsset {
    /// Build an asset from decoded PCM, applying the mapping and fades in
    /// `config`.
    pub fn from_decoded(
        name: impl Into<String>,
        decoded: DecodedAudio,
        config: &SamplerConfig,
    ) -> Result<Self, LoadError> {
        let DecodedAudio {
            channels,
            sample_rate,
            mut samples,
        } = decoded;

        if channels == 0 || samples.len() % channels != 0 {
            return Err(LoadError::InvalidLayout);
        }
        if sample_rate == 0 {
            return Err(LoadError::InvalidSampleRate(sample_rate));
        }

        let max_frames = (config.max_sample_secs.max(0.0) as f64 * sample_rate as f64) as usize;
        let frames = (samples.len() / channels).min(max_frames);
        if frames == 0 {
            return Err(LoadError::EmptySample);
        }

        samples.truncate(frames * channels);
        samples.shrink_to_fit();

        let rate = sample_rate as f64;
        Ok(Self {
            id: NEXT_ASSET_ID.fetch_add(1, Ordering::Relaxed),
            name: name.into(),
            channels,
            frames,
            sample_rate,
            data: samples,
            key_range: config.key_range,
            root_note: config.root_note.min(127),
            attack_fade_frames: config.attack_fade_secs.max(0.0) as f64 * rate,
            release_fade_frames: config.release_fade_secs.max(0.0) as f64 * rate,
        })
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Interleaved PCM data.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn key_range(&self) -> KeyRange {
        self.key_range
    }

    pub fn root_note(&self) -> u8 {
        self.root_note
    }

    pub fn attack_fade_frames(&self) -> f64 {
        self.attack_fade_frames
    }

    pub fn release_fade_frames(&self) -> f64 {
        self.release_fade_frames
    }

    pub fn applies_to(&self, note: u8) -> bool {
        self.key_range.contains(note)
    }

    /// Source frames to advance per output frame when playing `note`.
    ///
    /// `2^((note - root) / 12)`, scaled by the source/output rate ratio.
    pub fn playback_increment(&self, note: u8, output_rate: f32) -> f64 {
        let semitones = note as f64 - self.root_note as f64;
        2.0_f64.powf(semitones / 12.0) * self.sample_rate as f64 / output_rate as f64
    }

    pub fn info(&self) -> SampleInfo {
        SampleInfo {
            id: self.id,
            channels: self.channels,
            frames: self.frames,
            sample_rate: self.sample_rate,
            root_note: self.root_note,
            key_range: self.key_range,
        }
    }
}
