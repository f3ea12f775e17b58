//! Realtime-safe sample playback engine.
//!
//! A single loaded [`SampleAsset`](sample::SampleAsset) is mapped across a MIDI
//! key range and played back by a fixed pool of voices, each shaped by its own
//! ADSR envelope. The render path never allocates, locks, or performs I/O; the
//! control path talks to it through lock-free rings (see [`synth::handle`]).

pub mod config;
pub mod dsp;
pub mod error;
pub mod host;
pub mod io;
pub mod sample; // Loaded PCM data, decoding, waveform queries
pub mod synth; // Voice management and polyphony

pub use config::SamplerConfig;
pub use error::LoadError;
pub use host::{new, AudioProcessor, EditorModel, SamplerProcessor};
pub use synth::{handle::SamplerHandle, params::EnvelopeParameters};

pub const MAX_BLOCK_SIZE: usize = 2048;
pub const MAX_CHANNELS: usize = 8;
