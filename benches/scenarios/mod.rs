//! Real-world scenario benchmarks.
//!
//! These benchmarks model actual usage: several voices reading one sample
//! and whole processor blocks with note events.

mod processor;
mod voices;

use std::sync::Arc;

use hisampler::{
    sample::{DecodedAudio, SampleAsset},
    SamplerConfig,
};

pub use processor::bench_processor;
pub use voices::bench_voices;

/// Two seconds of a stereo 220 Hz tone at 48kHz.
pub fn tone() -> DecodedAudio {
    let sample_rate = 48_000u32;
    let frames = sample_rate as usize * 2;
    let mut samples = Vec::with_capacity(frames * 2);
    for i in 0..frames {
        let s = (i as f32 * 220.0 * std::f32::consts::TAU / sample_rate as f32).sin() * 0.5;
        samples.push(s);
        samples.push(s);
    }
    DecodedAudio {
        channels: 2,
        sample_rate,
        samples,
    }
}

pub fn tone_asset(config: &SamplerConfig) -> Arc<SampleAsset> {
    Arc::new(SampleAsset::from_decoded("tone", tone(), config).expect("valid tone"))
}
