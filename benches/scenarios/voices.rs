//! Benchmarks for the voice pool.
//!
//! All voices read the same asset at different pitches, as when a chord is
//! held on the keyboard.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use hisampler::{synth::pool::VoicePool, EnvelopeParameters, SamplerConfig};

use super::tone_asset;
use crate::{BLOCK_SIZES, SAMPLE_RATE};

const CHORD: [u8; 8] = [48, 52, 55, 60, 64, 67, 72, 76];

pub fn bench_voices(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voices");
    let config = SamplerConfig::default();
    let asset = tone_asset(&config);
    let params = EnvelopeParameters::new(0.01, 0.1, 0.8, 0.3);

    for &size in BLOCK_SIZES {
        let mut left = vec![0.0f32; size];
        let mut right = vec![0.0f32; size];

        for voices in [1usize, 3, 8] {
            let mut pool = VoicePool::new(voices, SAMPLE_RATE);
            for &note in CHORD.iter().take(voices) {
                pool.note_on(note, 100, &asset);
            }

            let id = format!("pool_{voices}");
            group.bench_with_input(BenchmarkId::new(id, size), &size, |b, _| {
                b.iter(|| {
                    // Restart voices that ran off the end of the sample
                    if pool.active_count() < voices {
                        for &note in CHORD.iter().take(voices) {
                            pool.note_on(note, 100, &asset);
                        }
                    }
                    left.fill(0.0);
                    right.fill(0.0);
                    let mut out = [&mut left[..], &mut right[..]];
                    pool.render(black_box(&mut out), 0, size, &params, &asset);
                })
            });
        }
    }

    group.finish();
}
