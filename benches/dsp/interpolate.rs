//! Benchmarks for fractional-position sample reads.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use hisampler::dsp::interpolate::read_linear;

use crate::BLOCK_SIZES;

pub fn bench_interpolate(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/interpolate");

    // One second of interleaved stereo noise-ish data
    let frames = 48_000;
    let data: Vec<f32> = (0..frames * 2)
        .map(|i| ((i * 7919) % 2000) as f32 / 1000.0 - 1.0)
        .collect();

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // A4 against a C4 root: non-integer step every frame
        let increment = 2f64.powf(9.0 / 12.0);
        group.bench_with_input(BenchmarkId::new("stereo_pitched", size), &size, |b, _| {
            b.iter(|| {
                let mut position = 0.0f64;
                for out in buffer.iter_mut() {
                    *out = read_linear(black_box(&data), 2, frames, 0, position)
                        + read_linear(black_box(&data), 2, frames, 1, position);
                    position += increment;
                }
            })
        });
    }

    group.finish();
}
