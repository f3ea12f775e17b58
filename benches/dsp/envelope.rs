//! Benchmarks for ADSR envelope generator.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use hisampler::{dsp::EnvelopeGenerator, EnvelopeParameters};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Attack phase (ramping up)
        let params = EnvelopeParameters::new(2.0, 0.1, 0.7, 0.3);
        let mut env = EnvelopeGenerator::new(SAMPLE_RATE);
        env.trigger();
        group.bench_with_input(BenchmarkId::new("attack", size), &size, |b, _| {
            b.iter(|| {
                env.render(black_box(&mut buffer), black_box(&params));
            })
        });

        // Sustain phase (holding steady)
        let params = EnvelopeParameters::new(0.001, 0.001, 0.7, 0.3);
        let mut env = EnvelopeGenerator::new(SAMPLE_RATE);
        env.trigger();
        // Advance past attack/decay
        for _ in 0..200 {
            env.tick(&params);
        }
        group.bench_with_input(BenchmarkId::new("sustain", size), &size, |b, _| {
            b.iter(|| {
                env.render(black_box(&mut buffer), black_box(&params));
            })
        });

        // Release phase (ramping down)
        let params = EnvelopeParameters::new(0.001, 0.001, 0.7, 5.0);
        let mut env = EnvelopeGenerator::new(SAMPLE_RATE);
        env.trigger();
        for _ in 0..200 {
            env.tick(&params);
        }
        env.release();
        group.bench_with_input(BenchmarkId::new("release", size), &size, |b, _| {
            b.iter(|| {
                env.render(black_box(&mut buffer), black_box(&params));
            })
        });
    }

    group.finish();
}
