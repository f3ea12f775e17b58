//! Benchmarks for full processor blocks, including the control drain and
//! event splitting.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use hisampler::{synth::message::NoteEvent, AudioProcessor, SamplerConfig};

use super::tone;
use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_processor(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/processor");

    for &size in BLOCK_SIZES {
        let mut left = vec![0.0f32; size];
        let mut right = vec![0.0f32; size];

        let (mut processor, mut handle) = hisampler::new(SamplerConfig::default(), SAMPLE_RATE);
        handle.load_decoded("tone", tone()).expect("valid tone");

        // Note on at the block start, note off half way through: every
        // block splits once per event.
        let quarter = (size / 4) as u32;
        let events = [
            NoteEvent::note_on(0, 60, 100),
            NoteEvent::note_on(quarter, 64, 100),
            NoteEvent::note_off(quarter * 2, 60),
            NoteEvent::note_on(quarter * 3, 67, 100),
        ];

        group.bench_with_input(BenchmarkId::new("events", size), &size, |b, _| {
            b.iter(|| {
                processor.render(&mut [&mut left[..], &mut right[..]], black_box(&events));
            })
        });

        processor.render(&mut [&mut left[..], &mut right[..]], &[NoteEvent::all_notes_off(0)]);
        let no_events: &[NoteEvent] = &[];
        group.bench_with_input(BenchmarkId::new("idle", size), &size, |b, _| {
            b.iter(|| {
                processor.render(&mut [&mut left[..], &mut right[..]], black_box(no_events));
            })
        });
    }

    group.finish();
}
