//! Host-facing adapter.
//!
//! A plugin shell or audio driver sees the engine only through
//! [`AudioProcessor`]: prepare once, render every block, and read an
//! [`EditorModel`] to show the current state. Everything behind it is
//! independent of any particular host.

use std::sync::Arc;

use rtrb::{Consumer, Producer, PushError, RingBuffer};
use tracing::debug;

use crate::{
    config::SamplerConfig,
    io::{converter::midi_to_note_event, midi::MidiEvent},
    sample::{SampleAsset, SampleDecoder, SampleInfo, SymphoniaDecoder},
    synth::{
        handle::SamplerHandle,
        message::{ControlMessage, NoteEvent},
        params::EnvelopeParameters,
        synthesizer::Synthesizer,
    },
    MAX_BLOCK_SIZE, MAX_CHANNELS,
};

/// Largest number of MIDI events handled in a single block.
pub const MAX_EVENTS_PER_BLOCK: usize = 1024;

/// Capability interface a host drives.
pub trait AudioProcessor {
    /// Called before rendering starts and whenever the stream format changes.
    fn prepare(&mut self, sample_rate: f32, max_block_size: usize);

    /// Overwrite `buffer` (one slice per output channel) with the next block.
    /// Channels past [`MAX_CHANNELS`] are left silent.
    fn render(&mut self, buffer: &mut [&mut [f32]], events: &[NoteEvent]);

    /// Snapshot of what an editor should display.
    fn editor_model(&self) -> EditorModel;
}

/// Plain-data description of the engine for an editor or status display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditorModel {
    pub sample_rate: f32,
    pub envelope: EnvelopeParameters,
    pub sample: Option<SampleInfo>,
    pub active_voices: usize,
    pub voice_capacity: usize,
}

/// Create a connected render-side processor and control-side handle.
pub fn new(config: SamplerConfig, sample_rate: f32) -> (SamplerProcessor, SamplerHandle) {
    new_with_decoder(config, sample_rate, Box::new(SymphoniaDecoder))
}

/// Like [`new`], with a caller-supplied codec for file loads.
pub fn new_with_decoder(
    config: SamplerConfig,
    sample_rate: f32,
    decoder: Box<dyn SampleDecoder + Send>,
) -> (SamplerProcessor, SamplerHandle) {
    let capacity = config.queue_capacity.max(1);
    let (control_tx, control_rx) = RingBuffer::<ControlMessage>::new(capacity);
    let (retired_tx, retired_rx) = RingBuffer::<Arc<SampleAsset>>::new(capacity);

    let processor = SamplerProcessor {
        synth: Synthesizer::new(&config, sample_rate),
        rx: control_rx,
        retired: retired_tx,
        midi_channel: config.midi_channel,
        max_block_size: MAX_BLOCK_SIZE,
        midi_events: Vec::with_capacity(MAX_EVENTS_PER_BLOCK),
        chunk_events: Vec::with_capacity(MAX_EVENTS_PER_BLOCK),
    };
    let handle = SamplerHandle::new(control_tx, retired_rx, config, decoder);

    (processor, handle)
}

/// Render-side half of the engine. Owned by the audio thread.
pub struct SamplerProcessor {
    synth: Synthesizer,
    rx: Consumer<ControlMessage>,
    retired: Producer<Arc<SampleAsset>>,
    midi_channel: Option<u8>,
    max_block_size: usize,
    midi_events: Vec<NoteEvent>,
    // Events of one sub-block, rebased to its first frame
    chunk_events: Vec<NoteEvent>,
}

impl SamplerProcessor {
    pub fn synthesizer(&self) -> &Synthesizer {
        &self.synth
    }

    pub fn max_block_size(&self) -> usize {
        self.max_block_size
    }

    /// Render a block whose events arrive as raw MIDI `(frame, message)`
    /// pairs. Events beyond [`MAX_EVENTS_PER_BLOCK`] are dropped.
    pub fn render_midi(&mut self, buffer: &mut [&mut [f32]], midi: &[(u32, MidiEvent)]) {
        let mut events = std::mem::take(&mut self.midi_events);
        events.clear();
        events.extend(
            midi.iter()
                .filter_map(|&(frame, event)| midi_to_note_event(event, frame, self.midi_channel))
                .take(MAX_EVENTS_PER_BLOCK),
        );

        self.render(buffer, &events);
        self.midi_events = events;
    }

    /// Render `frames` frames in slices of at most `max_block_size`.
    ///
    /// Each event goes to the slice holding its timestamp; events past the
    /// end land in the last slice. At most [`MAX_EVENTS_PER_BLOCK`] events
    /// are kept per slice.
    fn render_chunked(
        &mut self,
        buffer: &mut [&mut [f32]],
        events: &[NoteEvent],
        frames: usize,
    ) {
        let mut remaining = events;
        let mut start = 0;

        while start < frames {
            let end = (start + self.max_block_size).min(frames);
            let split = if end == frames {
                remaining.len()
            } else {
                remaining
                    .iter()
                    .position(|event| event.timestamp as usize >= end)
                    .unwrap_or(remaining.len())
            };
            let (current, rest) = remaining.split_at(split);
            remaining = rest;

            self.chunk_events.clear();
            self.chunk_events.extend(
                current
                    .iter()
                    .map(|event| NoteEvent {
                        timestamp: event.timestamp.saturating_sub(start as u32),
                        ..*event
                    })
                    .take(MAX_EVENTS_PER_BLOCK),
            );

            let channels = buffer.len();
            let mut views: [&mut [f32]; MAX_CHANNELS] = Default::default();
            for (view, channel) in views.iter_mut().zip(buffer.iter_mut()) {
                *view = &mut channel[start..end];
            }
            self.synth
                .render_block(&self.chunk_events, &mut views[..channels], end - start);

            start = end;
        }
    }

    /// Apply everything the control path has queued since the last block.
    fn drain_control(&mut self) {
        while let Ok(msg) = self.rx.pop() {
            match msg {
                ControlMessage::SetEnvelope(params) => {
                    self.synth.update_envelope_parameters(params)
                }
                ControlMessage::AllNotesOff => self.synth.all_notes_off(),
                ControlMessage::LoadSample(asset) => {
                    if let Some(old) = self.synth.load_sample(asset) {
                        self.retire(old);
                    }
                }
            }
        }
    }

    fn retire(&mut self, asset: Arc<SampleAsset>) {
        if let Err(PushError::Full(asset)) = self.retired.push(asset) {
            // Not reached while the handle collects garbage before every
            // load: retired assets never outnumber the ring's capacity.
            debug_assert!(false, "retired asset ring overflowed");
            drop(asset);
        }
    }
}

impl AudioProcessor for SamplerProcessor {
    fn prepare(&mut self, sample_rate: f32, max_block_size: usize) {
        debug!(sample_rate, max_block_size, "Preparing sampler");
        self.synth.prepare(sample_rate);
        self.max_block_size = max_block_size.max(1);
    }

    fn render(&mut self, buffer: &mut [&mut [f32]], events: &[NoteEvent]) {
        self.drain_control();

        for channel in buffer.iter_mut() {
            channel.fill(0.0);
        }

        let channels = buffer.len().min(MAX_CHANNELS);
        let buffer = &mut buffer[..channels];
        let frames = buffer.iter().map(|channel| channel.len()).min().unwrap_or(0);
        if frames <= self.max_block_size {
            self.synth.render_block(events, buffer, frames);
        } else {
            self.render_chunked(buffer, events, frames);
        }
    }

    fn editor_model(&self) -> EditorModel {
        EditorModel {
            sample_rate: self.synth.sample_rate(),
            envelope: self.synth.envelope_parameters(),
            sample: self.synth.current_sample().map(|asset| asset.info()),
            active_voices: self.synth.active_voices(),
            voice_capacity: self.synth.pool().capacity(),
        }
    }
}
