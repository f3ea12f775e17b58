use std::sync::Arc;

use crate::{sample::SampleAsset, synth::params::EnvelopeParameters};

/// A note event placed at a frame offset within the current block.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct NoteEvent {
    /// Frame offset from the start of the block.
    pub timestamp: u32,
    pub kind: NoteEventKind,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum NoteEventKind {
    NoteOn { note: u8, velocity: u8 },
    NoteOff { note: u8 },
    AllNotesOff,
}

impl NoteEvent {
    pub fn note_on(timestamp: u32, note: u8, velocity: u8) -> Self {
        Self {
            timestamp,
            kind: NoteEventKind::NoteOn { note, velocity },
        }
    }

    pub fn note_off(timestamp: u32, note: u8) -> Self {
        Self {
            timestamp,
            kind: NoteEventKind::NoteOff { note },
        }
    }

    pub fn all_notes_off(timestamp: u32) -> Self {
        Self {
            timestamp,
            kind: NoteEventKind::AllNotesOff,
        }
    }
}

/// Messages from the control path to the render path.
#[derive(Debug, Clone)]
pub enum ControlMessage {
    SetEnvelope(EnvelopeParameters),
    LoadSample(Arc<SampleAsset>),
    AllNotesOff,
}
