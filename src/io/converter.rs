use crate::{
    io::midi::{MidiEvent, CC_ALL_NOTES_OFF},
    synth::message::NoteEvent,
};

/// Convert a MIDI message arriving `timestamp` frames into the block.
///
/// `channel_filter` of `None` accepts every channel. A note-on with velocity
/// zero is a note-off.
pub fn midi_to_note_event(
    midi: MidiEvent,
    timestamp: u32,
    channel_filter: Option<u8>,
) -> Option<NoteEvent> {
    if channel_filter.is_some_and(|channel| channel != midi.channel()) {
        return None;
    }

    match midi {
        MidiEvent::NoteOn { key, velocity: 0, .. } | MidiEvent::NoteOff { key, .. } => {
            Some(NoteEvent::note_off(timestamp, key))
        }
        MidiEvent::NoteOn { key, velocity, .. } => {
            Some(NoteEvent::note_on(timestamp, key, velocity))
        }
        MidiEvent::ControlChange {
            controller: CC_ALL_NOTES_OFF,
            ..
        } => Some(NoteEvent::all_notes_off(timestamp)),
        _ => None,
    }
}
