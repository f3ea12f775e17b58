use crate::{
    sample::SampleAsset,
    synth::{
        params::EnvelopeParameters,
        voice::{Voice, VoiceState},
    },
};

/// Fixed-size set of voices plus the rules for handing them out.
///
/// Allocation order when a note-on arrives:
/// 1. a voice already playing that note is restarted in place;
/// 2. otherwise the lowest-index free voice is used;
/// 3. otherwise the releasing voice furthest through its release is stolen;
/// 4. otherwise the voice triggered longest ago is stolen.
///
/// Ties in (3) go to the older voice, then the lower index, so identical
/// histories always pick the same victim.
pub struct VoicePool {
    voices: Vec<Voice>,
    next_age: u64,
}

impl VoicePool {
    pub fn new(capacity: usize, sample_rate: f32) -> Self {
        let voices = (0..capacity.max(1)).map(|_| Voice::sample(sample_rate)).collect();

        Self { voices, next_age: 0 }
    }

    pub fn capacity(&self) -> usize {
        self.voices.len()
    }

    pub fn active_count(&self) -> usize {
        self.voices.iter().filter(|v| v.is_active()).count()
    }

    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }

    /// Start `note`, returning the index of the voice that plays it.
    pub fn note_on(&mut self, note: u8, velocity: u8, asset: &SampleAsset) -> usize {
        let idx = self
            .find_note(note)
            .unwrap_or_else(|| self.allocate_voice());

        let age = self.next_age;
        self.next_age += 1;
        self.voices[idx].start(note, velocity, asset, age);
        idx
    }

    /// Release the voice playing `note`, if any.
    pub fn note_off(&mut self, note: u8) {
        if let Some(idx) = self.find_note(note) {
            self.voices[idx].release();
        }
    }

    pub fn all_notes_off(&mut self) {
        for voice in &mut self.voices {
            voice.release();
        }
    }

    /// Hard-stop every voice. No release tails.
    pub fn stop_all(&mut self) {
        for voice in &mut self.voices {
            voice.stop();
        }
    }

    pub fn render(
        &mut self,
        out: &mut [&mut [f32]],
        start: usize,
        frames: usize,
        params: &EnvelopeParameters,
        asset: &SampleAsset,
    ) {
        for voice in &mut self.voices {
            if voice.is_active() {
                voice.render_into(out, start, frames, params, asset);
            }
        }
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        for voice in &mut self.voices {
            voice.set_sample_rate(sample_rate);
        }
    }

    /// Number of voices still bound to the asset with `asset_id`.
    pub fn voices_on_asset(&self, asset_id: u64) -> usize {
        self.voices
            .iter()
            .filter(|v| v.asset_id() == Some(asset_id))
            .count()
    }

    fn find_note(&self, note: u8) -> Option<usize> {
        self.voices.iter().position(|v| v.note() == Some(note))
    }

    fn allocate_voice(&self) -> usize {
        if let Some(idx) = self.voices.iter().position(|v| v.is_free()) {
            return idx;
        }

        let releasing = self
            .voices
            .iter()
            .enumerate()
            .filter(|(_, v)| v.state() == VoiceState::Releasing)
            .max_by(|(ia, a), (ib, b)| {
                let pa = a.release_progress().unwrap_or(0.0);
                let pb = b.release_progress().unwrap_or(0.0);
                pa.total_cmp(&pb)
                    .then_with(|| b.age().cmp(&a.age()))
                    .then_with(|| ib.cmp(ia))
            })
            .map(|(idx, _)| idx);

        if let Some(idx) = releasing {
            return idx;
        }

        self.voices
            .iter()
            .enumerate()
            .min_by_key(|(idx, v)| (v.age(), *idx))
            .map(|(idx, _)| idx)
            .unwrap_or(0)
    }
}
