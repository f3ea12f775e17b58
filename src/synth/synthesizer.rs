use std::sync::Arc;

use crate::{
    config::SamplerConfig,
    sample::SampleAsset,
    synth::{
        message::{NoteEvent, NoteEventKind},
        params::EnvelopeParameters,
        pool::VoicePool,
    },
};

/// Render-side engine: owns the current sample, the voice pool and the
/// envelope snapshot every voice reads.
///
/// Nothing here allocates, locks or frees sample memory once constructed.
/// Retiring an asset hands the old `Arc` back to the caller.
pub struct Synthesizer {
    sample_rate: f32,
    pool: VoicePool,
    asset: Option<Arc<SampleAsset>>,
    params: EnvelopeParameters,
    frame_counter: u64,
}

impl Synthesizer {
    pub fn new(config: &SamplerConfig, sample_rate: f32) -> Self {
        Self {
            sample_rate,
            pool: VoicePool::new(config.voices, sample_rate),
            asset: None,
            params: config.initial_envelope.clamped(),
            frame_counter: 0,
        }
    }

    /// Change the output sample rate. Stops all voices.
    pub fn prepare(&mut self, sample_rate: f32) {
        self.pool.stop_all();
        self.sample_rate = sample_rate;
        self.pool.set_sample_rate(sample_rate);
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Start `note`. Ignored when no sample is loaded or the note is outside
    /// the sample's key range.
    pub fn note_on(&mut self, note: u8, velocity: u8) {
        let Some(asset) = self.asset.as_deref() else {
            return;
        };
        if !asset.applies_to(note) {
            return;
        }
        self.pool.note_on(note, velocity, asset);
    }

    pub fn note_off(&mut self, note: u8) {
        self.pool.note_off(note);
    }

    pub fn all_notes_off(&mut self) {
        self.pool.all_notes_off();
    }

    /// Replace the envelope snapshot read by every voice from the next tick on.
    pub fn update_envelope_parameters(&mut self, params: EnvelopeParameters) {
        self.params = params.clamped();
    }

    pub fn envelope_parameters(&self) -> EnvelopeParameters {
        self.params
    }

    /// Install `asset`, returning the previous one.
    ///
    /// Every voice is hard-stopped before the swap so no voice can outlive the
    /// data it was reading.
    pub fn load_sample(&mut self, asset: Arc<SampleAsset>) -> Option<Arc<SampleAsset>> {
        self.pool.stop_all();
        self.asset.replace(asset)
    }

    pub fn current_sample(&self) -> Option<&Arc<SampleAsset>> {
        self.asset.as_ref()
    }

    pub fn pool(&self) -> &VoicePool {
        &self.pool
    }

    pub fn active_voices(&self) -> usize {
        self.pool.active_count()
    }

    /// Total frames rendered since construction.
    pub fn frame_counter(&self) -> u64 {
        self.frame_counter
    }

    /// Render `num_frames` frames, adding into `out`.
    ///
    /// Events are applied at their frame offset. They are expected in
    /// timestamp order; an event earlier than one already applied takes effect
    /// at the current position. Timestamps past the end of the block are
    /// applied on the last frame so no note-off is ever lost.
    pub fn render_block(
        &mut self,
        events: &[NoteEvent],
        out: &mut [&mut [f32]],
        num_frames: usize,
    ) {
        let num_frames = out
            .iter()
            .map(|channel| channel.len())
            .fold(num_frames, usize::min);
        let last_frame = num_frames.saturating_sub(1);

        let mut cursor = 0;
        for event in events {
            let at = (event.timestamp as usize).min(last_frame);
            if at > cursor {
                self.render_voices(out, cursor, at - cursor);
                cursor = at;
            }
            self.apply(event);
        }

        if cursor < num_frames {
            self.render_voices(out, cursor, num_frames - cursor);
        }

        self.frame_counter += num_frames as u64;
    }

    fn apply(&mut self, event: &NoteEvent) {
        match event.kind {
            NoteEventKind::NoteOn { note, velocity } => self.note_on(note, velocity),
            NoteEventKind::NoteOff { note } => self.note_off(note),
            NoteEventKind::AllNotesOff => self.all_notes_off(),
        }
    }

    fn render_voices(&mut self, out: &mut [&mut [f32]], start: usize, frames: usize) {
        if let Some(asset) = self.asset.as_deref() {
            self.pool.render(out, start, frames, &self.params, asset);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::DecodedAudio;

    const SAMPLE_RATE: f32 = 1_000.0;

    fn config() -> SamplerConfig {
        SamplerConfig {
            attack_fade_secs: 0.0,
            release_fade_secs: 0.0,
            ..SamplerConfig::default()
        }
        .with_envelope(EnvelopeParameters::new(0.0, 0.0, 1.0, 0.0))
    }

    fn dc_asset(config: &SamplerConfig) -> Arc<SampleAsset> {
        let decoded = DecodedAudio {
            channels: 1,
            sample_rate: SAMPLE_RATE as u32,
            samples: vec![1.0; 1_000],
        };
        Arc::new(SampleAsset::from_decoded("dc", decoded, config).unwrap())
    }

    #[test]
    fn note_on_is_placed_at_its_timestamp() {
        let config = config();
        let mut synth = Synthesizer::new(&config, SAMPLE_RATE);
        synth.load_sample(dc_asset(&config));

        let mut left = [0.0f32; 8];
        let events = [NoteEvent::note_on(3, 60, 127)];
        synth.render_block(&events, &mut [&mut left[..]], 8);

        assert_eq!(&left[..3], &[0.0, 0.0, 0.0]);
        assert!(left[3..].iter().all(|s| (s - 1.0).abs() < 1e-6));
    }

    #[test]
    fn note_off_is_placed_at_its_timestamp() {
        let config = config();
        let mut synth = Synthesizer::new(&config, SAMPLE_RATE);
        synth.load_sample(dc_asset(&config));

        let mut left = [0.0f32; 8];
        let events = [NoteEvent::note_on(0, 60, 127), NoteEvent::note_off(5, 60)];
        synth.render_block(&events, &mut [&mut left[..]], 8);

        assert!(left[..5].iter().all(|s| (s - 1.0).abs() < 1e-6));
        assert!(left[5..].iter().all(|&s| s == 0.0));
        assert_eq!(synth.active_voices(), 0);
    }

    #[test]
    fn late_timestamps_land_on_the_last_frame() {
        let config = config();
        let mut synth = Synthesizer::new(&config, SAMPLE_RATE);
        synth.load_sample(dc_asset(&config));

        let mut left = [0.0f32; 4];
        let events = [NoteEvent::note_on(0, 60, 127), NoteEvent::note_off(99, 60)];
        synth.render_block(&events, &mut [&mut left[..]], 4);

        assert!(left[..3].iter().all(|s| (s - 1.0).abs() < 1e-6));
        assert_eq!(left[3], 0.0);
    }

    #[test]
    fn notes_outside_key_range_are_ignored() {
        let mut config = config();
        config.key_range = crate::sample::KeyRange::new(48, 72);
        let mut synth = Synthesizer::new(&config, SAMPLE_RATE);
        synth.load_sample(dc_asset(&config));

        synth.note_on(30, 100);
        assert_eq!(synth.active_voices(), 0);
        synth.note_on(50, 100);
        assert_eq!(synth.active_voices(), 1);
    }

    #[test]
    fn note_on_without_sample_is_ignored() {
        let mut synth = Synthesizer::new(&config(), SAMPLE_RATE);
        synth.note_on(60, 100);
        assert_eq!(synth.active_voices(), 0);
    }

    #[test]
    fn load_sample_stops_voices_and_returns_old_asset() {
        let config = config();
        let mut synth = Synthesizer::new(&config, SAMPLE_RATE);
        let old = dc_asset(&config);
        synth.load_sample(old.clone());

        synth.note_on(60, 100);
        synth.note_on(64, 100);
        assert_eq!(synth.pool().voices_on_asset(old.id()), 2);

        let retired = synth.load_sample(dc_asset(&config));

        assert_eq!(retired.map(|a| a.id()), Some(old.id()));
        assert_eq!(synth.pool().voices_on_asset(old.id()), 0);
        assert_eq!(synth.active_voices(), 0);
    }

    #[test]
    fn envelope_updates_are_clamped() {
        let mut synth = Synthesizer::new(&config(), SAMPLE_RATE);
        synth.update_envelope_parameters(EnvelopeParameters {
            attack: -3.0,
            decay: 0.5,
            sustain: 4.0,
            release: 10.0,
        });

        let params = synth.envelope_parameters();
        assert_eq!(params, EnvelopeParameters::new(0.0, 0.5, 1.0, 5.0));
    }

    #[test]
    fn frame_counter_tracks_rendered_frames() {
        let mut synth = Synthesizer::new(&config(), SAMPLE_RATE);
        let mut left = [0.0f32; 16];
        synth.render_block(&[], &mut [&mut left[..]], 16);
        synth.render_block(&[], &mut [&mut left[..]], 10);
        assert_eq!(synth.frame_counter(), 26);
    }
}
