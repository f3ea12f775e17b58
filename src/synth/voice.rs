use crate::{
    dsp::{
        envelope::EnvelopeGenerator,
        interpolate::{boundary_gain, read_linear},
    },
    sample::SampleAsset,
    synth::params::EnvelopeParameters,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceState {
    Free,      // Available for allocation
    Active,    // Playing, envelope in attack/decay/sustain
    Releasing, // Key released, envelope in release phase
}

/// Plays one note of the loaded sample through its own envelope.
///
/// The voice never owns the sample data. It remembers the id of the asset it
/// was started on and is handed a borrow of that asset for each render call.
pub struct SampleVoice {
    note: u8,
    gain: f32,
    state: VoiceState,
    age: u64,
    asset_id: Option<u64>,
    position: f64,
    increment: f64,
    // Start-of-sample fade applies only to a voice started from silence
    fade_in: bool,
    sample_rate: f32,
    envelope: EnvelopeGenerator,
}

impl SampleVoice {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            note: 0,
            gain: 0.0,
            state: VoiceState::Free,
            age: 0,
            asset_id: None,
            position: 0.0,
            increment: 1.0,
            fade_in: true,
            sample_rate,
            envelope: EnvelopeGenerator::new(sample_rate),
        }
    }

    /// Bind the voice to `note` on `asset` and start its attack.
    ///
    /// A voice that is still sounding keeps its envelope level, so restarting
    /// it does not click. The start-of-sample fade only applies to a voice
    /// started from Free.
    pub fn start(&mut self, note: u8, velocity: u8, asset: &SampleAsset, age: u64) {
        self.fade_in = self.state == VoiceState::Free;
        self.note = note;
        self.gain = velocity as f32 / 127.0;
        self.state = VoiceState::Active;
        self.age = age;
        self.asset_id = Some(asset.id());
        self.position = 0.0;
        self.increment = asset.playback_increment(note, self.sample_rate);
        self.envelope.trigger();
    }

    pub fn release(&mut self) {
        if self.state == VoiceState::Active {
            self.state = VoiceState::Releasing;
            self.envelope.release();
        }
    }

    /// Silence the voice immediately and return it to the pool.
    pub fn stop(&mut self) {
        self.envelope.reset();
        self.state = VoiceState::Free;
        self.note = 0;
        self.gain = 0.0;
        self.asset_id = None;
        self.position = 0.0;
    }

    /// Add `frames` frames of output into `out` starting at `start`.
    ///
    /// The cursor and envelope advance by exactly one step per frame. If the
    /// sample runs out the rest of the range is left untouched and the voice
    /// frees itself.
    pub fn render_into(
        &mut self,
        out: &mut [&mut [f32]],
        start: usize,
        frames: usize,
        params: &EnvelopeParameters,
        asset: &SampleAsset,
    ) {
        if self.state == VoiceState::Free {
            return;
        }
        debug_assert_eq!(self.asset_id, Some(asset.id()), "voice outlived its sample");

        let channels = asset.channels();
        let length = asset.frames();
        let length_f = length as f64;
        let fade_in = if self.fade_in {
            asset.attack_fade_frames()
        } else {
            0.0
        };
        let fade_out = asset.release_fade_frames();
        let data = asset.data();

        for frame in start..start + frames {
            if self.position >= length_f {
                self.stop();
                return;
            }

            let level = self.envelope.tick(params) * self.gain;
            let window = boundary_gain(self.position, length_f, fade_in, fade_out);
            let gain = level * window;

            for (out_channel, buffer) in out.iter_mut().enumerate() {
                let source_channel = if channels == 1 {
                    0
                } else if out_channel < channels {
                    out_channel
                } else {
                    continue;
                };
                let sample = read_linear(data, channels, length, source_channel, self.position);
                buffer[frame] += sample * gain;
            }

            self.position += self.increment;

            if !self.envelope.is_active() {
                self.stop();
                return;
            }
        }
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.envelope.set_sample_rate(sample_rate);
    }

    pub fn is_free(&self) -> bool {
        self.state == VoiceState::Free
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, VoiceState::Active | VoiceState::Releasing)
    }

    pub fn note(&self) -> Option<u8> {
        if self.is_active() {
            Some(self.note)
        } else {
            None
        }
    }

    pub fn age(&self) -> u64 {
        self.age
    }

    pub fn state(&self) -> VoiceState {
        self.state
    }

    pub fn asset_id(&self) -> Option<u64> {
        self.asset_id
    }

    /// Playback cursor in source frames.
    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn envelope_level(&self) -> f32 {
        self.envelope.level()
    }

    pub fn release_progress(&self) -> Option<f32> {
        self.envelope.release_progress()
    }
}

/// Every kind of voice the pool can hold.
///
/// Only sample playback exists today; the pool talks to voices through this
/// enum so new kinds slot in without dynamic dispatch.
pub enum Voice {
    Sample(SampleVoice),
}

impl Voice {
    pub fn sample(sample_rate: f32) -> Self {
        Voice::Sample(SampleVoice::new(sample_rate))
    }

    pub fn start(&mut self, note: u8, velocity: u8, asset: &SampleAsset, age: u64) {
        match self {
            Voice::Sample(v) => v.start(note, velocity, asset, age),
        }
    }

    pub fn release(&mut self) {
        match self {
            Voice::Sample(v) => v.release(),
        }
    }

    pub fn stop(&mut self) {
        match self {
            Voice::Sample(v) => v.stop(),
        }
    }

    pub fn render_into(
        &mut self,
        out: &mut [&mut [f32]],
        start: usize,
        frames: usize,
        params: &EnvelopeParameters,
        asset: &SampleAsset,
    ) {
        match self {
            Voice::Sample(v) => v.render_into(out, start, frames, params, asset),
        }
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        match self {
            Voice::Sample(v) => v.set_sample_rate(sample_rate),
        }
    }

    pub fn is_free(&self) -> bool {
        match self {
            Voice::Sample(v) => v.is_free(),
        }
    }

    pub fn is_active(&self) -> bool {
        match self {
            Voice::Sample(v) => v.is_active(),
        }
    }

    pub fn note(&self) -> Option<u8> {
        match self {
            Voice::Sample(v) => v.note(),
        }
    }

    pub fn age(&self) -> u64 {
        match self {
            Voice::Sample(v) => v.age(),
        }
    }

    pub fn state(&self) -> VoiceState {
        match self {
            Voice::Sample(v) => v.state(),
        }
    }

    pub fn asset_id(&self) -> Option<u64> {
        match self {
            Voice::Sample(v) => v.asset_id(),
        }
    }

    pub fn envelope_level(&self) -> f32 {
        match self {
            Voice::Sample(v) => v.envelope_level(),
        }
    }

    pub fn release_progress(&self) -> Option<f32> {
        match self {
            Voice::Sample(v) => v.release_progress(),
        }
    }
}
