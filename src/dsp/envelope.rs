use crate::synth::params::EnvelopeParameters;

/*
ADSR Envelope Generator
=======================

Per-voice amplitude envelope. Every output sample the voice calls `tick()`
with the current shared parameters and multiplies its audio by the returned
gain.

Vocabulary
----------

  level       Current output gain (0.0 to 1.0).

  stage       Idle, Attack, Decay, Sustain or Release.

  start       The level a ramp started from. Attack ramps start -> 1.0,
              Decay ramps 1.0 -> sustain, Release ramps start -> 0.0.

  progress    How far through the current ramp we are (0.0 to 1.0). Advanced
              by 1 / (stage_time * sample_rate) each tick.


The Shape: Linear Ramps
-----------------------

  Level
    1.0 ┐     ╱╲
        │    ╱  ╲___________
    S   │   ╱               ╲
        │  ╱                 ╲
    0.0 └─╱───────────────────╲──→ Time
        Attack Decay  Sustain  Release

All ramps are linear in gain. The level is recomputed from (start, target,
progress) every tick instead of being accumulated, so a ramp of N samples
lands on its target at exactly sample N. Progress is kept in f64 so long
ramps do not drift.

Parameters are read every tick. Changing a stage time mid-ramp changes the
slope from that sample on; the level itself never jumps. A new sustain level
restarts an unfinished decay ramp from the current level. Once in Sustain the
level glides to a new sustain value at no more than full scale per
SUSTAIN_GLIDE_SECS, so sustain edits never click.


Zero-Length Stages
------------------

A stage time of 0 collapses that stage: the level is set to the stage target
and the next stage is evaluated in the same tick. With attack = decay = 0 the
first tick after `trigger()` already returns the sustain level. Release = 0
drops straight to 0 and goes Idle.


Retrigger
---------

`trigger()` never resets the level. A retrigger while the voice is still
sounding restarts Attack from the current level, so the first sample after a
retrigger differs from the last one by at most one attack step. Idle voices
start from 0 as usual.


The State Machine
-----------------

    ┌──────┐ trigger ┌────────┐ level=1 ┌───────┐ level=S ┌─────────┐
    │ Idle │───────→ │ Attack │───────→ │ Decay │───────→ │ Sustain │
    └──────┘         └────────┘         └───────┘         └─────────┘
        ↑                 │ release          │ release         │ release
        │                 ↓                  ↓                 ↓
        │  level=0   ┌─────────────────────────────────────────────┐
        └────────────│                  Release                    │
                     └─────────────────────────────────────────────┘
*/

/// Tolerance when deciding that a ramp has reached its target.
const PROGRESS_EPSILON: f64 = 1e-6;

/// Time a full-scale sustain change takes to glide in.
pub const SUSTAIN_GLIDE_SECS: f32 = 0.005;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeStage {
    Idle,    // Level is exactly 0, voice may be reused
    Attack,  // Ramping from start level up to 1.0
    Decay,   // Ramping from 1.0 down to sustain
    Sustain, // Holding sustain until release
    Release, // Ramping from start level down to 0
}

pub struct EnvelopeGenerator {
    sample_rate: f32,

    stage: EnvelopeStage,
    level: f32,

    // Ramp bookkeeping for the current stage
    start_level: f32,
    progress: f64,
    // Sustain value the running decay ramp aims at
    decay_target: f32,
}

impl EnvelopeGenerator {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            stage: EnvelopeStage::Idle,
            level: 0.0,
            start_level: 0.0,
            progress: 0.0,
            decay_target: 0.0,
        }
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
    }

    /// Gate high: (re)start the attack ramp from the current level.
    pub fn trigger(&mut self) {
        self.enter(EnvelopeStage::Attack);
    }

    /// Gate low: ramp from the current level to zero.
    pub fn release(&mut self) {
        if self.stage == EnvelopeStage::Idle {
            return;
        }
        self.enter(EnvelopeStage::Release);
    }

    /// Stop immediately, without a release tail.
    pub fn reset(&mut self) {
        self.stage = EnvelopeStage::Idle;
        self.level = 0.0;
        self.start_level = 0.0;
        self.progress = 0.0;
    }

    /// Advance one sample and return the new gain.
    pub fn tick(&mut self, params: &EnvelopeParameters) -> f32 {
        if self.stage == EnvelopeStage::Attack {
            match self.advance(params.attack) {
                Some(progress) => {
                    self.level = self.start_level + (1.0 - self.start_level) * progress;
                }
                None => {
                    self.level = 1.0;
                    self.enter(EnvelopeStage::Decay);
                    // Only a zero-length attack falls through into decay.
                    if params.attack > 0.0 {
                        return self.level;
                    }
                }
            }
        }

        if self.stage == EnvelopeStage::Decay {
            let sustain = params.sustain;
            if sustain != self.decay_target {
                self.start_level = self.level;
                self.progress = 0.0;
                self.decay_target = sustain;
            }
            match self.advance(params.decay) {
                Some(progress) => {
                    self.level = self.start_level + (sustain - self.start_level) * progress;
                }
                None => {
                    self.level = sustain;
                    self.enter(EnvelopeStage::Sustain);
                }
            }
        } else if self.stage == EnvelopeStage::Sustain {
            let max_step = self.sustain_glide_step();
            self.level += (params.sustain - self.level).clamp(-max_step, max_step);
        } else if self.stage == EnvelopeStage::Release {
            match self.advance(params.release) {
                Some(progress) => {
                    self.level = self.start_level * (1.0 - progress);
                }
                None => self.reset(),
            }
        } else if self.stage == EnvelopeStage::Idle {
            self.level = 0.0;
        }

        debug_assert!((0.0..=1.0).contains(&self.level));
        self.level
    }

    /// Render a block of gain values into the buffer.
    pub fn render(&mut self, buffer: &mut [f32], params: &EnvelopeParameters) {
        for sample in buffer.iter_mut() {
            *sample = self.tick(params);
        }
    }

    pub fn is_active(&self) -> bool {
        self.stage != EnvelopeStage::Idle
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn stage(&self) -> EnvelopeStage {
        self.stage
    }

    /// Fraction of the release ramp already played, if releasing.
    pub fn release_progress(&self) -> Option<f32> {
        match self.stage {
            EnvelopeStage::Release => Some(self.progress as f32),
            _ => None,
        }
    }

    /// Largest per-sample level change while gliding to a new sustain.
    pub fn sustain_glide_step(&self) -> f32 {
        let samples = (SUSTAIN_GLIDE_SECS as f64 * self.sample_rate as f64).max(1.0);
        (1.0 / samples) as f32
    }

    fn enter(&mut self, stage: EnvelopeStage) {
        self.stage = stage;
        self.start_level = self.level;
        self.progress = 0.0;
    }

    /// Step the ramp of a stage lasting `seconds`.
    ///
    /// Returns the new progress, or `None` once the ramp is complete.
    fn advance(&mut self, seconds: f32) -> Option<f32> {
        let total_samples = seconds as f64 * self.sample_rate as f64;
        if total_samples < 1.0 {
            return None;
        }

        self.progress += 1.0 / total_samples;
        if self.progress >= 1.0 - PROGRESS_EPSILON {
            None
        } else {
            Some(self.progress as f32)
        }
    }
}
