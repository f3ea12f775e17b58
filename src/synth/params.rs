#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The four amplitude-envelope controls shared by every voice.
///
/// Always exchanged as one `Copy` value so a reader sees either the previous
/// snapshot or the new one, never a mix of both.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvelopeParameters {
    /// Seconds to ramp from the current level up to 1.0.
    pub attack: f32,
    /// Seconds to ramp from 1.0 down to the sustain level.
    pub decay: f32,
    /// Level held while the key is down (0.0 - 1.0).
    pub sustain: f32,
    /// Seconds to ramp from the release start level down to 0.
    pub release: f32,
}

impl EnvelopeParameters {
    pub const ATTACK_RANGE: (f32, f32) = (0.0, 2.0);
    pub const DECAY_RANGE: (f32, f32) = (0.0, 2.0);
    pub const SUSTAIN_RANGE: (f32, f32) = (0.0, 1.0);
    pub const RELEASE_RANGE: (f32, f32) = (0.0, 5.0);

    /// Build a parameter set, clamping each value into its range.
    pub fn new(attack: f32, decay: f32, sustain: f32, release: f32) -> Self {
        Self {
            attack,
            decay,
            sustain,
            release,
        }
        .clamped()
    }

    /// Copy of `self` with every field forced into its valid range.
    ///
    /// Non-finite values fall back to the range minimum.
    pub fn clamped(self) -> Self {
        Self {
            attack: clamp_to(self.attack, Self::ATTACK_RANGE),
            decay: clamp_to(self.decay, Self::DECAY_RANGE),
            sustain: clamp_to(self.sustain, Self::SUSTAIN_RANGE),
            release: clamp_to(self.release, Self::RELEASE_RANGE),
        }
    }
}

impl Default for EnvelopeParameters {
    fn default() -> Self {
        Self {
            attack: 0.0,
            decay: 0.0,
            sustain: 1.0,
            release: 0.0,
        }
    }
}

#[inline]
fn clamp_to(value: f32, (min, max): (f32, f32)) -> f32 {
    if value.is_finite() {
        value.clamp(min, max)
    } else if value == f32::INFINITY {
        max
    } else {
        min
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_range_values_pass_through() {
        let params = EnvelopeParameters::new(0.5, 1.0, 0.3, 2.5);
        assert_eq!(params.attack, 0.5);
        assert_eq!(params.decay, 1.0);
        assert_eq!(params.sustain, 0.3);
        assert_eq!(params.release, 2.5);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let params = EnvelopeParameters::new(-1.0, 9.0, 1.5, -0.2);
        assert_eq!(params.attack, 0.0);
        assert_eq!(params.decay, 2.0);
        assert_eq!(params.sustain, 1.0);
        assert_eq!(params.release, 0.0);
    }

    #[test]
    fn non_finite_values_fall_back() {
        let params = EnvelopeParameters::new(f32::NAN, f32::INFINITY, f32::NEG_INFINITY, f32::NAN);
        assert_eq!(params.attack, 0.0);
        assert_eq!(params.decay, 2.0);
        assert_eq!(params.sustain, 0.0);
        assert_eq!(params.release, 0.0);
    }
}
