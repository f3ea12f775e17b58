//! Fractional-position reads and boundary fades for sample playback.

/*
Reading Between Samples
=======================

A pitched-up or pitched-down voice walks through the source data at a rate
other than one sample per output sample, so its read cursor usually sits
between two stored samples:

    stored:   x[i]        x[i+1]
                 ●───────────●
                      ↑
                 cursor = i + frac

Linear interpolation draws a straight line between the neighbours:

    y = x[i] + (x[i+1] - x[i]) × frac

Past the last stored sample the right neighbour is treated as silence, so the
final sample fades out over one step instead of wrapping or reading garbage.


Boundary Fades
--------------

Sample data rarely starts and ends on a zero crossing. A short linear ramp at
each end of the playable region removes the click:

    gain
    1.0 ┤   ┌────────────────────────┐
        │  ╱                          ╲
    0.0 └─┴────────────────────────────┴─→ position
          fade_in                fade_out
*/

/// Linearly interpolated read of `channel` at fractional `position`.
///
/// `data` is interleaved with `channels` channels and `frames` frames.
#[inline]
pub fn read_linear(
    data: &[f32],
    channels: usize,
    frames: usize,
    channel: usize,
    position: f64,
) -> f32 {
    if position < 0.0 {
        return 0.0;
    }

    let index = position as usize;
    if index >= frames {
        return 0.0;
    }

    let frac = (position - index as f64) as f32;
    let current = data[index * channels + channel];
    let next = if index + 1 < frames {
        data[(index + 1) * channels + channel]
    } else {
        0.0
    };

    current + (next - current) * frac
}

/// Gain of the fade-in/fade-out window at `position` within `length` frames.
#[inline]
pub fn boundary_gain(position: f64, length: f64, fade_in: f64, fade_out: f64) -> f32 {
    let mut gain = 1.0f64;

    if fade_in > 0.0 && position < fade_in {
        gain = gain.min(position / fade_in);
    }

    let remaining = length - position;
    if fade_out > 0.0 && remaining < fade_out {
        gain = gain.min(remaining / fade_out);
    }

    gain.clamp(0.0, 1.0) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_positions_return_stored_samples() {
        let data = [0.0, 0.5, 1.0, -1.0];
        assert_eq!(read_linear(&data, 1, 4, 0, 1.0), 0.5);
        assert_eq!(read_linear(&data, 1, 4, 0, 3.0), -1.0);
    }

    #[test]
    fn fractional_positions_interpolate() {
        let data = [0.0, 1.0];
        assert!((read_linear(&data, 1, 2, 0, 0.25) - 0.25).abs() < 1e-6);
    }

    #[test]
    fn interleaved_channels_are_kept_apart() {
        // L: 0.0, 1.0   R: 1.0, 0.0
        let data = [0.0, 1.0, 1.0, 0.0];
        assert!((read_linear(&data, 2, 2, 0, 0.5) - 0.5).abs() < 1e-6);
        assert!((read_linear(&data, 2, 2, 1, 0.25) - 0.75).abs() < 1e-6);
    }

    #[test]
    fn reads_past_the_end_are_silent() {
        let data = [1.0, 1.0];
        assert_eq!(read_linear(&data, 1, 2, 0, 2.0), 0.0);
        assert!((read_linear(&data, 1, 2, 0, 1.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn boundary_gain_ramps_at_both_ends() {
        assert_eq!(boundary_gain(0.0, 100.0, 10.0, 10.0), 0.0);
        assert!((boundary_gain(5.0, 100.0, 10.0, 10.0) - 0.5).abs() < 1e-6);
        assert_eq!(boundary_gain(50.0, 100.0, 10.0, 10.0), 1.0);
        assert!((boundary_gain(95.0, 100.0, 10.0, 10.0) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn zero_length_fades_are_unity() {
        assert_eq!(boundary_gain(0.0, 100.0, 0.0, 0.0), 1.0);
        assert_eq!(boundary_gain(99.0, 100.0, 0.0, 0.0), 1.0);
    }
}
