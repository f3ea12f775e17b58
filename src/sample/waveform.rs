//! Decimated waveform view for displays.
//!
//! Each output bucket covers an equal slice of the asset and records the
//! minimum and maximum value seen across all channels in that slice.

use super::SampleAsset;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Peak {
    pub min: f32,
    pub max: f32,
}

impl SampleAsset {
    /// Fill `out` with one [`Peak`] per bucket. Does not allocate.
    pub fn peaks_into(&self, out: &mut [Peak]) {
        let buckets = out.len();
        if buckets == 0 {
            return;
        }

        let frames = self.frames();
        let channels = self.channels();
        let data = self.data();

        for (bucket, peak) in out.iter_mut().enumerate() {
            let start = bucket * frames / buckets;
            let end = ((bucket + 1) * frames / buckets).max(start + 1).min(frames);

            if start >= frames {
                *peak = Peak::default();
                continue;
            }

            let mut min = f32::MAX;
            let mut max = f32::MIN;
            for &sample in &data[start * channels..end * channels] {
                min = min.min(sample);
                max = max.max(sample);
            }
            *peak = Peak { min, max };
        }
    }

    /// Decimate the asset to `width` peaks.
    pub fn waveform(&self, width: usize) -> Vec<Peak> {
        let mut peaks = vec![Peak::default(); width];
        self.peaks_into(&mut peaks);
        peaks
    }
}
