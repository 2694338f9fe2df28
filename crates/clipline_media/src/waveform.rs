use serde::{Deserialize, Serialize};

use crate::error::{MediaError, Result};

/// Samples inspected per bucket.
pub const WINDOW: usize = 8;

/// Half of a 2048-point FFT.
pub const DEFAULT_BUCKETS: usize = 1024;

/// Byte value of a silent bucket.
pub const SILENCE: u8 = 128;

/// Byte-valued amplitude per bucket over the whole audio buffer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WaveformData {
    pub amplitudes: Vec<u8>,
    /// Seconds covered by `amplitudes`.
    pub duration: f64,
}

/// Reduce one PCM channel to `buckets` amplitudes in `[0, 255]`.
///
/// Each bucket samples `WINDOW` evenly spaced points and mixes 70% of the
/// peak magnitude with 30% of the mean magnitude.
pub fn compute_amplitudes(channel: &[f32], buckets: usize) -> Result<Vec<u8>> {
    if channel.is_empty() {
        return Err(MediaError::EmptySignal);
    }
    if buckets == 0 {
        return Err(MediaError::InvalidBucketCount(buckets));
    }

    let step = (channel.len() / buckets).max(1);
    let amplitudes = (0..buckets)
        .map(|i| {
            let mut sum = 0.0f32;
            let mut max = 0.0f32;
            let mut count = 0usize;
            for j in 0..WINDOW {
                let Some(sample) = channel.get(i * step + j * step / WINDOW) else {
                    continue;
                };
                let magnitude = sample.abs();
                sum += magnitude;
                max = max.max(magnitude);
                count += 1;
            }
            if count == 0 {
                return SILENCE;
            }
            let mixed = max * 0.7 + (sum / count as f32) * 0.3;
            ((mixed + 1.0) * 128.0).floor().clamp(0.0, 255.0) as u8
        })
        .collect();
    Ok(amplitudes)
}

impl WaveformData {
    pub fn analyze(channel: &[f32], duration: f64, buckets: usize) -> Result<Self> {
        Ok(Self {
            amplitudes: compute_amplitudes(channel, buckets)?,
            duration,
        })
    }

    /// Buckets covering `[start, end]` seconds, indexed proportionally to time.
    pub fn slice_for_range(&self, start: f64, end: f64) -> &[u8] {
        let len = self.amplitudes.len();
        if len == 0 || self.duration <= 0.0 || end <= start {
            return &[];
        }
        let index = |t: f64| ((t / self.duration) * len as f64).clamp(0.0, len as f64) as usize;
        let (from, to) = (index(start), index(end).max(index(start)));
        &self.amplitudes[from..to.min(len)]
    }

    /// Bar height in pixels for each bucket, folded around silence.
    pub fn bar_heights(&self, track_height: f64) -> Vec<f64> {
        self.amplitudes
            .iter()
            .map(|&a| (a as f64 - SILENCE as f64).abs() / SILENCE as f64 * track_height)
            .collect()
    }
}
