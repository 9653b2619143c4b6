use serde::Serialize;

/// Running statistics of one channel in engineering units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChannelStats {
    pub min: f32,
    pub max: f32,
    #[serde(skip)]
    sum: f64,
    #[serde(skip)]
    sum_sq: f64,
    pub count: usize,
}

impl Default for ChannelStats {
    fn default() -> Self {
        Self {
            min: f32::INFINITY,
            max: f32::NEG_INFINITY,
            sum: 0.0,
            sum_sq: 0.0,
            count: 0,
        }
    }
}

impl ChannelStats {
    pub fn update(&mut self, sample: f32) {
        self.min = self.min.min(sample);
        self.max = self.max.max(sample);
        let value = f64::from(sample);
        self.sum += value;
        self.sum_sq += value * value;
        self.count += 1;
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.sum / self.count as f64
    }

    pub fn rms(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        (self.sum_sq / self.count as f64).sqrt()
    }

    pub fn peak_to_peak(&self) -> f32 {
        if self.count == 0 {
            return 0.0;
        }
        self.max - self.min
    }
}

/// Multiply an interleaved stereo block by the per-channel scale in place.
pub fn apply_scale(block: &mut [f32], scale: &[f32; 2]) {
    for frame in block.chunks_exact_mut(2) {
        frame[0] *= scale[0];
        frame[1] *= scale[1];
    }
}

/// Fold an interleaved stereo block into per-channel statistics.
pub fn accumulate(stats: &mut [ChannelStats; 2], block: &[f32]) {
    for frame in block.chunks_exact(2) {
        stats[0].update(frame[0]);
        stats[1].update(frame[1]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_applies_per_channel() {
        let mut block = [0.5f32, 0.5, -1.0, 0.25];
        apply_scale(&mut block, &[2.0, 4.0]);
        assert_eq!(block, [1.0, 2.0, -2.0, 1.0]);
    }

    #[test]
    fn stats_track_extremes_and_rms() {
        let mut stats = [ChannelStats::default(); 2];
        accumulate(&mut stats, &[1.0, 0.0, -1.0, 2.0, 1.0, 4.0, -1.0, 2.0]);
        assert_eq!(stats[0].count, 4);
        assert_eq!(stats[0].min, -1.0);
        assert_eq!(stats[0].max, 1.0);
        assert_eq!(stats[0].mean(), 0.0);
        assert!((stats[0].rms() - 1.0).abs() < 1e-12);
        assert_eq!(stats[1].peak_to_peak(), 4.0);
        assert!((stats[1].mean() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn empty_stats_report_zero() {
        let stats = ChannelStats::default();
        assert_eq!(stats.mean(), 0.0);
        assert_eq!(stats.rms(), 0.0);
        assert_eq!(stats.peak_to_peak(), 0.0);
    }
}
