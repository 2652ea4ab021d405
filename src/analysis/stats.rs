//! Inter-onset interval statistics
//!
//! Measures how consistently a channel plays: the mean time between
//! consecutive onsets and the sample standard deviation of those gaps.
//! With too few onsets the numbers are undefined and reported as `None`,
//! never as zero.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TimingError};

/// Onsets needed for at least one interval
pub const MIN_ONSETS_FOR_MEAN: usize = 2;

/// Onsets needed for two intervals (sample standard deviation divisor n - 1 > 0)
pub const MIN_ONSETS_FOR_STDDEV: usize = 3;

/// Timing consistency of one channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalProfile {
    /// Number of onsets the profile was computed from
    pub onsets: usize,
    /// Gaps between consecutive onsets in seconds
    pub intervals: Vec<f64>,
    /// Mean interval, `None` with fewer than two onsets
    pub mean: Option<f64>,
    /// Sample standard deviation, `None` with fewer than three onsets
    pub stddev: Option<f64>,
}

impl IntervalProfile {
    /// Compute the profile for ordered onset times
    pub fn compute(onset_times: &[f64]) -> Self {
        let intervals: Vec<f64> = onset_times.windows(2).map(|w| w[1] - w[0]).collect();
        let mean = mean(&intervals);
        let stddev = mean.and_then(|m| sample_stddev(&intervals, m));
        Self {
            onsets: onset_times.len(),
            intervals,
            mean,
            stddev,
        }
    }

    /// Whether both mean and standard deviation are defined
    pub fn is_complete(&self) -> bool {
        self.mean.is_some() && self.stddev.is_some()
    }

    /// Return `(mean, stddev)` or the reason they are undefined
    ///
    /// # Errors
    /// * `InsufficientOnsets` - With fewer than three onsets
    pub fn require_complete(&self, channel: &str) -> Result<(f64, f64)> {
        match (self.mean, self.stddev) {
            (Some(mean), Some(stddev)) => Ok((mean, stddev)),
            _ => Err(TimingError::InsufficientOnsets {
                channel: channel.to_string(),
                required: MIN_ONSETS_FOR_STDDEV,
                found: self.onsets,
            }),
        }
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Standard deviation with Bessel's correction
fn sample_stddev(values: &[f64], mean: f64) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let sum_sq: f64 = values.iter().map(|&x| (x - mean).powi(2)).sum();
    Some((sum_sq / (values.len() - 1) as f64).sqrt())
}
