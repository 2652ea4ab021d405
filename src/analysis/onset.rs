//! Debounced threshold-crossing onset detector
//!
//! An onset is any sample whose absolute difference from the previous
//! sample exceeds the amplitude threshold. After an onset is accepted,
//! further crossings are ignored until more than `min_spacing` samples have
//! passed, so one transient is never split into several notes.

use serde::{Deserialize, Serialize};

use crate::config::DetectorConfig;
use crate::error::{Result, TimingError};

/// Ordered onset sample-indices for one channel
///
/// Strictly increasing and never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct OnsetSet(Vec<usize>);

impl TryFrom<Vec<usize>> for OnsetSet {
    type Error = TimingError;

    fn try_from(indices: Vec<usize>) -> Result<Self> {
        if indices.is_empty() {
            return Err(TimingError::InvalidOnsetSet {
                reason: "no onsets".to_string(),
            });
        }
        if let Some(pair) = indices.windows(2).find(|w| w[1] <= w[0]) {
            return Err(TimingError::InvalidOnsetSet {
                reason: format!("onset {} does not follow {}", pair[1], pair[0]),
            });
        }
        Ok(Self(indices))
    }
}

impl From<OnsetSet> for Vec<usize> {
    fn from(set: OnsetSet) -> Self {
        set.0
    }
}

impl OnsetSet {
    /// Onset sample-indices
    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    /// Index of the first onset
    pub fn first(&self) -> usize {
        self.0[0]
    }

    /// Number of onsets
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false for a detected set
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Onset detector with fixed threshold and debounce window
#[derive(Debug, Clone, Copy)]
pub struct OnsetDetector {
    config: DetectorConfig,
}

impl OnsetDetector {
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    /// Detect onsets in `samples`, naming `channel` in any error
    ///
    /// # Errors
    /// * `EmptyTrack` - If no sample crosses the threshold
    pub fn detect(&self, channel: &str, samples: &[i32]) -> Result<OnsetSet> {
        let indices = detect_onsets(
            samples,
            self.config.amplitude_threshold,
            self.config.min_spacing,
        );
        if indices.is_empty() {
            return Err(TimingError::EmptyTrack {
                channel: channel.to_string(),
                amplitude_threshold: self.config.amplitude_threshold,
                min_spacing: self.config.min_spacing,
            });
        }
        Ok(OnsetSet(indices))
    }
}

/// Scan `samples` for debounced threshold crossings
///
/// Returns the raw (possibly empty) list of onset indices. Differences are
/// taken in `i64` so full-scale 32-bit swings cannot overflow.
pub fn detect_onsets(samples: &[i32], amplitude_threshold: u32, min_spacing: usize) -> Vec<usize> {
    let threshold = amplitude_threshold as i64;
    let mut onsets = Vec::new();
    let mut last_accepted: Option<usize> = None;

    for (i, pair) in samples.windows(2).enumerate() {
        let index = i + 1;
        let delta = (pair[1] as i64 - pair[0] as i64).abs();
        if delta <= threshold {
            continue;
        }
        let spaced = match last_accepted {
            Some(last) => index - last > min_spacing,
            None => true,
        };
        if spaced {
            onsets.push(index);
            last_accepted = Some(index);
        }
    }

    onsets
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_separated_notes() {
        let samples = [0, 0, 0, 600, 600, 0, 0, 0, 700, 700];
        assert_eq!(detect_onsets(&samples, 254, 2), vec![3, 8]);
    }

    #[test]
    fn test_single_isolated_spike() {
        let mut samples = vec![10; 100];
        samples[42] = 1000;
        // The fall back to 10 at 43 is inside the spacing window
        assert_eq!(detect_onsets(&samples, 254, 5), vec![42]);
    }

    #[test]
    fn test_spacing_boundary() {
        // Crossings at 2 and 5: distance 3
        let samples = [0, 0, 500, 500, 500, 0, 0];
        assert_eq!(detect_onsets(&samples, 254, 3), vec![2]);
        assert_eq!(detect_onsets(&samples, 254, 2), vec![2, 5]);
    }

    #[test]
    fn test_threshold_is_strict() {
        let samples = [0, 254, 0, 255];
        assert_eq!(detect_onsets(&samples, 254, 0), vec![3]);
    }

    #[test]
    fn test_zero_spacing_accepts_every_crossing() {
        let samples = [0, 300, 0, 300];
        assert_eq!(detect_onsets(&samples, 0, 0), vec![1, 2, 3]);
    }

    #[test]
    fn test_negative_swing_counts() {
        let samples = [0, -600, -600];
        assert_eq!(detect_onsets(&samples, 254, 10), vec![1]);
    }

    #[test]
    fn test_full_scale_swing_does_not_overflow() {
        let samples = [i32::MIN, i32::MAX];
        // Delta is exactly u32::MAX here
        assert_eq!(detect_onsets(&samples, u32::MAX - 1, 0), vec![1]);
        assert!(detect_onsets(&samples, u32::MAX, 0).is_empty());
    }

    #[test]
    fn test_debounce_uses_last_accepted_not_last_crossing() {
        // Crossings at 1, 2, 3, 4, 5, 6; spacing 2 keeps 1 and 4
        let samples = [0, 500, 0, 500, 0, 500, 0];
        assert_eq!(detect_onsets(&samples, 254, 2), vec![1, 4]);
    }

    #[test]
    fn test_detector_reports_empty_track() {
        let detector = OnsetDetector::new(DetectorConfig::new(254, 10));
        let err = detector.detect("Silence", &[0, 1, 2, 3]).unwrap_err();
        match err {
            TimingError::EmptyTrack {
                channel,
                amplitude_threshold,
                min_spacing,
            } => {
                assert_eq!(channel, "Silence");
                assert_eq!(amplitude_threshold, 254);
                assert_eq!(min_spacing, 10);
            }
            other => panic!("Expected EmptyTrack, got: {:?}", other),
        }
    }

    #[test]
    fn test_onset_set_rejects_empty_and_unordered() {
        let err = serde_json::from_str::<OnsetSet>("[]").unwrap_err();
        assert!(err.to_string().contains("no onsets"));

        let err = serde_json::from_str::<OnsetSet>("[9, 3, 3]").unwrap_err();
        assert!(err.to_string().contains("does not follow"));

        assert!(OnsetSet::try_from(vec![3, 3]).is_err());
    }

    #[test]
    fn test_onset_set_json_is_plain_list() {
        let set = OnsetSet::try_from(vec![3, 8]).unwrap();
        assert_eq!(serde_json::to_string(&set).unwrap(), "[3,8]");
        assert_eq!(serde_json::from_str::<OnsetSet>("[3,8]").unwrap(), set);
        assert_eq!(set.first(), 3);
    }

    #[test]
    fn test_detector_onset_set() {
        let detector = OnsetDetector::new(DetectorConfig::new(254, 2));
        let onsets = detector
            .detect("Kick", &[0, 0, 0, 600, 600, 0, 0, 0, 700, 700])
            .unwrap();
        assert_eq!(onsets.indices(), &[3, 8]);
        assert_eq!(onsets.first(), 3);
        assert_eq!(onsets.len(), 2);
        assert!(!onsets.is_empty());
    }
}
