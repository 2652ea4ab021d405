//! Session pipeline
//!
//! Runs detection, timing and statistics for every channel on its own,
//! then aligns the channels that produced onsets. A channel that fails
//! never stops the others unless the empty-track policy says to abort.

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::analysis::align::{align, AlignmentReport};
use crate::analysis::onset::{OnsetDetector, OnsetSet};
use crate::analysis::stats::IntervalProfile;
use crate::analysis::timing::{offsets_to_time, relative_indices, to_time};
use crate::config::{AnalysisConfig, DetectorConfig, EmptyTrackPolicy};
use crate::engine::channel::{Channel, ChannelSource};
use crate::error::{Result, TimingError};

/// Everything measured for one channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelAnalysis {
    pub channel: String,
    pub sample_rate: u32,
    pub onsets: OnsetSet,
    /// Onset times in seconds from the start of the recording
    pub onset_times: Vec<f64>,
    pub profile: IntervalProfile,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<ChannelSource>,
}

impl ChannelAnalysis {
    /// Time of the first onset in seconds
    pub fn first_onset_time(&self) -> f64 {
        self.onsets.first() as f64 * (1.0 / self.sample_rate as f64)
    }

    /// Onset times in seconds measured from `reference_index` instead of
    /// the start of the recording
    pub fn onset_times_from(&self, reference_index: usize) -> Vec<f64> {
        let offsets = relative_indices(self.onsets.indices(), reference_index);
        offsets_to_time(&offsets, 1.0 / self.sample_rate as f64)
    }
}

/// A channel that produced no usable analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelFailure {
    pub channel: String,
    pub error_code: String,
    pub message: String,
}

impl ChannelFailure {
    pub fn new(channel: impl Into<String>, error: &TimingError) -> Self {
        Self {
            channel: channel.into(),
            error_code: error.error_code().to_string(),
            message: error.to_string(),
        }
    }
}

/// Result of analyzing every channel in a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    pub generated_at: DateTime<Utc>,
    pub detector: DetectorConfig,
    pub channels: Vec<ChannelAnalysis>,
    pub failures: Vec<ChannelFailure>,
    /// `None` when no channel produced onsets
    pub alignment: Option<AlignmentReport>,
}

impl SessionReport {
    /// Look up a channel's analysis by name
    pub fn channel(&self, name: &str) -> Option<&ChannelAnalysis> {
        self.channels.iter().find(|c| c.channel == name)
    }

    /// Serialize the report as pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Run detection, timing and statistics for one channel
///
/// # Errors
/// * `EmptyTrack` - If the channel has no onsets under `config`
pub fn analyze_channel(channel: &Channel, config: &DetectorConfig) -> Result<ChannelAnalysis> {
    let detector = OnsetDetector::new(*config);
    let onsets = detector.detect(channel.name(), channel.samples())?;
    let onset_times = to_time(onsets.indices(), channel.sample_period());
    let profile = IntervalProfile::compute(&onset_times);

    debug!(
        "'{}': {} onsets, first at sample {}",
        channel.name(),
        onsets.len(),
        onsets.first()
    );

    Ok(ChannelAnalysis {
        channel: channel.name().to_string(),
        sample_rate: channel.sample_rate(),
        onsets,
        onset_times,
        profile,
        source: channel.source().cloned(),
    })
}

/// Analyze every channel, then align those that produced onsets
///
/// # Errors
/// * `EmptyTrack` - Only with [`EmptyTrackPolicy::Abort`], for the first
///   channel without onsets
pub fn analyze_session(channels: &[Channel], config: &AnalysisConfig) -> Result<SessionReport> {
    info!(
        "Analyzing {} channels (threshold {}, minimal spacing {} samples)",
        channels.len(),
        config.detector.amplitude_threshold,
        config.detector.min_spacing
    );

    let mut analyses = Vec::with_capacity(channels.len());
    let mut failures = Vec::new();

    for channel in channels {
        match analyze_channel(channel, &config.detector) {
            Ok(analysis) => analyses.push(analysis),
            Err(e) => match config.empty_track_policy {
                EmptyTrackPolicy::Abort => return Err(e),
                EmptyTrackPolicy::Skip => {
                    warn!("{}; excluding it from alignment", e);
                    failures.push(ChannelFailure::new(channel.name(), &e));
                }
            },
        }
    }

    let first_onsets: Vec<(&str, f64)> = analyses
        .iter()
        .map(|a| (a.channel.as_str(), a.first_onset_time()))
        .collect();

    let alignment = match align(&first_onsets) {
        Ok(report) => {
            if report.is_trivial() {
                info!(
                    "Only '{}' produced onsets; nothing to align against",
                    report.reference_channel
                );
            }
            Some(report)
        }
        Err(TimingError::DegenerateAlignment { channels }) => {
            warn!("No alignment: {} channels produced onsets", channels);
            None
        }
        Err(e) => return Err(e),
    };

    Ok(SessionReport {
        generated_at: Utc::now(),
        detector: config.detector,
        channels: analyses,
        failures,
        alignment,
    })
}
