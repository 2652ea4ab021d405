//! Channel - one immutable recording
//!
//! A channel is built once from decoded samples and never modified
//! afterwards. Analysis only ever borrows its samples.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, TimingError};

/// Minimum number of samples a channel must hold to have a single delta
pub const MIN_CHANNEL_SAMPLES: usize = 2;

/// Where a channel's samples came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelSource {
    /// Path to the source recording
    pub path: PathBuf,
    /// Bits per sample in the source file
    pub bits_per_sample: u16,
    /// Channel count in the source file before downmixing
    pub source_channels: u16,
    /// SHA-256 checksum of the source file
    pub checksum: String,
}

/// One analyzed recording
#[derive(Debug, Clone)]
pub struct Channel {
    name: String,
    sample_rate: u32,
    samples: Vec<i32>,
    source: Option<ChannelSource>,
}

impl Channel {
    /// Create a channel from decoded samples
    ///
    /// # Errors
    /// * `InvalidChannel` - If `sample_rate` is zero or there are fewer than
    ///   two samples
    pub fn new(name: impl Into<String>, sample_rate: u32, samples: Vec<i32>) -> Result<Self> {
        let name = name.into();
        if sample_rate == 0 {
            return Err(TimingError::InvalidChannel {
                name,
                reason: "sample rate must be positive".to_string(),
            });
        }
        if samples.len() < MIN_CHANNEL_SAMPLES {
            return Err(TimingError::InvalidChannel {
                name,
                reason: format!(
                    "{} samples (at least {} required)",
                    samples.len(),
                    MIN_CHANNEL_SAMPLES
                ),
            });
        }
        Ok(Self {
            name,
            sample_rate,
            samples,
            source: None,
        })
    }

    /// Attach source file information
    pub fn with_source(mut self, source: ChannelSource) -> Self {
        self.source = Some(source);
        self
    }

    /// Channel identifier
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Samples per second
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Seconds per sample
    pub fn sample_period(&self) -> f64 {
        1.0 / self.sample_rate as f64
    }

    /// Amplitude samples
    pub fn samples(&self) -> &[i32] {
        &self.samples
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false for a constructed channel
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 * self.sample_period()
    }

    /// Source file information, if loaded from disk
    pub fn source(&self) -> Option<&ChannelSource> {
        self.source.as_ref()
    }
}

/// Derive a display name from a recording path
///
/// Uses the file stem with the first letter upper-cased and the rest
/// lower-cased, so `KICK_drum.wav` becomes `Kick_drum`.
pub fn channel_name_from_path(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut chars = stem.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
