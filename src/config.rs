//! Analysis configuration
//!
//! All tunables travel as an explicit [`AnalysisConfig`] value. It can be
//! loaded from a JSON file and then overridden from the command line.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, TimingError};

/// Default sample-to-sample amplitude jump that counts as an onset
pub const DEFAULT_AMPLITUDE_THRESHOLD: u32 = 254;

/// Default number of samples that must separate two accepted onsets
pub const DEFAULT_MIN_SPACING: usize = 10_000;

/// Default folder scanned for recordings
pub const DEFAULT_INPUT_DIR: &str = "input_files";

/// Default recording file extension
pub const DEFAULT_EXTENSION: &str = "wav";

/// Onset detector parameters, fixed for the whole run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Minimum absolute difference between consecutive samples
    pub amplitude_threshold: u32,
    /// Debounce window in samples
    pub min_spacing: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            amplitude_threshold: DEFAULT_AMPLITUDE_THRESHOLD,
            min_spacing: DEFAULT_MIN_SPACING,
        }
    }
}

impl DetectorConfig {
    /// Create a detector configuration
    pub fn new(amplitude_threshold: u32, min_spacing: usize) -> Self {
        Self {
            amplitude_threshold,
            min_spacing,
        }
    }
}

/// Where and how recordings are discovered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Folder containing one recording per channel
    pub input_dir: PathBuf,
    /// File extension to accept, without the dot (case-insensitive)
    pub extension: String,
    /// Descend into subfolders
    pub recursive: bool,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            extension: DEFAULT_EXTENSION.to_string(),
            recursive: false,
        }
    }
}

/// What to do when a channel yields zero onsets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyTrackPolicy {
    /// Report the channel and leave it out of alignment
    #[default]
    Skip,
    /// Fail the whole run
    Abort,
}

/// Full configuration for one analysis run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub detector: DetectorConfig,
    pub discovery: DiscoveryConfig,
    pub empty_track_policy: EmptyTrackPolicy,
}

impl AnalysisConfig {
    /// Load a configuration from a JSON file. Missing fields take defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => TimingError::FileNotFound {
                path: path.to_path_buf(),
                source: Some(e),
            },
            _ => TimingError::Io(e),
        })?;
        let config: AnalysisConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration for values the pipeline cannot use
    pub fn validate(&self) -> Result<()> {
        let ext = self.discovery.extension.trim_start_matches('.');
        if ext.is_empty() {
            return Err(TimingError::InvalidConfig {
                field: "discovery.extension".to_string(),
                value: format!("{:?}", self.discovery.extension),
                expected: "a non-empty file extension".to_string(),
            });
        }
        Ok(())
    }
}
