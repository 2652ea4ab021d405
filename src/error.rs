//! Error handling for onset timing analysis
//!
//! Every error carries an error code and, where the user can act on it,
//! recovery suggestions for the CLI to print.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for onset timing operations
pub type Result<T> = std::result::Result<T, TimingError>;

/// Main error type for onset timing operations
#[derive(Error, Debug)]
pub enum TimingError {
    // Discovery Errors
    #[error("Input directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("No .{extension} files found in {path}")]
    NoInputFiles { path: PathBuf, extension: String },

    // File Errors
    #[error("File not found: {path}")]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Invalid audio file {path}: {reason}")]
    InvalidAudio {
        path: PathBuf,
        reason: String,
        #[source]
        source: Option<hound::Error>,
    },

    #[error("Unsupported audio format: {format}")]
    UnsupportedFormat { format: String },

    #[error("Invalid channel '{name}': {reason}")]
    InvalidChannel { name: String, reason: String },

    // Analysis Errors
    #[error(
        "Empty track '{channel}': no onsets with amplitude threshold {amplitude_threshold} \
         and minimum spacing {min_spacing} samples"
    )]
    EmptyTrack {
        channel: String,
        amplitude_threshold: u32,
        min_spacing: usize,
    },

    #[error("Insufficient onsets for statistics on '{channel}': need {required}, found {found}")]
    InsufficientOnsets {
        channel: String,
        required: usize,
        found: usize,
    },

    #[error("Invalid onset set: {reason}")]
    InvalidOnsetSet { reason: String },

    #[error("Cannot align {channels} channels")]
    DegenerateAlignment { channels: usize },

    // Configuration Errors
    #[error("Invalid configuration: {field} = {value} (expected {expected})")]
    InvalidConfig {
        field: String,
        value: String,
        expected: String,
    },

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl TimingError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            TimingError::DirectoryNotFound { .. } => "DIRECTORY_NOT_FOUND",
            TimingError::NoInputFiles { .. } => "NO_INPUT_FILES",
            TimingError::FileNotFound { .. } => "FILE_NOT_FOUND",
            TimingError::InvalidAudio { .. } => "INVALID_AUDIO",
            TimingError::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
            TimingError::InvalidChannel { .. } => "INVALID_CHANNEL",
            TimingError::EmptyTrack { .. } => "EMPTY_TRACK",
            TimingError::InsufficientOnsets { .. } => "INSUFFICIENT_ONSETS",
            TimingError::InvalidOnsetSet { .. } => "INVALID_ONSET_SET",
            TimingError::DegenerateAlignment { .. } => "DEGENERATE_ALIGNMENT",
            TimingError::InvalidConfig { .. } => "INVALID_CONFIG",
            TimingError::Io(_) => "IO_ERROR",
            TimingError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            TimingError::DirectoryNotFound { .. } => vec![
                "Create the input folder next to the program",
                "Pass a different folder with --input",
            ],
            TimingError::NoInputFiles { .. } => vec![
                "Put the recordings in the input folder",
                "Check the file extension with --extension",
            ],
            TimingError::InvalidAudio { .. } => vec![
                "Check if the file plays in another application",
                "The file may be corrupted - try re-exporting from source",
            ],
            TimingError::UnsupportedFormat { .. } => {
                vec!["Convert to 16-bit or 24-bit integer WAV"]
            }
            TimingError::EmptyTrack { .. } => vec![
                "Lower the amplitude threshold with --threshold",
                "Lower the minimum note spacing with --min-spacing",
                "Remove the silent recording from the input folder",
            ],
            TimingError::InsufficientOnsets { .. } => vec![
                "Record at least three notes per channel",
                "Lower the minimum note spacing if notes are being merged",
            ],
            _ => vec![],
        }
    }
}
