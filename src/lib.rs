//! Onset Timing - multitrack note onset and timing analysis
//!
//! Given a folder of recordings of independently played channels that share
//! a clock, finds where each channel's notes start and measures:
//! 1. The offset between channels' first notes, earliest first
//! 2. Each channel's timing consistency (mean and spread of note intervals)
//!
//! # Architecture
//!
//! - `engine`: recording discovery and WAV decoding into immutable channels
//! - `analysis`: onset detection, timing conversion, interval statistics,
//!   alignment, and the session pipeline
//! - `cli`: command-line front end

pub mod analysis;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;

pub use analysis::{
    align, analyze_channel, analyze_session, AlignmentReport, ChannelAnalysis, IntervalProfile,
    OnsetDetector, OnsetSet, SessionReport,
};
pub use config::{AnalysisConfig, DetectorConfig, DiscoveryConfig, EmptyTrackPolicy};
pub use engine::{Channel, ChannelSource};
pub use error::{Result, TimingError};
