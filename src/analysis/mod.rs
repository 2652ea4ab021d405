//! Analysis Module
//!
//! The timing core:
//! - Onset detection (debounced amplitude-delta threshold)
//! - Sample-index to time conversion
//! - Inter-onset interval statistics
//! - Cross-channel alignment
//! - Session pipeline tying them together

pub mod align;
pub mod onset;
pub mod session;
pub mod stats;
pub mod timing;

pub use align::{align, AlignmentReport, ChannelOffset};
pub use onset::{detect_onsets, OnsetDetector, OnsetSet};
pub use session::{analyze_channel, analyze_session, ChannelAnalysis, ChannelFailure, SessionReport};
pub use stats::{IntervalProfile, MIN_ONSETS_FOR_MEAN, MIN_ONSETS_FOR_STDDEV};
pub use timing::{offsets_to_time, relative_indices, time_to_index, to_time};
