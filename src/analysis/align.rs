//! Cross-channel alignment of first onsets
//!
//! The channel whose first onset comes earliest becomes the reference.
//! Every other channel is reported by how much later its first onset is,
//! in ascending order. Ties keep input order, both when picking the
//! reference and when ordering offsets, so output is deterministic.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TimingError};

/// Offset of one channel's first onset from the reference channel's
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelOffset {
    pub channel: String,
    /// First onset time in seconds from the start of the recording
    pub first_onset: f64,
    /// Seconds after the reference channel's first onset (never negative)
    pub offset: f64,
}

/// Cross-channel timing result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentReport {
    /// Channel with the earliest first onset
    pub reference_channel: String,
    /// First onset time of the reference channel in seconds
    pub reference_time: f64,
    /// Every other channel, ascending by offset
    pub offsets: Vec<ChannelOffset>,
}

impl AlignmentReport {
    /// True when only the reference channel was available
    pub fn is_trivial(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Look up the offset for a channel; the reference has offset zero
    pub fn offset_of(&self, channel: &str) -> Option<f64> {
        if channel == self.reference_channel {
            return Some(0.0);
        }
        self.offsets
            .iter()
            .find(|o| o.channel == channel)
            .map(|o| o.offset)
    }
}

/// Align channels by their first onset time
///
/// A single channel yields a reference-only report with no offsets.
///
/// # Errors
/// * `DegenerateAlignment` - If `first_onsets` is empty
pub fn align<S: AsRef<str>>(first_onsets: &[(S, f64)]) -> Result<AlignmentReport> {
    let (reference_pos, reference_time) = first_onsets
        .iter()
        .enumerate()
        .map(|(pos, (_, time))| (pos, *time))
        .reduce(|best, candidate| if candidate.1 < best.1 { candidate } else { best })
        .ok_or(TimingError::DegenerateAlignment { channels: 0 })?;

    let mut offsets: Vec<ChannelOffset> = first_onsets
        .iter()
        .enumerate()
        .filter(|(pos, _)| *pos != reference_pos)
        .map(|(_, (name, time))| ChannelOffset {
            channel: name.as_ref().to_string(),
            first_onset: *time,
            offset: time - reference_time,
        })
        .collect();

    // sort_by is stable
    offsets.sort_by(|a, b| a.offset.total_cmp(&b.offset));

    Ok(AlignmentReport {
        reference_channel: first_onsets[reference_pos].0.as_ref().to_string(),
        reference_time,
        offsets,
    })
}
