//! Sample-index to time conversion

/// Convert onset sample-indices to seconds
pub fn to_time(onset_indices: &[usize], sample_period: f64) -> Vec<f64> {
    onset_indices
        .iter()
        .map(|&index| index as f64 * sample_period)
        .collect()
}

/// Express onset indices relative to `reference_index`
///
/// Indices before the reference come out negative.
pub fn relative_indices(onset_indices: &[usize], reference_index: usize) -> Vec<i64> {
    onset_indices
        .iter()
        .map(|&index| index as i64 - reference_index as i64)
        .collect()
}

/// Convert signed sample offsets to seconds
pub fn offsets_to_time(offsets: &[i64], sample_period: f64) -> Vec<f64> {
    offsets
        .iter()
        .map(|&offset| offset as f64 * sample_period)
        .collect()
}

/// Nearest sample-index for a time in seconds
pub fn time_to_index(time: f64, sample_period: f64) -> usize {
    (time / sample_period).round().max(0.0) as usize
}
