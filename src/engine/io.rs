//! Recording discovery and WAV decoding
//!
//! Finds recordings in the input folder and decodes each one into a
//! [`Channel`] of integer samples. Integer WAVs keep their native scale so
//! the amplitude threshold is expressed in the file's own units. Float WAVs
//! are scaled to the 16-bit range. Multi-channel files are downmixed to mono.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use log::{debug, warn};
use sha2::{Digest, Sha256};
use walkdir::WalkDir;

use crate::config::DiscoveryConfig;
use crate::engine::channel::{channel_name_from_path, Channel, ChannelSource};
use crate::error::{Result, TimingError};

/// Scale applied to float samples so they share the 16-bit integer range
const FLOAT_TO_INT_SCALE: f32 = 32767.0;

/// Result of scanning the input folder
#[derive(Debug, Clone, Default)]
pub struct Discovery {
    /// Matching recordings, sorted by file name
    pub recordings: Vec<PathBuf>,
    /// Files that did not match the configured extension
    pub skipped: Vec<PathBuf>,
}

/// A recording that could not be turned into a channel
#[derive(Debug)]
pub struct LoadFailure {
    pub path: PathBuf,
    pub error: TimingError,
}

/// Find recordings in the configured folder
///
/// # Errors
/// * `DirectoryNotFound` - If the input folder does not exist
/// * `NoInputFiles` - If no file matches the configured extension
pub fn discover_recordings(config: &DiscoveryConfig) -> Result<Discovery> {
    let dir = &config.input_dir;
    if !dir.is_dir() {
        return Err(TimingError::DirectoryNotFound { path: dir.clone() });
    }

    let extension = config.extension.trim_start_matches('.');
    let max_depth = if config.recursive { usize::MAX } else { 1 };

    let mut discovery = Discovery::default();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(max_depth)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        if has_extension(entry.path(), extension) {
            discovery.recordings.push(entry.into_path());
        } else {
            warn!(
                "Only .{} files are analyzed, skipping {}",
                extension,
                entry.path().display()
            );
            discovery.skipped.push(entry.into_path());
        }
    }

    if discovery.recordings.is_empty() {
        return Err(TimingError::NoInputFiles {
            path: dir.clone(),
            extension: extension.to_string(),
        });
    }

    debug!(
        "Discovered {} recordings ({} skipped) in {}",
        discovery.recordings.len(),
        discovery.skipped.len(),
        dir.display()
    );
    Ok(discovery)
}

/// Decode every discovered recording
///
/// Files that fail to decode are returned as [`LoadFailure`]s and the rest
/// are still loaded.
pub fn load_channels(recordings: &[PathBuf]) -> (Vec<Channel>, Vec<LoadFailure>) {
    let mut channels = Vec::with_capacity(recordings.len());
    let mut failures = Vec::new();

    for path in recordings {
        match load_channel(path) {
            Ok(channel) => channels.push(channel),
            Err(error) => {
                warn!("Failed to load {}: {}", path.display(), error);
                failures.push(LoadFailure {
                    path: path.clone(),
                    error,
                });
            }
        }
    }

    (channels, failures)
}

/// Decode a single WAV recording into a channel
///
/// # Errors
/// * `FileNotFound` - If the file does not exist
/// * `InvalidAudio` - If the file is not a readable WAV file
/// * `UnsupportedFormat` - If the sample encoding cannot be read as integers
/// * `InvalidChannel` - If the file holds fewer than two frames
pub fn load_channel(path: &Path) -> Result<Channel> {
    if !path.exists() {
        return Err(TimingError::FileNotFound {
            path: path.to_path_buf(),
            source: None,
        });
    }

    let reader = WavReader::open(path).map_err(|e| TimingError::InvalidAudio {
        path: path.to_path_buf(),
        reason: "failed to open WAV file".to_string(),
        source: Some(e),
    })?;

    let spec = reader.spec();
    let interleaved = read_samples_as_i32(reader, path, spec)?;
    let samples = downmix(&interleaved, spec.channels as usize, path)?;

    let source = ChannelSource {
        path: path.to_path_buf(),
        bits_per_sample: spec.bits_per_sample,
        source_channels: spec.channels,
        checksum: calculate_checksum(path)?,
    };

    let name = channel_name_from_path(path);
    debug!(
        "Loaded '{}': {} samples at {} Hz ({}-bit, {} ch)",
        name,
        samples.len(),
        spec.sample_rate,
        spec.bits_per_sample,
        spec.channels
    );

    Ok(Channel::new(name, spec.sample_rate, samples)?.with_source(source))
}

/// Write mono samples as a 16-bit WAV file
///
/// Samples outside the 16-bit range are clamped.
pub fn write_channel_wav(path: &Path, sample_rate: u32, samples: &[i32]) -> Result<()> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path, spec).map_err(|e| wav_write_error(path, e))?;
    for &sample in samples {
        let clamped = sample.clamp(i16::MIN as i32, i16::MAX as i32) as i16;
        writer
            .write_sample(clamped)
            .map_err(|e| wav_write_error(path, e))?;
    }
    writer.finalize().map_err(|e| wav_write_error(path, e))?;

    Ok(())
}

// ============================================================================
// Internal helper functions
// ============================================================================

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case(extension))
        .unwrap_or(false)
}

/// Read interleaved samples as integers in the file's native scale
fn read_samples_as_i32<R: std::io::Read>(
    mut reader: WavReader<R>,
    path: &Path,
    spec: WavSpec,
) -> Result<Vec<i32>> {
    let read_error = |e: hound::Error| TimingError::InvalidAudio {
        path: path.to_path_buf(),
        reason: format!("failed to read {}-bit samples", spec.bits_per_sample),
        source: Some(e),
    };

    match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Int, 8..=32) => reader
            .samples::<i32>()
            .collect::<std::result::Result<Vec<i32>, _>>()
            .map_err(read_error),
        (SampleFormat::Float, 32) => reader
            .samples::<f32>()
            .map(|s| s.map(float_to_int))
            .collect::<std::result::Result<Vec<i32>, _>>()
            .map_err(read_error),
        (format, bits) => Err(TimingError::UnsupportedFormat {
            format: format!("{}-bit {:?} audio", bits, format),
        }),
    }
}

fn float_to_int(sample: f32) -> i32 {
    (sample * FLOAT_TO_INT_SCALE)
        .round()
        .clamp(i16::MIN as f32, i16::MAX as f32) as i32
}

/// Average each interleaved frame down to one sample
///
/// Fails with `InvalidAudio` if the samples do not fill a whole number of frames.
fn downmix(interleaved: &[i32], channels: usize, path: &Path) -> Result<Vec<i32>> {
    match channels {
        0 => Err(TimingError::UnsupportedFormat {
            format: "0-channel audio".to_string(),
        }),
        1 => Ok(interleaved.to_vec()),
        n if interleaved.len() % n != 0 => Err(TimingError::InvalidAudio {
            path: path.to_path_buf(),
            reason: format!(
                "{} trailing samples do not fill a {}-channel frame",
                interleaved.len() % n,
                n
            ),
            source: None,
        }),
        n => Ok(interleaved
            .chunks_exact(n)
            .map(|frame| {
                let sum: i64 = frame.iter().map(|&s| s as i64).sum();
                (sum / n as i64) as i32
            })
            .collect()),
    }
}

fn calculate_checksum(path: &Path) -> Result<String> {
    let mut file = fs::File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

fn wav_write_error(path: &Path, e: hound::Error) -> TimingError {
    match e {
        hound::Error::IoError(io) => TimingError::Io(io),
        other => TimingError::InvalidAudio {
            path: path.to_path_buf(),
            reason: "failed to write WAV file".to_string(),
            source: Some(other),
        },
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_float_wav(path: &Path, channels: u16, samples: &[f32]) {
        let spec = WavSpec {
            channels,
            sample_rate: 8000,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        let mut writer = WavWriter::create(path, spec).unwrap();
        for &s in samples {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn test_write_and_load_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bass.wav");
        let samples = vec![0, 0, 0, 600, 600, 0, 0, 0, 700, 700];

        write_channel_wav(&path, 44100, &samples).unwrap();
        let channel = load_channel(&path).unwrap();

        assert_eq!(channel.name(), "Bass");
        assert_eq!(channel.sample_rate(), 44100);
        assert_eq!(channel.samples(), samples.as_slice());

        let source = channel.source().unwrap();
        assert_eq!(source.bits_per_sample, 16);
        assert_eq!(source.source_channels, 1);
        assert_eq!(source.checksum.len(), 64);
    }

    #[test]
    fn test_write_clamps_to_16_bit() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("loud.wav");

        write_channel_wav(&path, 8000, &[100_000, -100_000]).unwrap();
        let channel = load_channel(&path).unwrap();

        assert_eq!(channel.samples(), &[32767, -32768]);
    }

    #[test]
    fn test_float_wav_scaled_to_16_bit() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("float.wav");
        write_float_wav(&path, 1, &[0.0, 0.5, -1.0, 2.0]);

        let channel = load_channel(&path).unwrap();
        assert_eq!(channel.samples(), &[0, 16384, -32767, 32767]);
    }

    #[test]
    fn test_stereo_downmixed_to_mono() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stereo.wav");
        // L/R pairs: (0, 0.5), (1.0, 0.0)
        write_float_wav(&path, 2, &[0.0, 0.5, 1.0, 0.0]);

        let channel = load_channel(&path).unwrap();
        assert_eq!(channel.len(), 2);
        assert_eq!(channel.samples(), &[8192, 16383]);
        assert_eq!(channel.source().unwrap().source_channels, 2);
    }

    #[test]
    fn test_downmix_integer_average() {
        let path = Path::new("mix.wav");
        assert_eq!(downmix(&[10, 20, -5, -6], 2, path).unwrap(), vec![15, -5]);
        assert_eq!(downmix(&[1, 2, 3], 1, path).unwrap(), vec![1, 2, 3]);
        assert!(downmix(&[1, 2], 0, path).is_err());
    }

    #[test]
    fn test_downmix_rejects_partial_frame() {
        let err = downmix(&[1, 2, 3], 2, Path::new("cut.wav")).unwrap_err();
        match &err {
            TimingError::InvalidAudio { path, reason, .. } => {
                assert_eq!(path, Path::new("cut.wav"));
                assert!(reason.contains("1 trailing samples"));
            }
            other => panic!("Expected InvalidAudio error, got: {:?}", other),
        }
        assert_eq!(err.error_code(), "INVALID_AUDIO");
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = load_channel(Path::new("/nonexistent/path/audio.wav"));
        match result.unwrap_err() {
            TimingError::FileNotFound { path, .. } => {
                assert!(path.to_string_lossy().contains("nonexistent"));
            }
            other => panic!("Expected FileNotFound error, got: {:?}", other),
        }
    }

    #[test]
    fn test_load_invalid_wav() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.wav");
        fs::write(&path, b"not a wav file").unwrap();

        let err = load_channel(&path).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_AUDIO");
    }

    #[test]
    fn test_discover_sorted_and_filtered() {
        let dir = tempdir().unwrap();
        for name in ["snare.wav", "Kick.WAV", "notes.txt", "bass.wav"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested").join("tom.wav"), b"").unwrap();

        let config = DiscoveryConfig {
            input_dir: dir.path().to_path_buf(),
            ..DiscoveryConfig::default()
        };
        let discovery = discover_recordings(&config).unwrap();

        let names: Vec<String> = discovery
            .recordings
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["Kick.WAV", "bass.wav", "snare.wav"]);
        assert_eq!(discovery.skipped.len(), 1);
    }

    #[test]
    fn test_discover_recursive() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("bass.wav"), b"").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested").join("tom.wav"), b"").unwrap();

        let config = DiscoveryConfig {
            input_dir: dir.path().to_path_buf(),
            recursive: true,
            ..DiscoveryConfig::default()
        };
        let discovery = discover_recordings(&config).unwrap();
        assert_eq!(discovery.recordings.len(), 2);
    }

    #[test]
    fn test_discover_missing_directory() {
        let config = DiscoveryConfig {
            input_dir: PathBuf::from("/nonexistent/input_files"),
            ..DiscoveryConfig::default()
        };
        let err = discover_recordings(&config).unwrap_err();
        assert_eq!(err.error_code(), "DIRECTORY_NOT_FOUND");
    }

    #[test]
    fn test_discover_no_matching_files() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("readme.md"), b"").unwrap();

        let config = DiscoveryConfig {
            input_dir: dir.path().to_path_buf(),
            ..DiscoveryConfig::default()
        };
        match discover_recordings(&config).unwrap_err() {
            TimingError::NoInputFiles { extension, .. } => assert_eq!(extension, "wav"),
            other => panic!("Expected NoInputFiles, got: {:?}", other),
        }
    }

    #[test]
    fn test_load_channels_keeps_going_after_failure() {
        let dir = tempdir().unwrap();
        let good = dir.path().join("good.wav");
        let bad = dir.path().join("bad.wav");
        write_channel_wav(&good, 8000, &[0, 1000, 0]).unwrap();
        fs::write(&bad, b"garbage").unwrap();

        let (channels, failures) = load_channels(&[bad.clone(), good]);
        assert_eq!(channels.len(), 1);
        assert_eq!(channels[0].name(), "Good");
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].path, bad);
    }

    #[test]
    fn test_load_channels_reports_missing_file() {
        let dir = tempdir().unwrap();
        let good = dir.path().join("good.wav");
        let missing = dir.path().join("missing.wav");
        write_channel_wav(&good, 8000, &[0, 1000, 0]).unwrap();

        let (channels, failures) = load_channels(&[missing.clone(), good]);
        assert_eq!(channels.len(), 1);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].path, missing);
        assert_eq!(failures[0].error.error_code(), "FILE_NOT_FOUND");
    }
}
