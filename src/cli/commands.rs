//! CLI Command Implementations
//!
//! Builds the run configuration from flags, drives the analysis and
//! renders the results.

use std::fmt::Write as _;
use std::path::Path;

use log::info;

use crate::analysis::{
    analyze_channel, analyze_session, ChannelAnalysis, ChannelFailure, IntervalProfile,
    SessionReport, MIN_ONSETS_FOR_MEAN, MIN_ONSETS_FOR_STDDEV,
};
use crate::cli::{AnalyzeArgs, DetectorArgs, OutputFormat};
use crate::config::{AnalysisConfig, EmptyTrackPolicy};
use crate::engine::{discover_recordings, load_channel, load_channels};
use crate::error::Result;

/// Build the run configuration: defaults, then config file, then flags
pub fn build_config(args: &AnalyzeArgs) -> Result<AnalysisConfig> {
    let mut config = base_config(&args.detector)?;

    if let Some(input) = &args.input {
        config.discovery.input_dir = input.clone();
    }
    if let Some(extension) = &args.extension {
        config.discovery.extension = extension.clone();
    }
    if args.recursive {
        config.discovery.recursive = true;
    }
    if args.strict {
        config.empty_track_policy = EmptyTrackPolicy::Abort;
    }

    config.validate()?;
    Ok(config)
}

fn base_config(detector: &DetectorArgs) -> Result<AnalysisConfig> {
    let mut config = match &detector.config {
        Some(path) => AnalysisConfig::from_json_file(path)?,
        None => AnalysisConfig::default(),
    };
    if let Some(threshold) = detector.threshold {
        config.detector.amplitude_threshold = threshold;
    }
    if let Some(min_spacing) = detector.min_spacing {
        config.detector.min_spacing = min_spacing;
    }
    Ok(config)
}

/// Analyze every recording in the input folder.
pub fn analyze(args: &AnalyzeArgs) -> Result<()> {
    let config = build_config(args)?;
    info!(
        "Loading recordings from: {}",
        config.discovery.input_dir.display()
    );

    let discovery = discover_recordings(&config.discovery)?;
    let (channels, load_failures) = load_channels(&discovery.recordings);

    let mut report = analyze_session(&channels, &config)?;
    report.failures.extend(
        load_failures
            .iter()
            .map(|f| ChannelFailure::new(f.path.display().to_string(), &f.error)),
    );

    match args.format {
        OutputFormat::Text => print!("{}", format_text_report(&report)),
        OutputFormat::Json => println!("{}", report.to_json()?),
    }

    Ok(())
}

/// List the onsets of a single recording.
pub fn detect(file: &Path, detector: &DetectorArgs, reference: usize) -> Result<()> {
    let config = base_config(detector)?;
    info!("Detecting onsets in: {}", file.display());

    let channel = load_channel(file)?;
    let analysis = analyze_channel(&channel, &config.detector)?;

    println!("{}", analysis.channel);
    println!(
        "{} Hz, {} samples, {} notes",
        channel.sample_rate(),
        channel.len(),
        analysis.onsets.len()
    );
    let times = analysis.onset_times_from(reference);
    for (k, (index, time)) in analysis.onsets.indices().iter().zip(times).enumerate() {
        println!("Note #{}: sample {} at {} s", k + 1, index, time);
    }

    Ok(())
}

/// Render a session report as human-readable text
pub fn format_text_report(report: &SessionReport) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Using {} as volume threshold and {} samples as minimal note spacing.",
        report.detector.amplitude_threshold, report.detector.min_spacing
    );

    let _ = writeln!(out, "\n\tResults:\n\nDetected notes:");
    for analysis in &report.channels {
        write_notes(&mut out, analysis);
    }

    let _ = writeln!(out, "\n\tMachine timing:");
    match &report.alignment {
        Some(alignment) => {
            let _ = writeln!(
                out,
                "\nThe first channel is {}\nThe first note is {} s from the start of the file",
                alignment.reference_channel, alignment.reference_time
            );
            for offset in &alignment.offsets {
                let _ = writeln!(
                    out,
                    "\nThe next channel is {}\nThis channel is {} s later than the first channel",
                    offset.channel, offset.offset
                );
            }
        }
        None => {
            let _ = writeln!(out, "\nNo channel produced notes; nothing to compare.");
        }
    }

    let _ = writeln!(out, "\n\tChannel consistency:");
    for analysis in &report.channels {
        let _ = writeln!(out, "\nChannel: {}", analysis.channel);
        write_profile(&mut out, &analysis.profile);
    }

    if !report.failures.is_empty() {
        let _ = writeln!(out, "\n\tSkipped channels:\n");
        for failure in &report.failures {
            let _ = writeln!(out, "{}: {}", failure.channel, failure.message);
        }
    }

    out
}

fn write_notes(out: &mut String, analysis: &ChannelAnalysis) {
    let _ = writeln!(out, "\n{}", analysis.channel);
    for (k, time) in analysis.onset_times.iter().enumerate() {
        let _ = writeln!(out, "Note #{}: {} s", k + 1, time);
    }
}

fn write_profile(out: &mut String, profile: &IntervalProfile) {
    match profile.mean {
        Some(mean) => {
            let _ = writeln!(out, "The average note interval: {:.4}", mean);
        }
        None => {
            let _ = writeln!(
                out,
                "The average note interval: undefined (needs {} notes, found {})",
                MIN_ONSETS_FOR_MEAN, profile.onsets
            );
        }
    }
    match profile.stddev {
        Some(stddev) => {
            let _ = writeln!(out, "The standard deviation of the channel: {}", stddev);
        }
        None => {
            let _ = writeln!(
                out,
                "The standard deviation of the channel: undefined (needs {} notes, found {})",
                MIN_ONSETS_FOR_STDDEV, profile.onsets
            );
        }
    }
}
