//! VSplit command-line binary.

mod cli;
mod config_file;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use vsplit_jobs::{JobSettings, Orchestrator};
use vsplit_media::{check_ffmpeg, check_ffprobe, FfmpegEngine, MediaEngine};
use vsplit_models::{
    build_segment_specs, format_bytes, format_duration, parse_duration, plan_segments,
    JobStatus, OutputFormat, QualityPreset, SplitConfig,
};

use cli::{Cli, Commands, SplitArgs};

/// Poll interval while waiting for a job to finish.
const POLL_INTERVAL: Duration = Duration::from_millis(500);

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("vsplit={}", cli.log_level()))),
        )
        .init();

    match cli.command {
        Commands::Split(args) => split(args).await,
        Commands::Probe { input } => probe(&input).await,
        Commands::CheckTools => check_tools().await,
    }
}

/// Run a split job and poll it to completion.
async fn split(args: SplitArgs) -> Result<()> {
    let config = build_config(&args)?;

    if let Some(path) = &args.save_config {
        config_file::save(&config, path)?;
        println!("Configuration saved to: {}", path.display());
    }

    println!("Input file: {}", config.source_path.display());
    println!("Output directory: {}", config.output_dir.display());
    println!("Max segment length: {}s", config.max_segment_secs);
    if let Some(intro) = &config.intro_path {
        println!("Intro: {}", intro.display());
    }
    if let Some(outro) = &config.outro_path {
        println!("Outro: {}", outro.display());
    }

    let engine = Arc::new(
        FfmpegEngine::new()
            .context("FFmpeg not available. Install it and ensure it is on PATH")?,
    );

    if args.dry_run {
        return print_plan(engine, &config).await;
    }

    let orchestrator = Orchestrator::new(engine, JobSettings::default());
    let job_id = orchestrator
        .submit(config)
        .await
        .context("Failed to submit job")?;

    // Pull-based progress: poll the job snapshot until terminal.
    let mut last_progress = None;
    let job = loop {
        tokio::time::sleep(POLL_INTERVAL).await;
        let job = orchestrator
            .status(&job_id)
            .context("Job disappeared from the store")?;

        if last_progress != Some(job.progress) {
            println!("[{:3}%] {}", job.progress, job.message);
            last_progress = Some(job.progress);
        }
        if job.is_terminal() {
            break job;
        }
    };

    match job.status {
        JobStatus::Completed => {
            println!();
            println!("Processing complete! Created {} segments:", job.output_files.len());
            for name in &job.output_files {
                println!("  {}", job.output_dir.join(name).display());
            }
            Ok(())
        }
        _ => bail!(
            "Processing failed: {}",
            job.error_message.unwrap_or_else(|| job.message.clone())
        ),
    }
}

/// Print the deterministic segment plan without processing.
async fn print_plan(engine: Arc<dyn MediaEngine>, config: &SplitConfig) -> Result<()> {
    config.validate()?;
    let metadata = engine.probe(&config.source_path).await?;
    let ranges = plan_segments(metadata.duration, config.max_segment_secs)?;
    let date = Utc::now().format("%Y%m%d").to_string();
    let specs = build_segment_specs(config, &ranges, &date)?;

    println!();
    println!(
        "Source duration {} -> {} segments:",
        format_duration(metadata.duration),
        specs.len()
    );
    for spec in &specs {
        println!(
            "  {:>3}. [{:>9.2}s - {:>9.2}s] {}",
            spec.index, spec.range.start_secs, spec.range.end_secs, spec.file_name
        );
    }
    Ok(())
}

/// Probe a file and print its metadata.
async fn probe(input: &Path) -> Result<()> {
    let engine = FfmpegEngine::new()
        .context("FFprobe not available. Install FFmpeg and ensure it is on PATH")?;
    let metadata = engine.probe(input).await?;

    println!("Duration: {}", format_duration(metadata.duration));
    println!("Resolution: {}x{}", metadata.width, metadata.height);
    println!("Frame rate: {:.3} fps", metadata.fps);
    println!("Video codec: {}", metadata.video_codec);
    println!(
        "Audio codec: {}",
        metadata.audio_codec.as_deref().unwrap_or("none")
    );
    if metadata.size > 0 {
        println!("Size: {}", format_bytes(metadata.size));
    }
    Ok(())
}

/// Check the external engine binaries.
async fn check_tools() -> Result<()> {
    match check_ffmpeg() {
        Ok(path) => {
            println!("ffmpeg: {}", path.display());
            if let Some(version) = tool_version("ffmpeg").await {
                println!("  {}", version);
            }
        }
        Err(_) => println!("ffmpeg: NOT FOUND - install from https://ffmpeg.org/download.html"),
    }
    match check_ffprobe() {
        Ok(path) => println!("ffprobe: {}", path.display()),
        Err(_) => println!("ffprobe: NOT FOUND - install from https://ffmpeg.org/download.html"),
    }
    Ok(())
}

/// First line of `<tool> -version`, if the tool runs.
async fn tool_version(tool: &str) -> Option<String> {
    let output = tokio::process::Command::new(tool)
        .arg("-version")
        .output()
        .await
        .ok()?;
    let text = String::from_utf8_lossy(&output.stdout);
    text.lines().next().map(str::to_string)
}

/// Build the effective configuration from a config file or CLI options.
fn build_config(args: &SplitArgs) -> Result<SplitConfig> {
    if let Some(path) = &args.config {
        println!("Loading configuration from: {}", path.display());
        return config_file::load(path);
    }

    let max_segment_secs = parse_duration(&args.max_length)
        .with_context(|| format!("Invalid --max-length value '{}'", args.max_length))?;
    let output_format = OutputFormat::from_extension(&args.format)
        .with_context(|| format!("Unsupported --format value '{}'", args.format))?;
    let quality = parse_quality(&args.quality)?;

    Ok(SplitConfig {
        source_path: args.input.clone(),
        output_dir: args.output_dir.clone(),
        max_segment_secs,
        output_format,
        naming_pattern: args.naming_pattern.clone(),
        quality,
        intro_path: args.intro.clone(),
        outro_path: args.outro.clone(),
        threads: args.threads,
    })
}

fn parse_quality(value: &str) -> Result<QualityPreset> {
    match value.to_lowercase().as_str() {
        "high" => Ok(QualityPreset::High),
        "medium" => Ok(QualityPreset::Medium),
        "low" => Ok(QualityPreset::Low),
        other => bail!("Unsupported --quality value '{}' (high, medium, low)", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split_args(input: &str) -> SplitArgs {
        SplitArgs {
            input: input.into(),
            output_dir: "./segments".into(),
            max_length: "20m".to_string(),
            intro: None,
            outro: None,
            format: "mkv".to_string(),
            naming_pattern: "{title}_part{index:02d}_{date}".to_string(),
            quality: "medium".to_string(),
            threads: 4,
            config: None,
            save_config: None,
            dry_run: false,
        }
    }

    #[test]
    fn test_build_config_from_args() {
        let config = build_config(&split_args("in.mp4")).unwrap();
        assert_eq!(config.max_segment_secs, 1200);
        assert_eq!(config.output_format, OutputFormat::Mkv);
        assert_eq!(config.quality, QualityPreset::Medium);
    }

    #[test]
    fn test_bad_max_length_rejected() {
        let mut args = split_args("in.mp4");
        args.max_length = "twenty minutes".to_string();
        assert!(build_config(&args).is_err());
    }

    #[test]
    fn test_bad_quality_rejected() {
        assert!(parse_quality("ultra").is_err());
        assert_eq!(parse_quality("HIGH").unwrap(), QualityPreset::High);
    }
}
