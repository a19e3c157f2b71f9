use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use narralign::types::{AlignConfig, OutputFormat};
use tracing_subscriber::EnvFilter;

/// Narralign - text/audio forced alignment
///
/// Aligns a directory of XHTML text files against a directory of audio
/// narrations and emits an EPUB3 media-overlay sync map.
#[derive(Parser, Debug)]
#[command(name = "narralign")]
#[command(version = "0.1.0")]
#[command(about = "Text/audio forced alignment", long_about = None)]
struct Args {
    /// Directory of XHTML text files (fragment ids f0001, f0002, ...)
    #[arg(value_name = "TEXT_DIR")]
    text_dir: PathBuf,

    /// Directory of narrated audio files (any format ffmpeg accepts)
    #[arg(value_name = "AUDIO_DIR")]
    audio_dir: PathBuf,

    /// Directory to write one sync-map file per text file
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Output format for written sync-map files
    #[arg(long, value_enum, default_value = "smil")]
    format: OutputFormat,

    /// Per-frame cost of skipping unmatched content (higher = more permissive)
    #[arg(long, default_value_t = 0.75)]
    skip_penalty: f64,

    /// Multi-resolution search radius in frames
    #[arg(long, default_value_t = 100)]
    radius: usize,

    /// Path prefix prepended to text file names in the sync map
    #[arg(long, value_name = "PREFIX", default_value = "")]
    text_prefix: String,

    /// Path prefix prepended to audio file names in the sync map
    #[arg(long, value_name = "PREFIX", default_value = "")]
    audio_prefix: String,

    /// Emit JSON times as raw seconds instead of H:MM:SS.mmm
    #[arg(long)]
    times_as_seconds: bool,

    /// espeak-ng voice used for synthesis
    #[arg(long, default_value = "en")]
    voice: String,
}

impl Args {
    /// Validate command-line arguments
    fn validate(&self) -> Result<()> {
        if !self.text_dir.is_dir() {
            anyhow::bail!("Text path is not a directory: {:?}", self.text_dir);
        }

        if !self.audio_dir.is_dir() {
            anyhow::bail!("Audio path is not a directory: {:?}", self.audio_dir);
        }

        if self.skip_penalty < 0.0 {
            anyhow::bail!(
                "Skip penalty must be non-negative, got: {}",
                self.skip_penalty
            );
        }

        if let Some(dir) = &self.output_dir {
            if dir.exists() && !dir.is_dir() {
                anyhow::bail!("Output path must be a directory: {:?}", dir);
            }
        }

        Ok(())
    }

    fn to_config(&self) -> AlignConfig {
        let mut config = AlignConfig::new(&self.text_dir, &self.audio_dir)
            .with_skip_penalty(self.skip_penalty)
            .with_radius(self.radius)
            .with_path_prefixes(&self.text_prefix, &self.audio_prefix)
            .with_times_as_seconds(self.times_as_seconds)
            .with_voice(&self.voice);
        if let Some(dir) = &self.output_dir {
            config = config.with_output(dir, self.format);
        }
        config
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    run(Args::parse())
}

fn run(args: Args) -> Result<()> {
    args.validate()
        .context("Failed to validate command-line arguments")?;
    let config = args.to_config();

    let sync_map = narralign::align(&config)?;
    if sync_map.is_empty() {
        println!("No alignment produced.");
        return Ok(());
    }

    for (text_file, fragments) in sync_map.files() {
        println!("{text_file}: {} fragments mapped", fragments.len());
    }
    Ok(())
}
