use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{ensure, Context, Result};
use tracing::debug;

/// Transcode `input` to a mono WAV at `sample_rate` inside `workspace`.
///
/// Delegated to ffmpeg so any container or codec it understands is accepted.
pub fn transcode_to_wav(input: &Path, workspace: &Path, sample_rate: u32) -> Result<PathBuf> {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("audio");
    let output = workspace.join(format!("{stem}_audio.wav"));
    debug!(input = %input.display(), output = %output.display(), "transcoding");

    let rendered = Command::new("ffmpeg")
        .arg("-nostdin")
        .arg("-y")
        .arg("-loglevel")
        .arg("error")
        .arg("-i")
        .arg(input)
        .arg("-ac")
        .arg("1")
        .arg("-ar")
        .arg(sample_rate.to_string())
        .arg(&output)
        .output()
        .with_context(|| format!("failed to run ffmpeg on {}", input.display()))?;
    ensure!(
        rendered.status.success(),
        "ffmpeg failed on {}: {}",
        input.display(),
        String::from_utf8_lossy(&rendered.stderr).trim()
    );
    Ok(output)
}

/// Check that ffmpeg can be spawned at all.
pub fn is_available() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}
