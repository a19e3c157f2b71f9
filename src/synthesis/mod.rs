//! Text-to-speech synthesis via the external espeak-ng engine.
//!
//! Fragments are synthesised one at a time and concatenated, which yields
//! the anchor (start time of each fragment within the narration) for free.

use std::path::Path;
use std::process::Command;

use anyhow::{ensure, Context, Result};
use tracing::debug;

use crate::audio::{decoder, resample};
use crate::text::TextFragment;

/// Synthesised narration of one text file.
#[derive(Debug, Clone)]
pub struct SynthesizedText {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    /// Start of each fragment within `samples`, in seconds.
    pub anchors_seconds: Vec<f64>,
}

/// Driver for the external synthesiser.
#[derive(Debug, Clone)]
pub struct Synthesizer {
    voice: String,
    sample_rate: u32,
}

impl Synthesizer {
    pub fn new(voice: impl Into<String>, sample_rate: u32) -> Self {
        Self {
            voice: voice.into(),
            sample_rate,
        }
    }

    /// Check that espeak-ng can be spawned at all.
    pub fn is_available() -> bool {
        Command::new("espeak-ng")
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    /// Synthesise every fragment in order, recording where each one starts.
    pub fn synthesize(
        &self,
        fragments: &[TextFragment],
        workspace: &Path,
    ) -> Result<SynthesizedText> {
        let mut samples = Vec::new();
        let mut anchors_seconds = Vec::with_capacity(fragments.len());

        for (index, fragment) in fragments.iter().enumerate() {
            anchors_seconds.push(samples.len() as f64 / self.sample_rate as f64);

            let wav_path = workspace.join(format!("fragment_{index:05}.wav"));
            self.synthesize_fragment(&fragment.text, &wav_path)
                .with_context(|| format!("failed to synthesise fragment '{}'", fragment.id))?;

            let audio = decoder::decode_audio(&wav_path)?;
            let resampled = resample::to_rate(&audio.samples, audio.sample_rate, self.sample_rate)?;
            samples.extend_from_slice(&resampled);
        }
        debug!(
            fragments = fragments.len(),
            seconds = samples.len() as f64 / self.sample_rate as f64,
            "synthesis finished"
        );

        Ok(SynthesizedText {
            samples,
            sample_rate: self.sample_rate,
            anchors_seconds,
        })
    }

    fn synthesize_fragment(&self, text: &str, output: &Path) -> Result<()> {
        let rendered = Command::new("espeak-ng")
            .arg("-v")
            .arg(&self.voice)
            .arg("-w")
            .arg(output)
            .arg(text)
            .output()
            .context("failed to run espeak-ng")?;
        ensure!(
            rendered.status.success(),
            "espeak-ng failed: {}",
            String::from_utf8_lossy(&rendered.stderr).trim()
        );
        Ok(())
    }
}
