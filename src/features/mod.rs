//! MFCC feature extraction for the alignment engine.

mod mel;

use anyhow::{ensure, Result};
use ndarray::Array2;

use crate::audio::resample;

pub use mel::ANALYSIS_SAMPLE_RATE;

/// Turns mono PCM into the feature matrix consumed by the alignment engine.
#[derive(Debug, Default)]
pub struct FeatureExtractor {}

impl FeatureExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// One feature row per 40 ms of audio, first MFCC coefficient dropped.
    pub fn extract(&self, samples: &[f32], sample_rate: u32) -> Result<Array2<f64>> {
        ensure!(sample_rate > 0, "sample rate must be positive");
        let mono = resample::to_rate(samples, sample_rate, ANALYSIS_SAMPLE_RATE)?;

        let frames = mel::mfcc_frames(&mono);
        let coeffs = mel::MFCC_COUNT - 1;
        let mut flat = Vec::with_capacity(frames.len() * coeffs);
        for frame in &frames {
            ensure!(
                frame.len() == mel::MFCC_COUNT,
                "unexpected MFCC frame width {}",
                frame.len()
            );
            flat.extend_from_slice(&frame[1..]);
        }
        let matrix = Array2::from_shape_vec((frames.len(), coeffs), flat)?;
        Ok(matrix)
    }
}
