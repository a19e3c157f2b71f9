//! narralign - forced alignment of narrated audio with XHTML text.
//!
//! Takes a directory of text files and a directory of audio files narrating
//! the same work, and produces a sync map: for every labelled text fragment,
//! the audio file and time interval in which it is spoken. The text does not
//! have to split the same way the audio does; the coordinator carries
//! unmatched tails from file to file on both sides.

pub mod audio;
pub mod dtw;
pub mod features;
pub mod output;
pub mod sync;
pub mod synthesis;
pub mod text;
pub mod types;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{ensure, Context, Result};
use tempfile::TempDir;
use tracing::{debug, info};

use crate::features::FeatureExtractor;
use crate::sync::timing::seconds_to_frame;
use crate::sync::{build_sync_map, AlignmentParams, AudioTrack, TextTrack};
use crate::synthesis::Synthesizer;
use crate::types::{prefixed_name, AlignConfig, SyncMap};

/// Align every text file in `config.text_dir` with the audio narrating it.
///
/// Files on both sides are consumed in lexicographic order. Returns the sync
/// map; when `config.output_dir` is set, also writes one SMIL or JSON file
/// per text file. The temporary workspace holding synthesised and transcoded
/// WAVs is removed on every exit path.
pub fn align(config: &AlignConfig) -> Result<SyncMap> {
    ensure!(
        config.text_dir.is_dir(),
        "text directory {} does not exist",
        config.text_dir.display()
    );
    ensure!(
        config.audio_dir.is_dir(),
        "audio directory {} does not exist",
        config.audio_dir.display()
    );
    ensure!(
        Synthesizer::is_available(),
        "espeak-ng was not found on PATH; it is required to synthesise text"
    );
    ensure!(
        audio::transcoder::is_available(),
        "ffmpeg was not found on PATH; it is required to decode audio"
    );

    let workspace = match &config.output_dir {
        Some(dir) => {
            fs::create_dir_all(dir)
                .with_context(|| format!("failed to create output directory {}", dir.display()))?;
            TempDir::with_prefix_in("narralign-", dir)?
        }
        None => TempDir::with_prefix("narralign-")?,
    };

    let text_paths = sorted_files(&config.text_dir)?;
    let audio_paths = sorted_files(&config.audio_dir)?;
    info!(
        texts = text_paths.len(),
        audios = audio_paths.len(),
        skip_penalty = config.skip_penalty,
        radius = config.radius,
        "starting alignment"
    );

    let extractor = FeatureExtractor::new();
    let synthesizer = Synthesizer::new(&config.voice, features::ANALYSIS_SAMPLE_RATE);
    let params = AlignmentParams {
        skip_penalty: config.skip_penalty,
        radius: config.radius,
    };

    let mut text_iter = text_paths.iter();
    let mut audio_iter = audio_paths.iter();
    let sync_map = build_sync_map(
        || {
            text_iter
                .next()
                .map(|path| load_text_track(path, config, &synthesizer, &extractor, workspace.path()))
        },
        || {
            audio_iter
                .next()
                .map(|path| load_audio_track(path, config, &extractor, workspace.path()))
        },
        params,
    )?;

    if let Some(output_dir) = &config.output_dir {
        output::write_sync_map(
            &sync_map,
            output_dir,
            config.output_format,
            config.times_as_seconds,
        )?;
    }
    Ok(sync_map)
}

fn load_text_track(
    path: &Path,
    config: &AlignConfig,
    synthesizer: &Synthesizer,
    extractor: &FeatureExtractor,
    workspace: &Path,
) -> Result<TextTrack> {
    let name = prefixed_name(&config.text_path_prefix, path);
    let fragments = text::read_fragments(path)?;
    debug!(file = %path.display(), fragments = fragments.len(), "synthesising text file");

    let narration = synthesizer.synthesize(&fragments, workspace)?;
    let features = extractor.extract(&narration.samples, narration.sample_rate)?;
    let anchors = narration
        .anchors_seconds
        .iter()
        .map(|&t| seconds_to_frame(t))
        .collect();

    Ok(TextTrack {
        name,
        fragments: fragments.into_iter().map(|f| f.id).collect(),
        anchors,
        features,
    })
}

fn load_audio_track(
    path: &Path,
    config: &AlignConfig,
    extractor: &FeatureExtractor,
    workspace: &Path,
) -> Result<AudioTrack> {
    let name = prefixed_name(&config.audio_path_prefix, path);
    let wav = audio::transcoder::transcode_to_wav(path, workspace, features::ANALYSIS_SAMPLE_RATE)?;
    let decoded = audio::decoder::decode_audio(&wav)?;
    let features = extractor.extract(&decoded.samples, decoded.sample_rate)?;
    ensure!(
        features.nrows() > 0,
        "audio file {} produced no feature frames",
        path.display()
    );
    Ok(AudioTrack { name, features })
}

fn sorted_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in
        fs::read_dir(dir).with_context(|| format!("failed to list {}", dir.display()))?
    {
        let path = entry?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
