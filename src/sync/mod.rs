//! Stream-of-files coordinator.
//!
//! Aligns a sorted stream of synthesised text files against a sorted stream
//! of recorded audio files. After each alignment the coordinator decides
//! whether the unmatched tail belongs to the next text file, the next audio
//! file, or both, which makes the pairing tolerant to unequal splits and
//! extra material at either end.

pub mod timing;

use anyhow::Result;
use ndarray::{s, Array2};
use tracing::{debug, warn};

use crate::dtw::fast_dtwbd;
use crate::types::{FragmentTiming, SyncMap};
use self::timing::frame_to_seconds;

/// A synthesised text file ready for alignment: one anchor per fragment,
/// marking the frame where that fragment starts in the narration.
#[derive(Debug, Clone)]
pub struct TextTrack {
    pub name: String,
    pub fragments: Vec<String>,
    pub anchors: Vec<usize>,
    pub features: Array2<f64>,
}

/// A featurised recorded audio file.
#[derive(Debug, Clone)]
pub struct AudioTrack {
    pub name: String,
    pub features: Array2<f64>,
}

/// Engine parameters shared by every (text, audio) pairing.
#[derive(Debug, Clone, Copy)]
pub struct AlignmentParams {
    pub skip_penalty: f64,
    pub radius: usize,
}

impl Default for AlignmentParams {
    fn default() -> Self {
        Self {
            skip_penalty: 0.75,
            radius: 100,
        }
    }
}

/// Align two pull-based streams of tracks into a sync map.
///
/// Text and audio files are pulled lazily; a track is only loaded once the
/// previous one on its side has been fully consumed. Alignment is
/// all-or-nothing: if any pairing produces no match the whole run is
/// abandoned and an empty map returned, since a partial sync map would be
/// misleading.
pub fn build_sync_map<T, A>(
    mut next_text: T,
    mut next_audio: A,
    params: AlignmentParams,
) -> Result<SyncMap>
where
    T: FnMut() -> Option<Result<TextTrack>>,
    A: FnMut() -> Option<Result<AudioTrack>>,
{
    let mut sync_map = SyncMap::new();
    let mut text: Option<TextTrack> = None;
    let mut audio: Option<AudioTrack> = None;
    let mut audio_start_frame = 0usize;
    let mut pull_text = true;
    let mut pull_audio = true;

    loop {
        if pull_text {
            let Some(track) = next_text() else { break };
            let track = track?;
            sync_map.insert_text_file(&track.name);
            text = Some(track);
        }
        if pull_audio {
            let Some(track) = next_audio() else { break };
            audio = Some(track?);
            audio_start_frame = 0;
        }
        let (Some(text_track), Some(audio_track)) = (text.as_mut(), audio.as_mut()) else {
            break;
        };

        let result = fast_dtwbd(
            text_track.features.view(),
            audio_track.features.view(),
            params.skip_penalty,
            params.radius,
        )?;
        if result.path.is_empty() {
            warn!(
                text = %text_track.name,
                audio = %audio_track.name,
                "no match found; alignment terminated, adjust skip_penalty or input files"
            );
            return Ok(SyncMap::new());
        }
        let path = &result.path;
        let (i_first, _) = path[0];
        let (i_last, j_last) = path[path.len() - 1];
        debug!(
            text = %text_track.name,
            audio = %audio_track.name,
            distance = result.distance,
            matched_frames = path.len(),
            "aligned"
        );

        // Fragments whose anchors intersect the matched text frames. The
        // anchor straddling the first matched frame still belongs to the
        // match, hence the step back by one.
        let from = text_track
            .anchors
            .partition_point(|&a| a < i_first)
            .saturating_sub(1);
        let to = text_track.anchors.partition_point(|&a| a < i_last);

        // One begin time per covered anchor, plus the last matched audio
        // frame as a sentinel end time.
        let mut instants = Vec::with_capacity(to - from + 1);
        for &anchor in &text_track.anchors[from..to] {
            let at = path.partition_point(|&(i, _)| i < anchor);
            let (_, audio_frame) = path[at];
            instants.push(frame_to_seconds(audio_start_frame + audio_frame));
        }
        instants.push(frame_to_seconds(audio_start_frame + j_last));

        for (offset, fragment) in text_track.fragments[from..to].iter().enumerate() {
            sync_map.insert_fragment(
                &text_track.name,
                fragment.clone(),
                FragmentTiming {
                    audio_file: audio_track.name.clone(),
                    begin: instants[offset],
                    end: instants[offset + 1],
                },
            );
        }

        // Advance decision: a text file is done once every anchor is mapped;
        // otherwise its tail is re-aligned. Audio advances when fully matched
        // or whenever text fragments remain (the tie goes to fresh audio).
        pull_text = to == text_track.anchors.len();
        if !pull_text {
            text_track.features = text_track.features.slice(s![i_last.., ..]).to_owned();
            text_track.fragments.drain(..to);
            text_track.anchors.drain(..to);
            for anchor in &mut text_track.anchors {
                *anchor -= i_last;
            }
        }

        pull_audio = j_last == audio_track.features.nrows() - 1 || !pull_text;
        if !pull_audio {
            audio_track.features = audio_track.features.slice(s![j_last.., ..]).to_owned();
            audio_start_frame += j_last;
        }
    }

    Ok(sync_map)
}
