//! Configuration and sync-map types for the narralign pipeline.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Serialize;

use crate::sync::timing::format_clock;

/// File format for rendered sync maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Smil,
    Json,
}

/// Configuration for one [`align`](crate::align) run.
///
/// All state is carried here explicitly; there are no process-wide defaults.
#[derive(Debug, Clone)]
pub struct AlignConfig {
    pub text_dir: PathBuf,
    pub audio_dir: PathBuf,
    pub output_dir: Option<PathBuf>,
    pub output_format: OutputFormat,
    /// Prefix joined onto text file names in the sync map, e.g. `../text/`.
    pub text_path_prefix: String,
    /// Prefix joined onto audio file names in the sync map.
    pub audio_path_prefix: String,
    /// Per-frame cost of leaving content unmatched; higher is more permissive.
    pub skip_penalty: f64,
    /// Multi-resolution search radius in frames.
    pub radius: usize,
    /// When true, JSON output carries raw seconds instead of `H:MM:SS.mmm`.
    pub times_as_seconds: bool,
    /// Voice passed to the external synthesiser.
    pub voice: String,
}

impl AlignConfig {
    pub fn new(text_dir: impl Into<PathBuf>, audio_dir: impl Into<PathBuf>) -> Self {
        Self {
            text_dir: text_dir.into(),
            audio_dir: audio_dir.into(),
            output_dir: None,
            output_format: OutputFormat::Smil,
            text_path_prefix: String::new(),
            audio_path_prefix: String::new(),
            skip_penalty: 0.75,
            radius: 100,
            times_as_seconds: false,
            voice: "en".to_string(),
        }
    }

    pub fn with_output(mut self, dir: impl Into<PathBuf>, format: OutputFormat) -> Self {
        self.output_dir = Some(dir.into());
        self.output_format = format;
        self
    }

    pub fn with_path_prefixes(
        mut self,
        text_prefix: impl Into<String>,
        audio_prefix: impl Into<String>,
    ) -> Self {
        self.text_path_prefix = text_prefix.into();
        self.audio_path_prefix = audio_prefix.into();
        self
    }

    pub fn with_skip_penalty(mut self, skip_penalty: f64) -> Self {
        self.skip_penalty = skip_penalty;
        self
    }

    pub fn with_radius(mut self, radius: usize) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_times_as_seconds(mut self, enabled: bool) -> Self {
        self.times_as_seconds = enabled;
        self
    }

    pub fn with_voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = voice.into();
        self
    }
}

/// Audio location of one text fragment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FragmentTiming {
    pub audio_file: String,
    pub begin: f64,
    pub end: f64,
}

impl FragmentTiming {
    pub fn begin_clock(&self) -> String {
        format_clock(self.begin)
    }

    pub fn end_clock(&self) -> String {
        format_clock(self.end)
    }
}

/// Mapping text file -> fragment id -> audio interval.
///
/// Both levels preserve insertion order: files in the order they were
/// aligned, fragments in document order. Entries are never mutated after
/// insertion. A text file that was pulled but produced no mapped fragments
/// still appears, with an empty fragment map.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncMap {
    files: IndexMap<String, IndexMap<String, FragmentTiming>>,
}

impl SyncMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert_text_file(&mut self, name: &str) {
        self.files.entry(name.to_string()).or_default();
    }

    pub(crate) fn insert_fragment(
        &mut self,
        text_file: &str,
        fragment_id: String,
        timing: FragmentTiming,
    ) {
        self.files
            .entry(text_file.to_string())
            .or_default()
            .insert(fragment_id, timing);
    }

    pub fn files(
        &self,
    ) -> impl Iterator<Item = (&String, &IndexMap<String, FragmentTiming>)> {
        self.files.iter()
    }

    pub fn get(&self, text_file: &str) -> Option<&IndexMap<String, FragmentTiming>> {
        self.files.get(text_file)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

pub(crate) fn prefixed_name(prefix: &str, path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    if prefix.is_empty() {
        name
    } else {
        Path::new(prefix).join(name).to_string_lossy().into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::{prefixed_name, AlignConfig, FragmentTiming, SyncMap};
    use std::path::Path;

    #[test]
    fn config_defaults_match_the_documented_knobs() {
        let config = AlignConfig::new("text", "audio");
        assert_eq!(config.skip_penalty, 0.75);
        assert_eq!(config.radius, 100);
        assert!(config.output_dir.is_none());
        assert!(!config.times_as_seconds);
    }

    #[test]
    fn sync_map_preserves_insertion_order() {
        let mut map = SyncMap::new();
        map.insert_text_file("b.xhtml");
        map.insert_text_file("a.xhtml");
        map.insert_fragment(
            "b.xhtml",
            "f0002".to_string(),
            FragmentTiming {
                audio_file: "b.mp3".to_string(),
                begin: 0.0,
                end: 1.0,
            },
        );
        let names: Vec<&String> = map.files().map(|(name, _)| name).collect();
        assert_eq!(names, ["b.xhtml", "a.xhtml"]);
        assert!(map.get("a.xhtml").unwrap().is_empty());
    }

    #[test]
    fn timings_render_as_clock_strings() {
        let timing = FragmentTiming {
            audio_file: "a.mp3".to_string(),
            begin: 2.6,
            end: 5.88,
        };
        assert_eq!(timing.begin_clock(), "0:00:02.600");
        assert_eq!(timing.end_clock(), "0:00:05.880");
    }

    #[test]
    fn prefixes_join_as_paths() {
        assert_eq!(prefixed_name("", Path::new("/a/b/t.xhtml")), "t.xhtml");
        assert_eq!(
            prefixed_name("../text", Path::new("/a/b/t.xhtml")),
            "../text/t.xhtml"
        );
    }
}
