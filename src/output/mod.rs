//! Sync-map rendering: EPUB3 Media Overlay SMIL and JSON.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::json;
use tinytemplate::TinyTemplate;
use tracing::info;

use crate::types::{FragmentTiming, OutputFormat, SyncMap};

const SMIL_TEMPLATE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<smil xmlns="http://www.w3.org/ns/SMIL" xmlns:epub="http://www.idpf.org/2007/ops" version="3.0">
  <body>
    <seq id="seq1" epub:textref="{text_path}">
{{ for par in parallels }}      <par id="{par.id}">
        <text src="{par.text_src}"/>
        <audio src="{par.audio_src}" clipBegin="{par.begin}" clipEnd="{par.end}"/>
      </par>
{{ endfor }}    </seq>
  </body>
</smil>
"#;

#[derive(Serialize)]
struct SmilContext<'a> {
    text_path: &'a str,
    parallels: Vec<SmilPar>,
}

#[derive(Serialize)]
struct SmilPar {
    id: String,
    text_src: String,
    audio_src: String,
    begin: String,
    end: String,
}

/// Write one sync-map file per text entry in the requested format.
pub fn write_sync_map(
    sync_map: &SyncMap,
    output_dir: &Path,
    format: OutputFormat,
    times_as_seconds: bool,
) -> Result<()> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output directory {}", output_dir.display()))?;
    for (text_path, fragments) in sync_map.files() {
        match format {
            OutputFormat::Smil => write_smil(text_path, fragments, output_dir)?,
            OutputFormat::Json => write_json(text_path, fragments, output_dir, times_as_seconds)?,
        }
    }
    info!(files = sync_map.len(), dir = %output_dir.display(), "sync map written");
    Ok(())
}

fn write_smil(
    text_path: &str,
    fragments: &IndexMap<String, FragmentTiming>,
    output_dir: &Path,
) -> Result<()> {
    let width = digit_count(fragments.len());
    let mut parallels = Vec::new();
    for (index, (fragment_id, timing)) in fragments.iter().enumerate() {
        let begin = timing.begin_clock();
        let end = timing.end_clock();
        // EPUB3 requires clipBegin < clipEnd
        if begin == end {
            continue;
        }
        parallels.push(SmilPar {
            id: format!("par{:0width$}", index + 1, width = width),
            text_src: format!("{text_path}#{fragment_id}"),
            audio_src: timing.audio_file.clone(),
            begin,
            end,
        });
    }

    let mut templates = TinyTemplate::new();
    templates.add_template("smil", SMIL_TEMPLATE)?;
    let rendered = templates.render(
        "smil",
        &SmilContext {
            text_path,
            parallels,
        },
    )?;

    let path = output_dir.join(output_file_name(text_path, "smil"));
    fs::write(&path, rendered).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

fn write_json(
    text_path: &str,
    fragments: &IndexMap<String, FragmentTiming>,
    output_dir: &Path,
    times_as_seconds: bool,
) -> Result<()> {
    let mut entries = IndexMap::new();
    for (fragment_id, timing) in fragments {
        let value = if times_as_seconds {
            json!({
                "audio_file": timing.audio_file,
                "begin_time": timing.begin,
                "end_time": timing.end,
            })
        } else {
            json!({
                "audio_file": timing.audio_file,
                "begin_time": timing.begin_clock(),
                "end_time": timing.end_clock(),
            })
        };
        entries.insert(fragment_id.clone(), value);
    }

    let path = output_dir.join(output_file_name(text_path, "json"));
    let rendered = serde_json::to_string_pretty(&entries)?;
    fs::write(&path, rendered).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

fn output_file_name(text_path: &str, extension: &str) -> String {
    let name = Path::new(text_path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(text_path);
    format!("{name}.{extension}")
}

fn digit_count(count: usize) -> usize {
    if count == 0 {
        0
    } else {
        count.ilog10() as usize + 1
    }
}

#[cfg(test)]
mod tests {
    use super::{digit_count, write_sync_map};
    use crate::types::{FragmentTiming, OutputFormat, SyncMap};
    use std::fs;

    fn sample_map() -> SyncMap {
        let mut map = SyncMap::new();
        map.insert_text_file("p001.xhtml");
        map.insert_fragment(
            "p001.xhtml",
            "f0001".to_string(),
            FragmentTiming {
                audio_file: "audio1.mp3".to_string(),
                begin: 0.0,
                end: 2.6,
            },
        );
        map.insert_fragment(
            "p001.xhtml",
            "f0002".to_string(),
            FragmentTiming {
                audio_file: "audio1.mp3".to_string(),
                begin: 2.6,
                end: 2.6,
            },
        );
        map.insert_fragment(
            "p001.xhtml",
            "f0003".to_string(),
            FragmentTiming {
                audio_file: "audio1.mp3".to_string(),
                begin: 2.6,
                end: 5.88,
            },
        );
        map
    }

    #[test]
    fn smil_lists_fragments_and_skips_zero_length_clips() {
        let dir = tempfile::tempdir().unwrap();
        write_sync_map(&sample_map(), dir.path(), OutputFormat::Smil, false).unwrap();

        let rendered = fs::read_to_string(dir.path().join("p001.smil")).unwrap();
        assert!(rendered.contains(r#"epub:textref="p001.xhtml""#));
        assert!(rendered.contains(r##"src="p001.xhtml#f0001""##));
        assert!(rendered.contains(r#"clipBegin="0:00:00.000" clipEnd="0:00:02.600""#));
        assert!(!rendered.contains("f0002"));
        assert!(rendered.contains(r#"<par id="par1">"#));
    }

    #[test]
    fn json_uses_clock_strings_by_default() {
        let dir = tempfile::tempdir().unwrap();
        write_sync_map(&sample_map(), dir.path(), OutputFormat::Json, false).unwrap();

        let rendered = fs::read_to_string(dir.path().join("p001.json")).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed["f0001"]["begin_time"], "0:00:00.000");
        assert_eq!(parsed["f0003"]["end_time"], "0:00:05.880");
        assert_eq!(parsed["f0001"]["audio_file"], "audio1.mp3");
    }

    #[test]
    fn json_can_emit_raw_seconds() {
        let dir = tempfile::tempdir().unwrap();
        write_sync_map(&sample_map(), dir.path(), OutputFormat::Json, true).unwrap();

        let rendered = fs::read_to_string(dir.path().join("p001.json")).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed["f0003"]["end_time"], 5.88);
    }

    #[test]
    fn par_ids_pad_to_the_fragment_count() {
        assert_eq!(digit_count(0), 0);
        assert_eq!(digit_count(9), 1);
        assert_eq!(digit_count(10), 2);
        assert_eq!(digit_count(100), 3);
    }
}
