//! XHTML fragment extraction.
//!
//! A text file is any XHTML document whose fragment elements carry an `id`
//! of the form `f[0-9]+`. Fragments are returned in document order, which
//! defines the narration order.

use std::fs;
use std::path::Path;

use anyhow::{ensure, Context, Result};

/// One labelled span of text pulled from an XHTML file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextFragment {
    pub id: String,
    pub text: String,
}

/// Read a text file and extract its fragments.
pub fn read_fragments(path: &Path) -> Result<Vec<TextFragment>> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read text file {}", path.display()))?;
    let fragments = parse_fragments(&source)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    ensure!(
        !fragments.is_empty(),
        "no fragment elements with id 'f[0-9]+' in {}",
        path.display()
    );
    Ok(fragments)
}

fn parse_fragments(source: &str) -> Result<Vec<TextFragment>> {
    let doc = roxmltree::Document::parse(source)?;
    let mut fragments = Vec::new();
    for node in doc.descendants().filter(|n| n.is_element()) {
        let Some(id) = node.attribute("id") else {
            continue;
        };
        if !is_fragment_id(id) {
            continue;
        }
        fragments.push(TextFragment {
            id: id.to_string(),
            text: collect_text(&node),
        });
    }
    Ok(fragments)
}

fn is_fragment_id(id: &str) -> bool {
    let mut chars = id.chars();
    if chars.next() != Some('f') {
        return false;
    }
    let rest = chars.as_str();
    !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit())
}

/// Whitespace-normalised text content of an element and its descendants.
fn collect_text(node: &roxmltree::Node) -> String {
    let mut raw = String::new();
    for descendant in node.descendants().filter(|n| n.is_text()) {
        if let Some(chunk) = descendant.text() {
            raw.push_str(chunk);
        }
    }
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
