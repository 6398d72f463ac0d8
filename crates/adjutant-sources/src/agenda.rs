//! Structured agenda parsing
//!
//! Agendas are sectioned documents: a "DONE - Fri 1/9" header, completed
//! items under it, then a "TODO" or "WORKING ON" header with open items.
//! The parser tags each captured line with its section status so the
//! extraction prompt can carry completed items through as `done`.

use crate::SourceError;
use adjutant_domain::{Provenance, SourceKind};
use adjutant_extractor::ExtractionRequest;
use std::path::Path;

/// Section header prefixes marking completed work
const DONE_PREFIXES: &[&str] = &["DONE", "COMPLETED"];

/// Section header prefixes marking open work
const TODO_PREFIXES: &[&str] = &["TODO", "TO-DO", "TO DO", "WORKING ON", "IN PROGRESS"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Done,
    Todo,
}

/// Tag the lines of a sectioned document with [DONE]/[TODO] markers
///
/// Text under each recognized header, up to the next header or end of
/// document, is captured verbatim. When no header is found anywhere, the
/// whole body is returned untagged so extraction can still be attempted.
pub fn tag_sections(body: &str) -> String {
    if !has_section_markers(body) {
        return body.trim().to_string();
    }

    let mut current = Section::Todo;
    let mut lines = Vec::new();

    for (idx, line) in body.lines().enumerate() {
        let text = line.trim();
        if text.is_empty() {
            continue;
        }

        if let Some(section) = detect_header(text) {
            current = section;
        }

        let tag = match current {
            Section::Done => "[DONE]",
            Section::Todo => "[TODO]",
        };
        lines.push(format!("{:04} {} {}", idx, tag, text));
    }

    lines.join("\n")
}

/// Read a local agenda file and tag its sections
pub fn read_agenda(path: &Path) -> Result<ExtractionRequest, SourceError> {
    let body = std::fs::read_to_string(path)
        .map_err(|e| SourceError::Unavailable(format!("{}: {}", path.display(), e)))?;

    let doc_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("agenda")
        .to_string();

    let provenance = Provenance::new(SourceKind::LocalDocument)
        .with_doc_id(path.display().to_string())
        .with_doc_name(doc_name);

    Ok(ExtractionRequest::new(tag_sections(&body), provenance))
}

fn has_section_markers(body: &str) -> bool {
    body.lines().any(|line| detect_header(line.trim()).is_some())
}

/// Detect a section header, case-insensitively.
///
/// Headers may carry decorations ("[working on]", "DONE - Fri 1/9:"); the
/// prefix match runs against the line with leading brackets stripped, and
/// the marker must end at a word boundary.
fn detect_header(line: &str) -> Option<Section> {
    let upper = line.trim_start_matches(['[', '*']).trim().to_uppercase();

    for prefix in DONE_PREFIXES {
        if marker_matches(&upper, prefix) {
            return Some(Section::Done);
        }
    }
    for prefix in TODO_PREFIXES {
        if marker_matches(&upper, prefix) {
            return Some(Section::Todo);
        }
    }
    None
}

fn marker_matches(upper: &str, marker: &str) -> bool {
    if !upper.starts_with(marker) {
        return false;
    }
    match upper.as_bytes().get(marker.len()) {
        None => true,
        Some(&b) => matches!(b, b' ' | b':' | b'-' | b']'),
    }
}
