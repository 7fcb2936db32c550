//! Input loading
//!
//! Text extraction and transcription happen upstream. This module only reads
//! what they produce:
//!
//! - `*.json`: a serialized `Document`
//! - `*.txt` document: pages separated by form feeds
//! - `*.txt` recording: timeline lines of the form `[MM:SS] text`
//!
//! A file that cannot be read or parsed becomes a `SourceDocument::Failed`
//! marker so one bad input never aborts a batch.

use anyhow::{bail, Context, Result};
use lazy_static::lazy_static;
use regex::Regex;
use shared_types::{Document, SourceDocument, SourceKind};
use std::fs;
use std::path::Path;

/// Timeline lines carry only a start time; each segment is assumed to last
/// this long.
pub const TIMELINE_SEGMENT_SECS: f64 = 5.0;

lazy_static! {
    static ref TIMELINE_LINE: Regex = Regex::new(r"^\s*\[(\d{1,3}):([0-5]\d)\]\s*(.*)$").unwrap();
}

/// Load one source, turning any failure into a `Failed` marker
pub fn load_source(path: &Path, kind: SourceKind) -> SourceDocument {
    let source_id = source_id_for(path);
    match read_source(path, &source_id, kind) {
        Ok(doc) => {
            tracing::debug!(source = %source_id, units = doc.units.len(), "loaded source");
            SourceDocument::Extracted(doc)
        }
        Err(e) => {
            let reason = format!("{e:#}");
            tracing::warn!(source = %source_id, %reason, "could not load source");
            SourceDocument::Failed { source_id, reason }
        }
    }
}

fn read_source(path: &Path, source_id: &str, kind: SourceKind) -> Result<Document> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    let doc = if is_json {
        serde_json::from_str::<Document>(&content).context("invalid document JSON")?
    } else {
        match kind {
            SourceKind::Document => parse_pages(source_id, &content),
            SourceKind::Recording => parse_timeline(source_id, &content)?,
        }
    };

    if doc.kind != kind {
        bail!("expected a {kind:?} source, found {:?}", doc.kind);
    }
    if doc.is_empty() {
        bail!("no text");
    }
    Ok(doc)
}

fn source_id_for(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Split plain text into pages on form feed characters
pub fn parse_pages(source_id: &str, content: &str) -> Document {
    Document::from_pages(source_id, content.split('\u{0C}').collect::<Vec<_>>())
}

/// Parse `[MM:SS] text` lines into time-aligned units.
///
/// Lines without a timestamp and timestamps with no text are skipped.
pub fn parse_timeline(source_id: &str, content: &str) -> Result<Document> {
    let mut segments = Vec::new();
    for line in content.lines() {
        let Some(caps) = TIMELINE_LINE.captures(line) else {
            continue;
        };
        let text = caps[3].trim();
        if text.is_empty() {
            continue;
        }
        let minutes: f64 = caps[1]
            .parse()
            .with_context(|| format!("bad timestamp in {line:?}"))?;
        let seconds: f64 = caps[2]
            .parse()
            .with_context(|| format!("bad timestamp in {line:?}"))?;
        let start = minutes * 60.0 + seconds;
        segments.push((start, start + TIMELINE_SEGMENT_SECS, text.to_string()));
    }
    Document::from_segments(source_id, segments).context("invalid timeline segment")
}
