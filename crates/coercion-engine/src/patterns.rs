//! Text normalization and snippet helpers shared by the classifier and correlator
//!
//! Matching runs over a lowercased copy of the text. Lowercasing can change
//! byte lengths (and for a handful of characters the char count), so the
//! normalized copy keeps a byte → source-character map and every offset
//! reported to callers is a character offset into the original text.

use std::collections::BTreeSet;

/// Default context radius in characters around a match
pub const DEFAULT_CONTEXT_RADIUS: usize = 50;

/// Lowercased view of a text with a map back to source character offsets.
#[derive(Debug, Clone)]
pub struct NormalizedText {
    lowered: String,
    /// For every byte of `lowered`, the source character index it came from
    origin: Vec<usize>,
    source_chars: usize,
}

impl NormalizedText {
    pub fn new(source: &str) -> Self {
        let mut lowered = String::with_capacity(source.len());
        let mut origin = Vec::with_capacity(source.len());
        let mut source_chars = 0;

        for (ci, ch) in source.chars().enumerate() {
            for lc in ch.to_lowercase() {
                lowered.push(lc);
                origin.extend(std::iter::repeat(ci).take(lc.len_utf8()));
            }
            source_chars = ci + 1;
        }

        Self {
            lowered,
            origin,
            source_chars,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.lowered
    }

    /// Map a non-empty byte range of the normalized text to a character
    /// range `[start, end)` of the source text.
    pub fn source_span(&self, start: usize, end: usize) -> Option<(usize, usize)> {
        if start >= end || end > self.origin.len() {
            return None;
        }
        let first = self.origin[start];
        let last = self.origin[end - 1];
        Some((first, (last + 1).min(self.source_chars)))
    }
}

/// Characters `[start, end)` of `chars` as a string, clamped to bounds.
pub fn char_slice(chars: &[char], start: usize, end: usize) -> String {
    let end = end.min(chars.len());
    let start = start.min(end);
    chars[start..end].iter().collect()
}

/// Text within `radius` characters on both sides of `[start, end)`.
pub fn context_window(chars: &[char], start: usize, end: usize, radius: usize) -> String {
    char_slice(chars, start.saturating_sub(radius), end.saturating_add(radius))
}

/// The full line(s) containing `[start, end)`, whitespace collapsed.
pub fn citation_line(chars: &[char], start: usize, end: usize) -> String {
    let end = end.min(chars.len());
    let start = start.min(end);
    let line_start = chars[..start]
        .iter()
        .rposition(|c| *c == '\n')
        .map(|i| i + 1)
        .unwrap_or(0);
    let line_end = chars[end..]
        .iter()
        .position(|c| *c == '\n')
        .map(|i| end + i)
        .unwrap_or(chars.len());
    collapse_whitespace(&char_slice(chars, line_start, line_end))
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whitespace tokens of the trimmed, lowercased text. Punctuation stays
/// attached to its token.
pub fn token_set(text: &str) -> BTreeSet<String> {
    text.trim()
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Word keys used for candidate lookup: tokens with surrounding
/// punctuation stripped. Purely alphanumeric comparison.
pub fn index_keys(text: &str) -> BTreeSet<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(|t| t.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// First `max_chars` characters of `text`, on a char boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte, _)) => &text[..byte],
        None => text,
    }
}
