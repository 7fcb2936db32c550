//! Contradiction detection
//!
//! A separate pass from the classifier: it looks for phrases where a speaker
//! revises or disowns an earlier statement ("antes dije", "that's not what I
//! said"). Hits are not categorized and do not feed the legal assessment;
//! they are listed in the report with a wide context so a reader can compare
//! the two statements.

use crate::error::ConfigurationError;
use crate::jurisdiction::Language;
use crate::patterns::{context_window, NormalizedText};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use shared_types::{Document, SourceLocator, TextUnit};

/// Characters of context kept on each side of a contradiction
pub const CONTRADICTION_CONTEXT_RADIUS: usize = 200;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContradictionDefinition {
    pub language: Language,
    pub patterns: Vec<String>,
}

impl ContradictionDefinition {
    pub fn from_patterns(language: Language, patterns: &[&str]) -> Self {
        Self {
            language,
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contradiction {
    pub source_id: String,
    pub locator: SourceLocator,
    /// Text as written in the source
    pub matched_text: String,
    pub unit_index: usize,
    /// Character offset of the match inside its unit
    pub unit_offset: usize,
    /// Trimmed text around the match
    pub context: String,
}

/// Compiled contradiction markers for one language.
#[derive(Debug, Clone)]
pub struct ContradictionDetector {
    language: Language,
    patterns: Vec<Regex>,
}

impl ContradictionDetector {
    pub fn compile(definition: &ContradictionDefinition) -> Result<Self, ConfigurationError> {
        let language = definition.language.clone();
        if definition.patterns.is_empty() {
            return Err(ConfigurationError::EmptyContradictions(language.to_string()));
        }
        let patterns = definition
            .patterns
            .iter()
            .map(|pattern| {
                RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|source| ConfigurationError::InvalidContradictionPattern {
                        language: language.to_string(),
                        pattern: pattern.clone(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { language, patterns })
    }

    pub fn language(&self) -> &Language {
        &self.language
    }

    /// Contradictions in one unit: patterns in order, matches left to right.
    pub fn detect_unit(&self, unit: &TextUnit, unit_index: usize) -> Vec<Contradiction> {
        if unit.content.trim().is_empty() {
            return Vec::new();
        }
        let normalized = NormalizedText::new(&unit.content);
        let chars: Vec<char> = unit.content.chars().collect();

        let mut found = Vec::new();
        for regex in &self.patterns {
            for m in regex.find_iter(normalized.as_str()) {
                let Some((start, end)) = normalized.source_span(m.start(), m.end()) else {
                    continue;
                };
                found.push(Contradiction {
                    source_id: unit.source_id.clone(),
                    locator: unit.locator,
                    matched_text: chars[start..end].iter().collect(),
                    unit_index,
                    unit_offset: start,
                    context: context_window(&chars, start, end, CONTRADICTION_CONTEXT_RADIUS)
                        .trim()
                        .to_string(),
                });
            }
        }
        found
    }

    pub fn detect(&self, document: &Document) -> Vec<Contradiction> {
        let found: Vec<Contradiction> = document
            .units
            .iter()
            .enumerate()
            .flat_map(|(i, unit)| self.detect_unit(unit, i))
            .collect();
        if !found.is_empty() {
            tracing::debug!(
                source = %document.source_id,
                contradictions = found.len(),
                "found contradictions"
            );
        }
        found
    }
}
