//! Corpus scanner
//!
//! Classifies every unit of a document against one lexicon, places each
//! detection on a document-global character axis and removes near
//! duplicates. Units are joined by a single separator character on that
//! axis, so a match at offset `k` of unit `i` sits at
//! `sum(len(unit_j) + 1 for j < i) + k`.

use crate::classifier::SegmentClassifier;
use crate::lexicon::Lexicon;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use shared_types::{Detection, Document, SourceDocument};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Default de-duplication window in characters
pub const DEFAULT_DEDUP_WINDOW: usize = 20;

/// Characters between two consecutive units on the global axis
pub const UNIT_SEPARATOR_LEN: usize = 1;

#[derive(Debug, Clone)]
pub struct CorpusScanner {
    classifier: SegmentClassifier,
    dedup_window: usize,
}

impl CorpusScanner {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self {
            classifier: SegmentClassifier::new(lexicon),
            dedup_window: DEFAULT_DEDUP_WINDOW,
        }
    }

    pub fn with_context_radius(mut self, radius: usize) -> Self {
        self.classifier = self.classifier.with_context_radius(radius);
        self
    }

    pub fn with_dedup_window(mut self, window: usize) -> Self {
        self.dedup_window = window;
        self
    }

    pub fn lexicon(&self) -> &Lexicon {
        self.classifier.lexicon()
    }

    /// Scan one document. Output is in unit order, then match order within
    /// the unit, with near duplicates removed.
    pub fn scan(&self, document: &Document) -> Vec<Detection> {
        let mut detections = Vec::new();
        let mut base = 0usize;

        for (index, unit) in document.units.iter().enumerate() {
            detections.extend(
                self.classifier
                    .classify_at(unit, index)
                    .into_iter()
                    .map(|d| {
                        let position = base + d.unit_offset;
                        d.with_position(position)
                    }),
            );
            base += unit.char_len() + UNIT_SEPARATOR_LEN;
        }

        let raw = detections.len();
        let kept = deduplicate(detections, self.dedup_window);
        tracing::info!(
            source = %document.source_id,
            lexicon = %self.lexicon().key(),
            units = document.units.len(),
            raw,
            kept = kept.len(),
            "scanned document"
        );
        kept
    }

    /// Scan a batch of extraction outcomes in parallel. Failed extractions
    /// are recorded and skipped; outcome order follows input order.
    pub fn scan_batch(&self, sources: &[SourceDocument]) -> BatchScan {
        let outcomes: Vec<DocumentOutcome> = sources
            .par_iter()
            .map(|source| match source {
                SourceDocument::Extracted(document) => DocumentOutcome::Scanned {
                    source_id: document.source_id.clone(),
                    detections: self.scan(document),
                },
                SourceDocument::Failed { source_id, reason } => {
                    tracing::warn!(source = %source_id, reason = %reason, "skipping failed extraction");
                    DocumentOutcome::Failed {
                        source_id: source_id.clone(),
                        reason: reason.clone(),
                    }
                }
            })
            .collect();

        let succeeded = outcomes.iter().filter(|o| o.is_scanned()).count();
        let tally = BatchTally {
            succeeded,
            failed: outcomes.len() - succeeded,
        };
        tracing::info!(
            succeeded = tally.succeeded,
            failed = tally.failed,
            "batch scan complete"
        );

        BatchScan { outcomes, tally }
    }
}

/// Drop every detection within `window` characters of an already kept one.
///
/// Detections are visited in emission order, so when two collide the one
/// emitted first (earlier unit, then earlier lexicon category) survives.
/// A window of 0 keeps everything.
pub fn deduplicate(detections: Vec<Detection>, window: usize) -> Vec<Detection> {
    if window == 0 || detections.len() < 2 {
        return detections;
    }

    let mut kept_positions: BTreeSet<usize> = BTreeSet::new();
    let mut kept = Vec::with_capacity(detections.len());
    for detection in detections {
        let position = detection.position;
        let lo = position.saturating_sub(window - 1);
        let hi = position.saturating_add(window - 1);
        if kept_positions.range(lo..=hi).next().is_none() {
            kept_positions.insert(position);
            kept.push(detection);
        }
    }
    kept
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DocumentOutcome {
    Scanned {
        source_id: String,
        detections: Vec<Detection>,
    },
    Failed {
        source_id: String,
        reason: String,
    },
}

impl DocumentOutcome {
    pub fn is_scanned(&self) -> bool {
        matches!(self, DocumentOutcome::Scanned { .. })
    }

    pub fn source_id(&self) -> &str {
        match self {
            DocumentOutcome::Scanned { source_id, .. } | DocumentOutcome::Failed { source_id, .. } => {
                source_id
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchTally {
    pub succeeded: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchScan {
    pub outcomes: Vec<DocumentOutcome>,
    pub tally: BatchTally,
}

impl BatchScan {
    /// All detections of the scanned documents, in batch order
    pub fn detections(&self) -> Vec<Detection> {
        self.outcomes
            .iter()
            .filter_map(|o| match o {
                DocumentOutcome::Scanned { detections, .. } => Some(detections.iter().cloned()),
                DocumentOutcome::Failed { .. } => None,
            })
            .flatten()
            .collect()
    }
}
