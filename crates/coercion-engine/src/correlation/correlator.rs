use super::index::CorpusIndex;
use super::similarity::{combined, upper_bound, PreparedText, DEFAULT_MAX_COMPARE_CHARS};
use crate::aggravation::VulnerabilityRegistry;
use crate::error::{ConfigurationError, EngineError};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use shared_types::{CorrelatedDetection, Correlation, Detection, Document};
use std::cmp::Ordering;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::{Duration, Instant};

fn default_threshold() -> f64 {
    0.3
}

fn default_max_per_detection() -> usize {
    5
}

fn default_max_compare_chars() -> usize {
    DEFAULT_MAX_COMPARE_CHARS
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationSettings {
    /// Minimum similarity for a pairing to be kept
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// Maximum correlations kept per detection
    #[serde(default = "default_max_per_detection")]
    pub max_per_detection: usize,
    /// Characters compared per side
    #[serde(default = "default_max_compare_chars")]
    pub max_compare_chars: usize,
    /// Only compare units sharing at least one word with the citation
    #[serde(default = "default_true")]
    pub prefilter: bool,
    /// Replace registered names by their alias in matched text
    #[serde(default = "default_true")]
    pub protect_names: bool,
}

impl Default for CorrelationSettings {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            max_per_detection: default_max_per_detection(),
            max_compare_chars: default_max_compare_chars(),
            prefilter: true,
            protect_names: true,
        }
    }
}

impl CorrelationSettings {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(ConfigurationError::InvalidSetting {
                name: "correlation.threshold",
                reason: format!("{} is outside [0, 1]", self.threshold),
            });
        }
        if self.max_compare_chars == 0 {
            return Err(ConfigurationError::InvalidSetting {
                name: "correlation.max_compare_chars",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Optional deadline and cancellation flag for one correlation run.
#[derive(Debug, Clone, Default)]
pub struct CorrelationBudget {
    deadline: Option<Instant>,
    cancel: Option<Arc<AtomicBool>>,
}

impl CorrelationBudget {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Some(Instant::now() + timeout);
        self
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn check(&self) -> Result<(), EngineError> {
        if let Some(flag) = &self.cancel {
            if flag.load(AtomicOrdering::Relaxed) {
                return Err(EngineError::Cancelled);
            }
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return Err(EngineError::DeadlineExceeded);
            }
        }
        Ok(())
    }
}

/// Pairs detections from one corpus with similar units of another.
#[derive(Debug, Clone, Default)]
pub struct CrossCorpusCorrelator {
    settings: CorrelationSettings,
    registry: Option<Arc<VulnerabilityRegistry>>,
}

impl CrossCorpusCorrelator {
    pub fn new(settings: CorrelationSettings) -> Self {
        Self {
            settings,
            registry: None,
        }
    }

    pub fn with_registry(mut self, registry: Arc<VulnerabilityRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn settings(&self) -> &CorrelationSettings {
        &self.settings
    }

    /// Correlate without a budget. Output order follows `detections`.
    pub fn correlate(&self, detections: &[Detection], corpus: &[Document]) -> Vec<CorrelatedDetection> {
        let index = CorpusIndex::build(corpus, self.settings.max_compare_chars);
        detections
            .par_iter()
            .map(|d| self.correlate_one(d, &index))
            .collect()
    }

    /// Correlate, checking `budget` before each detection.
    pub fn correlate_within(
        &self,
        detections: &[Detection],
        corpus: &[Document],
        budget: &CorrelationBudget,
    ) -> Result<Vec<CorrelatedDetection>, EngineError> {
        budget.check()?;
        let index = CorpusIndex::build(corpus, self.settings.max_compare_chars);
        let result = detections
            .par_iter()
            .map(|d| -> Result<CorrelatedDetection, EngineError> {
                budget.check()?;
                Ok(self.correlate_one(d, &index))
            })
            .collect::<Result<Vec<_>, _>>();

        match &result {
            Ok(correlated) => {
                let pairs: usize = correlated.iter().map(|c| c.correlations.len()).sum();
                tracing::info!(
                    detections = detections.len(),
                    units = index.len(),
                    pairs,
                    "correlation complete"
                );
            }
            Err(e) => tracing::warn!(error = %e, "correlation aborted"),
        }
        result
    }

    fn correlate_one(&self, detection: &Detection, index: &CorpusIndex) -> CorrelatedDetection {
        let query_text = if detection.citation.trim().is_empty() {
            &detection.context_window
        } else {
            &detection.citation
        };
        let query = PreparedText::new(query_text, self.settings.max_compare_chars);
        if query.is_empty() || index.is_empty() || self.settings.max_per_detection == 0 {
            return CorrelatedDetection::uncorrelated(detection.clone());
        }

        let candidates = if self.settings.prefilter {
            index.candidates(query_text)
        } else {
            index.all()
        };

        let mut scored: Vec<(usize, f64)> = Vec::new();
        for id in candidates {
            let unit = index.unit(id);
            if upper_bound(&query, &unit.prepared) < self.settings.threshold {
                continue;
            }
            let score = combined(&query, &unit.prepared);
            if score >= self.settings.threshold {
                scored.push((id, score));
            }
        }

        // stable: equal scores stay in corpus order
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        scored.truncate(self.settings.max_per_detection);

        let correlations = scored
            .into_iter()
            .filter_map(|(id, score)| {
                let unit = index.unit(id);
                let matched_text = match (&self.registry, self.settings.protect_names) {
                    (Some(registry), true) => registry.protect_names(&unit.content),
                    _ => unit.content.clone(),
                };
                let entity = self
                    .registry
                    .as_ref()
                    .and_then(|r| r.detect_entity(&unit.content))
                    .map(str::to_string);
                Correlation::new(score, unit.source_id.clone(), unit.locator, matched_text)
                    .map(|c| c.with_entity(entity))
                    .ok()
            })
            .collect();

        CorrelatedDetection {
            detection: detection.clone(),
            correlations,
        }
    }
}
