//! Evidence overview
//!
//! Groups detections by category with readable locators and summarizes how
//! often each category recurs in the other corpus. Category counts are also
//! kept per source and per date, the date taken from the source id.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use shared_types::{Category, CategoryTally, CorrelatedDetection, Severity};
use std::collections::BTreeMap;

lazy_static! {
    // `20230415` or `15.04.23`
    static ref SOURCE_DATE: Regex = Regex::new(r"(\d{8}|\d{2}\.\d{2}\.\d{2})").unwrap();
}

/// Date stamp embedded in a source id, if any
pub fn source_date(source_id: &str) -> Option<&str> {
    SOURCE_DATE.find(source_id).map(|m| m.as_str())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceEntry {
    pub source_id: String,
    /// `p. N` for pages, `MM:SS-MM:SS` for recordings
    pub locator: String,
    pub severity: Severity,
    pub matched_text: String,
    pub citation: String,
    pub correlations: usize,
    pub best_score: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryRecurrence {
    pub detections: usize,
    /// Detections with at least one correlation
    pub recurring: usize,
    pub correlations: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvidenceOverview {
    pub by_category: BTreeMap<Category, Vec<EvidenceEntry>>,
    pub recurrence: BTreeMap<Category, CategoryRecurrence>,
    pub by_source: BTreeMap<String, CategoryTally>,
    /// Keyed by the date stamp as written in the source id; undated sources
    /// are left out
    pub by_date: BTreeMap<String, CategoryTally>,
    pub total_detections: usize,
    pub total_correlations: usize,
    /// Highest similarity seen across all correlations
    pub strongest_correlation: Option<f64>,
}

impl EvidenceOverview {
    pub fn build(detections: &[CorrelatedDetection]) -> Self {
        let mut overview = Self::default();

        for cd in detections {
            let d = &cd.detection;
            let best = cd.best_score();
            overview
                .by_category
                .entry(d.category)
                .or_default()
                .push(EvidenceEntry {
                    source_id: d.source_id.clone(),
                    locator: d.locator.to_string(),
                    severity: d.severity,
                    matched_text: d.matched_text.clone(),
                    citation: d.citation.clone(),
                    correlations: cd.correlations.len(),
                    best_score: best,
                });

            let recurrence = overview.recurrence.entry(d.category).or_default();
            recurrence.detections += 1;
            recurrence.correlations += cd.correlations.len();
            if !cd.correlations.is_empty() {
                recurrence.recurring += 1;
            }

            overview
                .by_source
                .entry(d.source_id.clone())
                .or_default()
                .add(d.category);
            if let Some(date) = source_date(&d.source_id) {
                overview
                    .by_date
                    .entry(date.to_string())
                    .or_default()
                    .add(d.category);
            }

            overview.total_detections += 1;
            overview.total_correlations += cd.correlations.len();
            if let Some(score) = best {
                overview.strongest_correlation = Some(match overview.strongest_correlation {
                    Some(current) => current.max(score),
                    None => score,
                });
            }
        }

        overview
    }

    /// Entries of the highest severity present, in input order
    pub fn most_severe(&self) -> Vec<&EvidenceEntry> {
        let Some(top) = self
            .by_category
            .values()
            .flatten()
            .map(|e| e.severity)
            .max()
        else {
            return Vec::new();
        };
        self.by_category
            .values()
            .flatten()
            .filter(|e| e.severity == top)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use shared_types::{Correlation, Detection, SourceLocator};

    fn cd(category: Category, severity: Severity, scores: &[f64]) -> CorrelatedDetection {
        cd_from("rec", category, severity, scores)
    }

    fn cd_from(
        source_id: &str,
        category: Category,
        severity: Severity,
        scores: &[f64],
    ) -> CorrelatedDetection {
        let detection = Detection::new(
            category,
            severity,
            "m",
            source_id,
            SourceLocator::Time {
                start_secs: 61.0,
                end_secs: 66.0,
            },
        )
        .unwrap();
        let correlations = scores
            .iter()
            .map(|s| {
                Correlation::new(*s, "doc", SourceLocator::Page { page: 2 }, "t").unwrap()
            })
            .collect();
        CorrelatedDetection {
            detection,
            correlations,
        }
    }

    #[test]
    fn test_grouping_and_recurrence() {
        let overview = EvidenceOverview::build(&[
            cd(Category::DirectThreat, Severity::High, &[0.9, 0.4]),
            cd(Category::DirectThreat, Severity::High, &[]),
            cd(Category::Gaslighting, Severity::Medium, &[0.35]),
        ]);

        assert_eq!(overview.total_detections, 3);
        assert_eq!(overview.total_correlations, 3);
        assert_eq!(overview.strongest_correlation, Some(0.9));
        assert_eq!(overview.by_category[&Category::DirectThreat].len(), 2);
        assert_eq!(overview.by_category[&Category::DirectThreat][0].locator, "01:01-01:06");
        assert_eq!(
            overview.recurrence[&Category::DirectThreat],
            CategoryRecurrence {
                detections: 2,
                recurring: 1,
                correlations: 2
            }
        );
        assert_eq!(overview.most_severe().len(), 2);
    }

    #[test]
    fn test_empty_overview() {
        let overview = EvidenceOverview::build(&[]);
        assert_eq!(overview, EvidenceOverview::default());
        assert!(overview.most_severe().is_empty());
    }

    #[test]
    fn test_tallies_per_source_and_date() {
        let overview = EvidenceOverview::build(&[
            cd_from("opkald_20230415.wav", Category::DirectThreat, Severity::High, &[]),
            cd_from("opkald_20230415.wav", Category::Gaslighting, Severity::Medium, &[]),
            cd_from("besked 15.04.23.txt", Category::DirectThreat, Severity::High, &[]),
            cd_from("notes.txt", Category::Isolation, Severity::Medium, &[]),
        ]);

        assert_eq!(overview.by_source.len(), 3);
        let call = &overview.by_source["opkald_20230415.wav"];
        assert_eq!(call.count(Category::DirectThreat), 1);
        assert_eq!(call.count(Category::Gaslighting), 1);
        assert_eq!(overview.by_source["notes.txt"].total(), 1);

        // the two date spellings are kept apart and undated sources are skipped
        assert_eq!(
            overview.by_date.keys().collect::<Vec<_>>(),
            vec!["15.04.23", "20230415"]
        );
        assert_eq!(overview.by_date["20230415"].total(), 2);
        assert_eq!(overview.by_date["15.04.23"].count(Category::DirectThreat), 1);
    }

    #[test]
    fn test_source_date() {
        assert_eq!(source_date("lyd_20221101_kl14.mp3"), Some("20221101"));
        assert_eq!(source_date("sms 03.02.22"), Some("03.02.22"));
        assert_eq!(source_date("brev.pdf"), None);
        assert_eq!(source_date("side 2023.pdf"), None);
    }
}
