//! Cross-corpus correlation
//!
//! Each detection of corpus A is compared against every unit of corpus B.
//! Pairings scoring at least the threshold are kept, best first, capped per
//! detection. Cost is bounded three ways: a word index rejects units sharing
//! no word with the query, a length bound rejects units before the quadratic
//! comparison, and compared text is truncated.

pub mod correlator;
pub mod index;
pub mod similarity;

pub use correlator::{CorrelationBudget, CorrelationSettings, CrossCorpusCorrelator};
pub use similarity::similarity;

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use shared_types::{Category, Detection, Document, Severity, SourceLocator};

    proptest! {
        /// Property: every correlation list is sorted descending and capped
        #[test]
        fn sorted_and_capped(
            query in "[a-e ]{1,30}",
            segments in prop::collection::vec("[a-e ]{0,30}", 0..15),
            cap in 0usize..6,
            prefilter in any::<bool>(),
        ) {
            let settings = CorrelationSettings {
                max_per_detection: cap,
                prefilter,
                ..CorrelationSettings::default()
            };
            let corpus = vec![Document::from_pages("b", segments)];
            let detection = Detection::new(
                Category::Gaslighting,
                Severity::Medium,
                "q",
                "a",
                SourceLocator::Page { page: 1 },
            )
            .unwrap()
            .with_context(query.clone(), query);

            let result = CrossCorpusCorrelator::new(settings).correlate(&[detection], &corpus);
            prop_assert_eq!(result.len(), 1);
            let scores: Vec<f64> = result[0].correlations.iter().map(|c| c.similarity_score).collect();
            prop_assert!(scores.len() <= cap);
            for pair in scores.windows(2) {
                prop_assert!(pair[0] >= pair[1]);
            }
            for s in scores {
                prop_assert!(s >= 0.3 && s <= 1.0);
            }
        }
    }
}
