//! Inverted word index over the units of a corpus
//!
//! Used to skip units that share no word with a query before any character
//! comparison is done.

use super::similarity::PreparedText;
use crate::patterns::index_keys;
use shared_types::{Document, SourceLocator};
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone)]
pub struct IndexedUnit {
    pub source_id: String,
    pub locator: SourceLocator,
    pub content: String,
    pub prepared: PreparedText,
}

#[derive(Debug, Clone, Default)]
pub struct CorpusIndex {
    units: Vec<IndexedUnit>,
    postings: HashMap<String, Vec<usize>>,
}

impl CorpusIndex {
    /// Index every non-empty unit of the corpus, in corpus order.
    pub fn build(corpus: &[Document], max_compare_chars: usize) -> Self {
        let mut index = Self::default();
        for document in corpus {
            for unit in &document.units {
                if unit.content.trim().is_empty() || unit.locator.validate().is_err() {
                    continue;
                }
                let id = index.units.len();
                for key in index_keys(&unit.content) {
                    index.postings.entry(key).or_default().push(id);
                }
                index.units.push(IndexedUnit {
                    source_id: unit.source_id.clone(),
                    locator: unit.locator,
                    content: unit.content.clone(),
                    prepared: PreparedText::new(&unit.content, max_compare_chars),
                });
            }
        }
        index
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn unit(&self, id: usize) -> &IndexedUnit {
        &self.units[id]
    }

    /// Ids of units sharing at least one word with `text`, ascending.
    pub fn candidates(&self, text: &str) -> Vec<usize> {
        let mut ids = BTreeSet::new();
        for key in index_keys(text) {
            if let Some(posting) = self.postings.get(&key) {
                ids.extend(posting.iter().copied());
            }
        }
        ids.into_iter().collect()
    }

    /// Every unit id, ascending
    pub fn all(&self) -> Vec<usize> {
        (0..self.units.len()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_candidates_share_a_word() {
        let corpus = vec![
            Document::from_pages("a", vec!["You never pay.", "", "Meeting moved to Tuesday"]),
            Document::from_pages("b", vec!["pay me back"]),
        ];
        let index = CorpusIndex::build(&corpus, 1000);
        assert_eq!(index.len(), 3);
        assert_eq!(index.candidates("who will PAY?"), vec![0, 2]);
        assert!(index.candidates("completely unrelated").is_empty());
        assert_eq!(index.unit(2).source_id, "b");
    }
}
