//! Text similarity used to pair detections with units of another corpus
//!
//! `0.6 * gestalt ratio + 0.4 * token Jaccard`, both computed on trimmed,
//! lowercased text. The gestalt ratio is the Ratcliff/Obershelp measure:
//! twice the number of characters in recursively found longest common blocks
//! divided by the total length.

use crate::patterns::{token_set, truncate_chars};
use std::collections::{BTreeSet, HashMap};

pub const SEQUENCE_WEIGHT: f64 = 0.6;
pub const JACCARD_WEIGHT: f64 = 0.4;

/// Default cap on compared characters per side
pub const DEFAULT_MAX_COMPARE_CHARS: usize = 1000;

/// Text prepared once for repeated comparison.
#[derive(Debug, Clone)]
pub struct PreparedText {
    chars: Vec<char>,
    tokens: BTreeSet<String>,
}

impl PreparedText {
    pub fn new(text: &str, max_chars: usize) -> Self {
        let lowered = text.trim().to_lowercase();
        let clipped = truncate_chars(&lowered, max_chars);
        Self {
            chars: clipped.chars().collect(),
            tokens: token_set(clipped),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn tokens(&self) -> &BTreeSet<String> {
        &self.tokens
    }
}

/// Similarity of two raw strings with the default character cap.
pub fn similarity(a: &str, b: &str) -> f64 {
    combined(
        &PreparedText::new(a, DEFAULT_MAX_COMPARE_CHARS),
        &PreparedText::new(b, DEFAULT_MAX_COMPARE_CHARS),
    )
}

/// Weighted similarity in [0, 1]. Empty input on either side scores 0.
pub fn combined(a: &PreparedText, b: &PreparedText) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let score = SEQUENCE_WEIGHT * sequence_ratio(&a.chars, &b.chars)
        + JACCARD_WEIGHT * jaccard(&a.tokens, &b.tokens);
    score.clamp(0.0, 1.0)
}

/// Cheap upper bound on `combined`: the sequence ratio can never exceed
/// `2 * min(len) / (len_a + len_b)`.
pub fn upper_bound(a: &PreparedText, b: &PreparedText) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let (la, lb) = (a.len() as f64, b.len() as f64);
    let length_bound = 2.0 * la.min(lb) / (la + lb);
    (SEQUENCE_WEIGHT * length_bound + JACCARD_WEIGHT * jaccard(&a.tokens, &b.tokens))
        .clamp(0.0, 1.0)
}

pub fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    intersection as f64 / union as f64
}

/// Ratcliff/Obershelp ratio `2M / T`. Both empty scores 1.
pub fn sequence_ratio(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matching_characters(a, b) as f64 / total as f64
}

/// Total size of the matching blocks found by recursive longest-match.
fn matching_characters(a: &[char], b: &[char]) -> usize {
    let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
    for (j, c) in b.iter().enumerate() {
        b2j.entry(*c).or_default().push(j);
    }

    let mut matched = 0;
    let mut queue = vec![(0, a.len(), 0, b.len())];
    while let Some((alo, ahi, blo, bhi)) = queue.pop() {
        let (i, j, k) = longest_match(a, &b2j, alo, ahi, blo, bhi);
        if k == 0 {
            continue;
        }
        matched += k;
        if alo < i && blo < j {
            queue.push((alo, i, blo, j));
        }
        if i + k < ahi && j + k < bhi {
            queue.push((i + k, ahi, j + k, bhi));
        }
    }
    matched
}

/// Longest common block of `a[alo..ahi]` and `b[blo..bhi]`; earliest in `a`,
/// then earliest in `b`, on ties. Returns `(i, j, size)`.
fn longest_match(
    a: &[char],
    b2j: &HashMap<char, Vec<usize>>,
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);
    // j2len[j] = length of the match ending at a[i-1], b[j]
    let mut j2len: HashMap<usize, usize> = HashMap::new();

    for (i, c) in a.iter().enumerate().take(ahi).skip(alo) {
        let mut next: HashMap<usize, usize> = HashMap::new();
        if let Some(positions) = b2j.get(c) {
            for &j in positions {
                if j < blo {
                    continue;
                }
                if j >= bhi {
                    break;
                }
                let k = if j > 0 {
                    j2len.get(&(j - 1)).copied().unwrap_or(0) + 1
                } else {
                    1
                };
                next.insert(j, k);
                if k > best_size {
                    best_i = i + 1 - k;
                    best_j = j + 1 - k;
                    best_size = k;
                }
            }
        }
        j2len = next;
    }

    (best_i, best_j, best_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_sequence_ratio_known_values() {
        // "abcd" vs "bcde": one block "bcd", 2*3/8
        assert!((sequence_ratio(&chars("abcd"), &chars("bcde")) - 0.75).abs() < 1e-9);
        assert_eq!(sequence_ratio(&chars("same"), &chars("same")), 1.0);
        assert_eq!(sequence_ratio(&chars("abc"), &chars("xyz")), 0.0);
        assert_eq!(sequence_ratio(&[], &[]), 1.0);
    }

    #[test]
    fn test_sequence_ratio_recurses_both_sides() {
        // blocks "ab" and "de" around the differing middle
        let r = sequence_ratio(&chars("abXde"), &chars("abYde"));
        assert!((r - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_jaccard() {
        let a = token_set("you never pay");
        let b = token_set("you always pay");
        assert!((jaccard(&a, &b) - 0.5).abs() < 1e-9);
        assert_eq!(jaccard(&BTreeSet::new(), &BTreeSet::new()), 0.0);
    }

    #[test]
    fn test_paraphrase_scores_above_default_threshold() {
        let score = similarity("you never pay for anything", "you don't pay for anything, ever");
        assert!(score >= 0.3, "score was {}", score);
        assert!(score <= 1.0);
    }

    #[test]
    fn test_empty_input_scores_zero() {
        assert_eq!(similarity("", "anything"), 0.0);
        assert_eq!(similarity("   ", "anything"), 0.0);
    }

    #[test]
    fn test_identical_text_scores_one() {
        assert!((similarity("Du får ingen penge", "du får ingen penge  ") - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_cap_limits_compared_text() {
        let long = "a".repeat(5000);
        let prepared = PreparedText::new(&long, 100);
        assert_eq!(prepared.len(), 100);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: score stays in [0, 1] and never exceeds its upper bound
        #[test]
        fn bounded(a in "\\PC{0,80}", b in "\\PC{0,80}") {
            let pa = PreparedText::new(&a, 1000);
            let pb = PreparedText::new(&b, 1000);
            let score = combined(&pa, &pb);
            prop_assert!((0.0..=1.0).contains(&score));
            prop_assert!(score <= upper_bound(&pa, &pb) + 1e-9);
        }

        /// Property: sequence ratio stays in the unit interval
        #[test]
        fn ratio_in_unit_interval(a in "[a-d ]{0,40}", b in "[a-d ]{0,40}") {
            let r = sequence_ratio(&a.chars().collect::<Vec<_>>(), &b.chars().collect::<Vec<_>>());
            prop_assert!((0.0..=1.0).contains(&r));
        }
    }
}
