//! English lexicon for recorded conversations (DK/en)

use crate::contradiction::ContradictionDefinition;
use crate::jurisdiction::{Jurisdiction, Language};
use crate::lexicon::{CategoryDefinition, LexiconDefinition};
use shared_types::Category;

// Apostrophes in transcripts come out as either ' or ’
const APOS: &str = "['’]";

pub const GASLIGHTING: &[&str] = &[
    r"\b(that|it) never happened\b",
    r"\bi never said (that|it)\b",
    r"\byou remember (it )?wrong\b",
    r"\byou{A}?re (imagining things|making (it|things) up|confused|crazy)\b",
];

pub const INVALIDATION: &[&str] = &[
    r"\bit{A}?s not (a big deal|that bad)\b",
    r"\byou{A}?re overreacting\b",
    r"\bstop complaining\b",
];

pub const ECONOMIC_COERCION: &[&str] = &[
    r"\b(you|i) (don{A}t|do not) have (any )?money\b",
    r"\bwho{A}?s going to pay\b",
    r"\byou (never|don{A}t|do not) pay for anything\b",
    r"\byou spend (all )?(my|the|our) money\b",
    r"\bno money for you\b",
];

pub const DIRECT_THREAT: &[&str] = &[
    r"\bi{A}?ll report you\b",
    r"\btake (the|your) children away\b",
    r"\byou{A}?ll lose (the|your) children\b",
    r"\bi{A}?ll call the police\b",
    r"\byou{A}?ll regret (this|it)\b",
    r"\bi{A}?ll (hurt|destroy|ruin) you\b",
];

pub const EMOTIONAL_MANIPULATION: &[&str] = &[
    r"\bit{A}?s (all )?your fault\b",
    r"\bbecause of you\b",
    r"\byou{A}?re destroying (me|my life|this family)\b",
    r"\bif you (really )?loved me\b",
];

pub const EMOTIONAL_BLACKMAIL: &[&str] = &[
    r"\bi don{A}t want to live\b",
    r"\bif you leave\b",
    r"\bi{A}?ll leave you\b",
];

pub const ISOLATION: &[&str] = &[
    r"\byou (can{A}t|cannot|won{A}t) see (them|your friends|your family)\b",
    r"\bstay away from (them|your friends|your family)\b",
    r"\bi{A}?m the only one who\b",
];

pub const PSYCHOLOGICAL_CONTROL: &[&str] = &[
    r"\byou (need|have) to ask (me|my permission)\b",
    r"\byou{A}?re not allowed\b",
    r"\bi decide\b",
];

pub const HUMILIATION: &[&str] = &[
    r"\byou{A}?re (worthless|useless|pathetic|stupid|an idiot)\b",
    r"\bnobody (wants|likes) you\b",
];

pub const CONTRADICTION: &[&str] = &[
    r"\b(before i said|now i{A}?m saying|but earlier you said)\b",
    r"\b(i{A}?ve changed my mind|i see it differently now)\b",
    r"\b(that{A}?s not what i said|you misunderstood me|it{A}?s not like that)\b",
];

/// Expand the `{A}` placeholder into the apostrophe class.
fn expand(patterns: &[&str]) -> Vec<String> {
    patterns.iter().map(|p| p.replace("{A}", APOS)).collect()
}

fn category(category: Category, patterns: &[&str]) -> CategoryDefinition {
    let expanded = expand(patterns);
    let refs: Vec<&str> = expanded.iter().map(String::as_str).collect();
    CategoryDefinition::from_patterns(category, &refs)
}

pub fn contradictions() -> ContradictionDefinition {
    ContradictionDefinition {
        language: Language::English,
        patterns: expand(CONTRADICTION),
    }
}

pub fn definition() -> LexiconDefinition {
    LexiconDefinition {
        jurisdiction: Jurisdiction::DK,
        language: Language::English,
        name: Some("Conversations (English)".to_string()),
        categories: vec![
            category(Category::DirectThreat, DIRECT_THREAT),
            category(Category::EconomicCoercion, ECONOMIC_COERCION),
            category(Category::Gaslighting, GASLIGHTING),
            category(Category::Invalidation, INVALIDATION),
            category(Category::EmotionalManipulation, EMOTIONAL_MANIPULATION),
            category(Category::EmotionalBlackmail, EMOTIONAL_BLACKMAIL),
            category(Category::Isolation, ISOLATION),
            category(Category::PsychologicalControl, PSYCHOLOGICAL_CONTROL),
            category(Category::Humiliation, HUMILIATION),
        ],
    }
}
