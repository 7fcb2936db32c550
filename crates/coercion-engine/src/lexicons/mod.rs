//! Built-in lexicons
//!
//! Each module provides the definition for one (jurisdiction, language) key
//! and the contradiction markers for its language. They are compiled through
//! the same path as configured ones.

pub mod danish;
pub mod english;
pub mod spanish;

use crate::contradiction::ContradictionDefinition;
use crate::lexicon::LexiconDefinition;

pub fn builtin_definitions() -> Vec<LexiconDefinition> {
    vec![
        danish::definition(),
        spanish::definition(),
        english::definition(),
    ]
}

pub fn builtin_contradictions() -> Vec<ContradictionDefinition> {
    vec![
        danish::contradictions(),
        spanish::contradictions(),
        english::contradictions(),
    ]
}
