// src/extract/mod.rs
//! # Territory extraction
//!
//! Turns one free-text description into an ordered set of canonical nation
//! names. Three stages, each usable on its own:
//!
//! ```text
//! description ─ phrases::phrases ─► candidate phrases
//!             ─ split::split_phrase ─► raw nation tokens
//!             ─ normalize::Normalizer ─► canonical names (deduped)
//! ```
//!
//! All three read their knobs from one `config::rules::RuleSet`. Nothing here
//! touches the mapping store; merging lives in `merge`.
//!
//! An empty result is the normal outcome for most catalog descriptions and is
//! not an error.

pub mod normalize;
pub mod phrases;
pub mod split;

use crate::config::rules::RuleSet;

pub use normalize::Normalizer;
pub use phrases::{phrases, PhrasePattern, Phrases};
pub use split::split_phrase;

/// Canonical nation names found in `description`, in order of first appearance.
pub fn extract_nations(description: &str, rules: &RuleSet) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for phrase in phrases(description, rules) {
        for token in split_phrase(&phrase, rules) {
            let canonical = rules.normalizer().normalize(token);
            if !canonical.is_empty() && !out.contains(&canonical) {
                out.push(canonical);
            }
        }
    }
    out
}
