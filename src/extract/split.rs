// src/extract/split.rs

use std::sync::LazyLock;

use regex::Regex;

use crate::config::rules::RuleSet;
use crate::core::sanitize::to_lower;

// ", " | ", and " | " and "
static SEPARATORS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s*,\s*(?:and\s+)?|\s+and\s+").expect("separator pattern compiles")
});

/// Split one cleaned phrase into nation-name tokens.
///
/// - A list marker ("coast salish nations of") drops everything up to and
///   including the marker, then the rest is split.
/// - Otherwise a comma or a standalone "and" triggers the same split.
/// - Otherwise the phrase is a single token.
///
/// Tokens shorter than `rules.min_token_len()` chars are noise and dropped.
/// Order of first appearance is kept; duplicates are removed.
pub fn split_phrase<'p>(phrase: &'p str, rules: &RuleSet) -> Vec<&'p str> {
    let pieces: Vec<&'p str> = if let Some((_, marker_end)) = rules.find_list_marker(phrase) {
        SEPARATORS.split(&phrase[marker_end..]).collect()
    } else if phrase.contains(',') || to_lower(phrase).contains(" and ") {
        SEPARATORS.split(phrase).collect()
    } else {
        vec![phrase]
    };

    let mut out: Vec<&'p str> = Vec::with_capacity(pieces.len());
    for piece in pieces {
        let token = piece.trim().trim_end_matches('.').trim();
        if token.chars().count() < rules.min_token_len() { continue; }
        if !out.contains(&token) {
            out.push(token);
        }
    }
    out
}
