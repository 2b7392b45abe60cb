// src/extract/phrases.rs
//
// Candidate phrase extraction. Every pattern runs over the whole description
// in order; all matches are yielded (duplicates included, the caller dedups).

use std::sync::LazyLock;

use regex::Regex;

use crate::config::rules::RuleSet;
use crate::core::sanitize::clean_phrase;
use crate::error::{PassError, Result};

/// (name, regex, extend_listing). Most specific first.
const BUILTIN: &[(&str, &str, bool)] = &[
    (
        "territorial-acknowledgement",
        r"(?i)territorial\s+acknowledge?ments?\s+to\s+(?:the\s+)?([^.]+?)(?:\.|,|$)",
        true,
    ),
    (
        "acknowledgement",
        r"(?i)acknowledge?ments?\s+to\s+(?:the\s+)?([^.]+?)(?:\.|,|$)",
        true,
    ),
    (
        "on-territory",
        r"(?i:\bon\s+(?:the\s+)?)(\p{Lu}[\w'’/-]*(?:\s+\p{Lu}[\w'’/-]*)*)\s+(?i:territory)\b",
        false,
    ),
    (
        "territory",
        r"(\p{Lu}[\w'’/-]*(?:\s+\p{Lu}[\w'’/-]*)*)\s+(?i:territory)\b",
        false,
    ),
];

// Continuation of a nation list after a comma cut: further capitalized names
// joined by `,` or `and`. A lowercase word or the sentence end stops it.
static LIST_TAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(?:\s*,\s*(?i:and\s+)?|\s+(?i:and)\s+)\p{Lu}[\w'’/-]*(?:\s+\p{Lu}[\w'’/-]*)*)+")
        .expect("list tail pattern compiles")
});

static BUILTIN_PATTERNS: LazyLock<Vec<PhrasePattern>> = LazyLock::new(|| {
    BUILTIN
        .iter()
        .map(|(name, src, extend)| PhrasePattern::new(name, src, *extend).expect("built-in pattern compiles"))
        .collect()
});

pub fn builtin_patterns() -> Vec<PhrasePattern> {
    BUILTIN_PATTERNS.clone()
}

/// One phrase pattern. Capture group 1 is the phrase.
#[derive(Clone, Debug)]
pub struct PhrasePattern {
    name: String,
    regex: Regex,
    /// Phrases holding a list marker and cut at a comma run on through the nation list.
    extend_listing: bool,
}

impl PhrasePattern {
    pub fn new(name: &str, src: &str, extend_listing: bool) -> Result<Self> {
        let pattern_err = |reason: String| PassError::Pattern { name: s!(name), reason };

        let regex = Regex::new(src).map_err(|e| pattern_err(e.to_string()))?;
        if regex.captures_len() < 2 {
            return Err(pattern_err(s!("needs a capture group for the phrase")));
        }
        Ok(Self { name: s!(name), regex, extend_listing })
    }

    pub fn name(&self) -> &str { &self.name }
}

/// Lazy phrase sequence over one description. Clone it to restart.
#[derive(Clone, Debug)]
pub struct Phrases<'r, 'h> {
    rules: &'r RuleSet,
    text: &'h str,
    pattern_ix: usize,
    pos: usize,
}

pub fn phrases<'r, 'h>(text: &'h str, rules: &'r RuleSet) -> Phrases<'r, 'h> {
    Phrases { rules, text, pattern_ix: 0, pos: 0 }
}

impl<'r, 'h> Phrases<'r, 'h> {
    /// Next raw (uncleaned) phrase for the current pattern, advancing `pos`.
    fn next_raw(&mut self, pattern: &PhrasePattern) -> Option<&'h str> {
        let text = self.text;
        if self.pos > text.len() { return None; }

        let caps = pattern.regex.captures_at(text, self.pos)?;
        let whole = caps.get(0)?;

        self.pos = if whole.end() > whole.start() {
            whole.end()
        } else {
            // empty match: step one char so the scan terminates
            whole.end() + text[whole.end()..].chars().next().map_or(1, char::len_utf8)
        };

        let Some(cap) = caps.get(1) else { return Some(""); };
        let mut end = cap.end();

        let cut_at_comma = text[cap.end()..].starts_with(',');
        if pattern.extend_listing && cut_at_comma && self.rules.find_list_marker(cap.as_str()).is_some() {
            end += LIST_TAIL.find(&text[cap.end()..]).map_or(0, |m| m.end());
            self.pos = self.pos.max(end);
        }

        Some(&text[cap.start()..end])
    }
}

impl<'r, 'h> Iterator for Phrases<'r, 'h> {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        let patterns = self.rules.patterns();
        while let Some(pattern) = patterns.get(self.pattern_ix) {
            match self.next_raw(pattern) {
                Some(raw) => {
                    let phrase = clean_phrase(raw);
                    if !phrase.is_empty() {
                        return Some(phrase);
                    }
                }
                None => {
                    self.pattern_ix += 1;
                    self.pos = 0;
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all(text: &str) -> Vec<String> {
        let rules = RuleSet::builtin();
        phrases(text, &rules).collect()
    }

    #[test]
    fn acknowledgement_stops_at_period_or_comma() {
        let got = all("Credit: J. Doe. territorial acknowledgement to the Secwepemc.");
        // pattern 1 and pattern 2 both hit the same phrase
        assert_eq!(got, vec!["Secwepemc", "Secwepemc"]);

        let got = all("Acknowledgement to the Tahltan, photo by K.");
        assert_eq!(got, vec!["Tahltan"]);
    }

    #[test]
    fn listing_runs_to_end_of_nation_list() {
        let got = all("territorial acknowledgement to the Coast Salish Nations of Musqueam, Tsleil-Waututh and Squamish. Donated.");
        assert_eq!(got[0], "Coast Salish Nations of Musqueam, Tsleil-Waututh and Squamish");

        let got = all("territorial acknowledgement to the Coast Salish Nations of Musqueam, Tsleil-Waututh, and Squamish, photo by J. Doe.");
        assert_eq!(got[0], "Coast Salish Nations of Musqueam, Tsleil-Waututh, and Squamish");
    }

    #[test]
    fn territory_patterns_need_a_capitalized_phrase() {
        assert_eq!(all("shot on the Gitxsan territory"), vec!["Gitxsan", "Gitxsan"]);
        assert!(all("shot on unceded territory").is_empty());
    }

    #[test]
    fn empty_description_yields_nothing() {
        assert!(all("").is_empty());
        assert!(all("Credit: Jane Doe, licensed CC-BY.").is_empty());
    }

    #[test]
    fn sequence_is_restartable() {
        let rules = RuleSet::builtin();
        let seq = phrases("on the Tahltan territory", &rules);
        let first: Vec<_> = seq.clone().collect();
        let second: Vec<_> = seq.collect();
        assert_eq!(first, second);
    }

    #[test]
    fn pattern_needs_a_group() {
        assert!(PhrasePattern::new("x", "territory", false).is_err());
        assert!(PhrasePattern::new("x", "(", false).is_err());
    }
}
