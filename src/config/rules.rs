// src/config/rules.rs
//! Versioned extraction rules.
//!
//! One `RuleSet` holds everything the extractor needs: the ordered phrase
//! patterns, the markers that open a multi-nation listing, the minimum token
//! length and the normalization table. The built-in set is version 1; an
//! optional TOML file can add patterns, swap markers and extend the table:
//!
//! ```toml
//! version = 2
//! min_token_len = 3
//! list_markers = ["coast salish nations of"]
//!
//! [[patterns]]
//! name = "credit-territory"
//! regex = '(?i)photographed on ([^.]+?) lands'
//!
//! [normalize]
//! "squamish nation" = "Squamish"
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::core::sanitize::to_lower;
use crate::error::{read_text, PassError, Result};
use crate::extract::normalize::Normalizer;
use crate::extract::phrases::{builtin_patterns, PhrasePattern};

pub const RULES_VERSION: u32 = 1;
pub const DEFAULT_LIST_MARKERS: &[&str] = &["coast salish nations of"];
pub const MIN_TOKEN_LEN: usize = 3;

#[derive(Clone, Debug)]
pub struct RuleSet {
    version: u32,
    patterns: Vec<PhrasePattern>,
    list_markers: Vec<String>,
    min_token_len: usize,
    normalizer: Normalizer,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::builtin()
    }
}

impl RuleSet {
    pub fn builtin() -> Self {
        Self {
            version: RULES_VERSION,
            patterns: builtin_patterns(),
            list_markers: DEFAULT_LIST_MARKERS.iter().map(|m| s!(*m)).collect(),
            min_token_len: MIN_TOKEN_LEN,
            normalizer: Normalizer::builtin(),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = read_text(path)?;
        let rules = Self::from_toml_str(&text, path)?;
        logf!(
            "Rules: loaded {} (version={}, patterns={}, table={})",
            path.display(),
            rules.version,
            rules.patterns.len(),
            rules.normalizer.len()
        );
        Ok(rules)
    }

    /// Layer a TOML rules document over the built-in set.
    /// `origin` only labels errors.
    pub fn from_toml_str(text: &str, origin: &Path) -> Result<Self> {
        let rules_err = |reason: String| PassError::Rules { path: origin.to_path_buf(), reason };

        let file: RulesFile = toml::from_str(text).map_err(|e| rules_err(e.to_string()))?;
        let mut rules = Self::builtin();

        if let Some(v) = file.version {
            rules.version = v;
        }
        if file.replace_patterns {
            rules.patterns.clear();
        }
        for def in &file.patterns {
            rules.patterns.push(PhrasePattern::new(&def.name, &def.regex, def.extend_listing)?);
        }
        if rules.patterns.is_empty() {
            return Err(rules_err(s!("no phrase patterns left after replace_patterns")));
        }

        if let Some(markers) = file.list_markers {
            rules.list_markers = markers
                .iter()
                .map(|m| m.trim().to_lowercase())
                .filter(|m| !m.is_empty())
                .collect();
        }
        if let Some(n) = file.min_token_len {
            rules.min_token_len = n;
        }
        for (raw, canonical) in &file.normalize {
            if canonical.trim().is_empty() {
                return Err(rules_err(format!("normalize entry {raw:?} has an empty canonical name")));
            }
            rules.normalizer.insert(raw, canonical);
        }

        Ok(rules)
    }

    pub fn version(&self) -> u32 { self.version }
    pub fn patterns(&self) -> &[PhrasePattern] { &self.patterns }
    pub fn list_markers(&self) -> &[String] { &self.list_markers }
    pub fn min_token_len(&self) -> usize { self.min_token_len }
    pub fn normalizer(&self) -> &Normalizer { &self.normalizer }

    /// Byte range of the first list marker found in `phrase` (ASCII case-insensitive).
    pub fn find_list_marker(&self, phrase: &str) -> Option<(usize, usize)> {
        let lc = to_lower(phrase);
        self.list_markers
            .iter()
            .filter_map(|m| lc.find(m.as_str()).map(|at| (at, at + m.len())))
            .min_by_key(|(at, _)| *at)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RulesFile {
    version: Option<u32>,
    #[serde(default)]
    replace_patterns: bool,
    #[serde(default)]
    patterns: Vec<PatternDef>,
    list_markers: Option<Vec<String>>,
    min_token_len: Option<usize>,
    #[serde(default)]
    normalize: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PatternDef {
    name: String,
    regex: String,
    #[serde(default)]
    extend_listing: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> &'static Path {
        Path::new("rules.toml")
    }

    #[test]
    fn builtin_is_version_one_with_four_patterns() {
        let rules = RuleSet::builtin();
        assert_eq!(rules.version(), RULES_VERSION);
        assert_eq!(rules.patterns().len(), 4);
        assert_eq!(rules.min_token_len(), 3);
    }

    #[test]
    fn toml_extends_table_and_appends_patterns() {
        let text = r#"
            version = 2

            [[patterns]]
            name = "lands"
            regex = '(?i)photographed on ([^.]+?) lands'

            [normalize]
            "squamish nation" = "Squamish"
        "#;
        let rules = RuleSet::from_toml_str(text, origin()).unwrap();
        assert_eq!(rules.version(), 2);
        assert_eq!(rules.patterns().len(), 5);
        assert_eq!(rules.patterns()[4].name(), "lands");
        assert_eq!(rules.normalizer().normalize("SQUAMISH   nation"), "Squamish");
        // built-in entries survive
        assert_eq!(rules.normalizer().normalize("musqueam"), "Musqueam");
    }

    #[test]
    fn replacing_every_pattern_with_nothing_is_rejected() {
        let err = RuleSet::from_toml_str("replace_patterns = true", origin()).unwrap_err();
        assert!(matches!(err, PassError::Rules { .. }));
    }

    #[test]
    fn pattern_without_capture_group_is_rejected() {
        let text = r#"
            [[patterns]]
            name = "nogroup"
            regex = 'territory'
        "#;
        let err = RuleSet::from_toml_str(text, origin()).unwrap_err();
        assert!(matches!(err, PassError::Pattern { .. }));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = RuleSet::from_toml_str("colour = 'blue'", origin()).unwrap_err();
        assert!(matches!(err, PassError::Rules { .. }));
    }

    #[test]
    fn list_marker_is_found_case_insensitively() {
        let rules = RuleSet::builtin();
        let phrase = "Coast Salish Nations of Musqueam";
        assert_eq!(rules.find_list_marker(phrase), Some((0, 23)));
        assert_eq!(rules.find_list_marker("Secwepemc"), None);
    }
}
