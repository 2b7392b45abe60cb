// src/search.rs
//! Catalog search over the published catalog document and the mapping.
//! Pure functions; the viewer in `gui` only renders what these return.

use std::collections::BTreeSet;
use std::ops::Range;
use std::path::Path;

use regex::RegexBuilder;
use serde::Deserialize;

use crate::error::{read_text, PassError, Result};
use crate::mapping::TerritorialMapping;

/// One photo in the published catalog.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CatalogRecord {
    #[serde(alias = "Photo Name")]
    pub photo_name: String,
    pub description: String,
    pub clip_tags: String,
    pub thumb_url: Option<String>,
    pub image_url: Option<String>,
}

impl CatalogRecord {
    pub fn display_name(&self) -> &str {
        if self.photo_name.trim().is_empty() { "Untitled" } else { &self.photo_name }
    }

    pub fn tags(&self) -> Vec<&str> {
        split_tags(&self.clip_tags)
    }
}

pub fn load_catalog(path: &Path) -> Result<Vec<CatalogRecord>> {
    let text = read_text(path)?;
    let records: Vec<CatalogRecord> = serde_json::from_str(&text)
        .map_err(|e| PassError::malformed_source(path, e.to_string()))?;
    logf!("Catalog: {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Tags are free text separated by `,` `;` `|` or newlines.
pub fn split_tags(raw: &str) -> Vec<&str> {
    raw.split([',', ';', '|', '\n'])
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect()
}

pub fn all_tags(records: &[CatalogRecord]) -> Vec<String> {
    let set: BTreeSet<&str> = records.iter().flat_map(|r| r.tags()).collect();
    set.into_iter().map(String::from).collect()
}

/// Distinct `first_nation` values, sorted. These are the territory filter choices.
pub fn all_territories(mapping: &TerritorialMapping) -> Vec<String> {
    mapping.tally().0.into_keys().collect()
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Query {
    pub text: String,
    /// Exact `first_nation` value; `None` means any
    pub territory: Option<String>,
    /// Record matches when it carries any of these (case-insensitive)
    pub tags: Vec<String>,
}

impl Query {
    pub fn text(text: impl Into<String>) -> Self {
        Self { text: text.into(), ..Self::default() }
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty() && self.territory.is_none() && self.tags.is_empty()
    }

    pub fn matches(&self, rec: &CatalogRecord, mapping: &TerritorialMapping) -> bool {
        let first_nation = mapping
            .get(&rec.photo_name)
            .map(|e| e.first_nation.as_str())
            .unwrap_or("");

        let term = self.text.trim().to_lowercase();
        if !term.is_empty() {
            let hit = rec.description.to_lowercase().contains(&term)
                || rec.clip_tags.to_lowercase().contains(&term)
                || first_nation.to_lowercase().contains(&term);
            if !hit { return false; }
        }

        if let Some(territory) = &self.territory {
            if first_nation != territory { return false; }
        }

        if !self.tags.is_empty() {
            let tags = rec.tags();
            let any = self
                .tags
                .iter()
                .any(|want| tags.iter().any(|t| t.eq_ignore_ascii_case(want.trim())));
            if !any { return false; }
        }

        true
    }
}

/// Records matching `query`, in catalog order.
pub fn search<'a>(records: &'a [CatalogRecord], mapping: &TerritorialMapping, query: &Query) -> Vec<&'a CatalogRecord> {
    records.iter().filter(|r| query.matches(r, mapping)).collect()
}

/// Byte ranges of `text` matching `term` case-insensitively. Empty term → none.
pub fn highlight(text: &str, term: &str) -> Vec<Range<usize>> {
    let term = term.trim();
    if term.is_empty() || text.is_empty() { return Vec::new(); }

    match RegexBuilder::new(&regex::escape(term)).case_insensitive(true).build() {
        Ok(re) => re.find_iter(text).map(|m| m.range()).collect(),
        Err(e) => {
            logd!("Search: highlight pattern failed: {e}");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_split_on_all_separators() {
        assert_eq!(split_tags("lichen, bark;moss | coastal\nrock,, "), vec!["lichen", "bark", "moss", "coastal", "rock"]);
    }

    #[test]
    fn highlight_is_case_insensitive_and_literal() {
        let text = "Lichen on lichen (wet)";
        assert_eq!(highlight(text, "LICHEN"), vec![0..6, 10..16]);
        assert_eq!(highlight(text, "(wet)"), vec![17..22]);
        assert!(highlight(text, "  ").is_empty());
    }

    #[test]
    fn catalog_record_accepts_photo_name_alias() {
        let rec: CatalogRecord = serde_json::from_str(r#"{"Photo Name": "DSC1", "clip_tags": "a,b"}"#).unwrap();
        assert_eq!(rec.photo_name, "DSC1");
        assert_eq!(rec.tags(), vec!["a", "b"]);
        assert!(rec.thumb_url.is_none());
    }
}
