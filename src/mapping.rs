// src/mapping.rs
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::consts::{ACK_PREFIX, NATION_SEP};

/// One resolved photo. `first_nation` holds one canonical name or several
/// joined with ", ".
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerritoryEntry {
    pub first_nation: String,
    pub full_acknowledgement: String,
}

impl TerritoryEntry {
    /// Entry for an extraction result. `None` when there is nothing to store.
    pub fn from_nations<S: AsRef<str>>(nations: &[S]) -> Option<Self> {
        let names: Vec<&str> = nations
            .iter()
            .map(|n| n.as_ref().trim())
            .filter(|n| !n.is_empty())
            .collect();
        if names.is_empty() { return None; }
        Some(Self::new(names.join(NATION_SEP)))
    }

    /// Entry with the acknowledgement synthesized from the nation string.
    pub fn new(first_nation: impl Into<String>) -> Self {
        let first_nation = first_nation.into();
        let full_acknowledgement = join!(ACK_PREFIX, &first_nation);
        Self { first_nation, full_acknowledgement }
    }

    /// Individual names held by `first_nation`.
    pub fn nations(&self) -> impl Iterator<Item = &str> {
        self.first_nation
            .split(',')
            .map(str::trim)
            .filter(|n| !n.is_empty())
    }

    pub fn is_valid(&self) -> bool {
        self.nations().next().is_some()
    }
}

/// The persisted lookup table. Keys stay sorted so the document diffs cleanly.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TerritorialMapping {
    entries: BTreeMap<String, TerritoryEntry>,
}

impl TerritorialMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize { self.entries.len() }
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn contains(&self, photo_id: &str) -> bool {
        self.entries.contains_key(photo_id)
    }

    pub fn get(&self, photo_id: &str) -> Option<&TerritoryEntry> {
        self.entries.get(photo_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &TerritoryEntry)> {
        self.entries.iter()
    }

    // Mutation goes through `merge` so every change is accounted for.
    pub(crate) fn insert(&mut self, photo_id: String, entry: TerritoryEntry) -> Option<TerritoryEntry> {
        self.entries.insert(photo_id, entry)
    }

    pub(crate) fn remove(&mut self, photo_id: &str) -> Option<TerritoryEntry> {
        self.entries.remove(photo_id)
    }

    pub(crate) fn get_mut(&mut self, photo_id: &str) -> Option<&mut TerritoryEntry> {
        self.entries.get_mut(photo_id)
    }

    /// Frequency of each distinct `first_nation` value.
    pub fn tally(&self) -> Tally {
        let mut counts = BTreeMap::new();
        for entry in self.entries.values() {
            *counts.entry(entry.first_nation.clone()).or_insert(0) += 1;
        }
        Tally(counts)
    }

    /// Keys whose entry breaks the non-empty-nation rule (hand-edited documents).
    pub fn invalid_keys(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(_, e)| !e.is_valid())
            .map(|(k, _)| k.as_str())
            .collect()
    }
}

impl FromIterator<(String, TerritoryEntry)> for TerritorialMapping {
    fn from_iter<I: IntoIterator<Item = (String, TerritoryEntry)>>(iter: I) -> Self {
        Self { entries: iter.into_iter().collect() }
    }
}

/// `first_nation` value → number of photos.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tally(pub BTreeMap<String, usize>);

impl Tally {
    pub fn get(&self, first_nation: &str) -> usize {
        self.0.get(first_nation).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.0.values().sum()
    }

    /// Most frequent first; ties by name.
    pub fn ranked(&self) -> Vec<(&str, usize)> {
        let mut v: Vec<(&str, usize)> = self.0.iter().map(|(k, n)| (k.as_str(), *n)).collect();
        v.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        v
    }
}

impl fmt::Display for Tally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ranked = self.ranked();
        let width = ranked.iter().map(|(k, _)| k.chars().count()).max().unwrap_or(0);
        for (name, n) in ranked {
            writeln!(f, "{name:<width$}  {n:>5}")?;
        }
        write!(f, "{:<width$}  {:>5}", "total", self.total())
    }
}
