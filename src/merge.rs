// src/merge.rs
//! The only code that mutates a `TerritorialMapping`. Every operation returns
//! the list of changes it made so the runner can report them.

use std::collections::BTreeMap;

use crate::config::consts::NATION_SEP;
use crate::error::{PassError, Result};
use crate::extract::Normalizer;
use crate::mapping::{TerritorialMapping, TerritoryEntry};

/// Decides whether an incoming entry may land on a key.
pub trait MergePolicy {
    fn label(&self) -> &'static str;

    /// `existing` is the entry currently under the key, if any.
    fn admit(&self, existing: Option<&TerritoryEntry>) -> bool;
}

/// Automated extraction: only keys not yet mapped.
pub struct FillAbsent;

impl MergePolicy for FillAbsent {
    fn label(&self) -> &'static str { "fill-absent" }
    fn admit(&self, existing: Option<&TerritoryEntry>) -> bool { existing.is_none() }
}

/// Manual corrections: always win.
pub struct Overwrite;

impl MergePolicy for Overwrite {
    fn label(&self) -> &'static str { "overwrite" }
    fn admit(&self, _existing: Option<&TerritoryEntry>) -> bool { true }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Change {
    Added { photo_id: String, entry: TerritoryEntry },
    Replaced { photo_id: String, old: TerritoryEntry, new: TerritoryEntry },
    Removed { photo_id: String, old: TerritoryEntry },
}

/// Outcome of one merge call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    pub changes: Vec<Change>,
    /// Keys the policy refused (already mapped under `FillAbsent`)
    pub skipped: Vec<String>,
}

/// Insert entries through `policy`. Identical replacements are not recorded.
pub fn merge_with<P, I>(mapping: &mut TerritorialMapping, incoming: I, policy: &P) -> MergeOutcome
where
    P: MergePolicy + ?Sized,
    I: IntoIterator<Item = (String, TerritoryEntry)>,
{
    let mut out = MergeOutcome::default();
    for (photo_id, entry) in incoming {
        if !policy.admit(mapping.get(&photo_id)) {
            logd!("Merge[{}]: keeping existing {photo_id}", policy.label());
            out.skipped.push(photo_id);
            continue;
        }
        match mapping.insert(photo_id.clone(), entry.clone()) {
            None => out.changes.push(Change::Added { photo_id, entry }),
            Some(old) if old != entry => out.changes.push(Change::Replaced { photo_id, old, new: entry }),
            Some(_) => {}
        }
    }
    out
}

/// Extraction results → mapping. Existing keys are never touched; photos with
/// no nations are ignored.
pub fn merge_extracted<I>(mapping: &mut TerritorialMapping, found: I) -> MergeOutcome
where
    I: IntoIterator<Item = (String, Vec<String>)>,
{
    let entries = found
        .into_iter()
        .filter_map(|(id, nations)| TerritoryEntry::from_nations(&nations).map(|e| (id, e)));
    merge_with(mapping, entries, &FillAbsent)
}

/// Manual fixes. All entries are checked before any is applied, so one bad
/// entry leaves the mapping unchanged.
pub fn apply_corrections(
    mapping: &mut TerritorialMapping,
    corrections: Vec<(String, TerritoryEntry)>,
) -> Result<MergeOutcome> {
    let mut checked = Vec::with_capacity(corrections.len());
    for (photo_id, entry) in corrections {
        let first_nation = entry
            .nations()
            .collect::<Vec<_>>()
            .join(NATION_SEP);
        if first_nation.is_empty() {
            return Err(PassError::EmptyNation { photo_id });
        }
        let ack = entry.full_acknowledgement.trim();
        let entry = if ack.is_empty() {
            TerritoryEntry::new(first_nation)
        } else {
            TerritoryEntry { first_nation, full_acknowledgement: s!(ack) }
        };
        checked.push((photo_id, entry));
    }
    Ok(merge_with(mapping, checked, &Overwrite))
}

/// Delete the given keys. Absent keys are a no-op.
pub fn remove_entries<S: AsRef<str>>(mapping: &mut TerritorialMapping, ids: &[S]) -> Vec<Change> {
    ids.iter()
        .filter_map(|id| {
            let id = id.as_ref().trim();
            mapping.remove(id).map(|old| Change::Removed { photo_id: s!(id), old })
        })
        .collect()
}

/// Replace whole `first_nation` values by exact match. The acknowledgement
/// text is kept as written.
pub fn rename_nations(mapping: &mut TerritorialMapping, renames: &BTreeMap<String, String>) -> Vec<Change> {
    let targets: Vec<(String, String)> = mapping
        .iter()
        .filter_map(|(id, e)| renames.get(&e.first_nation).map(|new| (id.clone(), new.clone())))
        .collect();

    rewrite_nations(mapping, targets)
}

/// Run every component of every `first_nation` through `normalizer` and
/// rewrite entries that come out different.
pub fn renormalize(mapping: &mut TerritorialMapping, normalizer: &Normalizer) -> Vec<Change> {
    let targets: Vec<(String, String)> = mapping
        .iter()
        .filter_map(|(id, e)| {
            let mut names: Vec<String> = Vec::new();
            for n in e.nations().map(|n| normalizer.normalize(n)) {
                if !names.contains(&n) { names.push(n); }
            }
            let joined = names.join(NATION_SEP);
            (!joined.is_empty() && joined != e.first_nation).then(|| (id.clone(), joined))
        })
        .collect();

    rewrite_nations(mapping, targets)
}

fn rewrite_nations(mapping: &mut TerritorialMapping, targets: Vec<(String, String)>) -> Vec<Change> {
    let mut changes = Vec::with_capacity(targets.len());
    for (photo_id, first_nation) in targets {
        if first_nation.trim().is_empty() { continue; }
        let Some(entry) = mapping.get_mut(&photo_id) else { continue };
        if entry.first_nation == first_nation { continue; }
        let old = entry.clone();
        entry.first_nation = first_nation;
        changes.push(Change::Replaced { photo_id, old, new: entry.clone() });
    }
    changes
}
