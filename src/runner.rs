// src/runner.rs
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use crate::{
    audit::{audit, AuditReport},
    config::options::PassOptions,
    error::{PassError, Result},
    extract::extract_nations,
    mapping::{Tally, TerritorialMapping, TerritoryEntry},
    merge::{apply_corrections, merge_extracted, remove_entries, rename_nations, renormalize, Change},
    progress::Progress,
    records::load_records,
    store::MappingStore,
};

/// One operator-invoked pass over the mapping.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Pass {
    /// Create an empty mapping document when none exists
    Init,
    /// Records without an entry → extraction → fill-absent merge
    Extract,
    /// Explicit corrections, overwrite
    Fix(Vec<(String, TerritoryEntry)>),
    Remove(Vec<String>),
    /// Whole `first_nation` value → replacement
    Rename(BTreeMap<String, String>),
    /// Re-run stored names through the current normalization table
    Renormalize,
    /// Read-only look at unmapped records; optional CSV of the unmapped list
    Audit { out: Option<PathBuf> },
    Tally,
}

impl Pass {
    pub fn name(&self) -> &'static str {
        match self {
            Pass::Init => "init",
            Pass::Extract => "extract",
            Pass::Fix(_) => "fix",
            Pass::Remove(_) => "remove",
            Pass::Rename(_) => "rename",
            Pass::Renormalize => "normalize",
            Pass::Audit { .. } => "audit",
            Pass::Tally => "tally",
        }
    }

    pub fn mutates(&self) -> bool {
        !matches!(self, Pass::Audit { .. } | Pass::Tally)
    }
}

/// Summary of what a pass did.
#[derive(Clone, Debug, Default)]
pub struct PassReport {
    pub pass: &'static str,
    pub changes: Vec<Change>,
    /// Records whose photo_id was already mapped
    pub skipped_existing: usize,
    /// Records examined with no territory match
    pub unmatched: usize,
    /// Entries in the mapping after the pass
    pub entries: usize,
    pub tally: Tally,
    pub audit: Option<AuditReport>,
    /// Keys left with a blank nation; the document is not rewritten while any remain
    pub invalid: Vec<String>,
    /// Requested ids that had no entry (remove pass)
    pub not_found: Vec<String>,
    /// Whether the mapping document was (re)written
    pub persisted: bool,
}

impl PassReport {
    pub fn count_added(&self) -> usize {
        self.changes.iter().filter(|c| matches!(c, Change::Added { .. })).count()
    }
    pub fn count_replaced(&self) -> usize {
        self.changes.iter().filter(|c| matches!(c, Change::Replaced { .. })).count()
    }
    pub fn count_removed(&self) -> usize {
        self.changes.iter().filter(|c| matches!(c, Change::Removed { .. })).count()
    }
}

/// Top-level runner: load, dispatch on pass kind, persist on success.
/// Nothing is written when any step fails or when `opts.dry_run` is set.
pub fn run(pass: Pass, opts: &PassOptions, progress: &mut dyn Progress) -> Result<PassReport> {
    let store = MappingStore::new(&opts.mapping);
    let name = pass.name();
    logf!("Pass {name}: start (mapping={}, dry_run={})", store.path().display(), opts.dry_run);

    let result = dispatch(pass, &store, opts, progress);
    progress.finish();

    match &result {
        Ok(r) => logf!(
            "Pass {name}: done, +{} ~{} -{}, {} entries, persisted={}",
            r.count_added(),
            r.count_replaced(),
            r.count_removed(),
            r.entries,
            r.persisted
        ),
        Err(e) => loge!("Pass {name}: {e}"),
    }
    result
}

fn dispatch(pass: Pass, store: &MappingStore, opts: &PassOptions, progress: &mut dyn Progress) -> Result<PassReport> {
    let mut report = PassReport { pass: pass.name(), ..PassReport::default() };

    if let Pass::Init = pass {
        return init(report, store, opts, progress);
    }

    let mut mapping = store.load()?;
    let mutates = pass.mutates();

    match pass {
        Pass::Init | Pass::Tally => {}

        Pass::Extract => {
            let rules = opts.load_rules()?;
            let records = load_records(&opts.records)?;
            progress.begin(records.len());

            let mut found = Vec::new();
            for rec in &records {
                if mapping.contains(&rec.photo_id) {
                    report.skipped_existing += 1;
                    continue;
                }
                let nations = extract_nations(&rec.description, &rules);
                progress.item_done(&rec.photo_id, &nations);
                if nations.is_empty() {
                    report.unmatched += 1;
                } else {
                    logd!("Extract: {} -> {}", rec.photo_id, nations.join(", "));
                    found.push((rec.photo_id.clone(), nations));
                }
            }
            let outcome = merge_extracted(&mut mapping, found);
            report.skipped_existing += outcome.skipped.len();
            report.changes = outcome.changes;
        }

        Pass::Fix(corrections) => {
            progress.begin(corrections.len());
            report.changes = apply_corrections(&mut mapping, corrections)?.changes;
        }

        Pass::Remove(ids) => {
            progress.begin(ids.len());
            let requested: BTreeSet<&str> = ids.iter().map(|id| id.trim()).collect();
            report.not_found = requested
                .into_iter()
                .filter(|id| !mapping.contains(id))
                .map(String::from)
                .collect();
            report.changes = remove_entries(&mut mapping, ids.as_slice());
            if !report.not_found.is_empty() {
                progress.log(&format!("{} id(s) were not in the mapping", report.not_found.len()));
            }
        }

        Pass::Rename(renames) => {
            report.changes = rename_nations(&mut mapping, &renames);
        }

        Pass::Renormalize => {
            let rules = opts.load_rules()?;
            report.changes = renormalize(&mut mapping, rules.normalizer());
        }

        Pass::Audit { out } => {
            let rules = opts.load_rules()?;
            let records = load_records(&opts.records)?;
            progress.begin(records.len());
            let audit_report = audit(&records, &mapping, &rules);
            if let Some(path) = out {
                audit_report
                    .write_csv(&path)
                    .map_err(|e| PassError::PersistenceFailure { path: path.clone(), source: e })?;
                progress.log(&format!("Wrote unmapped list to {}", path.display()));
            }
            report.audit = Some(audit_report);
        }
    }

    for c in &report.changes {
        logd!("{c:?}");
    }

    if mutates && !report.changes.is_empty() && !opts.dry_run {
        let invalid = mapping.invalid_keys();
        if !invalid.is_empty() {
            return Err(PassError::InvalidEntries {
                path: store.path().to_path_buf(),
                keys: invalid.into_iter().map(String::from).collect(),
            });
        }
        store.save(&mapping)?;
        report.persisted = true;
    }

    Ok(finish(report, &mapping))
}

fn init(mut report: PassReport, store: &MappingStore, opts: &PassOptions, progress: &mut dyn Progress) -> Result<PassReport> {
    let created = if opts.dry_run { !store.exists() } else { store.create_empty()? };
    let mapping = if created { TerritorialMapping::new() } else { store.load()? };
    progress.log(&if created {
        format!("Created {}", store.path().display())
    } else {
        format!("{} already exists ({} entries)", store.path().display(), mapping.len())
    });
    report.persisted = created && !opts.dry_run;
    Ok(finish(report, &mapping))
}

fn finish(mut report: PassReport, mapping: &TerritorialMapping) -> PassReport {
    report.entries = mapping.len();
    report.tally = mapping.tally();
    report.invalid = mapping.invalid_keys().into_iter().map(String::from).collect();
    report
}
