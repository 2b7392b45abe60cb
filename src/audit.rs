// src/audit.rs
//! Read-only look at the records the mapping does not cover yet.

use std::collections::BTreeMap;
use std::fmt;
use std::io;
use std::path::Path;

use crate::config::rules::RuleSet;
use crate::core::sanitize::to_lower;
use crate::extract::extract_nations;
use crate::file::{delimiter_for, write_csv};
use crate::mapping::TerritorialMapping;
use crate::records::PhotoRecord;

/// Credit wording counted across unmapped descriptions.
pub const CREDIT_MARKERS: &[&str] = &["credit:", "donated", "licensed"];

/// Strongest territory wording present in a description.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Hint {
    TerritorialAcknowledgement,
    Acknowledgement,
    Territory,
    None,
}

impl Hint {
    pub fn of(description: &str) -> Self {
        let d = to_lower(description);
        if d.contains("territorial acknowledgement") || d.contains("territorial acknowledgment") {
            Hint::TerritorialAcknowledgement
        } else if d.contains("acknowledgement") || d.contains("acknowledgment") {
            Hint::Acknowledgement
        } else if d.contains("territory") {
            Hint::Territory
        } else {
            Hint::None
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Hint::TerritorialAcknowledgement => "territorial acknowledgement",
            Hint::Acknowledgement => "acknowledgement",
            Hint::Territory => "territory",
            Hint::None => "no territory keywords",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Unmapped {
    pub photo_id: String,
    pub description: String,
    pub hint: Hint,
    /// What the current rules would extract (empty for most)
    pub would_extract: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuditReport {
    pub total_records: usize,
    pub unmapped: Vec<Unmapped>,
    pub hints: BTreeMap<Hint, usize>,
    pub credits: BTreeMap<&'static str, usize>,
}

impl AuditReport {
    /// Unmapped records the current rules would resolve.
    pub fn extractable(&self) -> usize {
        self.unmapped.iter().filter(|u| !u.would_extract.is_empty()).count()
    }

    pub fn mapped(&self) -> usize {
        self.total_records - self.unmapped.len()
    }

    pub fn write_csv(&self, path: &Path) -> io::Result<()> {
        let header: Vec<String> = ["photo_id", "hint", "would_extract", "description"]
            .into_iter()
            .map(String::from)
            .collect();
        let rows: Vec<Vec<String>> = self
            .unmapped
            .iter()
            .map(|u| vec![
                u.photo_id.clone(),
                s!(u.hint.label()),
                u.would_extract.join(", "),
                u.description.clone(),
            ])
            .collect();
        write_csv(path, &header, &rows, delimiter_for(path))
    }
}

pub fn audit(records: &[PhotoRecord], mapping: &TerritorialMapping, rules: &RuleSet) -> AuditReport {
    let mut report = AuditReport { total_records: records.len(), ..AuditReport::default() };
    for marker in CREDIT_MARKERS {
        report.credits.insert(*marker, 0);
    }

    for rec in records.iter().filter(|r| !mapping.contains(&r.photo_id)) {
        let hint = Hint::of(&rec.description);
        *report.hints.entry(hint).or_insert(0) += 1;

        let lower = to_lower(&rec.description);
        for marker in CREDIT_MARKERS {
            if lower.contains(marker) {
                *report.credits.entry(*marker).or_insert(0) += 1;
            }
        }

        report.unmapped.push(Unmapped {
            photo_id: rec.photo_id.clone(),
            description: rec.description.clone(),
            hint,
            would_extract: extract_nations(&rec.description, rules),
        });
    }
    logf!(
        "Audit: {} of {} records unmapped, {} extractable",
        report.unmapped.len(),
        report.total_records,
        report.extractable()
    );
    report
}

impl fmt::Display for AuditReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} records, {} mapped, {} unmapped", self.total_records, self.mapped(), self.unmapped.len())?;
        writeln!(f, "{} unmapped records match the current rules", self.extractable())?;
        writeln!(f, "Wording in unmapped descriptions:")?;
        for (hint, n) in &self.hints {
            writeln!(f, "  {:<28} {n}", hint.label())?;
        }
        writeln!(f, "Credit kinds:")?;
        for (marker, n) in &self.credits {
            writeln!(f, "  '{marker}': {n}")?;
        }
        Ok(())
    }
}
