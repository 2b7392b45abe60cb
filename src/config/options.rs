// src/config/options.rs
use std::path::PathBuf;

use super::consts::*;
use super::rules::RuleSet;
use crate::error::Result;

/// Where a pass reads and writes, and whether it may write at all.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PassOptions {
    pub mapping: PathBuf,
    pub records: PathBuf,
    /// Extra rules layered on the built-in set
    pub rules: Option<PathBuf>,
    /// Compute and report, but leave the mapping document untouched
    pub dry_run: bool,
    pub log_file: PathBuf,
}

impl Default for PassOptions {
    fn default() -> Self {
        Self {
            mapping: PathBuf::from(DEFAULT_MAPPING_FILE),
            records: PathBuf::from(DEFAULT_RECORDS_FILE),
            rules: None,
            dry_run: false,
            log_file: PathBuf::from(LOG_FILE),
        }
    }
}

impl PassOptions {
    pub fn with_paths(mapping: impl Into<PathBuf>, records: impl Into<PathBuf>) -> Self {
        Self {
            mapping: mapping.into(),
            records: records.into(),
            ..Self::default()
        }
    }

    pub fn load_rules(&self) -> Result<RuleSet> {
        match &self.rules {
            Some(path) => RuleSet::load(path),
            None => Ok(RuleSet::builtin()),
        }
    }
}
