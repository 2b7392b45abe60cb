// src/store.rs
use std::{collections::BTreeMap, path::{Path, PathBuf}};

use serde::Deserialize;

use crate::error::{read_text, PassError, Result};
use crate::file::write_atomic;
use crate::mapping::{TerritorialMapping, TerritoryEntry};

/// The mapping document on disk. Passes receive one of these instead of
/// reaching for a fixed path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MappingStore {
    path: PathBuf,
}

impl MappingStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path { &self.path }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    pub fn load(&self) -> Result<TerritorialMapping> {
        let text = read_text(&self.path)?;
        let mapping: TerritorialMapping = serde_json::from_str(&text)
            .map_err(|e| PassError::MalformedMapping { path: self.path.clone(), source: e })?;
        logd!("Store: loaded {} entries from {}", mapping.len(), self.path.display());
        Ok(mapping)
    }

    /// Pretty JSON, trailing newline, replaced in one rename. On failure the
    /// previous document is left as it was.
    pub fn save(&self, mapping: &TerritorialMapping) -> Result<()> {
        let mut text = serde_json::to_string_pretty(mapping)
            .map_err(|e| PassError::PersistenceFailure { path: self.path.clone(), source: e.into() })?;
        text.push('\n');

        write_atomic(&self.path, text.as_bytes())
            .map_err(|e| PassError::PersistenceFailure { path: self.path.clone(), source: e })?;
        logf!("Store: wrote {} entries to {}", mapping.len(), self.path.display());
        Ok(())
    }

    /// Write `{}` when no document exists yet. Returns whether a file was created.
    pub fn create_empty(&self) -> Result<bool> {
        if self.exists() { return Ok(false); }
        self.save(&TerritorialMapping::new())?;
        Ok(true)
    }
}

#[derive(Deserialize)]
struct CorrectionIn {
    first_nation: String,
    #[serde(default)]
    full_acknowledgement: Option<String>,
}

/// Read a corrections document: `photo_id → {first_nation, full_acknowledgement?}`.
/// Blank acknowledgements are left blank here; `merge::apply_corrections`
/// synthesizes them.
pub fn load_corrections(path: &Path) -> Result<Vec<(String, TerritoryEntry)>> {
    let text = read_text(path)?;
    let raw: BTreeMap<String, CorrectionIn> = serde_json::from_str(&text)
        .map_err(|e| PassError::MalformedMapping { path: path.to_path_buf(), source: e })?;

    Ok(raw
        .into_iter()
        .map(|(id, c)| {
            let entry = TerritoryEntry {
                first_nation: c.first_nation,
                full_acknowledgement: c.full_acknowledgement.unwrap_or_default(),
            };
            (id, entry)
        })
        .collect())
}
