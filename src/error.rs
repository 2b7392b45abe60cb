// src/error.rs
//! Failures a pass can hit. Every variant aborts the pass before the mapping
//! store is rewritten; records with a missing description and records with no
//! territory match are not errors.

use std::{
    io,
    path::{Path, PathBuf},
};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PassError>;

#[derive(Debug, Error)]
pub enum PassError {
    /// Record source or mapping document absent
    #[error("required input file not found: {}", .0.display())]
    MissingInputFile(PathBuf),

    #[error("could not read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("mapping document {} is not valid: {source}", .path.display())]
    MalformedMapping {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("record source {} is not usable: {reason}", .path.display())]
    MalformedSource { path: PathBuf, reason: String },

    /// Write failed; the previous document is still in place
    #[error("failed to persist mapping to {}: {source}", .path.display())]
    PersistenceFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("entry for {photo_id} has no nation name")]
    EmptyNation { photo_id: String },

    /// Document holds entries with a blank nation; fix or remove them first
    #[error("{} has entries with no nation name: {}", .path.display(), .keys.join(", "))]
    InvalidEntries { path: PathBuf, keys: Vec<String> },

    #[error("rules file {}: {reason}", .path.display())]
    Rules { path: PathBuf, reason: String },

    #[error("pattern {name:?} is invalid: {reason}")]
    Pattern { name: String, reason: String },
}

impl PassError {
    /// Map a read failure, folding NotFound into `MissingInputFile`.
    pub fn from_read(path: &Path, err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::NotFound {
            Self::MissingInputFile(path.to_path_buf())
        } else {
            Self::Read { path: path.to_path_buf(), source: err }
        }
    }

    pub fn malformed_source(path: &Path, reason: impl Into<String>) -> Self {
        Self::MalformedSource { path: path.to_path_buf(), reason: reason.into() }
    }

    pub fn is_missing_input(&self) -> bool {
        matches!(self, Self::MissingInputFile(_))
    }
}

/// Read a whole UTF-8 file, mapping errors for the pass boundary.
pub fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| PassError::from_read(path, e))
}
