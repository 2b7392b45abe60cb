// src/config/state.rs
use std::path::PathBuf;

use super::consts::{DEFAULT_CATALOG_FILE, DEFAULT_MAPPING_FILE};

/// Startup state for the search viewer.
#[derive(Clone, Debug, PartialEq)]
pub struct GuiState {
    pub mapping_path: PathBuf,
    pub catalog_path: PathBuf,
    pub window_w: f32,
    pub window_h: f32,
}

impl Default for GuiState {
    fn default() -> Self {
        Self {
            mapping_path: PathBuf::from(DEFAULT_MAPPING_FILE),
            catalog_path: PathBuf::from(DEFAULT_CATALOG_FILE),
            window_w: 1100.0,
            window_h: 700.0,
        }
    }
}

impl GuiState {
    /// `lichen_search [mapping.json] [catalog.json]`
    pub fn from_args<I: IntoIterator<Item = String>>(args: I) -> Self {
        let mut state = Self::default();
        let mut args = args.into_iter();
        if let Some(mapping) = args.next() {
            state.mapping_path = PathBuf::from(mapping);
        }
        if let Some(catalog) = args.next() {
            state.catalog_path = PathBuf::from(catalog);
        }
        state
    }
}
