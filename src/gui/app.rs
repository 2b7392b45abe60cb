// src/gui/app.rs
use std::error::Error;

use eframe::egui;

use crate::{
    config::state::GuiState,
    mapping::TerritorialMapping,
    search::{all_tags, all_territories, load_catalog, CatalogRecord, Query},
    store::MappingStore,
};

pub fn run(options: eframe::NativeOptions, state: GuiState) -> Result<(), Box<dyn Error>> {
    eframe::run_native(
        "Lichen Search",
        options,
        Box::new(|_cc| Ok(Box::new(App::new(state)))),
    )?;
    Ok(())
}

pub struct App {
    pub state: GuiState,

    // loaded once at startup (UI thread only)
    pub catalog: Vec<CatalogRecord>,
    pub mapping: TerritorialMapping,
    pub tags: Vec<String>,
    pub territories: Vec<String>,

    pub query: Query,
    /// Indices into `catalog` for the current query
    pub hits: Vec<usize>,
    query_dirty: bool,

    pub status: String,
}

impl App {
    pub fn new(state: GuiState) -> Self {
        let mut notes: Vec<String> = Vec::new();

        let catalog = match load_catalog(&state.catalog_path) {
            Ok(v) => v,
            Err(e) => {
                loge!("Viewer: catalog unavailable: {e}");
                notes.push(format!("Could not load catalog: {e}"));
                Vec::new()
            }
        };

        // Search still works without territory data.
        let mapping = match MappingStore::new(&state.mapping_path).load() {
            Ok(m) => m,
            Err(e) => {
                loge!("Viewer: mapping unavailable: {e}");
                notes.push(format!("Continuing without territorial information ({e})"));
                TerritorialMapping::new()
            }
        };

        let tags = all_tags(&catalog);
        let territories = all_territories(&mapping);
        logf!(
            "Viewer: catalog={}, mapped={}, tags={}, territories={}",
            catalog.len(),
            mapping.len(),
            tags.len(),
            territories.len()
        );

        let status = if notes.is_empty() {
            format!("Loaded {} images, territorial data for {}", catalog.len(), mapping.len())
        } else {
            notes.join(" | ")
        };

        Self {
            state,
            catalog,
            mapping,
            tags,
            territories,
            query: Query::default(),
            hits: Vec::new(),
            query_dirty: true,
            status,
        }
    }

    #[inline]
    pub fn mark_dirty(&mut self) { self.query_dirty = true; }

    pub fn record(&self, ix: usize) -> Option<&CatalogRecord> { self.catalog.get(ix) }

    pub fn first_nation(&self, rec: &CatalogRecord) -> Option<&str> {
        self.mapping.get(&rec.photo_name).map(|e| e.first_nation.as_str())
    }

    /// Recompute hits when the query changed since the last frame.
    pub fn refresh(&mut self) {
        if !self.query_dirty { return; }
        self.query_dirty = false;

        if self.query.is_empty() {
            self.hits.clear();
            return;
        }
        let query = &self.query;
        let mapping = &self.mapping;
        self.hits = self
            .catalog
            .iter()
            .enumerate()
            .filter(|(_, r)| query.matches(r, mapping))
            .map(|(i, _)| i)
            .collect();
        logd!("Viewer: query {:?} → {} hits", self.query, self.hits.len());
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.refresh();

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.label(&self.status);
        });

        egui::SidePanel::right("tags")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                crate::gui::components::tag_panel::draw(ui, self);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            crate::gui::components::filter_bar::draw(ui, self);

            ui.separator();

            crate::gui::components::results_table::draw(ui, self);
        });
    }
}
