// src/gui/components/mod.rs
pub mod filter_bar;
pub mod results_table;
pub mod tag_panel;
