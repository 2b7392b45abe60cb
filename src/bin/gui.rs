// src/bin/gui.rs
#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]
use lichen_territory::config::state::GuiState;
use lichen_territory::{gui, log};
use eframe::egui::ViewportBuilder;

fn main() {
    let state = GuiState::from_args(std::env::args().skip(1));
    log::init(std::path::Path::new(lichen_territory::config::consts::LOG_FILE));

    let options = eframe::NativeOptions {
        viewport: ViewportBuilder::default()
            .with_title("Lichen Search")
            .with_inner_size([state.window_w, state.window_h]),
        ..Default::default()
    };

    if let Err(e) = gui::run(options, state) {
        eprintln!("GUI failed: {}", e);
        std::process::exit(1);
    }
}
