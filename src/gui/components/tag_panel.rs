// src/gui/components/tag_panel.rs
//
// Right-hand tag list. A record passes when it carries any checked tag.

use eframe::egui;
use crate::gui::app::App;

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    ui.heading("Tags");

    let mut changed = false;
    ui.horizontal(|ui| {
        if ui.button("All").clicked() {
            app.query.tags = app.tags.clone();
            changed = true;
        }
        if ui.button("None").clicked() {
            app.query.tags.clear();
            changed = true;
        }
    });

    let n = app.query.tags.len();
    if n > 0 {
        let preview: Vec<&str> = app.query.tags.iter().take(5).map(String::as_str).collect();
        let more = if n > 5 { "..." } else { "" };
        ui.small(format!("{n} selected: {}{more}", preview.join(", ")));
    }

    ui.separator();

    egui::ScrollArea::vertical()
        .id_salt("tag_panel_scroll")
        .show(ui, |ui| {
            let w = ui.available_width();
            ui.set_min_width(w);

            for tag in &app.tags {
                let mut on = app.query.tags.contains(tag);
                if ui.checkbox(&mut on, tag.as_str()).changed() {
                    if on {
                        app.query.tags.push(tag.clone());
                    } else {
                        app.query.tags.retain(|t| t != tag);
                    }
                    changed = true;
                }
            }
        });

    if changed {
        logd!("UI: {} tag(s) selected", app.query.tags.len());
        app.mark_dirty();
    }
}
