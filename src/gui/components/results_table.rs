// src/gui/components/results_table.rs
//
// Result table. Purely a view over `app.hits`; matched text is highlighted.

use eframe::egui::{self, text::LayoutJob, Color32, FontId, TextFormat};
use egui_extras::{Column, TableBuilder};

use crate::gui::app::App;
use crate::search::highlight;

const ROW_H: f32 = 64.0;

/// Label text with every case-insensitive match of `term` marked.
fn marked(ui: &egui::Ui, text: &str, term: &str) -> LayoutJob {
    let plain = TextFormat::simple(FontId::default(), ui.visuals().text_color());
    let mark = TextFormat {
        background: Color32::from_rgb(255, 230, 120),
        color: Color32::BLACK,
        ..plain.clone()
    };

    let mut job = LayoutJob::default();
    let mut at = 0;
    for r in highlight(text, term) {
        job.append(&text[at..r.start], 0.0, plain.clone());
        job.append(&text[r.clone()], 0.0, mark.clone());
        at = r.end;
    }
    job.append(&text[at..], 0.0, plain);
    job
}

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    if app.query.is_empty() {
        ui.label("Type a search term, select a territory, or choose tags to see images.");
        return;
    }
    if app.hits.is_empty() {
        ui.label("No images found for the current filters.");
        return;
    }
    ui.label(format!("{} images found", app.hits.len()));

    let term = app.query.text.trim().to_owned();
    let hits = app.hits.clone();

    TableBuilder::new(ui)
        .striped(true)
        .id_salt("results_table")
        .column(Column::initial(110.0).resizable(true).clip(true))
        .column(Column::initial(150.0).resizable(true).clip(true))
        .column(Column::remainder().at_least(200.0).clip(true))
        .column(Column::initial(180.0).resizable(true).clip(true))
        .column(Column::exact(90.0))
        .header(24.0, |mut header| {
            for title in ["Photo", "Territory", "Description", "Tags", "Links"] {
                header.col(|ui| { ui.strong(title); });
            }
        })
        .body(|body| {
            body.rows(ROW_H, hits.len(), |mut row| {
                let Some(rec) = hits.get(row.index()).and_then(|&ix| app.record(ix)) else { return };
                let nation = app.first_nation(rec).unwrap_or("");

                row.col(|ui| { ui.label(rec.display_name()); });
                row.col(|ui| {
                    let job = marked(ui, nation, &term);
                    ui.label(job);
                });
                row.col(|ui| {
                    let job = marked(ui, &rec.description, &term);
                    ui.add(egui::Label::new(job).wrap());
                });
                row.col(|ui| {
                    let job = marked(ui, &rec.clip_tags, &term);
                    ui.add(egui::Label::new(job).wrap());
                });
                row.col(|ui| {
                    ui.vertical(|ui| {
                        if let Some(url) = rec.thumb_url.as_deref() {
                            ui.hyperlink_to("Thumbnail", url);
                        }
                        if let Some(url) = rec.image_url.as_deref() {
                            ui.hyperlink_to("Original", url);
                        }
                    });
                });
            });
        });
}
