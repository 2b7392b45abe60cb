// src/gui/components/filter_bar.rs
//
// Search text + territory dropdown. Any edit marks the query dirty; the app
// recomputes hits at the start of the next frame.

use eframe::egui;
use crate::gui::app::App;

const ALL_TERRITORIES: &str = "All Territories";

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    let mut changed = false;

    ui.horizontal(|ui| {
        let edit = egui::TextEdit::singleline(&mut app.query.text)
            .hint_text("e.g. lichen, bark, coastal, Secwepemc")
            .desired_width(ui.available_width() * 0.6);
        changed |= ui.add(edit).changed();

        let selected_text = app.query.territory.as_deref().unwrap_or(ALL_TERRITORIES).to_owned();
        egui::ComboBox::from_id_salt("territory_filter")
            .selected_text(selected_text)
            .width(ui.available_width())
            .show_ui(ui, |ui| {
                changed |= ui
                    .selectable_value(&mut app.query.territory, None, ALL_TERRITORIES)
                    .changed();
                for t in &app.territories {
                    changed |= ui
                        .selectable_value(&mut app.query.territory, Some(t.clone()), t.as_str())
                        .changed();
                }
            });
    });

    if changed {
        logd!("UI: query text={:?} territory={:?}", app.query.text, app.query.territory);
        app.mark_dirty();
    }
}
