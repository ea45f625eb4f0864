// CobbleLog - ui/panels/edit.rs
//
// Target of the "/edit/{id}" route. Shows the record's stored fields
// read-only; changing them belongs to the store's own edit page.

use crate::app::navigation::Route;
use crate::app::state::AppState;
use crate::core::model::value_text;

/// Render the current non-index route (central area).
pub fn render(ui: &mut egui::Ui, state: &mut AppState) {
    let route = state.router.current().clone();

    if ui.button("\u{2190} Back").clicked() {
        state.router.back();
        return;
    }
    ui.separator();

    match route {
        Route::Edit(id) => match state.cache.get(&id) {
            Some(record) => {
                ui.heading(format!("Log {id}"));
                egui::ScrollArea::vertical().show(ui, |ui| {
                    egui::Grid::new("edit_fields")
                        .num_columns(2)
                        .striped(true)
                        .spacing([16.0, 4.0])
                        .show(ui, |ui| {
                            for (name, value) in record.fields() {
                                ui.label(name.as_str());
                                ui.label(egui::RichText::new(value_text(value)).monospace());
                                ui.end_row();
                            }
                        });
                });
            }
            None => {
                ui.label(format!("Log {id} is no longer available."));
            }
        },
        Route::Unknown(path) => {
            ui.label(format!("Nothing to show at '{path}'."));
        }
        Route::Index => {}
    }
}
