// CobbleLog - ui/panels/warnings.rs
//
// Warnings window: failed store requests, skipped records and config
// problems accumulated during the session.

use crate::app::state::AppState;
use crate::ui::theme;

/// Render the warnings dialog (if state.show_warnings is true).
pub fn render(ctx: &egui::Context, state: &mut AppState) {
    if !state.show_warnings {
        return;
    }

    let mut open = true;
    egui::Window::new(format!("Warnings ({})", state.warnings.len()))
        .open(&mut open)
        .collapsible(false)
        .resizable(true)
        .min_width(480.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            if state.warnings.is_empty() {
                ui.label("No warnings.");
            } else {
                egui::ScrollArea::vertical()
                    .id_salt("warnings_list")
                    .max_height(260.0)
                    .show(ui, |ui| {
                        for warn in &state.warnings {
                            ui.label(egui::RichText::new(warn).color(theme::WARNING).size(11.5));
                        }
                    });
            }

            ui.add_space(8.0);
            ui.separator();
            ui.horizontal(|ui| {
                if ui.button("Clear").clicked() {
                    state.warnings.clear();
                }
                if ui.button("Close").clicked() {
                    state.show_warnings = false;
                }
            });
        });

    if !open {
        state.show_warnings = false;
    }
}
