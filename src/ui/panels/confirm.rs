// CobbleLog - ui/panels/confirm.rs
//
// Delete confirmation dialog. Nothing is sent to the store until the user
// answers "Delete".

use crate::app::state::AppState;

/// Render the confirmation dialog (if a delete is pending).
pub fn render(ctx: &egui::Context, state: &mut AppState) {
    let Some(id) = state.pending_delete.clone() else {
        return;
    };

    let mut open = true;
    let mut answer: Option<bool> = None;
    egui::Window::new("Delete log")
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label("Are you sure you want to delete this log?");
            ui.label(egui::RichText::new(&id).monospace().weak());
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if ui.button("Delete").clicked() {
                    answer = Some(true);
                }
                if ui.button("Cancel").clicked() {
                    answer = Some(false);
                }
            });
        });

    match answer {
        Some(true) => state.confirm_delete(),
        Some(false) => state.cancel_delete(),
        None if !open => state.cancel_delete(),
        None => {}
    }
}
