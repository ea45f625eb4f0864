// CobbleLog - ui/panels/search.rs
//
// Search box and "Save data" button above the log table.

use crate::app::state::AppState;
use crate::ui::theme;

/// Render the search bar.
pub fn render(ui: &mut egui::Ui, state: &mut AppState) {
    ui.heading("Search for a log");
    ui.horizontal(|ui| {
        let response = ui.add(
            egui::TextEdit::singleline(&mut state.search_term)
                .hint_text("Search")
                .desired_width(theme::SEARCH_BOX_WIDTH),
        );
        if response.changed() {
            state.apply_filters();
        }

        if !state.search_term.is_empty() && ui.small_button("Clear").clicked() {
            state.set_search_term("");
        }

        ui.separator();

        if ui
            .button("Save data")
            .on_hover_text("Export the rows shown below as CSV")
            .clicked()
        {
            state.request_export = true;
        }
    });
}
