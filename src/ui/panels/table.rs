// CobbleLog - ui/panels/table.rs
//
// The log table: one row per record in the current projection, plus
// Edit/Delete actions. Cells come pre-projected from `AppState::table_rows`
// and only the rows inside the viewport are laid out (`show_rows`).
//
// Row actions are collected during rendering and applied afterwards so the
// loop never holds a borrow of the rows while mutating state.

use crate::app::state::AppState;
use crate::core::export::CSV_HEADERS;
use crate::ui::theme;

enum RowAction {
    Edit(String),
    Delete(String),
}

/// Render the table (central area).
pub fn render(ui: &mut egui::Ui, state: &mut AppState) {
    if state.table_rows.is_empty() {
        ui.centered_and_justified(|ui| {
            if state.loading {
                ui.label("Loading logs...");
            } else {
                ui.label("No matching logs found.");
            }
        });
        return;
    }

    let row_height = theme::ROW_HEIGHT;
    let total_rows = state.table_rows.len();
    let mut action: Option<RowAction> = None;

    egui::ScrollArea::horizontal()
        .id_salt("log_table_columns")
        .auto_shrink([false; 2])
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                for (header, width) in CSV_HEADERS.iter().zip(theme::COLUMN_WIDTHS) {
                    cell(ui, width, egui::RichText::new(*header).strong());
                }
                cell(
                    ui,
                    theme::ACTIONS_COLUMN_WIDTH,
                    egui::RichText::new("Actions").strong(),
                );
            });
            ui.separator();

            egui::ScrollArea::vertical()
                .id_salt("log_table_rows")
                .auto_shrink([false; 2])
                .show_rows(ui, row_height, total_rows, |ui, row_range| {
                    for row_idx in row_range {
                        let Some(row) = state.table_rows.get(row_idx) else {
                            continue;
                        };

                        ui.horizontal(|ui| {
                            ui.set_height(row_height);

                            match &row.cells {
                                Ok(cells) => {
                                    for (text, width) in cells.iter().zip(theme::COLUMN_WIDTHS) {
                                        cell(ui, width, text.as_str());
                                    }
                                }
                                Err(e) => {
                                    // Span all data columns so Actions stays aligned.
                                    let spacing = ui.spacing().item_spacing.x;
                                    let width = theme::COLUMN_WIDTHS.iter().sum::<f32>()
                                        + spacing * (CSV_HEADERS.len() - 1) as f32;
                                    cell(
                                        ui,
                                        width,
                                        egui::RichText::new("\u{26a0} malformed")
                                            .color(theme::WARNING),
                                    )
                                    .on_hover_text(e.to_string());
                                }
                            }

                            match &row.id {
                                Some(id) => {
                                    let deleting = state.deletes_in_flight.contains(id);
                                    if ui.small_button("Edit").clicked() {
                                        action = Some(RowAction::Edit(id.clone()));
                                    }
                                    let delete = egui::Button::new(
                                        egui::RichText::new("Delete").color(theme::DANGER),
                                    )
                                    .small();
                                    if ui.add_enabled(!deleting, delete).clicked() {
                                        action = Some(RowAction::Delete(id.clone()));
                                    }
                                }
                                None => {
                                    ui.weak("no id");
                                }
                            }
                        });
                    }
                });
        });

    match action {
        Some(RowAction::Edit(id)) => state.request_edit(&id),
        Some(RowAction::Delete(id)) => state.request_delete(id),
        None => {}
    }
}

/// Fixed-width, single-line cell. Long text is truncated and shown in full
/// on hover.
fn cell(ui: &mut egui::Ui, width: f32, text: impl Into<egui::WidgetText>) -> egui::Response {
    ui.add_sized(
        [width, theme::ROW_HEIGHT],
        egui::Label::new(text).truncate(),
    )
}
