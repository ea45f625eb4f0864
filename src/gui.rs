// CobbleLog - gui.rs
//
// Top-level eframe::App implementation.
// Wires the panels together, drains store worker results into the state,
// and carries out the requests panels leave in the state (delete, export).

use crate::app::navigation::Route;
use crate::app::state::AppState;
use crate::app::store_worker::StoreWorker;
use crate::core::export;
use crate::ui;

/// Repaint cadence while store requests are outstanding (ms).
const PENDING_REPAINT_MS: u64 = 100;

/// The CobbleLog application.
pub struct CobbleLogApp {
    pub state: AppState,
    pub worker: StoreWorker,
}

impl CobbleLogApp {
    /// Create the application and start the initial fetch.
    pub fn new(state: AppState, worker: StoreWorker) -> Self {
        worker.start_load();
        Self { state, worker }
    }

    /// Render the current projection and offer it as a download.
    fn export_csv(&mut self) {
        let Some(dest) = rfd::FileDialog::new()
            .add_filter("CSV", &["csv"])
            .set_file_name(&self.state.export_file_name)
            .save_file()
        else {
            return;
        };

        let result = self
            .state
            .csv_document()
            .and_then(|doc| export::save_document(&doc, &dest).map(|()| doc));

        match result {
            Ok(doc) => {
                self.state.status_message =
                    format!("Saved {} rows to {}.", doc.rows, dest.display());
                if !doc.malformed.is_empty() {
                    self.state.status_message
                        .push_str(&format!(" {} malformed rows skipped.", doc.malformed.len()));
                }
                for m in doc.malformed {
                    self.state.push_warning(format!("Not exported: {m}"));
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "CSV export failed");
                self.state.status_message = format!("CSV export failed: {e}");
            }
        }
    }
}

impl eframe::App for CobbleLogApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Apply store results before drawing so this frame shows them.
        for msg in self.worker.poll_progress() {
            self.state.apply_progress(msg);
        }
        if self.state.loading || !self.state.deletes_in_flight.is_empty() {
            ctx.request_repaint_after(std::time::Duration::from_millis(PENDING_REPAINT_MS));
        }

        // ---- Requests left by panels on the previous frame ----
        for id in self.state.take_delete_requests() {
            self.worker.start_delete(id);
        }
        if self.state.request_export {
            self.state.request_export = false;
            self.export_csv();
        }

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Save data\u{2026}").clicked() {
                        self.state.request_export = true;
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Exit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
                ui.menu_button("View", |ui| {
                    let label = format!("Warnings ({})", self.state.warnings.len());
                    if ui.button(label).clicked() {
                        self.state.show_warnings = true;
                        ui.close_menu();
                    }
                    let theme_label = if self.state.dark_mode {
                        "Light theme"
                    } else {
                        "Dark theme"
                    };
                    if ui.button(theme_label).clicked() {
                        self.state.dark_mode = !self.state.dark_mode;
                        ui::theme::apply(ctx, self.state.dark_mode, self.state.font_size);
                        ui.close_menu();
                    }
                });
                ui.menu_button("Help", |ui| {
                    if ui.button("About").clicked() {
                        self.state.show_about = true;
                        ui.close_menu();
                    }
                });
            });
        });

        // Status bar
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if self.state.loading {
                    ui.spinner();
                }
                ui.label(&self.state.status_message);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let total = self.state.cache.len();
                    let shown = self.state.filtered_indices.len();
                    ui.label(format!("{shown}/{total} logs"));
                    if !self.state.warnings.is_empty() {
                        let warn = egui::RichText::new(format!(
                            "\u{26a0} {}",
                            self.state.warnings.len()
                        ))
                        .color(ui::theme::WARNING);
                        if ui.small_button(warn).clicked() {
                            self.state.show_warnings = true;
                        }
                    }
                });
            });
        });

        // Central panel: log table or the routed view
        egui::CentralPanel::default().show(ctx, |ui| {
            if *self.state.router.current() == Route::Index {
                ui::panels::search::render(ui, &mut self.state);
                ui.separator();
                ui::panels::table::render(ui, &mut self.state);
            } else {
                ui::panels::edit::render(ui, &mut self.state);
            }
        });

        // Dialogs
        ui::panels::confirm::render(ctx, &mut self.state);
        ui::panels::warnings::render(ctx, &mut self.state);
        ui::panels::about::render(ctx, &mut self.state);
    }

    /// Called by eframe when the window is about to close.
    ///
    /// Late store results must not touch a view that no longer exists.
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.worker.shutdown();
    }
}
