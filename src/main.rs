// CobbleLog - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. Config loading and logging initialisation
// 3. Log store client construction
// 4. Headless export (--export) or eframe GUI launch

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod gui;

// Re-export modules from the library crate so that `gui.rs` can keep using
// `crate::app::...`, `crate::core::...` etc.
pub use cobblelog::app;
pub use cobblelog::core;
pub use cobblelog::platform;
pub use cobblelog::ui;
pub use cobblelog::util;

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// CobbleLog - viewer for cobble reports held by the log store.
///
/// Fetches every report, lets you search across all fields, export the
/// matching rows as CSV, and delete or open individual reports.
#[derive(Parser, Debug)]
#[command(name = "CobbleLog", version, about)]
struct Cli {
    /// Base URL of the log store (overrides [server] base_url).
    #[arg(short = 's', long = "server")]
    server: Option<String>,

    /// Path to config.toml (defaults to the platform config directory).
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Write the matching reports to this CSV file and exit without a window.
    #[arg(short = 'e', long = "export")]
    export: Option<PathBuf>,

    /// Initial search term (also applies to --export).
    #[arg(short = 'q', long = "search", default_value = "")]
    search: String,

    /// Quote CSV cells that contain separators.
    #[arg(long = "quote")]
    quote: bool,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| platform::config::PlatformPaths::resolve().config_file());
    let (mut config, config_warnings) = platform::config::load_config(&config_path);

    util::logging::init(cli.debug, config.log_level.as_deref());

    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        "CobbleLog starting"
    );
    for warning in &config_warnings {
        tracing::warn!(warning = %warning, "Config warning");
    }

    if let Some(ref server) = cli.server {
        if let Err(e) = config.override_server_url(server) {
            let e = util::error::CobbleLogError::from(e);
            tracing::error!(error = %e, "Invalid --server");
            eprintln!("Error: {e}");
            std::process::exit(2);
        }
    }
    if cli.quote {
        config.quote_fields = true;
    }

    let store = match platform::http_store::HttpLogStore::new(
        &config.server_url,
        Duration::from_secs(config.request_timeout_secs),
    ) {
        Ok(store) => store,
        Err(e) => {
            tracing::error!(error = %e, "Cannot create log store client");
            eprintln!("Error: {e}");
            std::process::exit(2);
        }
    };

    if let Some(ref dest) = cli.export {
        let style = if config.quote_fields {
            core::export::CsvStyle::Quoted
        } else {
            core::export::CsvStyle::Raw
        };
        match app::headless::export_filtered(&store, &cli.search, style, &chrono::Local, dest) {
            Ok(export) => {
                for m in &export.dropped {
                    eprintln!("Warning: ignored store element: {m}");
                }
                for m in &export.document.malformed {
                    eprintln!("Warning: skipped {m}");
                }
                println!(
                    "Exported {} logs to {}",
                    export.document.rows,
                    dest.display()
                );
                return;
            }
            Err(e) => {
                tracing::error!(error = %e, "Export failed");
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
    }

    // Create application state
    let mut state = app::state::AppState::new(&config);
    for warning in config_warnings {
        state.push_warning(warning);
    }
    if !cli.search.is_empty() {
        state.set_search_term(cli.search.clone());
    }

    let worker = app::store_worker::StoreWorker::new(Arc::new(store));
    let (dark_mode, font_size) = (state.dark_mode, state.font_size);

    tracing::info!(server = %config.server_url, "Launching GUI");

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(format!(
                "{} v{}",
                util::constants::APP_NAME,
                util::constants::APP_VERSION
            ))
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    let result = eframe::run_native(
        util::constants::APP_NAME,
        native_options,
        Box::new(move |cc| {
            ui::theme::apply(&cc.egui_ctx, dark_mode, font_size);
            Ok(Box::new(gui::CobbleLogApp::new(state, worker)))
        }),
    );

    if let Err(e) = result {
        tracing::error!(error = %e, "Failed to launch GUI");
        eprintln!("Error: Failed to launch CobbleLog GUI: {e}");
        std::process::exit(1);
    }
}
