// CobbleLog - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "CobbleLog";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "CobbleLog";

/// Current application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Log store
// =============================================================================

/// Base URL of the log store when neither config nor CLI override it.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:4000";

/// Path segment of the log collection resource (`GET /log`, `DELETE /log/{id}`).
pub const LOG_RESOURCE: &str = "log";

/// Default per-request timeout for store calls (seconds).
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Minimum user-configurable request timeout (seconds).
pub const MIN_REQUEST_TIMEOUT_SECS: u64 = 1;

/// Maximum user-configurable request timeout (seconds).
pub const MAX_REQUEST_TIMEOUT_SECS: u64 = 600;

/// Route prefix handed to the navigator for the edit view.
pub const EDIT_ROUTE_PREFIX: &str = "/edit/";

// =============================================================================
// Export
// =============================================================================

/// Default file name offered for the CSV download.
pub const DEFAULT_EXPORT_FILE_NAME: &str = "log_data.csv";

/// MIME type of the exported document.
pub const CSV_MIME_TYPE: &str = "text/csv;charset=utf-8";

/// Rendering used for timestamps that are absent or unparseable.
pub const INVALID_DATE: &str = "Invalid Date";

/// Localized timestamp layout, e.g. `3/14/2024, 9:05:00 AM`.
pub const LOCALIZED_TIME_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

// =============================================================================
// UI defaults
// =============================================================================

/// Default UI body font size in points.
pub const DEFAULT_FONT_SIZE: f32 = 14.5;

/// Minimum user-configurable UI font size (points).
pub const MIN_FONT_SIZE: f32 = 10.0;

/// Maximum user-configurable UI font size (points).
pub const MAX_FONT_SIZE: f32 = 24.0;

/// Maximum number of non-fatal warnings kept for display.
/// Older warnings are dropped first once the cap is reached.
pub const MAX_WARNINGS: usize = 200;

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";
