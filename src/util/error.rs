// CobbleLog - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// All errors keep their cause so the full chain reaches the diagnostic log.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all CobbleLog operations.
/// Errors are grouped by the subsystem that produced them.
#[derive(Debug)]
pub enum CobbleLogError {
    /// A log store request failed.
    Store(StoreError),

    /// CSV export failed.
    Export(ExportError),

    /// Configuration loading or validation failed.
    Config(ConfigError),
}

impl fmt::Display for CobbleLogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Store(e) => write!(f, "Log store error: {e}"),
            Self::Export(e) => write!(f, "Export error: {e}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
        }
    }
}

impl std::error::Error for CobbleLogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Store(e) => Some(e),
            Self::Export(e) => Some(e),
            Self::Config(e) => Some(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Store errors
// ---------------------------------------------------------------------------

/// Why a single HTTP exchange with the log store failed.
#[derive(Debug)]
pub enum RequestFailure {
    /// The store answered with a non-success status.
    Status { code: u16, reason: String },

    /// The request never produced a response (connect, timeout, TLS...).
    Transport(reqwest::Error),

    /// The response body was not the expected JSON.
    Decode(serde_json::Error),
}

impl fmt::Display for RequestFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status { code, reason } if reason.is_empty() => write!(f, "HTTP {code}"),
            Self::Status { code, reason } => write!(f, "HTTP {code} {reason}"),
            Self::Transport(e) => write!(f, "transport error: {e}"),
            Self::Decode(e) => write!(f, "malformed response body: {e}"),
        }
    }
}

impl std::error::Error for RequestFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Transport(e) => Some(e),
            Self::Decode(e) => Some(e),
            Self::Status { .. } => None,
        }
    }
}

/// Errors raised by log store collaborators.
#[derive(Debug)]
pub enum StoreError {
    /// Fetching the record set failed.
    FetchFailed { url: String, cause: RequestFailure },

    /// Deleting a single record failed.
    DeleteFailed {
        id: String,
        url: String,
        cause: RequestFailure,
    },

    /// The configured base URL cannot address the log resource.
    InvalidUrl { url: String, reason: String },

    /// The HTTP client could not be constructed.
    ClientBuild { source: reqwest::Error },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FetchFailed { url, cause } => {
                write!(f, "Error fetching logs from '{url}': {cause}")
            }
            Self::DeleteFailed { id, url, cause } => {
                write!(f, "Error deleting log '{id}' at '{url}': {cause}")
            }
            Self::InvalidUrl { url, reason } => {
                write!(f, "Log store URL '{url}' is not usable: {reason}")
            }
            Self::ClientBuild { source } => {
                write!(f, "Could not build HTTP client: {source}")
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::FetchFailed { cause, .. } => Some(cause),
            Self::DeleteFailed { cause, .. } => Some(cause),
            Self::ClientBuild { source } => Some(source),
            Self::InvalidUrl { .. } => None,
        }
    }
}

impl From<StoreError> for CobbleLogError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

// ---------------------------------------------------------------------------
// Malformed records
// ---------------------------------------------------------------------------

/// A record that lacks a field the projection cannot do without.
///
/// Never fatal: the offending record is skipped and reported, the rest of
/// the projection is still produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedRecord {
    /// Position of the record in the sequence being projected.
    pub position: usize,

    /// Record id, when the record carries one.
    pub id: Option<String>,

    /// Dotted path of the missing or unusable field.
    pub field: &'static str,
}

impl fmt::Display for MalformedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.id {
            Some(id) => write!(
                f,
                "record '{id}' (position {}) has no usable '{}'",
                self.position, self.field
            ),
            None => write!(
                f,
                "record at position {} has no usable '{}'",
                self.position, self.field
            ),
        }
    }
}

impl std::error::Error for MalformedRecord {}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors related to export operations.
#[derive(Debug)]
pub enum ExportError {
    /// I/O error writing the export file.
    Io { path: PathBuf, source: io::Error },

    /// CSV serialisation error (quoted mode only).
    Csv { source: csv::Error },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Export I/O error '{}': {source}", path.display())
            }
            Self::Csv { source } => write!(f, "CSV serialisation error: {source}"),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Csv { source } => Some(source),
        }
    }
}

impl From<ExportError> for CobbleLogError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },

    /// The log store URL given on the command line is unusable.
    InvalidServerUrl { url: String, reason: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
            Self::InvalidServerUrl { url, reason } => {
                write!(f, "Server URL '{url}' is invalid: {reason}")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            Self::InvalidServerUrl { .. } => None,
        }
    }
}

impl From<ConfigError> for CobbleLogError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Convenience type alias for CobbleLog results.
pub type Result<T> = std::result::Result<T, CobbleLogError>;
