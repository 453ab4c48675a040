//! # backoffice-export
//!
//! Report export engine for the telecom back-office bot.
//!
//! Given a data category (inventory, orders, statistics, ...) and a target file
//! format (CSV, XLSX, DOCX, PDF), the engine produces a complete, downloadable
//! file whose layout is consistent across formats and categories.
//!
//! ## Components
//!
//! - [`storage::RecordSource`]: typed records per category (mock or `SQLite`)
//! - [`schema::HeaderRegistry`]: column titles, keys and kinds per category
//! - [`io::formats`]: one renderer per output format
//! - [`io::ExportService`]: the orchestrator callers invoke
//!
//! ## Example
//!
//! ```rust,ignore
//! use backoffice_export::build_export;
//!
//! let result = build_export("orders", "pdf", "manager")?;
//! std::fs::write(&result.filename, &result.bytes)?;
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

pub mod cli;
pub mod config;
pub mod io;
pub mod models;
pub mod observability;
pub mod schema;
pub mod security;
pub mod storage;

pub use config::ExportConfig;
pub use io::{ExportService, build_export};
pub use models::{CellValue, ExportCategory, ExportFormat, ExportJob, ExportResult, Record};
pub use schema::HeaderRegistry;
pub use security::RolePermissions;
pub use storage::{MockRecordSource, RecordSource, SqliteRecordSource};

/// Error type for export operations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `UnknownCategory` | Tag not in the registry, no source for it, or not permitted for the role |
/// | `UnknownFormat` | Format tag outside `csv`, `xlsx`, `docx`, `pdf` |
/// | `RenderFailure` | Header/record column mismatch or the format library failed |
/// | `InvalidInput` | Malformed configuration values or CLI arguments |
/// | `OperationFailed` | File-system or `SQLite` I/O failed |
#[derive(Debug, ThisError)]
pub enum Error {
    /// The category is unknown or not permitted for the requesting role.
    ///
    /// Never substituted with a default category.
    #[error("unknown category: {0}")]
    UnknownCategory(String),

    /// The format tag is not one of the supported formats.
    #[error("unknown format: {0}")]
    UnknownFormat(String),

    /// A renderer could not produce a complete buffer.
    ///
    /// Deterministic for a given input, so callers should not retry blindly.
    #[error("failed to render {category} as {format}: {cause}")]
    RenderFailure {
        /// Category slug of the export.
        category: String,
        /// Format tag of the export.
        format: String,
        /// The underlying cause.
        cause: String,
    },

    /// Invalid input was provided.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An operation failed.
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },
}

/// Result type alias for export operations.
pub type Result<T> = std::result::Result<T, Error>;
