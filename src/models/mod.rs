//! Data models for the export engine.
//!
//! Everything here lives for a single export request, except the category and
//! format tags which are plain closed enums.

mod category;
mod format;
mod job;
mod record;

pub use category::ExportCategory;
pub use format::ExportFormat;
pub use job::{ExportJob, ExportResult, FILENAME_TIMESTAMP_FORMAT, export_filename};
pub use record::{CellValue, Record};
