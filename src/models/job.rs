//! Per-request export job and its result.

use super::{ExportCategory, ExportFormat, Record};
use chrono::NaiveDateTime;

/// Filename timestamp layout: `YYYYMMDD_HHMMSS`.
pub const FILENAME_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// The complete input to a renderer.
///
/// Built fresh by the orchestrator for every request and dropped once the
/// renderer returns.
#[derive(Debug, Clone)]
pub struct ExportJob {
    /// Data category being exported.
    pub category: ExportCategory,
    /// Target format.
    pub format: ExportFormat,
    /// Wall-clock time the export was requested.
    pub generated_at: NaiveDateTime,
    /// Human-readable report title.
    pub title: String,
    /// Column titles, one per record cell.
    pub headers: Vec<String>,
    /// Data rows in source order.
    pub records: Vec<Record>,
}

impl ExportJob {
    /// Creates a job with no records.
    #[must_use]
    pub fn new(
        category: ExportCategory,
        format: ExportFormat,
        generated_at: NaiveDateTime,
        title: impl Into<String>,
        headers: Vec<String>,
    ) -> Self {
        Self {
            category,
            format,
            generated_at,
            title: title.into(),
            headers,
            records: Vec::new(),
        }
    }

    /// Sets the records.
    #[must_use]
    pub fn with_records(mut self, records: Vec<Record>) -> Self {
        self.records = records;
        self
    }

    /// Builds the download filename: `<category>_<YYYYMMDD>_<HHMMSS>.<ext>`.
    #[must_use]
    pub fn filename(&self) -> String {
        export_filename(self.category, self.format, self.generated_at)
    }
}

/// Builds the deterministic export filename.
#[must_use]
pub fn export_filename(
    category: ExportCategory,
    format: ExportFormat,
    generated_at: NaiveDateTime,
) -> String {
    format!(
        "{}_{}.{}",
        category.as_str(),
        generated_at.format(FILENAME_TIMESTAMP_FORMAT),
        format.extension()
    )
}

/// A finished export: the file bytes and the name to deliver them under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportResult {
    /// Complete, independently openable file.
    pub bytes: Vec<u8>,
    /// Download filename.
    pub filename: String,
    /// Format of `bytes`.
    pub format: ExportFormat,
    /// Records the source returned.
    pub total_records: usize,
    /// Records that made it into the file (less than the total when capped).
    pub rendered_records: usize,
}

impl ExportResult {
    /// Returns true when a row cap hid part of the data.
    #[must_use]
    pub const fn is_truncated(&self) -> bool {
        self.rendered_records < self.total_records
    }

    /// Returns the MIME type of the buffer.
    #[must_use]
    pub const fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }
}
