//! Job shape validation.
//!
//! Checked by every renderer before the first byte is written.

use crate::models::{ExportFormat, ExportJob};
use crate::{Error, Result};
use std::fmt::Display;

/// Checks that a job has headers and that every record is as wide as them.
///
/// # Errors
///
/// Returns [`Error::RenderFailure`] naming the first offending record.
pub fn validate_job(job: &ExportJob, format: ExportFormat) -> Result<()> {
    if job.headers.is_empty() {
        return Err(render_failure(job, format, "no column headers"));
    }
    if let Some((index, record)) = job
        .records
        .iter()
        .enumerate()
        .find(|(_, record)| record.len() != job.headers.len())
    {
        return Err(render_failure(
            job,
            format,
            format!(
                "record {index} has {} cells but there are {} headers",
                record.len(),
                job.headers.len()
            ),
        ));
    }
    Ok(())
}

/// Builds a [`Error::RenderFailure`] for a job.
pub fn render_failure(job: &ExportJob, format: ExportFormat, cause: impl Display) -> Error {
    Error::RenderFailure {
        category: job.category.to_string(),
        format: format.to_string(),
        cause: cause.to_string(),
    }
}
