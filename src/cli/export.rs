//! CLI command for building an export file.

use crate::Result;
use crate::io::ExportService;
use std::io::Write;
use std::path::PathBuf;

/// Arguments of the export command.
#[derive(Debug, Clone)]
pub struct ExportArgs {
    /// Category tag.
    pub category: String,
    /// Format tag.
    pub format: String,
    /// Requesting role.
    pub role: String,
    /// Output directory.
    pub out_dir: PathBuf,
}

/// Builds the export, writes it to `args.out_dir` (created if missing) and
/// reports the saved path.
///
/// # Errors
///
/// Returns the orchestrator's error unchanged; write failures on `writer`
/// become [`crate::Error::OperationFailed`].
pub fn cmd_export<W: Write>(
    writer: &mut W,
    service: &ExportService,
    args: &ExportArgs,
) -> Result<PathBuf> {
    std::fs::create_dir_all(&args.out_dir).map_err(|e| crate::Error::OperationFailed {
        operation: "create_output_dir".to_string(),
        cause: format!("{}: {e}", args.out_dir.display()),
    })?;
    let (result, path) =
        service.export_to_dir(&args.category, &args.format, &args.role, &args.out_dir)?;

    let mut report = format!(
        "Saved {} ({} bytes, {})\n",
        path.display(),
        result.bytes.len(),
        result.mime_type()
    );
    if result.is_truncated() {
        report.push_str(&format!(
            "Partial view: {} of {} records\n",
            result.rendered_records, result.total_records
        ));
    }
    writer
        .write_all(report.as_bytes())
        .map_err(|e| crate::Error::OperationFailed {
            operation: "write_output".to_string(),
            cause: e.to_string(),
        })?;
    Ok(path)
}
