//! CLI command for seeding a `SQLite` record database.

use crate::Result;
use crate::models::ExportCategory;
use crate::storage::{MockRecordSource, RecordSource, SqliteRecordSource};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Outcome of a seed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedReport {
    /// Database that was written.
    pub database: PathBuf,
    /// Rows now stored per category.
    pub counts: Vec<(ExportCategory, usize)>,
}

impl SeedReport {
    /// Total rows across categories.
    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, count)| count).sum()
    }
}

/// Replaces the contents of the database at `database` with the demo records.
///
/// The database and its tables are created when missing.
///
/// # Errors
///
/// Returns [`crate::Error::OperationFailed`] if the database cannot be
/// opened or written.
pub fn cmd_seed<W: Write>(writer: &mut W, database: &Path) -> Result<SeedReport> {
    let target = SqliteRecordSource::new(database)?;
    let demo = MockRecordSource::new();
    target.seed_from(&demo)?;

    let counts = ExportCategory::all()
        .iter()
        .filter(|category| target.supports(**category))
        .map(|category| Ok((*category, target.count(*category)?)))
        .collect::<Result<Vec<_>>>()?;
    let report = SeedReport {
        database: database.to_path_buf(),
        counts,
    };

    let mut text = format!("Seeded {}\n", report.database.display());
    for (category, count) in &report.counts {
        text.push_str(&format!("  {:<14}{count}\n", category.as_str()));
    }
    text.push_str(&format!("  {:<14}{}\n", "total", report.total()));
    writer
        .write_all(text.as_bytes())
        .map_err(|e| crate::Error::OperationFailed {
            operation: "write_output".to_string(),
            cause: e.to_string(),
        })?;

    Ok(report)
}
