//! Record source trait.

use crate::Result;
use crate::models::{ExportCategory, Record};

/// Trait for providers of export records.
///
/// A source yields the rows of one category in a stable order. Content and
/// row count may change between calls; the column set and key order of a
/// category never do.
///
/// Implementations must be shareable across threads: the orchestrator holds
/// one behind an `Arc` and calls it from concurrent exports.
pub trait RecordSource: Send + Sync {
    /// Returns every record of `category`, possibly none.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::UnknownCategory`] if the source does not serve
    /// `category`, or [`crate::Error::OperationFailed`] if the backing store
    /// could not be read.
    fn records(&self, category: ExportCategory) -> Result<Vec<Record>>;

    /// Returns true if the source serves `category`.
    fn supports(&self, category: ExportCategory) -> bool;

    /// Returns the number of records of `category`.
    fn count(&self, category: ExportCategory) -> Result<usize> {
        Ok(self.records(category)?.len())
    }
}
