//! Shared `SQLite` helpers for the record source.
//!
//! - [`connection`]: lock acquisition with poison recovery, pragmas
//! - [`cells`]: conversion between [`CellValue`](crate::models::CellValue) and `SQLite` values
//! - [`metrics`]: per-operation counters and latency histograms

mod cells;
mod connection;
mod metrics;

pub use cells::{cell_from_sql, cell_to_sql, quote_identifier};
pub use connection::{acquire_lock, configure_connection};
pub use metrics::record_operation_metrics;
