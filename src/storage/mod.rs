//! Record storage.
//!
//! Two interchangeable [`RecordSource`] implementations:
//! - [`MockRecordSource`]: fixed in-memory datasets for demos and tests
//! - [`SqliteRecordSource`]: one `SQLite` table per category
//!
//! The export core only sees the trait, so deployments pick the source at
//! start-up without touching the renderers.

// Connection guards are held for a whole statement sequence.
#![allow(clippy::significant_drop_tightening)]

pub mod source;
pub mod sqlite;
pub mod traits;

pub use source::{MockRecordSource, SqliteRecordSource};
pub use traits::RecordSource;
