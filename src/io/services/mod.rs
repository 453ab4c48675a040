//! Export orchestration.

pub mod export;

pub use export::{ExportService, build_export};
