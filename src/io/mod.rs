//! Export I/O: cell formatting, renderers and the orchestrator.
//!
//! # Architecture
//!
//! - [`cells`]: display rules every renderer shares
//! - [`formats`]: one [`Renderer`] per output format
//! - [`validation`]: job shape checks run before rendering
//! - [`services`]: the [`ExportService`] orchestrator
//!
//! # Example
//!
//! ```rust,ignore
//! use backoffice_export::io::ExportService;
//! use backoffice_export::storage::MockRecordSource;
//! use std::sync::Arc;
//!
//! let service = ExportService::new(Arc::new(MockRecordSource::new()));
//! let result = service.build("calls", "pdf", "call_center")?;
//! println!("{} ({} bytes)", result.filename, result.bytes.len());
//! ```

pub mod cells;
pub mod formats;
pub mod services;
pub mod traits;
pub mod validation;

pub use cells::CellFormatter;
pub use formats::{RenderSettings, create_renderer};
pub use services::export::{ExportService, build_export};
pub use traits::Renderer;
