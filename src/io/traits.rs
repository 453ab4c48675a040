//! Renderer trait.
//!
//! Every output format implements [`Renderer`]; the orchestrator picks one
//! through [`crate::io::formats::create_renderer`].

use crate::Result;
use crate::models::{ExportFormat, ExportJob};

/// Turns an export job into the bytes of one complete file.
///
/// Renderers are stateless between calls and shared across threads. A render
/// either returns the whole buffer or an error; partial output is dropped.
pub trait Renderer: Send + Sync {
    /// The format this renderer produces.
    fn format(&self) -> ExportFormat;

    /// Renders the job.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::RenderFailure`] if the job's headers and
    /// records disagree in width, or if the underlying writer fails.
    fn render(&self, job: &ExportJob) -> Result<Vec<u8>>;

    /// Maximum number of records the format shows, if capped.
    fn row_cap(&self) -> Option<usize> {
        self.format().row_cap()
    }
}
