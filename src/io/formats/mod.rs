//! Output format renderers.
//!
//! | Format | Library | Row cap | Notes |
//! |--------|---------|---------|-------|
//! | CSV | `csv` | - | UTF-8 BOM, CRLF |
//! | XLSX | `zip` + `quick-xml` | - | Styled header, merged title |
//! | DOCX | `zip` + `quick-xml` | 20 | Repeating header row |
//! | PDF | `lopdf` | 30 | A4 landscape, header repeated per page |

pub mod csv;
pub mod docx;
mod ooxml;
pub mod pdf;
pub mod xlsx;

use crate::Result;
use crate::io::cells::CellFormatter;
use crate::io::traits::Renderer;
use crate::models::ExportFormat;

/// Spreadsheet column width cap used when none is configured.
pub const DEFAULT_MAX_COLUMN_WIDTH: usize = 50;

/// Knobs shared by the renderers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSettings {
    /// Digit group separator for numbers and money.
    pub group_separator: String,
    /// Separator between the integer and fractional part of money.
    pub decimal_separator: String,
    /// Widest spreadsheet column, in characters.
    pub max_column_width: usize,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            group_separator: " ".to_string(),
            decimal_separator: ".".to_string(),
            max_column_width: DEFAULT_MAX_COLUMN_WIDTH,
        }
    }
}

impl RenderSettings {
    /// Builds the cell formatter for these settings.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidInput`] for an unusable group separator.
    pub fn formatter(&self) -> Result<CellFormatter> {
        CellFormatter::new(&self.group_separator, &self.decimal_separator)
    }
}

/// Creates the renderer for a format.
///
/// # Errors
///
/// Returns [`crate::Error::InvalidInput`] if the settings are unusable.
pub fn create_renderer(format: ExportFormat, settings: &RenderSettings) -> Result<Box<dyn Renderer>> {
    let formatter = settings.formatter()?;
    Ok(match format {
        ExportFormat::Csv => Box::new(csv::CsvRenderer::new(formatter)),
        ExportFormat::Xlsx => Box::new(xlsx::XlsxRenderer::new(
            formatter,
            settings.max_column_width,
        )),
        ExportFormat::Docx => Box::new(docx::DocxRenderer::new(formatter)),
        ExportFormat::Pdf => Box::new(pdf::PdfRenderer::new(formatter)),
    })
}
