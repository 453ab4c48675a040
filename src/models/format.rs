//! Output file formats.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported export file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// UTF-8 CSV with BOM. The only format without a row cap.
    Csv,
    /// Office Open XML spreadsheet.
    Xlsx,
    /// Office Open XML word-processing document.
    Docx,
    /// Paginated PDF report.
    Pdf,
}

impl ExportFormat {
    /// Returns all supported formats.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Csv, Self::Xlsx, Self::Docx, Self::Pdf]
    }

    /// Returns the format tag.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
            Self::Docx => "docx",
            Self::Pdf => "pdf",
        }
    }

    /// Returns the file extension for this format.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        self.as_str()
    }

    /// Returns the MIME type for this format.
    #[must_use]
    pub const fn mime_type(&self) -> &'static str {
        match self {
            Self::Csv => "text/csv",
            Self::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            Self::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            },
            Self::Pdf => "application/pdf",
        }
    }

    /// Returns the maximum number of data rows the format renders, if capped.
    #[must_use]
    pub const fn row_cap(&self) -> Option<usize> {
        match self {
            Self::Csv | Self::Xlsx => None,
            Self::Docx => Some(crate::io::formats::docx::DOCX_ROW_CAP),
            Self::Pdf => Some(crate::io::formats::pdf::PDF_ROW_CAP),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "xlsx" => Ok(Self::Xlsx),
            "docx" => Ok(Self::Docx),
            "pdf" => Ok(Self::Pdf),
            _ => Err(Error::UnknownFormat(s.to_string())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
