//! CLI command for listing exportable categories.

use crate::io::ExportService;
use crate::schema::HeaderRegistry;
use serde::Serialize;
use std::io::{self, Write};
use std::str::FromStr;

/// One exportable category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryInfo {
    /// Category tag.
    pub category: String,
    /// Report title.
    pub title: String,
    /// Column titles in order.
    pub columns: Vec<String>,
}

/// Returns the categories `role` may export through `service`.
#[must_use]
pub fn list_categories(service: &ExportService, role: &str) -> Vec<CategoryInfo> {
    let registry = HeaderRegistry::global();
    service
        .categories(role)
        .into_iter()
        .map(|(category, title)| CategoryInfo {
            category: category.to_string(),
            title: title.to_string(),
            columns: registry.headers(category).unwrap_or_default(),
        })
        .collect()
}

/// Output format for the categories command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CategoriesOutputFormat {
    /// Table format (default).
    #[default]
    Table,
    /// JSON format.
    Json,
}

impl FromStr for CategoriesOutputFormat {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Table,
        })
    }
}

/// Writes categories as a table.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_table<W: Write>(
    writer: &mut W,
    categories: &[CategoryInfo],
    verbose: bool,
) -> io::Result<()> {
    if categories.is_empty() {
        return writeln!(writer, "No categories available for this role");
    }
    if verbose {
        writeln!(writer, "{:<14}{:<26}COLUMNS", "CATEGORY", "TITLE")?;
        for info in categories {
            writeln!(
                writer,
                "{:<14}{:<26}{}",
                info.category,
                info.title,
                info.columns.join(", ")
            )?;
        }
    } else {
        writeln!(writer, "{:<14}TITLE", "CATEGORY")?;
        for info in categories {
            writeln!(writer, "{:<14}{}", info.category, info.title)?;
        }
    }
    Ok(())
}

/// Writes categories as JSON.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_json<W: Write>(
    writer: &mut W,
    categories: &[CategoryInfo],
) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string_pretty(categories)?;
    writeln!(writer, "{json}")?;
    Ok(())
}

/// Executes the categories command.
///
/// # Errors
///
/// Returns an error if serialization or output fails.
pub fn cmd_categories<W: Write>(
    writer: &mut W,
    service: &ExportService,
    role: &str,
    format: CategoriesOutputFormat,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let categories = list_categories(service, role);
    match format {
        CategoriesOutputFormat::Table => {
            write_table(writer, &categories, verbose)?;
            Ok(())
        },
        CategoriesOutputFormat::Json => write_json(writer, &categories),
    }
}
