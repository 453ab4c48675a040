//! Header Registry.
//!
//! Maps each [`ExportCategory`] to its report title and ordered column list.
//! Every renderer takes its headers from here, so all four formats show the
//! same columns in the same order.
//!
//! The registry is a process-wide constant built once from [`CATEGORY_SCHEMAS`]
//! and never mutated; see [`HeaderRegistry::global`].

mod catalogue;

pub use catalogue::CATEGORY_SCHEMAS;

use crate::models::ExportCategory;
use crate::{Error, Result};
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Money unit used by the built-in catalogue.
pub const DEFAULT_CURRENCY: &str = "RUB";

/// How a column's values are typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    /// Free text.
    Text,
    /// Whole number.
    Integer,
    /// Decimal amount with the given unit suffix.
    Money(&'static str),
    /// Calendar date.
    Date,
    /// Pre-formatted label.
    Display,
}

impl ColumnKind {
    /// `SQLite` column type used to store values of this kind.
    #[must_use]
    pub const fn sql_type(&self) -> &'static str {
        match self {
            Self::Integer => "INTEGER",
            Self::Money(_) => "REAL",
            Self::Text | Self::Date | Self::Display => "TEXT",
        }
    }
}

/// One column of a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    /// Record key.
    pub key: &'static str,
    /// Human-readable column title.
    pub label: &'static str,
    /// Value type.
    pub kind: ColumnKind,
}

impl ColumnSpec {
    /// Creates a column definition.
    #[must_use]
    pub const fn new(key: &'static str, label: &'static str, kind: ColumnKind) -> Self {
        Self { key, label, kind }
    }
}

/// Title and columns for one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategorySchema {
    /// The category this entry describes.
    pub category: ExportCategory,
    /// Report title shown above the table.
    pub title: &'static str,
    /// Columns in display order.
    pub columns: &'static [ColumnSpec],
}

impl CategorySchema {
    /// Column titles in order.
    #[must_use]
    pub fn headers(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.label.to_string()).collect()
    }

    /// Column keys in order.
    #[must_use]
    pub fn keys(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.key).collect()
    }
}

static GLOBAL_REGISTRY: Lazy<HeaderRegistry> =
    Lazy::new(|| HeaderRegistry::from_schemas(CATEGORY_SCHEMAS));

/// Lookup table from category to schema.
#[derive(Debug, Clone)]
pub struct HeaderRegistry {
    entries: HashMap<ExportCategory, CategorySchema>,
}

impl HeaderRegistry {
    /// Returns the process-wide registry built from the built-in catalogue.
    #[must_use]
    pub fn global() -> &'static Self {
        &GLOBAL_REGISTRY
    }

    /// Builds a registry from schema definitions.
    ///
    /// A later entry for the same category replaces an earlier one.
    #[must_use]
    pub fn from_schemas(schemas: &[CategorySchema]) -> Self {
        let entries = schemas
            .iter()
            .map(|schema| (schema.category, *schema))
            .collect();
        Self { entries }
    }

    /// Returns the full schema for a category.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownCategory`] if the category has no entry.
    pub fn schema(&self, category: ExportCategory) -> Result<&CategorySchema> {
        self.entries
            .get(&category)
            .ok_or_else(|| Error::UnknownCategory(category.to_string()))
    }

    /// Returns the ordered column titles for a category.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownCategory`] if the category has no entry.
    pub fn headers(&self, category: ExportCategory) -> Result<Vec<String>> {
        self.schema(category).map(CategorySchema::headers)
    }

    /// Returns the report title for a category.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownCategory`] if the category has no entry.
    pub fn title(&self, category: ExportCategory) -> Result<&'static str> {
        self.schema(category).map(|schema| schema.title)
    }

    /// Returns the categories that have an entry, in catalogue order.
    #[must_use]
    pub fn categories(&self) -> Vec<ExportCategory> {
        ExportCategory::all()
            .iter()
            .copied()
            .filter(|c| self.entries.contains_key(c))
            .collect()
    }
}

impl Default for HeaderRegistry {
    fn default() -> Self {
        Self::global().clone()
    }
}
