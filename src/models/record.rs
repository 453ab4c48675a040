//! Typed records and cell values.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One typed value occupying one column of one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CellValue {
    /// Free text (names, addresses, comments).
    Text(String),
    /// Whole number, rendered with digit grouping.
    Integer(i64),
    /// Decimal amount with a currency or unit suffix kept in the same cell.
    Money {
        /// The amount.
        amount: Decimal,
        /// Unit suffix, e.g. `RUB`.
        unit: String,
    },
    /// Calendar date.
    Date(NaiveDate),
    /// Pre-formatted display string (status labels, percentages).
    Display(String),
    /// Absent value; rendered as a placeholder, never blank.
    Missing,
}

impl CellValue {
    /// Creates a text cell.
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Creates a pre-formatted display cell.
    #[must_use]
    pub fn display(value: impl Into<String>) -> Self {
        Self::Display(value.into())
    }

    /// Creates a money cell from an amount expressed in hundredths.
    #[must_use]
    pub fn money_cents(cents: i64, unit: impl Into<String>) -> Self {
        Self::Money {
            amount: Decimal::new(cents, 2),
            unit: unit.into(),
        }
    }

    /// Creates a date cell, or `Missing` when the date is invalid.
    #[must_use]
    pub fn date(year: i32, month: u32, day: u32) -> Self {
        NaiveDate::from_ymd_opt(year, month, day).map_or(Self::Missing, Self::Date)
    }

    /// Returns true if the cell has no visible content.
    #[must_use]
    pub fn is_missing(&self) -> bool {
        match self {
            Self::Missing => true,
            Self::Text(s) | Self::Display(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<NaiveDate> for CellValue {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl<T: Into<Self>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Missing, Into::into)
    }
}

/// An ordered mapping from column key to cell value.
///
/// Records of one export are homogeneous: the same keys in the same order as
/// the category's registry entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    cells: Vec<(String, CellValue)>,
}

impl Record {
    /// Creates an empty record.
    #[must_use]
    pub const fn new() -> Self {
        Self { cells: Vec::new() }
    }

    /// Appends a cell.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.push(key, value);
        self
    }

    /// Appends a cell in place.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<CellValue>) {
        self.cells.push((key.into(), value.into()));
    }

    /// Number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns true if the record has no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Column keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(key, _)| key.as_str())
    }

    /// Cell values in column order.
    pub fn values(&self) -> impl Iterator<Item = &CellValue> {
        self.cells.iter().map(|(_, value)| value)
    }

    /// Looks up a cell by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.cells
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value)
    }
}

impl<K: Into<String>, V: Into<CellValue>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            cells: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_preserves_key_order() {
        let record = Record::new()
            .with("order_id", "ORD-1")
            .with("amount", CellValue::money_cents(123_450, "RUB"))
            .with("created_on", CellValue::date(2024, 3, 1));

        assert_eq!(
            record.keys().collect::<Vec<_>>(),
            vec!["order_id", "amount", "created_on"]
        );
        assert_eq!(record.len(), 3);
        assert_eq!(record.get("order_id"), Some(&CellValue::text("ORD-1")));
        assert!(record.get("missing").is_none());
    }

    #[test]
    fn test_missing_detection() {
        assert!(CellValue::Missing.is_missing());
        assert!(CellValue::text("   ").is_missing());
        assert!(CellValue::display("").is_missing());
        assert!(!CellValue::Integer(0).is_missing());
        assert!(!CellValue::text("x").is_missing());
    }

    #[test]
    fn test_option_conversion() {
        let none: Option<i64> = None;
        assert_eq!(CellValue::from(none), CellValue::Missing);
        assert_eq!(CellValue::from(Some(5_i64)), CellValue::Integer(5));
    }

    #[test]
    fn test_invalid_date_is_missing() {
        assert_eq!(CellValue::date(2024, 2, 30), CellValue::Missing);
    }
}
