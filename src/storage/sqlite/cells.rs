//! Cell value conversion.
//!
//! Writes are loose: every [`CellValue`] maps to the closest `SQLite` value.
//! Reads are driven by the column kind from the registry, so a value that was
//! stored with the wrong affinity still comes back typed where possible.

use crate::models::CellValue;
use crate::schema::ColumnKind;
use chrono::NaiveDate;
use rusqlite::types::{Value, ValueRef};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// Date layout used for stored dates.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Converts a cell into an owned `SQLite` value.
#[must_use]
pub fn cell_to_sql(cell: &CellValue) -> Value {
    match cell {
        CellValue::Text(s) | CellValue::Display(s) => Value::Text(s.clone()),
        CellValue::Integer(n) => Value::Integer(*n),
        CellValue::Money { amount, .. } => amount
            .to_f64()
            .map_or_else(|| Value::Text(amount.to_string()), Value::Real),
        CellValue::Date(date) => Value::Text(date.format(DATE_FORMAT).to_string()),
        CellValue::Missing => Value::Null,
    }
}

/// Converts a stored value back into a cell of the given kind.
///
/// `NULL` is always [`CellValue::Missing`]. Values that do not fit the kind
/// degrade to [`CellValue::Display`] instead of failing the whole read.
#[must_use]
pub fn cell_from_sql(value: ValueRef<'_>, kind: ColumnKind) -> CellValue {
    match (kind, value) {
        (_, ValueRef::Null) => CellValue::Missing,

        (ColumnKind::Integer, ValueRef::Integer(n)) => CellValue::Integer(n),
        #[allow(clippy::cast_possible_truncation)]
        (ColumnKind::Integer, ValueRef::Real(f)) if f.is_finite() => {
            CellValue::Integer(f.round() as i64)
        },

        (ColumnKind::Money(unit), ValueRef::Integer(n)) => CellValue::Money {
            amount: Decimal::from(n),
            unit: unit.to_string(),
        },
        (ColumnKind::Money(unit), ValueRef::Real(f)) => match Decimal::try_from(f) {
            Ok(amount) => CellValue::Money {
                amount: amount.round_dp(2),
                unit: unit.to_string(),
            },
            Err(_) => CellValue::Display(f.to_string()),
        },

        (kind, ValueRef::Text(bytes)) => text_cell(&String::from_utf8_lossy(bytes), kind),
        (_, ValueRef::Integer(n)) => CellValue::Text(n.to_string()),
        (_, ValueRef::Real(f)) => CellValue::Text(f.to_string()),
        (_, ValueRef::Blob(bytes)) => CellValue::Display(format!("<{} bytes>", bytes.len())),
    }
}

fn text_cell(text: &str, kind: ColumnKind) -> CellValue {
    match kind {
        ColumnKind::Text => CellValue::Text(text.to_string()),
        ColumnKind::Display => CellValue::Display(text.to_string()),
        ColumnKind::Date => NaiveDate::parse_from_str(text.trim(), DATE_FORMAT)
            .map_or_else(|_| CellValue::Display(text.to_string()), CellValue::Date),
        ColumnKind::Integer => text
            .trim()
            .parse::<i64>()
            .map_or_else(|_| CellValue::Display(text.to_string()), CellValue::Integer),
        ColumnKind::Money(unit) => text.trim().parse::<Decimal>().map_or_else(
            |_| CellValue::Display(text.to_string()),
            |amount| CellValue::Money {
                amount: amount.round_dp(2),
                unit: unit.to_string(),
            },
        ),
    }
}

/// Quotes an identifier for use in SQL text.
#[must_use]
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
