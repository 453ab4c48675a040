//! Cell display rules shared by every renderer.
//!
//! Renderers never format values themselves; they ask a [`CellFormatter`]
//! for the display string so that a cell reads the same in all four formats.

use crate::models::{CellValue, ExportJob, Record};
use crate::{Error, Result};
use chrono::NaiveDateTime;
use num_format::{CustomFormat, Grouping, ToFormattedString};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Shown in place of a missing or blank value.
pub const PLACEHOLDER: &str = "-";

/// Layout of the "Generated" line under the title.
pub const GENERATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Layout of date cells.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Longest text cell a PDF table shows untouched.
pub const PDF_TEXT_LIMIT: usize = 32;

/// Characters kept when a PDF text cell is cut.
pub const PDF_TEXT_KEEP: usize = 29;

const ELLIPSIS: &str = "...";

/// Formats cell values into display strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellFormatter {
    grouping: CustomFormat,
    decimal_separator: String,
}

impl Default for CellFormatter {
    fn default() -> Self {
        Self {
            grouping: CustomFormat::builder()
                .grouping(Grouping::Standard)
                .separator(" ")
                .build()
                .unwrap_or_default(),
            decimal_separator: ".".to_string(),
        }
    }
}

impl CellFormatter {
    /// Creates a formatter with custom separators.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the group separator is longer than
    /// 8 bytes.
    pub fn new(group_separator: &str, decimal_separator: &str) -> Result<Self> {
        let grouping = CustomFormat::builder()
            .grouping(Grouping::Standard)
            .separator(group_separator)
            .build()
            .map_err(|e| {
                Error::InvalidInput(format!("group separator '{group_separator}': {e}"))
            })?;
        Ok(Self {
            grouping,
            decimal_separator: decimal_separator.to_string(),
        })
    }

    /// Returns the display string of a cell.
    #[must_use]
    pub fn format(&self, cell: &CellValue) -> String {
        if cell.is_missing() {
            return PLACEHOLDER.to_string();
        }
        match cell {
            CellValue::Text(s) | CellValue::Display(s) => s.clone(),
            CellValue::Integer(n) => self.format_integer(*n),
            CellValue::Money { amount, unit } => self.format_money(*amount, unit),
            CellValue::Date(date) => date.format(DATE_FORMAT).to_string(),
            CellValue::Missing => PLACEHOLDER.to_string(),
        }
    }

    /// Display string for a PDF table cell.
    ///
    /// Same as [`Self::format`] except that long text is shortened.
    #[must_use]
    pub fn format_for_pdf(&self, cell: &CellValue) -> String {
        match cell {
            CellValue::Text(s) if !cell.is_missing() => shorten(s),
            _ => self.format(cell),
        }
    }

    /// Groups the digits of an integer: `1234567` → `1 234 567`.
    #[must_use]
    pub fn format_integer(&self, n: i64) -> String {
        n.to_formatted_string(&self.grouping)
    }

    /// Formats an amount with two decimals, grouped digits and a unit suffix.
    #[must_use]
    pub fn format_money(&self, amount: Decimal, unit: &str) -> String {
        let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let sign = if rounded < Decimal::ZERO { "-" } else { "" };
        let abs = rounded.abs();
        let whole = abs.trunc();
        let cents = ((abs - whole) * Decimal::ONE_HUNDRED).to_u8().unwrap_or(0);
        // a Decimal mantissa is 96 bits, so the whole part always fits in u128
        let grouped = whole
            .to_u128()
            .map_or_else(|| whole.to_string(), |n| n.to_formatted_string(&self.grouping));
        let number = format!("{sign}{grouped}{}{cents:02}", self.decimal_separator);
        if unit.is_empty() {
            number
        } else {
            format!("{number} {unit}")
        }
    }

    /// Formats every cell of a record in column order.
    #[must_use]
    pub fn format_record(&self, record: &Record) -> Vec<String> {
        record.values().map(|cell| self.format(cell)).collect()
    }

    /// Formats the first `limit` records of a job (all when `None`).
    #[must_use]
    pub fn format_rows(&self, job: &ExportJob, limit: Option<usize>) -> Vec<Vec<String>> {
        job.records
            .iter()
            .take(limit.unwrap_or(usize::MAX))
            .map(|record| self.format_record(record))
            .collect()
    }
}

/// The line printed under every report title.
#[must_use]
pub fn generated_line(generated_at: NaiveDateTime) -> String {
    format!("Generated: {}", generated_at.format(GENERATED_AT_FORMAT))
}

/// The note appended when a document format hides rows.
#[must_use]
pub fn truncation_note(shown: usize, total: usize) -> String {
    format!("Showing the first {shown} of {total} records (partial view).")
}

fn shorten(text: &str) -> String {
    if text.chars().count() <= PDF_TEXT_LIMIT {
        return text.to_string();
    }
    let mut short: String = text.chars().take(PDF_TEXT_KEEP).collect();
    short.push_str(ELLIPSIS);
    short
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use test_case::test_case;

    #[test_case(0, "0"; "zero")]
    #[test_case(999, "999"; "no group")]
    #[test_case(1_000, "1 000"; "one group")]
    #[test_case(1_234_567, "1 234 567"; "millions")]
    #[test_case(-1_234_567, "-1 234 567"; "negative")]
    fn test_integer_grouping(n: i64, expected: &str) {
        assert_eq!(CellFormatter::default().format_integer(n), expected);
    }

    #[test_case(123_456_750, "1 234 567.50 RUB"; "grouped with cents")]
    #[test_case(5, "0.05 RUB"; "below one")]
    #[test_case(-150_000, "-1 500.00 RUB"; "negative")]
    fn test_money(cents: i64, expected: &str) {
        let cell = CellValue::money_cents(cents, "RUB");
        assert_eq!(CellFormatter::default().format(&cell), expected);
    }

    #[test]
    fn test_money_rounds_half_away_from_zero() {
        let formatter = CellFormatter::default();
        assert_eq!(formatter.format_money(Decimal::new(1_005, 3), "RUB"), "1.01 RUB");
        assert_eq!(formatter.format_money(Decimal::new(-4, 3), ""), "0.00");
    }

    #[test]
    fn test_money_at_decimal_limits_stays_grouped() {
        let formatter = CellFormatter::default();
        assert_eq!(
            formatter.format_money(Decimal::MAX, "RUB"),
            "79 228 162 514 264 337 593 543 950 335.00 RUB"
        );
        assert_eq!(
            formatter.format_money(Decimal::MIN, ""),
            "-79 228 162 514 264 337 593 543 950 335.00"
        );
        assert_eq!(
            formatter.format_money(Decimal::new(123_456_789_012_345_678, 1), "RUB"),
            "12 345 678 901 234 567.80 RUB"
        );
    }

    #[test]
    fn test_custom_separators() {
        let formatter = CellFormatter::new(",", ",").unwrap();
        assert_eq!(formatter.format_integer(1_234_567), "1,234,567");
        let formatter = CellFormatter::new("\u{a0}", ",").unwrap();
        assert_eq!(
            formatter.format(&CellValue::money_cents(123_456, "EUR")),
            "1\u{a0}234,56 EUR"
        );
    }

    #[test]
    fn test_overlong_separator_rejected() {
        assert!(matches!(
            CellFormatter::new("=========", "."),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_missing_and_blank_use_placeholder() {
        let formatter = CellFormatter::default();
        assert_eq!(formatter.format(&CellValue::Missing), PLACEHOLDER);
        assert_eq!(formatter.format(&CellValue::text("  ")), PLACEHOLDER);
        assert_eq!(formatter.format(&CellValue::display("")), PLACEHOLDER);
        assert_eq!(formatter.format_for_pdf(&CellValue::text("")), PLACEHOLDER);
    }

    #[test]
    fn test_date() {
        let cell = CellValue::date(2024, 3, 7);
        assert_eq!(CellFormatter::default().format(&cell), "2024-03-07");
    }

    #[test]
    fn test_pdf_shortening() {
        let formatter = CellFormatter::default();
        let exact = "a".repeat(PDF_TEXT_LIMIT);
        assert_eq!(formatter.format_for_pdf(&CellValue::text(exact.clone())), exact);

        let long = "b".repeat(PDF_TEXT_LIMIT + 1);
        let short = formatter.format_for_pdf(&CellValue::text(long.clone()));
        assert_eq!(short, format!("{}...", "b".repeat(PDF_TEXT_KEEP)));
        assert_eq!(formatter.format(&CellValue::text(long.clone())), long);

        // display labels are never shortened
        let label = CellValue::display("c".repeat(40));
        assert_eq!(formatter.format_for_pdf(&label).len(), 40);
    }

    #[test]
    fn test_generated_line() {
        let at = NaiveDate::from_ymd_opt(2024, 3, 7)
            .unwrap()
            .and_hms_opt(9, 5, 59)
            .unwrap();
        assert_eq!(generated_line(at), "Generated: 2024-03-07 09:05");
    }

    #[test]
    fn test_truncation_note() {
        assert_eq!(
            truncation_note(20, 25),
            "Showing the first 20 of 25 records (partial view)."
        );
    }
}
