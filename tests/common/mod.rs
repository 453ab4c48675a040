//! Shared helpers for integration tests: a sized record source and readers
//! that pull text back out of every output format.

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use backoffice_export::models::{CellValue, ExportCategory, Record};
use backoffice_export::schema::{ColumnKind, HeaderRegistry};
use backoffice_export::{ExportService, RecordSource, Result};
use chrono::{NaiveDate, NaiveDateTime};
use lopdf::content::Content;
use lopdf::{Document, Object};
use std::io::{Cursor, Read};
use std::sync::Arc;

/// Serves `rows` synthetic records for every category.
pub struct SizedSource {
    pub rows: usize,
}

impl RecordSource for SizedSource {
    fn records(&self, category: ExportCategory) -> Result<Vec<Record>> {
        Ok(synthetic_records(category, self.rows))
    }

    fn supports(&self, _category: ExportCategory) -> bool {
        true
    }
}

/// Builds `n` records matching the registry columns of `category`.
///
/// Text cells of row `i` read `<key>-<i>`, so rows are easy to find in output.
pub fn synthetic_records(category: ExportCategory, n: usize) -> Vec<Record> {
    let schema = HeaderRegistry::global().schema(category).unwrap();
    (0..n)
        .map(|i| {
            let mut record = Record::default();
            for column in schema.columns {
                let value = match column.kind {
                    ColumnKind::Text | ColumnKind::Display => {
                        CellValue::text(format!("{}-{i}", column.key))
                    },
                    ColumnKind::Integer => CellValue::Integer(i64::try_from(i).unwrap() * 1000),
                    ColumnKind::Money(unit) => {
                        CellValue::money_cents(i64::try_from(i).unwrap() * 12_345, unit)
                    },
                    ColumnKind::Date => CellValue::date(2024, 1, 1 + u32::try_from(i % 28).unwrap()),
                };
                record.push(column.key, value);
            }
            record
        })
        .collect()
}

/// A service over `SizedSource` with `rows` records per category.
pub fn sized_service(rows: usize) -> ExportService {
    ExportService::new(Arc::new(SizedSource { rows }))
}

/// Fixed timestamp used for deterministic exports.
pub fn at() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 7)
        .unwrap()
        .and_hms_opt(14, 30, 5)
        .unwrap()
}

/// Parses a CSV export (BOM stripped) into rows of fields.
///
/// The reader skips the blank separator line, so headers land at index 2.
pub fn csv_rows(bytes: &[u8]) -> Vec<Vec<String>> {
    let body = bytes.strip_prefix(b"\xEF\xBB\xBF".as_slice()).expect("BOM");
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(body);
    reader
        .records()
        .map(|r| r.unwrap().iter().map(str::to_string).collect())
        .collect()
}

/// Reads one part out of an OOXML package.
pub fn zip_part(bytes: &[u8], name: &str) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut file = archive.by_name(name).unwrap();
    let mut text = String::new();
    file.read_to_string(&mut text).unwrap();
    text
}

/// The worksheet XML of an XLSX export.
pub fn xlsx_sheet(bytes: &[u8]) -> String {
    zip_part(bytes, "xl/worksheets/sheet1.xml")
}

/// The body XML of a DOCX export.
pub fn docx_body(bytes: &[u8]) -> String {
    zip_part(bytes, "word/document.xml")
}

/// Data rows of an XLSX worksheet (below the header row).
pub fn xlsx_data_rows(sheet: &str) -> usize {
    sheet.matches("<row r=").count().saturating_sub(3)
}

/// Data rows of a DOCX table (excluding the header row).
pub fn docx_data_rows(body: &str) -> usize {
    body.matches("<w:tr>").count().saturating_sub(1)
}

/// Every string drawn on every page of a PDF export, in drawing order.
pub fn pdf_texts(bytes: &[u8]) -> Vec<String> {
    let doc = Document::load_mem(bytes).unwrap();
    doc.get_pages()
        .values()
        .flat_map(|page_id| {
            let content = Content::decode(&doc.get_page_content(*page_id).unwrap()).unwrap();
            content
                .operations
                .into_iter()
                .filter(|op| op.operator == "Tj")
                .filter_map(|op| match op.operands.first() {
                    Some(Object::String(bytes, _)) => {
                        Some(bytes.iter().map(|&b| char::from(b)).collect::<String>())
                    },
                    _ => None,
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Number of pages in a PDF export.
pub fn pdf_page_count(bytes: &[u8]) -> usize {
    Document::load_mem(bytes).unwrap().get_pages().len()
}
