//! CSV renderer.
//!
//! Layout: title row, generated row, one empty line, header row, data rows.
//! The file starts with a UTF-8 BOM so spreadsheet applications pick the
//! right encoding, and rows end in CRLF.
//!
//! Free-text cells that a spreadsheet would read as a formula (leading `=`,
//! `+`, `-` or `@`) are written with a leading `'`. Numbers, dates, labels and
//! the missing-value placeholder are written unchanged.

use crate::Result;
use crate::io::cells::{CellFormatter, generated_line};
use crate::io::traits::Renderer;
use crate::io::validation::{render_failure, validate_job};
use crate::models::{CellValue, ExportFormat, ExportJob, Record};
use csv::{Terminator, Writer, WriterBuilder};

/// UTF-8 byte order mark.
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

const FORMULA_TRIGGERS: [char; 4] = ['=', '+', '-', '@'];

/// Renders jobs as CSV.
#[derive(Debug, Clone, Default)]
pub struct CsvRenderer {
    formatter: CellFormatter,
}

impl CsvRenderer {
    /// Creates a CSV renderer.
    #[must_use]
    pub const fn new(formatter: CellFormatter) -> Self {
        Self { formatter }
    }

    fn csv_record(&self, record: &Record) -> Vec<String> {
        record
            .values()
            .map(|cell| {
                let text = self.formatter.format(cell);
                match cell {
                    CellValue::Text(_)
                        if !cell.is_missing() && text.starts_with(FORMULA_TRIGGERS) =>
                    {
                        format!("'{text}")
                    },
                    _ => text,
                }
            })
            .collect()
    }

    fn writer(buffer: Vec<u8>) -> Writer<Vec<u8>> {
        WriterBuilder::new()
            .flexible(true)
            .terminator(Terminator::CRLF)
            .from_writer(buffer)
    }
}

impl Renderer for CsvRenderer {
    fn format(&self) -> ExportFormat {
        ExportFormat::Csv
    }

    fn render(&self, job: &ExportJob) -> Result<Vec<u8>> {
        validate_job(job, ExportFormat::Csv)?;
        let fail = |e: &dyn std::fmt::Display| render_failure(job, ExportFormat::Csv, e);

        let mut preamble = Self::writer(UTF8_BOM.to_vec());
        preamble
            .write_record([job.title.as_str()])
            .map_err(|e| fail(&e))?;
        preamble
            .write_record([generated_line(job.generated_at)])
            .map_err(|e| fail(&e))?;
        let mut buffer = preamble.into_inner().map_err(|e| fail(&e))?;
        // csv writes an empty record as `""`, so the blank line goes in raw
        buffer.extend_from_slice(b"\r\n");

        let mut writer = Self::writer(buffer);
        writer.write_record(&job.headers).map_err(|e| fail(&e))?;
        for record in &job.records {
            writer
                .write_record(self.csv_record(record))
                .map_err(|e| fail(&e))?;
        }
        let bytes = writer.into_inner().map_err(|e| fail(&e))?;

        tracing::debug!(
            category = %job.category,
            rows = job.records.len(),
            bytes = bytes.len(),
            "Rendered CSV"
        );
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExportCategory;
    use chrono::NaiveDate;

    fn job(records: Vec<Record>) -> ExportJob {
        let at = NaiveDate::from_ymd_opt(2024, 3, 7)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap();
        ExportJob::new(
            ExportCategory::Statistics,
            ExportFormat::Csv,
            at,
            "Operational statistics",
            vec!["Metric".to_string(), "Value".to_string()],
        )
        .with_records(records)
    }

    #[test]
    fn test_layout() {
        let record = Record::new()
            .with("metric", "Calls, handled")
            .with("value", 1_234_567_i64);
        let bytes = CsvRenderer::default().render(&job(vec![record])).unwrap();

        assert!(bytes.starts_with(UTF8_BOM));
        let text = String::from_utf8(bytes[UTF8_BOM.len()..].to_vec()).unwrap();
        assert_eq!(
            text,
            "Operational statistics\r\n\
             Generated: 2024-03-07 14:30\r\n\
             \r\n\
             Metric,Value\r\n\
             \"Calls, handled\",1 234 567\r\n"
        );
    }

    #[test]
    fn test_empty_job_still_has_header() {
        let bytes = CsvRenderer::default().render(&job(Vec::new())).unwrap();
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.ends_with("\r\n\r\nMetric,Value\r\n"));
    }

    #[test]
    fn test_missing_cell_placeholder() {
        let record = Record::new()
            .with("metric", CellValue::Missing)
            .with("value", 0_i64);
        let bytes = CsvRenderer::default().render(&job(vec![record])).unwrap();
        assert!(String::from_utf8_lossy(&bytes).ends_with("-,0\r\n"));
    }

    #[test]
    fn test_formula_like_text_is_quoted() {
        let records = vec![
            Record::new().with("metric", "=SUM(A1:A9)").with("value", -5_i64),
            Record::new().with("metric", "+7 900 120-10-40").with("value", 1_i64),
            Record::new().with("metric", "@handle").with("value", 2_i64),
            Record::new().with("metric", "-dash").with("value", 3_i64),
            Record::new().with("metric", CellValue::display("-1.8%")).with("value", 4_i64),
            Record::new().with("metric", "   ").with("value", 5_i64),
        ];
        let bytes = CsvRenderer::default().render(&job(records)).unwrap();
        let text = String::from_utf8_lossy(&bytes);
        let rows: Vec<&str> = text.split("\r\n").skip(4).collect();
        assert_eq!(
            rows,
            vec![
                "'=SUM(A1:A9),-5",
                "'+7 900 120-10-40,1",
                "'@handle,2",
                "'-dash,3",
                "-1.8%,4",
                "-,5",
                ""
            ]
        );
    }

    #[test]
    fn test_width_mismatch_fails() {
        let record = Record::new().with("metric", "Calls");
        assert!(CsvRenderer::default().render(&job(vec![record])).is_err());
    }
}
