//! DOCX renderer.
//!
//! A minimal WordprocessingML package: centered title and generated line,
//! then one bordered table whose first row repeats on every page. Only the
//! first [`DOCX_ROW_CAP`] records are shown; a note below the table says so.

use super::ooxml::{Package, XML_DECLARATION, root_relationships, xml_text};
use crate::Result;
use crate::io::cells::{CellFormatter, generated_line, truncation_note};
use crate::io::traits::Renderer;
use crate::io::validation::{render_failure, validate_job};
use crate::models::{ExportFormat, ExportJob};
use std::fmt::Write;

/// Most records a DOCX export shows.
pub const DOCX_ROW_CAP: usize = 20;

const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// A4 portrait text width between 2 cm margins, in twentieths of a point.
const TEXT_WIDTH_TWIPS: usize = 9_638;

const CONTENT_TYPES: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
    r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
    r#"<Default Extension="xml" ContentType="application/xml"/>"#,
    r#"<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>"#,
    r#"</Types>"#
);

const TABLE_BORDERS: &str = concat!(
    "<w:tblBorders>",
    r#"<w:top w:val="single" w:sz="4" w:space="0" w:color="000000"/>"#,
    r#"<w:left w:val="single" w:sz="4" w:space="0" w:color="000000"/>"#,
    r#"<w:bottom w:val="single" w:sz="4" w:space="0" w:color="000000"/>"#,
    r#"<w:right w:val="single" w:sz="4" w:space="0" w:color="000000"/>"#,
    r#"<w:insideH w:val="single" w:sz="4" w:space="0" w:color="000000"/>"#,
    r#"<w:insideV w:val="single" w:sz="4" w:space="0" w:color="000000"/>"#,
    "</w:tblBorders>"
);

const SECTION: &str = concat!(
    "<w:sectPr>",
    r#"<w:pgSz w:w="11906" w:h="16838"/>"#,
    r#"<w:pgMar w:top="1134" w:right="1134" w:bottom="1134" w:left="1134" w:header="709" w:footer="709" w:gutter="0"/>"#,
    "</w:sectPr>"
);

/// Run formatting.
#[derive(Clone, Copy, Default)]
struct RunStyle {
    bold: bool,
    italic: bool,
    /// Half-points; `None` keeps the default size.
    size: Option<u32>,
}

/// Renders jobs as Word documents.
#[derive(Debug, Clone, Default)]
pub struct DocxRenderer {
    formatter: CellFormatter,
}

impl DocxRenderer {
    /// Creates a DOCX renderer.
    #[must_use]
    pub const fn new(formatter: CellFormatter) -> Self {
        Self { formatter }
    }

    fn document(&self, job: &ExportJob) -> String {
        let rows = self.formatter.format_rows(job, Some(DOCX_ROW_CAP));
        let mut xml = format!(r#"{XML_DECLARATION}<w:document xmlns:w="{W_NS}"><w:body>"#);

        paragraph(
            &mut xml,
            &job.title,
            RunStyle {
                bold: true,
                size: Some(32),
                ..RunStyle::default()
            },
        );
        paragraph(&mut xml, &generated_line(job.generated_at), RunStyle::default());

        let column_width = TEXT_WIDTH_TWIPS / job.headers.len().max(1);
        let _ = write!(
            xml,
            r#"<w:tbl><w:tblPr><w:tblW w:w="0" w:type="auto"/>{TABLE_BORDERS}</w:tblPr><w:tblGrid>"#
        );
        for _ in &job.headers {
            let _ = write!(xml, r#"<w:gridCol w:w="{column_width}"/>"#);
        }
        xml.push_str("</w:tblGrid>");

        table_row(&mut xml, &job.headers, true);
        for row in &rows {
            table_row(&mut xml, row, false);
        }
        xml.push_str("</w:tbl>");

        if job.records.len() > DOCX_ROW_CAP {
            paragraph(
                &mut xml,
                &truncation_note(DOCX_ROW_CAP, job.records.len()),
                RunStyle {
                    italic: true,
                    ..RunStyle::default()
                },
            );
        } else {
            // a body may not end with a table
            xml.push_str("<w:p/>");
        }

        xml.push_str(SECTION);
        xml.push_str("</w:body></w:document>");
        xml
    }
}

fn run(xml: &mut String, text: &str, style: RunStyle) {
    xml.push_str("<w:r>");
    if style.bold || style.italic || style.size.is_some() {
        xml.push_str("<w:rPr>");
        if style.bold {
            xml.push_str("<w:b/>");
        }
        if style.italic {
            xml.push_str("<w:i/>");
        }
        if let Some(size) = style.size {
            let _ = write!(xml, r#"<w:sz w:val="{size}"/><w:szCs w:val="{size}"/>"#);
        }
        xml.push_str("</w:rPr>");
    }
    let _ = write!(xml, r#"<w:t xml:space="preserve">{}</w:t></w:r>"#, xml_text(text));
}

fn paragraph(xml: &mut String, text: &str, style: RunStyle) {
    xml.push_str(r#"<w:p><w:pPr><w:jc w:val="center"/></w:pPr>"#);
    run(xml, text, style);
    xml.push_str("</w:p>");
}

fn table_row(xml: &mut String, cells: &[String], header: bool) {
    xml.push_str("<w:tr>");
    if header {
        xml.push_str("<w:trPr><w:tblHeader/></w:trPr>");
    }
    for cell in cells {
        xml.push_str("<w:tc><w:p>");
        run(
            xml,
            cell,
            RunStyle {
                bold: header,
                ..RunStyle::default()
            },
        );
        xml.push_str("</w:p></w:tc>");
    }
    xml.push_str("</w:tr>");
}

impl Renderer for DocxRenderer {
    fn format(&self) -> ExportFormat {
        ExportFormat::Docx
    }

    fn render(&self, job: &ExportJob) -> Result<Vec<u8>> {
        validate_job(job, ExportFormat::Docx)?;

        let mut package = Package::new();
        let fail = |e: zip::result::ZipError| render_failure(job, ExportFormat::Docx, e);
        package.add("[Content_Types].xml", CONTENT_TYPES).map_err(fail)?;
        package
            .add("_rels/.rels", &root_relationships("word/document.xml"))
            .map_err(fail)?;
        package
            .add("word/document.xml", &self.document(job))
            .map_err(fail)?;
        let bytes = package.finish().map_err(fail)?;

        tracing::debug!(
            category = %job.category,
            rows = job.records.len().min(DOCX_ROW_CAP),
            total = job.records.len(),
            bytes = bytes.len(),
            "Rendered DOCX"
        );
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExportCategory, Record};
    use chrono::NaiveDateTime;

    fn job(count: usize) -> ExportJob {
        let records = (0..count)
            .map(|i| {
                Record::new()
                    .with("ticket", format!("FB-{i}").as_str())
                    .with("rating", 5_i64)
            })
            .collect();
        ExportJob::new(
            ExportCategory::Feedback,
            ExportFormat::Docx,
            NaiveDateTime::default(),
            "Customer feedback",
            vec!["Ticket".to_string(), "Rating".to_string()],
        )
        .with_records(records)
    }

    #[test]
    fn test_rows_capped_with_note() {
        let xml = DocxRenderer::default().document(&job(25));
        assert_eq!(xml.matches("<w:tr>").count(), 1 + DOCX_ROW_CAP);
        assert!(xml.contains("FB-19<"));
        assert!(!xml.contains("FB-20<"));
        assert!(xml.contains("Showing the first 20 of 25 records (partial view)."));
    }

    #[test]
    fn test_no_note_at_cap() {
        let xml = DocxRenderer::default().document(&job(DOCX_ROW_CAP));
        assert_eq!(xml.matches("<w:tr>").count(), 1 + DOCX_ROW_CAP);
        assert!(!xml.contains("partial view"));
    }

    #[test]
    fn test_header_row_repeats_and_is_bold() {
        let xml = DocxRenderer::default().document(&job(0));
        assert!(xml.contains(
            r#"<w:tr><w:trPr><w:tblHeader/></w:trPr><w:tc><w:p><w:r><w:rPr><w:b/></w:rPr><w:t xml:space="preserve">Ticket</w:t>"#
        ));
        assert_eq!(xml.matches("<w:tr>").count(), 1);
    }

    #[test]
    fn test_render_produces_zip() {
        let bytes = DocxRenderer::default().render(&job(3)).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }
}
