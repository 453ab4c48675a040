//! XLSX renderer.
//!
//! Writes a minimal SpreadsheetML package with a single worksheet. Cells are
//! inline strings carrying the formatted display text.
//!
//! | Row | Content |
//! |-----|---------|
//! | 1 | Title, merged across every column |
//! | 2 | Generated line |
//! | 3 | Empty |
//! | 4 | Header row: bold white on dark fill, centered, thin border |
//! | 5.. | Data rows with thin borders |

use super::ooxml::{Package, XML_DECLARATION, column_letter, root_relationships, xml_text};
use crate::Result;
use crate::io::cells::{CellFormatter, generated_line};
use crate::io::traits::Renderer;
use crate::io::validation::{render_failure, validate_job};
use crate::models::{ExportFormat, ExportJob};
use std::fmt::Write;

const MAIN_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// First worksheet row of the header.
pub const HEADER_ROW: usize = 4;

const STYLE_TITLE: u8 = 1;
const STYLE_HEADER: u8 = 2;
const STYLE_BODY: u8 = 3;

const CONTENT_TYPES: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
    r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
    r#"<Default Extension="xml" ContentType="application/xml"/>"#,
    r#"<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>"#,
    r#"<Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
    r#"<Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>"#,
    r#"</Types>"#
);

const WORKBOOK_RELS: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>"#,
    r#"<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>"#,
    r#"</Relationships>"#
);

// cellXfs: 0 default, 1 title, 2 header, 3 body
const STYLES: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
    r#"<fonts count="3">"#,
    r#"<font><sz val="11"/><name val="Calibri"/></font>"#,
    r#"<font><b/><sz val="14"/><name val="Calibri"/></font>"#,
    r#"<font><b/><sz val="11"/><color rgb="FFFFFFFF"/><name val="Calibri"/></font>"#,
    r#"</fonts>"#,
    r#"<fills count="3">"#,
    r#"<fill><patternFill patternType="none"/></fill>"#,
    r#"<fill><patternFill patternType="gray125"/></fill>"#,
    r#"<fill><patternFill patternType="solid"><fgColor rgb="FF1F4E79"/><bgColor indexed="64"/></patternFill></fill>"#,
    r#"</fills>"#,
    r#"<borders count="2">"#,
    r#"<border><left/><right/><top/><bottom/><diagonal/></border>"#,
    r#"<border><left style="thin"><color auto="1"/></left><right style="thin"><color auto="1"/></right>"#,
    r#"<top style="thin"><color auto="1"/></top><bottom style="thin"><color auto="1"/></bottom><diagonal/></border>"#,
    r#"</borders>"#,
    r#"<cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs>"#,
    r#"<cellXfs count="4">"#,
    r#"<xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/>"#,
    r#"<xf numFmtId="0" fontId="1" fillId="0" borderId="0" xfId="0" applyFont="1" applyAlignment="1"><alignment horizontal="center"/></xf>"#,
    r#"<xf numFmtId="0" fontId="2" fillId="2" borderId="1" xfId="0" applyFont="1" applyFill="1" applyBorder="1" applyAlignment="1"><alignment horizontal="center" vertical="center"/></xf>"#,
    r#"<xf numFmtId="0" fontId="0" fillId="0" borderId="1" xfId="0" applyBorder="1"/>"#,
    r#"</cellXfs>"#,
    r#"<cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles>"#,
    r#"</styleSheet>"#
);

/// Renders jobs as XLSX workbooks.
#[derive(Debug, Clone)]
pub struct XlsxRenderer {
    formatter: CellFormatter,
    max_column_width: usize,
}

impl Default for XlsxRenderer {
    fn default() -> Self {
        Self::new(CellFormatter::default(), super::DEFAULT_MAX_COLUMN_WIDTH)
    }
}

impl XlsxRenderer {
    /// Creates an XLSX renderer.
    #[must_use]
    pub const fn new(formatter: CellFormatter, max_column_width: usize) -> Self {
        Self {
            formatter,
            max_column_width,
        }
    }

    /// Column widths in characters: longest value plus 2, capped.
    fn column_widths(&self, headers: &[String], rows: &[Vec<String>]) -> Vec<usize> {
        headers
            .iter()
            .enumerate()
            .map(|(col, header)| {
                let longest = rows
                    .iter()
                    .filter_map(|row| row.get(col))
                    .chain(std::iter::once(header))
                    .map(|value| value.chars().count())
                    .max()
                    .unwrap_or(0);
                (longest + 2).min(self.max_column_width)
            })
            .collect()
    }

    fn worksheet(&self, job: &ExportJob, rows: &[Vec<String>]) -> String {
        let last_column = column_letter(job.headers.len().saturating_sub(1));
        let mut xml = format!(
            r#"{XML_DECLARATION}<worksheet xmlns="{MAIN_NS}" xmlns:r="{REL_NS}">"#
        );
        let _ = write!(
            xml,
            r#"<dimension ref="A1:{last_column}{}"/>"#,
            HEADER_ROW + rows.len()
        );
        let _ = write!(
            xml,
            r#"<sheetViews><sheetView workbookViewId="0"><pane ySplit="{HEADER_ROW}" topLeftCell="A{}" activePane="bottomLeft" state="frozen"/></sheetView></sheetViews>"#,
            HEADER_ROW + 1
        );

        xml.push_str("<cols>");
        for (i, width) in self.column_widths(&job.headers, rows).iter().enumerate() {
            let _ = write!(
                xml,
                r#"<col min="{n}" max="{n}" width="{width}" customWidth="1"/>"#,
                n = i + 1
            );
        }
        xml.push_str("</cols><sheetData>");

        push_row(&mut xml, 1, [job.title.as_str()], STYLE_TITLE);
        push_row(&mut xml, 2, [generated_line(job.generated_at).as_str()], 0);
        push_row(
            &mut xml,
            HEADER_ROW,
            job.headers.iter().map(String::as_str),
            STYLE_HEADER,
        );
        for (offset, row) in rows.iter().enumerate() {
            push_row(
                &mut xml,
                HEADER_ROW + 1 + offset,
                row.iter().map(String::as_str),
                STYLE_BODY,
            );
        }
        xml.push_str("</sheetData>");

        if job.headers.len() > 1 {
            let _ = write!(
                xml,
                r#"<mergeCells count="1"><mergeCell ref="A1:{last_column}1"/></mergeCells>"#
            );
        }
        xml.push_str("</worksheet>");
        xml
    }
}

fn push_row<'a>(xml: &mut String, row: usize, values: impl IntoIterator<Item = &'a str>, style: u8) {
    let _ = write!(xml, r#"<row r="{row}">"#);
    for (col, value) in values.into_iter().enumerate() {
        let style_attr = if style == 0 {
            String::new()
        } else {
            format!(r#" s="{style}""#)
        };
        let _ = write!(
            xml,
            r#"<c r="{}{row}"{style_attr} t="inlineStr"><is><t xml:space="preserve">{}</t></is></c>"#,
            column_letter(col),
            xml_text(value)
        );
    }
    xml.push_str("</row>");
}

fn workbook(sheet_name: &str) -> String {
    format!(
        r#"{XML_DECLARATION}<workbook xmlns="{MAIN_NS}" xmlns:r="{REL_NS}"><sheets><sheet name="{}" sheetId="1" r:id="rId1"/></sheets></workbook>"#,
        xml_text(sheet_name)
    )
}

impl Renderer for XlsxRenderer {
    fn format(&self) -> ExportFormat {
        ExportFormat::Xlsx
    }

    fn render(&self, job: &ExportJob) -> Result<Vec<u8>> {
        validate_job(job, ExportFormat::Xlsx)?;
        let rows = self.formatter.format_rows(job, None);

        let parts = [
            ("[Content_Types].xml", CONTENT_TYPES.to_string()),
            ("_rels/.rels", root_relationships("xl/workbook.xml")),
            ("xl/workbook.xml", workbook(job.category.as_str())),
            ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS.to_string()),
            ("xl/styles.xml", STYLES.to_string()),
            ("xl/worksheets/sheet1.xml", self.worksheet(job, &rows)),
        ];
        let mut package = Package::new();
        for (name, content) in &parts {
            package
                .add(name, content)
                .map_err(|e| render_failure(job, ExportFormat::Xlsx, e))?;
        }
        let bytes = package
            .finish()
            .map_err(|e| render_failure(job, ExportFormat::Xlsx, e))?;

        tracing::debug!(
            category = %job.category,
            rows = rows.len(),
            bytes = bytes.len(),
            "Rendered XLSX"
        );
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CellValue, ExportCategory, Record};
    use chrono::NaiveDateTime;
    use std::io::{Cursor, Read};
    use zip::ZipArchive;

    fn job(records: Vec<Record>) -> ExportJob {
        ExportJob::new(
            ExportCategory::Inventory,
            ExportFormat::Xlsx,
            NaiveDateTime::default(),
            "Warehouse inventory",
            vec!["Item".to_string(), "In stock".to_string()],
        )
        .with_records(records)
    }

    fn part(bytes: Vec<u8>, name: &str) -> String {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut xml = String::new();
        archive
            .by_name(name)
            .unwrap()
            .read_to_string(&mut xml)
            .unwrap();
        xml
    }

    #[test]
    fn test_package_parts_present() {
        let bytes = XlsxRenderer::default().render(&job(Vec::new())).unwrap();
        let archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut names: Vec<_> = archive.file_names().collect();
        names.sort_unstable();
        assert_eq!(
            names,
            vec![
                "[Content_Types].xml",
                "_rels/.rels",
                "xl/_rels/workbook.xml.rels",
                "xl/styles.xml",
                "xl/workbook.xml",
                "xl/worksheets/sheet1.xml"
            ]
        );
    }

    #[test]
    fn test_layout_rows_and_merge() {
        let record = Record::new()
            .with("name", "Cable & ties")
            .with("quantity", 1_234_567_i64);
        let sheet = part(
            XlsxRenderer::default().render(&job(vec![record])).unwrap(),
            "xl/worksheets/sheet1.xml",
        );

        assert!(sheet.contains(r#"<mergeCell ref="A1:B1"/>"#));
        assert!(sheet.contains(r#"<c r="A1" s="1" t="inlineStr"><is><t xml:space="preserve">Warehouse inventory</t>"#));
        assert!(sheet.contains("Generated: 1970-01-01 00:00"));
        assert!(!sheet.contains(r#"<row r="3">"#));
        assert!(sheet.contains(r#"<c r="B4" s="2" t="inlineStr"><is><t xml:space="preserve">In stock</t>"#));
        assert!(sheet.contains("Cable &amp; ties"));
        assert!(sheet.contains(r#"<c r="B5" s="3" t="inlineStr"><is><t xml:space="preserve">1 234 567</t>"#));
    }

    #[test]
    fn test_column_width_capped() {
        let record = Record::new()
            .with("name", CellValue::text("x".repeat(200)))
            .with("quantity", 1_i64);
        let renderer = XlsxRenderer::new(CellFormatter::default(), 50);
        let sheet = part(renderer.render(&job(vec![record])).unwrap(), "xl/worksheets/sheet1.xml");
        assert!(sheet.contains(r#"<col min="1" max="1" width="50" customWidth="1"/>"#));
        // "In stock" is the longest value of column B
        assert!(sheet.contains(r#"<col min="2" max="2" width="10" customWidth="1"/>"#));
    }

    #[test]
    fn test_sheet_named_after_category() {
        let workbook = part(
            XlsxRenderer::default().render(&job(Vec::new())).unwrap(),
            "xl/workbook.xml",
        );
        assert!(workbook.contains(r#"<sheet name="inventory""#));
    }
}
