//! PDF renderer.
//!
//! Draws the report with the standard Helvetica fonts on A4 landscape pages:
//! title, generated line, then a table with a dark header row and striped
//! body rows. When the table reaches the bottom margin a new page starts and
//! the header row is drawn again. Only the first [`PDF_ROW_CAP`] records are
//! shown.
//!
//! Text is encoded as WinAnsi (Windows-1252), the encoding of the standard
//! fonts. Typographic quotes, dashes, the euro sign and the rest of the
//! Windows-1252 range print as expected. Characters outside it, including
//! all of Cyrillic, print as `?`: no font is embedded. Use CSV, XLSX or DOCX
//! for reports with non-Latin names or addresses.

use crate::Result;
use crate::io::cells::{CellFormatter, generated_line, truncation_note};
use crate::io::traits::Renderer;
use crate::io::validation::{render_failure, validate_job};
use crate::models::{ExportFormat, ExportJob};
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};

/// Most records a PDF export shows.
pub const PDF_ROW_CAP: usize = 30;

/// A4 landscape, in points.
pub const A4_LANDSCAPE: (f32, f32) = (842.0, 595.0);

const MARGIN: f32 = 36.0;
const TITLE_SIZE: f32 = 16.0;
const DATE_SIZE: f32 = 10.0;
const TABLE_SIZE: f32 = 8.0;
const NOTE_SIZE: f32 = 9.0;
const ROW_HEIGHT: f32 = 14.0;
const CELL_PADDING: f32 = 3.0;
/// Narrowest column, in characters.
const MIN_COLUMN_CHARS: usize = 4;

const REGULAR: &str = "F1";
const BOLD: &str = "F2";
const ITALIC: &str = "F3";

type Rgb = [f32; 3];
const BLACK: Rgb = [0.0, 0.0, 0.0];
const WHITE: Rgb = [1.0, 1.0, 1.0];
const HEADER_FILL: Rgb = [0.122, 0.306, 0.475];
const STRIPE_FILL: Rgb = [0.93, 0.93, 0.93];
const RULE: Rgb = [0.75, 0.75, 0.75];

/// Renders jobs as PDF documents.
#[derive(Debug, Clone)]
pub struct PdfRenderer {
    formatter: CellFormatter,
    page_width: f32,
    page_height: f32,
}

impl Default for PdfRenderer {
    fn default() -> Self {
        Self::new(CellFormatter::default())
    }
}

impl PdfRenderer {
    /// Creates a PDF renderer for A4 landscape pages.
    #[must_use]
    pub const fn new(formatter: CellFormatter) -> Self {
        Self {
            formatter,
            page_width: A4_LANDSCAPE.0,
            page_height: A4_LANDSCAPE.1,
        }
    }

    /// Uses a custom page size in points.
    #[must_use]
    pub const fn with_page_size(mut self, width: f32, height: f32) -> Self {
        self.page_width = width;
        self.page_height = height;
        self
    }

    fn draw(&self, job: &ExportJob) -> Vec<Vec<Operation>> {
        let rows: Vec<Vec<String>> = job
            .records
            .iter()
            .take(PDF_ROW_CAP)
            .map(|record| {
                record
                    .values()
                    .map(|cell| self.formatter.format_for_pdf(cell))
                    .collect()
            })
            .collect();
        let widths = column_widths(&job.headers, &rows, self.page_width - 2.0 * MARGIN);

        let mut canvas = Canvas::new(self.page_height);
        canvas.y -= TITLE_SIZE;
        canvas.text(BOLD, TITLE_SIZE, MARGIN, canvas.y, &job.title, BLACK);
        canvas.y -= DATE_SIZE + 8.0;
        canvas.text(
            REGULAR,
            DATE_SIZE,
            MARGIN,
            canvas.y,
            &generated_line(job.generated_at),
            BLACK,
        );
        canvas.y -= 12.0;

        canvas.table_header(&widths, &job.headers);
        for (index, row) in rows.iter().enumerate() {
            if !canvas.fits(ROW_HEIGHT) {
                canvas.new_page();
                canvas.table_header(&widths, &job.headers);
            }
            canvas.table_row(&widths, row, index % 2 == 1);
        }

        if job.records.len() > PDF_ROW_CAP {
            if !canvas.fits(NOTE_SIZE + 12.0) {
                canvas.new_page();
            }
            canvas.y -= NOTE_SIZE + 8.0;
            canvas.text(
                ITALIC,
                NOTE_SIZE,
                MARGIN,
                canvas.y,
                &truncation_note(PDF_ROW_CAP, job.records.len()),
                BLACK,
            );
        }
        canvas.finish()
    }

    fn assemble(&self, pages: Vec<Vec<Operation>>) -> lopdf::Result<Vec<u8>> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut font = |base: &str| {
            doc.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => base,
                "Encoding" => "WinAnsiEncoding",
            })
        };
        let regular = font("Helvetica");
        let bold = font("Helvetica-Bold");
        let italic = font("Helvetica-Oblique");
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                REGULAR => regular,
                BOLD => bold,
                ITALIC => italic,
            },
        });

        let mut kids = Vec::with_capacity(pages.len());
        for operations in pages {
            let content = Content { operations };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), self.page_width.into(), self.page_height.into()],
                "Contents" => content_id,
                "Resources" => resources_id,
            });
            kids.push(Object::Reference(page_id));
        }

        let count = i64::try_from(kids.len()).unwrap_or(i64::MAX);
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)?;
        Ok(bytes)
    }
}

impl Renderer for PdfRenderer {
    fn format(&self) -> ExportFormat {
        ExportFormat::Pdf
    }

    fn render(&self, job: &ExportJob) -> Result<Vec<u8>> {
        validate_job(job, ExportFormat::Pdf)?;
        let pages = self.draw(job);
        let page_count = pages.len();
        let bytes = self
            .assemble(pages)
            .map_err(|e| render_failure(job, ExportFormat::Pdf, e))?;

        tracing::debug!(
            category = %job.category,
            rows = job.records.len().min(PDF_ROW_CAP),
            total = job.records.len(),
            pages = page_count,
            bytes = bytes.len(),
            "Rendered PDF"
        );
        Ok(bytes)
    }
}

/// Splits the available width proportionally to each column's widest value.
#[allow(clippy::cast_precision_loss)]
fn column_widths(headers: &[String], rows: &[Vec<String>], available: f32) -> Vec<f32> {
    let chars: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(col, header)| {
            rows.iter()
                .filter_map(|row| row.get(col))
                .chain(std::iter::once(header))
                .map(|value| value.chars().count())
                .max()
                .unwrap_or(0)
                .max(MIN_COLUMN_CHARS)
        })
        .collect();
    let total: usize = chars.iter().sum();
    chars
        .iter()
        .map(|&c| available * c as f32 / total.max(1) as f32)
        .collect()
}

/// Maps text to single-byte WinAnsi codes; anything else becomes `?`.
/// Windows-1252 code points 0x80..=0x9F that differ from Latin-1.
const WIN_ANSI_SPECIALS: [(char, u8); 27] = [
    ('\u{20AC}', 0x80),
    ('\u{201A}', 0x82),
    ('\u{0192}', 0x83),
    ('\u{201E}', 0x84),
    ('\u{2026}', 0x85),
    ('\u{2020}', 0x86),
    ('\u{2021}', 0x87),
    ('\u{02C6}', 0x88),
    ('\u{2030}', 0x89),
    ('\u{0160}', 0x8A),
    ('\u{2039}', 0x8B),
    ('\u{0152}', 0x8C),
    ('\u{017D}', 0x8E),
    ('\u{2018}', 0x91),
    ('\u{2019}', 0x92),
    ('\u{201C}', 0x93),
    ('\u{201D}', 0x94),
    ('\u{2022}', 0x95),
    ('\u{2013}', 0x96),
    ('\u{2014}', 0x97),
    ('\u{02DC}', 0x98),
    ('\u{2122}', 0x99),
    ('\u{0161}', 0x9A),
    ('\u{203A}', 0x9B),
    ('\u{0153}', 0x9C),
    ('\u{017E}', 0x9E),
    ('\u{0178}', 0x9F),
];

fn win_ansi(text: &str) -> Vec<u8> {
    text.chars().map(win_ansi_byte).collect()
}

fn win_ansi_byte(c: char) -> u8 {
    if let Some(&(_, byte)) = WIN_ANSI_SPECIALS.iter().find(|(special, _)| *special == c) {
        return byte;
    }
    // C1 controls have no glyph in WinAnsi
    u8::try_from(u32::from(c))
        .ok()
        .filter(|b| !(0x80..0xA0).contains(b))
        .unwrap_or(b'?')
}

fn rgb(operator: &str, color: Rgb) -> Operation {
    Operation::new(operator, color.iter().map(|&c| c.into()).collect())
}

/// Page-by-page content stream builder with a moving baseline.
struct Canvas {
    pages: Vec<Vec<Operation>>,
    ops: Vec<Operation>,
    top: f32,
    y: f32,
}

impl Canvas {
    fn new(page_height: f32) -> Self {
        let top = page_height - MARGIN;
        Self {
            pages: Vec::new(),
            ops: Vec::new(),
            top,
            y: top,
        }
    }

    fn fits(&self, height: f32) -> bool {
        self.y - height >= MARGIN
    }

    fn new_page(&mut self) {
        self.pages.push(std::mem::take(&mut self.ops));
        self.y = self.top;
    }

    fn finish(mut self) -> Vec<Vec<Operation>> {
        self.pages.push(self.ops);
        self.pages
    }

    fn text(&mut self, font: &str, size: f32, x: f32, y: f32, text: &str, color: Rgb) {
        self.ops.extend([
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![font.into(), size.into()]),
            rgb("rg", color),
            Operation::new("Td", vec![x.into(), y.into()]),
            Operation::new("Tj", vec![Object::string_literal(win_ansi(text))]),
            Operation::new("ET", vec![]),
        ]);
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgb) {
        self.ops.extend([
            rgb("rg", color),
            Operation::new("re", vec![x.into(), y.into(), width.into(), height.into()]),
            Operation::new("f", vec![]),
        ]);
    }

    fn rule(&mut self, x: f32, y: f32, width: f32) {
        self.ops.extend([
            Operation::new("w", vec![0.5_f32.into()]),
            rgb("RG", RULE),
            Operation::new("m", vec![x.into(), y.into()]),
            Operation::new("l", vec![(x + width).into(), y.into()]),
            Operation::new("S", vec![]),
        ]);
    }

    fn cells(&mut self, widths: &[f32], cells: &[String], font: &str, color: Rgb) {
        let baseline = self.y + (ROW_HEIGHT - TABLE_SIZE) / 2.0 + 1.0;
        let mut x = MARGIN;
        for (width, cell) in widths.iter().zip(cells) {
            self.text(font, TABLE_SIZE, x + CELL_PADDING, baseline, cell, color);
            x += width;
        }
    }

    fn table_header(&mut self, widths: &[f32], headers: &[String]) {
        self.y -= ROW_HEIGHT;
        self.fill_rect(MARGIN, self.y, widths.iter().sum(), ROW_HEIGHT, HEADER_FILL);
        self.cells(widths, headers, BOLD, WHITE);
    }

    fn table_row(&mut self, widths: &[f32], cells: &[String], striped: bool) {
        self.y -= ROW_HEIGHT;
        let width: f32 = widths.iter().sum();
        if striped {
            self.fill_rect(MARGIN, self.y, width, ROW_HEIGHT, STRIPE_FILL);
        }
        self.cells(widths, cells, REGULAR, BLACK);
        self.rule(MARGIN, self.y, width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CellValue, ExportCategory, Record};
    use chrono::NaiveDateTime;
    use test_case::test_case;

    fn job(count: usize) -> ExportJob {
        let records = (0..count)
            .map(|i| {
                Record::new()
                    .with("call_id", format!("C-{i:03}").as_str())
                    .with("duration_sec", 1_234_567_i64)
            })
            .collect();
        ExportJob::new(
            ExportCategory::Calls,
            ExportFormat::Pdf,
            NaiveDateTime::default(),
            "Call-center log",
            vec!["Call".to_string(), "Duration, s".to_string()],
        )
        .with_records(records)
    }

    /// Text shown on each page, in drawing order.
    fn page_texts(bytes: &[u8]) -> Vec<Vec<String>> {
        let doc = Document::load_mem(bytes).unwrap();
        doc.get_pages()
            .values()
            .map(|page_id| {
                let content = Content::decode(&doc.get_page_content(*page_id).unwrap()).unwrap();
                content
                    .operations
                    .iter()
                    .filter(|op| op.operator == "Tj")
                    .filter_map(|op| match op.operands.first() {
                        Some(Object::String(bytes, _)) => {
                            Some(bytes.iter().map(|&b| char::from(b)).collect())
                        },
                        _ => None,
                    })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_single_page_layout() {
        let pages = page_texts(&PdfRenderer::default().render(&job(3)).unwrap());
        assert_eq!(pages.len(), 1);
        assert_eq!(
            &pages[0][..5],
            &[
                "Call-center log",
                "Generated: 1970-01-01 00:00",
                "Call",
                "Duration, s",
                "C-000"
            ]
        );
        assert!(pages[0].iter().any(|t| t == "1 234 567"));
    }

    #[test]
    fn test_row_cap_and_note() {
        let pages = page_texts(&PdfRenderer::default().render(&job(35)).unwrap());
        let text: Vec<&String> = pages.iter().flatten().collect();
        assert!(text.iter().any(|t| *t == "C-029"));
        assert!(!text.iter().any(|t| *t == "C-030"));
        assert_eq!(
            text.last().map(|t| t.as_str()),
            Some("Showing the first 30 of 35 records (partial view).")
        );
    }

    #[test]
    fn test_no_note_under_cap() {
        let pages = page_texts(&PdfRenderer::default().render(&job(25)).unwrap());
        let rows = pages[0].iter().filter(|t| t.starts_with("C-")).count();
        assert_eq!(rows, 25);
        assert!(!pages[0].iter().any(|t| t.contains("partial view")));
    }

    #[test]
    fn test_header_repeats_on_new_page() {
        let renderer = PdfRenderer::default().with_page_size(A4_LANDSCAPE.0, 250.0);
        let pages = page_texts(&renderer.render(&job(PDF_ROW_CAP)).unwrap());
        assert!(pages.len() > 1);
        for page in &pages[1..] {
            assert_eq!(&page[..2], &["Call", "Duration, s"]);
        }
        let rows: usize = pages
            .iter()
            .map(|page| page.iter().filter(|t| t.starts_with("C-")).count())
            .sum();
        assert_eq!(rows, PDF_ROW_CAP);
    }

    #[test]
    fn test_long_text_shortened_and_non_latin_replaced() {
        let mut job = job(0);
        job.records = vec![
            Record::new()
                .with("call_id", CellValue::text("x".repeat(40)))
                .with("duration_sec", 1_i64),
            Record::new()
                .with("call_id", "Звонок")
                .with("duration_sec", 2_i64),
        ];
        let pages = page_texts(&PdfRenderer::default().render(&job).unwrap());
        assert!(pages[0].contains(&format!("{}...", "x".repeat(29))));
        assert!(pages[0].contains(&"??????".to_string()));
    }

    #[test]
    fn test_column_widths_fill_available_space() {
        let headers = vec!["A".to_string(), "Longer header".to_string()];
        let widths = column_widths(&headers, &[], 100.0);
        assert!((widths.iter().sum::<f32>() - 100.0).abs() < 0.01);
        assert!(widths[1] > widths[0]);
    }

    #[test]
    fn test_win_ansi() {
        assert_eq!(win_ansi("Ab é"), vec![b'A', b'b', b' ', 0xE9]);
        assert_eq!(win_ansi("Иван"), vec![b'?'; 4]);
        assert_eq!(win_ansi("\u{85}"), vec![b'?']);
    }

    #[test_case("’", 0x92; "right single quote")]
    #[test_case("‘", 0x91; "left single quote")]
    #[test_case("€", 0x80; "euro")]
    #[test_case("—", 0x97; "em dash")]
    #[test_case("–", 0x96; "en dash")]
    #[test_case("…", 0x85; "ellipsis")]
    #[test_case("“", 0x93; "left double quote")]
    #[test_case("Ÿ", 0x9F; "y diaeresis")]
    fn test_win_ansi_windows_1252_specials(text: &str, byte: u8) {
        assert_eq!(win_ansi(text), vec![byte]);
    }

    #[test]
    fn test_apostrophe_survives_in_rendered_page() {
        let mut job = job(0);
        job.records = vec![
            Record::new()
                .with("call_id", "O’Neil")
                .with("duration_sec", 1_i64),
        ];
        let bytes = PdfRenderer::default().render(&job).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        let page = *doc.get_pages().values().next().unwrap();
        let content = Content::decode(&doc.get_page_content(page).unwrap()).unwrap();
        let drawn: Vec<Vec<u8>> = content
            .operations
            .iter()
            .filter(|op| op.operator == "Tj")
            .filter_map(|op| match op.operands.first() {
                Some(Object::String(bytes, _)) => Some(bytes.clone()),
                _ => None,
            })
            .collect();
        assert!(drawn.contains(&vec![b'O', 0x92, b'N', b'e', b'i', b'l']));
    }
}
