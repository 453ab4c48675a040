//! Office Open XML package plumbing shared by the XLSX and DOCX renderers.

use quick_xml::escape::escape;
use std::io::{Cursor, Write};
use zip::result::ZipResult;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

pub const XML_DECLARATION: &str =
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

pub const RELATIONSHIPS_NS: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships";

pub const OFFICE_DOCUMENT_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";

/// In-memory zip package.
pub struct Package {
    zip: ZipWriter<Cursor<Vec<u8>>>,
    options: FileOptions,
}

impl Package {
    pub fn new() -> Self {
        Self {
            zip: ZipWriter::new(Cursor::new(Vec::new())),
            options: FileOptions::default().compression_method(CompressionMethod::Deflated),
        }
    }

    /// Adds one part.
    pub fn add(&mut self, name: &str, content: &str) -> ZipResult<()> {
        self.zip.start_file(name, self.options)?;
        self.zip.write_all(content.as_bytes())?;
        Ok(())
    }

    /// Writes the central directory and returns the archive bytes.
    pub fn finish(mut self) -> ZipResult<Vec<u8>> {
        Ok(self.zip.finish()?.into_inner())
    }
}

/// `_rels/.rels` pointing at the main document part.
pub fn root_relationships(target: &str) -> String {
    format!(
        r#"{XML_DECLARATION}<Relationships xmlns="{RELATIONSHIPS_NS}"><Relationship Id="rId1" Type="{OFFICE_DOCUMENT_REL}" Target="{target}"/></Relationships>"#
    )
}

/// Escapes text for element content, dropping characters XML 1.0 forbids.
pub fn xml_text(text: &str) -> String {
    let allowed: String = text
        .chars()
        .filter(|c| matches!(c, '\t' | '\n' | '\r') || !c.is_control())
        .collect();
    escape(allowed.as_str()).into_owned()
}

/// Spreadsheet column letters for a zero-based index: 0 → `A`, 26 → `AA`.
pub fn column_letter(index: usize) -> String {
    let mut letters = Vec::new();
    let mut n = index + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(char::from(b'A' + u8::try_from(rem).unwrap_or(0)));
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use zip::ZipArchive;

    #[test]
    fn test_column_letters() {
        assert_eq!(column_letter(0), "A");
        assert_eq!(column_letter(25), "Z");
        assert_eq!(column_letter(26), "AA");
        assert_eq!(column_letter(701), "ZZ");
        assert_eq!(column_letter(702), "AAA");
    }

    #[test]
    fn test_xml_text() {
        assert_eq!(xml_text("R&D <team>"), "R&amp;D &lt;team&gt;");
        assert_eq!(xml_text("a\u{0}b\tc"), "ab\tc");
    }

    #[test]
    fn test_package_round_trip() {
        let mut package = Package::new();
        package.add("a.xml", "<a/>").unwrap();
        package.add("dir/b.xml", "<b/>").unwrap();
        let bytes = package.finish().unwrap();

        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 2);
        let mut content = String::new();
        archive
            .by_name("dir/b.xml")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "<b/>");
    }
}
