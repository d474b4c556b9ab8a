//! Build small `.xlsx` workbooks in tests.
//!
//! Text cells go through the shared string table unless written with
//! [`SheetFixture::inline`]. Only cell values are written; there are no
//! styles, so the output is the minimum a spreadsheet reader needs.
//!
//! ```no_run
//! use infralca_test_utils::xlsx::{SheetFixture, WorkbookFixture};
//!
//! let mut sheet = SheetFixture::default();
//! sheet.text(1, 1, "name").number(1, 2, 4.5);
//! WorkbookFixture::new().sheet("Data", sheet).write("fixture.xlsx");
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;

use quick_xml::escape::escape;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

#[derive(Debug, Clone, PartialEq)]
pub enum FixtureCell {
    Shared(String),
    Inline(String),
    Number(f64),
    Bool(bool),
}

/// Cells of one sheet keyed by 1-based (row, column).
#[derive(Debug, Clone, Default)]
pub struct SheetFixture {
    cells: BTreeMap<(u32, u32), FixtureCell>,
}

impl SheetFixture {
    pub fn set(&mut self, row: u32, column: u32, cell: FixtureCell) -> &mut Self {
        assert!(row > 0 && column > 0, "rows and columns are 1-based");
        self.cells.insert((row, column), cell);
        self
    }

    /// Shared string cell.
    pub fn text(&mut self, row: u32, column: u32, value: &str) -> &mut Self {
        self.set(row, column, FixtureCell::Shared(value.to_string()))
    }

    pub fn inline(&mut self, row: u32, column: u32, value: &str) -> &mut Self {
        self.set(row, column, FixtureCell::Inline(value.to_string()))
    }

    pub fn number(&mut self, row: u32, column: u32, value: f64) -> &mut Self {
        self.set(row, column, FixtureCell::Number(value))
    }

    pub fn boolean(&mut self, row: u32, column: u32, value: bool) -> &mut Self {
        self.set(row, column, FixtureCell::Bool(value))
    }

    fn to_xml(&self, shared: &mut SharedStrings) -> String {
        let mut xml = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
        );

        let mut current_row = None;
        for (&(row, column), cell) in &self.cells {
            if current_row != Some(row) {
                if current_row.is_some() {
                    xml.push_str("</row>");
                }
                xml.push_str(&format!(r#"<row r="{row}">"#));
                current_row = Some(row);
            }

            let reference = format!("{}{row}", column_name(column));
            let cell_xml = match cell {
                FixtureCell::Shared(text) => {
                    format!(r#"<c r="{reference}" t="s"><v>{}</v></c>"#, shared.index(text))
                }
                FixtureCell::Inline(text) => format!(
                    r#"<c r="{reference}" t="inlineStr"><is><t xml:space="preserve">{}</t></is></c>"#,
                    escape(text.as_str())
                ),
                FixtureCell::Number(n) => format!(r#"<c r="{reference}"><v>{n}</v></c>"#),
                FixtureCell::Bool(b) => {
                    format!(r#"<c r="{reference}" t="b"><v>{}</v></c>"#, u8::from(*b))
                }
            };
            xml.push_str(&cell_xml);
        }
        if current_row.is_some() {
            xml.push_str("</row>");
        }

        xml.push_str("</sheetData></worksheet>");
        xml
    }
}

#[derive(Default)]
struct SharedStrings {
    strings: Vec<String>,
    indices: BTreeMap<String, usize>,
}

impl SharedStrings {
    fn index(&mut self, text: &str) -> usize {
        if let Some(&index) = self.indices.get(text) {
            return index;
        }
        let index = self.strings.len();
        self.strings.push(text.to_string());
        self.indices.insert(text.to_string(), index);
        index
    }

    fn to_xml(&self) -> String {
        let mut xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="{0}" uniqueCount="{0}">"#,
            self.strings.len()
        );
        for text in &self.strings {
            xml.push_str(&format!(
                r#"<si><t xml:space="preserve">{}</t></si>"#,
                escape(text.as_str())
            ));
        }
        xml.push_str("</sst>");
        xml
    }
}

/// A workbook with one or more named sheets, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct WorkbookFixture {
    sheets: Vec<(String, SheetFixture)>,
}

impl WorkbookFixture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sheet(mut self, name: &str, sheet: SheetFixture) -> Self {
        self.sheets.push((name.to_string(), sheet));
        self
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut shared = SharedStrings::default();
        let sheets: Vec<String> = self
            .sheets
            .iter()
            .map(|(_, sheet)| sheet.to_xml(&mut shared))
            .collect();

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let mut add = |name: &str, content: &str| {
            zip.start_file(name, SimpleFileOptions::default())
                .expect("start zip entry");
            zip.write_all(content.as_bytes()).expect("write zip entry");
        };

        add("[Content_Types].xml", &self.content_types());
        add("_rels/.rels", ROOT_RELS);
        add("xl/workbook.xml", &self.workbook_xml());
        add("xl/_rels/workbook.xml.rels", &self.workbook_rels());
        for (i, xml) in sheets.iter().enumerate() {
            add(&format!("xl/worksheets/sheet{}.xml", i + 1), xml);
        }
        add("xl/sharedStrings.xml", &shared.to_xml());

        zip.finish().expect("finish zip archive").into_inner()
    }

    pub fn write(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create fixture dir");
        }
        fs::write(path, self.to_bytes()).expect("write xlsx fixture");
    }

    fn content_types(&self) -> String {
        let mut xml = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/sharedStrings.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml"/>"#,
        );
        for i in 1..=self.sheets.len() {
            xml.push_str(&format!(
                r#"<Override PartName="/xl/worksheets/sheet{i}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#
            ));
        }
        xml.push_str("</Types>");
        xml
    }

    fn workbook_xml(&self) -> String {
        let mut xml = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>"#,
        );
        for (i, (name, _)) in self.sheets.iter().enumerate() {
            let id = i + 1;
            xml.push_str(&format!(
                r#"<sheet name="{}" sheetId="{id}" r:id="rId{id}"/>"#,
                escape(name.as_str())
            ));
        }
        xml.push_str("</sheets></workbook>");
        xml
    }

    fn workbook_rels(&self) -> String {
        let mut xml = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        );
        for id in 1..=self.sheets.len() {
            xml.push_str(&format!(
                r#"<Relationship Id="rId{id}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{id}.xml"/>"#
            ));
        }
        xml.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings" Target="sharedStrings.xml"/>"#,
            self.sheets.len() + 1
        ));
        xml.push_str("</Relationships>");
        xml
    }
}

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

/// Spreadsheet column letters for a 1-based column number.
pub fn column_name(mut column: u32) -> String {
    let mut letters = Vec::new();
    while column > 0 {
        let rem = ((column - 1) % 26) as u8;
        letters.push(b'A' + rem);
        column = (column - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).expect("ascii column letters")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_letters() {
        assert_eq!(column_name(1), "A");
        assert_eq!(column_name(3), "C");
        assert_eq!(column_name(26), "Z");
        assert_eq!(column_name(27), "AA");
        assert_eq!(column_name(308), "KV");
    }

    #[test]
    fn shared_strings_are_deduplicated() {
        let mut shared = SharedStrings::default();
        assert_eq!(shared.index("Steel"), 0);
        assert_eq!(shared.index("kg"), 1);
        assert_eq!(shared.index("Steel"), 0);
        assert!(shared.to_xml().contains(r#"uniqueCount="2""#));
    }

    #[test]
    fn text_is_escaped() {
        let mut sheet = SheetFixture::default();
        sheet.inline(2, 1, "R&D <x>");
        let xml = sheet.to_xml(&mut SharedStrings::default());
        assert!(xml.contains("R&amp;D &lt;x&gt;"));
        assert!(xml.contains(r#"<row r="2"><c r="A2" t="inlineStr">"#));
    }
}
