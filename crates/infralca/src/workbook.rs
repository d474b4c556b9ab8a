//! Read-only access to cell values in an OOXML workbook (`.xlsx` / `.xlsm`).
//!
//! Only cached cell values are read. Formulas are never evaluated, styles and
//! number formats are ignored, so date cells come back as plain numbers.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use roxmltree::{Document, Node};
use thiserror::Error;
use zip::ZipArchive;
use zip::result::ZipError;

const WORKBOOK_PART: &str = "xl/workbook.xml";
const WORKBOOK_RELS_PART: &str = "xl/_rels/workbook.xml.rels";
const SHARED_STRINGS_PART: &str = "xl/sharedStrings.xml";

#[derive(Debug, Error)]
pub enum WorkbookError {
    #[error("Failed to read workbook: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid workbook archive: {0}")]
    Zip(#[from] ZipError),

    #[error("XML parse error in {part}: {source}")]
    Xml {
        part: String,
        #[source]
        source: roxmltree::Error,
    },

    #[error("Missing workbook part: {0}")]
    MissingPart(String),

    #[error("Sheet not found: {0}")]
    MissingSheet(String),

    #[error("Invalid cell reference: {0}")]
    InvalidReference(String),

    #[error("Invalid value in cell {reference}: {value:?}")]
    InvalidValue { reference: String, value: String },

    #[error("Shared string index {0} out of range")]
    SharedString(usize),
}

pub type Result<T> = std::result::Result<T, WorkbookError>;

/// A single cell value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    #[default]
    Empty,
    String(String),
    Number(f64),
    Bool(bool),
    /// Spreadsheet error value such as `#N/A`.
    Error(String),
}

static EMPTY: Cell = Cell::Empty;

impl Cell {
    /// Empty cells and whitespace-only strings.
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::String(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Textual form of the value, `None` for empty cells.
    pub fn text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            other => Some(other.to_string()),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::String(s) | Cell::Error(s) => write!(f, "{s}"),
            // Whole numbers print without a trailing `.0`, as the workbook shows them.
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Cell::Number(n) => write!(f, "{n}"),
            Cell::Bool(true) => write!(f, "TRUE"),
            Cell::Bool(false) => write!(f, "FALSE"),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::String(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::String(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}

/// Inclusive, 1-based row and column bounds of a sheet region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub first_row: u32,
    pub last_row: u32,
    pub first_column: u32,
    pub last_column: u32,
}

impl Window {
    pub fn width(&self) -> usize {
        (self.last_column + 1).saturating_sub(self.first_column) as usize
    }
}

/// One row of a [`Window`], padded with [`Cell::Empty`] to the window width.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetRow {
    /// 1-based sheet row number.
    pub number: u32,
    pub cells: Vec<Cell>,
}

#[derive(Debug)]
struct SheetEntry {
    name: String,
    part: String,
}

#[derive(Debug)]
pub struct Workbook<R> {
    archive: ZipArchive<R>,
    sheets: Vec<SheetEntry>,
    shared_strings: Vec<String>,
}

impl Workbook<BufReader<File>> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }
}

impl<R: Read + Seek> Workbook<R> {
    pub fn from_reader(reader: R) -> Result<Self> {
        let mut archive = ZipArchive::new(reader)?;

        let workbook_xml = read_part(&mut archive, WORKBOOK_PART)?
            .ok_or_else(|| WorkbookError::MissingPart(WORKBOOK_PART.to_string()))?;
        let rels_xml = read_part(&mut archive, WORKBOOK_RELS_PART)?
            .ok_or_else(|| WorkbookError::MissingPart(WORKBOOK_RELS_PART.to_string()))?;

        let targets = parse_relationships(&rels_xml)?;
        let sheets = parse_sheets(&workbook_xml, &targets)?;
        let shared_strings = match read_part(&mut archive, SHARED_STRINGS_PART)? {
            Some(xml) => parse_shared_strings(&xml)?,
            None => Vec::new(),
        };

        Ok(Self {
            archive,
            sheets,
            shared_strings,
        })
    }

    /// Sheet names in workbook order.
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn worksheet(&mut self, name: &str) -> Result<Worksheet> {
        let part = self
            .sheets
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.part.clone())
            .ok_or_else(|| WorkbookError::MissingSheet(name.to_string()))?;

        let xml = read_part(&mut self.archive, &part)?
            .ok_or_else(|| WorkbookError::MissingPart(part.clone()))?;
        Worksheet::parse(&xml, &part, &self.shared_strings)
    }
}

/// Sparse cell storage of one sheet, keyed by 1-based (row, column).
#[derive(Debug, Default)]
pub struct Worksheet {
    cells: BTreeMap<(u32, u32), Cell>,
}

impl Worksheet {
    fn parse(xml: &str, part: &str, shared_strings: &[String]) -> Result<Self> {
        let doc = parse_xml(xml, part)?;
        let mut cells = BTreeMap::new();

        let Some(sheet_data) = doc
            .root_element()
            .children()
            .find(|n| n.has_tag_name("sheetData"))
        else {
            return Ok(Self { cells });
        };

        // `r` attributes are optional; without them rows and cells follow on.
        let mut next_row = 1;
        for row in sheet_data.children().filter(|n| n.has_tag_name("row")) {
            let row_number = match row.attribute("r") {
                Some(r) => r
                    .parse::<u32>()
                    .map_err(|_| WorkbookError::InvalidReference(r.to_string()))?,
                None => next_row,
            };
            next_row = row_number + 1;

            let mut next_column = 1;
            for cell in row.children().filter(|n| n.has_tag_name("c")) {
                let column = match cell.attribute("r") {
                    Some(r) => parse_reference(r)?.1,
                    None => next_column,
                };
                next_column = column + 1;

                let value = parse_cell(&cell, shared_strings)?;
                if value != Cell::Empty {
                    cells.insert((row_number, column), value);
                }
            }
        }

        Ok(Self { cells })
    }

    pub fn cell(&self, row: u32, column: u32) -> &Cell {
        self.cells.get(&(row, column)).unwrap_or(&EMPTY)
    }

    /// Every row of `window`, including rows with no stored cells.
    pub fn rows(&self, window: Window) -> impl Iterator<Item = SheetRow> + '_ {
        (window.first_row..=window.last_row).map(move |number| SheetRow {
            number,
            cells: (window.first_column..=window.last_column)
                .map(|column| self.cell(number, column).clone())
                .collect(),
        })
    }
}

fn read_part<R: Read + Seek>(archive: &mut ZipArchive<R>, name: &str) -> Result<Option<String>> {
    let mut file = match archive.by_name(name) {
        Ok(file) => file,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(err) => return Err(err.into()),
    };

    let mut content = String::new();
    file.read_to_string(&mut content)?;
    Ok(Some(content))
}

fn parse_xml<'a>(xml: &'a str, part: &str) -> Result<Document<'a>> {
    Document::parse(xml).map_err(|source| WorkbookError::Xml {
        part: part.to_string(),
        source,
    })
}

/// Relationship id -> archive path of the target part.
fn parse_relationships(xml: &str) -> Result<HashMap<String, String>> {
    let doc = parse_xml(xml, WORKBOOK_RELS_PART)?;

    Ok(doc
        .root_element()
        .children()
        .filter(|n| n.has_tag_name("Relationship"))
        .filter_map(|n| Some((n.attribute("Id")?, n.attribute("Target")?)))
        .map(|(id, target)| {
            let part = match target.strip_prefix('/') {
                Some(absolute) => absolute.to_string(),
                None => format!("xl/{target}"),
            };
            (id.to_string(), part)
        })
        .collect())
}

fn parse_sheets(xml: &str, targets: &HashMap<String, String>) -> Result<Vec<SheetEntry>> {
    let doc = parse_xml(xml, WORKBOOK_PART)?;
    let Some(sheets) = doc
        .root_element()
        .children()
        .find(|n| n.has_tag_name("sheets"))
    else {
        return Ok(Vec::new());
    };

    let mut entries = Vec::new();
    for sheet in sheets.children().filter(|n| n.has_tag_name("sheet")) {
        let Some(name) = sheet.attribute("name") else {
            continue;
        };
        // `r:id`; matched on the local name so transitional and strict namespaces both work.
        let Some(rel_id) = sheet.attributes().find(|a| a.name() == "id").map(|a| a.value()) else {
            continue;
        };
        let part = targets
            .get(rel_id)
            .cloned()
            .ok_or_else(|| WorkbookError::MissingPart(format!("relationship {rel_id}")))?;

        entries.push(SheetEntry {
            name: name.to_string(),
            part,
        });
    }

    Ok(entries)
}

fn parse_shared_strings(xml: &str) -> Result<Vec<String>> {
    let doc = parse_xml(xml, SHARED_STRINGS_PART)?;

    Ok(doc
        .root_element()
        .children()
        .filter(|n| n.has_tag_name("si"))
        .map(|si| rich_text(&si))
        .collect())
}

/// Concatenated `<t>` runs of a string item, skipping phonetic hints.
fn rich_text(node: &Node) -> String {
    node.descendants()
        .filter(|n| n.has_tag_name("t"))
        .filter(|n| !n.ancestors().any(|a| a.has_tag_name("rPh")))
        .filter_map(|n| n.text())
        .collect()
}

fn parse_cell(node: &Node, shared_strings: &[String]) -> Result<Cell> {
    let reference = node.attribute("r").unwrap_or_default();
    let value = node
        .children()
        .find(|n| n.has_tag_name("v"))
        .and_then(|v| v.text());
    let invalid = |value: &str| WorkbookError::InvalidValue {
        reference: reference.to_string(),
        value: value.to_string(),
    };

    let cell = match (node.attribute("t").unwrap_or("n"), value) {
        ("inlineStr", _) => node
            .children()
            .find(|n| n.has_tag_name("is"))
            .map(|is| Cell::String(rich_text(&is)))
            .unwrap_or_default(),
        (_, None) => Cell::Empty,
        ("s", Some(v)) => {
            let index: usize = v.trim().parse().map_err(|_| invalid(v))?;
            let text = shared_strings
                .get(index)
                .ok_or(WorkbookError::SharedString(index))?;
            Cell::String(text.clone())
        }
        ("str" | "d", Some(v)) => Cell::String(v.to_string()),
        ("b", Some("1")) => Cell::Bool(true),
        ("b", Some("0")) => Cell::Bool(false),
        ("b", Some(v)) => return Err(invalid(v)),
        ("e", Some(v)) => Cell::Error(v.to_string()),
        (_, Some(v)) => Cell::Number(v.trim().parse().map_err(|_| invalid(v))?),
    };

    Ok(cell)
}

/// Split an A1-style reference into 1-based (row, column).
pub fn parse_reference(reference: &str) -> Result<(u32, u32)> {
    let invalid = || WorkbookError::InvalidReference(reference.to_string());

    let split = reference
        .find(|c: char| c.is_ascii_digit())
        .ok_or_else(invalid)?;
    let (letters, digits) = reference.split_at(split);
    if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(invalid());
    }

    let column = letters.bytes().try_fold(0u32, |acc, b| {
        acc.checked_mul(26)?
            .checked_add(u32::from(b.to_ascii_uppercase() - b'A') + 1)
    });
    let row = digits.parse::<u32>().ok().filter(|r| *r > 0);

    match (row, column) {
        (Some(row), Some(column)) => Ok((row, column)),
        _ => Err(invalid()),
    }
}
