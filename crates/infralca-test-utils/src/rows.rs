//! InfraLCA sheet rows for workbook fixtures.
//!
//! Columns are 1-based sheet columns: the material name sits in column C and
//! the row runs to column KV.

use crate::xlsx::SheetFixture;

pub const SHEET: &str = "Emissionsfaktorer";
pub const FIRST_ROW: u32 = 11;

pub const NAME: u32 = 3;
pub const UNIT: u32 = 4;
pub const DATA_TYPE: u32 = 5;
pub const IMPACTS: u32 = 6;
pub const IMPACT_CELLS: usize = 78;
pub const COMMENT: u32 = 195;
pub const A4_NAME: u32 = 271;
pub const A4_DISTANCE: u32 = 272;
pub const A5_NAME: u32 = 288;
pub const A5_DISTANCE: u32 = 289;
pub const SERVICE_LIFE: u32 = 308;

/// One material row. Defaults describe a plain per-kg material with
/// ascending impact values `1.0..=78.0`.
#[derive(Debug, Clone)]
pub struct MaterialRow {
    pub name: String,
    pub unit: String,
    pub data_type: String,
    pub impacts: Vec<f64>,
    pub comment: Option<String>,
    pub service_life: Option<String>,
    pub a4: Option<(String, f64)>,
    pub a5: Option<(String, f64)>,
}

impl MaterialRow {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            unit: "kg".to_string(),
            data_type: "R".to_string(),
            impacts: (1..=IMPACT_CELLS).map(|i| i as f64).collect(),
            comment: None,
            service_life: None,
            a4: None,
            a5: None,
        }
    }

    pub fn unit(mut self, unit: &str) -> Self {
        self.unit = unit.to_string();
        self
    }

    pub fn data_type(mut self, code: &str) -> Self {
        self.data_type = code.to_string();
        self
    }

    pub fn comment(mut self, comment: &str) -> Self {
        self.comment = Some(comment.to_string());
        self
    }

    pub fn service_life(mut self, years: &str) -> Self {
        self.service_life = Some(years.to_string());
        self
    }

    pub fn a4(mut self, name: &str, distance: f64) -> Self {
        self.a4 = Some((name.to_string(), distance));
        self
    }

    pub fn a5(mut self, name: &str, distance: f64) -> Self {
        self.a5 = Some((name.to_string(), distance));
        self
    }

    pub fn place(&self, sheet: &mut SheetFixture, row: u32) {
        sheet
            .text(row, NAME, &self.name)
            .text(row, UNIT, &self.unit)
            .text(row, DATA_TYPE, &self.data_type);
        for (offset, value) in self.impacts.iter().enumerate() {
            sheet.number(row, IMPACTS + offset as u32, *value);
        }
        if let Some(comment) = &self.comment {
            sheet.text(row, COMMENT, comment);
        }
        if let Some(years) = &self.service_life {
            match years.parse::<f64>() {
                Ok(n) => sheet.number(row, SERVICE_LIFE, n),
                Err(_) => sheet.text(row, SERVICE_LIFE, years),
            };
        }
        if let Some((name, distance)) = &self.a4 {
            sheet.text(row, A4_NAME, name).number(row, A4_DISTANCE, *distance);
        }
        if let Some((name, distance)) = &self.a5 {
            sheet.text(row, A5_NAME, name).number(row, A5_DISTANCE, *distance);
        }
    }
}

/// Rows laid out from [`FIRST_ROW`] down, in order.
#[derive(Debug, Clone)]
pub enum SheetLine {
    Category(String),
    Material(MaterialRow),
    Blank,
}

/// Sheet holding `lines` from the first exported row down.
pub fn infralca_sheet(lines: &[SheetLine]) -> SheetFixture {
    let mut sheet = SheetFixture::default();
    for (i, line) in lines.iter().enumerate() {
        let row = FIRST_ROW + i as u32;
        match line {
            SheetLine::Category(name) => {
                sheet.text(row, NAME, &format!("-{name}"));
            }
            SheetLine::Material(material) => material.place(&mut sheet, row),
            SheetLine::Blank => {}
        }
    }
    sheet
}
