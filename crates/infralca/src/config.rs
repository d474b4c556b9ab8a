use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{ExportError, Result};
use crate::schema::ROW_WIDTH;
use crate::workbook::Window;

pub const DEFAULT_SHEET: &str = "Emissionsfaktorer";
pub const DEFAULT_ORIGIN: &str = "https://github.com/ocni-dtu/infralca";
pub const DEFAULT_VERSION: &str = "3.1";

/// Release of the InfraLCA workbook being converted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Edition {
    pub version: String,
    /// Written as a quoted `YYYY-MM-DD` string in TOML.
    pub published: NaiveDate,
}

impl Default for Edition {
    fn default() -> Self {
        Self {
            version: DEFAULT_VERSION.to_string(),
            published: NaiveDate::from_ymd_opt(2023, 9, 21).expect("valid edition date"),
        }
    }
}

/// Export settings. Every field has a default, so a config file only needs
/// the values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    pub sheet: String,
    pub first_row: u32,
    pub last_row: u32,
    pub first_column: u32,
    pub last_column: u32,
    /// Leading character of category header rows.
    pub header_marker: char,
    pub origin: String,
    pub edition: Edition,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            sheet: DEFAULT_SHEET.to_string(),
            first_row: 11,
            last_row: 343,
            first_column: 3,
            last_column: 308,
            header_marker: '-',
            origin: DEFAULT_ORIGIN.to_string(),
            edition: Edition::default(),
        }
    }
}

impl ExportConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ExportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
            .map_err(|err| ExportError::Config(format!("{}: {err}", path.display())))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: ExportConfig =
            toml::from_str(content).map_err(|err| ExportError::Config(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.first_row == 0 || self.first_column == 0 {
            return Err(ExportError::Config("rows and columns are 1-based".to_string()));
        }
        if self.first_row > self.last_row {
            return Err(ExportError::Config(format!(
                "first_row {} is after last_row {}",
                self.first_row, self.last_row
            )));
        }
        if self.first_column > self.last_column {
            return Err(ExportError::Config(format!(
                "first_column {} is after last_column {}",
                self.first_column, self.last_column
            )));
        }
        let width = self.window().width();
        if width != ROW_WIDTH {
            return Err(ExportError::Config(format!(
                "column window is {width} cells wide, the sheet layout needs {ROW_WIDTH}"
            )));
        }
        if self.sheet.is_empty() {
            return Err(ExportError::Config("sheet name is empty".to_string()));
        }
        Ok(())
    }

    pub fn window(&self) -> Window {
        Window {
            first_row: self.first_row,
            last_row: self.last_row,
            first_column: self.first_column,
            last_column: self.last_column,
        }
    }
}
