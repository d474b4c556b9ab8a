use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::workbook::WorkbookError;

/// Which lookup table rejected a code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeKind {
    Standard,
    SubType,
    Unit,
}

impl fmt::Display for CodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard => write!(f, "standard"),
            Self::SubType => write!(f, "subtype"),
            Self::Unit => write!(f, "unit"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Unknown {kind}: {code:?}")]
    UnknownCode { kind: CodeKind, code: String },

    #[error("Failed to parse {field} from {value:?}")]
    Parse { field: &'static str, value: String },

    #[error("EPD file not found for {name:?}: {}", path.display())]
    MissingEpd { name: String, path: PathBuf },

    #[error("Impact block has {actual} cells, expected {expected}")]
    ImpactLength { expected: usize, actual: usize },

    #[error("Row has {actual} cells, expected {expected}")]
    RowWidth { expected: usize, actual: usize },

    #[error("Failed to export row {row} ({name:?})")]
    Row {
        row: u32,
        name: String,
        #[source]
        source: Box<ExportError>,
    },

    #[error(transparent)]
    Workbook(#[from] WorkbookError),

    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ExportError>;

impl ExportError {
    /// Attach the sheet row this error was raised for.
    pub fn at_row(self, row: u32, name: impl Into<String>) -> Self {
        Self::Row {
            row,
            name: name.into(),
            source: Box::new(self),
        }
    }

    /// The error underneath any row context.
    pub fn root_cause(&self) -> &ExportError {
        match self {
            Self::Row { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_cause_unwraps_row_context() {
        let err = ExportError::UnknownCode {
            kind: CodeKind::Unit,
            code: "ton".to_string(),
        }
        .at_row(42, "Asphalt");

        assert_eq!(err.to_string(), r#"Failed to export row 42 ("Asphalt")"#);
        assert_eq!(err.root_cause().to_string(), r#"Unknown unit: "ton""#);
    }
}
