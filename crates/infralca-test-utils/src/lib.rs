//! Fixtures shared by the converter's integration tests.

use std::path::Path;

use walkdir::WalkDir;

pub mod rows;
pub mod xlsx;

pub use rows::{MaterialRow, SheetLine, infralca_sheet};
pub use xlsx::{SheetFixture, WorkbookFixture};

/// Workbook with a single InfraLCA sheet holding `lines`.
pub fn infralca_workbook(lines: &[SheetLine]) -> WorkbookFixture {
    WorkbookFixture::new().sheet(rows::SHEET, infralca_sheet(lines))
}

/// `/`-separated paths of every file under `root`, sorted.
pub fn list_files(root: impl AsRef<Path>) -> Vec<String> {
    let root = root.as_ref();
    let mut files: Vec<String> = WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| {
            let rel_path = e.path().strip_prefix(root).ok()?;
            Some(rel_path.to_string_lossy().replace('\\', "/"))
        })
        .collect();
    files.sort();
    files
}
