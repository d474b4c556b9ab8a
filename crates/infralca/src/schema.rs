//! Column layout of the InfraLCA emission factor sheet.
//!
//! Offsets are relative to the first column of the export window (sheet
//! column C), so offset 0 is the material name.

use std::ops::Range;

use infralca_records::LifeCycleStage;

use crate::error::{ExportError, Result};
use crate::extract::IMPACT_CELLS;
use crate::workbook::Cell;

/// Cells per row: sheet columns 3 through 308.
pub const ROW_WIDTH: usize = 306;

/// Material name, or a category header starting with the header marker.
pub const NAME: usize = 0;
pub const UNIT: usize = 1;
/// Data type code feeding both the standard and the subtype lookup.
pub const DATA_TYPE: usize = 2;
/// Impact column block. Only the leading [`IMPACT_CELLS`] cells carry the
/// matrix; the remaining columns of the block are not exported.
pub const IMPACTS: Range<usize> = 3..87;
pub const COMMENT: usize = 192;
pub const A4_NAME: usize = 268;
pub const A4_DISTANCE: usize = 269;
pub const A5_NAME: usize = 285;
pub const A5_DISTANCE: usize = 286;
pub const SERVICE_LIFE: usize = 305;

/// Borrowed view of one sheet row with named field access.
#[derive(Debug, Clone, Copy)]
pub struct InfraLcaRow<'a> {
    cells: &'a [Cell],
}

impl<'a> InfraLcaRow<'a> {
    pub fn new(cells: &'a [Cell]) -> Result<Self> {
        if cells.len() != ROW_WIDTH {
            return Err(ExportError::RowWidth {
                expected: ROW_WIDTH,
                actual: cells.len(),
            });
        }
        Ok(Self { cells })
    }

    /// First cell as text; `None` when blank.
    pub fn name(&self) -> Option<String> {
        let cell = &self.cells[NAME];
        if cell.is_blank() {
            None
        } else {
            cell.text()
        }
    }

    pub fn unit_code(&self) -> Option<String> {
        self.cells[UNIT].text()
    }

    pub fn data_type_code(&self) -> Option<String> {
        self.cells[DATA_TYPE].text()
    }

    pub fn impact_cells(&self) -> &'a [Cell] {
        &self.cells[IMPACTS.start..IMPACTS.start + IMPACT_CELLS]
    }

    pub fn comment(&self) -> Option<String> {
        self.cells[COMMENT].text()
    }

    pub fn service_life(&self) -> &'a Cell {
        &self.cells[SERVICE_LIFE]
    }

    /// (name, distance) cells of the transport leg for `stage`; `None` for
    /// stages the sheet has no transport columns for.
    pub fn transport(&self, stage: LifeCycleStage) -> Option<(&'a Cell, &'a Cell)> {
        let (name, distance) = match stage {
            LifeCycleStage::A4 => (A4_NAME, A4_DISTANCE),
            LifeCycleStage::A5 => (A5_NAME, A5_DISTANCE),
            _ => return None,
        };
        Some((&self.cells[name], &self.cells[distance]))
    }
}
