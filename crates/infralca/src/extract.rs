use std::collections::BTreeMap;

use infralca_records::{ImpactCategoryKey, ImpactMatrix, LifeCycleStage};

use crate::error::{ExportError, Result};
use crate::workbook::Cell;

/// Stages of the impact block, in column order.
pub const STAGES: [LifeCycleStage; 6] = [
    LifeCycleStage::A1a3,
    LifeCycleStage::C1,
    LifeCycleStage::C2,
    LifeCycleStage::C3,
    LifeCycleStage::C4,
    LifeCycleStage::D,
];

/// Impact categories within each stage, in column order.
pub const CATEGORIES: [ImpactCategoryKey; 13] = [
    ImpactCategoryKey::Gwp,
    ImpactCategoryKey::GwpFos,
    ImpactCategoryKey::GwpBio,
    ImpactCategoryKey::GwpLul,
    ImpactCategoryKey::Odp,
    ImpactCategoryKey::Ap,
    ImpactCategoryKey::EpFw,
    ImpactCategoryKey::EpMar,
    ImpactCategoryKey::EpTer,
    ImpactCategoryKey::Pocp,
    ImpactCategoryKey::Adpe,
    ImpactCategoryKey::Adpf,
    ImpactCategoryKey::Wdp,
];

pub const IMPACT_CELLS: usize = STAGES.len() * CATEGORIES.len();

/// Reference service life in years; `None` when unspecified.
pub fn service_life(cell: &Cell) -> Result<Option<u32>> {
    let invalid = || ExportError::Parse {
        field: "reference service life",
        value: cell.to_string(),
    };

    match cell {
        Cell::Empty => Ok(None),
        Cell::Number(n) if n.is_finite() && *n >= 0.0 && *n <= f64::from(u32::MAX) => {
            Ok(Some(n.trunc() as u32))
        }
        Cell::String(s) => match s.trim() {
            "" | "-" => Ok(None),
            trimmed => trimmed.parse::<u32>().map(Some).map_err(|_| invalid()),
        },
        _ => Err(invalid()),
    }
}

/// Build the impact matrix from the stage-major impact cells.
///
/// `cells` must hold exactly [`IMPACT_CELLS`] values: all categories of the
/// first stage, then all categories of the next, and so on.
pub fn impact_matrix(cells: &[Cell]) -> Result<ImpactMatrix> {
    if cells.len() != IMPACT_CELLS {
        return Err(ExportError::ImpactLength {
            expected: IMPACT_CELLS,
            actual: cells.len(),
        });
    }

    let mut matrix = ImpactMatrix::new();
    for (stage, stage_cells) in STAGES.into_iter().zip(cells.chunks_exact(CATEGORIES.len())) {
        let categories = CATEGORIES
            .into_iter()
            .zip(stage_cells)
            .map(|(category, cell)| Ok((category, impact_value(cell)?)))
            .collect::<Result<BTreeMap<_, _>>>()?;
        matrix.insert(stage, categories);
    }

    Ok(matrix)
}

fn impact_value(cell: &Cell) -> Result<Option<f64>> {
    match cell {
        Cell::Number(n) => Ok(Some(*n)),
        cell if cell.is_blank() => Ok(None),
        Cell::String(s) => s.trim().parse().map(Some).map_err(|_| ExportError::Parse {
            field: "impact value",
            value: s.clone(),
        }),
        other => Err(ExportError::Parse {
            field: "impact value",
            value: other.to_string(),
        }),
    }
}

/// Transport distance in kilometres.
pub fn distance(cell: &Cell) -> Result<f64> {
    let invalid = || ExportError::Parse {
        field: "transport distance",
        value: cell.to_string(),
    };

    match cell {
        Cell::Number(n) => Ok(*n),
        Cell::String(s) => s.trim().parse().map_err(|_| invalid()),
        _ => Err(invalid()),
    }
}
