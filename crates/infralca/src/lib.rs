//! Convert the InfraLCA emission factor workbook into LCAx JSON records.
//!
//! [`run`] reads the `Emissionsfaktorer` sheet and writes one EPD per material
//! row to `<output>/epds/<id>.json`, then one product per material row to
//! `<output>/products/<id>.json`. Products embed the EPD written for the same
//! row and any A4/A5 transport legs, which are resolved against EPDs of other
//! rows, so the EPD pass always completes before the product pass starts.

pub mod builder;
pub mod config;
pub mod error;
pub mod extract;
pub mod identity;
pub mod lookup;
pub mod pipeline;
pub mod repository;
pub mod schema;
pub mod workbook;

use std::path::Path;

pub use config::{Edition, ExportConfig};
pub use error::{CodeKind, ExportError, Result};
pub use pipeline::{ExportSummary, Exporter, Pass, PassSummary, read_rows};
pub use repository::Repository;

/// Export EPDs and then products with the default configuration.
pub fn run(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<ExportSummary> {
    run_with_config(input, output, &ExportConfig::default())
}

pub fn run_with_config(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    config: &ExportConfig,
) -> Result<ExportSummary> {
    config.validate()?;
    Exporter::new(config, output.as_ref()).export_workbook(input)
}
