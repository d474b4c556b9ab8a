//! Two-pass export driver: EPDs first, then the products that reference them.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use log::{Level, Log, Metadata, Record};

use crate::builder::{self, Provenance};
use crate::config::ExportConfig;
use crate::error::Result;
use crate::repository::Repository;
use crate::schema::InfraLcaRow;
use crate::workbook::{SheetRow, Workbook};

const LOG_TARGET: &str = "infralca";

/// Which records a pass writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    Epds,
    Products,
}

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pass::Epds => write!(f, "EPDs"),
            Pass::Products => write!(f, "products"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassSummary {
    /// Rows scanned, including blank and header rows.
    pub rows: usize,
    pub categories: usize,
    pub records: usize,
}

impl fmt::Display for PassSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} records from {} rows in {} categories",
            self.records, self.rows, self.categories
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub epds: PassSummary,
    pub products: PassSummary,
}

/// Read the configured window of the configured sheet.
pub fn read_rows(input: impl AsRef<Path>, config: &ExportConfig) -> Result<Vec<SheetRow>> {
    let mut workbook = Workbook::open(input)?;
    let sheet = workbook.worksheet(&config.sheet)?;
    Ok(sheet.rows(config.window()).collect())
}

pub struct Exporter<'a> {
    config: &'a ExportConfig,
    repository: Repository,
    created: NaiveDate,
    logger: &'a dyn Log,
}

impl<'a> Exporter<'a> {
    /// Exporter writing under `output`, stamped with today's date and
    /// logging through the process logger.
    pub fn new(config: &'a ExportConfig, output: impl Into<PathBuf>) -> Self {
        Self {
            config,
            repository: Repository::new(output),
            created: chrono::Local::now().date_naive(),
            logger: log::logger(),
        }
    }

    pub fn with_logger(mut self, logger: &'a dyn Log) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_created(mut self, created: NaiveDate) -> Self {
        self.created = created;
        self
    }

    pub fn repository(&self) -> &Repository {
        &self.repository
    }

    /// Both passes over the workbook at `input`.
    pub fn export_workbook(&self, input: impl AsRef<Path>) -> Result<ExportSummary> {
        let input = input.as_ref();
        self.log(Level::Info, format_args!("Loading {}", input.display()));
        let rows = read_rows(input, self.config)?;

        let epds = self.export_epds(&rows)?;
        let products = self.export_products(&rows)?;

        self.log(Level::Info, format_args!("Done"));
        Ok(ExportSummary { epds, products })
    }

    pub fn export_epds(&self, rows: &[SheetRow]) -> Result<PassSummary> {
        self.export(rows, Pass::Epds)
    }

    /// Every data row needs its EPD written by an earlier [`Self::export_epds`].
    pub fn export_products(&self, rows: &[SheetRow]) -> Result<PassSummary> {
        self.export(rows, Pass::Products)
    }

    pub fn export(&self, rows: &[SheetRow], pass: Pass) -> Result<PassSummary> {
        self.log(Level::Info, format_args!("Exporting {pass}"));

        let provenance = Provenance {
            created: self.created,
            origin: &self.config.origin,
        };
        let marker = self.config.header_marker;
        let mut current_category = String::new();
        let mut summary = PassSummary::default();

        for row in rows {
            summary.rows += 1;
            let fields = InfraLcaRow::new(&row.cells).map_err(|err| err.at_row(row.number, ""))?;

            let Some(name) = fields.name() else {
                continue;
            };
            if name.starts_with(marker) {
                current_category = name.trim_matches(marker).to_string();
                summary.categories += 1;
                self.log(Level::Info, format_args!("Parsing: {current_category}"));
                continue;
            }

            self.log(
                Level::Debug,
                format_args!("Row {}: {name} ({current_category})", row.number),
            );
            let path = match pass {
                Pass::Epds => builder::build_epd(
                    &fields,
                    &current_category,
                    &self.config.edition,
                    provenance,
                )
                .and_then(|epd| self.repository.write(&epd)),
                Pass::Products => builder::build_product(&fields, &self.repository, provenance)
                    .and_then(|product| self.repository.write(&product)),
            }
            .map_err(|err| err.at_row(row.number, name.as_str()))?;

            self.log(Level::Debug, format_args!("Wrote {}", path.display()));
            summary.records += 1;
        }

        self.log(Level::Info, format_args!("Exported {pass}: {summary}"));
        Ok(summary)
    }

    fn log(&self, level: Level, args: fmt::Arguments) {
        let metadata = Metadata::builder().level(level).target(LOG_TARGET).build();
        if !self.logger.enabled(&metadata) {
            return;
        }
        self.logger.log(
            &Record::builder()
                .metadata(metadata)
                .args(args)
                .module_path_static(Some(module_path!()))
                .build(),
        );
    }
}
