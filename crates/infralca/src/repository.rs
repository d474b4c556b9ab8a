//! One JSON document per record under `<root>/epds` and `<root>/products`.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use atomicwrites::{AtomicFile, OverwriteBehavior};
use infralca_records::{Epd, Product};
use serde::Serialize;

use crate::error::{ExportError, Result};
use crate::identity;

/// A record stored as `<root>/<DIRECTORY>/<id>.json`.
pub trait Record: Serialize {
    const DIRECTORY: &'static str;

    fn id(&self) -> &str;
}

impl Record for Epd {
    const DIRECTORY: &'static str = "epds";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for Product {
    const DIRECTORY: &'static str = "products";

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone)]
pub struct Repository {
    root: PathBuf,
}

impl Repository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for<R: Record>(&self, id: &str) -> PathBuf {
        self.root.join(R::DIRECTORY).join(format!("{id}.json"))
    }

    /// Write `record` as pretty-printed JSON, replacing any previous file.
    pub fn write<R: Record>(&self, record: &R) -> Result<PathBuf> {
        let path = self.path_for::<R>(record.id());
        let io_err = |source| ExportError::Io {
            path: path.clone(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let json = serde_json::to_string_pretty(record).map_err(|source| ExportError::Json {
            path: path.clone(),
            source,
        })?;

        AtomicFile::new(&path, OverwriteBehavior::AllowOverwrite)
            .write(|f| f.write_all(json.as_bytes()))
            .map_err(|err| match err {
                atomicwrites::Error::Internal(source) | atomicwrites::Error::User(source) => {
                    io_err(source)
                }
            })?;

        Ok(path)
    }

    /// Load the EPD previously written for the material `name`.
    pub fn read_epd_by_name(&self, name: &str) -> Result<Epd> {
        let path = self.path_for::<Epd>(&identity::epd_id(name));
        if !path.exists() {
            return Err(ExportError::MissingEpd {
                name: name.to_string(),
                path,
            });
        }

        let content = fs::read_to_string(&path).map_err(|source| ExportError::Io {
            path: path.clone(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ExportError::Json { path, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use infralca_records::{Country, Source, Standard, SubType, Unit};

    fn epd(name: &str) -> Epd {
        Epd {
            id: identity::epd_id(name),
            name: name.to_string(),
            declared_unit: Unit::Kg,
            version: "3.1".to_string(),
            published_date: NaiveDate::from_ymd_opt(2023, 9, 21).unwrap(),
            valid_until: NaiveDate::from_ymd_opt(2028, 9, 19).unwrap(),
            format_version: infralca_records::FORMAT_VERSION.to_string(),
            source: Some(Source::named("InfraLCA")),
            reference_service_life: Some(50),
            standard: Standard::En15804A2,
            comment: None,
            location: Country::Dnk,
            subtype: SubType::Generic,
            impacts: Default::default(),
            meta_data: None,
        }
    }

    #[test]
    fn writes_under_record_directory() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::new(dir.path());

        let path = repo.write(&epd("Steel")).unwrap();
        assert_eq!(
            path,
            dir.path()
                .join("epds")
                .join("ff3613fd-903d-56c4-a207-b6646231bdea.json")
        );

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("{\n  \"id\": \"ff3613fd"));
    }

    #[test]
    fn reads_epd_back_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::new(dir.path());
        repo.write(&epd("Steel")).unwrap();

        assert_eq!(repo.read_epd_by_name("Steel").unwrap(), epd("Steel"));
    }

    #[test]
    fn missing_epd_names_the_material() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::new(dir.path());

        let err = repo.read_epd_by_name("Diesel Truck").unwrap_err();
        match err {
            ExportError::MissingEpd { name, path } => {
                assert_eq!(name, "Diesel Truck");
                assert!(path.ends_with("epds/214c5c8d-e046-5c39-8339-b4aa65bd2408.json"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rewriting_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::new(dir.path());

        let path = repo.write(&epd("Steel")).unwrap();
        let first = fs::read(&path).unwrap();
        repo.write(&epd("Steel")).unwrap();
        assert_eq!(fs::read(&path).unwrap(), first);
    }
}
