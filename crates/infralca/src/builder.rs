//! Construction of EPD, product and transport records from sheet rows.

use chrono::{Days, NaiveDate};
use infralca_records::{
    Country, Epd, FORMAT_VERSION, LifeCycleStage, MetaData, Product, Source, Transport, Unit,
};

use crate::config::Edition;
use crate::error::{ExportError, Result};
use crate::extract;
use crate::identity;
use crate::lookup;
use crate::repository::Repository;
use crate::schema::InfraLcaRow;
use crate::workbook::Cell;

/// Validity of every EPD, counted from the edition's publication date.
pub const VALIDITY_DAYS: u64 = 365 * 5;

pub const SOURCE_NAME: &str = "InfraLCA";

/// Creation date and origin stamped into record metadata.
#[derive(Debug, Clone, Copy)]
pub struct Provenance<'a> {
    pub created: NaiveDate,
    pub origin: &'a str,
}

impl Provenance<'_> {
    fn meta_data(&self, category: Option<&str>) -> MetaData {
        let mut meta = MetaData::new();
        if let Some(category) = category {
            meta.insert("category".to_string(), category.to_string());
        }
        meta.insert("created".to_string(), self.created.to_string());
        meta.insert("origin".to_string(), self.origin.to_string());
        meta
    }
}

pub fn build_epd(
    row: &InfraLcaRow,
    category: &str,
    edition: &Edition,
    provenance: Provenance,
) -> Result<Epd> {
    let name = row_name(row)?;
    let data_type = row.data_type_code();

    Ok(Epd {
        id: identity::epd_id(&name),
        declared_unit: lookup::unit_from_code(row.unit_code().as_deref())?,
        version: edition.version.clone(),
        published_date: edition.published,
        valid_until: edition.published + Days::new(VALIDITY_DAYS),
        format_version: FORMAT_VERSION.to_string(),
        source: Some(Source::named(SOURCE_NAME)),
        reference_service_life: extract::service_life(row.service_life())?,
        standard: lookup::standard_from_code(data_type.as_deref())?,
        subtype: lookup::subtype_from_code(data_type.as_deref())?,
        comment: row.comment(),
        location: Country::Dnk,
        impacts: extract::impact_matrix(row.impact_cells())?,
        meta_data: Some(provenance.meta_data(Some(category))),
        name,
    })
}

/// Build the product for `row` from the EPD already written for it.
pub fn build_product(
    row: &InfraLcaRow,
    repository: &Repository,
    provenance: Provenance,
) -> Result<Product> {
    let name = row_name(row)?;
    let epd = repository.read_epd_by_name(&name)?;

    let mut transport = Vec::new();
    for stage in [LifeCycleStage::A4, LifeCycleStage::A5] {
        if let Some((name_cell, distance_cell)) = row.transport(stage)
            && let Some(leg) = build_transport(name_cell, distance_cell, stage, repository)?
        {
            transport.push(leg);
        }
    }

    Ok(Product {
        id: identity::product_id(&name),
        description: None,
        reference_service_life: epd.reference_service_life,
        quantity: 1.0,
        unit: epd.declared_unit,
        transport: (!transport.is_empty()).then_some(transport),
        results: None,
        meta_data: Some(provenance.meta_data(epd.category())),
        impact_data: epd.into(),
        name,
    })
}

/// A transport leg for `stage`, or `None` when the name cell is empty.
///
/// A whitespace-only name is looked up like any other and fails with
/// `MissingEpd`.
pub fn build_transport(
    name: &Cell,
    distance: &Cell,
    stage: LifeCycleStage,
    repository: &Repository,
) -> Result<Option<Transport>> {
    match name {
        Cell::Empty => return Ok(None),
        Cell::String(s) if s.is_empty() => return Ok(None),
        _ => {}
    }

    let epd = repository.read_epd_by_name(&name.to_string())?;
    Ok(Some(Transport {
        id: identity::transport_id(),
        name: epd.name.clone(),
        life_cycle_stages: vec![stage],
        distance: extract::distance(distance)?,
        distance_unit: Unit::Km,
        impact_data: epd.into(),
    }))
}

fn row_name(row: &InfraLcaRow) -> Result<String> {
    row.name().ok_or_else(|| ExportError::Parse {
        field: "name",
        value: String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CodeKind;
    use crate::schema::{self, ROW_WIDTH};
    use infralca_records::{ImpactCategoryKey, Standard, SubType};

    fn provenance() -> Provenance<'static> {
        Provenance {
            created: NaiveDate::from_ymd_opt(2026, 1, 2).unwrap(),
            origin: "https://example.com/infralca",
        }
    }

    fn steel_row() -> Vec<Cell> {
        let mut cells = vec![Cell::Empty; ROW_WIDTH];
        cells[schema::NAME] = "Steel".into();
        cells[schema::UNIT] = "kg".into();
        cells[schema::DATA_TYPE] = "R13".into();
        for (i, cell) in cells[schema::IMPACTS].iter_mut().enumerate() {
            *cell = Cell::Number(i as f64 + 1.0);
        }
        cells[schema::COMMENT] = "Hot rolled".into();
        cells[schema::SERVICE_LIFE] = Cell::Number(100.0);
        cells
    }

    #[test]
    fn builds_epd_from_row() {
        let cells = steel_row();
        let row = InfraLcaRow::new(&cells).unwrap();

        let epd = build_epd(&row, "Metals", &Edition::default(), provenance()).unwrap();

        assert_eq!(epd.id, "ff3613fd-903d-56c4-a207-b6646231bdea");
        assert_eq!(epd.name, "Steel");
        assert_eq!(epd.declared_unit, Unit::Kg);
        assert_eq!(epd.standard, Standard::En15804A1);
        assert_eq!(epd.subtype, SubType::Representative);
        assert_eq!(epd.version, "3.1");
        assert_eq!(epd.valid_until, NaiveDate::from_ymd_opt(2028, 9, 19).unwrap());
        assert_eq!(epd.reference_service_life, Some(100));
        assert_eq!(epd.comment.as_deref(), Some("Hot rolled"));
        assert_eq!(epd.location, Country::Dnk);
        assert_eq!(epd.source, Some(Source::named("InfraLCA")));
        assert_eq!(epd.category(), Some("Metals"));
        assert_eq!(epd.meta_data.as_ref().unwrap()["created"], "2026-01-02");
        assert_eq!(epd.impacts[&LifeCycleStage::D][&ImpactCategoryKey::Wdp], Some(78.0));
    }

    #[test]
    fn unknown_unit_fails_the_row() {
        let mut cells = steel_row();
        cells[schema::UNIT] = "tonne".into();
        let row = InfraLcaRow::new(&cells).unwrap();

        let err = build_epd(&row, "", &Edition::default(), provenance()).unwrap_err();
        assert!(matches!(err, ExportError::UnknownCode { .. }));
    }

    #[test]
    fn empty_code_cells_fail_the_row() {
        let mut cells = steel_row();
        cells[schema::UNIT] = "".into();
        let row = InfraLcaRow::new(&cells).unwrap();
        let err = build_epd(&row, "", &Edition::default(), provenance()).unwrap_err();
        assert!(matches!(
            err,
            ExportError::UnknownCode { kind: CodeKind::Unit, ref code } if code.is_empty()
        ));

        let mut cells = steel_row();
        cells[schema::DATA_TYPE] = "".into();
        let row = InfraLcaRow::new(&cells).unwrap();
        let err = build_epd(&row, "", &Edition::default(), provenance()).unwrap_err();
        assert!(matches!(err, ExportError::UnknownCode { kind: CodeKind::Standard, .. }));
    }

    #[test]
    fn empty_cells_use_the_missing_defaults() {
        let mut cells = steel_row();
        cells[schema::UNIT] = Cell::Empty;
        cells[schema::DATA_TYPE] = Cell::Empty;
        let row = InfraLcaRow::new(&cells).unwrap();

        let epd = build_epd(&row, "", &Edition::default(), provenance()).unwrap();
        assert_eq!(epd.declared_unit, Unit::Unknown);
        assert_eq!(epd.standard, Standard::Unknown);
        assert_eq!(epd.subtype, SubType::Generic);
    }

    #[test]
    fn product_requires_written_epd() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::new(dir.path());
        let cells = steel_row();
        let row = InfraLcaRow::new(&cells).unwrap();

        let err = build_product(&row, &repo, provenance()).unwrap_err();
        assert!(matches!(err, ExportError::MissingEpd { ref name, .. } if name == "Steel"));
    }

    #[test]
    fn product_copies_epd_fields() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::new(dir.path());
        let cells = steel_row();
        let row = InfraLcaRow::new(&cells).unwrap();

        let epd = build_epd(&row, "Metals", &Edition::default(), provenance()).unwrap();
        repo.write(&epd).unwrap();

        let product = build_product(&row, &repo, provenance()).unwrap();
        assert_eq!(product.id, "ec4b7bde-5716-535f-8d42-1b0ee328d9a4");
        assert_eq!(product.name, "Steel");
        assert_eq!(product.quantity, 1.0);
        assert_eq!(product.unit, Unit::Kg);
        assert_eq!(product.reference_service_life, Some(100));
        assert_eq!(product.transport, None);
        assert_eq!(product.results, None);
        assert_eq!(product.impact_data.epd(), &epd);
        assert_eq!(product.meta_data.unwrap()["category"], "Metals");
    }

    #[test]
    fn blank_transport_name_yields_no_leg() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::new(dir.path());

        let leg = build_transport(&Cell::Empty, &Cell::Number(10.0), LifeCycleStage::A4, &repo);
        assert_eq!(leg.unwrap(), None);
        let leg = build_transport(&"".into(), &Cell::Empty, LifeCycleStage::A5, &repo);
        assert_eq!(leg.unwrap(), None);
    }

    #[test]
    fn whitespace_transport_name_is_looked_up() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::new(dir.path());

        let err = build_transport(&" ".into(), &Cell::Number(10.0), LifeCycleStage::A4, &repo)
            .unwrap_err();
        assert!(matches!(err, ExportError::MissingEpd { ref name, .. } if name == " "));
    }

    #[test]
    fn product_with_unknown_transport_epd_fails() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::new(dir.path());
        let mut cells = steel_row();
        cells[schema::NAME] = "Beton".into();
        cells[schema::A4_NAME] = "Ghost Truck".into();
        cells[schema::A4_DISTANCE] = Cell::Number(5.0);
        let row = InfraLcaRow::new(&cells).unwrap();
        repo.write(&build_epd(&row, "Concrete", &Edition::default(), provenance()).unwrap())
            .unwrap();

        let err = build_product(&row, &repo, provenance()).unwrap_err();
        assert!(matches!(err, ExportError::MissingEpd { ref name, .. } if name == "Ghost Truck"));
    }

    #[test]
    fn transport_without_distance_fails() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::new(dir.path());
        let mut cells = steel_row();
        cells[schema::NAME] = "Diesel Truck".into();
        let row = InfraLcaRow::new(&cells).unwrap();
        repo.write(&build_epd(&row, "Transport", &Edition::default(), provenance()).unwrap())
            .unwrap();

        let err =
            build_transport(&"Diesel Truck".into(), &Cell::Empty, LifeCycleStage::A4, &repo)
                .unwrap_err();
        assert!(matches!(err, ExportError::Parse { field: "transport distance", .. }));
    }
}
