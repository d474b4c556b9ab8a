use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::shared::{
    Country, ImpactCategoryKey, LifeCycleStage, MetaData, Source, Standard, SubType, Unit,
};

/// Impact values per life-cycle stage and impact category.
///
/// `None` marks a pair that is part of the declaration but has no value.
pub type ImpactMatrix = BTreeMap<LifeCycleStage, BTreeMap<ImpactCategoryKey, Option<f64>>>;

/// Environmental Product Declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Epd {
    pub id: String,
    pub name: String,
    pub declared_unit: Unit,
    pub version: String,
    pub published_date: NaiveDate,
    pub valid_until: NaiveDate,
    pub format_version: String,
    pub source: Option<Source>,
    pub reference_service_life: Option<u32>,
    pub standard: Standard,
    pub comment: Option<String>,
    pub location: Country,
    pub subtype: SubType,
    pub impacts: ImpactMatrix,
    pub meta_data: Option<MetaData>,
}

impl Epd {
    /// Category the declaration was filed under, if recorded.
    pub fn category(&self) -> Option<&str> {
        self.meta_data
            .as_ref()
            .and_then(|meta| meta.get("category"))
            .map(String::as_str)
    }
}
