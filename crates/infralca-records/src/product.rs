use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::epd::Epd;
use crate::shared::{ImpactCategoryKey, LifeCycleStage, MetaData, Unit};

/// Calculated results per impact category and life-cycle stage.
pub type Results = BTreeMap<ImpactCategoryKey, BTreeMap<LifeCycleStage, Option<f64>>>;

/// Where a product or transport leg takes its impact data from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ImpactDataSource {
    Epd(Box<Epd>),
}

impl ImpactDataSource {
    pub fn epd(&self) -> &Epd {
        match self {
            Self::Epd(epd) => epd,
        }
    }
}

impl From<Epd> for ImpactDataSource {
    fn from(epd: Epd) -> Self {
        Self::Epd(Box::new(epd))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub reference_service_life: Option<u32>,
    pub impact_data: ImpactDataSource,
    pub quantity: f64,
    pub unit: Unit,
    pub transport: Option<Vec<Transport>>,
    pub results: Option<Results>,
    pub meta_data: Option<MetaData>,
}

/// A distance-based transport leg (A4 or A5) backed by a transport EPD.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transport {
    pub id: String,
    pub name: String,
    pub life_cycle_stages: Vec<LifeCycleStage>,
    pub distance: f64,
    pub distance_unit: Unit,
    pub impact_data: ImpactDataSource,
}

impl Product {
    pub fn transports(&self) -> &[Transport] {
        self.transport.as_deref().unwrap_or_default()
    }
}
