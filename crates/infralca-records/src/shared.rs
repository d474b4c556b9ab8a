use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Free-form metadata attached to EPDs and products (`category`, `created`, `origin`).
pub type MetaData = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    M,
    M2,
    M3,
    Kg,
    Tones,
    Pcs,
    Kwh,
    L,
    M2r1,
    Km,
    TonesKm,
    Kgm3,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Standard {
    En15804A1,
    En15804A2,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubType {
    Generic,
    Specific,
    Industry,
    Representative,
}

/// ISO 3166-1 alpha-3 location of a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Country {
    Unknown,
    Dnk,
    Deu,
    Nor,
    Swe,
}

/// Life-cycle stages as defined by EN 15804.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifeCycleStage {
    A0,
    A1a3,
    A4,
    A5,
    B1,
    B2,
    B3,
    B4,
    B5,
    B6,
    B7,
    C1,
    C2,
    C3,
    C4,
    D,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactCategoryKey {
    /// Global warming potential, total
    Gwp,
    GwpFos,
    GwpBio,
    GwpLul,
    /// Ozone depletion
    Odp,
    /// Acidification
    Ap,
    EpFw,
    EpMar,
    EpTer,
    /// Photochemical ozone creation
    Pocp,
    /// Abiotic depletion, elements
    Adpe,
    /// Abiotic depletion, fossil
    Adpf,
    /// Water deprivation
    Wdp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub name: String,
    pub url: Option<String>,
}

impl Source {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: None,
        }
    }
}
