//! Record types for LCAx-shaped environmental data.
//!
//! The structs here mirror the JSON documents written by the InfraLCA
//! converter: one [`Epd`] per material row, one [`Product`] per material row
//! referencing that EPD, and zero or more [`Transport`] legs per product.
//! Field names serialize as camelCase and enumerations as the lowercase
//! tokens used by the LCAx format.

mod epd;
mod product;
mod shared;

pub use epd::{Epd, ImpactMatrix};
pub use product::{ImpactDataSource, Product, Results, Transport};
pub use shared::{
    Country, ImpactCategoryKey, LifeCycleStage, MetaData, Source, Standard, SubType, Unit,
};

/// Version of the record format written into every EPD.
pub const FORMAT_VERSION: &str = env!("CARGO_PKG_VERSION");
