//! Record identifiers.
//!
//! EPD and product ids are UUID v5 over `NAMESPACE_URL` and the material name,
//! so a record file can be found again from the name alone.

use uuid::Uuid;

/// Appended to a material name to derive its product id.
pub const PRODUCT_SUFFIX: &str = "_product";

pub fn derive_id(value: &str) -> String {
    Uuid::new_v5(&Uuid::NAMESPACE_URL, value.as_bytes()).to_string()
}

pub fn epd_id(name: &str) -> String {
    derive_id(name)
}

pub fn product_id(name: &str) -> String {
    derive_id(&format!("{name}{PRODUCT_SUFFIX}"))
}

/// Transport legs get a fresh random id on every export.
pub fn transport_id() -> String {
    Uuid::new_v4().to_string()
}
