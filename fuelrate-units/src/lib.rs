//! fuelrate Units - Unit registry and scalar conversion
//!
//! Canonical unit definitions with explicit alias tables, grouped by
//! dimension. Conversion is only valid within a dimension; volume and mass
//! are bridged elsewhere, through a density.
//!
//! Dimensions:
//! - Length (m, km, ft, NM, etc.)
//! - Volume (L, USG, IG, bbl, m3, etc.)
//! - Mass (kg, t, lb, etc.)
//! - Temperature (C, F, K, R) - affine, converted by formula
//! - Area (m2, ft2, ha, ac)
//! - Speed (m/s, km/h, mph, kn)

mod dimension;
mod unit;
mod units;
mod convert;
mod parse;

pub use dimension::Dimension;
pub use unit::{Scale, TemperatureScale, UnitDefinition};
pub use units::{normalize_unit_token, UnitRegistry};
pub use convert::{convert_between, linear_factor};
pub use parse::{split_compound, split_quantity};
