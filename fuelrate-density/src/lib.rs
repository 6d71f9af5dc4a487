//! fuelrate Density - Fuel densities for volume-to-mass conversions
//!
//! Volume and mass are separate dimensions; they are only convertible
//! through a density in kg/L. The density is either given explicitly or
//! taken from a known aviation fuel type. There is no fallback: a missing
//! density is an error.

mod fuel;
mod density;
mod bridge;

pub use fuel::{FuelData, FuelType};
pub use density::{
    resolve_density, Density, DensitySource, DensityUnit, ResolvedDensity, MAX_DENSITY_KG_PER_L,
    MIN_DENSITY_KG_PER_L,
};
pub use bridge::{convert_with_density, needs_density};
