//! Volume/mass bridge
//!
//! `mass_kg = volume_L * density_kg_per_L` and its inverse. Volume units are
//! based on litres and mass units on kilograms, so both sides go through
//! their dimension base first.

use fuelrate_core::ConvertError;
use fuelrate_units::{Dimension, UnitDefinition};

/// True when `from` and `to` straddle volume and mass
pub fn needs_density(from: &UnitDefinition, to: &UnitDefinition) -> bool {
    from.dimension.is_density_bridge(&to.dimension)
}

/// Convert a quantity between a volume unit and a mass unit
pub fn convert_with_density(
    value: f64,
    from: &UnitDefinition,
    to: &UnitDefinition,
    density_kg_per_l: f64,
) -> Result<f64, ConvertError> {
    match (from.dimension, to.dimension) {
        (Dimension::Volume, Dimension::Mass) => {
            let litres = from.to_base(value);
            Ok(to.from_base(litres * density_kg_per_l))
        }
        (Dimension::Mass, Dimension::Volume) => {
            let kilograms = from.to_base(value);
            Ok(to.from_base(kilograms / density_kg_per_l))
        }
        _ => Err(ConvertError::IncompatibleDimension {
            from: from.symbol.to_string(),
            to: to.symbol.to_string(),
            from_dimension: from.dimension.to_string(),
            to_dimension: to.dimension.to_string(),
            from_units: Vec::new(),
            to_units: Vec::new(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fuelrate_core::numeric::approx_eq;
    use fuelrate_units::UnitRegistry;

    #[test]
    fn test_litres_to_kilograms() {
        let reg = UnitRegistry::new();
        let kg = convert_with_density(1000.0, reg.resolve("L").unwrap(), reg.resolve("kg").unwrap(), 0.8).unwrap();
        assert!(approx_eq(kg, 800.0, 1e-9));
    }

    #[test]
    fn test_metric_ton_to_gallons() {
        let reg = UnitRegistry::new();
        let usg = convert_with_density(1.0, reg.resolve("MT").unwrap(), reg.resolve("USG").unwrap(), 0.804).unwrap();
        // 1000 kg / 0.804 kg/L = 1243.78 L = 328.57 USG
        assert!(approx_eq(usg, 1000.0 / 0.804 / 3.785411784, 1e-9));
    }

    #[test]
    fn test_round_trip() {
        let reg = UnitRegistry::new();
        let (bbl, lb) = (reg.resolve("bbl").unwrap(), reg.resolve("lb").unwrap());
        let mass = convert_with_density(3.0, bbl, lb, 0.82).unwrap();
        let back = convert_with_density(mass, lb, bbl, 0.82).unwrap();
        assert!(approx_eq(back, 3.0, 1e-12));
    }

    #[test]
    fn test_rejects_other_dimensions() {
        let reg = UnitRegistry::new();
        assert!(convert_with_density(1.0, reg.resolve("L").unwrap(), reg.resolve("m").unwrap(), 0.8).is_err());
        assert!(!needs_density(reg.resolve("L").unwrap(), reg.resolve("USG").unwrap()));
        assert!(needs_density(reg.resolve("kg").unwrap(), reg.resolve("IG").unwrap()));
    }
}
