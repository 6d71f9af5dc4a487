//! Scalar conversion between units of the same dimension

use fuelrate_core::ConvertError;
use crate::{Dimension, UnitDefinition, UnitRegistry};

fn incompatible(from: &UnitDefinition, to: &UnitDefinition) -> ConvertError {
    ConvertError::IncompatibleDimension {
        from: from.symbol.to_string(),
        to: to.symbol.to_string(),
        from_dimension: from.dimension.to_string(),
        to_dimension: to.dimension.to_string(),
        from_units: Vec::new(),
        to_units: Vec::new(),
    }
}

/// Convert between two resolved units of the same dimension
///
/// Linear dimensions go through the base factor; temperature goes through
/// Celsius by explicit formula.
pub fn convert_between(value: f64, from: &UnitDefinition, to: &UnitDefinition) -> Result<f64, ConvertError> {
    if !from.is_compatible(to) {
        return Err(incompatible(from, to));
    }
    if from.symbol == to.symbol {
        return Ok(value);
    }
    Ok(to.from_base(from.to_base(value)))
}

/// Multiplier taking a quantity in `from` to `to` (linear dimensions only)
pub fn linear_factor(from: &UnitDefinition, to: &UnitDefinition) -> Result<f64, ConvertError> {
    if !from.is_compatible(to) {
        return Err(incompatible(from, to));
    }
    match (from.to_base_factor(), to.to_base_factor()) {
        (Some(f), Some(t)) => Ok(f / t),
        _ => Err(ConvertError::invalid_request(format!(
            "{} to {} is an affine temperature conversion and has no single factor",
            from.symbol, to.symbol
        ))),
    }
}

impl UnitRegistry {
    /// Symbols of `dimension`, sorted
    fn symbols_of(&self, dimension: Dimension) -> Vec<String> {
        self.by_dimension(dimension).into_iter().map(|u| u.symbol.to_string()).collect()
    }

    /// Fill in the units of both dimensions on an incompatible-dimension error
    pub fn with_alternatives(&self, err: ConvertError, from: &UnitDefinition, to: &UnitDefinition) -> ConvertError {
        match err {
            ConvertError::IncompatibleDimension { from: f, to: t, from_dimension, to_dimension, .. } => {
                ConvertError::IncompatibleDimension {
                    from: f,
                    to: t,
                    from_dimension,
                    to_dimension,
                    from_units: self.symbols_of(from.dimension),
                    to_units: self.symbols_of(to.dimension),
                }
            }
            other => other,
        }
    }

    /// [`convert_between`] reporting the valid units on a dimension mismatch
    pub fn convert(&self, value: f64, from: &UnitDefinition, to: &UnitDefinition) -> Result<f64, ConvertError> {
        convert_between(value, from, to).map_err(|e| self.with_alternatives(e, from, to))
    }

    /// Resolve both tokens and convert `value` between them
    pub fn convert_scalar(&self, value: f64, from: &str, to: &str) -> Result<f64, ConvertError> {
        let from_def = self.resolve(from)?;
        let to_def = self.resolve(to)?;
        let result = self.convert(value, from_def, to_def)?;
        tracing::trace!(value, from = from_def.symbol, to = to_def.symbol, result, "scalar conversion");
        Ok(result)
    }

    /// Resolve both tokens and return the linear factor between them
    pub fn factor(&self, from: &str, to: &str) -> Result<f64, ConvertError> {
        let (from_def, to_def) = (self.resolve(from)?, self.resolve(to)?);
        linear_factor(from_def, to_def).map_err(|e| self.with_alternatives(e, from_def, to_def))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fuelrate_core::numeric::approx_eq;

    #[test]
    fn test_feet_to_meters() {
        let reg = UnitRegistry::new();
        let result = reg.convert_scalar(5.0, "ft", "m").unwrap();
        assert!((result - 1.524).abs() < 1e-3);
    }

    #[test]
    fn test_celsius_to_fahrenheit() {
        let reg = UnitRegistry::new();
        assert_eq!(reg.convert_scalar(25.0, "C", "F").unwrap(), 77.0);
        assert_eq!(reg.convert_scalar(0.0, "C", "F").unwrap(), 32.0);
        assert!(approx_eq(reg.convert_scalar(-40.0, "F", "C").unwrap(), -40.0, 1e-9));
        assert!(approx_eq(reg.convert_scalar(0.0, "C", "K").unwrap(), 273.15, 1e-9));
    }

    #[test]
    fn test_gallons_to_liters() {
        let reg = UnitRegistry::new();
        let result = reg.convert_scalar(2.0, "USG", "L").unwrap();
        assert!((result - 7.570824).abs() < 1e-5);
    }

    #[test]
    fn test_zero_maps_to_zero_for_linear_dimensions() {
        let reg = UnitRegistry::new();
        for dimension in Dimension::ALL.iter().filter(|d| !d.is_affine()) {
            let units = reg.by_dimension(*dimension);
            for a in &units {
                for b in &units {
                    assert_eq!(reg.convert_scalar(0.0, a.symbol, b.symbol).unwrap(), 0.0);
                }
            }
        }
    }

    #[test]
    fn test_round_trip_every_pair() {
        let reg = UnitRegistry::new();
        for dimension in Dimension::ALL {
            let units = reg.by_dimension(dimension);
            for a in &units {
                for b in &units {
                    let there = reg.convert_scalar(123.456, a.symbol, b.symbol).unwrap();
                    let back = reg.convert_scalar(there, b.symbol, a.symbol).unwrap();
                    assert!(approx_eq(back, 123.456, 1e-9), "{} -> {} -> {}: {}", a, b, a, back);
                }
            }
        }
    }

    #[test]
    fn test_incompatible_dimensions() {
        let reg = UnitRegistry::new();
        let err = reg.convert_scalar(1.0, "L", "kg").unwrap_err();
        assert_eq!(err.kind(), fuelrate_core::ErrorKind::IncompatibleDimension);

        let err = reg.convert_scalar(1.0, "ft", "C").unwrap_err();
        assert!(err.to_string().contains("length"));
    }

    #[test]
    fn test_incompatible_lists_units_of_both_dimensions() {
        let reg = UnitRegistry::new();
        match reg.convert_scalar(5.0, "L", "m").unwrap_err() {
            ConvertError::IncompatibleDimension { from_units, to_units, .. } => {
                assert!(from_units.iter().any(|u| u == "USG"));
                assert!(to_units.iter().any(|u| u == "ft"));
                assert!(!to_units.iter().any(|u| u == "L"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_factor() {
        let reg = UnitRegistry::new();
        assert!(approx_eq(reg.factor("USG", "L").unwrap(), 3.785411784, 1e-12));
        assert!(reg.factor("C", "F").is_err());
    }
}
