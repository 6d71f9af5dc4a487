//! Unit representation with conversion to the dimension's base unit

use std::fmt;
use serde::Serialize;
use crate::Dimension;

/// Temperature scales, converted through Celsius by explicit formula
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureScale {
    Celsius,
    Fahrenheit,
    Kelvin,
    Rankine,
}

impl TemperatureScale {
    pub fn to_celsius(&self, value: f64) -> f64 {
        match self {
            TemperatureScale::Celsius => value,
            TemperatureScale::Fahrenheit => (value - 32.0) * 5.0 / 9.0,
            TemperatureScale::Kelvin => value - 273.15,
            TemperatureScale::Rankine => (value - 491.67) * 5.0 / 9.0,
        }
    }

    pub fn from_celsius(&self, celsius: f64) -> f64 {
        match self {
            TemperatureScale::Celsius => celsius,
            TemperatureScale::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
            TemperatureScale::Kelvin => celsius + 273.15,
            TemperatureScale::Rankine => (celsius + 273.15) * 9.0 / 5.0,
        }
    }
}

/// How a unit maps onto its dimension's base unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Scale {
    /// value_base = value * factor
    Linear { factor: f64 },
    /// Affine temperature scale
    Temperature { scale: TemperatureScale },
}

/// A canonical unit: symbol, dimension and conversion to base
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitDefinition {
    /// Canonical symbol (e.g. "USG", "L", "kg")
    pub symbol: &'static str,
    /// Human-readable name (e.g. "US gallon")
    pub name: &'static str,
    pub dimension: Dimension,
    pub scale: Scale,
}

impl UnitDefinition {
    pub const fn linear(symbol: &'static str, name: &'static str, dimension: Dimension, factor: f64) -> Self {
        UnitDefinition {
            symbol,
            name,
            dimension,
            scale: Scale::Linear { factor },
        }
    }

    pub const fn temperature(symbol: &'static str, name: &'static str, scale: TemperatureScale) -> Self {
        UnitDefinition {
            symbol,
            name,
            dimension: Dimension::Temperature,
            scale: Scale::Temperature { scale },
        }
    }

    /// Factor to the base unit, `None` for affine temperature scales
    pub fn to_base_factor(&self) -> Option<f64> {
        match self.scale {
            Scale::Linear { factor } => Some(factor),
            Scale::Temperature { .. } => None,
        }
    }

    pub fn is_compatible(&self, other: &UnitDefinition) -> bool {
        self.dimension == other.dimension
    }

    /// Convert a value in this unit to the dimension's base unit
    pub fn to_base(&self, value: f64) -> f64 {
        match self.scale {
            Scale::Linear { factor } => value * factor,
            Scale::Temperature { scale } => scale.to_celsius(value),
        }
    }

    /// Convert a value in the base unit to this unit
    pub fn from_base(&self, value: f64) -> f64 {
        match self.scale {
            Scale::Linear { factor } => value / factor,
            Scale::Temperature { scale } => scale.from_celsius(value),
        }
    }
}

impl fmt::Display for UnitDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn liter() -> UnitDefinition {
        UnitDefinition::linear("L", "liter", Dimension::Volume, 1.0)
    }

    fn usg() -> UnitDefinition {
        UnitDefinition::linear("USG", "US gallon", Dimension::Volume, 3.785411784)
    }

    #[test]
    fn test_linear_round_trip() {
        let g = usg();
        assert_eq!(g.to_base(1.0), 3.785411784);
        assert!((g.from_base(g.to_base(12.5)) - 12.5).abs() < 1e-12);
        assert!(g.is_compatible(&liter()));
    }

    #[test]
    fn test_temperature_is_not_a_ratio() {
        let f = UnitDefinition::temperature("F", "fahrenheit", TemperatureScale::Fahrenheit);
        assert_eq!(f.to_base_factor(), None);
        assert_eq!(f.from_base(0.0), 32.0);
        assert_eq!(f.from_base(100.0), 212.0);
    }

    #[test]
    fn test_kelvin_and_rankine() {
        assert!((TemperatureScale::Kelvin.to_celsius(273.15)).abs() < 1e-12);
        assert!((TemperatureScale::Rankine.from_celsius(0.0) - 491.67).abs() < 1e-9);
    }
}
