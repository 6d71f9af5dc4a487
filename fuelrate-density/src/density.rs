//! Density resolution: explicit value, fuel default, or failure

use serde::{Deserialize, Serialize};
use fuelrate_core::ConvertError;
use fuelrate_core::numeric::validate_positive;

use crate::FuelType;

/// Plausibility bounds for liquid fuels, in kg/L
pub const MIN_DENSITY_KG_PER_L: f64 = 0.6;
pub const MAX_DENSITY_KG_PER_L: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DensityUnit {
    #[default]
    #[serde(rename = "kg/L")]
    KgPerL,
    #[serde(rename = "kg/m3")]
    KgPerM3,
    #[serde(rename = "g/cm3")]
    GPerCm3,
}

impl DensityUnit {
    pub fn parse(token: &str) -> Result<DensityUnit, ConvertError> {
        let key = token.trim().to_lowercase().replace('³', "3").replace(' ', "");
        match key.as_str() {
            "kg/l" | "kg/litre" | "kg/liter" | "kgl" | "kg_per_l" => Ok(DensityUnit::KgPerL),
            "kg/m3" | "kg/m^3" | "kgm3" | "kg_per_m3" => Ok(DensityUnit::KgPerM3),
            "g/cm3" | "g/cm^3" | "g/cc" | "g/ml" | "g_per_cm3" => Ok(DensityUnit::GPerCm3),
            _ => Err(ConvertError::invalid_value(
                "densityUnit",
                format!("unknown density unit '{}'. Supported: kg/L, kg/m3, g/cm3", token.trim()),
            )),
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            DensityUnit::KgPerL => "kg/L",
            DensityUnit::KgPerM3 => "kg/m3",
            DensityUnit::GPerCm3 => "g/cm3",
        }
    }

    /// Express `value` in kg/L
    pub fn to_kg_per_l(&self, value: f64) -> f64 {
        match self {
            DensityUnit::KgPerL | DensityUnit::GPerCm3 => value,
            DensityUnit::KgPerM3 => value / 1000.0,
        }
    }
}

/// An explicit density as supplied by the caller
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Density {
    pub value: f64,
    pub unit: DensityUnit,
}

impl Density {
    pub fn kg_per_l(value: f64) -> Self {
        Density { value, unit: DensityUnit::KgPerL }
    }

    pub fn new(value: f64, unit: DensityUnit) -> Self {
        Density { value, unit }
    }

    /// Normalize to kg/L and range-check
    pub fn validate(&self) -> Result<f64, ConvertError> {
        let value = validate_positive(self.value, "density")?;
        let kg_per_l = self.unit.to_kg_per_l(value);
        if !(MIN_DENSITY_KG_PER_L..=MAX_DENSITY_KG_PER_L).contains(&kg_per_l) {
            return Err(ConvertError::invalid_value(
                "density",
                format!(
                    "{} {} is outside the plausible range {}-{} kg/L",
                    self.value,
                    self.unit.symbol(),
                    MIN_DENSITY_KG_PER_L,
                    MAX_DENSITY_KG_PER_L
                ),
            ));
        }
        Ok(kg_per_l)
    }
}

/// Where a resolved density came from
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DensitySource {
    Explicit,
    FuelDefault { fuel_type: FuelType },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedDensity {
    pub kg_per_l: f64,
    pub source: DensitySource,
}

impl std::fmt::Display for ResolvedDensity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.source {
            DensitySource::Explicit => write!(f, "{} kg/L", self.kg_per_l),
            DensitySource::FuelDefault { fuel_type } => {
                write!(f, "{} kg/L ({} default)", self.kg_per_l, fuel_type)
            }
        }
    }
}

/// Resolve the density for a volume/mass conversion from `from` to `to`
///
/// An explicit density wins over a fuel type. With neither, the conversion
/// fails with `DensityRequired`; no density is ever assumed.
pub fn resolve_density(
    explicit: Option<Density>,
    fuel_type: Option<FuelType>,
    from: &str,
    to: &str,
) -> Result<ResolvedDensity, ConvertError> {
    if let Some(density) = explicit {
        let kg_per_l = density.validate()?;
        tracing::debug!(kg_per_l, "using explicit density");
        return Ok(ResolvedDensity { kg_per_l, source: DensitySource::Explicit });
    }

    if let Some(fuel_type) = fuel_type {
        let kg_per_l = fuel_type.default_density();
        tracing::debug!(kg_per_l, fuel = fuel_type.code(), "using fuel default density");
        return Ok(ResolvedDensity { kg_per_l, source: DensitySource::FuelDefault { fuel_type } });
    }

    Err(ConvertError::DensityRequired {
        from: from.to_string(),
        to: to.to_string(),
        fuel_types: FuelType::codes().into_iter().map(str::to_string).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use fuelrate_core::ErrorKind;

    #[test]
    fn test_explicit_wins_over_fuel() {
        let resolved = resolve_density(Some(Density::kg_per_l(0.79)), Some(FuelType::Avgas), "L", "kg").unwrap();
        assert_eq!(resolved.kg_per_l, 0.79);
        assert_eq!(resolved.source, DensitySource::Explicit);
    }

    #[test]
    fn test_fuel_default() {
        let resolved = resolve_density(None, Some(FuelType::JetA1), "L", "kg").unwrap();
        assert_eq!(resolved.kg_per_l, 0.804);
        assert_eq!(resolved.source, DensitySource::FuelDefault { fuel_type: FuelType::JetA1 });
        assert_eq!(resolved.to_string(), "0.804 kg/L (Jet A-1 default)");
    }

    #[test]
    fn test_missing_density_is_an_error() {
        let err = resolve_density(None, None, "L", "kg").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DensityRequired);
        assert!(err.to_string().contains("jet_a1"));
    }

    #[test]
    fn test_density_units_normalize() {
        assert_eq!(Density::new(804.0, DensityUnit::KgPerM3).validate().unwrap(), 0.804);
        assert_eq!(Density::new(0.8, DensityUnit::GPerCm3).validate().unwrap(), 0.8);
        assert_eq!(DensityUnit::parse("kg/m³").unwrap(), DensityUnit::KgPerM3);
        assert_eq!(DensityUnit::parse(" KG/L ").unwrap(), DensityUnit::KgPerL);
        assert!(DensityUnit::parse("lb/gal").is_err());
    }

    #[test]
    fn test_plausibility_range() {
        assert!(Density::kg_per_l(0.5).validate().is_err());
        assert!(Density::kg_per_l(1.2).validate().is_err());
        // Forgetting the unit on a kg/m3 value is caught
        let err = Density::kg_per_l(804.0).validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidValue);
        assert!(Density::kg_per_l(-0.8).validate().is_err());
        assert!(Density::kg_per_l(f64::NAN).validate().is_err());
    }
}
