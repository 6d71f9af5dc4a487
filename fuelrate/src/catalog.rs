//! Introspection of the registries for tool listings and suggestions

use serde::Serialize;
use fuelrate_core::ConvertError;
use fuelrate_density::FuelType;
use fuelrate_units::Dimension;

use crate::engine::ConversionEngine;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitSummary {
    pub symbol: &'static str,
    pub name: &'static str,
    pub dimension: Dimension,
    pub aliases: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencySummary {
    pub code: &'static str,
    pub name: &'static str,
    pub aliases: Vec<&'static str>,
    pub symbols: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelSummary {
    pub code: &'static str,
    pub name: &'static str,
    pub density_kg_per_l: f64,
    pub aliases: Vec<&'static str>,
}

/// Parse a dimension filter such as "volume"
pub fn parse_dimension(name: &str) -> Result<Dimension, ConvertError> {
    Dimension::parse(name).ok_or_else(|| {
        let known: Vec<&str> = Dimension::ALL.iter().map(|d| d.name()).collect();
        ConvertError::invalid_value("dimension", format!("'{}' is not one of {}", name.trim(), known.join(", ")))
    })
}

impl ConversionEngine {
    /// Units grouped by dimension, optionally filtered to one
    pub fn list_units(&self, dimension: Option<Dimension>) -> Vec<UnitSummary> {
        let dimensions: Vec<Dimension> = match dimension {
            Some(d) => vec![d],
            None => Dimension::ALL.to_vec(),
        };

        dimensions
            .into_iter()
            .flat_map(|d| self.units().by_dimension(d))
            .map(|def| UnitSummary {
                symbol: def.symbol,
                name: def.name,
                dimension: def.dimension,
                aliases: self.units().aliases_of(def.symbol).into_iter().map(str::to_string).collect(),
            })
            .collect()
    }

    /// Other units of `symbol`'s dimension, empty for unknown symbols
    pub fn related_units(&self, symbol: &str) -> Vec<&'static str> {
        match self.units().get(symbol) {
            Some(def) => self.units().by_dimension(def.dimension).into_iter().map(|u| u.symbol).collect(),
            None => Vec::new(),
        }
    }

    pub fn list_currencies(&self) -> Vec<CurrencySummary> {
        self.currencies()
            .all()
            .iter()
            .map(|c| CurrencySummary {
                code: c.iso_code,
                name: c.name,
                aliases: c.aliases.to_vec(),
                symbols: c.symbols.to_vec(),
            })
            .collect()
    }

    pub fn list_fuel_types(&self) -> Vec<FuelSummary> {
        FuelType::all_data()
            .iter()
            .map(|f| FuelSummary {
                code: f.code,
                name: f.name,
                density_kg_per_l: f.density_kg_per_l,
                aliases: f.aliases.to_vec(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use fuelrate_currency::DisabledRateProvider;

    fn engine() -> ConversionEngine {
        ConversionEngine::with_rate_provider(Arc::new(DisabledRateProvider::default()))
    }

    #[test]
    fn test_list_units_filtered() {
        let units = engine().list_units(Some(Dimension::Volume));
        assert!(!units.is_empty());
        assert!(units.iter().all(|u| u.dimension == Dimension::Volume));

        let usg = units.iter().find(|u| u.symbol == "USG").unwrap();
        assert!(usg.aliases.iter().any(|a| a == "gallon"));
    }

    #[test]
    fn test_list_units_covers_every_dimension() {
        let units = engine().list_units(None);
        for dimension in Dimension::ALL {
            assert!(units.iter().any(|u| u.dimension == dimension), "missing {}", dimension);
        }
    }

    #[test]
    fn test_related_units() {
        let related = engine().related_units("ft");
        assert!(related.contains(&"m"));
        assert!(!related.contains(&"L"));
        assert!(engine().related_units("furlong").is_empty());
    }

    #[test]
    fn test_list_currencies_and_fuels() {
        let engine = engine();
        let currencies = engine.list_currencies();
        assert_eq!(currencies.len(), 10);
        assert!(currencies.iter().any(|c| c.code == "NIS" && c.aliases.contains(&"ILS")));

        let fuels = engine.list_fuel_types();
        let jet = fuels.iter().find(|f| f.code == "jet_a1").unwrap();
        assert_eq!(jet.density_kg_per_l, 0.804);
    }

    #[test]
    fn test_parse_dimension() {
        assert_eq!(parse_dimension(" Volume ").unwrap(), Dimension::Volume);
        assert_eq!(parse_dimension("energy").unwrap_err().kind(), fuelrate_core::ErrorKind::InvalidValue);
    }
}
