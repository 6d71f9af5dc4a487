//! Known aviation fuel types and their reference densities

use serde::{Deserialize, Serialize};
use fuelrate_core::ConvertError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FuelType {
    #[serde(rename = "jet_a1")]
    JetA1,
    JetA,
    Avgas,
}

/// Fuel table entry (kg per litre at standard conditions)
#[derive(Debug, Clone, Serialize)]
pub struct FuelData {
    pub fuel: FuelType,
    pub code: &'static str,
    pub name: &'static str,
    pub density_kg_per_l: f64,
    pub aliases: &'static [&'static str],
}

static FUELS: &[FuelData] = &[
    FuelData { fuel: FuelType::JetA1, code: "jet_a1", name: "Jet A-1", density_kg_per_l: 0.804,
        aliases: &["jet a-1", "jet a1", "jeta1", "jet-a1", "jet a 1", "jet fuel", "jet", "avtur", "jp-1"] },
    FuelData { fuel: FuelType::JetA, code: "jet_a", name: "Jet A", density_kg_per_l: 0.82,
        aliases: &["jet a", "jeta", "jet-a"] },
    FuelData { fuel: FuelType::Avgas, code: "avgas", name: "Avgas", density_kg_per_l: 0.72,
        aliases: &["avgas 100ll", "100ll", "100 ll", "aviation gasoline", "av gas"] },
];

fn normalize_fuel(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .replace('_', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

impl FuelType {
    pub const ALL: [FuelType; 3] = [FuelType::JetA1, FuelType::JetA, FuelType::Avgas];

    pub fn data(&self) -> &'static FuelData {
        match self {
            FuelType::JetA1 => &FUELS[0],
            FuelType::JetA => &FUELS[1],
            FuelType::Avgas => &FUELS[2],
        }
    }

    pub fn code(&self) -> &'static str {
        self.data().code
    }

    pub fn name(&self) -> &'static str {
        self.data().name
    }

    /// Reference density in kg/L
    pub fn default_density(&self) -> f64 {
        self.data().density_kg_per_l
    }

    /// Look up a fuel type by code, name or alias
    pub fn lookup(token: &str) -> Option<FuelType> {
        let key = normalize_fuel(token);
        FUELS.iter()
            .find(|f| {
                normalize_fuel(f.code) == key
                    || normalize_fuel(f.name) == key
                    || f.aliases.iter().any(|a| normalize_fuel(a) == key)
            })
            .map(|f| f.fuel)
    }

    /// Like [`FuelType::lookup`] but reports unknown names
    pub fn parse(token: &str) -> Result<FuelType, ConvertError> {
        Self::lookup(token).ok_or_else(|| {
            ConvertError::invalid_value(
                "fuelType",
                format!("unknown fuel type '{}'. Supported: {}", token.trim(), Self::codes().join(", ")),
            )
        })
    }

    pub fn codes() -> Vec<&'static str> {
        FUELS.iter().map(|f| f.code).collect()
    }

    pub fn all_data() -> &'static [FuelData] {
        FUELS
    }
}

impl std::fmt::Display for FuelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_densities() {
        assert_eq!(FuelType::JetA1.default_density(), 0.804);
        assert_eq!(FuelType::JetA.default_density(), 0.82);
        assert_eq!(FuelType::Avgas.default_density(), 0.72);
    }

    #[test]
    fn test_lookup_variants() {
        assert_eq!(FuelType::lookup("Jet A-1"), Some(FuelType::JetA1));
        assert_eq!(FuelType::lookup("jet_a1"), Some(FuelType::JetA1));
        assert_eq!(FuelType::lookup("JET A"), Some(FuelType::JetA));
        assert_eq!(FuelType::lookup(" 100LL "), Some(FuelType::Avgas));
        assert_eq!(FuelType::lookup("diesel"), None);
    }

    #[test]
    fn test_parse_unknown_lists_codes() {
        let err = FuelType::parse("diesel").unwrap_err();
        assert!(err.to_string().contains("jet_a1, jet_a, avgas"));
    }

    #[test]
    fn test_serde_codes_match_table() {
        for fuel in FuelType::ALL {
            let json = serde_json::to_value(fuel).unwrap();
            assert_eq!(json, fuel.code());
        }
    }

    #[test]
    fn test_table_order_matches_data() {
        for fuel in FuelType::ALL {
            assert_eq!(fuel.data().fuel, fuel);
        }
    }
}
