//! Unit definitions and explicit alias tables
//!
//! Lookup is deterministic: tokens are normalized (case, whitespace, unicode
//! exponents, degree signs) and matched against a finite alias table. There
//! is no fuzzy matching; plurals and spelling variants are listed explicitly.

use std::collections::HashMap;
use fuelrate_core::ConvertError;
use crate::unit::TemperatureScale;
use crate::{Dimension, UnitDefinition};

/// Registry of all known units
///
/// Built once at start-up and shared read-only; there is no global instance.
#[derive(Debug, Clone)]
pub struct UnitRegistry {
    units: HashMap<&'static str, UnitDefinition>,
    aliases: HashMap<String, &'static str>,
}

impl UnitRegistry {
    pub fn new() -> Self {
        let mut registry = UnitRegistry {
            units: HashMap::new(),
            aliases: HashMap::new(),
        };
        registry.register_all_units();
        registry
    }

    /// Get a unit by symbol or alias
    pub fn get(&self, token: &str) -> Option<&UnitDefinition> {
        let key = normalize_unit_token(token);
        if key.is_empty() {
            return None;
        }
        self.aliases.get(&key).and_then(|symbol| self.units.get(symbol))
    }

    /// Resolve a token to its canonical definition
    pub fn resolve(&self, token: &str) -> Result<&UnitDefinition, ConvertError> {
        self.get(token).ok_or_else(|| ConvertError::UnknownUnit {
            token: token.trim().to_string(),
            known: self.symbols().into_iter().map(str::to_string).collect(),
        })
    }

    /// Units of one dimension, sorted by symbol
    pub fn by_dimension(&self, dimension: Dimension) -> Vec<&UnitDefinition> {
        let mut units: Vec<&UnitDefinition> = self.units.values()
            .filter(|u| u.dimension == dimension)
            .collect();
        units.sort_by_key(|u| u.symbol);
        units
    }

    /// All canonical symbols, sorted
    pub fn symbols(&self) -> Vec<&'static str> {
        let mut symbols: Vec<&'static str> = self.units.keys().copied().collect();
        symbols.sort_unstable();
        symbols
    }

    /// Every normalized alias that resolves to `symbol`, sorted
    pub fn aliases_of(&self, symbol: &str) -> Vec<&str> {
        let mut aliases: Vec<&str> = self.aliases.iter()
            .filter(|(_, s)| **s == symbol)
            .map(|(a, _)| a.as_str())
            .collect();
        aliases.sort_unstable();
        aliases
    }

    fn register(&mut self, unit: UnitDefinition) {
        let symbol = unit.symbol;
        self.units.insert(symbol, unit);
        self.alias(symbol, symbol);
    }

    fn alias(&mut self, alias: &str, symbol: &'static str) {
        let key = normalize_unit_token(alias);
        let previous = self.aliases.insert(key, symbol);
        debug_assert!(
            previous.is_none() || previous == Some(symbol),
            "alias '{}' maps to both {:?} and {}",
            alias,
            previous,
            symbol
        );
    }

    fn aliases(&mut self, symbol: &'static str, aliases: &[&str]) {
        for alias in aliases {
            self.alias(alias, symbol);
        }
    }

    fn register_all_units(&mut self) {
        self.register_length_units();
        self.register_volume_units();
        self.register_mass_units();
        self.register_temperature_units();
        self.register_area_units();
        self.register_speed_units();
    }

    fn register_length_units(&mut self) {
        self.register(UnitDefinition::linear("m", "meter", Dimension::Length, 1.0));
        self.register(UnitDefinition::linear("km", "kilometer", Dimension::Length, 1000.0));
        self.register(UnitDefinition::linear("cm", "centimeter", Dimension::Length, 0.01));
        self.register(UnitDefinition::linear("mm", "millimeter", Dimension::Length, 0.001));
        self.register(UnitDefinition::linear("in", "inch", Dimension::Length, 0.0254));
        self.register(UnitDefinition::linear("ft", "foot", Dimension::Length, 0.3048));
        self.register(UnitDefinition::linear("yd", "yard", Dimension::Length, 0.9144));
        self.register(UnitDefinition::linear("mi", "mile", Dimension::Length, 1609.344));
        self.register(UnitDefinition::linear("NM", "nautical mile", Dimension::Length, 1852.0));

        self.aliases("m", &["meter", "meters", "metre", "metres"]);
        self.aliases("km", &["kilometer", "kilometers", "kilometre", "kilometres"]);
        self.aliases("cm", &["centimeter", "centimeters", "centimetre", "centimetres"]);
        self.aliases("mm", &["millimeter", "millimeters", "millimetre", "millimetres"]);
        self.aliases("in", &["inch", "inches"]);
        self.aliases("ft", &["foot", "feet"]);
        self.aliases("yd", &["yard", "yards"]);
        self.aliases("mi", &["mile", "miles", "statute mile", "statute miles"]);
        self.aliases("NM", &["nmi", "nautical mile", "nautical miles"]);
    }

    fn register_volume_units(&mut self) {
        // Liter is the base: fuel is priced and uplifted per liter or gallon
        self.register(UnitDefinition::linear("L", "liter", Dimension::Volume, 1.0));
        self.register(UnitDefinition::linear("mL", "milliliter", Dimension::Volume, 0.001));
        self.register(UnitDefinition::linear("kL", "kiloliter", Dimension::Volume, 1000.0));
        self.register(UnitDefinition::linear("m3", "cubic meter", Dimension::Volume, 1000.0));
        self.register(UnitDefinition::linear("USG", "US gallon", Dimension::Volume, 3.785411784));
        self.register(UnitDefinition::linear("IG", "imperial gallon", Dimension::Volume, 4.54609));
        self.register(UnitDefinition::linear("bbl", "barrel", Dimension::Volume, 158.987294928));
        self.register(UnitDefinition::linear("qt", "US quart", Dimension::Volume, 0.946352946));
        self.register(UnitDefinition::linear("ft3", "cubic foot", Dimension::Volume, 28.316846592));

        self.aliases("L", &["liter", "liters", "litre", "litres", "ltr", "ltrs", "lt"]);
        self.aliases("mL", &["milliliter", "milliliters", "millilitre", "millilitres"]);
        self.aliases("kL", &["kiloliter", "kiloliters", "kilolitre", "kilolitres"]);
        self.aliases("m3", &["m^3", "m³", "cbm", "cubic meter", "cubic meters", "cubic metre", "cubic metres"]);
        self.aliases("USG", &[
            "gal", "gals", "gallon", "gallons", "us gallon", "us gallons",
            "us gal", "usgal",
        ]);
        self.aliases("IG", &[
            "imp gal", "impgal", "gal imp", "imp gallon", "imp gallons",
            "imperial gallon", "imperial gallons", "uk gallon", "uk gallons",
        ]);
        self.aliases("bbl", &["bbls", "barrel", "barrels"]);
        self.aliases("qt", &["quart", "quarts"]);
        self.aliases("ft3", &["ft^3", "ft³", "cu ft", "cubic foot", "cubic feet"]);
    }

    fn register_mass_units(&mut self) {
        self.register(UnitDefinition::linear("kg", "kilogram", Dimension::Mass, 1.0));
        self.register(UnitDefinition::linear("g", "gram", Dimension::Mass, 0.001));
        self.register(UnitDefinition::linear("t", "metric tonne", Dimension::Mass, 1000.0));
        self.register(UnitDefinition::linear("lb", "pound", Dimension::Mass, 0.45359237));
        self.register(UnitDefinition::linear("oz", "ounce", Dimension::Mass, 0.028349523125));
        self.register(UnitDefinition::linear("short_ton", "US short ton", Dimension::Mass, 907.18474));
        self.register(UnitDefinition::linear("long_ton", "long ton", Dimension::Mass, 1016.0469088));

        self.aliases("kg", &["kgs", "kgm", "kilo", "kilos", "kilogram", "kilograms"]);
        self.aliases("g", &["gram", "grams", "gramme", "grammes"]);
        self.aliases("t", &[
            "mt", "ton", "tons", "tonne", "tonnes", "metric ton", "metric tons",
            "metric tonne", "metric tonnes",
        ]);
        self.aliases("lb", &["lbs", "lbm", "pound", "pounds"]);
        self.aliases("oz", &["ounce", "ounces"]);
        self.aliases("short_ton", &["short ton", "short tons", "us ton", "us tons"]);
        self.aliases("long_ton", &["long ton", "long tons", "lton", "imperial ton"]);
    }

    fn register_temperature_units(&mut self) {
        self.register(UnitDefinition::temperature("C", "celsius", TemperatureScale::Celsius));
        self.register(UnitDefinition::temperature("F", "fahrenheit", TemperatureScale::Fahrenheit));
        self.register(UnitDefinition::temperature("K", "kelvin", TemperatureScale::Kelvin));
        self.register(UnitDefinition::temperature("R", "rankine", TemperatureScale::Rankine));

        self.aliases("C", &["°C", "degC", "deg c", "celsius", "centigrade"]);
        self.aliases("F", &["°F", "degF", "deg f", "fahrenheit"]);
        self.aliases("K", &["°K", "kelvin", "kelvins"]);
        self.aliases("R", &["°R", "rankine"]);
    }

    fn register_area_units(&mut self) {
        self.register(UnitDefinition::linear("m2", "square meter", Dimension::Area, 1.0));
        self.register(UnitDefinition::linear("km2", "square kilometer", Dimension::Area, 1_000_000.0));
        self.register(UnitDefinition::linear("ft2", "square foot", Dimension::Area, 0.09290304));
        self.register(UnitDefinition::linear("ha", "hectare", Dimension::Area, 10_000.0));
        self.register(UnitDefinition::linear("ac", "acre", Dimension::Area, 4046.8564224));

        self.aliases("m2", &[
            "m^2", "m²", "sqm", "sq m", "square meter", "square meters",
            "square metre", "square metres",
        ]);
        self.aliases("km2", &["km^2", "km²", "sq km", "square kilometer", "square kilometers"]);
        self.aliases("ft2", &["ft^2", "ft²", "sqft", "sq ft", "square foot", "square feet"]);
        self.aliases("ha", &["hectare", "hectares"]);
        self.aliases("ac", &["acre", "acres"]);
    }

    fn register_speed_units(&mut self) {
        self.register(UnitDefinition::linear("m/s", "meter per second", Dimension::Speed, 1.0));
        self.register(UnitDefinition::linear("km/h", "kilometer per hour", Dimension::Speed, 1000.0 / 3600.0));
        self.register(UnitDefinition::linear("mph", "mile per hour", Dimension::Speed, 0.44704));
        self.register(UnitDefinition::linear("kn", "knot", Dimension::Speed, 1852.0 / 3600.0));
        self.register(UnitDefinition::linear("ft/s", "foot per second", Dimension::Speed, 0.3048));

        self.aliases("m/s", &["mps", "meter per second", "meters per second", "metre per second", "metres per second"]);
        self.aliases("km/h", &["kph", "kmh", "km/hr", "kmph", "kilometer per hour", "kilometers per hour"]);
        self.aliases("mph", &["mi/h", "mile per hour", "miles per hour"]);
        self.aliases("kn", &["kt", "kts", "knot", "knots"]);
        self.aliases("ft/s", &["fps", "foot per second", "feet per second"]);
    }
}

impl Default for UnitRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalize a unit token for alias lookup
///
/// Lowercases, collapses whitespace, folds `_`/`-` into spaces, maps
/// unicode and caret exponents to digits, and drops degree signs.
pub fn normalize_unit_token(token: &str) -> String {
    let mut out = token.trim().to_lowercase();
    out = out.replace('³', "3").replace('²', "2").replace("^3", "3").replace("^2", "2");
    out = out.replace('°', "").replace('º', "");
    out = out.replace(['_', '-'], " ");
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}
