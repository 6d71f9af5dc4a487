//! Rate-unit parsing: "USD/USG", "EUR per L", "kg/L"

use serde::Serialize;
use fuelrate_core::ConvertError;
use fuelrate_currency::CurrencyRegistry;
use fuelrate_units::{split_compound, UnitDefinition, UnitRegistry};

/// What a rate is measured in per denominator unit
#[derive(Debug, Clone, PartialEq)]
pub enum RateNumerator {
    Currency(&'static str),
    Unit(UnitDefinition),
}

impl RateNumerator {
    pub fn symbol(&self) -> &'static str {
        match self {
            RateNumerator::Currency(code) => *code,
            RateNumerator::Unit(def) => def.symbol,
        }
    }

    pub fn kind(&self) -> NumeratorKind {
        match self {
            RateNumerator::Currency(_) => NumeratorKind::Currency,
            RateNumerator::Unit(_) => NumeratorKind::Unit,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NumeratorKind {
    Currency,
    Unit,
}

/// A parsed compound unit such as "USD/USG"
#[derive(Debug, Clone, PartialEq)]
pub struct RateSpec {
    pub numerator: RateNumerator,
    pub denominator: UnitDefinition,
}

impl RateSpec {
    pub fn parse(token: &str, units: &UnitRegistry, currencies: &CurrencyRegistry) -> Result<RateSpec, ConvertError> {
        let (num, den) = split_compound(token).ok_or_else(|| {
            ConvertError::invalid_request(format!(
                "'{}' is not a rate unit; expected CUR/UNIT (e.g. USD/USG) or UNIT/UNIT",
                token.trim()
            ))
        })?;

        let numerator = parse_numerator(num, units, currencies)?;

        let denominator = units.resolve(den)?.clone();
        if denominator.to_base_factor().is_none() {
            return Err(ConvertError::invalid_request(format!(
                "'{}' cannot be a rate denominator: {} has no linear scale",
                token.trim(),
                denominator.dimension
            )));
        }

        Ok(RateSpec { numerator, denominator })
    }

    pub fn numerator_kind(&self) -> NumeratorKind {
        self.numerator.kind()
    }

    /// Canonical label, e.g. "USD/USG"
    pub fn label(&self) -> String {
        format!("{}/{}", self.numerator.symbol(), self.denominator.symbol)
    }
}

impl std::fmt::Display for RateSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label())
    }
}

fn parse_numerator(num: &str, units: &UnitRegistry, currencies: &CurrencyRegistry) -> Result<RateNumerator, ConvertError> {
    if currencies.is_currency(num) {
        return currencies.resolve(num).map(RateNumerator::Currency);
    }

    // Three letters reads as an ISO code the registry does not know
    if units.get(num).is_none() && num.len() == 3 && num.chars().all(|c| c.is_ascii_alphabetic()) {
        return currencies.resolve(num).map(RateNumerator::Currency);
    }

    let def = units.resolve(num)?;
    if def.to_base_factor().is_none() {
        return Err(ConvertError::invalid_request(format!(
            "'{}' cannot be a rate numerator: {} has no linear scale",
            num, def.dimension
        )));
    }
    Ok(RateNumerator::Unit(def.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use fuelrate_core::ErrorKind;

    fn parse(token: &str) -> Result<RateSpec, ConvertError> {
        RateSpec::parse(token, &UnitRegistry::new(), &CurrencyRegistry::new())
    }

    #[test]
    fn test_currency_rate() {
        let rate = parse("usd/gallon").unwrap();
        assert_eq!(rate.numerator, RateNumerator::Currency("USD"));
        assert_eq!(rate.denominator.symbol, "USG");
        assert_eq!(rate.label(), "USD/USG");
        assert_eq!(rate.numerator_kind(), NumeratorKind::Currency);
    }

    #[test]
    fn test_per_form_and_aliases() {
        let rate = parse("ILS per metric ton").unwrap();
        assert_eq!(rate.label(), "NIS/t");
        let rate = parse("€/litre").unwrap();
        assert_eq!(rate.label(), "EUR/L");
    }

    #[test]
    fn test_unit_ratio() {
        let rate = parse("kg/L").unwrap();
        assert_eq!(rate.numerator_kind(), NumeratorKind::Unit);
        assert_eq!(rate.label(), "kg/L");
    }

    #[test]
    fn test_errors() {
        assert_eq!(parse("USD").unwrap_err().kind(), ErrorKind::InvalidRequest);
        assert_eq!(parse("XYZ/L").unwrap_err().kind(), ErrorKind::UnsupportedCurrency);
        assert_eq!(parse("USD/furlong").unwrap_err().kind(), ErrorKind::UnknownUnit);
        assert_eq!(parse("¥/L").unwrap_err().kind(), ErrorKind::AmbiguousCurrency);
        assert_eq!(parse("USD/C").unwrap_err().kind(), ErrorKind::InvalidRequest);
        assert_eq!(parse("widgets/L").unwrap_err().kind(), ErrorKind::UnknownUnit);
    }
}
