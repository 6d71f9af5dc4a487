//! Free-text request parser
//!
//! Accepts the phrasings a user types or an agent forwards:
//!
//! - `5 ft to m`, `25 °C in F`, `2 USG -> L`
//! - `100 USD to EUR`, `$100 to EUR`
//! - `2.3 USD/USG to EUR/L`, `2.3 USD per USG into EUR per L`
//! - `4 USD for 2 gallons to NIS/L` (ratio quote)
//! - trailers: `of|for <fuel type>`, `[with|at] density <value> [unit]`

use fuelrate_core::ConvertError;
use fuelrate_currency::CurrencyRegistry;
use fuelrate_density::{DensityUnit, FuelType};
use fuelrate_units::{split_quantity, UnitRegistry};

use crate::request::{
    is_rate_token, CompoundRateConversion, ConversionRequest, DensityContext, UnitConversion,
};

/// Separators between source and target, in priority order
const SEPARATORS: &[&str] = &[" to ", " into ", " -> ", "->", " => ", " in ", " as "];

/// Parse free text into a request
pub fn parse_request(input: &str, units: &UnitRegistry, currencies: &CurrencyRegistry) -> Result<ConversionRequest, ConvertError> {
    let text = input.trim().trim_end_matches(['?', '.', '!']).trim();
    let text = strip_command(text);
    if text.is_empty() {
        return Err(ConvertError::invalid_request("empty conversion request"));
    }

    let (text, explicit_density) = take_density(text)?;
    let (left, right) = split_source_target(text)?;

    let (left, fuel_left) = take_fuel(left);
    let (right, fuel_right) = take_fuel(right);
    let fuel_type = fuel_left.or(fuel_right);

    let density = DensityContext {
        density: explicit_density.map(|(value, _)| value),
        density_unit: explicit_density.map(|(_, unit)| unit),
        fuel_type,
    };

    let (quote, per) = split_ratio(left);
    let (value, source) = split_source(quote, currencies)?;
    let target = right.trim();
    if target.is_empty() {
        return Err(ConvertError::invalid_request(format!("no target unit in '{}'", input.trim())));
    }

    tracing::trace!(value, source, target, "parsed free-text request");

    if let Some(per) = per {
        let (quantity, per_unit) = split_quantity(per)?;
        if per_unit.is_empty() {
            return Err(ConvertError::invalid_request(format!("missing unit after 'for' in '{}'", input.trim())));
        }
        return Ok(ConversionRequest::CompoundRate(CompoundRateConversion {
            value,
            from_rate_unit: format!("{}/{}", source, per_unit),
            to_rate_unit: target.to_string(),
            per_quantity: Some(quantity),
            density,
        }));
    }

    if is_rate_token(source, units) || is_rate_token(target, units) {
        return Ok(ConversionRequest::CompoundRate(CompoundRateConversion {
            value,
            from_rate_unit: source.to_string(),
            to_rate_unit: target.to_string(),
            per_quantity: None,
            density,
        }));
    }

    let source_is_currency = looks_like_currency(source, units, currencies);
    let target_is_currency = looks_like_currency(target, units, currencies);

    match (source_is_currency, target_is_currency) {
        (true, true) => Ok(ConversionRequest::currency(value, source, target)),
        (false, false) => Ok(ConversionRequest::Unit(UnitConversion {
            value,
            from_unit: source.to_string(),
            to_unit: target.to_string(),
            density,
        })),
        _ => Err(ConvertError::invalid_request(format!(
            "cannot convert between a currency and a physical unit ({} to {})",
            source, target
        ))),
    }
}

/// A known currency, or an unknown three-letter code that reads as one
fn looks_like_currency(token: &str, units: &UnitRegistry, currencies: &CurrencyRegistry) -> bool {
    if units.get(token).is_some() {
        return false;
    }
    currencies.is_currency(token) || (token.len() == 3 && token.chars().all(|c| c.is_ascii_alphabetic()))
}

/// ASCII case-insensitive search for an ASCII keyword
fn find_keyword(haystack: &str, keyword: &str) -> Option<usize> {
    haystack.char_indices().map(|(i, _)| i).find(|&i| {
        haystack
            .get(i..i + keyword.len())
            .is_some_and(|window| window.eq_ignore_ascii_case(keyword))
    })
}

/// Drop a leading "convert" / "what is"
fn strip_command(text: &str) -> &str {
    for prefix in ["convert ", "what is ", "what's ", "how much is "] {
        if text.get(..prefix.len()).is_some_and(|p| p.eq_ignore_ascii_case(prefix)) {
            return text[prefix.len()..].trim_start();
        }
    }
    text
}

/// Remove a `[with|at] density <value> [unit]` clause
fn take_density(text: &str) -> Result<(&str, Option<(f64, DensityUnit)>), ConvertError> {
    let Some(pos) = find_keyword(text, " density ") else {
        return Ok((text, None));
    };

    let clause = text[pos + " density ".len()..].trim();
    let (value, rest) = split_quantity(clause)?;

    // The unit, if any, is the first word; anything after stays in the request
    let (unit_word, remainder) = match rest.split_once(char::is_whitespace) {
        Some((word, tail)) => (word, tail.trim()),
        None => (rest, ""),
    };
    let (unit, consumed_unit) = if unit_word.is_empty() {
        (DensityUnit::KgPerL, true)
    } else {
        match DensityUnit::parse(unit_word) {
            Ok(unit) => (unit, true),
            Err(_) => (DensityUnit::KgPerL, false),
        }
    };
    if !consumed_unit || !remainder.is_empty() {
        return Err(ConvertError::invalid_request(format!(
            "density clause must come last and take a kg/L, kg/m3 or g/cm3 unit, got '{}'",
            rest
        )));
    }

    let mut head = text[..pos].trim_end().trim_end_matches(',').trim_end();
    for joiner in [" with", " at", " using"] {
        if head.len() >= joiner.len()
            && head.get(head.len() - joiner.len()..).is_some_and(|t| t.eq_ignore_ascii_case(joiner))
        {
            head = head[..head.len() - joiner.len()].trim_end();
            break;
        }
    }

    Ok((head, Some((value, unit))))
}

fn split_source_target(text: &str) -> Result<(&str, &str), ConvertError> {
    for separator in SEPARATORS {
        if let Some(pos) = find_keyword(text, separator) {
            let left = text[..pos].trim();
            let right = text[pos + separator.len()..].trim();
            if !left.is_empty() && !right.is_empty() {
                return Ok((left, right));
            }
        }
    }
    Err(ConvertError::invalid_request(format!(
        "expected '<value> <unit> to <unit>', got '{}'",
        text
    )))
}

/// Remove a trailing `of <fuel>` / `for <fuel>` when the tail names a fuel
fn take_fuel(text: &str) -> (&str, Option<FuelType>) {
    for keyword in [" of ", " for "] {
        if let Some(pos) = find_keyword(text, keyword) {
            let tail = &text[pos + keyword.len()..];
            if let Some(fuel) = FuelType::lookup(tail) {
                return (text[..pos].trim(), Some(fuel));
            }
        }
    }
    (text, None)
}

/// "4 USD for 2 gallons" -> ("4 USD", Some("2 gallons"))
fn split_ratio(text: &str) -> (&str, Option<&str>) {
    match find_keyword(text, " for ") {
        Some(pos) => (text[..pos].trim(), Some(text[pos + " for ".len()..].trim())),
        None => (text, None),
    }
}

/// Value and source token, allowing a leading currency symbol ("$100")
fn split_source<'a>(text: &'a str, currencies: &CurrencyRegistry) -> Result<(f64, &'a str), ConvertError> {
    let number_start = text
        .char_indices()
        .find(|(_, c)| c.is_ascii_digit() || *c == '-' || *c == '+' || *c == '.')
        .map(|(i, _)| i)
        .unwrap_or(text.len());

    if number_start > 0 {
        let prefix = text[..number_start].trim();
        if currencies.is_currency(prefix) {
            let (value, rest) = split_quantity(&text[number_start..])?;
            if !rest.is_empty() {
                return Err(ConvertError::invalid_request(format!(
                    "unexpected '{}' after {}{}",
                    rest, prefix, value
                )));
            }
            return Ok((value, prefix));
        }
    }

    let (value, source) = split_quantity(text)?;
    if source.is_empty() {
        return Err(ConvertError::invalid_request(format!("no source unit in '{}'", text)));
    }
    Ok((value, source))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Result<ConversionRequest, ConvertError> {
        parse_request(input, &UnitRegistry::new(), &CurrencyRegistry::new())
    }

    #[test]
    fn test_unit_requests() {
        assert_eq!(parse("5 ft to m").unwrap(), ConversionRequest::unit(5.0, "ft", "m"));
        assert_eq!(parse("Convert 25 °C in F?").unwrap(), ConversionRequest::unit(25.0, "°C", "F"));
        assert_eq!(parse("2 USG -> L").unwrap(), ConversionRequest::unit(2.0, "USG", "L"));
        assert_eq!(parse("100 km/h into kn").unwrap(), ConversionRequest::unit(100.0, "km/h", "kn"));
    }

    #[test]
    fn test_inches_are_not_a_separator_when_to_is_present() {
        assert_eq!(parse("12 in to cm").unwrap(), ConversionRequest::unit(12.0, "in", "cm"));
    }

    #[test]
    fn test_currency_requests() {
        assert_eq!(parse("100 USD to EUR").unwrap(), ConversionRequest::currency(100.0, "USD", "EUR"));
        assert_eq!(parse("$100 to EUR").unwrap(), ConversionRequest::currency(100.0, "$", "EUR"));
        assert_eq!(parse("what is 50 € in NIS").unwrap(), ConversionRequest::currency(50.0, "€", "NIS"));
    }

    #[test]
    fn test_unknown_iso_code_reads_as_currency() {
        assert_eq!(parse("100 XYZ to USD").unwrap(), ConversionRequest::currency(100.0, "XYZ", "USD"));
    }

    #[test]
    fn test_rate_requests() {
        assert_eq!(parse("2.3 USD/USG to EUR/L").unwrap(), ConversionRequest::rate(2.3, "USD/USG", "EUR/L"));
        assert_eq!(
            parse("2.3 USD per USG into EUR per L").unwrap(),
            ConversionRequest::rate(2.3, "USD per USG", "EUR per L")
        );
    }

    #[test]
    fn test_ratio_quote() {
        let req = parse("4 USD for 2 gallons to NIS/L").unwrap();
        assert_eq!(req, ConversionRequest::rate(4.0, "USD/gallons", "NIS/L").per_quantity(2.0));
    }

    #[test]
    fn test_fuel_trailer() {
        let req = parse("1000 L of Jet A-1 to kg").unwrap();
        match req {
            ConversionRequest::Unit(r) => {
                assert_eq!(r.from_unit, "L");
                assert_eq!(r.density.fuel_type, Some(FuelType::JetA1));
            }
            other => panic!("unexpected request: {:?}", other),
        }

        let req = parse("2.3 USD/USG to USD/MT for avgas").unwrap();
        match req {
            ConversionRequest::CompoundRate(r) => {
                assert_eq!(r.to_rate_unit, "USD/MT");
                assert_eq!(r.density.fuel_type, Some(FuelType::Avgas));
            }
            other => panic!("unexpected request: {:?}", other),
        }
    }

    #[test]
    fn test_density_trailer() {
        let req = parse("1000 L to kg with density 0.79").unwrap();
        match req {
            ConversionRequest::Unit(r) => {
                assert_eq!(r.to_unit, "kg");
                assert_eq!(r.density.density, Some(0.79));
                assert_eq!(r.density.density_unit, Some(DensityUnit::KgPerL));
            }
            other => panic!("unexpected request: {:?}", other),
        }

        let req = parse("1000 L to kg, density 790 kg/m3").unwrap();
        match req {
            ConversionRequest::Unit(r) => {
                assert_eq!(r.to_unit, "kg");
                assert_eq!(r.density.density_unit, Some(DensityUnit::KgPerM3));
            }
            other => panic!("unexpected request: {:?}", other),
        }
    }

    #[test]
    fn test_rejects_malformed_text() {
        assert!(parse("").is_err());
        assert!(parse("five feet to meters").is_err());
        assert!(parse("5 ft").is_err());
        assert!(parse("100 USD to L").is_err());
        assert!(parse("100 EUR to USG").is_err());
        assert!(parse("1000 L to kg density 0.8 furlongs").is_err());
    }
}
