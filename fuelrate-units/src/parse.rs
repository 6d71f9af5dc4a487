//! Token parsing - compound "X/Y" tokens and "5 ft" quantity strings

use fuelrate_core::ConvertError;
use crate::UnitRegistry;

/// Split a compound token like "USD/USG" or "USD per liter"
///
/// Returns `None` when the token has no separator. Speed units such as
/// "km/h" are compound-looking, so callers resolve the whole token as a unit
/// before treating it as a rate.
pub fn split_compound(token: &str) -> Option<(&str, &str)> {
    let token = token.trim();

    if let Some((num, den)) = token.split_once('/') {
        let (num, den) = (num.trim(), den.trim());
        if !num.is_empty() && !den.is_empty() {
            return Some((num, den));
        }
        return None;
    }

    let lower = token.to_lowercase();
    if let Some(pos) = lower.find(" per ") {
        let num = token.get(..pos)?.trim();
        let den = token.get(pos + " per ".len()..)?.trim();
        if !num.is_empty() && !den.is_empty() {
            return Some((num, den));
        }
    }

    None
}

/// Split a quantity string like "5 ft" or "100kg" into number and unit text
pub fn split_quantity(s: &str) -> Result<(f64, &str), ConvertError> {
    let s = s.trim();

    // Find where the number ends and unit begins
    let mut split_pos = 0;
    let mut found_digit = false;
    let mut prev: Option<char> = None;

    for (i, c) in s.char_indices() {
        let is_number_char = c.is_ascii_digit()
            || c == '.'
            || c == ','
            || ((c == '-' || c == '+') && (i == 0 || matches!(prev, Some('e') | Some('E'))))
            || ((c == 'e' || c == 'E') && found_digit && next_is_exponent(&s[i + 1..]));

        if is_number_char {
            if c.is_ascii_digit() {
                found_digit = true;
            }
            split_pos = i + c.len_utf8();
            prev = Some(c);
        } else {
            break;
        }
    }

    if !found_digit {
        return Err(ConvertError::invalid_request(format!("no number found in: {}", s)));
    }

    let raw = &s[..split_pos];
    if raw.contains(',') && !valid_thousands_grouping(raw) {
        return Err(ConvertError::invalid_value(
            "value",
            format!("'{}' is ambiguous: use '.' for decimals and ',' only between groups of three digits", raw),
        ));
    }

    let num_str: String = raw.chars().filter(|c| *c != ',').collect();
    let unit_str = s[split_pos..].trim();

    let value: f64 = num_str
        .parse()
        .map_err(|_| ConvertError::invalid_value("value", format!("invalid number: {}", num_str)))?;

    Ok((value, unit_str))
}

/// Commas must separate the integer part into groups of three, e.g. "1,250.5"
fn valid_thousands_grouping(number: &str) -> bool {
    let unsigned = number.strip_prefix(['-', '+']).unwrap_or(number);
    let integer_end = unsigned.find(['.', 'e', 'E']).unwrap_or(unsigned.len());
    let (integer, fraction) = unsigned.split_at(integer_end);
    if fraction.contains(',') {
        return false;
    }

    let mut groups = integer.split(',');
    let lead_ok = groups.next().is_some_and(|g| (1..=3).contains(&g.len()));
    lead_ok && groups.all(|g| g.len() == 3 && g.chars().all(|c| c.is_ascii_digit()))
}

fn next_is_exponent(rest: &str) -> bool {
    let rest = rest.strip_prefix(['-', '+']).unwrap_or(rest);
    rest.chars().next().is_some_and(|c| c.is_ascii_digit())
}

impl UnitRegistry {
    /// Parse "5 ft" into a value and a canonical unit symbol
    pub fn parse_quantity(&self, s: &str) -> Result<(f64, &'static str), ConvertError> {
        let (value, unit) = split_quantity(s)?;
        let def = self.resolve(unit)?;
        Ok((value, def.symbol))
    }
}
