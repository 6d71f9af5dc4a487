//! Numeric helpers: rounding, display formatting, input validation

use crate::ConvertError;

/// Decimal places kept on every monetary output
pub const MONEY_DECIMALS: u32 = 6;

/// Default display precision for physical-unit results
pub const DEFAULT_SIGNIFICANT_FIGURES: u32 = 6;

/// Round to a fixed number of decimal places
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let scale = 10_f64.powi(decimals as i32);
    (value * scale).round() / scale
}

/// Round a monetary amount or currency-bearing rate
pub fn round_money(value: f64) -> f64 {
    round_to(value, MONEY_DECIMALS)
}

/// Format with a number of significant figures, switching to scientific
/// notation for very large or very small magnitudes. Trailing zeros are
/// dropped so `1.524` does not print as `1.52400`.
pub fn format_significant(value: f64, sigfigs: u32) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() {
        return value.to_string();
    }

    let sigfigs = sigfigs.max(1) as usize;
    let mut exp = value.abs().log10().floor() as i32;

    // Rounding can carry into the next power of ten (9.9996 -> 10.0)
    let scale = 10_f64.powi(sigfigs as i32 - 1);
    if ((value.abs() / 10_f64.powi(exp)) * scale).round() / scale >= 10.0 {
        exp += 1;
    }

    if (-3..=4).contains(&exp) {
        let decimal_places = if exp >= 0 {
            (sigfigs as i32 - exp - 1).max(0) as usize
        } else {
            sigfigs + (-exp - 1) as usize
        };
        trim_zeros(format!("{:.prec$}", value, prec = decimal_places))
    } else {
        let mantissa = value / 10_f64.powi(exp);
        let mantissa = trim_zeros(format!("{:.prec$}", mantissa, prec = sigfigs - 1));
        format!("{}e{}", mantissa, exp)
    }
}

/// Format a monetary value with up to six decimals
pub fn format_money(value: f64) -> String {
    trim_zeros(format!("{:.prec$}", round_money(value), prec = MONEY_DECIMALS as usize))
}

fn trim_zeros(s: String) -> String {
    if !s.contains('.') {
        return s;
    }
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Reject NaN and infinities
pub fn validate_finite(value: f64, field: &str) -> Result<f64, ConvertError> {
    if !value.is_finite() {
        return Err(ConvertError::invalid_value(field, format!("must be a finite number, got {}", value)));
    }
    Ok(value)
}

/// Reject non-finite, zero and negative values
pub fn validate_positive(value: f64, field: &str) -> Result<f64, ConvertError> {
    let value = validate_finite(value, field)?;
    if value <= 0.0 {
        return Err(ConvertError::invalid_value(field, format!("must be positive, got {}", value)));
    }
    Ok(value)
}

/// Relative/absolute tolerance comparison
pub fn approx_eq(a: f64, b: f64, tolerance: f64) -> bool {
    let diff = (a - b).abs();
    diff <= tolerance || diff <= tolerance * a.abs().max(b.abs())
}
