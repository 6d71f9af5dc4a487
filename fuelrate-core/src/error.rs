//! Structured conversion errors
//!
//! Every failure in the pipeline (unit, currency, density, rate) aborts the
//! request and surfaces as one of these. At the orchestrator boundary they
//! are turned into an [`ErrorResult`] so transports never see a panic or an
//! opaque error string.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use thiserror::Error;

/// Standard error codes (machine-readable)
pub mod codes {
    pub const UNKNOWN_UNIT: &str = "UNKNOWN_UNIT";
    pub const INCOMPATIBLE_DIMENSION: &str = "INCOMPATIBLE_DIMENSION";
    pub const UNSUPPORTED_CURRENCY: &str = "UNSUPPORTED_CURRENCY";
    pub const AMBIGUOUS_CURRENCY: &str = "AMBIGUOUS_CURRENCY";
    pub const DENSITY_REQUIRED: &str = "DENSITY_REQUIRED";
    pub const RATE_UNAVAILABLE: &str = "RATE_UNAVAILABLE";
    pub const INVALID_VALUE: &str = "INVALID_VALUE";
    pub const INVALID_REQUEST: &str = "INVALID_REQUEST";
}

/// Machine-readable error kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    UnknownUnit,
    IncompatibleDimension,
    UnsupportedCurrency,
    AmbiguousCurrency,
    DensityRequired,
    RateUnavailable,
    InvalidValue,
    InvalidRequest,
}

impl ErrorKind {
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::UnknownUnit => codes::UNKNOWN_UNIT,
            ErrorKind::IncompatibleDimension => codes::INCOMPATIBLE_DIMENSION,
            ErrorKind::UnsupportedCurrency => codes::UNSUPPORTED_CURRENCY,
            ErrorKind::AmbiguousCurrency => codes::AMBIGUOUS_CURRENCY,
            ErrorKind::DensityRequired => codes::DENSITY_REQUIRED,
            ErrorKind::RateUnavailable => codes::RATE_UNAVAILABLE,
            ErrorKind::InvalidValue => codes::INVALID_VALUE,
            ErrorKind::InvalidRequest => codes::INVALID_REQUEST,
        }
    }

    /// Status code an HTTP handler should answer with for this kind
    pub fn http_status(&self) -> u16 {
        match self {
            ErrorKind::UnknownUnit
            | ErrorKind::IncompatibleDimension
            | ErrorKind::UnsupportedCurrency
            | ErrorKind::InvalidValue
            | ErrorKind::InvalidRequest => 400,
            ErrorKind::AmbiguousCurrency | ErrorKind::DensityRequired => 422,
            ErrorKind::RateUnavailable => 502,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Errors raised anywhere in the conversion pipeline
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConvertError {
    #[error("unknown unit: '{token}'")]
    UnknownUnit {
        token: String,
        /// Canonical symbols the caller may have meant
        known: Vec<String>,
    },

    #[error("cannot convert {from} ({from_dimension}) to {to} ({to_dimension}): incompatible dimensions")]
    IncompatibleDimension {
        from: String,
        to: String,
        from_dimension: String,
        to_dimension: String,
        /// Symbols sharing `from`'s dimension
        from_units: Vec<String>,
        /// Symbols sharing `to`'s dimension
        to_units: Vec<String>,
    },

    #[error("unsupported currency: '{token}'. Supported: {}", supported.join(", "))]
    UnsupportedCurrency { token: String, supported: Vec<String> },

    #[error("ambiguous currency symbol '{token}': could be {}. Specify the ISO code", candidates.join(" or "))]
    AmbiguousCurrency { token: String, candidates: Vec<String> },

    #[error("converting {from} to {to} requires a density; provide one in kg/L or a fuel type ({})", fuel_types.join(", "))]
    DensityRequired {
        from: String,
        to: String,
        fuel_types: Vec<String>,
    },

    #[error("unable to fetch exchange rate for {base}/{quote}: {reason}")]
    RateUnavailable {
        base: String,
        quote: String,
        reason: String,
    },

    #[error("invalid {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ConvertError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConvertError::UnknownUnit { .. } => ErrorKind::UnknownUnit,
            ConvertError::IncompatibleDimension { .. } => ErrorKind::IncompatibleDimension,
            ConvertError::UnsupportedCurrency { .. } => ErrorKind::UnsupportedCurrency,
            ConvertError::AmbiguousCurrency { .. } => ErrorKind::AmbiguousCurrency,
            ConvertError::DensityRequired { .. } => ErrorKind::DensityRequired,
            ConvertError::RateUnavailable { .. } => ErrorKind::RateUnavailable,
            ConvertError::InvalidValue { .. } => ErrorKind::InvalidValue,
            ConvertError::InvalidRequest(_) => ErrorKind::InvalidRequest,
        }
    }

    pub fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ConvertError::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_request(details: impl Into<String>) -> Self {
        ConvertError::InvalidRequest(details.into())
    }

    pub fn rate_unavailable(
        base: impl Into<String>,
        quote: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        ConvertError::RateUnavailable {
            base: base.into(),
            quote: quote.into(),
            reason: reason.into(),
        }
    }

    /// Structured details for the error payload
    pub fn details(&self) -> JsonValue {
        match self {
            ConvertError::UnknownUnit { token, known } => json!({
                "token": token,
                "suggestion": if known.is_empty() {
                    "Check the unit spelling".to_string()
                } else {
                    format!("Known units: {}", known.join(", "))
                },
            }),
            ConvertError::IncompatibleDimension { from, to, from_dimension, to_dimension, from_units, to_units } => json!({
                "from": from,
                "to": to,
                "fromDimension": from_dimension,
                "toDimension": to_dimension,
                "fromDimensionUnits": from_units,
                "toDimensionUnits": to_units,
                "suggestion": if from_units.is_empty() {
                    "Ensure both units belong to the same measurement category, or supply a density for volume/mass".to_string()
                } else {
                    format!("Units in {}: {}", from_dimension, from_units.join(", "))
                },
            }),
            ConvertError::UnsupportedCurrency { token, supported } => json!({
                "token": token,
                "supported": supported,
            }),
            ConvertError::AmbiguousCurrency { token, candidates } => json!({
                "token": token,
                "candidates": candidates,
            }),
            ConvertError::DensityRequired { from, to, fuel_types } => json!({
                "from": from,
                "to": to,
                "fuelTypes": fuel_types,
            }),
            ConvertError::RateUnavailable { base, quote, reason } => json!({
                "base": base,
                "quote": quote,
                "reason": reason,
            }),
            ConvertError::InvalidValue { field, reason } => json!({
                "field": field,
                "reason": reason,
            }),
            ConvertError::InvalidRequest(details) => json!({ "reason": details }),
        }
    }

    pub fn to_result(&self) -> ErrorResult {
        ErrorResult {
            error: self.kind(),
            message: self.to_string(),
            details: self.details(),
        }
    }
}

/// Tagged error payload returned across the API boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResult {
    pub error: ErrorKind,
    pub message: String,
    pub details: JsonValue,
}

impl From<ConvertError> for ErrorResult {
    fn from(err: ConvertError) -> Self {
        err.to_result()
    }
}

impl std::fmt::Display for ErrorResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.error, self.message)
    }
}
