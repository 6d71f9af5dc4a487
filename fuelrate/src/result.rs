//! Conversion results and the success/failure union handed to transports

use serde::Serialize;
use fuelrate_core::{ConvertError, ErrorResult};
use fuelrate_density::ResolvedDensity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionKind {
    Unit,
    Currency,
    CompoundRate,
}

/// Pipeline stage an intermediate value belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStage {
    Normalize,
    Unit,
    Density,
    Currency,
}

/// One intermediate value, in pipeline order
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionStep {
    pub stage: StepStage,
    pub description: String,
    pub value: f64,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionMeta {
    pub kind: ConversionKind,
    pub original_value: f64,
    pub from: String,
    pub to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchange_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub density: Option<ResolvedDensity>,
    pub steps: Vec<ConversionStep>,
}

impl ConversionMeta {
    pub fn new(kind: ConversionKind, original_value: f64, from: impl Into<String>, to: impl Into<String>) -> Self {
        ConversionMeta {
            kind,
            original_value,
            from: from.into(),
            to: to.into(),
            exchange_rate: None,
            timestamp: None,
            source: None,
            density: None,
            steps: Vec::new(),
        }
    }
}

/// A finished conversion
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionResult {
    pub value: f64,
    pub unit: String,
    /// Value and unit formatted for display
    pub formatted: String,
    pub explanation: String,
    pub meta: ConversionMeta,
}

/// Either a result or the tagged error payload, never both
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ConversionOutcome {
    Success(ConversionResult),
    Failure(ErrorResult),
}

impl ConversionOutcome {
    pub fn is_error(&self) -> bool {
        matches!(self, ConversionOutcome::Failure(_))
    }

    pub fn success(&self) -> Option<&ConversionResult> {
        match self {
            ConversionOutcome::Success(result) => Some(result),
            ConversionOutcome::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&ErrorResult> {
        match self {
            ConversionOutcome::Success(_) => None,
            ConversionOutcome::Failure(error) => Some(error),
        }
    }
}

impl From<Result<ConversionResult, ConvertError>> for ConversionOutcome {
    fn from(result: Result<ConversionResult, ConvertError>) -> Self {
        match result {
            Ok(result) => ConversionOutcome::Success(result),
            Err(err) => ConversionOutcome::Failure(err.to_result()),
        }
    }
}
