//! Exchange-rate provider seam

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use fuelrate_core::ConvertError;

/// Source label for identity conversions that never reach a provider
pub const SAME_CURRENCY_SOURCE: &str = "same_currency";

/// Units of `quote` per one unit of `base`, as reported by a provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRateQuote {
    pub base: String,
    pub quote: String,
    pub rate: f64,
    pub timestamp: String,
    pub source: String,
}

impl ExchangeRateQuote {
    /// Rate 1 between a currency and itself
    pub fn same_currency(code: &str) -> Self {
        ExchangeRateQuote {
            base: code.to_string(),
            quote: code.to_string(),
            rate: 1.0,
            timestamp: chrono::Utc::now().to_rfc3339(),
            source: SAME_CURRENCY_SOURCE.to_string(),
        }
    }
}

/// Anything that can quote an exchange rate
///
/// Implementations receive ISO codes already resolved by the registry.
#[async_trait]
pub trait ExchangeRateProvider: Send + Sync {
    async fn get_rate(&self, base: &str, quote: &str) -> Result<ExchangeRateQuote, ConvertError>;

    fn name(&self) -> &str;
}

/// Provider used when no rate source is configured
#[derive(Debug, Clone)]
pub struct DisabledRateProvider {
    reason: String,
}

impl DisabledRateProvider {
    pub fn new(reason: impl Into<String>) -> Self {
        DisabledRateProvider { reason: reason.into() }
    }
}

impl Default for DisabledRateProvider {
    fn default() -> Self {
        Self::new("no exchange-rate API key configured (set EXCHANGE_RATE_API_KEY)")
    }
}

#[async_trait]
impl ExchangeRateProvider for DisabledRateProvider {
    async fn get_rate(&self, base: &str, quote: &str) -> Result<ExchangeRateQuote, ConvertError> {
        if base == quote {
            return Ok(ExchangeRateQuote::same_currency(base));
        }
        Err(ConvertError::rate_unavailable(base, quote, self.reason.clone()))
    }

    fn name(&self) -> &str {
        "disabled"
    }
}
