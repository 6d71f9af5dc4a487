//! Fixed in-memory rate table
//!
//! Used for tests and offline runs. A pair that is only registered in one
//! direction is served in the other by inverting the rate.

use std::collections::HashMap;
use async_trait::async_trait;
use fuelrate_core::ConvertError;
use crate::provider::{ExchangeRateProvider, ExchangeRateQuote};

pub const STATIC_SOURCE: &str = "static";

#[derive(Debug, Clone)]
pub struct StaticRateProvider {
    rates: HashMap<(String, String), f64>,
    as_of: String,
}

impl StaticRateProvider {
    pub fn new() -> Self {
        StaticRateProvider {
            rates: HashMap::new(),
            as_of: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Register `rate` units of `quote` per one `base`
    pub fn with_rate(mut self, base: &str, quote: &str, rate: f64) -> Self {
        self.rates.insert((base.to_uppercase(), quote.to_uppercase()), rate);
        self
    }

    /// Fix the timestamp reported on every quote
    pub fn as_of(mut self, timestamp: impl Into<String>) -> Self {
        self.as_of = timestamp.into();
        self
    }

    fn lookup(&self, base: &str, quote: &str) -> Option<f64> {
        if let Some(rate) = self.rates.get(&(base.to_string(), quote.to_string())) {
            return Some(*rate);
        }
        self.rates
            .get(&(quote.to_string(), base.to_string()))
            .filter(|r| **r != 0.0)
            .map(|r| 1.0 / r)
    }
}

impl Default for StaticRateProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExchangeRateProvider for StaticRateProvider {
    async fn get_rate(&self, base: &str, quote: &str) -> Result<ExchangeRateQuote, ConvertError> {
        let (base, quote) = (base.to_uppercase(), quote.to_uppercase());
        if base == quote {
            return Ok(ExchangeRateQuote::same_currency(&base));
        }

        let rate = self
            .lookup(&base, &quote)
            .filter(|r| r.is_finite() && *r > 0.0)
            .ok_or_else(|| ConvertError::rate_unavailable(&base, &quote, "no static rate registered for this pair"))?;

        Ok(ExchangeRateQuote {
            base,
            quote,
            rate,
            timestamp: self.as_of.clone(),
            source: STATIC_SOURCE.to_string(),
        })
    }

    fn name(&self) -> &str {
        STATIC_SOURCE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_direct_and_inverse() {
        let provider = StaticRateProvider::new().with_rate("USD", "EUR", 0.8);

        let direct = provider.get_rate("USD", "EUR").await.unwrap();
        assert_eq!(direct.rate, 0.8);
        assert_eq!(direct.source, STATIC_SOURCE);

        let inverse = provider.get_rate("EUR", "USD").await.unwrap();
        assert!((inverse.rate - 1.25).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_missing_pair() {
        let provider = StaticRateProvider::new().with_rate("USD", "EUR", 0.8);
        assert!(provider.get_rate("USD", "GBP").await.is_err());
    }

    #[tokio::test]
    async fn test_rejects_non_positive_rate() {
        let provider = StaticRateProvider::new().with_rate("USD", "EUR", 0.0);
        assert!(provider.get_rate("USD", "EUR").await.is_err());
        assert!(provider.get_rate("EUR", "USD").await.is_err());
    }
}
