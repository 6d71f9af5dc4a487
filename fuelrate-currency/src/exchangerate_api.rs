//! exchangerate-api.com client
//!
//! `GET {base_url}/{key}/latest/{BASE}` returns every rate against BASE in
//! `conversion_rates`. Transport failures, timeouts, non-2xx answers,
//! malformed payloads and missing quotes all surface as `RateUnavailable`.
//! The API key is part of the path and is never logged.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use fuelrate_core::ConvertError;

use crate::provider::{ExchangeRateProvider, ExchangeRateQuote};

pub const DEFAULT_BASE_URL: &str = "https://v6.exchangerate-api.com/v6";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
pub const EXCHANGERATE_API_SOURCE: &str = "exchangerate-api.com";

/// Code the API publishes a currency under; the shekel is keyed as ILS
fn api_code(code: &str) -> &str {
    match code {
        "NIS" => "ILS",
        other => other,
    }
}

#[derive(Clone)]
pub struct ExchangeRateApiConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl ExchangeRateApiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        ExchangeRateApiConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl std::fmt::Debug for ExchangeRateApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExchangeRateApiConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    #[serde(default)]
    result: Option<String>,
    #[serde(default, rename = "error-type")]
    error_type: Option<String>,
    #[serde(default)]
    time_last_update_utc: Option<String>,
    #[serde(default)]
    conversion_rates: Option<HashMap<String, f64>>,
}

#[derive(Clone)]
pub struct ExchangeRateApiClient {
    http: reqwest::Client,
    config: ExchangeRateApiConfig,
}

impl ExchangeRateApiClient {
    pub fn new(config: ExchangeRateApiConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    fn url(&self, base: &str) -> String {
        format!(
            "{}/{}/latest/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.api_key,
            api_code(base)
        )
    }

    fn transport_error(&self, base: &str, quote: &str, err: reqwest::Error) -> ConvertError {
        let reason = if err.is_timeout() {
            format!("request timed out after {}s", self.config.timeout.as_secs_f64())
        } else if err.is_decode() {
            "malformed response from exchange-rate API".to_string()
        } else {
            // reqwest errors carry the URL, which contains the key
            format!("request failed: {}", err.without_url())
        };
        ConvertError::rate_unavailable(base, quote, reason)
    }

    async fn fetch_latest(&self, base: &str, quote: &str) -> Result<LatestRatesResponse, ConvertError> {
        let response = self
            .http
            .get(self.url(base))
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| self.transport_error(base, quote, e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(base, quote, status = status.as_u16(), "exchange-rate API returned an error status");
            return Err(ConvertError::rate_unavailable(
                base,
                quote,
                format!("exchange-rate API error: {}", status),
            ));
        }

        response
            .json::<LatestRatesResponse>()
            .await
            .map_err(|e| self.transport_error(base, quote, e))
    }
}

#[async_trait]
impl ExchangeRateProvider for ExchangeRateApiClient {
    async fn get_rate(&self, base: &str, quote: &str) -> Result<ExchangeRateQuote, ConvertError> {
        let (base, quote) = (base.to_uppercase(), quote.to_uppercase());
        if base == quote {
            return Ok(ExchangeRateQuote::same_currency(&base));
        }

        tracing::debug!(base = %base, quote = %quote, "fetching exchange rate");
        let payload = self.fetch_latest(&base, &quote).await?;

        if payload.result.as_deref() == Some("error") {
            let kind = payload.error_type.unwrap_or_else(|| "unknown".to_string());
            return Err(ConvertError::rate_unavailable(
                &base,
                &quote,
                format!("exchange-rate API error: {}", kind),
            ));
        }

        let rates = payload.conversion_rates.ok_or_else(|| {
            ConvertError::rate_unavailable(&base, &quote, "response has no conversion_rates")
        })?;

        let rate = rates
            .get(api_code(&quote))
            .copied()
            .filter(|r| r.is_finite() && *r > 0.0)
            .ok_or_else(|| {
                ConvertError::rate_unavailable(
                    &base,
                    &quote,
                    format!("exchange rate for {} not found in response", quote),
                )
            })?;

        let timestamp = payload
            .time_last_update_utc
            .unwrap_or_else(|| chrono::Utc::now().to_rfc3339());

        tracing::debug!(base = %base, quote = %quote, rate, "exchange rate received");

        Ok(ExchangeRateQuote {
            base,
            quote,
            rate,
            timestamp,
            source: EXCHANGERATE_API_SOURCE.to_string(),
        })
    }

    fn name(&self) -> &str {
        EXCHANGERATE_API_SOURCE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_key() {
        let config = ExchangeRateApiConfig::new("secret-key");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_url_layout() {
        let config = ExchangeRateApiConfig::new("k").with_base_url("http://localhost:1234/v6/");
        let client = ExchangeRateApiClient::new(config).unwrap();
        assert_eq!(client.url("USD"), "http://localhost:1234/v6/k/latest/USD");
        assert_eq!(client.url("NIS"), "http://localhost:1234/v6/k/latest/ILS");
    }

    #[tokio::test]
    async fn test_same_currency_skips_network() {
        // Unroutable base URL: any request would fail
        let config = ExchangeRateApiConfig::new("k").with_base_url("http://127.0.0.1:9");
        let client = ExchangeRateApiClient::new(config).unwrap();
        let quote = client.get_rate("usd", "USD").await.unwrap();
        assert_eq!(quote.rate, 1.0);
        assert_eq!(quote.source, crate::SAME_CURRENCY_SOURCE);
    }
}
