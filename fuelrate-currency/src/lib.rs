//! fuelrate Currency - Currency registry and exchange-rate providers
//!
//! Supported: USD, EUR, GBP, NIS, INR, JPY, CNY, AUD, CAD, CHF.
//! Rates are fetched per request through an [`ExchangeRateProvider`];
//! nothing here caches or holds global state.

mod registry;
mod provider;
mod static_rates;
mod exchangerate_api;

pub use registry::{normalize_currency_token, CurrencyDefinition, CurrencyRegistry};
pub use provider::{DisabledRateProvider, ExchangeRateProvider, ExchangeRateQuote, SAME_CURRENCY_SOURCE};
pub use static_rates::{StaticRateProvider, STATIC_SOURCE};
pub use exchangerate_api::{
    ExchangeRateApiClient, ExchangeRateApiConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT,
    EXCHANGERATE_API_SOURCE,
};
