//! Fuelrate - unit, currency and fuel-rate conversion
//!
//! Normalizes fuel prices quoted in heterogeneous units and currencies,
//! e.g. "2.3 USD/USG" to "EUR/L", with density-aware volume/mass bridging.

mod request;
mod rate;
mod result;
mod render;
mod engine;
mod parser;
pub mod bid;
pub mod catalog;

pub use request::{
    CompoundRateConversion, ConversionRequest, CurrencyConversion, DensityContext, ToolInput,
    UnitConversion,
};
pub use rate::{NumeratorKind, RateNumerator, RateSpec};
pub use result::{
    ConversionKind, ConversionMeta, ConversionOutcome, ConversionResult, ConversionStep, StepStage,
};
pub use render::{DisplayOptions, NumberFormat, Renderer};
pub use engine::ConversionEngine;
pub use parser::parse_request;
pub use bid::{BatchConversion, ConversionProgress, ConvertedBid, FeeBasis, FuelBid, FuelTender, PriceType};
pub use catalog::{parse_dimension, CurrencySummary, FuelSummary, UnitSummary};

// Re-export the building blocks callers need alongside the engine
pub use fuelrate_core::{ConvertError, ErrorKind, ErrorResult};
pub use fuelrate_currency::{
    CurrencyRegistry, DisabledRateProvider, ExchangeRateApiClient, ExchangeRateApiConfig,
    ExchangeRateProvider, ExchangeRateQuote, StaticRateProvider,
};
pub use fuelrate_density::{DensityUnit, FuelType, ResolvedDensity};
pub use fuelrate_units::{Dimension, UnitDefinition, UnitRegistry};
