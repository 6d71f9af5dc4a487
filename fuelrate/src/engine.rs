//! Rate-conversion orchestrator
//!
//! Resolves every token through the registries, then runs the legs in a
//! fixed order: ratio normalization, denominator (unit) leg, numerator
//! (currency or unit) leg. Any failure aborts the whole request.

use std::sync::Arc;

use fuelrate_core::numeric::{round_money, validate_finite, validate_positive};
use fuelrate_core::ConvertError;
use fuelrate_currency::{CurrencyRegistry, ExchangeRateProvider, ExchangeRateQuote};
use fuelrate_density::{convert_with_density, needs_density, resolve_density, ResolvedDensity};
use fuelrate_units::{UnitDefinition, UnitRegistry};

use crate::parser::parse_request;
use crate::rate::{RateNumerator, RateSpec};
use crate::render::{DisplayOptions, NumberFormat, Renderer};
use crate::request::{
    CompoundRateConversion, ConversionRequest, CurrencyConversion, DensityContext, ToolInput,
    UnitConversion,
};
use crate::result::{
    ConversionKind, ConversionMeta, ConversionOutcome, ConversionResult, ConversionStep, StepStage,
};

/// Main conversion engine
///
/// Built once at start-up and shared; every collaborator is injected.
#[derive(Clone)]
pub struct ConversionEngine {
    units: Arc<UnitRegistry>,
    currencies: Arc<CurrencyRegistry>,
    rates: Arc<dyn ExchangeRateProvider>,
    renderer: Renderer,
}

impl ConversionEngine {
    pub fn new(
        units: Arc<UnitRegistry>,
        currencies: Arc<CurrencyRegistry>,
        rates: Arc<dyn ExchangeRateProvider>,
    ) -> Self {
        Self {
            units,
            currencies,
            rates,
            renderer: Renderer::default(),
        }
    }

    /// Engine with the standard registries and the given rate source
    pub fn with_rate_provider(rates: Arc<dyn ExchangeRateProvider>) -> Self {
        Self::new(Arc::new(UnitRegistry::new()), Arc::new(CurrencyRegistry::new()), rates)
    }

    pub fn with_display_options(mut self, options: DisplayOptions) -> Self {
        self.renderer = Renderer::new(options);
        self
    }

    pub fn units(&self) -> &UnitRegistry {
        &self.units
    }

    pub fn currencies(&self) -> &CurrencyRegistry {
        &self.currencies
    }

    pub fn rate_source(&self) -> &str {
        self.rates.name()
    }

    pub async fn convert(&self, request: &ConversionRequest) -> Result<ConversionResult, ConvertError> {
        tracing::debug!(kind = request.kind_name(), "conversion request");
        match request {
            ConversionRequest::Unit(r) => self.convert_unit(r),
            ConversionRequest::Currency(r) => self.convert_currency(r).await,
            ConversionRequest::CompoundRate(r) => self.convert_rate(r).await,
        }
    }

    /// Like [`convert`](Self::convert) but never fails: errors become an `ErrorResult`
    pub async fn run(&self, request: &ConversionRequest) -> ConversionOutcome {
        let result = self.convert(request).await;
        if let Err(err) = &result {
            tracing::debug!(kind = %err.kind(), error = %err, "conversion failed");
        }
        result.into()
    }

    /// Parse a free-text request ("2.3 USD/USG to EUR/L") and convert it
    pub async fn convert_text(&self, input: &str) -> Result<ConversionResult, ConvertError> {
        let request = parse_request(input, &self.units, &self.currencies)?;
        self.convert(&request).await
    }

    pub async fn run_text(&self, input: &str) -> ConversionOutcome {
        self.convert_text(input).await.into()
    }

    /// Classify structured tool input and convert it
    pub async fn convert_input(&self, input: &ToolInput) -> Result<ConversionResult, ConvertError> {
        let request = input.classify(&self.units, &self.currencies)?;
        self.convert(&request).await
    }

    fn convert_unit(&self, r: &UnitConversion) -> Result<ConversionResult, ConvertError> {
        let from = self.units.resolve(&r.from_unit)?;
        let to = self.units.resolve(&r.to_unit)?;

        // Any finite temperature is meaningful; other quantities must be positive
        let value = if from.dimension.is_affine() {
            validate_finite(r.value, "value")?
        } else {
            validate_positive(r.value, "value")?
        };

        let (converted, density) = self.convert_quantity(value, from, to, &r.density)?;
        let format = self.renderer.physical();

        let mut meta = ConversionMeta::new(ConversionKind::Unit, value, from.symbol, to.symbol);
        let mut details = Vec::new();
        if let Some(density) = density {
            let description = format!("using density {}", density);
            meta.steps.push(ConversionStep {
                stage: StepStage::Density,
                description: description.clone(),
                value: density.kg_per_l,
                unit: "kg/L".to_string(),
            });
            details.push(description);
            meta.density = Some(density);
        }
        meta.steps.push(ConversionStep {
            stage: StepStage::Unit,
            description: format!("{} {} = {}", self.renderer.value(value, format), from.symbol, self.renderer.quantity(converted, to.symbol, format)),
            value: converted,
            unit: to.symbol.to_string(),
        });

        let formatted = self.renderer.quantity(converted, to.symbol, format);
        let headline = format!("Converted {} to {}", self.renderer.quantity(value, from.symbol, format), formatted);

        Ok(ConversionResult {
            value: converted,
            unit: to.symbol.to_string(),
            formatted,
            explanation: self.renderer.explanation(headline, &details),
            meta,
        })
    }

    async fn convert_currency(&self, r: &CurrencyConversion) -> Result<ConversionResult, ConvertError> {
        let base = self.currencies.resolve(&r.from_currency)?;
        let quote_code = self.currencies.resolve(&r.to_currency)?;
        let amount = validate_positive(r.amount, "amount")?;

        let quote = self.quote(base, quote_code).await?;
        let converted = round_money(amount * quote.rate);

        let mut meta = ConversionMeta::new(ConversionKind::Currency, amount, base, quote_code);
        meta.steps.push(ConversionStep {
            stage: StepStage::Currency,
            description: format!("1 {} = {} {}", base, quote.rate, quote_code),
            value: converted,
            unit: quote_code.to_string(),
        });
        attach_quote(&mut meta, &quote);

        let formatted = self.renderer.quantity(converted, quote_code, NumberFormat::Money);
        let explanation = format!(
            "Converted {} {} to {} {} using rate {} ({})",
            self.renderer.value(amount, NumberFormat::Money),
            base,
            self.renderer.value(converted, NumberFormat::Money),
            quote_code,
            quote.rate,
            quote.source
        );

        Ok(ConversionResult {
            value: converted,
            unit: quote_code.to_string(),
            formatted,
            explanation,
            meta,
        })
    }

    async fn convert_rate(&self, r: &CompoundRateConversion) -> Result<ConversionResult, ConvertError> {
        let from = RateSpec::parse(&r.from_rate_unit, &self.units, &self.currencies)?;
        let to = RateSpec::parse(&r.to_rate_unit, &self.units, &self.currencies)?;
        let value = validate_positive(r.value, "value")?;

        if from.numerator_kind() != to.numerator_kind() {
            return Err(mismatched_numerators(&from, &to));
        }

        let (from_label, to_label) = (from.label(), to.label());
        let physical = self.renderer.physical();
        let mut meta = ConversionMeta::new(ConversionKind::CompoundRate, value, from_label.as_str(), to_label.as_str());
        let mut details = Vec::new();

        // Ratio quotes ("4 USD for 2 USG") become a per-one-unit rate first
        let mut rate = value;
        if let Some(per) = r.per_quantity {
            let per = validate_positive(per, "perQuantity")?;
            if per != 1.0 {
                rate = value / per;
                let description = format!(
                    "normalized {} {} per {} {} to {}",
                    self.renderer.value(value, physical),
                    from.numerator.symbol(),
                    self.renderer.value(per, physical),
                    from.denominator.symbol,
                    self.renderer.quantity(rate, &from_label, physical)
                );
                meta.steps.push(ConversionStep {
                    stage: StepStage::Normalize,
                    description: description.clone(),
                    value: rate,
                    unit: from_label.clone(),
                });
                details.push(description);
            }
        }

        // Unit leg: how many source denominators make up one target denominator
        let (denominator_factor, density) =
            self.convert_quantity(1.0, &to.denominator, &from.denominator, &r.density)?;
        let per_target_unit = rate * denominator_factor;
        let intermediate_label = format!("{}/{}", from.numerator.symbol(), to.denominator.symbol);

        if from.denominator.symbol != to.denominator.symbol {
            let mut description = format!(
                "1 {} = {} {}, so {} = {}",
                to.denominator.symbol,
                self.renderer.value(denominator_factor, physical),
                from.denominator.symbol,
                self.renderer.quantity(rate, &from_label, physical),
                self.renderer.quantity(per_target_unit, &intermediate_label, physical)
            );
            if let Some(density) = &density {
                description.push_str(&format!(" (density {})", density));
            }
            meta.steps.push(ConversionStep {
                stage: StepStage::Unit,
                description: description.clone(),
                value: per_target_unit,
                unit: intermediate_label.clone(),
            });
            details.push(description);
        }
        meta.density = density;

        // Numerator leg
        let (converted, format) = match (&from.numerator, &to.numerator) {
            (RateNumerator::Currency(base), RateNumerator::Currency(quote_code)) => {
                let quote = self.quote(base, quote_code).await?;
                let converted = round_money(per_target_unit * quote.rate);
                if base != quote_code {
                    let description = format!(
                        "{} to {} at {} ({}) gives {}",
                        base,
                        quote_code,
                        quote.rate,
                        quote.source,
                        self.renderer.quantity(converted, &to_label, NumberFormat::Money)
                    );
                    meta.steps.push(ConversionStep {
                        stage: StepStage::Currency,
                        description: description.clone(),
                        value: converted,
                        unit: to_label.clone(),
                    });
                    details.push(description);
                }
                attach_quote(&mut meta, &quote);
                (converted, NumberFormat::Money)
            }
            (RateNumerator::Unit(num_from), RateNumerator::Unit(num_to)) => {
                let (converted, num_density) = self.convert_quantity(per_target_unit, num_from, num_to, &r.density)?;
                if num_from.symbol != num_to.symbol {
                    let description = format!(
                        "{} to {} gives {}",
                        num_from.symbol,
                        num_to.symbol,
                        self.renderer.quantity(converted, &to_label, physical)
                    );
                    meta.steps.push(ConversionStep {
                        stage: StepStage::Unit,
                        description: description.clone(),
                        value: converted,
                        unit: to_label.clone(),
                    });
                    details.push(description);
                }
                if meta.density.is_none() {
                    meta.density = num_density;
                }
                (converted, physical)
            }
            _ => return Err(mismatched_numerators(&from, &to)),
        };

        let formatted = self.renderer.quantity(converted, &to_label, format);
        let headline = format!(
            "Converted {} to {}",
            self.renderer.quantity(value, &from_label, format),
            formatted
        );

        Ok(ConversionResult {
            value: converted,
            unit: to_label,
            formatted,
            explanation: self.renderer.explanation(headline, &details),
            meta,
        })
    }

    /// Convert a quantity, bridging volume and mass through a density
    fn convert_quantity(
        &self,
        value: f64,
        from: &UnitDefinition,
        to: &UnitDefinition,
        context: &DensityContext,
    ) -> Result<(f64, Option<ResolvedDensity>), ConvertError> {
        if needs_density(from, to) {
            let density = resolve_density(context.explicit_density(), context.fuel_type, from.symbol, to.symbol)?;
            let converted = convert_with_density(value, from, to, density.kg_per_l)?;
            return Ok((converted, Some(density)));
        }
        Ok((self.units().convert(value, from, to)?, None))
    }

    /// Exchange rate for resolved ISO codes; identical codes never reach the provider
    async fn quote(&self, base: &str, quote: &str) -> Result<ExchangeRateQuote, ConvertError> {
        if base == quote {
            return Ok(ExchangeRateQuote::same_currency(base));
        }

        let result = self.rates.get_rate(base, quote).await;
        let quote_result = match result {
            Ok(q) => q,
            Err(err) => {
                tracing::warn!(base, quote, provider = self.rates.name(), error = %err, "exchange rate unavailable");
                return Err(err);
            }
        };

        if !quote_result.rate.is_finite() || quote_result.rate <= 0.0 {
            return Err(ConvertError::rate_unavailable(
                base,
                quote,
                format!("provider returned a non-positive rate ({})", quote_result.rate),
            ));
        }
        Ok(quote_result)
    }
}

fn mismatched_numerators(from: &RateSpec, to: &RateSpec) -> ConvertError {
    ConvertError::invalid_request(format!(
        "cannot convert {} to {}: one is a price and the other is a unit ratio",
        from, to
    ))
}

fn attach_quote(meta: &mut ConversionMeta, quote: &ExchangeRateQuote) {
    meta.exchange_rate = Some(quote.rate);
    meta.timestamp = Some(quote.timestamp.clone());
    meta.source = Some(quote.source.clone());
}
