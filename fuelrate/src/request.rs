//! Conversion requests
//!
//! [`ConversionRequest`] is the single validated request type the engine
//! accepts. [`ToolInput`] is the loose structured shape callers send over
//! the wire; [`ToolInput::classify`] turns it into a request once, at the
//! boundary.

use serde::{Deserialize, Serialize};
use fuelrate_core::ConvertError;
use fuelrate_currency::CurrencyRegistry;
use fuelrate_density::{Density, DensityUnit, FuelType};
use fuelrate_units::{split_compound, UnitRegistry};

/// Optional density context for volume/mass conversions
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DensityContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub density: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub density_unit: Option<DensityUnit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuel_type: Option<FuelType>,
}

impl DensityContext {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn fuel(fuel_type: FuelType) -> Self {
        DensityContext { fuel_type: Some(fuel_type), ..Self::default() }
    }

    pub fn explicit(density: f64, unit: DensityUnit) -> Self {
        DensityContext { density: Some(density), density_unit: Some(unit), fuel_type: None }
    }

    pub fn explicit_density(&self) -> Option<Density> {
        self.density.map(|value| Density::new(value, self.density_unit.unwrap_or_default()))
    }

    pub fn is_empty(&self) -> bool {
        self.density.is_none() && self.fuel_type.is_none()
    }
}

/// Physical quantity between two units (volume/mass via density)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitConversion {
    pub value: f64,
    pub from_unit: String,
    pub to_unit: String,
    #[serde(flatten)]
    pub density: DensityContext,
}

/// Money amount between two currencies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyConversion {
    pub amount: f64,
    pub from_currency: String,
    pub to_currency: String,
}

/// Rate such as "2.3 USD/USG" into another rate unit such as "EUR/L"
///
/// `per_quantity` carries ratio quotes ("4 USD for 2 USG"); the engine
/// divides it out before converting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompoundRateConversion {
    pub value: f64,
    pub from_rate_unit: String,
    pub to_rate_unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_quantity: Option<f64>,
    #[serde(flatten)]
    pub density: DensityContext,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConversionRequest {
    Unit(UnitConversion),
    Currency(CurrencyConversion),
    CompoundRate(CompoundRateConversion),
}

impl ConversionRequest {
    pub fn unit(value: f64, from_unit: &str, to_unit: &str) -> Self {
        ConversionRequest::Unit(UnitConversion {
            value,
            from_unit: from_unit.to_string(),
            to_unit: to_unit.to_string(),
            density: DensityContext::none(),
        })
    }

    pub fn currency(amount: f64, from_currency: &str, to_currency: &str) -> Self {
        ConversionRequest::Currency(CurrencyConversion {
            amount,
            from_currency: from_currency.to_string(),
            to_currency: to_currency.to_string(),
        })
    }

    pub fn rate(value: f64, from_rate_unit: &str, to_rate_unit: &str) -> Self {
        ConversionRequest::CompoundRate(CompoundRateConversion {
            value,
            from_rate_unit: from_rate_unit.to_string(),
            to_rate_unit: to_rate_unit.to_string(),
            per_quantity: None,
            density: DensityContext::none(),
        })
    }

    /// Attach density context; no effect on currency requests
    pub fn with_density(mut self, context: DensityContext) -> Self {
        match &mut self {
            ConversionRequest::Unit(r) => r.density = context,
            ConversionRequest::CompoundRate(r) => r.density = context,
            ConversionRequest::Currency(_) => {}
        }
        self
    }

    /// Quote was for `quantity` denominator units rather than one
    pub fn per_quantity(mut self, quantity: f64) -> Self {
        if let ConversionRequest::CompoundRate(r) = &mut self {
            r.per_quantity = Some(quantity);
        }
        self
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            ConversionRequest::Unit(_) => "unit",
            ConversionRequest::Currency(_) => "currency",
            ConversionRequest::CompoundRate(_) => "compound_rate",
        }
    }
}

/// Structured input for direct tool invocation
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolInput {
    pub value: Option<f64>,
    pub from_unit: Option<String>,
    pub to_unit: Option<String>,
    pub from_currency: Option<String>,
    pub to_currency: Option<String>,
    pub from_rate_unit: Option<String>,
    pub to_rate_unit: Option<String>,
    pub per_quantity: Option<f64>,
    pub density: Option<f64>,
    pub density_unit: Option<String>,
    pub fuel_type: Option<String>,
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn required<'a>(field: Option<&'a str>, name: &str) -> Result<&'a str, ConvertError> {
    field.ok_or_else(|| ConvertError::invalid_request(format!("missing field '{}'", name)))
}

impl ToolInput {
    /// Decide which conversion this input describes
    pub fn classify(&self, units: &UnitRegistry, currencies: &CurrencyRegistry) -> Result<ConversionRequest, ConvertError> {
        let value = self.value.ok_or_else(|| ConvertError::invalid_request("missing field 'value'"))?;
        let density = self.density_context()?;

        let (from_unit, to_unit) = (present(&self.from_unit), present(&self.to_unit));
        let (from_cur, to_cur) = (present(&self.from_currency), present(&self.to_currency));
        let (from_rate, to_rate) = (present(&self.from_rate_unit), present(&self.to_rate_unit));

        if from_rate.is_some() || to_rate.is_some() {
            return Ok(ConversionRequest::CompoundRate(CompoundRateConversion {
                value,
                from_rate_unit: required(from_rate, "fromRateUnit")?.to_string(),
                to_rate_unit: required(to_rate, "toRateUnit")?.to_string(),
                per_quantity: self.per_quantity,
                density,
            }));
        }

        let has_units = from_unit.is_some() || to_unit.is_some();
        let has_currencies = from_cur.is_some() || to_cur.is_some();

        if has_units && has_currencies {
            // Currency and unit split across fields: "USD" + "USG" -> "USD/USG"
            let from_cur = required(from_cur, "fromCurrency")?;
            let from_unit = required(from_unit, "fromUnit")?;
            let to_cur = to_cur.unwrap_or(from_cur);
            let to_unit = to_unit.unwrap_or(from_unit);
            return Ok(ConversionRequest::CompoundRate(CompoundRateConversion {
                value,
                from_rate_unit: format!("{}/{}", from_cur, from_unit),
                to_rate_unit: format!("{}/{}", to_cur, to_unit),
                per_quantity: self.per_quantity,
                density,
            }));
        }

        if has_currencies {
            return Ok(ConversionRequest::currency(
                value,
                required(from_cur, "fromCurrency")?,
                required(to_cur, "toCurrency")?,
            ));
        }

        let from = required(from_unit, "fromUnit")?;
        let to = required(to_unit, "toUnit")?;

        // Rates sent through the unit fields, e.g. fromUnit "USD/USG"
        if is_rate_token(from, units) || is_rate_token(to, units) {
            return Ok(ConversionRequest::CompoundRate(CompoundRateConversion {
                value,
                from_rate_unit: from.to_string(),
                to_rate_unit: to.to_string(),
                per_quantity: self.per_quantity,
                density,
            }));
        }

        // Currencies sent through the unit fields
        if units.get(from).is_none() && currencies.is_currency(from) && currencies.is_currency(to) {
            return Ok(ConversionRequest::currency(value, from, to));
        }

        Ok(ConversionRequest::Unit(UnitConversion {
            value,
            from_unit: from.to_string(),
            to_unit: to.to_string(),
            density,
        }))
    }

    fn density_context(&self) -> Result<DensityContext, ConvertError> {
        let density_unit = present(&self.density_unit).map(DensityUnit::parse).transpose()?;
        let fuel_type = present(&self.fuel_type).map(FuelType::parse).transpose()?;
        Ok(DensityContext { density: self.density, density_unit, fuel_type })
    }
}

/// A compound token that is not itself a unit ("USD/USG" yes, "km/h" no)
pub(crate) fn is_rate_token(token: &str, units: &UnitRegistry) -> bool {
    units.get(token).is_none() && split_compound(token).is_some()
}
