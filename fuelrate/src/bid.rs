//! Fuel-bid normalization
//!
//! Brings a supplier bid into a tender's base currency and unit of measure
//! so bids from different suppliers can be ranked on one total. Each price
//! component goes through the engine on its own; a failed component is
//! reported and its original value is used in the totals.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use fuelrate_core::numeric::round_money;
use fuelrate_core::ConvertError;

use crate::engine::ConversionEngine;
use crate::request::{ConversionRequest, DensityContext};

/// Bid currency when the bid does not state one
pub const DEFAULT_CURRENCY: &str = "USD";
/// Bid unit of measure when the bid does not state one
pub const DEFAULT_UOM: &str = "USG";
/// Number of bids converted concurrently in a batch
pub const BATCH_CONCURRENCY: usize = 3;
/// Tax estimate applied when a bid excludes taxes
pub const ESTIMATED_TAX_RATE: f64 = 0.10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceType {
    #[default]
    Fixed,
    IndexFormula,
}

/// How a fee is charged
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FeeBasis {
    PerUplift,
    PerDelivery,
    /// Charged per unit of measure, so it adds to the unit price
    PerUom,
    Other(String),
}

impl FeeBasis {
    pub fn as_str(&self) -> &str {
        match self {
            FeeBasis::PerUplift => "per_uplift",
            FeeBasis::PerDelivery => "per_delivery",
            FeeBasis::PerUom => "per_uom",
            FeeBasis::Other(basis) => basis,
        }
    }

    /// Suffix shown next to the fee, empty for per-UOM fees
    pub fn note(&self) -> String {
        match self {
            FeeBasis::PerUplift => "(per uplift)".to_string(),
            FeeBasis::PerDelivery => "(per delivery)".to_string(),
            FeeBasis::PerUom => String::new(),
            FeeBasis::Other(basis) => format!("({})", basis),
        }
    }
}

impl From<String> for FeeBasis {
    fn from(basis: String) -> Self {
        match basis.trim().to_ascii_lowercase().as_str() {
            "per_uplift" => FeeBasis::PerUplift,
            "per_delivery" => FeeBasis::PerDelivery,
            "per_uom" => FeeBasis::PerUom,
            _ => FeeBasis::Other(basis),
        }
    }
}

impl From<FeeBasis> for String {
    fn from(basis: FeeBasis) -> Self {
        basis.as_str().to_string()
    }
}

/// Fees without a basis are treated as per-UOM
fn is_per_uom(basis: Option<&FeeBasis>) -> bool {
    matches!(basis, None | Some(FeeBasis::PerUom))
}

/// A supplier's bid on a fuel tender
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelBid {
    pub id: String,
    pub currency: Option<String>,
    pub uom: Option<String>,
    pub base_unit_price: Option<f64>,
    #[serde(default)]
    pub price_type: PriceType,
    pub index_name: Option<String>,
    pub index_location: Option<String>,
    pub differential_value: Option<f64>,
    pub differential_unit: Option<String>,
    pub differential_currency: Option<String>,
    pub into_plane_fee: Option<f64>,
    pub into_plane_fee_basis: Option<FeeBasis>,
    pub handling_fee: Option<f64>,
    pub handling_fee_basis: Option<FeeBasis>,
    pub other_fee: Option<f64>,
    pub other_fee_basis: Option<FeeBasis>,
    #[serde(default)]
    pub includes_taxes: bool,
}

impl FuelBid {
    pub fn currency(&self) -> &str {
        non_empty(&self.currency).unwrap_or(DEFAULT_CURRENCY)
    }

    pub fn uom(&self) -> &str {
        non_empty(&self.uom).unwrap_or(DEFAULT_UOM)
    }

    /// "Fixed" or "Index: Platts Rotterdam"
    pub fn pricing_display(&self) -> String {
        match self.price_type {
            PriceType::Fixed => "Fixed".to_string(),
            PriceType::IndexFormula => {
                let name = non_empty(&self.index_name).unwrap_or("Index");
                match non_empty(&self.index_location) {
                    Some(location) => format!("Index: {} {}", name, location),
                    None => format!("Index: {}", name),
                }
            }
        }
    }

    pub fn fees_basis(&self) -> FeeBasisMetadata {
        let describe = |basis: &Option<FeeBasis>| {
            basis.as_ref().map(|basis| FeeBasisNote { basis: basis.clone(), note: basis.note() })
        };
        FeeBasisMetadata {
            into_plane_fee: describe(&self.into_plane_fee_basis),
            handling_fee: describe(&self.handling_fee_basis),
            other_fee: describe(&self.other_fee_basis),
        }
    }
}

/// The tender bids are normalized against
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelTender {
    pub base_currency: Option<String>,
    pub base_uom: Option<String>,
    /// Density or fuel type for tenders priced by mass
    #[serde(flatten)]
    pub density: DensityContext,
}

impl FuelTender {
    pub fn new(base_currency: &str, base_uom: &str) -> Self {
        FuelTender {
            base_currency: Some(base_currency.to_string()),
            base_uom: Some(base_uom.to_string()),
            density: DensityContext::none(),
        }
    }

    pub fn with_density(mut self, density: DensityContext) -> Self {
        self.density = density;
        self
    }

    pub fn currency(&self) -> &str {
        non_empty(&self.base_currency).unwrap_or(DEFAULT_CURRENCY)
    }

    pub fn uom(&self) -> &str {
        non_empty(&self.base_uom).unwrap_or(DEFAULT_UOM)
    }

    pub fn rate_unit(&self) -> String {
        format!("{}/{}", self.currency(), self.uom())
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn same_token(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

/// One converted price component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertedBidField {
    pub original_value: f64,
    pub original_unit: String,
    pub converted_value: f64,
    pub converted_unit: String,
    /// Effective multiplier from original to converted value
    pub conversion_rate: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeBasisNote {
    pub basis: FeeBasis,
    pub note: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeBasisMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub into_plane_fee: Option<FeeBasisNote>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handling_fee: Option<FeeBasisNote>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other_fee: Option<FeeBasisNote>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionStatus {
    Completed,
    Error,
}

/// A bid with its components in the tender's currency and UOM
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertedBid {
    #[serde(flatten)]
    pub bid: FuelBid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub converted_base_unit_price: Option<ConvertedBidField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub converted_into_plane_fee: Option<ConvertedBidField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub converted_handling_fee: Option<ConvertedBidField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub converted_other_fee: Option<ConvertedBidField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub converted_differential: Option<ConvertedBidField>,
    pub normalized_total_before_tax: f64,
    pub normalized_total_with_tax: f64,
    pub fees_basis: FeeBasisMetadata,
    pub pricing_display: String,
    pub conversion_status: ConversionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversion_error: Option<String>,
    pub last_converted_at: DateTime<Utc>,
}

impl ConvertedBid {
    /// Total before tax from converted components, falling back to originals
    fn total_before_tax(&self) -> f64 {
        let bid = &self.bid;
        let pick = |converted: &Option<ConvertedBidField>, original: Option<f64>| {
            converted.as_ref().map(|c| c.converted_value).or(original).unwrap_or(0.0)
        };

        let mut total = pick(&self.converted_base_unit_price, bid.base_unit_price);
        if bid.price_type == PriceType::IndexFormula {
            total += pick(&self.converted_differential, bid.differential_value);
        }

        let fees = [
            (&self.converted_into_plane_fee, bid.into_plane_fee, &bid.into_plane_fee_basis),
            (&self.converted_handling_fee, bid.handling_fee, &bid.handling_fee_basis),
            (&self.converted_other_fee, bid.other_fee, &bid.other_fee_basis),
        ];
        for (converted, original, basis) in fees {
            if is_per_uom(basis.as_ref()) {
                total += pick(converted, original);
            }
        }
        round_money(total)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionProgress {
    pub total: usize,
    pub completed: usize,
    /// Id of the last bid in the finished chunk
    pub current: String,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchConversion {
    pub converted_bids: Vec<ConvertedBid>,
    /// "Bid <id>: <error>" for every bid that did not fully convert
    pub errors: Vec<String>,
}

impl ConversionEngine {
    /// Normalize one bid to the tender's currency and UOM
    pub async fn convert_bid(&self, bid: &FuelBid, tender: &FuelTender) -> ConvertedBid {
        let bid_currency = bid.currency();
        let bid_uom = bid.uom();
        let tender_rate = tender.rate_unit();
        let bid_rate = format!("{}/{}", bid_currency, bid_uom);

        let currency_differs = !self.same_currency(bid_currency, tender.currency());
        let rate_differs = currency_differs || !self.same_uom(bid_uom, tender.uom());

        let mut converted = ConvertedBid {
            bid: bid.clone(),
            converted_base_unit_price: None,
            converted_into_plane_fee: None,
            converted_handling_fee: None,
            converted_other_fee: None,
            converted_differential: None,
            normalized_total_before_tax: 0.0,
            normalized_total_with_tax: 0.0,
            fees_basis: bid.fees_basis(),
            pricing_display: bid.pricing_display(),
            conversion_status: ConversionStatus::Completed,
            conversion_error: None,
            last_converted_at: Utc::now(),
        };
        let mut errors = Vec::new();

        if let Some(price) = present_amount(bid.base_unit_price) {
            if rate_differs {
                let request = ConversionRequest::rate(price, &bid_rate, &tender_rate).with_density(tender.density);
                match self.convert_field(price, &request).await {
                    Ok(field) => converted.converted_base_unit_price = Some(field),
                    Err(err) => errors.push(format!("Base unit price: {}", err)),
                }
            }
        }

        let fees = [
            ("Into plane fee", bid.into_plane_fee, &bid.into_plane_fee_basis),
            ("Handling fee", bid.handling_fee, &bid.handling_fee_basis),
            ("Other fee", bid.other_fee, &bid.other_fee_basis),
        ];
        for (index, (label, amount, basis)) in fees.into_iter().enumerate() {
            let Some(amount) = amount.filter(|a| a.is_finite() && *a > 0.0) else {
                continue;
            };
            let request = if is_per_uom(basis.as_ref()) {
                rate_differs.then(|| {
                    ConversionRequest::rate(amount, &bid_rate, &tender_rate).with_density(tender.density)
                })
            } else {
                currency_differs.then(|| ConversionRequest::currency(amount, bid_currency, tender.currency()))
            };
            let Some(request) = request else {
                continue;
            };

            match self.convert_field(amount, &request).await {
                Ok(field) => {
                    let slot = match index {
                        0 => &mut converted.converted_into_plane_fee,
                        1 => &mut converted.converted_handling_fee,
                        _ => &mut converted.converted_other_fee,
                    };
                    *slot = Some(field);
                }
                Err(err) => errors.push(format!("{}: {}", label, err)),
            }
        }

        if bid.price_type == PriceType::IndexFormula {
            if let Some(differential) = present_amount(bid.differential_value) {
                let diff_currency = non_empty(&bid.differential_currency).unwrap_or(bid_currency);
                let diff_uom = non_empty(&bid.differential_unit).unwrap_or(bid_uom);
                if !self.same_currency(diff_currency, tender.currency()) || !self.same_uom(diff_uom, tender.uom()) {
                    let from = format!("{}/{}", diff_currency, diff_uom);
                    match self.convert_signed_rate(differential, &from, &tender_rate, tender.density).await {
                        Ok(field) => converted.converted_differential = Some(field),
                        Err(err) => errors.push(format!("Differential: {}", err)),
                    }
                }
            }
        }

        converted.normalized_total_before_tax = converted.total_before_tax();
        converted.normalized_total_with_tax = if bid.includes_taxes {
            converted.normalized_total_before_tax
        } else {
            round_money(converted.normalized_total_before_tax * (1.0 + ESTIMATED_TAX_RATE))
        };

        if !errors.is_empty() {
            tracing::warn!(bid = %bid.id, errors = errors.len(), "bid conversion incomplete");
            converted.conversion_status = ConversionStatus::Error;
            converted.conversion_error = Some(errors.join("; "));
        } else {
            tracing::debug!(bid = %bid.id, total = converted.normalized_total_before_tax, "bid converted");
        }

        converted
    }

    /// Convert many bids, [`BATCH_CONCURRENCY`] at a time
    pub async fn convert_bids(&self, bids: &[FuelBid], tender: &FuelTender) -> BatchConversion {
        self.convert_bids_with_progress(bids, tender, |_| {}).await
    }

    /// Like [`convert_bids`](Self::convert_bids), reporting after each chunk
    pub async fn convert_bids_with_progress<F>(
        &self,
        bids: &[FuelBid],
        tender: &FuelTender,
        mut on_progress: F,
    ) -> BatchConversion
    where
        F: FnMut(&ConversionProgress),
    {
        let mut converted_bids = Vec::with_capacity(bids.len());
        let mut errors = Vec::new();

        for chunk in bids.chunks(BATCH_CONCURRENCY) {
            let results = futures::future::join_all(chunk.iter().map(|bid| self.convert_bid(bid, tender))).await;

            for result in &results {
                if let Some(error) = &result.conversion_error {
                    errors.push(format!("Bid {}: {}", result.bid.id, error));
                }
            }
            converted_bids.extend(results);

            on_progress(&ConversionProgress {
                total: bids.len(),
                completed: converted_bids.len(),
                current: chunk.last().map(|bid| bid.id.clone()).unwrap_or_default(),
                errors: errors.clone(),
            });
        }

        tracing::info!(bids = bids.len(), failed = errors.len(), "batch conversion finished");
        BatchConversion { converted_bids, errors }
    }

    /// Compare currency tokens by canonical code; unresolvable tokens compare as text
    fn same_currency(&self, a: &str, b: &str) -> bool {
        match (self.currencies().resolve(a), self.currencies().resolve(b)) {
            (Ok(a), Ok(b)) => a == b,
            _ => same_token(a, b),
        }
    }

    fn same_uom(&self, a: &str, b: &str) -> bool {
        match (self.units().get(a), self.units().get(b)) {
            (Some(a), Some(b)) => a.symbol == b.symbol,
            _ => same_token(a, b),
        }
    }

    async fn convert_field(&self, original: f64, request: &ConversionRequest) -> Result<ConvertedBidField, ConvertError> {
        let result = self.convert(request).await?;
        Ok(ConvertedBidField {
            original_value: original,
            original_unit: result.meta.from.clone(),
            converted_value: result.value,
            converted_unit: result.unit,
            conversion_rate: result.value / original,
            source: result.meta.source,
        })
    }

    /// Differentials can be discounts; the magnitude is converted and the sign kept
    async fn convert_signed_rate(
        &self,
        value: f64,
        from: &str,
        to: &str,
        density: DensityContext,
    ) -> Result<ConvertedBidField, ConvertError> {
        let request = ConversionRequest::rate(value.abs(), from, to).with_density(density);
        let mut field = self.convert_field(value.abs(), &request).await?;
        if value < 0.0 {
            field.original_value = value;
            field.converted_value = -field.converted_value;
        }
        Ok(field)
    }
}

/// Amounts of zero or non-finite values are treated as absent
fn present_amount(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v != 0.0)
}
