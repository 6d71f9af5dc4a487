//! MCP tools over the conversion engine
//!
//! Conversion failures are tool results with `isError: true` and the tagged
//! error payload, so the calling agent can read the code and retry. Only
//! malformed calls (unknown tool, unreadable arguments) are JSON-RPC errors.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use fuelrate::{
    parse_dimension, ConversionEngine, ConversionOutcome, ConversionRequest, CurrencyConversion,
    FuelBid, FuelTender, ToolInput,
};
use fuelrate_core::ConvertError;

use crate::protocol::McpError;

pub fn tools_list() -> JsonValue {
    let density_properties = json!({
        "density": {
            "type": "number",
            "description": "Fuel density for volume/mass conversions"
        },
        "densityUnit": {
            "type": "string",
            "description": "Unit of density: kg/L (default), kg/m3 or g/cm3",
            "enum": ["kg/L", "kg/m3", "g/cm3"]
        },
        "fuelType": {
            "type": "string",
            "description": "Use the reference density of this fuel when no density is given",
            "enum": ["jet_a1", "jet_a", "avgas"]
        }
    });

    let mut unit_properties = json!({
        "value": { "type": "number", "description": "Quantity or rate to convert" },
        "fromUnit": { "type": "string", "description": "Source unit, e.g. USG, ft, °C" },
        "toUnit": { "type": "string", "description": "Target unit, e.g. L, m, °F" },
        "fromRateUnit": { "type": "string", "description": "Source rate unit, e.g. USD/USG" },
        "toRateUnit": { "type": "string", "description": "Target rate unit, e.g. EUR/L" },
        "perQuantity": {
            "type": "number",
            "description": "Quote covers this many denominator units (4 USD for 2 USG)"
        }
    });
    if let (Some(props), Some(density)) = (unit_properties.as_object_mut(), density_properties.as_object()) {
        props.extend(density.clone());
    }

    json!({
        "tools": [
            {
                "name": "unit_convert",
                "description": "Convert a physical quantity or a compound rate between units. Volume/mass conversions need a density or fuel type.",
                "inputSchema": {
                    "type": "object",
                    "properties": unit_properties,
                    "required": ["value"]
                }
            },
            {
                "name": "currency_convert",
                "description": "Convert a money amount between currencies at the current exchange rate.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "amount": { "type": "number", "description": "Amount to convert" },
                        "fromCurrency": { "type": "string", "description": "ISO code, alias or symbol, e.g. USD, $, ILS" },
                        "toCurrency": { "type": "string", "description": "ISO code, alias or symbol" }
                    },
                    "required": ["amount", "fromCurrency", "toCurrency"]
                }
            },
            {
                "name": "convert",
                "description": "Convert a free-text request such as '2.3 USD/USG to EUR/L' or '1000 L of Jet A-1 to kg'.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "query": { "type": "string", "description": "Conversion request in plain text" }
                    },
                    "required": ["query"]
                }
            },
            {
                "name": "convert_bid",
                "description": "Normalize one fuel bid, or a list of bids, to a tender's base currency and unit of measure.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "bid": { "type": "object", "description": "A single fuel bid" },
                        "bids": { "type": "array", "items": { "type": "object" }, "description": "Bids to convert as a batch" },
                        "tender": {
                            "type": "object",
                            "description": "Tender with baseCurrency, baseUom and optional density or fuelType"
                        }
                    },
                    "required": ["tender"]
                }
            },
            {
                "name": "list_units",
                "description": "List supported units and their aliases, optionally for one dimension.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "dimension": {
                            "type": "string",
                            "enum": ["length", "volume", "mass", "temperature", "area", "speed"]
                        }
                    }
                }
            },
            {
                "name": "list_currencies",
                "description": "List supported currencies with their aliases and symbols.",
                "inputSchema": { "type": "object", "properties": {} }
            },
            {
                "name": "list_fuel_types",
                "description": "List known fuel types and their reference densities.",
                "inputSchema": { "type": "object", "properties": {} }
            }
        ]
    })
}

pub async fn call_tool(engine: &ConversionEngine, params: &Option<JsonValue>) -> Result<JsonValue, McpError> {
    let params = params.as_ref().ok_or_else(|| McpError::invalid_params("Missing params"))?;

    let name = params
        .get("name")
        .and_then(|v| v.as_str())
        .ok_or_else(|| McpError::invalid_params("Missing tool name"))?;

    let args = params.get("arguments").cloned().unwrap_or(json!({}));
    tracing::debug!(tool = name, "tool call");

    match name {
        "unit_convert" => tool_unit_convert(engine, args).await,
        "currency_convert" => tool_currency_convert(engine, args).await,
        "convert" => tool_convert(engine, args).await,
        "convert_bid" => tool_convert_bid(engine, args).await,
        "list_units" => tool_list_units(engine, args),
        "list_currencies" => structured(&engine.list_currencies()),
        "list_fuel_types" => structured(&engine.list_fuel_types()),
        _ => Err(McpError::invalid_params(format!("Unknown tool: {}", name))),
    }
}

fn arguments<T: DeserializeOwned>(args: JsonValue) -> Result<T, McpError> {
    serde_json::from_value(args).map_err(|e| McpError::invalid_params(format!("Invalid arguments: {}", e)))
}

fn internal(err: serde_json::Error) -> McpError {
    McpError::new(crate::protocol::INTERNAL_ERROR, format!("Failed to encode result: {}", err))
}

async fn tool_unit_convert(engine: &ConversionEngine, args: JsonValue) -> Result<JsonValue, McpError> {
    let input: ToolInput = arguments(args)?;
    outcome(engine.convert_input(&input).await.into())
}

async fn tool_currency_convert(engine: &ConversionEngine, args: JsonValue) -> Result<JsonValue, McpError> {
    let request: CurrencyConversion = arguments(args)?;
    outcome(engine.run(&ConversionRequest::Currency(request)).await)
}

#[derive(Deserialize)]
struct ConvertArgs {
    query: String,
}

async fn tool_convert(engine: &ConversionEngine, args: JsonValue) -> Result<JsonValue, McpError> {
    let args: ConvertArgs = arguments(args)?;
    outcome(engine.run_text(&args.query).await)
}

#[derive(Deserialize)]
struct ConvertBidArgs {
    bid: Option<FuelBid>,
    bids: Option<Vec<FuelBid>>,
    tender: FuelTender,
}

async fn tool_convert_bid(engine: &ConversionEngine, args: JsonValue) -> Result<JsonValue, McpError> {
    let args: ConvertBidArgs = arguments(args)?;
    match (args.bid, args.bids) {
        (Some(bid), None) => {
            let converted = engine.convert_bid(&bid, &args.tender).await;
            let summary = match &converted.conversion_error {
                Some(error) => format!("Bid {} converted with errors: {}", bid.id, error),
                None => format!(
                    "Bid {}: {} {} before tax, {} with tax",
                    bid.id,
                    converted.normalized_total_before_tax,
                    args.tender.rate_unit(),
                    converted.normalized_total_with_tax
                ),
            };
            tool_result(summary, &converted, false)
        }
        (None, Some(bids)) => {
            let batch = engine.convert_bids(&bids, &args.tender).await;
            let summary = format!(
                "Converted {} bids to {} ({} with errors)",
                batch.converted_bids.len(),
                args.tender.rate_unit(),
                batch.errors.len()
            );
            tool_result(summary, &batch, false)
        }
        _ => Err(McpError::invalid_params("Provide exactly one of 'bid' or 'bids'")),
    }
}

#[derive(Deserialize)]
struct ListUnitsArgs {
    dimension: Option<String>,
}

fn tool_list_units(engine: &ConversionEngine, args: JsonValue) -> Result<JsonValue, McpError> {
    let args: ListUnitsArgs = arguments(args)?;
    let dimension = match args.dimension.as_deref().map(parse_dimension).transpose() {
        Ok(dimension) => dimension,
        Err(err) => return error_result(&err),
    };
    structured(&engine.list_units(dimension))
}

fn outcome(outcome: ConversionOutcome) -> Result<JsonValue, McpError> {
    match &outcome {
        ConversionOutcome::Success(result) => tool_result(result.explanation.clone(), result, false),
        ConversionOutcome::Failure(error) => tool_result(error.to_string(), error, true),
    }
}

fn error_result(err: &ConvertError) -> Result<JsonValue, McpError> {
    let error = err.to_result();
    tool_result(error.to_string(), &error, true)
}

/// Listing results: the JSON itself is the text
fn structured<T: Serialize>(value: &T) -> Result<JsonValue, McpError> {
    let json = serde_json::to_value(value).map_err(internal)?;
    Ok(json!({
        "content": [{ "type": "text", "text": json.to_string() }],
        "structuredContent": { "items": json },
        "isError": false
    }))
}

fn tool_result<T: Serialize>(text: String, payload: &T, is_error: bool) -> Result<JsonValue, McpError> {
    let payload = serde_json::to_value(payload).map_err(internal)?;
    Ok(json!({
        "content": [
            { "type": "text", "text": text },
            { "type": "text", "text": payload.to_string() }
        ],
        "structuredContent": payload,
        "isError": is_error
    }))
}
