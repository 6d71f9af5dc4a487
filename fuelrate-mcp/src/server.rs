//! Request dispatch

use serde_json::{json, Value as JsonValue};
use fuelrate::ConversionEngine;

use crate::protocol::{McpError, McpRequest, McpResponse, INVALID_REQUEST, JSONRPC_VERSION, METHOD_NOT_FOUND};
use crate::tools;

pub const PROTOCOL_VERSION: &str = "2025-11-25";
pub const SERVER_NAME: &str = "fuelrate";
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

pub async fn handle_request(engine: &ConversionEngine, request: &McpRequest) -> McpResponse {
    let result = if request.jsonrpc != JSONRPC_VERSION {
        Err(McpError::new(INVALID_REQUEST, format!("Unsupported jsonrpc version '{}'", request.jsonrpc)))
    } else {
        match request.method.as_str() {
            // Lifecycle
            "initialize" => handle_initialize(engine, &request.params),
            "initialized" | "notifications/initialized" => Ok(json!({})),
            "ping" => Ok(json!({})),

            // Tools
            "tools/list" => Ok(tools::tools_list()),
            "tools/call" => tools::call_tool(engine, &request.params).await,

            _ => Err(McpError::new(METHOD_NOT_FOUND, format!("Method not found: {}", request.method))),
        }
    };

    match result {
        Ok(r) => McpResponse::success(request.id.clone(), r),
        Err(e) => {
            tracing::debug!(method = %request.method, code = e.code, error = %e.message, "request failed");
            McpResponse::failure(request.id.clone(), e)
        }
    }
}

fn handle_initialize(engine: &ConversionEngine, params: &Option<JsonValue>) -> Result<JsonValue, McpError> {
    let client_info = params
        .as_ref()
        .and_then(|p| p.get("clientInfo"))
        .and_then(|c| c.get("name"))
        .and_then(|n| n.as_str())
        .unwrap_or("unknown");

    // Use client's protocol version for compatibility
    let client_protocol = params
        .as_ref()
        .and_then(|p| p.get("protocolVersion"))
        .and_then(|v| v.as_str())
        .unwrap_or(PROTOCOL_VERSION);

    tracing::info!(client = client_info, protocol = client_protocol, "client connected");

    Ok(json!({
        "protocolVersion": client_protocol,
        "serverInfo": {
            "name": SERVER_NAME,
            "version": SERVER_VERSION,
            "description": "Unit, currency and fuel-rate conversion"
        },
        "capabilities": {
            "tools": {
                "listChanged": false
            }
        },
        "instructions": format!(
            "Fuelrate converts physical units, currencies and fuel prices such as 2.3 USD/USG to EUR/L. \
             Volume/mass conversions need a density or a fuel type (see list_fuel_types). \
             Failed conversions return isError with a machine-readable error code. Exchange rates: {}.",
            engine.rate_source()
        )
    }))
}
