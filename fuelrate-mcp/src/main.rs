//! Fuelrate MCP Server
//!
//! Line-delimited JSON-RPC over stdio. Logs go to stderr; stdout carries
//! only protocol messages.
//!
//! Tools:
//! - unit_convert: Convert a quantity or compound rate between units
//! - currency_convert: Convert a money amount between currencies
//! - convert: Convert a free-text request
//! - convert_bid: Normalize fuel bids to a tender's currency and UOM
//! - list_units: List units, optionally by dimension
//! - list_currencies: List supported currencies
//! - list_fuel_types: List fuel types and reference densities

mod config;
mod protocol;
mod server;
mod tools;

use std::sync::Arc;
use tokio::io::{self, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing_subscriber::EnvFilter;
use fuelrate::{ConversionEngine, DisabledRateProvider, ExchangeRateApiClient, ExchangeRateProvider};

use crate::config::Config;
use crate::protocol::{McpError, McpRequest, McpResponse, PARSE_ERROR};

fn build_engine(config: &Config) -> Result<ConversionEngine, Box<dyn std::error::Error>> {
    let rates: Arc<dyn ExchangeRateProvider> = match config.exchange_rate_api() {
        Some(api) => Arc::new(ExchangeRateApiClient::new(api)?),
        None => {
            tracing::warn!("{} is not set; currency conversions will fail", config::API_KEY_VAR);
            Arc::new(DisabledRateProvider::default())
        }
    };
    Ok(ConversionEngine::with_rate_provider(rates).with_display_options(config.display))
}

async fn write_response<W>(out: &mut W, response: &McpResponse) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut line = serde_json::to_string(response).map_err(io::Error::other)?;
    line.push('\n');
    out.write_all(line.as_bytes()).await?;
    out.flush().await
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            return Err(e.into());
        }
    };
    let engine = build_engine(&config)?;

    tracing::info!(
        version = server::SERVER_VERSION,
        protocol = server::PROTOCOL_VERSION,
        rates = engine.rate_source(),
        significant_figures = config.display.significant_figures,
        "Fuelrate MCP Server started"
    );

    let mut lines = BufReader::new(io::stdin()).lines();
    let mut stdout = io::stdout();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => {
                tracing::info!("client disconnected (EOF)");
                break;
            }
            Err(e) => {
                tracing::error!(error = %e, "error reading input");
                break;
            }
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let request: McpRequest = match serde_json::from_str(line) {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = %e, "unparseable request");
                let response = McpResponse::failure(None, McpError::new(PARSE_ERROR, format!("Parse error: {}", e)));
                if let Err(e) = write_response(&mut stdout, &response).await {
                    tracing::error!(error = %e, "error writing response");
                    break;
                }
                continue;
            }
        };

        tracing::debug!(method = %request.method, "processing");
        let response = server::handle_request(&engine, &request).await;

        // Notifications (no id) should NOT receive a response
        if request.is_notification() {
            continue;
        }

        if let Err(e) = write_response(&mut stdout, &response).await {
            tracing::error!(error = %e, "error writing response");
            break;
        }
    }

    tracing::info!("server shutting down");
    Ok(())
}
