use std::net::TcpListener;
use std::time::Duration;

use fuelrate_core::ErrorKind;
use fuelrate_currency::{
    ExchangeRateApiClient, ExchangeRateApiConfig, ExchangeRateProvider, EXCHANGERATE_API_SOURCE,
};
use httpmock::Method::GET;
use httpmock::MockServer;
use serde_json::json;

fn can_bind_localhost() -> bool {
    TcpListener::bind("127.0.0.1:0").is_ok()
}

fn client_for(server: &MockServer) -> ExchangeRateApiClient {
    let config = ExchangeRateApiConfig::new("test-key")
        .with_base_url(server.url("/v6"))
        .with_timeout(Duration::from_millis(500));
    ExchangeRateApiClient::new(config).expect("client")
}

#[tokio::test]
async fn fetches_rate_from_conversion_rates() {
    if !can_bind_localhost() {
        eprintln!("skipping: cannot bind localhost");
        return;
    }

    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/v6/test-key/latest/USD");
            then.status(200).json_body(json!({
                "result": "success",
                "base_code": "USD",
                "time_last_update_utc": "Fri, 27 Mar 2026 00:00:01 +0000",
                "conversion_rates": { "USD": 1.0, "EUR": 0.92, "ILS": 3.7 }
            }));
        })
        .await;

    let client = client_for(&server);
    let quote = client.get_rate("USD", "EUR").await.unwrap();

    mock.assert_async().await;
    assert_eq!(quote.base, "USD");
    assert_eq!(quote.quote, "EUR");
    assert_eq!(quote.rate, 0.92);
    assert_eq!(quote.source, EXCHANGERATE_API_SOURCE);
    assert_eq!(quote.timestamp, "Fri, 27 Mar 2026 00:00:01 +0000");
}

#[tokio::test]
async fn shekel_is_published_as_ils() {
    if !can_bind_localhost() {
        return;
    }

    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v6/test-key/latest/USD");
            then.status(200).json_body(json!({
                "result": "success",
                "conversion_rates": { "USD": 1.0, "ILS": 3.7 }
            }));
        })
        .await;
    let from_shekel = server
        .mock_async(|when, then| {
            when.method(GET).path("/v6/test-key/latest/ILS");
            then.status(200).json_body(json!({
                "result": "success",
                "conversion_rates": { "ILS": 1.0, "USD": 0.27 }
            }));
        })
        .await;

    let client = client_for(&server);
    let quote = client.get_rate("USD", "NIS").await.unwrap();
    assert_eq!(quote.quote, "NIS");
    assert_eq!(quote.rate, 3.7);

    let quote = client.get_rate("NIS", "USD").await.unwrap();
    from_shekel.assert_async().await;
    assert_eq!(quote.base, "NIS");
    assert_eq!(quote.rate, 0.27);
}

#[tokio::test]
async fn missing_quote_is_rate_unavailable() {
    if !can_bind_localhost() {
        return;
    }

    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v6/test-key/latest/USD");
            then.status(200).json_body(json!({
                "result": "success",
                "conversion_rates": { "USD": 1.0 }
            }));
        })
        .await;

    let err = client_for(&server).get_rate("USD", "CHF").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RateUnavailable);
    assert!(err.to_string().contains("CHF"));
}

#[tokio::test]
async fn error_status_is_rate_unavailable() {
    if !can_bind_localhost() {
        return;
    }

    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v6/test-key/latest/USD");
            then.status(503).body("unavailable");
        })
        .await;

    let err = client_for(&server).get_rate("USD", "EUR").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RateUnavailable);
    assert!(err.to_string().contains("503"));
}

#[tokio::test]
async fn api_level_error_is_rate_unavailable() {
    if !can_bind_localhost() {
        return;
    }

    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v6/test-key/latest/USD");
            then.status(200).json_body(json!({
                "result": "error",
                "error-type": "invalid-key"
            }));
        })
        .await;

    let err = client_for(&server).get_rate("USD", "EUR").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RateUnavailable);
    assert!(err.to_string().contains("invalid-key"));
}

#[tokio::test]
async fn malformed_payload_is_rate_unavailable() {
    if !can_bind_localhost() {
        return;
    }

    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v6/test-key/latest/USD");
            then.status(200).body("not json");
        })
        .await;

    let err = client_for(&server).get_rate("USD", "EUR").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RateUnavailable);
}

#[tokio::test]
async fn slow_upstream_times_out() {
    if !can_bind_localhost() {
        return;
    }

    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v6/test-key/latest/USD");
            then.status(200)
                .delay(Duration::from_secs(2))
                .json_body(json!({ "result": "success", "conversion_rates": { "EUR": 0.9 } }));
        })
        .await;

    let err = client_for(&server).get_rate("USD", "EUR").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RateUnavailable);
    assert!(err.to_string().contains("timed out"));
}

#[tokio::test]
async fn error_messages_never_contain_the_key() {
    if !can_bind_localhost() {
        return;
    }

    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v6/test-key/latest/USD");
            then.status(500);
        })
        .await;

    let err = client_for(&server).get_rate("USD", "EUR").await.unwrap_err();
    assert!(!err.to_string().contains("test-key"));
}
