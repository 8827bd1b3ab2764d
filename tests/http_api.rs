use currency_converter::config::AppConfig;
use currency_converter::routes::{routes, AppState};
use serde_json::{json, Value};
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod test_utils {
    use super::*;

    /// Mock of the upstream `latest/{BASE}` endpoint.
    pub async fn mount_rates(server: &MockServer, base: &str, rates: Value, expected_calls: u64) {
        Mock::given(method("GET"))
            .and(path(format!("/{base}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "result": "success",
                "base_code": base,
                "rates": rates,
            })))
            .expect(expected_calls)
            .mount(server)
            .await;
    }

    pub async fn mount_outage(server: &MockServer) {
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(server)
            .await;
    }

    pub async fn app_state(upstream: &MockServer) -> (TempDir, AppState) {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let config = AppConfig {
            database_url: format!("sqlite://{}", dir.path().join("historial.db").display()),
            rates_api_url: upstream.uri(),
            request_timeout: Duration::from_secs(2),
            ..AppConfig::default()
        };
        let state = currency_converter::build_state(&config)
            .await
            .expect("Failed to build app state");
        (dir, state)
    }

    pub fn body_json(body: &[u8]) -> Value {
        serde_json::from_slice(body).expect("Response is not JSON")
    }
}

use test_utils::*;

async fn post_json(state: &AppState, body: Value) -> (u16, Value) {
    let api = routes(state.clone());
    let response = warp::test::request()
        .method("POST")
        .path("/convertir")
        .json(&body)
        .reply(&api)
        .await;
    (response.status().as_u16(), body_json(response.body()))
}

async fn get_json(state: &AppState, uri: &str) -> (u16, Value) {
    let api = routes(state.clone());
    let response = warp::test::request().method("GET").path(uri).reply(&api).await;
    (response.status().as_u16(), body_json(response.body()))
}

#[tokio::test]
async fn test_convert_live_rate_then_cached() {
    let upstream = MockServer::start().await;
    // A second conversion inside the freshness window must not hit the network
    mount_rates(&upstream, "VES", json!({ "VES": 1, "PYG": 220.0, "USD": 0.028 }), 1).await;
    let (_dir, state) = app_state(&upstream).await;

    let (status, body) = post_json(
        &state,
        json!({ "amount": 1000, "sourceCode": "VES", "targetCode": "PYG" }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["amount"], 1000.0);
    assert_eq!(body["formattedResult"], "220,000 Guaraní paraguayo");
    assert_eq!(body["rate"], "220.000000");
    assert_eq!(body["rateSource"], "live");

    let (status, body) = post_json(
        &state,
        json!({ "amount": "10", "sourceCode": "VES", "targetCode": "USD" }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["formattedResult"], "0.28 Dólar estadounidense");
    assert_eq!(body["rateSource"], "cached");
}

#[tokio::test]
async fn test_convert_accepts_legacy_field_names_and_forms() {
    let upstream = MockServer::start().await;
    mount_rates(&upstream, "USD", json!({ "EUR": 0.5 }), 1).await;
    let (_dir, state) = app_state(&upstream).await;

    let (status, body) = post_json(
        &state,
        json!({ "cantidad": "3", "moneda_origen": "USD", "moneda_destino": "EUR" }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["formattedResult"], "1.50 Euro");

    let api = routes(state.clone());
    let response = warp::test::request()
        .method("POST")
        .path("/convertir")
        .header("content-type", "application/x-www-form-urlencoded")
        .body("amount=4&sourceCode=usd&targetCode=eur")
        .reply(&api)
        .await;
    assert_eq!(response.status().as_u16(), 200);
    let body = body_json(response.body());
    assert_eq!(body["formattedResult"], "2.00 Euro");
    assert_eq!(body["sourceCode"], "USD");
}

#[tokio::test]
async fn test_same_currency_is_identity() {
    let upstream = MockServer::start().await;
    mount_rates(&upstream, "EUR", json!({}), 0).await;
    let (_dir, state) = app_state(&upstream).await;

    let (status, body) = post_json(
        &state,
        json!({ "amount": 5, "sourceCode": "EUR", "targetCode": "EUR" }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["formattedResult"], "5.00 Euro");
    assert_eq!(body["rate"], "1.000000");
    assert_eq!(body["rateSource"], "identity");
}

#[tokio::test]
async fn test_validation_errors_are_400_without_upstream_calls() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&upstream)
        .await;
    let (_dir, state) = app_state(&upstream).await;

    let cases = [
        (json!({ "amount": 0, "sourceCode": "USD", "targetCode": "EUR" }), "Amount must be greater than zero."),
        (json!({ "amount": -3, "sourceCode": "USD", "targetCode": "EUR" }), "Amount must be greater than zero."),
        (json!({ "amount": "abc", "sourceCode": "USD", "targetCode": "EUR" }), "Invalid amount."),
        (json!({ "amount": 10, "sourceCode": "USD", "targetCode": "BTC" }), "Invalid currency."),
        (json!({ "amount": 10, "sourceCode": "USD" }), "Missing parameters."),
        (json!({ "amount": true, "sourceCode": "USD", "targetCode": "EUR" }), "Invalid request body."),
    ];

    for (request, message) in cases {
        let (status, body) = post_json(&state, request).await;
        assert_eq!(status, 400);
        assert_eq!(body["error"], message);
    }

    let (_, history) = get_json(&state, "/historial").await;
    assert_eq!(history, json!([]));
}

#[tokio::test]
async fn test_upstream_outage_falls_back_to_default_table() {
    let upstream = MockServer::start().await;
    mount_outage(&upstream).await;
    let (_dir, state) = app_state(&upstream).await;

    let (status, body) = post_json(
        &state,
        json!({ "amount": 2, "sourceCode": "USD", "targetCode": "PYG" }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["formattedResult"], "14,600 Guaraní paraguayo");
    assert_eq!(body["rate"], "7,300.000000");
    assert_eq!(body["rateSource"], "default");
}

#[tokio::test]
async fn test_overflowing_conversion_is_400_and_not_logged() {
    let upstream = MockServer::start().await;
    mount_outage(&upstream).await;
    let (_dir, state) = app_state(&upstream).await;

    let (status, body) = post_json(
        &state,
        json!({ "amount": 1e308, "sourceCode": "USD", "targetCode": "PYG" }),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Invalid amount.");

    let (_, history) = get_json(&state, "/historial").await;
    assert_eq!(history, json!([]));
}

#[tokio::test]
async fn test_unresolvable_rate_is_500_and_not_logged() {
    let upstream = MockServer::start().await;
    mount_outage(&upstream).await;
    let (_dir, state) = app_state(&upstream).await;

    let (status, body) = post_json(
        &state,
        json!({ "amount": 2, "sourceCode": "GBP", "targetCode": "JPY" }),
    )
    .await;
    assert_eq!(status, 500);
    assert_eq!(body["error"], "Could not obtain the exchange rate.");

    let (_, history) = get_json(&state, "/historial").await;
    assert_eq!(history, json!([]));
}

#[tokio::test]
async fn test_history_is_limited_and_newest_first() {
    let upstream = MockServer::start().await;
    mount_rates(&upstream, "USD", json!({ "EUR": 0.5 }), 1).await;
    let (_dir, state) = app_state(&upstream).await;

    for amount in 1..=7 {
        let (status, _) = post_json(
            &state,
            json!({ "amount": amount, "sourceCode": "USD", "targetCode": "EUR" }),
        )
        .await;
        assert_eq!(status, 200);
    }

    let (status, history) = get_json(&state, "/historial").await;
    assert_eq!(status, 200);
    let entries = history.as_array().expect("history is an array");
    assert_eq!(entries.len(), 5);
    let amounts: Vec<f64> = entries.iter().filter_map(|e| e["amount"].as_f64()).collect();
    assert_eq!(amounts, vec![7.0, 6.0, 5.0, 4.0, 3.0]);
    assert_eq!(entries[0]["sourceName"], "Dólar estadounidense");
    assert_eq!(entries[0]["targetFlag"], "https://flagcdn.com/eu.svg");
    assert_eq!(entries[0]["formattedResult"], "3.50 Euro");

    let (_, history) = get_json(&state, "/historial?limit=2").await;
    assert_eq!(history.as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn test_health_index_and_not_found() {
    let upstream = MockServer::start().await;
    let (_dir, state) = app_state(&upstream).await;

    let (status, body) = get_json(&state, "/health").await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({ "status": "ok" }));

    let api = routes(state.clone());
    let response = warp::test::request().method("GET").path("/").reply(&api).await;
    assert_eq!(response.status().as_u16(), 200);
    let page = String::from_utf8_lossy(response.body());
    assert!(page.contains("Currency converter"));
    assert!(page.contains("No conversions yet."));

    let (status, body) = get_json(&state, "/nope").await;
    assert_eq!(status, 404);
    assert_eq!(body["error"], "Not Found");
}
