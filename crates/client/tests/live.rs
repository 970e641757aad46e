//! Tests against the production service.
//!
//! Ignored by default. Run with
//! `AMBERDATA_API_KEY=... cargo test -p amberdata-client --test live -- --ignored`.

use amberdata_client::{ApiResponse, DerivativesClient, QueryParams, TimeFormat};
use amberdata_core::API_KEY_ENV;
use serde_json::Value;

fn client() -> DerivativesClient {
    let api_key = std::env::var(API_KEY_ENV).expect("AMBERDATA_API_KEY must be set");
    DerivativesClient::new(api_key).unwrap()
}

fn april_2024() -> QueryParams {
    QueryParams::new()
        .start_date("2024-04-01T00:00:00")
        .end_date("2024-05-01T00:00:00")
}

fn rows(body: &Value) -> &[Value] {
    ApiResponse::new(body).data().expect("response has no data array")
}

#[tokio::test]
#[ignore]
async fn test_volumes_historical() {
    let body = client()
        .get_futures_perpetuals_volumes("BTC", april_2024())
        .await
        .unwrap();

    let response = ApiResponse::new(&body);
    assert_eq!(response.status(), Some(200));
    assert_eq!(response.len(), 240);
    assert!(rows(&body).iter().all(|row| row["underlying"] == "BTC"));
}

#[tokio::test]
#[ignore]
async fn test_volumes_time_format_changes_only_timestamps() {
    let client = client();
    let default = client
        .get_futures_perpetuals_volumes("BTC", april_2024())
        .await
        .unwrap();
    let hr = client
        .get_futures_perpetuals_volumes("BTC", april_2024().time_format(TimeFormat::Hr))
        .await
        .unwrap();
    let iso = client
        .get_futures_perpetuals_volumes("BTC", april_2024().time_format(TimeFormat::Iso))
        .await
        .unwrap();

    assert_eq!(rows(&default).len(), rows(&hr).len());
    assert_eq!(rows(&default).len(), rows(&iso).len());

    assert!(rows(&default)[0]["timestamp"].is_u64());
    assert!(rows(&hr)[0]["timestamp"].is_string());
    let iso_ts = rows(&iso)[0]["timestamp"].as_str().unwrap();
    assert!(iso_ts.contains('T'));

    for ((d, h), i) in rows(&default).iter().zip(rows(&hr)).zip(rows(&iso)) {
        assert_eq!(d["underlying"], h["underlying"]);
        assert_eq!(d["underlying"], i["underlying"]);
    }
}

#[tokio::test]
#[ignore]
async fn test_volumes_time_frame_buckets() {
    let body = client()
        .get_futures_perpetuals_volumes(
            "BTC",
            april_2024().time_format(TimeFormat::Hr).time_frame("7d"),
        )
        .await
        .unwrap();
    assert_eq!(ApiResponse::new(&body).len(), 40);
}

#[tokio::test]
#[ignore]
async fn test_unknown_parameter_returns_error_payload() {
    let body = client()
        .get_futures_perpetuals_volumes("BTC", QueryParams::new().with("invalid", "parameter"))
        .await
        .unwrap();
    assert!(ApiResponse::new(&body).is_error());
}

#[tokio::test]
#[ignore]
async fn test_invalid_margin_type_returns_error_payload() {
    let body = client()
        .get_futures_perpetuals_realized_funding_rates_cumulated(
            "BTC",
            "<margin_type>",
            QueryParams::new(),
        )
        .await
        .unwrap();
    assert!(ApiResponse::new(&body).is_error());
}

#[tokio::test]
#[ignore]
async fn test_unknown_asset_returns_empty_set() {
    let body = client()
        .get_futures_perpetuals_volumes("<asset>", QueryParams::new())
        .await
        .unwrap();

    let response = ApiResponse::new(&body);
    assert!(!response.is_error());
    assert!(response.is_empty());
}
