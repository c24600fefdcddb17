//! Integration tests for the HTTP endpoints.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::NaiveDate;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use yield_curves::domain::{Country, Observation};
use yield_curves::query::QueryEngine;
use yield_curves::server::router;
use yield_curves::store::InMemoryStore;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

/// US on three dates (the middle one has a single maturity), UK on one.
fn create_test_app() -> Router {
    let mut observations = Vec::new();
    for date in [d(2024, 6, 3), d(2024, 6, 5)] {
        for (m, y) in [(1.0, 4.5), (2.0, 4.3), (5.0, 4.1), (10.0, 4.2), (30.0, 4.5)] {
            observations.push(Observation::new(date, Country::Us, m, y));
        }
    }
    observations.push(Observation::new(d(2024, 6, 4), Country::Us, 10.0, 4.0));
    for (m, y) in [(5.0, 4.0), (10.0, 4.2), (20.0, 4.6)] {
        observations.push(Observation::new(d(2024, 6, 3), Country::Uk, m, y));
    }

    let store = Arc::new(InMemoryStore::from_observations(observations));
    router(Arc::new(QueryEngine::new(store, d(2024, 1, 1))))
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_health_check() {
    let (status, json) = get(create_test_app(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_latest_uses_most_recent_date() {
    let (status, json) = get(create_test_app(), "/latest?country=US&maturity=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["date"], "2024-06-05");
    assert_eq!(json["country"], "US");
    assert!((json["yield"].as_f64().unwrap() - 0.043).abs() < 1e-12);
}

#[tokio::test]
async fn test_latest_accepts_lowercase_country_and_explicit_date() {
    let (status, json) = get(create_test_app(), "/latest?country=uk&maturity=15&date=2024-06-03").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["country"], "UK");
    let y = json["yield"].as_f64().unwrap();
    assert!(y > 0.042 && y < 0.046);
}

#[tokio::test]
async fn test_latest_rejects_bad_parameters() {
    for uri in [
        "/latest?country=US",
        "/latest?country=US&maturity=abc",
        "/latest?country=US&maturity=-1",
        "/latest?country=FR&maturity=2",
        "/latest?maturity=2",
        "/latest?country=US&maturity=2&date=notadate",
    ] {
        let (status, json) = get(create_test_app(), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert!(json["error"].as_str().unwrap().starts_with("Invalid"), "{uri}");
    }
}

#[tokio::test]
async fn test_latest_missing_data_is_not_found() {
    let (status, json) = get(create_test_app(), "/latest?country=US&maturity=2&date=2024-06-08").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].as_str().unwrap().contains("US"));

    let (status, _) = get(create_test_app(), "/latest?country=US&maturity=2&date=2024-06-04").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_timeseries_shape_and_failure_markers() {
    let (status, json) = get(
        create_test_app(),
        "/timeseries?country=US&maturity=10&start=2024-06-01&end=2024-06-30",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["country"], "US");
    assert_eq!(json["maturity"].as_f64(), Some(10.0));

    let data = json["data"].as_array().unwrap();
    assert_eq!(data.len(), 3);
    assert_eq!(data[0]["date"], "2024-06-03");
    assert!((data[0]["yield"].as_f64().unwrap() - 0.042).abs() < 1e-12);
    assert!(data[0].get("error").is_none());

    assert_eq!(data[1]["date"], "2024-06-04");
    assert!(data[1]["yield"].is_null());
    assert!(data[1]["error"].is_string());

    assert_eq!(data[2]["date"], "2024-06-05");
}

#[tokio::test]
async fn test_timeseries_ignores_unparsable_bounds() {
    let (status, json) = get(create_test_app(), "/timeseries?country=US&maturity=10&start=soon&end=2024-06-03").await;
    assert_eq!(status, StatusCode::OK);
    let data = json["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["date"], "2024-06-03");
}

#[tokio::test]
async fn test_timeseries_requires_maturity() {
    let (status, _) = get(create_test_app(), "/timeseries?country=US").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
