use axum::http::StatusCode;
use splitsim::api::{self, AppState};
use splitsim::config::Config;
use splitsim::{MemoryStore, SelectionScope, SessionOptions, SimulatorSession};
use std::sync::Arc;
use tower::util::ServiceExt;

async fn setup_test_app() -> axum::Router {
    let config = Config {
        port: 0,
        database_path: String::new(),
        storage_key_prefix: "split_".to_string(),
        selection_scope: SelectionScope::Shared,
        max_split_count: 50,
    };
    let store = Arc::new(MemoryStore::new());
    let session = SimulatorSession::load(store, SessionOptions::from(&config))
        .await
        .expect("load failed");
    api::create_router(AppState::new(session, config))
}

async fn post(
    app: axum::Router,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let req = axum::http::Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(axum::body::Body::from(body.to_string()))
        .unwrap();

    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn example_request() -> serde_json::Value {
    serde_json::json!({
        "currentPrice": 100,
        "totalCapital": 1000,
        "splitCount": 4,
        "dropRate": 10,
        "martingaleMultiplier": 2
    })
}

#[tokio::test]
async fn test_simulate_returns_both_schedules() {
    let app = setup_test_app().await;
    let (status, body) = post(app, "/v1/simulate", example_request()).await;
    assert_eq!(status, StatusCode::OK);

    let equal = &body["equal"];
    assert_eq!(equal["rows"].as_array().unwrap().len(), 4);
    assert_eq!(equal["rows"][0]["entryAmount"].as_f64(), Some(250.0));
    assert_eq!(equal["display"]["rows"][0]["quantity"], "2.5");

    let martingale = &body["martingale"];
    let first = martingale["rows"][0]["entryAmount"].as_f64().unwrap();
    let last = martingale["rows"][3]["entryAmount"].as_f64().unwrap();
    assert!((first - 1000.0 / 15.0).abs() < 1e-9);
    assert!((last - 8000.0 / 15.0).abs() < 1e-9);
    assert_eq!(martingale["display"]["rows"][3]["entryAmount"], "533");
    assert_eq!(martingale["summary"]["totalEntryAmount"].as_f64(), Some(1000.0));
}

#[tokio::test]
async fn test_simulate_zero_multiplier_is_bad_request() {
    let app = setup_test_app().await;
    let mut request = example_request();
    request["martingaleMultiplier"] = serde_json::json!(0);

    let (status, body) = post(app, "/v1/simulate", request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("martingaleMultiplier"));
}

#[tokio::test]
async fn test_simulate_missing_field_is_bad_request() {
    let app = setup_test_app().await;
    let mut request = example_request();
    request.as_object_mut().unwrap().remove("dropRate");

    let (status, body) = post(app, "/v1/simulate", request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("dropRate"));
}

#[tokio::test]
async fn test_simulate_fractional_count_is_bad_request() {
    let app = setup_test_app().await;
    let mut request = example_request();
    request["splitCount"] = serde_json::json!(3.5);

    let (status, _) = post(app, "/v1/simulate", request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_simulate_respects_count_ceiling() {
    let app = setup_test_app().await;
    let mut request = example_request();
    request["splitCount"] = serde_json::json!(51);

    let (status, body) = post(app, "/v1/simulate", request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("maximum"));
}

#[tokio::test]
async fn test_aggregate_over_simulated_schedule() {
    let app = setup_test_app().await;
    let (_, simulated) = post(app.clone(), "/v1/simulate", example_request()).await;

    let schedule = serde_json::json!({
        "rows": simulated["equal"]["rows"],
        "summary": simulated["equal"]["summary"],
    });

    let (status, body) = post(
        app.clone(),
        "/v1/aggregate",
        serde_json::json!({ "schedule": schedule, "executedRounds": [1, 3] }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let total = body["summary"]["totalEntryAmount"].as_f64().unwrap();
    assert!((total - 500.0).abs() < 1e-9);
    assert_eq!(body["display"]["totalEntryAmount"], "500");

    let (status, body) = post(
        app,
        "/v1/aggregate",
        serde_json::json!({ "schedule": schedule }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["summary"], simulated["equal"]["summary"]);
}
