use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use voyage_api::build_app;
use voyage_lookups::LookupConfig;

fn offline_config() -> LookupConfig {
    LookupConfig {
        weather_api_key: None,
        weather_url: "http://127.0.0.1:9/current.json".to_string(),
        nominatim_url: "http://127.0.0.1:9/search".to_string(),
        overpass_url: "http://127.0.0.1:9/interpreter".to_string(),
        wikipedia_url: "http://127.0.0.1:9".to_string(),
        ..LookupConfig::default()
    }
}

fn app() -> Router {
    build_app(&offline_config()).expect("app should build")
}

async fn post_query(app: Router, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/v1/query")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn health_reports_capabilities() {
    let response = app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let parsed: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(parsed["status"], "ok");
    assert_eq!(parsed["capabilities"]["weather_api_key"], false);
    assert_eq!(parsed["metrics"]["queries_total"], 0);
}

#[tokio::test]
async fn blank_query_is_rejected() {
    let (status, body) = post_query(app(), json!({ "text": "   " })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "empty_query");
}

#[tokio::test]
async fn query_without_place_asks_for_a_city() {
    let (status, body) = post_query(app(), json!({ "text": "what is the weather?" })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["response"],
        "I couldn't detect the place you want to visit. Please mention a valid city name."
    );
    assert_eq!(body["trace"]["detected_place"], "");
    assert_eq!(body["trace"]["intent"], "weather");
    assert!(body["trace"].get("weather_result").is_none());
}

#[tokio::test]
async fn missing_weather_key_short_circuits_before_places() {
    let (status, body) = post_query(
        app(),
        json!({ "text": "weather and tourist places in Hyderabad" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let response = body["response"].as_str().unwrap();
    assert!(response.starts_with("Weather API key missing!"));

    let trace = &body["trace"];
    assert_eq!(trace["detected_place"], "Hyderabad");
    assert_eq!(trace["intent"], "both");
    assert_eq!(trace["weather_result"]["success"], false);
    assert!(trace.get("places_result").is_none());
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let text = "going to goa ".repeat(2_000);
    let request = Request::builder()
        .method("POST")
        .uri("/v1/query")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "text": text }).to_string()))
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}
