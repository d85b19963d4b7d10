use std::sync::Arc;

use anyhow::Result;
use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use voyage_agents::TravelAgent;
use voyage_lookups::{HttpLookups, LookupConfig, OverpassPlacesClient, WeatherApiClient};
use voyage_observability::AppMetrics;

const MAX_BODY_BYTES: usize = 16 * 1024;

pub type HttpTravelAgent = TravelAgent<WeatherApiClient, OverpassPlacesClient>;

#[derive(Clone)]
pub struct ApiState {
    pub agent: Arc<HttpTravelAgent>,
    pub metrics: Arc<AppMetrics>,
}

#[derive(Debug, Deserialize)]
struct QueryRequest {
    text: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp_utc: String,
    metrics: voyage_observability::MetricsSnapshot,
    capabilities: HealthCapabilities,
}

#[derive(Debug, Serialize)]
struct HealthCapabilities {
    weather_api_key: bool,
}

pub fn build_app(config: &LookupConfig) -> Result<Router> {
    let metrics = AppMetrics::shared();
    let lookups = HttpLookups::from_config(config)?;
    let agent = Arc::new(TravelAgent::new(
        lookups.weather,
        lookups.places,
        metrics.clone(),
    ));

    Ok(router(ApiState { agent, metrics }))
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/v1/query", post(query))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .with_state(state)
}

async fn health(State(state): State<ApiState>) -> impl IntoResponse {
    let payload = HealthResponse {
        status: "ok",
        timestamp_utc: chrono::Utc::now().to_rfc3339(),
        metrics: state.metrics.snapshot(),
        capabilities: HealthCapabilities {
            weather_api_key: state.agent.weather().has_credential(),
        },
    };
    (StatusCode::OK, Json(payload))
}

async fn query(
    State(state): State<ApiState>,
    Json(request): Json<QueryRequest>,
) -> impl IntoResponse {
    let text = request.text.trim();
    if text.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "error": "empty_query",
                "message": "Please type a question first."
            })),
        )
            .into_response();
    }

    let reply = state.agent.handle(text).await;
    (StatusCode::OK, Json(reply)).into_response()
}
