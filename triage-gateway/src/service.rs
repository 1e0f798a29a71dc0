//! Transparent relay in front of the extraction/prediction backend.
//!
//! Request bodies are forwarded unmodified; upstream status and body come
//! back verbatim, whatever they are. The only failure this layer owns is not
//! reaching the backend at all, which becomes a fixed internal-error payload.
//! No retries, no validation: resilience belongs to the backend services.

use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use serde_json::{Value, json};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

#[derive(Clone)]
pub struct AppState {
    pub http: reqwest::Client,
    pub backend_url: String,
}

pub fn create_app(backend_url: impl Into<String>) -> Router {
    let app_state = AppState {
        http: reqwest::Client::new(),
        backend_url: backend_url.into().trim_end_matches('/').to_string(),
    };
    build_router(app_state)
}

fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/api/extract", post(relay_extract))
        .route("/api/predict", post(relay_predict))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

async fn root() -> Json<Value> {
    Json(json!({
        "service": "Symptom Triage Gateway",
        "version": "1.0.0",
        "description": "Relays extraction and disease-prediction requests to the triage backend",
        "endpoints": {
            "POST /api/extract": "Extract symptom mentions and normalize them to HPO",
            "POST /api/predict": "Rank candidate diseases over confirmed HPO ids",
            "GET /health": "Health check"
        }
    }))
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn relay_extract(State(state): State<AppState>, body: Bytes) -> Response {
    relay(&state, "/extract", body).await
}

async fn relay_predict(State(state): State<AppState>, body: Bytes) -> Response {
    relay(&state, "/predict", body).await
}

async fn relay(state: &AppState, endpoint: &str, body: Bytes) -> Response {
    let url = format!("{}{}", state.backend_url, endpoint);
    info!("relaying {} byte(s) to {}", body.len(), url);

    let upstream = match state
        .http
        .post(&url)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body)
        .send()
        .await
    {
        Ok(upstream) => upstream,
        Err(e) => {
            error!("relay to {} failed: {}", url, e);
            return internal_error();
        }
    };

    let status =
        StatusCode::from_u16(upstream.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
    let content_type = upstream
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("application/json")
        .to_string();

    match upstream.bytes().await {
        Ok(bytes) => (status, [(header::CONTENT_TYPE, content_type)], bytes).into_response(),
        Err(e) => {
            error!("failed to read upstream body from {}: {}", url, e);
            internal_error()
        }
    }
}

fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Internal server error" })),
    )
        .into_response()
}
