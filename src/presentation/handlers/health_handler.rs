use crate::presentation::http::AppState;
use crate::shared::metrics;
use crate::SERVICE_NAME;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
struct HealthStatus {
    status: String,
}

pub async fn healthz(State(state): State<AppState>) -> impl IntoResponse {
    match state.repository.health_check().await {
        Ok(true) => (StatusCode::OK, Json(HealthStatus { status: "ok".into() })),
        Ok(false) | Err(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthStatus {
                status: "unavailable".into(),
            }),
        ),
    }
}

pub async fn metrics_endpoint() -> impl IntoResponse {
    metrics::metrics_response(SERVICE_NAME)
}
