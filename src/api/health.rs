use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;

use crate::state::AppState;

#[derive(Serialize, ToSchema)]
pub struct HealthStatus {
    pub status: String,
    pub store: String,
    pub error: Option<String>,
}

#[utoipa::path(
    get,
    path = "/health/live",
    responses((status = 200, description = "Process is up")),
    tag = "health"
)]
pub async fn live() -> impl IntoResponse {
    (StatusCode::OK, "live")
}

#[utoipa::path(
    get,
    path = "/health/ready",
    responses(
        (status = 200, description = "Store reachable", body = HealthStatus),
        (status = 500, description = "Store unreachable", body = HealthStatus)
    ),
    tag = "health"
)]
pub async fn ready(State(state): State<AppState>) -> impl IntoResponse {
    let (store_status, store_error) = match state.store.ping().await {
        Ok(()) => ("ok", None),
        Err(e) => {
            error!(error = %e, "Store health check failed");
            ("error", Some(e.to_string()))
        }
    };
    let healthy = store_error.is_none();
    let health = HealthStatus {
        status: if healthy { "ok" } else { "degraded" }.to_string(),
        store: store_status.to_string(),
        error: store_error,
    };
    let code = if healthy { StatusCode::OK } else { StatusCode::INTERNAL_SERVER_ERROR };
    (code, Json(health))
}
