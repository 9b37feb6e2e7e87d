//! Health check and status endpoints.

use axum::{extract::State, Json};

use crate::rest::dto::{HealthResponse, StatusResponse};
use crate::rest::state::ApiState;

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Get service status with session info
#[utoipa::path(
    get,
    path = "/api/v1/status",
    tag = "Health",
    responses(
        (status = 200, description = "Service status with session info", body = StatusResponse)
    )
)]
pub async fn status(State(state): State<ApiState>) -> Json<StatusResponse> {
    let sessions = state.sessions.read().await;

    Json(StatusResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        active_sessions: sessions.len(),
        catalog_steps: state.catalog.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::persistence::JsonFileGateway;
    use std::path::Path;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_health() {
        let resp = health().await;
        assert_eq!(resp.status, "ok");
        assert!(!resp.version.is_empty());
    }

    #[tokio::test]
    async fn test_status() {
        let gateway = Arc::new(JsonFileGateway::new(Path::new("/tmp/listing-wizard-test")));
        let state = ApiState::new(Config::default(), gateway, None);

        let resp = status(State(state)).await;
        assert_eq!(resp.status, "ok");
        assert_eq!(resp.active_sessions, 0);
        assert_eq!(resp.catalog_steps, 11);
    }
}
