//! REST API for listing wizard sessions.
//!
//! Exposes the step catalog and lets a front-end drive a wizard session:
//! open or resume a listing, patch its form, and move between steps.

use std::future::Future;
use std::net::SocketAddr;

use anyhow::Result;
use axum::{
    routing::{get, patch, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod dto;
pub mod error;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use state::ApiState;

/// Default port for the REST API server
pub const DEFAULT_PORT: u16 = 7010;

/// Build the API router with all routes
pub fn build_router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health endpoints
        .route("/api/v1/health", get(routes::health::health))
        .route("/api/v1/status", get(routes::health::status))
        // Step endpoints
        .route("/api/v1/steps", get(routes::steps::list))
        // Session endpoints
        .route(
            "/api/v1/sessions",
            get(routes::sessions::list).post(routes::sessions::create),
        )
        .route(
            "/api/v1/sessions/:id",
            get(routes::sessions::get_one).delete(routes::sessions::delete),
        )
        .route(
            "/api/v1/sessions/:id/form",
            patch(routes::sessions::patch_form),
        )
        .route(
            "/api/v1/sessions/:id/advance",
            post(routes::sessions::advance),
        )
        .route(
            "/api/v1/sessions/:id/retreat",
            post(routes::sessions::retreat),
        )
        .route("/api/v1/sessions/:id/jump", post(routes::sessions::jump))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start the REST API server, stopping on Ctrl-C
pub async fn serve(state: ApiState, port: u16) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("REST API listening on http://{}", addr);

    serve_until(listener, state, shutdown_signal()).await
}

/// Serve on a bound listener until `shutdown` resolves.
///
/// The router and its state are dropped on return, which closes every
/// write-behind sender held by open sessions.
pub async fn serve_until<F>(
    listener: tokio::net::TcpListener,
    state: ApiState,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_router(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("REST API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::persistence::JsonFileGateway;
    use std::path::Path;
    use std::sync::Arc;

    #[test]
    fn test_build_router() {
        let gateway = Arc::new(JsonFileGateway::new(Path::new("/tmp/listing-wizard-test")));
        let state = ApiState::new(Config::default(), gateway, None);
        let _router = build_router(state);
        // Router builds without panicking
    }

    #[tokio::test]
    async fn test_shutdown_drains_write_behind() {
        use crate::persistence::PersistenceGateway;
        use crate::rest::dto::CreateSessionRequest;
        use crate::rest::routes::sessions;
        use axum::extract::{Path as PathParam, State};
        use axum::Json;
        use tempfile::TempDir;
        use tokio::sync::oneshot;

        let temp_dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.paths.state = temp_dir.path().to_string_lossy().to_string();
        let (state, writer_handle) = ApiState::with_json_store(config);

        let request = CreateSessionRequest {
            classification: Some("parking".to_string()),
            listing_id: None,
        };
        let (_, created) = sessions::create(State(state.clone()), Json(request))
            .await
            .unwrap();
        let id = created.listing_id;
        let advanced = sessions::advance(State(state.clone()), PathParam(id))
            .await
            .unwrap();
        assert_eq!(advanced.form_position, 2);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let server = tokio::spawn(serve_until(listener, state, async move {
            let _ = shutdown_rx.await;
        }));

        shutdown_tx.send(()).unwrap();
        server.await.unwrap().unwrap();

        // The worker only finishes once the server has released every sender
        let stats = writer_handle.await.unwrap();
        assert_eq!(stats.written, 1);
        assert_eq!(stats.failed, 0);

        let gateway = JsonFileGateway::new(temp_dir.path());
        let saved = gateway.load(id).await.unwrap().unwrap();
        assert_eq!(saved.form_position, 2);
    }

    #[test]
    fn test_default_port_matches_config() {
        assert_eq!(DEFAULT_PORT, Config::default().api.port);
    }
}
