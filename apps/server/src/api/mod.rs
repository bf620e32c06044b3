//! API layer - routes, handlers, and middleware

pub mod handlers;
pub mod middleware;
pub mod routes;

use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde_json::json;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    let cors_origins = state.config.server.cors_origins.clone();

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Root endpoint
        .route("/", get(root))
        // Favicon handler (returns 204 to prevent 404 logs)
        .route("/favicon.ico", get(favicon))
        .nest("/lookups", routes::lookups::lookup_routes())
        .with_state(state)
        // Add middleware (applied in reverse order)
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(middleware::cors(&cors_origins))
        .layer(middleware::trace())
}

async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "lookup-server",
        "backend": state.lookups.backend(),
    }))
}

async fn root() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "server": "Provider Enrollment Lookup Server",
            "version": env!("CARGO_PKG_VERSION"),
            "status": "running"
        })),
    )
}

async fn favicon() -> impl IntoResponse {
    StatusCode::NO_CONTENT
}
