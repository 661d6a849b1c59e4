//! Axum router configuration with middleware.
//!
//! All routes are under `/api/v1/`. Middleware: request tracing.
//!
//! Function endpoints answer with the bare payload (`RelayResult`, event
//! envelope) so workflow steps can consume it directly. Only failures use the
//! `{data, meta, errors}` envelope from `http::error`.

use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/relay", post(handlers::relay::relay_file))
        .route("/events", post(handlers::event::create_event))
        .route("/events/deploy", post(handlers::event::create_deploy_event))
        .route("/events/error", post(handlers::event::create_error_event))
        .route(
            "/events/lifecycle",
            post(handlers::event::create_lifecycle_event),
        );

    Router::new()
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
