//! Axum router configuration with middleware.
//!
//! Middleware: permissive CORS and request tracing.

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::http::handlers::uploads::MAX_UPLOAD_BYTES;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Live rooms
        .route("/rooms/{room}", get(handlers::ws::room_ws))
        .route(
            "/rooms/{room}/messages",
            get(handlers::messages::room_history),
        )
        // Orders
        .route("/orders", post(handlers::orders::create_order))
        // Live docs
        .route(
            "/uploads",
            post(handlers::uploads::upload_live_doc).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route(
            "/docs/clients/{client_id}",
            get(handlers::docs::client_live_doc),
        )
        // Admin
        .route(
            "/admin/assistant-mode",
            post(handlers::admin::set_assistant_mode),
        )
        .route("/health", get(handlers::health::health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
