//! HTTP routes for dialogue endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use crate::adapters::websocket::ws_handler;

use super::handlers::{
    banner, create_session, delete_session, get_metrics, health, process_message, reset_session,
    setup_scenario, DialogueHandlers,
};

/// Creates the dialogue router with all endpoints.
pub fn dialogue_routes(handlers: DialogueHandlers) -> Router {
    Router::new()
        .route("/", get(banner))
        .route("/health", get(health))
        .route("/api/session/create", post(create_session))
        .route("/api/session/message", post(process_message))
        .route("/api/session/:id/metrics", get(get_metrics))
        .route("/api/session/:id/reset", post(reset_session))
        .route("/api/session/:id", axum::routing::delete(delete_session))
        .route("/api/scenario/setup", post(setup_scenario))
        .route("/ws/session/:id", get(ws_handler))
        .with_state(handlers)
}
