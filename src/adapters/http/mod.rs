//! HTTP adapters - REST API and the application router.

pub mod dialogue;

use axum::http::{header, HeaderValue, Method};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::{FeatureFlags, ServerConfig};

pub use dialogue::{dialogue_routes, DialogueHandlers, ErrorResponse};

/// Builds the full application router with CORS, timeout and tracing
/// middleware applied.
pub fn app_router(handlers: DialogueHandlers, server: &ServerConfig, features: &FeatureFlags) -> Router {
    let app = dialogue_routes(handlers)
        .layer(TimeoutLayer::new(server.request_timeout()))
        .layer(cors_layer(&server.cors_origins_list()));

    if features.enable_tracing {
        app.layer(TraceLayer::new_for_http())
    } else {
        app
    }
}

/// Empty origin list allows any origin.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    if origins.is_empty() {
        return layer.allow_origin(Any);
    }
    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(parsed)
}
