// src/routes.rs
use axum::{
    routing::{get, post},
    Router,
};
use http::{header::CONTENT_TYPE, HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

pub fn create_routes(state: AppState) -> Router {
    let api = Router::new()
        .route("/polls", get(handlers::list_polls))
        .route("/poll/{id}", get(handlers::get_poll))
        .route("/poll/{id}/vote", post(handlers::vote));

    Router::new()
        .nest("/api", api)
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS for browser clients. `None` allows any origin.
pub fn cors_layer(allowed_origin: Option<&HeaderValue>) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]);

    match allowed_origin {
        Some(origin) => cors.allow_origin(origin.clone()),
        None => cors.allow_origin(Any),
    }
}
