//! API module
//!
//! Contains HTTP request handlers and assembles them into the service router

pub mod health;
pub mod middleware;
pub mod songs;

use crate::config::{Config, CorsConfig};
use crate::state::SharedState;
use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

/// Build the service router
///
/// Routes:
/// - `GET /api/health`
/// - `GET /api/songs`
/// - `POST /api/upload`
/// - `DELETE /api/songs/:id`
/// - `POST /api/songs/:id/like`
/// - `POST /api/songs/:id/rate`
/// - `GET /uploads/:filename` (raw files from the upload directory)
pub fn build_router(state: SharedState, config: &Config) -> Router {
    Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/songs", get(songs::list_songs))
        .route("/api/upload", post(songs::upload_song))
        .route("/api/songs/:id", delete(songs::delete_song))
        .route("/api/songs/:id/like", post(songs::like_song))
        .route("/api/songs/:id/rate", post(songs::rate_song))
        .nest_service("/uploads", ServeDir::new(&config.storage.upload_dir))
        .layer(DefaultBodyLimit::max(config.storage.max_upload_bytes))
        // Middleware (order matters - request_id should be first)
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .layer(cors_layer(&config.cors))
        .with_state(state)
}

/// Build the CORS layer for the configured origins
pub fn cors_layer(cors: &CorsConfig) -> CorsLayer {
    match cors {
        CorsConfig::AnyOrigin => CorsLayer::permissive(),
        CorsConfig::Origins(origins) => {
            let allowed: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|origin| match HeaderValue::from_str(origin) {
                    Ok(value) => Some(value),
                    Err(_) => {
                        tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                        None
                    }
                })
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(allowed))
                .allow_methods(Any)
                .allow_headers(Any)
        }
    }
}
