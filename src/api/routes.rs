use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers;
use super::AppState;
use crate::middleware::request_id::{make_span_with_request_id, request_id_middleware};

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", screen_routes())
        .merge(proxy_routes())
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Swipe and results screens under /api/v1
fn screen_routes() -> Router<AppState> {
    Router::new()
        // Swipe screen
        .route("/swipe", post(handlers::open_swipe))
        .route(
            "/swipe/:session_id",
            get(handlers::get_swipe).delete(handlers::close_swipe),
        )
        .route("/swipe/:session_id/judge", post(handlers::judge))
        // Results screen
        .route("/gallery", get(handlers::gallery))
}

/// Normalizing pass-through to the recommendation backend
fn proxy_routes() -> Router<AppState> {
    Router::new()
        .route("/api/random-art", get(handlers::proxy_random_art))
        .route("/api/recommend/:artwork_id", get(handlers::proxy_recommend))
}
