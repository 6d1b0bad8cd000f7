use axum::extract::DefaultBodyLimit;
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::routes::{cache, dashboard, health, uploads};
use crate::state::AppState;

pub fn create_app(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::<AppState>::new()
        .nest("/health", health::router())
        .nest("/api", dashboard::router())
        .nest(
            "/api/uploads",
            uploads::router().layer(DefaultBodyLimit::max(upload_limit)),
        )
        .nest("/api/cache", cache::router())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
