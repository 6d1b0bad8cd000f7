use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::delete;
use axum::Router;
use tracing::info;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", delete(clear_cache))
}

async fn clear_cache(State(state): State<AppState>) -> StatusCode {
    info!("DELETE /api/cache - Dropping {} cached datasets", state.dataset_cache.len());
    state.dataset_cache.clear();
    StatusCode::NO_CONTENT
}
