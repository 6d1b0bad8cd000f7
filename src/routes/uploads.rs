use axum::body::Bytes;
use axum::extract::State;
use axum::response::Response;
use axum::routing::post;
use axum::{Json, Router};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::DashboardResponse;
use crate::routes::{csv_attachment, run_blocking};
use crate::services::dataset_cache::CachedDataset;
use crate::services::{dashboard_service, export_service, ratio_service};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(upload_dashboard))
        .route("/export", post(upload_export))
}

async fn load(state: AppState, body: Bytes) -> Result<CachedDataset, AppError> {
    let size = body.len();
    run_blocking(move || dashboard_service::load_upload(&state.dataset_cache, &body))
        .await
        .map_err(|e| {
            warn!("Rejected upload ({} bytes): {}", size, e);
            e
        })
}

async fn upload_dashboard(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<DashboardResponse>, AppError> {
    info!("POST /api/uploads - Analysing uploaded file ({} bytes)", body.len());
    let dataset = load(state, body).await?;
    Ok(Json(dashboard_service::build_dashboard(dataset.source, &dataset.series)))
}

async fn upload_export(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, AppError> {
    info!("POST /api/uploads/export - Exporting ratios for uploaded file");
    let dataset = load(state, body).await?;
    let csv = export_service::export_ratio_csv(&ratio_service::ratio_table(&dataset.series))?;
    Ok(csv_attachment(csv))
}
