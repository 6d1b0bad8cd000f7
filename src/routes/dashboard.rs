use axum::extract::{Query, State};
use axum::response::Response;
use axum::routing::get;
use axum::{Json, Router};
use tracing::{error, info};

use crate::errors::AppError;
use crate::models::{ColumnSpec, DashboardResponse, GeneratorParams};
use crate::routes::{csv_attachment, run_blocking};
use crate::services::dataset_cache::CachedDataset;
use crate::services::{csv_import_service, dashboard_service, export_service, ratio_service};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/format", get(expected_format))
        .route("/sample", get(get_sample_dashboard))
        .route("/sample/export", get(export_sample))
        .route("/generate", get(get_generated_dashboard))
        .route("/generate/export", get(export_generated))
}

async fn expected_format() -> Json<Vec<ColumnSpec>> {
    info!("GET /api/format - Expected upload columns");
    Json(csv_import_service::expected_format())
}

async fn load_sample(state: AppState) -> Result<CachedDataset, AppError> {
    run_blocking(move || {
        dashboard_service::load_sample(
            &state.dataset_cache,
            &state.config.sample_data_path,
            &state.config.sample_params,
        )
    })
    .await
    .map_err(|e| {
        error!("Failed to load sample data: {}", e);
        e
    })
}

async fn load_generated(
    state: AppState,
    params: GeneratorParams,
) -> Result<CachedDataset, AppError> {
    run_blocking(move || dashboard_service::load_generated(&state.dataset_cache, &params)).await
}

async fn get_sample_dashboard(
    State(state): State<AppState>,
) -> Result<Json<DashboardResponse>, AppError> {
    info!("GET /api/sample - Sample dashboard");
    let dataset = load_sample(state).await?;
    Ok(Json(dashboard_service::build_dashboard(dataset.source, &dataset.series)))
}

async fn export_sample(State(state): State<AppState>) -> Result<Response, AppError> {
    info!("GET /api/sample/export - Exporting sample ratios");
    let dataset = load_sample(state).await?;
    let csv = export_service::export_ratio_csv(&ratio_service::ratio_table(&dataset.series))?;
    Ok(csv_attachment(csv))
}

async fn get_generated_dashboard(
    State(state): State<AppState>,
    Query(params): Query<GeneratorParams>,
) -> Result<Json<DashboardResponse>, AppError> {
    info!(
        "GET /api/generate - {} quarters from {} (seed {})",
        params.num_quarters, params.start_year, params.seed
    );
    let dataset = load_generated(state, params).await?;
    Ok(Json(dashboard_service::build_dashboard(dataset.source, &dataset.series)))
}

async fn export_generated(
    State(state): State<AppState>,
    Query(params): Query<GeneratorParams>,
) -> Result<Response, AppError> {
    info!("GET /api/generate/export - Exporting generated ratios");
    let dataset = load_generated(state, params).await?;
    let csv = export_service::export_ratio_csv(&ratio_service::ratio_table(&dataset.series))?;
    Ok(csv_attachment(csv))
}
