pub mod cache;
pub mod dashboard;
pub mod health;
pub mod uploads;

use axum::http::header;
use axum::response::{IntoResponse, Response};
use tracing::error;

use crate::errors::AppError;
use crate::services::export_service::export_filename;

/// Run file IO, parsing or generation off the async worker threads.
pub(crate) async fn run_blocking<T, F>(work: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work).await.map_err(|e| {
        error!("Blocking task failed: {}", e);
        AppError::Internal(e.to_string())
    })?
}

/// Serve a CSV body as a dated download.
pub(crate) fn csv_attachment(body: String) -> Response {
    let filename = export_filename(chrono::Local::now().date_naive());
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    )
        .into_response()
}
