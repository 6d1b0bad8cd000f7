use axum::http::StatusCode;
use axum::response::IntoResponse;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("Division undefined: denominator is zero")]
    DivisionUndefined,
    #[error("Failed to read file: {0}")]
    FileReadFailure(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        match self {
            AppError::InvalidInput(_) | AppError::FileReadFailure(_) => {
                (StatusCode::BAD_REQUEST, self.to_string()).into_response()
            }
            AppError::MissingColumns(_) | AppError::DivisionUndefined => {
                (StatusCode::UNPROCESSABLE_ENTITY, self.to_string()).into_response()
            }
            AppError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}

impl From<csv::Error> for AppError {
    fn from(value: csv::Error) -> Self {
        AppError::FileReadFailure(value.to_string())
    }
}
