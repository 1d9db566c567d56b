use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use cm_progress::GradingError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),
    #[error("Option {option_id} not found for task {task_id}")]
    InvalidOption { task_id: i64, option_id: i64 },
    #[error("{0}")]
    UnsupportedOperation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Auth(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl ApiError {
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) | Self::InvalidOption { .. } => StatusCode::NOT_FOUND,
            Self::UnsupportedOperation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Auth(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        if cm_db::is_unique_violation(&err) {
            Self::Conflict("Concurrent update of the same record, please retry".to_string())
        } else if cm_db::is_foreign_key_violation(&err) {
            // A user or course vanished between the lookup and the write
            Self::NotFound("Referenced record not found".to_string())
        } else {
            Self::Database(err)
        }
    }
}

impl From<GradingError> for ApiError {
    fn from(err: GradingError) -> Self {
        match err {
            GradingError::UnsupportedOperation(_) => Self::UnsupportedOperation(err.to_string()),
            GradingError::InvalidOption { task_id, option_id } => {
                Self::InvalidOption { task_id, option_id }
            }
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Validation(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = match &self {
            Self::Database(e) => {
                tracing::error!(error = %e, "Database error");
                "Internal server error".to_string()
            }
            other => {
                tracing::debug!(status = %status, error = %other, "Request rejected");
                other.to_string()
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
