use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::workflow::lifecycle::InvalidLifecycleTransition;
use crate::workflow::status::TransitionError;
use crate::workflow::validation::UploadError;

/// Request-level failure taxonomy: validation and bad transitions surface
/// as 400s, unknown ids/tokens as 404s, everything else as a logged 500.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Conflict(String),
    #[error("authentication required")]
    Unauthorized,
    #[error("insufficient permissions")]
    Forbidden,
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error(transparent)]
    Upload(#[from] UploadError),
    #[error(transparent)]
    Lifecycle(#[from] InvalidLifecycleTransition),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),
    #[error("template error: {0}")]
    Template(#[from] tera::Error),
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::Transition(_) | Self::Upload(_) | Self::Lifecycle(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Database(sqlx::Error::RowNotFound) => StatusCode::NOT_FOUND,
            Self::Database(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                StatusCode::CONFLICT
            }
            Self::Database(_) | Self::Storage(_) | Self::Template(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("request failed: {self}");
        }
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            "internal server error".to_string()
        } else {
            self.to_string()
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::status::ApplicationStatus;

    #[test]
    fn status_codes_follow_the_taxonomy() {
        assert_eq!(
            AppError::validation("bad phone").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Transition(TransitionError::MissingReason).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Transition(TransitionError::InvalidStatus {
                current: ApplicationStatus::Approved,
                action: "approve",
            })
            .status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::NotFound("application").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Database(sqlx::Error::RowNotFound).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(AppError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
    }
}
