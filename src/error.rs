use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::users::repo::StoreError;

/// Every failure a handler can report, mapped to a status and body below.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("User already exists")]
    Duplication,
    #[error("Bad username")]
    BadUsername,
    #[error("Bad password")]
    BadCredentials,
    #[error("Invalid token")]
    Unauthorized,
    #[error("not found")]
    NotFound,
    #[error("forbidden")]
    Forbidden,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Duplication => StatusCode::BAD_REQUEST,
            AppError::BadUsername | AppError::BadCredentials | AppError::Unauthorized => {
                StatusCode::UNAUTHORIZED
            }
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateKey(_) => AppError::Duplication,
            StoreError::NotFound => AppError::NotFound,
            StoreError::Other(e) => AppError::Internal(e),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NamedError<'a> {
    error_name: &'a str,
    error_message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            AppError::Validation(message) => (
                status,
                Json(NamedError {
                    error_name: "ValidationError",
                    error_message: message,
                }),
            )
                .into_response(),
            AppError::Duplication => (
                status,
                Json(NamedError {
                    error_name: "DuplicationError",
                    error_message: AppError::Duplication.to_string(),
                }),
            )
                .into_response(),
            e @ (AppError::BadUsername | AppError::BadCredentials | AppError::Unauthorized) => {
                (status, Json(json!({ "message": e.to_string() }))).into_response()
            }
            AppError::NotFound | AppError::Forbidden => status.into_response(),
            AppError::Internal(e) => {
                error!(error = %e, "internal error");
                (status, Json(json!({ "error": true }))).into_response()
            }
        }
    }
}
