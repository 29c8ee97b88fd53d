use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::error;

use crate::application::AppError;

use super::dto::JsonResponse;

/// Anything a handler can fail with.
#[derive(Debug)]
pub enum ApiError {
    App(AppError),
    BadRequest(String),
    /// A response body could not be encoded
    Encode(serde_json::Error),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::App(err) => app_error_status(err),
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// HTTP status for each ledger failure kind.
pub fn app_error_status(err: &AppError) -> StatusCode {
    match err {
        AppError::AccountAlreadyExists(_) => StatusCode::CONFLICT,
        AppError::AccountNotFound(_) => StatusCode::NOT_FOUND,
        AppError::InsufficientBalance { .. }
        | AppError::InvalidAmount(_)
        | AppError::SelfTransfer(_)
        | AppError::CurrencyMismatch { .. } => StatusCode::BAD_REQUEST,
        AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError::App(err)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Encode(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            ApiError::App(err) => err.to_string(),
            ApiError::BadRequest(msg) => msg.clone(),
            ApiError::Encode(err) => format!("Failed to encode response: {}", err),
        };

        if status.is_server_error() {
            error!(%status, %message, "Request failed");
        }

        (status, Json(JsonResponse::error(message))).into_response()
    }
}
