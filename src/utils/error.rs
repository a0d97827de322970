use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{error, warn};

use crate::models::ValidationError;
use crate::store::StoreError;
use crate::utils::response::error as error_response;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationError),

    #[error("Invalid request body: {0}")]
    InvalidBody(#[from] JsonRejection),

    #[error("Store unavailable")]
    StoreUnavailable(#[from] StoreError),

    #[error("Resource not found: {0}")]
    NotFound(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidBody(rejection) => rejection.status(),
            AppError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) | AppError::InvalidBody(_) => "VALIDATION_ERROR",
            AppError::StoreUnavailable(_) => "STORE_UNAVAILABLE",
            AppError::NotFound(_) => "NOT_FOUND",
        }
    }

    fn log(&self) {
        match self {
            AppError::ValidationError(e) => {
                warn!(error = %e, "Rejected input");
            }
            AppError::InvalidBody(e) => {
                warn!(error = %e, "Rejected request body");
            }
            AppError::StoreUnavailable(e) => {
                error!(error = ?e, "Store error");
            }
            AppError::NotFound(msg) => {
                warn!(message = %msg, "Not found");
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();

        self.log();

        // Store internals stay in the logs
        let public_message = match &self {
            AppError::ValidationError(e) => e.to_string(),
            AppError::InvalidBody(e) => e.body_text(),
            AppError::StoreUnavailable(_) => "The data store is unavailable, try again".to_string(),
            AppError::NotFound(msg) => msg.clone(),
        };

        let details = None;

        error_response(code, public_message, details, status)
    }
}
