use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::auth::AuthFailure;
use crate::store::StoreError;

/// Message returned for every failure the caller cannot act on.
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred. Please try again later.";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid input")]
    Validation(Vec<String>),

    #[error("{0}")]
    Unauthorized(AuthFailure),

    #[error("Event not found")]
    NotFound,

    #[error("{context} failed: {source}")]
    Store {
        context: &'static str,
        #[source]
        source: StoreError,
    },

    #[error("{context} failed: {message}")]
    Internal {
        context: &'static str,
        message: String,
    },
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Store { .. } | ApiError::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn log(&self) {
        match self {
            ApiError::Validation(errors) => {
                warn!(errors = ?errors, "Input validation failed");
            }
            ApiError::Unauthorized(failure) => {
                warn!(reason = ?failure, "Request rejected by authentication gate");
            }
            ApiError::NotFound => {
                info!("Event not found");
            }
            ApiError::Store { context, source } => {
                let mut chain = Vec::new();
                let mut cause: Option<&dyn std::error::Error> = Some(source);
                while let Some(err) = cause {
                    chain.push(err.to_string());
                    cause = err.source();
                }
                error!(context = %context, error = ?chain, "Store operation failed");
            }
            ApiError::Internal { context, message } => {
                error!(context = %context, message = %message, "Internal error");
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Full detail stays in the server log
        self.log();

        let body = match &self {
            ApiError::Validation(errors) => json!({
                "success": false,
                "message": "Invalid input",
                "errors": errors,
            }),
            ApiError::Unauthorized(failure) => json!({
                "success": false,
                "message": failure.to_string(),
            }),
            ApiError::NotFound => json!({
                "success": false,
                "message": "Event not found",
            }),
            ApiError::Store { source, .. } => json!({
                "success": false,
                "message": UNEXPECTED_ERROR_MESSAGE,
                "error": source.to_string(),
            }),
            ApiError::Internal { .. } => json!({
                "success": false,
                "message": UNEXPECTED_ERROR_MESSAGE,
                "error": "internal error",
            }),
        };

        (status, Json(body)).into_response()
    }
}

/// Attaches the operation name to a store failure.
pub trait StoreContext<T> {
    fn context(self, context: &'static str) -> Result<T, ApiError>;
}

impl<T> StoreContext<T> for Result<T, StoreError> {
    fn context(self, context: &'static str) -> Result<T, ApiError> {
        self.map_err(|source| ApiError::Store { context, source })
    }
}
