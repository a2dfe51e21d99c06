use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)]
pub enum AppError {
    #[error("Documentation for {0} not found")]
    DocumentNotFound(String),

    #[error("Documentation for {service} is malformed: {reason}")]
    MalformedDocument { service: String, reason: String },

    #[error("Timed out fetching documentation for {0}")]
    FetchTimeout(String),

    #[error("Invalid input: {0}")]
    ValidationError(String),

    #[error("Storage failure: {0}")]
    StorageError(String),
}

impl AppError {
    /// True for failures scoped to a single service's document.
    /// The aggregator skips these instead of failing the whole search.
    pub fn is_service_local(&self) -> bool {
        matches!(
            self,
            AppError::DocumentNotFound(_)
                | AppError::MalformedDocument { .. }
                | AppError::FetchTimeout(_)
        )
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
    code: u16,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::DocumentNotFound(service) => {
                tracing::warn!(service = %service, "Documentation not found");
                StatusCode::NOT_FOUND
            }
            AppError::MalformedDocument { service, reason } => {
                tracing::error!(service = %service, error = %reason, "Malformed documentation");
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::FetchTimeout(service) => {
                tracing::warn!(service = %service, "Documentation fetch timed out");
                StatusCode::GATEWAY_TIMEOUT
            }
            AppError::ValidationError(msg) => {
                tracing::warn!(error = %msg, "Validation error");
                StatusCode::BAD_REQUEST
            }
            AppError::StorageError(msg) => {
                tracing::error!(error = %msg, "Storage error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(ErrorResponse {
            success: false,
            error: self.to_string(),
            code: status.as_u16(),
        });

        (status, body).into_response()
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::StorageError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
