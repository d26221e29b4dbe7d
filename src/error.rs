use std::net::SocketAddr;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::infrastructure::database::StoreError;
use crate::middleware::validation::ValidationErrorResponse;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, details: Option<String>) -> Self {
        Self {
            error: error.into(),
            details,
        }
    }
}

/// Errors surfaced by the HTTP handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("blog post {0} not found")]
    NotFound(Uuid),
    #[error("request validation failed")]
    Validation(ValidationErrorResponse),
    #[error("invalid post id: {0}")]
    InvalidId(String),
    #[error("request path id ({path}) and request body id ({body}) values must match")]
    IdMismatch { path: Uuid, body: Uuid },
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::Validation(ValidationErrorResponse::new(errors))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(body) => body.into_response(),
            ApiError::NotFound(_) => (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::new("NOT_FOUND", Some(self.to_string()))),
            )
                .into_response(),
            ApiError::InvalidId(_) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new("INVALID_ID", Some(self.to_string()))),
            )
                .into_response(),
            ApiError::IdMismatch { .. } => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new("ID_MISMATCH", Some(self.to_string()))),
            )
                .into_response(),
            ApiError::Store(e) => {
                // Store details stay in the logs.
                error!(error = %e, "Store operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::new("STORE_ERROR", None)),
                )
                    .into_response()
            }
        }
    }
}

/// Failures while bringing the server up or down.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error("unsupported database url: {0}")]
    UnsupportedDatabaseUrl(String),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
    #[error("server task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
