use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use storage::errors::StorageError;
use thiserror::Error;
use tracing::{debug, error};

use crate::errors::ServiceError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Internal(String),
    #[error(transparent)]
    QueryExtractorRejection(#[from] QueryRejection),
    #[error(transparent)]
    JsonExtractorRejection(#[from] JsonRejection),
    #[error(transparent)]
    PathExtractorRejection(#[from] PathRejection),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::UnknownRegion(_) => ApiError::BadRequest(err.to_string()),
            ServiceError::QuoteNotFound(_) => ApiError::NotFound("Quote not found".into()),
            ServiceError::InvalidPassword => ApiError::Unauthorized(err.to_string()),
            ServiceError::QuantityTooLarge(_) => ApiError::BadRequest(err.to_string()),
            ServiceError::PasswordHash(_) => ApiError::Internal(err.to_string()),
            ServiceError::Storage(err) => err.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, details) = match self {
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message, None),
            Self::NotFound(message) => (StatusCode::NOT_FOUND, message, None),
            Self::Unauthorized(message) => (StatusCode::UNAUTHORIZED, message, None),
            Self::Internal(message) => {
                // the client only learns that something broke
                error!("Internal error: {}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
            Self::QueryExtractorRejection(rejection) => {
                debug!("Failed to parse query: {}", rejection.body_text());
                (
                    StatusCode::BAD_REQUEST,
                    "Invalid query parameters".to_string(),
                    Some(rejection.body_text()),
                )
            }
            Self::JsonExtractorRejection(rejection) => {
                debug!("Failed to parse body: {}", rejection.body_text());
                (
                    StatusCode::BAD_REQUEST,
                    "Invalid request body".to_string(),
                    Some(rejection.body_text()),
                )
            }
            Self::PathExtractorRejection(rejection) => {
                debug!("Failed to parse path: {}", rejection.body_text());
                (
                    StatusCode::BAD_REQUEST,
                    "Invalid path".to_string(),
                    Some(rejection.body_text()),
                )
            }
        };

        (status, Json(ErrorBody { error, details })).into_response()
    }
}
