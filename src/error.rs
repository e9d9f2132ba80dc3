use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use thiserror::Error;

use crate::{
    dao::{remote::RemoteError, session::SessionStoreError},
    state::{InvalidTransition, editor::ReorderOutOfBounds},
};

/// Errors that can occur in service layer operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The remote data service failed or was unreachable.
    #[error("remote service failure")]
    Remote(#[source] RemoteError),
    /// No valid session; the user must sign in (again).
    #[error("not signed in: {0}")]
    Unauthorized(String),
    /// Invalid input provided by the client.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Operation cannot be performed in the current tab phase.
    #[error("invalid state: {0}")]
    InvalidState(String),
    /// The prediction deadline has passed; saves are rejected for good.
    #[error("predictions are locked: the deadline has passed")]
    Locked,
    /// Persisting the session file failed.
    #[error("session persistence failure")]
    SessionStore(#[source] SessionStoreError),
}

impl From<RemoteError> for ServiceError {
    fn from(err: RemoteError) -> Self {
        ServiceError::Remote(err)
    }
}

impl From<SessionStoreError> for ServiceError {
    fn from(err: SessionStoreError) -> Self {
        ServiceError::SessionStore(err)
    }
}

impl From<InvalidTransition> for ServiceError {
    fn from(err: InvalidTransition) -> Self {
        ServiceError::InvalidState(err.to_string())
    }
}

impl From<ReorderOutOfBounds> for ServiceError {
    fn from(err: ReorderOutOfBounds) -> Self {
        ServiceError::InvalidInput(err.to_string())
    }
}

/// Application-level errors that are converted to HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad request with invalid input.
    #[error("bad request: {0}")]
    BadRequest(String),
    /// Missing or rejected session.
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    /// Operation conflicts with the current tab phase.
    #[error("conflict: {0}")]
    Conflict(String),
    /// The deadline has passed; not a fault, but a terminal condition.
    #[error("locked: {0}")]
    Locked(String),
    /// The remote service is unreachable or misbehaving.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Remote(source) if source.is_auth_failure() => {
                AppError::Unauthorized(source.to_string())
            }
            ServiceError::Remote(source) => AppError::ServiceUnavailable(source.to_string()),
            ServiceError::Unauthorized(message) => AppError::Unauthorized(message),
            ServiceError::InvalidInput(message) => AppError::BadRequest(message),
            ServiceError::InvalidState(message) => AppError::Conflict(message),
            ServiceError::Locked => {
                AppError::Locked("the prediction deadline has passed".into())
            }
            ServiceError::SessionStore(source) => AppError::Internal(source.to_string()),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Locked(_) => StatusCode::LOCKED,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let payload = Json(ErrorBody {
            message: self.to_string(),
        });

        (status, payload).into_response()
    }
}
