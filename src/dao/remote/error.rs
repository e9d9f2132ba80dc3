//! Error types shared by the remote data service client.

use reqwest::StatusCode;
use thiserror::Error;

/// Convenient result alias returning [`RemoteError`] failures.
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Failures that can occur while talking to the remote data service.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Building the HTTP client failed (invalid TLS setup, etc).
    #[error("failed to build remote client")]
    ClientBuilder {
        #[source]
        source: reqwest::Error,
    },
    /// A request could not be sent at all.
    #[error("failed to send request to `{path}`")]
    RequestSend {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    /// The service rejected the supplied credentials or token.
    #[error("authentication rejected for `{path}` ({status})")]
    AuthRejected { path: String, status: StatusCode },
    /// The service returned an unexpected status code.
    #[error("unexpected response status {status} for `{path}`")]
    RequestStatus { path: String, status: StatusCode },
    /// Response payload could not be parsed into JSON.
    #[error("failed to decode response for `{path}`")]
    DecodeResponse {
        path: String,
        #[source]
        source: reqwest::Error,
    },
}

impl RemoteError {
    /// True when the failure concerns the session itself rather than the query.
    ///
    /// Callers clear the persisted session only for these failures.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, RemoteError::AuthRejected { .. })
    }
}
