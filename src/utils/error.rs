//! The `error` module defines the error type used throughout `chatrelay`.
//!
//! Storage and encoding failures abort a submission; transport failures are
//! local to the publisher call or the bridge that hit them.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    /// The durable store could not be reached or rejected the operation.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("encoding error: {0}")]
    EncodingError(#[from] serde_json::Error),

    /// Broadcast or push connection I/O failed.
    #[error("transport error: {0}")]
    TransportError(String),

    #[error("method not allowed")]
    MethodNotAllowed,
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sled::Error> for RelayError {
    fn from(err: sled::Error) -> Self {
        Self::StorageUnavailable(err.to_string())
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let body = match &self {
            Self::MethodNotAllowed => "Method not allowed",
            Self::StorageUnavailable(_) => "Error storing message",
            Self::EncodingError(_) => "Error encoding message",
            Self::TransportError(_) => "Error delivering message",
        };
        (self.status(), body).into_response()
    }
}
