//! Client error types.

use medi_core::QueryError;
use thiserror::Error;

/// Errors that can occur when talking to the query backend.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP transport error: connect, timeout, unreadable body.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend returned a non-success status code.
    #[error("API Error: {status} {message}")]
    Api {
        /// HTTP status code returned by the backend.
        status: u16,
        /// Canonical reason phrase for the status.
        message: String,
    },
}

impl From<ClientError> for QueryError {
    fn from(error: ClientError) -> Self {
        match error {
            ClientError::Http(error) => Self::Transport(error.to_string()),
            ClientError::Api { status, message } => Self::Status { status, message },
        }
    }
}
