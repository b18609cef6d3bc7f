//! Cross-cutting error types for MediFire.
//!
//! Rendering errors (`ViewError`) and transport errors (`ClientError`) live in
//! their own crates. The errors here are shared by every crate that touches the
//! generation store or the query contract.

use thiserror::Error;

/// Errors raised by the generation store and shared validation.
///
/// `NotFound` and `InvalidTransition` indicate a programming defect (resolving an
/// unknown or already-terminal generation) and are never shown to the user.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// Generation lookup returned no result.
    #[error("Generation not found: {id}")]
    NotFound { id: String },

    /// A state machine transition was attempted that is not allowed.
    #[error("Invalid state transition: generation {id} from {from} to {to}")]
    InvalidTransition { id: String, from: String, to: String },

    /// Data failed validation (unknown view name, bad index, etc).
    #[error("Validation error: {0}")]
    Validation(String),
}

impl CoreError {
    /// Whether this error signals a broken store invariant rather than bad input.
    #[must_use]
    pub const fn is_invariant_violation(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::InvalidTransition { .. })
    }
}

/// Failure to turn a response document into a [`crate::PatientResultPayload`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PayloadError {
    /// The document is not JSON at all.
    #[error("response is not valid JSON: {0}")]
    Decode(String),

    /// The document is JSON but not an object (or carries no usable structure).
    #[error("malformed payload: {0}")]
    Malformed(String),
}

/// Failure reported by the external query collaborator.
///
/// Every variant resolves the generation to the `Error` state; the `Display`
/// form is the message rendered inline in the conversation history.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QueryError {
    /// Network failure: connect, timeout, unreadable body.
    #[error("{0}")]
    Transport(String),

    /// The backend answered with a non-success status.
    #[error("API Error: {status} {message}")]
    Status { status: u16, message: String },

    /// The backend answered successfully but carried an `error` field.
    #[error("{0}")]
    Backend(String),
}
