//! Error types for request dispatch failures.
//!
//! Each variant maps to one failure mode of a request and knows the
//! client-visible envelope it turns into. Only [`DispatchError::Io`] never
//! reaches a client: it means the connection itself is gone.

use std::io;

use staffd_protocol::{ProtocolError, ResponseEnvelope};
use staffd_store::StoreError;
use thiserror::Error;

/// Errors surfaced while reading, decoding, or executing a request.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The request line was not a valid envelope.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The request line exceeded the configured limit.
    #[error("request too large: more than {max_size} bytes")]
    RequestTooLarge {
        /// Bytes buffered before the limit was hit.
        size: usize,
        /// Configured limit.
        max_size: usize,
    },

    /// No handler is registered under the action name.
    #[error("unknown action: {action}")]
    UnknownAction {
        /// Action as sent by the client.
        action: String,
    },

    /// The payload did not match the shape the action requires.
    #[error("invalid arguments for {action}: {message}")]
    InvalidArguments {
        /// Resolved action name.
        action: &'static str,
        /// Decoder detail.
        message: String,
    },

    /// The action acts on behalf of a user but no `userId` was sent.
    #[error("userId is required")]
    MissingUser,

    /// Login credentials did not match a stored employee.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The store declined the operation.
    #[error("{message}")]
    Rejected {
        /// Operation-specific failure message.
        message: &'static str,
    },

    /// The store could not run the operation.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A handler result could not be converted to JSON.
    #[error("failed to serialize result: {0}")]
    SerializeResult(#[source] serde_json::Error),

    /// A handler panicked.
    #[error("internal error: {message}")]
    Internal {
        /// Panic payload, when it was a string.
        message: String,
    },

    /// The connection failed while reading or writing.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl DispatchError {
    /// Creates an unknown action error.
    pub fn unknown_action(action: impl Into<String>) -> Self {
        Self::UnknownAction {
            action: action.into(),
        }
    }

    /// Creates an invalid arguments error from a payload decoding failure.
    pub fn invalid_arguments(action: &'static str, source: &serde_json::Error) -> Self {
        Self::InvalidArguments {
            action,
            message: source.to_string(),
        }
    }

    /// Creates a request too large error.
    pub const fn request_too_large(size: usize, max_size: usize) -> Self {
        Self::RequestTooLarge { size, max_size }
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Reports whether the session must end after this error is answered.
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::RequestTooLarge { .. } | Self::Io(_))
    }

    /// Builds the envelope the client receives for this error.
    pub fn to_response(&self) -> ResponseEnvelope {
        match self {
            Self::Protocol(_) | Self::RequestTooLarge { .. } => {
                ResponseEnvelope::error(format!("Invalid request: {self}"))
            }
            Self::UnknownAction { action } => {
                ResponseEnvelope::error(format!("Unknown action: {action}"))
            }
            Self::InvalidArguments { message, .. } => {
                ResponseEnvelope::error(format!("Server error: {message}"))
            }
            Self::InvalidCredentials => ResponseEnvelope::error("Invalid credentials"),
            Self::Rejected { message } => ResponseEnvelope::error(*message),
            Self::MissingUser
            | Self::Store(_)
            | Self::SerializeResult(_)
            | Self::Internal { .. }
            | Self::Io(_) => ResponseEnvelope::error(format!("Server error: {self}")),
        }
    }
}
