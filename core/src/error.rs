//! Error types for the users/todos client.
//!
//! # Design
//! Transport failures are split by what the screen tells the user:
//! connectivity and timeouts get fixed wording, everything else surfaces its
//! own message. `FailureKind` is the category, `ApiError::user_message` the
//! text that ends up in `ViewState::Error`.

use thiserror::Error;

pub const NO_INTERNET_MESSAGE: &str = "No internet connection. Please check your network settings.";
pub const TIMEOUT_MESSAGE: &str = "Connection timeout. Please try again.";
pub const NO_SELECTION_MESSAGE: &str = "No user selected. Please go back and try again.";
pub const USERS_FALLBACK_MESSAGE: &str = "An unknown error occurred";
pub const TODOS_FALLBACK_MESSAGE: &str = "Failed to load todos. Please try again.";

/// Errors produced while fetching users or todos.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Name resolution failed or the network is unreachable.
    #[error("connection failed: {0}")]
    Connectivity(String),

    /// The request exceeded its allotted time.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// The server answered 2xx without a usable body.
    #[error("Empty response body")]
    EmptyResponse,

    /// The server returned a non-2xx status.
    #[error("HTTP Error: {status} - {reason}")]
    Http { status: u16, reason: String },

    /// The response body could not be deserialized into the expected type.
    #[error("failed to parse response: {0}")]
    Deserialization(String),

    /// Any other transport failure. The message may be empty.
    #[error("{0}")]
    Transport(String),
}

/// Message category shown for a failed load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Connectivity,
    Timeout,
    EmptyResponse,
    Generic,
}

impl ApiError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ApiError::Connectivity(_) => FailureKind::Connectivity,
            ApiError::Timeout(_) => FailureKind::Timeout,
            ApiError::EmptyResponse => FailureKind::EmptyResponse,
            ApiError::Http { .. } | ApiError::Deserialization(_) | ApiError::Transport(_) => {
                FailureKind::Generic
            }
        }
    }

    /// The text a screen shows for this failure. `fallback` is used when the
    /// underlying error carries no message.
    pub fn user_message(&self, fallback: &str) -> String {
        match self.kind() {
            FailureKind::Connectivity => NO_INTERNET_MESSAGE.to_string(),
            FailureKind::Timeout => TIMEOUT_MESSAGE.to_string(),
            FailureKind::EmptyResponse | FailureKind::Generic => {
                let msg = self.to_string();
                if msg.trim().is_empty() {
                    fallback.to_string()
                } else {
                    msg
                }
            }
        }
    }
}
