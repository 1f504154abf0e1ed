//! Error types for the EventEase API client

use thiserror::Error;

/// Errors that can occur when talking to the EventEase API
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request never produced a response (connection refused, timeout, ...)
    #[error("Request failed: {0}")]
    Request(String),

    /// The server answered with a non-success status
    #[error("API error (status {status}): {}", .message.as_deref().unwrap_or("<no message>"))]
    Server {
        /// HTTP status code
        status: u16,
        /// `message` field of the error body, when the server sent one
        message: Option<String>,
    },

    /// The response body did not have the expected shape
    #[error("Response parsing failed: {0}")]
    Decode(String),

    /// The configured base URL plus route is not a valid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Message to show the user
    ///
    /// The server's own `message` is passed through verbatim; every other
    /// failure maps to the operation's `fallback`.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Server {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            _ => fallback.to_string(),
        }
    }

    /// HTTP status, when the server answered
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            Self::Decode(error.to_string())
        } else {
            Self::Request(error.to_string())
        }
    }
}
