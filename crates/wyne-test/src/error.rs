//! Test error types.

use thiserror::Error;

/// Errors that can occur while building requests or reading responses.
#[derive(Debug, Error)]
pub enum TestError {
    /// The request URI could not be parsed.
    #[error("Invalid URI '{uri}': {reason}")]
    InvalidUri {
        /// The URI as given.
        uri: String,
        /// Parser message.
        reason: String,
    },

    /// A header name or value was rejected.
    #[error("Invalid header '{name}': {reason}")]
    InvalidHeader {
        /// The header name as given.
        name: String,
        /// Parser message.
        reason: String,
    },

    /// JSON encoding or decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Form or query encoding failed.
    #[error("Form encoding error: {0}")]
    Form(#[from] serde_urlencoded::ser::Error),

    /// The response body was not valid UTF-8.
    #[error("Body decode error: {0}")]
    BodyDecode(#[from] std::string::FromUtf8Error),
}

impl TestError {
    /// Creates an invalid URI error.
    pub fn invalid_uri(uri: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidUri {
            uri: uri.into(),
            reason: reason.to_string(),
        }
    }

    /// Creates an invalid header error.
    pub fn invalid_header(name: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidHeader {
            name: name.into(),
            reason: reason.to_string(),
        }
    }
}
