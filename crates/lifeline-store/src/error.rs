//! Document store error types.

use thiserror::Error;

/// Errors from document store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached (DNS, connect, timeout, offline).
    #[error("Network error: {0}")]
    Network(String),

    /// The store answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// A stored document could not be decoded into the expected shape.
    #[error("Decode failed: {0}")]
    Decode(String),

    /// A value could not be encoded for storage.
    #[error("Encode failed: {0}")]
    Encode(String),
}

impl StoreError {
    /// Whether the failure came from connectivity rather than the data.
    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            Self::Decode(error.to_string())
        } else if let Some(status) = error.status() {
            Self::Status {
                status: status.as_u16(),
                body: error.to_string(),
            }
        } else {
            Self::Network(error.to_string())
        }
    }
}
