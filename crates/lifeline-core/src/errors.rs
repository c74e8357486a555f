//! Cross-cutting error types for Blood Lifeline.
//!
//! Domain-specific errors (`StoreError`, `CacheError`, `AuthError`) live in
//! their respective crates and converge in `lifeline-cli`.

use thiserror::Error;

/// Errors that can be raised by any Blood Lifeline crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A string did not name a known variant of a closed enum.
    #[error("Unknown {kind}: '{value}'")]
    UnknownVariant { kind: &'static str, value: String },

    /// Data failed validation (format, constraints).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
