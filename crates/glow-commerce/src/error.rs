//! Commerce error types.

use thiserror::Error;

/// Errors that can occur in commerce operations.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Malformed filter, page or configuration input.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Promo code not present in the promo table.
    #[error("Invalid promo code: {0}")]
    InvalidPromoCode(String),

    /// Record not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Persisted cart blob could not be decoded or failed validation.
    #[error("Persisted cart is corrupt: {0}")]
    PersistenceCorrupt(String),

    /// Persistence backend failure.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Currency mismatch.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: String, got: String },

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CommerceError {
    /// Shorthand for [`CommerceError::InvalidArgument`].
    pub fn invalid(msg: impl Into<String>) -> Self {
        CommerceError::InvalidArgument(msg.into())
    }
}

#[cfg(feature = "storage")]
impl From<glow_cache::CacheError> for CommerceError {
    fn from(e: glow_cache::CacheError) -> Self {
        match e {
            glow_cache::CacheError::SerializeError(inner) => {
                CommerceError::PersistenceCorrupt(inner.to_string())
            }
            other => CommerceError::Persistence(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::Serialization(e.to_string())
    }
}
