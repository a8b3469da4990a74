//! Audit-related error types.

use std::time::Duration;
use thiserror::Error;

use crate::store::StoreError;
use veritrail_crypto::CryptoError;

/// Errors that can occur in the audit service.
///
/// Integrity violations are deliberately *not* here: a failed verification
/// is a first-class reported outcome ([`crate::IntegrityReport`]), not an
/// error.
#[derive(Debug, Error)]
pub enum AuditError {
    /// Caller-correctable input problem (e.g. empty entity type or id).
    #[error("validation error: {0}")]
    Validation(String),

    /// Signing configuration problem. Fails fast: an unsigned event is
    /// never persisted.
    #[error("signing error: {0}")]
    Crypto(#[from] CryptoError),

    /// The backing store failed. Surfaced as-is so the caller can decide
    /// whether the triggering business operation should roll back; never
    /// retried internally.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// A store call exceeded the configured timeout bound.
    #[error("store operation timed out after {timeout:?}")]
    StoreTimeout {
        /// The configured ceiling that was exceeded.
        timeout: Duration,
    },
}

/// Result type for audit operations.
pub type AuditResult<T> = Result<T, AuditError>;
