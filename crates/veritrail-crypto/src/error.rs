//! Cryptographic error types.

use thiserror::Error;

/// Errors that can occur in the signing engine.
///
/// Note that a signature that simply does not match is *not* an error:
/// verification returns `false` for that case. These variants cover
/// structural problems only.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// An empty secret was supplied for a keyed-MAC key.
    #[error("signing key secret must not be empty")]
    EmptyKey,

    /// A key had the wrong length for its algorithm.
    #[error("invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength {
        /// Expected length in bytes.
        expected: usize,
        /// Actual length in bytes.
        actual: usize,
    },

    /// A signature string could not be decoded.
    #[error("invalid signature encoding")]
    InvalidSignatureEncoding,

    /// An algorithm identifier was not recognised.
    #[error("unknown signature algorithm: {0}")]
    UnknownAlgorithm(String),
}

/// Result type for cryptographic operations.
pub type CryptoResult<T> = Result<T, CryptoError>;
