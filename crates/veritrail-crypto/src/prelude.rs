//! Prelude module - commonly used types for convenient import.
//!
//! Use `use veritrail_crypto::prelude::*;` to import all essential types.

// Errors
pub use crate::{CryptoError, CryptoResult};

// Keys and signatures
pub use crate::{Keyring, Signature, SignatureAlgorithm, SigningKey};
