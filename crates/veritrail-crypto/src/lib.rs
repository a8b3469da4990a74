//! Veritrail Crypto - the signing engine for tamper-evident audit records.
//!
//! This crate provides:
//! - Keyed-MAC signing in two strength tiers (HMAC-SHA256, HMAC-SHA512)
//! - Asymmetric Ed25519 signing
//! - A [`Keyring`] holding the active key plus historical key versions,
//!   so old signatures keep verifying after rotation
//!
//! # Determinism
//!
//! Signing is deterministic: the same canonical payload under the same key
//! and algorithm always yields the same signature. Verification mismatch is
//! a normal boolean `false`; structural problems (bad encodings, unknown
//! algorithm identifiers) are reported as [`CryptoError`] so callers can
//! tell "tampered" apart from "unreadable".
//!
//! # Example
//!
//! ```
//! use veritrail_crypto::{Keyring, SigningKey};
//!
//! let key = SigningKey::hmac_sha256("v1", b"super-secret-key").unwrap();
//! let keyring = Keyring::new(key);
//!
//! let signature = keyring.active().sign(b"canonical payload");
//! assert!(keyring.active().verify(b"canonical payload", &signature));
//! assert!(!keyring.active().verify(b"altered payload", &signature));
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod algorithm;
mod error;
mod key;
mod keyring;
mod signature;

pub use algorithm::SignatureAlgorithm;
pub use error::{CryptoError, CryptoResult};
pub use key::SigningKey;
pub use keyring::Keyring;
pub use signature::Signature;
