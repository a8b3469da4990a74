//! Signature algorithm identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CryptoError;

/// The signature algorithms the engine supports.
///
/// Two keyed-MAC strength tiers plus one asymmetric scheme. The identifier
/// strings are stable: they are recorded with every signed event and parsed
/// back at verification time, so they must never change meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SignatureAlgorithm {
    /// HMAC with SHA-256 (32-byte signatures).
    HmacSha256,
    /// HMAC with SHA-512 (64-byte signatures).
    HmacSha512,
    /// Ed25519 (64-byte signatures).
    Ed25519,
}

impl SignatureAlgorithm {
    /// The stable identifier string for this algorithm.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HmacSha256 => "hmac-sha256",
            Self::HmacSha512 => "hmac-sha512",
            Self::Ed25519 => "ed25519",
        }
    }

    /// The signature length this algorithm produces, in bytes.
    #[must_use]
    pub fn signature_len(&self) -> usize {
        match self {
            Self::HmacSha256 => 32,
            Self::HmacSha512 | Self::Ed25519 => 64,
        }
    }
}

impl fmt::Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignatureAlgorithm {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hmac-sha256" => Ok(Self::HmacSha256),
            "hmac-sha512" => Ok(Self::HmacSha512),
            "ed25519" => Ok(Self::Ed25519),
            other => Err(CryptoError::UnknownAlgorithm(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_roundtrip() {
        for algorithm in [
            SignatureAlgorithm::HmacSha256,
            SignatureAlgorithm::HmacSha512,
            SignatureAlgorithm::Ed25519,
        ] {
            let parsed: SignatureAlgorithm = algorithm.as_str().parse().unwrap();
            assert_eq!(parsed, algorithm);
        }
    }

    #[test]
    fn test_unknown_identifier() {
        let result = SignatureAlgorithm::from_str("rot13");
        assert!(matches!(result, Err(CryptoError::UnknownAlgorithm(_))));
    }

    #[test]
    fn test_serde_uses_identifier() {
        let json = serde_json::to_string(&SignatureAlgorithm::HmacSha512).unwrap();
        assert_eq!(json, "\"hmac-sha512\"");
    }
}
