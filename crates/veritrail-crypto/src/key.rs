//! Signing keys.

use ed25519_dalek::{
    Signature as DalekSignature, Signer, SigningKey as DalekSigningKey, Verifier,
};
use hmac::{Hmac, Mac};
use rand::rngs::OsRng;
use sha2::{Sha256, Sha512};
use subtle::ConstantTimeEq;

use crate::algorithm::SignatureAlgorithm;
use crate::error::{CryptoError, CryptoResult};
use crate::signature::Signature;

/// Key material, held pre-initialised so signing itself cannot fail.
///
/// For the MAC tiers the keyed state is built once at construction; each
/// sign/verify clones it. The raw secret is not retained.
enum KeyMaterial {
    HmacSha256(Hmac<Sha256>),
    HmacSha512(Hmac<Sha512>),
    Ed25519(DalekSigningKey),
}

/// A versioned signing key for one algorithm.
///
/// The pair `(algorithm, version)` forms the key identifier recorded with
/// every signature, which is how verification selects the matching key
/// after rotation.
pub struct SigningKey {
    algorithm: SignatureAlgorithm,
    version: String,
    material: KeyMaterial,
}

impl SigningKey {
    /// Create an HMAC-SHA256 key.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::EmptyKey`] if the secret is empty. Signing
    /// with no key material is a configuration error and must fail fast.
    pub fn hmac_sha256(version: impl Into<String>, secret: &[u8]) -> CryptoResult<Self> {
        if secret.is_empty() {
            return Err(CryptoError::EmptyKey);
        }
        let mac = Hmac::<Sha256>::new_from_slice(secret).map_err(|_| CryptoError::EmptyKey)?;
        Ok(Self {
            algorithm: SignatureAlgorithm::HmacSha256,
            version: version.into(),
            material: KeyMaterial::HmacSha256(mac),
        })
    }

    /// Create an HMAC-SHA512 key.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::EmptyKey`] if the secret is empty.
    pub fn hmac_sha512(version: impl Into<String>, secret: &[u8]) -> CryptoResult<Self> {
        if secret.is_empty() {
            return Err(CryptoError::EmptyKey);
        }
        let mac = Hmac::<Sha512>::new_from_slice(secret).map_err(|_| CryptoError::EmptyKey)?;
        Ok(Self {
            algorithm: SignatureAlgorithm::HmacSha512,
            version: version.into(),
            material: KeyMaterial::HmacSha512(mac),
        })
    }

    /// Create an Ed25519 key from a 32-byte secret.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidKeyLength`] if the slice is not
    /// exactly 32 bytes.
    pub fn ed25519_from_secret_bytes(
        version: impl Into<String>,
        secret: &[u8],
    ) -> CryptoResult<Self> {
        if secret.len() != 32 {
            return Err(CryptoError::InvalidKeyLength {
                expected: 32,
                actual: secret.len(),
            });
        }
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(secret);
        let key = DalekSigningKey::from_bytes(&bytes);
        Ok(Self {
            algorithm: SignatureAlgorithm::Ed25519,
            version: version.into(),
            material: KeyMaterial::Ed25519(key),
        })
    }

    /// Generate a fresh random Ed25519 key.
    #[must_use]
    pub fn generate_ed25519(version: impl Into<String>) -> Self {
        let key = DalekSigningKey::generate(&mut OsRng);
        Self {
            algorithm: SignatureAlgorithm::Ed25519,
            version: version.into(),
            material: KeyMaterial::Ed25519(key),
        }
    }

    /// The algorithm this key signs with.
    #[must_use]
    pub fn algorithm(&self) -> SignatureAlgorithm {
        self.algorithm
    }

    /// The key version label.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// The full key identifier, `<algorithm>:<version>`.
    ///
    /// This is the value stored in an audit event's `signature_algorithm`
    /// field; it is also included in the signed payload.
    #[must_use]
    pub fn key_id(&self) -> String {
        format!("{}:{}", self.algorithm, self.version)
    }

    /// Sign a canonical payload.
    ///
    /// Deterministic: the same payload under the same key always yields
    /// the same signature (Ed25519 is deterministic per RFC 8032).
    #[must_use]
    pub fn sign(&self, payload: &[u8]) -> Signature {
        match &self.material {
            KeyMaterial::HmacSha256(mac) => {
                let mut mac = mac.clone();
                mac.update(payload);
                Signature::from_bytes(mac.finalize().into_bytes().to_vec())
            },
            KeyMaterial::HmacSha512(mac) => {
                let mut mac = mac.clone();
                mac.update(payload);
                Signature::from_bytes(mac.finalize().into_bytes().to_vec())
            },
            KeyMaterial::Ed25519(key) => {
                Signature::from_bytes(key.sign(payload).to_bytes().to_vec())
            },
        }
    }

    /// Verify a signature over a canonical payload.
    ///
    /// A mismatch (including a wrong-length signature) is a normal `false`,
    /// never an error. MAC comparison is constant-time.
    #[must_use]
    pub fn verify(&self, payload: &[u8], signature: &Signature) -> bool {
        match &self.material {
            KeyMaterial::HmacSha256(_) | KeyMaterial::HmacSha512(_) => {
                let expected = self.sign(payload);
                if expected.as_bytes().len() != signature.as_bytes().len() {
                    return false;
                }
                expected.as_bytes().ct_eq(signature.as_bytes()).into()
            },
            KeyMaterial::Ed25519(key) => {
                let Ok(sig) = DalekSignature::from_slice(signature.as_bytes()) else {
                    return false;
                };
                key.verifying_key().verify(payload, &sig).is_ok()
            },
        }
    }
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKey")
            .field("algorithm", &self.algorithm)
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}
