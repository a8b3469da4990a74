//! Key registry with rotation support.

use std::collections::HashMap;

use crate::key::SigningKey;

/// The active signing key plus historical key versions.
///
/// New signatures are always produced by the active key. Verification
/// resolves whichever key id a stored event recorded, so events signed
/// before a rotation keep verifying afterwards.
///
/// # Example
///
/// ```
/// use veritrail_crypto::{Keyring, SigningKey};
///
/// let v1 = SigningKey::hmac_sha256("v1", b"old-secret").unwrap();
/// let mut keyring = Keyring::new(v1);
///
/// let old_sig = keyring.active().sign(b"payload");
/// let old_id = keyring.active().key_id();
///
/// keyring.rotate(SigningKey::hmac_sha256("v2", b"new-secret").unwrap());
///
/// // Old signatures still verify against the recorded key id.
/// let old_key = keyring.resolve(&old_id).unwrap();
/// assert!(old_key.verify(b"payload", &old_sig));
/// ```
#[derive(Debug)]
pub struct Keyring {
    active: SigningKey,
    historical: HashMap<String, SigningKey>,
}

impl Keyring {
    /// Create a keyring with a single active key.
    #[must_use]
    pub fn new(active: SigningKey) -> Self {
        Self {
            active,
            historical: HashMap::new(),
        }
    }

    /// Add a historical key, keeping the current active key.
    ///
    /// Used when loading previously rotated key versions from the key
    /// material source at startup.
    #[must_use]
    pub fn with_historical(mut self, key: SigningKey) -> Self {
        self.historical.insert(key.key_id(), key);
        self
    }

    /// The key new signatures are produced with.
    #[must_use]
    pub fn active(&self) -> &SigningKey {
        &self.active
    }

    /// Rotate to a new active key.
    ///
    /// The previous active key becomes historical and remains available
    /// for verification under its key id.
    pub fn rotate(&mut self, new_active: SigningKey) {
        let previous = std::mem::replace(&mut self.active, new_active);
        self.historical.insert(previous.key_id(), previous);
    }

    /// Look up the key for a recorded key identifier.
    ///
    /// Checks the active key first, then historical versions. Returns
    /// `None` for identifiers this keyring has no material for.
    #[must_use]
    pub fn resolve(&self, key_id: &str) -> Option<&SigningKey> {
        if self.active.key_id() == key_id {
            return Some(&self.active);
        }
        self.historical.get(key_id)
    }

    /// Number of keys held, active included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.historical.len().saturating_add(1)
    }

    /// A keyring always holds at least the active key.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_active() {
        let keyring = Keyring::new(SigningKey::hmac_sha256("v1", b"secret").unwrap());
        assert!(keyring.resolve("hmac-sha256:v1").is_some());
        assert!(keyring.resolve("hmac-sha256:v9").is_none());
        assert_eq!(keyring.len(), 1);
    }

    #[test]
    fn test_rotation_keeps_old_key_verifying() {
        let mut keyring = Keyring::new(SigningKey::hmac_sha256("v1", b"old").unwrap());
        let old_id = keyring.active().key_id();
        let old_sig = keyring.active().sign(b"payload");

        keyring.rotate(SigningKey::hmac_sha256("v2", b"new").unwrap());

        assert_eq!(keyring.active().key_id(), "hmac-sha256:v2");
        assert_eq!(keyring.len(), 2);

        let old_key = keyring.resolve(&old_id).unwrap();
        assert!(old_key.verify(b"payload", &old_sig));

        // Same payload signs differently under the new key.
        assert_ne!(keyring.active().sign(b"payload"), old_sig);
    }

    #[test]
    fn test_rotation_across_algorithms() {
        let mut keyring = Keyring::new(SigningKey::hmac_sha256("v1", b"secret").unwrap());
        let old_id = keyring.active().key_id();
        let old_sig = keyring.active().sign(b"payload");

        keyring.rotate(SigningKey::generate_ed25519("v2"));

        assert!(keyring.resolve(&old_id).unwrap().verify(b"payload", &old_sig));
        let new_sig = keyring.active().sign(b"payload");
        assert!(keyring.active().verify(b"payload", &new_sig));
    }

    #[test]
    fn test_with_historical() {
        let keyring = Keyring::new(SigningKey::hmac_sha512("v2", b"new").unwrap())
            .with_historical(SigningKey::hmac_sha512("v1", b"old").unwrap());

        assert_eq!(keyring.len(), 2);
        assert!(keyring.resolve("hmac-sha512:v1").is_some());
        assert!(keyring.resolve("hmac-sha512:v2").is_some());
    }
}
