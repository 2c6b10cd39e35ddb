//! Local Keyring Adapter
//!
//! Implements the `CredentialBackend` port with in-process keys. Both
//! supported schemes sign deterministically (RFC 6979 for secp256k1, RFC 8032
//! for Ed25519), which keeps re-signing after a failed broadcast byte-stable.

use async_trait::async_trait;
use ed25519_dalek::{Signer as _, Verifier as _};
use k256::ecdsa::signature::{Signer as _, Verifier as _};
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

use crate::domain::CredentialError;
use crate::ports::outbound::CredentialBackend;

/// Key material for one credential.
enum KeyMaterial {
    Secp256k1(k256::ecdsa::SigningKey),
    Ed25519(ed25519_dalek::SigningKey),
}

impl KeyMaterial {
    fn sign(&self, bytes: &[u8]) -> Vec<u8> {
        match self {
            Self::Secp256k1(key) => {
                let sig: k256::ecdsa::Signature = key.sign(bytes);
                sig.to_bytes().to_vec()
            }
            Self::Ed25519(key) => key.sign(bytes).to_bytes().to_vec(),
        }
    }

    fn verify(&self, bytes: &[u8], signature: &[u8]) -> bool {
        match self {
            Self::Secp256k1(key) => k256::ecdsa::Signature::from_slice(signature)
                .map(|sig| key.verifying_key().verify(bytes, &sig).is_ok())
                .unwrap_or(false),
            Self::Ed25519(key) => ed25519_dalek::Signature::from_slice(signature)
                .map(|sig| key.verifying_key().verify(bytes, &sig).is_ok())
                .unwrap_or(false),
        }
    }

    fn public_key(&self) -> Vec<u8> {
        match self {
            Self::Secp256k1(key) => key.verifying_key().to_sec1_bytes().to_vec(),
            Self::Ed25519(key) => key.verifying_key().to_bytes().to_vec(),
        }
    }
}

/// In-process signing keys addressed by credential id.
#[derive(Default)]
pub struct LocalKeyring {
    keys: RwLock<HashMap<String, KeyMaterial>>,
    locked: RwLock<HashSet<String>>,
}

impl LocalKeyring {
    /// Create an empty keyring.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a secp256k1 key from its 32-byte secret.
    pub fn insert_secp256k1(
        &self,
        credential_id: &str,
        secret: [u8; 32],
    ) -> Result<(), CredentialError> {
        let key = k256::ecdsa::SigningKey::from_bytes((&secret).into()).map_err(|_| {
            CredentialError::Rejected {
                credential: credential_id.to_string(),
                reason: "invalid secp256k1 secret".to_string(),
            }
        })?;
        self.insert(credential_id, KeyMaterial::Secp256k1(key));
        Ok(())
    }

    /// Load an Ed25519 key from its 32-byte seed.
    pub fn insert_ed25519(&self, credential_id: &str, seed: [u8; 32]) {
        let key = ed25519_dalek::SigningKey::from_bytes(&seed);
        self.insert(credential_id, KeyMaterial::Ed25519(key));
    }

    fn insert(&self, credential_id: &str, material: KeyMaterial) {
        debug!("[relay-01] Loaded credential {}", credential_id);
        self.keys.write().insert(credential_id.to_string(), material);
    }

    /// Refuse signing with `credential_id` until unlocked.
    pub fn lock(&self, credential_id: &str) {
        self.locked.write().insert(credential_id.to_string());
    }

    /// Allow signing with `credential_id` again.
    pub fn unlock(&self, credential_id: &str) {
        self.locked.write().remove(credential_id);
    }

    /// Check if a credential is loaded.
    pub fn contains(&self, credential_id: &str) -> bool {
        self.keys.read().contains_key(credential_id)
    }

    /// Encoded public key of a credential (SEC1 compressed or Ed25519).
    pub fn public_key(&self, credential_id: &str) -> Option<Vec<u8>> {
        self.keys.read().get(credential_id).map(KeyMaterial::public_key)
    }

    /// Verify a signature produced by this keyring.
    pub fn verify(&self, credential_id: &str, bytes: &[u8], signature: &[u8]) -> bool {
        self.keys
            .read()
            .get(credential_id)
            .is_some_and(|key| key.verify(bytes, signature))
    }
}

#[async_trait]
impl CredentialBackend for LocalKeyring {
    async fn sign(&self, credential_id: &str, bytes: &[u8]) -> Result<Vec<u8>, CredentialError> {
        if self.locked.read().contains(credential_id) {
            warn!("[relay-01] Refusing to sign with locked credential {}", credential_id);
            return Err(CredentialError::Locked(credential_id.to_string()));
        }

        if bytes.is_empty() {
            return Err(CredentialError::Rejected {
                credential: credential_id.to_string(),
                reason: "empty input".to_string(),
            });
        }

        let keys = self.keys.read();
        let key = keys
            .get(credential_id)
            .ok_or_else(|| CredentialError::Unavailable(credential_id.to_string()))?;
        Ok(key.sign(bytes))
    }
}
