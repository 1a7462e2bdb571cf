//! Seed-derived ed25519 signer.

use ed25519_dalek::{Signer, SigningKey};
use sha2::{Digest, Sha256};
use shared_types::AccountId;

use crate::ports::TxSigner;

/// ed25519 key whose secret is `SHA-256(seed)`.
///
/// Any seed string works, including dev seeds such as `//Eve`.
pub struct SeedSigner {
    key: SigningKey,
}

impl SeedSigner {
    /// Derive a key from a seed phrase.
    pub fn from_seed(seed: &str) -> Self {
        let secret: [u8; 32] = Sha256::digest(seed.as_bytes()).into();
        Self {
            key: SigningKey::from_bytes(&secret),
        }
    }

    /// Raw public key bytes.
    pub fn public_key(&self) -> [u8; 32] {
        self.key.verifying_key().to_bytes()
    }
}

impl std::fmt::Debug for SeedSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeedSigner")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}

impl TxSigner for SeedSigner {
    fn address(&self) -> AccountId {
        AccountId::new(format!("0x{}", hex::encode(self.public_key())))
    }

    fn sign(&self, payload: &[u8]) -> Vec<u8> {
        self.key.sign(payload).to_bytes().to_vec()
    }
}
