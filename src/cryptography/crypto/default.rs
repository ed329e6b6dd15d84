use std::fmt;

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use serde::{Deserialize, Serialize};

use super::traits::CryptoOperations;

/// Owner identity of an output: the raw ed25519 verifying key.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address(pub [u8; 32]);

impl Address {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(&self.0[..8]))
    }
}

/// ed25519 signatures over raw payload bytes.
pub struct Ed25519;

impl CryptoOperations for Ed25519 {
    fn sign(secret_key: &[u8; 32], message: &[u8]) -> Vec<u8> {
        SigningKey::from_bytes(secret_key).sign(message).to_bytes().to_vec()
    }

    fn verify(address: &Address, message: &[u8], signature: &[u8]) -> bool {
        let Ok(key) = VerifyingKey::from_bytes(address.as_bytes()) else {
            return false;
        };
        let Ok(signature) = Signature::from_slice(signature) else {
            return false;
        };
        key.verify(message, &signature).is_ok()
    }
}

/// Address owned by the secret seed.
pub fn derive_address_from_seed(secret_key: &[u8; 32]) -> Address {
    Address(SigningKey::from_bytes(secret_key).verifying_key().to_bytes())
}
