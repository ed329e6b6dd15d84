//! Keys that own outputs and sign inputs.

use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::cryptography::crypto::{derive_address_from_seed, Address, CryptoOperations, Ed25519};

pub struct Wallet {
    secret_key: [u8; 32],
    address: Address,
}

impl Wallet {
    /// Creates a wallet from fresh OS randomness.
    pub fn new() -> Self {
        let mut seed = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut seed);
        Self::from_seed(seed)
    }

    pub fn from_seed(secret_key: [u8; 32]) -> Self {
        let address = derive_address_from_seed(&secret_key);
        Self { secret_key, address }
    }

    /// Deterministic wallet whose seed is the SHA-256 of `label`.
    ///
    /// Only meant for scenarios and tests: anyone knowing the label can spend.
    pub fn from_label(label: &str) -> Self {
        let seed: [u8; 32] = Sha256::digest(label.as_bytes()).into();
        Self::from_seed(seed)
    }

    pub fn get_address(&self) -> Address {
        self.address
    }

    pub fn sign(&self, message: &[u8]) -> Vec<u8> {
        Ed25519::sign(&self.secret_key, message)
    }
}

impl Default for Wallet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_wallets_are_deterministic() {
        let alice = Wallet::from_label("alice").get_address();
        assert_eq!(alice, Wallet::from_label("alice").get_address());
        assert_ne!(alice, Wallet::from_label("bob").get_address());
    }

    #[test]
    fn test_wallet_signature_verifies() {
        let wallet = Wallet::new();
        let sig = wallet.sign(b"spend");
        assert!(Ed25519::verify(&wallet.get_address(), b"spend", &sig));
    }
}
