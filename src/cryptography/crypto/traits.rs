use crate::cryptography::Address;

/// Signature scheme consumed by transaction validation.
pub trait CryptoOperations {
    /// Signs `message` with a 32-byte secret seed.
    fn sign(secret_key: &[u8; 32], message: &[u8]) -> Vec<u8>;

    /// Returns `true` only if `signature` is a valid signature over `message`
    /// by the key behind `address`. Malformed keys or signatures verify as `false`.
    fn verify(address: &Address, message: &[u8], signature: &[u8]) -> bool;
}
