//! Transactions, their inputs and outputs, and the canonical encodings used
//! for signing and hashing.
//!
//! A transaction's hash is a cache: it is `None` until [`Transaction::finalize`]
//! is called and any later mutation clears it again. Equality and hashing of a
//! `Transaction` only look at inputs and outputs, so a finalized copy and an
//! unfinalized copy of the same content are the same transaction.

use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::blockchain::utxo::UtxoId;
use crate::cryptography::{Address, Wallet};
use crate::error::{LedgerError, Result};

/// Value carried by an output. Signed so that a negative output can be
/// expressed by a malicious or buggy client and rejected by validation.
pub type Amount = i64;

/// SHA-256 content hash of a transaction.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TxHash(pub [u8; 32]);

impl TxHash {
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s).map_err(|e| LedgerError::InvalidHash(e.to_string()))?;
        let hash: [u8; 32] = bytes
            .try_into()
            .map_err(|_| LedgerError::InvalidHash(format!("expected 32 bytes: {}", s)))?;
        Ok(Self(hash))
    }

    /// SHA-256 of an arbitrary label. Handy for naming genesis outputs.
    pub fn of_label(label: &str) -> Self {
        Self(Sha256::digest(label.as_bytes()).into())
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

/// Reference to a previous output plus the owner's signature authorising the spend.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
pub struct TxInput {
    /// Hash of the transaction that created the output being spent
    pub prev_tx_hash: TxHash,
    /// Index of that output within its transaction
    pub output_index: u32,
    /// Signature over [`Transaction::raw_data_to_sign`] for this input's position
    pub signature: Option<Vec<u8>>,
}

impl TxInput {
    pub fn new(prev_tx_hash: TxHash, output_index: u32) -> Self {
        Self {
            prev_tx_hash,
            output_index,
            signature: None,
        }
    }

    /// The UTXO this input consumes.
    pub fn utxo(&self) -> UtxoId {
        UtxoId::new(self.prev_tx_hash, self.output_index)
    }
}

/// A new coin created by a transaction.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
pub struct TxOutput {
    /// Amount of coins assigned to `address`
    pub value: Amount,
    /// Owner allowed to spend this output
    pub address: Address,
}

impl TxOutput {
    pub fn new(value: Amount, address: Address) -> Self {
        Self { value, address }
    }
}

#[derive(Serialize)]
struct SigningPayload<'a> {
    input_index: u32,
    utxo: UtxoId,
    outputs: &'a [TxOutput],
}

#[derive(Clone, Serialize, Deserialize, Debug, Default)]
pub struct Transaction {
    inputs: Vec<TxInput>,
    outputs: Vec<TxOutput>,
    #[serde(skip)]
    hash: Option<TxHash>,
}

impl Transaction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero-input transaction minting `value` to `address`, already finalized.
    pub fn coinbase(address: Address, value: Amount) -> Result<Self> {
        let mut tx = Self::new();
        tx.add_output(value, address);
        tx.finalize()?;
        Ok(tx)
    }

    pub fn add_input(&mut self, prev_tx_hash: TxHash, output_index: u32) {
        self.hash = None;
        self.inputs.push(TxInput::new(prev_tx_hash, output_index));
    }

    pub fn add_output(&mut self, value: Amount, address: Address) {
        self.hash = None;
        self.outputs.push(TxOutput::new(value, address));
    }

    pub fn remove_input(&mut self, index: usize) -> Option<TxInput> {
        if index >= self.inputs.len() {
            return None;
        }
        self.hash = None;
        Some(self.inputs.remove(index))
    }

    pub fn add_signature(&mut self, index: usize, signature: Vec<u8>) -> Result<()> {
        let input = self.inputs.get_mut(index).ok_or(LedgerError::InputIndex(index))?;
        input.signature = Some(signature);
        self.hash = None;
        Ok(())
    }

    /// Signs input `index` with `wallet` over this transaction's current outputs.
    pub fn sign_input(&mut self, index: usize, wallet: &Wallet) -> Result<()> {
        let payload = self.raw_data_to_sign(index)?;
        self.add_signature(index, wallet.sign(&payload))
    }

    pub fn inputs(&self) -> &[TxInput] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[TxOutput] {
        &self.outputs
    }

    pub fn input(&self, index: usize) -> Option<&TxInput> {
        self.inputs.get(index)
    }

    pub fn output(&self, index: usize) -> Option<&TxOutput> {
        self.outputs.get(index)
    }

    pub fn num_inputs(&self) -> usize {
        self.inputs.len()
    }

    pub fn num_outputs(&self) -> usize {
        self.outputs.len()
    }

    /// Bytes the owner of input `index` signs: that input's UTXO and position
    /// plus every output. Signatures are excluded.
    pub fn raw_data_to_sign(&self, index: usize) -> Result<Vec<u8>> {
        let input = self.inputs.get(index).ok_or(LedgerError::InputIndex(index))?;
        let input_index = u32::try_from(index).map_err(|_| LedgerError::InputIndex(index))?;
        let payload = SigningPayload {
            input_index,
            utxo: input.utxo(),
            outputs: &self.outputs,
        };
        Ok(bincode::serialize(&payload)?)
    }

    /// Canonical encoding of the whole transaction, signatures included.
    pub fn raw_tx(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(&(&self.inputs, &self.outputs))?)
    }

    /// SHA-256 of [`raw_tx`](Self::raw_tx). Does not touch the cached hash.
    pub fn content_hash(&self) -> Result<TxHash> {
        let raw = self.raw_tx()?;
        Ok(TxHash(Sha256::digest(&raw).into()))
    }

    /// Fixes the transaction hash. Call once every field is set.
    pub fn finalize(&mut self) -> Result<TxHash> {
        let hash = self.content_hash()?;
        self.hash = Some(hash);
        Ok(hash)
    }

    /// The hash fixed by the last [`finalize`](Self::finalize), if still current.
    pub fn hash(&self) -> Option<TxHash> {
        self.hash
    }

    pub fn finalized_hash(&self) -> Result<TxHash> {
        self.hash.ok_or(LedgerError::NotFinalized)
    }

    /// Set of UTXOs consumed by this transaction's inputs.
    pub fn footprint(&self) -> BTreeSet<UtxoId> {
        self.inputs.iter().map(TxInput::utxo).collect()
    }
}

impl PartialEq for Transaction {
    fn eq(&self, other: &Self) -> bool {
        self.inputs == other.inputs && self.outputs == other.outputs
    }
}

impl Eq for Transaction {}

impl Hash for Transaction {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inputs.hash(state);
        self.outputs.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Transaction {
        let mut tx = Transaction::new();
        tx.add_input(TxHash::of_label("genesis"), 0);
        tx.add_output(10, Wallet::from_label("bob").get_address());
        tx
    }

    #[test]
    fn test_hash_unset_until_finalize() {
        let mut tx = sample();
        assert_eq!(tx.hash(), None);
        assert!(matches!(tx.finalized_hash(), Err(LedgerError::NotFinalized)));

        let hash = tx.finalize().unwrap();
        assert_eq!(tx.hash(), Some(hash));
        assert_eq!(hash, tx.content_hash().unwrap());
    }

    #[test]
    fn test_mutation_clears_hash() {
        let mut tx = sample();
        let before = tx.finalize().unwrap();

        tx.add_output(1, Wallet::from_label("carol").get_address());
        assert_eq!(tx.hash(), None);
        assert_ne!(tx.finalize().unwrap(), before);
    }

    #[test]
    fn test_signable_payload_bound_to_position_and_outputs() {
        let mut tx = sample();
        tx.add_input(TxHash::of_label("genesis"), 1);

        let first = tx.raw_data_to_sign(0).unwrap();
        let second = tx.raw_data_to_sign(1).unwrap();
        assert_ne!(first, second);
        assert!(matches!(tx.raw_data_to_sign(2), Err(LedgerError::InputIndex(2))));

        tx.add_output(5, Wallet::from_label("carol").get_address());
        assert_ne!(tx.raw_data_to_sign(0).unwrap(), first);
    }

    #[test]
    fn test_signatures_do_not_change_signable_payload() {
        let mut tx = sample();
        let payload = tx.raw_data_to_sign(0).unwrap();
        tx.sign_input(0, &Wallet::from_label("alice")).unwrap();
        assert_eq!(tx.raw_data_to_sign(0).unwrap(), payload);
        assert!(tx.input(0).unwrap().signature.is_some());
    }

    #[test]
    fn test_equality_ignores_cached_hash() {
        let plain = sample();
        let mut finalized = sample();
        finalized.finalize().unwrap();
        assert_eq!(plain, finalized);
    }

    #[test]
    fn test_footprint_collapses_repeats() {
        let mut tx = sample();
        tx.add_input(TxHash::of_label("genesis"), 0);
        assert_eq!(tx.num_inputs(), 2);
        assert_eq!(tx.footprint().len(), 1);
    }

    #[test]
    fn test_remove_input() {
        let mut tx = sample();
        tx.finalize().unwrap();
        assert!(tx.remove_input(3).is_none());
        assert!(tx.hash().is_some());
        assert!(tx.remove_input(0).is_some());
        assert_eq!(tx.num_inputs(), 0);
        assert_eq!(tx.hash(), None);
    }

    #[test]
    fn test_coinbase_is_finalized() {
        let tx = Transaction::coinbase(Wallet::from_label("alice").get_address(), 50).unwrap();
        assert!(tx.hash().is_some());
        assert_eq!(tx.num_inputs(), 0);
        assert_eq!(tx.output(0).map(|o| o.value), Some(50));
    }

    #[test]
    fn test_tx_hash_hex_roundtrip() {
        let hash = TxHash::of_label("genesis");
        assert_eq!(TxHash::from_hex(&hash.to_string()).unwrap(), hash);
        assert!(TxHash::from_hex("abcd").is_err());
        assert!(TxHash::from_hex("zz").is_err());
    }
}
