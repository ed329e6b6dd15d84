//! UTXO (Unspent Transaction Output) identification and the pool of
//! currently spendable outputs.
//!
//! The pool is consumed by validation through the [`UtxoStore`] trait; the
//! concrete [`UTXOPool`] is a plain in-memory map. Cloning a pool yields an
//! independent copy, which is how the handler takes its private snapshot.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::blockchain::transaction::{Amount, Transaction, TxHash, TxOutput};
use crate::error::{LedgerError, Result};

/// Unique identifier for an Unspent Transaction Output.
///
/// Outputs are addressed by the hash of the transaction that created them
/// and their position in that transaction's output list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UtxoId {
    /// Hash of the transaction that created the output
    pub tx_hash: TxHash,
    /// Index of the output within that transaction
    pub output_index: u32,
}

impl UtxoId {
    pub fn new(tx_hash: TxHash, output_index: u32) -> Self {
        Self { tx_hash, output_index }
    }
}

impl fmt::Display for UtxoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "utxo-{}-{}", hex::encode(&self.tx_hash.0[..8]), self.output_index)
    }
}

/// Keyed store of spendable outputs.
pub trait UtxoStore {
    fn contains(&self, utxo: &UtxoId) -> bool;

    fn get(&self, utxo: &UtxoId) -> Option<&TxOutput>;

    /// Removes `utxo`, returning the output it pointed at.
    fn remove(&mut self, utxo: &UtxoId) -> Option<TxOutput>;

    fn insert(&mut self, utxo: UtxoId, output: TxOutput);

    /// Every entry, in no particular order.
    fn all_utxos(&self) -> Vec<(UtxoId, TxOutput)>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UTXOPool {
    utxos: HashMap<UtxoId, TxOutput>,
}

impl UTXOPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a pool with every output of a finalized transaction.
    pub fn from_transaction_outputs(tx: &Transaction) -> Result<Self> {
        let mut pool = Self::new();
        pool.add_transaction_outputs(tx)?;
        Ok(pool)
    }

    pub fn add_transaction_outputs(&mut self, tx: &Transaction) -> Result<()> {
        let hash = tx.hash().ok_or(LedgerError::NotFinalized)?;
        for (index, output) in tx.outputs().iter().enumerate() {
            let index = u32::try_from(index).map_err(|_| LedgerError::InputIndex(index))?;
            self.utxos.insert(UtxoId::new(hash, index), output.clone());
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.utxos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.utxos.is_empty()
    }

    /// Sum of every spendable output. `None` on overflow.
    pub fn total_value(&self) -> Option<Amount> {
        self.utxos
            .values()
            .try_fold(0 as Amount, |acc, out| acc.checked_add(out.value))
    }
}

impl UtxoStore for UTXOPool {
    fn contains(&self, utxo: &UtxoId) -> bool {
        self.utxos.contains_key(utxo)
    }

    fn get(&self, utxo: &UtxoId) -> Option<&TxOutput> {
        self.utxos.get(utxo)
    }

    fn remove(&mut self, utxo: &UtxoId) -> Option<TxOutput> {
        self.utxos.remove(utxo)
    }

    fn insert(&mut self, utxo: UtxoId, output: TxOutput) {
        self.utxos.insert(utxo, output);
    }

    fn all_utxos(&self) -> Vec<(UtxoId, TxOutput)> {
        self.utxos.iter().map(|(id, out)| (*id, out.clone())).collect()
    }
}

impl FromIterator<(UtxoId, TxOutput)> for UTXOPool {
    fn from_iter<I: IntoIterator<Item = (UtxoId, TxOutput)>>(iter: I) -> Self {
        Self {
            utxos: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cryptography::Wallet;

    #[test]
    fn test_utxo_id_display() {
        let id = UtxoId::new(TxHash([0xab; 32]), 3);
        assert_eq!(id.to_string(), "utxo-abababababababab-3");
    }

    #[test]
    fn test_utxo_id_structural_equality() {
        let a = UtxoId::new(TxHash::of_label("genesis"), 0);
        let b = UtxoId::new(TxHash::of_label("genesis"), 0);
        let c = UtxoId::new(TxHash::of_label("genesis"), 1);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_pool_basic_operations() {
        let mut pool = UTXOPool::new();
        let id = UtxoId::new(TxHash::of_label("genesis"), 0);
        let out = TxOutput::new(10, Wallet::from_label("alice").get_address());

        assert!(!pool.contains(&id));
        pool.insert(id, out.clone());
        assert!(pool.contains(&id));
        assert_eq!(pool.get(&id), Some(&out));
        assert_eq!(pool.all_utxos(), vec![(id, out.clone())]);

        assert_eq!(pool.remove(&id), Some(out));
        assert!(pool.is_empty());
        assert_eq!(pool.remove(&id), None);
    }

    #[test]
    fn test_clone_is_independent() {
        let id = UtxoId::new(TxHash::of_label("genesis"), 0);
        let mut original = UTXOPool::new();
        original.insert(id, TxOutput::new(10, Wallet::from_label("alice").get_address()));

        let mut copy = original.clone();
        copy.remove(&id);
        assert!(original.contains(&id));
        assert!(!copy.contains(&id));
    }

    #[test]
    fn test_from_transaction_outputs() {
        let alice = Wallet::from_label("alice").get_address();
        let mut tx = Transaction::new();
        tx.add_output(4, alice);
        tx.add_output(6, alice);

        assert!(matches!(UTXOPool::from_transaction_outputs(&tx), Err(LedgerError::NotFinalized)));

        let hash = tx.finalize().unwrap();
        let pool = UTXOPool::from_transaction_outputs(&tx).unwrap();
        assert_eq!(pool.len(), 2);
        assert!(pool.contains(&UtxoId::new(hash, 1)));
        assert_eq!(pool.total_value(), Some(10));
    }

    #[test]
    fn test_total_value_overflow() {
        let alice = Wallet::from_label("alice").get_address();
        let pool: UTXOPool = (0..2)
            .map(|i| (UtxoId::new(TxHash::default(), i), TxOutput::new(Amount::MAX, alice)))
            .collect();
        assert_eq!(pool.total_value(), None);
    }
}
