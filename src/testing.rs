//! Fixtures shared by the unit tests.

use crate::blockchain::transaction::{Amount, Transaction, TxHash};
use crate::blockchain::utxo::{UTXOPool, UtxoId, UtxoStore};
use crate::blockchain::transaction::TxOutput;
use crate::cryptography::{Address, CryptoOperations, Wallet};

/// Output `index` of the synthetic genesis transaction.
pub fn genesis_utxo(index: u32) -> UtxoId {
    UtxoId::new(TxHash::of_label("genesis"), index)
}

/// Pool holding one genesis output per entry, at consecutive indices.
pub fn genesis_pool(owners: &[(&Wallet, Amount)]) -> UTXOPool {
    let mut pool = UTXOPool::new();
    for (index, (wallet, value)) in owners.iter().enumerate() {
        pool.insert(genesis_utxo(index as u32), TxOutput::new(*value, wallet.get_address()));
    }
    pool
}

/// Unfinalized transaction with every input signed by the paired wallet.
pub fn signed_tx(inputs: &[(UtxoId, &Wallet)], outputs: &[(Amount, Address)]) -> Transaction {
    let mut tx = Transaction::new();
    for (utxo, _) in inputs {
        tx.add_input(utxo.tx_hash, utxo.output_index);
    }
    for (value, address) in outputs {
        tx.add_output(*value, *address);
    }
    for (index, (_, wallet)) in inputs.iter().enumerate() {
        tx.sign_input(index, wallet).unwrap();
    }
    tx
}

/// Signature scheme that accepts anything.
pub struct AcceptAll;

impl CryptoOperations for AcceptAll {
    fn sign(_secret_key: &[u8; 32], _message: &[u8]) -> Vec<u8> {
        vec![1]
    }

    fn verify(_address: &Address, _message: &[u8], _signature: &[u8]) -> bool {
        true
    }
}

/// Signature scheme that rejects everything.
pub struct RejectAll;

impl CryptoOperations for RejectAll {
    fn sign(_secret_key: &[u8; 32], _message: &[u8]) -> Vec<u8> {
        vec![0]
    }

    fn verify(_address: &Address, _message: &[u8], _signature: &[u8]) -> bool {
        false
    }
}
