/*!
ScroogeCoin - epoch-based transaction admission over a UTXO pool.

A [`TxHandler`] owns the set of spendable outputs. Each epoch it receives an
unordered batch of proposed transactions, drops the invalid ones, resolves
double spends between the rest and commits a conflict-free subset, removing
the outputs that subset consumes.

# Main Components

- `blockchain`: transactions, the UTXO pool, validation, conflict resolution and the epoch handler
- `cryptography`: the signature scheme and wallets that own outputs
- `scenario`: JSON scenarios replayed by the command-line tool
- `cli`: command-line interface

# Example Usage

```rust
use scroogecoin::{Transaction, TxHandler, UTXOPool, UtxoId, UtxoStore, TxHash, Wallet};

let alice = Wallet::from_label("alice");
let bob = Wallet::from_label("bob");

let mut pool = UTXOPool::new();
let genesis = UtxoId::new(TxHash::of_label("genesis"), 0);
pool.insert(genesis, scroogecoin::TxOutput::new(10, alice.get_address()));

let mut tx = Transaction::new();
tx.add_input(genesis.tx_hash, genesis.output_index);
tx.add_output(10, bob.get_address());
tx.sign_input(0, &alice).unwrap();

let mut handler = TxHandler::new(&pool);
assert!(handler.is_valid_tx(&tx));
assert_eq!(handler.handle_epoch(vec![tx]).len(), 1);
assert!(!handler.utxo_pool().contains(&genesis));
```
*/

/// Transactions, UTXO pool, validation, conflict resolution and epoch handling.
pub mod blockchain;

/// Signature scheme and wallets.
pub mod cryptography;

/// Scenario files replayed by the CLI.
pub mod scenario;

/// Command-line interface.
pub mod cli;

pub mod error;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use blockchain::{
    Amount, HandlerConfig, Transaction, TxHandler, TxHash, TxInput, TxOutput, UTXOPool, UtxoId,
    UtxoStore,
};
pub use cryptography::{Address, CryptoOperations, Ed25519, Wallet};
pub use error::{LedgerError, Result, TxRejection};
