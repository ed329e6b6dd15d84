pub mod transaction;
pub mod utxo;
pub mod validation;
pub mod conflict;
pub mod handler;

// Re-export commonly used types
pub use transaction::{Amount, Transaction, TxHash, TxInput, TxOutput};
pub use utxo::{UTXOPool, UtxoId, UtxoStore};
pub use conflict::Resolution;
pub use handler::{HandlerConfig, TxHandler};
