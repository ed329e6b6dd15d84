//! Crate-wide error types.

use thiserror::Error;

use crate::blockchain::utxo::UtxoId;
use crate::blockchain::transaction::Amount;

/// Errors raised by the ledger plumbing (encoding, hashes, scenario loading).
///
/// Transaction validity is never reported through this type; see [`TxRejection`].
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid transaction hash: {0}")]
    InvalidHash(String),
    #[error("Transaction hash read before finalize()")]
    NotFinalized,
    #[error("Input index {0} out of range")]
    InputIndex(usize),
}

pub type Result<T> = std::result::Result<T, LedgerError>;

/// Why a single transaction failed validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TxRejection {
    #[error("input {index} references missing UTXO {utxo}")]
    MissingUtxo { index: usize, utxo: UtxoId },

    #[error("input {index} carries no signature")]
    MissingSignature { index: usize },

    #[error("input {index} signature does not verify against {utxo}")]
    InvalidSignature { index: usize, utxo: UtxoId },

    #[error("UTXO {0} claimed more than once")]
    DuplicateInput(UtxoId),

    #[error("output {index} has negative value {value}")]
    NegativeOutput { index: usize, value: Amount },

    #[error("insufficient input value: have {have}, need {need}")]
    InsufficientInput { have: i128, need: i128 },

    #[error("could not encode signing payload for input {index}")]
    Encoding { index: usize },
}
