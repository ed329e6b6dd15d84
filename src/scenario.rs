//! JSON scenarios: an initial UTXO set plus a list of epochs to replay.
//!
//! Owners and signers are labels; each label maps to the deterministic
//! [`Wallet::from_label`] key, so scenarios can be written by hand and still
//! carry real signatures.

use std::fs;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::blockchain::{
    Amount, HandlerConfig, Transaction, TxHandler, TxHash, TxOutput, UTXOPool, UtxoId, UtxoStore,
};
use crate::cryptography::Wallet;
use crate::error::Result;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Scenario {
    pub utxos: Vec<UtxoSpec>,
    #[serde(default)]
    pub epochs: Vec<Vec<TxSpec>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UtxoSpec {
    /// 64-char hex hash, or a label hashed with SHA-256
    pub tx: String,
    pub index: u32,
    pub owner: String,
    pub value: Amount,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TxSpec {
    pub inputs: Vec<InputSpec>,
    pub outputs: Vec<OutputSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InputSpec {
    pub tx: String,
    pub index: u32,
    /// Wallet label signing this input; unsigned when absent
    #[serde(default)]
    pub signer: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutputSpec {
    pub owner: String,
    pub value: Amount,
}

/// What one epoch committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpochReport {
    pub submitted: usize,
    pub committed: Vec<TxHash>,
}

#[derive(Debug, Clone)]
pub struct ScenarioReport {
    pub epochs: Vec<EpochReport>,
    pub remaining: UTXOPool,
}

/// Hex hash when `reference` is one, otherwise the SHA-256 of the label.
pub fn resolve_tx_reference(reference: &str) -> TxHash {
    if reference.len() == 64 {
        if let Ok(hash) = TxHash::from_hex(reference) {
            return hash;
        }
    }
    TxHash::of_label(reference)
}

impl Scenario {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn initial_pool(&self) -> UTXOPool {
        let mut pool = UTXOPool::new();
        for spec in &self.utxos {
            let id = UtxoId::new(resolve_tx_reference(&spec.tx), spec.index);
            let owner = Wallet::from_label(&spec.owner).get_address();
            pool.insert(id, TxOutput::new(spec.value, owner));
        }
        pool
    }

    /// Builds and signs the transactions of every epoch.
    pub fn build_epochs(&self) -> Result<Vec<Vec<Transaction>>> {
        self.epochs
            .iter()
            .map(|epoch| epoch.iter().map(TxSpec::build).collect())
            .collect()
    }

    /// Replays every epoch through one handler.
    pub fn run(&self, config: HandlerConfig) -> Result<ScenarioReport> {
        let mut handler: TxHandler = TxHandler::with_config(&self.initial_pool(), config);
        let mut epochs = Vec::with_capacity(self.epochs.len());

        for (number, batch) in self.build_epochs()?.into_iter().enumerate() {
            let submitted = batch.len();
            let committed = handler
                .handle_epoch(batch)
                .iter()
                .map(Transaction::finalized_hash)
                .collect::<Result<Vec<_>>>()?;
            info!("Epoch {}: committed {} of {}", number, committed.len(), submitted);
            epochs.push(EpochReport { submitted, committed });
        }

        Ok(ScenarioReport {
            epochs,
            remaining: handler.utxo_pool().clone(),
        })
    }
}

impl TxSpec {
    pub fn build(&self) -> Result<Transaction> {
        let mut tx = Transaction::new();
        for input in &self.inputs {
            tx.add_input(resolve_tx_reference(&input.tx), input.index);
        }
        for output in &self.outputs {
            tx.add_output(output.value, Wallet::from_label(&output.owner).get_address());
        }
        for (index, input) in self.inputs.iter().enumerate() {
            if let Some(signer) = &input.signer {
                tx.sign_input(index, &Wallet::from_label(signer))?;
            }
        }
        Ok(tx)
    }
}
