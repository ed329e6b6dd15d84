//! Epoch processing: validate a batch, resolve conflicts, commit.

use std::collections::{BTreeMap, HashSet};
use std::marker::PhantomData;

use log::{debug, info, warn};

use crate::blockchain::conflict::{self, Resolution};
use crate::blockchain::transaction::{Transaction, TxHash};
use crate::blockchain::utxo::{UTXOPool, UtxoStore};
use crate::blockchain::validation;
use crate::cryptography::{CryptoOperations, Ed25519};
use crate::error::TxRejection;

#[derive(Debug, Clone, Default)]
pub struct HandlerConfig {
    /// Upper bound on unique candidates considered per epoch. Extra
    /// candidates (by ascending content hash) are dropped before validation.
    pub max_batch_size: Option<usize>,
}

/// Owns the authoritative UTXO pool and admits transactions epoch by epoch.
///
/// `handle_epoch` takes `&mut self`; share a handler behind a `Mutex` if
/// several threads submit epochs.
pub struct TxHandler<C: CryptoOperations = Ed25519> {
    utxo_pool: UTXOPool,
    config: HandlerConfig,
    _scheme: PhantomData<C>,
}

impl TxHandler<Ed25519> {
    /// Creates a handler over a private copy of `utxo_pool`.
    pub fn new(utxo_pool: &UTXOPool) -> Self {
        Self::with_config(utxo_pool, HandlerConfig::default())
    }
}

impl<C: CryptoOperations> TxHandler<C> {
    pub fn with_config(utxo_pool: &UTXOPool, config: HandlerConfig) -> Self {
        Self {
            utxo_pool: utxo_pool.clone(),
            config,
            _scheme: PhantomData,
        }
    }

    /// Current spendable outputs.
    pub fn utxo_pool(&self) -> &UTXOPool {
        &self.utxo_pool
    }

    pub fn is_valid_tx(&self, tx: &Transaction) -> bool {
        validation::is_valid_tx::<C>(tx, &self.utxo_pool)
    }

    pub fn check_tx(&self, tx: &Transaction) -> Result<(), TxRejection> {
        validation::check_tx::<C>(tx, &self.utxo_pool)
    }

    /// Processes one unordered batch of proposed transactions.
    ///
    /// Returns the committed transactions, finalized, in ascending hash order
    /// (callers should not depend on the order). Every UTXO they spend is
    /// removed from the pool; nothing else in the pool changes.
    pub fn handle_epoch(&mut self, possible_txs: Vec<Transaction>) -> Vec<Transaction> {
        if possible_txs.is_empty() {
            return Vec::new();
        }
        let received = possible_txs.len();

        let mut unique: Vec<Transaction> = Vec::with_capacity(received);
        let mut seen: HashSet<Transaction> = HashSet::with_capacity(received);
        for tx in possible_txs {
            if seen.insert(tx.clone()) {
                unique.push(tx);
            }
        }
        let duplicates = received - unique.len();

        if let Some(limit) = self.config.max_batch_size {
            if unique.len() > limit {
                warn!(
                    "Epoch has {} unique candidates, keeping the first {} by hash",
                    unique.len(),
                    limit
                );
                unique = truncate_by_hash(unique, limit);
            }
        }

        // Validate first, then finalize: conflict resolution compares hashes.
        let mut candidates: BTreeMap<TxHash, Transaction> = BTreeMap::new();
        for mut tx in unique {
            if let Err(reason) = self.check_tx(&tx) {
                debug!("Rejected transaction: {}", reason);
                continue;
            }
            match tx.finalize() {
                Ok(hash) => {
                    candidates.insert(hash, tx);
                }
                Err(e) => warn!("Could not finalize valid transaction: {}", e),
            }
        }
        let valid = candidates.len();

        let Resolution { committed, chain_dependent, .. } = conflict::resolve(&candidates);

        let mut accepted = Vec::with_capacity(committed.len());
        for hash in committed {
            if let Some(tx) = candidates.remove(&hash) {
                accepted.push(tx);
            }
        }

        let mut consumed = 0;
        for tx in &accepted {
            for input in tx.inputs() {
                if self.utxo_pool.remove(&input.utxo()).is_some() {
                    consumed += 1;
                }
            }
        }

        info!(
            "Epoch: {} received, {} duplicates, {} valid, {} chain-dependent, {} committed, {} UTXOs consumed",
            received,
            duplicates,
            valid,
            chain_dependent.len(),
            accepted.len(),
            consumed
        );

        accepted
    }
}

fn truncate_by_hash(txs: Vec<Transaction>, limit: usize) -> Vec<Transaction> {
    let mut keyed: Vec<(Option<TxHash>, Transaction)> =
        txs.into_iter().map(|tx| (tx.content_hash().ok(), tx)).collect();
    keyed.sort_by(|a, b| a.0.cmp(&b.0));
    keyed.into_iter().take(limit).map(|(_, tx)| tx).collect()
}
