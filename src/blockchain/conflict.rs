//! Conflict resolution between individually valid transactions of one epoch.
//!
//! Two transactions conflict when their footprints (the UTXOs their inputs
//! consume) intersect. The resolver picks one conflict-free group with a
//! greedy policy:
//!
//! 1. Candidates spending an output of another candidate in the same batch
//!    are dropped outright (chained spends are not resolved within an epoch).
//! 2. Every surviving candidate seeds a group, which then absorbs the other
//!    survivors in ascending hash order whenever they do not collide with it.
//! 3. The largest group wins; ties go to the lexicographically smallest
//!    sorted hash list.
//!
//! This is a heuristic. It does not search for a maximum independent set and
//! can miss a larger conflict-free subset that no single seed reaches.

use std::collections::{BTreeMap, BTreeSet, HashSet, VecDeque};

use log::debug;

use crate::blockchain::transaction::{Transaction, TxHash};
use crate::blockchain::utxo::UtxoId;

/// Outcome of resolving one epoch's candidates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Hashes of the committed transactions, ascending
    pub committed: Vec<TxHash>,
    /// Candidates dropped for spending another candidate's output
    pub chain_dependent: Vec<TxHash>,
    /// Number of seed groups that were grown
    pub groups_considered: usize,
}

struct Candidate {
    hash: TxHash,
    footprint: BTreeSet<UtxoId>,
}

/// Selects the committed set from finalized, individually valid candidates
/// keyed by their hash.
pub fn resolve(candidates: &BTreeMap<TxHash, Transaction>) -> Resolution {
    match candidates.len() {
        0 => return Resolution::default(),
        1 => {
            return Resolution {
                committed: candidates.keys().copied().collect(),
                chain_dependent: Vec::new(),
                groups_considered: 1,
            }
        }
        _ => {}
    }

    let batch_hashes: HashSet<TxHash> = candidates.keys().copied().collect();
    let mut survivors = Vec::with_capacity(candidates.len());
    let mut chain_dependent = Vec::new();

    for (hash, tx) in candidates {
        let footprint = tx.footprint();
        let depends_on_batch = footprint
            .iter()
            .any(|utxo| utxo.tx_hash != *hash && batch_hashes.contains(&utxo.tx_hash));
        if depends_on_batch {
            debug!(
                "Excluding {}: spends an output of another candidate in this epoch",
                hash
            );
            chain_dependent.push(*hash);
        } else {
            survivors.push(Candidate { hash: *hash, footprint });
        }
    }

    Resolution {
        committed: select_group(&survivors),
        chain_dependent,
        groups_considered: survivors.len(),
    }
}

/// Grows a group from every survivor (sorted by hash) and keeps the best one.
fn select_group(survivors: &[Candidate]) -> Vec<TxHash> {
    let mut best: Option<Vec<TxHash>> = None;
    for seed in 0..survivors.len() {
        let group = grow_group(seed, survivors);
        if best.as_ref().map_or(true, |current| beats(&group, current)) {
            best = Some(group);
        }
    }
    best.unwrap_or_default()
}

/// Greedily grows a group from `survivors[seed]`, scanning the rest in order.
/// Returns the member hashes sorted ascending.
fn grow_group(seed: usize, survivors: &[Candidate]) -> Vec<TxHash> {
    let mut consumed: HashSet<UtxoId> = survivors[seed].footprint.iter().copied().collect();
    let mut group = vec![survivors[seed].hash];
    let mut frontier: VecDeque<&Candidate> = survivors
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != seed)
        .map(|(_, c)| c)
        .collect();

    while let Some(next) = frontier.pop_front() {
        if next.footprint.iter().all(|utxo| !consumed.contains(utxo)) {
            consumed.extend(next.footprint.iter().copied());
            group.push(next.hash);
        }
    }

    group.sort();
    group
}

fn beats(candidate: &[TxHash], current: &[TxHash]) -> bool {
    candidate.len() > current.len() || (candidate.len() == current.len() && candidate < current)
}
