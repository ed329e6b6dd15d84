//! Single-transaction validity against a UTXO snapshot.
//!
//! # Rules
//!
//! 1. **Inputs must exist**: every referenced UTXO is in the store
//! 2. **Signatures**: every input is signed by the owner of the output it spends
//! 3. **No double spend**: a UTXO is claimed at most once by the transaction
//! 4. **Non-negative outputs**: every output value is >= 0
//! 5. **Conservation**: sum(inputs) >= sum(outputs), the difference being an implicit fee
//!
//! Validation never mutates the store or the transaction.

use std::collections::HashSet;

use crate::blockchain::transaction::Transaction;
use crate::blockchain::utxo::{UtxoId, UtxoStore};
use crate::cryptography::CryptoOperations;
use crate::error::TxRejection;

/// Checks all five rules, reporting the first one that fails.
pub fn check_tx<C: CryptoOperations>(
    tx: &Transaction,
    store: &dyn UtxoStore,
) -> Result<(), TxRejection> {
    // Rule 1
    for (index, input) in tx.inputs().iter().enumerate() {
        let utxo = input.utxo();
        if !store.contains(&utxo) {
            return Err(TxRejection::MissingUtxo { index, utxo });
        }
    }

    // Rule 2
    // Sums are i128, wide enough for any input or output count.
    let mut input_sum: i128 = 0;
    for (index, input) in tx.inputs().iter().enumerate() {
        let utxo = input.utxo();
        let spent = store.get(&utxo).ok_or(TxRejection::MissingUtxo { index, utxo })?;
        let signature = match input.signature.as_deref() {
            Some(sig) if !sig.is_empty() => sig,
            _ => return Err(TxRejection::MissingSignature { index }),
        };
        let payload = tx
            .raw_data_to_sign(index)
            .map_err(|_| TxRejection::Encoding { index })?;
        if !C::verify(&spent.address, &payload, signature) {
            return Err(TxRejection::InvalidSignature { index, utxo });
        }
        input_sum += i128::from(spent.value);
    }

    // Rule 3
    let mut claimed: HashSet<UtxoId> = HashSet::with_capacity(tx.num_inputs());
    for input in tx.inputs() {
        let utxo = input.utxo();
        if !claimed.insert(utxo) {
            return Err(TxRejection::DuplicateInput(utxo));
        }
    }

    // Rule 4
    let mut output_sum: i128 = 0;
    for (index, output) in tx.outputs().iter().enumerate() {
        if output.value < 0 {
            return Err(TxRejection::NegativeOutput { index, value: output.value });
        }
        output_sum += i128::from(output.value);
    }

    // Rule 5
    if input_sum < output_sum {
        return Err(TxRejection::InsufficientInput {
            have: input_sum,
            need: output_sum,
        });
    }

    Ok(())
}

pub fn is_valid_tx<C: CryptoOperations>(tx: &Transaction, store: &dyn UtxoStore) -> bool {
    check_tx::<C>(tx, store).is_ok()
}
