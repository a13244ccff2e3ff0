use crate::{Outpoint, SignatureVerifier, Transaction, UtxoPool};
use std::collections::HashSet;
use thiserror::Error;

/// The reason a transaction is not admitted to the ledger.
/// Rejection is an ordinary outcome of validation, not a failure of the ledger.
#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum TxRejection {
    #[error("input {input_index} spends {outpoint}, which is not in the UTXO pool")]
    MissingInput {
        input_index: usize,
        outpoint: Outpoint,
    },

    #[error("input {input_index} has an invalid signature for {outpoint}")]
    InvalidSignature {
        input_index: usize,
        outpoint: Outpoint,
    },

    #[error("input {input_index} spends {outpoint}, which an earlier input already claims")]
    DuplicateInput {
        input_index: usize,
        outpoint: Outpoint,
    },

    #[error("output {output_index} has a negative amount: {amount}")]
    NegativeOutput { output_index: usize, amount: i64 },

    #[error("inputs are worth {inputs}, which doesn't cover outputs worth {outputs}")]
    InsufficientInput { inputs: i128, outputs: i128 },
}

/// Checks whether a transaction can be applied on top of a UTXO pool.
///
/// A transaction is valid if:
///   - every output it spends is in the pool,
///   - every input is signed by the owner of the output it spends,
///   - no output is spent by more than one of its inputs,
///   - none of its outputs has a negative amount,
///   - its inputs are worth at least as much as its outputs.
/// The difference between input and output value is the fee.
///
/// Values are summed as i128: a transaction has at most usize::MAX inputs or outputs, each
/// worth an i64, so the sums can't overflow.
///
/// Validation only reads the pool.
pub struct TransactionValidator {}

impl TransactionValidator {
    pub fn is_valid<V: SignatureVerifier>(
        transaction: &Transaction,
        pool: &UtxoPool,
        verifier: &V,
    ) -> bool {
        Self::validate(transaction, pool, verifier).is_ok()
    }

    /// Returns the fee of a valid transaction, or the first check it fails.
    pub fn validate<V: SignatureVerifier>(
        transaction: &Transaction,
        pool: &UtxoPool,
        verifier: &V,
    ) -> Result<i128, TxRejection> {
        let inputs = Self::validate_inputs(transaction, pool, verifier)?;
        let outputs = Self::validate_outputs(transaction)?;
        Self::validate_inputs_cover_outputs(inputs, outputs)
    }

    // Returns the total value of the spent outputs.
    fn validate_inputs<V: SignatureVerifier>(
        transaction: &Transaction,
        pool: &UtxoPool,
        verifier: &V,
    ) -> Result<i128, TxRejection> {
        let mut claimed = HashSet::with_capacity(transaction.inputs().len());
        let mut total: i128 = 0;
        for (input_index, input) in transaction.inputs().iter().enumerate() {
            let outpoint = *input.outpoint();
            let spent_output = pool.get(&outpoint).ok_or(TxRejection::MissingInput {
                input_index,
                outpoint,
            })?;

            let signature_is_valid = transaction
                .raw_data_to_sign(input_index)
                .map(|message| verifier.verify(spent_output.owner(), &message, input.signature()))
                .unwrap_or(false);
            if !signature_is_valid {
                return Err(TxRejection::InvalidSignature {
                    input_index,
                    outpoint,
                });
            }

            if !claimed.insert(outpoint) {
                return Err(TxRejection::DuplicateInput {
                    input_index,
                    outpoint,
                });
            }

            total += i128::from(spent_output.amount());
        }
        Ok(total)
    }

    // Returns the total value of the outputs.
    fn validate_outputs(transaction: &Transaction) -> Result<i128, TxRejection> {
        let mut total: i128 = 0;
        for (output_index, output) in transaction.outputs().iter().enumerate() {
            if output.amount() < 0 {
                return Err(TxRejection::NegativeOutput {
                    output_index,
                    amount: output.amount(),
                });
            }
            total += i128::from(output.amount());
        }
        Ok(total)
    }

    fn validate_inputs_cover_outputs(inputs: i128, outputs: i128) -> Result<i128, TxRejection> {
        if inputs < outputs {
            Err(TxRejection::InsufficientInput { inputs, outputs })
        } else {
            Ok(inputs - outputs)
        }
    }
}
