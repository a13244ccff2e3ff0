use crate::{
    Ed25519Verifier, SignatureVerifier, Transaction, TransactionValidator, TxRejection, UtxoPool,
};
use tracing::{debug, info, trace};

/// The outcome of handling a batch of transactions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    // Accepted transactions, in the order they were accepted.
    pub accepted: Vec<Transaction>,
    // Rejected transactions and the first check each one failed, in the order they were proposed.
    pub rejected: Vec<(Transaction, TxRejection)>,
}

/// Admits transactions to the ledger.
///
/// The handler owns its UTXO pool: it copies the pool it's created from, and only the handler
/// changes it afterwards.
pub struct TxHandler<V = Ed25519Verifier> {
    pool: UtxoPool,
    verifier: V,
}

impl TxHandler<Ed25519Verifier> {
    /// Creates a handler that starts from a copy of `pool` and checks Ed25519 signatures.
    pub fn new(pool: &UtxoPool) -> Self {
        Self::with_verifier(pool, Ed25519Verifier)
    }
}

impl<V: SignatureVerifier> TxHandler<V> {
    pub fn with_verifier(pool: &UtxoPool, verifier: V) -> Self {
        Self {
            pool: UtxoPool::from_pool(pool),
            verifier,
        }
    }

    /// The current UTXO pool, including the effects of all accepted transactions.
    pub fn pool(&self) -> &UtxoPool {
        &self.pool
    }

    pub fn is_valid_tx(&self, transaction: &Transaction) -> bool {
        TransactionValidator::is_valid(transaction, &self.pool, &self.verifier)
    }

    /// Returns the fee of the transaction if it's valid against the current pool.
    pub fn validate_tx(&self, transaction: &Transaction) -> Result<i128, TxRejection> {
        TransactionValidator::validate(transaction, &self.pool, &self.verifier)
    }

    /// Accepts transactions from the batch, in the given order, and applies them to the pool.
    /// Returns the accepted transactions in the order they were accepted.
    ///
    /// Each transaction is validated against the pool as left by the transactions accepted
    /// before it. A transaction that spends an output created by a later transaction in the same
    /// batch is therefore rejected. Rejected transactions are dropped.
    pub fn handle_txs(&mut self, transactions: Vec<Transaction>) -> Vec<Transaction> {
        self.handle_txs_with_report(transactions).accepted
    }

    /// Same as `handle_txs`, but also reports the rejected transactions and why they were
    /// rejected.
    pub fn handle_txs_with_report(&mut self, transactions: Vec<Transaction>) -> BatchReport {
        let mut report = BatchReport::default();
        for transaction in transactions {
            match self.validate_tx(&transaction) {
                Ok(fee) => {
                    trace!(id = %transaction.id(), fee = %fee, "accepted transaction");
                    self.apply_tx(&transaction);
                    report.accepted.push(transaction);
                }
                Err(rejection) => {
                    debug!(id = %transaction.id(), %rejection, "rejected transaction");
                    report.rejected.push((transaction, rejection));
                }
            }
        }
        info!(
            accepted = report.accepted.len(),
            rejected = report.rejected.len(),
            utxos = self.pool.len(),
            "handled transaction batch"
        );
        report
    }

    // Spends the outputs referenced by the inputs, and makes the transaction's outputs spendable.
    //
    // Preconditions:
    //   - The transaction is valid against the current pool.
    fn apply_tx(&mut self, transaction: &Transaction) {
        for input in transaction.inputs() {
            self.pool.remove(input.outpoint());
        }
        for (index, output) in transaction.outputs().iter().enumerate() {
            self.pool.add(transaction.outpoint(index), output.clone());
        }
    }
}
