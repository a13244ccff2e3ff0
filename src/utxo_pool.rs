use crate::{Outpoint, PublicKey, TransactionOutput};
use std::collections::HashMap;
use std::iter::FromIterator;

/// A pool of unspent transaction outputs.
///
/// Every outpoint in the pool refers to an output that hasn't been spent by an accepted
/// transaction. Removing an outpoint spends the output, adding one creates a new spendable output.
/// Cloning the pool produces an independent copy.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct UtxoPool {
    // Unspent transaction outputs, indexed by their transaction ID and their index in the
    // transaction.
    utxos: HashMap<Outpoint, TransactionOutput>,
}

impl UtxoPool {
    pub fn new() -> Self {
        Self {
            utxos: HashMap::new(),
        }
    }

    /// Creates an independent copy of the given pool.
    pub fn from_pool(other: &UtxoPool) -> Self {
        other.clone()
    }

    pub fn get(&self, outpoint: &Outpoint) -> Option<&TransactionOutput> {
        self.utxos.get(outpoint)
    }

    pub fn contains(&self, outpoint: &Outpoint) -> bool {
        self.utxos.contains_key(outpoint)
    }

    /// Adds the output to the pool. An existing output with the same outpoint is replaced.
    pub fn add(&mut self, outpoint: Outpoint, output: TransactionOutput) {
        self.utxos.insert(outpoint, output);
    }

    /// Removes the output from the pool, if present.
    pub fn remove(&mut self, outpoint: &Outpoint) {
        self.utxos.remove(outpoint);
    }

    pub fn len(&self) -> usize {
        self.utxos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.utxos.is_empty()
    }

    /// Returns all outpoints in the pool, in no particular order.
    pub fn outpoints(&self) -> Vec<Outpoint> {
        self.utxos.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Outpoint, &TransactionOutput)> {
        self.utxos.iter()
    }

    /// Sums the unspent amounts per owner.
    /// Totals are i128, so any number of i64 amounts sums without overflow.
    pub fn balances(&self) -> HashMap<PublicKey, i128> {
        let mut balances = HashMap::new();
        for output in self.utxos.values() {
            // Ensure that the key exists if it's the first time we're seeing the owner.
            let balance = balances.entry(*output.owner()).or_insert(0);
            *balance += i128::from(output.amount());
        }
        balances
    }
}

impl FromIterator<(Outpoint, TransactionOutput)> for UtxoPool {
    fn from_iter<T: IntoIterator<Item = (Outpoint, TransactionOutput)>>(iter: T) -> Self {
        Self {
            utxos: iter.into_iter().collect(),
        }
    }
}
