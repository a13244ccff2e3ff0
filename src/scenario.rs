//! Scenario files describe a UTXO pool snapshot and a batch of proposed transactions in JSON.
//!
//! ```json
//! {
//!   "owners": { "alice": "<32-byte ed25519 seed, hex>", "bob": "..." },
//!   "pool": [ { "tx": "<transaction id, hex>", "index": 0, "amount": 10, "owner": "alice" } ],
//!   "transactions": [
//!     { "name": "t1",
//!       "inputs": [ { "tx": "<transaction id, hex>", "index": 0, "signer": "alice" } ],
//!       "outputs": [ { "amount": 4, "owner": "bob" } ] },
//!     { "name": "t2",
//!       "inputs": [ { "tx": "@t1", "index": 0, "signer": "bob" } ],
//!       "outputs": [ { "amount": 4, "owner": "alice" } ] }
//!   ]
//! }
//! ```
//!
//! `@name` refers to the id of a transaction declared earlier in the file. Every input is signed
//! with the key of its `signer`, who doesn't have to own the spent output.

use crate::{
    crypto, Outpoint, OutputIndex, PublicKey, Transaction, TransactionId, TransactionInput,
    TransactionOutput, UtxoPool,
};
use ed25519_dalek::SigningKey;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use thiserror::Error;

const TRANSACTION_REFERENCE_PREFIX: char = '@';

#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("invalid scenario JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid seed for owner {owner}: {message}")]
    InvalidSeed { owner: String, message: String },

    #[error("unknown owner: {0}")]
    UnknownOwner(String),

    #[error("unknown transaction reference: {0}")]
    UnknownTransaction(String),

    #[error("invalid transaction id {value}: {message}")]
    InvalidTransactionId { value: String, message: String },

    #[error("transaction name used more than once: {0}")]
    DuplicateName(String),

    #[error("failed to sign transaction {name}: {message}")]
    Signing { name: String, message: String },
}

#[derive(Deserialize)]
struct ScenarioFile {
    #[serde(default)]
    owners: BTreeMap<String, String>,
    #[serde(default)]
    pool: Vec<PoolEntry>,
    #[serde(default)]
    transactions: Vec<TransactionDecl>,
}

#[derive(Deserialize)]
struct PoolEntry {
    tx: String,
    index: u64,
    amount: i64,
    owner: String,
}

#[derive(Deserialize)]
struct TransactionDecl {
    name: String,
    #[serde(default)]
    inputs: Vec<InputDecl>,
    #[serde(default)]
    outputs: Vec<OutputDecl>,
}

#[derive(Deserialize)]
struct InputDecl {
    tx: String,
    index: u64,
    signer: String,
}

#[derive(Deserialize)]
struct OutputDecl {
    amount: i64,
    owner: String,
}

/// A loaded scenario: the initial pool and the signed batch, in file order.
pub struct Scenario {
    pool: UtxoPool,
    transactions: Vec<Transaction>,
    owner_names: HashMap<PublicKey, String>,
    transaction_names: HashMap<TransactionId, String>,
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> Result<Self, ScenarioError> {
        let file: ScenarioFile = serde_json::from_str(json)?;

        let mut keys = HashMap::new();
        let mut owner_names = HashMap::new();
        for (name, seed) in &file.owners {
            let signing_key = Self::parse_seed(name, seed)?;
            owner_names.insert(crypto::public_key(&signing_key), name.clone());
            keys.insert(name.clone(), signing_key);
        }

        let mut references = HashMap::new();
        let mut pool = UtxoPool::new();
        for entry in &file.pool {
            let utxo_id = Self::resolve_transaction(&references, &entry.tx)?;
            let owner = crypto::public_key(Self::signing_key(&keys, &entry.owner)?);
            pool.add(
                Outpoint::new(utxo_id, OutputIndex::new(entry.index)),
                TransactionOutput::new(entry.amount, owner),
            );
        }

        let mut transactions = vec![];
        let mut transaction_names = HashMap::new();
        for declared in &file.transactions {
            let transaction = Self::build_transaction(&keys, &references, declared)?;
            if references
                .insert(declared.name.clone(), *transaction.id())
                .is_some()
            {
                return Err(ScenarioError::DuplicateName(declared.name.clone()));
            }
            transaction_names.insert(*transaction.id(), declared.name.clone());
            transactions.push(transaction);
        }

        Ok(Self {
            pool,
            transactions,
            owner_names,
            transaction_names,
        })
    }

    pub fn pool(&self) -> &UtxoPool {
        &self.pool
    }

    pub fn transactions(&self) -> &Vec<Transaction> {
        &self.transactions
    }

    /// Returns the owner's name from the scenario, or the hex-encoded key if it has none.
    pub fn owner_name(&self, public_key: &PublicKey) -> String {
        self.owner_names
            .get(public_key)
            .cloned()
            .unwrap_or_else(|| public_key.to_string())
    }

    /// Returns the transaction's name from the scenario, or the hex-encoded id if it has none.
    pub fn transaction_name(&self, id: &TransactionId) -> String {
        self.transaction_names
            .get(id)
            .cloned()
            .unwrap_or_else(|| id.to_string())
    }

    fn build_transaction(
        keys: &HashMap<String, SigningKey>,
        references: &HashMap<String, TransactionId>,
        declared: &TransactionDecl,
    ) -> Result<Transaction, ScenarioError> {
        let mut inputs = vec![];
        let mut signers = vec![];
        for input in &declared.inputs {
            let utxo_id = Self::resolve_transaction(references, &input.tx)?;
            inputs.push(TransactionInput::new(Outpoint::new(
                utxo_id,
                OutputIndex::new(input.index),
            )));
            signers.push(Self::signing_key(keys, &input.signer)?);
        }

        let mut outputs = vec![];
        for output in &declared.outputs {
            let owner = crypto::public_key(Self::signing_key(keys, &output.owner)?);
            outputs.push(TransactionOutput::new(output.amount, owner));
        }

        let mut transaction = Transaction::new(inputs, outputs);
        for (index, signer) in signers.into_iter().enumerate() {
            crypto::sign_input(&mut transaction, index, signer).map_err(|message| {
                ScenarioError::Signing {
                    name: declared.name.clone(),
                    message,
                }
            })?;
        }
        Ok(transaction)
    }

    fn resolve_transaction(
        references: &HashMap<String, TransactionId>,
        value: &str,
    ) -> Result<TransactionId, ScenarioError> {
        match value.strip_prefix(TRANSACTION_REFERENCE_PREFIX) {
            Some(name) => references
                .get(name)
                .copied()
                .ok_or_else(|| ScenarioError::UnknownTransaction(value.to_string())),
            None => TransactionId::from_hex(value).map_err(|message| {
                ScenarioError::InvalidTransactionId {
                    value: value.to_string(),
                    message,
                }
            }),
        }
    }

    fn signing_key<'a>(
        keys: &'a HashMap<String, SigningKey>,
        name: &str,
    ) -> Result<&'a SigningKey, ScenarioError> {
        keys.get(name)
            .ok_or_else(|| ScenarioError::UnknownOwner(name.to_string()))
    }

    fn parse_seed(owner: &str, seed: &str) -> Result<SigningKey, ScenarioError> {
        let invalid_seed = |message: String| ScenarioError::InvalidSeed {
            owner: owner.to_string(),
            message,
        };
        let bytes = hex::decode(seed).map_err(|e| invalid_seed(e.to_string()))?;
        if bytes.len() != ed25519_dalek::SECRET_KEY_LENGTH {
            return Err(invalid_seed(format!(
                "expected {} bytes but got {}",
                ed25519_dalek::SECRET_KEY_LENGTH,
                bytes.len()
            )));
        }
        let mut secret = [0; ed25519_dalek::SECRET_KEY_LENGTH];
        secret.copy_from_slice(&bytes);
        Ok(SigningKey::from_bytes(&secret))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TxHandler;

    const FUNDING_TX: &str = "1111111111111111111111111111111111111111111111111111111111111111";

    fn scenario_json(batch: &str) -> String {
        format!(
            r#"{{
                "owners": {{
                    "alice": "{}",
                    "bob": "{}",
                    "carol": "{}"
                }},
                "pool": [ {{ "tx": "{}", "index": 0, "amount": 10, "owner": "alice" }} ],
                "transactions": {}
            }}"#,
            "01".repeat(32),
            "02".repeat(32),
            "03".repeat(32),
            FUNDING_TX,
            batch
        )
    }

    #[test]
    fn loads_pool_and_signed_batch() {
        let json = scenario_json(
            r#"[
                { "name": "t1",
                  "inputs": [ { "tx": "1111111111111111111111111111111111111111111111111111111111111111", "index": 0, "signer": "alice" } ],
                  "outputs": [ { "amount": 4, "owner": "bob" }, { "amount": 5, "owner": "carol" } ] },
                { "name": "t2",
                  "inputs": [ { "tx": "@t1", "index": 0, "signer": "bob" } ],
                  "outputs": [ { "amount": 4, "owner": "carol" } ] }
            ]"#,
        );
        let scenario = Scenario::from_json(&json).unwrap();

        assert_eq!(scenario.pool().len(), 1);
        assert_eq!(scenario.transactions().len(), 2);
        let t1 = &scenario.transactions()[0];
        let t2 = &scenario.transactions()[1];
        assert_eq!(t2.inputs()[0].outpoint(), &t1.outpoint(0));
        assert_eq!(scenario.transaction_name(t1.id()), "t1");
        assert_eq!(scenario.owner_name(t1.outputs()[1].owner()), "carol");

        let mut handler = TxHandler::new(scenario.pool());
        let accepted = handler.handle_txs(scenario.transactions().clone());
        assert_eq!(accepted.len(), 2);
    }

    #[test]
    fn signer_other_than_owner_produces_invalid_transaction() {
        let json = scenario_json(&format!(
            r#"[ {{ "name": "theft",
                   "inputs": [ {{ "tx": "{}", "index": 0, "signer": "bob" }} ],
                   "outputs": [ {{ "amount": 10, "owner": "bob" }} ] }} ]"#,
            FUNDING_TX
        ));
        let scenario = Scenario::from_json(&json).unwrap();

        let handler = TxHandler::new(scenario.pool());
        assert!(!handler.is_valid_tx(&scenario.transactions()[0]));
    }

    #[test]
    fn reference_to_later_transaction_is_an_error() {
        let json = scenario_json(
            r#"[ { "name": "t2",
                   "inputs": [ { "tx": "@t1", "index": 0, "signer": "bob" } ],
                   "outputs": [] } ]"#,
        );
        assert!(matches!(
            Scenario::from_json(&json),
            Err(ScenarioError::UnknownTransaction(name)) if name == "@t1"
        ));
    }

    #[test]
    fn unknown_owner_is_an_error() {
        let json = scenario_json(
            r#"[ { "name": "t1", "inputs": [], "outputs": [ { "amount": 1, "owner": "dave" } ] } ]"#,
        );
        assert!(matches!(
            Scenario::from_json(&json),
            Err(ScenarioError::UnknownOwner(name)) if name == "dave"
        ));
    }

    #[test]
    fn duplicate_transaction_name_is_an_error() {
        let json = scenario_json(
            r#"[ { "name": "t1", "outputs": [ { "amount": 1, "owner": "bob" } ] },
                 { "name": "t1", "outputs": [ { "amount": 2, "owner": "bob" } ] } ]"#,
        );
        assert!(matches!(
            Scenario::from_json(&json),
            Err(ScenarioError::DuplicateName(_))
        ));
    }

    #[test]
    fn short_seed_is_an_error() {
        let json = r#"{ "owners": { "alice": "0102" } }"#;
        assert!(matches!(
            Scenario::from_json(json),
            Err(ScenarioError::InvalidSeed { .. })
        ));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            Scenario::from_json("{ not json"),
            Err(ScenarioError::Json(_))
        ));
    }

    #[test]
    fn demo_scenario_accepts_chain_and_rejects_double_spend_and_theft() {
        let scenario =
            Scenario::from_json(include_str!("../demos/order_sensitivity.json")).unwrap();
        let mut handler = TxHandler::new(scenario.pool());
        let report = handler.handle_txs_with_report(scenario.transactions().clone());

        let accepted = report
            .accepted
            .iter()
            .map(|transaction| scenario.transaction_name(transaction.id()))
            .collect::<Vec<String>>();
        assert_eq!(accepted, vec!["pay-bob", "bob-pays-carol"]);

        let rejected = report
            .rejected
            .iter()
            .map(|(transaction, rejection)| {
                (scenario.transaction_name(transaction.id()), rejection.clone())
            })
            .collect::<Vec<(String, crate::TxRejection)>>();
        assert_eq!(rejected.len(), 2);
        assert_eq!(rejected[0].0, "alice-double-spend");
        assert!(matches!(
            rejected[0].1,
            crate::TxRejection::MissingInput { .. }
        ));
        assert_eq!(rejected[1].0, "carol-steals");
        assert!(matches!(
            rejected[1].1,
            crate::TxRejection::InvalidSignature { .. }
        ));

        let balances = handler.pool().balances();
        let alice = scenario.transactions()[0].outputs()[1].owner();
        assert_eq!(balances[alice], 5);
    }

    #[test]
    fn names_fall_back_to_hex() {
        let scenario = Scenario::from_json("{}").unwrap();
        let key = PublicKey::new([9; 32]);
        assert_eq!(scenario.owner_name(&key), key.to_string());
    }
}
