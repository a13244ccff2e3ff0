//! Helpers shared by unit tests: deterministic keys, funded pools and signed transactions.

use crate::{
    crypto, Ed25519Verifier, Outpoint, OutputIndex, PublicKey, Sha256, Signature,
    SignatureVerifier, Transaction, TransactionId, TransactionInput, TransactionOutput, UtxoPool,
};
use ed25519_dalek::SigningKey;

/// Accepts every signature.
pub struct AcceptAll;

impl SignatureVerifier for AcceptAll {
    fn verify(&self, _public_key: &PublicKey, _message: &[u8], _signature: &Signature) -> bool {
        true
    }
}

/// Rejects every signature.
pub struct RejectAll;

impl SignatureVerifier for RejectAll {
    fn verify(&self, _public_key: &PublicKey, _message: &[u8], _signature: &Signature) -> bool {
        false
    }
}

pub fn key(seed: u8) -> SigningKey {
    SigningKey::from_bytes(&[seed; 32])
}

pub fn public_key(signing_key: &SigningKey) -> PublicKey {
    crypto::public_key(signing_key)
}

pub fn verifier() -> Ed25519Verifier {
    Ed25519Verifier
}

pub fn outpoint(seed: u8, index: u64) -> Outpoint {
    Outpoint::new(
        TransactionId::new(Sha256::digest(&[seed])),
        OutputIndex::new(index),
    )
}

/// Returns a pool with one output per entry, all created by the same funding transaction.
pub fn funded_pool(entries: &[(i64, &SigningKey)]) -> (UtxoPool, Vec<Outpoint>) {
    let funding_id = TransactionId::new(Sha256::digest(b"funding"));
    let mut pool = UtxoPool::new();
    let mut outpoints = vec![];
    for (index, (amount, owner)) in entries.iter().enumerate() {
        let outpoint = Outpoint::new(funding_id, OutputIndex::from_position(index));
        pool.add(outpoint, TransactionOutput::new(*amount, public_key(owner)));
        outpoints.push(outpoint);
    }
    (pool, outpoints)
}

pub fn unsigned_transaction(inputs: &[Outpoint], outputs: &[(i64, &SigningKey)]) -> Transaction {
    let inputs = inputs.iter().copied().map(TransactionInput::new).collect();
    let outputs = outputs
        .iter()
        .map(|(amount, owner)| TransactionOutput::new(*amount, public_key(owner)))
        .collect();
    Transaction::new(inputs, outputs)
}

/// Creates a transaction whose inputs are signed by the given keys.
pub fn signed_transaction(
    inputs: &[(Outpoint, &SigningKey)],
    outputs: &[(i64, &SigningKey)],
) -> Transaction {
    let outpoints = inputs
        .iter()
        .map(|(outpoint, _)| *outpoint)
        .collect::<Vec<Outpoint>>();
    let mut transaction = unsigned_transaction(&outpoints, outputs);
    for (index, (_, signer)) in inputs.iter().enumerate() {
        crypto::sign_input(&mut transaction, index, signer).unwrap();
    }
    transaction
}
