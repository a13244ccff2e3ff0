pub mod commands;
pub mod crypto;
pub mod hash;
pub mod public_key;
pub mod scenario;
pub mod transaction;
pub mod tx_handler;
pub mod utxo_pool;
pub mod validation;

#[cfg(test)]
mod test_util;

pub use self::{
    crypto::{Ed25519Verifier, Signature, SignatureVerifier},
    hash::*,
    public_key::*,
    transaction::*,
    tx_handler::*,
    utxo_pool::*,
    validation::*,
};
