use crate::{PublicKey, Transaction};
use ed25519_dalek::{Signer, SigningKey, Verifier, VerifyingKey};
use std::fmt::{Display, Formatter};

/// Signature bytes attached to a transaction input.
/// The bytes are opaque to the ledger; only a `SignatureVerifier` interprets them.
#[derive(Debug, Clone, Default, Hash, Eq, PartialEq)]
pub struct Signature(Vec<u8>);

impl Signature {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0[..]
    }
}

impl Display for Signature {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex::encode(&self.0))
    }
}

/// Checks that `signature` was produced over `message` by the owner of `public_key`.
///
/// Implementations must be pure and deterministic: the ledger may call them any number of
/// times for the same input and expects the same answer.
pub trait SignatureVerifier {
    fn verify(&self, public_key: &PublicKey, message: &[u8], signature: &Signature) -> bool;
}

/// Verifies Ed25519 signatures. Malformed keys and signatures are reported as invalid.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519Verifier;

impl SignatureVerifier for Ed25519Verifier {
    fn verify(&self, public_key: &PublicKey, message: &[u8], signature: &Signature) -> bool {
        let verifying_key = match VerifyingKey::from_bytes(public_key.as_bytes()) {
            Ok(key) => key,
            Err(_) => return false,
        };
        let signature = match ed25519_dalek::Signature::from_slice(signature.as_slice()) {
            Ok(signature) => signature,
            Err(_) => return false,
        };
        verifying_key.verify(message, &signature).is_ok()
    }
}

/// Signs the message with the given key.
pub fn sign(signing_key: &SigningKey, message: &[u8]) -> Signature {
    Signature::new(signing_key.sign(message).to_bytes().to_vec())
}

/// Signs the input at `index` with the key of the owner of the output it spends.
pub fn sign_input(
    transaction: &mut Transaction,
    index: usize,
    signing_key: &SigningKey,
) -> Result<(), String> {
    let message = transaction.raw_data_to_sign(index).ok_or_else(|| {
        format!(
            "Transaction: {} has no input at index: {}",
            transaction.id(),
            index
        )
    })?;
    transaction.set_signature(index, sign(signing_key, &message))
}

/// Returns the ledger identity of the given key.
pub fn public_key(signing_key: &SigningKey) -> PublicKey {
    PublicKey::new(signing_key.verifying_key().to_bytes())
}
