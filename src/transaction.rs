use crate::{PublicKey, Sha256, Signature};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// A double SHA-256 hash of the transaction data, excluding signatures.
#[derive(Debug, Hash, Ord, PartialOrd, Eq, PartialEq, Copy, Clone, Serialize, Deserialize)]
pub struct TransactionId(Sha256);

impl Display for TransactionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TransactionId {
    pub fn new(data: Sha256) -> Self {
        Self(data)
    }

    pub fn as_slice(&self) -> &[u8] {
        self.0.as_slice()
    }

    pub fn from_hex(s: &str) -> Result<Self, String> {
        Sha256::from_hex(s).map(Self)
    }
}

// Positions of inputs and outputs are stored as u64, which holds any usize.
const _: () = assert!(std::mem::size_of::<usize>() <= std::mem::size_of::<u64>());

fn position_to_u64(position: usize) -> u64 {
    position as u64
}

/// The index of the transaction output, the first one is 0.
#[derive(Debug, Hash, Ord, PartialOrd, Eq, PartialEq, Copy, Clone, Serialize, Deserialize)]
pub struct OutputIndex(u64);

impl Display for OutputIndex {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl OutputIndex {
    pub const fn new(index: u64) -> Self {
        Self(index)
    }

    /// The index of the output at the given position in a transaction's outputs.
    pub fn from_position(position: usize) -> Self {
        Self(position_to_u64(position))
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Points at a single transaction output: the transaction that created it and the output's
/// position in that transaction. This is the key of the UTXO pool.
#[derive(Debug, Hash, Ord, PartialOrd, Eq, PartialEq, Copy, Clone, Serialize, Deserialize)]
pub struct Outpoint {
    // 32 bytes. A pointer to the transaction containing the output.
    utxo_id: TransactionId,
    // 8 bytes. The number of the output in that transaction.
    output_index: OutputIndex,
}

impl Display for Outpoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.utxo_id, self.output_index)
    }
}

impl Outpoint {
    pub fn new(utxo_id: TransactionId, output_index: OutputIndex) -> Self {
        Self {
            utxo_id,
            output_index,
        }
    }

    pub fn utxo_id(&self) -> &TransactionId {
        &self.utxo_id
    }

    pub fn output_index(&self) -> &OutputIndex {
        &self.output_index
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TransactionInput {
    // The output being spent.
    outpoint: Outpoint,
    // Signature by the owner of the spent output over `Transaction::raw_data_to_sign`
    // for this input's position.
    signature: Signature,
}

impl Display for TransactionInput {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.outpoint)
    }
}

impl TransactionInput {
    /// Creates an unsigned input.
    pub fn new(outpoint: Outpoint) -> Self {
        Self {
            outpoint,
            signature: Signature::default(),
        }
    }

    pub fn outpoint(&self) -> &Outpoint {
        &self.outpoint
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct TransactionOutput {
    amount: i64,
    owner: PublicKey,
}

impl Display for TransactionOutput {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.amount, self.owner)
    }
}

impl TransactionOutput {
    pub fn new(amount: i64, owner: PublicKey) -> Self {
        Self { amount, owner }
    }

    pub fn amount(&self) -> i64 {
        self.amount
    }

    pub fn owner(&self) -> &PublicKey {
        &self.owner
    }
}

// Content that identifies the transaction. Signatures are left out so that signing an input
// doesn't change the id or the messages signed by other inputs.
#[derive(Serialize)]
struct HashedData<'a> {
    outpoints: Vec<&'a Outpoint>,
    outputs: &'a [TransactionOutput],
}

// The message that the owner of `outpoint` signs. The input index is part of the message, so a
// signature can't be moved to another position.
#[derive(Serialize)]
struct SignedInputData<'a> {
    input_index: u64,
    outpoint: &'a Outpoint,
    outputs: &'a [TransactionOutput],
}

// Only `Transaction::new` creates transactions, so the id always matches the content.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Transaction {
    id: TransactionId,
    inputs: Vec<TransactionInput>,
    outputs: Vec<TransactionOutput>,
}

impl Transaction {
    pub fn new(inputs: Vec<TransactionInput>, outputs: Vec<TransactionOutput>) -> Self {
        let id = Self::hash_transaction_data(&inputs, &outputs);
        Self {
            id,
            inputs,
            outputs,
        }
    }

    pub fn id(&self) -> &TransactionId {
        &self.id
    }

    pub fn inputs(&self) -> &Vec<TransactionInput> {
        &self.inputs
    }

    pub fn outputs(&self) -> &Vec<TransactionOutput> {
        &self.outputs
    }

    /// Returns the outpoint of the output at the given index, as it appears in the UTXO pool once
    /// this transaction is accepted.
    pub fn outpoint(&self, position: usize) -> Outpoint {
        Outpoint::new(self.id, OutputIndex::from_position(position))
    }

    /// Returns the bytes the owner of the output spent by the input at `index` must sign,
    /// or None if there is no such input.
    pub fn raw_data_to_sign(&self, index: usize) -> Option<Vec<u8>> {
        self.inputs
            .get(index)
            .map(|input| Self::encode_signed_input_data(index, input.outpoint(), &self.outputs))
    }

    /// Attaches the signature to the input at `index`.
    /// The transaction id and the messages to sign are not affected.
    pub fn set_signature(&mut self, index: usize, signature: Signature) -> Result<(), String> {
        let inputs = self.inputs.len();
        match self.inputs.get_mut(index) {
            Some(input) => {
                input.signature = signature;
                Ok(())
            }
            None => Err(format!(
                "Transaction: {} has no input at index: {}, it has {} inputs.",
                self.id, index, inputs
            )),
        }
    }

    fn hash_transaction_data(
        inputs: &[TransactionInput],
        outputs: &[TransactionOutput],
    ) -> TransactionId {
        let data = HashedData {
            outpoints: inputs.iter().map(TransactionInput::outpoint).collect(),
            outputs,
        };
        // Safety: Serializing plain structs into memory can't fail.
        let bytes = bincode::serialize(&data).unwrap();
        TransactionId(Sha256::double_digest(&bytes))
    }

    fn encode_signed_input_data(
        index: usize,
        outpoint: &Outpoint,
        outputs: &[TransactionOutput],
    ) -> Vec<u8> {
        let data = SignedInputData {
            input_index: position_to_u64(index),
            outpoint,
            outputs,
        };
        // Safety: Serializing plain structs into memory can't fail.
        bincode::serialize(&data).unwrap()
    }
}
