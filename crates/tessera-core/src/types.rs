//! Core wallet types: boxes, transactions, proofs-per-input.
//!
//! All monetary values are in the smallest currency unit.
//! Heights are `u32` block heights as reported by the chain.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::MAX_TX_WIRE_LEN;
use crate::crypto::{self, Proof};
use crate::error::{CryptoError, TransactionError};
use crate::guard::GuardCondition;

/// A 32-byte hash value.
///
/// Used for box identifiers and transaction IDs (both BLAKE3).
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default,
    bincode::Encode, bincode::Decode,
)]
pub struct Hash256(pub [u8; 32]);

impl Hash256 {
    /// Parse a 64-character hex string, as returned by block explorers.
    pub fn from_hex(s: &str) -> Result<Self, TransactionError> {
        let bytes = hex::decode(s).map_err(|e| TransactionError::Serialization(e.to_string()))?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| TransactionError::Serialization("expected 32 bytes".into()))?;
        Ok(Self(arr))
    }

    /// Return the underlying bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl From<[u8; 32]> for Hash256 {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Hash256 {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Content-addressed identifier of a box.
pub type BoxId = Hash256;

/// An unspent output observed on chain.
#[derive(
    Serialize, Deserialize, Clone, Debug, PartialEq, Eq,
    bincode::Encode, bincode::Decode,
)]
pub struct UnspentBox {
    /// Content-addressed box identifier.
    pub id: BoxId,
    /// Value in the smallest currency unit.
    pub value: u64,
    /// Condition guarding the spend.
    pub guard: GuardCondition,
    /// Height at which the box was created.
    pub creation_height: u32,
}

/// An output being created by a transaction.
#[derive(
    Serialize, Deserialize, Clone, Debug, PartialEq, Eq,
    bincode::Encode, bincode::Decode,
)]
pub struct BoxCandidate {
    /// Value in the smallest currency unit.
    pub value: u64,
    /// Condition guarding future spends.
    pub guard: GuardCondition,
    /// Height the transaction was built at.
    pub creation_height: u32,
    /// Optional auxiliary data attached to the box.
    pub auxiliary_data: Option<Vec<u8>>,
}

impl BoxCandidate {
    /// Append the canonical encoding of this candidate.
    ///
    /// Layout: `value (u64 LE) || guard || creation_height (u32 LE) ||
    /// aux_flag (u8) [|| aux_len (u64 LE) || aux]`.
    pub fn write_canonical(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.value.to_le_bytes());
        self.guard.write_canonical(out);
        out.extend_from_slice(&self.creation_height.to_le_bytes());
        match &self.auxiliary_data {
            None => out.push(0),
            Some(data) => {
                out.push(1);
                out.extend_from_slice(&(data.len() as u64).to_le_bytes());
                out.extend_from_slice(data);
            }
        }
    }
}

/// A transaction input together with the spent box's value and guard.
///
/// All three fields are part of the canonical encoding, so a proof also
/// commits to the value and guard the signer saw.
#[derive(
    Serialize, Deserialize, Clone, Debug, PartialEq, Eq,
    bincode::Encode, bincode::Decode,
)]
pub struct UnsignedInput {
    /// Identifier of the box being spent.
    pub box_id: BoxId,
    /// Value of the box being spent.
    pub value: u64,
    /// Guard of the box being spent.
    pub guard: GuardCondition,
}

impl From<&UnspentBox> for UnsignedInput {
    fn from(b: &UnspentBox) -> Self {
        Self {
            box_id: b.id,
            value: b.value,
            guard: b.guard,
        }
    }
}

/// A transaction whose inputs have not been proved yet.
#[derive(
    Serialize, Deserialize, Clone, Debug, PartialEq, Eq,
    bincode::Encode, bincode::Decode,
)]
pub struct UnsignedTransaction {
    /// Inputs in spend order.
    pub inputs: Vec<UnsignedInput>,
    /// Outputs in creation order.
    pub outputs: Vec<BoxCandidate>,
    /// Chain height the transaction was built at.
    pub creation_height: u32,
}

impl UnsignedTransaction {
    /// Canonical byte encoding used as the proof message and for the ID.
    ///
    /// Every variable-length field is length-prefixed, so the encoding is
    /// prefix-free and two distinct transactions never share an encoding:
    ///
    /// ```text
    /// n_inputs (u64 LE) || (box_id || value (u64 LE) || guard)* ||
    /// n_outputs (u64 LE) || candidate* ||
    /// creation_height (u32 LE)
    /// ```
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(16 + self.inputs.len() * 73 + self.outputs.len() * 64);
        out.extend_from_slice(&(self.inputs.len() as u64).to_le_bytes());
        for input in &self.inputs {
            out.extend_from_slice(input.box_id.as_bytes());
            out.extend_from_slice(&input.value.to_le_bytes());
            input.guard.write_canonical(&mut out);
        }
        out.extend_from_slice(&(self.outputs.len() as u64).to_le_bytes());
        for output in &self.outputs {
            output.write_canonical(&mut out);
        }
        out.extend_from_slice(&self.creation_height.to_le_bytes());
        out
    }

    /// Transaction ID: BLAKE3 of the canonical encoding.
    pub fn id(&self) -> Hash256 {
        Hash256(blake3::hash(&self.canonical_bytes()).into())
    }

    /// Sum of all input values. Returns None on overflow.
    pub fn total_input_value(&self) -> Option<u64> {
        self.inputs
            .iter()
            .try_fold(0u64, |acc, input| acc.checked_add(input.value))
    }

    /// Sum of all output values, fee output included. Returns None on overflow.
    pub fn total_output_value(&self) -> Option<u64> {
        self.outputs
            .iter()
            .try_fold(0u64, |acc, out| acc.checked_add(out.value))
    }

    /// Value carried by fee-collection outputs. Returns None on overflow.
    pub fn fee(&self) -> Option<u64> {
        self.outputs
            .iter()
            .filter(|out| out.guard.is_fee())
            .try_fold(0u64, |acc, out| acc.checked_add(out.value))
    }

    /// Encode for broadcast or storage (bincode, standard config).
    pub fn to_wire(&self) -> Result<Vec<u8>, TransactionError> {
        bincode::encode_to_vec(self, bincode::config::standard())
            .map_err(|e| TransactionError::Serialization(e.to_string()))
    }

    /// Decode from the wire format produced by [`Self::to_wire`].
    ///
    /// Input longer than [`MAX_TX_WIRE_LEN`] is rejected before decoding.
    pub fn from_wire(bytes: &[u8]) -> Result<Self, TransactionError> {
        decode_wire(bytes)
    }
}

/// An unsigned transaction with one proof per input, in input order.
#[derive(
    Serialize, Deserialize, Clone, Debug, PartialEq, Eq,
    bincode::Encode, bincode::Decode,
)]
pub struct SignedTransaction {
    /// The transaction contents the proofs are bound to.
    pub unsigned: UnsignedTransaction,
    /// One proof per input.
    pub proofs: Vec<Proof>,
}

impl SignedTransaction {
    /// Transaction ID. Proofs are excluded, so the ID is fixed before signing.
    pub fn id(&self) -> Hash256 {
        self.unsigned.id()
    }

    /// Canonical bytes: unsigned encoding followed by every proof.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut out = self.unsigned.canonical_bytes();
        out.extend_from_slice(&(self.proofs.len() as u64).to_le_bytes());
        for proof in &self.proofs {
            out.extend_from_slice(&proof.to_bytes());
        }
        out
    }

    /// Verify every input proof against that input's guard condition.
    pub fn verify(&self) -> Result<(), CryptoError> {
        let inputs = &self.unsigned.inputs;
        if self.proofs.len() != inputs.len() {
            return Err(CryptoError::ProofCountMismatch {
                proofs: self.proofs.len(),
                inputs: inputs.len(),
            });
        }
        let message = self.unsigned.canonical_bytes();
        for (index, (input, proof)) in inputs.iter().zip(&self.proofs).enumerate() {
            match &input.guard {
                GuardCondition::PayToPublicKey(image) => {
                    crypto::verify_proof(&message, index, image, proof)?;
                }
                GuardCondition::FeeCollection => {
                    return Err(CryptoError::UnsupportedGuard { index });
                }
            }
        }
        Ok(())
    }

    /// The transaction's outputs as spendable boxes.
    ///
    /// Box IDs are BLAKE3 over `tx_id || output_index (u64 LE) || candidate`.
    pub fn output_boxes(&self) -> Vec<UnspentBox> {
        let tx_id = self.id();
        self.unsigned
            .outputs
            .iter()
            .enumerate()
            .map(|(index, candidate)| {
                let mut data = Vec::with_capacity(32 + 8 + 64);
                data.extend_from_slice(tx_id.as_bytes());
                data.extend_from_slice(&(index as u64).to_le_bytes());
                candidate.write_canonical(&mut data);
                UnspentBox {
                    id: Hash256(blake3::hash(&data).into()),
                    value: candidate.value,
                    guard: candidate.guard,
                    creation_height: candidate.creation_height,
                }
            })
            .collect()
    }

    /// Encode for broadcast or storage (bincode, standard config).
    pub fn to_wire(&self) -> Result<Vec<u8>, TransactionError> {
        bincode::encode_to_vec(self, bincode::config::standard())
            .map_err(|e| TransactionError::Serialization(e.to_string()))
    }

    /// Decode from the wire format produced by [`Self::to_wire`].
    ///
    /// Input longer than [`MAX_TX_WIRE_LEN`] is rejected before decoding.
    pub fn from_wire(bytes: &[u8]) -> Result<Self, TransactionError> {
        decode_wire(bytes)
    }
}

/// Bounded bincode decode shared by both transaction forms.
///
/// The byte limit also caps any length prefix, so a hostile prefix fails
/// with an error instead of a huge allocation.
fn decode_wire<T: bincode::Decode<()>>(bytes: &[u8]) -> Result<T, TransactionError> {
    if bytes.len() > MAX_TX_WIRE_LEN {
        return Err(TransactionError::Serialization(format!(
            "wire encoding is {} bytes, limit is {MAX_TX_WIRE_LEN}",
            bytes.len()
        )));
    }
    let config = bincode::config::standard().with_limit::<MAX_TX_WIRE_LEN>();
    let (tx, _) = bincode::decode_from_slice(bytes, config)
        .map_err(|e| TransactionError::Serialization(e.to_string()))?;
    Ok(tx)
}
