//! Ristretto255 public images and Schnorr proofs of secret-key knowledge.
//!
//! A pay-to-public-key box is spent by proving knowledge of `x` such that
//! `P = x·G`, where `P` is the box's [`PublicImage`]. The proof is a Schnorr
//! proof made non-interactive with the Fiat–Shamir transform:
//!
//! ```text
//! T = r·G
//! c = H(len(msg) || msg || input_index || T || P)
//! z = r + c·x   (mod ℓ)
//! ```
//!
//! The message is the transaction's canonical encoding, so a proof is bound
//! to one transaction, one input position and one public image. Proof
//! creation lives in the wallet; this module only verifies.

use curve25519_dalek::constants::RISTRETTO_BASEPOINT_TABLE;
use curve25519_dalek::ristretto::{CompressedRistretto, RistrettoPoint};
use curve25519_dalek::scalar::Scalar;
use curve25519_dalek::traits::IsIdentity;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::constants::PROOF_LEN;
use crate::error::CryptoError;

/// BLAKE3 derive-key context for the Fiat–Shamir challenge.
const CHALLENGE_CONTEXT: &str = "tessera-core proof challenge v1";

/// A public image `P = x·G` of a secret scalar, stored compressed.
///
/// Construct with [`PublicImage::from_point`] or the validating
/// [`PublicImage::from_bytes`]. Decoded values are re-validated by
/// [`PublicImage::point`] before any group arithmetic.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, bincode::Encode, bincode::Decode)]
pub struct PublicImage([u8; 32]);

impl PublicImage {
    /// Compress a group element into a public image.
    pub fn from_point(point: &RistrettoPoint) -> Self {
        Self(point.compress().to_bytes())
    }

    /// Parse a compressed public image, rejecting non-canonical encodings
    /// and the identity element.
    pub fn from_bytes(bytes: &[u8; 32]) -> Result<Self, CryptoError> {
        let image = Self(*bytes);
        image.point()?;
        Ok(image)
    }

    /// Decompress into a group element.
    pub fn point(&self) -> Result<RistrettoPoint, CryptoError> {
        let point = CompressedRistretto(self.0)
            .decompress()
            .ok_or(CryptoError::InvalidPublicImage)?;
        if point.is_identity() {
            return Err(CryptoError::InvalidPublicImage);
        }
        Ok(point)
    }

    /// Raw compressed bytes.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.0
    }

    /// Borrow the raw compressed bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for PublicImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicImage({})", hex::encode(self.0))
    }
}

impl fmt::Display for PublicImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl Serialize for PublicImage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PublicImage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bytes = <[u8; 32]>::deserialize(deserializer)?;
        Self::from_bytes(&bytes).map_err(serde::de::Error::custom)
    }
}

/// A non-interactive Schnorr proof `(T, z)`.
#[derive(
    Serialize, Deserialize, Clone, Copy, PartialEq, Eq, bincode::Encode, bincode::Decode,
)]
pub struct Proof {
    commitment: [u8; 32],
    response: [u8; 32],
}

impl Proof {
    /// Assemble a proof from its commitment point and response scalar.
    pub fn new(commitment: &RistrettoPoint, response: &Scalar) -> Self {
        Self {
            commitment: commitment.compress().to_bytes(),
            response: response.to_bytes(),
        }
    }

    /// Parse a 64-byte proof, checking the point encoding and that the
    /// response is a canonical scalar.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != PROOF_LEN {
            return Err(CryptoError::InvalidProof);
        }
        let mut commitment = [0u8; 32];
        let mut response = [0u8; 32];
        commitment.copy_from_slice(&bytes[..32]);
        response.copy_from_slice(&bytes[32..]);
        let proof = Self {
            commitment,
            response,
        };
        proof.commitment_point()?;
        proof.response_scalar()?;
        Ok(proof)
    }

    /// Serialize as `T || z`.
    pub fn to_bytes(&self) -> [u8; PROOF_LEN] {
        let mut out = [0u8; PROOF_LEN];
        out[..32].copy_from_slice(&self.commitment);
        out[32..].copy_from_slice(&self.response);
        out
    }

    /// The compressed commitment `T`.
    pub fn commitment(&self) -> &[u8; 32] {
        &self.commitment
    }

    fn commitment_point(&self) -> Result<RistrettoPoint, CryptoError> {
        CompressedRistretto(self.commitment)
            .decompress()
            .ok_or(CryptoError::InvalidProof)
    }

    fn response_scalar(&self) -> Result<Scalar, CryptoError> {
        Option::from(Scalar::from_canonical_bytes(self.response)).ok_or(CryptoError::InvalidProof)
    }
}

impl fmt::Debug for Proof {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Proof({})", hex::encode(self.to_bytes()))
    }
}

/// Compute the Fiat–Shamir challenge scalar.
///
/// The message length is absorbed first so that the variable-length message
/// cannot run into the fixed-width fields that follow it.
pub fn proof_challenge(
    message: &[u8],
    input_index: usize,
    commitment: &[u8; 32],
    image: &PublicImage,
) -> Scalar {
    let mut hasher = blake3::Hasher::new_derive_key(CHALLENGE_CONTEXT);
    hasher.update(&(message.len() as u64).to_le_bytes());
    hasher.update(message);
    hasher.update(&(input_index as u64).to_le_bytes());
    hasher.update(commitment);
    hasher.update(image.as_bytes());
    let mut wide = [0u8; 64];
    hasher.finalize_xof().fill(&mut wide);
    Scalar::from_bytes_mod_order_wide(&wide)
}

/// Verify a proof of knowledge of the secret behind `image` for one input.
///
/// Recomputes the challenge from `message` and checks `z·G == T + c·P`.
pub fn verify_proof(
    message: &[u8],
    input_index: usize,
    image: &PublicImage,
    proof: &Proof,
) -> Result<(), CryptoError> {
    let failed = CryptoError::VerificationFailed { index: input_index };
    let p = image.point().map_err(|_| failed.clone())?;
    let t = proof.commitment_point().map_err(|_| failed.clone())?;
    let z = proof.response_scalar().map_err(|_| failed.clone())?;

    let c = proof_challenge(message, input_index, &proof.commitment, image);
    if RISTRETTO_BASEPOINT_TABLE * &z == t + c * p {
        Ok(())
    } else {
        Err(failed)
    }
}
