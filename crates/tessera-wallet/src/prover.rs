//! Input proving.
//!
//! [`ProveSimpleKeyMatch`] proves knowledge of the secret `x` behind each
//! input's `PayToPublicKey(P)` guard with a Schnorr proof made
//! non-interactive by Fiat-Shamir:
//!
//! ```text
//! r  = hedged nonce          T = r·G
//! c  = H(tx || index || T || P)
//! z  = r + c·x
//! ```
//!
//! The challenge binds the canonical transaction bytes and the input index,
//! so a proof cannot be moved to another transaction or input. Verification
//! lives in [`tessera_core::crypto::verify_proof`].

use curve25519_dalek::constants::RISTRETTO_BASEPOINT_TABLE;
use curve25519_dalek::scalar::Scalar;
use rand::RngCore;
use rand::rngs::OsRng;
use tracing::debug;
use zeroize::{Zeroize, Zeroizing};

use tessera_core::crypto::{proof_challenge, Proof, PublicImage};
use tessera_core::guard::GuardCondition;
use tessera_core::types::{Hash256, SignedTransaction, UnsignedTransaction};

use crate::error::WalletError;
use crate::keys::SecretKey;

/// BLAKE3 KDF context for proof nonces.
const NONCE_KDF_CONTEXT: &str = "tessera-wallet proof nonce v1";

/// Something able to turn an unsigned transaction into a signed one.
pub trait Prover {
    /// Produce one proof per input, or fail without producing any.
    fn prove(
        &self,
        tx: &UnsignedTransaction,
        secret: &SecretKey,
    ) -> Result<SignedTransaction, WalletError>;
}

/// Proves inputs guarded by the public image of a single secret key.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProveSimpleKeyMatch;

impl Prover for ProveSimpleKeyMatch {
    fn prove(
        &self,
        tx: &UnsignedTransaction,
        secret: &SecretKey,
    ) -> Result<SignedTransaction, WalletError> {
        let image = secret.public_image();

        // All-or-nothing: reject before producing any proof.
        if let Some(index) = tx.inputs.iter().position(|input| !guard_matches(&input.guard, &image)) {
            debug!(index, "input guard does not match the secret");
            return Err(WalletError::UnprovableInput(index));
        }

        let message = tx.canonical_bytes();
        let tx_id = tx.id();
        let proofs = (0..tx.inputs.len())
            .map(|index| {
                debug!(index, %tx_id, "proving input");
                prove_input(&message, &tx_id, index, secret.scalar(), &image)
            })
            .collect();

        Ok(SignedTransaction {
            unsigned: tx.clone(),
            proofs,
        })
    }
}

fn guard_matches(guard: &GuardCondition, image: &PublicImage) -> bool {
    match guard {
        GuardCondition::PayToPublicKey(p) => p == image,
        GuardCondition::FeeCollection => false,
    }
}

fn prove_input(
    message: &[u8],
    tx_id: &Hash256,
    index: usize,
    x: &Scalar,
    image: &PublicImage,
) -> Proof {
    let mut r = nonce(x, tx_id, index);
    let commitment = RISTRETTO_BASEPOINT_TABLE * &r;
    let c = proof_challenge(message, index, &commitment.compress().to_bytes(), image);
    let z = r + c * x;
    r.zeroize();
    Proof::new(&commitment, &z)
}

/// Hedged nonce: deterministic in the secret and message, salted with
/// fresh OS randomness.
///
/// A broken RNG degrades to deterministic nonces, which still never repeat
/// across distinct (transaction, input) pairs.
fn nonce(x: &Scalar, tx_id: &Hash256, index: usize) -> Scalar {
    let mut salt = Zeroizing::new([0u8; 32]);
    OsRng.fill_bytes(salt.as_mut());
    let secret = Zeroizing::new(x.to_bytes());

    let mut wide = Zeroizing::new([0u8; 64]);
    let mut hasher = blake3::Hasher::new_derive_key(NONCE_KDF_CONTEXT);
    hasher.update(secret.as_ref());
    hasher.update(tx_id.as_bytes());
    hasher.update(&(index as u64).to_le_bytes());
    hasher.update(salt.as_ref());
    hasher.finalize_xof().fill(wide.as_mut());
    Scalar::from_bytes_mod_order_wide(&wide)
}
