//! Hierarchical deterministic key derivation.
//!
//! A master [`SecretKey`] is derived from seed entropy with BLAKE3 in
//! key-derivation mode. Children follow the BIP-32 shape over Ristretto255:
//! the parent chain code keys a BLAKE3 hash of
//!
//! ```text
//! hardened:     0x00 || parent_scalar || index_bits (u32 BE)
//! non-hardened: 0x02 || parent_image  || index_bits (u32 BE)
//! ```
//!
//! whose 96-byte output is split into a tweak scalar (64 bytes, reduced wide)
//! and the child chain code. The child scalar is `parent + tweak`. Because
//! non-hardened tweaks depend only on public data, an
//! [`ExtendedPublicImage`] can follow non-hardened paths without the secret;
//! hardened paths require the parent scalar.

use curve25519_dalek::constants::RISTRETTO_BASEPOINT_TABLE;
use curve25519_dalek::scalar::Scalar;
use curve25519_dalek::traits::IsIdentity;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use tessera_core::constants::{
    CHAIN_CODE_LEN, COIN_TYPE, DEFAULT_ENTROPY_LEN, HARDENED_BIT, MAX_ENTROPY_LEN,
    MIN_ENTROPY_LEN, PURPOSE,
};
use tessera_core::crypto::PublicImage;

use crate::error::WalletError;

/// BLAKE3 KDF context for master key derivation.
const MASTER_KDF_CONTEXT: &str = "tessera-wallet master key v1";

/// Domain tag for hardened child derivation.
const HARDENED_TAG: u8 = 0x00;

/// Domain tag for non-hardened child derivation.
const NORMAL_TAG: u8 = 0x02;

/// One segment of a derivation path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChildIndex {
    /// Derivable from the parent public image.
    Normal(u32),
    /// Requires the parent secret.
    Hardened(u32),
}

impl ChildIndex {
    /// Build an index, rejecting values that collide with the hardened bit.
    pub fn new(index: u32, hardened: bool) -> Result<Self, WalletError> {
        if index & HARDENED_BIT != 0 {
            return Err(WalletError::InvalidChildIndex(index));
        }
        Ok(if hardened {
            Self::Hardened(index)
        } else {
            Self::Normal(index)
        })
    }

    /// Whether this index uses hardened derivation.
    pub fn is_hardened(&self) -> bool {
        matches!(self, Self::Hardened(_))
    }

    /// The 31-bit index value.
    pub fn value(&self) -> u32 {
        match self {
            Self::Normal(i) | Self::Hardened(i) => *i,
        }
    }

    /// The 32-bit encoding with the hardened bit folded in.
    pub fn to_bits(&self) -> u32 {
        match self {
            Self::Normal(i) => *i,
            Self::Hardened(i) => *i | HARDENED_BIT,
        }
    }
}

impl fmt::Display for ChildIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal(i) => write!(f, "{i}"),
            Self::Hardened(i) => write!(f, "{i}'"),
        }
    }
}

/// Ordered sequence of child indices from the master key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct DerivationPath(Vec<ChildIndex>);

impl DerivationPath {
    /// The empty path (`m`).
    pub fn master() -> Self {
        Self(Vec::new())
    }

    /// Standard account key path: `m/44'/429'/account'/0/index`.
    pub fn account_key(account: u32, index: u32) -> Result<Self, WalletError> {
        Ok(Self(vec![
            ChildIndex::new(PURPOSE, true)?,
            ChildIndex::new(COIN_TYPE, true)?,
            ChildIndex::new(account, true)?,
            ChildIndex::new(0, false)?,
            ChildIndex::new(index, false)?,
        ]))
    }

    /// This path extended by one segment.
    pub fn child(&self, index: ChildIndex) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    /// The path segments in derivation order.
    pub fn indices(&self) -> &[ChildIndex] {
        &self.0
    }

    /// Number of segments below the master key.
    pub fn depth(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m")?;
        for index in &self.0 {
            write!(f, "/{index}")?;
        }
        Ok(())
    }
}

impl FromStr for DerivationPath {
    type Err = WalletError;

    /// Parse `m/44'/429'/0'/0/0`. Hardened segments end in `'` or `h`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.trim().split('/');
        if parts.next() != Some("m") {
            return Err(WalletError::InvalidDerivationPath(format!("must start with 'm': {s}")));
        }
        let mut indices = Vec::new();
        for part in parts {
            let (digits, hardened) = match part.strip_suffix('\'').or_else(|| part.strip_suffix('h')) {
                Some(d) => (d, true),
                None => (part, false),
            };
            let bad_segment = || WalletError::InvalidDerivationPath(format!("bad segment '{part}'"));
            // Digits only, so every accepted path displays back unchanged.
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return Err(bad_segment());
            }
            let value: u32 = digits.parse().map_err(|_| bad_segment())?;
            indices.push(ChildIndex::new(value, hardened)?);
        }
        Ok(Self(indices))
    }
}

/// A secret scalar with its chain code and derivation path.
///
/// Scalar and chain code are zeroized on drop. The type is deliberately
/// neither `Clone` nor `Serialize`, and its `Debug` output is redacted.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SecretKey {
    scalar: Scalar,
    chain_code: [u8; CHAIN_CODE_LEN],
    #[zeroize(skip)]
    path: DerivationPath,
}

impl SecretKey {
    /// The public image `scalar · G`, computed in constant time.
    pub fn public_image(&self) -> PublicImage {
        PublicImage::from_point(&(RISTRETTO_BASEPOINT_TABLE * &self.scalar))
    }

    /// The chain code used for child derivation.
    pub fn chain_code(&self) -> &[u8; CHAIN_CODE_LEN] {
        &self.chain_code
    }

    /// Derivation path from the master key.
    pub fn path(&self) -> &DerivationPath {
        &self.path
    }

    /// Public counterpart able to derive non-hardened children.
    pub fn extended_public_image(&self) -> ExtendedPublicImage {
        ExtendedPublicImage {
            image: self.public_image(),
            chain_code: self.chain_code,
            path: self.path.clone(),
        }
    }

    /// Derive the child at `index`.
    pub fn derive(&self, index: ChildIndex) -> Result<SecretKey, WalletError> {
        let (mut tweak, chain_code) = match index {
            ChildIndex::Hardened(_) => {
                let secret = Zeroizing::new(self.scalar.to_bytes());
                derivation_tweak(&self.chain_code, HARDENED_TAG, secret.as_ref(), index)
            }
            ChildIndex::Normal(_) => derivation_tweak(
                &self.chain_code,
                NORMAL_TAG,
                self.public_image().as_bytes(),
                index,
            ),
        };
        let scalar = self.scalar + tweak;
        tweak.zeroize();
        SecretKey::from_parts(scalar, chain_code, self.path.child(index))
    }

    /// Scalar view for the prover.
    pub(crate) fn scalar(&self) -> &Scalar {
        &self.scalar
    }

    fn from_parts(
        scalar: Scalar,
        chain_code: [u8; CHAIN_CODE_LEN],
        path: DerivationPath,
    ) -> Result<Self, WalletError> {
        if scalar == Scalar::ZERO {
            return Err(WalletError::KeyDerivation("derived zero scalar".into()));
        }
        Ok(Self {
            scalar,
            chain_code,
            path,
        })
    }
}

impl PartialEq for SecretKey {
    fn eq(&self, other: &Self) -> bool {
        self.scalar == other.scalar && self.chain_code == other.chain_code && self.path == other.path
    }
}

impl Eq for SecretKey {}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretKey")
            .field("path", &self.path.to_string())
            .field("public_image", &self.public_image())
            .finish_non_exhaustive()
    }
}

/// A public image with chain code: derives non-hardened children only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendedPublicImage {
    image: PublicImage,
    chain_code: [u8; CHAIN_CODE_LEN],
    path: DerivationPath,
}

impl ExtendedPublicImage {
    /// The public image at this node.
    pub fn public_image(&self) -> &PublicImage {
        &self.image
    }

    /// Derivation path from the master key.
    pub fn path(&self) -> &DerivationPath {
        &self.path
    }

    /// Derive a non-hardened child. Hardened indices are refused.
    pub fn derive_child(&self, index: u32, hardened: bool) -> Result<Self, WalletError> {
        let index = ChildIndex::new(index, hardened)?;
        if index.is_hardened() {
            return Err(WalletError::HardenedFromPublic);
        }
        let parent = self.image.point()?;
        let (mut tweak, chain_code) =
            derivation_tweak(&self.chain_code, NORMAL_TAG, self.image.as_bytes(), index);
        let child = parent + RISTRETTO_BASEPOINT_TABLE * &tweak;
        tweak.zeroize();
        if child.is_identity() {
            return Err(WalletError::KeyDerivation("derived identity image".into()));
        }
        Ok(Self {
            image: PublicImage::from_point(&child),
            chain_code,
            path: self.path.child(index),
        })
    }
}

/// Derive the master key from seed entropy.
///
/// Entropy must be between [`MIN_ENTROPY_LEN`] and [`MAX_ENTROPY_LEN`] bytes;
/// [`DEFAULT_ENTROPY_LEN`] bytes from a CSPRNG are recommended.
pub fn derive_master(entropy: &[u8]) -> Result<SecretKey, WalletError> {
    if !(MIN_ENTROPY_LEN..=MAX_ENTROPY_LEN).contains(&entropy.len()) {
        return Err(WalletError::InvalidEntropy {
            len: entropy.len(),
            min: MIN_ENTROPY_LEN,
            max: MAX_ENTROPY_LEN,
        });
    }

    let mut okm = Zeroizing::new([0u8; 96]);
    let mut hasher = blake3::Hasher::new_derive_key(MASTER_KDF_CONTEXT);
    hasher.update(entropy);
    hasher.finalize_xof().fill(okm.as_mut());

    let (scalar, chain_code) = split_okm(&okm);
    SecretKey::from_parts(scalar, chain_code, DerivationPath::master()).map_err(|_| {
        WalletError::InvalidEntropy {
            len: entropy.len(),
            min: MIN_ENTROPY_LEN,
            max: MAX_ENTROPY_LEN,
        }
    })
}

/// Derive the child of `parent` at `index`.
///
/// Pure: the same `(parent, index, hardened)` always yields the same key.
pub fn derive_child(parent: &SecretKey, index: u32, hardened: bool) -> Result<SecretKey, WalletError> {
    parent.derive(ChildIndex::new(index, hardened)?)
}

/// Follow a full derivation path from `master`.
pub fn derive_path(master: &SecretKey, path: &DerivationPath) -> Result<SecretKey, WalletError> {
    let mut key = SecretKey::from_parts(master.scalar, master.chain_code, master.path.clone())?;
    for index in path.indices() {
        key = key.derive(*index)?;
    }
    Ok(key)
}

/// The public image of a secret key.
pub fn public_image(key: &SecretKey) -> PublicImage {
    key.public_image()
}

/// Fresh entropy from the OS cryptographic RNG.
pub fn generate_entropy() -> Zeroizing<[u8; DEFAULT_ENTROPY_LEN]> {
    use rand::RngCore;
    let mut bytes = Zeroizing::new([0u8; DEFAULT_ENTROPY_LEN]);
    rand::rngs::OsRng.fill_bytes(bytes.as_mut());
    bytes
}

/// Keyed BLAKE3 PRF producing the child tweak and chain code.
fn derivation_tweak(
    chain_code: &[u8; CHAIN_CODE_LEN],
    tag: u8,
    data: &[u8],
    index: ChildIndex,
) -> (Scalar, [u8; CHAIN_CODE_LEN]) {
    let mut okm = Zeroizing::new([0u8; 96]);
    let mut hasher = blake3::Hasher::new_keyed(chain_code);
    hasher.update(&[tag]);
    hasher.update(data);
    hasher.update(&index.to_bits().to_be_bytes());
    hasher.finalize_xof().fill(okm.as_mut());
    split_okm(&okm)
}

fn split_okm(okm: &[u8; 96]) -> (Scalar, [u8; CHAIN_CODE_LEN]) {
    let mut wide = Zeroizing::new([0u8; 64]);
    wide.copy_from_slice(&okm[..64]);
    let mut chain_code = [0u8; CHAIN_CODE_LEN];
    chain_code.copy_from_slice(&okm[64..]);
    (Scalar::from_bytes_mod_order_wide(&wide), chain_code)
}
