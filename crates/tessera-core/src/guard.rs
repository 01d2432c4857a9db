//! Spending conditions attached to boxes.

use serde::{Deserialize, Serialize};

use crate::crypto::PublicImage;

/// The predicate a spender must satisfy to consume a box.
///
/// Only [`GuardCondition::PayToPublicKey`] can be proved by a wallet key.
/// [`GuardCondition::FeeCollection`] is the network's designated fee
/// condition, claimable by the block producer.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash,
    bincode::Encode, bincode::Decode,
)]
pub enum GuardCondition {
    /// Spendable by whoever proves knowledge of the secret behind the image.
    PayToPublicKey(PublicImage),
    /// Fee output collected by the block producer.
    FeeCollection,
}

impl GuardCondition {
    /// Wire tag used by the canonical transaction encoding.
    pub fn tag(&self) -> u8 {
        match self {
            Self::PayToPublicKey(_) => 0x01,
            Self::FeeCollection => 0x02,
        }
    }

    /// The public image for a pay-to-public-key guard.
    pub fn public_image(&self) -> Option<&PublicImage> {
        match self {
            Self::PayToPublicKey(image) => Some(image),
            Self::FeeCollection => None,
        }
    }

    /// Whether this is the fee-collection guard.
    pub fn is_fee(&self) -> bool {
        matches!(self, Self::FeeCollection)
    }

    /// Append the canonical encoding: tag, then the image for P2PK.
    pub fn write_canonical(&self, out: &mut Vec<u8>) {
        out.push(self.tag());
        if let Self::PayToPublicKey(image) = self {
            out.extend_from_slice(image.as_bytes());
        }
    }
}

impl From<PublicImage> for GuardCondition {
    fn from(image: PublicImage) -> Self {
        Self::PayToPublicKey(image)
    }
}
