//! Network-scoped addresses.
//!
//! An address pairs a [`Network`] with the [`GuardCondition`] that funds sent
//! to it will carry. The checksummed textual form is produced and parsed by
//! the surrounding tooling; this crate only consumes decoded addresses.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{MAINNET_PREFIX, TESTNET_PREFIX};
use crate::crypto::PublicImage;
use crate::error::AddressError;
use crate::guard::GuardCondition;

/// Network identifier determining the address prefix byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Network {
    /// Production network.
    #[default]
    Mainnet,
    /// Public test network.
    Testnet,
}

impl Network {
    /// Prefix byte carried by encoded addresses of this network.
    pub fn prefix_byte(&self) -> u8 {
        match self {
            Network::Mainnet => MAINNET_PREFIX,
            Network::Testnet => TESTNET_PREFIX,
        }
    }

    /// Look up a network from an address prefix byte.
    pub fn from_prefix_byte(prefix: u8) -> Result<Self, AddressError> {
        match prefix {
            MAINNET_PREFIX => Ok(Network::Mainnet),
            TESTNET_PREFIX => Ok(Network::Testnet),
            other => Err(AddressError::UnknownNetworkPrefix(other)),
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Mainnet => write!(f, "mainnet"),
            Network::Testnet => write!(f, "testnet"),
        }
    }
}

/// A decoded address: network plus guard condition.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address {
    network: Network,
    guard: GuardCondition,
}

impl Address {
    /// Pay-to-public-key address for an image on a network.
    pub fn p2pk(image: PublicImage, network: Network) -> Self {
        Self {
            network,
            guard: GuardCondition::PayToPublicKey(image),
        }
    }

    /// Address with an arbitrary guard condition.
    pub fn new(guard: GuardCondition, network: Network) -> Self {
        Self { network, guard }
    }

    /// The network this address belongs to.
    pub fn network(&self) -> Network {
        self.network
    }

    /// The guard condition funds sent here will carry.
    pub fn guard(&self) -> &GuardCondition {
        &self.guard
    }

    /// The public image, if this is a pay-to-public-key address.
    pub fn pay_to_public_key(&self) -> Result<&PublicImage, AddressError> {
        self.guard.public_image().ok_or(AddressError::NotPayToPublicKey)
    }

    /// The public image, checking that the address belongs to `network`.
    pub fn public_image_for(&self, network: Network) -> Result<&PublicImage, AddressError> {
        if self.network != network {
            return Err(AddressError::NetworkMismatch {
                expected: network.to_string(),
                got: self.network.to_string(),
            });
        }
        self.pay_to_public_key()
    }
}
