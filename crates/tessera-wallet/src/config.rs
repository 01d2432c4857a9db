//! Wallet configuration.

use serde::{Deserialize, Serialize};

use tessera_core::address::Network;
use tessera_core::constants::MIN_FEE;

use crate::error::WalletError;

/// Settings shared by the payment pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalletConfig {
    /// Network addresses must belong to.
    pub network: Network,
    /// Smallest fee the builder accepts, in base units.
    pub min_fee: u64,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            network: Network::Mainnet,
            min_fee: MIN_FEE,
        }
    }
}

impl WalletConfig {
    /// Testnet configuration with default fees.
    pub fn testnet() -> Self {
        Self {
            network: Network::Testnet,
            ..Self::default()
        }
    }

    /// Parse from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, WalletError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| WalletError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), WalletError> {
        if self.min_fee == 0 {
            return Err(WalletError::Config("min_fee must be positive".into()));
        }
        Ok(())
    }
}
