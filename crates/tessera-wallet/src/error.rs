//! Wallet error types.

use tessera_core::error::{AddressError, CryptoError, TransactionError};
use thiserror::Error;

/// Errors that can occur in wallet operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    /// Master-key entropy outside the accepted length range, or degenerate.
    #[error("invalid entropy: {len} bytes, expected {min}..={max}")]
    InvalidEntropy {
        /// Supplied entropy length in bytes.
        len: usize,
        /// Minimum accepted length.
        min: usize,
        /// Maximum accepted length.
        max: usize,
    },

    /// Child index does not fit in 31 bits.
    #[error("invalid child index: {0}")]
    InvalidChildIndex(u32),

    /// Hardened children cannot be derived from public data.
    #[error("hardened derivation requires the parent secret")]
    HardenedFromPublic,

    /// Derivation path string could not be parsed.
    #[error("invalid derivation path: {0}")]
    InvalidDerivationPath(String),

    /// Key derivation produced an unusable key.
    #[error("key derivation: {0}")]
    KeyDerivation(String),

    /// Candidates cannot cover the transfer amount plus fee.
    #[error("insufficient funds: have {have}, need {need}")]
    InsufficientFunds {
        /// Total value of all candidates.
        have: u64,
        /// Transfer amount plus fee.
        need: u64,
    },

    /// Invalid monetary amount.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// Built transaction does not balance. Indicates a defect in the caller
    /// or the builder, never a user error.
    #[error("balance mismatch: inputs {inputs}, outputs {outputs}")]
    BalanceMismatch {
        /// Total input value.
        inputs: u64,
        /// Total output value, fee output included.
        outputs: u64,
    },

    /// The secret cannot satisfy the guard of the input at this index.
    #[error("unprovable input: {0}")]
    UnprovableInput(usize),

    /// Invalid BIP-39 mnemonic phrase.
    #[error("invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    /// Invalid wallet configuration.
    #[error("config: {0}")]
    Config(String),

    /// Cryptographic error from tessera-core.
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// Transaction error from tessera-core.
    #[error(transparent)]
    Transaction(#[from] TransactionError),

    /// Address error from tessera-core.
    #[error(transparent)]
    Address(#[from] AddressError),
}
