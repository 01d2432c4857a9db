//! # tessera-wallet — keys, box selection, transaction building and proving.
//!
//! Derives hierarchical keys from seed entropy, selects boxes first-fit,
//! builds balanced payment transactions and proves their inputs with
//! Schnorr proofs over Ristretto255.
//!
//! # Modules
//!
//! - [`error`] — `WalletError` enum
//! - [`keys`] — master/child key derivation and derivation paths
//! - [`mnemonic`] — BIP-39 backup of key entropy
//! - [`box_selection`] — first-fit box selection
//! - [`builder`] — unsigned transaction construction
//! - [`prover`] — `ProveSimpleKeyMatch` input proving
//! - [`payment`] — select, build and prove in one call
//! - [`config`] — `WalletConfig`

pub mod box_selection;
pub mod builder;
pub mod config;
pub mod error;
pub mod keys;
pub mod mnemonic;
pub mod payment;
pub mod prover;

// Re-exports for convenient access
pub use box_selection::{BoxSelection, BoxSelector};
pub use builder::TransactionBuilder;
pub use config::WalletConfig;
pub use error::WalletError;
pub use keys::{
    derive_child, derive_master, derive_path, public_image, ChildIndex, DerivationPath,
    ExtendedPublicImage, SecretKey,
};
pub use payment::{payment_transaction, send_payment};
pub use prover::{ProveSimpleKeyMatch, Prover};
