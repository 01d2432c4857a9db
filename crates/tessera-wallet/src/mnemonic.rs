//! BIP-39 mnemonic backup and restoration of key entropy.

use bip39::{Language, Mnemonic};
use zeroize::Zeroizing;

use crate::error::WalletError;

/// Encode entropy as an English BIP-39 phrase.
///
/// Entropy must be 16, 20, 24, 28 or 32 bytes (12 to 24 words).
pub fn entropy_to_mnemonic(entropy: &[u8]) -> Result<Zeroizing<String>, WalletError> {
    let m = Mnemonic::from_entropy_in(Language::English, entropy)
        .map_err(|e| WalletError::InvalidMnemonic(e.to_string()))?;
    Ok(Zeroizing::new(m.to_string()))
}

/// Parse a BIP-39 phrase back into its entropy.
///
/// Normalizes whitespace and converts to lowercase before parsing.
pub fn mnemonic_to_entropy(phrase: &str) -> Result<Zeroizing<Vec<u8>>, WalletError> {
    let m = parse(phrase)?;
    Ok(Zeroizing::new(m.to_entropy()))
}

/// Stretch a phrase and passphrase into the 64-byte BIP-39 seed.
///
/// The result is valid input for [`crate::keys::derive_master`].
pub fn seed_from_mnemonic(phrase: &str, passphrase: &str) -> Result<Zeroizing<[u8; 64]>, WalletError> {
    let m = parse(phrase)?;
    Ok(Zeroizing::new(m.to_seed_normalized(passphrase)))
}

fn parse(phrase: &str) -> Result<Mnemonic, WalletError> {
    let normalized = Zeroizing::new(
        phrase
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase(),
    );
    Mnemonic::parse_in(Language::English, normalized.as_str())
        .map_err(|e| WalletError::InvalidMnemonic(e.to_string()))
}
