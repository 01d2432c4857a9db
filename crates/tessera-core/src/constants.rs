//! Protocol constants. All monetary values in the smallest currency unit.

/// Minimal transaction fee accepted by the network.
pub const MIN_FEE: u64 = 1_000_000;

/// Minimum master-key entropy length in bytes (128 bits).
pub const MIN_ENTROPY_LEN: usize = 16;

/// Maximum master-key entropy length in bytes (512 bits).
pub const MAX_ENTROPY_LEN: usize = 64;

/// Recommended master-key entropy length in bytes.
pub const DEFAULT_ENTROPY_LEN: usize = 32;

/// Bit set on a child index to mark hardened derivation.
pub const HARDENED_BIT: u32 = 0x8000_0000;

/// BIP-44 purpose field.
pub const PURPOSE: u32 = 44;

/// Registered BIP-44 coin type.
pub const COIN_TYPE: u32 = 429;

/// Length in bytes of a key-derivation chain code.
pub const CHAIN_CODE_LEN: usize = 32;

/// Serialized proof length: compressed commitment (32) + response scalar (32).
pub const PROOF_LEN: usize = 64;

/// Network prefix byte for mainnet addresses.
pub const MAINNET_PREFIX: u8 = 0x00;

/// Network prefix byte for testnet addresses.
pub const TESTNET_PREFIX: u8 = 0x10;

/// Largest wire encoding accepted when decoding a transaction (1 MiB).
pub const MAX_TX_WIRE_LEN: usize = 1 << 20;
