//! # tessera-core
//! Foundation types for Tessera: boxes, guard conditions, transactions,
//! canonical encoding, public images and proof verification.

pub mod address;
pub mod constants;
pub mod crypto;
pub mod error;
pub mod guard;
pub mod types;
