//! Integration and adversarial test suite for Tessera.
//!
//! The tests in `tests/` drive the wallet pipeline end to end and attack its
//! invariants with property-based inputs. Shared fixtures live in
//! [`helpers`].

pub mod helpers;
