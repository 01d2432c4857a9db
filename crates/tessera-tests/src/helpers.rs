//! Shared test helpers for E2E and adversarial tests.

use tessera_core::guard::GuardCondition;
use tessera_core::types::{Hash256, UnspentBox};
use tessera_wallet::{derive_master, SecretKey};

/// Deterministic secret key from a seed byte.
pub fn key(seed: u8) -> SecretKey {
    derive_master(&[seed; 32]).expect("32 bytes of entropy is always valid")
}

/// Deterministic box id for position `n`.
pub fn box_id(n: u64) -> Hash256 {
    Hash256(*blake3::hash(&n.to_le_bytes()).as_bytes())
}

/// Boxes owned by `owner`, one per value, ids derived from position.
pub fn boxes_for(owner: &SecretKey, values: &[u64], creation_height: u32) -> Vec<UnspentBox> {
    let guard = GuardCondition::PayToPublicKey(owner.public_image());
    values
        .iter()
        .enumerate()
        .map(|(i, value)| UnspentBox {
            id: box_id(i as u64),
            value: *value,
            guard,
            creation_height,
        })
        .collect()
}

/// Sum of box values, saturating.
pub fn total_value(boxes: &[UnspentBox]) -> u64 {
    boxes.iter().fold(0u64, |acc, b| acc.saturating_add(b.value))
}
