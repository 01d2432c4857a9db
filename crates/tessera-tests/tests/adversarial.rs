//! Adversarial property-based test suite for Tessera.
//!
//! These tests attempt to break wallet invariants under randomized inputs.
//! Pure arithmetic properties run 256 cases; properties that derive keys or
//! prove inputs run fewer to keep the suite fast.
//!
//! Attack vectors tested:
//! - Selection that over- or under-spends, reorders, or skips candidates
//! - Builds that create or destroy value, or emit zero-value outputs
//! - Proofs replayed onto tampered transactions or other inputs
//! - Malformed proof and wire bytes, hostile length prefixes
//! - Derivation that is not a pure function of (parent, index)

use proptest::prelude::*;

use tessera_core::crypto::{verify_proof, Proof, PublicImage};
use tessera_core::guard::GuardCondition;
use tessera_core::types::{SignedTransaction, UnspentBox};
use tessera_tests::helpers::*;
use tessera_wallet::{
    derive_child, BoxSelector, ProveSimpleKeyMatch, Prover, TransactionBuilder, WalletError,
};

const MIN_FEE: u64 = tessera_core::constants::MIN_FEE;
const MAX_TX_WIRE_LEN: usize = tessera_core::constants::MAX_TX_WIRE_LEN;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Boxes with arbitrary values owned by a fixed key.
fn owned_boxes(values: &[u64]) -> Vec<UnspentBox> {
    boxes_for(&key(1), values, 1_000)
}

// ---------------------------------------------------------------------------
// 1. Box selection
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn selection_is_minimal_prefix(
        values in prop::collection::vec(1u64..=50_000_000, 0..=12),
        transfer in 1u64..=100_000_000,
        fee in MIN_FEE..=5_000_000,
    ) {
        let boxes = owned_boxes(&values);
        let need = transfer + fee;

        match BoxSelector::select(&boxes, transfer, fee) {
            Ok(sel) => {
                let n = sel.selected.len();
                // A prefix of the candidates, in order.
                prop_assert_eq!(&sel.selected[..], &boxes[..n]);
                // Totals are exact.
                let sum: u64 = sel.selected.iter().map(|b| b.value).sum();
                prop_assert_eq!(sel.total_value, sum);
                prop_assert!(sum >= need);
                prop_assert_eq!(sel.change, sum - need);
                // First-fit: one box fewer would not have been enough.
                let without_last: u64 = sel.selected[..n - 1].iter().map(|b| b.value).sum();
                prop_assert!(without_last < need);
            }
            Err(WalletError::InsufficientFunds { have, need: reported }) => {
                prop_assert_eq!(have, total_value(&boxes));
                prop_assert_eq!(reported, need);
                prop_assert!(have < need);
            }
            Err(other) => prop_assert!(false, "unexpected error: {other}"),
        }
    }

    #[test]
    fn selection_is_deterministic(
        values in prop::collection::vec(1u64..=10_000_000, 1..=12),
        transfer in 1u64..=20_000_000,
    ) {
        let boxes = owned_boxes(&values);
        let a = BoxSelector::select(&boxes, transfer, MIN_FEE);
        let b = BoxSelector::select(&boxes, transfer, MIN_FEE);
        prop_assert_eq!(a, b);
    }
}

// ---------------------------------------------------------------------------
// 2. Transaction building
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn built_transaction_balances(
        values in prop::collection::vec(1u64..=50_000_000, 1..=10),
        transfer in 1u64..=80_000_000,
        fee in MIN_FEE..=5_000_000,
        height in 0u32..=10_000_000,
    ) {
        let boxes = owned_boxes(&values);
        let Ok(sel) = BoxSelector::select(&boxes, transfer, fee) else {
            return Ok(());
        };
        let me = key(1).public_image();
        let receiver = key(2).public_image();
        let tx = TransactionBuilder::new()
            .build(&sel, &receiver, &me, transfer, fee, height)
            .unwrap();

        // Conservation of value.
        prop_assert_eq!(tx.total_input_value(), tx.total_output_value());
        prop_assert_eq!(tx.total_input_value(), Some(sel.total_value));
        prop_assert_eq!(tx.fee(), Some(fee));

        // Layout: payment, fee, optional change. No zero-value outputs.
        prop_assert_eq!(tx.outputs.len(), if sel.change == 0 { 2 } else { 3 });
        prop_assert_eq!(tx.outputs[0].value, transfer);
        prop_assert_eq!(tx.outputs[1].guard, GuardCondition::FeeCollection);
        prop_assert!(tx.outputs.iter().all(|o| o.value > 0));
        prop_assert!(tx.outputs.iter().all(|o| o.creation_height == height));
        prop_assert_eq!(tx.inputs.len(), sel.selected.len());
    }

    #[test]
    fn fee_below_minimum_always_rejected(fee in 0u64..MIN_FEE) {
        let boxes = owned_boxes(&[100_000_000]);
        let sel = BoxSelector::select(&boxes, 1, fee).unwrap();
        let me = key(1).public_image();
        let result = TransactionBuilder::new().build(&sel, &me, &me, 1, fee, 1);
        prop_assert!(matches!(result, Err(WalletError::InvalidAmount(_))));
    }
}

// ---------------------------------------------------------------------------
// 3. Proof tampering
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn tampered_value_invalidates_proofs(
        n_boxes in 1usize..=4,
        output in 0usize..3,
        delta in 1u64..=1_000,
    ) {
        let me = key(1);
        let boxes = owned_boxes(&vec![10_000_000; n_boxes]);
        let transfer = 10_000_000 * n_boxes as u64 - 3 * MIN_FEE;
        let sel = BoxSelector::select(&boxes, transfer, MIN_FEE).unwrap();
        let tx = TransactionBuilder::new()
            .build(&sel, &key(2).public_image(), &me.public_image(), transfer, MIN_FEE, 7)
            .unwrap();
        let mut signed = ProveSimpleKeyMatch.prove(&tx, &me).unwrap();
        prop_assert!(signed.verify().is_ok());

        let output = output % signed.unsigned.outputs.len();
        signed.unsigned.outputs[output].value += delta;
        prop_assert!(signed.verify().is_err());
    }

    #[test]
    fn tampered_input_value_invalidates_proofs(
        n_boxes in 1usize..=4,
        input in 0usize..4,
        delta in 1u64..=1_000_000_000,
    ) {
        let me = key(1);
        let boxes = owned_boxes(&vec![10_000_000; n_boxes]);
        let transfer = 10_000_000 * n_boxes as u64 - 3 * MIN_FEE;
        let sel = BoxSelector::select(&boxes, transfer, MIN_FEE).unwrap();
        let tx = TransactionBuilder::new()
            .build(&sel, &key(2).public_image(), &me.public_image(), transfer, MIN_FEE, 7)
            .unwrap();
        let mut signed = ProveSimpleKeyMatch.prove(&tx, &me).unwrap();

        let input = input % signed.unsigned.inputs.len();
        signed.unsigned.inputs[input].value += delta;
        prop_assert!(signed.verify().is_err());
    }

    #[test]
    fn proof_does_not_transfer_between_inputs(n_boxes in 2usize..=4, from in 0usize..4, to in 0usize..4) {
        let from = from % n_boxes;
        let to = to % n_boxes;
        prop_assume!(from != to);

        let me = key(1);
        let boxes = owned_boxes(&vec![10_000_000; n_boxes]);
        let transfer = 10_000_000 * n_boxes as u64 - MIN_FEE;
        let sel = BoxSelector::select(&boxes, transfer, MIN_FEE).unwrap();
        let tx = TransactionBuilder::new()
            .build(&sel, &key(2).public_image(), &me.public_image(), transfer, MIN_FEE, 7)
            .unwrap();
        let signed = ProveSimpleKeyMatch.prove(&tx, &me).unwrap();

        let msg = tx.canonical_bytes();
        prop_assert!(verify_proof(&msg, to, &me.public_image(), &signed.proofs[from]).is_err());
    }

    #[test]
    fn unrelated_key_never_proves(seed in 2u8..=255) {
        let owner = key(1);
        let stranger = key(seed);
        let boxes = owned_boxes(&[30_000_000]);
        let sel = BoxSelector::select(&boxes, 25_000_000, MIN_FEE).unwrap();
        let tx = TransactionBuilder::new()
            .build(&sel, &stranger.public_image(), &owner.public_image(), 25_000_000, MIN_FEE, 7)
            .unwrap();
        prop_assert_eq!(
            ProveSimpleKeyMatch.prove(&tx, &stranger).unwrap_err(),
            WalletError::UnprovableInput(0)
        );
    }
}

// ---------------------------------------------------------------------------
// 4. Malformed bytes
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn random_proof_bytes_never_panic(bytes in prop::collection::vec(any::<u8>(), 0..=80)) {
        if let Ok(proof) = Proof::from_bytes(&bytes) {
            let image = key(1).public_image();
            // A random proof is overwhelmingly unlikely to verify.
            prop_assert!(verify_proof(b"message", 0, &image, &proof).is_err());
        }
    }

    #[test]
    fn random_image_bytes_never_panic(bytes in any::<[u8; 32]>()) {
        if let Ok(image) = PublicImage::from_bytes(&bytes) {
            prop_assert!(image.point().is_ok());
        }
    }

    #[test]
    fn random_wire_bytes_never_panic(bytes in prop::collection::vec(any::<u8>(), 0..=512)) {
        let _ = SignedTransaction::from_wire(&bytes);
    }

    #[test]
    fn oversized_length_prefix_rejected(
        len in (MAX_TX_WIRE_LEN as u64)..=u64::MAX,
        tail in prop::collection::vec(any::<u8>(), 0..=64),
    ) {
        // 0xFD: u64 varint marker for the input count.
        let mut bytes = vec![0xFD];
        bytes.extend_from_slice(&len.to_le_bytes());
        bytes.extend_from_slice(&tail);
        prop_assert!(SignedTransaction::from_wire(&bytes).is_err());
    }
}

// ---------------------------------------------------------------------------
// 5. Key derivation
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn derivation_is_pure(index in 0u32..0x8000_0000, hardened in any::<bool>()) {
        let m = key(7);
        let a = derive_child(&m, index, hardened).unwrap();
        let b = derive_child(&m, index, hardened).unwrap();
        prop_assert_eq!(a.public_image(), b.public_image());
        prop_assert_eq!(a.chain_code(), b.chain_code());
    }

    #[test]
    fn public_and_secret_derivation_agree(index in 0u32..0x8000_0000) {
        let m = key(7);
        let secret_child = derive_child(&m, index, false).unwrap();
        let public_child = m.extended_public_image().derive_child(index, false).unwrap();
        prop_assert_eq!(public_child.public_image(), &secret_child.public_image());
    }

    #[test]
    fn distinct_indices_distinct_keys(i in 0u32..0x8000_0000, j in 0u32..0x8000_0000) {
        prop_assume!(i != j);
        let m = key(7);
        let a = derive_child(&m, i, false).unwrap();
        let b = derive_child(&m, j, false).unwrap();
        prop_assert_ne!(a.public_image(), b.public_image());
    }

    #[test]
    fn out_of_range_index_rejected(index in 0x8000_0000u32..=u32::MAX, hardened in any::<bool>()) {
        let m = key(7);
        prop_assert_eq!(
            derive_child(&m, index, hardened).unwrap_err(),
            WalletError::InvalidChildIndex(index)
        );
    }
}
