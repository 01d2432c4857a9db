//! Unsigned transaction construction.
//!
//! Turns a [`BoxSelection`] into an [`UnsignedTransaction`] with outputs in a
//! fixed order:
//! 1. payment to the receiver
//! 2. fee, guarded by [`GuardCondition::FeeCollection`]
//! 3. change back to the sender, omitted when zero
//!
//! The finished transaction is checked to balance before it is returned.

use tracing::{debug, error};

use tessera_core::constants::MIN_FEE;
use tessera_core::crypto::PublicImage;
use tessera_core::error::TransactionError;
use tessera_core::guard::GuardCondition;
use tessera_core::types::{BoxCandidate, UnsignedInput, UnsignedTransaction};

use crate::box_selection::BoxSelection;
use crate::config::WalletConfig;
use crate::error::WalletError;

/// Builder for unsigned payment transactions.
///
/// # Example
/// ```ignore
/// let selection = BoxSelector::select(&boxes, transfer, fee)?;
/// let tx = TransactionBuilder::new()
///     .set_auxiliary_data(b"invoice 42".to_vec())
///     .build(&selection, &receiver, &change, transfer, fee, height)?;
/// ```
#[derive(Debug, Clone)]
pub struct TransactionBuilder {
    min_fee: u64,
    auxiliary_data: Option<Vec<u8>>,
}

impl TransactionBuilder {
    /// Create a builder with the default minimum fee.
    pub fn new() -> Self {
        Self {
            min_fee: MIN_FEE,
            auxiliary_data: None,
        }
    }

    /// Create a builder honoring a wallet configuration.
    pub fn from_config(config: &WalletConfig) -> Self {
        Self {
            min_fee: config.min_fee,
            auxiliary_data: None,
        }
    }

    /// Override the minimum fee (default: [`MIN_FEE`]).
    pub fn set_min_fee(&mut self, fee: u64) -> &mut Self {
        self.min_fee = fee;
        self
    }

    /// Attach auxiliary data to the payment output.
    pub fn set_auxiliary_data(&mut self, data: Vec<u8>) -> &mut Self {
        self.auxiliary_data = Some(data);
        self
    }

    /// Build the unsigned transaction for a selection.
    ///
    /// Inputs keep the selection order. `chain_height` becomes the creation
    /// height of the transaction and of every output.
    pub fn build(
        &self,
        selection: &BoxSelection,
        receiver: &PublicImage,
        change_guard: &PublicImage,
        transfer_amount: u64,
        fee_amount: u64,
        chain_height: u32,
    ) -> Result<UnsignedTransaction, WalletError> {
        if transfer_amount == 0 {
            return Err(WalletError::InvalidAmount("transfer amount is zero".into()));
        }
        if fee_amount < self.min_fee {
            return Err(WalletError::InvalidAmount(format!(
                "fee {fee_amount} below minimum {}",
                self.min_fee
            )));
        }
        if selection.selected.is_empty() {
            return Err(WalletError::InvalidAmount("no boxes selected".into()));
        }

        let inputs: Vec<UnsignedInput> = selection.selected.iter().map(UnsignedInput::from).collect();

        let mut outputs = Vec::with_capacity(3);
        outputs.push(BoxCandidate {
            value: transfer_amount,
            guard: GuardCondition::PayToPublicKey(*receiver),
            creation_height: chain_height,
            auxiliary_data: self.auxiliary_data.clone(),
        });
        outputs.push(BoxCandidate {
            value: fee_amount,
            guard: GuardCondition::FeeCollection,
            creation_height: chain_height,
            auxiliary_data: None,
        });
        if selection.change > 0 {
            outputs.push(BoxCandidate {
                value: selection.change,
                guard: GuardCondition::PayToPublicKey(*change_guard),
                creation_height: chain_height,
                auxiliary_data: None,
            });
        }

        let tx = UnsignedTransaction {
            inputs,
            outputs,
            creation_height: chain_height,
        };
        check_balance(&tx)?;

        debug!(
            inputs = tx.inputs.len(),
            outputs = tx.outputs.len(),
            tx_id = %tx.id(),
            "transaction built"
        );
        Ok(tx)
    }
}

impl Default for TransactionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Outputs, fee included, must account for every input unit.
fn check_balance(tx: &UnsignedTransaction) -> Result<(), WalletError> {
    let inputs = tx.total_input_value().ok_or(TransactionError::ValueOverflow)?;
    let outputs = tx.total_output_value().ok_or(TransactionError::ValueOverflow)?;
    if inputs != outputs {
        error!(inputs, outputs, "built transaction does not balance");
        return Err(WalletError::BalanceMismatch { inputs, outputs });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::box_selection::BoxSelector;
    use curve25519_dalek::constants::RISTRETTO_BASEPOINT_TABLE;
    use curve25519_dalek::scalar::Scalar;
    use tessera_core::types::{Hash256, UnspentBox};

    fn image(n: u64) -> PublicImage {
        PublicImage::from_point(&(RISTRETTO_BASEPOINT_TABLE * &Scalar::from(n)))
    }

    fn make_box(id: u8, value: u64) -> UnspentBox {
        UnspentBox {
            id: Hash256([id; 32]),
            value,
            guard: GuardCondition::PayToPublicKey(image(1)),
            creation_height: 32_000,
        }
    }

    fn demo_selection() -> BoxSelection {
        let boxes = vec![make_box(1, 25_300_000), make_box(2, 5_000_000)];
        BoxSelector::select(&boxes, 25_000_000, 1_000_000).unwrap()
    }

    // --- Output layout ---

    #[test]
    fn payment_fee_change_order() {
        let tx = TransactionBuilder::new()
            .build(&demo_selection(), &image(2), &image(1), 25_000_000, 1_000_000, 32_987)
            .unwrap();

        assert_eq!(tx.inputs.len(), 2);
        assert_eq!(tx.inputs[0].box_id, Hash256([1; 32]));
        assert_eq!(tx.inputs[1].box_id, Hash256([2; 32]));

        assert_eq!(tx.outputs.len(), 3);
        assert_eq!(tx.outputs[0].value, 25_000_000);
        assert_eq!(tx.outputs[0].guard, GuardCondition::PayToPublicKey(image(2)));
        assert_eq!(tx.outputs[1].value, 1_000_000);
        assert_eq!(tx.outputs[1].guard, GuardCondition::FeeCollection);
        assert_eq!(tx.outputs[2].value, 4_300_000);
        assert_eq!(tx.outputs[2].guard, GuardCondition::PayToPublicKey(image(1)));
        assert_eq!(tx.fee(), Some(1_000_000));
    }

    #[test]
    fn creation_heights_match_chain_height() {
        let tx = TransactionBuilder::new()
            .build(&demo_selection(), &image(2), &image(1), 25_000_000, 1_000_000, 32_987)
            .unwrap();
        assert_eq!(tx.creation_height, 32_987);
        assert!(tx.outputs.iter().all(|o| o.creation_height == 32_987));
    }

    #[test]
    fn zero_change_omitted() {
        let boxes = vec![make_box(1, 26_000_000)];
        let sel = BoxSelector::select(&boxes, 25_000_000, 1_000_000).unwrap();
        let tx = TransactionBuilder::new()
            .build(&sel, &image(2), &image(1), 25_000_000, 1_000_000, 10)
            .unwrap();
        assert_eq!(tx.outputs.len(), 2);
        assert!(tx.outputs.iter().all(|o| o.value > 0));
    }

    #[test]
    fn auxiliary_data_on_payment_only() {
        let tx = TransactionBuilder::new()
            .set_auxiliary_data(b"invoice 42".to_vec())
            .build(&demo_selection(), &image(2), &image(1), 25_000_000, 1_000_000, 1)
            .unwrap();
        assert_eq!(tx.outputs[0].auxiliary_data.as_deref(), Some(&b"invoice 42"[..]));
        assert!(tx.outputs[1].auxiliary_data.is_none());
        assert!(tx.outputs[2].auxiliary_data.is_none());
    }

    #[test]
    fn balances() {
        let tx = TransactionBuilder::default()
            .build(&demo_selection(), &image(2), &image(1), 25_000_000, 1_000_000, 1)
            .unwrap();
        assert_eq!(tx.total_input_value(), tx.total_output_value());
    }

    // --- Validation ---

    #[test]
    fn zero_transfer_rejected() {
        let err = TransactionBuilder::new()
            .build(&demo_selection(), &image(2), &image(1), 0, 1_000_000, 1)
            .unwrap_err();
        assert!(matches!(err, WalletError::InvalidAmount(_)));
    }

    #[test]
    fn fee_below_minimum_rejected() {
        let err = TransactionBuilder::new()
            .build(&demo_selection(), &image(2), &image(1), 25_000_000, MIN_FEE - 1, 1)
            .unwrap_err();
        assert!(matches!(err, WalletError::InvalidAmount(_)));
    }

    #[test]
    fn custom_min_fee() {
        let boxes = vec![make_box(1, 1_000)];
        let sel = BoxSelector::select(&boxes, 900, 100).unwrap();
        let tx = TransactionBuilder::new()
            .set_min_fee(100)
            .build(&sel, &image(2), &image(1), 900, 100, 1)
            .unwrap();
        assert_eq!(tx.fee(), Some(100));

        let config = WalletConfig {
            min_fee: 101,
            ..WalletConfig::default()
        };
        assert!(TransactionBuilder::from_config(&config)
            .build(&sel, &image(2), &image(1), 900, 100, 1)
            .is_err());
    }

    #[test]
    fn empty_selection_rejected() {
        let sel = BoxSelection {
            selected: vec![],
            total_value: 0,
            change: 0,
        };
        assert!(matches!(
            TransactionBuilder::new().build(&sel, &image(2), &image(1), 1, MIN_FEE, 1),
            Err(WalletError::InvalidAmount(_))
        ));
    }

    #[test]
    fn inconsistent_selection_is_balance_mismatch() {
        // Change claims more than the boxes leave over.
        let sel = BoxSelection {
            selected: vec![make_box(1, 30_000_000)],
            total_value: 30_000_000,
            change: 5_000_000,
        };
        let err = TransactionBuilder::new()
            .build(&sel, &image(2), &image(1), 25_000_000, 1_000_000, 1)
            .unwrap_err();
        assert_eq!(
            err,
            WalletError::BalanceMismatch {
                inputs: 30_000_000,
                outputs: 31_000_000
            }
        );
    }
}
