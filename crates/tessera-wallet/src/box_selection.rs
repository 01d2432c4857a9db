//! First-fit box selection.
//!
//! Boxes are taken in the order the caller supplies them until their
//! accumulated value covers the transfer amount plus fee. The caller owns
//! the ordering policy; this module never reorders or randomizes.

use tracing::debug;

use tessera_core::types::UnspentBox;

use crate::error::WalletError;

/// Result of box selection: which boxes to spend and the change left over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoxSelection {
    /// Selected boxes, in candidate order.
    pub selected: Vec<UnspentBox>,
    /// Total value of the selected boxes.
    pub total_value: u64,
    /// `total_value - transfer - fee`.
    pub change: u64,
}

/// First-fit box selector.
pub struct BoxSelector;

impl BoxSelector {
    /// Select boxes covering `transfer_amount + fee_amount`.
    ///
    /// Stops at the first prefix of `candidates` whose value meets the
    /// target. Fails with [`WalletError::InsufficientFunds`] when the whole
    /// candidate set falls short.
    pub fn select(
        candidates: &[UnspentBox],
        transfer_amount: u64,
        fee_amount: u64,
    ) -> Result<BoxSelection, WalletError> {
        let need = transfer_amount
            .checked_add(fee_amount)
            .ok_or_else(|| WalletError::InvalidAmount("transfer plus fee overflows".into()))?;

        let mut selected = Vec::new();
        let mut total: u64 = 0;

        for candidate in candidates {
            if total >= need {
                break;
            }
            total = total
                .checked_add(candidate.value)
                .ok_or_else(|| WalletError::InvalidAmount("selected value overflows".into()))?;
            selected.push(candidate.clone());
        }

        if total < need {
            let have = candidates
                .iter()
                .fold(0u64, |acc, b| acc.saturating_add(b.value));
            return Err(WalletError::InsufficientFunds { have, need });
        }

        let change = total - need;
        debug!(
            selected = selected.len(),
            candidates = candidates.len(),
            total,
            change,
            "boxes selected"
        );

        Ok(BoxSelection {
            selected,
            total_value: total,
            change,
        })
    }
}
