//! End-to-end payment pipeline: select, build, prove.

use tracing::info;

use tessera_core::address::Address;
use tessera_core::types::{SignedTransaction, UnspentBox, UnsignedTransaction};

use crate::box_selection::BoxSelector;
use crate::builder::TransactionBuilder;
use crate::config::WalletConfig;
use crate::error::WalletError;
use crate::keys::SecretKey;
use crate::prover::{ProveSimpleKeyMatch, Prover};

/// Build an unsigned payment of `transfer_amount` to `receiver`.
///
/// Both addresses must be pay-to-public-key on `config.network`. Boxes are
/// selected first-fit from `candidates` in the order given.
pub fn payment_transaction(
    config: &WalletConfig,
    candidates: &[UnspentBox],
    receiver: &Address,
    change: &Address,
    transfer_amount: u64,
    fee_amount: u64,
    chain_height: u32,
) -> Result<UnsignedTransaction, WalletError> {
    let receiver_image = receiver.public_image_for(config.network)?;
    let change_image = change.public_image_for(config.network)?;

    let selection = BoxSelector::select(candidates, transfer_amount, fee_amount)?;
    let tx = TransactionBuilder::from_config(config).build(
        &selection,
        receiver_image,
        change_image,
        transfer_amount,
        fee_amount,
        chain_height,
    )?;

    info!(
        tx_id = %tx.id(),
        network = %config.network,
        inputs = tx.inputs.len(),
        transfer_amount,
        fee_amount,
        change = selection.change,
        "payment transaction built"
    );
    Ok(tx)
}

/// Build and prove a payment spending boxes owned by `secret`.
///
/// Change returns to the secret's own pay-to-public-key address.
pub fn send_payment(
    config: &WalletConfig,
    candidates: &[UnspentBox],
    receiver: &Address,
    transfer_amount: u64,
    fee_amount: u64,
    chain_height: u32,
    secret: &SecretKey,
) -> Result<SignedTransaction, WalletError> {
    let change = Address::p2pk(secret.public_image(), config.network);
    let tx = payment_transaction(
        config,
        candidates,
        receiver,
        &change,
        transfer_amount,
        fee_amount,
        chain_height,
    )?;
    let signed = ProveSimpleKeyMatch.prove(&tx, secret)?;
    info!(tx_id = %signed.id(), proofs = signed.proofs.len(), "payment signed");
    Ok(signed)
}
