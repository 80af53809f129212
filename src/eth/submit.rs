// src/eth/submit.rs

use std::time::Duration;

use ethers::prelude::*;
use tokio::time::timeout;

use super::MyMarket;
use crate::error::SettleError;
use crate::types::SettlementReceipt;

/// Submit `settleMarket` and wait for its confirmation receipt.
///
/// Rejection at submission time and an on-chain revert both surface as
/// `TransactionRejected`; a missing receipt (timeout, dropped connection,
/// transaction evicted from the mempool) surfaces as `ReceiptUnavailable`
/// together with the hash, because the transaction may still confirm later.
pub async fn submit_settlement<M: Middleware + 'static>(
    contract: &MyMarket<M>,
    receipt_timeout: Duration,
) -> Result<SettlementReceipt, SettleError> {
    let call = contract.settle_market();

    let pending = call
        .send()
        .await
        .map_err(|e| SettleError::TransactionRejected(e.to_string()))?;

    let tx_hash = *pending;
    tracing::info!(?tx_hash, "settlement transaction submitted");

    let receipt = match timeout(receipt_timeout, pending).await {
        Err(_) => {
            return Err(SettleError::ReceiptUnavailable {
                tx_hash,
                reason: format!(
                    "timed out after {}s waiting for confirmation",
                    receipt_timeout.as_secs()
                ),
            });
        }
        Ok(Err(e)) => {
            return Err(SettleError::ReceiptUnavailable {
                tx_hash,
                reason: e.to_string(),
            });
        }
        Ok(Ok(None)) => {
            return Err(SettleError::ReceiptUnavailable {
                tx_hash,
                reason: "transaction dropped from the mempool".to_string(),
            });
        }
        Ok(Ok(Some(receipt))) => receipt,
    };

    if receipt.status == Some(U64::zero()) {
        return Err(SettleError::TransactionRejected(format!(
            "transaction {tx_hash:?} reverted on-chain"
        )));
    }

    Ok(SettlementReceipt {
        transaction_hash: receipt.transaction_hash,
        gas_used: receipt.gas_used,
    })
}
