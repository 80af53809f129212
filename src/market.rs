use async_trait::async_trait;
use ethers::types::U256;

use crate::error::SettleError;
use crate::types::{MarketState, Settlement, SettlementReceipt};

/// The read/write surface of a deployed market, kept narrow so tests can
/// substitute a deterministic in-memory market for the JSON-RPC one.
#[async_trait]
pub trait MarketContract {
    async fn has_expired(&self) -> Result<bool, SettleError>;
    async fn time_until_expiry(&self) -> Result<u64, SettleError>;
    async fn is_settled(&self) -> Result<bool, SettleError>;
    async fn strike_price(&self) -> Result<U256, SettleError>;
    async fn settlement_price(&self) -> Result<U256, SettleError>;
    async fn settled_above_strike(&self) -> Result<bool, SettleError>;
    async fn answer_timestamp(&self) -> Result<u64, SettleError>;

    /// Submit the settlement transaction and wait for its confirmation
    /// receipt.
    async fn settle_market(&self) -> Result<SettlementReceipt, SettleError>;
}

/// Read the current state of the market. Settlement fields are only queried
/// (and only present) once the contract reports itself settled.
pub async fn snapshot<M: MarketContract + ?Sized>(
    market: &M,
) -> Result<MarketState, SettleError> {
    let strike_price = market.strike_price().await?;

    if !market.is_settled().await? {
        return Ok(MarketState {
            strike_price,
            settlement: None,
        });
    }

    Ok(MarketState {
        strike_price,
        settlement: Some(Settlement {
            settlement_price: market.settlement_price().await?,
            settled_above_strike: market.settled_above_strike().await?,
            answer_timestamp: market.answer_timestamp().await?,
        }),
    })
}
