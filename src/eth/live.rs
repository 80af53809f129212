// src/eth/live.rs

use std::time::Duration;

use async_trait::async_trait;
use ethers::prelude::*;

use super::submit::submit_settlement;
use super::MyMarket;
use crate::error::SettleError;
use crate::market::MarketContract;
use crate::types::SettlementReceipt;

/// `MarketContract` backed by the deployed contract over JSON-RPC.
pub struct LiveMarket<M> {
    contract: MyMarket<M>,
    receipt_timeout: Duration,
}

impl<M: Middleware + 'static> LiveMarket<M> {
    pub fn new(contract: MyMarket<M>, receipt_timeout: Duration) -> Self {
        Self {
            contract,
            receipt_timeout,
        }
    }
}

fn query_failed<M: Middleware>(e: ContractError<M>) -> SettleError {
    SettleError::ChainQueryFailed(e.to_string())
}

// Contract timestamps and durations fit u64 in practice; clamp instead of
// trusting the node.
fn clamped_u64(value: U256) -> u64 {
    if value > U256::from(u64::MAX) {
        u64::MAX
    } else {
        value.as_u64()
    }
}

#[async_trait]
impl<M: Middleware + 'static> MarketContract for LiveMarket<M> {
    async fn has_expired(&self) -> Result<bool, SettleError> {
        self.contract.has_expired().call().await.map_err(query_failed)
    }

    async fn time_until_expiry(&self) -> Result<u64, SettleError> {
        let remaining = self
            .contract
            .time_until_expiry()
            .call()
            .await
            .map_err(query_failed)?;
        Ok(clamped_u64(remaining))
    }

    async fn is_settled(&self) -> Result<bool, SettleError> {
        self.contract.is_settled().call().await.map_err(query_failed)
    }

    async fn strike_price(&self) -> Result<U256, SettleError> {
        self.contract.strike_price().call().await.map_err(query_failed)
    }

    async fn settlement_price(&self) -> Result<U256, SettleError> {
        self.contract
            .settlement_price()
            .call()
            .await
            .map_err(query_failed)
    }

    async fn settled_above_strike(&self) -> Result<bool, SettleError> {
        self.contract
            .settled_above_strike()
            .call()
            .await
            .map_err(query_failed)
    }

    async fn answer_timestamp(&self) -> Result<u64, SettleError> {
        let ts = self
            .contract
            .answer_timestamp()
            .call()
            .await
            .map_err(query_failed)?;
        Ok(clamped_u64(ts))
    }

    async fn settle_market(&self) -> Result<SettlementReceipt, SettleError> {
        submit_settlement(&self.contract, self.receipt_timeout).await
    }
}
