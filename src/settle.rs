use crate::config::NetworkContext;
use crate::deployments;
use crate::error::SettleError;
use crate::eth::client;
use crate::eth::live::LiveMarket;
use crate::market::{snapshot, MarketContract};
use crate::types::{MarketPhase, MarketState, SettlementOutcome, SettlementReceipt};

/// Settle the market recorded for the context's network, end to end:
/// resolve the deployment, check preconditions, submit if needed, report.
pub async fn run(ctx: &NetworkContext) -> Result<SettlementOutcome, SettleError> {
    let registry = deployments::load_registry(&ctx.deployments_file)?;
    let address = deployments::resolve_market(&registry, &ctx.network_name, ctx.chain_id)?;

    tracing::info!(market = ?address, "settling market");

    let contract = client::connect(ctx, address)
        .await
        .map_err(|e| SettleError::ChainQueryFailed(format!("chain client setup failed: {e}")))?;

    run_settlement(&LiveMarket::new(contract, ctx.receipt_timeout)).await
}

/// Decide what, if anything, has to happen before the market can be
/// reported settled.
pub async fn evaluate<M: MarketContract + ?Sized>(
    market: &M,
) -> Result<MarketPhase, SettleError> {
    if !market.has_expired().await? {
        let remaining_secs = market.time_until_expiry().await?;
        return Ok(MarketPhase::NotExpired { remaining_secs });
    }

    if market.is_settled().await? {
        let state = snapshot(market).await?;
        return Ok(MarketPhase::AlreadySettled(state));
    }

    Ok(MarketPhase::AwaitingSettlement)
}

/// One settlement pass over an already-resolved market. Safe to call again
/// after a successful run: the second pass takes the already-settled branch
/// and submits nothing.
pub async fn run_settlement<M: MarketContract + ?Sized>(
    market: &M,
) -> Result<SettlementOutcome, SettleError> {
    match evaluate(market).await? {
        MarketPhase::NotExpired { remaining_secs } => {
            Err(SettleError::MarketNotExpired { remaining_secs })
        }
        MarketPhase::AlreadySettled(state) => build_outcome(state, None),
        MarketPhase::AwaitingSettlement => {
            let receipt = market.settle_market().await?;
            tracing::info!(gas_used = ?receipt.gas_used, "market settled");

            let state = snapshot(market).await?;
            build_outcome(state, Some(receipt))
        }
    }
}

/// Assemble the outcome from a post-settlement snapshot. Pure; the only
/// failure is a snapshot that is missing its settlement fields, which means
/// the caller skipped the evaluation step.
pub fn build_outcome(
    state: MarketState,
    submitted: Option<SettlementReceipt>,
) -> Result<SettlementOutcome, SettleError> {
    let settlement = state
        .settlement
        .ok_or(SettleError::InvalidState("settlement fields missing on a settled market"))?;

    Ok(SettlementOutcome {
        already_settled: submitted.is_none(),
        settlement_price: settlement.settlement_price,
        strike_price: state.strike_price,
        settled_above_strike: settlement.settled_above_strike,
        answer_timestamp: settlement.answer_timestamp,
        transaction: submitted,
    })
}
