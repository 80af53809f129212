use ethers::types::{TxHash, U256};
use serde::Serialize;

/// On-chain view of an expired market.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketState {
    pub strike_price: U256,
    /// Populated exactly when the contract reports itself settled.
    pub settlement: Option<Settlement>,
}

/// The fields the contract records when settlement lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settlement {
    pub settlement_price: U256,
    pub settled_above_strike: bool,
    /// Seconds since epoch of the oracle answer the settlement used.
    pub answer_timestamp: u64,
}

/// Where the market stands relative to settlement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarketPhase {
    NotExpired { remaining_secs: u64 },
    AwaitingSettlement,
    AlreadySettled(MarketState),
}

/// Confirmation of a settlement transaction submitted by this run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettlementReceipt {
    pub transaction_hash: TxHash,
    pub gas_used: Option<U256>,
}

/// Final report of a settlement run, printed as JSON for callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettlementOutcome {
    pub already_settled: bool,
    pub settlement_price: U256,
    pub strike_price: U256,
    pub settled_above_strike: bool,
    pub answer_timestamp: u64,
    /// Only present when this run submitted the settlement transaction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction: Option<SettlementReceipt>,
}
