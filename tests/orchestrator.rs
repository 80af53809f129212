use std::sync::Mutex;

use async_trait::async_trait;
use ethers::types::{TxHash, U256};

use marketsettle::error::SettleError;
use marketsettle::market::{snapshot, MarketContract};
use marketsettle::settle::run_settlement;
use marketsettle::types::SettlementReceipt;

const STRIKE: &str = "45000000000000000000";
const ANSWER: &str = "50000000000000000000";
const ANSWER_TS: u64 = 1_754_000_000;

/// In-memory market standing in for the deployed contract.
struct FakeMarket {
    expired: bool,
    remaining_secs: u64,
    /// Simulates another actor winning the settlement race: our submission
    /// always reverts, while reads keep showing the market unsettled (the
    /// competing transaction has not propagated to our node yet).
    contested: bool,
    /// Simulates an unreachable node: every read fails.
    unreachable: bool,
    state: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    settlement: Option<(U256, bool, u64)>,
    settle_calls: u32,
}

impl FakeMarket {
    fn unsettled() -> Self {
        Self {
            expired: true,
            remaining_secs: 0,
            contested: false,
            unreachable: false,
            state: Mutex::default(),
        }
    }

    fn not_expired(remaining_secs: u64) -> Self {
        Self {
            expired: false,
            remaining_secs,
            ..Self::unsettled()
        }
    }

    fn settled() -> Self {
        let market = Self::unsettled();
        market.state.lock().unwrap().settlement =
            Some((U256::from_dec_str(ANSWER).unwrap(), true, ANSWER_TS));
        market
    }

    fn contested() -> Self {
        Self {
            contested: true,
            ..Self::unsettled()
        }
    }

    fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::unsettled()
        }
    }

    fn settle_calls(&self) -> u32 {
        self.state.lock().unwrap().settle_calls
    }

    fn check_node(&self) -> Result<(), SettleError> {
        if self.unreachable {
            return Err(SettleError::ChainQueryFailed("connection refused".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl MarketContract for FakeMarket {
    async fn has_expired(&self) -> Result<bool, SettleError> {
        self.check_node()?;
        Ok(self.expired)
    }

    async fn time_until_expiry(&self) -> Result<u64, SettleError> {
        self.check_node()?;
        Ok(self.remaining_secs)
    }

    async fn is_settled(&self) -> Result<bool, SettleError> {
        self.check_node()?;
        if self.contested {
            return Ok(false);
        }
        Ok(self.state.lock().unwrap().settlement.is_some())
    }

    async fn strike_price(&self) -> Result<U256, SettleError> {
        self.check_node()?;
        Ok(U256::from_dec_str(STRIKE).unwrap())
    }

    async fn settlement_price(&self) -> Result<U256, SettleError> {
        self.state
            .lock()
            .unwrap()
            .settlement
            .map(|(price, _, _)| price)
            .ok_or(SettleError::InvalidState("settlementPrice read before settlement"))
    }

    async fn settled_above_strike(&self) -> Result<bool, SettleError> {
        self.state
            .lock()
            .unwrap()
            .settlement
            .map(|(_, above, _)| above)
            .ok_or(SettleError::InvalidState("settledAboveStrike read before settlement"))
    }

    async fn answer_timestamp(&self) -> Result<u64, SettleError> {
        self.state
            .lock()
            .unwrap()
            .settlement
            .map(|(_, _, ts)| ts)
            .ok_or(SettleError::InvalidState("answerTimestamp read before settlement"))
    }

    async fn settle_market(&self) -> Result<SettlementReceipt, SettleError> {
        let mut inner = self.state.lock().unwrap();
        inner.settle_calls += 1;

        if self.contested || inner.settlement.is_some() {
            return Err(SettleError::TransactionRejected(
                "execution reverted: market already settled".into(),
            ));
        }

        inner.settlement = Some((U256::from_dec_str(ANSWER).unwrap(), true, ANSWER_TS));

        Ok(SettlementReceipt {
            transaction_hash: TxHash::from_low_u64_be(0xfeed),
            gas_used: Some(U256::from(84_211)),
        })
    }
}

#[tokio::test]
async fn settles_an_expired_unsettled_market() {
    let market = FakeMarket::unsettled();

    let outcome = run_settlement(&market).await.unwrap();

    assert!(!outcome.already_settled);
    assert!(outcome.settled_above_strike);
    assert_eq!(outcome.settlement_price, U256::from_dec_str(ANSWER).unwrap());
    assert_eq!(outcome.strike_price, U256::from_dec_str(STRIKE).unwrap());

    let tx = outcome.transaction.expect("fresh settlement carries a receipt");
    assert_eq!(tx.transaction_hash, TxHash::from_low_u64_be(0xfeed));
    assert_eq!(tx.gas_used, Some(U256::from(84_211)));

    assert_eq!(market.settle_calls(), 1);
}

#[tokio::test]
async fn second_run_is_a_no_op_with_the_same_report() {
    let market = FakeMarket::unsettled();

    let first = run_settlement(&market).await.unwrap();
    let second = run_settlement(&market).await.unwrap();

    assert!(!first.already_settled);
    assert!(second.already_settled);
    assert!(second.transaction.is_none());

    assert_eq!(second.settlement_price, first.settlement_price);
    assert_eq!(second.strike_price, first.strike_price);
    assert_eq!(second.settled_above_strike, first.settled_above_strike);
    assert_eq!(second.answer_timestamp, first.answer_timestamp);

    // The transaction from the first run is the only one ever submitted.
    assert_eq!(market.settle_calls(), 1);
}

#[tokio::test]
async fn already_settled_market_is_reported_without_a_transaction() {
    let market = FakeMarket::settled();

    let outcome = run_settlement(&market).await.unwrap();

    assert!(outcome.already_settled);
    assert!(outcome.transaction.is_none());
    assert!(outcome.settled_above_strike);
    assert_eq!(outcome.settlement_price, U256::from_dec_str(ANSWER).unwrap());
    assert_eq!(outcome.answer_timestamp, ANSWER_TS);
    assert_eq!(market.settle_calls(), 0);
}

#[tokio::test]
async fn unexpired_market_is_never_settled() {
    let market = FakeMarket::not_expired(3_600);

    let err = run_settlement(&market).await.unwrap_err();

    assert!(matches!(
        err,
        SettleError::MarketNotExpired {
            remaining_secs: 3_600
        }
    ));
    assert_eq!(market.settle_calls(), 0);
}

#[tokio::test]
async fn losing_the_settlement_race_surfaces_the_rejection() {
    let market = FakeMarket::contested();

    let err = run_settlement(&market).await.unwrap_err();

    assert!(matches!(err, SettleError::TransactionRejected(_)));
    assert_eq!(market.settle_calls(), 1);
}

#[tokio::test]
async fn query_failures_abort_the_run() {
    let market = FakeMarket::unreachable();

    let err = run_settlement(&market).await.unwrap_err();

    assert!(matches!(err, SettleError::ChainQueryFailed(_)));
    assert_eq!(market.settle_calls(), 0);
}

#[tokio::test]
async fn unsettled_snapshot_carries_no_settlement_fields() {
    let market = FakeMarket::unsettled();

    let state = snapshot(&market).await.unwrap();

    assert!(state.settlement.is_none());
    assert_eq!(state.strike_price, U256::from_dec_str(STRIKE).unwrap());
}
