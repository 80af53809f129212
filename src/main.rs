use chrono::Utc;

use marketsettle::config::NetworkContext;
use marketsettle::error::SettleError;
use marketsettle::settle;
use marketsettle::types::SettlementOutcome;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    // Load env
    dotenvy::dotenv().ok();

    let ctx = match NetworkContext::from_env() {
        Ok(ctx) => ctx,
        Err(e) => {
            tracing::error!("invalid network context: {e:#}");
            std::process::exit(1);
        }
    };

    tracing::info!(
        network = %ctx.network_name,
        chain_id = ctx.chain_id,
        "running market settlement"
    );

    match settle::run(&ctx).await {
        Ok(outcome) => report_outcome(&outcome),
        Err(err) => {
            report_failure(&err);
            std::process::exit(err.exit_code());
        }
    }
}

fn report_outcome(outcome: &SettlementOutcome) {
    if outcome.already_settled {
        tracing::warn!("market is already settled, nothing to do");
    }

    let answered_at = chrono::DateTime::from_timestamp(outcome.answer_timestamp as i64, 0)
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| outcome.answer_timestamp.to_string());

    tracing::info!(
        settlement_price = %outcome.settlement_price,
        strike_price = %outcome.strike_price,
        answered_at = %answered_at,
        "settlement details"
    );

    if let Some(tx) = &outcome.transaction {
        tracing::info!(
            tx_hash = ?tx.transaction_hash,
            gas_used = ?tx.gas_used,
            "settlement confirmed"
        );
    }

    if outcome.settled_above_strike {
        tracing::info!("market settled above the strike price");
    } else {
        tracing::info!("market settled below the strike price");
    }

    println!(
        "{}",
        serde_json::to_string_pretty(outcome).expect("outcome is serializable")
    );
}

fn report_failure(err: &SettleError) {
    match err {
        SettleError::MarketNotExpired { remaining_secs } => {
            let expires_at = Utc::now() + chrono::Duration::seconds(*remaining_secs as i64);
            tracing::warn!(
                remaining_secs = *remaining_secs,
                expires_at = %expires_at.to_rfc3339(),
                "market has not expired yet"
            );
        }
        SettleError::ReceiptUnavailable { tx_hash, reason } => {
            tracing::error!(?tx_hash, "settlement outcome unknown: {reason}");
            tracing::error!("the transaction may still confirm, re-run to check the market state");
        }
        other => {
            tracing::error!(exit_code = other.exit_code(), "settlement failed: {other}");
        }
    }
}
