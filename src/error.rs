use std::path::PathBuf;

use ethers::types::TxHash;
use thiserror::Error;

/// Failure modes of a settlement run.
///
/// None of these are retried internally; a wrapping layer can branch on the
/// kind (or on [`SettleError::exit_code`]) to decide what happens next.
#[derive(Debug, Error)]
pub enum SettleError {
    /// The deployment registry file is absent or unreadable. Deploy the
    /// contracts first, or point `DEPLOYMENTS_FILE` at the right place.
    #[error("no deployment registry at {}: {reason}", .path.display())]
    NoDeploymentRegistry { path: PathBuf, reason: String },

    /// The registry has no entry for the selected network.
    #[error("no deployment found for network {network_key}")]
    NoDeploymentForNetwork { network_key: String },

    /// The registry entry exists but the market contract was never deployed
    /// on this network.
    #[error("market contract not deployed for network {network_key}")]
    MarketNotDeployed { network_key: String },

    /// Settlement was requested before expiry. A timing condition, not a
    /// fault; carries the wait so callers can report when to come back.
    #[error("market has not expired yet, expires in {remaining_secs}s")]
    MarketNotExpired { remaining_secs: u64 },

    /// A read against the chain failed (node unreachable, malformed
    /// response). Safe to retry externally.
    #[error("chain query failed: {0}")]
    ChainQueryFailed(String),

    /// The node rejected the settlement transaction or it reverted on-chain.
    /// Usually means another actor settled first; re-query the market.
    #[error("settlement transaction rejected: {0}")]
    TransactionRejected(String),

    /// The transaction was submitted but no confirmation receipt arrived.
    /// The outcome is unknown: the market may or may not be settled.
    #[error("no confirmation receipt for {tx_hash:?}: {reason}")]
    ReceiptUnavailable { tx_hash: TxHash, reason: String },

    /// The observed market state violates the contract's own invariants
    /// (settlement fields missing on a settled market).
    #[error("inconsistent market state: {0}")]
    InvalidState(&'static str),
}

impl SettleError {
    /// Stable process exit code, one per kind. 1 is reserved for environment
    /// errors raised before a run starts.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NoDeploymentRegistry { .. } => 10,
            Self::NoDeploymentForNetwork { .. } => 11,
            Self::MarketNotDeployed { .. } => 12,
            Self::MarketNotExpired { .. } => 20,
            Self::ChainQueryFailed(_) => 30,
            Self::TransactionRejected(_) => 31,
            Self::ReceiptUnavailable { .. } => 32,
            Self::InvalidState(_) => 70,
        }
    }
}
