use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_DEPLOYMENTS_FILE: &str = "deployments/addresses.json";
const DEFAULT_RECEIPT_TIMEOUT_SECS: u64 = 120;

/// Everything a settlement run needs to know about the target network.
///
/// Read once from the environment in `main` and passed down explicitly, so
/// nothing below this touches process-wide state.
#[derive(Debug, Clone)]
pub struct NetworkContext {
    pub network_name: String,
    pub chain_id: u64,
    pub rpc_url: String,
    pub private_key: String,
    /// Registry written by the deploy tooling, keyed `<network>-<chain-id>`.
    pub deployments_file: PathBuf,
    /// Bounded wait for the settlement confirmation receipt.
    pub receipt_timeout: Duration,
}

impl NetworkContext {
    pub fn from_env() -> Result<Self> {
        let network_name =
            std::env::var("NETWORK_NAME").context("NETWORK_NAME must be set")?;

        let chain_id = std::env::var("CHAIN_ID")
            .context("CHAIN_ID must be set")?
            .parse()
            .context("CHAIN_ID must be an unsigned integer")?;

        let rpc_url = std::env::var("RPC_URL").context("RPC_URL must be set")?;

        let private_key =
            std::env::var("PRIVATE_KEY").context("PRIVATE_KEY must be set")?;

        let deployments_file = std::env::var("DEPLOYMENTS_FILE")
            .unwrap_or_else(|_| DEFAULT_DEPLOYMENTS_FILE.to_string())
            .into();

        let receipt_timeout_secs = match std::env::var("RECEIPT_TIMEOUT_SECS") {
            Ok(raw) => raw
                .parse()
                .context("RECEIPT_TIMEOUT_SECS must be an unsigned integer")?,
            Err(_) => DEFAULT_RECEIPT_TIMEOUT_SECS,
        };

        Ok(Self {
            network_name,
            chain_id,
            rpc_url,
            private_key,
            deployments_file,
            receipt_timeout: Duration::from_secs(receipt_timeout_secs),
        })
    }
}
