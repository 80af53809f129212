use std::collections::HashMap;
use std::fs;
use std::path::Path;

use ethers::types::Address;
use serde::Deserialize;

use crate::error::SettleError;

/// One registry entry, as written by the deploy tooling. Entries carry more
/// fields than we read (price feed address and friends); unknown fields are
/// ignored.
#[derive(Debug, Deserialize)]
pub struct DeploymentRecord {
    #[serde(rename = "myMarketAddress", default)]
    pub market_address: Option<Address>,
}

pub type DeploymentRegistry = HashMap<String, DeploymentRecord>;

/// Networks with the same name can live on different chains, so the registry
/// key carries both.
pub fn network_key(network_name: &str, chain_id: u64) -> String {
    format!("{network_name}-{chain_id}")
}

pub fn load_registry(path: &Path) -> Result<DeploymentRegistry, SettleError> {
    let raw = fs::read_to_string(path).map_err(|e| SettleError::NoDeploymentRegistry {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    serde_json::from_str(&raw).map_err(|e| SettleError::NoDeploymentRegistry {
        path: path.to_path_buf(),
        reason: format!("malformed registry: {e}"),
    })
}

/// Look up the market address recorded for this network. Pure lookup, no
/// chain traffic.
pub fn resolve_market(
    registry: &DeploymentRegistry,
    network_name: &str,
    chain_id: u64,
) -> Result<Address, SettleError> {
    let key = network_key(network_name, chain_id);

    let record = registry
        .get(&key)
        .ok_or_else(|| SettleError::NoDeploymentForNetwork {
            network_key: key.clone(),
        })?;

    record
        .market_address
        .ok_or(SettleError::MarketNotDeployed { network_key: key })
}
