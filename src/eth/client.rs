// src/eth/client.rs

use std::sync::Arc;

use anyhow::Result;
use ethers::prelude::*;

use super::MyMarket;
use crate::config::NetworkContext;

pub type MarketClient = SignerMiddleware<Provider<Http>, LocalWallet>;

/// Attach to the deployed market over JSON-RPC with a signing wallet.
pub async fn connect(
    ctx: &NetworkContext,
    address: Address,
) -> Result<MyMarket<MarketClient>> {
    let provider = Provider::<Http>::try_from(ctx.rpc_url.as_str())?;

    let wallet: LocalWallet = ctx.private_key.parse()?;
    let wallet = wallet.with_chain_id(ctx.chain_id);

    let client = SignerMiddleware::new(provider, wallet);

    Ok(MyMarket::new(address, Arc::new(client)))
}
