// src/eth/mod.rs

use ethers::prelude::*;

pub mod client;
pub mod live;
pub mod submit;

abigen!(
    MyMarket,
    "./abi/MyMarket.json"
);
