mod json_rpc;

pub use json_rpc::JsonRpcClient;

use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use thiserror::Error;

use crate::config::BlockId;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("response to {0} has no result")]
    MissingResult(&'static str),
    #[error("invalid hex quantity: {0}")]
    InvalidQuantity(String),
}

/// The execution layer calls needed to read a balance.
#[async_trait]
pub trait ExecutionNode {
    async fn client_version(&self) -> Result<String, RpcError>;
    async fn chain_id(&self) -> Result<u64, RpcError>;
    async fn get_balance(&self, address: &Address, block: &BlockId) -> Result<U256, RpcError>;
}
