use std::time::Duration;

use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::config::BlockId;

use super::{ExecutionNode, RpcError};

#[derive(Deserialize)]
struct JsonRpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Deserialize)]
struct JsonRpcResponse<T> {
    result: Option<T>,
    error: Option<JsonRpcErrorObject>,
}

fn decode_quantity(quantity: &str) -> Result<U256, RpcError> {
    quantity
        .strip_prefix("0x")
        .filter(|digits| !digits.is_empty())
        .and_then(|digits| U256::from_str_radix(digits, 16).ok())
        .ok_or_else(|| RpcError::InvalidQuantity(quantity.to_string()))
}

/// Talks JSON-RPC 2.0 over HTTP to a single execution node.
pub struct JsonRpcClient {
    url: String,
    client: reqwest::Client,
}

impl JsonRpcClient {
    pub fn new(url: &str, timeout: Duration) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            url: url.to_string(),
            client,
        })
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: &'static str,
        params: Value,
    ) -> Result<T, RpcError> {
        let payload = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        debug!(%payload, url = %self.url, "sending rpc request");

        let response: JsonRpcResponse<T> = self
            .client
            .post(&self.url)
            .json(&payload)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        match response {
            JsonRpcResponse {
                error: Some(JsonRpcErrorObject { code, message }),
                ..
            } => Err(RpcError::Rpc { code, message }),
            JsonRpcResponse {
                result: Some(result),
                ..
            } => Ok(result),
            _ => Err(RpcError::MissingResult(method)),
        }
    }
}

#[async_trait]
impl ExecutionNode for JsonRpcClient {
    async fn client_version(&self) -> Result<String, RpcError> {
        self.request("web3_clientVersion", json!([])).await
    }

    async fn chain_id(&self) -> Result<u64, RpcError> {
        let quantity: String = self.request("eth_chainId", json!([])).await?;
        let chain_id = decode_quantity(&quantity)?;
        u64::try_from(chain_id).map_err(|_| RpcError::InvalidQuantity(quantity))
    }

    async fn get_balance(&self, address: &Address, block: &BlockId) -> Result<U256, RpcError> {
        let quantity: String = self
            .request(
                "eth_getBalance",
                json!([address.to_checksum(None), block.to_rpc_param()]),
            )
            .await?;

        let balance = decode_quantity(&quantity)?;

        debug!(%address, %block, %balance, "fetched balance");

        Ok(balance)
    }
}
