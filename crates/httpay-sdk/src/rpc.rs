//! Cosmos REST (LCD) query capability

use crate::config::SdkConfig;
use async_trait::async_trait;
use base64::Engine;
use httpay_types::{ChainError, ChainQuerier, ConfigError, HttpayError, TxEvent, TxOutcome};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// `ChainQuerier` over the Cosmos REST gateway
#[derive(Debug, Clone)]
pub struct LcdQuerier {
    endpoint: String,
    client: Client,
}

impl LcdQuerier {
    /// Use the configured `restEndpoint`
    pub fn new(config: &SdkConfig) -> Result<Self, HttpayError> {
        let endpoint = config
            .rest_endpoint
            .as_deref()
            .ok_or(ConfigError::MissingField { field: "restEndpoint" })?;
        Self::with_endpoint(endpoint, DEFAULT_TIMEOUT)
    }

    pub fn with_endpoint(endpoint: &str, timeout: Duration) -> Result<Self, HttpayError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ChainError::Network(e.to_string()))?;
        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn get(&self, path: &str) -> Result<(StatusCode, Value), ChainError> {
        let url = format!("{}{}", self.endpoint, path);
        debug!(%url, "LCD request");

        let resp = self.client.get(&url).send().await.map_err(transport_error)?;
        let status = resp.status();
        let body = resp.text().await.map_err(transport_error)?;
        let value = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&body).map_err(|e| {
                ChainError::InvalidResponse(format!("{} (HTTP {})", e, status.as_u16()))
            })?
        };
        Ok((status, value))
    }
}

fn transport_error(err: reqwest::Error) -> ChainError {
    if err.is_timeout() {
        ChainError::Timeout(err.to_string())
    } else {
        ChainError::Network(err.to_string())
    }
}

/// Message carried by a gateway error body
fn error_message(status: StatusCode, body: &Value) -> String {
    body.get("message")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
}

/// Smart-query path segment: standard base64, percent-encoded
fn encode_query(msg: &Value) -> String {
    let raw = base64::engine::general_purpose::STANDARD.encode(msg.to_string());
    raw.replace('+', "%2B").replace('/', "%2F").replace('=', "%3D")
}

#[derive(Deserialize)]
struct SmartQueryResponse {
    data: Value,
}

#[derive(Deserialize)]
struct LatestBlockResponse {
    #[serde(default)]
    block: Option<BlockBody>,
    #[serde(default)]
    sdk_block: Option<BlockBody>,
}

#[derive(Deserialize)]
struct BlockBody {
    header: BlockHeader,
}

#[derive(Deserialize)]
struct BlockHeader {
    height: String,
}

#[derive(Deserialize)]
struct GetTxResponse {
    tx_response: TxResponse,
}

#[derive(Deserialize)]
struct TxResponse {
    txhash: String,
    height: String,
    #[serde(default)]
    code: u32,
    #[serde(default)]
    raw_log: String,
    #[serde(default)]
    events: Vec<TxEvent>,
}

/// Map a smart-query answer; 404 means the contract or item is absent
fn smart_query_result(status: StatusCode, body: Value) -> Result<Value, ChainError> {
    if status == StatusCode::NOT_FOUND {
        return Err(ChainError::NotFound(error_message(status, &body)));
    }
    if !status.is_success() {
        return Err(ChainError::classify(error_message(status, &body)));
    }
    let resp: SmartQueryResponse =
        serde_json::from_value(body).map_err(|e| ChainError::InvalidResponse(e.to_string()))?;
    Ok(resp.data)
}

fn block_height_result(status: StatusCode, body: Value) -> Result<u64, ChainError> {
    if !status.is_success() {
        return Err(ChainError::classify(error_message(status, &body)));
    }
    let resp: LatestBlockResponse =
        serde_json::from_value(body).map_err(|e| ChainError::InvalidResponse(e.to_string()))?;
    let header = resp
        .sdk_block
        .or(resp.block)
        .map(|b| b.header)
        .ok_or_else(|| ChainError::InvalidResponse("latest block has no header".to_string()))?;
    header
        .height
        .parse()
        .map_err(|_| ChainError::InvalidResponse(format!("bad block height '{}'", header.height)))
}

/// Map a tx lookup; a hash the node has not indexed yet is `Ok(None)`
fn tx_lookup_result(status: StatusCode, body: Value) -> Result<Option<TxOutcome>, ChainError> {
    if status == StatusCode::NOT_FOUND {
        return Ok(None);
    }
    if !status.is_success() {
        let message = error_message(status, &body);
        // Some gateways answer 400/500 for a hash that is not indexed yet.
        if message.to_lowercase().contains("not found") {
            return Ok(None);
        }
        return Err(ChainError::classify(message));
    }

    let resp: GetTxResponse =
        serde_json::from_value(body).map_err(|e| ChainError::InvalidResponse(e.to_string()))?;
    let tx = resp.tx_response;
    let height = tx
        .height
        .parse()
        .map_err(|_| ChainError::InvalidResponse(format!("bad tx height '{}'", tx.height)))?;
    Ok(Some(TxOutcome {
        tx_hash: tx.txhash,
        height,
        code: tx.code,
        raw_log: tx.raw_log,
        events: tx.events,
    }))
}

#[async_trait]
impl ChainQuerier for LcdQuerier {
    async fn query_smart(&self, contract: &str, msg: &Value) -> Result<Value, ChainError> {
        let path = format!(
            "/cosmwasm/wasm/v1/contract/{}/smart/{}",
            contract,
            encode_query(msg)
        );
        let (status, body) = self.get(&path).await?;
        smart_query_result(status, body)
    }

    async fn block_height(&self) -> Result<u64, ChainError> {
        let (status, body) = self
            .get("/cosmos/base/tendermint/v1beta1/blocks/latest")
            .await?;
        block_height_result(status, body)
    }

    async fn tx(&self, tx_hash: &str) -> Result<Option<TxOutcome>, ChainError> {
        let (status, body) = self.get(&format!("/cosmos/tx/v1beta1/txs/{}", tx_hash)).await?;
        tx_lookup_result(status, body)
    }
}
