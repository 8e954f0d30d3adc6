//! Chain capabilities and contract-call envelopes
//!
//! The SDK never signs or executes anything itself. It builds envelopes and
//! hands them to two host-supplied capabilities: a `Broadcaster` that signs
//! and broadcasts, and a read-only `ChainQuerier`.

use crate::{ChainError, Coin, HttpayError, Result, TransactionResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An execute message addressed to a contract, not yet signed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecuteEnvelope {
    /// Contract address
    pub contract: String,
    /// JSON execute message
    pub msg: Value,
    /// Funds attached to the call
    pub funds: Vec<Coin>,
}

impl ExecuteEnvelope {
    /// Serialize a typed message into an envelope
    pub fn new<M: Serialize>(contract: impl Into<String>, msg: &M, funds: Vec<Coin>) -> Result<Self> {
        Ok(Self {
            contract: contract.into(),
            msg: serde_json::to_value(msg)?,
            funds,
        })
    }

    /// Name of the contract action (the message's outer key)
    pub fn action(&self) -> Option<&str> {
        self.msg
            .as_object()
            .and_then(|obj| obj.keys().next())
            .map(String::as_str)
    }
}

/// A smart query addressed to a contract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryEnvelope {
    /// Contract address
    pub contract: String,
    /// JSON query message
    pub msg: Value,
}

impl QueryEnvelope {
    /// Serialize a typed query into an envelope
    pub fn new<M: Serialize>(contract: impl Into<String>, msg: &M) -> Result<Self> {
        Ok(Self {
            contract: contract.into(),
            msg: serde_json::to_value(msg)?,
        })
    }

    /// Run the query through a querier
    pub async fn run(&self, querier: &dyn ChainQuerier) -> std::result::Result<Value, ChainError> {
        querier.query_smart(&self.contract, &self.msg).await
    }
}

/// A key/value attribute on a transaction event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventAttribute {
    pub key: String,
    pub value: String,
}

/// A transaction event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxEvent {
    /// Event type (e.g. "wasm-toolpay.locked")
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub attributes: Vec<EventAttribute>,
}

impl TxEvent {
    /// Create an event from key/value pairs
    pub fn new<K, V>(kind: impl Into<String>, attributes: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            kind: kind.into(),
            attributes: attributes
                .into_iter()
                .map(|(k, v)| EventAttribute {
                    key: k.into(),
                    value: v.into(),
                })
                .collect(),
        }
    }

    /// Look up an attribute value
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.key == key)
            .map(|a| a.value.as_str())
    }
}

/// What the broadcaster reports back
///
/// `events` may be empty when the host only learns the hash at broadcast
/// time; callers then look the transaction up through `ChainQuerier::tx`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BroadcastResponse {
    pub tx_hash: String,
    #[serde(default)]
    pub events: Vec<TxEvent>,
}

impl BroadcastResponse {
    /// A response carrying only the hash
    pub fn hash_only(tx_hash: impl Into<String>) -> Self {
        Self {
            tx_hash: tx_hash.into(),
            events: Vec::new(),
        }
    }
}

/// An included transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxOutcome {
    pub tx_hash: String,
    pub height: u64,
    /// ABCI result code, 0 on success
    pub code: u32,
    #[serde(default)]
    pub raw_log: String,
    #[serde(default)]
    pub events: Vec<TxEvent>,
}

impl TxOutcome {
    /// Check if the transaction executed successfully
    pub fn is_success(&self) -> bool {
        self.code == 0
    }

    /// Turn a failed execution into the matching chain error
    pub fn into_result(self) -> std::result::Result<Self, ChainError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ChainError::classify(self.raw_log))
        }
    }
}

/// Signing and broadcast capability supplied by the host wallet
#[async_trait]
pub trait Broadcaster: Send + Sync {
    /// Address that signs the transactions
    fn sender(&self) -> &str;

    /// Sign the calls into one transaction and broadcast it
    async fn sign_and_broadcast(
        &self,
        calls: &[ExecuteEnvelope],
    ) -> std::result::Result<BroadcastResponse, ChainError>;
}

/// Read-only chain access
#[async_trait]
pub trait ChainQuerier: Send + Sync {
    /// Smart-query a contract
    async fn query_smart(&self, contract: &str, msg: &Value) -> std::result::Result<Value, ChainError>;

    /// Latest block height
    async fn block_height(&self) -> std::result::Result<u64, ChainError>;

    /// Look up a transaction; `None` while it is not yet indexed
    async fn tx(&self, tx_hash: &str) -> std::result::Result<Option<TxOutcome>, ChainError>;
}

/// Broadcast a single call and fold the outcome into a `TransactionResult`
pub async fn submit_envelope(
    broadcaster: &dyn Broadcaster,
    envelope: &ExecuteEnvelope,
) -> TransactionResult {
    match broadcaster.sign_and_broadcast(std::slice::from_ref(envelope)).await {
        Ok(resp) => TransactionResult::submitted(resp.tx_hash),
        Err(err) => TransactionResult::failed(&HttpayError::from(err)),
    }
}

/// Decode a smart-query response into a typed value
pub fn decode_response<T: serde::de::DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| {
        HttpayError::Chain(ChainError::InvalidResponse(e.to_string()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_action() {
        let env = ExecuteEnvelope::new(
            "neutron1registry",
            &json!({"pause_tool": {"tool_id": "weather-api"}}),
            vec![],
        )
        .unwrap();
        assert_eq!(env.action(), Some("pause_tool"));
    }

    #[test]
    fn test_event_attribute_lookup() {
        let event = TxEvent::new("wasm-toolpay.locked", [("escrow_id", "12"), ("tool_id", "weather-api")]);
        assert_eq!(event.attribute("escrow_id"), Some("12"));
        assert_eq!(event.attribute("caller"), None);
    }

    #[test]
    fn test_failed_outcome_is_classified() {
        let outcome = TxOutcome {
            tx_hash: "ABC".to_string(),
            height: 10,
            code: 5,
            raw_log: "insufficient funds: 10untrn is smaller than 1000000untrn".to_string(),
            events: vec![],
        };
        assert!(matches!(outcome.into_result(), Err(ChainError::InsufficientFunds(_))));
    }
}
