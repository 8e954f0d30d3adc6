//! In-memory chain for integration tests
//!
//! Implements both capability traits over a tiny model of the registry and
//! escrow contracts, with knobs for the failure modes the SDK must handle.

#![allow(dead_code)]

use async_trait::async_trait;
use httpay_sdk::{
    defaults_for, BroadcastResponse, Broadcaster, ChainError, ChainQuerier, ExecuteEnvelope,
    SdkConfig, TxEvent, TxOutcome, Uint128, MAX_ESCROW_BLOCKS,
};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub const REGISTRY: &str = "neutron1registry";
pub const ESCROW: &str = "neutron1escrow";
pub const PAYER: &str = "neutron1payer";
pub const PROVIDER: &str = "neutron1provider";

pub fn testnet_config() -> Arc<SdkConfig> {
    Arc::new(
        defaults_for("testnet")
            .with_contracts(REGISTRY, ESCROW)
            .build()
            .expect("testnet config"),
    )
}

#[derive(Debug, Clone)]
pub struct MockOptions {
    /// Return lock events with the broadcast (otherwise only the hash)
    pub emit_events: bool,
    /// Fixed hash for every broadcast
    pub tx_hash: Option<String>,
    /// Time spent inside `sign_and_broadcast`
    pub broadcast_delay: Duration,
    /// `tx` lookups answered with `None` before the tx shows up
    pub index_after_polls: usize,
    /// Accept broadcasts but fail them in the block with this log
    pub fail_in_block: Option<String>,
}

impl Default for MockOptions {
    fn default() -> Self {
        Self {
            emit_events: true,
            tx_hash: None,
            broadcast_delay: Duration::ZERO,
            index_after_polls: 0,
            fail_in_block: None,
        }
    }
}

#[derive(Default)]
struct ChainState {
    height: u64,
    balance: u128,
    tools: Vec<Value>,
    escrows: BTreeMap<u64, Value>,
    next_escrow: u64,
    txs: HashMap<String, TxOutcome>,
    tx_count: u64,
}

pub struct MockChain {
    sender: String,
    options: MockOptions,
    state: Mutex<ChainState>,
    broadcasts: AtomicUsize,
    tx_polls: AtomicUsize,
}

impl MockChain {
    pub fn new(options: MockOptions) -> Arc<Self> {
        Self::with_sender(PAYER, options)
    }

    pub fn with_sender(sender: &str, options: MockOptions) -> Arc<Self> {
        Arc::new(Self {
            sender: sender.to_string(),
            options,
            state: Mutex::new(ChainState {
                height: 1_000,
                balance: 100_000_000,
                next_escrow: 1,
                ..Default::default()
            }),
            broadcasts: AtomicUsize::new(0),
            tx_polls: AtomicUsize::new(0),
        })
    }

    /// Insert a tool owned by `PROVIDER`
    pub fn seed_tool(&self, tool_id: &str, price: u128, is_active: bool) {
        self.state.lock().tools.push(json!({
            "tool_id": tool_id,
            "provider": PROVIDER,
            "price": price.to_string(),
            "denom": "untrn",
            "is_active": is_active,
            "description": format!("{} tool", tool_id),
            "endpoint": format!("https://{}.example.com", tool_id),
        }));
    }

    pub fn set_balance(&self, balance: u128) {
        self.state.lock().balance = balance;
    }

    pub fn advance_blocks(&self, blocks: u64) {
        self.state.lock().height += blocks;
    }

    pub fn escrow_count(&self) -> usize {
        self.state.lock().escrows.len()
    }

    pub fn escrow(&self, id: u64) -> Option<Value> {
        self.state.lock().escrows.get(&id).cloned()
    }

    pub fn broadcast_count(&self) -> usize {
        self.broadcasts.load(Ordering::SeqCst)
    }

    fn execute(&self, state: &mut ChainState, call: &ExecuteEnvelope) -> Result<Vec<TxEvent>, ChainError> {
        let (action, body) = call
            .msg
            .as_object()
            .and_then(|m| m.iter().next())
            .ok_or_else(|| ChainError::Rejected("empty message".to_string()))?;

        match action.as_str() {
            "register_tool" => {
                let id = body["tool_id"].clone();
                if state.tools.iter().any(|t| t["tool_id"] == id) {
                    return Err(ChainError::classify("Tool ID already exists"));
                }
                state.tools.push(json!({
                    "tool_id": id,
                    "provider": self.sender,
                    "price": body["price"],
                    "denom": body.get("denom").cloned().unwrap_or(json!("untrn")),
                    "is_active": true,
                    "description": body["description"],
                    "endpoint": body["endpoint"],
                }));
                Ok(vec![])
            }
            "update_price" | "pause_tool" | "resume_tool" => {
                let tool = state
                    .tools
                    .iter_mut()
                    .find(|t| t["tool_id"] == body["tool_id"])
                    .ok_or_else(|| ChainError::classify("Tool not found"))?;
                match action.as_str() {
                    "update_price" => tool["price"] = body["price"].clone(),
                    "pause_tool" => tool["is_active"] = json!(false),
                    _ => tool["is_active"] = json!(true),
                }
                Ok(vec![])
            }
            "lock_funds" => self.lock_funds(state, call, body),
            "release" => {
                let id = body["escrow_id"].as_u64().unwrap_or_default();
                let escrow = state
                    .escrows
                    .get(&id)
                    .ok_or_else(|| ChainError::classify("Escrow not found"))?;
                if state.height > escrow["expires"].as_u64().unwrap_or_default() {
                    return Err(ChainError::classify("Escrow already expired"));
                }
                state.escrows.remove(&id);
                Ok(vec![TxEvent::new("wasm-toolpay.released", [("escrow_id", id.to_string())])])
            }
            "refund_expired" => {
                let id = body["escrow_id"].as_u64().unwrap_or_default();
                let escrow = state
                    .escrows
                    .get(&id)
                    .ok_or_else(|| ChainError::classify("Escrow not found"))?;
                if state.height <= escrow["expires"].as_u64().unwrap_or_default() {
                    return Err(ChainError::classify("Escrow not yet expired"));
                }
                state.escrows.remove(&id);
                Ok(vec![TxEvent::new("wasm-toolpay.refunded", [("escrow_id", id.to_string())])])
            }
            other => Err(ChainError::Rejected(format!("unknown action {}", other))),
        }
    }

    fn lock_funds(
        &self,
        state: &mut ChainState,
        call: &ExecuteEnvelope,
        body: &Value,
    ) -> Result<Vec<TxEvent>, ChainError> {
        let tool = state
            .tools
            .iter()
            .find(|t| t["tool_id"] == body["tool_id"] && t["is_active"] == json!(true))
            .cloned()
            .ok_or_else(|| ChainError::classify("Tool not found or inactive"))?;

        let max_fee: Uint128 = serde_json::from_value(body["max_fee"].clone())
            .map_err(|e| ChainError::Rejected(e.to_string()))?;
        let attached = call
            .funds
            .iter()
            .find(|c| c.denom == tool["denom"])
            .map(|c| c.amount)
            .unwrap_or_default();
        if attached < max_fee {
            return Err(ChainError::classify(format!(
                "Insufficient funds: required {}, but only {} was sent",
                max_fee, attached
            )));
        }
        if state.balance < attached.u128() {
            return Err(ChainError::classify(format!(
                "insufficient funds: {}untrn is smaller than {}untrn",
                state.balance, attached
            )));
        }

        let expires = body["expires"].as_u64().unwrap_or_default();
        if expires.saturating_sub(state.height) > MAX_ESCROW_BLOCKS {
            return Err(ChainError::classify("Escrow expiration too far in future"));
        }

        state.balance -= attached.u128();
        let id = state.next_escrow;
        state.next_escrow += 1;
        state.escrows.insert(
            id,
            json!({
                "escrow_id": id,
                "caller": self.sender,
                "provider": tool["provider"],
                "max_fee": max_fee,
                "denom": tool["denom"],
                "expires": expires,
                "auth_token": body["auth_token"],
            }),
        );

        Ok(vec![
            TxEvent::new("wasm", [("action", "lock_funds".to_string()), ("escrow_id", id.to_string())]),
            TxEvent::new(
                "wasm-toolpay.locked",
                [("escrow_id", id.to_string()), ("tool_id", body["tool_id"].as_str().unwrap_or_default().to_string())],
            ),
        ])
    }
}

#[async_trait]
impl Broadcaster for MockChain {
    fn sender(&self) -> &str {
        &self.sender
    }

    async fn sign_and_broadcast(
        &self,
        calls: &[ExecuteEnvelope],
    ) -> Result<BroadcastResponse, ChainError> {
        self.broadcasts.fetch_add(1, Ordering::SeqCst);
        if !self.options.broadcast_delay.is_zero() {
            tokio::time::sleep(self.options.broadcast_delay).await;
        }

        let mut state = self.state.lock();
        state.tx_count += 1;
        let tx_hash = self
            .options
            .tx_hash
            .clone()
            .unwrap_or_else(|| format!("TX{:04}", state.tx_count));

        if let Some(raw_log) = &self.options.fail_in_block {
            let outcome = TxOutcome {
                tx_hash: tx_hash.clone(),
                height: state.height,
                code: 5,
                raw_log: raw_log.clone(),
                events: Vec::new(),
            };
            state.txs.insert(tx_hash.clone(), outcome);
            return Ok(BroadcastResponse {
                tx_hash,
                events: Vec::new(),
            });
        }

        let mut events = Vec::new();
        for call in calls {
            events.extend(self.execute(&mut state, call)?);
        }

        let outcome = TxOutcome {
            tx_hash: tx_hash.clone(),
            height: state.height,
            code: 0,
            raw_log: String::new(),
            events: events.clone(),
        };
        state.txs.insert(tx_hash.clone(), outcome);

        Ok(BroadcastResponse {
            tx_hash,
            events: if self.options.emit_events { events } else { Vec::new() },
        })
    }
}

#[async_trait]
impl ChainQuerier for MockChain {
    async fn query_smart(&self, contract: &str, msg: &Value) -> Result<Value, ChainError> {
        let state = self.state.lock();
        match contract {
            REGISTRY => {
                if let Some(q) = msg.get("get_tool") {
                    Ok(state
                        .tools
                        .iter()
                        .find(|t| t["tool_id"] == q["tool_id"])
                        .cloned()
                        .unwrap_or(Value::Null))
                } else if msg.get("get_tools").is_some() {
                    Ok(json!({ "tools": state.tools }))
                } else {
                    Err(ChainError::Rejected("unknown registry query".to_string()))
                }
            }
            ESCROW => {
                let id = msg["get_escrow"]["escrow_id"].as_u64().unwrap_or_default();
                state
                    .escrows
                    .get(&id)
                    .cloned()
                    .ok_or_else(|| ChainError::classify("Escrow not found"))
            }
            other => Err(ChainError::NotFound(format!("contract {}", other))),
        }
    }

    async fn block_height(&self) -> Result<u64, ChainError> {
        Ok(self.state.lock().height)
    }

    async fn tx(&self, tx_hash: &str) -> Result<Option<TxOutcome>, ChainError> {
        let polls = self.tx_polls.fetch_add(1, Ordering::SeqCst);
        if polls < self.options.index_after_polls {
            return Ok(None);
        }
        Ok(self.state.lock().txs.get(tx_hash).cloned())
    }
}
