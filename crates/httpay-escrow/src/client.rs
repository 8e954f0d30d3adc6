//! Escrow client

use crate::msg::{
    CollectedFeesResponse, EscrowExecuteMsg, EscrowQueryMsg, EscrowResponse, LOCKED_EVENT,
};
use httpay_types::{
    decode_response, submit_envelope, validate_denom, AuthToken, Broadcaster, ChainError,
    ChainQuerier, Coin, EscrowId, EscrowRecord, ExecuteEnvelope, HttpayError, QueryEnvelope,
    Result, SelectedTool, TransactionResult, TxEvent, Uint128, MAX_ESCROW_BLOCKS,
};
use std::sync::Arc;
use tracing::{debug, info};

/// Client for the escrow contract
#[derive(Clone)]
pub struct EscrowClient {
    address: String,
    querier: Arc<dyn ChainQuerier>,
}

impl EscrowClient {
    /// Create a client for the escrow at `address`
    pub fn new(address: impl Into<String>, querier: Arc<dyn ChainQuerier>) -> Self {
        Self {
            address: address.into(),
            querier,
        }
    }

    /// Escrow contract address
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Query capability used by this client
    pub fn querier(&self) -> &Arc<dyn ChainQuerier> {
        &self.querier
    }

    // ========================================================================
    // Execute Builders
    // ========================================================================

    /// Build a `lock_funds` call for exactly the advertised price
    ///
    /// The amount and denom must match the tool snapshot the payer agreed
    /// to; the same amount is attached as funds and committed as `max_fee`.
    pub fn lock(
        &self,
        advertised: &SelectedTool,
        amount: Uint128,
        denom: &str,
        auth_token: &AuthToken,
        expires: u64,
    ) -> Result<ExecuteEnvelope> {
        if amount != advertised.price {
            return Err(HttpayError::validation(
                "amount",
                format!(
                    "{} does not match the advertised price {} for '{}'",
                    amount, advertised.price, advertised.tool_id
                ),
            ));
        }
        if denom != advertised.denom {
            return Err(HttpayError::validation(
                "denom",
                format!(
                    "{} does not match the advertised denom {} for '{}'",
                    denom, advertised.denom, advertised.tool_id
                ),
            ));
        }
        validate_denom(denom)?;
        if amount.is_zero() {
            return Err(HttpayError::validation("amount", "must be greater than zero"));
        }

        debug!(tool_id = %advertised.tool_id, %amount, denom, expires, "Building lock_funds");
        ExecuteEnvelope::new(
            &self.address,
            &EscrowExecuteMsg::LockFunds {
                tool_id: advertised.tool_id.to_string(),
                max_fee: amount,
                auth_token: auth_token.as_str().to_string(),
                expires,
            },
            vec![Coin::new(amount, denom)],
        )
    }

    /// Build a `release` call claiming `usage_fee` (base units) for the provider
    pub fn release(&self, escrow_id: EscrowId, usage_fee: &str) -> Result<ExecuteEnvelope> {
        let usage_fee = Uint128::parse("usage_fee", usage_fee)?;
        ExecuteEnvelope::new(
            &self.address,
            &EscrowExecuteMsg::Release {
                escrow_id: escrow_id.value(),
                usage_fee,
            },
            Vec::new(),
        )
    }

    /// Build a `refund_expired` call
    pub fn refund(&self, escrow_id: EscrowId) -> Result<ExecuteEnvelope> {
        ExecuteEnvelope::new(
            &self.address,
            &EscrowExecuteMsg::RefundExpired {
                escrow_id: escrow_id.value(),
            },
            Vec::new(),
        )
    }

    /// Build a `claim_fees` call (contract owner only)
    pub fn claim_fees(&self, denom: Option<&str>) -> Result<ExecuteEnvelope> {
        if let Some(denom) = denom {
            validate_denom(denom)?;
        }
        ExecuteEnvelope::new(
            &self.address,
            &EscrowExecuteMsg::ClaimFees {
                denom: denom.map(str::to_string),
            },
            Vec::new(),
        )
    }

    /// Hand a built call to the broadcaster
    pub async fn submit(
        &self,
        broadcaster: &dyn Broadcaster,
        envelope: &ExecuteEnvelope,
    ) -> TransactionResult {
        let result = submit_envelope(broadcaster, envelope).await;
        info!(
            action = envelope.action().unwrap_or("unknown"),
            success = result.success(),
            tx_hash = result.tx_hash().unwrap_or_default(),
            "Escrow transaction submitted"
        );
        result
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Build a `get_escrow` query
    pub fn get_escrow_query(&self, escrow_id: EscrowId) -> Result<QueryEnvelope> {
        QueryEnvelope::new(
            &self.address,
            &EscrowQueryMsg::GetEscrow {
                escrow_id: escrow_id.value(),
            },
        )
    }

    /// Fetch the raw contract view of an escrow
    pub async fn get_escrow_response(&self, escrow_id: EscrowId) -> Result<EscrowResponse> {
        let query = self.get_escrow_query(escrow_id)?;
        let value = query
            .run(self.querier.as_ref())
            .await
            .map_err(|err| match err {
                ChainError::NotFound(_) => HttpayError::not_found(format!("escrow {}", escrow_id)),
                other => HttpayError::from(other),
            })?;
        if value.is_null() {
            return Err(HttpayError::not_found(format!("escrow {}", escrow_id)));
        }
        decode_response(value)
    }

    /// Fetch an escrow with its status evaluated at the current height
    pub async fn get_escrow(&self, escrow_id: EscrowId) -> Result<EscrowRecord> {
        let resp = self.get_escrow_response(escrow_id).await?;
        let height = self.querier.block_height().await?;
        Ok(resp.into_record(height))
    }

    /// Fetch the platform fees collected by the contract
    pub async fn get_collected_fees(&self) -> Result<CollectedFeesResponse> {
        let query = QueryEnvelope::new(&self.address, &EscrowQueryMsg::GetCollectedFees {})?;
        let value = query.run(self.querier.as_ref()).await?;
        decode_response(value)
    }
}

impl std::fmt::Debug for EscrowClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EscrowClient")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

/// Compute the expiry height for a new escrow
pub fn expiry_height(current_height: u64, ttl_blocks: u64) -> Result<u64> {
    if ttl_blocks == 0 || ttl_blocks > MAX_ESCROW_BLOCKS {
        return Err(HttpayError::validation(
            "escrow_ttl_blocks",
            format!("must be between 1 and {}", MAX_ESCROW_BLOCKS),
        ));
    }
    current_height
        .checked_add(ttl_blocks)
        .ok_or_else(|| HttpayError::validation("escrow_ttl_blocks", "expiry height overflows"))
}

/// Extract the escrow id assigned by a `lock_funds` transaction
///
/// Prefers the contract's `wasm-toolpay.locked` event and falls back to the
/// generic `wasm` event attribute.
pub fn escrow_id_from_events(events: &[TxEvent]) -> Option<EscrowId> {
    let from = |kind: &str| {
        events
            .iter()
            .filter(|e| e.kind == kind)
            .find_map(|e| e.attribute("escrow_id"))
            .and_then(|v| v.parse::<u64>().ok())
            .map(EscrowId)
    };
    from(LOCKED_EVENT).or_else(|| from("wasm"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use httpay_types::{ToolId, TxOutcome};
    use serde_json::{json, Value};

    struct StaticChain {
        escrow: Option<Value>,
        height: u64,
    }

    #[async_trait]
    impl ChainQuerier for StaticChain {
        async fn query_smart(
            &self,
            _contract: &str,
            _msg: &Value,
        ) -> std::result::Result<Value, ChainError> {
            self.escrow
                .clone()
                .ok_or_else(|| ChainError::classify("Escrow not found"))
        }

        async fn block_height(&self) -> std::result::Result<u64, ChainError> {
            Ok(self.height)
        }

        async fn tx(&self, _tx_hash: &str) -> std::result::Result<Option<TxOutcome>, ChainError> {
            Ok(None)
        }
    }

    fn client(escrow: Option<Value>, height: u64) -> EscrowClient {
        EscrowClient::new("neutron1escrow", Arc::new(StaticChain { escrow, height }))
    }

    fn weather() -> SelectedTool {
        SelectedTool {
            tool_id: ToolId::parse("weather-api").unwrap(),
            name: "weather-api".to_string(),
            description: "Weather forecasts".to_string(),
            price: Uint128::new(1_000_000),
            denom: "untrn".to_string(),
            provider: "neutron1provider".to_string(),
        }
    }

    #[test]
    fn test_lock_attaches_advertised_price() {
        let token = AuthToken::new("tok");
        let env = client(None, 100)
            .lock(&weather(), Uint128::new(1_000_000), "untrn", &token, 150)
            .unwrap();

        assert_eq!(env.funds, vec![Coin::new(1_000_000u128, "untrn")]);
        assert_eq!(env.msg["lock_funds"]["max_fee"], "1000000");
        assert_eq!(env.msg["lock_funds"]["auth_token"], "tok");
        assert_eq!(env.msg["lock_funds"]["expires"], 150);
    }

    #[test]
    fn test_lock_rejects_price_mismatch() {
        let token = AuthToken::new("tok");
        let escrow = client(None, 100);

        let err = escrow
            .lock(&weather(), Uint128::new(999_999), "untrn", &token, 150)
            .unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");

        let err = escrow
            .lock(&weather(), Uint128::new(1_000_000), "uatom", &token, 150)
            .unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_lock_rejects_free_tool() {
        let mut free = weather();
        free.price = Uint128::new(0);
        let err = client(None, 100)
            .lock(&free, Uint128::new(0), "untrn", &AuthToken::new("tok"), 150)
            .unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
        assert!(err.to_string().contains("greater than zero"));
    }

    #[test]
    fn test_expiry_height_bounds() {
        assert_eq!(expiry_height(100, 50).unwrap(), 150);
        assert!(expiry_height(100, 51).is_err());
        assert!(expiry_height(100, 0).is_err());
    }

    #[test]
    fn test_release_parses_usage_fee() {
        let escrow = client(None, 100);
        let env = escrow.release(EscrowId(3), "250000").unwrap();
        assert_eq!(env.msg, json!({"release": {"escrow_id": 3, "usage_fee": "250000"}}));
        assert!(escrow.release(EscrowId(3), "2.5").is_err());

        let env = escrow.refund(EscrowId(3)).unwrap();
        assert_eq!(env.action(), Some("refund_expired"));
    }

    #[test]
    fn test_escrow_id_from_events() {
        let events = vec![
            TxEvent::new("message", [("action", "/cosmwasm.wasm.v1.MsgExecuteContract")]),
            TxEvent::new("wasm", [("action", "lock_funds"), ("escrow_id", "41")]),
            TxEvent::new(LOCKED_EVENT, [("escrow_id", "42"), ("tool_id", "weather-api")]),
        ];
        assert_eq!(escrow_id_from_events(&events), Some(EscrowId(42)));
        assert_eq!(escrow_id_from_events(&events[..2]), Some(EscrowId(41)));
        assert_eq!(escrow_id_from_events(&events[..1]), None);
    }

    #[tokio::test]
    async fn test_get_escrow_record() {
        let escrow = client(
            Some(json!({
                "escrow_id": 7,
                "caller": "neutron1payer",
                "provider": "neutron1provider",
                "max_fee": "1000000",
                "denom": "untrn",
                "expires": 150,
                "auth_token": "tok"
            })),
            160,
        );
        let record = escrow.get_escrow(EscrowId(7)).await.unwrap();
        assert_eq!(record.status, httpay_types::EscrowStatus::Expired);
        assert_eq!(record.payer, "neutron1payer");
    }

    #[tokio::test]
    async fn test_get_escrow_not_found() {
        let err = client(None, 100).get_escrow(EscrowId(99)).await.unwrap_err();
        assert_eq!(err.error_code(), "NOT_FOUND");
    }
}
