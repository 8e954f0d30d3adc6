//! Registry client

use crate::msg::{RegistryExecuteMsg, RegistryQueryMsg, ToolResponse, ToolsResponse};
use httpay_types::{
    decode_response, submit_envelope, validate_denom, validate_description, validate_endpoint,
    Broadcaster, ChainError, ChainQuerier, ExecuteEnvelope, HttpayError, QueryEnvelope, Result,
    Tool, ToolId, TransactionResult, Uint128,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

/// Client for the tool registry contract
///
/// Builders return unsigned envelopes; queries run through the injected
/// `ChainQuerier`. Nothing here signs.
#[derive(Clone)]
pub struct RegistryClient {
    address: String,
    querier: Arc<dyn ChainQuerier>,
}

impl RegistryClient {
    /// Create a client for the registry at `address`
    pub fn new(address: impl Into<String>, querier: Arc<dyn ChainQuerier>) -> Self {
        Self {
            address: address.into(),
            querier,
        }
    }

    /// Registry contract address
    pub fn address(&self) -> &str {
        &self.address
    }

    // ========================================================================
    // Execute Builders
    // ========================================================================

    /// Build a `register_tool` call
    ///
    /// `price` is a base-unit integer string; it is rejected before anything
    /// is built if it does not parse.
    pub fn register_tool(
        &self,
        tool_id: &str,
        price: &str,
        description: &str,
        endpoint: &str,
        denom: Option<&str>,
    ) -> Result<ExecuteEnvelope> {
        let tool_id = ToolId::parse(tool_id)?;
        let price = Uint128::parse("price", price)?;
        validate_description(description)?;
        validate_endpoint(endpoint)?;
        if let Some(denom) = denom {
            validate_denom(denom)?;
        }

        debug!(tool_id = %tool_id, %price, "Building register_tool");
        self.execute(RegistryExecuteMsg::RegisterTool {
            tool_id: tool_id.into_inner(),
            price,
            description: description.to_string(),
            endpoint: endpoint.to_string(),
            denom: denom.map(str::to_string),
        })
    }

    /// Build an `update_price` call
    pub fn update_price(&self, tool_id: &str, price: &str) -> Result<ExecuteEnvelope> {
        let tool_id = ToolId::parse(tool_id)?;
        let price = Uint128::parse("price", price)?;
        self.execute(RegistryExecuteMsg::UpdatePrice {
            tool_id: tool_id.into_inner(),
            price,
        })
    }

    /// Build an `update_denom` call
    pub fn update_denom(&self, tool_id: &str, denom: &str) -> Result<ExecuteEnvelope> {
        let tool_id = ToolId::parse(tool_id)?;
        validate_denom(denom)?;
        self.execute(RegistryExecuteMsg::UpdateDenom {
            tool_id: tool_id.into_inner(),
            denom: denom.to_string(),
        })
    }

    /// Build an `update_endpoint` call
    pub fn update_endpoint(&self, tool_id: &str, endpoint: &str) -> Result<ExecuteEnvelope> {
        let tool_id = ToolId::parse(tool_id)?;
        validate_endpoint(endpoint)?;
        self.execute(RegistryExecuteMsg::UpdateEndpoint {
            tool_id: tool_id.into_inner(),
            endpoint: endpoint.to_string(),
        })
    }

    /// Build a `pause_tool` call
    pub fn pause_tool(&self, tool_id: &str) -> Result<ExecuteEnvelope> {
        let tool_id = ToolId::parse(tool_id)?;
        self.execute(RegistryExecuteMsg::PauseTool {
            tool_id: tool_id.into_inner(),
        })
    }

    /// Build a `resume_tool` call
    pub fn resume_tool(&self, tool_id: &str) -> Result<ExecuteEnvelope> {
        let tool_id = ToolId::parse(tool_id)?;
        self.execute(RegistryExecuteMsg::ResumeTool {
            tool_id: tool_id.into_inner(),
        })
    }

    fn execute(&self, msg: RegistryExecuteMsg) -> Result<ExecuteEnvelope> {
        ExecuteEnvelope::new(&self.address, &msg, Vec::new())
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
            "Registry transaction submitted"
        );
        result
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Build a `get_tool` query
    pub fn get_tool_query(&self, tool_id: &str) -> Result<QueryEnvelope> {
        QueryEnvelope::new(
            &self.address,
            &RegistryQueryMsg::GetTool {
                tool_id: tool_id.to_string(),
            },
        )
    }

    /// Build a `get_tools` query
    pub fn get_tools_query(&self) -> Result<QueryEnvelope> {
        QueryEnvelope::new(&self.address, &RegistryQueryMsg::GetTools {})
    }

    /// Fetch one tool
    ///
    /// A missing tool is `NotFound` whether the contract answers with an
    /// error or with `null`.
    pub async fn get_tool(&self, tool_id: &str) -> Result<Tool> {
        let query = self.get_tool_query(tool_id)?;
        let value = query.run(self.querier.as_ref()).await.map_err(|err| match err {
            ChainError::NotFound(_) => HttpayError::not_found(format!("tool '{}'", tool_id)),
            other => HttpayError::from(other),
        })?;

        if value.is_null() {
            return Err(HttpayError::not_found(format!("tool '{}'", tool_id)));
        }

        let resp: ToolResponse = decode_response(value)?;
        Ok(resp.into())
    }

    /// Fetch every registered tool, in registry order
    pub async fn get_tools(&self) -> Result<Vec<Tool>> {
        let query = self.get_tools_query()?;
        let value = query.run(self.querier.as_ref()).await?;
        let resp: ToolsResponse = match value {
            Value::Null => ToolsResponse::default(),
            value => decode_response(value)?,
        };

        debug!(count = resp.tools.len(), "Fetched registry tools");
        Ok(resp.tools.into_iter().map(Tool::from).collect())
    }
}

impl std::fmt::Debug for RegistryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryClient")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}
