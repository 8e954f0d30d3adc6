//! Registry contract wire messages

use httpay_types::{Tool, ToolId, Uint128, DEFAULT_DENOM};
use serde::{Deserialize, Serialize};

/// Execute messages accepted by the registry contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistryExecuteMsg {
    /// Register a new tool owned by the sender
    RegisterTool {
        tool_id: String,
        price: Uint128,
        description: String,
        endpoint: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        denom: Option<String>,
    },
    /// Change the price of an existing tool
    UpdatePrice { tool_id: String, price: Uint128 },
    /// Change the price denomination of an existing tool
    UpdateDenom { tool_id: String, denom: String },
    /// Move a tool to a new endpoint
    UpdateEndpoint { tool_id: String, endpoint: String },
    /// Stop accepting payments for a tool
    PauseTool { tool_id: String },
    /// Start accepting payments again
    ResumeTool { tool_id: String },
}

/// Queries accepted by the registry contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistryQueryMsg {
    GetTool { tool_id: String },
    GetTools {},
}

/// A tool as the contract reports it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResponse {
    pub tool_id: String,
    pub provider: String,
    pub price: Uint128,
    #[serde(default = "default_denom")]
    pub denom: String,
    pub is_active: bool,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub endpoint: String,
}

/// Response to `get_tools`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ToolsResponse {
    pub tools: Vec<ToolResponse>,
}

fn default_denom() -> String {
    DEFAULT_DENOM.to_string()
}

impl From<ToolResponse> for Tool {
    fn from(resp: ToolResponse) -> Self {
        // The registry keeps no display name; the id doubles as one.
        let tool_id = ToolId::from_registry(resp.tool_id);
        Self {
            name: tool_id.to_string(),
            tool_id,
            description: resp.description,
            price: resp.price,
            denom: resp.denom,
            provider: resp.provider,
            endpoint: resp.endpoint,
            is_active: resp.is_active,
        }
    }
}
