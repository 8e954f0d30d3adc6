//! Registry tool types
//!
//! A tool is a priced, provider-hosted API capability listed in the registry
//! contract. Sessions hold a reduced `SelectedTool` snapshot of the tool they
//! are about to pay for.

use crate::{Coin, HttpayError, Result, ToolId, Uint128};
use serde::{Deserialize, Serialize};

/// Maximum endpoint length accepted by the registry contract
pub const MAX_ENDPOINT_LEN: usize = 512;

/// Maximum description length accepted by the registry contract
pub const MAX_DESCRIPTION_LEN: usize = 256;

/// Denomination assumed when a registration omits one
pub const DEFAULT_DENOM: &str = "untrn";

/// Check that an endpoint is an absolute HTTPS URL within the length limit
pub fn validate_endpoint(endpoint: &str) -> Result<()> {
    if endpoint.len() > MAX_ENDPOINT_LEN {
        return Err(HttpayError::validation(
            "endpoint",
            format!("must be {} characters or less", MAX_ENDPOINT_LEN),
        ));
    }
    let Some(rest) = endpoint.strip_prefix("https://") else {
        return Err(HttpayError::validation("endpoint", "must start with https://"));
    };
    let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
    if host.is_empty() {
        return Err(HttpayError::validation("endpoint", "must include a host"));
    }
    if endpoint.chars().any(char::is_whitespace) {
        return Err(HttpayError::validation("endpoint", "must not contain whitespace"));
    }
    Ok(())
}

/// Check a tool description against the registry limit
pub fn validate_description(description: &str) -> Result<()> {
    if description.len() > MAX_DESCRIPTION_LEN {
        return Err(HttpayError::validation(
            "description",
            format!("must be {} characters or less", MAX_DESCRIPTION_LEN),
        ));
    }
    Ok(())
}

/// Check a Cosmos SDK denomination (`[a-zA-Z][a-zA-Z0-9/:._-]{2,127}`)
pub fn validate_denom(denom: &str) -> Result<()> {
    let mut chars = denom.chars();
    let first_ok = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
    let rest_ok = chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | ':' | '.' | '_' | '-'));
    if !first_ok || !rest_ok || !(3..=128).contains(&denom.len()) {
        return Err(HttpayError::validation(
            "denom",
            format!("'{}' is not a valid denomination", denom),
        ));
    }
    Ok(())
}

/// A tool as listed in the registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    /// Unique, immutable tool identifier
    pub tool_id: ToolId,
    /// Display name
    pub name: String,
    /// Provider-supplied description
    pub description: String,
    /// Price per call in base units
    pub price: Uint128,
    /// Denomination of the price
    pub denom: String,
    /// Provider address that receives payment
    pub provider: String,
    /// HTTPS endpoint serving the tool
    pub endpoint: String,
    /// Whether the tool is currently accepting payments
    pub is_active: bool,
}

impl Tool {
    /// Price as a coin
    pub fn price_coin(&self) -> Coin {
        Coin::new(self.price, self.denom.clone())
    }

    /// Take the session snapshot of this tool
    pub fn snapshot(&self) -> SelectedTool {
        SelectedTool::from(self)
    }
}

/// Snapshot of a tool held by one payment session
///
/// Carries the exact price/denom pair advertised at selection time; the
/// escrow lock must match it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedTool {
    pub tool_id: ToolId,
    pub name: String,
    pub description: String,
    pub price: Uint128,
    pub denom: String,
    pub provider: String,
}

impl SelectedTool {
    /// Advertised price as a coin
    pub fn price_coin(&self) -> Coin {
        Coin::new(self.price, self.denom.clone())
    }
}

impl From<&Tool> for SelectedTool {
    fn from(tool: &Tool) -> Self {
        Self {
            tool_id: tool.tool_id.clone(),
            name: tool.name.clone(),
            description: tool.description.clone(),
            price: tool.price,
            denom: tool.denom.clone(),
            provider: tool.provider.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_validation() {
        assert!(validate_endpoint("https://api.example.com/weather").is_ok());
        assert!(validate_endpoint("http://api.example.com").is_err());
        assert!(validate_endpoint("https://").is_err());
        assert!(validate_endpoint("https:///path").is_err());
        assert!(validate_endpoint("api.example.com").is_err());

        let long = format!("https://example.com/{}", "a".repeat(MAX_ENDPOINT_LEN));
        assert!(validate_endpoint(&long).is_err());
    }

    #[test]
    fn test_denom_validation() {
        assert!(validate_denom("untrn").is_ok());
        assert!(validate_denom("ibc/27394FB092D2ECCD56123C74F36E4C1F926001CEADA9CA97EA622B25F41E5EB2").is_ok());
        assert!(validate_denom("").is_err());
        assert!(validate_denom("1bad").is_err());
        assert!(validate_denom("un trn").is_err());
    }

    #[test]
    fn test_snapshot_keeps_price_pair() {
        let tool = Tool {
            tool_id: ToolId::parse("weather-api").unwrap(),
            name: "weather-api".to_string(),
            description: "Weather forecasts".to_string(),
            price: Uint128::new(1_000_000),
            denom: "untrn".to_string(),
            provider: "neutron1provider".to_string(),
            endpoint: "https://weather.example.com".to_string(),
            is_active: true,
        };

        let selected = tool.snapshot();
        assert_eq!(selected.tool_id, tool.tool_id);
        assert_eq!(selected.price_coin(), tool.price_coin());
    }
}
