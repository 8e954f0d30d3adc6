//! Network presets
//!
//! Fixed RPC endpoint, chain id and gas price bundles for the known Neutron
//! networks. A preset is never a complete configuration: contract addresses
//! always come from the caller, and the merged result must still validate.

use crate::config::SdkConfig;
use httpay_types::ConfigError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Gas price used on every known network
pub const DEFAULT_GAS_PRICE: &str = "0.0053untrn";

/// Known networks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    Testnet,
    Local,
}

impl Network {
    pub const ALL: [Network; 3] = [Network::Mainnet, Network::Testnet, Network::Local];

    /// Preset values for this network
    pub fn defaults(&self) -> PartialConfig {
        let (rpc, chain_id) = match self {
            Self::Mainnet => ("https://rpc.neutron.org", "neutron-1"),
            Self::Testnet => ("https://rpc-falcron.pion-1.ntrn.tech:443", "pion-1"),
            Self::Local => ("http://localhost:26657", "testing"),
        };
        PartialConfig {
            rpc_endpoint: Some(rpc.to_string()),
            chain_id: Some(chain_id.to_string()),
            gas_price: Some(DEFAULT_GAS_PRICE.to_string()),
            ..Default::default()
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Mainnet => "mainnet",
            Self::Testnet => "testnet",
            Self::Local => "local",
        };
        f.write_str(name)
    }
}

impl FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mainnet" => Ok(Self::Mainnet),
            "testnet" => Ok(Self::Testnet),
            "local" => Ok(Self::Local),
            other => Err(format!("unknown network '{}'", other)),
        }
    }
}

/// Preset values for a network name; unknown names yield an empty bundle
pub fn defaults_for(network: &str) -> PartialConfig {
    network
        .parse::<Network>()
        .map(|n| n.defaults())
        .unwrap_or_default()
}

/// A configuration with any subset of options set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpc_endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub escrow_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_adjustment: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rest_endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub escrow_ttl_blocks: Option<u64>,
}

impl PartialConfig {
    /// Check if no option is set
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Layer `overrides` on top of `self`; set fields in `overrides` win
    pub fn merge(self, overrides: PartialConfig) -> PartialConfig {
        PartialConfig {
            rpc_endpoint: overrides.rpc_endpoint.or(self.rpc_endpoint),
            chain_id: overrides.chain_id.or(self.chain_id),
            registry_address: overrides.registry_address.or(self.registry_address),
            escrow_address: overrides.escrow_address.or(self.escrow_address),
            gas_price: overrides.gas_price.or(self.gas_price),
            gas_adjustment: overrides.gas_adjustment.or(self.gas_adjustment),
            address_prefix: overrides.address_prefix.or(self.address_prefix),
            rest_endpoint: overrides.rest_endpoint.or(self.rest_endpoint),
            escrow_ttl_blocks: overrides.escrow_ttl_blocks.or(self.escrow_ttl_blocks),
        }
    }

    pub fn with_contracts(
        mut self,
        registry_address: impl Into<String>,
        escrow_address: impl Into<String>,
    ) -> Self {
        self.registry_address = Some(registry_address.into());
        self.escrow_address = Some(escrow_address.into());
        self
    }

    /// Loose JSON form, as fed to the validator
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| Value::Object(Default::default()))
    }

    /// Validate and build the immutable configuration
    pub fn build(&self) -> Result<SdkConfig, ConfigError> {
        SdkConfig::from_value(&self.to_value())
    }
}
