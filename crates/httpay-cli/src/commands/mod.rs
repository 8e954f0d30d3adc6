//! Command implementations

pub mod config;
pub mod escrow;
pub mod tools;

use httpay_sdk::{ConfigLoader, LcdQuerier, Network, PartialConfig, PaymentOrchestrator, SdkConfig};
use std::sync::Arc;
use tracing::debug;

/// Global flags that shape the SDK configuration
#[derive(Debug, Clone, Default)]
pub struct ConnectionArgs {
    pub network: Option<Network>,
    pub config_file: Option<String>,
    pub rest_endpoint: Option<String>,
    pub registry_address: Option<String>,
    pub escrow_address: Option<String>,
}

impl ConnectionArgs {
    /// `--network`, else `HTTPAY_NETWORK`
    fn network(&self) -> anyhow::Result<Option<Network>> {
        if self.network.is_some() {
            return Ok(self.network);
        }
        match std::env::var("HTTPAY_NETWORK") {
            Ok(name) => name
                .parse::<Network>()
                .map(Some)
                .map_err(|e| anyhow::anyhow!("HTTPAY_NETWORK: {}", e)),
            Err(_) => Ok(None),
        }
    }

    /// Flag values, applied over every other configuration layer
    fn overrides(&self) -> PartialConfig {
        PartialConfig {
            rest_endpoint: self.rest_endpoint.clone(),
            registry_address: self.registry_address.clone(),
            escrow_address: self.escrow_address.clone(),
            ..Default::default()
        }
    }

    fn loader(&self) -> anyhow::Result<ConfigLoader> {
        let mut loader = ConfigLoader::new().overrides(self.overrides());
        if let Some(network) = self.network()? {
            loader = loader.network(network);
        }
        if let Some(path) = &self.config_file {
            loader = loader.file(path);
        }
        Ok(loader)
    }

    pub fn load_config(&self) -> anyhow::Result<SdkConfig> {
        let config = self.loader()?.load()?;
        debug!(chain_id = %config.chain_id, "Configuration loaded");
        Ok(config)
    }

    /// Read-only orchestrator over the configured REST endpoint
    pub fn orchestrator(&self) -> anyhow::Result<PaymentOrchestrator> {
        let config = Arc::new(self.load_config()?);
        let querier = Arc::new(LcdQuerier::new(&config)?);
        Ok(PaymentOrchestrator::new(config, querier))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_become_overrides() {
        let args = ConnectionArgs {
            rest_endpoint: Some("http://localhost:1317".to_string()),
            escrow_address: Some("neutron1escrow".to_string()),
            ..Default::default()
        };
        let overrides = args.overrides();
        assert_eq!(overrides.rest_endpoint.as_deref(), Some("http://localhost:1317"));
        assert_eq!(overrides.escrow_address.as_deref(), Some("neutron1escrow"));
        assert!(overrides.registry_address.is_none());
        assert!(overrides.chain_id.is_none());
    }

    #[test]
    fn test_no_flags_no_overrides() {
        assert!(ConnectionArgs::default().overrides().is_empty());
    }

    #[test]
    fn test_explicit_network_wins() {
        let args = ConnectionArgs {
            network: Some(Network::Local),
            ..Default::default()
        };
        assert_eq!(args.network().unwrap(), Some(Network::Local));
    }
}
