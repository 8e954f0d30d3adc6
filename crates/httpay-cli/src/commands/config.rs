//! Configuration and network preset commands

use super::ConnectionArgs;
use crate::display;
use colored::*;
use httpay_sdk::{defaults_for, Network};
use serde_json::json;

/// Validate the effective configuration
pub fn check(conn: &ConnectionArgs, json: bool) -> anyhow::Result<()> {
    match conn.load_config() {
        Ok(config) => {
            if json {
                return display::json(&json!({ "valid": true, "config": config }));
            }
            display::section("Configuration");
            display::success("Configuration is valid");
            display::kv("Chain", &config.chain_id);
            display::kv("RPC", &config.rpc_endpoint);
            display::kv("REST", config.rest_endpoint.as_deref().unwrap_or("(not set)"));
            display::kv("Registry", &config.registry_address);
            display::kv("Escrow", &config.escrow_address);
            if config.rest_endpoint.is_none() {
                println!();
                display::warning("No REST endpoint: tools and escrow commands need --rest");
            }
            Ok(())
        }
        Err(err) => {
            if json {
                display::json(&json!({ "valid": false, "error": err.to_string() }))?;
            } else {
                display::section("Configuration");
                display::error(&err.to_string());
            }
            Err(err)
        }
    }
}

/// Print the effective configuration
pub fn show(conn: &ConnectionArgs) -> anyhow::Result<()> {
    let config = conn.load_config()?;
    display::json(&config)
}

pub fn list_networks(json: bool) -> anyhow::Result<()> {
    if json {
        let presets: serde_json::Map<_, _> = Network::ALL
            .iter()
            .map(|n| (n.to_string(), n.defaults().to_value()))
            .collect();
        return display::json(&presets);
    }

    display::section("Networks");
    for network in Network::ALL {
        let preset = network.defaults();
        println!(
            "  {:<8} {}  {}",
            network.to_string().bright_white().bold(),
            preset.chain_id.unwrap_or_default().bright_yellow(),
            preset.rpc_endpoint.unwrap_or_default().bright_cyan()
        );
    }
    Ok(())
}

/// Print the preset for `name`; unknown names print an empty bundle
pub fn network_defaults(name: &str, json: bool) -> anyhow::Result<()> {
    let preset = defaults_for(name);
    if json {
        return display::json(&preset.to_value());
    }

    display::section(&format!("Network: {}", name));
    if preset.is_empty() {
        display::warning(&format!("No preset for '{}'", name));
        return Ok(());
    }
    display::kv("rpcEndpoint", preset.rpc_endpoint.as_deref().unwrap_or_default());
    display::kv("chainId", preset.chain_id.as_deref().unwrap_or_default());
    display::kv("gasPrice", preset.gas_price.as_deref().unwrap_or_default());
    Ok(())
}
