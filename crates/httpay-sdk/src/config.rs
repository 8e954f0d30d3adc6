//! SDK Configuration
//!
//! Configuration arrives loosely typed (caller JSON, environment variables, a
//! config file) and is validated in one deterministic order before it becomes
//! an immutable `SdkConfig`. Every loading path runs the same validator.

use crate::network::{Network, PartialConfig, DEFAULT_GAS_PRICE};
use httpay_types::{ConfigError, MAX_ESCROW_BLOCKS};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::path::PathBuf;

/// Default gas adjustment multiplier
pub const DEFAULT_GAS_ADJUSTMENT: f64 = 1.3;

/// Default bech32 address prefix
pub const DEFAULT_ADDRESS_PREFIX: &str = "neutron";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "HTTPAY";

// ============================================================================
// Validated Configuration
// ============================================================================

/// Validated, immutable SDK configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SdkConfig {
    /// Tendermint RPC endpoint used by the signing wallet
    pub rpc_endpoint: String,
    /// Chain id (e.g. "pion-1")
    pub chain_id: String,
    /// Registry contract address
    pub registry_address: String,
    /// Escrow contract address
    pub escrow_address: String,
    /// Gas price handed to the broadcaster
    pub gas_price: String,
    /// Gas estimate multiplier
    pub gas_adjustment: f64,
    /// Bech32 prefix contract addresses must carry
    pub address_prefix: String,
    /// Cosmos REST endpoint for read-only queries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rest_endpoint: Option<String>,
    /// Blocks until a new escrow expires
    pub escrow_ttl_blocks: u64,
}

impl SdkConfig {
    /// Validate a loose JSON configuration and apply defaults
    pub fn from_value(value: &Value) -> Result<Self, ConfigError> {
        ConfigValidator::validate(value)?;
        let obj = value.as_object().ok_or(ConfigError::MissingConfig)?;

        let string = |camel: &'static str, snake: &'static str| {
            lookup(obj, camel, snake)
                .and_then(Value::as_str)
                .map(str::to_string)
        };
        let required = |camel: &'static str, snake: &'static str| {
            string(camel, snake).ok_or(ConfigError::MissingField { field: camel })
        };

        Ok(Self {
            rpc_endpoint: required("rpcEndpoint", "rpc_endpoint")?,
            chain_id: required("chainId", "chain_id")?,
            registry_address: required("registryAddress", "registry_address")?,
            escrow_address: required("escrowAddress", "escrow_address")?,
            gas_price: string("gasPrice", "gas_price")
                .unwrap_or_else(|| DEFAULT_GAS_PRICE.to_string()),
            gas_adjustment: lookup(obj, "gasAdjustment", "gas_adjustment")
                .and_then(Value::as_f64)
                .unwrap_or(DEFAULT_GAS_ADJUSTMENT),
            address_prefix: string("addressPrefix", "address_prefix")
                .unwrap_or_else(|| DEFAULT_ADDRESS_PREFIX.to_string()),
            rest_endpoint: string("restEndpoint", "rest_endpoint"),
            escrow_ttl_blocks: lookup(obj, "escrowTtlBlocks", "escrow_ttl_blocks")
                .and_then(Value::as_u64)
                .unwrap_or(MAX_ESCROW_BLOCKS),
        })
    }

    /// Load from `HTTPAY_*` environment variables (and `.env` if present)
    ///
    /// `HTTPAY_NETWORK` selects a preset that explicit variables override.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_env_vars(std::env::vars())
    }

    /// Build from an explicit set of environment variables
    pub fn from_env_vars<I, K, V>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut obj = Map::new();
        let mut preset = PartialConfig::default();

        for (key, value) in vars {
            let Some(name) = key
                .as_ref()
                .strip_prefix(ENV_PREFIX)
                .and_then(|k| k.strip_prefix('_'))
            else {
                continue;
            };
            let value = value.into();
            match name {
                "NETWORK" => preset = crate::network::defaults_for(&value),
                "RPC_ENDPOINT" => insert(&mut obj, "rpcEndpoint", Value::String(value)),
                "CHAIN_ID" => insert(&mut obj, "chainId", Value::String(value)),
                "REGISTRY_ADDRESS" => insert(&mut obj, "registryAddress", Value::String(value)),
                "ESCROW_ADDRESS" => insert(&mut obj, "escrowAddress", Value::String(value)),
                "GAS_PRICE" => insert(&mut obj, "gasPrice", Value::String(value)),
                "ADDRESS_PREFIX" => insert(&mut obj, "addressPrefix", Value::String(value)),
                "REST_ENDPOINT" => insert(&mut obj, "restEndpoint", Value::String(value)),
                "GAS_ADJUSTMENT" => insert(&mut obj, "gasAdjustment", numeric(value)),
                "ESCROW_TTL_BLOCKS" => insert(&mut obj, "escrowTtlBlocks", numeric(value)),
                _ => {}
            }
        }

        let mut merged = match preset.to_value() {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        merged.extend(obj);
        Self::from_value(&Value::Object(merged))
    }

    /// The network this configuration points at, if it matches a preset
    pub fn network(&self) -> Option<Network> {
        Network::ALL.into_iter().find(|n| {
            n.defaults().chain_id.as_deref() == Some(self.chain_id.as_str())
        })
    }
}

fn insert(obj: &mut Map<String, Value>, key: &str, value: Value) {
    obj.insert(key.to_string(), value);
}

// Unparseable numbers stay strings so the validator reports the type.
fn numeric(raw: String) -> Value {
    if let Ok(n) = raw.parse::<u64>() {
        return Value::Number(n.into());
    }
    raw.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or(Value::String(raw))
}

fn lookup<'a>(obj: &'a Map<String, Value>, camel: &str, snake: &str) -> Option<&'a Value> {
    obj.get(camel)
        .or_else(|| obj.get(snake))
        .filter(|v| !v.is_null())
}

// ============================================================================
// Validator
// ============================================================================

/// Validates loose configuration values
///
/// Stops at the first violation. Checks run in a fixed order: object, RPC
/// endpoint, chain id, registry address, escrow address, gas adjustment,
/// then the remaining optional settings.
pub struct ConfigValidator;

impl ConfigValidator {
    pub fn validate(value: &Value) -> Result<(), ConfigError> {
        let obj = match value {
            Value::Null => return Err(ConfigError::MissingConfig),
            Value::Object(obj) => obj,
            _ => {
                return Err(ConfigError::WrongType {
                    field: "config",
                    expected: "object",
                })
            }
        };

        let rpc = required_string(obj, "rpcEndpoint", "rpc_endpoint")?;
        check_url("rpcEndpoint", rpc)?;

        required_string(obj, "chainId", "chain_id")?;

        // The prefix itself is type-checked further down.
        let prefix = lookup(obj, "addressPrefix", "address_prefix")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_ADDRESS_PREFIX);

        let registry = required_string(obj, "registryAddress", "registry_address")?;
        check_address("registryAddress", registry, prefix)?;

        let escrow = required_string(obj, "escrowAddress", "escrow_address")?;
        check_address("escrowAddress", escrow, prefix)?;

        if let Some(v) = lookup(obj, "gasAdjustment", "gas_adjustment") {
            let value = v.as_f64().ok_or(ConfigError::WrongType {
                field: "gasAdjustment",
                expected: "number",
            })?;
            if value <= 0.0 {
                return Err(ConfigError::NonPositiveGasAdjustment { value });
            }
        }

        if let Some(v) = lookup(obj, "gasPrice", "gas_price") {
            let price = optional_string("gasPrice", v)?;
            if price.is_empty() {
                return Err(ConfigError::MissingField { field: "gasPrice" });
            }
        }

        if let Some(v) = lookup(obj, "addressPrefix", "address_prefix") {
            let prefix = optional_string("addressPrefix", v)?;
            if prefix.is_empty() {
                return Err(ConfigError::MissingField { field: "addressPrefix" });
            }
        }

        if let Some(v) = lookup(obj, "restEndpoint", "rest_endpoint") {
            let rest = optional_string("restEndpoint", v)?;
            check_url("restEndpoint", rest)?;
        }

        if let Some(v) = lookup(obj, "escrowTtlBlocks", "escrow_ttl_blocks") {
            let ttl = v.as_u64().ok_or(ConfigError::WrongType {
                field: "escrowTtlBlocks",
                expected: "positive integer",
            })?;
            if ttl == 0 || ttl > MAX_ESCROW_BLOCKS {
                return Err(ConfigError::OutOfRange {
                    field: "escrowTtlBlocks",
                    reason: format!("must be between 1 and {} (got {})", MAX_ESCROW_BLOCKS, ttl),
                });
            }
        }

        Ok(())
    }
}

fn required_string<'a>(
    obj: &'a Map<String, Value>,
    camel: &'static str,
    snake: &'static str,
) -> Result<&'a str, ConfigError> {
    let value = lookup(obj, camel, snake).ok_or(ConfigError::MissingField { field: camel })?;
    let s = value.as_str().ok_or(ConfigError::WrongType {
        field: camel,
        expected: "string",
    })?;
    if s.is_empty() {
        return Err(ConfigError::MissingField { field: camel });
    }
    Ok(s)
}

fn optional_string<'a>(field: &'static str, value: &'a Value) -> Result<&'a str, ConfigError> {
    value.as_str().ok_or(ConfigError::WrongType {
        field,
        expected: "string",
    })
}

fn check_url(field: &'static str, url: &str) -> Result<(), ConfigError> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::MalformedUrl {
            field,
            value: url.to_string(),
        })
    }
}

fn check_address(field: &'static str, address: &str, prefix: &str) -> Result<(), ConfigError> {
    let expected = format!("{}1", prefix);
    if address.starts_with(&expected) && address.len() > expected.len() {
        Ok(())
    } else {
        Err(ConfigError::MalformedAddress {
            field,
            prefix: prefix.to_string(),
            value: address.to_string(),
        })
    }
}

// ============================================================================
// Layered Loader
// ============================================================================

/// Layered configuration loader
///
/// Layers, lowest precedence first: network preset, config file,
/// `HTTPAY_*` environment, explicit overrides. Files use snake_case keys.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    network: Option<Network>,
    file: Option<PathBuf>,
    overrides: PartialConfig,
    skip_env: bool,
    env: Option<config::Map<String, String>>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a network preset
    pub fn network(mut self, network: Network) -> Self {
        self.network = Some(network);
        self
    }

    /// Read a TOML, JSON or YAML file (format from the extension)
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// Explicit values that win over every other layer
    pub fn overrides(mut self, overrides: PartialConfig) -> Self {
        self.overrides = overrides;
        self
    }

    /// Ignore the process environment
    pub fn without_env(mut self) -> Self {
        self.skip_env = true;
        self
    }

    /// Read the `HTTPAY_*` layer from `vars` instead of the process
    pub fn env_vars<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env = Some(vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect());
        self
    }

    pub fn load(self) -> Result<SdkConfig, ConfigError> {
        let process_env = self.env.is_none() && !self.skip_env;
        if process_env {
            dotenvy::dotenv().ok();
        }

        let mut builder = config::Config::builder();

        if let Some(network) = self.network {
            builder = add_defaults(builder, &network.defaults())?;
        }

        if let Some(path) = &self.file {
            builder = builder.add_source(config::File::from(path.as_path()).required(true));
        }

        if process_env || self.env.is_some() {
            builder = builder.add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .source(self.env.clone()),
            );
        }

        builder = add_overrides(builder, &self.overrides)?;

        let value: Value = builder
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| ConfigError::Load(e.to_string()))?;

        SdkConfig::from_value(&value)
    }
}

type Builder = config::ConfigBuilder<config::builder::DefaultState>;

fn snake_entries(partial: &PartialConfig) -> Vec<(&'static str, config::Value)> {
    let mut entries: Vec<(&'static str, config::Value)> = Vec::new();
    let mut push = |key: &'static str, value: Option<config::Value>| {
        if let Some(value) = value {
            entries.push((key, value));
        }
    };
    push("rpc_endpoint", partial.rpc_endpoint.clone().map(Into::into));
    push("chain_id", partial.chain_id.clone().map(Into::into));
    push("registry_address", partial.registry_address.clone().map(Into::into));
    push("escrow_address", partial.escrow_address.clone().map(Into::into));
    push("gas_price", partial.gas_price.clone().map(Into::into));
    push("gas_adjustment", partial.gas_adjustment.map(Into::into));
    push("address_prefix", partial.address_prefix.clone().map(Into::into));
    push("rest_endpoint", partial.rest_endpoint.clone().map(Into::into));
    push("escrow_ttl_blocks", partial.escrow_ttl_blocks.map(Into::into));
    entries
}

fn add_defaults(mut builder: Builder, partial: &PartialConfig) -> Result<Builder, ConfigError> {
    for (key, value) in snake_entries(partial) {
        builder = builder
            .set_default(key, value)
            .map_err(|e| ConfigError::Load(e.to_string()))?;
    }
    Ok(builder)
}

fn add_overrides(mut builder: Builder, partial: &PartialConfig) -> Result<Builder, ConfigError> {
    for (key, value) in snake_entries(partial) {
        builder = builder
            .set_override(key, value)
            .map_err(|e| ConfigError::Load(e.to_string()))?;
    }
    Ok(builder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid() -> Value {
        json!({
            "rpcEndpoint": "https://rpc-falcron.pion-1.ntrn.tech:443",
            "chainId": "pion-1",
            "registryAddress": "neutron1registry",
            "escrowAddress": "neutron1escrow",
            "gasAdjustment": 1.5
        })
    }

    fn with(key: &str, value: Value) -> Value {
        let mut config = valid();
        config[key] = value;
        config
    }

    fn without(key: &str) -> Value {
        let mut config = valid();
        config.as_object_mut().unwrap().remove(key);
        config
    }

    #[test]
    fn test_valid_config() {
        assert!(ConfigValidator::validate(&valid()).is_ok());

        let config = SdkConfig::from_value(&valid()).unwrap();
        assert_eq!(config.gas_adjustment, 1.5);
        assert_eq!(config.gas_price, "0.0053untrn");
        assert_eq!(config.address_prefix, "neutron");
        assert_eq!(config.escrow_ttl_blocks, 50);
        assert_eq!(config.network(), Some(Network::Testnet));
    }

    #[test]
    fn test_validation_is_idempotent() {
        let config = valid();
        assert_eq!(ConfigValidator::validate(&config), ConfigValidator::validate(&config));
        assert_eq!(
            SdkConfig::from_value(&config).unwrap(),
            SdkConfig::from_value(&config).unwrap()
        );
    }

    #[test]
    fn test_snake_case_keys() {
        let config = SdkConfig::from_value(&json!({
            "rpc_endpoint": "http://localhost:26657",
            "chain_id": "testing",
            "registry_address": "neutron1registry",
            "escrow_address": "neutron1escrow",
            "escrow_ttl_blocks": 20
        }))
        .unwrap();
        assert_eq!(config.escrow_ttl_blocks, 20);
        assert_eq!(config.gas_adjustment, DEFAULT_GAS_ADJUSTMENT);
    }

    #[test]
    fn test_missing_config() {
        assert_eq!(ConfigValidator::validate(&Value::Null), Err(ConfigError::MissingConfig));
        assert!(matches!(
            ConfigValidator::validate(&json!("rpc")),
            Err(ConfigError::WrongType { field: "config", .. })
        ));
    }

    #[test]
    fn test_rpc_endpoint_errors() {
        assert_eq!(
            ConfigValidator::validate(&without("rpcEndpoint")),
            Err(ConfigError::MissingField { field: "rpcEndpoint" })
        );
        assert!(matches!(
            ConfigValidator::validate(&with("rpcEndpoint", json!(42))),
            Err(ConfigError::WrongType { field: "rpcEndpoint", .. })
        ));
        assert!(matches!(
            ConfigValidator::validate(&with("rpcEndpoint", json!("ws://rpc.example.com"))),
            Err(ConfigError::MalformedUrl { field: "rpcEndpoint", .. })
        ));
    }

    #[test]
    fn test_chain_id_errors() {
        assert_eq!(
            ConfigValidator::validate(&without("chainId")),
            Err(ConfigError::MissingField { field: "chainId" })
        );
        assert!(matches!(
            ConfigValidator::validate(&with("chainId", json!(["pion-1"]))),
            Err(ConfigError::WrongType { field: "chainId", .. })
        ));
    }

    #[test]
    fn test_registry_address_errors() {
        assert_eq!(
            ConfigValidator::validate(&without("registryAddress")),
            Err(ConfigError::MissingField { field: "registryAddress" })
        );
        assert!(matches!(
            ConfigValidator::validate(&with("registryAddress", json!(true))),
            Err(ConfigError::WrongType { field: "registryAddress", .. })
        ));
        assert!(matches!(
            ConfigValidator::validate(&with("registryAddress", json!("cosmos1registry"))),
            Err(ConfigError::MalformedAddress { field: "registryAddress", .. })
        ));
    }

    #[test]
    fn test_escrow_address_errors() {
        assert_eq!(
            ConfigValidator::validate(&without("escrowAddress")),
            Err(ConfigError::MissingField { field: "escrowAddress" })
        );
        assert!(matches!(
            ConfigValidator::validate(&with("escrowAddress", json!(7))),
            Err(ConfigError::WrongType { field: "escrowAddress", .. })
        ));
        assert!(matches!(
            ConfigValidator::validate(&with("escrowAddress", json!("neutron"))),
            Err(ConfigError::MalformedAddress { field: "escrowAddress", .. })
        ));
    }

    #[test]
    fn test_gas_adjustment_errors() {
        assert!(matches!(
            ConfigValidator::validate(&with("gasAdjustment", json!("1.3"))),
            Err(ConfigError::WrongType { field: "gasAdjustment", .. })
        ));
        assert_eq!(
            ConfigValidator::validate(&with("gasAdjustment", json!(0))),
            Err(ConfigError::NonPositiveGasAdjustment { value: 0.0 })
        );
        assert_eq!(
            ConfigValidator::validate(&with("gasAdjustment", json!(-1.3))),
            Err(ConfigError::NonPositiveGasAdjustment { value: -1.3 })
        );
    }

    #[test]
    fn test_optional_settings_errors() {
        assert!(matches!(
            ConfigValidator::validate(&with("gasPrice", json!(0.0053))),
            Err(ConfigError::WrongType { field: "gasPrice", .. })
        ));
        assert!(matches!(
            ConfigValidator::validate(&with("restEndpoint", json!("lcd.example.com"))),
            Err(ConfigError::MalformedUrl { field: "restEndpoint", .. })
        ));
        assert!(matches!(
            ConfigValidator::validate(&with("escrowTtlBlocks", json!(51))),
            Err(ConfigError::OutOfRange { field: "escrowTtlBlocks", .. })
        ));
        assert!(matches!(
            ConfigValidator::validate(&with("escrowTtlBlocks", json!(0))),
            Err(ConfigError::OutOfRange { field: "escrowTtlBlocks", .. })
        ));
    }

    #[test]
    fn test_first_violation_wins() {
        let config = json!({
            "chainId": 5,
            "registryAddress": "bad",
            "gasAdjustment": -1
        });
        assert_eq!(
            ConfigValidator::validate(&config),
            Err(ConfigError::MissingField { field: "rpcEndpoint" })
        );
    }

    #[test]
    fn test_custom_address_prefix() {
        let config = with("addressPrefix", json!("osmo"));
        assert!(matches!(
            ConfigValidator::validate(&config),
            Err(ConfigError::MalformedAddress { field: "registryAddress", .. })
        ));

        let mut config = config;
        config["registryAddress"] = json!("osmo1registry");
        config["escrowAddress"] = json!("osmo1escrow");
        assert!(ConfigValidator::validate(&config).is_ok());
    }

    #[test]
    fn test_from_env_vars() {
        let config = SdkConfig::from_env_vars([
            ("HTTPAY_NETWORK", "testnet"),
            ("HTTPAY_REGISTRY_ADDRESS", "neutron1registry"),
            ("HTTPAY_ESCROW_ADDRESS", "neutron1escrow"),
            ("HTTPAY_GAS_ADJUSTMENT", "1.6"),
            ("HTTPAY_ESCROW_TTL_BLOCKS", "30"),
            ("PATH", "/usr/bin"),
        ])
        .unwrap();

        assert_eq!(config.chain_id, "pion-1");
        assert_eq!(config.gas_adjustment, 1.6);
        assert_eq!(config.escrow_ttl_blocks, 30);
    }

    #[test]
    fn test_from_env_vars_reports_bad_number() {
        let err = SdkConfig::from_env_vars([
            ("HTTPAY_NETWORK", "local"),
            ("HTTPAY_REGISTRY_ADDRESS", "neutron1registry"),
            ("HTTPAY_ESCROW_ADDRESS", "neutron1escrow"),
            ("HTTPAY_GAS_ADJUSTMENT", "lots"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::WrongType { field: "gasAdjustment", .. }));
    }

    #[test]
    fn test_loader_layers() {
        let config = ConfigLoader::new()
            .network(Network::Mainnet)
            .overrides(
                PartialConfig::default().with_contracts("neutron1registry", "neutron1escrow"),
            )
            .without_env()
            .load()
            .unwrap();

        assert_eq!(config.rpc_endpoint, "https://rpc.neutron.org");
        assert_eq!(config.chain_id, "neutron-1");
        assert_eq!(config.registry_address, "neutron1registry");
    }

    #[test]
    fn test_loader_reads_config_files() {
        let dir = tempfile::tempdir().unwrap();
        let expected = SdkConfig::from_value(&json!({
            "rpc_endpoint": "http://localhost:26657",
            "chain_id": "testing",
            "registry_address": "neutron1registry",
            "escrow_address": "neutron1escrow",
            "gas_adjustment": 1.4,
            "escrow_ttl_blocks": 20
        }))
        .unwrap();

        let toml_path = dir.path().join("httpay.toml");
        std::fs::write(
            &toml_path,
            r#"
rpc_endpoint = "http://localhost:26657"
chain_id = "testing"
registry_address = "neutron1registry"
escrow_address = "neutron1escrow"
gas_adjustment = 1.4
escrow_ttl_blocks = 20
"#,
        )
        .unwrap();
        let from_toml = ConfigLoader::new().file(&toml_path).without_env().load().unwrap();
        assert_eq!(from_toml, expected);

        let json_path = dir.path().join("httpay.json");
        std::fs::write(
            &json_path,
            r#"{
  "rpc_endpoint": "http://localhost:26657",
  "chain_id": "testing",
  "registry_address": "neutron1registry",
  "escrow_address": "neutron1escrow",
  "gas_adjustment": 1.4,
  "escrow_ttl_blocks": 20
}"#,
        )
        .unwrap();
        let from_json = ConfigLoader::new().file(&json_path).without_env().load().unwrap();
        assert_eq!(from_json, expected);
    }

    #[test]
    fn test_loader_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ConfigLoader::new()
            .network(Network::Testnet)
            .file(dir.path().join("absent.toml"))
            .without_env()
            .load()
            .unwrap_err();
        assert!(matches!(err, ConfigError::Load(_)));
    }

    #[test]
    fn test_loader_environment_layer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("httpay.toml");
        std::fs::write(
            &path,
            r#"
registry_address = "neutron1fileregistry"
escrow_address = "neutron1fileescrow"
escrow_ttl_blocks = 20
"#,
        )
        .unwrap();

        // preset < file < environment < overrides
        let config = ConfigLoader::new()
            .network(Network::Testnet)
            .file(&path)
            .env_vars([
                ("HTTPAY_ESCROW_ADDRESS", "neutron1envescrow"),
                ("HTTPAY_ESCROW_TTL_BLOCKS", "30"),
                ("HTTPAY_GAS_ADJUSTMENT", "1.7"),
                ("HTTPAY_CHAIN_ID", "pion-1"),
                ("PATH", "/usr/bin"),
            ])
            .overrides(PartialConfig {
                escrow_ttl_blocks: Some(40),
                ..Default::default()
            })
            .load()
            .unwrap();

        assert_eq!(config.rpc_endpoint, "https://rpc-falcron.pion-1.ntrn.tech:443");
        assert_eq!(config.registry_address, "neutron1fileregistry");
        assert_eq!(config.escrow_address, "neutron1envescrow");
        assert_eq!(config.gas_adjustment, 1.7);
        assert_eq!(config.escrow_ttl_blocks, 40);
        assert_eq!(config.network(), Some(Network::Testnet));
    }

    #[test]
    fn test_loader_runs_validator() {
        let err = ConfigLoader::new()
            .network(Network::Local)
            .without_env()
            .load()
            .unwrap_err();
        assert_eq!(err, ConfigError::MissingField { field: "registryAddress" });
    }
}
