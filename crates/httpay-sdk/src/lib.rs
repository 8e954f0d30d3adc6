//! HTTPay SDK - Pay-per-call tools for agents
//!
//! The SDK lets an agent discover priced tools in the on-chain registry, pay
//! for a single call through the escrow contract and hand the provider an
//! auth token proving payment.
//!
//! # Quick Start
//!
//! ```ignore
//! use httpay_sdk::{LcdQuerier, PaymentOrchestrator, PaymentSession, SdkConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Arc::new(SdkConfig::from_env()?);
//!     let querier = Arc::new(LcdQuerier::new(&config)?);
//!     let orchestrator = PaymentOrchestrator::new(config, querier)
//!         .with_broadcaster(my_wallet());
//!
//!     let session = PaymentSession::new();
//!     for tool in orchestrator.list_tools().await? {
//!         println!("{} - {} {}", tool.tool_id, tool.price, tool.denom);
//!     }
//!
//!     orchestrator.select_tool(&session, "weather-api").await?;
//!     let result = orchestrator.confirm_payment(&session).await?;
//!     if let Some(token) = result.auth_token() {
//!         // present `token` and `result.escrow_id()` to the provider
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Session Lifecycle
//!
//! ```text
//! Idle → ToolSelected → AwaitingPayment → Paid
//!            ↑                 │
//!            └──── failure ────┘
//! ```

pub use httpay_types::*;
pub use httpay_registry::{RegistryClient, RegistryExecuteMsg, RegistryQueryMsg, ToolResponse, ToolsResponse};
pub use httpay_escrow::{
    escrow_id_from_events, expiry_height, EscrowClient, EscrowExecuteMsg, EscrowQueryMsg,
    EscrowResponse, EscrowVerifier, VerificationResult,
};

pub mod config;
pub mod network;
pub mod retry;
pub mod session;
pub mod orchestrator;
pub mod rpc;

pub use config::*;
pub use network::*;
pub use retry::*;
pub use session::*;
pub use orchestrator::*;
pub use rpc::*;
