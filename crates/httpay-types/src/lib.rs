//! HTTPay Types - Canonical domain types for pay-per-call tools
//!
//! This crate contains the foundational types shared by every HTTPay crate,
//! with zero dependencies on other httpay crates. It defines:
//!
//! - Base-unit amounts (`Uint128`, `Coin`) that never touch floating point
//! - Identity types (`ToolId`, `EscrowId`, `SessionId`, `AuthToken`)
//! - Registry tools and the per-session `SelectedTool` snapshot
//! - Escrow records and their status lifecycle
//! - Contract-call envelopes and the chain capability traits
//! - The `TransactionResult` envelope returned to callers
//! - The error taxonomy
//!
//! # Payment Flow
//!
//! ```text
//! select tool → lock funds in escrow → auth token → release | refund
//! ```

pub mod amount;
pub mod identity;
pub mod tool;
pub mod escrow;
pub mod chain;
pub mod result;
pub mod error;

pub use amount::*;
pub use identity::*;
pub use tool::*;
pub use escrow::*;
pub use chain::*;
pub use result::*;
pub use error::*;
