//! HTTPay Registry - The tool catalogue
//!
//! The registry contract is the record of which tools exist, who provides
//! them, what they cost and whether they accept payments right now:
//! - Messages: typed execute/query wire messages
//! - Client: validated builders and executed queries

pub use httpay_types::{Tool, ToolId, SelectedTool, Uint128, ExecuteEnvelope, QueryEnvelope};

pub mod msg;
pub mod client;

pub use msg::*;
pub use client::*;
