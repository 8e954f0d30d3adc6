//! HTTPay Escrow - Funds held against one tool call
//!
//! Every payment is an escrow. The payer locks the tool's price with an auth
//! token; the provider verifies the token, serves the call, then releases
//! the usage fee. Unclaimed escrows are refundable once expired.

pub use httpay_types::{
    EscrowId, EscrowRecord, EscrowStatus, AuthToken, TxEvent, MAX_ESCROW_BLOCKS,
};

pub mod msg;
pub mod client;
pub mod verifier;

pub use msg::*;
pub use client::*;
pub use verifier::*;
