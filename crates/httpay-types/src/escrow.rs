//! Escrow types for HTTPay
//!
//! A successful lock creates an escrow record holding the payer's funds until
//! the provider releases them (after serving the call) or the payer refunds
//! them once the escrow has expired.

use crate::{AuthToken, Coin, EscrowId, Uint128};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of blocks an escrow may stay open (escrow contract limit)
pub const MAX_ESCROW_BLOCKS: u64 = 50;

/// Lifecycle status of an escrow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EscrowStatus {
    /// Funds are locked and releasable by the provider
    Locked,
    /// Funds released to the provider
    Released,
    /// Funds returned to the payer
    Refunded,
    /// Past its expiry height; only a refund is possible
    Expired,
}

impl fmt::Display for EscrowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Locked => "locked",
            Self::Released => "released",
            Self::Refunded => "refunded",
            Self::Expired => "expired",
        };
        f.write_str(name)
    }
}

/// An escrow as seen by the SDK
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EscrowRecord {
    /// Contract-assigned id
    pub escrow_id: EscrowId,
    /// Address that locked the funds
    pub payer: String,
    /// Tool provider entitled to release
    pub provider: String,
    /// Locked amount (the maximum fee)
    pub amount: Uint128,
    /// Denomination of the locked funds
    pub denom: String,
    /// Current status
    pub status: EscrowStatus,
    /// Block height after which the escrow is expired
    pub expires: u64,
    /// Credential committed with the lock
    pub auth_token: AuthToken,
}

impl EscrowRecord {
    /// Locked funds as a coin
    pub fn locked_coin(&self) -> Coin {
        Coin::new(self.amount, self.denom.clone())
    }

    /// Check if the escrow is past its expiry height
    pub fn is_expired_at(&self, height: u64) -> bool {
        height > self.expires
    }

    /// Re-evaluate a locked record against the current block height
    pub fn at_height(mut self, height: u64) -> Self {
        if self.status == EscrowStatus::Locked && self.is_expired_at(height) {
            self.status = EscrowStatus::Expired;
        }
        self
    }
}
