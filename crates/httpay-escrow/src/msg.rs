//! Escrow contract wire messages

use httpay_types::{AuthToken, EscrowId, EscrowRecord, EscrowStatus, Uint128, DEFAULT_DENOM};
use serde::{Deserialize, Serialize};

/// Event emitted by the contract when funds are locked
pub const LOCKED_EVENT: &str = "wasm-toolpay.locked";

/// Execute messages accepted by the escrow contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EscrowExecuteMsg {
    /// Lock `max_fee` (attached as funds) for one call of `tool_id`
    LockFunds {
        tool_id: String,
        max_fee: Uint128,
        auth_token: String,
        /// Block height after which the escrow is expired
        expires: u64,
    },
    /// Provider claims `usage_fee`; the remainder goes back to the caller
    Release { escrow_id: u64, usage_fee: Uint128 },
    /// Caller reclaims an expired escrow
    RefundExpired { escrow_id: u64 },
    /// Owner withdraws collected platform fees
    ClaimFees {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        denom: Option<String>,
    },
}

/// Queries accepted by the escrow contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EscrowQueryMsg {
    GetEscrow { escrow_id: u64 },
    GetCollectedFees {},
}

/// An escrow as the contract reports it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowResponse {
    pub escrow_id: u64,
    pub caller: String,
    pub provider: String,
    pub max_fee: Uint128,
    #[serde(default = "default_denom")]
    pub denom: String,
    pub expires: u64,
    pub auth_token: String,
}

impl EscrowResponse {
    /// Convert into a record, deriving status from the block height.
    ///
    /// The contract deletes settled escrows, so anything it still returns
    /// is either locked or expired.
    pub fn into_record(self, height: u64) -> EscrowRecord {
        EscrowRecord {
            escrow_id: EscrowId(self.escrow_id),
            payer: self.caller,
            provider: self.provider,
            amount: self.max_fee,
            denom: self.denom,
            status: EscrowStatus::Locked,
            expires: self.expires,
            auth_token: AuthToken::new(self.auth_token),
        }
        .at_height(height)
    }
}

/// Platform fees held by the contract for one denomination
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectedFee {
    pub denom: String,
    pub amount: Uint128,
}

/// Response to `get_collected_fees`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectedFeesResponse {
    pub owner: String,
    pub fee_percentage: u64,
    #[serde(default)]
    pub collected_fees: Vec<CollectedFee>,
}

fn default_denom() -> String {
    DEFAULT_DENOM.to_string()
}
