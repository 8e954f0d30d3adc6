//! Provider-side escrow verification
//!
//! Before serving a paid call the provider checks that the presented escrow
//! exists, has not expired, names it as provider, and carries the presented
//! auth token. Checks run in that order and stop at the first failure.

use crate::client::EscrowClient;
use httpay_types::{EscrowId, EscrowRecord};
use serde::Serialize;
use tracing::debug;

/// Outcome of a verification
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub escrow: Option<EscrowRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_height: Option<u64>,
}

impl VerificationResult {
    fn valid(escrow: EscrowRecord, block_height: u64) -> Self {
        Self {
            is_valid: true,
            error: None,
            escrow: Some(escrow),
            block_height: Some(block_height),
        }
    }

    fn rejected(reason: &str, escrow: EscrowRecord, block_height: u64) -> Self {
        Self {
            is_valid: false,
            error: Some(reason.to_string()),
            escrow: Some(escrow),
            block_height: Some(block_height),
        }
    }

    fn failed(reason: String) -> Self {
        Self {
            is_valid: false,
            error: Some(reason),
            escrow: None,
            block_height: None,
        }
    }
}

/// Verifies escrows presented to a tool provider
#[derive(Debug, Clone)]
pub struct EscrowVerifier {
    client: EscrowClient,
}

impl EscrowVerifier {
    pub fn new(client: EscrowClient) -> Self {
        Self { client }
    }

    /// Verify an escrow for `provider`
    ///
    /// `now_height` skips the block height query when the caller already
    /// knows it. Query failures are reported as an invalid result.
    pub async fn verify(
        &self,
        escrow_id: EscrowId,
        auth_token: &str,
        provider: &str,
        now_height: Option<u64>,
    ) -> VerificationResult {
        let resp = match self.client.get_escrow_response(escrow_id).await {
            Ok(resp) => resp,
            Err(err) => return VerificationResult::failed(err.to_string()),
        };

        let height = match now_height {
            Some(height) => height,
            None => match self.client.querier().block_height().await {
                Ok(height) => height,
                Err(err) => return VerificationResult::failed(err.to_string()),
            },
        };

        let escrow = resp.into_record(height);
        let result = if escrow.is_expired_at(height) {
            VerificationResult::rejected("Escrow is expired", escrow, height)
        } else if escrow.provider != provider {
            VerificationResult::rejected("Provider address mismatch", escrow, height)
        } else if !escrow.auth_token.matches(auth_token) {
            VerificationResult::rejected("Auth token mismatch", escrow, height)
        } else {
            VerificationResult::valid(escrow, height)
        };

        debug!(
            escrow_id = %escrow_id,
            is_valid = result.is_valid,
            error = result.error.as_deref().unwrap_or_default(),
            "Escrow verified"
        );
        result
    }
}
