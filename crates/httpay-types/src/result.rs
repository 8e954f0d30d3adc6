//! The normalized success/failure envelope returned to every caller
//!
//! Fields are private so the invariants hold by construction: a success
//! never carries an error, a failure never carries payment fields, and a
//! payment success always carries both the escrow id and the auth token.

use crate::{AuthToken, EscrowId, HttpayError, SelectedTool};
use serde::Serialize;

/// Outcome of a chain-submitting operation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResult {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    tx_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    escrow_id: Option<EscrowId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    auth_token: Option<AuthToken>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool: Option<SelectedTool>,
}

impl TransactionResult {
    /// A non-payment transaction that was accepted
    pub fn submitted(tx_hash: impl Into<String>) -> Self {
        Self {
            success: true,
            tx_hash: Some(tx_hash.into()),
            error: None,
            escrow_id: None,
            auth_token: None,
            tool: None,
        }
    }

    /// A completed payment
    pub fn paid(
        tx_hash: impl Into<String>,
        escrow_id: EscrowId,
        auth_token: AuthToken,
        tool: SelectedTool,
    ) -> Self {
        Self {
            success: true,
            tx_hash: Some(tx_hash.into()),
            error: None,
            escrow_id: Some(escrow_id),
            auth_token: Some(auth_token),
            tool: Some(tool),
        }
    }

    /// A failure before anything reached the chain
    pub fn failed(error: &HttpayError) -> Self {
        Self {
            success: false,
            tx_hash: None,
            error: Some(error.to_string()),
            escrow_id: None,
            auth_token: None,
            tool: None,
        }
    }

    /// A failure after a transaction hash was obtained
    ///
    /// The hash is kept so the caller can reconcile; payment fields stay empty.
    pub fn failed_with_tx(tx_hash: impl Into<String>, error: &HttpayError) -> Self {
        Self {
            tx_hash: Some(tx_hash.into()),
            ..Self::failed(error)
        }
    }

    pub fn success(&self) -> bool {
        self.success
    }

    pub fn tx_hash(&self) -> Option<&str> {
        self.tx_hash.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn escrow_id(&self) -> Option<EscrowId> {
        self.escrow_id
    }

    pub fn auth_token(&self) -> Option<&AuthToken> {
        self.auth_token.as_ref()
    }

    pub fn tool(&self) -> Option<&SelectedTool> {
        self.tool.as_ref()
    }

    /// Check if this result completed a payment
    pub fn is_payment(&self) -> bool {
        self.escrow_id.is_some() && self.auth_token.is_some()
    }
}
