//! Payment orchestration
//!
//! Drives a `PaymentSession` through tool selection and the escrow lock,
//! and exposes the settlement helpers that follow a payment.

use crate::config::SdkConfig;
use crate::retry::RetryConfig;
use crate::session::{PaymentSession, SessionPhase};
use httpay_escrow::{escrow_id_from_events, expiry_height, EscrowClient, EscrowVerifier, VerificationResult};
use httpay_registry::RegistryClient;
use httpay_types::{
    AuthToken, Broadcaster, ChainError, ChainQuerier, EscrowId, EscrowRecord, HttpayError,
    Result, SelectedTool, Tool, ToolId, TransactionResult,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// How a broadcast lock transaction ended up
enum Confirmation {
    Locked(EscrowId),
    /// Included with a failing code; nothing was locked
    Rejected(HttpayError),
    /// Could not be determined; funds may be locked
    Unknown(HttpayError),
}

/// Coordinates registry, escrow and session state for payers
pub struct PaymentOrchestrator {
    config: Arc<SdkConfig>,
    querier: Arc<dyn ChainQuerier>,
    broadcaster: Option<Arc<dyn Broadcaster>>,
    registry: RegistryClient,
    escrow: EscrowClient,
    retry: RetryConfig,
}

impl PaymentOrchestrator {
    /// Create a read-only orchestrator; payments need `with_broadcaster`
    pub fn new(config: Arc<SdkConfig>, querier: Arc<dyn ChainQuerier>) -> Self {
        let registry = RegistryClient::new(&config.registry_address, querier.clone());
        let escrow = EscrowClient::new(&config.escrow_address, querier.clone());
        Self {
            config,
            querier,
            broadcaster: None,
            registry,
            escrow,
            retry: RetryConfig::default(),
        }
    }

    /// Attach the signing capability
    pub fn with_broadcaster(mut self, broadcaster: Arc<dyn Broadcaster>) -> Self {
        self.broadcaster = Some(broadcaster);
        self
    }

    /// Override the transaction status polling policy
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn config(&self) -> &SdkConfig {
        &self.config
    }

    pub fn registry(&self) -> &RegistryClient {
        &self.registry
    }

    pub fn escrow(&self) -> &EscrowClient {
        &self.escrow
    }

    fn broadcaster(&self) -> Result<&Arc<dyn Broadcaster>> {
        self.broadcaster.as_ref().ok_or(HttpayError::SigningUnavailable)
    }

    // ========================================================================
    // Payer Flow
    // ========================================================================

    /// Active tools, in registry order
    pub async fn list_tools(&self) -> Result<Vec<Tool>> {
        let tools = self.registry.get_tools().await?;
        Ok(tools.into_iter().filter(|t| t.is_active).collect())
    }

    /// Select a tool for the session
    ///
    /// Absent, paused and malformed tool ids are all `UnknownTool`. The
    /// session is left untouched on any failure.
    pub async fn select_tool(&self, session: &PaymentSession, tool_id: &str) -> Result<SelectedTool> {
        session.ensure_selectable()?;
        let tool_id = ToolId::parse(tool_id).map_err(|_| HttpayError::UnknownTool {
            tool_id: tool_id.to_string(),
        })?;

        let tool = match self.registry.get_tool(tool_id.as_str()).await {
            Ok(tool) if tool.is_active => tool,
            Ok(_) | Err(HttpayError::NotFound { .. }) => {
                return Err(HttpayError::UnknownTool {
                    tool_id: tool_id.into_inner(),
                })
            }
            Err(err) => return Err(err),
        };

        let selected = tool.snapshot();
        session.select(selected.clone())?;
        info!(session = %session.id(), tool_id = %selected.tool_id, price = %selected.price_coin(), "Tool selected");
        Ok(selected)
    }

    /// Lock the selected tool's price in escrow
    ///
    /// Submits at most one lock transaction per selection. Chain failures
    /// come back as an unsuccessful `TransactionResult`; usage errors are
    /// returned as `Err` before anything is sent.
    ///
    /// When the lock was accepted but its escrow could not be confirmed, the
    /// session stays `PendingConfirmation` and a later call polls the same
    /// transaction again instead of paying twice. A transaction that failed
    /// on chain hands the selection back.
    pub async fn confirm_payment(&self, session: &PaymentSession) -> Result<TransactionResult> {
        let mut attempt = session.begin_payment()?;
        let tool = attempt.tool().clone();

        let prior = attempt.broadcast().cloned();
        let (auth_token, tx_hash, escrow_id) = match prior {
            Some(prior) => {
                info!(session = %session.id(), tool_id = %tool.tool_id, tx_hash = %prior.tx_hash, "Resuming payment");
                (prior.auth_token, prior.tx_hash, None)
            }
            None => {
                let broadcaster = self.broadcaster()?.clone();
                info!(
                    session = %session.id(),
                    tool_id = %tool.tool_id,
                    payer = %broadcaster.sender(),
                    "Payment started"
                );

                let height = match self.querier.block_height().await {
                    Ok(height) => height,
                    Err(err) => return Ok(self.payment_failed(session, None, err.into())),
                };
                let expires = expiry_height(height, self.config.escrow_ttl_blocks)?;

                let auth_token = AuthToken::generate();
                let envelope = self
                    .escrow
                    .lock(&tool, tool.price, &tool.denom, &auth_token, expires)?;

                let resp = match broadcaster.sign_and_broadcast(std::slice::from_ref(&envelope)).await {
                    Ok(resp) => resp,
                    Err(err) => return Ok(self.payment_failed(session, None, err.into())),
                };
                attempt.broadcasted(auth_token.clone(), resp.tx_hash.clone());
                debug!(session = %session.id(), tx_hash = %resp.tx_hash, expires, "Lock broadcast");

                let escrow_id = escrow_id_from_events(&resp.events);
                (auth_token, resp.tx_hash, escrow_id)
            }
        };

        let escrow_id = match escrow_id {
            Some(id) => id,
            None => match self.await_escrow_id(&tx_hash).await {
                Confirmation::Locked(id) => id,
                Confirmation::Rejected(err) => {
                    attempt.rejected();
                    return Ok(self.payment_failed(session, Some(tx_hash), err));
                }
                Confirmation::Unknown(err) => {
                    return Ok(self.payment_failed(session, Some(tx_hash), err))
                }
            },
        };

        attempt.complete(escrow_id, auth_token.clone(), tx_hash.clone());
        info!(
            session = %session.id(),
            tool_id = %tool.tool_id,
            escrow_id = %escrow_id,
            tx_hash = %tx_hash,
            "Payment locked"
        );
        Ok(TransactionResult::paid(tx_hash, escrow_id, auth_token, tool))
    }

    fn payment_failed(
        &self,
        session: &PaymentSession,
        tx_hash: Option<String>,
        err: HttpayError,
    ) -> TransactionResult {
        warn!(
            session = %session.id(),
            tx_hash = tx_hash.as_deref().unwrap_or_default(),
            error = %err,
            "Payment failed"
        );
        match tx_hash {
            Some(hash) => TransactionResult::failed_with_tx(hash, &err),
            None => TransactionResult::failed(&err),
        }
    }

    /// Poll for an included lock transaction and read its escrow id
    async fn await_escrow_id(&self, tx_hash: &str) -> Confirmation {
        for attempt in 0..self.retry.max_attempts {
            match self.querier.tx(tx_hash).await {
                Ok(Some(outcome)) => {
                    let outcome = match outcome.into_result() {
                        Ok(outcome) => outcome,
                        Err(err) => return Confirmation::Rejected(err.into()),
                    };
                    return match escrow_id_from_events(&outcome.events) {
                        Some(id) => Confirmation::Locked(id),
                        None => Confirmation::Unknown(
                            ChainError::InvalidResponse(format!(
                                "transaction {} carries no escrow id",
                                tx_hash
                            ))
                            .into(),
                        ),
                    };
                }
                Ok(None) => debug!(tx_hash, attempt, "Transaction not yet indexed"),
                Err(err) if err.is_transient() => {
                    debug!(tx_hash, attempt, error = %err, "Transaction lookup failed")
                }
                Err(err) => return Confirmation::Unknown(err.into()),
            }
            if attempt + 1 < self.retry.max_attempts {
                tokio::time::sleep(self.retry.delay_for(attempt)).await;
            }
        }

        Confirmation::Unknown(
            ChainError::Unconfirmed {
                tx_hash: tx_hash.to_string(),
                attempts: self.retry.max_attempts,
            }
            .into(),
        )
    }

    /// Return the session to `Idle`
    ///
    /// Resetting a session pending confirmation forgets its lock
    /// transaction; funds it locked are only recovered by `refund`.
    pub fn reset(&self, session: &PaymentSession) -> Result<()> {
        match session.reset()? {
            SessionPhase::PendingConfirmation { tx_hash, .. } => {
                warn!(session = %session.id(), tx_hash = %tx_hash, "Session reset with an unconfirmed lock")
            }
            _ => debug!(session = %session.id(), "Session reset"),
        }
        Ok(())
    }

    // ========================================================================
    // Settlement
    // ========================================================================

    /// Release `usage_fee` from an escrow to its provider
    pub async fn release(&self, escrow_id: EscrowId, usage_fee: &str) -> Result<TransactionResult> {
        let broadcaster = self.broadcaster()?;
        let envelope = self.escrow.release(escrow_id, usage_fee)?;
        Ok(self.escrow.submit(broadcaster.as_ref(), &envelope).await)
    }

    /// Refund an expired escrow to its payer
    pub async fn refund(&self, escrow_id: EscrowId) -> Result<TransactionResult> {
        let broadcaster = self.broadcaster()?;
        let envelope = self.escrow.refund(escrow_id)?;
        Ok(self.escrow.submit(broadcaster.as_ref(), &envelope).await)
    }

    pub async fn get_escrow(&self, escrow_id: EscrowId) -> Result<EscrowRecord> {
        self.escrow.get_escrow(escrow_id).await
    }

    /// Provider-side check of a presented escrow and auth token
    pub async fn verify_escrow(
        &self,
        escrow_id: EscrowId,
        auth_token: &str,
        provider: &str,
        now_height: Option<u64>,
    ) -> VerificationResult {
        EscrowVerifier::new(self.escrow.clone())
            .verify(escrow_id, auth_token, provider, now_height)
            .await
    }
}

impl std::fmt::Debug for PaymentOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentOrchestrator")
            .field("chain_id", &self.config.chain_id)
            .field("registry", &self.registry)
            .field("escrow", &self.escrow)
            .field("can_sign", &self.broadcaster.is_some())
            .finish()
    }
}
