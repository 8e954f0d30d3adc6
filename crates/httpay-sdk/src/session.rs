//! Payment sessions
//!
//! A session tracks one payer's progress from choosing a tool to holding an
//! auth token. Each caller owns its sessions and passes them into the
//! orchestrator; nothing here is global.

use httpay_types::{AuthToken, EscrowId, HttpayError, Result, SelectedTool, SessionId};
use parking_lot::Mutex;
use std::fmt;

/// Where a session is in the payment flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionPhase {
    /// Nothing selected
    Idle,
    /// A tool is selected and its price snapshot held
    ToolSelected(SelectedTool),
    /// The lock transaction is in flight
    AwaitingPayment(SelectedTool),
    /// The lock was broadcast but its escrow is not confirmed yet
    PendingConfirmation {
        tool: SelectedTool,
        auth_token: AuthToken,
        tx_hash: String,
    },
    /// Funds are locked in escrow
    Paid {
        escrow_id: EscrowId,
        auth_token: AuthToken,
        tx_hash: String,
    },
}

impl SessionPhase {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::ToolSelected(_) => "tool_selected",
            Self::AwaitingPayment(_) => "awaiting_payment",
            Self::PendingConfirmation { .. } => "pending_confirmation",
            Self::Paid { .. } => "paid",
        }
    }

    /// Selected tool snapshot, if any
    pub fn selected_tool(&self) -> Option<&SelectedTool> {
        match self {
            Self::ToolSelected(tool)
            | Self::AwaitingPayment(tool)
            | Self::PendingConfirmation { tool, .. } => Some(tool),
            _ => None,
        }
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single payer's payment session
///
/// The phase lock is only ever held for a synchronous read or swap.
#[derive(Debug)]
pub struct PaymentSession {
    id: SessionId,
    phase: Mutex<SessionPhase>,
}

impl Default for PaymentSession {
    fn default() -> Self {
        Self::new()
    }
}

impl PaymentSession {
    pub fn new() -> Self {
        Self {
            id: SessionId::new(),
            phase: Mutex::new(SessionPhase::Idle),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Snapshot of the current phase
    pub fn phase(&self) -> SessionPhase {
        self.phase.lock().clone()
    }

    pub fn selected_tool(&self) -> Option<SelectedTool> {
        self.phase.lock().selected_tool().cloned()
    }

    pub fn is_paid(&self) -> bool {
        matches!(*self.phase.lock(), SessionPhase::Paid { .. })
    }

    /// Fail unless a tool may be (re)selected
    pub(crate) fn ensure_selectable(&self) -> Result<()> {
        match &*self.phase.lock() {
            SessionPhase::Idle | SessionPhase::ToolSelected(_) => Ok(()),
            SessionPhase::AwaitingPayment(_) => Err(HttpayError::OperationInProgress),
            other => Err(invalid_state("idle or tool_selected", other)),
        }
    }

    /// Store a tool snapshot, replacing any earlier selection
    pub(crate) fn select(&self, tool: SelectedTool) -> Result<()> {
        let mut phase = self.phase.lock();
        match &*phase {
            SessionPhase::Idle | SessionPhase::ToolSelected(_) => {
                *phase = SessionPhase::ToolSelected(tool);
                Ok(())
            }
            SessionPhase::AwaitingPayment(_) => Err(HttpayError::OperationInProgress),
            other => Err(invalid_state("idle or tool_selected", other)),
        }
    }

    /// Move to `AwaitingPayment`, returning a guard that owns the attempt
    ///
    /// A session pending confirmation resumes with its earlier broadcast.
    pub(crate) fn begin_payment(&self) -> Result<InFlight<'_>> {
        let mut phase = self.phase.lock();
        let (tool, broadcast) = match &*phase {
            SessionPhase::ToolSelected(tool) => (tool.clone(), None),
            SessionPhase::PendingConfirmation {
                tool,
                auth_token,
                tx_hash,
            } => (
                tool.clone(),
                Some(Broadcast {
                    auth_token: auth_token.clone(),
                    tx_hash: tx_hash.clone(),
                }),
            ),
            SessionPhase::AwaitingPayment(_) => return Err(HttpayError::OperationInProgress),
            other => return Err(invalid_state("tool_selected or pending_confirmation", other)),
        };
        *phase = SessionPhase::AwaitingPayment(tool.clone());
        Ok(InFlight {
            session: self,
            tool,
            broadcast,
            settled: false,
        })
    }

    /// Drop any selection or payment and return to `Idle`
    ///
    /// Returns the phase that was discarded.
    pub(crate) fn reset(&self) -> Result<SessionPhase> {
        let mut phase = self.phase.lock();
        if matches!(*phase, SessionPhase::AwaitingPayment(_)) {
            return Err(HttpayError::OperationInProgress);
        }
        Ok(std::mem::replace(&mut *phase, SessionPhase::Idle))
    }
}

fn invalid_state(required: &str, actual: &SessionPhase) -> HttpayError {
    HttpayError::InvalidState {
        required: required.to_string(),
        actual: actual.name().to_string(),
    }
}

/// A lock transaction accepted by the node
#[derive(Debug, Clone)]
pub(crate) struct Broadcast {
    pub(crate) auth_token: AuthToken,
    pub(crate) tx_hash: String,
}

/// An in-flight payment attempt
///
/// Dropping it without `complete` puts the session back to `ToolSelected`,
/// or to `PendingConfirmation` once a broadcast was accepted. This covers
/// both failures and a cancelled future.
pub(crate) struct InFlight<'a> {
    session: &'a PaymentSession,
    tool: SelectedTool,
    broadcast: Option<Broadcast>,
    settled: bool,
}

impl InFlight<'_> {
    pub(crate) fn tool(&self) -> &SelectedTool {
        &self.tool
    }

    /// Broadcast carried over from an earlier attempt, if any
    pub(crate) fn broadcast(&self) -> Option<&Broadcast> {
        self.broadcast.as_ref()
    }

    /// Record an accepted broadcast; the attempt can no longer fall back to
    /// `ToolSelected` on its own
    pub(crate) fn broadcasted(&mut self, auth_token: AuthToken, tx_hash: String) {
        self.broadcast = Some(Broadcast {
            auth_token,
            tx_hash,
        });
    }

    /// The lock transaction failed on chain, so nothing was locked
    pub(crate) fn rejected(&mut self) {
        self.broadcast = None;
    }

    /// Record the locked escrow; clears the tool snapshot
    pub(crate) fn complete(mut self, escrow_id: EscrowId, auth_token: AuthToken, tx_hash: String) {
        *self.session.phase.lock() = SessionPhase::Paid {
            escrow_id,
            auth_token,
            tx_hash,
        };
        self.settled = true;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let tool = self.tool.clone();
        let mut phase = self.session.phase.lock();
        if matches!(*phase, SessionPhase::AwaitingPayment(_)) {
            *phase = match self.broadcast.take() {
                Some(Broadcast {
                    auth_token,
                    tx_hash,
                }) => SessionPhase::PendingConfirmation {
                    tool,
                    auth_token,
                    tx_hash,
                },
                None => SessionPhase::ToolSelected(tool),
            };
        }
    }
}
