//! Error types for HTTPay
//!
//! Configuration and validation problems surface before any network call.
//! Chain failures are normalized into `ChainError` so callers never have to
//! parse raw node logs.

use thiserror::Error;

/// Result type for HTTPay operations
pub type Result<T> = std::result::Result<T, HttpayError>;

// ============================================================================
// Configuration Errors
// ============================================================================

/// Invalid SDK configuration. Fatal at construction, never retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// No configuration supplied
    #[error("Configuration object is required")]
    MissingConfig,

    /// A required field is absent
    #[error("{field} is required")]
    MissingField { field: &'static str },

    /// A field has the wrong JSON type
    #[error("{field} must be a {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },

    /// A URL field lacks an http(s) scheme
    #[error("{field} must be a valid HTTP or HTTPS URL (got '{value}')")]
    MalformedUrl { field: &'static str, value: String },

    /// An address lacks the chain's bech32 prefix
    #[error("{field} must be a valid address starting with {prefix}1 (got '{value}')")]
    MalformedAddress {
        field: &'static str,
        prefix: String,
        value: String,
    },

    /// Gas adjustment is zero or negative
    #[error("gasAdjustment must be a positive number (got {value})")]
    NonPositiveGasAdjustment { value: f64 },

    /// A numeric option is outside its allowed range
    #[error("{field} is out of range: {reason}")]
    OutOfRange { field: &'static str, reason: String },

    /// Loading from a file or the environment failed
    #[error("Failed to load configuration: {0}")]
    Load(String),
}

impl ConfigError {
    /// Field the error refers to, if any
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::MissingField { field }
            | Self::WrongType { field, .. }
            | Self::MalformedUrl { field, .. }
            | Self::MalformedAddress { field, .. }
            | Self::OutOfRange { field, .. } => Some(field),
            Self::NonPositiveGasAdjustment { .. } => Some("gasAdjustment"),
            Self::MissingConfig | Self::Load(_) => None,
        }
    }
}

// ============================================================================
// Chain Errors
// ============================================================================

/// A failure reported by the chain or by the transport to it
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    /// Queried entity does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// Escrow was already released or refunded
    #[error("already settled: {0}")]
    AlreadySettled(String),

    /// Payer cannot cover the attached funds and fees
    #[error("insufficient funds: {0}")]
    InsufficientFunds(String),

    /// Any other contract or ante-handler rejection
    #[error("transaction rejected: {0}")]
    Rejected(String),

    /// Transport failure talking to the node
    #[error("network error: {0}")]
    Network(String),

    /// Request timed out
    #[error("timed out: {0}")]
    Timeout(String),

    /// Broadcast accepted but the outcome could not be confirmed
    #[error("transaction {tx_hash} not confirmed after {attempts} attempts")]
    Unconfirmed { tx_hash: String, attempts: u32 },

    /// The node answered with something we could not decode
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl ChainError {
    /// Normalize a raw node or contract message
    pub fn classify(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let lower = raw.to_lowercase();
        if lower.contains("insufficient funds") || lower.contains("insufficient fee") {
            Self::InsufficientFunds(raw)
        } else if lower.contains("already released")
            || lower.contains("already refunded")
            || lower.contains("already settled")
        {
            Self::AlreadySettled(raw)
        } else if lower.contains("not found") {
            Self::NotFound(raw)
        } else if lower.contains("timed out") || lower.contains("timeout") {
            Self::Timeout(raw)
        } else if lower.contains("connection") || lower.contains("network") {
            Self::Network(raw)
        } else {
            Self::Rejected(raw)
        }
    }

    /// Check if retrying the same request could succeed
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::Timeout(_) | Self::Unconfirmed { .. }
        )
    }
}

// ============================================================================
// SDK Errors
// ============================================================================

/// HTTPay error types
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HttpayError {
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Caller input rejected before building a message
    #[error("Validation failed: {field} {reason}")]
    Validation { field: String, reason: String },

    /// Entity does not exist on chain
    #[error("Not found: {what}")]
    NotFound { what: String },

    /// Tool is absent from the registry or inactive
    #[error("Unknown tool: {tool_id}")]
    UnknownTool { tool_id: String },

    /// Operation requested from the wrong session state
    #[error("Invalid state: requires {required}, session is {actual}")]
    InvalidState { required: String, actual: String },

    /// A payment is already in flight for this session
    #[error("A payment is already in progress for this session")]
    OperationInProgress,

    /// No broadcaster was supplied for a signing operation
    #[error("Signing is unavailable: no broadcaster configured")]
    SigningUnavailable,

    /// Chain failure
    #[error("Chain error: {0}")]
    Chain(ChainError),

    /// Escrow already released or refunded
    #[error("Already settled: {what}")]
    AlreadySettled { what: String },

    /// Message (de)serialization failed
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl HttpayError {
    /// Create a validation error
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a not-found error
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// Check if this is a retriable error
    pub fn is_retriable(&self) -> bool {
        match self {
            Self::Chain(err) => err.is_transient(),
            _ => false,
        }
    }

    /// Get an error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG_ERROR",
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::UnknownTool { .. } => "UNKNOWN_TOOL",
            Self::InvalidState { .. } => "INVALID_STATE",
            Self::OperationInProgress => "OPERATION_IN_PROGRESS",
            Self::SigningUnavailable => "SIGNING_UNAVAILABLE",
            Self::Chain(ChainError::InsufficientFunds(_)) => "INSUFFICIENT_FUNDS",
            Self::Chain(ChainError::Network(_)) => "NETWORK_ERROR",
            Self::Chain(ChainError::Timeout(_)) => "TIMEOUT",
            Self::Chain(ChainError::Unconfirmed { .. }) => "UNCONFIRMED",
            Self::Chain(_) => "CHAIN_ERROR",
            Self::AlreadySettled { .. } => "ALREADY_SETTLED",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }
}

impl From<ChainError> for HttpayError {
    fn from(err: ChainError) -> Self {
        match err {
            ChainError::NotFound(what) => Self::NotFound { what },
            ChainError::AlreadySettled(what) => Self::AlreadySettled { what },
            other => Self::Chain(other),
        }
    }
}

impl From<serde_json::Error> for HttpayError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
