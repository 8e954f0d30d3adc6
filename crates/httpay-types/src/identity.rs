//! Identity types for HTTPay
//!
//! Strongly typed wrappers so tool ids, escrow ids and session ids cannot be
//! mixed up, plus the opaque `AuthToken` credential.

use crate::{HttpayError, Result};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Maximum tool id length accepted by the registry contract
pub const MAX_TOOL_ID_LEN: usize = 16;

/// Number of random bytes in a generated auth token
pub const AUTH_TOKEN_BYTES: usize = 32;

/// Registry tool identifier
///
/// Validated on construction from caller input. Values read back from the
/// registry are taken as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolId(String);

impl ToolId {
    /// Parse a caller-supplied tool id
    pub fn parse(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(HttpayError::validation("tool_id", "must not be empty"));
        }
        if id.len() > MAX_TOOL_ID_LEN {
            return Err(HttpayError::validation(
                "tool_id",
                format!("must be {} characters or less", MAX_TOOL_ID_LEN),
            ));
        }
        if id.chars().any(char::is_whitespace) {
            return Err(HttpayError::validation("tool_id", "must not contain whitespace"));
        }
        Ok(Self(id))
    }

    /// Wrap an id reported by the registry contract
    pub fn from_registry(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the inner string
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ToolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ToolId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Sequential escrow identifier assigned by the escrow contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EscrowId(pub u64);

impl EscrowId {
    /// Get the raw id
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EscrowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EscrowId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Unique identifier for a payment session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    /// Create a new random session id
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session_{}", self.0)
    }
}

/// Opaque proof-of-payment credential bound to one escrow.
///
/// Committed on-chain inside the `lock_funds` message; the tool provider
/// redeems it once against the escrow record.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthToken(String);

impl AuthToken {
    /// Generate a fresh random token (hex encoded)
    pub fn generate() -> Self {
        let mut bytes = [0u8; AUTH_TOKEN_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(hex::encode(bytes))
    }

    /// Wrap an existing token value
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Get the token as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Compare against a presented token without short-circuiting on the
    /// first differing byte.
    pub fn matches(&self, presented: &str) -> bool {
        let a = self.0.as_bytes();
        let b = presented.as_bytes();
        if a.len() != b.len() {
            return false;
        }
        a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
    }
}

// Bearer credential: keep it out of logs.
impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix: String = self.0.chars().take(6).collect();
        write!(f, "AuthToken({}…)", prefix)
    }
}
