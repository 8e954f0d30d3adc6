//! Base-unit amounts
//!
//! Prices and escrow fees are CosmWasm `Uint128` values: unsigned integers in
//! the token's smallest unit (e.g. `untrn`). They travel as decimal strings on
//! the wire and are never converted through floating point.

use crate::{HttpayError, Result};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Unsigned 128-bit base-unit amount
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Uint128(u128);

impl Uint128 {
    /// The zero amount
    pub const ZERO: Self = Self(0);

    /// Create from a raw value
    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    /// Get the raw value
    pub const fn u128(&self) -> u128 {
        self.0
    }

    /// Check if the amount is zero
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Parse a base-unit integer string.
    ///
    /// Only ASCII digits are accepted: no sign, decimal point, exponent or
    /// surrounding whitespace. Values above `u128::MAX` are rejected.
    pub fn parse(field: &str, s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(HttpayError::validation(field, "amount must not be empty"));
        }
        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(HttpayError::validation(
                field,
                format!("'{}' is not a base-unit integer string", s),
            ));
        }
        s.parse::<u128>()
            .map(Self)
            .map_err(|_| HttpayError::validation(field, format!("'{}' exceeds Uint128 range", s)))
    }
}

impl fmt::Display for Uint128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Uint128 {
    type Err = HttpayError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse("amount", s)
    }
}

impl From<u128> for Uint128 {
    fn from(value: u128) -> Self {
        Self(value)
    }
}

impl From<u64> for Uint128 {
    fn from(value: u64) -> Self {
        Self(value as u128)
    }
}

impl Serialize for Uint128 {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Uint128 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(Uint128Visitor)
    }
}

struct Uint128Visitor;

impl<'de> Visitor<'de> for Uint128Visitor {
    type Value = Uint128;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a base-unit integer string")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Uint128, E> {
        Uint128::parse("amount", v).map_err(|e| E::custom(e.to_string()))
    }

    // Some nodes render small amounts as JSON numbers.
    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Uint128, E> {
        Ok(Uint128::from(v))
    }
}

/// An amount of a specific denomination
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coin {
    /// Token denomination (e.g. "untrn" or an IBC denom)
    pub denom: String,
    /// Base-unit amount
    pub amount: Uint128,
}

impl Coin {
    /// Create a new coin
    pub fn new(amount: impl Into<Uint128>, denom: impl Into<String>) -> Self {
        Self {
            denom: denom.into(),
            amount: amount.into(),
        }
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}
