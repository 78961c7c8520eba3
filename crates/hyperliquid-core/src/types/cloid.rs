//! Client order identifiers.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

use crate::Error;

/// A 16-byte client order id, hex-encoded as `0x` + 32 lowercase digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cloid([u8; 16]);

impl Cloid {
    pub const LENGTH: usize = 16;

    pub fn new(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    pub fn from_u128(value: u128) -> Self {
        Self(value.to_be_bytes())
    }

    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Wire representation.
    pub fn to_raw(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl FromStr for Cloid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .ok_or_else(|| Error::UnknownIdentifier(format!("cloid '{}' must start with 0x", s)))?;
        if digits.len() != Self::LENGTH * 2 {
            return Err(Error::UnknownIdentifier(format!(
                "cloid '{}' must have {} hex digits",
                s,
                Self::LENGTH * 2
            )));
        }

        let mut bytes = [0u8; 16];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|e| Error::UnknownIdentifier(format!("cloid '{}': {}", s, e)))?;
        Ok(Self(bytes))
    }
}

impl std::fmt::Display for Cloid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_raw())
    }
}

impl Serialize for Cloid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_raw())
    }
}

impl<'de> Deserialize<'de> for Cloid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Reference to a resting order: the exchange-assigned id or the client id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OrderRef {
    Oid(u64),
    Cloid(Cloid),
}

impl From<u64> for OrderRef {
    fn from(oid: u64) -> Self {
        OrderRef::Oid(oid)
    }
}

impl From<Cloid> for OrderRef {
    fn from(cloid: Cloid) -> Self {
        OrderRef::Cloid(cloid)
    }
}

impl FromStr for OrderRef {
    type Err = Error;

    /// Decimal text is an order id; `0x`-prefixed text must be a cloid.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.starts_with("0x") {
            return s.parse::<Cloid>().map(OrderRef::Cloid);
        }
        s.parse::<u64>().map(OrderRef::Oid).map_err(|_| {
            Error::UnknownIdentifier(format!("'{}' is neither an order id nor a cloid", s))
        })
    }
}
