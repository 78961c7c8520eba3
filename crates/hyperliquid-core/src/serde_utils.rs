//! Serde helpers for addresses on the wire.
//!
//! The venue expects lower-case `0x` hex for every address inside an
//! action, including the ones that are hashed.

use alloy_primitives::Address;
use serde::{Deserialize, Deserializer, Serializer};

/// Lower-case `0x`-prefixed hex of an address.
pub fn lower_hex(address: &Address) -> String {
    format!("0x{}", hex::encode(address.as_slice()))
}

pub mod address_hex {
    use super::*;

    pub fn serialize<S: Serializer>(address: &Address, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&lower_hex(address))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Address, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

pub mod option_address_hex {
    use super::*;

    pub fn serialize<S: Serializer>(
        address: &Option<Address>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match address {
            Some(address) => serializer.serialize_some(&lower_hex(address)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Address>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|raw| raw.parse().map_err(serde::de::Error::custom))
            .transpose()
    }
}
