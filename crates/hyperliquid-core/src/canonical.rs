//! Canonical MessagePack encoding of wire values.
//!
//! Structs become maps keyed by their serde field names in declaration
//! order, integers take their most compact MessagePack form and strings are
//! `str` types. Both the client and the venue derive these bytes from the
//! same logical action, so any divergence breaks every signature
//! downstream.

use serde::Serialize;

use crate::Result;

/// Encode `value` as named-field MessagePack.
pub fn to_canonical_bytes<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    Ok(rmp_serde::to_vec_named(value)?)
}
