//! Recoverable ECDSA signatures in the venue's wire form.

use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Error, Result};

/// An `{r, s, v}` signature with `v` in Ethereum-canonical 27/28 form.
///
/// `r` and `s` serialize as minimal `0x` hex (no leading zeros), which is
/// the form the venue echoes and hashes inside multi-sig payloads.
/// Zero-padded 64-digit hex is accepted on input but never emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    pub r: U256,
    pub s: U256,
    pub v: u8,
}

/// Map a raw recovery id (0/1) to 27/28; values already >= 27 pass through.
pub fn normalize_v(raw: u8) -> u8 {
    if raw < 27 {
        raw + 27
    } else {
        raw
    }
}

impl Signature {
    /// Length of `r ‖ s ‖ v`.
    pub const LENGTH: usize = 65;

    /// Build from `r ‖ s ‖ v_raw`, normalizing `v`.
    pub fn from_raw(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != Self::LENGTH {
            return Err(Error::signing(format!(
                "expected {} signature bytes, got {}",
                Self::LENGTH,
                bytes.len()
            )));
        }

        let v = normalize_v(bytes[64]);
        if v != 27 && v != 28 {
            return Err(Error::signing(format!("unexpected recovery id {}", bytes[64])));
        }

        Ok(Self {
            r: U256::from_be_slice(&bytes[..32]),
            s: U256::from_be_slice(&bytes[32..64]),
            v,
        })
    }

    /// `r ‖ s ‖ v` with `v` as 27/28.
    pub fn to_bytes(&self) -> [u8; 65] {
        let mut bytes = [0u8; 65];
        bytes[..32].copy_from_slice(&self.r.to_be_bytes::<32>());
        bytes[32..64].copy_from_slice(&self.s.to_be_bytes::<32>());
        bytes[64] = self.v;
        bytes
    }

    /// 0x-prefixed 65-byte hex.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.to_bytes()))
    }

    /// Recover the signing address from the signed digest.
    pub fn recover_address(&self, prehash: &B256) -> Result<Address> {
        alloy_primitives::Signature::new(self.r, self.s, self.v == 28)
            .recover_address_from_prehash(prehash)
            .map_err(|e| Error::signing(format!("recovery failed: {}", e)))
    }
}

#[derive(Serialize, Deserialize)]
struct SignatureWire {
    r: String,
    s: String,
    v: u8,
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        SignatureWire {
            r: format!("{:#x}", self.r),
            s: format!("{:#x}", self.s),
            v: self.v,
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let wire = SignatureWire::deserialize(deserializer)?;
        let parse = |field: &str| {
            U256::from_str_radix(field.trim_start_matches("0x"), 16)
                .map_err(serde::de::Error::custom)
        };
        Ok(Self {
            r: parse(&wire.r)?,
            s: parse(&wire.s)?,
            v: normalize_v(wire.v),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(v: u8) -> Vec<u8> {
        let mut bytes = vec![0u8; 65];
        bytes[31] = 0x11;
        bytes[63] = 0x22;
        bytes[64] = v;
        bytes
    }

    #[test]
    fn test_normalize_v() {
        assert_eq!(normalize_v(0), 27);
        assert_eq!(normalize_v(1), 28);
        assert_eq!(normalize_v(27), 27);
        assert_eq!(normalize_v(28), 28);
    }

    #[test]
    fn test_from_raw_normalizes_recovery_id() {
        let sig = Signature::from_raw(&raw(1)).unwrap();
        assert_eq!(sig.v, 28);
        assert_eq!(sig.r, U256::from(0x11u64));
        assert_eq!(sig.s, U256::from(0x22u64));

        let sig = Signature::from_raw(&raw(27)).unwrap();
        assert_eq!(sig.v, 27);
    }

    #[test]
    fn test_from_raw_rejects_bad_length() {
        let err = Signature::from_raw(&[0u8; 64]).unwrap_err();
        assert!(matches!(err, Error::Signing { .. }));
    }

    #[test]
    fn test_from_raw_rejects_bad_recovery_id() {
        assert!(Signature::from_raw(&raw(5)).is_err());
        assert!(Signature::from_raw(&raw(35)).is_err());
    }

    #[test]
    fn test_to_bytes_layout() {
        let sig = Signature::from_raw(&raw(0)).unwrap();
        let bytes = sig.to_bytes();
        assert_eq!(bytes[31], 0x11);
        assert_eq!(bytes[63], 0x22);
        assert_eq!(bytes[64], 27);
        assert_eq!(sig.to_hex().len(), 132);
    }

    #[test]
    fn test_json_uses_minimal_hex() {
        let sig = Signature::from_raw(&raw(1)).unwrap();
        let json = serde_json::to_value(sig).unwrap();
        assert_eq!(json["r"], "0x11");
        assert_eq!(json["s"], "0x22");
        assert_eq!(json["v"], 28);

        let back: Signature = serde_json::from_value(json).unwrap();
        assert_eq!(back, sig);
    }

    #[test]
    fn test_json_accepts_padded_hex() {
        let padded = serde_json::json!({
            "r": format!("0x{:064x}", 0x11),
            "s": format!("0x{:064x}", 0x22),
            "v": 28,
        });
        let sig: Signature = serde_json::from_value(padded).unwrap();
        assert_eq!(sig, Signature::from_raw(&raw(1)).unwrap());

        let json = serde_json::to_value(sig).unwrap();
        assert_eq!(json["r"], "0x11");
        assert_eq!(json["s"], "0x22");
    }
}
