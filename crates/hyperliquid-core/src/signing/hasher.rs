//! Action digest: canonical bytes plus nonce, vault and expiry tags.

use alloy_primitives::{keccak256, Address, B256};
use serde::Serialize;
use tracing::debug;

use crate::canonical::to_canonical_bytes;
use crate::Result;

/// Append the nonce, vault and expiry trailer to canonical action bytes.
///
/// Vault absence is tagged `0x00`, presence `0x01` followed by the address.
/// Expiry has no tag when absent and `0x00` before the value when present.
pub fn append_trailer(
    buf: &mut Vec<u8>,
    nonce: u64,
    vault_address: Option<Address>,
    expires_after: Option<u64>,
) {
    buf.extend_from_slice(&nonce.to_be_bytes());

    match vault_address {
        Some(vault) => {
            buf.push(0x01);
            buf.extend_from_slice(vault.as_slice());
        }
        None => buf.push(0x00),
    }

    if let Some(expires_after) = expires_after {
        buf.push(0x00);
        buf.extend_from_slice(&expires_after.to_be_bytes());
    }
}

/// Bytes that [`action_hash`] feeds to Keccak-256.
pub fn action_preimage<T: Serialize + ?Sized>(
    action: &T,
    nonce: u64,
    vault_address: Option<Address>,
    expires_after: Option<u64>,
) -> Result<Vec<u8>> {
    let mut buf = to_canonical_bytes(action)?;
    append_trailer(&mut buf, nonce, vault_address, expires_after);
    Ok(buf)
}

/// Digest of an action; the phantom agent's `connectionId`.
pub fn action_hash<T: Serialize + ?Sized>(
    action: &T,
    nonce: u64,
    vault_address: Option<Address>,
    expires_after: Option<u64>,
) -> Result<B256> {
    let preimage = action_preimage(action, nonce, vault_address, expires_after)?;
    let digest = keccak256(&preimage);
    debug!(
        nonce,
        vault = ?vault_address,
        expires_after = ?expires_after,
        preimage_len = preimage.len(),
        digest = %digest,
        "Computed action hash"
    );
    Ok(digest)
}
