//! The signed request body posted to `/exchange`.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use crate::serde_utils::option_address_hex;
use crate::types::Signature;
use crate::wire::Action;

/// `{action, nonce, signature, vaultAddress, expiresAfter}`.
///
/// Absent vault and expiry serialize as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangePayload {
    pub action: Action,
    pub nonce: u64,
    pub signature: Signature,
    #[serde(default, with = "option_address_hex")]
    pub vault_address: Option<Address>,
    #[serde(default)]
    pub expires_after: Option<u64>,
}

impl ExchangePayload {
    /// Assemble a payload. `usdClassTransfer` and `sendAsset` never carry a
    /// vault address on the wire.
    pub fn new(
        action: Action,
        nonce: u64,
        signature: Signature,
        vault_address: Option<Address>,
        expires_after: Option<u64>,
    ) -> Self {
        let vault_address = match action {
            Action::UsdClassTransfer(_) | Action::SendAsset(_) => None,
            _ => vault_address,
        };
        Self {
            action,
            nonce,
            signature,
            vault_address,
            expires_after,
        }
    }

    pub fn to_json(&self) -> crate::Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}
