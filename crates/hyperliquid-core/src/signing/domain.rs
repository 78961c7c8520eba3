//! EIP-712 domain separators for venue signing.
//!
//! Two fixed domains exist: the L1 domain wrapping phantom agents, and the
//! user-signed domain for transfers and account administration. Neither
//! depends on caller input; mainnet and testnet are told apart inside the
//! signed message, not by the domain.

use alloy_primitives::{keccak256, Address, B256, U256};
use alloy_sol_types::SolValue;
use serde_json::json;

/// Chain ID of the L1 (phantom agent) domain.
pub const L1_CHAIN_ID: u64 = 1337;

/// Chain ID of the user-signed domain; `signatureChainId` on the wire.
pub const USER_SIGNED_CHAIN_ID: u64 = 421614;

/// Name of the L1 domain.
pub const L1_DOMAIN_NAME: &str = "Exchange";

/// Name of the user-signed domain.
pub const USER_SIGNED_DOMAIN_NAME: &str = "HyperliquidSignTransaction";

const DOMAIN_TYPE: &[u8] =
    b"EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)";

/// EIP-712 domain separator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Eip712Domain {
    /// Domain name.
    pub name: String,
    /// Domain version.
    pub version: String,
    /// Chain ID.
    pub chain_id: U256,
    /// Verifying contract address.
    pub verifying_contract: Address,
}

impl Eip712Domain {
    /// Domain for phantom-agent signatures.
    pub fn l1() -> Self {
        Self::custom(L1_DOMAIN_NAME, "1", L1_CHAIN_ID, Address::ZERO)
    }

    /// Domain for user-signed actions.
    pub fn user_signed() -> Self {
        Self::custom(USER_SIGNED_DOMAIN_NAME, "1", USER_SIGNED_CHAIN_ID, Address::ZERO)
    }

    /// Create domain with custom parameters.
    pub fn custom(
        name: impl Into<String>,
        version: impl Into<String>,
        chain_id: u64,
        verifying_contract: Address,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            chain_id: U256::from(chain_id),
            verifying_contract,
        }
    }

    /// Compute the EIP-712 domain separator hash.
    pub fn separator(&self) -> B256 {
        let domain_type_hash = keccak256(DOMAIN_TYPE);

        let name_hash = keccak256(self.name.as_bytes());
        let version_hash = keccak256(self.version.as_bytes());

        // encodeData pads the address to a full word.
        let contract_padded = B256::left_padding_from(self.verifying_contract.as_slice());

        let encoded = (
            domain_type_hash,
            name_hash,
            version_hash,
            self.chain_id,
            contract_padded,
        )
            .abi_encode_packed();

        keccak256(&encoded)
    }

    /// The domain as an EIP-712 JSON object.
    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "name": self.name,
            "version": self.version,
            "chainId": self.chain_id.to::<u64>(),
            "verifyingContract": crate::serde_utils::lower_hex(&self.verifying_contract),
        })
    }
}
