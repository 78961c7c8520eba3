//! Signing key management.
//!
//! Loads the secp256k1 key that signs actions from the environment or from
//! a hex string.

use alloy_primitives::Address;
use alloy_signer_local::PrivateKeySigner;
use std::str::FromStr;

use crate::signing::ActionSigner;
use crate::types::Network;
use crate::{Error, Result};

/// Environment variable holding the signing key.
pub const PRIVATE_KEY_ENV: &str = "HL_PRIVATE_KEY";

/// A wallet with private key access for signing actions.
#[derive(Clone)]
pub struct Wallet {
    signer: PrivateKeySigner,
    address: Address,
}

impl Wallet {
    /// Load wallet from the `HL_PRIVATE_KEY` environment variable.
    ///
    /// The private key should be a 64-character hex string, optionally
    /// prefixed with "0x".
    ///
    /// # Errors
    ///
    /// Returns an error if the environment variable is not set or
    /// if the private key format is invalid.
    pub fn from_env() -> Result<Self> {
        let private_key = std::env::var(PRIVATE_KEY_ENV).map_err(|_| Error::Config {
            message: format!("{} environment variable not set", PRIVATE_KEY_ENV),
        })?;

        Self::from_private_key(&private_key)
    }

    /// Create a wallet from a hex-encoded private key.
    pub fn from_private_key(key: &str) -> Result<Self> {
        let key_clean = key.trim().trim_start_matches("0x");
        if key_clean.len() != 64 {
            return Err(Error::Config {
                message: "Invalid private key format - expected 64 hex characters".to_string(),
            });
        }

        let signer = PrivateKeySigner::from_str(key_clean).map_err(|e| Error::Config {
            message: format!("Invalid private key: {}", e),
        })?;
        let address = signer.address();

        Ok(Self { signer, address })
    }

    /// Get the wallet's address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Get a reference to the underlying signer.
    pub fn signer(&self) -> &PrivateKeySigner {
        &self.signer
    }

    /// An action signer for `network` backed by this wallet's key.
    pub fn action_signer(&self, network: Network) -> ActionSigner {
        ActionSigner::new(self.signer.clone(), network)
    }
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &format!("{}", self.address))
            .finish()
    }
}
