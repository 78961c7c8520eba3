//! Signing configuration from the environment.

use alloy_primitives::Address;
use std::env;

use crate::types::Network;
use crate::{Error, Result};

/// Settings shared by every signed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignerConfig {
    pub network: Network,
    pub vault_address: Option<Address>,
    pub expires_after: Option<u64>,
    pub api_url: String,
}

impl SignerConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `HL_NETWORK` | `mainnet` |
    /// | `HL_VAULT_ADDRESS` | unset |
    /// | `HL_EXPIRES_AFTER_MS` | unset |
    /// | `HL_API_URL` | the network's public API |
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let network = match env::var("HL_NETWORK") {
            Ok(raw) => raw.parse::<Network>()?,
            Err(_) => Network::Mainnet,
        };

        let vault_address = env::var("HL_VAULT_ADDRESS")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(|raw| {
                raw.trim().parse::<Address>().map_err(|e| Error::Config {
                    message: format!("HL_VAULT_ADDRESS is not an address: {}", e),
                })
            })
            .transpose()?;

        let expires_after = env::var("HL_EXPIRES_AFTER_MS")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(|raw| {
                raw.trim().parse::<u64>().map_err(|_| Error::Config {
                    message: format!("HL_EXPIRES_AFTER_MS is not an integer: {}", raw),
                })
            })
            .transpose()?;

        let api_url = env::var("HL_API_URL").unwrap_or_else(|_| network.api_url().to_string());

        Ok(Self {
            network,
            vault_address,
            expires_after,
            api_url,
        })
    }

    /// Defaults for `network` with no vault or expiry.
    pub fn for_network(network: Network) -> Self {
        Self {
            network,
            vault_address: None,
            expires_after: None,
            api_url: network.api_url().to_string(),
        }
    }

    /// Load configuration for testing (with defaults).
    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            network: Network::Testnet,
            vault_address: None,
            expires_after: None,
            api_url: "http://127.0.0.1:3001".to_string(),
        }
    }
}

impl Default for SignerConfig {
    fn default() -> Self {
        Self::for_network(Network::Mainnet)
    }
}
