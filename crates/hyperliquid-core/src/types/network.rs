//! Venue network selection.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::Error;

/// Mainnet API base URL.
pub const MAINNET_API_URL: &str = "https://api.hyperliquid.xyz";

/// Testnet API base URL.
pub const TESTNET_API_URL: &str = "https://api.hyperliquid-testnet.xyz";

/// The venue environment an action is signed for.
///
/// Serializes as the `hyperliquidChain` discriminator carried by
/// user-signed actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Network {
    #[default]
    Mainnet,
    Testnet,
}

impl Network {
    pub fn is_mainnet(&self) -> bool {
        matches!(self, Network::Mainnet)
    }

    /// Phantom agent `source` field.
    pub fn agent_source(&self) -> &'static str {
        match self {
            Network::Mainnet => "a",
            Network::Testnet => "b",
        }
    }

    /// Value of the `hyperliquidChain` field.
    pub fn chain_name(&self) -> &'static str {
        match self {
            Network::Mainnet => "Mainnet",
            Network::Testnet => "Testnet",
        }
    }

    pub fn api_url(&self) -> &'static str {
        match self {
            Network::Mainnet => MAINNET_API_URL,
            Network::Testnet => TESTNET_API_URL,
        }
    }
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.chain_name())
    }
}

impl FromStr for Network {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mainnet" => Ok(Network::Mainnet),
            "testnet" => Ok(Network::Testnet),
            other => Err(Error::Config {
                message: format!("unknown network '{}', expected mainnet or testnet", other),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_source() {
        assert_eq!(Network::Mainnet.agent_source(), "a");
        assert_eq!(Network::Testnet.agent_source(), "b");
    }

    #[test]
    fn test_chain_name_serialization() {
        assert_eq!(
            serde_json::to_string(&Network::Testnet).unwrap(),
            "\"Testnet\""
        );
        assert_eq!(Network::Mainnet.to_string(), "Mainnet");
    }

    #[test]
    fn test_parse_network() {
        assert_eq!("MAINNET".parse::<Network>().unwrap(), Network::Mainnet);
        assert_eq!(" testnet ".parse::<Network>().unwrap(), Network::Testnet);
        assert!("devnet".parse::<Network>().is_err());
    }
}
