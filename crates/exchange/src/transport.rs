//! Submission of signed payloads.
//!
//! The transport posts exactly once; retry policy is left to callers.

use hyperliquid_core::{ExchangePayload, Network};
use std::time::Duration as StdDuration;
use tracing::{debug, warn};

use crate::{ExchangeError, Result};

/// Posts signed payloads to the venue and returns the raw JSON response.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn post(&self, payload: &ExchangePayload) -> Result<serde_json::Value>;
}

/// `reqwest`-backed transport for `<base>/exchange`.
pub struct HttpTransport {
    base_url: String,
    http_client: reqwest::Client,
}

impl HttpTransport {
    /// Request timeout.
    pub const REQUEST_TIMEOUT: StdDuration = StdDuration::from_secs(30);
    /// Connect timeout.
    pub const CONNECT_TIMEOUT: StdDuration = StdDuration::from_secs(10);

    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Self::REQUEST_TIMEOUT)
            .connect_timeout(Self::CONNECT_TIMEOUT)
            .build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http_client,
        })
    }

    /// Transport for the network's public API.
    pub fn for_network(network: Network) -> Result<Self> {
        Self::new(network.api_url())
    }

    pub fn exchange_url(&self) -> String {
        format!("{}/exchange", self.base_url)
    }
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    async fn post(&self, payload: &ExchangePayload) -> Result<serde_json::Value> {
        let url = self.exchange_url();
        debug!(
            url = %url,
            action = payload.action.type_name(),
            nonce = payload.nonce,
            "Posting action"
        );

        let response = self.http_client.post(&url).json(payload).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "Exchange request rejected");
            return Err(ExchangeError::Api {
                message: if body.is_empty() {
                    format!("API error: {}", status)
                } else {
                    body
                },
                status: Some(status.as_u16()),
            });
        }

        Ok(response.json().await?)
    }
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exchange_url() {
        let transport = HttpTransport::new("http://127.0.0.1:3001/").unwrap();
        assert_eq!(transport.exchange_url(), "http://127.0.0.1:3001/exchange");
    }

    #[test]
    fn test_for_network() {
        let transport = HttpTransport::for_network(Network::Testnet).unwrap();
        assert_eq!(
            transport.exchange_url(),
            "https://api.hyperliquid-testnet.xyz/exchange"
        );
    }
}
