//! Metadata and price collaborators.

use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::{ExchangeError, Result};

/// Coin → asset id and size-decimals lookup.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Asset id of `coin`, e.g. `"ETH"` or `"xyz:BTC"`.
    async fn asset(&self, coin: &str) -> Result<u32>;

    /// Size decimals of `asset`.
    async fn sz_decimals(&self, asset: u32) -> Result<u32>;
}

/// Mid-price lookup.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MidPriceProvider: Send + Sync {
    /// Current mid of `coin` on `dex` (`""` for the default perp dex).
    async fn mid(&self, dex: &str, coin: &str) -> Result<f64>;
}

/// Fixed asset table.
#[derive(Debug, Clone, Default)]
pub struct StaticMetadata {
    assets: HashMap<String, u32>,
    sz_decimals: HashMap<u32, u32>,
}

impl StaticMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_asset(mut self, coin: impl Into<String>, asset: u32, sz_decimals: u32) -> Self {
        self.assets.insert(coin.into(), asset);
        self.sz_decimals.insert(asset, sz_decimals);
        self
    }
}

#[async_trait::async_trait]
impl MetadataProvider for StaticMetadata {
    async fn asset(&self, coin: &str) -> Result<u32> {
        self.assets
            .get(coin)
            .copied()
            .ok_or_else(|| ExchangeError::UnknownAsset(coin.to_string()))
    }

    async fn sz_decimals(&self, asset: u32) -> Result<u32> {
        self.sz_decimals
            .get(&asset)
            .copied()
            .ok_or_else(|| ExchangeError::UnknownAsset(asset.to_string()))
    }
}

/// In-memory mids keyed by dex and coin.
#[derive(Debug, Default)]
pub struct StaticMids {
    mids: RwLock<HashMap<(String, String), f64>>,
}

impl StaticMids {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mid(mut self, dex: impl Into<String>, coin: impl Into<String>, mid: f64) -> Self {
        self.mids.get_mut().insert((dex.into(), coin.into()), mid);
        self
    }

    /// Replace the mid of `coin` on `dex`.
    pub async fn set_mid(&self, dex: impl Into<String>, coin: impl Into<String>, mid: f64) {
        let mut mids = self.mids.write().await;
        mids.insert((dex.into(), coin.into()), mid);
    }
}

#[async_trait::async_trait]
impl MidPriceProvider for StaticMids {
    async fn mid(&self, dex: &str, coin: &str) -> Result<f64> {
        let mids = self.mids.read().await;
        mids.get(&(dex.to_string(), coin.to_string()))
            .copied()
            .ok_or_else(|| ExchangeError::MissingMidPrice(coin.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_metadata_lookup() {
        let meta = StaticMetadata::new()
            .with_asset("ETH", 4, 4)
            .with_asset("PURR/USDC", 10_000, 0);

        assert_eq!(meta.asset("ETH").await.unwrap(), 4);
        assert_eq!(meta.sz_decimals(4).await.unwrap(), 4);
        assert_eq!(meta.asset("PURR/USDC").await.unwrap(), 10_000);
        assert!(matches!(
            meta.asset("DOGE").await.unwrap_err(),
            ExchangeError::UnknownAsset(_)
        ));
    }

    #[tokio::test]
    async fn test_static_mids_by_dex() {
        let mids = StaticMids::new()
            .with_mid("", "ETH", 1800.5)
            .with_mid("xyz", "xyz:BTC", 60_000.0);

        assert_eq!(mids.mid("", "ETH").await.unwrap(), 1800.5);
        assert_eq!(mids.mid("xyz", "xyz:BTC").await.unwrap(), 60_000.0);
        assert!(matches!(
            mids.mid("xyz", "ETH").await.unwrap_err(),
            ExchangeError::MissingMidPrice(_)
        ));

        mids.set_mid("", "ETH", 1900.0).await;
        assert_eq!(mids.mid("", "ETH").await.unwrap(), 1900.0);
    }
}
