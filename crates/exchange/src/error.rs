//! Error types for the exchange orchestrator.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExchangeError {
    #[error(transparent)]
    Core(#[from] hyperliquid_core::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unknown asset: {0}")]
    UnknownAsset(String),

    #[error("No mid price for {0}")]
    MissingMidPrice(String),

    #[error("API error: {message}")]
    Api { message: String, status: Option<u16> },
}

pub type Result<T> = std::result::Result<T, ExchangeError>;
