//! Hyperliquid Exchange
//!
//! Resolves coins, issues nonces, signs actions and posts them to the venue.

pub mod error;
pub mod exchange;
pub mod nonce;
pub mod providers;
pub mod transport;

pub use error::{ExchangeError, Result};
pub use exchange::{Exchange, DEFAULT_SLIPPAGE};
pub use nonce::{Clock, NonceManager, SystemClock};
pub use providers::{MetadataProvider, MidPriceProvider, StaticMetadata, StaticMids};
pub use transport::{HttpTransport, Transport};
