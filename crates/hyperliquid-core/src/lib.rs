//! Hyperliquid Core Library
//!
//! Wire model, canonical MessagePack encoding, action hashing and EIP-712
//! signing for Hyperliquid exchange actions. Everything here is a pure,
//! synchronous transform of its inputs; nonces, transport and metadata
//! lookup belong to the caller.

pub mod canonical;
pub mod config;
pub mod error;
pub mod numeric;
pub mod payload;
pub mod serde_utils;
pub mod signing;
pub mod types;
pub mod wallet;
pub mod wire;

pub use config::SignerConfig;
pub use error::{Error, Result};
pub use payload::ExchangePayload;
pub use signing::{ActionSigner, MultiSigContext, MultiSigCoordinator, SigningContext};
pub use types::{Cloid, Network, OrderRef, Signature};
pub use wallet::Wallet;
pub use wire::Action;
