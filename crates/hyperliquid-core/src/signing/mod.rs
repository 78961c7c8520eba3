//! EIP-712 signing of venue actions.
//!
//! # Architecture
//!
//! ```text
//! Action ── canonical bytes ── action_hash ──► PhantomAgentEnvelope ─┐
//!    │                                                              ├─► TypedData ─► ActionSigner ─► ExchangePayload
//!    └───────────── field table ───────────► UserSignedEnvelope ────┘
//!
//! MultiSigCoordinator ── MultiSigRequest ──► participants ── Signature ──► coordinator ─► outer signer
//! ```
//!
//! # Example
//!
//! ```ignore
//! use hyperliquid_core::signing::ActionSigner;
//! use hyperliquid_core::types::Network;
//!
//! let signer = ActionSigner::new(private_key, Network::Mainnet);
//! let payload = signer.sign_action(action, nonce, None, None)?;
//! ```

pub mod domain;
pub mod envelope;
pub mod hasher;
pub mod multisig;
pub mod signer;
pub mod typed_data;

pub use domain::{Eip712Domain, L1_CHAIN_ID, USER_SIGNED_CHAIN_ID};
pub use envelope::{
    build_typed_data, select_envelope, Envelope, PhantomAgent, PhantomAgentEnvelope,
    SigningContext, UserSignedEnvelope,
};
pub use hasher::{action_hash, action_preimage, append_trailer};
pub use multisig::{sign_as_participant, MultiSigContext, MultiSigCoordinator, MultiSigRequest};
pub use signer::ActionSigner;
pub use typed_data::{compute_typed_data_hash, TypedData, TypedField, TypedValue};
