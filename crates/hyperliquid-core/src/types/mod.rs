//! Identifiers, signatures and client-facing request types.

pub mod cloid;
pub mod network;
pub mod order;
pub mod signature;

pub use cloid::*;
pub use network::*;
pub use order::*;
pub use signature::*;
