//! hl-signer: Hyperliquid action signing and canonical encoding
//!
//! The root crate hosts the `hl-sign` CLI, benchmarks and cross-crate tests.
//! Library users depend on the member crates directly:
//!
//! - `hyperliquid-core`: wire actions, canonical encoding, EIP-712 signing
//! - `hyperliquid-exchange`: asset resolution, nonces, submission

pub use hyperliquid_core;
pub use hyperliquid_exchange;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reexports_leave_core_unshadowed() {
        // A glob import of a `core` item would make this path ambiguous.
        assert_eq!(core::cmp::max(1, 2), 2);
        assert_eq!(
            hyperliquid_core::Network::Testnet,
            crate::hyperliquid_core::Network::Testnet
        );
        let _ = hyperliquid_exchange::DEFAULT_SLIPPAGE;
    }
}
