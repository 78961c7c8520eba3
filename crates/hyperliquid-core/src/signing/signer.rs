//! Action signing.
//!
//! Wraps a local secp256k1 key and signs venue actions through the
//! envelope chosen for each action kind.

use alloy_primitives::{Address, B256};
use alloy_signer::SignerSync;
use alloy_signer_local::PrivateKeySigner;
use tracing::debug;

use super::envelope::{
    select_envelope, Envelope, PhantomAgentEnvelope, SigningContext, UserSignedEnvelope,
};
use super::multisig::MultiSigContext;
use super::typed_data::TypedData;
use crate::payload::ExchangePayload;
use crate::types::{Network, Signature};
use crate::wire::Action;
use crate::{Error, Result};

/// Signs actions for one key on one network.
#[derive(Clone)]
pub struct ActionSigner {
    signer: PrivateKeySigner,
    network: Network,
}

impl ActionSigner {
    pub fn new(signer: PrivateKeySigner, network: Network) -> Self {
        Self { signer, network }
    }

    /// Get the signer's address.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    pub fn network(&self) -> Network {
        self.network
    }

    /// ECDSA-sign a 32-byte digest, normalizing `v` to 27/28.
    pub fn sign_digest(&self, digest: &B256) -> Result<Signature> {
        let raw = self
            .signer
            .sign_hash_sync(digest)
            .map_err(|e| Error::signing(format!("failed to sign digest: {}", e)))?;

        let mut bytes = [0u8; Signature::LENGTH];
        bytes[..32].copy_from_slice(&raw.r().to_be_bytes::<32>());
        bytes[32..64].copy_from_slice(&raw.s().to_be_bytes::<32>());
        bytes[64] = raw.v() as u8;

        Signature::from_raw(&bytes)
    }

    /// Sign the EIP-712 digest of `data`.
    pub fn sign_typed_data(&self, data: &TypedData) -> Result<Signature> {
        let digest = data.signing_hash();
        debug!(
            primary_type = %data.primary_type,
            digest = %digest,
            "Signing typed data"
        );
        self.sign_digest(&digest)
    }

    /// Sign an L1 action through a phantom agent.
    pub fn sign_l1_action(
        &self,
        action: &Action,
        nonce: u64,
        vault_address: Option<Address>,
        expires_after: Option<u64>,
    ) -> Result<Signature> {
        let ctx = self
            .context(nonce)
            .with_vault(vault_address)
            .with_expires_after(expires_after);
        let data = PhantomAgentEnvelope::new().typed_data(action, &ctx)?;
        self.sign_typed_data(&data)
    }

    /// Sign a user-signed action directly.
    ///
    /// `action` must already be stamped for this signer's network; a
    /// mismatch is a [`Error::ProtocolSchema`]. Use [`Self::sign_action`]
    /// to stamp and sign in one step.
    pub fn sign_user_signed_action(&self, action: &Action, nonce: u64) -> Result<Signature> {
        let data = UserSignedEnvelope::new().typed_data(action, &self.context(nonce))?;
        self.sign_typed_data(&data)
    }

    /// Sign through whichever envelope applies to `action`.
    pub fn sign_with_envelope(
        &self,
        action: &Action,
        ctx: &SigningContext,
        multi_sig: Option<MultiSigContext>,
    ) -> Result<Signature> {
        let data = select_envelope(action, multi_sig).typed_data(action, ctx)?;
        self.sign_typed_data(&data)
    }

    /// Stamp the chain, sign and assemble the request body.
    pub fn sign_action(
        &self,
        mut action: Action,
        nonce: u64,
        vault_address: Option<Address>,
        expires_after: Option<u64>,
    ) -> Result<ExchangePayload> {
        action.stamp_chain(self.network);
        let ctx = self
            .context(nonce)
            .with_vault(vault_address)
            .with_expires_after(expires_after);
        let signature = self.sign_with_envelope(&action, &ctx, None)?;
        Ok(ExchangePayload::new(
            action,
            nonce,
            signature,
            vault_address,
            expires_after,
        ))
    }

    fn context(&self, nonce: u64) -> SigningContext {
        SigningContext::new(self.network, nonce)
    }
}

impl std::fmt::Debug for ActionSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionSigner")
            .field("address", &format!("{:?}", self.address()))
            .field("network", &self.network)
            .finish()
    }
}
