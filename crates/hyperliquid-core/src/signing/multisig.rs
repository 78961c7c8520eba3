//! Multi-sig composition.
//!
//! Every participant receives the same [`MultiSigRequest`] and returns one
//! signature over the inner action. The coordinator alone assembles the
//! `multiSig` action from the collected signatures and has the outer
//! signer sign it.

use alloy_primitives::Address;
use tracing::{debug, info};

use super::envelope::SigningContext;
use super::signer::ActionSigner;
use crate::payload::ExchangePayload;
use crate::types::{Network, Signature};
use crate::wire::{Action, MultiSigAction, MultiSigPayload, SIGNATURE_CHAIN_ID};
use crate::{Error, Result};

/// The multi-sig user an inner action is signed for, and the account that
/// submits the outer action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MultiSigContext {
    pub multi_sig_user: Address,
    pub outer_signer: Address,
}

impl MultiSigContext {
    pub fn new(multi_sig_user: Address, outer_signer: Address) -> Self {
        Self {
            multi_sig_user,
            outer_signer,
        }
    }
}

/// What each participant is asked to sign.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiSigRequest {
    pub context: MultiSigContext,
    pub action: Action,
    pub signing: SigningContext,
}

/// Produce one participant's signature over the inner action.
pub fn sign_as_participant(signer: &ActionSigner, request: &MultiSigRequest) -> Result<Signature> {
    if signer.network() != request.signing.network {
        return Err(Error::signing(format!(
            "participant is on {} but the request is for {}",
            signer.network(),
            request.signing.network
        )));
    }
    let signature =
        signer.sign_with_envelope(&request.action, &request.signing, Some(request.context))?;
    debug!(
        participant = %signer.address(),
        action = request.action.type_name(),
        "Produced multi-sig participant signature"
    );
    Ok(signature)
}

/// Assembles and finalizes a multi-sig action.
#[derive(Debug, Clone)]
pub struct MultiSigCoordinator {
    request: MultiSigRequest,
}

impl MultiSigCoordinator {
    /// Prepare `inner` for signing. The chain discriminator is stamped here
    /// so every participant signs identical bytes.
    pub fn new(context: MultiSigContext, mut inner: Action, signing: SigningContext) -> Result<Self> {
        if matches!(inner, Action::MultiSig(_)) {
            return Err(Error::schema("multiSig actions cannot be nested"));
        }
        inner.stamp_chain(signing.network);
        Ok(Self {
            request: MultiSigRequest {
                context,
                action: inner,
                signing,
            },
        })
    }

    pub fn request(&self) -> &MultiSigRequest {
        &self.request
    }

    pub fn network(&self) -> Network {
        self.request.signing.network
    }

    /// Build the `multiSig` action from participant signatures, in the
    /// order given.
    pub fn assemble(&self, signatures: Vec<Signature>) -> Result<Action> {
        if signatures.is_empty() {
            return Err(Error::schema("multiSig requires at least one signature"));
        }
        Ok(Action::MultiSig(MultiSigAction {
            signature_chain_id: SIGNATURE_CHAIN_ID.to_string(),
            signatures,
            payload: MultiSigPayload {
                multi_sig_user: self.request.context.multi_sig_user,
                outer_signer: self.request.context.outer_signer,
                action: Box::new(self.request.action.clone()),
            },
        }))
    }

    /// Assemble and sign with the outer signer.
    pub fn finalize(
        &self,
        outer: &ActionSigner,
        signatures: Vec<Signature>,
    ) -> Result<ExchangePayload> {
        if outer.address() != self.request.context.outer_signer {
            return Err(Error::signing(format!(
                "outer signer {} does not match {}",
                outer.address(),
                self.request.context.outer_signer
            )));
        }
        if outer.network() != self.request.signing.network {
            return Err(Error::signing(format!(
                "outer signer is on {} but participants signed for {}",
                outer.network(),
                self.request.signing.network
            )));
        }

        let count = signatures.len();
        let action = self.assemble(signatures)?;
        let signing = &self.request.signing;
        let payload = outer.sign_action(
            action,
            signing.nonce,
            signing.vault_address,
            signing.expires_after,
        )?;

        info!(
            multi_sig_user = %self.request.context.multi_sig_user,
            signatures = count,
            nonce = signing.nonce,
            "Finalized multi-sig action"
        );
        Ok(payload)
    }
}
