//! Typed-data envelopes for actions.
//!
//! An action is signed either through a phantom agent (its digest wrapped
//! in an `Agent` struct on the L1 domain) or as a user-signed
//! `HyperliquidTransaction:*` struct on the user-signed domain. Exactly one
//! applies to any action; [`select_envelope`] is the only place that
//! decides which.

use alloy_primitives::{Address, B256};

use super::domain::Eip712Domain;
use super::hasher::action_hash;
use super::multisig::MultiSigContext;
use super::typed_data::{TypedData, TypedField};
use crate::serde_utils::lower_hex;
use crate::types::Network;
use crate::wire::Action;
use crate::{Error, Result};

/// Primary type prefix of user-signed structs.
pub const USER_SIGNED_PREFIX: &str = "HyperliquidTransaction:";

/// Everything besides the action that goes into a signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SigningContext {
    pub network: Network,
    pub nonce: u64,
    pub vault_address: Option<Address>,
    pub expires_after: Option<u64>,
}

impl SigningContext {
    pub fn new(network: Network, nonce: u64) -> Self {
        Self {
            network,
            nonce,
            vault_address: None,
            expires_after: None,
        }
    }

    pub fn with_vault(mut self, vault_address: Option<Address>) -> Self {
        self.vault_address = vault_address;
        self
    }

    pub fn with_expires_after(mut self, expires_after: Option<u64>) -> Self {
        self.expires_after = expires_after;
        self
    }
}

/// A strategy that turns an action into the typed data to sign.
pub trait Envelope: Send + Sync {
    fn typed_data(&self, action: &Action, ctx: &SigningContext) -> Result<TypedData>;
}

/// The minimal struct signed for L1 actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhantomAgent {
    pub source: &'static str,
    pub connection_id: B256,
}

impl PhantomAgent {
    pub fn new(connection_id: B256, network: Network) -> Self {
        Self {
            source: network.agent_source(),
            connection_id,
        }
    }

    pub fn to_typed_data(&self) -> TypedData {
        TypedData::new(
            Eip712Domain::l1(),
            "Agent",
            vec![
                TypedField::string("source", self.source),
                TypedField::bytes32("connectionId", self.connection_id),
            ],
        )
    }
}

/// Phantom-agent wrapping for trading and account actions.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhantomAgentEnvelope {
    multi_sig: Option<MultiSigContext>,
}

impl PhantomAgentEnvelope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sign as a participant of a multi-sig user; the digest covers
    /// `[multiSigUser, outerSigner, action]`.
    pub fn for_multi_sig(ctx: MultiSigContext) -> Self {
        Self {
            multi_sig: Some(ctx),
        }
    }

    /// The phantom agent's connection id for `action`.
    pub fn connection_id(&self, action: &Action, ctx: &SigningContext) -> Result<B256> {
        match &self.multi_sig {
            None => action_hash(action, ctx.nonce, ctx.vault_address, ctx.expires_after),
            Some(ms) => {
                let envelope = (
                    lower_hex(&ms.multi_sig_user),
                    lower_hex(&ms.outer_signer),
                    action,
                );
                action_hash(&envelope, ctx.nonce, ctx.vault_address, ctx.expires_after)
            }
        }
    }
}

impl Envelope for PhantomAgentEnvelope {
    fn typed_data(&self, action: &Action, ctx: &SigningContext) -> Result<TypedData> {
        if action.is_user_signed() {
            return Err(Error::schema(format!(
                "{} is user-signed and has no phantom agent form",
                action.type_name()
            )));
        }
        let connection_id = self.connection_id(action, ctx)?;
        Ok(PhantomAgent::new(connection_id, ctx.network).to_typed_data())
    }
}

/// Direct typed-data signing for transfers and account administration.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserSignedEnvelope {
    multi_sig: Option<MultiSigContext>,
}

impl UserSignedEnvelope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sign as a participant of a multi-sig user; `payloadMultiSigUser` and
    /// `outerSigner` follow `hyperliquidChain` in the struct.
    pub fn for_multi_sig(ctx: MultiSigContext) -> Self {
        Self {
            multi_sig: Some(ctx),
        }
    }
}

impl Envelope for UserSignedEnvelope {
    fn typed_data(&self, action: &Action, ctx: &SigningContext) -> Result<TypedData> {
        if self.multi_sig.is_some() && matches!(action, Action::MultiSig(_)) {
            return Err(Error::schema("multiSig actions cannot be nested"));
        }
        // The body carries the chain too; it must match what gets signed.
        if let Some(chain) = action.hyperliquid_chain() {
            if chain != ctx.network {
                return Err(Error::schema(format!(
                    "action is stamped for {} but signing for {}",
                    chain, ctx.network
                )));
            }
        }
        let (name, body) = user_signed_fields(action, ctx)?;

        let mut fields = Vec::with_capacity(body.len() + 3);
        fields.push(TypedField::string("hyperliquidChain", ctx.network.chain_name()));
        if let Some(ms) = &self.multi_sig {
            fields.push(TypedField::address("payloadMultiSigUser", ms.multi_sig_user));
            fields.push(TypedField::address("outerSigner", ms.outer_signer));
        }
        fields.extend(body);

        Ok(TypedData::new(
            Eip712Domain::user_signed(),
            format!("{}{}", USER_SIGNED_PREFIX, name),
            fields,
        ))
    }
}

/// Primary type suffix and members after `hyperliquidChain`.
fn user_signed_fields(
    action: &Action,
    ctx: &SigningContext,
) -> Result<(&'static str, Vec<TypedField>)> {
    let table = match action {
        Action::UsdSend(a) => (
            "UsdSend",
            vec![
                TypedField::string("destination", lower_hex(&a.destination)),
                TypedField::string("amount", a.amount.as_str()),
                TypedField::uint64("time", a.time),
            ],
        ),
        Action::SpotSend(a) => (
            "SpotSend",
            vec![
                TypedField::string("destination", lower_hex(&a.destination)),
                TypedField::string("token", a.token.as_str()),
                TypedField::string("amount", a.amount.as_str()),
                TypedField::uint64("time", a.time),
            ],
        ),
        Action::Withdraw3(a) => (
            "Withdraw",
            vec![
                TypedField::string("destination", lower_hex(&a.destination)),
                TypedField::string("amount", a.amount.as_str()),
                TypedField::uint64("time", a.time),
            ],
        ),
        Action::UsdClassTransfer(a) => (
            "UsdClassTransfer",
            vec![
                TypedField::string("amount", a.amount.as_str()),
                TypedField::bool("toPerp", a.to_perp),
                TypedField::uint64("nonce", a.nonce),
            ],
        ),
        Action::SendAsset(a) => (
            "SendAsset",
            vec![
                TypedField::string("destination", lower_hex(&a.destination)),
                TypedField::string("sourceDex", a.source_dex.as_str()),
                TypedField::string("destinationDex", a.destination_dex.as_str()),
                TypedField::string("token", a.token.as_str()),
                TypedField::string("amount", a.amount.as_str()),
                TypedField::string("fromSubAccount", a.from_sub_account.as_str()),
                TypedField::uint64("nonce", a.nonce),
            ],
        ),
        Action::ApproveAgent(a) => (
            "ApproveAgent",
            vec![
                TypedField::address("agentAddress", a.agent_address),
                TypedField::string("agentName", a.agent_name.as_deref().unwrap_or("")),
                TypedField::uint64("nonce", a.nonce),
            ],
        ),
        Action::ApproveBuilderFee(a) => (
            "ApproveBuilderFee",
            vec![
                TypedField::string("maxFeeRate", a.max_fee_rate.as_str()),
                TypedField::address("builder", a.builder),
                TypedField::uint64("nonce", a.nonce),
            ],
        ),
        Action::ConvertToMultiSigUser(a) => (
            "ConvertToMultiSigUser",
            vec![
                TypedField::string("signers", a.signers.as_str()),
                TypedField::uint64("nonce", a.nonce),
            ],
        ),
        Action::TokenDelegate(a) => (
            "TokenDelegate",
            vec![
                TypedField::address("validator", a.validator),
                TypedField::uint64("wei", a.wei),
                TypedField::bool("isUndelegate", a.is_undelegate),
                TypedField::uint64("nonce", a.nonce),
            ],
        ),
        Action::MultiSig(a) => {
            // The hashed form has no `type` key.
            let hash = action_hash(a, ctx.nonce, ctx.vault_address, ctx.expires_after)?;
            (
                "SendMultiSig",
                vec![
                    TypedField::bytes32("multiSigActionHash", hash),
                    TypedField::uint64("nonce", ctx.nonce),
                ],
            )
        }
        other => {
            return Err(Error::schema(format!(
                "no user-signed type table for {}",
                other.type_name()
            )))
        }
    };
    Ok(table)
}

/// Pick the envelope for `action`.
///
/// `multi_sig` is set when signing as one participant of a multi-sig user.
pub fn select_envelope(action: &Action, multi_sig: Option<MultiSigContext>) -> Box<dyn Envelope> {
    match (action.is_user_signed(), multi_sig) {
        (true, None) => Box::new(UserSignedEnvelope::new()),
        (true, Some(ms)) => Box::new(UserSignedEnvelope::for_multi_sig(ms)),
        (false, None) => Box::new(PhantomAgentEnvelope::new()),
        (false, Some(ms)) => Box::new(PhantomAgentEnvelope::for_multi_sig(ms)),
    }
}

/// Typed data for a single-signer action.
pub fn build_typed_data(action: &Action, ctx: &SigningContext) -> Result<TypedData> {
    select_envelope(action, None).typed_data(action, ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::{
        ApproveAgent, LimitWire, OrderTypeWire, OrderWire, ScheduleCancel, SetReferrer, Tif,
        TokenDelegate, UsdSend,
    };

    fn destination() -> Address {
        "0x5e9ee1089755c3435139848e47e6635505d5a13a".parse().unwrap()
    }

    fn order_action() -> Action {
        Action::Order(crate::wire::BulkOrder::new(vec![OrderWire {
            asset: 4,
            is_buy: true,
            limit_px: "1670.1".to_string(),
            sz: "0.0147".to_string(),
            reduce_only: false,
            order_type: OrderTypeWire::Limit(LimitWire { tif: Tif::Ioc }),
            cloid: None,
        }]))
    }

    #[test]
    fn test_phantom_agent_typed_data() {
        let ctx = SigningContext::new(Network::Mainnet, 1677777606040);
        let data = PhantomAgentEnvelope::new()
            .typed_data(&order_action(), &ctx)
            .unwrap();

        assert_eq!(data.primary_type, "Agent");
        assert_eq!(data.domain, Eip712Domain::l1());
        assert_eq!(data.fields[0], TypedField::string("source", "a"));
        assert_eq!(
            data.fields[1].value,
            crate::signing::TypedValue::Bytes32(
                "0x0fcbeda5ae3c4950a548021552a4fea2226858c4453571bf3f24ba017eac2908"
                    .parse()
                    .unwrap()
            )
        );
    }

    #[test]
    fn test_testnet_source() {
        let ctx = SigningContext::new(Network::Testnet, 1);
        let data = PhantomAgentEnvelope::new()
            .typed_data(&order_action(), &ctx)
            .unwrap();
        assert_eq!(data.fields[0], TypedField::string("source", "b"));
    }

    #[test]
    fn test_user_signed_typed_data() {
        let mut action = Action::UsdSend(UsdSend::new(destination(), "1", 1687816341423));
        action.stamp_chain(Network::Testnet);
        let ctx = SigningContext::new(Network::Testnet, 1687816341423);
        let data = UserSignedEnvelope::new().typed_data(&action, &ctx).unwrap();

        assert_eq!(data.primary_type, "HyperliquidTransaction:UsdSend");
        assert_eq!(data.domain, Eip712Domain::user_signed());
        assert_eq!(
            data.type_string(),
            "HyperliquidTransaction:UsdSend(string hyperliquidChain,string destination,string amount,uint64 time)"
        );
        assert_eq!(data.fields[0], TypedField::string("hyperliquidChain", "Testnet"));
    }

    #[test]
    fn test_chain_mismatch_is_schema_error() {
        // Defaults to Mainnet until stamped.
        let action = Action::UsdSend(UsdSend::new(destination(), "1", 1687816341423));
        let ctx = SigningContext::new(Network::Testnet, 1687816341423);
        assert!(matches!(
            UserSignedEnvelope::new().typed_data(&action, &ctx).unwrap_err(),
            Error::ProtocolSchema { .. }
        ));
        assert!(build_typed_data(&action, &ctx).is_err());
    }

    #[test]
    fn test_token_delegate_signs_in_table_order() {
        let action = Action::TokenDelegate(TokenDelegate::new(destination(), 100, true, 9));
        let data = UserSignedEnvelope::new()
            .typed_data(&action, &SigningContext::new(Network::Mainnet, 9))
            .unwrap();
        assert_eq!(
            data.type_string(),
            "HyperliquidTransaction:TokenDelegate(string hyperliquidChain,address validator,uint64 wei,bool isUndelegate,uint64 nonce)"
        );
    }

    mod sol_types {
        alloy_sol_types::sol! {
            struct Agent {
                string source;
                bytes32 connectionId;
            }

            struct TokenDelegate {
                string hyperliquidChain;
                address validator;
                uint64 wei;
                bool isUndelegate;
                uint64 nonce;
            }
        }
    }

    #[test]
    fn test_phantom_agent_matches_sol_struct() {
        use alloy_sol_types::SolStruct;

        let ctx = SigningContext::new(Network::Mainnet, 1677777606040);
        let data = PhantomAgentEnvelope::new()
            .typed_data(&order_action(), &ctx)
            .unwrap();
        let agent = sol_types::Agent {
            source: "a".to_string(),
            connectionId: "0x0fcbeda5ae3c4950a548021552a4fea2226858c4453571bf3f24ba017eac2908"
                .parse()
                .unwrap(),
        };
        let domain = alloy_sol_types::eip712_domain! {
            name: "Exchange",
            version: "1",
            chain_id: 1337,
            verifying_contract: Address::ZERO,
        };

        assert_eq!(data.type_string(), sol_types::Agent::eip712_encode_type());
        assert_eq!(data.struct_hash(), agent.eip712_hash_struct());
        assert_eq!(data.domain.separator(), domain.separator());
        assert_eq!(data.signing_hash(), agent.eip712_signing_hash(&domain));
    }

    #[test]
    fn test_token_delegate_matches_sol_struct() {
        use alloy_sol_types::SolStruct;

        let action = Action::TokenDelegate(TokenDelegate::new(destination(), 100, true, 9));
        let data = UserSignedEnvelope::new()
            .typed_data(&action, &SigningContext::new(Network::Mainnet, 9))
            .unwrap();
        let delegate = sol_types::TokenDelegate {
            hyperliquidChain: "Mainnet".to_string(),
            validator: destination(),
            wei: 100,
            isUndelegate: true,
            nonce: 9,
        };

        // Same members under the prefixed primary type name.
        assert_eq!(
            data.type_string(),
            format!("{}{}", USER_SIGNED_PREFIX, sol_types::TokenDelegate::eip712_encode_type())
        );
        let mut encoded = data.type_hash().to_vec();
        encoded.extend_from_slice(&delegate.eip712_encode_data());
        assert_eq!(data.struct_hash(), alloy_primitives::keccak256(&encoded));
    }

    #[test]
    fn test_approve_agent_without_name_signs_empty_string() {
        let action = Action::ApproveAgent(ApproveAgent::new(destination(), None, 3));
        let data = UserSignedEnvelope::new()
            .typed_data(&action, &SigningContext::new(Network::Mainnet, 3))
            .unwrap();
        assert_eq!(data.fields[2], TypedField::string("agentName", ""));
    }

    #[test]
    fn test_wrong_envelope_is_schema_error() {
        let ctx = SigningContext::new(Network::Mainnet, 1);
        let l1 = Action::ScheduleCancel(ScheduleCancel::default());
        assert!(matches!(
            UserSignedEnvelope::new().typed_data(&l1, &ctx).unwrap_err(),
            Error::ProtocolSchema { .. }
        ));

        let user = Action::UsdSend(UsdSend::new(destination(), "1", 1));
        assert!(matches!(
            PhantomAgentEnvelope::new().typed_data(&user, &ctx).unwrap_err(),
            Error::ProtocolSchema { .. }
        ));
    }

    #[test]
    fn test_multi_sig_user_signed_inserts_fields() {
        let ms = MultiSigContext::new(Address::repeat_byte(0xaa), Address::repeat_byte(0xbb));
        let action = Action::UsdSend(UsdSend::new(destination(), "5", 10));
        let data = UserSignedEnvelope::for_multi_sig(ms)
            .typed_data(&action, &SigningContext::new(Network::Mainnet, 10))
            .unwrap();

        assert_eq!(
            data.type_string(),
            "HyperliquidTransaction:UsdSend(string hyperliquidChain,address payloadMultiSigUser,address outerSigner,string destination,string amount,uint64 time)"
        );
    }

    #[test]
    fn test_multi_sig_phantom_agent_changes_connection_id() {
        let ms = MultiSigContext::new(Address::repeat_byte(0xaa), Address::repeat_byte(0xbb));
        let ctx = SigningContext::new(Network::Mainnet, 7);
        let action = Action::SetReferrer(SetReferrer {
            code: "ABC".to_string(),
        });

        let single = PhantomAgentEnvelope::new().connection_id(&action, &ctx).unwrap();
        let multi = PhantomAgentEnvelope::for_multi_sig(ms)
            .connection_id(&action, &ctx)
            .unwrap();
        assert_ne!(single, multi);

        let expected = action_hash(
            &(lower_hex(&ms.multi_sig_user), lower_hex(&ms.outer_signer), &action),
            7,
            None,
            None,
        )
        .unwrap();
        assert_eq!(multi, expected);
    }

    #[test]
    fn test_select_envelope_dispatch() {
        let ctx = SigningContext::new(Network::Mainnet, 1);
        let l1 = Action::ScheduleCancel(ScheduleCancel { time: Some(5) });
        assert_eq!(
            select_envelope(&l1, None).typed_data(&l1, &ctx).unwrap().primary_type,
            "Agent"
        );

        let user = Action::UsdSend(UsdSend::new(destination(), "1", 1));
        assert_eq!(
            select_envelope(&user, None)
                .typed_data(&user, &ctx)
                .unwrap()
                .primary_type,
            "HyperliquidTransaction:UsdSend"
        );
    }
}
