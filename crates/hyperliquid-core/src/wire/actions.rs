//! The closed set of actions the venue accepts.
//!
//! Each variant's struct declares its fields in wire order; the serde
//! derive is the only thing that decides key order, so the MessagePack
//! bytes never depend on map iteration.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use super::order::{
    BuilderInfo, CancelByCloidWire, CancelWire, Grouping, ModifyWire, OrderWire,
};
use crate::serde_utils::address_hex;
use crate::types::{Network, Signature};

/// `signatureChainId` carried by user-signed actions (421614).
pub const SIGNATURE_CHAIN_ID: &str = "0x66eee";

fn default_signature_chain_id() -> String {
    SIGNATURE_CHAIN_ID.to_string()
}

/// A venue action, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Action {
    Order(BulkOrder),
    BatchModify(BulkModify),
    Cancel(BulkCancel),
    CancelByCloid(BulkCancelCloid),
    ScheduleCancel(ScheduleCancel),
    UpdateLeverage(UpdateLeverage),
    UpdateIsolatedMargin(UpdateIsolatedMargin),
    SetReferrer(SetReferrer),
    CreateSubAccount(CreateSubAccount),
    SubAccountTransfer(SubAccountTransfer),
    SubAccountSpotTransfer(SubAccountSpotTransfer),
    VaultTransfer(VaultTransfer),
    UsdClassTransfer(UsdClassTransfer),
    SendAsset(SendAsset),
    UsdSend(UsdSend),
    SpotSend(SpotSend),
    Withdraw3(Withdraw3),
    TokenDelegate(TokenDelegate),
    ApproveAgent(ApproveAgent),
    ApproveBuilderFee(ApproveBuilderFee),
    ConvertToMultiSigUser(ConvertToMultiSigUser),
    MultiSig(MultiSigAction),
}

impl Action {
    /// The `type` tag this action serializes with.
    pub fn type_name(&self) -> &'static str {
        match self {
            Action::Order(_) => "order",
            Action::BatchModify(_) => "batchModify",
            Action::Cancel(_) => "cancel",
            Action::CancelByCloid(_) => "cancelByCloid",
            Action::ScheduleCancel(_) => "scheduleCancel",
            Action::UpdateLeverage(_) => "updateLeverage",
            Action::UpdateIsolatedMargin(_) => "updateIsolatedMargin",
            Action::SetReferrer(_) => "setReferrer",
            Action::CreateSubAccount(_) => "createSubAccount",
            Action::SubAccountTransfer(_) => "subAccountTransfer",
            Action::SubAccountSpotTransfer(_) => "subAccountSpotTransfer",
            Action::VaultTransfer(_) => "vaultTransfer",
            Action::UsdClassTransfer(_) => "usdClassTransfer",
            Action::SendAsset(_) => "sendAsset",
            Action::UsdSend(_) => "usdSend",
            Action::SpotSend(_) => "spotSend",
            Action::Withdraw3(_) => "withdraw3",
            Action::TokenDelegate(_) => "tokenDelegate",
            Action::ApproveAgent(_) => "approveAgent",
            Action::ApproveBuilderFee(_) => "approveBuilderFee",
            Action::ConvertToMultiSigUser(_) => "convertToMultiSigUser",
            Action::MultiSig(_) => "multiSig",
        }
    }

    /// Whether the action is signed as direct typed data rather than
    /// through a phantom agent.
    pub fn is_user_signed(&self) -> bool {
        matches!(
            self,
            Action::UsdClassTransfer(_)
                | Action::SendAsset(_)
                | Action::UsdSend(_)
                | Action::SpotSend(_)
                | Action::Withdraw3(_)
                | Action::TokenDelegate(_)
                | Action::ApproveAgent(_)
                | Action::ApproveBuilderFee(_)
                | Action::ConvertToMultiSigUser(_)
                | Action::MultiSig(_)
        )
    }

    /// Set the `hyperliquidChain` discriminator on user-signed actions.
    ///
    /// No-op for phantom-agent actions and for `multiSig`, whose chain
    /// lives only in the signed envelope.
    pub fn stamp_chain(&mut self, network: Network) {
        let chain = match self {
            Action::UsdClassTransfer(a) => &mut a.hyperliquid_chain,
            Action::SendAsset(a) => &mut a.hyperliquid_chain,
            Action::UsdSend(a) => &mut a.hyperliquid_chain,
            Action::SpotSend(a) => &mut a.hyperliquid_chain,
            Action::Withdraw3(a) => &mut a.hyperliquid_chain,
            Action::TokenDelegate(a) => &mut a.hyperliquid_chain,
            Action::ApproveAgent(a) => &mut a.hyperliquid_chain,
            Action::ApproveBuilderFee(a) => &mut a.hyperliquid_chain,
            Action::ConvertToMultiSigUser(a) => &mut a.hyperliquid_chain,
            _ => return,
        };
        *chain = network;
    }

    /// The `hyperliquidChain` carried by a user-signed action, if any.
    pub fn hyperliquid_chain(&self) -> Option<Network> {
        match self {
            Action::UsdClassTransfer(a) => Some(a.hyperliquid_chain),
            Action::SendAsset(a) => Some(a.hyperliquid_chain),
            Action::UsdSend(a) => Some(a.hyperliquid_chain),
            Action::SpotSend(a) => Some(a.hyperliquid_chain),
            Action::Withdraw3(a) => Some(a.hyperliquid_chain),
            Action::TokenDelegate(a) => Some(a.hyperliquid_chain),
            Action::ApproveAgent(a) => Some(a.hyperliquid_chain),
            Action::ApproveBuilderFee(a) => Some(a.hyperliquid_chain),
            Action::ConvertToMultiSigUser(a) => Some(a.hyperliquid_chain),
            _ => None,
        }
    }
}

// ---- phantom-agent (L1) actions ----

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkOrder {
    pub orders: Vec<OrderWire>,
    #[serde(default)]
    pub grouping: Grouping,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub builder: Option<BuilderInfo>,
}

impl BulkOrder {
    pub fn new(orders: Vec<OrderWire>) -> Self {
        Self {
            orders,
            grouping: Grouping::Na,
            builder: None,
        }
    }

    pub fn with_grouping(mut self, grouping: Grouping) -> Self {
        self.grouping = grouping;
        self
    }

    pub fn with_builder(mut self, builder: BuilderInfo) -> Self {
        self.builder = Some(builder);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkModify {
    pub modifies: Vec<ModifyWire>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkCancel {
    pub cancels: Vec<CancelWire>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkCancelCloid {
    pub cancels: Vec<CancelByCloidWire>,
}

/// Dead man's switch; `None` clears a scheduled cancel.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScheduleCancel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLeverage {
    pub asset: u32,
    pub is_cross: bool,
    pub leverage: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateIsolatedMargin {
    pub asset: u32,
    pub is_buy: bool,
    /// Signed margin delta in USD micro-units.
    pub ntli: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetReferrer {
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateSubAccount {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubAccountTransfer {
    #[serde(with = "address_hex")]
    pub sub_account_user: Address,
    pub is_deposit: bool,
    pub usd: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubAccountSpotTransfer {
    #[serde(with = "address_hex")]
    pub sub_account_user: Address,
    pub is_deposit: bool,
    pub token: String,
    pub amount: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultTransfer {
    #[serde(with = "address_hex")]
    pub vault_address: Address,
    pub is_deposit: bool,
    pub usd: u64,
}

// ---- user-signed actions ----

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsdClassTransfer {
    #[serde(default = "default_signature_chain_id")]
    pub signature_chain_id: String,
    #[serde(default)]
    pub hyperliquid_chain: Network,
    pub amount: String,
    pub to_perp: bool,
    pub nonce: u64,
}

impl UsdClassTransfer {
    pub fn new(amount: impl Into<String>, to_perp: bool, nonce: u64) -> Self {
        Self {
            signature_chain_id: default_signature_chain_id(),
            hyperliquid_chain: Network::default(),
            amount: amount.into(),
            to_perp,
            nonce,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendAsset {
    #[serde(default = "default_signature_chain_id")]
    pub signature_chain_id: String,
    #[serde(default)]
    pub hyperliquid_chain: Network,
    #[serde(with = "address_hex")]
    pub destination: Address,
    pub source_dex: String,
    pub destination_dex: String,
    pub token: String,
    pub amount: String,
    /// Sub-account address, or empty for the master account.
    pub from_sub_account: String,
    pub nonce: u64,
}

impl SendAsset {
    pub fn new(
        destination: Address,
        source_dex: impl Into<String>,
        destination_dex: impl Into<String>,
        token: impl Into<String>,
        amount: impl Into<String>,
        from_sub_account: impl Into<String>,
        nonce: u64,
    ) -> Self {
        Self {
            signature_chain_id: default_signature_chain_id(),
            hyperliquid_chain: Network::default(),
            destination,
            source_dex: source_dex.into(),
            destination_dex: destination_dex.into(),
            token: token.into(),
            amount: amount.into(),
            from_sub_account: from_sub_account.into(),
            nonce,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsdSend {
    #[serde(default = "default_signature_chain_id")]
    pub signature_chain_id: String,
    #[serde(default)]
    pub hyperliquid_chain: Network,
    #[serde(with = "address_hex")]
    pub destination: Address,
    pub amount: String,
    pub time: u64,
}

impl UsdSend {
    pub fn new(destination: Address, amount: impl Into<String>, time: u64) -> Self {
        Self {
            signature_chain_id: default_signature_chain_id(),
            hyperliquid_chain: Network::default(),
            destination,
            amount: amount.into(),
            time,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpotSend {
    #[serde(default = "default_signature_chain_id")]
    pub signature_chain_id: String,
    #[serde(default)]
    pub hyperliquid_chain: Network,
    #[serde(with = "address_hex")]
    pub destination: Address,
    /// Token in `NAME:0x<tokenId>` form.
    pub token: String,
    pub amount: String,
    pub time: u64,
}

impl SpotSend {
    pub fn new(
        destination: Address,
        token: impl Into<String>,
        amount: impl Into<String>,
        time: u64,
    ) -> Self {
        Self {
            signature_chain_id: default_signature_chain_id(),
            hyperliquid_chain: Network::default(),
            destination,
            token: token.into(),
            amount: amount.into(),
            time,
        }
    }
}

/// Bridge withdrawal; signed with the `Withdraw` primary type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Withdraw3 {
    #[serde(default = "default_signature_chain_id")]
    pub signature_chain_id: String,
    #[serde(default)]
    pub hyperliquid_chain: Network,
    #[serde(with = "address_hex")]
    pub destination: Address,
    pub amount: String,
    pub time: u64,
}

impl Withdraw3 {
    pub fn new(destination: Address, amount: impl Into<String>, time: u64) -> Self {
        Self {
            signature_chain_id: default_signature_chain_id(),
            hyperliquid_chain: Network::default(),
            destination,
            amount: amount.into(),
            time,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenDelegate {
    #[serde(default = "default_signature_chain_id")]
    pub signature_chain_id: String,
    #[serde(default)]
    pub hyperliquid_chain: Network,
    #[serde(with = "address_hex")]
    pub validator: Address,
    pub is_undelegate: bool,
    pub wei: u64,
    pub nonce: u64,
}

impl TokenDelegate {
    pub fn new(validator: Address, wei: u64, is_undelegate: bool, nonce: u64) -> Self {
        Self {
            signature_chain_id: default_signature_chain_id(),
            hyperliquid_chain: Network::default(),
            validator,
            is_undelegate,
            wei,
            nonce,
        }
    }
}

/// Agent approval. A missing name is signed as `""` and left off the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproveAgent {
    #[serde(default = "default_signature_chain_id")]
    pub signature_chain_id: String,
    #[serde(default)]
    pub hyperliquid_chain: Network,
    #[serde(with = "address_hex")]
    pub agent_address: Address,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_name: Option<String>,
    pub nonce: u64,
}

impl ApproveAgent {
    pub fn new(agent_address: Address, agent_name: Option<String>, nonce: u64) -> Self {
        Self {
            signature_chain_id: default_signature_chain_id(),
            hyperliquid_chain: Network::default(),
            agent_address,
            agent_name,
            nonce,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproveBuilderFee {
    #[serde(default = "default_signature_chain_id")]
    pub signature_chain_id: String,
    #[serde(default)]
    pub hyperliquid_chain: Network,
    /// Percentage string such as `"0.001%"`.
    pub max_fee_rate: String,
    #[serde(with = "address_hex")]
    pub builder: Address,
    pub nonce: u64,
}

impl ApproveBuilderFee {
    pub fn new(builder: Address, max_fee_rate: impl Into<String>, nonce: u64) -> Self {
        Self {
            signature_chain_id: default_signature_chain_id(),
            hyperliquid_chain: Network::default(),
            max_fee_rate: max_fee_rate.into(),
            builder,
            nonce,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertToMultiSigUser {
    #[serde(default = "default_signature_chain_id")]
    pub signature_chain_id: String,
    #[serde(default)]
    pub hyperliquid_chain: Network,
    /// JSON-encoded [`MultiSigSigners`], or `"null"` to revert to a
    /// normal user.
    pub signers: String,
    pub nonce: u64,
}

impl ConvertToMultiSigUser {
    pub fn new(signers: Option<&MultiSigSigners>, nonce: u64) -> crate::Result<Self> {
        let signers = match signers {
            Some(signers) => serde_json::to_string(signers)?,
            None => "null".to_string(),
        };
        Ok(Self {
            signature_chain_id: default_signature_chain_id(),
            hyperliquid_chain: Network::default(),
            signers,
            nonce,
        })
    }
}

/// Authorized signer set of a multi-sig user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiSigSigners {
    /// Lower-case addresses, sorted.
    pub authorized_users: Vec<String>,
    pub threshold: u32,
}

impl MultiSigSigners {
    pub fn new(users: &[Address], threshold: u32) -> Self {
        let mut authorized_users: Vec<String> =
            users.iter().map(crate::serde_utils::lower_hex).collect();
        authorized_users.sort();
        authorized_users.dedup();
        Self {
            authorized_users,
            threshold,
        }
    }
}

// ---- multi-sig ----

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiSigAction {
    #[serde(default = "default_signature_chain_id")]
    pub signature_chain_id: String,
    pub signatures: Vec<Signature>,
    pub payload: MultiSigPayload,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiSigPayload {
    #[serde(with = "address_hex")]
    pub multi_sig_user: Address,
    #[serde(with = "address_hex")]
    pub outer_signer: Address,
    pub action: Box<Action>,
}
