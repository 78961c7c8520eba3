//! Exchange orchestrator.
//!
//! Resolves coins to asset ids, builds wire actions, takes a nonce, signs
//! and posts. Each operation returns the venue's raw JSON response.

use alloy_primitives::Address;
use hyperliquid_core::numeric::{
    encode_wire, extract_dex_prefix, round_half_to_even, round_to_significant_figures, usd_to_int,
};
use hyperliquid_core::serde_utils::lower_hex;
use hyperliquid_core::types::{
    CancelByCloidRequest, CancelRequest, Cloid, ModifyRequest, OrderRef, OrderRequest,
};
use hyperliquid_core::wire::{
    Action, ApproveAgent, ApproveBuilderFee, BuilderInfo, BulkCancel, BulkCancelCloid,
    BulkModify, BulkOrder, ConvertToMultiSigUser, CreateSubAccount, Grouping, MultiSigSigners,
    ScheduleCancel, SendAsset, SetReferrer, SpotSend, SubAccountSpotTransfer,
    SubAccountTransfer, Tif, TokenDelegate, UpdateIsolatedMargin, UpdateLeverage,
    UsdClassTransfer, UsdSend, VaultTransfer, Withdraw3,
};
use hyperliquid_core::{
    ActionSigner, MultiSigContext, MultiSigCoordinator, Signature, SignerConfig, SigningContext,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

use crate::nonce::NonceManager;
use crate::providers::{MetadataProvider, MidPriceProvider};
use crate::transport::{HttpTransport, Transport};
use crate::Result;

/// Default slippage for market orders.
pub const DEFAULT_SLIPPAGE: f64 = 0.05;

/// Spot asset ids start here.
const SPOT_ASSET_OFFSET: u32 = 10_000;

/// Signs and submits actions for one account.
pub struct Exchange {
    signer: ActionSigner,
    metadata: Arc<dyn MetadataProvider>,
    mids: Arc<dyn MidPriceProvider>,
    transport: Arc<dyn Transport>,
    nonces: NonceManager,
    vault_address: Option<Address>,
    expires_after: Option<u64>,
}

impl Exchange {
    pub fn new(
        signer: ActionSigner,
        metadata: Arc<dyn MetadataProvider>,
        mids: Arc<dyn MidPriceProvider>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            signer,
            metadata,
            mids,
            transport,
            nonces: NonceManager::default(),
            vault_address: None,
            expires_after: None,
        }
    }

    /// Build an exchange that posts over HTTP to `config.api_url`.
    pub fn from_config(
        signer: ActionSigner,
        config: &SignerConfig,
        metadata: Arc<dyn MetadataProvider>,
        mids: Arc<dyn MidPriceProvider>,
    ) -> Result<Self> {
        let transport = Arc::new(HttpTransport::new(config.api_url.as_str())?);
        Ok(Self::new(signer, metadata, mids, transport)
            .with_vault(config.vault_address)
            .with_expires_after(config.expires_after))
    }

    /// Act on behalf of a vault or sub-account.
    pub fn with_vault(mut self, vault_address: Option<Address>) -> Self {
        self.vault_address = vault_address;
        self
    }

    pub fn with_expires_after(mut self, expires_after: Option<u64>) -> Self {
        self.expires_after = expires_after;
        self
    }

    pub fn with_nonce_manager(mut self, nonces: NonceManager) -> Self {
        self.nonces = nonces;
        self
    }

    pub fn address(&self) -> Address {
        self.signer.address()
    }

    pub fn vault_address(&self) -> Option<Address> {
        self.vault_address
    }

    // ---- orders ----

    pub async fn order(&self, order: OrderRequest, builder: Option<BuilderInfo>) -> Result<Value> {
        self.bulk_orders(&[order], Grouping::Na, builder).await
    }

    pub async fn bulk_orders(
        &self,
        orders: &[OrderRequest],
        grouping: Grouping,
        builder: Option<BuilderInfo>,
    ) -> Result<Value> {
        let mut wires = Vec::with_capacity(orders.len());
        for order in orders {
            let asset = self.metadata.asset(&order.coin).await?;
            wires.push(order.to_wire(asset)?);
        }

        let mut action = BulkOrder::new(wires).with_grouping(grouping);
        if let Some(builder) = builder {
            action = action.with_builder(builder);
        }
        self.submit(Action::Order(action)).await
    }

    /// Aggressive IOC limit order priced off the mid.
    #[allow(clippy::too_many_arguments)]
    pub async fn market_open(
        &self,
        coin: &str,
        is_buy: bool,
        sz: f64,
        px: Option<f64>,
        slippage: f64,
        cloid: Option<Cloid>,
        builder: Option<BuilderInfo>,
    ) -> Result<Value> {
        let px = self.slippage_price(coin, is_buy, slippage, px).await?;
        let mut order = OrderRequest::limit(coin, is_buy, sz, px, Tif::Ioc);
        if let Some(cloid) = cloid {
            order = order.with_cloid(cloid);
        }
        self.order(order, builder).await
    }

    /// Limit price `slippage` away from `px` (or the current mid), rounded to
    /// 5 significant figures and the asset's price decimals.
    pub async fn slippage_price(
        &self,
        coin: &str,
        is_buy: bool,
        slippage: f64,
        px: Option<f64>,
    ) -> Result<f64> {
        let asset = self.metadata.asset(coin).await?;
        let px = match px {
            Some(px) => px,
            None => self.mids.mid(extract_dex_prefix(coin), coin).await?,
        };

        let px = if is_buy {
            px * (1.0 + slippage)
        } else {
            px * (1.0 - slippage)
        };

        let max_decimals: i32 = if asset >= SPOT_ASSET_OFFSET { 8 } else { 6 };
        let sz_decimals = self.metadata.sz_decimals(asset).await? as i32;
        Ok(round_half_to_even(
            round_to_significant_figures(px, 5),
            max_decimals - sz_decimals,
        )?)
    }

    pub async fn modify_order(&self, oid: OrderRef, order: OrderRequest) -> Result<Value> {
        self.bulk_modify(&[ModifyRequest { oid, order }]).await
    }

    pub async fn bulk_modify(&self, modifies: &[ModifyRequest]) -> Result<Value> {
        let mut wires = Vec::with_capacity(modifies.len());
        for modify in modifies {
            let asset = self.metadata.asset(&modify.order.coin).await?;
            wires.push(modify.to_wire(asset)?);
        }
        self.submit(Action::BatchModify(BulkModify { modifies: wires }))
            .await
    }

    pub async fn cancel(&self, coin: &str, oid: u64) -> Result<Value> {
        self.bulk_cancel(&[CancelRequest {
            coin: coin.to_string(),
            oid,
        }])
        .await
    }

    pub async fn bulk_cancel(&self, cancels: &[CancelRequest]) -> Result<Value> {
        let mut wires = Vec::with_capacity(cancels.len());
        for cancel in cancels {
            let asset = self.metadata.asset(&cancel.coin).await?;
            wires.push(cancel.to_wire(asset));
        }
        self.submit(Action::Cancel(BulkCancel { cancels: wires }))
            .await
    }

    pub async fn cancel_by_cloid(&self, coin: &str, cloid: Cloid) -> Result<Value> {
        self.bulk_cancel_by_cloid(&[CancelByCloidRequest {
            coin: coin.to_string(),
            cloid,
        }])
        .await
    }

    pub async fn bulk_cancel_by_cloid(&self, cancels: &[CancelByCloidRequest]) -> Result<Value> {
        let mut wires = Vec::with_capacity(cancels.len());
        for cancel in cancels {
            let asset = self.metadata.asset(&cancel.coin).await?;
            wires.push(cancel.to_wire(asset));
        }
        self.submit(Action::CancelByCloid(BulkCancelCloid { cancels: wires }))
            .await
    }

    /// Cancel all open orders at `time`; `None` clears the schedule.
    pub async fn schedule_cancel(&self, time: Option<u64>) -> Result<Value> {
        self.submit(Action::ScheduleCancel(ScheduleCancel { time }))
            .await
    }

    // ---- account ----

    pub async fn update_leverage(&self, leverage: u32, coin: &str, is_cross: bool) -> Result<Value> {
        let asset = self.metadata.asset(coin).await?;
        self.submit(Action::UpdateLeverage(UpdateLeverage {
            asset,
            is_cross,
            leverage,
        }))
        .await
    }

    /// Add (positive) or remove (negative) isolated margin in USD.
    pub async fn update_isolated_margin(&self, amount: f64, coin: &str) -> Result<Value> {
        let asset = self.metadata.asset(coin).await?;
        let ntli = usd_to_int(amount)?;
        self.submit(Action::UpdateIsolatedMargin(UpdateIsolatedMargin {
            asset,
            is_buy: true,
            ntli,
        }))
        .await
    }

    pub async fn set_referrer(&self, code: &str) -> Result<Value> {
        self.submit(Action::SetReferrer(SetReferrer {
            code: code.to_string(),
        }))
        .await
    }

    pub async fn create_sub_account(&self, name: &str) -> Result<Value> {
        self.submit(Action::CreateSubAccount(CreateSubAccount {
            name: name.to_string(),
        }))
        .await
    }

    /// Move USD micro-units between the master account and a sub-account.
    pub async fn sub_account_transfer(
        &self,
        sub_account_user: Address,
        is_deposit: bool,
        usd: u64,
    ) -> Result<Value> {
        self.submit(Action::SubAccountTransfer(SubAccountTransfer {
            sub_account_user,
            is_deposit,
            usd,
        }))
        .await
    }

    pub async fn sub_account_spot_transfer(
        &self,
        sub_account_user: Address,
        is_deposit: bool,
        token: &str,
        amount: f64,
    ) -> Result<Value> {
        self.submit(Action::SubAccountSpotTransfer(SubAccountSpotTransfer {
            sub_account_user,
            is_deposit,
            token: token.to_string(),
            amount: encode_wire(amount)?,
        }))
        .await
    }

    pub async fn vault_usd_transfer(
        &self,
        vault_address: Address,
        is_deposit: bool,
        usd: u64,
    ) -> Result<Value> {
        self.submit(Action::VaultTransfer(VaultTransfer {
            vault_address,
            is_deposit,
            usd,
        }))
        .await
    }

    // ---- user-signed transfers ----

    /// Move USD between spot and perp balances.
    pub async fn usd_class_transfer(&self, amount: f64, to_perp: bool) -> Result<Value> {
        let mut amount = encode_wire(amount)?;
        if let Some(vault) = &self.vault_address {
            amount = format!("{} subaccount:{}", amount, lower_hex(vault));
        }
        let nonce = self.nonces.next();
        self.submit_with_nonce(
            Action::UsdClassTransfer(UsdClassTransfer::new(amount, to_perp, nonce)),
            nonce,
        )
        .await
    }

    pub async fn send_asset(
        &self,
        destination: Address,
        source_dex: &str,
        destination_dex: &str,
        token: &str,
        amount: f64,
    ) -> Result<Value> {
        let from_sub_account = self
            .vault_address
            .as_ref()
            .map(lower_hex)
            .unwrap_or_default();
        let nonce = self.nonces.next();
        self.submit_with_nonce(
            Action::SendAsset(SendAsset::new(
                destination,
                source_dex,
                destination_dex,
                token,
                encode_wire(amount)?,
                from_sub_account,
                nonce,
            )),
            nonce,
        )
        .await
    }

    pub async fn usd_transfer(&self, amount: f64, destination: Address) -> Result<Value> {
        let nonce = self.nonces.next();
        self.submit_with_nonce(
            Action::UsdSend(UsdSend::new(destination, encode_wire(amount)?, nonce)),
            nonce,
        )
        .await
    }

    /// `token` is `NAME:0x<tokenId>`.
    pub async fn spot_transfer(&self, amount: f64, destination: Address, token: &str) -> Result<Value> {
        let nonce = self.nonces.next();
        self.submit_with_nonce(
            Action::SpotSend(SpotSend::new(destination, token, encode_wire(amount)?, nonce)),
            nonce,
        )
        .await
    }

    pub async fn withdraw_from_bridge(&self, amount: f64, destination: Address) -> Result<Value> {
        let nonce = self.nonces.next();
        self.submit_with_nonce(
            Action::Withdraw3(Withdraw3::new(destination, encode_wire(amount)?, nonce)),
            nonce,
        )
        .await
    }

    pub async fn token_delegate(
        &self,
        validator: Address,
        wei: u64,
        is_undelegate: bool,
    ) -> Result<Value> {
        let nonce = self.nonces.next();
        self.submit_with_nonce(
            Action::TokenDelegate(TokenDelegate::new(validator, wei, is_undelegate, nonce)),
            nonce,
        )
        .await
    }

    /// Authorize `agent_address` to trade for this account.
    pub async fn approve_agent(
        &self,
        agent_address: Address,
        agent_name: Option<String>,
    ) -> Result<Value> {
        let nonce = self.nonces.next();
        self.submit_with_nonce(
            Action::ApproveAgent(ApproveAgent::new(agent_address, agent_name, nonce)),
            nonce,
        )
        .await
    }

    /// `max_fee_rate` is a percentage string such as `"0.001%"`.
    pub async fn approve_builder_fee(&self, builder: Address, max_fee_rate: &str) -> Result<Value> {
        let nonce = self.nonces.next();
        self.submit_with_nonce(
            Action::ApproveBuilderFee(ApproveBuilderFee::new(builder, max_fee_rate, nonce)),
            nonce,
        )
        .await
    }

    /// Turn this account into a multi-sig user, or back into a normal user
    /// with `None`.
    pub async fn convert_to_multi_sig_user(
        &self,
        signers: Option<&MultiSigSigners>,
    ) -> Result<Value> {
        let nonce = self.nonces.next();
        let action = ConvertToMultiSigUser::new(signers, nonce)?;
        self.submit_with_nonce(Action::ConvertToMultiSigUser(action), nonce)
            .await
    }

    // ---- multi-sig ----

    /// Start a multi-sig action for `multi_sig_user` with this account as
    /// the outer signer. Participants sign `coordinator.request()`.
    pub fn prepare_multi_sig(
        &self,
        multi_sig_user: Address,
        inner: Action,
    ) -> Result<MultiSigCoordinator> {
        let signing = SigningContext::new(self.signer.network(), self.nonces.next())
            .with_vault(self.vault_address)
            .with_expires_after(self.expires_after);
        let context = MultiSigContext::new(multi_sig_user, self.signer.address());
        Ok(MultiSigCoordinator::new(context, inner, signing)?)
    }

    /// Sign the assembled multi-sig action as the outer signer and post it.
    pub async fn multi_sig(
        &self,
        coordinator: &MultiSigCoordinator,
        signatures: Vec<Signature>,
    ) -> Result<Value> {
        let payload = coordinator.finalize(&self.signer, signatures)?;
        info!(nonce = payload.nonce, "Submitting multi-sig action");
        self.transport.post(&payload).await
    }

    // ---- submission ----

    async fn submit(&self, action: Action) -> Result<Value> {
        let nonce = self.nonces.next();
        self.submit_with_nonce(action, nonce).await
    }

    async fn submit_with_nonce(&self, action: Action, nonce: u64) -> Result<Value> {
        let payload =
            self.signer
                .sign_action(action, nonce, self.vault_address, self.expires_after)?;
        info!(
            action = payload.action.type_name(),
            nonce,
            vault = ?payload.vault_address,
            "Submitting action"
        );
        self.transport.post(&payload).await
    }
}

impl std::fmt::Debug for Exchange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Exchange")
            .field("signer", &self.signer)
            .field("vault_address", &self.vault_address)
            .field("expires_after", &self.expires_after)
            .finish()
    }
}
