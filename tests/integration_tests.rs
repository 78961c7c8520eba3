//! Integration tests for component interactions.
//!
//! These tests drive the exchange end to end, from key loading through
//! signing to the request body handed to the transport.

use alloy_primitives::{Address, U256};
use hyperliquid_core::signing::{
    action_hash, build_typed_data, sign_as_participant, SigningContext,
};
use hyperliquid_core::serde_utils::lower_hex;
use hyperliquid_core::types::OrderRequest;
use hyperliquid_core::wire::{
    BulkOrder, LimitWire, OrderTypeWire, OrderWire, ScheduleCancel, Tif,
};
use hyperliquid_core::{Action, Cloid, ExchangePayload, Network, Wallet};
use hyperliquid_exchange::{
    Clock, Exchange, MetadataProvider, NonceManager, Result as ExchangeResult, StaticMetadata,
    StaticMids, Transport,
};
use serde_json::{json, Value};
use std::str::FromStr;
use std::sync::{Arc, Mutex};

// Test private keys (DO NOT USE IN PRODUCTION)
const GOLDEN_PRIVATE_KEY: &str =
    "0x0123456789012345678901234567890123456789012345678901234567890123";
const KEY_A: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
const KEY_B: &str = "59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";

struct FixedClock(u64);

impl Clock for FixedClock {
    fn now_ms(&self) -> u64 {
        self.0
    }
}

#[derive(Default)]
struct RecordingTransport {
    payloads: Mutex<Vec<Value>>,
}

impl RecordingTransport {
    fn bodies(&self) -> Vec<Value> {
        self.payloads.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Transport for RecordingTransport {
    async fn post(&self, payload: &ExchangePayload) -> ExchangeResult<Value> {
        self.payloads.lock().unwrap().push(payload.to_json()?);
        Ok(json!({"status": "ok", "response": {"type": "default"}}))
    }
}

fn exchange(key: &str, network: Network, now: u64) -> (Exchange, Arc<RecordingTransport>) {
    let signer = Wallet::from_private_key(key).unwrap().action_signer(network);
    let metadata = Arc::new(
        StaticMetadata::new()
            .with_asset("ETH", 4, 4)
            .with_asset("BTC", 0, 5),
    );
    let mids = Arc::new(StaticMids::new().with_mid("", "ETH", 1670.1));
    let transport = Arc::new(RecordingTransport::default());
    let exchange = Exchange::new(signer, metadata, mids, transport.clone())
        .with_nonce_manager(NonceManager::new(Arc::new(FixedClock(now))));
    (exchange, transport)
}

fn recover(body: &Value, network: Network) -> Address {
    let payload: ExchangePayload = serde_json::from_value(body.clone()).unwrap();
    let ctx = SigningContext::new(network, payload.nonce)
        .with_vault(payload.vault_address)
        .with_expires_after(payload.expires_after);
    let data = build_typed_data(&payload.action, &ctx).unwrap();
    payload
        .signature
        .recover_address(&data.signing_hash())
        .unwrap()
}

/// The connection id of a known order matches the venue's reference value.
#[test]
fn test_golden_connection_id() {
    let action = Action::Order(BulkOrder::new(vec![OrderWire {
        asset: 4,
        is_buy: true,
        limit_px: "1670.1".to_string(),
        sz: "0.0147".to_string(),
        reduce_only: false,
        order_type: OrderTypeWire::Limit(LimitWire { tif: Tif::Ioc }),
        cloid: None,
    }]));

    let hash = action_hash(&action, 1677777606040, None, None).unwrap();
    assert_eq!(
        hash.to_string(),
        "0x0fcbeda5ae3c4950a548021552a4fea2226858c4453571bf3f24ba017eac2908"
    );
}

/// A wallet loaded from a hex key reproduces a known mainnet signature.
#[test]
fn test_golden_signature_through_wallet() {
    let signer = Wallet::from_private_key(GOLDEN_PRIVATE_KEY)
        .unwrap()
        .action_signer(Network::Mainnet);
    let action = Action::Order(BulkOrder::new(vec![OrderWire {
        asset: 1,
        is_buy: true,
        limit_px: "100".to_string(),
        sz: "100".to_string(),
        reduce_only: false,
        order_type: OrderTypeWire::Limit(LimitWire { tif: Tif::Gtc }),
        cloid: Some(Cloid::from_u128(1)),
    }]));

    let payload = signer.sign_action(action, 0, None, None).unwrap();
    assert_eq!(
        payload.signature.r,
        U256::from_str("0x41ae18e8239a56cacbc5dad94d45d0b747e5da11ad564077fcac71277a946e3")
            .unwrap()
    );
    assert_eq!(
        payload.signature.s,
        U256::from_str("0x3c61f667e747404fe7eea8f90ab0e76cc12ce60270438b2058324681a00116da")
            .unwrap()
    );
    assert_eq!(payload.signature.v, 27);
}

/// An order placed through the exchange lands on the wire in canonical form.
#[tokio::test]
async fn test_order_request_body() {
    let (exchange, transport) = exchange(KEY_A, Network::Mainnet, 1677777606040);

    exchange
        .order(
            OrderRequest::limit("ETH", true, 0.0147, 1670.1, Tif::Ioc),
            None,
        )
        .await
        .unwrap();

    let bodies = transport.bodies();
    assert_eq!(bodies.len(), 1);
    let body = &bodies[0];
    assert_eq!(
        body["action"],
        json!({
            "type": "order",
            "orders": [{
                "a": 4, "b": true, "p": "1670.1", "s": "0.0147", "r": false,
                "t": {"limit": {"tif": "Ioc"}}
            }],
            "grouping": "na"
        })
    );
    assert_eq!(body["nonce"], 1677777606040u64);
    assert_eq!(body["vaultAddress"], Value::Null);
    assert_eq!(body["expiresAfter"], Value::Null);
    assert_eq!(recover(body, Network::Mainnet), exchange.address());
}

/// User-signed transfers carry the chain fields and verify on their own domain.
#[tokio::test]
async fn test_usd_transfer_request_body() {
    let now = 1687816341423;
    let (exchange, transport) = exchange(KEY_A, Network::Testnet, now);
    let destination: Address = "0x5e9ee1089755c3435139848e47e6635505d5a13a"
        .parse()
        .unwrap();

    exchange.usd_transfer(1.0, destination).await.unwrap();

    let bodies = transport.bodies();
    let body = &bodies[0];
    assert_eq!(
        body["action"],
        json!({
            "type": "usdSend",
            "signatureChainId": "0x66eee",
            "hyperliquidChain": "Testnet",
            "destination": "0x5e9ee1089755c3435139848e47e6635505d5a13a",
            "amount": "1",
            "time": now
        })
    );
    assert_eq!(recover(body, Network::Testnet), exchange.address());
}

/// A vault-scoped exchange signs L1 actions for the vault but strips the
/// vault from class transfers.
#[tokio::test]
async fn test_vault_scoping() {
    let vault: Address = "0x1719884eb866cb12b2287399b15f7db5e7d775ea"
        .parse()
        .unwrap();
    let (exchange, transport) = exchange(KEY_A, Network::Mainnet, 1_700_000_000_000);
    let exchange = exchange.with_vault(Some(vault));

    exchange.schedule_cancel(Some(1_700_000_100_000)).await.unwrap();
    exchange.usd_class_transfer(5.0, false).await.unwrap();

    let bodies = transport.bodies();
    assert_eq!(
        bodies[0]["vaultAddress"],
        "0x1719884eb866cb12b2287399b15f7db5e7d775ea"
    );
    assert_eq!(recover(&bodies[0], Network::Mainnet), exchange.address());

    assert_eq!(bodies[1]["vaultAddress"], Value::Null);
    assert_eq!(
        bodies[1]["action"]["amount"],
        "5 subaccount:0x1719884eb866cb12b2287399b15f7db5e7d775ea"
    );
    assert_eq!(bodies[1]["nonce"], 1_700_000_000_001u64);
}

/// Two participants sign off-line; the outer signer submits.
#[tokio::test]
async fn test_multi_sig_round_trip() {
    let (exchange, transport) = exchange(KEY_A, Network::Testnet, 1_700_000_000_000);
    let participant = Wallet::from_private_key(KEY_B)
        .unwrap()
        .action_signer(Network::Testnet);
    let own = Wallet::from_private_key(KEY_A)
        .unwrap()
        .action_signer(Network::Testnet);
    let multi_sig_user = Address::repeat_byte(0x42);

    let coordinator = exchange
        .prepare_multi_sig(
            multi_sig_user,
            Action::ScheduleCancel(ScheduleCancel { time: None }),
        )
        .unwrap();
    let signatures = vec![
        sign_as_participant(&own, coordinator.request()).unwrap(),
        sign_as_participant(&participant, coordinator.request()).unwrap(),
    ];
    exchange.multi_sig(&coordinator, signatures).await.unwrap();

    let bodies = transport.bodies();
    let body = &bodies[0];
    assert_eq!(body["action"]["type"], "multiSig");
    assert_eq!(body["action"]["signatures"].as_array().unwrap().len(), 2);
    assert_eq!(
        body["action"]["payload"]["multiSigUser"],
        lower_hex(&multi_sig_user)
    );
    assert_eq!(
        body["action"]["payload"]["outerSigner"],
        lower_hex(&exchange.address())
    );
    assert_eq!(recover(body, Network::Testnet), exchange.address());
}

/// Metadata lookups work through the trait object the exchange holds.
#[tokio::test]
async fn test_metadata_as_trait_object() {
    let metadata: Arc<dyn MetadataProvider> =
        Arc::new(StaticMetadata::new().with_asset("PURR/USDC", 10_000, 0));
    assert_eq!(metadata.asset("PURR/USDC").await.unwrap(), 10_000);
    assert!(metadata.asset("ETH").await.is_err());
}
