//! Order, cancel and modify wire shapes.
//!
//! Field names are the venue's single-letter keys and field order is the
//! declaration order below; both feed the action hash.

use serde::{Deserialize, Serialize};

use crate::types::{Cloid, OrderRef};

/// Time in force of a limit order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tif {
    /// Add liquidity only (post-only).
    Alo,
    /// Immediate or cancel.
    Ioc,
    /// Good til cancelled.
    Gtc,
}

/// Take-profit or stop-loss trigger kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tpsl {
    Tp,
    Sl,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitWire {
    pub tif: Tif,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerWire {
    pub is_market: bool,
    pub trigger_px: String,
    pub tpsl: Tpsl,
}

/// `{"limit": {...}}` or `{"trigger": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderTypeWire {
    Limit(LimitWire),
    Trigger(TriggerWire),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderWire {
    #[serde(rename = "a")]
    pub asset: u32,
    #[serde(rename = "b")]
    pub is_buy: bool,
    #[serde(rename = "p")]
    pub limit_px: String,
    #[serde(rename = "s")]
    pub sz: String,
    #[serde(rename = "r")]
    pub reduce_only: bool,
    #[serde(rename = "t")]
    pub order_type: OrderTypeWire,
    #[serde(rename = "c", default, skip_serializing_if = "Option::is_none")]
    pub cloid: Option<Cloid>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelWire {
    #[serde(rename = "a")]
    pub asset: u32,
    #[serde(rename = "o")]
    pub oid: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelByCloidWire {
    pub asset: u32,
    pub cloid: Cloid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifyWire {
    pub oid: OrderRef,
    pub order: OrderWire,
}

/// How the orders of one batch relate to each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Grouping {
    #[default]
    Na,
    NormalTpsl,
    PositionTpsl,
}

/// Builder fee attached to an order batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuilderInfo {
    /// Builder address, lower-cased hex.
    #[serde(rename = "b")]
    pub builder: String,
    /// Fee in tenths of a basis point.
    #[serde(rename = "f")]
    pub fee: u64,
}

impl BuilderInfo {
    pub fn new(builder: impl AsRef<str>, fee: u64) -> Self {
        Self {
            builder: builder.as_ref().to_lowercase(),
            fee,
        }
    }
}
