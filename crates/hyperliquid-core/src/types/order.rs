//! Client-side order requests.
//!
//! Requests are expressed in coin names and floats; [`OrderRequest::to_wire`]
//! turns them into wire orders once the caller has resolved the asset id.

use serde::{Deserialize, Serialize};

use super::cloid::{Cloid, OrderRef};
use crate::numeric::encode_wire;
use crate::wire::{
    CancelByCloidWire, CancelWire, LimitWire, ModifyWire, OrderTypeWire, OrderWire, Tif, Tpsl,
    TriggerWire,
};
use crate::Result;

/// Order type as the caller describes it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OrderType {
    Limit {
        tif: Tif,
    },
    #[serde(rename_all = "camelCase")]
    Trigger {
        is_market: bool,
        trigger_px: f64,
        tpsl: Tpsl,
    },
}

impl OrderType {
    pub fn to_wire(&self) -> Result<OrderTypeWire> {
        Ok(match *self {
            OrderType::Limit { tif } => OrderTypeWire::Limit(LimitWire { tif }),
            OrderType::Trigger {
                is_market,
                trigger_px,
                tpsl,
            } => OrderTypeWire::Trigger(TriggerWire {
                is_market,
                trigger_px: encode_wire(trigger_px)?,
                tpsl,
            }),
        })
    }
}

/// A single order before asset resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub coin: String,
    pub is_buy: bool,
    pub sz: f64,
    pub limit_px: f64,
    pub order_type: OrderType,
    pub reduce_only: bool,
    pub cloid: Option<Cloid>,
}

impl OrderRequest {
    /// Create a limit order request.
    pub fn limit(coin: impl Into<String>, is_buy: bool, sz: f64, limit_px: f64, tif: Tif) -> Self {
        Self {
            coin: coin.into(),
            is_buy,
            sz,
            limit_px,
            order_type: OrderType::Limit { tif },
            reduce_only: false,
            cloid: None,
        }
    }

    /// Create a take-profit or stop-loss order request.
    pub fn trigger(
        coin: impl Into<String>,
        is_buy: bool,
        sz: f64,
        limit_px: f64,
        trigger_px: f64,
        is_market: bool,
        tpsl: Tpsl,
    ) -> Self {
        Self {
            coin: coin.into(),
            is_buy,
            sz,
            limit_px,
            order_type: OrderType::Trigger {
                is_market,
                trigger_px,
                tpsl,
            },
            reduce_only: true,
            cloid: None,
        }
    }

    pub fn reduce_only(mut self, reduce_only: bool) -> Self {
        self.reduce_only = reduce_only;
        self
    }

    pub fn with_cloid(mut self, cloid: Cloid) -> Self {
        self.cloid = Some(cloid);
        self
    }

    /// Convert to the wire form for `asset`.
    ///
    /// # Errors
    ///
    /// Fails when a price or size cannot be rendered as a wire decimal.
    pub fn to_wire(&self, asset: u32) -> Result<OrderWire> {
        Ok(OrderWire {
            asset,
            is_buy: self.is_buy,
            limit_px: encode_wire(self.limit_px)?,
            sz: encode_wire(self.sz)?,
            reduce_only: self.reduce_only,
            order_type: self.order_type.to_wire()?,
            cloid: self.cloid,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelRequest {
    pub coin: String,
    pub oid: u64,
}

impl CancelRequest {
    pub fn to_wire(&self, asset: u32) -> CancelWire {
        CancelWire {
            asset,
            oid: self.oid,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelByCloidRequest {
    pub coin: String,
    pub cloid: Cloid,
}

impl CancelByCloidRequest {
    pub fn to_wire(&self, asset: u32) -> CancelByCloidWire {
        CancelByCloidWire {
            asset,
            cloid: self.cloid,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModifyRequest {
    pub oid: OrderRef,
    pub order: OrderRequest,
}

impl ModifyRequest {
    pub fn to_wire(&self, asset: u32) -> Result<ModifyWire> {
        Ok(ModifyWire {
            oid: self.oid,
            order: self.order.to_wire(asset)?,
        })
    }
}
