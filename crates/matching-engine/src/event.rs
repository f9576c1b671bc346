//! Inbound order events
//!
//! Events arrive as internally tagged JSON objects, one per line:
//!
//! ```json
//! {"type":"new_order","id":"IBM1","symbol":"IBM","size":100,"limit_price":100.0}
//! {"type":"new_order","id":"IBMX","symbol":"IBM","size":-150}
//! {"type":"cancel_replace","target_id":"IBM1","size":0}
//! ```
//!
//! A missing `limit_price` means a market order. Any other `type` decodes to
//! [`OrderEvent::Unsupported`].

use serde::{Deserialize, Serialize};

/// New order submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOrder {
    /// Globally unique order id
    pub id: String,
    /// Traded symbol
    pub symbol: String,
    /// Signed size: positive buys, negative sells
    pub size: i64,
    /// Limit price; absent for market orders
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit_price: Option<f64>,
}

/// Cancel or cancel/replace request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CancelReplace {
    /// Id of the order being cancelled
    pub target_id: String,
    /// Id for the replacement order; defaults to `target_id`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// New signed size; zero is a pure cancel
    #[serde(default)]
    pub size: i64,
    /// New limit price; absent makes the replacement a market order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit_price: Option<f64>,
}

impl CancelReplace {
    /// Id the replacement order is booked under
    pub fn replacement_id(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.target_id)
    }

    pub fn is_pure_cancel(&self) -> bool {
        self.size == 0
    }
}

/// Event consumed by the auction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OrderEvent {
    /// A new order
    NewOrder(NewOrder),
    /// A cancel or cancel/replace
    CancelReplace(CancelReplace),
    /// Any event kind the auction does not handle
    #[serde(other)]
    Unsupported,
}

impl OrderEvent {
    /// Short name for logging
    pub fn kind(&self) -> &'static str {
        match self {
            OrderEvent::NewOrder(_) => "new_order",
            OrderEvent::CancelReplace(_) => "cancel_replace",
            OrderEvent::Unsupported => "unsupported",
        }
    }
}

impl From<NewOrder> for OrderEvent {
    fn from(order: NewOrder) -> Self {
        OrderEvent::NewOrder(order)
    }
}

impl From<CancelReplace> for OrderEvent {
    fn from(request: CancelReplace) -> Self {
        OrderEvent::CancelReplace(request)
    }
}
