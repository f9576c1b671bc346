//! Order entity
//!
//! An [`Order`] carries a signed size: positive for buys, negative for sells.
//! The sign is fixed when the order is created and fills only ever move the
//! size toward zero. Books and the registry share orders through
//! [`SharedOrder`], so a cancel that reaches an order through the registry is
//! visible wherever that order still sits in a FIFO.

use ordered_float::OrderedFloat;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::error::MatchingError;
use crate::event::{CancelReplace, NewOrder};

/// Price key used by the books
pub type Price = OrderedFloat<f64>;

// ============================================================================
// Side
// ============================================================================

/// Order side (buy or sell)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Buy order (positive size)
    Buy,
    /// Sell order (negative size)
    Sell,
}

impl Side {
    /// Side implied by a signed size; zero counts as a buy
    pub fn of(size: i64) -> Self {
        if size < 0 {
            Side::Sell
        } else {
            Side::Buy
        }
    }

    /// Returns the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }

    /// Returns true if this is a buy order
    pub fn is_buy(&self) -> bool {
        matches!(self, Side::Buy)
    }

    /// Label used in book status lines
    pub fn book_label(&self) -> &'static str {
        match self {
            Side::Buy => "bid",
            Side::Sell => "ask",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "buy"),
            Side::Sell => write!(f, "sell"),
        }
    }
}

// ============================================================================
// Limit Price
// ============================================================================

/// Price constraint of an order
///
/// `Market` orders carry no price at all, so they can never be compared
/// against or stored as a price level by accident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LimitPrice {
    /// No price constraint; trades at whatever price is best
    Market,
    /// Worst acceptable price
    Limit(Price),
}

impl LimitPrice {
    /// Limit at the given price
    pub fn limit(price: f64) -> Self {
        LimitPrice::Limit(OrderedFloat(price))
    }

    /// A missing price on the wire means a market order
    pub fn from_optional(price: Option<f64>) -> Self {
        price.map_or(LimitPrice::Market, LimitPrice::limit)
    }

    /// The price, if this is a limit
    pub fn price(&self) -> Option<Price> {
        match self {
            LimitPrice::Market => None,
            LimitPrice::Limit(price) => Some(*price),
        }
    }

    pub fn is_market(&self) -> bool {
        matches!(self, LimitPrice::Market)
    }
}

impl fmt::Display for LimitPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LimitPrice::Market => write!(f, "MKT"),
            LimitPrice::Limit(price) => write!(f, "{:?}", price.into_inner()),
        }
    }
}

// ============================================================================
// Order
// ============================================================================

/// A resting or in-flight order
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    id: String,
    symbol: String,
    side: Side,
    size: i64,
    limit_price: LimitPrice,
    dead: bool,
}

impl Order {
    /// Create a live order; the side is taken from the sign of `size`
    pub fn new(
        id: impl Into<String>,
        symbol: impl Into<String>,
        size: i64,
        limit_price: LimitPrice,
    ) -> Self {
        Self {
            id: id.into(),
            symbol: symbol.into(),
            side: Side::of(size),
            size,
            limit_price,
            dead: false,
        }
    }

    /// Build an order from an inbound new-order event
    pub fn from_new_order(event: &NewOrder) -> Result<Self, MatchingError> {
        let limit_price = LimitPrice::from_optional(event.limit_price);
        validate(&event.id, &event.symbol, event.size, limit_price)?;
        Ok(Self::new(&event.id, &event.symbol, event.size, limit_price))
    }

    /// Build the replacement for `original`
    ///
    /// The replacement takes the request's own id, new size and new limit,
    /// and inherits only the symbol from the order it replaces.
    pub fn replacing(original: &Order, request: &CancelReplace) -> Result<Self, MatchingError> {
        let id = request.replacement_id();
        let limit_price = LimitPrice::from_optional(request.limit_price);
        validate(id, &original.symbol, request.size, limit_price)?;
        Ok(Self::new(id, &original.symbol, request.size, limit_price))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// Signed remaining size
    pub fn size(&self) -> i64 {
        self.size
    }

    pub fn limit_price(&self) -> LimitPrice {
        self.limit_price
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn is_filled(&self) -> bool {
        self.size == 0
    }

    /// Set the signed remaining size
    pub fn set_size(&mut self, size: i64) {
        debug_assert!(
            size == 0 || Side::of(size) == self.side,
            "order {} would flip side",
            self.id
        );
        self.size = size;
    }

    pub fn set_limit_price(&mut self, limit_price: LimitPrice) {
        self.limit_price = limit_price;
    }

    /// Mark the order dead; returns false if it already was
    pub fn mark_dead(&mut self) -> bool {
        !std::mem::replace(&mut self.dead, true)
    }

    /// `price,side,size` line used by full book dumps
    pub fn status_line(&self) -> String {
        let price = self.limit_price.price().map_or(f64::NAN, |p| p.into_inner());
        format!("{:.2},{},{}", price, self.side.book_label(), self.size)
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} : {} {} @ {}",
            self.id, self.size, self.symbol, self.limit_price
        )
    }
}

fn validate(
    id: &str,
    symbol: &str,
    size: i64,
    limit_price: LimitPrice,
) -> Result<(), MatchingError> {
    if id.is_empty() {
        return Err(MatchingError::invalid(id, "order id is required"));
    }
    if symbol.is_empty() {
        return Err(MatchingError::invalid(id, "symbol is required"));
    }
    if size == 0 {
        return Err(MatchingError::invalid(id, "size must be non-zero"));
    }
    if let Some(price) = limit_price.price() {
        let value = price.into_inner();
        if !value.is_finite() || value <= 0.0 {
            return Err(MatchingError::invalid(
                id,
                format!("limit price must be finite and positive, got {}", value),
            ));
        }
    }
    Ok(())
}

// ============================================================================
// Shared Order
// ============================================================================

/// Handle to an order shared between books and the registry
#[derive(Debug, Clone)]
pub struct SharedOrder(Arc<Mutex<Order>>);

impl SharedOrder {
    pub fn new(order: Order) -> Self {
        Self(Arc::new(Mutex::new(order)))
    }

    pub fn id(&self) -> String {
        self.0.lock().id.clone()
    }

    pub fn symbol(&self) -> String {
        self.0.lock().symbol.clone()
    }

    pub fn side(&self) -> Side {
        self.0.lock().side
    }

    pub fn size(&self) -> i64 {
        self.0.lock().size
    }

    pub fn set_size(&self, size: i64) {
        self.0.lock().set_size(size);
    }

    pub fn limit_price(&self) -> LimitPrice {
        self.0.lock().limit_price
    }

    pub fn set_limit_price(&self, limit_price: LimitPrice) {
        self.0.lock().set_limit_price(limit_price);
    }

    pub fn is_dead(&self) -> bool {
        self.0.lock().dead
    }

    /// Mark dead; returns false if it already was
    pub fn kill(&self) -> bool {
        self.0.lock().mark_dead()
    }

    pub fn status_line(&self) -> String {
        self.0.lock().status_line()
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> Order {
        self.0.lock().clone()
    }

    /// True if both handles point at the same order
    pub fn same_order(&self, other: &SharedOrder) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl From<Order> for SharedOrder {
    fn from(order: Order) -> Self {
        Self::new(order)
    }
}

impl fmt::Display for SharedOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", *self.0.lock())
    }
}

// ============================================================================
// Tests
// ============================================================================
