//! One side of one symbol's order book
//!
//! CRITICAL PROPERTIES:
//! 1. Bids are served highest price first, asks lowest price first
//! 2. Each price level is a FIFO queue (front = next to match)
//! 3. A price is active iff its level holds at least one entry
//! 4. Cancelled orders stay queued until popped, and are skipped everywhere

use serde::Serialize;
use std::collections::{BTreeMap, VecDeque};
use tracing::debug;

use crate::order::{LimitPrice, Price, SharedOrder, Side};
use crate::registry::OrderRegistry;

// ============================================================================
// Book Side
// ============================================================================

/// Ordering and crossability rule of a side book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BookSide {
    /// Resting buys; best = highest price
    Bid,
    /// Resting sells; best = lowest price
    Ask,
}

impl BookSide {
    /// Book that rests orders of the given side
    pub fn resting(side: Side) -> Self {
        match side {
            Side::Buy => BookSide::Bid,
            Side::Sell => BookSide::Ask,
        }
    }

    /// Side of the orders resting here
    pub fn side(&self) -> Side {
        match self {
            BookSide::Bid => Side::Buy,
            BookSide::Ask => Side::Sell,
        }
    }

    /// Whether `top` satisfies an aggressor limited at `limit`
    ///
    /// Asks are hit by buys (`top <= limit`), bids by sells (`top >= limit`).
    /// A market aggressor accepts any top.
    pub fn crosses(&self, top: Price, limit: LimitPrice) -> bool {
        match limit {
            LimitPrice::Market => true,
            LimitPrice::Limit(limit) => match self {
                BookSide::Ask => top <= limit,
                BookSide::Bid => top >= limit,
            },
        }
    }
}

// ============================================================================
// Price Level
// ============================================================================

/// FIFO queue of orders at one price
#[derive(Debug, Clone)]
pub struct PriceLevel {
    price: Price,
    orders: VecDeque<SharedOrder>,
}

impl PriceLevel {
    pub fn new(price: Price) -> Self {
        Self {
            price,
            orders: VecDeque::new(),
        }
    }

    pub fn price(&self) -> Price {
        self.price
    }

    pub fn push_front(&mut self, order: SharedOrder) {
        self.orders.push_front(order);
    }

    pub fn push_back(&mut self, order: SharedOrder) {
        self.orders.push_back(order);
    }

    /// Remove and return the first live order, discarding dead ones ahead of it
    pub fn pop_live(&mut self) -> Option<SharedOrder> {
        while let Some(order) = self.orders.pop_front() {
            if !order.is_dead() {
                return Some(order);
            }
            debug!(order_id = %order.id(), price = %self.price, "Dropped dead order");
        }
        None
    }

    /// Live orders in FIFO order
    pub fn live_orders(&self) -> impl Iterator<Item = &SharedOrder> {
        self.orders.iter().filter(|order| !order.is_dead())
    }

    /// Entries including dead ones not yet popped
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

// ============================================================================
// Side Book
// ============================================================================

/// Price levels for one (symbol, side)
#[derive(Debug, Clone)]
pub struct SideBook {
    side: BookSide,
    /// Keys are exactly the active prices; empty levels are evicted at once
    levels: BTreeMap<Price, PriceLevel>,
    registry: OrderRegistry,
}

impl SideBook {
    pub fn new(side: BookSide, registry: OrderRegistry) -> Self {
        Self {
            side,
            levels: BTreeMap::new(),
            registry,
        }
    }

    pub fn side(&self) -> BookSide {
        self.side
    }

    /// Highest-priority active price, `None` when the book is empty
    pub fn best_price(&self) -> Option<Price> {
        let entry = match self.side {
            BookSide::Ask => self.levels.first_key_value(),
            BookSide::Bid => self.levels.last_key_value(),
        };
        entry.map(|(price, _)| *price)
    }

    /// Whether `best` is acceptable to an aggressor limited at `limit`
    pub fn is_crossable(&self, best: Price, limit: LimitPrice) -> bool {
        self.side.crosses(best, limit)
    }

    /// The best price if it crosses `limit`
    pub fn crossable_price(&self, limit: LimitPrice) -> Option<Price> {
        self.best_price().filter(|best| self.is_crossable(*best, limit))
    }

    /// Remove and return the next live order an aggressor at `limit` may trade
    /// with, together with the price level it came from
    pub fn pop_next_eligible(&mut self, limit: LimitPrice) -> Option<(Price, SharedOrder)> {
        while let Some(top) = self.crossable_price(limit) {
            let level = self.levels.get_mut(&top)?;
            let next = level.pop_live();
            if level.is_empty() {
                self.levels.remove(&top);
                debug!(side = ?self.side, price = %top, "Price level evicted");
            }
            if let Some(order) = next {
                return Some((top, order));
            }
        }
        None
    }

    /// Queue ahead of every order at its price (keeps time priority of a
    /// partially filled resting order)
    pub fn insert_front(&mut self, order: SharedOrder) {
        self.insert(order, true);
    }

    /// Queue behind every order at its price
    pub fn insert_back(&mut self, order: SharedOrder) {
        self.insert(order, false);
    }

    fn insert(&mut self, order: SharedOrder, front: bool) {
        let Some(price) = order.limit_price().price() else {
            debug!(order_id = %order.id(), "Market order not rested");
            return;
        };
        debug_assert_eq!(order.side(), self.side.side());

        let level = self
            .levels
            .entry(price)
            .or_insert_with(|| PriceLevel::new(price));
        self.registry.register(&order);

        debug!(
            order_id = %order.id(),
            side = ?self.side,
            price = %price,
            front,
            "Order rested"
        );
        if front {
            level.push_front(order);
        } else {
            level.push_back(order);
        }
    }

    /// Levels in priority order
    fn levels_in_priority(&self) -> Box<dyn Iterator<Item = &PriceLevel> + '_> {
        match self.side {
            BookSide::Ask => Box::new(self.levels.values()),
            BookSide::Bid => Box::new(self.levels.values().rev()),
        }
    }

    /// First live order in priority order
    pub fn top_order(&self) -> Option<&SharedOrder> {
        self.levels_in_priority().find_map(|level| level.live_orders().next())
    }

    /// Display form of the top live order
    pub fn top_snapshot(&self) -> Option<String> {
        self.top_order().map(ToString::to_string)
    }

    /// Status lines of every live order, priority then FIFO order
    pub fn status_lines(&self) -> Vec<String> {
        self.levels_in_priority()
            .flat_map(|level| level.live_orders())
            .map(SharedOrder::status_line)
            .collect()
    }

    /// Newline-terminated status lines
    pub fn full_snapshot(&self) -> String {
        self.status_lines()
            .into_iter()
            .map(|line| line + "\n")
            .collect()
    }

    /// Number of active price levels
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================
