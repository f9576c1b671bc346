//! Trade settlement
//!
//! Settlement only moves sizes: whichever side is larger keeps the difference
//! and the other is filled to zero. The execution price is always the resting
//! order's price.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cmp::Ordering;

use crate::order::{SharedOrder, Side};

/// A matched execution between a buy and a sell
#[derive(Debug, Clone, Serialize)]
pub struct Trade {
    /// Auction-wide sequence number
    pub sequence: u64,
    pub symbol: String,
    pub buy_order_id: String,
    pub sell_order_id: String,
    /// Price of the resting order
    pub price: f64,
    /// Shares executed
    pub quantity: u64,
    /// Side of the incoming order
    pub aggressor_side: Side,
    pub timestamp: DateTime<Utc>,
}

impl Trade {
    /// Line written to the report sink for every fill
    pub fn report_line(&self) -> String {
        format!("{} traded with {}", self.buy_order_id, self.sell_order_id)
    }
}

/// Settle a matched (buy, sell) pair and return the executed quantity
///
/// `buy` must carry a non-negative size and `sell` a non-positive one.
pub fn settle(buy: &SharedOrder, sell: &SharedOrder) -> u64 {
    let buy_size = buy.size();
    let sell_size = sell.size();
    debug_assert!(buy_size >= 0 && sell_size <= 0);

    let sum = buy_size + sell_size;
    match sum.cmp(&0) {
        Ordering::Greater => {
            buy.set_size(sum);
            sell.set_size(0);
        }
        Ordering::Less => {
            sell.set_size(sum);
            buy.set_size(0);
        }
        Ordering::Equal => {
            buy.set_size(0);
            sell.set_size(0);
        }
    }

    buy_size.unsigned_abs().min(sell_size.unsigned_abs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::{LimitPrice, Order};

    fn pair(buy: i64, sell: i64) -> (SharedOrder, SharedOrder) {
        (
            SharedOrder::new(Order::new("B", "IBM", buy, LimitPrice::limit(100.0))),
            SharedOrder::new(Order::new("S", "IBM", sell, LimitPrice::limit(100.0))),
        )
    }

    #[test]
    fn test_buy_keeps_residual() {
        let (buy, sell) = pair(100, -30);
        assert_eq!(settle(&buy, &sell), 30);
        assert_eq!(buy.size(), 70);
        assert_eq!(sell.size(), 0);
    }

    #[test]
    fn test_sell_keeps_residual() {
        let (buy, sell) = pair(20, -50);
        assert_eq!(settle(&buy, &sell), 20);
        assert_eq!(buy.size(), 0);
        assert_eq!(sell.size(), -30);
    }

    #[test]
    fn test_exact_fill() {
        let (buy, sell) = pair(40, -40);
        assert_eq!(settle(&buy, &sell), 40);
        assert_eq!(buy.size(), 0);
        assert_eq!(sell.size(), 0);
    }

    #[test]
    fn test_conservation() {
        for (b, s) in [(100, -30), (20, -50), (40, -40), (1, -1000)] {
            let (buy, sell) = pair(b, s);
            let quantity = settle(&buy, &sell);
            let removed_buy = (b - buy.size()).unsigned_abs();
            let removed_sell = (s - sell.size()).unsigned_abs();
            assert_eq!(removed_buy, quantity);
            assert_eq!(removed_sell, quantity);
        }
    }
}
