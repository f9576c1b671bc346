//! Double limit book auction
//!
//! Routes inbound events to the per-symbol books and runs the price-time
//! priority matching loop.
//!
//! CRITICAL PROPERTIES:
//! 1. Each event runs to completion before the next one is accepted
//! 2. The aggressor trades against the opposite book until it is filled or
//!    the best opposite price no longer satisfies its limit
//! 3. A partially filled resting order goes back to the front of its level
//! 4. Priced residuals rest at the back of their level; market residuals are
//!    discarded

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::book::{BookSide, SideBook};
use crate::error::MatchingError;
use crate::event::{CancelReplace, OrderEvent};
use crate::metrics::AuctionMetrics;
use crate::order::{Order, Price, SharedOrder, Side};
use crate::registry::OrderRegistry;
use crate::result::{EventOutcome, Execution};
use crate::sink::{NullSink, ReportSink};
use crate::trade::{settle, Trade};

// ============================================================================
// Symbol Books
// ============================================================================

/// Bid and ask book of one symbol
#[derive(Debug, Clone)]
pub struct SymbolBooks {
    pub bids: SideBook,
    pub asks: SideBook,
}

impl SymbolBooks {
    fn new(registry: &OrderRegistry) -> Self {
        Self {
            bids: SideBook::new(BookSide::Bid, registry.clone()),
            asks: SideBook::new(BookSide::Ask, registry.clone()),
        }
    }

    /// (opposite book, own book) for an aggressor on `side`
    fn split_for(&mut self, side: Side) -> (&mut SideBook, &mut SideBook) {
        match side {
            Side::Buy => (&mut self.asks, &mut self.bids),
            Side::Sell => (&mut self.bids, &mut self.asks),
        }
    }
}

// ============================================================================
// Reports
// ============================================================================

/// Top of both books of one symbol
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopOfBook {
    pub symbol: String,
    pub bid: Option<String>,
    pub ask: Option<String>,
}

impl fmt::Display for TopOfBook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} BID {} | ASK {}",
            self.symbol,
            self.bid.as_deref().unwrap_or(EMPTY_BOOK),
            self.ask.as_deref().unwrap_or(EMPTY_BOOK)
        )
    }
}

const EMPTY_BOOK: &str = "<empty>";

// ============================================================================
// Auction
// ============================================================================

/// Matching engine over any number of symbols
pub struct Auction {
    registry: OrderRegistry,
    /// Created lazily, never removed; sorted for deterministic reports
    books: BTreeMap<String, SymbolBooks>,
    sink: Box<dyn ReportSink>,
    metrics: Arc<AuctionMetrics>,
    sequence: u64,
}

impl Auction {
    /// Create an auction writing its lines to `sink`
    pub fn new(registry: OrderRegistry, sink: Box<dyn ReportSink>) -> Self {
        Self {
            registry,
            books: BTreeMap::new(),
            sink,
            metrics: Arc::new(AuctionMetrics::new()),
            sequence: 0,
        }
    }

    pub fn registry(&self) -> &OrderRegistry {
        &self.registry
    }

    pub fn metrics(&self) -> &Arc<AuctionMetrics> {
        &self.metrics
    }

    /// Get the books of a symbol
    pub fn books(&self, symbol: &str) -> Option<&SymbolBooks> {
        self.books.get(symbol)
    }

    /// Symbols seen so far, sorted
    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.books.keys().map(String::as_str)
    }

    fn next_sequence(&mut self) -> u64 {
        self.sequence += 1;
        self.sequence
    }

    /// Handle one inbound event to completion
    pub fn handle_event(&mut self, event: OrderEvent) -> EventOutcome {
        let started = Instant::now();
        self.metrics.events_received.increment();

        let outcome = match event {
            OrderEvent::NewOrder(new_order) => {
                self.metrics.new_orders.increment();
                match Order::from_new_order(&new_order) {
                    Ok(order) => EventOutcome::Executed(self.submit(order)),
                    Err(err) => self.reject(err),
                }
            }
            OrderEvent::CancelReplace(request) => self.cancel_replace(&request),
            OrderEvent::Unsupported => {
                warn!("Unsupported event ignored");
                self.metrics.events_unsupported.increment();
                EventOutcome::Unsupported
            }
        };

        self.metrics.record_latency(started.elapsed());
        outcome
    }

    fn reject(&self, err: MatchingError) -> EventOutcome {
        warn!(error = %err, "Order rejected");
        self.metrics.events_rejected.increment();
        EventOutcome::Rejected(err)
    }

    /// Cancel, or cancel and replace, an order known to the registry
    ///
    /// A replace for an id the registry has never seen is dropped: without the
    /// original there is no symbol to route the replacement to.
    fn cancel_replace(&mut self, request: &CancelReplace) -> EventOutcome {
        let original = self.registry.find_and_kill(&request.target_id);
        let target_id = request.target_id.clone();

        if request.is_pure_cancel() {
            self.metrics.cancels.increment();
            info!(order_id = %target_id, found = original.is_some(), "Order cancelled");
            return EventOutcome::Cancelled {
                target_id,
                found: original.is_some(),
            };
        }

        let Some(original) = original else {
            warn!(order_id = %target_id, "Replace for unknown order dropped");
            self.metrics.replaces_dropped.increment();
            return EventOutcome::ReplaceDropped { target_id };
        };

        self.metrics.replaces.increment();
        match Order::replacing(&original.snapshot(), request) {
            Ok(replacement) => {
                info!(
                    order_id = %target_id,
                    replacement_id = %replacement.id(),
                    "Order replaced"
                );
                EventOutcome::Replaced {
                    target_id,
                    execution: self.submit(replacement),
                }
            }
            Err(err) => self.reject(err),
        }
    }

    /// Match an order against the opposite book and rest any priced residual
    ///
    /// This is the core matching loop:
    /// 1. Pop the next eligible resting order from the opposite book
    /// 2. Settle the (buy, sell) pair
    /// 3. Put a partially filled resting order back at the front of its level
    /// 4. Repeat until the aggressor is filled or nothing crosses
    pub fn submit(&mut self, order: Order) -> Execution {
        info!(
            order_id = %order.id(),
            symbol = %order.symbol(),
            side = %order.side(),
            size = order.size(),
            limit = %order.limit_price(),
            "Matching order"
        );

        let symbol = order.symbol().to_string();
        let side = order.side();
        let limit = order.limit_price();
        let aggressor = SharedOrder::new(order);

        // Collect fills first, then stamp trades (books borrow self.books)
        let mut fills: Vec<(String, String, Price, u64)> = Vec::new();
        let rested = {
            let registry = &self.registry;
            let books = self
                .books
                .entry(symbol.clone())
                .or_insert_with(|| SymbolBooks::new(registry));
            let (opposite, own) = books.split_for(side);

            while aggressor.size() != 0 {
                let Some((price, resting)) = opposite.pop_next_eligible(limit) else {
                    break;
                };

                let (buy, sell) = match side {
                    Side::Buy => (&aggressor, &resting),
                    Side::Sell => (&resting, &aggressor),
                };
                let quantity = settle(buy, sell);
                fills.push((buy.id(), sell.id(), price, quantity));

                if resting.size() != 0 {
                    opposite.insert_front(resting);
                } else {
                    registry.on_filled(&resting);
                }
            }

            if aggressor.size() == 0 {
                registry.on_filled(&aggressor);
                false
            } else if limit.is_market() {
                debug!(
                    order_id = %aggressor.id(),
                    leaves = aggressor.size(),
                    "Market order residual discarded"
                );
                self.metrics.residuals_discarded.increment();
                false
            } else {
                own.insert_back(aggressor.clone());
                true
            }
        };
        self.metrics.symbols.set(self.books.len() as u64);

        let trades: Vec<Trade> = fills
            .into_iter()
            .map(|(buy_order_id, sell_order_id, price, quantity)| Trade {
                sequence: self.next_sequence(),
                symbol: symbol.clone(),
                buy_order_id,
                sell_order_id,
                price: price.into_inner(),
                quantity,
                aggressor_side: side,
                timestamp: chrono::Utc::now(),
            })
            .collect();

        for trade in &trades {
            info!(
                sequence = trade.sequence,
                symbol = %trade.symbol,
                buy = %trade.buy_order_id,
                sell = %trade.sell_order_id,
                price = trade.price,
                quantity = trade.quantity,
                "Trade executed"
            );
            self.metrics.record_trade(trade.quantity);
            self.sink.emit(&trade.report_line());
        }

        Execution {
            order_id: aggressor.id(),
            trades,
            leaves: aggressor.size(),
            rested,
        }
    }

    /// Top of both books for every symbol
    pub fn top_of_books(&self) -> Vec<TopOfBook> {
        self.books
            .iter()
            .map(|(symbol, books)| TopOfBook {
                symbol: symbol.clone(),
                bid: books.bids.top_snapshot(),
                ask: books.asks.top_snapshot(),
            })
            .collect()
    }

    /// Rendered top-of-book report
    pub fn top_of_books_report(&self) -> String {
        let mut report = String::from("TOP OF BOOK\n===========");
        for top in self.top_of_books() {
            report.push('\n');
            report.push_str(&top.to_string());
        }
        report
    }

    /// Rendered full dump of every live order
    pub fn book_dump(&self) -> String {
        let mut report = String::from("BOOK STATUS\n===========\n");
        for (symbol, books) in &self.books {
            report.push_str(&format!("{} BID\n", symbol));
            report.push_str(&books.bids.full_snapshot());
            report.push_str(&format!("{} ASK\n", symbol));
            report.push_str(&books.asks.full_snapshot());
        }
        report
    }

}

impl Default for Auction {
    fn default() -> Self {
        Self::new(OrderRegistry::new(), Box::new(NullSink))
    }
}

impl fmt::Debug for Auction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Auction")
            .field("symbols", &self.books.len())
            .field("registered_orders", &self.registry.len())
            .field("sequence", &self.sequence)
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
