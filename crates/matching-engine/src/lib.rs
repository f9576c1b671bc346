//! Double-sided limit order matching engine
//!
//! Continuous price-time priority matching over any number of symbols, one
//! bid book and one ask book per symbol.
//!
//! # Modules
//!
//! - `order`: order entity, side and limit price
//! - `event`: inbound new-order and cancel/replace events
//! - `registry`: id-to-order index shared by every book
//! - `book`: one side of one symbol's book, price levels in FIFO order
//! - `trade`: settlement of a matched pair
//! - `auction`: event routing, matching loop, reports
//! - `source`: JSON-lines event reader
//! - `sink`: destinations for trade lines and reports
//! - `metrics`: counters and latency kept by the auction

pub mod auction;
pub mod book;
pub mod error;
pub mod event;
pub mod metrics;
pub mod order;
pub mod registry;
pub mod result;
pub mod scenario;
pub mod sink;
pub mod source;
pub mod trade;

pub use auction::{Auction, SymbolBooks, TopOfBook};
pub use book::{BookSide, PriceLevel, SideBook};
pub use error::MatchingError;
pub use event::{CancelReplace, NewOrder, OrderEvent};
pub use metrics::{AuctionMetrics, MetricsSnapshot};
pub use order::{LimitPrice, Order, Price, SharedOrder, Side};
pub use registry::{OrderRegistry, RetentionPolicy};
pub use result::{EventOutcome, Execution};
pub use sink::{MemorySink, NullSink, ReportSink, StdoutSink};
pub use source::JsonLinesSource;
pub use trade::{settle, Trade};

/// Result type for matching operations
pub type Result<T> = std::result::Result<T, MatchingError>;
