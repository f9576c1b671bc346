//! Metrics for the auction
//!
//! Plain atomic counters; the runner reads them through [`AuctionMetrics::snapshot`]
//! for its end-of-run summary.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Simple atomic counter
#[derive(Debug, Default)]
pub struct Counter {
    value: AtomicU64,
}

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&self) {
        self.add(1);
    }

    pub fn add(&self, n: u64) {
        self.value.fetch_add(n, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.value.store(0, Ordering::Relaxed);
    }
}

/// Simple gauge for current values
#[derive(Debug, Default)]
pub struct Gauge {
    value: AtomicU64,
}

impl Gauge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, value: u64) {
        self.value.store(value, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }
}

/// Latency accumulator (count, sum, min, max) in nanoseconds
#[derive(Debug)]
pub struct Histogram {
    count: AtomicU64,
    sum: AtomicU64,
    min: AtomicU64,
    max: AtomicU64,
}

impl Histogram {
    pub fn new() -> Self {
        Self {
            count: AtomicU64::new(0),
            sum: AtomicU64::new(0),
            min: AtomicU64::new(u64::MAX),
            max: AtomicU64::new(0),
        }
    }

    pub fn record(&self, value_ns: u64) {
        self.count.fetch_add(1, Ordering::Relaxed);
        self.sum.fetch_add(value_ns, Ordering::Relaxed);
        self.min.fetch_min(value_ns, Ordering::Relaxed);
        self.max.fetch_max(value_ns, Ordering::Relaxed);
    }

    pub fn get_stats(&self) -> HistogramStats {
        let count = self.count.load(Ordering::Relaxed);
        let sum = self.sum.load(Ordering::Relaxed);

        HistogramStats {
            count,
            sum_ns: sum,
            avg_ns: if count > 0 { sum / count } else { 0 },
            min_ns: if count > 0 { self.min.load(Ordering::Relaxed) } else { 0 },
            max_ns: self.max.load(Ordering::Relaxed),
        }
    }

    pub fn reset(&self) {
        self.count.store(0, Ordering::Relaxed);
        self.sum.store(0, Ordering::Relaxed);
        self.min.store(u64::MAX, Ordering::Relaxed);
        self.max.store(0, Ordering::Relaxed);
    }
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistogramStats {
    pub count: u64,
    pub sum_ns: u64,
    pub avg_ns: u64,
    pub min_ns: u64,
    pub max_ns: u64,
}

/// Counters kept by the auction
#[derive(Debug, Default)]
pub struct AuctionMetrics {
    pub events_received: Counter,
    pub new_orders: Counter,
    pub cancels: Counter,
    pub replaces: Counter,
    pub replaces_dropped: Counter,
    pub events_rejected: Counter,
    pub events_unsupported: Counter,
    pub trades_executed: Counter,
    pub shares_executed: Counter,
    pub residuals_discarded: Counter,
    pub symbols: Gauge,
    pub event_latency: Histogram,
}

impl AuctionMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_trade(&self, quantity: u64) {
        self.trades_executed.increment();
        self.shares_executed.add(quantity);
    }

    pub fn record_latency(&self, duration: Duration) {
        let ns = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);
        self.event_latency.record(ns);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            events_received: self.events_received.get(),
            new_orders: self.new_orders.get(),
            cancels: self.cancels.get(),
            replaces: self.replaces.get(),
            replaces_dropped: self.replaces_dropped.get(),
            events_rejected: self.events_rejected.get(),
            events_unsupported: self.events_unsupported.get(),
            trades_executed: self.trades_executed.get(),
            shares_executed: self.shares_executed.get(),
            residuals_discarded: self.residuals_discarded.get(),
            symbols: self.symbols.get(),
            event_latency: self.event_latency.get_stats(),
        }
    }

    pub fn reset(&self) {
        for counter in [
            &self.events_received,
            &self.new_orders,
            &self.cancels,
            &self.replaces,
            &self.replaces_dropped,
            &self.events_rejected,
            &self.events_unsupported,
            &self.trades_executed,
            &self.shares_executed,
            &self.residuals_discarded,
        ] {
            counter.reset();
        }
        self.event_latency.reset();
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub events_received: u64,
    pub new_orders: u64,
    pub cancels: u64,
    pub replaces: u64,
    pub replaces_dropped: u64,
    pub events_rejected: u64,
    pub events_unsupported: u64,
    pub trades_executed: u64,
    pub shares_executed: u64,
    pub residuals_discarded: u64,
    pub symbols: u64,
    pub event_latency: HistogramStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_histogram_stats() {
        let histogram = Histogram::new();
        assert_eq!(histogram.get_stats().min_ns, 0);

        histogram.record(100);
        histogram.record(300);
        let stats = histogram.get_stats();
        assert_eq!(stats.count, 2);
        assert_eq!(stats.avg_ns, 200);
        assert_eq!(stats.min_ns, 100);
        assert_eq!(stats.max_ns, 300);
    }

    #[test]
    fn test_record_trade_counts_shares() {
        let metrics = AuctionMetrics::new();
        metrics.record_trade(100);
        metrics.record_trade(50);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.trades_executed, 2);
        assert_eq!(snapshot.shares_executed, 150);

        metrics.reset();
        assert_eq!(metrics.snapshot().shares_executed, 0);
    }
}
