//! Event replay driver
//!
//! Feeds decoded events to an [`Auction`] one at a time, printing the top of
//! book after each one in verbose mode, then the final book and a timing
//! summary.

use matching_engine::{Auction, MatchingError, MetricsSnapshot, OrderEvent, ReportSink};
use std::fmt;
use tracing::{debug, error, info, warn};

/// Totals for one replay
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Events handed to the auction
    pub messages: u64,
    /// Lines that could not be decoded
    pub malformed: u64,
    /// Set when the event stream could not be read to the end
    pub read_error: Option<String>,
    pub metrics: MetricsSnapshot,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let latency = &self.metrics.event_latency;
        writeln!(f, "RUN SUMMARY")?;
        writeln!(f, "===========")?;
        writeln!(f, "messages: {}", self.messages)?;
        writeln!(f, "malformed: {}", self.malformed)?;
        writeln!(f, "rejected: {}", self.metrics.events_rejected)?;
        writeln!(f, "symbols: {}", self.metrics.symbols)?;
        writeln!(f, "trades: {}", self.metrics.trades_executed)?;
        writeln!(f, "shares: {}", self.metrics.shares_executed)?;
        writeln!(f, "total_ns: {}", latency.sum_ns)?;
        writeln!(f, "avg_ns_per_message: {}", latency.avg_ns)?;
        writeln!(f, "min_ns: {}", latency.min_ns)?;
        write!(f, "max_ns: {}", latency.max_ns)?;
        if let Some(err) = &self.read_error {
            write!(f, "\nread_error: {}", err)?;
        }
        Ok(())
    }
}

pub struct Runner {
    auction: Auction,
    out: Box<dyn ReportSink>,
    verbose: bool,
}

impl Runner {
    /// `out` receives the reports; trade lines go to the auction's own sink
    pub fn new(auction: Auction, out: Box<dyn ReportSink>, verbose: bool) -> Self {
        Self {
            auction,
            out,
            verbose,
        }
    }

    /// Replay every event, skipping lines that failed to decode
    ///
    /// A read error ends the replay; the events handled so far still count.
    pub fn run<I>(&mut self, events: I) -> RunSummary
    where
        I: IntoIterator<Item = Result<OrderEvent, MatchingError>>,
    {
        let mut messages = 0u64;
        let mut malformed = 0u64;
        let mut read_error = None;

        for event in events {
            let event = match event {
                Ok(event) => event,
                Err(MatchingError::Source(message)) => {
                    error!(error = %message, "Event stream unreadable");
                    read_error = Some(message);
                    break;
                }
                Err(err) => {
                    warn!(error = %err, "Skipping event");
                    malformed += 1;
                    continue;
                }
            };

            debug!(kind = event.kind(), "Handling event");
            let outcome = self.auction.handle_event(event);
            if let Some(execution) = outcome.execution().filter(|e| e.has_trades()) {
                debug!(
                    order_id = %execution.order_id,
                    filled = execution.filled_quantity(),
                    leaves = execution.leaves,
                    "Order matched"
                );
            }
            messages += 1;

            if self.verbose {
                let report = self.auction.top_of_books_report();
                self.out.emit(&report);
            }
        }

        let summary = RunSummary {
            messages,
            malformed,
            read_error,
            metrics: self.auction.metrics().snapshot(),
        };
        info!(
            messages = summary.messages,
            malformed = summary.malformed,
            avg_ns = summary.metrics.event_latency.avg_ns,
            "Replay finished"
        );
        summary
    }

    /// Print the final book and the summary
    pub fn finish(&mut self, summary: &RunSummary) {
        let dump = self.auction.book_dump();
        self.out.emit(dump.trim_end());
        self.out.emit(&summary.to_string());
    }
}
