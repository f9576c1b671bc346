//! Result types for auction events

use crate::error::MatchingError;
use crate::trade::Trade;

/// Result of running one order through the matching loop
#[derive(Debug, Clone)]
pub struct Execution {
    /// Id of the incoming order
    pub order_id: String,
    /// Fills in execution order
    pub trades: Vec<Trade>,
    /// Signed size left after matching
    pub leaves: i64,
    /// Whether the leaves were queued in the book
    pub rested: bool,
}

impl Execution {
    /// Check if any trades were generated
    pub fn has_trades(&self) -> bool {
        !self.trades.is_empty()
    }

    /// Total quantity filled
    pub fn filled_quantity(&self) -> u64 {
        self.trades.iter().map(|t| t.quantity).sum()
    }

    /// Leaves that were neither filled nor queued (market order residual)
    pub fn discarded(&self) -> i64 {
        if self.rested {
            0
        } else {
            self.leaves
        }
    }
}

/// What became of one inbound event
#[derive(Debug, Clone)]
pub enum EventOutcome {
    /// New order matched and/or rested
    Executed(Execution),
    /// Pure cancel; `found` is false for unknown ids
    Cancelled { target_id: String, found: bool },
    /// Original cancelled and replacement run through matching
    Replaced {
        target_id: String,
        execution: Execution,
    },
    /// Replace for an unknown id; nothing happened
    ReplaceDropped { target_id: String },
    /// Event failed validation; nothing happened
    Rejected(MatchingError),
    /// Event kind not handled by the auction
    Unsupported,
}

impl EventOutcome {
    pub fn execution(&self) -> Option<&Execution> {
        match self {
            EventOutcome::Executed(execution) | EventOutcome::Replaced { execution, .. } => {
                Some(execution)
            }
            _ => None,
        }
    }
}
