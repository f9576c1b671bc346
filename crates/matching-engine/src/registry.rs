//! Shared order registry
//!
//! One registry is shared by every book of an auction and by the auction
//! itself. Cancel/replace requests carry only an order id, so this is the one
//! place an order can be found without knowing its symbol or side.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::order::SharedOrder;

/// What happens to registry entries once an order can no longer trade
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetentionPolicy {
    /// Keep every entry for the life of the process
    #[default]
    RetainAll,
    /// Drop entries when the order fully fills or is cancelled
    EvictTerminal,
}

/// Cloneable handle to the id → order map
#[derive(Debug, Clone, Default)]
pub struct OrderRegistry {
    orders: Arc<RwLock<HashMap<String, SharedOrder>>>,
    policy: RetentionPolicy,
}

impl OrderRegistry {
    /// Registry that never evicts
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: RetentionPolicy, capacity: usize) -> Self {
        Self {
            orders: Arc::new(RwLock::new(HashMap::with_capacity(capacity))),
            policy,
        }
    }

    /// Insert or overwrite by id
    pub fn register(&self, order: &SharedOrder) {
        self.orders.write().insert(order.id(), order.clone());
    }

    /// Look up an order without touching it
    pub fn get(&self, id: &str) -> Option<SharedOrder> {
        self.orders.read().get(id).cloned()
    }

    /// Mark the order with this id dead and return it
    ///
    /// Unknown ids return `None` and change nothing.
    pub fn find_and_kill(&self, id: &str) -> Option<SharedOrder> {
        let order = self.get(id)?;
        if order.kill() {
            debug!(order_id = %id, "Order marked dead");
        }
        if self.policy == RetentionPolicy::EvictTerminal {
            self.evict(&order);
        }
        Some(order)
    }

    /// Called when an order fully fills
    pub fn on_filled(&self, order: &SharedOrder) {
        if self.policy == RetentionPolicy::EvictTerminal {
            self.evict(order);
        }
    }

    /// Remove the entry only if it still refers to this exact order
    ///
    /// A replacement booked under the same id must survive the eviction of
    /// the order it replaced.
    fn evict(&self, order: &SharedOrder) {
        let id = order.id();
        let mut orders = self.orders.write();
        if orders.get(&id).is_some_and(|entry| entry.same_order(order)) {
            orders.remove(&id);
            debug!(order_id = %id, "Order evicted from registry");
        }
    }

    pub fn len(&self) -> usize {
        self.orders.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::{LimitPrice, Order};

    fn shared(id: &str, size: i64) -> SharedOrder {
        SharedOrder::new(Order::new(id, "IBM", size, LimitPrice::limit(100.0)))
    }

    #[test]
    fn test_find_and_kill_unknown_id() {
        let registry = OrderRegistry::new();
        assert!(registry.find_and_kill("nope").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_find_and_kill_marks_dead_and_keeps_entry() {
        let registry = OrderRegistry::new();
        let order = shared("A", 10);
        registry.register(&order);

        let found = registry.find_and_kill("A").unwrap();
        assert!(found.same_order(&order));
        assert!(order.is_dead());
        assert_eq!(registry.len(), 1);

        // second cancel finds the same dead order
        assert!(registry.find_and_kill("A").unwrap().is_dead());
    }

    #[test]
    fn test_register_overwrites_by_id() {
        let registry = OrderRegistry::new();
        let first = shared("A", 10);
        let second = shared("A", 20);
        registry.register(&first);
        registry.register(&second);

        assert_eq!(registry.len(), 1);
        assert!(registry.get("A").unwrap().same_order(&second));
    }

    #[test]
    fn test_clones_share_state() {
        let registry = OrderRegistry::new();
        let handle = registry.clone();
        handle.register(&shared("A", 10));
        assert!(registry.get("A").is_some());
    }

    #[test]
    fn test_evict_terminal_policy() {
        let registry = OrderRegistry::with_policy(RetentionPolicy::EvictTerminal, 16);
        let filled = shared("F", 10);
        let cancelled = shared("C", 10);
        registry.register(&filled);
        registry.register(&cancelled);

        registry.on_filled(&filled);
        assert!(registry.get("F").is_none());

        assert!(registry.find_and_kill("C").is_some());
        assert!(registry.get("C").is_none());
        assert!(registry.find_and_kill("C").is_none());
    }

    #[test]
    fn test_evict_spares_replacement_under_same_id() {
        let registry = OrderRegistry::with_policy(RetentionPolicy::EvictTerminal, 4);
        let original = shared("A", 10);
        let replacement = shared("A", 5);
        registry.register(&original);
        registry.register(&replacement);

        registry.on_filled(&original);
        assert!(registry.get("A").unwrap().same_order(&replacement));
    }
}
