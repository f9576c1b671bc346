//! Built-in demonstration session
//!
//! Two symbols: IBM exercises a market sell sweeping two bid levels and a
//! market buy into an empty ask book; MSFT walks a bid level down with
//! successive sells before a large ask rests above the remaining bid.

use crate::event::{NewOrder, OrderEvent};

fn order(id: &str, symbol: &str, size: i64, limit_price: Option<f64>) -> OrderEvent {
    OrderEvent::NewOrder(NewOrder {
        id: id.to_string(),
        symbol: symbol.to_string(),
        size,
        limit_price,
    })
}

/// Events of the demonstration session, in arrival order
pub fn demo_events() -> Vec<OrderEvent> {
    vec![
        order("IBM1", "IBM", 100, Some(100.0)),
        order("IBM2", "IBM", 100, Some(101.0)),
        order("IBMX", "IBM", -150, None),
        order("IBM3", "IBM", 100, None),
        order("MSFT1", "MSFT", 100, Some(100.0)),
        order("MSFT2", "MSFT", 100, Some(101.0)),
        order("MSFT3", "MSFT", -20, Some(100.0)),
        order("MSFT4", "MSFT", -10, Some(101.0)),
        order("MSFT5", "MSFT", -30, None),
        order("MSFT6", "MSFT", -50, Some(100.0)),
        order("MSFT7", "MSFT", -300, Some(101.0)),
    ]
}
