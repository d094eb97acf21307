use std::collections::{HashMap, HashSet};

use crate::trades::Trade;

/// Derives "newly closed" events from a fresh batch against the previously
/// persisted ledger.
///
/// A fresh trade qualifies when it is a real (non-balance) closed trade that
/// either did not exist before or was still open before. A trade that was
/// already closed in both batches does not re-fire. Each ticket appears at
/// most once.
pub fn detect_newly_closed(fresh: &[Trade], previous: &[Trade]) -> Vec<Trade> {
    let previous_by_ticket: HashMap<i64, &Trade> =
        previous.iter().map(|t| (t.ticket, t)).collect();

    let mut seen = HashSet::new();
    fresh
        .iter()
        .filter(|t| !t.trade_type.is_balance() && t.is_closed())
        .filter(|t| match previous_by_ticket.get(&t.ticket) {
            None => true,
            Some(prev) => prev.is_open(),
        })
        .filter(|t| seen.insert(t.ticket))
        .cloned()
        .collect()
}
