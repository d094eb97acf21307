use std::collections::HashMap;

use log::debug;

use crate::trades::Trade;

/// Result of merging a freshly fetched batch into an existing ledger.
#[derive(Debug, Clone, Default)]
pub struct MergeOutcome {
    /// The ledger to persist, sorted by open time ascending.
    pub merged: Vec<Trade>,
    /// Tickets that did not exist in the previous ledger.
    pub added: Vec<Trade>,
    /// Tickets that existed but differ in any field (typically open → closed).
    pub changed: Vec<Trade>,
    /// Set when the merge was refused because the fresh batch was empty while
    /// the existing ledger was not.
    pub noop: bool,
}

/// Merges a fresh batch into an existing ledger.
///
/// The freshly fetched file is the source of truth: whenever the batch is
/// non-empty the merged ledger is exactly the batch, re-sorted by open time.
/// The existing ledger is only consulted to classify entries as added or
/// changed. An empty batch against a non-empty ledger is refused rather than
/// truncating it, which protects against transient empty fetches.
pub fn merge(existing: &[Trade], fresh: Vec<Trade>) -> MergeOutcome {
    if fresh.is_empty() && !existing.is_empty() {
        debug!(
            "reconciler: refusing to replace {} trades with an empty batch",
            existing.len()
        );
        return MergeOutcome {
            merged: existing.to_vec(),
            noop: true,
            ..Default::default()
        };
    }

    let by_ticket: HashMap<i64, &Trade> = existing.iter().map(|t| (t.ticket, t)).collect();

    let mut added = Vec::new();
    let mut changed = Vec::new();
    for trade in &fresh {
        match by_ticket.get(&trade.ticket) {
            None => added.push(trade.clone()),
            Some(previous) if *previous != trade => changed.push(trade.clone()),
            Some(_) => {}
        }
    }

    let mut merged = fresh;
    merged.sort_by_key(|t| t.open_time);

    MergeOutcome {
        merged,
        added,
        changed,
        noop: false,
    }
}
