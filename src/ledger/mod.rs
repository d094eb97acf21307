pub(crate) mod ledger_events;
pub(crate) mod ledger_reconciler;

pub use ledger_events::detect_newly_closed;
pub use ledger_reconciler::{merge, MergeOutcome};
