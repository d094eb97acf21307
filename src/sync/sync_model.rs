use serde::Serialize;

/// Outcome of one scheduler run.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncRunSummary {
    /// False when the trigger was refused (a run was already in flight, or
    /// the initial run had already happened).
    pub ran: bool,
    /// Accounts whose ledger changed and was queued for the end-of-run write.
    pub accounts_synced: usize,
    /// Accounts skipped over a fetch or parse failure.
    pub accounts_failed: usize,
    /// Accounts left untouched (no remote changes, or the empty-fetch guard).
    pub accounts_skipped: usize,
    pub notifications_sent: usize,
}
