/// Symbol recorded on synthesized balance-adjustment rows.
pub const BALANCE_SYMBOL: &str = "balance";

/// Close price forced onto balance rows so they always count as closed
/// operations. The wire format reserves `0` for "still open".
pub const BALANCE_CLOSE_PRICE: f64 = 1.0;

/// Default comments for balance rows without one.
pub const DEPOSIT_COMMENT: &str = "Deposit";
pub const WITHDRAWAL_COMMENT: &str = "Withdrawal";

/// Number of closed trades surfaced on the dashboard's recent-trades list.
pub const RECENT_TRADES_LIMIT: usize = 10;

/// Keys in the persisted key-value store.
pub const STORE_KEY_ACCOUNTS: &str = "accounts";
pub const STORE_KEY_SETTINGS: &str = "settings";
pub const STORE_KEY_WEEKLY_SUMMARY_SENT: &str = "weekly_summary_last_sent";

/// Hour of day (local) from which the Sunday weekly summary may fire.
pub const WEEKLY_SUMMARY_HOUR: u32 = 18;
