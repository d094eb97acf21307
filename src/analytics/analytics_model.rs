use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::trades::Trade;

/// One point of the equity curve. `trade == None` marks a synthetic anchor:
/// the account inception point (index 0) or the floating-equity "now" marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartDataPoint {
    pub timestamp: NaiveDateTime,
    /// Rounded to 2 decimal places at construction time so rendered series
    /// do not accumulate float drift.
    pub balance: f64,
    pub trade: Option<Trade>,
    pub index: usize,
    pub is_equity_marker: bool,
}

/// Per-local-day aggregate of closed actual trades, feeding the calendar.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    pub profit: f64,
    pub trades: usize,
}

/// Scalar summary of the ledger. All monetary values are full-precision;
/// only chart balances are rounded.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    pub net_profit: f64,
    pub gross_profit: f64,
    /// Sum of negative trade profits; zero or negative.
    pub gross_loss: f64,
    /// `None` is the "no losing trades" sentinel, reported instead of a
    /// division by zero or an infinity leaking into arithmetic.
    pub profit_factor: Option<f64>,
    /// Percentage of winning closed trades, 0 when there are none.
    pub win_rate: f64,
    pub winning_trades: usize,
    pub losing_trades: usize,
    pub total_trades: usize,
    pub open_trade_count: usize,
    pub max_consecutive_wins: usize,
    pub max_consecutive_losses: usize,
    pub max_drawdown: f64,
    /// Measured against the peak at the moment the drawdown occurred, not a
    /// global peak. A new peak resets the baseline.
    pub max_drawdown_percent: f64,
    pub total_commission: f64,
    pub total_swap: f64,
    /// Unrealized profit of currently open trades.
    pub floating_pnl: f64,
    /// Closed balance plus floating P/L.
    pub equity: f64,
    /// Running balance after the last closed operation.
    pub current_balance: f64,
    /// Balance as of local midnight today, for today's-return figures.
    pub start_of_day_balance: f64,
    pub last_trading_day: Option<NaiveDate>,
}

/// Dashboard data derived from one account's ledger. Recomputed on demand,
/// never persisted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedData {
    pub metrics: PerformanceMetrics,
    pub chart_data: Vec<ChartDataPoint>,
    /// Keyed by `YYYY-MM-DD` local calendar day.
    pub daily_summary: BTreeMap<String, DailySummary>,
    pub recent_trades: Vec<Trade>,
    pub closed_trades: Vec<Trade>,
    pub open_trades: Vec<Trade>,
}
