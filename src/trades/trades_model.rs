use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Timestamp sentinel for "missing" dates. Rows carrying it for a mandatory
/// date never make it past the normalizer.
pub fn epoch_sentinel() -> NaiveDateTime {
    chrono::DateTime::<Utc>::UNIX_EPOCH.naive_utc()
}

/// Kind of ledger entry. `Balance` is the synthetic deposit/withdrawal
/// adjustment with no market exposure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeType {
    Buy,
    Sell,
    Balance,
}

impl TradeType {
    /// Parses the `type` cell of a statement row. Unknown kinds (credit
    /// lines, pending orders) are not ledger entries and yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "buy" => Some(TradeType::Buy),
            "sell" => Some(TradeType::Sell),
            "balance" => Some(TradeType::Balance),
            _ => None,
        }
    }

    pub fn is_balance(&self) -> bool {
        matches!(self, TradeType::Balance)
    }
}

impl std::fmt::Display for TradeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeType::Buy => write!(f, "buy"),
            TradeType::Sell => write!(f, "sell"),
            TradeType::Balance => write!(f, "balance"),
        }
    }
}

/// Whether a trade is still open, represented explicitly instead of the wire
/// format's `closePrice == 0` sentinel. Balance rows are always `Closed` by
/// construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "price", rename_all = "camelCase")]
pub enum CloseState {
    Open,
    Closed(f64),
}

/// One ledger entry. `ticket` is unique within an account's ledger and is
/// the reconciliation key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    pub ticket: i64,
    pub open_time: NaiveDateTime,
    /// Meaningful only when the trade is closed; open trades carry the epoch
    /// sentinel here.
    pub close_time: NaiveDateTime,
    #[serde(rename = "type")]
    pub trade_type: TradeType,
    pub size: f64,
    pub symbol: String,
    pub open_price: f64,
    pub close_state: CloseState,
    pub commission: f64,
    pub swap: f64,
    pub profit: f64,
    pub comment: String,
}

impl Trade {
    pub fn is_open(&self) -> bool {
        matches!(self.close_state, CloseState::Open)
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.close_state, CloseState::Closed(_))
    }

    /// Wire-format close price: `0` for open trades.
    pub fn close_price(&self) -> f64 {
        match self.close_state {
            CloseState::Open => 0.0,
            CloseState::Closed(price) => price,
        }
    }

    /// Realized (or floating, for open trades) balance impact of this entry.
    pub fn net_value(&self) -> f64 {
        self.profit + self.commission + self.swap
    }
}
