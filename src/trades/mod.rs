pub(crate) mod trades_model;

pub use trades_model::{epoch_sentinel, CloseState, Trade, TradeType};
