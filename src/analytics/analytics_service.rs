use std::collections::BTreeMap;

use chrono::{Duration, Local, NaiveDate, NaiveDateTime, NaiveTime};

use super::analytics_model::{ChartDataPoint, DailySummary, PerformanceMetrics, ProcessedData};
use crate::accounts::Account;
use crate::constants::RECENT_TRADES_LIMIT;
use crate::trades::{epoch_sentinel, Trade};

/// Computes dashboard data for an account against the current local time.
pub fn compute_now(account: &Account) -> Option<ProcessedData> {
    compute(account, Local::now().naive_local())
}

/// Pure function of the ledger, the starting balance and the injected "now".
/// Returns `None` for an account with zero valid trades.
pub fn compute(account: &Account, now: NaiveDateTime) -> Option<ProcessedData> {
    let sentinel = epoch_sentinel();
    let valid: Vec<&Trade> = account
        .trades
        .iter()
        .filter(|t| t.open_time > sentinel && (t.is_open() || t.close_time > sentinel))
        .collect();
    if valid.is_empty() {
        return None;
    }

    // Closed operations (trades and balance adjustments) drive the equity
    // curve in close-time order; open trades only contribute floating P/L.
    let mut closed_ops: Vec<&Trade> = valid.iter().copied().filter(|t| t.is_closed()).collect();
    closed_ops.sort_by_key(|t| t.close_time);
    let open_trades: Vec<Trade> = valid
        .iter()
        .copied()
        .filter(|t| t.is_open())
        .cloned()
        .collect();

    // Inception anchor sits one millisecond before the first operation.
    let anchor_timestamp = closed_ops
        .first()
        .map(|t| t.close_time - Duration::milliseconds(1))
        .unwrap_or(now);
    let mut chart_data = vec![ChartDataPoint {
        timestamp: anchor_timestamp,
        balance: round2(account.initial_balance),
        trade: None,
        index: 0,
        is_equity_marker: false,
    }];

    let start_of_today = now.date().and_time(NaiveTime::MIN);

    let mut running_balance = account.initial_balance;
    let mut peak_balance = running_balance;
    let mut max_drawdown = 0.0_f64;
    let mut max_drawdown_percent = 0.0_f64;
    let mut start_of_day_balance = account.initial_balance;

    let mut gross_profit = 0.0_f64;
    let mut gross_loss = 0.0_f64;
    let mut total_commission = 0.0_f64;
    let mut total_swap = 0.0_f64;
    let mut winning_trades = 0_usize;
    let mut losing_trades = 0_usize;
    let mut total_trades = 0_usize;
    let mut win_streak = 0_usize;
    let mut loss_streak = 0_usize;
    let mut max_consecutive_wins = 0_usize;
    let mut max_consecutive_losses = 0_usize;
    let mut daily_summary: BTreeMap<String, DailySummary> = BTreeMap::new();
    let mut last_trading_day: Option<NaiveDate> = None;

    for (position, op) in closed_ops.iter().enumerate() {
        running_balance += op.net_value();

        // A new peak resets the drawdown baseline; the percentage is taken
        // against the peak at the moment the drawdown occurred.
        if running_balance > peak_balance {
            peak_balance = running_balance;
        }
        let drawdown = peak_balance - running_balance;
        if drawdown > max_drawdown {
            max_drawdown = drawdown;
            max_drawdown_percent = if peak_balance != 0.0 {
                drawdown / peak_balance * 100.0
            } else {
                0.0
            };
        }

        if op.close_time < start_of_today {
            start_of_day_balance += op.net_value();
        }

        chart_data.push(ChartDataPoint {
            timestamp: op.close_time,
            balance: round2(running_balance),
            trade: Some((*op).clone()),
            index: position + 1,
            is_equity_marker: false,
        });

        // Balance adjustments move the curve but are not trades.
        if op.trade_type.is_balance() {
            continue;
        }

        total_trades += 1;
        total_commission += op.commission;
        total_swap += op.swap;
        if op.profit > 0.0 {
            gross_profit += op.profit;
            winning_trades += 1;
            win_streak += 1;
            loss_streak = 0;
            max_consecutive_wins = max_consecutive_wins.max(win_streak);
        } else if op.profit < 0.0 {
            gross_loss += op.profit;
            losing_trades += 1;
            loss_streak += 1;
            win_streak = 0;
            max_consecutive_losses = max_consecutive_losses.max(loss_streak);
        } else {
            win_streak = 0;
            loss_streak = 0;
        }

        let day = op.close_time.date();
        let entry = daily_summary
            .entry(day.format("%Y-%m-%d").to_string())
            .or_default();
        entry.profit += op.net_value();
        entry.trades += 1;
        last_trading_day = Some(match last_trading_day {
            Some(previous) if previous > day => previous,
            _ => day,
        });
    }

    let floating_pnl: f64 = open_trades.iter().map(Trade::net_value).sum();
    let equity = running_balance + floating_pnl;

    // With open positions (or nothing but the inception anchor) the curve
    // gets a synthetic "now" point carrying current equity.
    if !open_trades.is_empty() || chart_data.len() == 1 {
        chart_data.push(ChartDataPoint {
            timestamp: now,
            balance: round2(equity),
            trade: None,
            index: chart_data.len(),
            is_equity_marker: true,
        });
    }

    let net_profit = gross_profit + gross_loss + total_commission + total_swap;
    let profit_factor = if gross_loss == 0.0 {
        None
    } else {
        Some((gross_profit / gross_loss).abs())
    };
    let win_rate = if total_trades > 0 {
        winning_trades as f64 / total_trades as f64 * 100.0
    } else {
        0.0
    };

    let mut closed_trades: Vec<Trade> = closed_ops
        .iter()
        .copied()
        .filter(|t| !t.trade_type.is_balance())
        .cloned()
        .collect();
    closed_trades.reverse();
    let recent_trades: Vec<Trade> = closed_trades
        .iter()
        .take(RECENT_TRADES_LIMIT)
        .cloned()
        .collect();

    Some(ProcessedData {
        metrics: PerformanceMetrics {
            net_profit,
            gross_profit,
            gross_loss,
            profit_factor,
            win_rate,
            winning_trades,
            losing_trades,
            total_trades,
            open_trade_count: open_trades.len(),
            max_consecutive_wins,
            max_consecutive_losses,
            max_drawdown,
            max_drawdown_percent,
            total_commission,
            total_swap,
            floating_pnl,
            equity,
            current_balance: running_balance,
            start_of_day_balance,
            last_trading_day,
        },
        chart_data,
        daily_summary,
        recent_trades,
        closed_trades,
        open_trades,
    })
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::Account;
    use crate::trades::{CloseState, TradeType};

    fn day(d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, d)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn closed_trade(ticket: i64, close: NaiveDateTime, profit: f64) -> Trade {
        Trade {
            ticket,
            open_time: close - Duration::hours(2),
            close_time: close,
            trade_type: TradeType::Buy,
            size: 0.1,
            symbol: "EURUSD".to_string(),
            open_price: 1.1,
            close_state: CloseState::Closed(1.2),
            commission: 0.0,
            swap: 0.0,
            profit,
            comment: String::new(),
        }
    }

    fn open_trade(ticket: i64, open: NaiveDateTime, profit: f64) -> Trade {
        Trade {
            ticket,
            open_time: open,
            close_time: epoch_sentinel(),
            trade_type: TradeType::Sell,
            size: 0.1,
            symbol: "GBPUSD".to_string(),
            open_price: 1.27,
            close_state: CloseState::Open,
            commission: 0.0,
            swap: 0.0,
            profit,
            comment: String::new(),
        }
    }

    fn balance_row(ticket: i64, time: NaiveDateTime, amount: f64) -> Trade {
        Trade {
            ticket,
            open_time: time,
            close_time: time,
            trade_type: TradeType::Balance,
            size: 0.0,
            symbol: "balance".to_string(),
            open_price: 0.0,
            close_state: CloseState::Closed(1.0),
            commission: 0.0,
            swap: 0.0,
            profit: amount,
            comment: "Deposit".to_string(),
        }
    }

    fn account(initial_balance: f64, trades: Vec<Trade>) -> Account {
        Account {
            id: "acc-1".to_string(),
            name: "Test".to_string(),
            initial_balance,
            currency: "USD".to_string(),
            data_url: None,
            trades,
            last_updated: None,
            created_at: day(1),
        }
    }

    #[test]
    fn account_with_no_valid_trades_yields_none() {
        assert!(compute(&account(1000.0, Vec::new()), day(20)).is_none());
    }

    #[test]
    fn max_drawdown_is_measured_against_the_peak_at_the_time() {
        // Balance walks 1000 -> 1200 -> 900 -> 1100; the 300 drop from the
        // 1200 peak is 25%.
        let acc = account(
            1000.0,
            vec![
                closed_trade(1, day(1), 200.0),
                closed_trade(2, day(2), -300.0),
                closed_trade(3, day(3), 200.0),
            ],
        );
        let data = compute(&acc, day(20)).unwrap();
        assert_eq!(data.metrics.max_drawdown, 300.0);
        assert!((data.metrics.max_drawdown_percent - 25.0).abs() < 1e-9);
        assert_eq!(data.metrics.current_balance, 1100.0);
    }

    #[test]
    fn all_profitable_trades_report_the_no_loss_sentinel() {
        let acc = account(
            1000.0,
            vec![closed_trade(1, day(1), 50.0), closed_trade(2, day(2), 70.0)],
        );
        let data = compute(&acc, day(20)).unwrap();
        assert_eq!(data.metrics.profit_factor, None);
        assert_eq!(data.metrics.win_rate, 100.0);
        assert_eq!(data.metrics.gross_loss, 0.0);
    }

    #[test]
    fn profit_factor_is_the_absolute_profit_loss_ratio() {
        let acc = account(
            1000.0,
            vec![closed_trade(1, day(1), 150.0), closed_trade(2, day(2), -50.0)],
        );
        let data = compute(&acc, day(20)).unwrap();
        assert!((data.metrics.profit_factor.unwrap() - 3.0).abs() < 1e-9);
        assert_eq!(data.metrics.winning_trades, 1);
        assert_eq!(data.metrics.losing_trades, 1);
        assert_eq!(data.metrics.win_rate, 50.0);
    }

    #[test]
    fn balance_rows_move_the_curve_but_not_the_trade_metrics() {
        let acc = account(
            1000.0,
            vec![balance_row(9, day(1), 500.0), closed_trade(1, day(2), 100.0)],
        );
        let data = compute(&acc, day(20)).unwrap();
        assert_eq!(data.metrics.total_trades, 1);
        assert_eq!(data.metrics.net_profit, 100.0);
        assert_eq!(data.metrics.current_balance, 1600.0);
        // Inception anchor + deposit + trade.
        assert_eq!(data.chart_data.len(), 3);
        assert_eq!(data.chart_data[1].balance, 1500.0);
        assert!(data.daily_summary.get("2024-03-01").is_none());
        assert_eq!(data.daily_summary.get("2024-03-02").unwrap().trades, 1);
    }

    #[test]
    fn equity_curve_starts_one_millisecond_before_the_first_operation() {
        let acc = account(1000.0, vec![closed_trade(1, day(1), 100.0)]);
        let data = compute(&acc, day(20)).unwrap();
        let anchor = &data.chart_data[0];
        assert_eq!(anchor.index, 0);
        assert!(anchor.trade.is_none());
        assert_eq!(anchor.timestamp, day(1) - Duration::milliseconds(1));
        assert_eq!(anchor.balance, 1000.0);
    }

    #[test]
    fn open_trades_produce_floating_pnl_and_an_equity_marker() {
        let acc = account(
            1000.0,
            vec![closed_trade(1, day(1), 100.0), open_trade(2, day(2), -40.0)],
        );
        let now = day(20);
        let data = compute(&acc, now).unwrap();
        assert_eq!(data.metrics.floating_pnl, -40.0);
        assert_eq!(data.metrics.equity, 1060.0);
        assert_eq!(data.metrics.open_trade_count, 1);
        let marker = data.chart_data.last().unwrap();
        assert!(marker.is_equity_marker);
        assert!(marker.trade.is_none());
        assert_eq!(marker.timestamp, now);
        assert_eq!(marker.balance, 1060.0);
    }

    #[test]
    fn only_open_trades_still_yield_an_anchored_curve() {
        let acc = account(1000.0, vec![open_trade(1, day(2), 15.0)]);
        let now = day(20);
        let data = compute(&acc, now).unwrap();
        // Inception anchor at "now" plus the equity marker.
        assert_eq!(data.chart_data.len(), 2);
        assert_eq!(data.chart_data[0].timestamp, now);
        assert!(data.chart_data[1].is_equity_marker);
        assert_eq!(data.metrics.equity, 1015.0);
    }

    #[test]
    fn start_of_day_balance_excludes_operations_from_today() {
        let acc = account(
            1000.0,
            vec![closed_trade(1, day(1), 100.0), closed_trade(2, day(2), 50.0)],
        );
        // "Now" is midday on the 2nd: only the trade from the 1st counts.
        let data = compute(&acc, day(2)).unwrap();
        assert_eq!(data.metrics.start_of_day_balance, 1100.0);
        assert_eq!(data.metrics.current_balance, 1150.0);
    }

    #[test]
    fn chart_balances_are_rounded_while_metrics_keep_full_precision() {
        let acc = account(
            1000.0,
            vec![
                closed_trade(1, day(1), 0.111),
                closed_trade(2, day(2), 0.222),
            ],
        );
        let data = compute(&acc, day(20)).unwrap();
        assert_eq!(data.chart_data[1].balance, 1000.11);
        assert_eq!(data.chart_data[2].balance, 1000.33);
        assert!((data.metrics.net_profit - 0.333).abs() < 1e-12);
    }

    #[test]
    fn streaks_track_consecutive_wins_and_losses() {
        let acc = account(
            1000.0,
            vec![
                closed_trade(1, day(1), 10.0),
                closed_trade(2, day(2), 20.0),
                closed_trade(3, day(3), 30.0),
                closed_trade(4, day(4), -5.0),
                closed_trade(5, day(5), -5.0),
                closed_trade(6, day(6), 10.0),
            ],
        );
        let data = compute(&acc, day(20)).unwrap();
        assert_eq!(data.metrics.max_consecutive_wins, 3);
        assert_eq!(data.metrics.max_consecutive_losses, 2);
        assert_eq!(data.metrics.last_trading_day, Some(day(6).date()));
    }

    #[test]
    fn recent_trades_are_newest_first_and_capped() {
        let trades: Vec<Trade> = (1..=15)
            .map(|i| closed_trade(i, day(i as u32), 10.0))
            .collect();
        let data = compute(&account(1000.0, trades), day(25)).unwrap();
        assert_eq!(data.recent_trades.len(), RECENT_TRADES_LIMIT);
        assert_eq!(data.recent_trades[0].ticket, 15);
        assert_eq!(data.closed_trades.len(), 15);
        assert_eq!(data.closed_trades[0].ticket, 15);
    }
}
