use chrono::NaiveDateTime;
use log::debug;

use super::statements_errors::StatementError;
use crate::constants::{
    BALANCE_CLOSE_PRICE, BALANCE_SYMBOL, DEPOSIT_COMMENT, WITHDRAWAL_COMMENT,
};
use crate::trades::{epoch_sentinel, CloseState, Trade, TradeType};

/// Column indices resolved from the header line. Ticket, open time, type and
/// profit are mandatory; everything else degrades to defaults when absent.
struct ColumnMap {
    ticket: usize,
    open_time: usize,
    trade_type: usize,
    profit: usize,
    size: Option<usize>,
    symbol: Option<usize>,
    open_price: Option<usize>,
    close_time: Option<usize>,
    close_price: Option<usize>,
    commission: Option<usize>,
    swap: Option<usize>,
    comment: Option<usize>,
}

impl ColumnMap {
    fn from_header(cells: &[String]) -> Result<Self, StatementError> {
        let mut ticket = None;
        let mut open_time = None;
        let mut trade_type = None;
        let mut profit = None;
        let mut size = None;
        let mut symbol = None;
        let mut open_price = None;
        let mut close_time = None;
        let mut close_price = None;
        let mut commission = None;
        let mut swap = None;
        let mut comment = None;

        for (index, cell) in cells.iter().enumerate() {
            match clean_cell(cell).to_lowercase().as_str() {
                "order" | "ticket" => ticket = Some(index),
                "open time" => open_time = Some(index),
                "type" => trade_type = Some(index),
                "volume" | "size" => size = Some(index),
                "symbol" => symbol = Some(index),
                "open price" => open_price = Some(index),
                "close time" => close_time = Some(index),
                "close price" => close_price = Some(index),
                "commission" => commission = Some(index),
                "swap" => swap = Some(index),
                "profit" => profit = Some(index),
                "comment" => comment = Some(index),
                other => debug!("statement: ignoring unrecognized column '{}'", other),
            }
        }

        let mut missing = Vec::new();
        if ticket.is_none() {
            missing.push("order");
        }
        if open_time.is_none() {
            missing.push("open time");
        }
        if trade_type.is_none() {
            missing.push("type");
        }
        if profit.is_none() {
            missing.push("profit");
        }
        if !missing.is_empty() {
            return Err(StatementError::MissingColumns(missing.join(", ")));
        }

        Ok(ColumnMap {
            ticket: ticket.unwrap_or_default(),
            open_time: open_time.unwrap_or_default(),
            trade_type: trade_type.unwrap_or_default(),
            profit: profit.unwrap_or_default(),
            size,
            symbol,
            open_price,
            close_time,
            close_price,
            commission,
            swap,
            comment,
        })
    }
}

/// Parses a raw exported trade-history payload into canonical trades.
///
/// The delimiter is auto-detected from the header line (tab wins over
/// comma). Malformed rows are dropped; only a too-short file or missing
/// mandatory columns are fatal.
pub fn parse_statement(raw: &str) -> Result<Vec<Trade>, StatementError> {
    let lines: Vec<&str> = raw.lines().filter(|l| !l.trim().is_empty()).collect();
    if lines.len() < 2 {
        return Err(StatementError::NotEnoughLines);
    }

    let delimiter = if lines[0].contains('\t') { '\t' } else { ',' };
    let header = split_line(lines[0], delimiter);
    let columns = ColumnMap::from_header(&header)?;

    let mut trades = Vec::new();
    for line in &lines[1..] {
        let cells = split_line(line, delimiter);
        match parse_row(&cells, &columns) {
            Some(trade) => trades.push(trade),
            None => debug!("statement: dropping malformed row '{}'", line),
        }
    }
    Ok(trades)
}

fn parse_row(cells: &[String], columns: &ColumnMap) -> Option<Trade> {
    let cell = |index: Option<usize>| -> &str {
        index
            .and_then(|i| cells.get(i))
            .map(|c| c.as_str())
            .unwrap_or("")
    };

    let trade_type = TradeType::parse(&clean_cell(cell(Some(columns.trade_type))))?;
    let open_time = parse_timestamp(cell(Some(columns.open_time)))?;

    let profit = match parse_number(cell(Some(columns.profit))) {
        Some(value) => value,
        // Profit is the one numeric field a row cannot live without, except
        // on balance rows where a missing amount degrades to zero.
        None if trade_type.is_balance() => 0.0,
        None => return None,
    };

    let size = parse_number(cell(columns.size)).unwrap_or(0.0);
    let open_price = parse_number(cell(columns.open_price)).unwrap_or(0.0);
    let commission = parse_number(cell(columns.commission)).unwrap_or(0.0);
    let swap = parse_number(cell(columns.swap)).unwrap_or(0.0);
    let comment = clean_cell(cell(columns.comment));

    if trade_type.is_balance() {
        // Balance rows fall back to the open-time epoch milliseconds when the
        // ticket is unparsable, and are always treated as closed.
        let ticket = parse_ticket(cell(Some(columns.ticket)))
            .unwrap_or_else(|| open_time.and_utc().timestamp_millis());
        let comment = if comment.is_empty() {
            if profit < 0.0 {
                WITHDRAWAL_COMMENT.to_string()
            } else {
                DEPOSIT_COMMENT.to_string()
            }
        } else {
            comment
        };
        return Some(Trade {
            ticket,
            open_time,
            close_time: open_time,
            trade_type,
            size,
            symbol: BALANCE_SYMBOL.to_string(),
            open_price,
            close_state: CloseState::Closed(BALANCE_CLOSE_PRICE),
            commission,
            swap,
            profit,
            comment,
        });
    }

    let ticket = parse_ticket(cell(Some(columns.ticket)))?;
    let close_price = parse_number(cell(columns.close_price)).unwrap_or(0.0);
    let close_time = parse_timestamp(cell(columns.close_time));

    // A close price of exactly 0 is the open-position sentinel.
    let (close_state, close_time) = if close_price == 0.0 {
        (CloseState::Open, close_time.unwrap_or_else(epoch_sentinel))
    } else {
        // Closed trades must carry a valid close time.
        (CloseState::Closed(close_price), close_time?)
    };

    Some(Trade {
        ticket,
        open_time,
        close_time,
        trade_type,
        size,
        symbol: clean_cell(cell(columns.symbol)),
        open_price,
        close_state,
        commission,
        swap,
        profit,
        comment,
    })
}

/// Splits a line on the delimiter. Comma-separated files honor double-quoted
/// fields (a quoted field may contain the delimiter); tab-separated files
/// split on the raw delimiter.
fn split_line(line: &str, delimiter: char) -> Vec<String> {
    if delimiter == '\t' {
        return line.split('\t').map(str::to_string).collect();
    }

    let mut cells = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    for ch in line.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                current.push(ch);
            }
            c if c == delimiter && !in_quotes => {
                cells.push(std::mem::take(&mut current));
            }
            c => current.push(c),
        }
    }
    cells.push(current);
    cells
}

fn clean_cell(cell: &str) -> String {
    cell.trim().trim_matches('"').trim().to_string()
}

/// Locale-tolerant number parsing: a comma is accepted as the decimal
/// separator.
fn parse_number(cell: &str) -> Option<f64> {
    let cleaned = clean_cell(cell).replace(',', ".");
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok()
}

fn parse_ticket(cell: &str) -> Option<i64> {
    clean_cell(cell).parse::<i64>().ok()
}

/// Dates arrive as `YYYY.MM.DD HH:MM:SS` (seconds optional). The epoch
/// sentinel and empty cells both mean "missing".
fn parse_timestamp(cell: &str) -> Option<NaiveDateTime> {
    let cleaned = clean_cell(cell).replace('.', "-");
    if cleaned.is_empty() {
        return None;
    }
    let parsed = NaiveDateTime::parse_from_str(&cleaned, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(&cleaned, "%Y-%m-%d %H:%M"))
        .ok()?;
    if parsed == epoch_sentinel() {
        return None;
    }
    Some(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV_HEADER: &str = "Order,Open Time,Type,Size,Symbol,Open Price,Close Time,Close Price,Commission,Swap,Profit,Comment";

    fn statement(rows: &[&str]) -> String {
        let mut out = String::from(CSV_HEADER);
        for row in rows {
            out.push('\n');
            out.push_str(row);
        }
        out
    }

    #[test]
    fn parses_a_closed_trade_from_comma_separated_text() {
        let raw = statement(&[
            "1001,2024.01.05 10:30:00,buy,0.10,EURUSD,1.0950,2024.01.05 15:45:00,1.1000,-0.70,-0.10,50.00,scalp",
        ]);
        let trades = parse_statement(&raw).unwrap();
        assert_eq!(trades.len(), 1);
        let trade = &trades[0];
        assert_eq!(trade.ticket, 1001);
        assert_eq!(trade.trade_type, TradeType::Buy);
        assert_eq!(trade.symbol, "EURUSD");
        assert_eq!(trade.close_state, CloseState::Closed(1.10));
        assert_eq!(trade.profit, 50.0);
        assert_eq!(trade.comment, "scalp");
    }

    #[test]
    fn detects_tab_delimiter_from_header() {
        let raw = "Ticket\tOpen Time\tType\tProfit\n\
                   42\t2024.02.01 09:00:00\tsell\t-12,5";
        let trades = parse_statement(raw).unwrap();
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].ticket, 42);
        // Comma decimal separator, and no close-price column means open.
        assert_eq!(trades[0].profit, -12.5);
        assert!(trades[0].is_open());
    }

    #[test]
    fn quoted_field_may_contain_the_delimiter() {
        let raw = statement(&[
            "1002,2024.01.05 10:30:00,buy,0.10,EURUSD,1.0950,2024.01.05 15:45:00,1.1000,0,0,\"1,5\",\"hedge, leg 2\"",
        ]);
        let trades = parse_statement(&raw).unwrap();
        assert_eq!(trades[0].profit, 1.5);
        assert_eq!(trades[0].comment, "hedge, leg 2");
    }

    #[test]
    fn open_trade_keeps_zero_close_price_sentinel_and_tolerates_missing_close_time() {
        let raw = statement(&[
            "1003,2024.01.08 11:00:00,sell,0.20,GBPUSD,1.2700,,0,0,0,-3.20,",
        ]);
        let trades = parse_statement(&raw).unwrap();
        assert_eq!(trades.len(), 1);
        assert!(trades[0].is_open());
        assert_eq!(trades[0].close_price(), 0.0);
        assert_eq!(trades[0].close_time, epoch_sentinel());
    }

    #[test]
    fn balance_rows_default_comment_from_profit_sign() {
        let raw = statement(&[
            "2001,2024.01.02 00:00:00,balance,0,,0,,0,0,0,500.00,",
            "2002,2024.01.09 00:00:00,balance,0,,0,,0,0,0,-200.00,",
        ]);
        let trades = parse_statement(&raw).unwrap();
        assert_eq!(trades[0].comment, "Deposit");
        assert_eq!(trades[1].comment, "Withdrawal");
        assert_eq!(trades[0].symbol, BALANCE_SYMBOL);
        assert!(trades[0].is_closed());
        assert_eq!(trades[0].close_time, trades[0].open_time);
    }

    #[test]
    fn balance_row_ticket_falls_back_to_open_time_millis() {
        let raw = statement(&[
            "n/a,2024.01.02 00:00:00,balance,0,,0,,0,0,0,500.00,",
        ]);
        let trades = parse_statement(&raw).unwrap();
        let expected = trades[0].open_time.and_utc().timestamp_millis();
        assert_eq!(trades[0].ticket, expected);
    }

    #[test]
    fn drops_rows_with_unparsable_ticket_profit_or_open_time() {
        let raw = statement(&[
            "abc,2024.01.05 10:30:00,buy,0.1,EURUSD,1.1,2024.01.05 11:00:00,1.2,0,0,10,",
            "1005,not a date,buy,0.1,EURUSD,1.1,2024.01.05 11:00:00,1.2,0,0,10,",
            "1006,2024.01.05 10:30:00,buy,0.1,EURUSD,1.1,2024.01.05 11:00:00,1.2,0,0,oops,",
            "1007,2024.01.05 10:30:00,buy,0.1,EURUSD,1.1,,1.2,0,0,10,",
            "1008,2024.01.05 10:30:00,buy,0.1,EURUSD,1.1,2024.01.05 11:00:00,1.2,0,0,10,",
        ]);
        let trades = parse_statement(&raw).unwrap();
        // Only the last row survives: unparsable ticket, open time and profit
        // all drop a row, and a closed trade without a close time is invalid.
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].ticket, 1008);
    }

    #[test]
    fn unknown_trade_types_are_skipped() {
        let raw = statement(&[
            "1009,2024.01.05 10:30:00,credit,0,,0,2024.01.05 10:30:00,1,0,0,100,",
        ]);
        let trades = parse_statement(&raw).unwrap();
        assert!(trades.is_empty());
    }

    #[test]
    fn header_only_file_is_a_fatal_error() {
        assert!(matches!(
            parse_statement(CSV_HEADER),
            Err(StatementError::NotEnoughLines)
        ));
    }

    #[test]
    fn missing_mandatory_columns_is_a_fatal_error() {
        let raw = "Symbol,Size\nEURUSD,0.1";
        match parse_statement(raw) {
            Err(StatementError::MissingColumns(cols)) => {
                assert!(cols.contains("order"));
                assert!(cols.contains("open time"));
                assert!(cols.contains("type"));
                assert!(cols.contains("profit"));
            }
            other => panic!("expected missing-columns error, got {:?}", other),
        }
    }

    #[test]
    fn parsing_is_idempotent_over_identical_bytes() {
        let raw = statement(&[
            "1001,2024.01.05 10:30:00,buy,0.10,EURUSD,1.0950,2024.01.05 15:45:00,1.1000,-0.70,-0.10,50.00,",
            "2001,2024.01.02 00:00:00,balance,0,,0,,0,0,0,500.00,",
        ]);
        let first = parse_statement(&raw).unwrap();
        let second = parse_statement(&raw).unwrap();
        assert_eq!(first, second);
    }
}
