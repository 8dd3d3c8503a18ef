//! Shared fixtures for unit tests. Compiled only under `cfg(test)`.

use chrono::{DateTime, Utc};

use crate::models::{Direction, Trade};

fn base_trade(id: &str) -> Trade {
    Trade {
        id: id.to_string(),
        symbol: "EURUSD".to_string(),
        direction: Direction::Long,
        entry_price: None,
        exit_price: None,
        stop_price: None,
        quantity: 1.0,
        entry_time: None,
        exit_time: None,
        pnl: 0.0,
        commission: None,
        swap: None,
        slippage: None,
        r_multiple: None,
        strategy_id: None,
        session: None,
        session_hour: None,
        grade: None,
        mae_r: None,
        mfe_r: None,
    }
}

fn ts(s: &str) -> DateTime<Utc> {
    s.parse().unwrap()
}

/// Long trade with entry 100 / stop 99 (risk 1), so the exit price fixes the
/// R multiple exactly.
pub fn trade_with_prices(direction: Direction, entry: f64, stop: f64, exit: f64) -> Trade {
    let mut t = base_trade("t");
    t.direction = direction;
    t.entry_price = Some(entry);
    t.stop_price = Some(stop);
    t.exit_price = Some(exit);
    t.entry_time = Some(ts("2024-01-15T14:30:00Z"));
    t.exit_time = Some(ts("2024-01-15T15:00:00Z"));
    t
}

/// A trade that realized exactly `r` R, closed on Monday 2024-01-15.
pub fn trade_with_r(r: f64) -> Trade {
    trade_with_r_at(r, "2024-01-15T15:00:00Z")
}

/// Like [`trade_with_r`] with an explicit exit timestamp.
pub fn trade_with_r_at(r: f64, exit_time: &str) -> Trade {
    let mut t = trade_with_prices(Direction::Long, 100.0, 99.0, 100.0 + r);
    t.exit_time = Some(ts(exit_time));
    t.entry_time = Some(t.exit_time.unwrap() - chrono::Duration::minutes(30));
    t.pnl = r * 100.0;
    t
}

/// P&L-only trade with no price or risk data, closed at `exit_time`.
pub fn closed_trade(id: &str, pnl: f64, exit_time: &str) -> Trade {
    let mut t = base_trade(id);
    t.pnl = pnl;
    t.exit_time = Some(ts(exit_time));
    t
}
