use chrono::{DateTime, Duration, Utc};
use journal_analytics::models::{Direction, Trade};

/// Closed long trade with entry 100 / stop 99, so `r` is both the realized
/// R multiple and (x100) the realized P&L.
pub fn make_trade(id: &str, symbol: &str, strategy: &str, r: f64, exit: DateTime<Utc>) -> Trade {
    Trade {
        id: id.to_string(),
        symbol: symbol.to_string(),
        direction: Direction::Long,
        entry_price: Some(100.0),
        exit_price: Some(100.0 + r),
        stop_price: Some(99.0),
        quantity: 1.0,
        entry_time: Some(exit - Duration::minutes(45)),
        exit_time: Some(exit),
        pnl: r * 100.0,
        commission: None,
        swap: None,
        slippage: None,
        r_multiple: None,
        strategy_id: Some(strategy.to_string()),
        session: None,
        session_hour: None,
        grade: None,
        mae_r: None,
        mfe_r: None,
    }
}

/// Eight weeks of journal history, one trade per weekday, starting Monday
/// 2024-01-01. Weekly R pattern [+2.0, -1.0, +1.5, -1.0, +0.5]; the first
/// three trades of each week are EURUSD breakouts, the last two GBPUSD
/// fades. 40 trades total, 24 EURUSD / 16 GBPUSD, net +16R.
pub fn make_journal() -> Vec<Trade> {
    let monday: DateTime<Utc> = "2024-01-01T15:00:00Z".parse().unwrap();
    let weekly_rs = [2.0, -1.0, 1.5, -1.0, 0.5];

    let mut trades = Vec::new();
    for week in 0..8 {
        for (day, &r) in weekly_rs.iter().enumerate() {
            let exit = monday + Duration::days(week * 7 + day as i64);
            let (symbol, strategy) = if day < 3 {
                ("EURUSD", "breakout")
            } else {
                ("GBPUSD", "fade")
            };
            let id = format!("w{}d{}", week, day);
            trades.push(make_trade(&id, symbol, strategy, r, exit));
        }
    }
    trades
}
