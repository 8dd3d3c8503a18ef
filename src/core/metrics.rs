use crate::error::AnalyticsError;
use crate::models::Trade;

/// R multiple derived from entry/stop/exit prices:
/// `((exit - entry) / |entry - stop|) * direction`.
///
/// `None` when any of the three prices is missing or the stop sits exactly
/// on the entry (zero risk, R undefined).
pub fn r_multiple(trade: &Trade) -> Option<f64> {
    let entry = trade.entry_price?;
    let exit = trade.exit_price?;
    let stop = trade.stop_price?;

    let risk = (entry - stop).abs();
    if risk == 0.0 {
        return None;
    }

    Some((exit - entry) / risk * trade.direction.sign())
}

/// The R value the rest of the engine works with: an importer-supplied
/// `r_multiple` wins over the price-derived one.
pub fn effective_r(trade: &Trade) -> Option<f64> {
    trade.r_multiple.or_else(|| r_multiple(trade))
}

pub fn total_fees(trade: &Trade) -> f64 {
    trade.commission.unwrap_or(0.0) + trade.swap.unwrap_or(0.0) + trade.slippage.unwrap_or(0.0)
}

pub fn net_pnl(trade: &Trade) -> f64 {
    trade.pnl - total_fees(trade)
}

/// Whole minutes between entry and exit, floored. `Ok(None)` when either
/// timestamp is missing. A negative duration means the upstream data is
/// corrupt and is surfaced as an error, never clamped to zero.
pub fn hold_minutes(trade: &Trade) -> Result<Option<i64>, AnalyticsError> {
    let (entry, exit) = match (trade.entry_time, trade.exit_time) {
        (Some(entry), Some(exit)) => (entry, exit),
        _ => return Ok(None),
    };

    let seconds = (exit - entry).num_seconds();
    if seconds < 0 {
        return Err(AnalyticsError::NegativeHoldTime {
            trade_id: trade.id.clone(),
            entry,
            exit,
        });
    }

    Ok(Some(seconds / 60))
}
