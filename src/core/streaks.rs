use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::metrics::{effective_r, net_pnl};
use crate::models::Trade;

/// One calendar day of journal activity. Rebuilt from the trade set on every
/// call; the engine never persists these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyAggregate {
    pub date: NaiveDate,
    pub total_pnl: f64,
    pub total_r: f64,
    pub trades: usize,
    pub wins: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreakKind {
    Win,
    Loss,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Streak {
    pub kind: StreakKind,
    /// Length in trading days (days with at least one trade).
    pub length: usize,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreakReport {
    /// Streak running up to the most recent trading day; `None` when that
    /// day was flat.
    pub current: Option<Streak>,
    pub best_win: Option<Streak>,
    pub longest_drawdown: Option<Streak>,
    /// Trading days from trough to recovery of the most recently completed
    /// peak/trough cycle.
    pub recovery_days: Option<usize>,
}

/// Roll trades up by calendar date of `exit_time ?? entry_time`, ascending.
/// Trades with neither timestamp cannot be placed on a day and are skipped.
pub fn daily_aggregates(trades: &[Trade]) -> Vec<DailyAggregate> {
    let mut days: BTreeMap<NaiveDate, DailyAggregate> = BTreeMap::new();

    for trade in trades {
        let Some(date) = trade.journal_date() else { continue };
        let day = days.entry(date).or_insert_with(|| DailyAggregate {
            date,
            total_pnl: 0.0,
            total_r: 0.0,
            trades: 0,
            wins: 0,
        });
        let pnl = net_pnl(trade);
        day.total_pnl += pnl;
        day.total_r += effective_r(trade).unwrap_or(0.0);
        day.trades += 1;
        if pnl > 0.0 {
            day.wins += 1;
        }
    }

    days.into_values().collect()
}

pub fn detect_streaks(trades: &[Trade]) -> StreakReport {
    let daily = daily_aggregates(trades);
    if daily.is_empty() {
        return StreakReport::default();
    }

    let mut report = StreakReport {
        current: current_streak(&daily),
        ..StreakReport::default()
    };

    // Single forward pass for best win run, longest loss run, and recovery.
    let mut run_sign = 0i8;
    let mut run_len = 0usize;
    let mut run_start = 0usize;

    let mut cumulative = 0.0;
    let mut peak = 0.0;
    let mut trough_idx: Option<usize> = None;
    let mut trough = 0.0;

    for (i, day) in daily.iter().enumerate() {
        let sign = pnl_sign(day.total_pnl);
        if sign == 0 {
            // A flat day breaks any streak.
            run_sign = 0;
            run_len = 0;
        } else {
            if sign == run_sign {
                run_len += 1;
            } else {
                run_sign = sign;
                run_len = 1;
                run_start = i;
            }
            let candidate = Streak {
                kind: if sign > 0 { StreakKind::Win } else { StreakKind::Loss },
                length: run_len,
                start: daily[run_start].date,
                end: day.date,
            };
            if sign > 0 {
                if report.best_win.map_or(true, |b| candidate.length > b.length) {
                    report.best_win = Some(candidate);
                }
            } else if report
                .longest_drawdown
                .map_or(true, |b| candidate.length > b.length)
            {
                report.longest_drawdown = Some(candidate);
            }
        }

        cumulative += day.total_pnl;
        if cumulative >= peak {
            // Back at (or above) the pre-trough peak: the cycle is complete.
            // A later cycle overwrites this; only the most recent is kept.
            if let Some(ti) = trough_idx {
                report.recovery_days = Some(i - ti);
                trough_idx = None;
            }
            peak = cumulative;
            trough = cumulative;
        } else if trough_idx.is_none() || cumulative < trough {
            trough = cumulative;
            trough_idx = Some(i);
        }
    }

    report
}

/// Days elapsed between the last journaled trade and `as_of`. The caller
/// supplies the clock; the engine never reads one.
pub fn days_since_last_trade(trades: &[Trade], as_of: DateTime<Utc>) -> Option<i64> {
    let last = trades.iter().filter_map(|t| t.journal_date()).max()?;
    Some((as_of.date_naive() - last).num_days())
}

fn current_streak(daily: &[DailyAggregate]) -> Option<Streak> {
    let last = daily.last()?;
    let sign = pnl_sign(last.total_pnl);
    if sign == 0 {
        return None;
    }

    let mut start = daily.len() - 1;
    for i in (0..daily.len() - 1).rev() {
        if pnl_sign(daily[i].total_pnl) == sign {
            start = i;
        } else {
            break;
        }
    }

    Some(Streak {
        kind: if sign > 0 { StreakKind::Win } else { StreakKind::Loss },
        length: daily.len() - start,
        start: daily[start].date,
        end: last.date,
    })
}

fn pnl_sign(pnl: f64) -> i8 {
    if pnl > 0.0 {
        1
    } else if pnl < 0.0 {
        -1
    } else {
        0
    }
}
