use chrono::Timelike;
use chrono_tz::US::Eastern;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::config::AnalyticsConfig;
use crate::core::aggregate::{aggregate, KpiSnapshot};
use crate::models::{Session, Trade};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKey {
    DayOfWeek,
    SessionHour,
    Symbol,
    Strategy,
    Grade,
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::DayOfWeek => write!(f, "day_of_week"),
            GroupKey::SessionHour => write!(f, "session_hour"),
            GroupKey::Symbol => write!(f, "symbol"),
            GroupKey::Strategy => write!(f, "strategy"),
            GroupKey::Grade => write!(f, "grade"),
        }
    }
}

/// KPIs for one partition plus its sample size. `exploratory` marks
/// partitions too small to act on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupStats {
    pub kpis: KpiSnapshot,
    pub n: usize,
    pub exploratory: bool,
}

/// Partition trades by `key` and aggregate each partition. Partitions with
/// fewer than `min_sample_exploratory` trades are flagged, not dropped;
/// the insight layer applies its own stricter gates.
pub fn group_by(
    trades: &[Trade],
    key: GroupKey,
    cfg: &AnalyticsConfig,
) -> BTreeMap<String, GroupStats> {
    let mut partitions: BTreeMap<String, Vec<Trade>> = BTreeMap::new();
    for trade in trades {
        partitions
            .entry(extract_key(trade, key))
            .or_default()
            .push(trade.clone());
    }

    partitions
        .into_iter()
        .map(|(bucket, members)| {
            let n = members.len();
            let stats = GroupStats {
                kpis: aggregate(&members, cfg),
                n,
                exploratory: n < cfg.min_sample_exploratory,
            };
            (bucket, stats)
        })
        .collect()
}

/// Bucket key for one trade. Trades missing the dimension land in a named
/// sentinel bucket instead of being dropped.
fn extract_key(trade: &Trade, key: GroupKey) -> String {
    match key {
        GroupKey::DayOfWeek => trade
            .day_of_week()
            .unwrap_or_else(|| "unknown".to_string()),
        GroupKey::SessionHour => session_hour_key(trade),
        GroupKey::Symbol => trade.symbol.clone(),
        GroupKey::Strategy => trade
            .strategy_id
            .clone()
            .unwrap_or_else(|| "none".to_string()),
        GroupKey::Grade => trade.grade.clone().unwrap_or_else(|| "ungraded".to_string()),
    }
}

fn session_hour_key(trade: &Trade) -> String {
    let session = trade
        .session
        .or_else(|| trade.entry_time.and_then(Session::from_timestamp));
    let hour = trade
        .session_hour
        .or_else(|| trade.entry_time.map(|t| t.with_timezone(&Eastern).hour()));

    match (session, hour) {
        (Some(session), Some(hour)) => format!("{}_{:02}", session, hour),
        _ => "unknown".to_string(),
    }
}
