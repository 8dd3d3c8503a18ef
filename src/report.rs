use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::AnalyticsConfig;
use crate::core::aggregate::{aggregate, KpiSnapshot};
use crate::core::distribution::{histogram_for, quartile_stats, HistogramBucket, Metric, Quartiles};
use crate::core::grouping::{group_by, GroupKey, GroupStats};
use crate::core::insights::{auto_insights, Insight};
use crate::core::streaks::{days_since_last_trade, detect_streaks, StreakReport};
use crate::error::AnalyticsError;
use crate::models::Trade;

const ALL_GROUPINGS: [GroupKey; 5] = [
    GroupKey::DayOfWeek,
    GroupKey::SessionHour,
    GroupKey::Symbol,
    GroupKey::Strategy,
    GroupKey::Grade,
];

/// Everything the journal's performance page needs, computed in one pass
/// from a trade collection. Plain value object; callers may cache it, the
/// engine never does.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalReport {
    pub as_of: DateTime<Utc>,
    pub days_since_last_trade: Option<i64>,
    pub kpis: KpiSnapshot,
    pub streaks: StreakReport,
    pub groupings: BTreeMap<String, BTreeMap<String, GroupStats>>,
    pub r_histogram: Vec<HistogramBucket>,
    pub r_quartiles: Option<Quartiles>,
    pub insights: Vec<Insight>,
}

impl JournalReport {
    pub fn build(
        trades: &[Trade],
        cfg: &AnalyticsConfig,
        as_of: DateTime<Utc>,
    ) -> Result<Self, AnalyticsError> {
        let groupings = ALL_GROUPINGS
            .iter()
            .map(|&key| (key.to_string(), group_by(trades, key, cfg)))
            .collect();

        Ok(Self {
            as_of,
            days_since_last_trade: days_since_last_trade(trades, as_of),
            kpis: aggregate(trades, cfg),
            streaks: detect_streaks(trades),
            groupings,
            r_histogram: histogram_for(trades, Metric::R, None)?,
            r_quartiles: quartile_stats(trades, Metric::R)?,
            insights: auto_insights(trades, cfg),
        })
    }

    pub fn print_summary(&self) {
        println!("\n{}", "=".repeat(70));
        println!("  JOURNAL PERFORMANCE REPORT");
        println!("{}", "=".repeat(70));
        println!("  As of:       {}", self.as_of.format("%Y-%m-%d"));
        if let Some(days) = self.days_since_last_trade {
            println!("  Last trade:  {} day(s) ago", days);
        }
        println!();
        println!("  KPIS");
        println!("  ───────────────────────────────────");
        println!("  Trades:      {}", self.kpis.n);
        println!(
            "  Win/Loss/BE: {} / {} / {}",
            self.kpis.wins, self.kpis.losses, self.kpis.breakeven
        );
        println!("  Win Rate:    {:.1}%", self.kpis.win_rate_pct);
        println!("  Net R:       {:+.2}", self.kpis.net_r);
        println!("  Expectancy:  {:+.2}R", self.kpis.expectancy_r);
        println!("  Profit Factor: {}", self.kpis.profit_factor);
        println!("  Max DD:      {:.2}R", self.kpis.max_drawdown_r);
        println!("  Sharpe-like: {:.2}", self.kpis.sharpe_like);
        println!("  Recovery:    {}", self.kpis.recovery_factor);

        println!();
        println!("  STREAKS");
        println!("  ───────────────────────────────────");
        if let Some(s) = &self.streaks.current {
            println!("  Current:     {} x {:?}", s.length, s.kind);
        }
        if let Some(s) = &self.streaks.best_win {
            println!("  Best win:    {} days ({} to {})", s.length, s.start, s.end);
        }
        if let Some(s) = &self.streaks.longest_drawdown {
            println!("  Worst loss:  {} days ({} to {})", s.length, s.start, s.end);
        }
        if let Some(days) = self.streaks.recovery_days {
            println!("  Recovery:    {} trading day(s)", days);
        }

        for (grouping, buckets) in &self.groupings {
            if buckets.is_empty() {
                continue;
            }
            println!();
            println!("  BY {}", grouping.to_uppercase());
            println!("  ───────────────────────────────────");
            for (bucket, stats) in buckets {
                println!(
                    "  {:>14}: {} trades | WR {:.0}% | exp {:+.2}R{}",
                    bucket,
                    stats.n,
                    stats.kpis.win_rate_pct,
                    stats.kpis.expectancy_r,
                    if stats.exploratory { " (exploratory)" } else { "" }
                );
            }
        }

        if !self.insights.is_empty() {
            println!();
            println!("  INSIGHTS");
            println!("  ───────────────────────────────────");
            for insight in &self.insights {
                println!("  - {}", insight.message);
            }
        }

        println!("{}", "=".repeat(70));
    }
}
