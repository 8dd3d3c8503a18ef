use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AnalyticsConfig;
use crate::core::grouping::{group_by, GroupKey};
use crate::models::Trade;

// Per-grouping gates: a partition must clear both its minimum sample size
// and its minimum expectancy magnitude before it can become an insight.
pub const MIN_SAMPLE_INSIGHT_HOUR: usize = 15;
pub const MIN_SAMPLE_INSIGHT_DAY: usize = 15;
pub const MIN_SAMPLE_INSIGHT_SYMBOL: usize = 15;
pub const MIN_SAMPLE_INSIGHT_STRATEGY: usize = 20;

pub const MIN_EFFECT_HOUR_R: f64 = 0.15;
pub const MIN_EFFECT_DAY_R: f64 = 0.10;
pub const MIN_EFFECT_SYMBOL_R: f64 = 0.15;
pub const MIN_EFFECT_STRATEGY_R: f64 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    /// Positive expectancy worth leaning into.
    Edge,
    /// Negative expectancy worth avoiding.
    Drag,
    /// Not enough history to say anything.
    InsufficientData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub grouping: GroupKey,
    pub bucket: String,
    pub expectancy_r: f64,
    pub n: usize,
    /// Confidence-weighted ranking score: `|expectancy| * n`.
    pub score: f64,
    pub message: String,
}

/// Scan hour, day-of-week, symbol, and strategy breakdowns for partitions
/// that clear both gates, rank by `|expectancy| * n`, and keep the top
/// `max_insights`. With fewer than `min_trades_for_insights` total trades a
/// single placeholder is returned and nothing is computed.
pub fn auto_insights(trades: &[Trade], cfg: &AnalyticsConfig) -> Vec<Insight> {
    if trades.len() < cfg.min_trades_for_insights {
        debug!(
            trades = trades.len(),
            floor = cfg.min_trades_for_insights,
            "insight scan skipped: not enough history"
        );
        return vec![Insight {
            kind: InsightKind::InsufficientData,
            grouping: GroupKey::Symbol,
            bucket: String::new(),
            expectancy_r: 0.0,
            n: trades.len(),
            score: 0.0,
            message: format!(
                "Not enough trades for insights yet ({} of {} needed)",
                trades.len(),
                cfg.min_trades_for_insights
            ),
        }];
    }

    let scans: [(GroupKey, usize, f64); 4] = [
        (GroupKey::SessionHour, MIN_SAMPLE_INSIGHT_HOUR, MIN_EFFECT_HOUR_R),
        (GroupKey::DayOfWeek, MIN_SAMPLE_INSIGHT_DAY, MIN_EFFECT_DAY_R),
        (GroupKey::Symbol, MIN_SAMPLE_INSIGHT_SYMBOL, MIN_EFFECT_SYMBOL_R),
        (
            GroupKey::Strategy,
            MIN_SAMPLE_INSIGHT_STRATEGY,
            MIN_EFFECT_STRATEGY_R,
        ),
    ];

    let mut candidates: Vec<Insight> = Vec::new();
    for (grouping, min_n, min_effect) in scans {
        for (bucket, stats) in group_by(trades, grouping, cfg) {
            let expectancy = stats.kpis.expectancy_r;
            if stats.n < min_n || expectancy.abs() <= min_effect {
                continue;
            }
            let kind = if expectancy > 0.0 {
                InsightKind::Edge
            } else {
                InsightKind::Drag
            };
            let message = match kind {
                InsightKind::Edge => format!(
                    "{} '{}' runs {:+.2}R expectancy over {} trades",
                    grouping, bucket, expectancy, stats.n
                ),
                _ => format!(
                    "{} '{}' bleeds {:+.2}R expectancy over {} trades",
                    grouping, bucket, expectancy, stats.n
                ),
            };
            candidates.push(Insight {
                kind,
                grouping,
                bucket,
                expectancy_r: expectancy,
                n: stats.n,
                score: expectancy.abs() * stats.n as f64,
                message,
            });
        }
    }

    // Highest confidence first; bucket name as a deterministic tie-break.
    candidates.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap()
            .then_with(|| a.bucket.cmp(&b.bucket))
    });
    candidates.truncate(cfg.max_insights);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::trade_with_r;

    fn symbol_trades(symbol: &str, rs: &[f64]) -> Vec<Trade> {
        rs.iter()
            .map(|&r| {
                let mut t = trade_with_r(r);
                t.symbol = symbol.to_string();
                t
            })
            .collect()
    }

    #[test]
    fn placeholder_below_trade_floor() {
        let trades: Vec<_> = (0..14).map(|_| trade_with_r(1.0)).collect();
        let cfg = AnalyticsConfig::default();
        let insights = auto_insights(&trades, &cfg);
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].kind, InsightKind::InsufficientData);
    }

    #[test]
    fn strong_symbol_edge_is_emitted() {
        // 20 winners on one symbol: expectancy well above the gate.
        let trades = symbol_trades("EURUSD", &[2.0; 20]);
        let cfg = AnalyticsConfig::default();
        let insights = auto_insights(&trades, &cfg);
        assert!(insights
            .iter()
            .any(|i| i.kind == InsightKind::Edge && i.bucket == "EURUSD"));
    }

    #[test]
    fn small_partitions_are_gated_out() {
        // 10 trades per symbol clears the exploratory bar but not the
        // insight gate of 15.
        let mut trades = symbol_trades("EURUSD", &[2.0; 10]);
        trades.extend(symbol_trades("GBPUSD", &[-2.0; 10]));
        let cfg = AnalyticsConfig::default();
        let insights = auto_insights(&trades, &cfg);
        assert!(!insights
            .iter()
            .any(|i| i.grouping == GroupKey::Symbol && i.bucket == "EURUSD"));
    }

    #[test]
    fn ranking_is_confidence_weighted_and_capped() {
        // Big edge, small n vs smaller edge, huge n.
        let mut trades = symbol_trades("EURUSD", &[3.0; 16]); // score 48-ish
        trades.extend(symbol_trades("GBPUSD", &[1.0; 60])); // score 60
        trades.extend(symbol_trades("USDJPY", &[-0.5; 16])); // score 8-ish
        let cfg = AnalyticsConfig::default();
        let insights = auto_insights(&trades, &cfg);
        assert_eq!(insights.len(), cfg.max_insights);
        assert!(insights[0].score >= insights[1].score);
    }

    #[test]
    fn weak_effects_are_ignored() {
        // Half +1R, half -0.85R: expectancy 0.075, below every threshold.
        let mut rs = vec![1.0; 15];
        rs.extend(vec![-0.85; 15]);
        let trades = symbol_trades("EURUSD", &rs);
        let cfg = AnalyticsConfig::default();
        let insights = auto_insights(&trades, &cfg);
        assert!(insights.is_empty());
    }
}
