use serde::{Deserialize, Serialize};

use crate::config::{AnalyticsConfig, WinLossBasis};
use crate::core::metrics::{effective_r, net_pnl};
use crate::models::{Ratio, Trade};

/// How a single trade resolved under the configured win/loss basis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeResult {
    Win,
    Loss,
    Breakeven,
}

/// Rollup KPIs over one trade set. All ratios with an empty denominator are
/// zero or `Ratio::Undefined`; an empty input yields the all-zero snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiSnapshot {
    pub win_rate_pct: f64,
    pub profit_factor: Ratio,
    pub expectancy_r: f64,
    pub net_r: f64,
    pub max_drawdown_r: f64,
    /// Mean R of winning trades.
    pub avg_win_r: f64,
    /// Mean R of losing trades, kept signed (negative).
    pub avg_loss_r: f64,
    pub sharpe_like: f64,
    pub recovery_factor: Ratio,
    pub wins: usize,
    pub losses: usize,
    pub breakeven: usize,
    pub n: usize,
}

impl Default for KpiSnapshot {
    fn default() -> Self {
        Self {
            win_rate_pct: 0.0,
            profit_factor: Ratio::Undefined,
            expectancy_r: 0.0,
            net_r: 0.0,
            max_drawdown_r: 0.0,
            avg_win_r: 0.0,
            avg_loss_r: 0.0,
            sharpe_like: 0.0,
            recovery_factor: Ratio::Undefined,
            wins: 0,
            losses: 0,
            breakeven: 0,
            n: 0,
        }
    }
}

/// Classify one trade. `None` when the R basis is selected and the trade has
/// no valid R; such trades drop out of result classification entirely.
pub fn classify(trade: &Trade, cfg: &AnalyticsConfig) -> Option<TradeResult> {
    match cfg.basis {
        WinLossBasis::RBand => {
            let r = effective_r(trade)?;
            Some(if r > cfg.breakeven_band_r {
                TradeResult::Win
            } else if r < -cfg.breakeven_band_r {
                TradeResult::Loss
            } else {
                TradeResult::Breakeven
            })
        }
        WinLossBasis::PnlSign => {
            let pnl = net_pnl(trade);
            Some(if pnl > 0.0 {
                TradeResult::Win
            } else if pnl < 0.0 {
                TradeResult::Loss
            } else {
                TradeResult::Breakeven
            })
        }
    }
}

pub fn aggregate(trades: &[Trade], cfg: &AnalyticsConfig) -> KpiSnapshot {
    let mut snapshot = KpiSnapshot {
        n: trades.len(),
        ..KpiSnapshot::default()
    };
    if trades.is_empty() {
        return snapshot;
    }

    let mut win_rs: Vec<f64> = Vec::new();
    let mut loss_rs: Vec<f64> = Vec::new();
    let mut classified = 0usize;

    for trade in trades {
        match classify(trade, cfg) {
            Some(TradeResult::Win) => {
                snapshot.wins += 1;
                if let Some(r) = effective_r(trade) {
                    win_rs.push(r);
                }
            }
            Some(TradeResult::Loss) => {
                snapshot.losses += 1;
                if let Some(r) = effective_r(trade) {
                    loss_rs.push(r);
                }
            }
            Some(TradeResult::Breakeven) => snapshot.breakeven += 1,
            None => continue,
        }
        classified += 1;
    }

    if classified > 0 {
        snapshot.win_rate_pct = snapshot.wins as f64 / classified as f64 * 100.0;
    }

    // Profit factor and expectancy sums include breakeven trades' R.
    let rs: Vec<f64> = trades.iter().filter_map(effective_r).collect();
    let positive_sum: f64 = rs.iter().filter(|r| **r > 0.0).sum();
    let negative_sum: f64 = rs.iter().filter(|r| **r < 0.0).sum();
    snapshot.profit_factor = Ratio::of(positive_sum, negative_sum.abs());
    snapshot.net_r = rs.iter().sum();

    if !win_rs.is_empty() {
        snapshot.avg_win_r = win_rs.iter().sum::<f64>() / win_rs.len() as f64;
    }
    if !loss_rs.is_empty() {
        snapshot.avg_loss_r = loss_rs.iter().sum::<f64>() / loss_rs.len() as f64;
    }

    // avg_loss_r is stored signed but enters the formula as a magnitude.
    let p = snapshot.win_rate_pct / 100.0;
    snapshot.expectancy_r = p * snapshot.avg_win_r - (1.0 - p) * snapshot.avg_loss_r.abs();

    snapshot.max_drawdown_r = max_drawdown_r(trades);
    snapshot.sharpe_like = sharpe_like(&rs);
    snapshot.recovery_factor = Ratio::of(snapshot.net_r, snapshot.max_drawdown_r);

    snapshot
}

/// Peak-to-trough decline of cumulative R, walking trades in chronological
/// journal order.
fn max_drawdown_r(trades: &[Trade]) -> f64 {
    let mut ordered: Vec<&Trade> = trades.iter().collect();
    ordered.sort_by_key(|t| t.journal_time());

    let mut running = 0.0;
    let mut peak = 0.0;
    let mut max_dd = 0.0_f64;
    for trade in ordered {
        let Some(r) = effective_r(trade) else { continue };
        running += r;
        if running > peak {
            peak = running;
        }
        max_dd = max_dd.max(peak - running);
    }
    max_dd
}

/// `mean(R) / population_stddev(R)`; 0 when the spread is 0.
fn sharpe_like(rs: &[f64]) -> f64 {
    if rs.is_empty() {
        return 0.0;
    }
    let n = rs.len() as f64;
    let mean = rs.iter().sum::<f64>() / n;
    let variance = rs.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
    let std_dev = variance.sqrt();
    if std_dev == 0.0 {
        return 0.0;
    }
    mean / std_dev
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{trade_with_r, trade_with_r_at};

    #[test]
    fn empty_input_is_all_zeros() {
        let cfg = AnalyticsConfig::default();
        let snap = aggregate(&[], &cfg);
        assert_eq!(snap.win_rate_pct, 0.0);
        assert_eq!(snap.profit_factor, Ratio::Undefined);
        assert_eq!(snap.expectancy_r, 0.0);
        assert_eq!(snap.net_r, 0.0);
        assert_eq!(snap.n, 0);
        assert_eq!(snap.profit_factor.value_or_zero(), 0.0);
    }

    #[test]
    fn known_sequence() {
        // R values [2, -1, 3, -1, 1]: 3 wins, 2 losses
        let trades: Vec<_> = [2.0, -1.0, 3.0, -1.0, 1.0]
            .iter()
            .map(|&r| trade_with_r(r))
            .collect();
        let cfg = AnalyticsConfig::default();
        let snap = aggregate(&trades, &cfg);

        assert_eq!(snap.wins, 3);
        assert_eq!(snap.losses, 2);
        assert!((snap.win_rate_pct - 60.0).abs() < 1e-9);
        assert!((snap.net_r - 4.0).abs() < 1e-9);
        assert_eq!(snap.profit_factor, Ratio::Finite(3.0));
    }

    #[test]
    fn breakeven_band_excludes_from_counts_but_not_sums() {
        let trades: Vec<_> = [2.0, -1.0, 0.05, -0.05]
            .iter()
            .map(|&r| trade_with_r(r))
            .collect();
        let cfg = AnalyticsConfig::default();
        let snap = aggregate(&trades, &cfg);

        assert_eq!(snap.wins, 1);
        assert_eq!(snap.losses, 1);
        assert_eq!(snap.breakeven, 2);
        // denominator counts all four classified trades
        assert!((snap.win_rate_pct - 25.0).abs() < 1e-9);
        // profit factor still sees the small R values
        match snap.profit_factor {
            Ratio::Finite(pf) => assert!((pf - (2.0 + 0.05) / 1.05).abs() < 1e-9),
            other => panic!("expected finite profit factor, got {:?}", other),
        }
    }

    #[test]
    fn no_losses_is_positive_infinite() {
        let trades: Vec<_> = [1.0, 2.0].iter().map(|&r| trade_with_r(r)).collect();
        let cfg = AnalyticsConfig::default();
        let snap = aggregate(&trades, &cfg);
        assert_eq!(snap.profit_factor, Ratio::PositiveInfinite);
    }

    #[test]
    fn expectancy_uses_loss_magnitude() {
        let trades: Vec<_> = [2.0, 2.0, -1.0].iter().map(|&r| trade_with_r(r)).collect();
        let cfg = AnalyticsConfig::default();
        let snap = aggregate(&trades, &cfg);

        assert!(snap.avg_loss_r < 0.0);
        // p = 2/3, expectancy = 2/3*2 - 1/3*1 = 1.0
        assert!((snap.expectancy_r - 1.0).abs() < 1e-9);
    }

    #[test]
    fn drawdown_walks_chronologically() {
        // Chronological Rs: +2, -1, -2, +1 => peak 2, trough -1, dd 3
        let trades = vec![
            trade_with_r_at(2.0, "2024-01-15T10:00:00Z"),
            trade_with_r_at(-1.0, "2024-01-16T10:00:00Z"),
            trade_with_r_at(-2.0, "2024-01-17T10:00:00Z"),
            trade_with_r_at(1.0, "2024-01-18T10:00:00Z"),
        ];
        let cfg = AnalyticsConfig::default();
        let snap = aggregate(&trades, &cfg);
        assert!((snap.max_drawdown_r - 3.0).abs() < 1e-9);
    }

    #[test]
    fn sharpe_like_zero_spread() {
        let trades: Vec<_> = [1.0, 1.0, 1.0].iter().map(|&r| trade_with_r(r)).collect();
        let cfg = AnalyticsConfig::default();
        let snap = aggregate(&trades, &cfg);
        assert_eq!(snap.sharpe_like, 0.0);
    }

    #[test]
    fn pnl_basis_classifies_without_r() {
        use crate::test_helpers::closed_trade;

        let trades = vec![
            closed_trade("a", 150.0, "2024-01-15T10:00:00Z"),
            closed_trade("b", -75.0, "2024-01-15T11:00:00Z"),
            closed_trade("c", 0.0, "2024-01-15T12:00:00Z"),
        ];
        let cfg = AnalyticsConfig {
            basis: WinLossBasis::PnlSign,
            ..AnalyticsConfig::default()
        };
        let snap = aggregate(&trades, &cfg);
        assert_eq!(snap.wins, 1);
        assert_eq!(snap.losses, 1);
        assert_eq!(snap.breakeven, 1);
        // no R data anywhere: R-denominated KPIs stay at their zero state
        assert_eq!(snap.net_r, 0.0);
        assert_eq!(snap.profit_factor, Ratio::Undefined);
    }

    #[test]
    fn trades_without_r_drop_out_under_r_basis() {
        let mut no_r = trade_with_r(5.0);
        no_r.entry_price = None;
        no_r.r_multiple = None;
        let trades = vec![trade_with_r(1.0), no_r];
        let cfg = AnalyticsConfig::default();
        let snap = aggregate(&trades, &cfg);
        assert_eq!(snap.wins, 1);
        assert!((snap.win_rate_pct - 100.0).abs() < 1e-9);
        assert_eq!(snap.n, 2);
    }
}
