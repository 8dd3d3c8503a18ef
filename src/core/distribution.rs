use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AnalyticsConfig;
use crate::core::metrics::{effective_r, hold_minutes};
use crate::error::AnalyticsError;
use crate::models::Trade;

/// Which per-trade value a distribution is computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    R,
    Mae,
    Mfe,
    Hold,
}

impl Metric {
    /// Default (domain, bin width) per metric. R spans [-5, 5] in half-R
    /// steps; excursions a quarter-R; hold time a day in hourly bins.
    pub fn default_domain(&self) -> ((f64, f64), f64) {
        match self {
            Metric::R => ((-5.0, 5.0), 0.5),
            Metric::Mae => ((-5.0, 0.0), 0.25),
            Metric::Mfe => ((0.0, 5.0), 0.25),
            Metric::Hold => ((0.0, 1440.0), 60.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBucket {
    /// Inclusive.
    pub lower: f64,
    /// Exclusive, except for the last bucket.
    pub upper: f64,
    pub count: usize,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quartiles {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// Fixed-width histogram over `domain`. Values outside the domain clamp into
/// the nearest edge bucket, so bucket counts always sum to `values.len()`.
/// `bin_size` is expected to divide the domain width evenly; when it does
/// not, the last bucket stretches to absorb the remainder.
pub fn histogram(values: &[f64], domain: (f64, f64), bin_size: f64) -> Vec<HistogramBucket> {
    let (lo, hi) = domain;
    if bin_size <= 0.0 || hi <= lo {
        return Vec::new();
    }

    let bins = ((hi - lo) / bin_size).round().max(1.0) as usize;
    let mut buckets: Vec<HistogramBucket> = (0..bins)
        .map(|i| {
            let lower = lo + i as f64 * bin_size;
            let upper = if i == bins - 1 { hi } else { lower + bin_size };
            let label = if i == bins - 1 {
                format!("[{:.2}, {:.2}]", lower, upper)
            } else {
                format!("[{:.2}, {:.2})", lower, upper)
            };
            HistogramBucket {
                lower,
                upper,
                count: 0,
                label,
            }
        })
        .collect();

    for &v in values {
        let idx = ((v - lo) / bin_size).floor();
        let idx = (idx.max(0.0) as usize).min(bins - 1);
        buckets[idx].count += 1;
    }

    buckets
}

/// Histogram of a trade metric, using the metric's default domain unless
/// overridden. Hold-time extraction can fail on corrupt timestamps, which is
/// propagated rather than dropped.
pub fn histogram_for(
    trades: &[Trade],
    metric: Metric,
    domain_override: Option<((f64, f64), f64)>,
) -> Result<Vec<HistogramBucket>, AnalyticsError> {
    let (domain, bin_size) = domain_override.unwrap_or_else(|| metric.default_domain());
    let values = metric_values(trades, metric)?;
    Ok(histogram(&values, domain, bin_size))
}

/// Five-number summary. Median uses the classic two-midpoint rule; q1/q3
/// apply the same rule to the lower/upper half, excluding the median element
/// when the length is odd. `None` for empty input.
pub fn quartiles(values: &[f64]) -> Option<Quartiles> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let n = sorted.len();

    let median = median_sorted(&sorted);
    let lower = &sorted[..n / 2];
    let upper = &sorted[n.div_ceil(2)..];

    Some(Quartiles {
        min: sorted[0],
        q1: if lower.is_empty() { median } else { median_sorted(lower) },
        median,
        q3: if upper.is_empty() { median } else { median_sorted(upper) },
        max: sorted[n - 1],
    })
}

/// Quartile stats for a trade metric.
pub fn quartile_stats(
    trades: &[Trade],
    metric: Metric,
) -> Result<Option<Quartiles>, AnalyticsError> {
    let values = metric_values(trades, metric)?;
    Ok(quartiles(&values))
}

/// Drops the extreme 2.5% of each R tail. Requires at least
/// `min_valid_r_for_trim` valid R values; below that floor the input is
/// returned unchanged. Trades with no R cannot be placed against the bounds
/// and are dropped from the trimmed set.
pub fn remove_outliers(trades: &[Trade], cfg: &AnalyticsConfig) -> Vec<Trade> {
    let mut rs: Vec<f64> = trades.iter().filter_map(effective_r).collect();
    if rs.len() < cfg.min_valid_r_for_trim {
        debug!(
            valid_r = rs.len(),
            floor = cfg.min_valid_r_for_trim,
            "outlier trim skipped: not enough valid R values"
        );
        return trades.to_vec();
    }

    rs.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let n = rs.len();
    let lower_idx = (n as f64 * cfg.trim_tail_fraction).floor() as usize;
    let upper_idx = (n as f64 * (1.0 - cfg.trim_tail_fraction)).ceil() as usize - 1;
    let (lower, upper) = (rs[lower_idx], rs[upper_idx]);

    trades
        .iter()
        .filter(|t| effective_r(t).map_or(false, |r| r >= lower && r <= upper))
        .cloned()
        .collect()
}

fn median_sorted(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    }
}

fn metric_values(trades: &[Trade], metric: Metric) -> Result<Vec<f64>, AnalyticsError> {
    let mut values = Vec::with_capacity(trades.len());
    for trade in trades {
        let v = match metric {
            Metric::R => effective_r(trade),
            Metric::Mae => trade.mae_r,
            Metric::Mfe => trade.mfe_r,
            Metric::Hold => hold_minutes(trade)?.map(|m| m as f64),
        };
        if let Some(v) = v {
            values.push(v);
        }
    }
    Ok(values)
}
