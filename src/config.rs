use serde::{Deserialize, Serialize};

/// Partitions smaller than this are tagged exploratory in breakdowns.
pub const MIN_SAMPLE_EXPLORATORY: usize = 10;
/// Outlier trimming needs at least this many valid R values or it is a no-op.
pub const MIN_VALID_R_FOR_TRIM: usize = 10;
/// Below this many total trades the insight scan emits a placeholder only.
pub const MIN_TRADES_FOR_INSIGHTS: usize = 15;
/// R values inside +/- this band classify as breakeven under the R basis.
pub const BREAKEVEN_BAND_R: f64 = 0.1;
/// Fraction trimmed off each tail by outlier removal.
pub const TRIM_TAIL_FRACTION: f64 = 0.025;

/// Which convention decides win / loss / breakeven. The journal's historical
/// data mixes both, so the caller picks one per computation instead of the
/// engine guessing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinLossBasis {
    /// Win when R > +0.1, loss when R < -0.1, breakeven inside the band.
    RBand,
    /// Win when net P&L > 0, loss when < 0, breakeven at exactly 0.
    PnlSign,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    pub basis: WinLossBasis,
    pub breakeven_band_r: f64,
    pub min_valid_r_for_trim: usize,
    pub trim_tail_fraction: f64,
    pub min_sample_exploratory: usize,
    pub min_trades_for_insights: usize,
    pub max_insights: usize,
    pub log_level: String,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            basis: WinLossBasis::RBand,
            breakeven_band_r: BREAKEVEN_BAND_R,
            min_valid_r_for_trim: MIN_VALID_R_FOR_TRIM,
            trim_tail_fraction: TRIM_TAIL_FRACTION,
            min_sample_exploratory: MIN_SAMPLE_EXPLORATORY,
            min_trades_for_insights: MIN_TRADES_FOR_INSIGHTS,
            max_insights: 2,
            log_level: "INFO".to_string(),
        }
    }
}

impl AnalyticsConfig {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let env = |key: &str, default: &str| -> String {
            std::env::var(key).unwrap_or_else(|_| default.to_string())
        };

        let defaults = Self::default();

        Self {
            basis: match env("WIN_LOSS_BASIS", "r_band").as_str() {
                "pnl_sign" => WinLossBasis::PnlSign,
                _ => WinLossBasis::RBand,
            },
            breakeven_band_r: env("BREAKEVEN_BAND_R", "0.1")
                .parse()
                .unwrap_or(BREAKEVEN_BAND_R),
            min_valid_r_for_trim: env("MIN_VALID_R_FOR_TRIM", "10")
                .parse()
                .unwrap_or(MIN_VALID_R_FOR_TRIM),
            trim_tail_fraction: env("TRIM_TAIL_FRACTION", "0.025")
                .parse()
                .unwrap_or(TRIM_TAIL_FRACTION),
            min_sample_exploratory: env("MIN_SAMPLE_EXPLORATORY", "10")
                .parse()
                .unwrap_or(MIN_SAMPLE_EXPLORATORY),
            min_trades_for_insights: env("MIN_TRADES_FOR_INSIGHTS", "15")
                .parse()
                .unwrap_or(MIN_TRADES_FOR_INSIGHTS),
            max_insights: env("MAX_INSIGHTS", "2").parse().unwrap_or(2),
            log_level: env("LOG_LEVEL", &defaults.log_level),
        }
    }
}
