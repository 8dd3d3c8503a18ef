use chrono::{DateTime, Utc};
use thiserror::Error;

/// Hard failures only. Missing or partial trade data degrades to explicit
/// "no value" results instead of erroring; these variants cover the two
/// conditions that indicate a real problem upstream.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("trade {trade_id}: exit {exit} precedes entry {entry}")]
    NegativeHoldTime {
        trade_id: String,
        entry: DateTime<Utc>,
        exit: DateTime<Utc>,
    },

    #[error("rubric weights must sum to 1.0 (+/-{tolerance}), got {sum}")]
    RubricWeightSum { sum: f64, tolerance: f64 },

    #[error("rubric {field} must be within [0, 1], got {value}")]
    RubricOutOfRange { field: &'static str, value: f64 },
}
