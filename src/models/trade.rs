use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Long,
    Short,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Long => write!(f, "long"),
            Direction::Short => write!(f, "short"),
        }
    }
}

impl Direction {
    pub fn sign(&self) -> f64 {
        match self {
            Direction::Long => 1.0,
            Direction::Short => -1.0,
        }
    }
}

/// A single closed journal trade. Read-only input to every engine function;
/// fields the journal may not have filled in are explicit `Option`s, not
/// magic defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    pub id: String,
    pub symbol: String,
    pub direction: Direction,
    #[serde(default)]
    pub entry_price: Option<f64>,
    #[serde(default)]
    pub exit_price: Option<f64>,
    #[serde(default)]
    pub stop_price: Option<f64>,
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub entry_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub exit_time: Option<DateTime<Utc>>,
    /// Realized P&L in account currency, gross of fees.
    pub pnl: f64,
    #[serde(default)]
    pub commission: Option<f64>,
    #[serde(default)]
    pub swap: Option<f64>,
    #[serde(default)]
    pub slippage: Option<f64>,
    /// Broker- or importer-supplied R multiple. When present it takes
    /// precedence over the price-derived value.
    #[serde(default)]
    pub r_multiple: Option<f64>,
    #[serde(default)]
    pub strategy_id: Option<String>,
    #[serde(default)]
    pub session: Option<Session>,
    #[serde(default)]
    pub session_hour: Option<u32>,
    /// Setup grade assigned at entry (e.g. "A+", "B").
    #[serde(default)]
    pub grade: Option<String>,
    #[serde(default)]
    pub mae_r: Option<f64>,
    #[serde(default)]
    pub mfe_r: Option<f64>,
}

impl Trade {
    /// The timestamp a trade is journaled under: exit when closed, entry
    /// otherwise.
    pub fn journal_time(&self) -> Option<DateTime<Utc>> {
        self.exit_time.or(self.entry_time)
    }

    pub fn journal_date(&self) -> Option<NaiveDate> {
        self.journal_time().map(|t| t.date_naive())
    }

    pub fn day_of_week(&self) -> Option<String> {
        self.journal_date().map(|d| d.format("%A").to_string())
    }
}
