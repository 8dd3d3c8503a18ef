use serde::{Deserialize, Serialize};
use std::fmt;

/// A ratio whose denominator may legitimately be zero. Replaces the usual
/// `f64::INFINITY` / `999.0` sentinels so consumers cannot do arithmetic on
/// a placeholder by accident.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Ratio {
    Finite(f64),
    /// Numerator and denominator both empty (e.g. no trades at all).
    Undefined,
    /// Positive numerator over a zero denominator (e.g. no losing trades).
    PositiveInfinite,
}

impl Ratio {
    /// `numerator / denominator` with the engine's sentinel policy:
    /// a zero denominator yields `PositiveInfinite` when the numerator is
    /// positive and `Undefined` otherwise.
    pub fn of(numerator: f64, denominator: f64) -> Self {
        if denominator > 0.0 {
            Ratio::Finite(numerator / denominator)
        } else if numerator > 0.0 {
            Ratio::PositiveInfinite
        } else {
            Ratio::Undefined
        }
    }

    pub fn is_finite(&self) -> bool {
        matches!(self, Ratio::Finite(_))
    }

    /// Display/serialization fallback: both non-finite cases read as 0.
    pub fn value_or_zero(&self) -> f64 {
        match self {
            Ratio::Finite(v) => *v,
            _ => 0.0,
        }
    }
}

impl Default for Ratio {
    fn default() -> Self {
        Ratio::Undefined
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ratio::Finite(v) => write!(f, "{:.2}", v),
            Ratio::Undefined => write!(f, "n/a"),
            Ratio::PositiveInfinite => write!(f, "inf"),
        }
    }
}
