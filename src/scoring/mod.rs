//! Playbook compliance scoring: grades one candidate setup against a
//! playbook's rules and confluences. Independent of trade history and
//! invoked at trade-entry time.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use tracing::debug;

use crate::error::AnalyticsError;

pub const WEIGHT_SUM_TOLERANCE: f64 = 0.01;
pub const PRIMARY_CONFLUENCE_BOOST: f64 = 1.2;
pub const FALLBACK_GRADE: &str = "F";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleType {
    Must,
    Should,
    Optional,
}

impl fmt::Display for RuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleType::Must => write!(f, "must"),
            RuleType::Should => write!(f, "should"),
            RuleType::Optional => write!(f, "optional"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rule {
    pub id: String,
    pub rule_type: RuleType,
    pub weight: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Confluence {
    pub id: String,
    pub weight: f64,
    /// Primary confluences count ×1.2 in both numerator and denominator.
    #[serde(default)]
    pub primary: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeCutoff {
    pub grade: String,
    pub min_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rubric {
    pub weight_rules: f64,
    pub weight_confluences: f64,
    pub must_rule_penalty: f64,
    pub grade_cutoffs: Vec<GradeCutoff>,
}

impl Default for Rubric {
    fn default() -> Self {
        let cutoff = |grade: &str, min_score: f64| GradeCutoff {
            grade: grade.to_string(),
            min_score,
        };
        Self {
            weight_rules: 0.6,
            weight_confluences: 0.4,
            must_rule_penalty: 0.4,
            grade_cutoffs: vec![
                cutoff("A+", 0.95),
                cutoff("A", 0.90),
                cutoff("B", 0.80),
                cutoff("C", 0.70),
                cutoff("D", 0.60),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreParts {
    pub rules_pct: f64,
    pub confluences_pct: f64,
    pub must_penalty_applied: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetupScore {
    /// Final compliance score in [0, 1].
    pub score: f64,
    pub grade: String,
    pub parts: ScoreParts,
}

/// Score one candidate setup. Weight validation is deliberately NOT applied
/// here — scoring proceeds with whatever rubric it is given; call
/// [`validate_rubric`] at configuration-save time instead.
pub fn score_setup(
    rules: &[Rule],
    checked_rules: &HashSet<String>,
    confluences: &[Confluence],
    checked_confluences: &HashSet<String>,
    rubric: &Rubric,
) -> SetupScore {
    let rules_pct = weighted_pct(
        rules
            .iter()
            .map(|r| (r.weight, checked_rules.contains(&r.id))),
    );
    let confluences_pct = weighted_pct(confluences.iter().map(|c| {
        let weight = if c.primary {
            c.weight * PRIMARY_CONFLUENCE_BOOST
        } else {
            c.weight
        };
        (weight, checked_confluences.contains(&c.id))
    }));

    let mut score = rubric.weight_rules * rules_pct + rubric.weight_confluences * confluences_pct;

    let missed_must = rules
        .iter()
        .any(|r| r.rule_type == RuleType::Must && !checked_rules.contains(&r.id));
    if missed_must {
        debug!(
            penalty = rubric.must_rule_penalty,
            "must rule unchecked, applying penalty"
        );
        score = (score - rubric.must_rule_penalty).max(0.0);
    }

    let score = score.clamp(0.0, 1.0);

    SetupScore {
        score,
        grade: grade_for(score, &rubric.grade_cutoffs),
        parts: ScoreParts {
            rules_pct,
            confluences_pct,
            must_penalty_applied: missed_must,
        },
    }
}

/// Fail-fast configuration check, separate from scoring.
pub fn validate_rubric(rubric: &Rubric) -> Result<(), AnalyticsError> {
    let sum = rubric.weight_rules + rubric.weight_confluences;
    if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        return Err(AnalyticsError::RubricWeightSum {
            sum,
            tolerance: WEIGHT_SUM_TOLERANCE,
        });
    }
    if !(0.0..=1.0).contains(&rubric.must_rule_penalty) {
        return Err(AnalyticsError::RubricOutOfRange {
            field: "must_rule_penalty",
            value: rubric.must_rule_penalty,
        });
    }
    for cutoff in &rubric.grade_cutoffs {
        if !(0.0..=1.0).contains(&cutoff.min_score) {
            return Err(AnalyticsError::RubricOutOfRange {
                field: "grade_cutoffs",
                value: cutoff.min_score,
            });
        }
    }
    Ok(())
}

/// Checked-weight share of total weight. An empty item set is full
/// compliance; a zero total weight floors the denominator at 1 so the
/// division is always defined.
fn weighted_pct(items: impl Iterator<Item = (f64, bool)>) -> f64 {
    let mut total = 0.0;
    let mut checked = 0.0;
    let mut count = 0usize;
    for (weight, is_checked) in items {
        total += weight;
        if is_checked {
            checked += weight;
        }
        count += 1;
    }
    if count == 0 {
        return 1.0;
    }
    let denominator = if total > 0.0 { total } else { 1.0 };
    checked / denominator
}

/// Highest cutoff at or below the score wins; equality qualifies.
fn grade_for(score: f64, cutoffs: &[GradeCutoff]) -> String {
    let mut sorted = cutoffs.to_vec();
    sorted.sort_by(|a, b| b.min_score.partial_cmp(&a.min_score).unwrap());
    sorted
        .iter()
        .find(|c| c.min_score <= score)
        .map(|c| c.grade.clone())
        .unwrap_or_else(|| FALLBACK_GRADE.to_string())
}
