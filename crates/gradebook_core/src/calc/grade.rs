//! Grade calculations over a snapshot of assessment records.
//!
//! # Responsibility
//! - Derive the current weighted grade, a what-if projection and the weight
//!   allocation check from a list of assessments.
//!
//! # Invariants
//! - Functions are pure: no I/O, inputs are never mutated.
//! - Input order never affects results.
//! - Zero divisors surface as `Outcome::NotApplicable`, never NaN or a panic.
//! - Stored values are not re-validated; out-of-range input is computed through.

use crate::model::assessment::Assessment;
use serde::{Deserialize, Serialize};

/// Full course weight, in percent.
pub const FULL_WEIGHT: f64 = 100.0;

/// Absolute tolerance used when deciding whether weights total 100.
pub const WEIGHT_TOLERANCE: f64 = 0.01;

/// Why a derived value could not be determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotApplicableReason {
    /// No graded record carries positive weight yet.
    NoGradedWeight,
    /// Completed work already covers the full course weight.
    NoRemainingWeight,
}

/// A derived value that may be undefined for the current data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Outcome<T> {
    Determined(T),
    NotApplicable(NotApplicableReason),
}

impl<T: Copy> Outcome<T> {
    /// Returns the determined value, if any.
    pub fn value(&self) -> Option<T> {
        match self {
            Self::Determined(value) => Some(*value),
            Self::NotApplicable(_) => None,
        }
    }

    pub fn is_determined(&self) -> bool {
        matches!(self, Self::Determined(_))
    }
}

/// Current standing derived from graded work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentStats {
    /// Weighted average over graded records only.
    pub current_weighted: Outcome<f64>,
    /// Sum of weights of graded records.
    pub completed_weight: f64,
    /// `100 - completed_weight`, floored at 0 and snapped to 0 within
    /// `WEIGHT_TOLERANCE`.
    pub remaining_weight: f64,
    /// Sum of weights of records without a score.
    pub ungraded_weight: f64,
    pub graded_count: usize,
    pub ungraded_count: usize,
}

/// Whether a target grade can still be reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feasibility {
    /// Reachable with an average between 0 and 100 on remaining work.
    Attainable,
    /// Out of reach even with perfect remaining scores.
    Unreachable,
    /// Already met by completed work alone.
    AlreadyGuaranteed,
}

impl Feasibility {
    /// Returns `false` only for `Unreachable`.
    pub fn is_attainable(self) -> bool {
        !matches!(self, Self::Unreachable)
    }
}

/// Projection of what is needed on remaining work to reach a target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhatIf {
    /// Caller-supplied target, echoed back.
    pub target: f64,
    /// Average needed across the remaining weight.
    pub required_average: Outcome<f64>,
    pub feasibility: Feasibility,
    pub remaining_weight: f64,
    pub completed_weight: f64,
    /// Final-grade points already secured: `sum(score * weight / 100)`.
    pub earned_points: f64,
}

/// Direction of a weight allocation mismatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightAllocation {
    Balanced,
    Over,
    Under,
}

/// Advisory check that weights add up to the full course weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Validation {
    pub total_weight: f64,
    pub balanced: bool,
    /// `total_weight - 100`; positive means over-allocated.
    pub delta: f64,
    pub allocation: WeightAllocation,
    pub message: String,
}

#[derive(Debug, Default)]
struct GradedTotals {
    completed_weight: f64,
    /// `sum(score * weight)`, not yet normalized.
    weighted_score: f64,
    ungraded_weight: f64,
    graded_count: usize,
    ungraded_count: usize,
}

impl GradedTotals {
    fn collect(records: &[Assessment]) -> Self {
        records.iter().fold(Self::default(), |mut acc, record| {
            match record.score_pct {
                Some(score) => {
                    acc.completed_weight += record.weight_pct;
                    acc.weighted_score += score * record.weight_pct;
                    acc.graded_count += 1;
                }
                None => {
                    acc.ungraded_weight += record.weight_pct;
                    acc.ungraded_count += 1;
                }
            }
            acc
        })
    }

    /// Snaps to 0 within `WEIGHT_TOLERANCE` so float noise in a fully
    /// graded course never becomes a tiny divisor.
    fn remaining_weight(&self) -> f64 {
        let remaining = (FULL_WEIGHT - self.completed_weight).max(0.0);
        if remaining <= WEIGHT_TOLERANCE {
            0.0
        } else {
            remaining
        }
    }

    fn earned_points(&self) -> f64 {
        self.weighted_score / FULL_WEIGHT
    }
}

/// Computes the current weighted grade from graded records.
pub fn current_stats(records: &[Assessment]) -> CurrentStats {
    let totals = GradedTotals::collect(records);
    let current_weighted = if totals.completed_weight > 0.0 {
        Outcome::Determined(totals.weighted_score / totals.completed_weight)
    } else {
        Outcome::NotApplicable(NotApplicableReason::NoGradedWeight)
    };

    CurrentStats {
        current_weighted,
        completed_weight: totals.completed_weight,
        remaining_weight: totals.remaining_weight(),
        ungraded_weight: totals.ungraded_weight,
        graded_count: totals.graded_count,
        ungraded_count: totals.ungraded_count,
    }
}

/// Computes the average needed on remaining weight to finish at `target`.
///
/// With no remaining weight the final grade is fixed, so feasibility compares
/// the earned points against the target directly.
pub fn what_if(records: &[Assessment], target: f64) -> WhatIf {
    let totals = GradedTotals::collect(records);
    let remaining_weight = totals.remaining_weight();
    let earned_points = totals.earned_points();

    let (required_average, feasibility) = if remaining_weight > 0.0 {
        let required = (target - earned_points) / remaining_weight * FULL_WEIGHT;
        let feasibility = if required > FULL_WEIGHT {
            Feasibility::Unreachable
        } else if required < 0.0 {
            Feasibility::AlreadyGuaranteed
        } else {
            Feasibility::Attainable
        };
        (Outcome::Determined(required), feasibility)
    } else {
        let feasibility = if earned_points >= target {
            Feasibility::AlreadyGuaranteed
        } else {
            Feasibility::Unreachable
        };
        (
            Outcome::NotApplicable(NotApplicableReason::NoRemainingWeight),
            feasibility,
        )
    };

    WhatIf {
        target,
        required_average,
        feasibility,
        remaining_weight,
        completed_weight: totals.completed_weight,
        earned_points,
    }
}

/// Checks whether all weights, graded or not, total 100.
pub fn validate_weights(records: &[Assessment]) -> Validation {
    let total_weight = records
        .iter()
        .fold(0.0, |total, record| total + record.weight_pct);
    let delta = total_weight - FULL_WEIGHT;
    let balanced = delta.abs() <= WEIGHT_TOLERANCE;
    let allocation = if balanced {
        WeightAllocation::Balanced
    } else if delta > 0.0 {
        WeightAllocation::Over
    } else {
        WeightAllocation::Under
    };

    let message = match allocation {
        WeightAllocation::Balanced => format!("Weights total {total_weight:.2}%."),
        WeightAllocation::Over => format!(
            "Weights are over-allocated by {:.2}% (total {total_weight:.2}%).",
            delta
        ),
        WeightAllocation::Under => format!(
            "Weights are under-allocated by {:.2}% (total {total_weight:.2}%).",
            -delta
        ),
    };

    Validation {
        total_weight,
        balanced,
        delta,
        allocation,
        message,
    }
}
