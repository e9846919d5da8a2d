//! Derived grade view handlers.
//!
//! Response shapes flatten the core `Outcome` markers into plain JSON a
//! static frontend can render directly: `current_weighted` falls back to 0
//! with `has_graded_weight=false`, `required_avg` becomes `null`.

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use gradebook_core::{CurrentStats, Feasibility, Validation, WeightAllocation, WhatIf};
use serde::{Deserialize, Serialize};

use crate::{ApiError, AppState};

/// Current standing response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentStatsResponse {
    /// Rounded to two decimals; 0 when nothing is graded.
    pub current_weighted: f64,
    pub has_graded_weight: bool,
    pub completed_weight: f64,
    pub remaining_weight: f64,
    pub ungraded_weight: f64,
    pub graded_count: usize,
    pub ungraded_count: usize,
}

impl From<CurrentStats> for CurrentStatsResponse {
    fn from(stats: CurrentStats) -> Self {
        Self {
            current_weighted: stats.current_weighted.value().map_or(0.0, round2),
            has_graded_weight: stats.current_weighted.is_determined(),
            completed_weight: stats.completed_weight,
            remaining_weight: stats.remaining_weight,
            ungraded_weight: stats.ungraded_weight,
            graded_count: stats.graded_count,
            ungraded_count: stats.ungraded_count,
        }
    }
}

/// What-if projection response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhatIfResponse {
    pub target: f64,
    /// Rounded to two decimals; `null` when no weight remains.
    pub required_avg: Option<f64>,
    pub attainable: bool,
    pub feasibility: Feasibility,
    pub remaining_weight: f64,
    pub earned_points: f64,
    pub message: String,
}

impl From<WhatIf> for WhatIfResponse {
    fn from(projection: WhatIf) -> Self {
        let required_avg = projection.required_average.value().map(round2);
        let message = what_if_message(&projection, required_avg);
        Self {
            target: projection.target,
            required_avg,
            attainable: projection.feasibility.is_attainable(),
            feasibility: projection.feasibility,
            remaining_weight: projection.remaining_weight,
            earned_points: projection.earned_points,
            message,
        }
    }
}

/// Weight allocation response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResponse {
    pub total_weight: f64,
    pub balanced: bool,
    pub delta: f64,
    pub allocation: WeightAllocation,
    pub message: String,
}

impl From<Validation> for ValidationResponse {
    fn from(validation: Validation) -> Self {
        Self {
            total_weight: validation.total_weight,
            balanced: validation.balanced,
            delta: validation.delta,
            allocation: validation.allocation,
            message: validation.message,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct WhatIfQuery {
    target: f64,
}

pub async fn current(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CurrentStatsResponse>, ApiError> {
    let stats = state.with_service(|service| service.current_stats()).await?;
    Ok(Json(stats.into()))
}

pub async fn what_if(
    State(state): State<Arc<AppState>>,
    query: Result<Query<WhatIfQuery>, QueryRejection>,
) -> Result<Json<WhatIfResponse>, ApiError> {
    let Query(WhatIfQuery { target }) =
        query.map_err(|rejection| ApiError::Validation(rejection.body_text()))?;
    if !target.is_finite() {
        return Err(ApiError::Validation(format!(
            "target must be a finite number, got {target}"
        )));
    }

    let projection = state
        .with_service(move |service| service.what_if(target))
        .await?;
    Ok(Json(projection.into()))
}

pub async fn validate(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ValidationResponse>, ApiError> {
    let validation = state
        .with_service(|service| service.validate_weights())
        .await?;
    Ok(Json(validation.into()))
}

fn what_if_message(projection: &WhatIf, required_avg: Option<f64>) -> String {
    let target = projection.target;
    match (required_avg, projection.feasibility) {
        (None, Feasibility::AlreadyGuaranteed) => {
            format!("No remaining work. Target {target}% is already met.")
        }
        (None, _) => format!("No remaining work. Target {target}% is not met."),
        (Some(_), Feasibility::AlreadyGuaranteed) => {
            format!("Target {target}% is already guaranteed by completed work.")
        }
        (Some(required), Feasibility::Unreachable) => format!(
            "Target {target}% needs an average of {required:.2}% on remaining work, which is not attainable."
        ),
        (Some(required), Feasibility::Attainable) => {
            format!("You need an average of {required:.2}% on remaining work.")
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
