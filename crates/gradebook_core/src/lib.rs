//! Core domain logic for the gradebook.
//! This crate is the single source of truth for assessment invariants and
//! grade calculations.

pub mod calc;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use calc::grade::{
    current_stats, validate_weights, what_if, CurrentStats, Feasibility, NotApplicableReason,
    Outcome, Validation, WeightAllocation, WhatIf, FULL_WEIGHT, WEIGHT_TOLERANCE,
};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError, LoggingOptions};
pub use model::assessment::{
    Assessment, AssessmentId, AssessmentPatch, AssessmentValidationError, NewAssessment,
};
pub use repo::assessment_repo::{
    AssessmentRepository, RepoError, RepoResult, SqliteAssessmentRepository,
};
pub use service::assessment_service::AssessmentService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
