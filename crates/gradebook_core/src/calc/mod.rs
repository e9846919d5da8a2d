//! Derived grade views.
//!
//! # Responsibility
//! - Turn a request-scoped snapshot of assessments into current standing,
//!   what-if projections and weight allocation checks.
//!
//! # Invariants
//! - Calculations never fail and never touch storage.

pub mod grade;
