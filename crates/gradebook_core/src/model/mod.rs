//! Domain model for graded coursework.
//!
//! # Responsibility
//! - Define the assessment record and its create/patch inputs.
//! - Own record-level validation shared by storage and transport layers.
//!
//! # Invariants
//! - Every persisted assessment is identified by a storage-assigned `AssessmentId`.
//! - Deletion is permanent; there is no tombstone state.

pub mod assessment;
