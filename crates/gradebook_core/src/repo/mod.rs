//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the record-store contract consumed by services.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Repository writes must pass assessment validation before persistence.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

pub mod assessment_repo;
