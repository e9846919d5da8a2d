//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls and grade calculations into use-case APIs.
//! - Keep HTTP/CLI layers decoupled from storage details.

pub mod assessment_service;
