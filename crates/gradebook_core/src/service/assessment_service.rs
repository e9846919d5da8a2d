//! Assessment use-case service.
//!
//! # Responsibility
//! - Provide CRUD entry points over the record store.
//! - Load request-scoped snapshots and hand them to the grade calculator.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Service layer remains storage-agnostic.
//! - Log events carry ids and counts only, never titles.

use crate::calc::grade::{self, CurrentStats, Validation, WhatIf};
use crate::model::assessment::{Assessment, AssessmentId, AssessmentPatch, NewAssessment};
use crate::repo::assessment_repo::{AssessmentRepository, RepoError, RepoResult};
use log::{debug, info, warn};

/// Use-case service wrapper for assessments and their derived views.
pub struct AssessmentService<R: AssessmentRepository> {
    repo: R,
}

impl<R: AssessmentRepository> AssessmentService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one assessment and returns it with its assigned id.
    pub fn create_assessment(&self, input: &NewAssessment) -> RepoResult<Assessment> {
        let created = self.repo.create_assessment(input).inspect_err(|err| {
            warn!("event=assessment_create module=service status=error error={err}");
        })?;
        info!(
            "event=assessment_create module=service status=ok id={} graded={}",
            created.id,
            created.is_graded()
        );
        Ok(created)
    }

    /// Gets one assessment by id.
    ///
    /// # Errors
    /// - `RepoError::NotFound` when no record has this id.
    pub fn get_assessment(&self, id: AssessmentId) -> RepoResult<Assessment> {
        self.repo
            .get_assessment(id)?
            .ok_or(RepoError::NotFound(id))
    }

    /// Lists all assessments ordered by due date.
    pub fn list_assessments(&self) -> RepoResult<Vec<Assessment>> {
        let items = self.repo.list_assessments()?;
        debug!(
            "event=assessment_list module=service status=ok count={}",
            items.len()
        );
        Ok(items)
    }

    /// Applies a partial patch and returns the stored result.
    ///
    /// An empty patch is a no-op read.
    pub fn update_assessment(
        &self,
        id: AssessmentId,
        patch: &AssessmentPatch,
    ) -> RepoResult<Assessment> {
        let current = self.get_assessment(id)?;
        if patch.is_empty() {
            return Ok(current);
        }

        let next = current.patched(patch)?;
        self.repo.update_assessment(&next)?;
        info!("event=assessment_update module=service status=ok id={id}");

        self.get_assessment(id)
    }

    /// Permanently deletes one assessment.
    pub fn delete_assessment(&self, id: AssessmentId) -> RepoResult<()> {
        self.repo.delete_assessment(id)?;
        info!("event=assessment_delete module=service status=ok id={id}");
        Ok(())
    }

    /// Current weighted grade over the full record set.
    pub fn current_stats(&self) -> RepoResult<CurrentStats> {
        let records = self.repo.list_assessments()?;
        let stats = grade::current_stats(&records);
        debug!(
            "event=stats_current module=service status=ok graded={} ungraded={}",
            stats.graded_count, stats.ungraded_count
        );
        Ok(stats)
    }

    /// Required average on remaining weight to finish at `target`.
    pub fn what_if(&self, target: f64) -> RepoResult<WhatIf> {
        let records = self.repo.list_assessments()?;
        let projection = grade::what_if(&records, target);
        debug!(
            "event=stats_what_if module=service status=ok feasibility={:?}",
            projection.feasibility
        );
        Ok(projection)
    }

    /// Advisory check that weights total 100.
    pub fn validate_weights(&self) -> RepoResult<Validation> {
        let records = self.repo.list_assessments()?;
        let validation = grade::validate_weights(&records);
        if !validation.balanced {
            debug!(
                "event=stats_validate module=service status=unbalanced allocation={:?}",
                validation.allocation
            );
        }
        Ok(validation)
    }
}
