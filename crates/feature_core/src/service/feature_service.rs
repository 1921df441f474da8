//! Feature use-case service.
//!
//! # Responsibility
//! - Provide stable entry points for document and well management callers.
//! - Delegate persistence to repository implementations.
//! - Emit metadata-only diagnostic events for every write.
//!
//! # Invariants
//! - Service APIs never bypass repository persistence contracts.
//! - Errors are logged and returned unchanged, never swallowed.

use crate::model::feature::{Feature, FeatureUpdate, NewFeature};
use crate::repo::common::RepoResult;
use crate::repo::feature_repo::FeatureRepository;
use log::{debug, error, info};
use std::time::Instant;

/// Use-case service wrapper for feature operations.
pub struct FeatureService<R: FeatureRepository> {
    repo: R,
}

impl<R: FeatureRepository> FeatureService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Gets the feature attached to a well.
    pub fn get_by_well_id(&self, well_id: &str) -> RepoResult<Option<Feature>> {
        let result = self.repo.get_by_well_id(well_id);
        log_lookup("feature_get_by_well", &result);
        result
    }

    /// Gets the feature attached to a document.
    pub fn get_by_document_id(&self, document_id: &str) -> RepoResult<Option<Feature>> {
        let result = self.repo.get_by_document_id(document_id);
        log_lookup("feature_get_by_document", &result);
        result
    }

    /// Persists a new feature, stamping create/update audit columns.
    pub fn save(&self, input: &NewFeature) -> RepoResult<Feature> {
        let started_at = Instant::now();
        match self.repo.insert(input) {
            Ok(feature) => {
                info!(
                    "event=feature_save module=feature_service status=ok duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(feature)
            }
            Err(err) => {
                error!(
                    "event=feature_save module=feature_service status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    /// Soft-deletes all features of the given documents.
    ///
    /// Unknown document ids are ignored. Returns the number of rows touched.
    pub fn delete_by_document_ids(&mut self, document_ids: &[String]) -> RepoResult<usize> {
        let started_at = Instant::now();
        match self.repo.soft_delete_by_document_ids(document_ids) {
            Ok(changed) => {
                info!(
                    "event=feature_soft_delete module=feature_service status=ok requested={} changed={} duration_ms={}",
                    document_ids.len(),
                    changed,
                    started_at.elapsed().as_millis()
                );
                Ok(changed)
            }
            Err(err) => {
                error!(
                    "event=feature_soft_delete module=feature_service status=error requested={} duration_ms={} error={}",
                    document_ids.len(),
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    /// Updates all features of one document. Empty updates are skipped.
    pub fn update_by_document_id(
        &mut self,
        document_id: &str,
        update: &FeatureUpdate,
    ) -> RepoResult<usize> {
        if update.is_empty() {
            debug!("event=feature_update module=feature_service status=skipped reason=empty_update");
            return Ok(0);
        }

        let started_at = Instant::now();
        match self.repo.update_by_document_id(document_id, update) {
            Ok(changed) => {
                info!(
                    "event=feature_update module=feature_service status=ok changed={} duration_ms={}",
                    changed,
                    started_at.elapsed().as_millis()
                );
                Ok(changed)
            }
            Err(err) => {
                error!(
                    "event=feature_update module=feature_service status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    /// Returns the wrapped repository.
    pub fn into_inner(self) -> R {
        self.repo
    }
}

fn log_lookup(event: &str, result: &RepoResult<Option<Feature>>) {
    match result {
        Ok(found) => debug!(
            "event={event} module=feature_service status=ok found={}",
            found.is_some()
        ),
        Err(err) => error!("event={event} module=feature_service status=error error={err}"),
    }
}
