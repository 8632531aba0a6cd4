//! Reconciliation of parsed descriptors into the feature store.
//!
//! Descriptors are matched to stored features by name. A match may have
//! its content rewritten but never its status; unmatched descriptors are
//! inserted; stored features without a descriptor are left alone.

use crate::error::ApiError;
use crate::spec::{load_specs_dir, SpecBatch, SpecRecord};
use crate::store::{Feature, SledFeatureStore};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Counts reported by one sync call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    pub added: usize,
    pub updated: usize,
    pub unchanged: usize,
    /// Descriptors considered (`added + updated + unchanged`).
    pub total: usize,
    /// Descriptor files dropped because they failed to parse.
    pub skipped: usize,
}

/// Whether the descriptor's content differs from the stored feature.
/// Priority and status are not compared.
pub fn content_differs(existing: &Feature, record: &SpecRecord) -> bool {
    existing.category != record.category
        || existing.description != record.description
        || existing.steps != record.steps
}

pub struct SpecReconciler {
    store: Arc<SledFeatureStore>,
}

impl SpecReconciler {
    pub fn new(store: Arc<SledFeatureStore>) -> Self {
        Self { store }
    }

    /// Merge a parsed batch in one transaction.
    pub fn sync(&self, batch: &SpecBatch) -> Result<SyncReport, ApiError> {
        let mut report = self.store.schedule::<_, ApiError, _>(|txn| {
            let mut report = SyncReport::default();
            for record in &batch.records {
                match txn.find_by_name::<ApiError>(&record.name)? {
                    None => {
                        txn.insert::<ApiError>(record.to_new_feature())?;
                        report.added += 1;
                    }
                    Some(existing) if content_differs(&existing, record) => {
                        let next = Feature {
                            priority: record.priority,
                            category: record.category.clone(),
                            description: record.description.clone(),
                            steps: record.steps.clone(),
                            ..existing.clone()
                        };
                        txn.save::<ApiError>(&existing, next)?;
                        report.updated += 1;
                    }
                    Some(_) => report.unchanged += 1,
                }
            }
            report.total = batch.records.len();
            Ok(report)
        })?;
        report.skipped = batch.warnings.len();

        info!(
            added = report.added,
            updated = report.updated,
            unchanged = report.unchanged,
            skipped = report.skipped,
            "Synced specs"
        );
        Ok(report)
    }

    /// Parse `dir` and merge it. A missing directory changes nothing.
    pub fn sync_dir(&self, dir: &Path) -> Result<SyncReport, ApiError> {
        if !dir.is_dir() {
            warn!(dir = %dir.display(), "No specs directory found, nothing to sync");
            return Ok(SyncReport::default());
        }
        self.sync(&load_specs_dir(dir))
    }

    /// Insert every record verbatim, but only into an empty store.
    ///
    /// Returns the number of features seeded.
    pub fn seed_if_empty(&self, batch: &SpecBatch) -> Result<usize, ApiError> {
        let seeded = self.store.schedule::<_, ApiError, _>(|txn| {
            if !txn.store_was_empty() {
                return Ok(0);
            }
            for record in &batch.records {
                txn.insert::<ApiError>(record.to_new_feature())?;
            }
            Ok(batch.records.len())
        })?;
        if seeded > 0 {
            info!(count = seeded, "Loaded features from specs directory");
        }
        Ok(seeded)
    }

    /// Seed from `dir` when the store is empty and the directory exists.
    pub fn seed_from_dir(&self, dir: &Path) -> Result<usize, ApiError> {
        if !self.store.is_empty() {
            debug!("Store already populated, skipping seed");
            return Ok(0);
        }
        if !dir.is_dir() {
            debug!(dir = %dir.display(), "No specs directory, skipping seed");
            return Ok(0);
        }
        self.seed_if_empty(&load_specs_dir(dir))
    }
}
