//! Queue Engine
//!
//! Selection, claiming, reordering and bulk creation over the feature
//! store. Every mutation is one store transaction; operations that depend
//! on the maximum priority go through the store's schedule gate.

pub mod bulk;

pub use bulk::{validate_batch, BulkFeature};

use crate::error::ApiError;
use crate::store::{abort, Feature, SledFeatureStore};
use crate::types::{FeatureId, FeatureStatus, Priority};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

pub const DEFAULT_REGRESSION_LIMIT: usize = 3;
pub const MAX_REGRESSION_LIMIT: usize = 10;

/// Progress counters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QueueStats {
    pub total: usize,
    pub passing: usize,
    pub in_progress: usize,
    pub remaining: usize,
    /// Passing share of the total, rounded to one decimal; 0.0 when empty.
    pub percentage: f64,
}

impl QueueStats {
    pub fn from_counts(total: usize, passing: usize, in_progress: usize) -> Self {
        let percentage = if total == 0 {
            0.0
        } else {
            round_one_decimal(passing as f64 / total as f64 * 100.0)
        };
        Self {
            total,
            passing,
            in_progress,
            remaining: total.saturating_sub(passing + in_progress),
            percentage,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkipOutcome {
    pub id: FeatureId,
    pub name: String,
    pub old_priority: Priority,
    pub new_priority: Priority,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkOutcome {
    pub created: usize,
}

/// Round to one decimal the way `{:.1}` prints, so exact ties go to the
/// even digit (6.25 -> 6.2) instead of away from zero.
fn round_one_decimal(value: f64) -> f64 {
    format!("{:.1}", value).parse().unwrap_or(value)
}

/// Clamp a requested regression sample size into `[1, 10]`.
pub fn clamp_regression_limit(limit: Option<usize>) -> usize {
    limit
        .unwrap_or(DEFAULT_REGRESSION_LIMIT)
        .clamp(1, MAX_REGRESSION_LIMIT)
}

pub struct FeatureQueue {
    store: Arc<SledFeatureStore>,
    rng: Mutex<StdRng>,
}

impl FeatureQueue {
    /// Queue whose regression sampling is seeded from the OS.
    pub fn new(store: Arc<SledFeatureStore>) -> Self {
        Self {
            store,
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Queue with reproducible regression sampling.
    pub fn with_seed(store: Arc<SledFeatureStore>, seed: u64) -> Self {
        Self {
            store,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn from_seed(store: Arc<SledFeatureStore>, seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::with_seed(store, seed),
            None => Self::new(store),
        }
    }

    pub fn store(&self) -> &Arc<SledFeatureStore> {
        &self.store
    }

    pub fn stats(&self) -> Result<QueueStats, ApiError> {
        let counts = self.store.counts()?;
        Ok(QueueStats::from_counts(
            counts.total,
            counts.passing,
            counts.in_progress,
        ))
    }

    pub fn get(&self, id: FeatureId) -> Result<Feature, ApiError> {
        self.store.get(id)?.ok_or(ApiError::NotFound(id))
    }

    /// Every feature in scheduling order.
    pub fn list(&self) -> Result<Vec<Feature>, ApiError> {
        Ok(self.store.list()?)
    }

    /// Non-passing feature with the smallest `(priority, id)`.
    pub fn get_next(&self) -> Result<Feature, ApiError> {
        self.store
            .next_pending()?
            .ok_or(ApiError::NoPendingFeatures)
    }

    /// Random sample without replacement of up to `limit` passing features.
    pub fn get_regression(&self, limit: Option<usize>) -> Result<Vec<Feature>, ApiError> {
        let limit = clamp_regression_limit(limit);
        let mut ids = self.store.passing_ids()?;
        ids.shuffle(&mut *self.rng.lock());
        ids.truncate(limit);

        let mut features = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(feature) = self.store.get(id)? {
                features.push(feature);
            }
        }
        debug!(limit, selected = features.len(), "Selected regression features");
        Ok(features)
    }

    /// Mark a feature passing. Repeated calls are accepted.
    pub fn mark_passing(&self, id: FeatureId) -> Result<Feature, ApiError> {
        let feature = self.store.transaction(|txn| {
            let current = txn.require::<ApiError>(id)?;
            txn.set_status::<ApiError>(&current, FeatureStatus::Passing)
        })?;
        info!(id, name = %feature.name, "Feature marked passing");
        Ok(feature)
    }

    /// Move a non-passing feature behind every other feature and release
    /// any claim on it.
    pub fn skip(&self, id: FeatureId) -> Result<SkipOutcome, ApiError> {
        let outcome = self.store.schedule(|txn| {
            let current = txn.require::<ApiError>(id)?;
            if current.passes() {
                return abort(ApiError::AlreadyPassing(id));
            }
            let new_priority = txn
                .max_priority()
                .map_or(1, |max| max.saturating_add(1));
            let next = Feature {
                priority: new_priority,
                status: FeatureStatus::Pending,
                ..current.clone()
            };
            txn.save::<ApiError>(&current, next)?;
            Ok(SkipOutcome {
                id,
                name: current.name.clone(),
                old_priority: current.priority,
                new_priority,
            })
        })?;
        info!(
            id,
            old_priority = outcome.old_priority,
            new_priority = outcome.new_priority,
            "Feature skipped"
        );
        Ok(outcome)
    }

    /// Claim a pending feature. At most one concurrent caller succeeds.
    pub fn mark_in_progress(&self, id: FeatureId) -> Result<Feature, ApiError> {
        let feature = self.store.transaction(|txn| {
            let current = txn.require::<ApiError>(id)?;
            match current.status {
                FeatureStatus::Passing => abort(ApiError::AlreadyPassing(id)),
                FeatureStatus::InProgress => abort(ApiError::AlreadyInProgress(id)),
                FeatureStatus::Pending => {
                    txn.set_status::<ApiError>(&current, FeatureStatus::InProgress)
                }
            }
        })?;
        debug!(id, "Feature marked in-progress");
        Ok(feature)
    }

    /// Release a claim. Clearing an unclaimed feature is a no-op.
    pub fn clear_in_progress(&self, id: FeatureId) -> Result<Feature, ApiError> {
        let feature = self.store.transaction(|txn| {
            let current = txn.require::<ApiError>(id)?;
            if current.in_progress() {
                txn.set_status::<ApiError>(&current, FeatureStatus::Pending)
            } else {
                Ok(current)
            }
        })?;
        debug!(id, "Feature in-progress cleared");
        Ok(feature)
    }

    /// Insert a validated batch behind every existing feature, all or
    /// nothing.
    pub fn create_bulk(&self, items: &[BulkFeature]) -> Result<BulkOutcome, ApiError> {
        validate_batch(items)?;
        if items.is_empty() {
            return Ok(BulkOutcome { created: 0 });
        }

        let created = self.store.schedule::<_, ApiError, _>(|txn| {
            let start = txn.max_priority().map_or(1, |max| max.saturating_add(1));
            for (offset, item) in items.iter().enumerate() {
                let priority = start.saturating_add(offset as Priority);
                txn.insert::<ApiError>(item.clone().into_new_feature(priority))?;
            }
            Ok(items.len())
        })?;
        info!(created, "Created features in bulk");
        Ok(BulkOutcome { created })
    }
}
