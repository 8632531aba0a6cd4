//! Feature Store
//!
//! Durable, transactional storage for feature rows. Every mutation runs as
//! one sled transaction spanning the row and all of its index trees.

pub(crate) mod keys;
pub mod persistence;
pub mod txn;

pub use persistence::SledFeatureStore;
pub use txn::{abort, FeatureTxn, ScheduleTxn, StoreCounts, TxResult};

use crate::types::{FeatureId, FeatureStatus, Priority};
use serde::{Deserialize, Serialize};

/// A trackable unit of work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    pub id: FeatureId,
    pub priority: Priority,
    pub category: String,
    pub name: String,
    pub description: String,
    pub steps: Vec<String>,
    pub status: FeatureStatus,
}

impl Feature {
    pub fn passes(&self) -> bool {
        self.status.passes()
    }

    pub fn in_progress(&self) -> bool {
        self.status.in_progress()
    }
}

/// A feature that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFeature {
    pub priority: Priority,
    pub category: String,
    pub name: String,
    pub description: String,
    pub steps: Vec<String>,
    pub status: FeatureStatus,
}

impl NewFeature {
    pub(crate) fn with_id(self, id: FeatureId) -> Feature {
        Feature {
            id,
            priority: self.priority,
            category: self.category,
            name: self.name,
            description: self.description,
            steps: self.steps,
            status: self.status,
        }
    }
}
