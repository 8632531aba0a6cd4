//! Shared identifier and status types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Monotonically assigned, never reused feature identifier (starts at 1).
pub type FeatureId = u64;

/// Scheduling key; lower values are scheduled sooner.
pub type Priority = i64;

/// Lifecycle state of a feature.
///
/// Persisted as two booleans (`passes`, `in_progress`) and declared in
/// descriptor frontmatter as a status string; both mappings live here so
/// nothing else has to reason about flag combinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureStatus {
    #[default]
    Pending,
    InProgress,
    Passing,
}

impl FeatureStatus {
    /// Decode the persisted flag pair. `passes` wins over `in_progress`.
    pub fn from_flags(passes: bool, in_progress: bool) -> Self {
        match (passes, in_progress) {
            (true, _) => FeatureStatus::Passing,
            (false, true) => FeatureStatus::InProgress,
            (false, false) => FeatureStatus::Pending,
        }
    }

    /// `(passes, in_progress)`
    pub fn flags(self) -> (bool, bool) {
        match self {
            FeatureStatus::Pending => (false, false),
            FeatureStatus::InProgress => (false, true),
            FeatureStatus::Passing => (true, false),
        }
    }

    /// Map a descriptor `status` value. Unknown values are pending.
    pub fn from_spec_status(status: &str) -> Self {
        match status.trim() {
            "passing" => FeatureStatus::Passing,
            "in_progress" => FeatureStatus::InProgress,
            _ => FeatureStatus::Pending,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FeatureStatus::Pending => "pending",
            FeatureStatus::InProgress => "in_progress",
            FeatureStatus::Passing => "passing",
        }
    }

    pub fn passes(self) -> bool {
        self == FeatureStatus::Passing
    }

    pub fn in_progress(self) -> bool {
        self == FeatureStatus::InProgress
    }
}

impl fmt::Display for FeatureStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
