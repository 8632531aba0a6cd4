//! Bulk-create input and its validation.

use crate::error::ApiError;
use crate::store::NewFeature;
use crate::types::{FeatureStatus, Priority};
use serde::{Deserialize, Serialize};

/// One item of a `create_bulk` batch.
///
/// Every field defaults when absent so that a missing key surfaces as a
/// validation error naming the field rather than a decode failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkFeature {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub steps: Vec<String>,
}

impl BulkFeature {
    pub fn new(
        category: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        steps: Vec<String>,
    ) -> Self {
        Self {
            category: category.into(),
            name: name.into(),
            description: description.into(),
            steps,
        }
    }

    /// Names of required fields that are blank.
    pub fn missing_fields(&self) -> Vec<String> {
        let mut missing = Vec::new();
        for (field, value) in [
            ("category", &self.category),
            ("name", &self.name),
            ("description", &self.description),
        ] {
            if value.trim().is_empty() {
                missing.push(field.to_string());
            }
        }
        if self.steps.iter().all(|s| s.trim().is_empty()) {
            missing.push("steps".to_string());
        }
        missing
    }

    pub(crate) fn into_new_feature(self, priority: Priority) -> NewFeature {
        NewFeature {
            priority,
            category: self.category,
            name: self.name,
            description: self.description,
            steps: self.steps,
            status: FeatureStatus::Pending,
        }
    }
}

/// Reject the batch at its first invalid item.
pub fn validate_batch(items: &[BulkFeature]) -> Result<(), ApiError> {
    for (index, item) in items.iter().enumerate() {
        let missing = item.missing_fields();
        if !missing.is_empty() {
            return Err(ApiError::Validation { index, missing });
        }
    }
    Ok(())
}
