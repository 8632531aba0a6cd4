//! Project initialization for `backlog init`: a default `backlog.toml`, the
//! descriptor directory and, when that directory is new, one example
//! descriptor.

use crate::config::{BacklogConfig, ConfigLoader, PROJECT_CONFIG_FILE};
use crate::error::ApiError;
use std::path::Path;

const EXAMPLE_SPEC_FILE: &str = "example-feature.md";

const EXAMPLE_SPEC: &str = "---
category: functional
priority: 1
status: pending
---

# Example Feature

Describe what the feature does here.

## Acceptance Criteria
- The feature behaves as described

## Test Steps
1. Open the application
2. Exercise the feature
3. Verify the expected result
";

/// What `init` did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitSummary {
    pub created: Vec<String>,
    pub skipped: Vec<String>,
}

/// Create the project skeleton under `project_root`. Existing files are
/// never overwritten.
pub fn initialize_project(
    project_root: &Path,
    config: &BacklogConfig,
) -> Result<InitSummary, ApiError> {
    let mut summary = InitSummary::default();

    if ConfigLoader::write_default(project_root)? {
        summary.created.push(PROJECT_CONFIG_FILE.to_string());
    } else {
        summary.skipped.push(PROJECT_CONFIG_FILE.to_string());
    }

    let specs_dir = config.specs.resolve(project_root);
    let specs_label = specs_dir.display().to_string();
    if specs_dir.is_dir() {
        summary.skipped.push(specs_label);
        return Ok(summary);
    }

    std::fs::create_dir_all(&specs_dir)
        .map_err(|e| ApiError::Config(format!("Failed to create {}: {}", specs_label, e)))?;
    summary.created.push(specs_label);

    let example = specs_dir.join(EXAMPLE_SPEC_FILE);
    std::fs::write(&example, EXAMPLE_SPEC).map_err(|e| {
        ApiError::Config(format!("Failed to write {}: {}", example.display(), e))
    })?;
    summary.created.push(example.display().to_string());

    Ok(summary)
}
