//! Spec Loader
//!
//! Parses a directory of markdown descriptor files into ephemeral
//! [`SpecRecord`]s. Files are parsed independently; a file that fails is
//! logged, reported as a [`ParseWarning`] and left out of the batch.

pub mod frontmatter;
pub mod markdown;

use crate::error::SpecError;
use crate::store::NewFeature;
use crate::types::{FeatureStatus, Priority};
use frontmatter::{parse_frontmatter, FrontmatterValue};
use markdown::{
    extract_description, extract_list_items, extract_section, extract_title, title_from_stem,
};
use serde::Serialize;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

pub const DEFAULT_CATEGORY: &str = "functional";
pub const DEFAULT_PRIORITY: Priority = 999;

const TEST_STEPS_HEADING: &str = "Test Steps";
const ACCEPTANCE_HEADING: &str = "Acceptance Criteria";

/// One parsed descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpecRecord {
    pub category: String,
    pub priority: Priority,
    pub status: FeatureStatus,
    pub name: String,
    pub description: String,
    pub steps: Vec<String>,
    pub filepath: PathBuf,
}

impl SpecRecord {
    /// Feature row this record seeds, status flags included.
    pub fn to_new_feature(&self) -> NewFeature {
        NewFeature {
            priority: self.priority,
            category: self.category.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            steps: self.steps.clone(),
            status: self.status,
        }
    }
}

/// A descriptor file excluded from a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseWarning {
    pub path: PathBuf,
    pub message: String,
}

/// Result of parsing a descriptor directory.
#[derive(Debug, Clone, Default)]
pub struct SpecBatch {
    /// Sorted by priority; directory order among equal priorities.
    pub records: Vec<SpecRecord>,
    pub warnings: Vec<ParseWarning>,
}

impl SpecBatch {
    /// First record declaring `name`.
    pub fn find_by_name(&self, name: &str) -> Option<&SpecRecord> {
        self.records.iter().find(|r| r.name == name)
    }
}

/// Parse descriptor text. `path` supplies the fallback title and is
/// recorded as the record's `filepath`.
pub fn parse_spec_str(content: &str, path: &Path) -> Result<SpecRecord, SpecError> {
    let (frontmatter, body) = parse_frontmatter(content);
    let (title, body) = extract_title(&body);

    let mut description = extract_description(&body);
    let steps = extract_list_items(&extract_section(&body, TEST_STEPS_HEADING));

    if description.is_empty() {
        let criteria = extract_list_items(&extract_section(&body, ACCEPTANCE_HEADING));
        description = criteria.join("; ");
    }

    let priority = match frontmatter.get("priority") {
        None => DEFAULT_PRIORITY,
        Some(FrontmatterValue::Int(n)) => *n,
        Some(other) => {
            return Err(SpecError::InvalidPriority {
                path: path.to_path_buf(),
                value: other.to_string(),
            })
        }
    };

    // Every stored feature carries at least one step.
    if steps.is_empty() {
        return Err(SpecError::NoTestSteps {
            path: path.to_path_buf(),
        });
    }

    let name = if title.is_empty() {
        let stem = path.file_stem().and_then(OsStr::to_str).unwrap_or_default();
        title_from_stem(stem)
    } else {
        title
    };

    Ok(SpecRecord {
        category: frontmatter
            .text("category")
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
        priority,
        status: frontmatter
            .text("status")
            .map(|s| FeatureStatus::from_spec_status(&s))
            .unwrap_or_default(),
        name,
        description,
        steps,
        filepath: path.to_path_buf(),
    })
}

/// Read and parse one descriptor file.
pub fn parse_spec_file(path: &Path) -> Result<SpecRecord, SpecError> {
    let bytes = std::fs::read(path).map_err(|source| SpecError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let content = String::from_utf8(bytes).map_err(|_| SpecError::InvalidUtf8 {
        path: path.to_path_buf(),
    })?;
    parse_spec_str(&content, path)
}

/// Parse every `*.md` file directly inside `dir`.
///
/// A missing directory yields an empty batch.
pub fn load_specs_dir(dir: &Path) -> SpecBatch {
    let mut batch = SpecBatch::default();
    if !dir.is_dir() {
        debug!(dir = %dir.display(), "Specs directory not found");
        return batch;
    }

    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| dir.to_path_buf());
                warn!(path = %path.display(), error = %e, "Failed to read specs directory entry");
                batch.warnings.push(ParseWarning {
                    path,
                    message: e.to_string(),
                });
                continue;
            }
        };
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension() != Some(OsStr::new("md")) {
            continue;
        }
        match parse_spec_file(path) {
            Ok(record) => batch.records.push(record),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to parse spec file");
                batch.warnings.push(ParseWarning {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                });
            }
        }
    }

    // Stable: file-name order survives among equal priorities.
    batch.records.sort_by_key(|r| r.priority);
    debug!(
        dir = %dir.display(),
        parsed = batch.records.len(),
        skipped = batch.warnings.len(),
        "Loaded specs"
    );
    batch
}
