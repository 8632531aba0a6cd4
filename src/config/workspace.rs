//! Project layout settings: where the store and the descriptor files live.

use super::merge::merge_policy::{DEFAULT_SPECS_DIR, DEFAULT_STORE_PATH};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Storage paths
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Store directory, relative to the project root unless absolute
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,
}

fn default_store_path() -> PathBuf {
    PathBuf::from(DEFAULT_STORE_PATH)
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
        }
    }
}

impl StorageConfig {
    pub fn resolve(&self, project_root: &Path) -> PathBuf {
        resolve_under(project_root, &self.store_path)
    }
}

/// Descriptor directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecsConfig {
    #[serde(default = "default_specs_dir")]
    pub dir: PathBuf,
}

fn default_specs_dir() -> PathBuf {
    PathBuf::from(DEFAULT_SPECS_DIR)
}

impl Default for SpecsConfig {
    fn default() -> Self {
        Self {
            dir: default_specs_dir(),
        }
    }
}

impl SpecsConfig {
    pub fn resolve(&self, project_root: &Path) -> PathBuf {
        resolve_under(project_root, &self.dir)
    }
}

fn resolve_under(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}
