//! Layered configuration loading.

use super::merge::merge_policy;
use super::sources::{environment, global_file, workspace_file};
use super::BacklogConfig;
use crate::error::ApiError;
use config::{ConfigError, File};
use std::path::{Path, PathBuf};
use tracing::info;

/// Loads [`BacklogConfig`] from defaults, the global file, the project
/// files and the environment, in that order of increasing precedence.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for the project rooted at `project_root`.
    pub fn load(project_root: &Path) -> Result<BacklogConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, project_root)?;
        let builder = environment::add_to_builder(builder);
        builder.build()?.try_deserialize()
    }

    /// Load configuration from one explicit file over the defaults.
    pub fn load_from_file(path: &Path) -> Result<BacklogConfig, ConfigError> {
        merge_policy::builder_with_defaults()?
            .add_source(File::from(path).required(true))
            .build()?
            .try_deserialize()
    }

    /// Built-in defaults only.
    pub fn default() -> BacklogConfig {
        BacklogConfig::default()
    }

    pub fn xdg_config_path() -> Option<PathBuf> {
        global_file::global_config_path()
    }

    /// Write a default `backlog.toml` into `project_root`.
    ///
    /// An existing file is left untouched; returns whether one was written.
    pub fn write_default(project_root: &Path) -> Result<bool, ApiError> {
        let path = workspace_file::project_config_path(project_root);
        if path.exists() {
            return Ok(false);
        }
        let contents = toml::to_string_pretty(&BacklogConfig::default())
            .map_err(|e| ApiError::Config(format!("Failed to render default config: {}", e)))?;
        std::fs::create_dir_all(project_root).map_err(|e| {
            ApiError::Config(format!("Failed to create {}: {}", project_root.display(), e))
        })?;
        std::fs::write(&path, contents).map_err(|e| {
            ApiError::Config(format!("Failed to write {}: {}", path.display(), e))
        })?;
        info!(path = %path.display(), "Wrote default configuration");
        Ok(true)
    }
}
