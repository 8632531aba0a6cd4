//! Merge rules: defaults, override order, conflict handling.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

pub const DEFAULT_STORE_PATH: &str = ".backlog/store";
pub const DEFAULT_SPECS_DIR: &str = "specs";

/// Create a Config builder with merge policy defaults applied.
///
/// Later sources override earlier ones key by key, so a project file that
/// only sets `specs.dir` keeps the global `storage.store_path`.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("storage.store_path", DEFAULT_STORE_PATH)?
        .set_default("specs.dir", DEFAULT_SPECS_DIR)
}
