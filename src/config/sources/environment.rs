//! Environment source: `BACKLOG__SECTION__KEY=value`.

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::Environment;

pub const ENV_PREFIX: &str = "BACKLOG";
pub const ENV_SEPARATOR: &str = "__";

/// `BACKLOG__STORAGE__STORE_PATH` overrides `storage.store_path`. Single
/// underscore variables such as `BACKLOG_LOG` are not picked up.
pub fn add_to_builder(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator(ENV_SEPARATOR)
            .separator(ENV_SEPARATOR),
    )
}
