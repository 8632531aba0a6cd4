//! CLI presentation: text and json formatters per command family.

mod feature;
mod init;
mod progress;
mod shared;

pub use feature::{
    format_board_text, format_feature_markdown, format_feature_text, format_next_text,
    format_regression_text, format_transition_text,
};
pub use init::format_init_summary;
pub use progress::{format_bulk_text, format_skip_text, format_stats_text, format_sync_text};
pub use shared::{is_json, to_json};
