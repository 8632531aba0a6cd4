//! CLI domain: parse, route, help, output, and presentation only.
//! No domain orchestration; single route table dispatches to domain services.

mod help;
mod output;
mod parse;
mod presentation;
mod route;

pub use help::{command_name, opens_store};
pub use output::map_error;
pub use parse::{Cli, Commands};
pub use presentation::{
    format_board_text, format_bulk_text, format_feature_markdown, format_feature_text,
    format_init_summary, format_next_text, format_regression_text, format_skip_text,
    format_stats_text, format_sync_text, format_transition_text,
};
pub use route::{read_bulk_input, serve_rpc, RunContext};
