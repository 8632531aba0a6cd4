//! CLI help and command-name contract for logging and routing.

use crate::cli::parse::Commands;

/// Command name string used in log events (e.g. "create_bulk").
pub fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Init => "init",
        Commands::Stats { .. } => "stats",
        Commands::Next { .. } => "next",
        Commands::List { .. } => "list",
        Commands::Show { .. } => "show",
        Commands::Regression { .. } => "regression",
        Commands::Pass { .. } => "pass",
        Commands::Skip { .. } => "skip",
        Commands::Claim { .. } => "claim",
        Commands::Release { .. } => "release",
        Commands::CreateBulk { .. } => "create_bulk",
        Commands::Sync { .. } => "sync",
        Commands::Rpc => "rpc",
    }
}

/// Whether the command needs the feature store opened.
pub fn opens_store(command: &Commands) -> bool {
    !matches!(command, Commands::Init)
}
