//! CLI parse: clap types for Backlog. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Backlog CLI - Persistent feature work-queue
#[derive(Parser, Debug)]
#[command(name = "backlog")]
#[command(about = "Prioritized feature work-queue reconciled against markdown specs")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Project root directory
    #[arg(long, default_value = ".")]
    pub project: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (default: off)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(long, default_value = "false", conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a default backlog.toml and create the specs directory
    Init,
    /// Show completion progress
    Stats {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Show the highest-priority feature that is not passing
    Next {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// List every feature grouped by status
    List {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Show one feature
    Show {
        /// Feature ID
        id: u64,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Pick random passing features for regression testing
    Regression {
        /// Number of features to return (1-10)
        #[arg(long)]
        limit: Option<usize>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Mark a feature as passing
    Pass {
        /// Feature ID
        id: u64,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Move a feature to the end of the queue
    Skip {
        /// Feature ID
        id: u64,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Mark a feature as in progress
    Claim {
        /// Feature ID
        id: u64,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Clear the in-progress flag of a feature
    Release {
        /// Feature ID
        id: u64,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Create features from a JSON array of {category, name, description, steps}
    CreateBulk {
        /// JSON file, or "-" for stdin
        input: PathBuf,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Merge the specs directory into the queue without losing progress
    Sync {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Serve JSON requests, one per line, from stdin
    Rpc,
}
