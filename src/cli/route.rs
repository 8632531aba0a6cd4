//! CLI route: single route table and run context. Dispatches to domain services and presentation.

use crate::api::FeatureApi;
use crate::cli::parse::Commands;
use crate::cli::presentation::{
    format_board_text, format_bulk_text, format_feature_text, format_init_summary,
    format_next_text, format_regression_text, format_skip_text, format_stats_text,
    format_sync_text, format_transition_text, is_json, to_json,
};
use crate::cli::{command_name, opens_store};
use crate::config::{BacklogConfig, ConfigLoader};
use crate::error::{ApiError, StorageError};
use crate::init::initialize_project;
use crate::project::Project;
use crate::queue::BulkFeature;
use serde::Deserialize;
use std::io::{BufRead, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Runtime context for CLI execution: project root and loaded configuration.
/// Built from the project path and optional config path using ConfigLoader only.
pub struct RunContext {
    project_root: PathBuf,
    config: BacklogConfig,
}

impl RunContext {
    /// Create run context from project root and optional config path.
    pub fn new(project_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = if let Some(ref cfg_path) = config_path {
            ConfigLoader::load_from_file(cfg_path)?
        } else {
            ConfigLoader::load(&project_root)?
        };
        config.ensure_valid()?;
        Ok(Self {
            project_root,
            config,
        })
    }

    pub fn config(&self) -> &BacklogConfig {
        &self.config
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        debug!(command = command_name(command), "Executing command");
        if !opens_store(command) {
            let summary = initialize_project(&self.project_root, &self.config)?;
            return Ok(format_init_summary(&summary));
        }

        let project = Project::open(&self.project_root, self.config.clone())?;
        if project.seeded() > 0 {
            info!(count = project.seeded(), "Seeded empty store from specs");
        }
        let result = execute_on(project.api(), command);
        project.close()?;
        result
    }
}

fn execute_on(api: &FeatureApi, command: &Commands) -> Result<String, ApiError> {
    match command {
        Commands::Init => Ok(String::new()),
        Commands::Stats { format } => {
            let stats = api.stats()?;
            if is_json(format) {
                to_json(&stats)
            } else {
                Ok(format_stats_text(&stats))
            }
        }
        Commands::Next { format } => {
            let next = api.next_with_spec()?;
            if is_json(format) {
                to_json(&next)
            } else {
                Ok(format_next_text(&next))
            }
        }
        Commands::List { format } => {
            let board = api.list()?;
            if is_json(format) {
                to_json(&board)
            } else {
                Ok(format_board_text(&board))
            }
        }
        Commands::Show { id, format } => {
            let feature = api.get(*id)?;
            if is_json(format) {
                to_json(&feature)
            } else {
                Ok(format_feature_text(&feature))
            }
        }
        Commands::Regression { limit, format } => {
            let features = api.get_regression(*limit)?;
            if is_json(format) {
                to_json(&features)
            } else {
                Ok(format_regression_text(&features))
            }
        }
        Commands::Pass { id, format } => {
            let feature = api.mark_passing(*id)?;
            if is_json(format) {
                to_json(&feature)
            } else {
                Ok(format_transition_text("Feature marked passing", &feature))
            }
        }
        Commands::Skip { id, format } => {
            let outcome = api.skip(*id)?;
            if is_json(format) {
                to_json(&outcome)
            } else {
                Ok(format_skip_text(&outcome))
            }
        }
        Commands::Claim { id, format } => {
            let feature = api.mark_in_progress(*id)?;
            if is_json(format) {
                to_json(&feature)
            } else {
                Ok(format_transition_text("Feature marked in-progress", &feature))
            }
        }
        Commands::Release { id, format } => {
            let feature = api.clear_in_progress(*id)?;
            if is_json(format) {
                to_json(&feature)
            } else {
                Ok(format!(
                    "{} - returned to pending",
                    format_transition_text("In-progress cleared", &feature)
                ))
            }
        }
        Commands::CreateBulk { input, format } => {
            let items = read_bulk_input(input)?;
            let outcome = api.create_bulk(&items)?;
            if is_json(format) {
                to_json(&outcome)
            } else {
                Ok(format_bulk_text(&outcome))
            }
        }
        Commands::Sync { format } => {
            let report = api.sync_from_specs()?;
            if is_json(format) {
                to_json(&report)
            } else {
                Ok(format_sync_text(&report))
            }
        }
        Commands::Rpc => {
            let stdin = std::io::stdin();
            let stdout = std::io::stdout();
            let served = serve_rpc(api, stdin.lock(), stdout.lock())?;
            info!(requests = served, "RPC session finished");
            Ok(String::new())
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BulkInput {
    List(Vec<BulkFeature>),
    Wrapped { features: Vec<BulkFeature> },
}

/// Read a bulk-create batch from a JSON file, or stdin for `-`. Accepts a
/// bare array or an object with a `features` array.
pub fn read_bulk_input(input: &Path) -> Result<Vec<BulkFeature>, ApiError> {
    let mut raw = String::new();
    if input == Path::new("-") {
        std::io::stdin()
            .read_to_string(&mut raw)
            .map_err(StorageError::from)?;
    } else {
        raw = std::fs::read_to_string(input).map_err(StorageError::from)?;
    }
    parse_bulk_input(&raw)
}

fn parse_bulk_input(raw: &str) -> Result<Vec<BulkFeature>, ApiError> {
    let parsed: BulkInput = serde_json::from_str(raw)
        .map_err(|e| ApiError::InvalidRequest(format!("bulk input: {}", e)))?;
    Ok(match parsed {
        BulkInput::List(items) => items,
        BulkInput::Wrapped { features } => features,
    })
}

/// Answer one JSON request per input line with one JSON line. Blank lines
/// are ignored. Returns the number of requests served.
pub fn serve_rpc<R: BufRead, W: Write>(
    api: &FeatureApi,
    reader: R,
    mut writer: W,
) -> Result<usize, ApiError> {
    let mut served = 0;
    for line in reader.lines() {
        let line = line.map_err(StorageError::from)?;
        if line.trim().is_empty() {
            continue;
        }
        let reply = api.handle_json(&line);
        writeln!(writer, "{}", reply).map_err(StorageError::from)?;
        writer.flush().map_err(StorageError::from)?;
        served += 1;
    }
    Ok(served)
}
