//! Integration tests for CLI parsing and command routing

use backlog::cli::{map_error, Cli, Commands, RunContext};
use backlog::error::ApiError;
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use crate::integration::{spec_markdown, with_isolated_env, write_spec};

fn run(ctx: &RunContext, args: &[&str]) -> Result<String, ApiError> {
    let mut argv = vec!["backlog"];
    argv.extend_from_slice(args);
    let cli = Cli::try_parse_from(argv).unwrap();
    ctx.execute(&cli.command)
}

#[test]
fn test_parse_global_flags_and_subcommands() {
    let cli = Cli::try_parse_from([
        "backlog",
        "--project",
        "/tmp/proj",
        "--log-level",
        "debug",
        "regression",
        "--limit",
        "5",
        "--format",
        "json",
    ])
    .unwrap();
    assert_eq!(cli.project, PathBuf::from("/tmp/proj"));
    assert_eq!(cli.log_level.as_deref(), Some("debug"));
    match cli.command {
        Commands::Regression { limit, format } => {
            assert_eq!(limit, Some(5));
            assert_eq!(format, "json");
        }
        other => panic!("unexpected command {:?}", other),
    }

    let cli = Cli::try_parse_from(["backlog", "create-bulk", "-"]).unwrap();
    assert!(matches!(cli.command, Commands::CreateBulk { ref input, .. } if input == &PathBuf::from("-")));

    assert!(Cli::try_parse_from(["backlog", "pass"]).is_err());
    assert!(Cli::try_parse_from(["backlog", "--verbose", "--quiet", "stats"]).is_err());
}

#[test]
fn test_init_then_work_through_the_queue() {
    let test_dir = TempDir::new().unwrap();
    let project = TempDir::new().unwrap();
    with_isolated_env(&test_dir, || {
        let ctx = RunContext::new(project.path().to_path_buf(), None).unwrap();

        let init = run(&ctx, &["init"]).unwrap();
        assert!(init.contains("backlog.toml"));
        assert!(project.path().join("backlog.toml").is_file());
        assert!(project.path().join("specs").join("example-feature.md").is_file());

        write_spec(
            &project.path().join("specs"),
            "login.md",
            &spec_markdown("Login", 0, "users log in", &["open", "submit"]),
        );

        // First store-opening command seeds both descriptors.
        let stats = run(&ctx, &["stats"]).unwrap();
        assert!(stats.contains("Passing: 0/2"));

        let next: serde_json::Value =
            serde_json::from_str(&run(&ctx, &["next", "--format", "json"]).unwrap()).unwrap();
        assert_eq!(next["feature"]["name"], "Login");
        let id = next["feature"]["id"].as_u64().unwrap().to_string();

        run(&ctx, &["claim", &id]).unwrap();
        let err = run(&ctx, &["claim", &id]).unwrap_err();
        assert!(map_error(&err).starts_with("**Error:**"));

        let passed = run(&ctx, &["pass", &id]).unwrap();
        assert!(passed.contains("Login"));

        let stats: serde_json::Value =
            serde_json::from_str(&run(&ctx, &["stats", "--format", "json"]).unwrap()).unwrap();
        assert_eq!(stats["passing"], 1);
        assert_eq!(stats["percentage"], 50.0);

        let sync = run(&ctx, &["sync"]).unwrap();
        assert!(sync.contains("Unchanged: 2"));
    });
}

#[test]
fn test_create_bulk_from_file() {
    let test_dir = TempDir::new().unwrap();
    let project = TempDir::new().unwrap();
    with_isolated_env(&test_dir, || {
        let ctx = RunContext::new(project.path().to_path_buf(), None).unwrap();
        let input = project.path().join("batch.json");
        fs::write(
            &input,
            r#"{"features": [
                {"category": "ui", "name": "Dark mode", "description": "theme", "steps": ["toggle"]},
                {"category": "ui", "name": "Font size", "description": "a11y", "steps": ["resize"]}
            ]}"#,
        )
        .unwrap();

        let out = run(&ctx, &["create-bulk", input.to_str().unwrap()]).unwrap();
        assert_eq!(out, "Created 2 features");

        let skip = run(&ctx, &["skip", "1"]).unwrap();
        assert!(skip.contains("New priority: 3"));

        let list = run(&ctx, &["list", "--format", "json"]).unwrap();
        let board: serde_json::Value = serde_json::from_str(&list).unwrap();
        assert_eq!(board["pending"][0]["name"], "Font size");
        assert_eq!(board["pending"][1]["name"], "Dark mode");
    });
}

#[test]
fn test_invalid_explicit_config_path_fails() {
    let project = TempDir::new().unwrap();
    let missing = project.path().join("nope.toml");
    let err = RunContext::new(project.path().to_path_buf(), Some(missing)).err().unwrap();
    assert_eq!(err.kind(), "config");
    assert!(map_error(&err).starts_with("Error:"));
}

#[test]
fn test_malformed_bulk_file_is_invalid_request() {
    let test_dir = TempDir::new().unwrap();
    let project = TempDir::new().unwrap();
    with_isolated_env(&test_dir, || {
        let ctx = RunContext::new(project.path().to_path_buf(), None).unwrap();
        let input = project.path().join("batch.json");
        fs::write(&input, r#"{"features": [{"name": "unterminated""#).unwrap();

        let err = run(&ctx, &["create-bulk", input.to_str().unwrap()]).unwrap_err();
        assert_eq!(err.kind(), "invalid_request");
        assert!(map_error(&err).starts_with("**Error:** Invalid request: bulk input:"));

        let stats = run(&ctx, &["stats"]).unwrap();
        assert!(stats.contains("Passing: 0/0"));
    });
}
