//! Integration tests for layered configuration loading

use backlog::config::{BacklogConfig, ConfigLoader, PROJECT_CONFIG_FILE};
use backlog::error::ApiError;
use backlog::project::Project;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use crate::integration::{spec_markdown, with_isolated_env, write_spec};

fn write_global_config(test_dir: &TempDir, contents: &str) -> PathBuf {
    let path = test_dir.path().join("xdg").join("backlog").join("config.toml");
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_defaults_without_any_file() {
    let test_dir = TempDir::new().unwrap();
    let project = TempDir::new().unwrap();
    with_isolated_env(&test_dir, || {
        let config = ConfigLoader::load(project.path()).unwrap();
        assert_eq!(config, BacklogConfig::default());
    });
}

#[test]
fn test_global_config_from_xdg_config_home() {
    let test_dir = TempDir::new().unwrap();
    let project = TempDir::new().unwrap();
    with_isolated_env(&test_dir, || {
        let written = write_global_config(
            &test_dir,
            "[storage]\nstore_path = \"/var/lib/backlog\"\n\n[logging]\nlevel = \"debug\"\n",
        );
        assert_eq!(ConfigLoader::xdg_config_path(), Some(written));

        let config = ConfigLoader::load(project.path()).unwrap();
        assert_eq!(config.storage.store_path, PathBuf::from("/var/lib/backlog"));
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.specs.dir, PathBuf::from("specs"));
    });
}

#[test]
fn test_precedence_global_project_env_file_environment() {
    let test_dir = TempDir::new().unwrap();
    let project = TempDir::new().unwrap();
    with_isolated_env(&test_dir, || {
        write_global_config(
            &test_dir,
            "[storage]\nstore_path = \"global-store\"\n\n[specs]\ndir = \"global-specs\"\n\n[queue]\nregression_seed = 1\n",
        );
        fs::write(
            project.path().join(PROJECT_CONFIG_FILE),
            "[specs]\ndir = \"project-specs\"\n\n[queue]\nregression_seed = 2\n",
        )
        .unwrap();
        fs::write(
            project.path().join("backlog.ci.toml"),
            "[queue]\nregression_seed = 3\n",
        )
        .unwrap();

        // Without BACKLOG_ENV the development file is consulted, and it is absent.
        let config = ConfigLoader::load(project.path()).unwrap();
        assert_eq!(config.storage.store_path, PathBuf::from("global-store"));
        assert_eq!(config.specs.dir, PathBuf::from("project-specs"));
        assert_eq!(config.queue.regression_seed, Some(2));

        std::env::set_var("BACKLOG_ENV", "ci");
        let config = ConfigLoader::load(project.path()).unwrap();
        assert_eq!(config.queue.regression_seed, Some(3));
        assert_eq!(config.specs.dir, PathBuf::from("project-specs"));

        std::env::set_var("BACKLOG__SPECS__DIR", "env-specs");
        let config = ConfigLoader::load(project.path()).unwrap();
        assert_eq!(config.specs.dir, PathBuf::from("env-specs"));
        assert_eq!(config.storage.store_path, PathBuf::from("global-store"));
    });
}

#[test]
fn test_explicit_file_skips_other_layers() {
    let test_dir = TempDir::new().unwrap();
    let project = TempDir::new().unwrap();
    with_isolated_env(&test_dir, || {
        write_global_config(&test_dir, "[specs]\ndir = \"global-specs\"\n");
        let explicit = project.path().join("custom.toml");
        fs::write(&explicit, "[storage]\nstore_path = \"custom-store\"\n").unwrap();

        let config = ConfigLoader::load_from_file(&explicit).unwrap();
        assert_eq!(config.storage.store_path, PathBuf::from("custom-store"));
        assert_eq!(config.specs.dir, PathBuf::from("specs"));
    });
}

#[test]
fn test_malformed_project_file_is_an_error() {
    let test_dir = TempDir::new().unwrap();
    let project = TempDir::new().unwrap();
    with_isolated_env(&test_dir, || {
        fs::write(project.path().join(PROJECT_CONFIG_FILE), "[specs\ndir = ").unwrap();
        let err: ApiError = ConfigLoader::load(project.path()).unwrap_err().into();
        assert_eq!(err.kind(), "config");
    });
}

#[test]
fn test_written_default_round_trips() {
    let test_dir = TempDir::new().unwrap();
    let project = TempDir::new().unwrap();
    with_isolated_env(&test_dir, || {
        assert!(ConfigLoader::write_default(project.path()).unwrap());
        assert!(!ConfigLoader::write_default(project.path()).unwrap());

        let config = ConfigLoader::load(project.path()).unwrap();
        assert_eq!(config, BacklogConfig::default());
    });
}

#[test]
fn test_loaded_config_drives_project_layout() {
    let test_dir = TempDir::new().unwrap();
    let project = TempDir::new().unwrap();
    with_isolated_env(&test_dir, || {
        fs::write(
            project.path().join(PROJECT_CONFIG_FILE),
            "[specs]\ndir = \"features\"\n\n[storage]\nstore_path = \"db\"\n",
        )
        .unwrap();
        write_spec(
            &project.path().join("features"),
            "a.md",
            &spec_markdown("Alpha", 1, "first", &["a"]),
        );

        let config = ConfigLoader::load(project.path()).unwrap();
        let opened = Project::open(project.path(), config).unwrap();
        assert_eq!(opened.seeded(), 1);
        opened.close().unwrap();
        assert!(project.path().join("db").is_dir());
    });
}
