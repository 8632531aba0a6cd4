//! Integration tests for project initialization

use backlog::cli::format_init_summary;
use backlog::config::{BacklogConfig, PROJECT_CONFIG_FILE};
use backlog::init::initialize_project;
use std::fs;
use tempfile::TempDir;

use crate::integration::open_project;

#[test]
fn test_init_creates_skeleton_and_seeds_example() {
    let temp_dir = TempDir::new().unwrap();
    let summary = initialize_project(temp_dir.path(), &BacklogConfig::default()).unwrap();

    assert_eq!(summary.created.len(), 3);
    assert!(summary.created.contains(&PROJECT_CONFIG_FILE.to_string()));
    assert!(temp_dir.path().join("specs/example-feature.md").is_file());

    let project = open_project(temp_dir.path());
    assert_eq!(project.seeded(), 1);
    let next = project.api().next_with_spec().unwrap();
    assert_eq!(next.feature.name, "Example Feature");
    assert!(next.spec.is_some());
    project.close().unwrap();
}

#[test]
fn test_init_never_overwrites() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join(PROJECT_CONFIG_FILE);
    fs::write(&config_path, "[specs]\ndir = \"specs\"\n").unwrap();
    fs::create_dir(temp_dir.path().join("specs")).unwrap();

    let summary = initialize_project(temp_dir.path(), &BacklogConfig::default()).unwrap();
    assert!(summary.created.is_empty());
    assert_eq!(summary.skipped.len(), 2);
    assert_eq!(
        fs::read_to_string(&config_path).unwrap(),
        "[specs]\ndir = \"specs\"\n"
    );
    // An existing specs directory gets no example descriptor.
    assert!(!temp_dir.path().join("specs/example-feature.md").exists());

    let text = format_init_summary(&summary);
    assert!(text.contains("already exists, skipped"));
}
