//! Integration tests for the queue engine through the feature API

use backlog::error::ApiError;
use backlog::queue::BulkFeature;
use backlog::types::FeatureStatus;

use crate::integration::{bulk_items, test_api};

#[test]
fn test_empty_create_pass_exhaust() {
    let (_dir, _store, api) = test_api();

    let stats = api.stats().unwrap();
    assert_eq!(stats.total, 0);
    assert_eq!(stats.percentage, 0.0);
    assert!(matches!(api.get_next(), Err(ApiError::NoPendingFeatures)));

    let outcome = api.create_bulk(&bulk_items(&["Login"])).unwrap();
    assert_eq!(outcome.created, 1);

    let next = api.get_next().unwrap();
    assert_eq!(next.name, "Login");
    assert_eq!(next.priority, 1);
    assert!(!next.passes);

    api.mark_passing(next.id).unwrap();
    let stats = api.stats().unwrap();
    assert_eq!(stats.total, 1);
    assert_eq!(stats.passing, 1);
    assert_eq!(stats.remaining, 0);
    assert_eq!(stats.percentage, 100.0);

    let err = api.get_next().unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "All features are passing! No more work to do.");
}

#[test]
fn test_bulk_appends_behind_existing_features() {
    let (_dir, _store, api) = test_api();

    api.create_bulk(&bulk_items(&["a", "b"])).unwrap();
    api.create_bulk(&bulk_items(&["c", "d", "e"])).unwrap();

    let board = api.list().unwrap();
    let priorities: Vec<i64> = board.pending.iter().map(|f| f.priority).collect();
    assert_eq!(priorities, vec![1, 2, 3, 4, 5]);
    let names: Vec<&str> = board.pending.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b", "c", "d", "e"]);
}

#[test]
fn test_bulk_validation_is_all_or_nothing() {
    let (_dir, _store, api) = test_api();

    let mut items = bulk_items(&["ok", "also ok"]);
    items.push(BulkFeature::new("functional", "", "desc", vec![]));

    match api.create_bulk(&items) {
        Err(ApiError::Validation { index, missing }) => {
            assert_eq!(index, 2);
            assert_eq!(missing, vec!["name".to_string(), "steps".to_string()]);
        }
        other => panic!("expected validation error, got {:?}", other),
    }
    assert_eq!(api.stats().unwrap().total, 0);

    assert_eq!(api.create_bulk(&[]).unwrap().created, 0);
}

#[test]
fn test_skip_moves_feature_to_the_back() {
    let (_dir, _store, api) = test_api();
    api.create_bulk(&bulk_items(&["first", "second", "third"])).unwrap();

    let first = api.get_next().unwrap();
    api.mark_in_progress(first.id).unwrap();

    let outcome = api.skip(first.id).unwrap();
    assert_eq!(outcome.old_priority, 1);
    assert_eq!(outcome.new_priority, 4);
    assert_eq!(outcome.name, "first");

    let skipped = api.get(first.id).unwrap();
    assert_eq!(skipped.status(), FeatureStatus::Pending);
    assert_eq!(api.get_next().unwrap().name, "second");

    // Skipping again keeps pushing it back.
    assert_eq!(api.skip(first.id).unwrap().new_priority, 5);
}

#[test]
fn test_skip_passing_feature_is_rejected() {
    let (_dir, _store, api) = test_api();
    api.create_bulk(&bulk_items(&["done"])).unwrap();
    let id = api.get_next().unwrap().id;
    api.mark_passing(id).unwrap();

    assert!(matches!(api.skip(id), Err(ApiError::AlreadyPassing(x)) if x == id));
    assert_eq!(api.get(id).unwrap().priority, 1);
}

#[test]
fn test_claim_and_release() {
    let (_dir, _store, api) = test_api();
    api.create_bulk(&bulk_items(&["work"])).unwrap();
    let id = api.get_next().unwrap().id;

    let claimed = api.mark_in_progress(id).unwrap();
    assert!(claimed.in_progress);
    assert_eq!(api.stats().unwrap().in_progress, 1);

    let err = api.mark_in_progress(id).unwrap_err();
    assert_eq!(err.kind(), "already_in_progress");

    // An in-progress feature is still offered as next.
    assert_eq!(api.get_next().unwrap().id, id);

    let released = api.clear_in_progress(id).unwrap();
    assert!(!released.in_progress);
    assert!(!api.clear_in_progress(id).unwrap().in_progress);

    api.mark_passing(id).unwrap();
    let err = api.mark_in_progress(id).unwrap_err();
    assert!(matches!(err, ApiError::AlreadyPassing(_)));
}

#[test]
fn test_mark_passing_clears_claim_and_is_idempotent() {
    let (_dir, _store, api) = test_api();
    api.create_bulk(&bulk_items(&["x"])).unwrap();
    let id = api.get_next().unwrap().id;

    api.mark_in_progress(id).unwrap();
    let passed = api.mark_passing(id).unwrap();
    assert!(passed.passes);
    assert!(!passed.in_progress);

    let again = api.mark_passing(id).unwrap();
    assert_eq!(again, passed);
    assert_eq!(api.stats().unwrap().passing, 1);
    assert_eq!(api.stats().unwrap().in_progress, 0);
}

#[test]
fn test_unknown_id_is_not_found() {
    let (_dir, _store, api) = test_api();

    for result in [
        api.get(7).map(|_| ()),
        api.mark_passing(7).map(|_| ()),
        api.skip(7).map(|_| ()),
        api.mark_in_progress(7).map(|_| ()),
        api.clear_in_progress(7).map(|_| ()),
    ] {
        match result {
            Err(ApiError::NotFound(id)) => assert_eq!(id, 7),
            other => panic!("expected not found, got {:?}", other),
        }
    }
}

#[test]
fn test_regression_samples_passing_only() {
    let (_dir, _store, api) = test_api();
    assert!(api.get_regression(None).unwrap().is_empty());

    api.create_bulk(&bulk_items(&["a", "b", "c", "d", "e", "f"])).unwrap();
    let board = api.list().unwrap();
    for feature in board.pending.iter().take(4) {
        api.mark_passing(feature.id).unwrap();
    }

    let sample = api.get_regression(None).unwrap();
    assert_eq!(sample.len(), 3);
    assert!(sample.iter().all(|f| f.passes));

    let mut ids: Vec<u64> = sample.iter().map(|f| f.id).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 3);

    assert_eq!(api.get_regression(Some(50)).unwrap().len(), 4);
    assert_eq!(api.get_regression(Some(0)).unwrap().len(), 1);
}

#[test]
fn test_board_groups_statuses() {
    let (_dir, _store, api) = test_api();
    api.create_bulk(&bulk_items(&["p", "w", "d"])).unwrap();
    let ids: Vec<u64> = api.list().unwrap().pending.iter().map(|f| f.id).collect();

    api.mark_in_progress(ids[1]).unwrap();
    api.mark_passing(ids[2]).unwrap();

    let board = api.list().unwrap();
    assert_eq!(board.pending.len(), 1);
    assert_eq!(board.in_progress.len(), 1);
    assert_eq!(board.done.len(), 1);
    assert_eq!(board.in_progress[0].name, "w");
    assert_eq!(board.done[0].name, "d");
}
