//! Property-based tests for queue ordering, bulk creation, skipping and
//! reconciliation

use backlog::api::FeatureApi;
use backlog::queue::{BulkFeature, FeatureQueue};
use backlog::store::SledFeatureStore;
use backlog::sync::SpecReconciler;
use std::sync::Arc;
use tempfile::TempDir;

mod skip;
mod sync_idempotence;

/// Fresh API over a temp store; `specs/` under the temp dir is the
/// descriptor directory.
pub fn fresh_api(seed: u64) -> (TempDir, FeatureApi) {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(SledFeatureStore::new(temp_dir.path().join("store")).unwrap());
    let queue = Arc::new(FeatureQueue::with_seed(store.clone(), seed));
    let reconciler = Arc::new(SpecReconciler::new(store));
    let api = FeatureApi::new(queue, reconciler, temp_dir.path().join("specs"));
    (temp_dir, api)
}

pub fn named_items(count: usize, prefix: &str) -> Vec<BulkFeature> {
    (0..count)
        .map(|i| {
            BulkFeature::new(
                "functional",
                format!("{}-{}", prefix, i),
                "generated",
                vec!["check".to_string()],
            )
        })
        .collect()
}
