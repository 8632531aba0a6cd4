//! Project lifecycle: open the store once, seed it, hand it to the queue
//! and the reconciler, and flush it on close.

use crate::api::FeatureApi;
use crate::config::BacklogConfig;
use crate::error::{ApiError, StorageError};
use crate::queue::FeatureQueue;
use crate::store::SledFeatureStore;
use crate::sync::SpecReconciler;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// An opened project directory.
pub struct Project {
    root: PathBuf,
    config: BacklogConfig,
    store: Arc<SledFeatureStore>,
    api: FeatureApi,
    seeded: usize,
}

impl Project {
    /// Open the store under `root` and, if it is empty, seed it from the
    /// descriptor directory.
    pub fn open(root: &Path, config: BacklogConfig) -> Result<Self, ApiError> {
        config.ensure_valid()?;
        std::fs::create_dir_all(root).map_err(StorageError::from)?;
        let root = dunce::canonicalize(root).map_err(StorageError::from)?;
        info!(project = %root.display(), "Opening project");

        let store_path = config.storage.resolve(&root);
        let store = Arc::new(SledFeatureStore::new(&store_path)?);
        let queue = Arc::new(FeatureQueue::from_seed(
            store.clone(),
            config.queue.regression_seed,
        ));
        let reconciler = Arc::new(SpecReconciler::new(store.clone()));
        let specs_dir = config.specs.resolve(&root);

        let seeded = reconciler.seed_from_dir(&specs_dir)?;
        debug!(store = %store_path.display(), seeded, "Project ready");

        Ok(Self {
            api: FeatureApi::new(queue, reconciler, specs_dir),
            root,
            config,
            store,
            seeded,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &BacklogConfig {
        &self.config
    }

    pub fn api(&self) -> &FeatureApi {
        &self.api
    }

    pub fn store(&self) -> &Arc<SledFeatureStore> {
        &self.store
    }

    /// Features inserted by the empty-store seed during `open`.
    pub fn seeded(&self) -> usize {
        self.seeded
    }

    /// Flush outstanding writes and release the store.
    pub fn close(self) -> Result<(), ApiError> {
        self.store.flush()?;
        info!(project = %self.root.display(), "Project closed, store flushed");
        Ok(())
    }
}
