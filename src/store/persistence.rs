//! Persistence layer for the Feature Store

use crate::error::StorageError;
use crate::store::keys::{decode_id, decode_schedule_key, id_key};
use crate::store::txn::{FeatureTxn, ScheduleTxn, StoreCounts, TxResult, COUNTS_KEY};
use crate::store::Feature;
use crate::types::{FeatureId, FeatureStatus, Priority};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use sled::transaction::TransactionError;
use sled::{Db, Transactional, Tree};
use std::io;
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

const TREE_FEATURES: &str = "features";
const TREE_SCHEDULE: &str = "schedule";
const TREE_PENDING: &str = "pending";
const TREE_PASSING: &str = "passing";
const TREE_CLAIMS: &str = "claims";
const TREE_NAMES: &str = "names";
const TREE_META: &str = "meta";

/// How long `new` waits for another handle to release the store's file lock.
pub const OPEN_LOCK_TIMEOUT: Duration = Duration::from_secs(10);
const OPEN_RETRY_START: Duration = Duration::from_millis(10);
const OPEN_RETRY_MAX: Duration = Duration::from_millis(500);

/// sled reports a held file lock as a generic I/O error wrapping the
/// `WouldBlock` from the lock attempt.
fn is_lock_contention(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::WouldBlock
        || err.to_string().starts_with("could not acquire lock")
}

/// On-disk shape of a feature. The status is stored as the two flags the
/// rest of the system never sees.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct FeatureRow {
    id: FeatureId,
    priority: Priority,
    category: String,
    name: String,
    description: String,
    steps: Vec<String>,
    passes: bool,
    in_progress: bool,
}

impl From<&Feature> for FeatureRow {
    fn from(feature: &Feature) -> Self {
        let (passes, in_progress) = feature.status.flags();
        Self {
            id: feature.id,
            priority: feature.priority,
            category: feature.category.clone(),
            name: feature.name.clone(),
            description: feature.description.clone(),
            steps: feature.steps.clone(),
            passes,
            in_progress,
        }
    }
}

impl From<FeatureRow> for Feature {
    fn from(row: FeatureRow) -> Self {
        Self {
            id: row.id,
            priority: row.priority,
            category: row.category,
            name: row.name,
            description: row.description,
            steps: row.steps,
            status: FeatureStatus::from_flags(row.passes, row.in_progress),
        }
    }
}

/// Sled-based feature store.
///
/// Constructed once per process and shared (behind an `Arc`) by the queue
/// and the reconciler.
pub struct SledFeatureStore {
    db: Db,
    features: Tree,
    schedule: Tree,
    pending: Tree,
    passing: Tree,
    claims: Tree,
    names: Tree,
    meta: Tree,
    /// Serializes every operation that depends on the maximum priority.
    schedule_gate: Mutex<()>,
}

impl SledFeatureStore {
    /// Open (or create) a store at the given directory.
    ///
    /// Only one open handle may exist per directory. While another handle
    /// holds the lock, this waits up to [`OPEN_LOCK_TIMEOUT`] for it to be
    /// released.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        Self::open_with_timeout(path, OPEN_LOCK_TIMEOUT)
    }

    /// Like `new`, retrying a held lock with capped exponential backoff
    /// until `timeout` has elapsed.
    pub fn open_with_timeout<P: AsRef<Path>>(
        path: P,
        timeout: Duration,
    ) -> Result<Self, StorageError> {
        let path = path.as_ref();
        let deadline = Instant::now() + timeout;
        let mut delay = OPEN_RETRY_START;
        let mut attempts = 1u32;
        let db = loop {
            match sled::open(path) {
                Ok(db) => break db,
                Err(sled::Error::Io(e)) if is_lock_contention(&e) => {
                    let now = Instant::now();
                    if now >= deadline {
                        warn!(
                            path = %path.display(),
                            attempts,
                            "Feature store is still locked by another handle"
                        );
                        return Err(sled::Error::Io(e).into());
                    }
                    if attempts == 1 {
                        debug!(path = %path.display(), "Feature store locked, waiting");
                    }
                    thread::sleep(delay.min(deadline - now));
                    delay = (delay * 2).min(OPEN_RETRY_MAX);
                    attempts += 1;
                }
                Err(e) => return Err(e.into()),
            }
        };
        debug!(path = %path.display(), attempts, "Opened feature store");
        Self::from_db(db)
    }

    pub fn from_db(db: Db) -> Result<Self, StorageError> {
        Ok(Self {
            features: db.open_tree(TREE_FEATURES)?,
            schedule: db.open_tree(TREE_SCHEDULE)?,
            pending: db.open_tree(TREE_PENDING)?,
            passing: db.open_tree(TREE_PASSING)?,
            claims: db.open_tree(TREE_CLAIMS)?,
            names: db.open_tree(TREE_NAMES)?,
            meta: db.open_tree(TREE_META)?,
            db,
            schedule_gate: Mutex::new(()),
        })
    }

    /// Get the underlying sled database (for advanced operations)
    pub fn db(&self) -> &Db {
        &self.db
    }

    pub fn count(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn count_passing(&self) -> usize {
        self.passing.len()
    }

    pub fn count_in_progress(&self) -> usize {
        self.claims.len()
    }

    /// Total, passing and in-progress counts from one atomic read.
    pub fn counts(&self) -> Result<StoreCounts, StorageError> {
        match self.meta.get(COUNTS_KEY)? {
            Some(raw) => StoreCounts::decode(&raw)
                .ok_or_else(|| StorageError::Codec("malformed counts".to_string())),
            None => Ok(StoreCounts::default()),
        }
    }

    pub fn get(&self, id: FeatureId) -> Result<Option<Feature>, StorageError> {
        match self.features.get(id_key(id))? {
            Some(raw) => Ok(Some(decode_row(&raw)?)),
            None => Ok(None),
        }
    }

    /// First feature ever stored under `name`.
    pub fn find_by_name(&self, name: &str) -> Result<Option<Feature>, StorageError> {
        let Some(raw) = self.names.get(name.as_bytes())? else {
            return Ok(None);
        };
        let id = decode_id(&raw)
            .ok_or_else(|| StorageError::Codec(format!("malformed name index entry for {name:?}")))?;
        self.get(id)
    }

    /// Non-passing feature with the smallest `(priority, id)`.
    pub fn next_pending(&self) -> Result<Option<Feature>, StorageError> {
        for item in self.pending.iter() {
            let (_, value) = item?;
            let Some(id) = decode_id(&value) else {
                continue;
            };
            if let Some(feature) = self.get(id)? {
                return Ok(Some(feature));
            }
        }
        Ok(None)
    }

    /// Ids of all passing features, ascending.
    pub fn passing_ids(&self) -> Result<Vec<FeatureId>, StorageError> {
        let mut ids = Vec::new();
        for item in self.passing.iter() {
            let (key, _) = item?;
            if let Some(id) = decode_id(&key) {
                ids.push(id);
            }
        }
        Ok(ids)
    }

    pub fn max_priority(&self) -> Result<Option<Priority>, StorageError> {
        match self.schedule.last()? {
            Some((key, _)) => decode_schedule_key(&key)
                .map(|(priority, _)| Some(priority))
                .ok_or_else(|| StorageError::Codec("malformed schedule key".to_string())),
            None => Ok(None),
        }
    }

    /// Every feature in `(priority, id)` order.
    pub fn list(&self) -> Result<Vec<Feature>, StorageError> {
        let mut out = Vec::new();
        for item in self.schedule.iter() {
            let (_, value) = item?;
            let Some(id) = decode_id(&value) else {
                continue;
            };
            if let Some(feature) = self.get(id)? {
                out.push(feature);
            }
        }
        Ok(out)
    }

    /// Run `f` as one atomic transaction over all feature trees.
    ///
    /// The closure may be re-run on conflict, so it must not have side
    /// effects outside the transaction view.
    pub fn transaction<T, E, F>(&self, f: F) -> Result<T, E>
    where
        E: From<StorageError>,
        F: Fn(&FeatureTxn<'_>) -> TxResult<T, E>,
    {
        let result = (
            &self.features,
            &self.schedule,
            &self.pending,
            &self.passing,
            &self.claims,
            &self.names,
            &self.meta,
        )
            .transaction(|(features, schedule, pending, passing, claims, names, meta)| {
                let txn = FeatureTxn {
                    features,
                    schedule,
                    pending,
                    passing,
                    claims,
                    names,
                    meta,
                };
                f(&txn)
            });
        match result {
            Ok(value) => Ok(value),
            Err(TransactionError::Abort(err)) => Err(err),
            Err(TransactionError::Storage(err)) => Err(E::from(StorageError::Engine(err))),
        }
    }

    /// Like `transaction`, but holds the schedule gate for the whole call and
    /// exposes the maximum priority read under it.
    pub fn schedule<T, E, F>(&self, f: F) -> Result<T, E>
    where
        E: From<StorageError>,
        F: Fn(&ScheduleTxn<'_>) -> TxResult<T, E>,
    {
        let _gate = self.schedule_gate.lock();
        let max_priority = self.max_priority().map_err(E::from)?;
        self.transaction(|txn| f(&ScheduleTxn::new(*txn, max_priority)))
    }

    /// Flush all pending writes to disk
    pub fn flush(&self) -> Result<(), StorageError> {
        self.db.flush()?;
        Ok(())
    }
}

fn decode_row(raw: &[u8]) -> Result<Feature, StorageError> {
    let row: FeatureRow = bincode::deserialize(raw)?;
    Ok(row.into())
}
