//! Transaction views over the feature trees.
//!
//! `FeatureTxn` can only change a row's status; `ScheduleTxn` (handed out
//! while the schedule gate is held) may also insert rows and move
//! priorities, and knows the maximum priority at the start of the call.

use crate::error::StorageError;
use crate::store::keys::{decode_id, id_key, schedule_key};
use crate::store::persistence::FeatureRow;
use crate::store::{Feature, NewFeature};
use crate::types::{FeatureId, FeatureStatus, Priority};
use sled::transaction::{ConflictableTransactionError, ConflictableTransactionResult, TransactionalTree};
use std::ops::Deref;

const NEXT_ID_KEY: &[u8] = b"next_id";
pub(crate) const COUNTS_KEY: &[u8] = b"counts";
const EMPTY: &[u8] = &[];

/// Row totals kept in `meta` and updated by every write, so that one key
/// read gives a consistent snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreCounts {
    pub total: usize,
    pub passing: usize,
    pub in_progress: usize,
}

impl StoreCounts {
    pub(crate) fn encode(&self) -> [u8; 24] {
        let mut out = [0u8; 24];
        out[..8].copy_from_slice(&(self.total as u64).to_be_bytes());
        out[8..16].copy_from_slice(&(self.passing as u64).to_be_bytes());
        out[16..].copy_from_slice(&(self.in_progress as u64).to_be_bytes());
        out
    }

    pub(crate) fn decode(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != 24 {
            return None;
        }
        let field = |at: usize| -> Option<usize> {
            let raw: [u8; 8] = bytes[at..at + 8].try_into().ok()?;
            usize::try_from(u64::from_be_bytes(raw)).ok()
        };
        Some(Self {
            total: field(0)?,
            passing: field(8)?,
            in_progress: field(16)?,
        })
    }

    fn status_slot(&mut self, status: FeatureStatus) -> Option<&mut usize> {
        match status {
            FeatureStatus::Passing => Some(&mut self.passing),
            FeatureStatus::InProgress => Some(&mut self.in_progress),
            FeatureStatus::Pending => None,
        }
    }
}

/// Result type of transaction closures.
pub type TxResult<T, E> = ConflictableTransactionResult<T, E>;

/// Abort the surrounding transaction with a caller error.
pub fn abort<T, E>(err: E) -> TxResult<T, E> {
    Err(ConflictableTransactionError::Abort(err))
}

fn storage_abort<T, E: From<StorageError>>(err: StorageError) -> TxResult<T, E> {
    abort(E::from(err))
}

/// Row-level view of one transaction.
#[derive(Clone, Copy)]
pub struct FeatureTxn<'a> {
    pub(super) features: &'a TransactionalTree,
    pub(super) schedule: &'a TransactionalTree,
    pub(super) pending: &'a TransactionalTree,
    pub(super) passing: &'a TransactionalTree,
    pub(super) claims: &'a TransactionalTree,
    pub(super) names: &'a TransactionalTree,
    pub(super) meta: &'a TransactionalTree,
}

impl<'a> FeatureTxn<'a> {
    pub fn get<E: From<StorageError>>(&self, id: FeatureId) -> TxResult<Option<Feature>, E> {
        let Some(raw) = self.features.get(&id_key(id)[..])? else {
            return Ok(None);
        };
        match bincode::deserialize::<FeatureRow>(&raw) {
            Ok(row) => Ok(Some(row.into())),
            Err(e) => storage_abort(e.into()),
        }
    }

    /// Like `get`, but aborts with `FeatureNotFound` when the row is absent.
    pub fn require<E: From<StorageError>>(&self, id: FeatureId) -> TxResult<Feature, E> {
        match self.get::<E>(id)? {
            Some(feature) => Ok(feature),
            None => storage_abort(StorageError::FeatureNotFound(id)),
        }
    }

    /// First feature ever stored under `name`.
    pub fn find_by_name<E: From<StorageError>>(&self, name: &str) -> TxResult<Option<Feature>, E> {
        let Some(raw) = self.names.get(name.as_bytes())? else {
            return Ok(None);
        };
        let Some(id) = decode_id(&raw) else {
            return storage_abort(StorageError::Codec(format!(
                "malformed name index entry for {name:?}"
            )));
        };
        self.get(id)
    }

    pub fn set_status<E: From<StorageError>>(
        &self,
        feature: &Feature,
        status: FeatureStatus,
    ) -> TxResult<Feature, E> {
        let next = Feature {
            status,
            ..feature.clone()
        };
        self.write::<E>(Some(feature), &next)?;
        Ok(next)
    }

    fn write<E: From<StorageError>>(&self, prev: Option<&Feature>, next: &Feature) -> TxResult<(), E> {
        let mut counts = self.counts::<E>()?;
        match prev {
            Some(prev) => {
                self.unindex::<E>(prev)?;
                if let Some(slot) = counts.status_slot(prev.status) {
                    *slot = slot.saturating_sub(1);
                }
            }
            None => counts.total += 1,
        }
        if let Some(slot) = counts.status_slot(next.status) {
            *slot += 1;
        }
        self.meta.insert(COUNTS_KEY, &counts.encode()[..])?;

        let row = FeatureRow::from(next);
        let value = match bincode::serialize(&row) {
            Ok(v) => v,
            Err(e) => return storage_abort(e.into()),
        };
        self.features.insert(&id_key(next.id)[..], value)?;
        self.index::<E>(next)?;
        Ok(())
    }

    fn index<E>(&self, feature: &Feature) -> TxResult<(), E> {
        let key = schedule_key(feature.priority, feature.id);
        let id = id_key(feature.id);
        self.schedule.insert(&key[..], &id[..])?;
        match feature.status {
            FeatureStatus::Passing => {
                self.passing.insert(&id[..], EMPTY)?;
            }
            FeatureStatus::InProgress => {
                self.pending.insert(&key[..], &id[..])?;
                self.claims.insert(&id[..], EMPTY)?;
            }
            FeatureStatus::Pending => {
                self.pending.insert(&key[..], &id[..])?;
            }
        }
        Ok(())
    }

    fn unindex<E>(&self, feature: &Feature) -> TxResult<(), E> {
        let key = schedule_key(feature.priority, feature.id);
        let id = id_key(feature.id);
        self.schedule.remove(&key[..])?;
        self.pending.remove(&key[..])?;
        self.passing.remove(&id[..])?;
        self.claims.remove(&id[..])?;
        Ok(())
    }

    fn counts<E: From<StorageError>>(&self) -> TxResult<StoreCounts, E> {
        match self.meta.get(COUNTS_KEY)? {
            Some(raw) => match StoreCounts::decode(&raw) {
                Some(counts) => Ok(counts),
                None => storage_abort(StorageError::Codec("malformed counts".to_string())),
            },
            None => Ok(StoreCounts::default()),
        }
    }

    fn allocate_id<E: From<StorageError>>(&self) -> TxResult<FeatureId, E> {
        let next = match self.meta.get(NEXT_ID_KEY)? {
            Some(raw) => match decode_id(&raw) {
                Some(id) => id,
                None => {
                    return storage_abort(StorageError::Codec("malformed next_id".to_string()))
                }
            },
            None => 1,
        };
        self.meta.insert(NEXT_ID_KEY, &id_key(next + 1)[..])?;
        Ok(next)
    }
}

/// Transaction view granted while the schedule gate is held.
pub struct ScheduleTxn<'a> {
    rows: FeatureTxn<'a>,
    max_priority: Option<Priority>,
}

impl<'a> ScheduleTxn<'a> {
    pub(super) fn new(rows: FeatureTxn<'a>, max_priority: Option<Priority>) -> Self {
        Self { rows, max_priority }
    }

    /// Highest priority stored when the transaction began; `None` when empty.
    pub fn max_priority(&self) -> Option<Priority> {
        self.max_priority
    }

    pub fn store_was_empty(&self) -> bool {
        self.max_priority.is_none()
    }

    pub fn insert<E: From<StorageError>>(&self, new: NewFeature) -> TxResult<Feature, E> {
        let id = self.rows.allocate_id::<E>()?;
        let feature = new.with_id(id);
        self.rows.write::<E>(None, &feature)?;
        if self.rows.names.get(feature.name.as_bytes())?.is_none() {
            self.rows
                .names
                .insert(feature.name.as_bytes(), &id_key(id)[..])?;
        }
        Ok(feature)
    }

    /// Replace `prev` with `next` (same id), including priority moves.
    pub fn save<E: From<StorageError>>(&self, prev: &Feature, next: Feature) -> TxResult<Feature, E> {
        if prev.id != next.id {
            return storage_abort(StorageError::Codec(format!(
                "cannot save feature {} over feature {}",
                next.id, prev.id
            )));
        }
        self.rows.write::<E>(Some(prev), &next)?;
        Ok(next)
    }
}

impl<'a> Deref for ScheduleTxn<'a> {
    type Target = FeatureTxn<'a>;

    fn deref(&self) -> &Self::Target {
        &self.rows
    }
}
