//! Feature APIs
//!
//! Transport-agnostic boundary over the queue engine and the reconciler.
//! Every operation is available as a typed method and as a serde
//! [`Request`] dispatched through [`FeatureApi::handle`].

use crate::error::ApiError;
use crate::queue::{BulkFeature, BulkOutcome, FeatureQueue, QueueStats, SkipOutcome};
use crate::spec::{load_specs_dir, SpecRecord};
use crate::store::Feature;
use crate::sync::{SpecReconciler, SyncReport};
use crate::types::{FeatureId, FeatureStatus, Priority};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Wire view of a feature, with the status spelled out as flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureView {
    pub id: FeatureId,
    pub priority: Priority,
    pub category: String,
    pub name: String,
    pub description: String,
    pub steps: Vec<String>,
    pub passes: bool,
    pub in_progress: bool,
}

impl FeatureView {
    pub fn status(&self) -> FeatureStatus {
        FeatureStatus::from_flags(self.passes, self.in_progress)
    }
}

impl From<Feature> for FeatureView {
    fn from(feature: Feature) -> Self {
        let (passes, in_progress) = feature.status.flags();
        Self {
            id: feature.id,
            priority: feature.priority,
            category: feature.category,
            name: feature.name,
            description: feature.description,
            steps: feature.steps,
            passes,
            in_progress,
        }
    }
}

/// Descriptor matching a feature by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecContext {
    pub filepath: PathBuf,
    pub description: String,
    pub steps: Vec<String>,
}

impl From<&SpecRecord> for SpecContext {
    fn from(record: &SpecRecord) -> Self {
        Self {
            filepath: record.filepath.clone(),
            description: record.description.clone(),
            steps: record.steps.clone(),
        }
    }
}

/// Next feature to work on, with its descriptor when one exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextFeature {
    pub feature: FeatureView,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec: Option<SpecContext>,
}

/// All features grouped by status, each bucket in scheduling order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureBoard {
    pub pending: Vec<FeatureView>,
    pub in_progress: Vec<FeatureView>,
    pub done: Vec<FeatureView>,
}

/// One boundary call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    Stats,
    GetNext,
    GetRegression {
        #[serde(default)]
        limit: Option<usize>,
    },
    MarkPassing {
        id: FeatureId,
    },
    Skip {
        id: FeatureId,
    },
    MarkInProgress {
        id: FeatureId,
    },
    ClearInProgress {
        id: FeatureId,
    },
    CreateBulk {
        features: Vec<BulkFeature>,
    },
    SyncFromSpecs,
    List,
    Get {
        id: FeatureId,
    },
}

/// Result of a [`Request`]; serialized as the bare payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Stats(QueueStats),
    Next(NextFeature),
    Feature(FeatureView),
    Features(Vec<FeatureView>),
    Skipped(SkipOutcome),
    Created(BulkOutcome),
    Synced(SyncReport),
    Board(FeatureBoard),
}

/// Error payload returned to transports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub kind: String,
}

impl From<&ApiError> for ErrorBody {
    fn from(err: &ApiError) -> Self {
        Self {
            error: err.to_string(),
            kind: err.kind().to_string(),
        }
    }
}

/// Feature API service
///
/// Holds the queue and reconciler built over one shared store, plus the
/// descriptor directory used by `sync_from_specs` and `next_with_spec`.
pub struct FeatureApi {
    queue: Arc<FeatureQueue>,
    reconciler: Arc<SpecReconciler>,
    specs_dir: PathBuf,
}

impl FeatureApi {
    pub fn new(
        queue: Arc<FeatureQueue>,
        reconciler: Arc<SpecReconciler>,
        specs_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            queue,
            reconciler,
            specs_dir: specs_dir.into(),
        }
    }

    pub fn queue(&self) -> &FeatureQueue {
        &self.queue
    }

    pub fn specs_dir(&self) -> &Path {
        &self.specs_dir
    }

    pub fn stats(&self) -> Result<QueueStats, ApiError> {
        self.queue.stats()
    }

    pub fn get(&self, id: FeatureId) -> Result<FeatureView, ApiError> {
        self.queue.get(id).map(FeatureView::from)
    }

    pub fn get_next(&self) -> Result<FeatureView, ApiError> {
        self.queue.get_next().map(FeatureView::from)
    }

    /// Next feature plus the first descriptor with the same name.
    ///
    /// The descriptor directory is re-parsed on every call; an absent
    /// directory simply yields no descriptor.
    pub fn next_with_spec(&self) -> Result<NextFeature, ApiError> {
        let feature = self.queue.get_next()?;
        let spec = if self.specs_dir.is_dir() {
            load_specs_dir(&self.specs_dir)
                .find_by_name(&feature.name)
                .map(SpecContext::from)
        } else {
            None
        };
        Ok(NextFeature {
            feature: feature.into(),
            spec,
        })
    }

    pub fn get_regression(&self, limit: Option<usize>) -> Result<Vec<FeatureView>, ApiError> {
        Ok(self
            .queue
            .get_regression(limit)?
            .into_iter()
            .map(FeatureView::from)
            .collect())
    }

    pub fn mark_passing(&self, id: FeatureId) -> Result<FeatureView, ApiError> {
        self.queue.mark_passing(id).map(FeatureView::from)
    }

    pub fn skip(&self, id: FeatureId) -> Result<SkipOutcome, ApiError> {
        self.queue.skip(id)
    }

    pub fn mark_in_progress(&self, id: FeatureId) -> Result<FeatureView, ApiError> {
        self.queue.mark_in_progress(id).map(FeatureView::from)
    }

    pub fn clear_in_progress(&self, id: FeatureId) -> Result<FeatureView, ApiError> {
        self.queue.clear_in_progress(id).map(FeatureView::from)
    }

    pub fn create_bulk(&self, features: &[BulkFeature]) -> Result<BulkOutcome, ApiError> {
        self.queue.create_bulk(features)
    }

    /// Re-parse the descriptor directory and merge it into the store.
    pub fn sync_from_specs(&self) -> Result<SyncReport, ApiError> {
        self.reconciler.sync_dir(&self.specs_dir)
    }

    pub fn list(&self) -> Result<FeatureBoard, ApiError> {
        let mut board = FeatureBoard::default();
        for feature in self.queue.list()? {
            let bucket = match feature.status {
                FeatureStatus::Passing => &mut board.done,
                FeatureStatus::InProgress => &mut board.in_progress,
                FeatureStatus::Pending => &mut board.pending,
            };
            bucket.push(feature.into());
        }
        Ok(board)
    }

    /// Dispatch one request.
    pub fn handle(&self, request: Request) -> Result<Response, ApiError> {
        match request {
            Request::Stats => self.stats().map(Response::Stats),
            Request::GetNext => self.next_with_spec().map(Response::Next),
            Request::GetRegression { limit } => {
                self.get_regression(limit).map(Response::Features)
            }
            Request::MarkPassing { id } => self.mark_passing(id).map(Response::Feature),
            Request::Skip { id } => self.skip(id).map(Response::Skipped),
            Request::MarkInProgress { id } => self.mark_in_progress(id).map(Response::Feature),
            Request::ClearInProgress { id } => self.clear_in_progress(id).map(Response::Feature),
            Request::CreateBulk { features } => self.create_bulk(&features).map(Response::Created),
            Request::SyncFromSpecs => self.sync_from_specs().map(Response::Synced),
            Request::List => self.list().map(Response::Board),
            Request::Get { id } => self.get(id).map(Response::Feature),
        }
    }

    /// Decode one JSON request, dispatch it and encode the reply. Failures,
    /// including malformed input, come back as an [`ErrorBody`].
    pub fn handle_json(&self, line: &str) -> serde_json::Value {
        let reply = serde_json::from_str::<Request>(line)
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))
            .and_then(|request| self.handle(request))
            .and_then(|response| {
                serde_json::to_value(&response)
                    .map_err(|e| ApiError::Internal(format!("Failed to encode response: {}", e)))
            });
        reply.unwrap_or_else(|err| error_value(ErrorBody::from(&err)))
    }
}

fn error_value(body: ErrorBody) -> serde_json::Value {
    serde_json::json!({ "error": body.error, "kind": body.kind })
}
