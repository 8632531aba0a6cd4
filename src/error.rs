//! Error types for the backlog work-queue.

use crate::types::FeatureId;
use std::path::PathBuf;
use thiserror::Error;

/// Storage-related errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Feature not found: {0}")]
    FeatureNotFound(FeatureId),

    #[error("Storage engine error: {0}")]
    Engine(#[from] sled::Error),

    #[error("Corrupt record: {0}")]
    Codec(String),

    #[error("Storage I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<bincode::Error> for StorageError {
    fn from(err: bincode::Error) -> Self {
        StorageError::Codec(err.to_string())
    }
}

/// Errors reported to callers of the queue, reconciler and facade.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Feature with ID {0} not found")]
    NotFound(FeatureId),

    #[error("Feature with ID {0} is already passing")]
    AlreadyPassing(FeatureId),

    #[error("Feature with ID {0} is already in-progress")]
    AlreadyInProgress(FeatureId),

    #[error("Feature at index {index} missing required fields: {}", missing.join(", "))]
    Validation { index: usize, missing: Vec<String> },

    /// `get_next` found no non-passing feature.
    #[error("All features are passing! No more work to do.")]
    NoPendingFeatures,

    #[error("Storage error: {0}")]
    Storage(StorageError),

    #[error("Configuration error: {0}")]
    Config(String),

    /// Caller input that could not be decoded into a request.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A result that could not be encoded for output.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Both lookup failures: a missing id and an exhausted queue.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound(_) | ApiError::NoPendingFeatures)
    }

    /// Stable machine-readable name of the error class.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::NotFound(_) | ApiError::NoPendingFeatures => "not_found",
            ApiError::AlreadyPassing(_) => "already_passing",
            ApiError::AlreadyInProgress(_) => "already_in_progress",
            ApiError::Validation { .. } => "validation",
            ApiError::Storage(_) => "storage",
            ApiError::Config(_) => "config",
            ApiError::InvalidRequest(_) => "invalid_request",
            ApiError::Internal(_) => "internal",
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::FeatureNotFound(id) => ApiError::NotFound(id),
            other => ApiError::Storage(other),
        }
    }
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::Config(err.to_string())
    }
}

/// Failure to turn one descriptor file into a spec record.
#[derive(Debug, Error)]
pub enum SpecError {
    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path:?} is not valid UTF-8")]
    InvalidUtf8 { path: PathBuf },

    #[error("{path:?}: priority must be an integer, got {value:?}")]
    InvalidPriority { path: PathBuf, value: String },

    #[error("{path:?} has no test steps")]
    NoTestSteps { path: PathBuf },
}
