//! Shared presentation helpers.

use crate::error::ApiError;
use owo_colors::OwoColorize;
use serde::Serialize;

/// Pretty JSON for `--format json`.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| ApiError::Internal(format!("Failed to encode output: {}", e)))
}

pub fn section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

pub fn is_json(format: &str) -> bool {
    format == "json"
}
