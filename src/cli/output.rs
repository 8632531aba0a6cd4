//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::ApiError;

/// Map domain/service errors to a string for CLI output, in the same
/// `**Error:**` form the text commands use.
pub fn map_error(e: &ApiError) -> String {
    match e {
        ApiError::Storage(_) | ApiError::Config(_) | ApiError::Internal(_) => {
            format!("Error: {}", e)
        }
        _ => format!("**Error:** {}", e),
    }
}
