//! Custom error types for the wellness service.

use thiserror::Error;

use crate::domains::validation::ValidationError;
use mindaigle_store_client::StoreError;

/// Wellness service errors.
#[derive(Debug, Error)]
pub enum WellnessError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Result type alias for wellness operations.
pub type WellnessResult<T> = Result<T, WellnessError>;
