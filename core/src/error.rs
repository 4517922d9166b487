//! Error types for the PropSync core.

use crate::PropertyId;
use thiserror::Error;

/// All possible errors from the local entity store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("property not found: {0}")]
    PropertyNotFound(PropertyId),

    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
