//! Error types for the sync client.

use propsync_core::StoreError;
use thiserror::Error;

/// A failed remote gateway operation.
///
/// Gateway failures are never fatal to the client: the sync engine logs
/// them, records them on the cycle report, and retries on the next cycle.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned {code}: {body}")]
    Status { code: u16, body: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Errors that stop a sync attempt from starting or a snapshot from
/// persisting. Per-item push failures and pull failures are not errors at
/// this level - they are data on the [`SyncReport`](crate::SyncReport).
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("not authenticated: no active identity")]
    NotAuthenticated,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("failed to persist snapshot: {0}")]
    Persist(#[from] std::io::Error),
}

/// Result type for sync operations.
pub type Result<T> = std::result::Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gateway_error_display() {
        let err = GatewayError::Status {
            code: 503,
            body: "overloaded".into(),
        };
        assert_eq!(err.to_string(), "server returned 503: overloaded");

        let err = GatewayError::InvalidResponse("missing body".into());
        assert_eq!(err.to_string(), "invalid response: missing body");
    }

    #[test]
    fn sync_error_display() {
        assert_eq!(
            SyncError::NotAuthenticated.to_string(),
            "not authenticated: no active identity"
        );
    }
}
