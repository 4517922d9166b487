//! The seam between the sync engine and the managed backend.
//!
//! The engine only ever talks to [`RemoteGateway`]; the production adapter
//! is [`HttpGateway`](crate::HttpGateway), and tests substitute mocks that
//! record calls or inject failures.

use crate::{error::GatewayError, session::Identity};
use async_trait::async_trait;
use propsync_core::{Property, PropertyId};

/// Remote operations the sync engine needs, scoped to an identity.
///
/// Implementations must be safe to call concurrently; the engine itself
/// serializes cycles but other parts of the app may share the gateway.
#[async_trait]
pub trait RemoteGateway: Send + Sync {
    /// Upload one property aggregate, replacing the server copy.
    async fn push(&self, identity: &Identity, property: &Property) -> Result<(), GatewayError>;

    /// Fetch every property the identity can see.
    async fn pull_all(&self, identity: &Identity) -> Result<Vec<Property>, GatewayError>;

    /// Delete a property on the server. Deleting an id the server does not
    /// know is not an error.
    async fn delete(&self, identity: &Identity, id: PropertyId) -> Result<(), GatewayError>;
}
