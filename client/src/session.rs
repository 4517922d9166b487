//! Session state: which identity, if any, the client is signed in as.
//!
//! The sync engine arms its periodic timer while an identity is present and
//! disarms it on sign-out; sign-in additionally fires one immediate sync.
//! Observers follow changes through a `watch` channel rather than polling.

use std::sync::Arc;
use tokio::sync::watch;

/// The authenticated identity all remote operations are scoped to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Opaque user id from the identity provider
    pub user_id: String,
    /// Bearer token for the remote gateway, if one was issued
    pub token: Option<String>,
}

impl Identity {
    /// An identity without a token (e.g. during local development).
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            token: None,
        }
    }

    /// An identity carrying a bearer token.
    pub fn with_token(user_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            token: Some(token.into()),
        }
    }
}

/// Shared handle on the current sign-in state.
#[derive(Debug, Clone)]
pub struct Session {
    tx: Arc<watch::Sender<Option<Identity>>>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// A signed-out session.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    /// A session already signed in as `identity`.
    pub fn signed_in(identity: Identity) -> Self {
        let (tx, _) = watch::channel(Some(identity));
        Self { tx: Arc::new(tx) }
    }

    /// Record a sign-in.
    pub fn sign_in(&self, identity: Identity) {
        self.tx.send_replace(Some(identity));
    }

    /// Record a sign-out. An in-flight sync cycle is not interrupted; only
    /// future triggers are disarmed.
    pub fn sign_out(&self) {
        self.tx.send_replace(None);
    }

    /// The current identity, if signed in.
    pub fn current(&self) -> Option<Identity> {
        self.tx.borrow().clone()
    }

    /// Follow sign-in state changes.
    pub fn subscribe(&self) -> watch::Receiver<Option<Identity>> {
        self.tx.subscribe()
    }
}
