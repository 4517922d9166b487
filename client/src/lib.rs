//! # PropSync Client
//!
//! Background synchronization for the PropSync mobile client.
//!
//! This crate wraps the deterministic [`propsync_core`] cache with the IO it
//! deliberately excludes: a [`RemoteGateway`] seam over the managed backend
//! (with an HTTP adapter), a [`Session`] handle carrying the authenticated
//! identity, snapshot persistence to disk, and the [`SyncEngine`] that runs
//! the periodic two-phase sync cycle.
//!
//! ## The sync cycle
//!
//! Each cycle attempts both phases, the second regardless of the first:
//!
//! 1. **Upload** - every property with `needs_upload` is pushed
//!    independently; a success flips its flags, a failure leaves them for
//!    the next cycle and never aborts the batch.
//! 2. **Download** - the full remote set is pulled and written through the
//!    store (and therefore through the LRU cap). A locally edited copy that
//!    is both unsynced and strictly newer than the incoming one is kept -
//!    last writer wins by `updated_at`.
//!
//! Cycles are mutually exclusive: a trigger while one is in flight is
//! dropped, not queued. There is no backoff - failed work is retried on the
//! next fixed-interval tick.
//!
//! ## Composition
//!
//! The engine is constructed explicitly at process start and handed its
//! collaborators, so tests can substitute a mock gateway and a manual
//! clock:
//!
//! ```rust,no_run
//! use propsync_client::{Session, SyncConfig, SyncEngine};
//!
//! # async fn compose() {
//! let config = SyncConfig::new("https://api.propsync.example");
//! let session = Session::new();
//! let engine = SyncEngine::from_config(config, session.clone());
//!
//! engine.spawn(); // periodic sync arms once the session signs in
//! session.sign_in(propsync_client::Identity::new("landlord-1"));
//! # }
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod gateway;
pub mod http;
pub mod persist;
pub mod session;

// Re-export main types at crate root
pub use config::{ConfigError, SyncConfig, DEFAULT_SYNC_INTERVAL};
pub use engine::{SyncEngine, SyncOutcome, SyncReport, SyncState, SyncStatus};
pub use error::{GatewayError, SyncError};
pub use gateway::RemoteGateway;
pub use http::HttpGateway;
pub use session::{Identity, Session};
