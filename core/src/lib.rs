//! # PropSync Core
//!
//! The deterministic, on-device cache core for PropSync property inventories.
//!
//! This crate owns the local representation of a landlord's properties and
//! their inventory reports: the entity store, the LRU recency policy that
//! bounds it, and the snapshot format used to persist it. It has no knowledge
//! of the network or the host platform - the companion `propsync-client`
//! crate drives synchronization against the remote backend through this API.
//!
//! ## Design Principles
//!
//! - **No IO**: the core has no knowledge of files, network, or platform
//! - **Deterministic**: time is injected through [`Clock`], so every recency
//!   decision is reproducible in tests
//! - **Owned aggregates**: a [`Property`] embeds its whole report/room/item
//!   subgraph, so replacement and cascade delete are structural
//!
//! ## Core Concepts
//!
//! ### The aggregate
//!
//! A [`Property`] is the unit of synchronization. It carries an embedded
//! [`InventoryReport`] with its [`Room`]s and [`InventoryItem`]s; completion
//! figures are always computed from the current child state, never stored.
//!
//! ### Sync metadata
//!
//! The store tracks three local-only fields per property ([`SyncMeta`]):
//! `last_accessed_at` drives LRU eviction, while `needs_upload` and
//! `is_synced` move together - set on every local mutation, cleared only
//! after a confirmed remote write.
//!
//! ### The recency cap
//!
//! [`LruPolicy`] bounds the number of retained properties (5 in the
//! reference deployment). Eviction runs synchronously inside the write that
//! caused the overflow and never removes the entry that triggered it.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use propsync_core::{
//!     Clock, ContactRecord, EntityStore, InventoryType, LruPolicy, Property,
//!     PropertyKind, SystemClock,
//! };
//!
//! let clock = Arc::new(SystemClock);
//! let mut store = EntityStore::new(LruPolicy::new(5), clock.clone());
//!
//! let property = Property::new(
//!     "landlord-1",
//!     "Harbour View",
//!     "12 Harbour Lane, Brighton",
//!     PropertyKind::Flat,
//!     InventoryType::CheckIn,
//!     ContactRecord::new("J. Whitmore"),
//!     clock.now(),
//! );
//! let id = property.id;
//!
//! store.upsert(property);
//! assert!(store.meta(id).unwrap().needs_upload);
//!
//! store.mark_synced(id).unwrap();
//! assert!(store.meta(id).unwrap().is_synced);
//! ```
//!
//! ## Persistence
//!
//! Use [`EntityStore::export_state`] and [`EntityStore::import_state`] with
//! [`StoreSnapshot`] for persistence. Snapshots serialize to JSON with
//! deterministic ordering.

pub mod cache;
pub mod clock;
pub mod error;
pub mod photo;
pub mod property;
pub mod report;
pub mod snapshot;
pub mod store;

// Re-export main types at crate root
pub use cache::{LruPolicy, DEFAULT_CAPACITY};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::StoreError;
pub use photo::PhotoReference;
pub use property::{ContactRecord, Property, PropertyKind, PropertyStatus};
pub use report::{
    Condition, InventoryItem, InventoryReport, InventoryType, ItemCategory, Room, RoomKind,
    Signature,
};
pub use snapshot::{SnapshotMetadata, StoreSnapshot, SNAPSHOT_FORMAT_VERSION};
pub use store::{EntityStore, StoredProperty, SyncMeta};

/// Type aliases for clarity
pub type PropertyId = uuid::Uuid;
pub type ReportId = uuid::Uuid;
pub type RoomId = uuid::Uuid;
pub type ItemId = uuid::Uuid;
pub type PhotoId = uuid::Uuid;
