//! The entity store - the on-device arena of property aggregates.
//!
//! The store maps property ids to stored entries (aggregate plus sync
//! metadata) and is the single shared mutable resource between UI-driven
//! mutations and the sync engine. All flag and recency bookkeeping happens
//! here; nothing mutates an entry's metadata from outside.

use crate::{
    error::Result, Clock, LruPolicy, Property, PropertyId, StoreError, StoreSnapshot, SystemClock,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Local-only synchronization bookkeeping for one property.
///
/// Never sent remotely. `needs_upload` and `is_synced` move together: set
/// on every local mutation, cleared only after a confirmed remote write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncMeta {
    /// Last read or write of this entry; drives LRU eviction
    pub last_accessed_at: DateTime<Utc>,
    /// Whether the local copy matches a confirmed remote write
    pub is_synced: bool,
    /// Whether the local copy awaits upload
    pub needs_upload: bool,
}

impl SyncMeta {
    /// Metadata for a locally mutated entry.
    pub fn dirty(at: DateTime<Utc>) -> Self {
        Self {
            last_accessed_at: at,
            is_synced: false,
            needs_upload: true,
        }
    }

    /// Metadata for an entry written from remote truth.
    pub fn synced(at: DateTime<Utc>) -> Self {
        Self {
            last_accessed_at: at,
            is_synced: true,
            needs_upload: false,
        }
    }
}

/// A property aggregate together with its local sync metadata.
///
/// This is the unit of the persisted local layout: one record per property
/// carrying the full nested graph plus the three sync-metadata fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredProperty {
    /// The property aggregate
    pub property: Property,
    /// Local sync bookkeeping
    pub meta: SyncMeta,
}

/// The local entity store, bounded by an [`LruPolicy`].
pub struct EntityStore {
    policy: LruPolicy,
    clock: Arc<dyn Clock>,
    entries: HashMap<PropertyId, StoredProperty>,
}

impl EntityStore {
    /// Create an empty store with the given recency policy and clock.
    pub fn new(policy: LruPolicy, clock: Arc<dyn Clock>) -> Self {
        Self {
            policy,
            clock,
            entries: HashMap::new(),
        }
    }

    /// Create an empty store on the system clock.
    pub fn with_system_clock(policy: LruPolicy) -> Self {
        Self::new(policy, Arc::new(SystemClock))
    }

    /// The recency policy in force.
    pub fn policy(&self) -> LruPolicy {
        self.policy
    }

    /// Count of retained properties.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no properties.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert or replace a property from a local mutation.
    ///
    /// Replaces the whole embedded subgraph, refreshes the access time and
    /// marks the entry dirty (`needs_upload = true`, `is_synced = false`).
    /// Runs eviction before returning.
    pub fn upsert(&mut self, property: Property) {
        let meta = SyncMeta::dirty(self.clock.now());
        self.write(property, meta);
    }

    /// Insert or replace a property from the download phase of a sync.
    ///
    /// Remote truth is already synced, so the entry is written with
    /// `is_synced = true` and `needs_upload = false`. Passes through the
    /// same eviction as a local write.
    pub fn apply_remote(&mut self, property: Property) {
        let meta = SyncMeta::synced(self.clock.now());
        self.write(property, meta);
    }

    fn write(&mut self, property: Property, meta: SyncMeta) {
        let id = property.id;
        self.entries.insert(id, StoredProperty { property, meta });
        self.evict_overflow(Some(id));
    }

    /// Fetch a property, refreshing its access time.
    ///
    /// Absence is a valid empty result, not an error.
    pub fn get(&mut self, id: PropertyId) -> Option<&Property> {
        let now = self.clock.now();
        let entry = self.entries.get_mut(&id)?;
        entry.meta.last_accessed_at = now;
        Some(&entry.property)
    }

    /// Fetch a property without counting an access.
    pub fn peek(&self, id: PropertyId) -> Option<&Property> {
        self.entries.get(&id).map(|e| &e.property)
    }

    /// Fetch an entry's sync metadata without counting an access.
    pub fn meta(&self, id: PropertyId) -> Option<&SyncMeta> {
        self.entries.get(&id).map(|e| &e.meta)
    }

    /// Remove a property and its whole embedded subgraph.
    ///
    /// Idempotent: deleting an absent id is a no-op.
    pub fn delete(&mut self, id: PropertyId) {
        self.entries.remove(&id);
    }

    /// All properties awaiting upload, in no particular order.
    pub fn list_needing_upload(&self) -> Vec<Property> {
        self.entries
            .values()
            .filter(|e| e.meta.needs_upload)
            .map(|e| e.property.clone())
            .collect()
    }

    /// Record a confirmed remote write: flips the flags without touching
    /// the data or the access time.
    pub fn mark_synced(&mut self, id: PropertyId) -> Result<()> {
        let entry = self
            .entries
            .get_mut(&id)
            .ok_or(StoreError::PropertyNotFound(id))?;
        entry.meta.is_synced = true;
        entry.meta.needs_upload = false;
        Ok(())
    }

    /// Properties ordered most-recently-accessed first, up to `limit`.
    pub fn list_by_recency(&self, limit: usize) -> Vec<&Property> {
        let mut entries: Vec<&StoredProperty> = self.entries.values().collect();
        entries.sort_by(|a, b| {
            b.meta
                .last_accessed_at
                .cmp(&a.meta.last_accessed_at)
                .then_with(|| a.property.id.cmp(&b.property.id))
        });
        entries.into_iter().take(limit).map(|e| &e.property).collect()
    }

    fn evict_overflow(&mut self, protected: Option<PropertyId>) {
        let candidates = self
            .entries
            .iter()
            .filter(|(id, _)| Some(**id) != protected)
            .map(|(id, e)| (*id, e.meta.last_accessed_at));
        let victims = self.policy.select_victims(self.entries.len(), candidates);
        for id in victims {
            self.entries.remove(&id);
        }
    }

    /// Export the current store state as a snapshot for persistence.
    pub fn export_state(&self) -> StoreSnapshot {
        let mut snapshot = StoreSnapshot::new();
        for entry in self.entries.values() {
            snapshot.add_entry(entry.clone());
        }
        snapshot
    }

    /// Replace the store state with a snapshot's.
    ///
    /// Entries beyond the capacity of the current policy are evicted by
    /// recency, so a snapshot taken under a larger cap still imports.
    pub fn import_state(&mut self, snapshot: StoreSnapshot) -> Result<()> {
        self.entries = snapshot.entries.into_iter().collect();
        self.evict_overflow(None);
        Ok(())
    }
}
