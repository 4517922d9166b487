//! Snapshot types for persisting and restoring store state.
//!
//! Snapshots are the bridge between the in-memory store and the device's
//! persistent storage. One entry per property carries the full nested graph
//! plus its sync metadata; BTreeMap keys give deterministic serialization
//! order.

use crate::{error::Result, PropertyId, StoreError, StoredProperty};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Version of the snapshot format for future compatibility.
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

/// A point-in-time snapshot of the store state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSnapshot {
    /// Snapshot format version
    pub format_version: u32,
    /// All stored properties by id, in deterministic order
    pub entries: BTreeMap<PropertyId, StoredProperty>,
}

impl Default for StoreSnapshot {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreSnapshot {
    /// Create a new empty snapshot.
    pub fn new() -> Self {
        Self {
            format_version: SNAPSHOT_FORMAT_VERSION,
            entries: BTreeMap::new(),
        }
    }

    /// Add a stored property to the snapshot.
    pub fn add_entry(&mut self, entry: StoredProperty) {
        self.entries.insert(entry.property.id, entry);
    }

    /// Get an entry from the snapshot.
    pub fn get_entry(&self, id: PropertyId) -> Option<&StoredProperty> {
        self.entries.get(&id)
    }

    /// Count of properties in the snapshot.
    pub fn property_count(&self) -> usize {
        self.entries.len()
    }

    /// Count of properties still awaiting upload.
    pub fn pending_upload_count(&self) -> usize {
        self.entries
            .values()
            .filter(|e| e.meta.needs_upload)
            .count()
    }

    /// Serialize to JSON with deterministic ordering.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| StoreError::InvalidSnapshot(e.to_string()))
    }

    /// Serialize to pretty JSON with deterministic ordering.
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| StoreError::InvalidSnapshot(e.to_string()))
    }

    /// Deserialize from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: Self =
            serde_json::from_str(json).map_err(|e| StoreError::InvalidSnapshot(e.to_string()))?;

        // Validate format version
        if snapshot.format_version > SNAPSHOT_FORMAT_VERSION {
            return Err(StoreError::InvalidSnapshot(format!(
                "unsupported snapshot format version: {} (max supported: {})",
                snapshot.format_version, SNAPSHOT_FORMAT_VERSION
            )));
        }

        Ok(snapshot)
    }
}

/// Metadata about a snapshot (without the full data).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotMetadata {
    /// Snapshot format version
    pub format_version: u32,
    /// Total property count
    pub property_count: usize,
    /// Properties still awaiting upload
    pub pending_upload_count: usize,
}

impl From<&StoreSnapshot> for SnapshotMetadata {
    fn from(snapshot: &StoreSnapshot) -> Self {
        Self {
            format_version: snapshot.format_version,
            property_count: snapshot.property_count(),
            pending_upload_count: snapshot.pending_upload_count(),
        }
    }
}
