//! Snapshot persistence.
//!
//! The engine writes the full store snapshot after every completed cycle
//! and restores it on startup, so pending uploads survive app restarts.

use propsync_core::StoreSnapshot;
use std::io;
use std::path::Path;

/// Write a snapshot to `path`, creating parent directories as needed.
pub async fn save_snapshot(path: &Path, snapshot: &StoreSnapshot) -> io::Result<()> {
    let json = snapshot
        .to_json()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, json).await
}

/// Read a snapshot back, `Ok(None)` if none has been written yet.
pub async fn load_snapshot(path: &Path) -> io::Result<Option<StoreSnapshot>> {
    let json = match tokio::fs::read_to_string(path).await {
        Ok(json) => json,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };
    let snapshot = StoreSnapshot::from_json(&json)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    Ok(Some(snapshot))
}
