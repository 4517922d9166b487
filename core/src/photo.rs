//! Photo references attached to properties, rooms and items.

use crate::PhotoId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A reference to a captured photo.
///
/// Created when a photo is taken on-device; the remote URL is filled in once
/// the blob upload completes. A reference is owned by exactly one property,
/// room or item - never shared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoReference {
    /// Unique identifier for this photo
    pub id: PhotoId,
    /// Original capture file name
    pub file_name: String,
    /// Path in on-device storage, if still present locally
    pub local_path: Option<String>,
    /// URL in the remote blob store, once uploaded
    pub remote_url: Option<String>,
    /// When the upload completed
    pub uploaded_at: Option<DateTime<Utc>>,
    /// When the photo was captured
    pub created_at: DateTime<Utc>,
}

impl PhotoReference {
    /// Create a reference for a freshly captured photo.
    pub fn new(file_name: impl Into<String>, captured_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            file_name: file_name.into(),
            local_path: None,
            remote_url: None,
            uploaded_at: None,
            created_at: captured_at,
        }
    }

    /// Record a completed blob upload.
    pub fn mark_uploaded(&mut self, url: impl Into<String>, at: DateTime<Utc>) {
        self.remote_url = Some(url.into());
        self.uploaded_at = Some(at);
    }

    /// Whether the photo has reached the remote blob store.
    pub fn is_uploaded(&self) -> bool {
        self.remote_url.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_photo_is_not_uploaded() {
        let photo = PhotoReference::new("kitchen-01.jpg", Utc::now());
        assert_eq!(photo.file_name, "kitchen-01.jpg");
        assert!(!photo.is_uploaded());
        assert!(photo.uploaded_at.is_none());
    }

    #[test]
    fn mark_uploaded_sets_url_and_timestamp() {
        let mut photo = PhotoReference::new("kitchen-01.jpg", Utc::now());
        let at = Utc::now();
        photo.mark_uploaded("https://blobs.example/kitchen-01.jpg", at);

        assert!(photo.is_uploaded());
        assert_eq!(
            photo.remote_url.as_deref(),
            Some("https://blobs.example/kitchen-01.jpg")
        );
        assert_eq!(photo.uploaded_at, Some(at));
    }

    #[test]
    fn serialization_roundtrip() {
        let photo = PhotoReference::new("hall.jpg", Utc::now());
        let json = serde_json::to_string(&photo).unwrap();
        assert!(json.contains("fileName")); // camelCase
        let parsed: PhotoReference = serde_json::from_str(&json).unwrap();
        assert_eq!(photo, parsed);
    }
}
