//! The property aggregate - the top-level unit of synchronization.

use crate::{InventoryReport, InventoryType, PhotoReference, PropertyId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of property being let.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PropertyKind {
    House,
    Flat,
    Bungalow,
    Studio,
    Maisonette,
    Other,
}

/// Lifecycle status of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PropertyStatus {
    /// Under active management
    Active,
    /// Awaiting tenancy or inspection
    Pending,
    /// No longer managed; retained for records
    Archived,
}

/// An embedded landlord or tenant contact record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRecord {
    /// Contact name
    pub name: String,
    /// Contact email
    pub email: Option<String>,
    /// Contact phone number
    pub phone: Option<String>,
}

impl ContactRecord {
    /// Create a contact with just a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: None,
            phone: None,
        }
    }
}

/// A managed property with its embedded inventory subgraph.
///
/// This is the whole document that travels to and from the remote backend;
/// rooms and items are embedded, not stored as separate documents. Local
/// sync bookkeeping lives outside this type, in the store's
/// [`SyncMeta`](crate::SyncMeta), and is never sent remotely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    /// Unique identifier for this property
    pub id: PropertyId,
    /// Identity that owns this property
    pub owner_id: String,
    /// Display name, e.g. "Harbour View"
    pub display_name: String,
    /// Postal address
    pub address: String,
    /// Kind of property
    pub kind: PropertyKind,
    /// Lifecycle status
    pub status: PropertyStatus,
    /// Kind of inventory currently expected for this property
    pub inventory_type: InventoryType,
    /// Landlord contact record
    pub landlord: ContactRecord,
    /// Tenant contact record, once a tenancy exists
    pub tenant: Option<ContactRecord>,
    /// Exterior or cover photo
    pub photo: Option<PhotoReference>,
    /// The inventory report for this property, once started
    pub report: Option<InventoryReport>,
    /// When the property was created
    pub created_at: DateTime<Utc>,
    /// When the property or any of its children was last edited
    pub updated_at: DateTime<Utc>,
}

impl Property {
    /// Create a new property owned by the given identity.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        owner_id: impl Into<String>,
        display_name: impl Into<String>,
        address: impl Into<String>,
        kind: PropertyKind,
        inventory_type: InventoryType,
        landlord: ContactRecord,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id: owner_id.into(),
            display_name: display_name.into(),
            address: address.into(),
            kind,
            status: PropertyStatus::Active,
            inventory_type,
            landlord,
            tenant: None,
            photo: None,
            report: None,
            created_at: at,
            updated_at: at,
        }
    }

    /// Record an edit time. Callers mutate fields directly and then touch.
    pub fn touch(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn test_property() -> Property {
        Property::new(
            "landlord-1",
            "Harbour View",
            "12 Harbour Lane, Brighton",
            PropertyKind::Flat,
            InventoryType::CheckIn,
            ContactRecord::new("J. Whitmore"),
            Utc::now(),
        )
    }

    #[test]
    fn new_property_defaults() {
        let property = test_property();
        assert_eq!(property.status, PropertyStatus::Active);
        assert!(property.tenant.is_none());
        assert!(property.report.is_none());
        assert_eq!(property.created_at, property.updated_at);
    }

    #[test]
    fn touch_bumps_updated_at() {
        let mut property = test_property();
        let later = property.created_at + Duration::minutes(5);
        property.touch(later);
        assert_eq!(property.updated_at, later);
        assert!(property.updated_at > property.created_at);
    }

    #[test]
    fn serialization_roundtrip() {
        let mut property = test_property();
        property.tenant = Some(ContactRecord::new("A. Osei"));
        property.report = Some(InventoryReport::new(
            InventoryType::CheckIn,
            property.created_at,
        ));

        let json = serde_json::to_string(&property).unwrap();
        assert!(json.contains("ownerId"));
        assert!(json.contains("displayName"));
        // Timestamps travel as RFC 3339 text
        assert!(json.contains("createdAt"));

        let parsed: Property = serde_json::from_str(&json).unwrap();
        assert_eq!(property, parsed);
    }
}
