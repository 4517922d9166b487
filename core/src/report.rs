//! Inventory reports and their owned room/item subgraph.
//!
//! A report belongs to exactly one property and embeds its rooms, which in
//! turn embed their items. Completion figures are always computed from the
//! current child state - they are never persisted as denormalized truth.

use crate::{ItemId, PhotoReference, ReportId, RoomId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The kind of inventory being compiled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InventoryType {
    /// Compiled when a tenancy starts
    CheckIn,
    /// Compiled when a tenancy ends
    CheckOut,
    /// Mid-tenancy inspection
    Interim,
}

/// Recorded condition of an inventory item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    Excellent,
    Good,
    Fair,
    Poor,
    Damaged,
    Missing,
}

/// Category of an inventory item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ItemCategory {
    Furniture,
    Appliance,
    Fixture,
    Decoration,
    Flooring,
    Other,
}

/// Kind of room being inventoried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RoomKind {
    Kitchen,
    Bathroom,
    Bedroom,
    LivingRoom,
    DiningRoom,
    Hallway,
    Garage,
    Garden,
    Other,
}

/// A captured signature image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signature {
    /// Base64-encoded signature image
    pub image: String,
    /// When the signature was captured
    pub signed_at: DateTime<Utc>,
}

/// A single inventoried item, owned by exactly one room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    /// Unique identifier for this item
    pub id: ItemId,
    /// Display name, e.g. "Oven" or "Three-seat sofa"
    pub name: String,
    /// Item category
    pub category: ItemCategory,
    /// Recorded condition
    pub condition: Condition,
    /// Free-form description
    pub description: Option<String>,
    /// Photos of this item
    pub photos: Vec<PhotoReference>,
    /// Inspector notes
    pub notes: Option<String>,
    /// Whether the inspector has finished recording this item
    pub is_complete: bool,
    /// When the item was added to the inventory
    pub created_at: DateTime<Utc>,
    /// When the item was last edited
    pub updated_at: DateTime<Utc>,
}

impl InventoryItem {
    /// Create a new item in the given category, initially incomplete.
    pub fn new(
        name: impl Into<String>,
        category: ItemCategory,
        condition: Condition,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            category,
            condition,
            description: None,
            photos: Vec::new(),
            notes: None,
            is_complete: false,
            created_at: at,
            updated_at: at,
        }
    }
}

/// A room within an inventory report, owning its items in recorded order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    /// Unique identifier for this room
    pub id: RoomId,
    /// Display name, e.g. "Master bedroom"
    pub name: String,
    /// Room kind
    pub kind: RoomKind,
    /// Items in this room, order-preserving
    pub items: Vec<InventoryItem>,
    /// Room-level photos
    pub photos: Vec<PhotoReference>,
    /// Inspector notes
    pub notes: Option<String>,
    /// When the room was added to the report
    pub created_at: DateTime<Utc>,
    /// When the room was last edited
    pub updated_at: DateTime<Utc>,
}

impl Room {
    /// Create an empty room.
    pub fn new(name: impl Into<String>, kind: RoomKind, at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind,
            items: Vec::new(),
            photos: Vec::new(),
            notes: None,
            created_at: at,
            updated_at: at,
        }
    }

    /// Count of items marked complete.
    pub fn completed_items(&self) -> usize {
        self.items.iter().filter(|i| i.is_complete).count()
    }

    /// Percentage of items marked complete, 0 for an empty room.
    pub fn completion_percentage(&self) -> f64 {
        if self.items.is_empty() {
            return 0.0;
        }
        self.completed_items() as f64 / self.items.len() as f64 * 100.0
    }
}

/// An inventory report, owned 1:1 by a property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryReport {
    /// Unique identifier for this report
    pub id: ReportId,
    /// Kind of inventory being compiled
    pub inventory_type: InventoryType,
    /// Rooms in this report
    pub rooms: Vec<Room>,
    /// Landlord sign-off, once given
    pub landlord_signature: Option<Signature>,
    /// Tenant sign-off, once given
    pub tenant_signature: Option<Signature>,
    /// When the report was completed
    pub completed_at: Option<DateTime<Utc>>,
    /// When the report was created
    pub created_at: DateTime<Utc>,
    /// When the report was last edited
    pub updated_at: DateTime<Utc>,
}

impl InventoryReport {
    /// Create an empty report.
    pub fn new(inventory_type: InventoryType, at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            inventory_type,
            rooms: Vec::new(),
            landlord_signature: None,
            tenant_signature: None,
            completed_at: None,
            created_at: at,
            updated_at: at,
        }
    }

    /// Total item count across all rooms.
    pub fn total_items(&self) -> usize {
        self.rooms.iter().map(|r| r.items.len()).sum()
    }

    /// Count of items marked complete across all rooms.
    pub fn completed_items(&self) -> usize {
        self.rooms.iter().map(|r| r.completed_items()).sum()
    }

    /// Percentage of items marked complete, 0 for an empty report.
    pub fn completion_percentage(&self) -> f64 {
        let total = self.total_items();
        if total == 0 {
            return 0.0;
        }
        self.completed_items() as f64 / total as f64 * 100.0
    }

    /// A report is complete once both parties have signed and it has rooms.
    pub fn is_complete(&self) -> bool {
        self.landlord_signature.is_some()
            && self.tenant_signature.is_some()
            && !self.rooms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room_with_items(complete: usize, incomplete: usize) -> Room {
        let at = Utc::now();
        let mut room = Room::new("Kitchen", RoomKind::Kitchen, at);
        for i in 0..complete {
            let mut item = InventoryItem::new(
                format!("item-{i}"),
                ItemCategory::Appliance,
                Condition::Good,
                at,
            );
            item.is_complete = true;
            room.items.push(item);
        }
        for i in 0..incomplete {
            room.items.push(InventoryItem::new(
                format!("todo-{i}"),
                ItemCategory::Fixture,
                Condition::Fair,
                at,
            ));
        }
        room
    }

    fn signature() -> Signature {
        Signature {
            image: "aW1n".into(),
            signed_at: Utc::now(),
        }
    }

    #[test]
    fn empty_room_is_zero_percent() {
        let room = Room::new("Hall", RoomKind::Hallway, Utc::now());
        assert_eq!(room.completion_percentage(), 0.0);
    }

    #[test]
    fn room_completion_percentage() {
        let room = room_with_items(3, 1);
        assert_eq!(room.completed_items(), 3);
        assert_eq!(room.completion_percentage(), 75.0);
    }

    #[test]
    fn report_totals_span_rooms() {
        let mut report = InventoryReport::new(InventoryType::CheckIn, Utc::now());
        report.rooms.push(room_with_items(2, 2));
        report.rooms.push(room_with_items(1, 0));

        assert_eq!(report.total_items(), 5);
        assert_eq!(report.completed_items(), 3);
        assert_eq!(report.completion_percentage(), 60.0);
    }

    #[test]
    fn empty_report_is_zero_percent() {
        let report = InventoryReport::new(InventoryType::Interim, Utc::now());
        assert_eq!(report.completion_percentage(), 0.0);
    }

    #[test]
    fn report_completeness_requires_both_signatures_and_rooms() {
        let mut report = InventoryReport::new(InventoryType::CheckOut, Utc::now());
        assert!(!report.is_complete());

        report.landlord_signature = Some(signature());
        report.tenant_signature = Some(signature());
        // Signed but empty: still incomplete
        assert!(!report.is_complete());

        report.rooms.push(room_with_items(0, 1));
        assert!(report.is_complete());
    }

    #[test]
    fn condition_serializes_lowercase() {
        let json = serde_json::to_string(&Condition::Damaged).unwrap();
        assert_eq!(json, "\"damaged\"");
        let parsed: Condition = serde_json::from_str("\"missing\"").unwrap();
        assert_eq!(parsed, Condition::Missing);
    }

    #[test]
    fn report_serialization_roundtrip() {
        let mut report = InventoryReport::new(InventoryType::CheckIn, Utc::now());
        report.rooms.push(room_with_items(1, 1));
        report.landlord_signature = Some(signature());

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("inventoryType"));
        assert!(json.contains("landlordSignature"));

        let parsed: InventoryReport = serde_json::from_str(&json).unwrap();
        assert_eq!(report, parsed);
    }
}
