//! Cache bound tests for propsync-core
//!
//! These tests exercise the recency cap and flag lifecycle across whole
//! store interactions, the way the client drives them.

use chrono::Duration;
use propsync_core::{
    ContactRecord, EntityStore, InventoryItem, InventoryReport, InventoryType, ItemCategory,
    LruPolicy, ManualClock, Property, PropertyKind, Room, RoomKind,
};
use propsync_core::{Clock, Condition};
use std::sync::Arc;

fn property(clock: &ManualClock, name: &str) -> Property {
    Property::new(
        "landlord-1",
        name,
        "14 Circus Street, Brighton",
        PropertyKind::House,
        InventoryType::CheckIn,
        ContactRecord::new("J. Whitmore"),
        clock.now(),
    )
}

// ============================================================================
// Capacity invariant
// ============================================================================

#[test]
fn store_never_exceeds_capacity_across_mixed_writes() {
    let clock = Arc::new(ManualClock::new());
    let mut store = EntityStore::new(LruPolicy::new(3), clock.clone());

    for i in 0..20 {
        clock.advance(Duration::seconds(30));
        let p = property(&clock, &format!("p{i}"));
        if i % 2 == 0 {
            store.upsert(p);
        } else {
            store.apply_remote(p);
        }
        assert!(store.len() <= 3, "cap violated after write {i}");
    }
}

#[test]
fn eviction_scenario_capacity_two() {
    // Upsert A, B, C with increasing access times: A must go, B and C stay.
    let clock = Arc::new(ManualClock::new());
    let mut store = EntityStore::new(LruPolicy::new(2), clock.clone());

    let a = property(&clock, "a");
    let a_id = a.id;
    store.upsert(a);

    clock.advance(Duration::minutes(1));
    let b = property(&clock, "b");
    let b_id = b.id;
    store.upsert(b);

    clock.advance(Duration::minutes(1));
    let c = property(&clock, "c");
    let c_id = c.id;
    store.upsert(c);

    assert_eq!(store.len(), 2);
    assert!(store.peek(a_id).is_none());
    assert!(store.peek(b_id).is_some());
    assert!(store.peek(c_id).is_some());
}

#[test]
fn re_upserting_an_existing_property_does_not_evict() {
    let clock = Arc::new(ManualClock::new());
    let mut store = EntityStore::new(LruPolicy::new(2), clock.clone());

    let a = property(&clock, "a");
    let a_id = a.id;
    store.upsert(a.clone());

    clock.advance(Duration::minutes(1));
    let b = property(&clock, "b");
    let b_id = b.id;
    store.upsert(b);

    // Editing `a` again replaces it in place; nothing is over capacity.
    clock.advance(Duration::minutes(1));
    store.upsert(a);

    assert_eq!(store.len(), 2);
    assert!(store.peek(a_id).is_some());
    assert!(store.peek(b_id).is_some());
}

// ============================================================================
// Flag lifecycle across the whole graph
// ============================================================================

#[test]
fn local_edit_of_nested_item_dirties_the_aggregate() {
    let clock = Arc::new(ManualClock::new());
    let mut store = EntityStore::new(LruPolicy::new(5), clock.clone());

    let mut p = property(&clock, "Harbour View");
    let id = p.id;
    let mut report = InventoryReport::new(InventoryType::CheckIn, clock.now());
    let mut room = Room::new("Kitchen", RoomKind::Kitchen, clock.now());
    room.items.push(InventoryItem::new(
        "Oven",
        ItemCategory::Appliance,
        Condition::Good,
        clock.now(),
    ));
    report.rooms.push(room);
    p.report = Some(report);
    store.upsert(p);
    store.mark_synced(id).unwrap();

    // UI edits the item's condition and writes the aggregate back
    clock.advance(Duration::minutes(2));
    let mut edited = store.get(id).unwrap().clone();
    edited.report.as_mut().unwrap().rooms[0].items[0].condition = Condition::Damaged;
    edited.touch(clock.now());
    store.upsert(edited);

    let meta = store.meta(id).unwrap();
    assert!(meta.needs_upload);
    assert!(!meta.is_synced);
    assert_eq!(
        store.peek(id).unwrap().report.as_ref().unwrap().rooms[0].items[0].condition,
        Condition::Damaged
    );
}

#[test]
fn evicted_property_takes_its_subgraph_with_it() {
    let clock = Arc::new(ManualClock::new());
    let mut store = EntityStore::new(LruPolicy::new(1), clock.clone());

    let mut a = property(&clock, "a");
    a.report = Some(InventoryReport::new(InventoryType::CheckOut, clock.now()));
    let a_id = a.id;
    store.upsert(a);

    clock.advance(Duration::minutes(1));
    store.upsert(property(&clock, "b"));

    // The whole aggregate is gone, report included
    assert!(store.peek(a_id).is_none());
    assert!(store.list_needing_upload().iter().all(|p| p.id != a_id));
}

// ============================================================================
// Recency listing
// ============================================================================

#[test]
fn recency_listing_reflects_reads_not_just_writes() {
    let clock = Arc::new(ManualClock::new());
    let mut store = EntityStore::new(LruPolicy::new(5), clock.clone());

    let a = property(&clock, "a");
    let a_id = a.id;
    store.upsert(a);

    clock.advance(Duration::minutes(1));
    let b = property(&clock, "b");
    let b_id = b.id;
    store.upsert(b);

    clock.advance(Duration::minutes(1));
    store.get(a_id);

    let recent = store.list_by_recency(5);
    assert_eq!(recent[0].id, a_id);
    assert_eq!(recent[1].id, b_id);
}
