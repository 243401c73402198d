//! Integration tests for the room-core layout engine.
//!
//! These tests drive the public API end-to-end: catalog lookup, placement,
//! room resizing, and the snapshot codec together.

use std::sync::Arc;

use room_core::{
    decode_snapshot, deserialize, encode_snapshot, serialize, Catalog, LayoutError,
    PlacementStore, Rgb, Room, Vec3, EPSILON,
};

const GOLD: Rgb = Rgb::new(0xD4, 0xAF, 0x37);

fn default_store() -> PlacementStore {
    PlacementStore::new(Room::default(), Arc::new(Catalog::default()))
}

#[test]
fn test_sofa_scenario_add_then_rejected_move_keeps_position() {
    let mut store = default_store();

    let id = store
        .add("sofa".into(), Vec3::new(0.0, 1.0, 0.0), 0.0, GOLD)
        .expect("sofa at the origin corner must fit");
    assert_eq!(store.len(), 1);

    let result = store.move_item(id, Vec3::new(19.0, 1.0, 0.0));

    assert_eq!(result, Err(LayoutError::OutOfBounds { id: Some(id) }));
    assert_eq!(store.get(id).unwrap().position, Vec3::new(0.0, 1.0, 0.0));
}

#[test]
fn test_sofa_scenario_shrink_room_keeps_item_inside() {
    let mut store = default_store();
    let id = store
        .add("sofa".into(), Vec3::new(0.0, 1.0, 0.0), 0.0, GOLD)
        .unwrap();
    let far = store
        .add("sofa".into(), Vec3::new(15.0, 1.0, 0.0), 0.0, GOLD)
        .unwrap();

    store.set_room_dimensions(5.0, 5.0, 8.0).expect("both sofas fit a 5x5 room");

    assert_eq!(store.len(), 2, "shrinking must never delete furniture");
    for item_id in [id, far] {
        let bbox = store.bounding_box(item_id).unwrap();
        assert!(store.room().contains(&bbox));
    }
    assert!((store.get(far).unwrap().position.x - 2.0).abs() < EPSILON);
}

#[test]
fn test_sofa_scenario_rotate_450_stores_90() {
    let mut store = default_store();
    let id = store
        .add("sofa".into(), Vec3::new(0.0, 1.0, 0.0), 0.0, GOLD)
        .unwrap();

    store.rotate(id, 450.0).expect("quarter turn fits");

    assert_eq!(store.get(id).unwrap().rotation_y, 90.0);
}

#[test]
fn test_item_count_is_unchanged_by_any_successful_resize() {
    let mut store = default_store();
    for (i, kind) in ["sofa", "chair", "table", "bed"].iter().enumerate() {
        let offset = i as f64 * 4.0;
        store
            .add((*kind).into(), Vec3::new(offset, 0.0, offset), 0.0, GOLD)
            .unwrap();
    }

    for (w, l) in [(12.0, 12.0), (6.0, 4.0), (25.0, 30.0), (3.5, 3.5)] {
        let before = store.len();
        if store.set_room_dimensions(w, l, 8.0).is_ok() {
            assert_eq!(store.len(), before);
        }
    }
}

#[test]
fn test_snapshot_text_round_trip_restores_equal_layout() {
    let mut store = default_store();
    store
        .add("sofa".into(), Vec3::new(0.0, 1.0, 0.0), 0.0, GOLD)
        .unwrap();
    let bed = store
        .add("bed".into(), Vec3::new(8.0, 0.0, 8.0), 0.0, Rgb::new(0x8B, 0x45, 0x13))
        .unwrap();
    store.rotate(bed, 30.0).unwrap();
    store.set_room_dimensions(18.0, 16.0, 9.0).unwrap();

    let text = encode_snapshot(&serialize(store.room(), store.list())).unwrap();
    let restored = deserialize(&decode_snapshot(&text).unwrap(), Arc::new(Catalog::default()))
        .expect("restores");

    assert_eq!(restored.room(), store.room());
    assert_eq!(restored.list(), store.list());
}

#[test]
fn test_snapshot_round_trip_keeps_item_within_wall_tolerance_exactly() {
    let mut store = default_store();
    let position = Vec3::new(19.0 + EPSILON / 2.0, 0.0, -EPSILON / 2.0);
    store
        .add("chair".into(), position, 0.0, GOLD)
        .expect("within tolerance of the far wall");

    let text = encode_snapshot(&serialize(store.room(), store.list())).unwrap();
    let restored = deserialize(&decode_snapshot(&text).unwrap(), Arc::new(Catalog::default()))
        .expect("restores");

    assert_eq!(restored.list(), store.list());
    assert_eq!(restored.list()[0].position, position);
}

#[test]
fn test_restored_store_keeps_issuing_fresh_ids() {
    let mut store = default_store();
    let original = store
        .add("chair".into(), Vec3::default(), 0.0, GOLD)
        .unwrap();
    let snapshot = serialize(store.room(), store.list());

    let mut restored = deserialize(&snapshot, Arc::new(Catalog::default())).unwrap();
    let added = restored
        .add("chair".into(), Vec3::new(2.0, 0.0, 2.0), 0.0, GOLD)
        .unwrap();

    assert_ne!(added, original);
    assert_eq!(restored.len(), 2);
}
