//! Layout snapshots: the persistable form of a room plus its furniture.
//!
//! A [`LayoutSnapshot`] is a plain value.  It is copied out of the live
//! [`PlacementStore`] by [`serialize`] and turned back into a store by
//! [`deserialize`], which re-validates everything because the snapshot may
//! come from an older catalog or an untrusted sharing service.
//!
//! The field set of [`LayoutSnapshot`] is the only bit-exact contract with the
//! persistence service; [`codec`] fixes its JSON encoding.

pub mod codec;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::catalog::{Catalog, FurnitureKind, Rgb};
use crate::domain::error::LayoutError;
use crate::domain::placement::{FurnitureId, PlacedFurniture, PlacementStore};
use crate::domain::room::Room;

/// Current snapshot schema version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// A complete, persistable layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutSnapshot {
    pub version: u32,
    pub room: SnapshotRoom,
    /// Items in insertion order.
    pub items: Vec<SnapshotItem>,
}

/// Room dimensions as stored; validated on [`deserialize`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnapshotRoom {
    pub width: f64,
    pub length: f64,
    pub height: f64,
}

/// One placed item as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotItem {
    pub id: FurnitureId,
    pub kind: FurnitureKind,
    /// `[x, y, z]` of the bounding box's minimum corner.
    pub position: [f64; 3],
    pub rotation_y: f64,
    pub color: Rgb,
}

/// Captures `room` and `items` as a snapshot value.
pub fn serialize(room: &Room, items: &[PlacedFurniture]) -> LayoutSnapshot {
    LayoutSnapshot {
        version: SNAPSHOT_VERSION,
        room: SnapshotRoom {
            width: room.width(),
            length: room.length(),
            height: room.height(),
        },
        items: items
            .iter()
            .map(|item| SnapshotItem {
                id: item.id,
                kind: item.kind.clone(),
                position: item.position.to_array(),
                rotation_y: item.rotation_y,
                color: item.color,
            })
            .collect(),
    }
}

/// Rebuilds a placement store from `snapshot`.
///
/// Item ids are kept.  Every item is reconciled against the room using the
/// footprints in `catalog`, so a snapshot written when an archetype was smaller
/// still loads with its items pulled inside the walls.
///
/// # Errors
///
/// - [`LayoutError::MalformedSnapshot`] for an unsupported version,
///   non-positive room dimensions, non-finite coordinates, or duplicate ids.
/// - [`LayoutError::UnknownArchetype`] if an item's kind is not in `catalog`.
/// - [`LayoutError::OutOfBounds`] if an item can no longer fit in the room.
pub fn deserialize(
    snapshot: &LayoutSnapshot,
    catalog: Arc<Catalog>,
) -> Result<PlacementStore, LayoutError> {
    if snapshot.version != SNAPSHOT_VERSION {
        return Err(LayoutError::MalformedSnapshot(format!(
            "unsupported snapshot version {}",
            snapshot.version
        )));
    }

    let SnapshotRoom {
        width,
        length,
        height,
    } = snapshot.room;
    let room = Room::new(width, length, height)
        .map_err(|e| LayoutError::MalformedSnapshot(e.to_string()))?;

    let mut items = Vec::with_capacity(snapshot.items.len());
    for item in &snapshot.items {
        let finite = item.position.iter().all(|v| v.is_finite()) && item.rotation_y.is_finite();
        if !finite {
            return Err(LayoutError::MalformedSnapshot(format!(
                "item {} has a non-finite position or rotation",
                item.id
            )));
        }
        items.push(PlacedFurniture {
            id: item.id,
            kind: item.kind.clone(),
            position: item.position.into(),
            rotation_y: item.rotation_y,
            color: item.color,
        });
    }

    PlacementStore::restore(room, catalog, items)
}
