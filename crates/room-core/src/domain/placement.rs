//! Placement store: the authoritative collection of placed furniture.
//!
//! The store owns the [`Room`], a shared handle to the [`Catalog`], and every
//! [`PlacedFurniture`] in insertion order.  No other component mutates items.
//!
//! # Containment
//!
//! Every mutating operation computes the item's rotated bounding box *before*
//! touching the stored entry and commits only if [`Room::contains`] accepts it.
//! A rejected operation therefore leaves the store exactly as it was.
//!
//! Furniture may overlap other furniture; only furniture-vs-room containment
//! is enforced.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use super::catalog::{Catalog, FurnitureKind, Rgb};
use super::error::LayoutError;
use super::geometry::{normalize_degrees, BoundingBox, Vec3};
use super::room::Room;

/// Unique identifier for a placed item, derived from UUID v4.
pub type FurnitureId = Uuid;

/// One furniture instance placed in the room.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedFurniture {
    pub id: FurnitureId,
    pub kind: FurnitureKind,
    /// Minimum corner of the rotated bounding box.
    pub position: Vec3,
    /// Rotation about the vertical axis in degrees, always in `[0, 360)`.
    pub rotation_y: f64,
    pub color: Rgb,
}

/// The ordered set of placed furniture for one session.
#[derive(Debug, Clone)]
pub struct PlacementStore {
    room: Room,
    catalog: Arc<Catalog>,
    items: Vec<PlacedFurniture>,
    /// Every id handed out so far, including removed ones.
    issued: HashSet<FurnitureId>,
}

impl PlacementStore {
    /// Creates an empty store for `room`.
    pub fn new(room: Room, catalog: Arc<Catalog>) -> Self {
        Self {
            room,
            catalog,
            items: Vec::new(),
            issued: HashSet::new(),
        }
    }

    /// Rebuilds a store from previously persisted items.
    ///
    /// Rotations are normalized and every item is reconciled against `room`
    /// using the catalog's current footprints, the same way
    /// [`set_room_dimensions`](Self::set_room_dimensions) does.
    ///
    /// # Errors
    ///
    /// - [`LayoutError::MalformedSnapshot`] if two items share an id.
    /// - [`LayoutError::UnknownArchetype`] if an item's kind is not in `catalog`.
    /// - [`LayoutError::OutOfBounds`] if an item cannot fit in `room` at all.
    pub fn restore(
        room: Room,
        catalog: Arc<Catalog>,
        items: Vec<PlacedFurniture>,
    ) -> Result<Self, LayoutError> {
        let mut issued = HashSet::with_capacity(items.len());
        let mut restored = Vec::with_capacity(items.len());
        for mut item in items {
            if !issued.insert(item.id) {
                return Err(LayoutError::MalformedSnapshot(format!(
                    "duplicate furniture id {}",
                    item.id
                )));
            }
            catalog.lookup(&item.kind)?;
            item.rotation_y = normalize_degrees(item.rotation_y);
            restored.push(item);
        }

        let mut store = Self {
            room,
            catalog,
            items: restored,
            issued,
        };
        store.reconcile(room)?;
        Ok(store)
    }

    /// The current room.
    pub fn room(&self) -> &Room {
        &self.room
    }

    /// The catalog this store validates kinds against.
    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// All placed items in insertion order.
    pub fn list(&self) -> &[PlacedFurniture] {
        &self.items
    }

    /// Returns the item with `id`, if present.
    pub fn get(&self, id: FurnitureId) -> Option<&PlacedFurniture> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the rotated bounding box of the item with `id`.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::NotFound`] if no item has this id.
    pub fn bounding_box(&self, id: FurnitureId) -> Result<BoundingBox, LayoutError> {
        let item = self.get(id).ok_or(LayoutError::NotFound(id))?;
        let extent = self.extent_of(&item.kind, item.rotation_y)?;
        Ok(BoundingBox::from_anchor(item.position, extent))
    }

    /// Places a new item and returns its freshly issued id.
    ///
    /// # Errors
    ///
    /// - [`LayoutError::UnknownArchetype`] if `kind` is not in the catalog.
    /// - [`LayoutError::OutOfBounds`] if the rotated footprint at `position`
    ///   would leave the room.
    pub fn add(
        &mut self,
        kind: FurnitureKind,
        position: Vec3,
        rotation_y: f64,
        color: Rgb,
    ) -> Result<FurnitureId, LayoutError> {
        let rotation_y = normalize_degrees(rotation_y);
        let extent = self.extent_of(&kind, rotation_y)?;
        if !self
            .room
            .contains(&BoundingBox::from_anchor(position, extent))
        {
            return Err(LayoutError::OutOfBounds { id: None });
        }

        let id = self.issue_id();
        debug!(%id, %kind, ?position, rotation_y, "furniture added");
        self.items.push(PlacedFurniture {
            id,
            kind,
            position,
            rotation_y,
            color,
        });
        Ok(id)
    }

    /// Moves an item to `position`, keeping its rotation.
    ///
    /// Safe to call once per drag frame: it has no effect beyond the position
    /// update.
    ///
    /// # Errors
    ///
    /// - [`LayoutError::NotFound`] if no item has this id.
    /// - [`LayoutError::OutOfBounds`] if the item would leave the room; the
    ///   item stays where it was.
    pub fn move_item(&mut self, id: FurnitureId, position: Vec3) -> Result<(), LayoutError> {
        let index = self.index_of(id)?;
        let item = &self.items[index];
        let extent = self.extent_of(&item.kind, item.rotation_y)?;
        if !self
            .room
            .contains(&BoundingBox::from_anchor(position, extent))
        {
            return Err(LayoutError::OutOfBounds { id: Some(id) });
        }

        self.items[index].position = position;
        debug!(%id, ?position, "furniture moved");
        Ok(())
    }

    /// Sets an item's rotation, keeping its position.
    ///
    /// The angle is normalized into `[0, 360)` before the bounds check and the
    /// normalized value is returned.
    ///
    /// # Errors
    ///
    /// - [`LayoutError::NotFound`] if no item has this id.
    /// - [`LayoutError::OutOfBounds`] if the rotated footprint would leave the
    ///   room; the item keeps its previous rotation.
    pub fn rotate(&mut self, id: FurnitureId, rotation_y: f64) -> Result<f64, LayoutError> {
        let rotation_y = normalize_degrees(rotation_y);
        let index = self.index_of(id)?;
        let item = &self.items[index];
        let extent = self.extent_of(&item.kind, rotation_y)?;
        if !self
            .room
            .contains(&BoundingBox::from_anchor(item.position, extent))
        {
            return Err(LayoutError::OutOfBounds { id: Some(id) });
        }

        self.items[index].rotation_y = rotation_y;
        debug!(%id, rotation_y, "furniture rotated");
        Ok(rotation_y)
    }

    /// Changes an item's color.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::NotFound`] if no item has this id.
    pub fn recolor(&mut self, id: FurnitureId, color: Rgb) -> Result<(), LayoutError> {
        let index = self.index_of(id)?;
        self.items[index].color = color;
        debug!(%id, %color, "furniture recolored");
        Ok(())
    }

    /// Removes an item and returns it.  Its id is never issued again.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::NotFound`] if no item has this id.
    pub fn remove(&mut self, id: FurnitureId) -> Result<PlacedFurniture, LayoutError> {
        let index = self.index_of(id)?;
        let removed = self.items.remove(index);
        debug!(%id, "furniture removed");
        Ok(removed)
    }

    /// Replaces the room and pulls every item back inside it.
    ///
    /// Items that no longer fit are moved to the nearest in-bounds anchor with
    /// the same rotation.  Nothing is ever deleted, so the item count is
    /// unchanged.  Returns how many items were moved.
    ///
    /// # Errors
    ///
    /// - [`LayoutError::InvalidDimension`] if any dimension is not positive.
    /// - [`LayoutError::OutOfBounds`] if some item is larger than the new room
    ///   on any axis.  The room and all items keep their previous values.
    pub fn set_room_dimensions(
        &mut self,
        width: f64,
        length: f64,
        height: f64,
    ) -> Result<usize, LayoutError> {
        let room = Room::new(width, length, height)?;
        let moved = self.reconcile(room)?;
        debug!(width, length, height, moved, "room dimensions changed");
        Ok(moved)
    }

    // ── Private helpers ───────────────────────────────────────────────────────

    /// Clamps every item that no longer fits in `room` and commits the new
    /// anchors together with the room, or changes nothing.  Items already
    /// contained keep their exact position.
    fn reconcile(&mut self, room: Room) -> Result<usize, LayoutError> {
        let mut anchors = Vec::with_capacity(self.items.len());
        for item in &self.items {
            let extent = self.extent_of(&item.kind, item.rotation_y)?;
            if room.contains(&BoundingBox::from_anchor(item.position, extent)) {
                anchors.push(item.position);
                continue;
            }
            let anchor = room
                .clamp_anchor(item.position, extent)
                .ok_or(LayoutError::OutOfBounds { id: Some(item.id) })?;
            anchors.push(anchor);
        }

        let mut moved = 0;
        for (item, anchor) in self.items.iter_mut().zip(anchors) {
            if item.position != anchor {
                debug!(
                    id = %item.id,
                    from = ?item.position,
                    to = ?anchor,
                    "furniture clamped into room"
                );
                item.position = anchor;
                moved += 1;
            }
        }
        self.room = room;
        Ok(moved)
    }

    fn extent_of(&self, kind: &FurnitureKind, rotation_y: f64) -> Result<Vec3, LayoutError> {
        Ok(self.catalog.lookup(kind)?.footprint.rotated_extent(rotation_y))
    }

    fn index_of(&self, id: FurnitureId) -> Result<usize, LayoutError> {
        self.items
            .iter()
            .position(|item| item.id == id)
            .ok_or(LayoutError::NotFound(id))
    }

    fn issue_id(&mut self) -> FurnitureId {
        loop {
            let id = Uuid::new_v4();
            if self.issued.insert(id) {
                return id;
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
