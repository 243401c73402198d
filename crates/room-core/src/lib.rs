//! # room-core
//!
//! Shared library for Room Planner containing the room model, the furniture
//! catalog, the placement store, and the layout snapshot codec.
//!
//! It has zero dependencies on rendering, async runtimes, or storage backends.
//!
//! # Architecture overview
//!
//! - **`domain`** – Pure layout rules.  The [`PlacementStore`] is the single
//!   owner of every placed furniture item and refuses any operation that would
//!   push an item's rotated bounding box outside the [`Room`].
//!
//! - **`snapshot`** – The persistable form of a layout.  A [`LayoutSnapshot`]
//!   is what the sharing service stores; [`encode_snapshot`] and
//!   [`decode_snapshot`] convert it to and from JSON text.
//!
//! # Coordinate system
//!
//! The room occupies `[0, width] × [0, height] × [0, length]` with `y`
//! pointing up.  An item's `position` is the minimum corner of its rotated,
//! axis-aligned bounding box.

pub mod domain;
pub mod snapshot;

pub use domain::catalog::{
    Catalog, CatalogError, FurnitureArchetype, FurnitureKind, NamedColor, ParseColorError, Rgb,
};
pub use domain::error::LayoutError;
pub use domain::geometry::{normalize_degrees, BoundingBox, Footprint, Vec3, EPSILON};
pub use domain::placement::{FurnitureId, PlacedFurniture, PlacementStore};
pub use domain::room::Room;
pub use snapshot::codec::{decode_snapshot, encode_snapshot};
pub use snapshot::{
    deserialize, serialize, LayoutSnapshot, SnapshotItem, SnapshotRoom, SNAPSHOT_VERSION,
};
