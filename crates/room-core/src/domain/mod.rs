//! Domain entities for Room Planner.
//!
//! These types represent the core layout model with no dependencies on
//! rendering, networking, or storage.
//!
//! # Sub-modules
//!
//! - **`geometry`** – Vectors, footprints, bounding boxes, and the rotation
//!   maths that turns a footprint plus an angle into an axis-aligned extent.
//!
//! - **`room`** – The container volume.  Every placed item must fit inside it.
//!
//! - **`catalog`** – Read-only archetype definitions (kind → footprint) and the
//!   color palette offered to the user.
//!
//! - **`placement`** – The [`placement::PlacementStore`]: the authoritative,
//!   insertion-ordered collection of placed furniture.
//!
//! - **`error`** – The [`error::LayoutError`] taxonomy shared by all of the above.

pub mod catalog;
pub mod error;
pub mod geometry;
pub mod placement;
pub mod room;
