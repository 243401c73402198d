//! Errors raised by layout operations.
//!
//! Every variant is recoverable: the operation that produced it is rejected
//! and the layout keeps its previous state.

use thiserror::Error;

use super::catalog::FurnitureKind;
use super::placement::FurnitureId;

/// Errors that can occur when editing or restoring a layout.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LayoutError {
    /// A room dimension was zero, negative, or not a finite number.
    #[error("invalid room dimensions {width} x {length} x {height}: every dimension must be a positive number")]
    InvalidDimension {
        width: f64,
        length: f64,
        height: f64,
    },

    /// The requested furniture kind is not in the catalog.
    #[error("unknown furniture archetype: {0}")]
    UnknownArchetype(FurnitureKind),

    /// The item's rotated bounding box would leave the room.
    ///
    /// `id` is `None` when the rejected item does not exist yet (an `add`).
    #[error("furniture would extend outside the room")]
    OutOfBounds { id: Option<FurnitureId> },

    /// No placed item has this identifier.
    #[error("furniture not found: {0}")]
    NotFound(FurnitureId),

    /// A snapshot could not be turned back into a layout.
    #[error("malformed layout snapshot: {0}")]
    MalformedSnapshot(String),
}
