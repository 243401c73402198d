//! The room volume that contains every placed item.

use super::error::LayoutError;
use super::geometry::{BoundingBox, Vec3, EPSILON};

/// Default room width (x axis) in feet.
pub const DEFAULT_WIDTH: f64 = 20.0;
/// Default room length (z axis) in feet.
pub const DEFAULT_LENGTH: f64 = 20.0;
/// Default room height (y axis) in feet.
pub const DEFAULT_HEIGHT: f64 = 8.0;

/// A rectangular room occupying `[0, width] × [0, height] × [0, length]`.
///
/// All three dimensions are always positive; the only way to build a `Room`
/// is through [`Room::new`], which rejects anything else.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Room {
    width: f64,
    length: f64,
    height: f64,
}

impl Room {
    /// Creates a room with the given dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidDimension`] if any value is not a
    /// positive, finite number.
    pub fn new(width: f64, length: f64, height: f64) -> Result<Self, LayoutError> {
        let valid = [width, length, height]
            .iter()
            .all(|v| v.is_finite() && *v > 0.0);
        if !valid {
            return Err(LayoutError::InvalidDimension {
                width,
                length,
                height,
            });
        }
        Ok(Self {
            width,
            length,
            height,
        })
    }

    /// Extent along x.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Extent along z.
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Extent along y (vertical).
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Room size as an `(x, y, z)` vector.
    pub fn extent(&self) -> Vec3 {
        Vec3::new(self.width, self.height, self.length)
    }

    /// Returns `true` if `bbox` lies inside the room.
    ///
    /// Intervals are closed, so a box flush against a wall is inside.  Both
    /// ends are compared with [`EPSILON`] slack.
    pub fn contains(&self, bbox: &BoundingBox) -> bool {
        let size = self.extent();
        axis_inside(bbox.min.x, bbox.max.x, size.x)
            && axis_inside(bbox.min.y, bbox.max.y, size.y)
            && axis_inside(bbox.min.z, bbox.max.z, size.z)
    }

    /// Returns the in-bounds anchor nearest to `anchor` for an item of size
    /// `extent`, or `None` if the item is larger than the room on some axis.
    ///
    /// Each coordinate is clamped independently into `[0, dimension - extent]`.
    pub fn clamp_anchor(&self, anchor: Vec3, extent: Vec3) -> Option<Vec3> {
        let size = self.extent();
        Some(Vec3 {
            x: clamp_axis(anchor.x, extent.x, size.x)?,
            y: clamp_axis(anchor.y, extent.y, size.y)?,
            z: clamp_axis(anchor.z, extent.z, size.z)?,
        })
    }
}

impl Default for Room {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            length: DEFAULT_LENGTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

fn axis_inside(min: f64, max: f64, dimension: f64) -> bool {
    min >= -EPSILON && max <= dimension + EPSILON
}

fn clamp_axis(origin: f64, extent: f64, dimension: f64) -> Option<f64> {
    if extent > dimension + EPSILON {
        return None;
    }
    let upper = (dimension - extent).max(0.0);
    Some(origin.clamp(0.0, upper))
}
