//! Geometry primitives used by the layout engine.
//!
//! All lengths share one unit (the default catalog uses feet) and all angles
//! are in degrees.  Furniture only rotates about the vertical `y` axis, so a
//! rotated footprint is still described by an axis-aligned bounding box; it
//! just grows in `x`/`z` for angles that are not multiples of 90°.

use serde::{Deserialize, Serialize};

/// Tolerance for every floating-point bounds comparison in the engine.
///
/// An item that overshoots a wall by less than this amount is still accepted,
/// so rounding in the rotation maths never rejects a flush placement.
pub const EPSILON: f64 = 1e-6;

/// A point or extent in room space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Returns the components as `[x, y, z]`.
    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Returns `true` if no component is NaN or infinite.
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl From<[f64; 3]> for Vec3 {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self { x, y, z }
    }
}

/// Size of a furniture archetype along its local axes, before rotation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Footprint {
    /// Size along the local x axis (width).
    pub dx: f64,
    /// Size along the vertical axis (height).
    pub dy: f64,
    /// Size along the local z axis (depth).
    pub dz: f64,
}

impl Footprint {
    pub const fn new(dx: f64, dy: f64, dz: f64) -> Self {
        Self { dx, dy, dz }
    }

    /// Returns `true` if every side is a positive, finite number.
    pub fn is_valid(&self) -> bool {
        [self.dx, self.dy, self.dz]
            .iter()
            .all(|v| v.is_finite() && *v > 0.0)
    }

    /// Returns the axis-aligned extent of this footprint after rotating it by
    /// `rotation_y` degrees about the vertical axis through its center.
    ///
    /// ```text
    /// ex = dx·|cos θ| + dz·|sin θ|
    /// ez = dx·|sin θ| + dz·|cos θ|
    /// ```
    pub fn rotated_extent(&self, rotation_y: f64) -> Vec3 {
        let (sin, cos) = rotation_y.to_radians().sin_cos();
        let (sin, cos) = (sin.abs(), cos.abs());
        Vec3 {
            x: self.dx * cos + self.dz * sin,
            y: self.dy,
            z: self.dx * sin + self.dz * cos,
        }
    }
}

/// An axis-aligned box in room space with inclusive bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    /// Builds the box whose minimum corner is `anchor` and whose size is `extent`.
    pub fn from_anchor(anchor: Vec3, extent: Vec3) -> Self {
        Self {
            min: anchor,
            max: Vec3 {
                x: anchor.x + extent.x,
                y: anchor.y + extent.y,
                z: anchor.z + extent.z,
            },
        }
    }

    /// Returns the center point of the box.
    pub fn center(&self) -> Vec3 {
        Vec3 {
            x: (self.min.x + self.max.x) / 2.0,
            y: (self.min.y + self.max.y) / 2.0,
            z: (self.min.z + self.max.z) / 2.0,
        }
    }
}

/// Maps any angle in degrees into `[0, 360)`.
///
/// `450` becomes `90`, `-90` becomes `270`.  Non-finite input is returned
/// unchanged so the caller's bounds check rejects it.
pub fn normalize_degrees(angle: f64) -> f64 {
    if !angle.is_finite() {
        return angle;
    }
    let normalized = angle.rem_euclid(360.0);
    // rem_euclid can round a tiny negative input up to exactly 360.0
    if normalized >= 360.0 {
        0.0
    } else {
        normalized
    }
}
