//! Furniture catalog: archetype definitions and the color palette.
//!
//! The catalog is loaded once before a session starts and is read-only for the
//! engine's lifetime.  Archetypes and colors keep the order the provider gave
//! them in, because that order drives the pickers in the front end.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::error::LayoutError;
use super::geometry::Footprint;

/// Key identifying a furniture archetype (e.g. `"sofa"`).
///
/// Kinds are open-ended strings so a catalog provider can add archetypes
/// without a code change.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FurnitureKind(String);

impl FurnitureKind {
    pub fn new(kind: impl Into<String>) -> Self {
        Self(kind.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FurnitureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FurnitureKind {
    fn from(kind: &str) -> Self {
        Self::new(kind)
    }
}

/// An 8-bit-per-channel RGB color.
///
/// Serialized as a `#RRGGBB` hex string everywhere (snapshots, config, DTOs).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Error returned when a color string is not `#RRGGBB`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid color {0:?}: expected #RRGGBB")]
pub struct ParseColorError(String);

impl FromStr for Rgb {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s
            .strip_prefix('#')
            .filter(|h| h.len() == 6 && h.is_ascii())
            .ok_or_else(|| ParseColorError(s.to_string()))?;
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| ParseColorError(s.to_string()))
        };
        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl Serialize for Rgb {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// A palette entry offered in the color picker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedColor {
    pub name: String,
    pub color: Rgb,
}

/// An abstract furniture type with its canonical footprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FurnitureArchetype {
    pub kind: FurnitureKind,
    /// Display name shown in the picker.
    pub name: String,
    /// Short glyph shown next to the name.
    pub icon: String,
    pub footprint: Footprint,
}

/// Errors raised while building a catalog.
///
/// Any of these blocks session start: the engine cannot run without a usable
/// catalog.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CatalogError {
    #[error("catalog has no furniture archetypes")]
    NoArchetypes,
    #[error("catalog palette has no colors")]
    NoColors,
    #[error("duplicate furniture archetype: {0}")]
    DuplicateKind(FurnitureKind),
    #[error("archetype {0} has a non-positive footprint")]
    InvalidFootprint(FurnitureKind),
}

/// The read-only set of archetypes and colors available to a session.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    archetypes: Vec<FurnitureArchetype>,
    palette: Vec<NamedColor>,
}

impl Catalog {
    /// Builds a catalog, validating every archetype.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if either list is empty, a kind appears twice,
    /// or a footprint has a non-positive side.
    pub fn new(
        archetypes: Vec<FurnitureArchetype>,
        palette: Vec<NamedColor>,
    ) -> Result<Self, CatalogError> {
        if archetypes.is_empty() {
            return Err(CatalogError::NoArchetypes);
        }
        if palette.is_empty() {
            return Err(CatalogError::NoColors);
        }
        for (i, archetype) in archetypes.iter().enumerate() {
            if !archetype.footprint.is_valid() {
                return Err(CatalogError::InvalidFootprint(archetype.kind.clone()));
            }
            if archetypes[..i].iter().any(|a| a.kind == archetype.kind) {
                return Err(CatalogError::DuplicateKind(archetype.kind.clone()));
            }
        }
        Ok(Self {
            archetypes,
            palette,
        })
    }

    /// Looks up an archetype by kind.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::UnknownArchetype`] if the kind is not in the catalog.
    pub fn lookup(&self, kind: &FurnitureKind) -> Result<&FurnitureArchetype, LayoutError> {
        self.archetypes
            .iter()
            .find(|a| &a.kind == kind)
            .ok_or_else(|| LayoutError::UnknownArchetype(kind.clone()))
    }

    /// Iterates archetypes in catalog order.  Call again to restart.
    pub fn list_all(&self) -> std::slice::Iter<'_, FurnitureArchetype> {
        self.archetypes.iter()
    }

    /// Palette colors in catalog order.
    pub fn palette(&self) -> &[NamedColor] {
        &self.palette
    }

    /// The archetype selected when a session starts.
    pub fn default_archetype(&self) -> &FurnitureArchetype {
        // `new` guarantees at least one archetype.
        &self.archetypes[0]
    }

    /// The color selected when a session starts.
    pub fn default_color(&self) -> Rgb {
        self.palette[0].color
    }
}

impl Default for Catalog {
    /// The built-in sofa/chair/table/bed catalog with the five-color palette.
    fn default() -> Self {
        let archetype = |kind: &str, name: &str, icon: &str, dx, dy, dz| FurnitureArchetype {
            kind: FurnitureKind::new(kind),
            name: name.to_string(),
            icon: icon.to_string(),
            footprint: Footprint::new(dx, dy, dz),
        };
        let color = |name: &str, r, g, b| NamedColor {
            name: name.to_string(),
            color: Rgb::new(r, g, b),
        };
        Self {
            archetypes: vec![
                archetype("sofa", "Sofa", "🛋️", 3.0, 1.0, 1.5),
                archetype("chair", "Chair", "🪑", 1.0, 1.0, 1.0),
                archetype("table", "Table", "🪑", 2.0, 0.1, 1.0),
                archetype("bed", "Bed", "🛏️", 2.0, 0.5, 3.0),
            ],
            palette: vec![
                color("Gold", 0xD4, 0xAF, 0x37),
                color("Black", 0x00, 0x00, 0x00),
                color("White", 0xFF, 0xFF, 0xFF),
                color("Brown", 0x8B, 0x45, 0x13),
                color("Gray", 0x80, 0x80, 0x80),
            ],
        }
    }
}
