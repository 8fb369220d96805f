//! Shared data types.
//!
//! Geographic and screen coordinates, shape kinds and the identifiers used
//! across the measurement engine and its host.

mod style;

pub use style::{Color, LineStyle, SizeTier, Style, WidthLevel};

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Geographic coordinate in degrees.
///
/// Longitude comes first, matching the `(lng, lat)` order used by map
/// engines and GeoJSON.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lng: f64,
    pub lat: f64,
}

impl GeoPoint {
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    /// Both components are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.lng.is_finite() && self.lat.is_finite()
    }

    /// Returns `[lng, lat]`, the GeoJSON position layout.
    pub fn to_array(&self) -> [f64; 2] {
        [self.lng, self.lat]
    }
}

impl From<(f64, f64)> for GeoPoint {
    fn from((lng, lat): (f64, f64)) -> Self {
        Self::new(lng, lat)
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lng, self.lat)
    }
}

/// Pixel coordinate on the map canvas (origin top-left, +y down).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &ScreenPoint) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl fmt::Display for ScreenPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:.1}, {:.1}]", self.x, self.y)
    }
}

/// The kinds of measurement shape an operator can draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    /// Distance line.
    Distance,
    /// Area polygon.
    Area,
    /// Range circle, stored as a generated polygon ring.
    Circle,
    /// Directional line rendered with an arrow head.
    Arrow,
}

impl ShapeKind {
    /// Lines (distance and arrow) measure length.
    pub fn is_line(&self) -> bool {
        matches!(self, Self::Distance | Self::Arrow)
    }

    /// Polygon kinds store a closed ring.
    pub fn is_polygon(&self) -> bool {
        matches!(self, Self::Area | Self::Circle)
    }

    /// Minimum committed vertex count: two for lines, a closed ring of four
    /// for polygons.
    pub fn min_vertices(&self) -> usize {
        if self.is_line() {
            2
        } else {
            4
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Distance => write!(f, "distance"),
            Self::Area => write!(f, "area"),
            Self::Circle => write!(f, "circle"),
            Self::Arrow => write!(f, "arrow"),
        }
    }
}

/// Stable identifier of a committed shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShapeId(Uuid);

impl ShapeId {
    /// Create a new unique shape ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ShapeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Shape({})", &self.0.to_string()[..8])
    }
}

/// Stable identifier of a free annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnnotationId(Uuid);

impl AnnotationId {
    /// Create a new unique annotation ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AnnotationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AnnotationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Note({})", &self.0.to_string()[..8])
    }
}
