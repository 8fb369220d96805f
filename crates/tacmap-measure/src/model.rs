//! Committed measurement shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tacmap_core::{GeoPoint, ShapeId, ShapeKind, Style};

/// Kind-specific data supplied when a shape is committed.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum ShapeExtra {
    /// Lines and freehand polygons carry nothing extra.
    #[default]
    None,
    /// Generation parameters of a range circle.
    Circle { center: GeoPoint, radius_km: f64 },
}

/// A committed measurement shape.
///
/// Lines (`Distance`, `Arrow`) store an ordered vertex list; polygons
/// (`Area`, `Circle`) store a closed ring. Circles also remember the radius
/// and center they were generated from, so their label echoes the requested
/// radius rather than a value derived from the approximating ring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    id: ShapeId,
    kind: ShapeKind,
    vertices: Vec<GeoPoint>,
    style: Style,
    radius_km: Option<f64>,
    center: Option<GeoPoint>,
    created_at: DateTime<Utc>,
}

impl Shape {
    pub(crate) fn new(
        kind: ShapeKind,
        vertices: Vec<GeoPoint>,
        style: Style,
        extra: ShapeExtra,
    ) -> Self {
        let (radius_km, center) = match extra {
            ShapeExtra::Circle { center, radius_km } => (Some(radius_km), Some(center)),
            ShapeExtra::None => (None, None),
        };
        Self {
            id: ShapeId::new(),
            kind,
            vertices,
            style,
            radius_km,
            center,
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> ShapeId {
        self.id
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    /// Vertex list, or the closed ring for polygon kinds.
    pub fn vertices(&self) -> &[GeoPoint] {
        &self.vertices
    }

    pub fn style(&self) -> Style {
        self.style
    }

    /// Radius the circle was generated with. `None` for other kinds.
    pub fn radius_km(&self) -> Option<f64> {
        self.radius_km
    }

    /// Center of a circle. Tracks the ring centroid after vertex edits.
    pub fn center(&self) -> Option<GeoPoint> {
        self.center
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Arrows are lines tagged to carry an arrow-head glyph.
    pub fn is_arrow(&self) -> bool {
        self.kind == ShapeKind::Arrow
    }

    pub(crate) fn set_vertices(&mut self, vertices: Vec<GeoPoint>) {
        self.vertices = vertices;
    }

    pub(crate) fn set_center(&mut self, center: GeoPoint) {
        self.center = Some(center);
    }

    pub(crate) fn set_style(&mut self, style: Style) {
        self.style = style;
    }
}
