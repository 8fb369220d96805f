//! Derived label and arrow-head layers.
//!
//! The projector turns the committed shapes into the point features the map
//! renders on top of them: one text label per shape and one arrow-head
//! glyph per arrow. Both layers are rebuilt from scratch on every store
//! mutation, so they never drift from the shapes they describe.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tacmap_core::{Color, GeoPoint, GeometryError, ShapeId};
use tacmap_settings::LabelSettings;

use crate::geometry;
use crate::measurement::Measurement;
use crate::model::Shape;

/// Measurement label anchored to a shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub shape_id: ShapeId,
    /// Line midpoint, or the ring centroid for polygons.
    pub anchor: GeoPoint,
    pub text: String,
    pub color: Color,
    /// Glyph scale derived from the width level.
    pub size: f64,
}

/// Arrow-head glyph at the last vertex of an arrow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrowHead {
    pub shape_id: ShapeId,
    pub coordinate: GeoPoint,
    /// Glyph rotation in degrees, `[0, 360)`.
    pub bearing: f64,
    pub color: Color,
    pub size: f64,
}

/// Everything derived from the shape collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DerivedLayers {
    pub measurements: HashMap<ShapeId, Measurement>,
    pub labels: Vec<Label>,
    pub arrow_heads: Vec<ArrowHead>,
}

impl DerivedLayers {
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty() && self.arrow_heads.is_empty()
    }
}

/// Builds [`DerivedLayers`] from shapes.
#[derive(Debug, Clone, Default)]
pub struct LabelProjector {
    settings: LabelSettings,
}

impl LabelProjector {
    pub fn new(settings: LabelSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &LabelSettings {
        &self.settings
    }

    /// Rebuilds both layers. Fails on the first malformed shape, leaving the
    /// caller's current layers untouched.
    pub fn project<'a>(
        &self,
        shapes: impl IntoIterator<Item = &'a Shape>,
    ) -> Result<DerivedLayers, GeometryError> {
        let mut layers = DerivedLayers::default();

        for shape in shapes {
            let measurement = Measurement::of(shape)?;
            let style = shape.style();
            let size = self.settings.glyph_size(style.width_level);

            let anchor = if shape.kind().is_line() {
                geometry::midpoint(shape.vertices())?
            } else {
                geometry::centroid(shape.vertices())?
            };

            layers.labels.push(Label {
                shape_id: shape.id(),
                anchor,
                text: measurement.label_text(self.settings.unit, self.settings.decimals),
                color: style.color,
                size,
            });

            if shape.is_arrow() {
                if let Some(head) = arrow_head(shape, size) {
                    layers.arrow_heads.push(head);
                }
            }

            layers.measurements.insert(shape.id(), measurement);
        }

        Ok(layers)
    }
}

fn arrow_head(shape: &Shape, size: f64) -> Option<ArrowHead> {
    let [.., prev, last] = shape.vertices() else {
        return None;
    };
    Some(ArrowHead {
        shape_id: shape.id(),
        coordinate: *last,
        bearing: geometry::glyph_bearing(*prev, *last),
        color: shape.style().color,
        size,
    })
}
