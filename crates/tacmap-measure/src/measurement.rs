//! Derived measurements.
//!
//! A [`Measurement`] is never stored on its own: it is recomputed from the
//! shape every time the derived layers are rebuilt.

use serde::{Deserialize, Serialize};
use tacmap_core::{format_area, format_distance, DistanceUnit, GeometryError};

use crate::geometry;
use crate::model::Shape;

/// Quantities shown in a shape's label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Measurement {
    /// Distance lines and arrows.
    Line { length_km: f64 },
    /// Freehand area polygons.
    Polygon { area_km2: f64, perimeter_km: f64 },
    /// Range circles echo their generation radius.
    Circle { radius_km: f64 },
}

impl Measurement {
    /// Computes the measurement for a shape.
    pub fn of(shape: &Shape) -> Result<Self, GeometryError> {
        geometry::validate(shape.kind(), shape.vertices())?;

        if shape.kind().is_line() {
            return Ok(Self::Line {
                length_km: geometry::length_km(shape.vertices()),
            });
        }

        match shape.radius_km() {
            Some(radius_km) => Ok(Self::Circle { radius_km }),
            None => {
                let (area_km2, perimeter_km) = geometry::area_and_perimeter(shape.vertices())?;
                Ok(Self::Polygon {
                    area_km2,
                    perimeter_km,
                })
            }
        }
    }

    /// Label text in `unit` with `decimals` digits.
    ///
    /// Lines read `"12.34 km"`, polygons put the area over the perimeter and
    /// circles read `"r 10.00 km"`.
    pub fn label_text(&self, unit: DistanceUnit, decimals: usize) -> String {
        match *self {
            Self::Line { length_km } => format_distance(length_km, unit, decimals),
            Self::Polygon {
                area_km2,
                perimeter_km,
            } => format!(
                "{}\n{}",
                format_area(area_km2, unit, decimals),
                format_distance(perimeter_km, unit, decimals)
            ),
            Self::Circle { radius_km } => {
                format!("r {}", format_distance(radius_km, unit, decimals))
            }
        }
    }
}
