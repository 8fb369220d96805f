//! GeoJSON sources for map-native layers.
//!
//! Shapes, labels and arrow heads are handed to the host map as three
//! FeatureCollections. Style travels as per-feature properties so a single
//! data-driven layer can render every shape.

use serde_json::{json, Value};

use crate::model::Shape;
use crate::projector::{ArrowHead, Label};

/// Feature for one committed shape. Lines become `LineString`, polygon
/// kinds become single-ring `Polygon` geometries.
pub fn shape_feature(shape: &Shape) -> Value {
    let coordinates: Vec<[f64; 2]> = shape.vertices().iter().map(|p| p.to_array()).collect();
    let geometry = if shape.kind().is_line() {
        json!({ "type": "LineString", "coordinates": coordinates })
    } else {
        json!({ "type": "Polygon", "coordinates": [coordinates] })
    };

    let style = shape.style();
    let mut properties = json!({
        "id": shape.id().to_string(),
        "kind": shape.kind(),
        "color": style.color.to_string(),
        "width": style.width_level.get(),
        "lineStyle": style.line_style.to_string(),
        "dasharray": style.line_style.dash_pattern(),
        "createdAt": shape.created_at().to_rfc3339(),
    });
    if let (Some(radius), Some(center)) = (shape.radius_km(), shape.center()) {
        properties["radiusKm"] = json!(radius);
        properties["center"] = json!(center.to_array());
    }

    json!({ "type": "Feature", "geometry": geometry, "properties": properties })
}

/// FeatureCollection of shapes in draw order.
pub fn shapes_collection<'a>(shapes: impl IntoIterator<Item = &'a Shape>) -> Value {
    collection(shapes.into_iter().map(shape_feature))
}

/// FeatureCollection of measurement labels as points.
pub fn labels_collection(labels: &[Label]) -> Value {
    collection(labels.iter().map(|label| {
        point(
            label.anchor.to_array(),
            json!({
                "shapeId": label.shape_id.to_string(),
                "text": label.text,
                "color": label.color.to_string(),
                "size": label.size,
            }),
        )
    }))
}

/// FeatureCollection of arrow-head glyphs as rotated points.
pub fn arrow_heads_collection(heads: &[ArrowHead]) -> Value {
    collection(heads.iter().map(|head| {
        point(
            head.coordinate.to_array(),
            json!({
                "shapeId": head.shape_id.to_string(),
                "bearing": head.bearing,
                "color": head.color.to_string(),
                "size": head.size,
            }),
        )
    }))
}

fn point(coordinates: [f64; 2], properties: Value) -> Value {
    json!({
        "type": "Feature",
        "geometry": { "type": "Point", "coordinates": coordinates },
        "properties": properties,
    })
}

fn collection(features: impl Iterator<Item = Value>) -> Value {
    json!({ "type": "FeatureCollection", "features": features.collect::<Vec<_>>() })
}
