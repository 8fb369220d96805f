//! Spherical geometry on the WGS84 mean sphere.
//!
//! Every function here is pure: lengths in kilometres, areas in square
//! kilometres, angles in degrees. Inputs are validated by the callers
//! through [`validate`] before any measurement is taken.

use tacmap_core::{GeoPoint, GeometryError, ShapeKind};

pub use tacmap_core::units::{EARTH_RADIUS_KM, MAX_CIRCLE_RADIUS_KM};

/// Ring resolution used for range circles unless configured otherwise.
pub const DEFAULT_CIRCLE_STEPS: usize = 64;

/// Great-circle distance between two points (haversine).
pub fn distance_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let d_lat = lat2 - lat1;
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}

/// Sum of the great-circle distances between consecutive vertices.
pub fn length_km(vertices: &[GeoPoint]) -> f64 {
    vertices.windows(2).map(|w| distance_km(w[0], w[1])).sum()
}

/// Initial great-circle bearing from `from` to `to`, clockwise from north,
/// in `[0, 360)`.
pub fn initial_bearing(from: GeoPoint, to: GeoPoint) -> f64 {
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();
    let d_lng = (to.lng - from.lng).to_radians();

    let y = d_lng.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lng.cos();
    normalize_degrees(y.atan2(x).to_degrees())
}

/// Rotation for an arrow-head glyph pointing from `from` to `to`.
///
/// The glyph artwork points east at rotation zero, so the geographic bearing
/// is corrected by -90 degrees before normalizing into `[0, 360)`.
pub fn glyph_bearing(from: GeoPoint, to: GeoPoint) -> f64 {
    normalize_degrees(initial_bearing(from, to) - 90.0)
}

/// Wraps an angle into `[0, 360)`.
pub fn normalize_degrees(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid rounds tiny negative inputs up to exactly 360.0
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Point reached by travelling `distance_km` from `origin` along the initial
/// bearing `bearing_degrees`.
///
/// Longitude is left continuous with the origin, so a path crossing the
/// antimeridian from 179.9 continues to 180.4 rather than jumping to -179.6.
pub fn destination(origin: GeoPoint, distance_km: f64, bearing_degrees: f64) -> GeoPoint {
    let lat1 = origin.lat.to_radians();
    let lng1 = origin.lng.to_radians();
    let bearing = bearing_degrees.to_radians();
    let delta = distance_km / EARTH_RADIUS_KM;

    let lat2 = (lat1.sin() * delta.cos() + lat1.cos() * delta.sin() * bearing.cos()).asin();
    let lng2 = lng1
        + (bearing.sin() * delta.sin() * lat1.cos()).atan2(delta.cos() - lat1.sin() * lat2.sin());

    GeoPoint::new(lng2.to_degrees(), lat2.to_degrees())
}

fn wrap_longitude(lng: f64) -> f64 {
    if (-180.0..180.0).contains(&lng) {
        lng
    } else {
        (lng + 180.0).rem_euclid(360.0) - 180.0
    }
}

/// A circle radius must be finite, positive and below
/// [`MAX_CIRCLE_RADIUS_KM`].
pub fn validate_radius(radius_km: f64) -> Result<(), GeometryError> {
    if radius_km.is_finite() && radius_km > 0.0 && radius_km < MAX_CIRCLE_RADIUS_KM {
        Ok(())
    } else {
        Err(GeometryError::InvalidRadius { radius_km })
    }
}

/// Checks a circle's center and radius.
pub fn validate_circle(center: GeoPoint, radius_km: f64) -> Result<(), GeometryError> {
    if !center.is_finite() {
        return Err(GeometryError::NonFiniteCoordinate);
    }
    validate_radius(radius_km)
}

/// Vertices of a ring without its closing duplicate.
fn open_ring(ring: &[GeoPoint]) -> &[GeoPoint] {
    match (ring.first(), ring.last()) {
        (Some(first), Some(last)) if ring.len() > 1 && first == last => &ring[..ring.len() - 1],
        _ => ring,
    }
}

/// Spherical area enclosed by a ring, in square kilometres.
///
/// Uses the Chamberlain-Duquette approximation on the mean sphere. The ring
/// may be open or closed; winding order does not matter.
pub fn ring_area_km2(ring: &[GeoPoint]) -> f64 {
    let open = open_ring(ring);
    let n = open.len();
    if n < 3 {
        return 0.0;
    }

    let total: f64 = (0..n)
        .map(|i| {
            let prev = open[(i + n - 1) % n];
            let next = open[(i + 1) % n];
            (next.lng - prev.lng).to_radians() * open[i].lat.to_radians().sin()
        })
        .sum();

    (total * EARTH_RADIUS_KM * EARTH_RADIUS_KM / 2.0).abs()
}

/// Length of the closed ring boundary, in kilometres.
pub fn perimeter_km(ring: &[GeoPoint]) -> f64 {
    let open = open_ring(ring);
    match (open.first(), open.last()) {
        (Some(&first), Some(&last)) if open.len() > 1 => length_km(open) + distance_km(last, first),
        _ => 0.0,
    }
}

/// Area and perimeter of a validated polygon ring.
pub fn area_and_perimeter(ring: &[GeoPoint]) -> Result<(f64, f64), GeometryError> {
    validate(ShapeKind::Area, ring)?;
    Ok((ring_area_km2(ring), perimeter_km(ring)))
}

/// Generates a closed polygon ring approximating a circle.
///
/// Produces `steps` points at `radius_km` from `center`, going
/// counter-clockwise from north, plus the closing copy of the first point.
pub fn circle_ring(
    center: GeoPoint,
    radius_km: f64,
    steps: usize,
) -> Result<Vec<GeoPoint>, GeometryError> {
    validate_circle(center, radius_km)?;
    if steps < 3 {
        return Err(GeometryError::InvalidSteps { steps });
    }

    let mut ring: Vec<GeoPoint> = (0..steps)
        .map(|i| destination(center, radius_km, -360.0 * i as f64 / steps as f64))
        .collect();
    ring.push(ring[0]);
    Ok(ring)
}

/// Point halfway along a polyline, measured by cumulative length.
///
/// A zero-length line yields its first vertex.
pub fn midpoint(line: &[GeoPoint]) -> Result<GeoPoint, GeometryError> {
    let first = *line.first().ok_or(GeometryError::EmptyVertices)?;
    let mut remaining = length_km(line) / 2.0;
    if remaining <= 0.0 {
        return Ok(first);
    }

    for segment in line.windows(2) {
        let (a, b) = (segment[0], segment[1]);
        let span = distance_km(a, b);
        if remaining <= span {
            if span == 0.0 {
                return Ok(a);
            }
            return Ok(destination(a, remaining, initial_bearing(a, b)));
        }
        remaining -= span;
    }

    // Rounding can leave a sliver past the final vertex
    Ok(*line.last().unwrap_or(&first))
}

/// Arithmetic mean of the distinct ring vertices, wrapped into
/// `[-180, 180)`.
///
/// Longitudes are taken relative to the first vertex, so a ring straddling
/// the antimeridian averages to a point inside it.
pub fn centroid(ring: &[GeoPoint]) -> Result<GeoPoint, GeometryError> {
    let open = open_ring(ring);
    let first = *open.first().ok_or(GeometryError::EmptyVertices)?;
    let n = open.len() as f64;
    let (d_lng, lat) = open.iter().fold((0.0, 0.0), |(d_lng, lat), p| {
        let offset = (p.lng - first.lng + 180.0).rem_euclid(360.0) - 180.0;
        (d_lng + offset, lat + p.lat)
    });
    Ok(GeoPoint::new(wrap_longitude(first.lng + d_lng / n), lat / n))
}

/// Closes an open ring by repeating its first vertex.
pub fn close_ring(vertices: &mut Vec<GeoPoint>) {
    if let (Some(&first), Some(&last)) = (vertices.first(), vertices.last()) {
        if first != last {
            vertices.push(first);
        }
    }
}

/// Checks a vertex sequence against the rules for `kind`.
///
/// Lines need two finite vertices. Polygon rings need four vertices with the
/// last equal to the first, and at least three distinct positions.
pub fn validate(kind: ShapeKind, vertices: &[GeoPoint]) -> Result<(), GeometryError> {
    if vertices.is_empty() {
        return Err(GeometryError::EmptyVertices);
    }
    if !vertices.iter().all(GeoPoint::is_finite) {
        return Err(GeometryError::NonFiniteCoordinate);
    }

    let required = kind.min_vertices();
    if vertices.len() < required {
        return Err(GeometryError::TooFewVertices {
            kind,
            required,
            actual: vertices.len(),
        });
    }

    if kind.is_polygon() {
        if vertices.first() != vertices.last() {
            return Err(GeometryError::TooFewVertices {
                kind,
                required: vertices.len() + 1,
                actual: vertices.len(),
            });
        }
        let distinct = distinct_count(open_ring(vertices));
        if distinct < 3 {
            return Err(GeometryError::TooFewDistinctVertices {
                required: 3,
                actual: distinct,
            });
        }
    }

    Ok(())
}

fn distinct_count(points: &[GeoPoint]) -> usize {
    let mut seen: Vec<GeoPoint> = Vec::with_capacity(points.len());
    for p in points {
        if !seen.contains(p) {
            seen.push(*p);
        }
    }
    seen.len()
}
