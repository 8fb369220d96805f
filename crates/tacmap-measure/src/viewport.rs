//! Viewport and coordinate transformation for the map canvas.
//!
//! Handles conversion between pixel coordinates (screen space) and
//! geographic coordinates. The host map engine normally supplies its own
//! projection through [`MapViewport`]; [`WebMercatorViewport`] is a
//! self-contained implementation used for headless sessions and tests.

use std::f64::consts::PI;
use std::fmt;

use tacmap_core::{GeoPoint, ProjectionError, ScreenPoint};

/// Projection between screen pixels and geographic coordinates.
///
/// Both directions may fail while the map is mid-transition or when the
/// point is off the projectable world. Callers drop the triggering event
/// in that case.
pub trait MapViewport {
    fn screen_to_geo(&self, point: ScreenPoint) -> Result<GeoPoint, ProjectionError>;
    fn geo_to_screen(&self, point: GeoPoint) -> Result<ScreenPoint, ProjectionError>;
}

/// Side of the square world image at zoom zero, in pixels.
pub const TILE_SIZE: f64 = 512.0;

/// Latitude limit of the square Web Mercator world.
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

pub const MIN_ZOOM: f64 = 0.0;
pub const MAX_ZOOM: f64 = 22.0;

/// Web Mercator viewport: a center, a zoom level and a canvas size.
#[derive(Debug, Clone)]
pub struct WebMercatorViewport {
    center: GeoPoint,
    zoom: f64,
    canvas_width: f64,
    canvas_height: f64,
}

impl WebMercatorViewport {
    /// Creates a viewport centred on (0, 0) at zoom 1.
    pub fn new(canvas_width: f64, canvas_height: f64) -> Self {
        Self {
            center: GeoPoint::new(0.0, 0.0),
            zoom: 1.0,
            canvas_width,
            canvas_height,
        }
    }

    /// Gets the canvas width.
    pub fn canvas_width(&self) -> f64 {
        self.canvas_width
    }

    /// Gets the canvas height.
    pub fn canvas_height(&self) -> f64 {
        self.canvas_height
    }

    /// Sets the canvas dimensions (typically called when the window resizes).
    pub fn set_canvas_size(&mut self, width: f64, height: f64) {
        self.canvas_width = width;
        self.canvas_height = height;
    }

    pub fn center(&self) -> GeoPoint {
        self.center
    }

    /// Gets the current zoom level.
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Sets the zoom level, ignored outside [`MIN_ZOOM`]..=[`MAX_ZOOM`].
    pub fn set_zoom(&mut self, zoom: f64) {
        if (MIN_ZOOM..=MAX_ZOOM).contains(&zoom) {
            self.zoom = zoom;
        }
    }

    /// Zooms in one level.
    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom + 1.0);
    }

    /// Zooms out one level.
    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom - 1.0);
    }

    /// Centers the view on `point`, clamping latitude into the world.
    pub fn center_on(&mut self, point: GeoPoint) {
        if point.is_finite() {
            self.center = GeoPoint::new(
                wrap_longitude(point.lng),
                point.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE),
            );
        }
    }

    /// Pans the content by a pixel delta (positive `dx` moves the map right).
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        let (cx, cy) = self.world_pixel(self.center);
        let size = self.world_size();
        let y = (cy - dy).clamp(0.0, size);
        self.center = self.world_to_geo(cx - dx, y);
    }

    /// Zooms while keeping `anchor` under the same pixel.
    pub fn zoom_to_point(&mut self, anchor: ScreenPoint, zoom: f64) -> Result<(), ProjectionError> {
        let geo = self.screen_to_geo(anchor)?;
        self.set_zoom(zoom);
        let (gx, gy) = self.world_pixel(geo);
        let cx = gx - (anchor.x - self.canvas_width / 2.0);
        let cy = (gy - (anchor.y - self.canvas_height / 2.0)).clamp(0.0, self.world_size());
        self.center = self.world_to_geo(cx, cy);
        Ok(())
    }

    fn world_size(&self) -> f64 {
        TILE_SIZE * self.zoom.exp2()
    }

    /// Projects to world pixels, origin at the north-west corner.
    ///
    /// ```text
    /// x = (lng + 180) / 360 * size
    /// y = (1 - ln(tan(pi/4 + lat/2)) / pi) / 2 * size
    /// ```
    fn world_pixel(&self, point: GeoPoint) -> (f64, f64) {
        let size = self.world_size();
        let lat = point.lat.to_radians();
        let x = (point.lng + 180.0) / 360.0 * size;
        let y = (1.0 - (PI / 4.0 + lat / 2.0).tan().ln() / PI) / 2.0 * size;
        (x, y)
    }

    fn world_to_geo(&self, x: f64, y: f64) -> GeoPoint {
        let size = self.world_size();
        let lng = x / size * 360.0 - 180.0;
        let lat = (PI * (1.0 - 2.0 * y / size)).sinh().atan().to_degrees();
        GeoPoint::new(wrap_longitude(lng), lat)
    }
}

fn wrap_longitude(lng: f64) -> f64 {
    if (-180.0..180.0).contains(&lng) {
        lng
    } else {
        (lng + 180.0).rem_euclid(360.0) - 180.0
    }
}

impl MapViewport for WebMercatorViewport {
    fn screen_to_geo(&self, point: ScreenPoint) -> Result<GeoPoint, ProjectionError> {
        let out_of_range = ProjectionError::OutOfRange {
            x: point.x,
            y: point.y,
        };
        if !point.x.is_finite() || !point.y.is_finite() {
            return Err(out_of_range);
        }

        let (cx, cy) = self.world_pixel(self.center);
        let x = cx + point.x - self.canvas_width / 2.0;
        let y = cy + point.y - self.canvas_height / 2.0;
        if !(0.0..=self.world_size()).contains(&y) {
            return Err(out_of_range);
        }
        Ok(self.world_to_geo(x, y))
    }

    fn geo_to_screen(&self, point: GeoPoint) -> Result<ScreenPoint, ProjectionError> {
        if !point.is_finite() || point.lat.abs() > MAX_LATITUDE {
            return Err(ProjectionError::InvalidLatitude { lat: point.lat });
        }

        let (cx, cy) = self.world_pixel(self.center);
        let (x, y) = self.world_pixel(point);
        Ok(ScreenPoint::new(
            x - cx + self.canvas_width / 2.0,
            y - cy + self.canvas_height / 2.0,
        ))
    }
}

impl fmt::Display for WebMercatorViewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Viewport {} z{:.2} {}x{}",
            self.center, self.zoom, self.canvas_width, self.canvas_height
        )
    }
}
