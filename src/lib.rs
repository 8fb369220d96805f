//! # TacMap
//!
//! Interactive measurement and annotation layer for tactical map dashboards.
//! Operators draw distance lines, area polygons, range circles and arrows,
//! read live measurements, restyle everything at once, undo the last shape
//! and pin free text to map coordinates.
//!
//! ## Architecture
//!
//! TacMap is organized as a workspace with multiple crates:
//!
//! 1. **tacmap-core** - Shared types, errors, interaction lock, event bus
//! 2. **tacmap-settings** - Configuration loading and validation
//! 3. **tacmap-measure** - Geometry, shape store, drawing tools, annotations
//! 4. **tacmap** - Headless driver binary that wires the crates together

pub use tacmap_core::{
    AnnotationId, Color, EngineEvent, Error, EventBus, EventBusConfig, EventFilter, GeoPoint,
    InteractionLock, LineStyle, Result, ScreenPoint, ShapeId, ShapeKind, SizeTier, Style,
    WidthLevel,
};

pub use tacmap_measure::{
    geojson, Annotation, ArrowHead, ClickOutcome, DrawingState, Label, MapViewport, Measurement,
    MeasurementEngine, Shape, WebMercatorViewport,
};

pub use tacmap_settings::Config;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Console output with target and line numbers. `RUST_LOG` overrides the
/// default `info` level.
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_level(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
