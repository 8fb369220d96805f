//! # TacMap Measure
//!
//! Interactive measurement and annotation engine for a tactical map. An
//! operator draws distance lines, area polygons, range circles and arrows,
//! sees live measurements, restyles everything at once, undoes the last
//! shape, and drops free text annotations on the map.
//!
//! ## Core Components
//!
//! - **Geometry**: great-circle length, spherical area, bearings, circle rings
//! - **Shape Store**: committed shapes, creation history and derived layers
//! - **Drawing Mode**: single-shot tool state machine and the interaction lock
//! - **Projector**: measurement labels and arrow-head glyphs
//! - **Annotations**: screen-space text anchored to coordinates
//! - **Style**: one global style applied to every shape
//!
//! ## Architecture
//!
//! ```text
//! MeasurementEngine
//!   ├── DrawingModeController (tool state, lock)
//!   ├── ShapeStore
//!   │     ├── HistoryStack
//!   │     └── LabelProjector (labels, arrow heads)
//!   ├── StyleBroadcaster
//!   └── AnnotationLayer (lock, MapViewport)
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tacmap_core::{GeoPoint, InteractionLock, ShapeKind};
//! use tacmap_measure::MeasurementEngine;
//! use tacmap_settings::Config;
//!
//! let lock = InteractionLock::new();
//! let mut engine = MeasurementEngine::new(&Config::default(), lock.clone());
//!
//! engine.arm_tool(ShapeKind::Distance)?;
//! let id = engine.on_shape_completed(vec![
//!     GeoPoint::new(0.0, 0.0),
//!     GeoPoint::new(0.0, 1.0),
//! ])?;
//! println!("{}", engine.labels()[0].text); // "111.19 km"
//! ```

pub mod annotations;
pub mod drawing_mode;
pub mod engine;
pub mod geojson;
pub mod geometry;
pub mod history;
pub mod measurement;
pub mod model;
pub mod projector;
pub mod shape_store;
pub mod shortcuts;
pub mod style;
pub mod viewport;

pub use annotations::{Annotation, AnnotationLayer, ANNOTATION_TOOL};
pub use drawing_mode::{DrawingModeController, DrawingState, PendingShape};
pub use engine::{ClickOutcome, MeasurementEngine};
pub use geometry::{DEFAULT_CIRCLE_STEPS, EARTH_RADIUS_KM, MAX_CIRCLE_RADIUS_KM};
pub use history::HistoryStack;
pub use measurement::Measurement;
pub use model::{Shape, ShapeExtra};
pub use projector::{ArrowHead, DerivedLayers, Label, LabelProjector};
pub use shape_store::ShapeStore;
pub use shortcuts::{KeyChord, Shortcut};
pub use style::StyleBroadcaster;
pub use viewport::{MapViewport, WebMercatorViewport};
