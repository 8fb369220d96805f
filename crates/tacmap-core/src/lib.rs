//! # TacMap Core
//!
//! Core types, traits, and utilities for TacMap.
//! Provides the shared vocabulary (geographic and screen points, shape kinds,
//! styles), the error taxonomy, the interaction lock shared between drawing
//! tools and entity selection, and the engine event bus.

pub mod data;
pub mod error;
pub mod event_bus;
pub mod interaction_lock;
pub mod types;
pub mod units;

pub use data::{
    AnnotationId, Color, GeoPoint, LineStyle, ScreenPoint, ShapeId, ShapeKind, SizeTier, Style,
    WidthLevel,
};

pub use error::{
    Error, GeometryError, ProjectionError, Result, StoreError, StyleError, ToolError,
};

// Re-export event bus for convenience
pub use event_bus::{
    AnnotationEvent, EngineEvent, EventBus, EventBusConfig, EventCategory, EventFilter, LockEvent,
    ShapeEvent, SubscriptionId, ToolEvent, ViewportEvent,
};

pub use interaction_lock::InteractionLock;

pub use types::{Shared, ThreadSafeRw};

pub use units::{
    format_area, format_distance, parse_distance, DistanceUnit, EARTH_RADIUS_KM,
    MAX_CIRCLE_RADIUS_KM,
};
