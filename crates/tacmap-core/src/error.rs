//! Error handling for TacMap
//!
//! Provides error types for every layer of the measurement engine:
//! - Geometry errors (malformed vertex sequences, invalid radii)
//! - Projection errors (screen/geo conversion outside the map)
//! - Store errors (unknown shapes, kind mismatches)
//! - Tool errors (drawing state machine and interaction lock)
//! - Style errors (colour and width parsing)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

use crate::data::{AnnotationId, ShapeId, ShapeKind};

/// Geometry error type
///
/// Raised by local validation before a shape reaches the store. Well-behaved
/// authoring never produces these, so callers log them rather than surface
/// them to the operator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// No vertices at all
    #[error("Vertex list is empty")]
    EmptyVertices,

    /// Fewer vertices than the shape kind requires
    #[error("{kind} needs at least {required} vertices, got {actual}")]
    TooFewVertices {
        /// The shape kind being validated.
        kind: ShapeKind,
        /// Minimum vertex count for the kind.
        required: usize,
        /// Vertex count supplied.
        actual: usize,
    },

    /// Polygon ring collapses to a point or a segment
    #[error("Polygon ring needs at least {required} distinct vertices, got {actual}")]
    TooFewDistinctVertices {
        /// Minimum number of distinct vertices.
        required: usize,
        /// Distinct vertices found.
        actual: usize,
    },

    /// A coordinate is NaN or infinite
    #[error("Coordinate is not finite")]
    NonFiniteCoordinate,

    /// Circle radius is not a positive finite number
    #[error("Invalid circle radius: {radius_km} km")]
    InvalidRadius {
        /// The rejected radius in kilometres.
        radius_km: f64,
    },

    /// Circle resolution too coarse to form a polygon
    #[error("Circle needs at least 3 steps, got {steps}")]
    InvalidSteps {
        /// The rejected step count.
        steps: usize,
    },
}

/// Projection error type
///
/// Conversions between screen pixels and geographic coordinates. These occur
/// transiently during viewport transitions and are dropped by the engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProjectionError {
    /// Pixel lies outside the projectable world
    #[error("Pixel ({x:.1}, {y:.1}) is outside the map")]
    OutOfRange {
        /// Pixel x coordinate.
        x: f64,
        /// Pixel y coordinate.
        y: f64,
    },

    /// Latitude cannot be projected
    #[error("Latitude {lat} cannot be projected")]
    InvalidLatitude {
        /// The rejected latitude in degrees.
        lat: f64,
    },
}

/// Shape store error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// No shape with this id is stored
    #[error("Unknown shape {id}")]
    UnknownShape {
        /// The missing shape id.
        id: ShapeId,
    },

    /// Circle extra data supplied for a non-circle kind, or missing for a circle
    #[error("Shape {kind} does not accept the supplied extra data")]
    InvalidExtra {
        /// The kind being committed.
        kind: ShapeKind,
    },
}

/// Tool error type
///
/// Violations of the drawing-mode state machine and the interaction lock.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ToolError {
    /// An authoring event arrived while no tool is armed
    #[error("No drawing tool is armed")]
    NotArmed,

    /// Event not valid in the current state
    #[error("Event '{event}' is not valid in state {state}")]
    UnexpectedEvent {
        /// The current state name.
        state: String,
        /// The rejected event name.
        event: String,
    },

    /// The interaction lock belongs to another tool
    #[error("Interaction lock is held by {holder}")]
    LockHeld {
        /// The tool currently holding the lock.
        holder: String,
    },

    /// An annotation operation arrived while the annotation tool is off
    #[error("Annotation tool is not active")]
    AnnotationToolInactive,

    /// No annotation with this id exists
    #[error("Unknown annotation {id}")]
    UnknownAnnotation {
        /// The missing annotation id.
        id: AnnotationId,
    },
}

/// Style error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StyleError {
    /// Colour string is not `#rgb` or `#rrggbb`
    #[error("Invalid colour '{input}'")]
    InvalidColor {
        /// The rejected input.
        input: String,
    },

    /// Width level outside 1..=8
    #[error("Width level {level} is outside 1..=8")]
    WidthOutOfRange {
        /// The rejected level.
        level: u8,
    },

    /// Unknown line style name
    #[error("Unknown line style '{input}'")]
    InvalidLineStyle {
        /// The rejected input.
        input: String,
    },
}

/// Main error type for TacMap
///
/// A unified error type that can represent any error from all layers.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Geometry error
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// Projection error
    #[error(transparent)]
    Projection(#[from] ProjectionError),

    /// Store error
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Tool error
    #[error(transparent)]
    Tool(#[from] ToolError),

    /// Style error
    #[error(transparent)]
    Style(#[from] StyleError),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a geometry validation error
    pub fn is_geometry_error(&self) -> bool {
        matches!(self, Error::Geometry(_))
    }

    /// Check if this is a projection error
    pub fn is_projection_error(&self) -> bool {
        matches!(self, Error::Projection(_))
    }

    /// Check if this is a tool/lock error
    pub fn is_tool_error(&self) -> bool {
        matches!(self, Error::Tool(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
