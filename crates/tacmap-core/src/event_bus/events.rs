//! Event type definitions for the event bus.
//!
//! This module defines all engine events organized by category.
//! Events are cloneable and serializable so hosts can log or replay them.

use serde::{Deserialize, Serialize};

use crate::data::{AnnotationId, GeoPoint, ShapeId, ShapeKind, Style};

/// Root event enum for all engine events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EngineEvent {
    /// Shape store mutations
    Shape(ShapeEvent),
    /// Drawing tool state changes
    Tool(ToolEvent),
    /// Interaction lock transitions
    Lock(LockEvent),
    /// Free annotation changes
    Annotation(AnnotationEvent),
    /// Map viewport changes
    Viewport(ViewportEvent),
}

impl EngineEvent {
    /// Get the category of this event
    pub fn category(&self) -> EventCategory {
        match self {
            EngineEvent::Shape(_) => EventCategory::Shape,
            EngineEvent::Tool(_) => EventCategory::Tool,
            EngineEvent::Lock(_) => EventCategory::Lock,
            EngineEvent::Annotation(_) => EventCategory::Annotation,
            EngineEvent::Viewport(_) => EventCategory::Viewport,
        }
    }

    /// Get a short description of this event for logging
    pub fn description(&self) -> String {
        match self {
            EngineEvent::Shape(e) => e.description(),
            EngineEvent::Tool(e) => e.description(),
            EngineEvent::Lock(e) => e.description(),
            EngineEvent::Annotation(e) => e.description(),
            EngineEvent::Viewport(e) => e.description(),
        }
    }
}

/// Event category for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    /// Shape store events.
    Shape,
    /// Drawing tool events.
    Tool,
    /// Interaction lock events.
    Lock,
    /// Free annotation events.
    Annotation,
    /// Viewport events.
    Viewport,
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventCategory::Shape => write!(f, "Shape"),
            EventCategory::Tool => write!(f, "Tool"),
            EventCategory::Lock => write!(f, "Lock"),
            EventCategory::Annotation => write!(f, "Annotation"),
            EventCategory::Viewport => write!(f, "Viewport"),
        }
    }
}

/// Shape store events, published after derived layers are rebuilt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ShapeEvent {
    /// A new shape was committed.
    Committed {
        /// Id of the new shape.
        id: ShapeId,
        /// Kind of the new shape.
        kind: ShapeKind,
    },
    /// An existing shape's vertices changed.
    Updated {
        /// Id of the edited shape.
        id: ShapeId,
    },
    /// A shape was deleted explicitly.
    Removed {
        /// Id of the deleted shape.
        id: ShapeId,
    },
    /// The most recently created shape was undone.
    Undone {
        /// Id of the removed shape.
        id: ShapeId,
    },
    /// All shapes were removed.
    Cleared {
        /// Number of shapes that were removed.
        count: usize,
    },
    /// The global style was re-applied to every shape.
    Restyled {
        /// The style now in effect.
        style: Style,
    },
}

impl ShapeEvent {
    fn description(&self) -> String {
        match self {
            ShapeEvent::Committed { id, kind } => format!("Committed {} {}", kind, id),
            ShapeEvent::Updated { id } => format!("Updated {}", id),
            ShapeEvent::Removed { id } => format!("Removed {}", id),
            ShapeEvent::Undone { id } => format!("Undid {}", id),
            ShapeEvent::Cleared { count } => format!("Cleared {} shapes", count),
            ShapeEvent::Restyled { style } => format!(
                "Restyled to {} width {} {}",
                style.color,
                style.width_level.get(),
                style.line_style
            ),
        }
    }
}

/// Drawing tool events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ToolEvent {
    /// A shape tool was armed.
    Armed {
        /// The kind of shape the tool draws.
        kind: ShapeKind,
    },
    /// The drawing surface started collecting vertices.
    AuthoringStarted {
        /// The kind being authored.
        kind: ShapeKind,
    },
    /// The shape tool returned to idle.
    Deactivated,
    /// The annotation tool was switched on.
    AnnotationToolActivated,
    /// The annotation tool was switched off.
    AnnotationToolDeactivated,
    /// Radius for the next circle changed.
    RadiusChanged {
        /// New radius in kilometres.
        radius_km: f64,
    },
}

impl ToolEvent {
    fn description(&self) -> String {
        match self {
            ToolEvent::Armed { kind } => format!("Armed {} tool", kind),
            ToolEvent::AuthoringStarted { kind } => format!("Authoring {}", kind),
            ToolEvent::Deactivated => "Shape tool deactivated".to_string(),
            ToolEvent::AnnotationToolActivated => "Annotation tool activated".to_string(),
            ToolEvent::AnnotationToolDeactivated => "Annotation tool deactivated".to_string(),
            ToolEvent::RadiusChanged { radius_km } => {
                format!("Circle radius set to {} km", radius_km)
            }
        }
    }
}

/// Interaction lock events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LockEvent {
    /// The lock was asserted by a tool.
    Asserted {
        /// Name of the tool holding the lock.
        tool: String,
    },
    /// The lock was released.
    Released {
        /// Name of the tool that held the lock, if any.
        tool: Option<String>,
    },
}

impl LockEvent {
    fn description(&self) -> String {
        match self {
            LockEvent::Asserted { tool } => format!("Lock asserted by {}", tool),
            LockEvent::Released { tool: Some(tool) } => format!("Lock released by {}", tool),
            LockEvent::Released { tool: None } => "Lock released".to_string(),
        }
    }
}

/// Free annotation events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AnnotationEvent {
    /// An annotation was placed.
    Created {
        /// Id of the new annotation.
        id: AnnotationId,
        /// Anchor coordinate.
        position: GeoPoint,
    },
    /// An annotation was dragged to a new anchor.
    Moved {
        /// Id of the moved annotation.
        id: AnnotationId,
        /// New anchor coordinate.
        position: GeoPoint,
    },
    /// Text or size of an annotation changed.
    Edited {
        /// Id of the edited annotation.
        id: AnnotationId,
    },
    /// An annotation was deleted.
    Deleted {
        /// Id of the deleted annotation.
        id: AnnotationId,
    },
    /// All annotations were deleted.
    Cleared {
        /// Number of annotations removed.
        count: usize,
    },
    /// Screen positions were recomputed after a viewport change.
    Reprojected {
        /// Number of annotations reprojected.
        count: usize,
    },
}

impl AnnotationEvent {
    fn description(&self) -> String {
        match self {
            AnnotationEvent::Created { id, position } => format!("Created {} at {}", id, position),
            AnnotationEvent::Moved { id, position } => format!("Moved {} to {}", id, position),
            AnnotationEvent::Edited { id } => format!("Edited {}", id),
            AnnotationEvent::Deleted { id } => format!("Deleted {}", id),
            AnnotationEvent::Cleared { count } => format!("Cleared {} annotations", count),
            AnnotationEvent::Reprojected { count } => format!("Reprojected {} annotations", count),
        }
    }
}

/// Viewport events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ViewportEvent {
    /// The map was panned or zoomed.
    Changed,
}

impl ViewportEvent {
    fn description(&self) -> String {
        match self {
            ViewportEvent::Changed => "Viewport changed".to_string(),
        }
    }
}
