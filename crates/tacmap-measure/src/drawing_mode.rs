//! Drawing-mode state machine.
//!
//! Tools are single-shot: arming a tool allows exactly one shape to be
//! authored, after which the controller falls back to [`DrawingState::Idle`].
//! The interaction lock is asserted before the armed tool accepts any map
//! click and released only once its shape has been committed.

use std::fmt;

use tacmap_core::{GeoPoint, GeometryError, InteractionLock, Result, ShapeKind, ToolError};

use crate::geometry::{self, DEFAULT_CIRCLE_STEPS};
use crate::model::ShapeExtra;

/// Where the drawing workflow currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawingState {
    /// No tool armed; map clicks belong to entity selection.
    #[default]
    Idle,
    /// A line or polygon tool is armed; the surface has not started yet.
    ToolArmed(ShapeKind),
    /// The drawing surface is collecting vertices.
    AuthoringVertices(ShapeKind),
    /// The circle tool is waiting for the click that places the center.
    CircleAwaitingClick,
}

impl DrawingState {
    /// Kind of shape being drawn, if any tool is armed.
    pub fn kind(&self) -> Option<ShapeKind> {
        match self {
            Self::Idle => None,
            Self::ToolArmed(kind) | Self::AuthoringVertices(kind) => Some(*kind),
            Self::CircleAwaitingClick => Some(ShapeKind::Circle),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

impl fmt::Display for DrawingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::ToolArmed(kind) => write!(f, "ToolArmed({})", kind),
            Self::AuthoringVertices(kind) => write!(f, "AuthoringVertices({})", kind),
            Self::CircleAwaitingClick => write!(f, "CircleAwaitingClick"),
        }
    }
}

/// A finished shape waiting to be committed to the store.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingShape {
    pub kind: ShapeKind,
    pub vertices: Vec<GeoPoint>,
    pub extra: ShapeExtra,
}

/// Owns the drawing state, the circle radius and the tool side of the
/// interaction lock.
#[derive(Debug, Clone)]
pub struct DrawingModeController {
    state: DrawingState,
    radius_km: f64,
    steps: usize,
    lock: InteractionLock,
}

impl DrawingModeController {
    pub fn new(lock: InteractionLock, radius_km: f64, steps: usize) -> Self {
        Self {
            state: DrawingState::Idle,
            radius_km,
            steps,
            lock,
        }
    }

    pub fn state(&self) -> DrawingState {
        self.state
    }

    /// True while any shape tool is armed.
    pub fn is_active(&self) -> bool {
        !self.state.is_idle()
    }

    pub fn radius_km(&self) -> f64 {
        self.radius_km
    }

    /// Sets the radius for the next circle. A circle already on the map is
    /// not resized.
    pub fn set_radius_km(&mut self, radius_km: f64) -> std::result::Result<(), GeometryError> {
        geometry::validate_radius(radius_km)?;
        self.radius_km = radius_km;
        Ok(())
    }

    /// Arms `kind` from idle.
    ///
    /// The lock is asserted first; if another tool holds it the controller
    /// stays idle. A different armed shape tool is replaced.
    pub fn arm(&mut self, kind: ShapeKind) -> Result<()> {
        if self.state.kind() == Some(kind) {
            return Ok(());
        }
        if self.is_active() {
            self.deactivate();
        }

        self.lock.assert(kind.to_string())?;
        self.state = match kind {
            ShapeKind::Circle => DrawingState::CircleAwaitingClick,
            other => DrawingState::ToolArmed(other),
        };
        tracing::debug!("Armed {} tool", kind);
        Ok(())
    }

    /// The drawing surface began collecting vertices.
    pub fn begin_authoring(&mut self) -> Result<ShapeKind> {
        match self.state {
            DrawingState::ToolArmed(kind) => {
                self.state = DrawingState::AuthoringVertices(kind);
                Ok(kind)
            }
            DrawingState::AuthoringVertices(kind) => Ok(kind),
            state => Err(Self::unexpected(state, "authoring_started")),
        }
    }

    /// The drawing surface completed a line or polygon.
    ///
    /// The state is unchanged until [`finish`](Self::finish) or
    /// [`rearm`](Self::rearm) reports the commit outcome.
    pub fn complete(&mut self, vertices: Vec<GeoPoint>) -> Result<PendingShape> {
        match self.state {
            DrawingState::ToolArmed(kind) | DrawingState::AuthoringVertices(kind) => {
                Ok(PendingShape {
                    kind,
                    vertices,
                    extra: ShapeExtra::None,
                })
            }
            state => Err(Self::unexpected(state, "shape_completed")),
        }
    }

    /// A map click while the circle tool waits: generates the ring with the
    /// radius current at the time of the click.
    pub fn click(&mut self, center: GeoPoint) -> Result<PendingShape> {
        match self.state {
            DrawingState::CircleAwaitingClick => {
                let vertices = geometry::circle_ring(center, self.radius_km, self.steps)?;
                Ok(PendingShape {
                    kind: ShapeKind::Circle,
                    vertices,
                    extra: ShapeExtra::Circle {
                        center,
                        radius_km: self.radius_km,
                    },
                })
            }
            state => Err(Self::unexpected(state, "map_click")),
        }
    }

    /// The pending shape was committed: return to idle and release the lock.
    pub fn finish(&mut self) {
        self.deactivate();
    }

    /// The pending shape was rejected: keep the tool armed for another try.
    pub fn rearm(&mut self) {
        if let DrawingState::AuthoringVertices(kind) = self.state {
            self.state = DrawingState::ToolArmed(kind);
        }
    }

    /// Returns to idle, releasing the lock if this tool holds it. Returns
    /// false when already idle.
    pub fn deactivate(&mut self) -> bool {
        let Some(kind) = self.state.kind() else {
            return false;
        };
        self.state = DrawingState::Idle;
        if self.lock.is_held_by(&kind.to_string()) {
            self.lock.release();
        }
        tracing::debug!("{} tool deactivated", kind);
        true
    }

    /// Forces idle without touching the lock. Used on teardown, where the
    /// lock is released unconditionally by the caller.
    pub(crate) fn reset(&mut self) {
        self.state = DrawingState::Idle;
    }

    fn unexpected(state: DrawingState, event: &str) -> tacmap_core::Error {
        if state.is_idle() {
            ToolError::NotArmed.into()
        } else {
            ToolError::UnexpectedEvent {
                state: state.to_string(),
                event: event.to_string(),
            }
            .into()
        }
    }
}

impl Default for DrawingModeController {
    fn default() -> Self {
        Self::new(InteractionLock::new(), 10.0, DEFAULT_CIRCLE_STEPS)
    }
}
