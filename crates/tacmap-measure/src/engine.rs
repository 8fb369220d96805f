//! Measurement engine facade.
//!
//! [`MeasurementEngine`] owns every piece of measurement state for one
//! mounted map: the drawing-mode controller, the shape store, the style
//! broadcaster and the annotation layer. The host forwards UI events to it
//! and reads back shapes, derived layers and annotations.
//!
//! Each operation runs to completion before returning. Events are published
//! on the engine's [`EventBus`] only after the store and derived layers are
//! consistent again.

use std::sync::Arc;

use tacmap_core::{
    AnnotationEvent, AnnotationId, Color, EngineEvent, EventBus, GeoPoint, InteractionLock,
    LineStyle, LockEvent, Result, ScreenPoint, ShapeEvent, ShapeId, ShapeKind, SizeTier, Style,
    ToolEvent, ViewportEvent, WidthLevel,
};
use tacmap_settings::Config;

use crate::annotations::{Annotation, AnnotationLayer, ANNOTATION_TOOL};
use crate::drawing_mode::{DrawingModeController, DrawingState, PendingShape};
use crate::measurement::Measurement;
use crate::model::Shape;
use crate::projector::{ArrowHead, Label};
use crate::shape_store::ShapeStore;
use crate::shortcuts::{KeyChord, Shortcut};
use crate::style::StyleBroadcaster;
use crate::viewport::MapViewport;

/// What a map click turned into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClickOutcome {
    /// The circle tool committed a circle centred on the click.
    CircleCommitted(ShapeId),
    /// The annotation tool placed a new annotation.
    AnnotationPlaced(AnnotationId),
    /// A line or polygon tool is armed; the drawing surface owns the click.
    DelegatedToSurface,
    /// The click could not be projected and was dropped.
    Dropped,
    /// No tool is active; the click belongs to entity selection.
    NotHandled,
}

/// Interactive measurement and annotation engine.
pub struct MeasurementEngine {
    controller: DrawingModeController,
    store: ShapeStore,
    style: StyleBroadcaster,
    annotations: AnnotationLayer,
    lock: InteractionLock,
    events: Arc<EventBus>,
}

impl MeasurementEngine {
    /// Creates an engine sharing `lock` with the host's entity selection.
    pub fn new(config: &Config, lock: InteractionLock) -> Self {
        Self::with_event_bus(config, lock, Arc::new(EventBus::new()))
    }

    /// Creates an engine publishing on an existing bus.
    pub fn with_event_bus(config: &Config, lock: InteractionLock, events: Arc<EventBus>) -> Self {
        Self {
            controller: DrawingModeController::new(
                lock.clone(),
                config.circle.default_radius_km,
                config.circle.steps,
            ),
            store: ShapeStore::with_label_settings(config.labels.clone()),
            style: StyleBroadcaster::new(config.style),
            annotations: AnnotationLayer::new(lock.clone(), config.annotations.clone()),
            lock,
            events,
        }
    }

    fn emit(&self, event: EngineEvent) {
        // No subscribers is a normal state for a headless engine
        self.events.publish(event).ok();
    }

    fn emit_lock(&self) {
        let event = match self.lock.holder() {
            Some(tool) => LockEvent::Asserted { tool },
            None => LockEvent::Released { tool: None },
        };
        self.emit(EngineEvent::Lock(event));
    }

    // ---- shape tools ----

    /// Arms a shape tool. The annotation tool or a different shape tool, if
    /// active, is switched off first so only one tool ever holds the lock.
    /// Re-arming the armed tool changes nothing and publishes nothing.
    pub fn arm_tool(&mut self, kind: ShapeKind) -> Result<()> {
        match self.controller.state().kind() {
            Some(current) if current == kind => return Ok(()),
            Some(_) => {
                self.deactivate_tool();
            }
            None => {}
        }
        if self.annotations.is_active() {
            self.deactivate_annotation_tool();
        }
        self.controller.arm(kind)?;
        tracing::info!("Armed {} tool", kind);
        self.emit_lock();
        self.emit(EngineEvent::Tool(ToolEvent::Armed { kind }));
        Ok(())
    }

    /// Disarms the shape tool without committing anything.
    pub fn deactivate_tool(&mut self) -> bool {
        let Some(kind) = self.controller.state().kind() else {
            return false;
        };
        self.controller.deactivate();
        self.emit(EngineEvent::Tool(ToolEvent::Deactivated));
        self.emit(EngineEvent::Lock(LockEvent::Released {
            tool: Some(kind.to_string()),
        }));
        true
    }

    /// The drawing surface started collecting vertices.
    pub fn on_authoring_started(&mut self) -> Result<()> {
        let kind = self.controller.begin_authoring()?;
        self.emit(EngineEvent::Tool(ToolEvent::AuthoringStarted { kind }));
        Ok(())
    }

    /// The drawing surface finished a line or polygon.
    ///
    /// On success the tool deactivates and the lock is released. If the
    /// geometry is rejected the tool stays armed and the store is unchanged.
    pub fn on_shape_completed(&mut self, vertices: Vec<GeoPoint>) -> Result<ShapeId> {
        let pending = self.controller.complete(vertices)?;
        self.commit_pending(pending)
    }

    /// Routes a map click to the active tool.
    pub fn on_map_click(
        &mut self,
        screen: ScreenPoint,
        viewport: &dyn MapViewport,
    ) -> Result<ClickOutcome> {
        match self.controller.state() {
            DrawingState::CircleAwaitingClick => {
                let center = match viewport.screen_to_geo(screen) {
                    Ok(center) => center,
                    Err(e) => {
                        tracing::warn!("Dropping circle click at {}: {}", screen, e);
                        return Ok(ClickOutcome::Dropped);
                    }
                };
                let pending = self.controller.click(center)?;
                self.commit_pending(pending).map(ClickOutcome::CircleCommitted)
            }
            DrawingState::ToolArmed(_) | DrawingState::AuthoringVertices(_) => {
                Ok(ClickOutcome::DelegatedToSurface)
            }
            DrawingState::Idle if self.annotations.is_active() => {
                match self.annotations.place(screen, viewport)? {
                    Some(id) => {
                        if let Some(annotation) = self.annotations.get(id) {
                            self.emit(EngineEvent::Annotation(AnnotationEvent::Created {
                                id,
                                position: annotation.geo(),
                            }));
                        }
                        Ok(ClickOutcome::AnnotationPlaced(id))
                    }
                    None => Ok(ClickOutcome::Dropped),
                }
            }
            DrawingState::Idle => Ok(ClickOutcome::NotHandled),
        }
    }

    fn commit_pending(&mut self, pending: PendingShape) -> Result<ShapeId> {
        let kind = pending.kind;
        match self
            .store
            .commit(kind, pending.vertices, self.style.active(), pending.extra)
        {
            Ok(id) => {
                tracing::info!("Committed {} {}", kind, id);
                self.emit(EngineEvent::Shape(ShapeEvent::Committed { id, kind }));
                // Lock is released only after the commit is visible
                self.controller.finish();
                self.emit(EngineEvent::Tool(ToolEvent::Deactivated));
                self.emit(EngineEvent::Lock(LockEvent::Released {
                    tool: Some(kind.to_string()),
                }));
                Ok(id)
            }
            Err(e) => {
                tracing::warn!("Rejected {}: {}", kind, e);
                self.controller.rearm();
                Err(e)
            }
        }
    }

    /// Sets the radius used by the next circle click.
    pub fn set_radius_km(&mut self, radius_km: f64) -> Result<()> {
        self.controller.set_radius_km(radius_km)?;
        self.emit(EngineEvent::Tool(ToolEvent::RadiusChanged { radius_km }));
        Ok(())
    }

    // ---- style ----

    pub fn set_style(&mut self, style: Style) -> Result<()> {
        self.style.set_style(style, &mut self.store)?;
        self.emit_restyled();
        Ok(())
    }

    pub fn set_color(&mut self, color: Color) -> Result<()> {
        self.style.set_color(color, &mut self.store)?;
        self.emit_restyled();
        Ok(())
    }

    pub fn set_width_level(&mut self, level: WidthLevel) -> Result<()> {
        self.style.set_width_level(level, &mut self.store)?;
        self.emit_restyled();
        Ok(())
    }

    pub fn set_line_style(&mut self, line_style: LineStyle) -> Result<()> {
        self.style.set_line_style(line_style, &mut self.store)?;
        self.emit_restyled();
        Ok(())
    }

    fn emit_restyled(&self) {
        self.emit(EngineEvent::Shape(ShapeEvent::Restyled {
            style: self.style.active(),
        }));
    }

    // ---- shape store ----

    /// Replaces the vertices of an existing shape (vertex drag).
    pub fn update_shape(&mut self, id: ShapeId, vertices: Vec<GeoPoint>) -> Result<()> {
        self.store.update(id, vertices)?;
        self.emit(EngineEvent::Shape(ShapeEvent::Updated { id }));
        Ok(())
    }

    pub fn remove_shape(&mut self, id: ShapeId) -> Result<()> {
        self.store.remove(id)?;
        tracing::info!("Removed {}", id);
        self.emit(EngineEvent::Shape(ShapeEvent::Removed { id }));
        Ok(())
    }

    /// Removes the most recently created shape still present.
    pub fn undo(&mut self) -> Result<Option<ShapeId>> {
        let undone = self.store.undo()?;
        if let Some(id) = undone {
            tracing::info!("Undid {}", id);
            self.emit(EngineEvent::Shape(ShapeEvent::Undone { id }));
        }
        Ok(undone)
    }

    pub fn clear_shapes(&mut self) -> usize {
        let count = self.store.clear();
        tracing::info!("Cleared {} shapes", count);
        self.emit(EngineEvent::Shape(ShapeEvent::Cleared { count }));
        count
    }

    // ---- annotations ----

    /// Switches the annotation tool on, disarming any shape tool first.
    pub fn activate_annotation_tool(&mut self) -> Result<()> {
        if self.controller.is_active() {
            self.deactivate_tool();
        }
        self.annotations.activate()?;
        tracing::info!("Annotation tool activated");
        self.emit_lock();
        self.emit(EngineEvent::Tool(ToolEvent::AnnotationToolActivated));
        Ok(())
    }

    pub fn deactivate_annotation_tool(&mut self) -> bool {
        if !self.annotations.deactivate() {
            return false;
        }
        self.emit(EngineEvent::Tool(ToolEvent::AnnotationToolDeactivated));
        self.emit(EngineEvent::Lock(LockEvent::Released {
            tool: Some(ANNOTATION_TOOL.to_string()),
        }));
        true
    }

    pub fn set_annotation_text(&mut self, id: AnnotationId, text: impl Into<String>) -> Result<()> {
        self.annotations.set_text(id, text)?;
        self.emit(EngineEvent::Annotation(AnnotationEvent::Edited { id }));
        Ok(())
    }

    pub fn set_annotation_size(&mut self, id: AnnotationId, tier: SizeTier) -> Result<()> {
        self.annotations.set_size_tier(id, tier)?;
        self.emit(EngineEvent::Annotation(AnnotationEvent::Edited { id }));
        Ok(())
    }

    /// Closes the text editor of the annotation being edited.
    pub fn finish_annotation_edit(&mut self) -> Option<AnnotationId> {
        self.annotations.finish_editing()
    }

    pub fn begin_annotation_drag(&mut self, id: AnnotationId) -> Result<()> {
        self.annotations.begin_drag(id)?;
        Ok(())
    }

    pub fn drag_annotation(&mut self, id: AnnotationId, screen: ScreenPoint) -> Result<()> {
        self.annotations.drag_to(id, screen)?;
        Ok(())
    }

    /// Finishes a drag, recomputing the anchor once. Returns the new anchor,
    /// or `None` if the drop point could not be projected.
    pub fn end_annotation_drag(
        &mut self,
        id: AnnotationId,
        viewport: &dyn MapViewport,
    ) -> Result<Option<GeoPoint>> {
        let moved = self.annotations.end_drag(id, viewport)?;
        if let Some(position) = moved {
            self.emit(EngineEvent::Annotation(AnnotationEvent::Moved { id, position }));
        }
        Ok(moved)
    }

    pub fn delete_annotation(&mut self, id: AnnotationId) -> Result<()> {
        self.annotations.delete(id)?;
        self.emit(EngineEvent::Annotation(AnnotationEvent::Deleted { id }));
        Ok(())
    }

    pub fn clear_annotations(&mut self) -> usize {
        let count = self.annotations.clear();
        self.emit(EngineEvent::Annotation(AnnotationEvent::Cleared { count }));
        count
    }

    // ---- host notifications ----

    /// Rebuilds annotation screen positions after a pan or zoom. Shapes and
    /// derived layers are map-native and need nothing.
    pub fn on_viewport_changed(&mut self, viewport: &dyn MapViewport) -> usize {
        self.emit(EngineEvent::Viewport(ViewportEvent::Changed));
        let count = self.annotations.reproject_all(viewport);
        if count > 0 {
            self.emit(EngineEvent::Annotation(AnnotationEvent::Reprojected { count }));
        }
        count
    }

    /// Handles a key press. Returns true when the chord was consumed.
    pub fn handle_key(&mut self, chord: &KeyChord) -> bool {
        match Shortcut::from_chord(chord) {
            Some(Shortcut::Undo) => {
                if let Err(e) = self.undo() {
                    tracing::error!("Undo failed: {}", e);
                }
                true
            }
            None => false,
        }
    }

    /// Tears the engine down: deletes every shape and annotation, returns
    /// all tools to idle and releases the lock unconditionally.
    pub fn close(&mut self) {
        self.controller.reset();
        self.annotations.deactivate();
        let shapes = self.store.clear();
        let annotations = self.annotations.clear();
        let holder = self.lock.release();
        tracing::info!(
            "Engine closed ({} shapes, {} annotations discarded)",
            shapes,
            annotations
        );
        self.emit(EngineEvent::Shape(ShapeEvent::Cleared { count: shapes }));
        self.emit(EngineEvent::Annotation(AnnotationEvent::Cleared {
            count: annotations,
        }));
        self.emit(EngineEvent::Lock(LockEvent::Released { tool: holder }));
    }

    // ---- accessors ----

    pub fn state(&self) -> DrawingState {
        self.controller.state()
    }

    pub fn radius_km(&self) -> f64 {
        self.controller.radius_km()
    }

    pub fn active_style(&self) -> Style {
        self.style.active()
    }

    pub fn is_annotation_tool_active(&self) -> bool {
        self.annotations.is_active()
    }

    pub fn lock(&self) -> &InteractionLock {
        &self.lock
    }

    pub fn events(&self) -> &Arc<EventBus> {
        &self.events
    }

    pub fn store(&self) -> &ShapeStore {
        &self.store
    }

    /// Shapes in draw order.
    pub fn shapes(&self) -> impl Iterator<Item = &Shape> {
        self.store.shapes()
    }

    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.store.get(id)
    }

    pub fn measurement(&self, id: ShapeId) -> Option<&Measurement> {
        self.store.measurement(id)
    }

    pub fn labels(&self) -> &[Label] {
        self.store.labels()
    }

    pub fn arrow_heads(&self) -> &[ArrowHead] {
        self.store.arrow_heads()
    }

    pub fn annotations(&self) -> impl Iterator<Item = &Annotation> {
        self.annotations.iter()
    }

    pub fn annotation(&self, id: AnnotationId) -> Option<&Annotation> {
        self.annotations.get(id)
    }

    pub fn annotation_layer(&self) -> &AnnotationLayer {
        &self.annotations
    }
}
