//! Free text annotations.
//!
//! Annotations are overlay elements rather than map features. Each one
//! keeps a geographic anchor and a cached screen position:
//!
//! - placing an annotation converts the clicked pixel to its anchor
//! - dragging moves only the screen position until the drag ends, when the
//!   anchor is recomputed once
//! - after every pan or zoom all screen positions are rebuilt from the
//!   anchors
//!
//! Projection failures never surface to the operator; the triggering event
//! is dropped and logged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tacmap_core::{AnnotationId, GeoPoint, InteractionLock, ScreenPoint, SizeTier, ToolError};
use tacmap_settings::AnnotationSettings;

use crate::viewport::MapViewport;

/// Interaction lock holder name of the annotation tool.
pub const ANNOTATION_TOOL: &str = "annotation";

/// A text box anchored to a geographic coordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    id: AnnotationId,
    text: String,
    geo: GeoPoint,
    screen: ScreenPoint,
    size_tier: SizeTier,
    created_at: DateTime<Utc>,
}

impl Annotation {
    pub fn id(&self) -> AnnotationId {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Geographic anchor. Authoritative between drags.
    pub fn geo(&self) -> GeoPoint {
        self.geo
    }

    /// Cached screen position, valid for the last known viewport.
    pub fn screen(&self) -> ScreenPoint {
        self.screen
    }

    pub fn size_tier(&self) -> SizeTier {
        self.size_tier
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[derive(Debug, Clone, Copy)]
struct Drag {
    id: AnnotationId,
    origin: ScreenPoint,
}

/// The set of annotations and the state of the annotation tool.
#[derive(Debug, Clone)]
pub struct AnnotationLayer {
    annotations: Vec<Annotation>,
    active: bool,
    editing: Option<AnnotationId>,
    drag: Option<Drag>,
    settings: AnnotationSettings,
    lock: InteractionLock,
}

impl AnnotationLayer {
    pub fn new(lock: InteractionLock, settings: AnnotationSettings) -> Self {
        Self {
            annotations: Vec::new(),
            active: false,
            editing: None,
            drag: None,
            settings,
            lock,
        }
    }

    /// True while the annotation tool is switched on.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Switches the tool on, asserting the interaction lock.
    pub fn activate(&mut self) -> Result<(), ToolError> {
        self.lock.assert(ANNOTATION_TOOL)?;
        self.active = true;
        Ok(())
    }

    /// Switches the tool off and releases the lock if it holds it. Returns
    /// false when the tool was already off.
    pub fn deactivate(&mut self) -> bool {
        if !self.active {
            return false;
        }
        self.active = false;
        self.editing = None;
        if self.lock.is_held_by(ANNOTATION_TOOL) {
            self.lock.release();
        }
        true
    }

    /// Creates an empty annotation at the clicked pixel and opens it for
    /// editing.
    ///
    /// Returns `Ok(None)` when the pixel cannot be projected; the click is
    /// dropped.
    pub fn place(
        &mut self,
        screen: ScreenPoint,
        viewport: &dyn MapViewport,
    ) -> Result<Option<AnnotationId>, ToolError> {
        if !self.active {
            return Err(ToolError::AnnotationToolInactive);
        }

        let geo = match viewport.screen_to_geo(screen) {
            Ok(geo) => geo,
            Err(e) => {
                tracing::warn!("Dropping annotation click at {}: {}", screen, e);
                return Ok(None);
            }
        };

        let annotation = Annotation {
            id: AnnotationId::new(),
            text: String::new(),
            geo,
            screen,
            size_tier: self.settings.default_size_tier,
            created_at: Utc::now(),
        };
        let id = annotation.id;
        self.annotations.push(annotation);
        self.editing = Some(id);
        tracing::debug!("Placed {} at {}", id, geo);
        Ok(Some(id))
    }

    /// The annotation whose text is being edited, if any.
    pub fn editing(&self) -> Option<AnnotationId> {
        self.editing
    }

    pub fn finish_editing(&mut self) -> Option<AnnotationId> {
        self.editing.take()
    }

    pub fn set_text(&mut self, id: AnnotationId, text: impl Into<String>) -> Result<(), ToolError> {
        self.get_mut(id)?.text = text.into();
        Ok(())
    }

    pub fn set_size_tier(&mut self, id: AnnotationId, tier: SizeTier) -> Result<(), ToolError> {
        self.get_mut(id)?.size_tier = tier;
        Ok(())
    }

    /// Starts dragging an annotation. Only one drag runs at a time; a new
    /// drag abandons the previous one without recomputing its anchor.
    pub fn begin_drag(&mut self, id: AnnotationId) -> Result<(), ToolError> {
        let origin = self.get(id).ok_or(ToolError::UnknownAnnotation { id })?.screen;
        self.drag = Some(Drag { id, origin });
        Ok(())
    }

    /// Moves the dragged annotation on screen. The anchor is left alone.
    pub fn drag_to(&mut self, id: AnnotationId, screen: ScreenPoint) -> Result<(), ToolError> {
        if self.drag.map(|d| d.id) != Some(id) {
            self.begin_drag(id)?;
        }
        self.get_mut(id)?.screen = screen;
        Ok(())
    }

    /// Ends the drag and recomputes the anchor from the final screen
    /// position.
    ///
    /// If the final position cannot be projected the annotation snaps back
    /// to where the drag started and `Ok(None)` is returned.
    pub fn end_drag(
        &mut self,
        id: AnnotationId,
        viewport: &dyn MapViewport,
    ) -> Result<Option<GeoPoint>, ToolError> {
        let origin = match self.drag.take() {
            Some(drag) if drag.id == id => drag.origin,
            other => {
                self.drag = other;
                return Ok(None);
            }
        };

        let annotation = self.get_mut(id)?;
        match viewport.screen_to_geo(annotation.screen) {
            Ok(geo) => {
                annotation.geo = geo;
                Ok(Some(geo))
            }
            Err(e) => {
                tracing::warn!("Dropping drag end for {}: {}", id, e);
                annotation.screen = origin;
                Ok(None)
            }
        }
    }

    /// Rebuilds every cached screen position from its anchor. Annotations
    /// that cannot be projected keep their previous position. Returns how
    /// many were updated.
    pub fn reproject_all(&mut self, viewport: &dyn MapViewport) -> usize {
        let dragging = self.drag.map(|d| d.id);
        let mut count = 0;
        for annotation in &mut self.annotations {
            if Some(annotation.id) == dragging {
                continue;
            }
            match viewport.geo_to_screen(annotation.geo) {
                Ok(screen) => {
                    annotation.screen = screen;
                    count += 1;
                }
                Err(e) => tracing::debug!("Keeping stale position for {}: {}", annotation.id, e),
            }
        }
        count
    }

    pub fn delete(&mut self, id: AnnotationId) -> Result<Annotation, ToolError> {
        let index = self
            .annotations
            .iter()
            .position(|a| a.id == id)
            .ok_or(ToolError::UnknownAnnotation { id })?;
        if self.editing == Some(id) {
            self.editing = None;
        }
        if self.drag.map(|d| d.id) == Some(id) {
            self.drag = None;
        }
        Ok(self.annotations.remove(index))
    }

    /// Deletes every annotation. Returns how many were removed.
    pub fn clear(&mut self) -> usize {
        let count = self.annotations.len();
        self.annotations.clear();
        self.editing = None;
        self.drag = None;
        count
    }

    /// Font size in pixels for an annotation's tier.
    pub fn font_size(&self, annotation: &Annotation) -> f64 {
        self.settings.font_size(annotation.size_tier)
    }

    pub fn get(&self, id: AnnotationId) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.id == id)
    }

    fn get_mut(&mut self, id: AnnotationId) -> Result<&mut Annotation, ToolError> {
        self.annotations
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(ToolError::UnknownAnnotation { id })
    }

    /// Annotations in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
        self.annotations.iter()
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }
}
