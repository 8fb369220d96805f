//! Shape store with derived layers.
//!
//! Owns the committed shapes, their draw order and the creation history.
//! Every mutation is staged on a snapshot, the derived layers are rebuilt
//! from that snapshot, and only then is the snapshot swapped in. A mutation
//! that fails validation or projection leaves the store exactly as it was.

use std::collections::HashMap;
use tacmap_core::{Error, GeoPoint, Result, ShapeId, ShapeKind, StoreError, Style};
use tacmap_settings::LabelSettings;

use crate::geometry;
use crate::history::HistoryStack;
use crate::measurement::Measurement;
use crate::model::{Shape, ShapeExtra};
use crate::projector::{ArrowHead, DerivedLayers, Label, LabelProjector};

/// Shapes, draw order and history, cloned as a unit when staging a mutation.
#[derive(Debug, Clone, Default)]
struct Snapshot {
    shapes: HashMap<ShapeId, Shape>,
    draw_order: Vec<ShapeId>,
    history: HistoryStack,
}

impl Snapshot {
    fn ordered(&self) -> impl Iterator<Item = &Shape> {
        self.draw_order.iter().filter_map(|id| self.shapes.get(id))
    }

    fn remove(&mut self, id: ShapeId) -> Option<Shape> {
        let shape = self.shapes.remove(&id)?;
        self.draw_order.retain(|entry| *entry != id);
        self.history.forget(id);
        Some(shape)
    }
}

/// Authoritative collection of measurement shapes.
#[derive(Debug, Clone, Default)]
pub struct ShapeStore {
    current: Snapshot,
    derived: DerivedLayers,
    projector: LabelProjector,
}

impl ShapeStore {
    /// Creates an empty store with default label settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store that renders labels with `settings`.
    pub fn with_label_settings(settings: LabelSettings) -> Self {
        Self {
            projector: LabelProjector::new(settings),
            ..Self::default()
        }
    }

    /// Stages `mutate` on a copy of the current contents, rebuilds the
    /// derived layers, and commits both only if everything succeeded.
    fn apply<T>(&mut self, mutate: impl FnOnce(&mut Snapshot) -> Result<T>) -> Result<T> {
        let mut staged = self.current.clone();
        let out = mutate(&mut staged)?;
        let derived = self.projector.project(staged.ordered())?;
        self.current = staged;
        self.derived = derived;
        Ok(out)
    }

    /// Commits a newly authored shape and returns its id.
    ///
    /// Polygon vertex lists are closed if the authoring surface left them
    /// open. Circles must carry [`ShapeExtra::Circle`]; every other kind
    /// must carry [`ShapeExtra::None`].
    pub fn commit(
        &mut self,
        kind: ShapeKind,
        vertices: Vec<GeoPoint>,
        style: Style,
        extra: ShapeExtra,
    ) -> Result<ShapeId> {
        let extra_matches = match extra {
            ShapeExtra::None => kind != ShapeKind::Circle,
            ShapeExtra::Circle { .. } => kind == ShapeKind::Circle,
        };
        if !extra_matches {
            return Err(StoreError::InvalidExtra { kind }.into());
        }
        if let ShapeExtra::Circle { center, radius_km } = extra {
            geometry::validate_circle(center, radius_km)?;
        }

        let vertices = normalize(kind, vertices)?;
        let shape = Shape::new(kind, vertices, style, extra);
        let id = shape.id();

        self.apply(move |staged| {
            staged.shapes.insert(id, shape);
            staged.draw_order.push(id);
            staged.history.push(id);
            Ok(id)
        })?;

        tracing::debug!("Committed {} {} ({} shapes)", kind, id, self.len());
        Ok(id)
    }

    /// Replaces the vertices of an existing shape.
    ///
    /// A circle keeps its generation radius; its center follows the
    /// centroid of the new ring.
    pub fn update(&mut self, id: ShapeId, vertices: Vec<GeoPoint>) -> Result<()> {
        let kind = self
            .get(id)
            .map(Shape::kind)
            .ok_or(StoreError::UnknownShape { id })?;
        let vertices = normalize(kind, vertices)?;

        self.apply(move |staged| {
            let shape = staged
                .shapes
                .get_mut(&id)
                .ok_or(StoreError::UnknownShape { id })?;
            if kind == ShapeKind::Circle {
                shape.set_center(geometry::centroid(&vertices)?);
            }
            shape.set_vertices(vertices);
            Ok(())
        })
    }

    /// Deletes a shape and drops it from the undo history.
    pub fn remove(&mut self, id: ShapeId) -> Result<Shape> {
        self.apply(|staged| {
            staged
                .remove(id)
                .ok_or_else(|| Error::from(StoreError::UnknownShape { id }))
        })
    }

    /// Removes the most recently created shape that still exists.
    ///
    /// Returns `Ok(None)` when there is nothing to undo.
    pub fn undo(&mut self) -> Result<Option<ShapeId>> {
        let Some(id) = self.current.history.latest() else {
            tracing::debug!("Nothing to undo");
            return Ok(None);
        };
        self.apply(|staged| {
            staged.history.pop();
            staged.remove(id);
            Ok(Some(id))
        })
    }

    /// Removes every shape, empties the history and both derived layers.
    /// Returns how many shapes were removed.
    pub fn clear(&mut self) -> usize {
        let count = self.len();
        self.current = Snapshot::default();
        self.derived = DerivedLayers::default();
        count
    }

    /// Applies `style` to every stored shape.
    pub fn restyle(&mut self, style: Style) -> Result<()> {
        self.apply(|staged| {
            for shape in staged.shapes.values_mut() {
                shape.set_style(style);
            }
            Ok(())
        })
    }

    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.current.shapes.get(&id)
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.current.shapes.contains_key(&id)
    }

    /// Shapes in draw order (oldest first).
    pub fn shapes(&self) -> impl Iterator<Item = &Shape> {
        self.current.ordered()
    }

    pub fn len(&self) -> usize {
        self.current.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.shapes.is_empty()
    }

    /// Number of shapes undo can still remove.
    pub fn undo_depth(&self) -> usize {
        self.current.history.len()
    }

    pub fn measurement(&self, id: ShapeId) -> Option<&Measurement> {
        self.derived.measurements.get(&id)
    }

    pub fn labels(&self) -> &[Label] {
        &self.derived.labels
    }

    pub fn arrow_heads(&self) -> &[ArrowHead] {
        &self.derived.arrow_heads
    }

    pub fn derived(&self) -> &DerivedLayers {
        &self.derived
    }

    pub fn label_settings(&self) -> &LabelSettings {
        self.projector.settings()
    }
}

fn normalize(kind: ShapeKind, mut vertices: Vec<GeoPoint>) -> Result<Vec<GeoPoint>> {
    if kind.is_polygon() {
        geometry::close_ring(&mut vertices);
    }
    geometry::validate(kind, &vertices)?;
    Ok(vertices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tacmap_core::{Color, GeometryError};

    fn pts(points: &[(f64, f64)]) -> Vec<GeoPoint> {
        points.iter().map(|&p| GeoPoint::from(p)).collect()
    }

    fn commit_line(store: &mut ShapeStore) -> ShapeId {
        store
            .commit(
                ShapeKind::Distance,
                pts(&[(0.0, 0.0), (0.0, 1.0)]),
                Style::default(),
                ShapeExtra::None,
            )
            .unwrap()
    }

    #[test]
    fn test_commit_builds_derived_layers() {
        let mut store = ShapeStore::new();
        let id = commit_line(&mut store);

        assert_eq!(store.len(), 1);
        assert_eq!(store.labels().len(), 1);
        assert_eq!(store.labels()[0].shape_id, id);
        assert!(matches!(
            store.measurement(id),
            Some(Measurement::Line { .. })
        ));
    }

    #[test]
    fn test_open_polygon_is_closed_on_commit() {
        let mut store = ShapeStore::new();
        let id = store
            .commit(
                ShapeKind::Area,
                pts(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]),
                Style::default(),
                ShapeExtra::None,
            )
            .unwrap();
        let ring = store.get(id).unwrap().vertices();
        assert_eq!(ring.len(), 4);
        assert_eq!(ring.first(), ring.last());
    }

    #[test]
    fn test_rejected_commit_leaves_store_unchanged() {
        let mut store = ShapeStore::new();
        commit_line(&mut store);
        let labels = store.labels().to_vec();

        let err = store
            .commit(
                ShapeKind::Distance,
                pts(&[(0.0, 0.0)]),
                Style::default(),
                ShapeExtra::None,
            )
            .unwrap_err();
        assert!(err.is_geometry_error());
        assert_eq!(store.len(), 1);
        assert_eq!(store.labels(), labels.as_slice());
        assert_eq!(store.undo_depth(), 1);
    }

    #[test]
    fn test_extra_must_match_kind() {
        let mut store = ShapeStore::new();
        let err = store
            .commit(
                ShapeKind::Circle,
                pts(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]),
                Style::default(),
                ShapeExtra::None,
            )
            .unwrap_err();
        assert_eq!(
            err,
            Error::Store(StoreError::InvalidExtra {
                kind: ShapeKind::Circle
            })
        );
        assert!(store.is_empty());
    }

    #[test]
    fn test_circle_extra_is_validated() {
        let mut store = ShapeStore::new();
        let center = GeoPoint::new(5.0, 5.0);
        let ring = geometry::circle_ring(center, 10.0, 64).unwrap();

        for radius_km in [f64::NAN, -1.0, 0.0, f64::INFINITY, 30_000.0] {
            let err = store
                .commit(
                    ShapeKind::Circle,
                    ring.clone(),
                    Style::default(),
                    ShapeExtra::Circle { center, radius_km },
                )
                .unwrap_err();
            assert!(matches!(
                err,
                Error::Geometry(GeometryError::InvalidRadius { .. })
            ));
        }

        let err = store
            .commit(
                ShapeKind::Circle,
                ring.clone(),
                Style::default(),
                ShapeExtra::Circle {
                    center: GeoPoint::new(f64::NAN, 5.0),
                    radius_km: 10.0,
                },
            )
            .unwrap_err();
        assert_eq!(err, Error::Geometry(GeometryError::NonFiniteCoordinate));
        assert!(store.is_empty());
        assert!(store.labels().is_empty());

        store
            .commit(
                ShapeKind::Circle,
                ring,
                Style::default(),
                ShapeExtra::Circle {
                    center,
                    radius_km: 10.0,
                },
            )
            .unwrap();
        assert_eq!(store.labels()[0].text, "r 10.00 km");
    }

    #[test]
    fn test_update_circle_across_antimeridian_keeps_center() {
        let mut store = ShapeStore::new();
        let center = GeoPoint::new(179.9, 0.0);
        let ring = geometry::circle_ring(center, 100.0, 64).unwrap();
        let id = store
            .commit(
                ShapeKind::Circle,
                ring.clone(),
                Style::default(),
                ShapeExtra::Circle {
                    center,
                    radius_km: 100.0,
                },
            )
            .unwrap();
        assert!(geometry::distance_km(store.labels()[0].anchor, center) < 0.5);

        store.update(id, ring).unwrap();
        let moved = store.get(id).unwrap().center().unwrap();
        assert!(geometry::distance_km(moved, center) < 0.5, "center {}", moved);
    }

    #[test]
    fn test_undo_removes_latest_and_skips_removed() {
        let mut store = ShapeStore::new();
        let first = commit_line(&mut store);
        let second = commit_line(&mut store);
        let third = commit_line(&mut store);

        store.remove(third).unwrap();
        assert_eq!(store.undo().unwrap(), Some(second));
        assert_eq!(store.undo().unwrap(), Some(first));
        assert_eq!(store.undo().unwrap(), None);
        assert!(store.labels().is_empty());
    }

    #[test]
    fn test_update_recomputes_measurement() {
        let mut store = ShapeStore::new();
        let id = commit_line(&mut store);

        store
            .update(id, pts(&[(0.0, 0.0), (0.0, 2.0)]))
            .unwrap();
        match store.measurement(id) {
            Some(Measurement::Line { length_km }) => {
                assert!((length_km - 222.39).abs() < 0.01)
            }
            other => panic!("unexpected measurement {:?}", other),
        }

        let err = store.update(id, pts(&[(0.0, 0.0)])).unwrap_err();
        assert_eq!(
            err,
            Error::Geometry(GeometryError::TooFewVertices {
                kind: ShapeKind::Distance,
                required: 2,
                actual: 1
            })
        );
        assert_eq!(store.get(id).unwrap().vertices().len(), 2);
    }

    #[test]
    fn test_unknown_ids_are_errors() {
        let mut store = ShapeStore::new();
        let ghost = ShapeId::new();
        assert!(store.remove(ghost).is_err());
        assert!(store.update(ghost, pts(&[(0.0, 0.0), (1.0, 1.0)])).is_err());
    }

    #[test]
    fn test_restyle_recolors_every_label() {
        let mut store = ShapeStore::new();
        commit_line(&mut store);
        commit_line(&mut store);

        let blue = Style {
            color: Color::rgb(0, 0, 255),
            ..Style::default()
        };
        store.restyle(blue).unwrap();
        assert!(store.shapes().all(|s| s.style() == blue));
        assert!(store.labels().iter().all(|l| l.color == blue.color));
    }

    #[test]
    fn test_clear_empties_everything() {
        let mut store = ShapeStore::new();
        commit_line(&mut store);
        commit_line(&mut store);

        assert_eq!(store.clear(), 2);
        assert!(store.is_empty());
        assert!(store.derived().is_empty());
        assert_eq!(store.undo_depth(), 0);
        assert_eq!(store.undo().unwrap(), None);
    }
}
