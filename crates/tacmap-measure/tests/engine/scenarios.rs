use tacmap_core::{Color, GeoPoint, ScreenPoint, ShapeKind, Style, WidthLevel};
use tacmap_measure::geometry::distance_km;
use tacmap_measure::{ClickOutcome, DrawingState, Measurement};

use super::{engine, pts, viewport_at};

#[test]
fn test_distance_line_measures_one_degree() {
    let (mut engine, _lock) = engine();
    engine.arm_tool(ShapeKind::Distance).unwrap();
    engine.on_authoring_started().unwrap();
    let id = engine
        .on_shape_completed(pts(&[(0.0, 0.0), (0.0, 1.0)]))
        .unwrap();

    match engine.measurement(id) {
        Some(Measurement::Line { length_km }) => assert!((length_km - 111.19).abs() < 0.01),
        other => panic!("unexpected measurement {:?}", other),
    }
    assert_eq!(engine.labels()[0].text, "111.19 km");
}

#[test]
fn test_circle_click_generates_ring() {
    let (mut engine, lock) = engine();
    let center = GeoPoint::new(-66.0, 10.0);
    let viewport = viewport_at(center, 8.0);

    engine.arm_tool(ShapeKind::Circle).unwrap();
    engine.set_radius_km(100.0).unwrap();
    assert!(lock.is_held_by("circle"));

    let outcome = engine
        .on_map_click(ScreenPoint::new(400.0, 300.0), &viewport)
        .unwrap();
    let ClickOutcome::CircleCommitted(id) = outcome else {
        panic!("expected a circle, got {:?}", outcome);
    };

    let shape = engine.shape(id).unwrap();
    assert_eq!(shape.vertices().len(), 65);
    for point in shape.vertices() {
        let d = distance_km(center, *point);
        assert!((d - 100.0).abs() < 1.0, "got {}", d);
    }
    assert_eq!(
        engine.measurement(id),
        Some(&Measurement::Circle { radius_km: 100.0 })
    );
    assert_eq!(engine.labels()[0].text, "r 100.00 km");
    assert_eq!(engine.state(), DrawingState::Idle);
    assert!(!lock.is_active());
}

#[test]
fn test_radius_change_only_affects_next_circle() {
    let (mut engine, _lock) = engine();
    let viewport = viewport_at(GeoPoint::new(0.0, 0.0), 6.0);

    engine.arm_tool(ShapeKind::Circle).unwrap();
    let ClickOutcome::CircleCommitted(first) = engine
        .on_map_click(ScreenPoint::new(400.0, 300.0), &viewport)
        .unwrap()
    else {
        panic!("expected a circle");
    };

    engine.set_radius_km(50.0).unwrap();
    assert_eq!(engine.shape(first).unwrap().radius_km(), Some(10.0));

    engine.arm_tool(ShapeKind::Circle).unwrap();
    let ClickOutcome::CircleCommitted(second) = engine
        .on_map_click(ScreenPoint::new(200.0, 300.0), &viewport)
        .unwrap()
    else {
        panic!("expected a circle");
    };
    assert_eq!(engine.shape(second).unwrap().radius_km(), Some(50.0));
    assert_eq!(engine.shape(first).unwrap().radius_km(), Some(10.0));
}

#[test]
fn test_arrow_head_points_east() {
    let (mut engine, _lock) = engine();
    engine.arm_tool(ShapeKind::Arrow).unwrap();
    engine
        .on_shape_completed(pts(&[(0.0, 0.0), (1.0, 0.0)]))
        .unwrap();

    let heads = engine.arrow_heads();
    assert_eq!(heads.len(), 1);
    assert_eq!(heads[0].coordinate, GeoPoint::new(1.0, 0.0));
    let bearing = heads[0].bearing;
    assert!(bearing < 1e-9 || bearing > 360.0 - 1e-9, "got {}", bearing);
}

#[test]
fn test_undo_after_three_commits() {
    let (mut engine, _lock) = engine();
    let mut ids = Vec::new();
    for lat in [1.0, 2.0, 3.0] {
        engine.arm_tool(ShapeKind::Distance).unwrap();
        ids.push(
            engine
                .on_shape_completed(pts(&[(0.0, 0.0), (0.0, lat)]))
                .unwrap(),
        );
    }

    assert_eq!(engine.undo().unwrap(), Some(ids[2]));
    let remaining: Vec<_> = engine.shapes().map(|s| s.id()).collect();
    assert_eq!(remaining, vec![ids[0], ids[1]]);
    assert_eq!(engine.labels().len(), 2);
}

#[test]
fn test_style_change_reaches_all_shapes() {
    let (mut engine, _lock) = engine();
    engine
        .set_color(Color::rgb(0, 0, 255))
        .unwrap();

    engine.arm_tool(ShapeKind::Distance).unwrap();
    engine
        .on_shape_completed(pts(&[(0.0, 0.0), (0.0, 1.0)]))
        .unwrap();
    engine.arm_tool(ShapeKind::Area).unwrap();
    engine
        .on_shape_completed(pts(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]))
        .unwrap();
    engine.arm_tool(ShapeKind::Arrow).unwrap();
    engine
        .on_shape_completed(pts(&[(0.0, 0.0), (1.0, 0.0)]))
        .unwrap();

    let before = engine.labels()[0].size;
    let red = Style {
        color: "#ff0000".parse().unwrap(),
        width_level: WidthLevel::new(5).unwrap(),
        ..engine.active_style()
    };
    engine.set_style(red).unwrap();

    assert_eq!(engine.shapes().count(), 3);
    assert!(engine.shapes().all(|s| s.style() == red));
    assert!(engine.labels().iter().all(|l| l.color == Color::RED));
    assert!(engine.arrow_heads().iter().all(|h| h.color == Color::RED));

    let size = engine.labels()[0].size;
    assert!(size > before);
    assert!(engine.labels().iter().all(|l| l.size == size));
    assert_eq!(engine.arrow_heads()[0].size, size);
}

#[test]
fn test_pan_moves_annotations_but_not_anchors() {
    let (mut engine, _lock) = engine();
    let mut viewport = viewport_at(GeoPoint::new(10.0, 50.0), 7.0);

    engine.activate_annotation_tool().unwrap();
    let mut ids = Vec::new();
    for click in [ScreenPoint::new(200.0, 200.0), ScreenPoint::new(600.0, 400.0)] {
        match engine.on_map_click(click, &viewport).unwrap() {
            ClickOutcome::AnnotationPlaced(id) => ids.push(id),
            other => panic!("expected an annotation, got {:?}", other),
        }
    }
    let before: Vec<_> = ids
        .iter()
        .map(|id| engine.annotation(*id).unwrap().clone())
        .collect();

    viewport.pan_by(-120.0, 35.0);
    assert_eq!(engine.on_viewport_changed(&viewport), 2);

    for (id, old) in ids.iter().zip(&before) {
        let now = engine.annotation(*id).unwrap();
        assert_ne!(now.screen(), old.screen());
        assert_eq!(now.geo(), old.geo());
    }
}

#[test]
fn test_update_then_undo_removes_by_creation_order() {
    let (mut engine, _lock) = engine();
    engine.arm_tool(ShapeKind::Distance).unwrap();
    let first = engine
        .on_shape_completed(pts(&[(0.0, 0.0), (0.0, 1.0)]))
        .unwrap();
    engine.arm_tool(ShapeKind::Distance).unwrap();
    let second = engine
        .on_shape_completed(pts(&[(5.0, 0.0), (5.0, 1.0)]))
        .unwrap();

    engine
        .update_shape(first, pts(&[(0.0, 0.0), (0.0, 3.0)]))
        .unwrap();
    assert_eq!(engine.undo().unwrap(), Some(second));
    assert_eq!(
        engine.shape(first).unwrap().vertices(),
        pts(&[(0.0, 0.0), (0.0, 3.0)]).as_slice()
    );
}

#[test]
fn test_remove_then_undo() {
    let (mut engine, _lock) = engine();
    engine.arm_tool(ShapeKind::Distance).unwrap();
    let first = engine
        .on_shape_completed(pts(&[(0.0, 0.0), (0.0, 1.0)]))
        .unwrap();
    engine.arm_tool(ShapeKind::Distance).unwrap();
    let second = engine
        .on_shape_completed(pts(&[(5.0, 0.0), (5.0, 1.0)]))
        .unwrap();

    engine.remove_shape(second).unwrap();
    assert_eq!(engine.undo().unwrap(), Some(first));
    assert_eq!(engine.undo().unwrap(), None);
    assert!(engine.labels().is_empty());
}
