use tacmap_core::{GeoPoint, ScreenPoint, ShapeKind, SizeTier};
use tacmap_measure::{ClickOutcome, DrawingState, KeyChord, ANNOTATION_TOOL};

use super::{engine, pts, viewport_at};

fn place(
    engine: &mut tacmap_measure::MeasurementEngine,
    viewport: &tacmap_measure::WebMercatorViewport,
    x: f64,
    y: f64,
) -> tacmap_core::AnnotationId {
    match engine.on_map_click(ScreenPoint::new(x, y), viewport).unwrap() {
        ClickOutcome::AnnotationPlaced(id) => id,
        other => panic!("expected an annotation, got {:?}", other),
    }
}

#[test]
fn test_annotation_tool_stays_active_between_placements() {
    let (mut engine, lock) = engine();
    let viewport = viewport_at(GeoPoint::new(24.0, 60.0), 9.0);

    engine.activate_annotation_tool().unwrap();
    let first = place(&mut engine, &viewport, 100.0, 100.0);
    engine.set_annotation_text(first, "OP North").unwrap();
    assert_eq!(engine.finish_annotation_edit(), Some(first));

    let second = place(&mut engine, &viewport, 300.0, 250.0);
    assert_eq!(engine.annotation_layer().editing(), Some(second));
    assert!(engine.is_annotation_tool_active());
    assert!(lock.is_held_by(ANNOTATION_TOOL));

    assert_eq!(engine.annotation(first).unwrap().text(), "OP North");
    assert_eq!(engine.annotation(second).unwrap().text(), "");
    assert_eq!(engine.annotations().count(), 2);
}

#[test]
fn test_size_tier_changes_font_size() {
    let (mut engine, _lock) = engine();
    let viewport = viewport_at(GeoPoint::new(0.0, 0.0), 4.0);
    engine.activate_annotation_tool().unwrap();
    let id = place(&mut engine, &viewport, 400.0, 300.0);

    let layer = engine.annotation_layer();
    let medium = layer.font_size(layer.get(id).unwrap());

    engine.set_annotation_size(id, SizeTier::Large).unwrap();
    let layer = engine.annotation_layer();
    let annotation = layer.get(id).unwrap();
    assert_eq!(annotation.size_tier(), SizeTier::Large);
    assert!(layer.font_size(annotation) > medium);
}

#[test]
fn test_drag_moves_anchor_once() {
    let (mut engine, _lock) = engine();
    let mut viewport = viewport_at(GeoPoint::new(-3.0, 40.0), 8.0);
    engine.activate_annotation_tool().unwrap();
    let id = place(&mut engine, &viewport, 400.0, 300.0);
    let start = engine.annotation(id).unwrap().geo();

    engine.begin_annotation_drag(id).unwrap();
    engine
        .drag_annotation(id, ScreenPoint::new(450.0, 300.0))
        .unwrap();
    assert_eq!(engine.annotation(id).unwrap().geo(), start);

    // A pan mid-drag must not snap the annotation back
    viewport.pan_by(10.0, 0.0);
    engine.on_viewport_changed(&viewport);
    assert_eq!(
        engine.annotation(id).unwrap().screen(),
        ScreenPoint::new(450.0, 300.0)
    );

    let moved = engine.end_annotation_drag(id, &viewport).unwrap().unwrap();
    assert!(moved.lng > start.lng);
    assert_eq!(engine.annotation(id).unwrap().geo(), moved);
}

#[test]
fn test_off_world_click_is_dropped() {
    let (mut engine, _lock) = engine();
    let viewport = viewport_at(GeoPoint::new(0.0, 0.0), 0.0);
    engine.activate_annotation_tool().unwrap();

    let outcome = engine
        .on_map_click(ScreenPoint::new(400.0, 2.0), &viewport)
        .unwrap();
    assert_eq!(outcome, ClickOutcome::Dropped);
    assert_eq!(engine.annotations().count(), 0);
}

#[test]
fn test_shape_tool_and_annotation_tool_exclude_each_other() {
    let (mut engine, lock) = engine();

    engine.activate_annotation_tool().unwrap();
    engine.arm_tool(ShapeKind::Area).unwrap();
    assert!(!engine.is_annotation_tool_active());
    assert!(lock.is_held_by("area"));

    engine.activate_annotation_tool().unwrap();
    assert_eq!(engine.state(), DrawingState::Idle);
    assert!(lock.is_held_by(ANNOTATION_TOOL));
}

#[test]
fn test_foreign_lock_holder_blocks_tools() {
    let (mut engine, lock) = engine();
    lock.assert("entity-selection").unwrap();

    assert!(engine.arm_tool(ShapeKind::Distance).is_err());
    assert!(engine.activate_annotation_tool().is_err());
    assert_eq!(engine.state(), DrawingState::Idle);
    assert!(lock.is_held_by("entity-selection"));
}

#[test]
fn test_ctrl_z_undoes_last_shape() {
    let (mut engine, _lock) = engine();
    engine.arm_tool(ShapeKind::Distance).unwrap();
    engine
        .on_shape_completed(pts(&[(0.0, 0.0), (0.0, 1.0)]))
        .unwrap();

    let chord: KeyChord = "Ctrl+Z".parse().unwrap();
    assert!(engine.handle_key(&chord));
    assert_eq!(engine.shapes().count(), 0);

    let other: KeyChord = "Ctrl+S".parse().unwrap();
    assert!(!engine.handle_key(&other));
}

#[test]
fn test_close_discards_everything() {
    let (mut engine, lock) = engine();
    let viewport = viewport_at(GeoPoint::new(0.0, 0.0), 6.0);

    engine.arm_tool(ShapeKind::Distance).unwrap();
    engine
        .on_shape_completed(pts(&[(0.0, 0.0), (0.0, 1.0)]))
        .unwrap();
    engine.activate_annotation_tool().unwrap();
    place(&mut engine, &viewport, 400.0, 300.0);

    engine.close();

    assert_eq!(engine.shapes().count(), 0);
    assert!(engine.labels().is_empty());
    assert_eq!(engine.annotations().count(), 0);
    assert!(!engine.is_annotation_tool_active());
    assert!(!lock.is_active());
}
