use proptest::prelude::*;
use tacmap_core::{Color, GeoPoint, ScreenPoint, ShapeKind, Style, WidthLevel};
use tacmap_measure::geometry::{circle_ring, distance_km, initial_bearing, normalize_degrees};
use tacmap_measure::{DrawingState, ShapeExtra, ShapeStore, ANNOTATION_TOOL};

use super::{engine, viewport_at};

#[derive(Debug, Clone)]
enum StoreOp {
    Commit(ShapeKind, f64, f64),
    Update(usize, f64),
    Remove(usize),
    Undo,
    Restyle(u8),
}

fn store_op() -> impl Strategy<Value = StoreOp> {
    let kind = prop_oneof![
        Just(ShapeKind::Distance),
        Just(ShapeKind::Area),
        Just(ShapeKind::Circle),
        Just(ShapeKind::Arrow),
    ];
    prop_oneof![
        4 => (kind, -170.0..170.0f64, -60.0..60.0f64)
            .prop_map(|(k, lng, lat)| StoreOp::Commit(k, lng, lat)),
        1 => (0..8usize, 0.1..2.0f64).prop_map(|(i, d)| StoreOp::Update(i, d)),
        1 => (0..8usize).prop_map(StoreOp::Remove),
        2 => Just(StoreOp::Undo),
        1 => (WidthLevel::MIN..=WidthLevel::MAX).prop_map(StoreOp::Restyle),
    ]
}

fn shape_vertices(kind: ShapeKind, lng: f64, lat: f64) -> (Vec<GeoPoint>, ShapeExtra) {
    let origin = GeoPoint::new(lng, lat);
    match kind {
        ShapeKind::Distance | ShapeKind::Arrow => (
            vec![origin, GeoPoint::new(lng + 1.0, lat + 0.5)],
            ShapeExtra::None,
        ),
        ShapeKind::Area => (
            vec![
                origin,
                GeoPoint::new(lng + 1.0, lat),
                GeoPoint::new(lng + 1.0, lat + 1.0),
            ],
            ShapeExtra::None,
        ),
        ShapeKind::Circle => {
            let ring = circle_ring(origin, 25.0, 32).expect("valid circle");
            (
                ring,
                ShapeExtra::Circle {
                    center: origin,
                    radius_km: 25.0,
                },
            )
        }
    }
}

fn apply_op(store: &mut ShapeStore, op: &StoreOp) {
    match *op {
        StoreOp::Commit(kind, lng, lat) => {
            let (vertices, extra) = shape_vertices(kind, lng, lat);
            store
                .commit(kind, vertices, Style::default(), extra)
                .expect("well-formed shape");
        }
        StoreOp::Update(index, delta) => {
            let Some(shape) = store.shapes().nth(index) else {
                return;
            };
            let id = shape.id();
            let moved: Vec<_> = shape
                .vertices()
                .iter()
                .map(|p| GeoPoint::new(p.lng + delta, p.lat))
                .collect();
            store.update(id, moved).expect("translated shape is valid");
        }
        StoreOp::Remove(index) => {
            let id = store.shapes().nth(index).map(|s| s.id());
            if let Some(id) = id {
                store.remove(id).expect("shape exists");
            }
        }
        StoreOp::Undo => {
            store.undo().expect("undo never fails on valid shapes");
        }
        StoreOp::Restyle(level) => {
            let style = Style {
                width_level: WidthLevel::new(level).expect("level in range"),
                ..Style::default()
            };
            store.restyle(style).expect("restyle");
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum ToolOp {
    Arm(ShapeKind),
    DeactivateTool,
    ActivateAnnotation,
    DeactivateAnnotation,
    Click,
}

fn tool_op() -> impl Strategy<Value = ToolOp> {
    prop_oneof![
        Just(ToolOp::Arm(ShapeKind::Distance)),
        Just(ToolOp::Arm(ShapeKind::Area)),
        Just(ToolOp::Arm(ShapeKind::Circle)),
        Just(ToolOp::Arm(ShapeKind::Arrow)),
        Just(ToolOp::DeactivateTool),
        Just(ToolOp::ActivateAnnotation),
        Just(ToolOp::DeactivateAnnotation),
        Just(ToolOp::Click),
    ]
}

proptest! {
    #[test]
    fn prop_restyle_is_idempotent(
        ops in prop::collection::vec(store_op(), 1..20),
        level in WidthLevel::MIN..=WidthLevel::MAX,
        r in any::<u8>(),
        g in any::<u8>(),
        b in any::<u8>(),
    ) {
        let mut store = ShapeStore::new();
        for op in &ops {
            apply_op(&mut store, op);
        }
        let style = Style {
            color: Color::rgb(r, g, b),
            width_level: WidthLevel::new(level).unwrap(),
            ..Style::default()
        };

        store.restyle(style).unwrap();
        let once: Vec<_> = store.shapes().cloned().collect();
        let labels = store.labels().to_vec();
        let heads = store.arrow_heads().to_vec();

        store.restyle(style).unwrap();
        let twice: Vec<_> = store.shapes().cloned().collect();
        prop_assert_eq!(once, twice);
        prop_assert_eq!(labels, store.labels().to_vec());
        prop_assert_eq!(heads, store.arrow_heads().to_vec());
        prop_assert!(store.shapes().all(|s| s.style() == style));
    }

    #[test]
    fn prop_derived_layers_cover_every_shape(ops in prop::collection::vec(store_op(), 0..30)) {
        let mut store = ShapeStore::new();
        for op in &ops {
            apply_op(&mut store, op);

            let ids: Vec<_> = store.shapes().map(|s| s.id()).collect();
            let labelled: Vec<_> = store.labels().iter().map(|l| l.shape_id).collect();
            prop_assert_eq!(&ids, &labelled);
            prop_assert!(ids.iter().all(|id| store.measurement(*id).is_some()));
            prop_assert_eq!(store.derived().measurements.len(), ids.len());

            let arrows: Vec<_> = store.shapes().filter(|s| s.is_arrow()).map(|s| s.id()).collect();
            let heads: Vec<_> = store.arrow_heads().iter().map(|h| h.shape_id).collect();
            prop_assert_eq!(arrows, heads);
        }
    }

    #[test]
    fn prop_undo_removes_only_latest(
        commits in prop::collection::vec(
            (
                -170.0..170.0f64,
                -60.0..60.0f64,
                prop::option::of((0..12usize, 0.1..2.0f64)),
            ),
            1..12,
        ),
    ) {
        let mut store = ShapeStore::new();
        let mut ids = Vec::new();
        for (lng, lat, edit) in &commits {
            let (vertices, extra) = shape_vertices(ShapeKind::Distance, *lng, *lat);
            ids.push(store.commit(ShapeKind::Distance, vertices, Style::default(), extra).unwrap());
            // Editing an older shape must not move it up the undo order.
            if let Some((index, delta)) = edit {
                apply_op(&mut store, &StoreOp::Update(*index, *delta));
            }
        }

        while let Some(expected) = ids.pop() {
            prop_assert_eq!(store.undo().unwrap(), Some(expected));
            let remaining: Vec<_> = store.shapes().map(|s| s.id()).collect();
            prop_assert_eq!(&remaining, &ids);
        }
        prop_assert_eq!(store.undo().unwrap(), None);
        prop_assert!(store.derived().is_empty());
    }

    #[test]
    fn prop_circle_ring_stays_on_radius(
        lng in -179.0..179.0f64,
        lat in -80.0..80.0f64,
        radius_km in 0.5..20_000.0f64,
        steps in 3..256usize,
    ) {
        let center = GeoPoint::new(lng, lat);
        let ring = circle_ring(center, radius_km, steps).unwrap();

        prop_assert_eq!(ring.len(), steps + 1);
        prop_assert_eq!(ring.first(), ring.last());
        for point in &ring {
            let error = (distance_km(center, *point) - radius_km).abs() / radius_km;
            prop_assert!(error < 1e-3, "relative error {}", error);
        }
    }

    #[test]
    fn prop_bearing_reverses_on_meridian(
        lng in -179.0..179.0f64,
        lat1 in -80.0..80.0f64,
        lat2 in -80.0..80.0f64,
    ) {
        prop_assume!((lat1 - lat2).abs() > 1e-3);
        let a = GeoPoint::new(lng, lat1);
        let b = GeoPoint::new(lng, lat2);
        let diff = normalize_degrees(initial_bearing(a, b) - initial_bearing(b, a));
        prop_assert!((diff - 180.0).abs() < 1e-6, "diff {}", diff);
    }

    #[test]
    fn prop_bearing_reverses_on_equator(
        lng in -80.0..80.0f64,
        delta in 0.01..90.0f64,
        westward in any::<bool>(),
    ) {
        let a = GeoPoint::new(lng, 0.0);
        let b = GeoPoint::new(if westward { lng - delta } else { lng + delta }, 0.0);
        let diff = normalize_degrees(initial_bearing(a, b) - initial_bearing(b, a));
        prop_assert!((diff - 180.0).abs() < 1e-6, "diff {}", diff);
    }

    #[test]
    fn prop_at_most_one_tool_holds_the_lock(ops in prop::collection::vec(tool_op(), 0..40)) {
        let (mut engine, lock) = engine();
        let viewport = viewport_at(GeoPoint::new(0.0, 0.0), 5.0);

        for op in ops {
            match op {
                ToolOp::Arm(kind) => {
                    let _ = engine.arm_tool(kind);
                }
                ToolOp::DeactivateTool => {
                    engine.deactivate_tool();
                }
                ToolOp::ActivateAnnotation => {
                    let _ = engine.activate_annotation_tool();
                }
                ToolOp::DeactivateAnnotation => {
                    engine.deactivate_annotation_tool();
                }
                ToolOp::Click => {
                    let _ = engine.on_map_click(ScreenPoint::new(400.0, 300.0), &viewport);
                }
            }

            let shape_tool = engine.state() != DrawingState::Idle;
            let annotation_tool = engine.is_annotation_tool_active();
            prop_assert!(!(shape_tool && annotation_tool));
            prop_assert_eq!(lock.is_active(), shape_tool || annotation_tool);

            if let Some(kind) = engine.state().kind() {
                prop_assert!(lock.is_held_by(&kind.to_string()));
            }
            if annotation_tool {
                prop_assert!(lock.is_held_by(ANNOTATION_TOOL));
            }
        }
    }
}
