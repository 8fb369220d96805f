use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tacmap::{
    geojson, init_logging, ClickOutcome, Color, Config, EventBus, EventFilter, GeoPoint,
    InteractionLock, MapViewport, MeasurementEngine, ScreenPoint, ShapeKind, WebMercatorViewport,
    WidthLevel, BUILD_DATE, VERSION,
};

fn main() -> anyhow::Result<()> {
    init_logging()?;
    tracing::info!("TacMap {} (built {})", VERSION, BUILD_DATE);

    let config = load_config();
    let lock = InteractionLock::new();
    let events = Arc::new(EventBus::new());
    events.subscribe(EventFilter::All, |event| {
        tracing::debug!("event: {}", event.description());
    });

    let mut engine = MeasurementEngine::with_event_bus(&config, lock, events);
    let mut viewport = WebMercatorViewport::new(1280.0, 800.0);
    viewport.center_on(GeoPoint::new(-66.0, 10.0));
    viewport.set_zoom(7.0);

    run_session(&mut engine, &mut viewport)?;

    println!(
        "{}",
        serde_json::to_string_pretty(&geojson::shapes_collection(engine.shapes()))?
    );
    println!(
        "{}",
        serde_json::to_string_pretty(&geojson::labels_collection(engine.labels()))?
    );

    engine.close();
    Ok(())
}

/// Configuration from the first argument, else the per-user file, else
/// defaults.
fn load_config() -> Config {
    let path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| Config::default_path().ok());
    match path {
        Some(path) => {
            tracing::info!("Loading configuration from {}", path.display());
            Config::load_or_default(&path)
        }
        None => Config::default(),
    }
}

/// Scripted headless session standing in for operator input.
fn run_session(
    engine: &mut MeasurementEngine,
    viewport: &mut WebMercatorViewport,
) -> anyhow::Result<()> {
    engine.arm_tool(ShapeKind::Distance)?;
    engine.on_authoring_started()?;
    engine.on_shape_completed(vec![GeoPoint::new(-66.5, 10.0), GeoPoint::new(-65.5, 10.4)])?;

    engine.arm_tool(ShapeKind::Area)?;
    engine.on_shape_completed(vec![
        GeoPoint::new(-66.8, 9.6),
        GeoPoint::new(-66.2, 9.6),
        GeoPoint::new(-66.2, 10.1),
        GeoPoint::new(-66.8, 10.1),
    ])?;

    engine.arm_tool(ShapeKind::Arrow)?;
    engine.on_shape_completed(vec![GeoPoint::new(-65.8, 9.5), GeoPoint::new(-65.6, 9.9)])?;

    engine.arm_tool(ShapeKind::Circle)?;
    engine.set_radius_km(25.0)?;
    let center = ScreenPoint::new(viewport.canvas_width() / 2.0, viewport.canvas_height() / 2.0);
    match engine.on_map_click(center, &*viewport)? {
        ClickOutcome::CircleCommitted(id) => tracing::info!("Range circle {}", id),
        other => tracing::warn!("Circle click ended as {:?}", other),
    }

    engine.set_color(Color::rgb(0x1e, 0x90, 0xff))?;
    engine.set_width_level(WidthLevel::new(5)?)?;

    engine.activate_annotation_tool()?;
    if let ClickOutcome::AnnotationPlaced(id) =
        engine.on_map_click(ScreenPoint::new(420.0, 260.0), &*viewport)?
    {
        engine.set_annotation_text(id, "Checkpoint ALPHA")?;
        engine.finish_annotation_edit();
    }
    engine.deactivate_annotation_tool();

    viewport.pan_by(-150.0, 40.0);
    engine.on_viewport_changed(&*viewport);
    for annotation in engine.annotations() {
        let screen = viewport
            .geo_to_screen(annotation.geo())
            .context("annotation left the map")?;
        tracing::info!("'{}' at {} ({})", annotation.text(), annotation.geo(), screen);
    }

    for label in engine.labels() {
        tracing::info!("{}: {}", label.shape_id, label.text.replace('\n', " / "));
    }

    if let Some(id) = engine.undo()? {
        tracing::info!("Undid {}", id);
    }
    Ok(())
}
