//! Integration tests: authoritative re-renders arriving mid-interaction.
//!
//! Every test here applies a fresh snapshot to the scene while the engine
//! holds local state (a gesture, a pending drop, an asserted viewport) and
//! checks that `on_server_render` restores exactly what the user expects.

use fc_core::kurbo::{Point, Rect, Size, Vec2};
use fc_core::{Bounds, ElementId, MemoryScene, SceneQuery, SceneSnapshot, Viewport};
use fc_editor::{Command, InteractionEngine, PointerButton, PointerEvent, PointerHit};
use pretty_assertions::assert_eq;

const CANVAS: Rect = Rect::new(0.0, 0.0, 1200.0, 800.0);
const FIXTURE: &str = include_str!("fixtures/scene.json");

fn setup() -> (MemoryScene, InteractionEngine) {
    let _ = env_logger::builder().is_test(true).try_init();
    let scene = MemoryScene::from_json(CANVAS, FIXTURE).unwrap();
    (scene, InteractionEngine::default())
}

fn at(x: f64, y: f64) -> PointerEvent {
    PointerEvent::new(x, y, 0.0)
}

fn id(s: &str) -> ElementId {
    ElementId::intern(s)
}

/// Re-render the fixture, as the authority would after an unrelated change.
fn rerender(scene: &mut MemoryScene, engine: &mut InteractionEngine) {
    scene.apply_snapshot(SceneSnapshot::from_json(FIXTURE).unwrap());
    engine.on_server_render(scene);
}

// ─── Drag ────────────────────────────────────────────────────────────────

#[test]
fn drag_survives_rerender() {
    let (mut scene, mut engine) = setup();
    let e1 = id("e1");
    let hit = PointerHit::element(e1);
    engine.pointer_down(&mut scene, &at(450.0, 230.0), &hit);
    engine.pointer_move(&mut scene, &at(500.0, 250.0), &hit);
    let before = scene.primitive(e1).unwrap();

    rerender(&mut scene, &mut engine);

    assert_eq!(scene.element(e1).unwrap().transform, Some(Vec2::new(50.0, 20.0)));
    assert_eq!(scene.element_ids().last(), Some(&e1));
    match engine.gesture() {
        fc_editor::GestureState::ElementDrag(drag) => {
            assert_ne!(drag.primitive, before);
            assert_eq!(Some(drag.primitive), scene.primitive(e1));
        }
        other => panic!("expected drag, got {}", other.name()),
    }

    // The drag keeps measuring from its original press point.
    engine.pointer_move(&mut scene, &at(460.0, 240.0), &hit);
    let out = engine.pointer_up(&mut scene, &at(460.0, 240.0));
    assert_eq!(
        out,
        vec![Command::ElementMove {
            id: e1,
            dx: 10.0,
            dy: 10.0
        }]
    );
}

#[test]
fn pending_drop_cleared_exactly_once() {
    let (mut scene, mut engine) = setup();
    let e1 = id("e1");
    let hit = PointerHit::element(e1);
    engine.pointer_down(&mut scene, &at(450.0, 230.0), &hit);
    engine.pointer_up(&mut scene, &at(480.0, 220.0));

    rerender(&mut scene, &mut engine);
    assert_eq!(scene.element(e1).unwrap().transform, None);

    // A new drag of the same element is not disturbed by later renders.
    engine.pointer_down(&mut scene, &at(450.0, 230.0), &hit);
    engine.pointer_move(&mut scene, &at(455.0, 235.0), &hit);
    rerender(&mut scene, &mut engine);
    assert_eq!(scene.element(e1).unwrap().transform, Some(Vec2::new(5.0, 5.0)));
}

#[test]
fn pending_drop_and_new_drag_in_same_render() {
    let (mut scene, mut engine) = setup();
    engine.pointer_down(&mut scene, &at(450.0, 230.0), &PointerHit::element(id("e1")));
    engine.pointer_up(&mut scene, &at(480.0, 220.0));

    // Second drag starts before the first drop was acknowledged.
    let hit = PointerHit::element(id("far"));
    engine.pointer_down(&mut scene, &at(310.0, 310.0), &hit);
    engine.pointer_move(&mut scene, &at(330.0, 310.0), &hit);

    rerender(&mut scene, &mut engine);
    assert_eq!(scene.element(id("e1")).unwrap().transform, None);
    assert_eq!(scene.element(id("far")).unwrap().transform, Some(Vec2::new(20.0, 0.0)));
}

#[test]
fn pending_element_deleted_by_authority() {
    let (mut scene, mut engine) = setup();
    engine.pointer_down(&mut scene, &at(450.0, 230.0), &PointerHit::element(id("e1")));
    engine.pointer_up(&mut scene, &at(480.0, 220.0));

    let mut snap = SceneSnapshot::from_json(FIXTURE).unwrap();
    snap.elements.retain(|el| el.id != id("e1"));
    scene.apply_snapshot(snap);
    engine.on_server_render(&mut scene);

    assert!(!engine.pending().is_armed());
    assert!(scene.element(id("e1")).is_none());
    assert!(!scene.has_connection(fc_core::ConnectionId::intern("c1")));
}

#[test]
fn connection_deleted_before_release_selects_nothing() {
    let (mut scene, mut engine) = setup();
    let c1 = fc_core::ConnectionId::intern("c1");
    engine.pointer_down(&mut scene, &at(600.0, 230.0), &PointerHit::connection(c1));

    let mut snap = SceneSnapshot::from_json(FIXTURE).unwrap();
    snap.connections.retain(|conn| conn.id != c1);
    scene.apply_snapshot(snap);
    engine.on_server_render(&mut scene);

    assert!(engine.pointer_up(&mut scene, &at(600.0, 230.0)).is_empty());
    assert!(engine.gesture().is_idle());
}

// ─── Resize ──────────────────────────────────────────────────────────────

#[test]
fn resize_in_progress_is_redrawn() {
    let (mut scene, mut engine) = setup();
    let e1 = id("e1");
    engine.pointer_down(&mut scene, &at(495.0, 255.0), &PointerHit::handle(e1));
    engine.pointer_move(&mut scene, &at(535.0, 275.0), &PointerHit::handle(e1));
    assert_eq!(scene.element(e1).unwrap().body.geometry().bounds().size(), Size::new(140.0, 80.0));

    rerender(&mut scene, &mut engine);

    let el = scene.element(e1).unwrap();
    assert_eq!(el.body.geometry().bounds(), Bounds::new(400.0, 200.0, 140.0, 80.0));
    assert_eq!(el.handle, Some(Point::new(530.0, 270.0)));
}

// ─── Viewport ────────────────────────────────────────────────────────────

#[test]
fn panned_viewport_reasserted_until_echoed() {
    let (mut scene, mut engine) = setup();
    let hit = PointerHit::CANVAS;
    let press = at(600.0, 400.0).with_button(PointerButton::Secondary);
    engine.pointer_down(&mut scene, &press, &hit);
    engine.pointer_move(&mut scene, &at(500.0, 350.0), &hit);
    let local = Viewport::new(100.0, 50.0, 1200.0, 800.0);
    assert_eq!(scene.viewport(), local);

    // Stale render mid-pan.
    rerender(&mut scene, &mut engine);
    assert_eq!(scene.viewport(), local);

    let out = engine.pointer_up(&mut scene, &at(500.0, 350.0));
    assert_eq!(out, vec![Command::ZoomCommit(local)]);

    // Still stale: keep asserting.
    rerender(&mut scene, &mut engine);
    assert_eq!(scene.viewport(), local);
    assert_eq!(engine.asserted_viewport(), Some(local));

    // The authority caught up.
    let mut snap = SceneSnapshot::from_json(FIXTURE).unwrap();
    snap.viewport = Some(local);
    scene.apply_snapshot(snap);
    engine.on_server_render(&mut scene);
    assert_eq!(engine.asserted_viewport(), None);

    // From now on the authority's viewport wins.
    rerender(&mut scene, &mut engine);
    assert_eq!(scene.viewport(), Viewport::new(0.0, 0.0, 1200.0, 800.0));
}

#[test]
fn wheel_zoom_survives_renders_without_viewport() {
    let (mut scene, mut engine) = setup();
    engine.wheel(&mut scene, Point::new(600.0, 400.0), -1.0, 0.0);
    let local = Viewport::new(60.0, 40.0, 1080.0, 720.0);
    assert_eq!(scene.viewport(), local);
    assert_eq!(engine.next_deadline(), Some(100.0));

    // A render that says nothing about the viewport confirms nothing.
    let mut silent = SceneSnapshot::from_json(FIXTURE).unwrap();
    silent.viewport = None;
    scene.apply_snapshot(silent);
    engine.on_server_render(&mut scene);
    assert_eq!(engine.asserted_viewport(), Some(local));

    rerender(&mut scene, &mut engine);
    assert_eq!(scene.viewport(), local);

    // Echoed before the debounced commit went out: still held.
    let mut early = SceneSnapshot::from_json(FIXTURE).unwrap();
    early.viewport = Some(local);
    scene.apply_snapshot(early.clone());
    engine.on_server_render(&mut scene);
    assert_eq!(engine.asserted_viewport(), Some(local));

    assert_eq!(engine.tick(&mut scene, 100.0), vec![Command::ZoomCommit(local)]);
    scene.apply_snapshot(early);
    engine.on_server_render(&mut scene);
    assert_eq!(engine.asserted_viewport(), None);
}

#[test]
fn set_viewport_is_adopted_and_echoed() {
    let (mut scene, mut engine) = setup();
    let out = engine.on_server_event(
        &mut scene,
        "setViewport",
        &serde_json::json!({"x": -200, "y": 100, "width": 2400, "height": 1600}),
    );
    let vp = Viewport::new(-200.0, 100.0, 2400.0, 1600.0);
    assert_eq!(out, vec![Command::ZoomCommit(vp)]);

    rerender(&mut scene, &mut engine);
    assert_eq!(scene.viewport(), vp);
}

// ─── Overlays ────────────────────────────────────────────────────────────

#[test]
fn marquee_overlay_redrawn_after_render() {
    let (mut scene, mut engine) = setup();
    engine.pointer_down(&mut scene, &at(0.0, 0.0), &PointerHit::CANVAS);
    engine.pointer_move(&mut scene, &at(200.0, 150.0), &PointerHit::CANVAS);

    rerender(&mut scene, &mut engine);
    assert_eq!(scene.overlays().marquee, Some(Bounds::new(0.0, 0.0, 200.0, 150.0)));
}

#[test]
fn patches_report_local_edits_only() {
    let (mut scene, mut engine) = setup();
    let e1 = id("e1");
    let hit = PointerHit::element(e1);
    engine.pointer_down(&mut scene, &at(450.0, 230.0), &hit);
    engine.pointer_move(&mut scene, &at(470.0, 230.0), &hit);

    let patches = scene.take_patches();
    assert_eq!(patches.elements.len(), 1);
    assert_eq!(patches.elements[0].id, e1);
    assert_eq!(patches.elements[0].geometry.transform, Some(Vec2::new(20.0, 0.0)));
    assert!(patches.paint_order.is_some());

    let wire = serde_json::to_value(&patches).unwrap();
    assert_eq!(wire["elements"][0]["transform"], serde_json::json!({"x": 20.0, "y": 0.0}));
}
