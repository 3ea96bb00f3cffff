//! The interaction engine.
//!
//! `InteractionEngine` owns every piece of client-side interaction state:
//! the single active gesture, the pending drop set, the locally asserted
//! viewport, click history and the zoom-commit debounce. The host feeds it
//! normalized events together with the displayed scene; it mutates the
//! scene optimistically and returns the commands to send to the authority.
//!
//! Timers live in the host. Time-sensitive entry points take `now_ms`, and
//! [`InteractionEngine::next_deadline`] / [`InteractionEngine::tick`] drive
//! the debounce.

use crate::commands::Command;
use crate::config::EditorConfig;
use crate::geometry::{anchor_point_of, apply_resize, resize_baseline};
use crate::gesture::{
    ClickHistory, DragGesture, DragSet, ElementClick, GestureState, InteractionMode,
    PointerTrack, PressTarget, ResizeGesture, classify_press,
};
use crate::input::{KeyInput, PointerEvent, PointerHit};
use crate::marquee::elements_in_rect;
use crate::reconcile::{PendingReconciliation, ViewportAssertion, reapply_drag, reapply_resize};
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use crate::tooltip;
use fc_core::{Bounds, ElementId, PayloadError, SceneQuery, Viewport};
use kurbo::{Line, Point, Vec2};
use serde::Deserialize;
use serde_json::Value;

/// Payload of the authority's `setViewport` instruction.
#[derive(Debug, Clone, Copy, Deserialize)]
struct SetViewport {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

pub struct InteractionEngine {
    config: EditorConfig,
    mode: InteractionMode,
    connect_source: Option<ElementId>,
    gesture: GestureState,
    track: Option<PointerTrack>,
    /// Last client position seen, for redrawing overlays after a re-render.
    cursor: Option<Point>,
    hover: Option<ElementId>,
    pending: PendingReconciliation,
    asserted: ViewportAssertion,
    clicks: ClickHistory,
    zoom_commit_due: Option<f64>,
}

impl Default for InteractionEngine {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl InteractionEngine {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            config,
            mode: InteractionMode::Select,
            connect_source: None,
            gesture: GestureState::Idle,
            track: None,
            cursor: None,
            hover: None,
            pending: PendingReconciliation::default(),
            asserted: ViewportAssertion::default(),
            clicks: ClickHistory::default(),
            zoom_commit_due: None,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn gesture(&self) -> &GestureState {
        &self.gesture
    }

    pub fn pending(&self) -> &PendingReconciliation {
        &self.pending
    }

    pub fn asserted_viewport(&self) -> Option<Viewport> {
        self.asserted.current()
    }

    // ─── Host configuration ──────────────────────────────────────────────

    pub fn set_mode(&mut self, scene: &mut dyn SceneQuery, mode: InteractionMode) {
        if self.mode == InteractionMode::Connect && mode != InteractionMode::Connect {
            self.connect_source = None;
            scene.set_preview_line(None);
        }
        self.mode = mode;
    }

    /// Record (or clear) the element a new connection starts from.
    pub fn set_connect_source(&mut self, scene: &mut dyn SceneQuery, source: Option<ElementId>) {
        self.connect_source = source;
        if source.is_none() {
            scene.set_preview_line(None);
        }
    }

    pub fn set_grid_size(&mut self, grid_size: f64) {
        if grid_size > 0.0 {
            self.config.grid_size = grid_size;
        } else {
            log::warn!("ignoring non-positive grid size {grid_size}");
        }
    }

    // ─── Pointer ─────────────────────────────────────────────────────────

    /// Start a gesture. Returns whether one started.
    pub fn pointer_down(
        &mut self,
        scene: &mut dyn SceneQuery,
        event: &PointerEvent,
        hit: &PointerHit,
    ) -> bool {
        self.cursor = Some(event.position);
        if !self.gesture.is_idle() {
            return false;
        }
        let Some(target) = classify_press(event, hit, self.mode, self.config.pan_modifier) else {
            return false;
        };
        self.clear_tooltip(scene);

        let gesture = match target {
            PressTarget::Handle(id) => match resize_baseline(scene, id) {
                Some(baseline) => GestureState::Resize(ResizeGesture {
                    id,
                    baseline,
                    size: baseline.original,
                }),
                None => return false,
            },
            PressTarget::StreamEntry(payload) => GestureState::StreamEntryClick(payload),
            PressTarget::Connection(id) => GestureState::ConnectionClick(id),
            PressTarget::Pan => GestureState::Pan,
            PressTarget::Element(id) => match self.begin_drag(scene, id, event) {
                Some(drag) => GestureState::ElementDrag(drag),
                None => return false,
            },
            PressTarget::Marquee => {
                let origin = self.to_scene(scene, event.position);
                if !is_finite(origin) {
                    return false;
                }
                GestureState::Marquee { origin }
            }
        };
        log::debug!("gesture: idle → {}", gesture.name());
        self.gesture = gesture;
        self.track = Some(PointerTrack::new(event.position));
        true
    }

    fn begin_drag(
        &self,
        scene: &mut dyn SceneQuery,
        id: ElementId,
        event: &PointerEvent,
    ) -> Option<DragGesture> {
        let primitive = scene.primitive(id)?;
        let origin = self.to_scene(scene, event.position);
        if !is_finite(origin) {
            return None;
        }
        let selected = scene.selected_ids();
        let ids: DragSet = if selected.len() > 1 && selected.contains(&id) {
            selected.into_iter().collect()
        } else {
            DragSet::from_slice(&[id])
        };
        for &moved in &ids {
            scene.raise_to_top(moved);
        }
        Some(DragGesture {
            primary: id,
            primitive,
            ids,
            origin,
            delta: Vec2::ZERO,
            shift: event.modifiers.shift,
        })
    }

    pub fn pointer_move(
        &mut self,
        scene: &mut dyn SceneQuery,
        event: &PointerEvent,
        hit: &PointerHit,
    ) {
        self.cursor = Some(event.position);
        let Some(track) = self.track.as_mut() else {
            let at = self.to_scene(scene, event.position);
            if is_finite(at) {
                self.update_preview(scene, at);
                self.update_tooltip(scene, hit.element, at);
            }
            return;
        };
        let client_delta = event.position - track.last;
        track.last = event.position;

        let canvas = scene.canvas_rect();
        let viewport = scene.viewport();
        match &mut self.gesture {
            GestureState::Pan => {
                let delta = viewport.to_scene_delta(canvas, client_delta.x, client_delta.y);
                if is_finite(delta.to_point()) {
                    let panned = viewport.panned(delta);
                    scene.set_viewport(panned);
                    self.asserted.assert(panned);
                }
            }
            GestureState::ElementDrag(drag) => {
                let at = viewport.to_scene(canvas, event.position);
                if !is_finite(at) {
                    return;
                }
                if self.mode == InteractionMode::Connect {
                    let line = self
                        .connect_source
                        .and_then(|source| anchor_point_of(scene, source))
                        .map(|from| Line::new(from, at));
                    scene.set_preview_line(line);
                    return;
                }
                if scene.primitive(drag.primary) != Some(drag.primitive) {
                    log::debug!("drag target re-rendered mid-gesture");
                    reapply_drag(scene, drag);
                }
                drag.delta = at - drag.origin;
                for &id in &drag.ids {
                    if let Some(el) = scene.element_mut(id) {
                        el.transform = Some(drag.delta);
                    }
                }
            }
            GestureState::Marquee { origin } => {
                let at = viewport.to_scene(canvas, event.position);
                if is_finite(at) {
                    scene.set_marquee(Some(Bounds::from_corners(*origin, at)));
                }
            }
            GestureState::Resize(resize) => {
                let delta = viewport.to_scene_delta(canvas, client_delta.x, client_delta.y);
                if is_finite(delta.to_point()) {
                    resize.size.width += delta.x;
                    resize.size.height += delta.y;
                    reapply_resize(scene, resize, self.config.min_element_size);
                }
            }
            GestureState::ConnectionClick(_)
            | GestureState::StreamEntryClick(_)
            | GestureState::Idle => {}
        }
    }

    /// End the active gesture at `event` and return what it commits.
    pub fn pointer_up(&mut self, scene: &mut dyn SceneQuery, event: &PointerEvent) -> Vec<Command> {
        self.cursor = Some(event.position);
        let gesture = std::mem::take(&mut self.gesture);
        let Some(track) = self.track.take() else {
            return Vec::new();
        };
        let is_click = track.is_click(event.position, self.config.click_threshold_px);
        log::debug!("gesture: {} → idle (click: {is_click})", gesture.name());

        let at = self.to_scene(scene, event.position);
        let mut out = Vec::new();
        match gesture {
            GestureState::Idle => {}
            GestureState::Pan => {
                if is_click {
                    if is_finite(at) {
                        out.push(Command::CanvasClick { x: at.x, y: at.y });
                    }
                    scene.set_preview_line(None);
                } else {
                    // The pan commit carries any wheel zoom still waiting.
                    self.zoom_commit_due = None;
                    self.asserted.commit();
                    out.push(Command::ZoomCommit(scene.viewport()));
                }
            }
            GestureState::Marquee { origin } => {
                scene.set_marquee(None);
                if !is_finite(at) {
                    return out;
                }
                if is_click {
                    out.push(Command::CanvasClick { x: at.x, y: at.y });
                } else {
                    let ids = elements_in_rect(scene, &Bounds::from_corners(origin, at));
                    out.push(if ids.is_empty() {
                        Command::DeselectAll {}
                    } else {
                        Command::MarqueeSelect { ids }
                    });
                }
            }
            GestureState::ElementDrag(mut drag) => {
                if is_click {
                    clear_transforms(scene, &drag.ids);
                    out.push(self.element_click(&drag, event.time_ms));
                } else if self.mode == InteractionMode::Connect {
                    clear_transforms(scene, &drag.ids);
                } else {
                    if is_finite(at) {
                        drag.delta = at - drag.origin;
                        for &id in &drag.ids {
                            if let Some(el) = scene.element_mut(id) {
                                el.transform = Some(drag.delta);
                            }
                        }
                    }
                    // Translation stays until the authority re-renders.
                    self.pending.arm(&drag.ids);
                    out.push(Command::ElementMove {
                        id: drag.primary,
                        dx: drag.delta.x,
                        dy: drag.delta.y,
                    });
                }
            }
            GestureState::Resize(resize) => {
                if is_click {
                    let original = resize.baseline.original;
                    apply_resize(scene, resize.id, original, &resize.baseline);
                } else {
                    let size = resize.clamped(self.config.min_element_size);
                    apply_resize(scene, resize.id, size, &resize.baseline);
                    out.push(Command::ElementResize {
                        id: resize.id,
                        width: size.width,
                        height: size.height,
                    });
                }
            }
            GestureState::ConnectionClick(id) => {
                if is_click && scene.has_connection(id) {
                    out.push(Command::ConnectionSelect { id });
                } else if is_click {
                    log::debug!("connection {id:?} re-rendered away before release");
                }
            }
            GestureState::StreamEntryClick(raw) => {
                if is_click {
                    match serde_json::from_str::<Value>(&raw) {
                        Ok(payload) => out.push(Command::StreamEntryClick { payload }),
                        Err(err) => log::warn!("dropping malformed stream entry payload: {err}"),
                    }
                }
            }
        }
        out
    }

    /// The pointer left the canvas: ends the gesture like a release there,
    /// and hides the tooltip.
    pub fn pointer_leave(&mut self, scene: &mut dyn SceneQuery, event: &PointerEvent) -> Vec<Command> {
        let out = self.pointer_up(scene, event);
        self.clear_tooltip(scene);
        self.cursor = None;
        out
    }

    fn element_click(&mut self, drag: &DragGesture, now_ms: f64) -> Command {
        let id = drag.primary;
        match self.clicks.register(id, now_ms, self.config.double_click_ms) {
            ElementClick::Double => Command::ElementDblClick { id },
            ElementClick::Single if drag.shift => Command::ElementShiftSelect { id },
            ElementClick::Single => Command::ElementSelect { id },
        }
    }

    // ─── Wheel & timers ──────────────────────────────────────────────────

    /// One wheel tick at client `position`. Positive `delta_y` zooms out.
    /// The commit is debounced; see [`Self::tick`].
    pub fn wheel(&mut self, scene: &mut dyn SceneQuery, position: Point, delta_y: f64, now_ms: f64) {
        if delta_y == 0.0 {
            return;
        }
        let factor = if delta_y > 0.0 {
            self.config.zoom_out_factor
        } else {
            self.config.zoom_in_factor
        };
        let anchor = self.to_scene(scene, position);
        if !is_finite(anchor) {
            return;
        }
        if let Some(zoomed) = self.zoom(scene, anchor, factor) {
            log::trace!("wheel zoom → {}×{}", zoomed.width, zoomed.height);
            self.zoom_commit_due = Some(now_ms + self.config.zoom_debounce_ms);
        }
    }

    /// When the host should next call [`Self::tick`].
    pub fn next_deadline(&self) -> Option<f64> {
        self.zoom_commit_due
    }

    /// Fire any timer due at `now_ms`.
    pub fn tick(&mut self, scene: &mut dyn SceneQuery, now_ms: f64) -> Vec<Command> {
        match self.zoom_commit_due {
            Some(due) if now_ms >= due => {
                self.zoom_commit_due = None;
                self.asserted.commit();
                vec![Command::ZoomCommit(scene.viewport())]
            }
            _ => Vec::new(),
        }
    }

    fn zoom(&mut self, scene: &mut dyn SceneQuery, anchor: Point, factor: f64) -> Option<Viewport> {
        let zoomed = scene.viewport().zoomed_about(
            anchor,
            factor,
            self.config.min_viewport_extent,
            self.config.max_viewport_extent,
        )?;
        scene.set_viewport(zoomed);
        self.asserted.assert(zoomed);
        Some(zoomed)
    }

    // ─── Keyboard ────────────────────────────────────────────────────────

    pub fn key_down(&mut self, scene: &mut dyn SceneQuery, input: &KeyInput) -> Vec<Command> {
        let Some(action) = ShortcutMap::dispatch(input) else {
            return Vec::new();
        };
        log::debug!("shortcut {:?} → {action:?}", input.key);
        let command = match action {
            ShortcutAction::DeleteSelected => Command::DeleteSelected {},
            ShortcutAction::Deselect => {
                scene.set_preview_line(None);
                Command::DeselectAll {}
            }
            ShortcutAction::SelectAll => Command::SelectAll {},
            ShortcutAction::Nudge { direction, fine } => {
                let step = if fine {
                    self.config.fine_nudge
                } else {
                    self.config.grid_size
                };
                let d = direction.unit() * step;
                Command::ElementNudge { dx: d.x, dy: d.y }
            }
            ShortcutAction::ZoomIn | ShortcutAction::ZoomOut => {
                let factor = if action == ShortcutAction::ZoomIn {
                    self.config.zoom_in_factor
                } else {
                    self.config.zoom_out_factor
                };
                let center = scene.viewport().center();
                let Some(zoomed) = self.zoom(scene, center, factor) else {
                    return Vec::new();
                };
                self.zoom_commit_due = None;
                self.asserted.commit();
                Command::ZoomCommit(zoomed)
            }
            ShortcutAction::Undo => Command::Undo {},
            ShortcutAction::Redo => Command::Redo {},
            ShortcutAction::Copy => Command::Copy {},
            ShortcutAction::Cut => Command::Cut {},
            ShortcutAction::Paste => Command::Paste {},
            ShortcutAction::Save => Command::Save {},
            ShortcutAction::PlayPause => Command::TimelinePlayPause {},
            ShortcutAction::GoLive => Command::TimelineGoLive {},
        };
        vec![command]
    }

    // ─── Authority ───────────────────────────────────────────────────────

    /// Call after every authoritative re-render has been applied to `scene`.
    pub fn on_server_render(&mut self, scene: &mut dyn SceneQuery) {
        if self.pending.is_armed() {
            self.pending.settle(scene);
        }
        let min_size = self.config.min_element_size;
        match &mut self.gesture {
            GestureState::ElementDrag(drag) if self.mode != InteractionMode::Connect => {
                reapply_drag(scene, drag);
            }
            GestureState::Resize(resize) => reapply_resize(scene, resize, min_size),
            _ => {}
        }
        self.asserted.reassert(scene);
        self.reassert_overlays(scene);
    }

    /// A named instruction pushed by the authority. Malformed payloads are
    /// logged and dropped.
    pub fn on_server_event(
        &mut self,
        scene: &mut dyn SceneQuery,
        name: &str,
        payload: &Value,
    ) -> Vec<Command> {
        match name {
            "setViewport" => match self.set_viewport(scene, payload) {
                Ok(viewport) => {
                    self.asserted.commit();
                    vec![Command::ZoomCommit(viewport)]
                }
                Err(err) => {
                    log::warn!("dropping setViewport: {err}");
                    Vec::new()
                }
            },
            other => {
                log::debug!("ignoring server event {other:?}");
                Vec::new()
            }
        }
    }

    /// Adopt a viewport pushed by the authority, clamped to the allowed
    /// extent range.
    pub fn set_viewport(
        &mut self,
        scene: &mut dyn SceneQuery,
        payload: &Value,
    ) -> Result<Viewport, PayloadError> {
        let SetViewport {
            x,
            y,
            width,
            height,
        } = SetViewport::deserialize(payload)?;
        if ![x, y, width, height].iter().all(|v| v.is_finite()) {
            return Err(PayloadError::invalid("setViewport", "non-finite component"));
        }
        let viewport = Viewport::new(x, y, width, height)
            .clamped(self.config.min_viewport_extent, self.config.max_viewport_extent);
        scene.set_viewport(viewport);
        self.asserted.assert(viewport);
        Ok(viewport)
    }

    // ─── Overlays ────────────────────────────────────────────────────────

    fn reassert_overlays(&mut self, scene: &mut dyn SceneQuery) {
        let Some(at) = self.cursor.map(|c| self.to_scene(scene, c)) else {
            return;
        };
        if !is_finite(at) {
            return;
        }
        match self.gesture {
            GestureState::Marquee { origin } => {
                scene.set_marquee(Some(Bounds::from_corners(origin, at)));
            }
            GestureState::Idle | GestureState::ElementDrag(_) => {
                self.update_preview(scene, at);
            }
            _ => {}
        }
        if self.gesture.is_idle() {
            self.update_tooltip(scene, self.hover, at);
        }
    }

    fn update_preview(&self, scene: &mut dyn SceneQuery, at: Point) {
        if self.mode != InteractionMode::Connect {
            return;
        }
        let Some(source) = self.connect_source else {
            return;
        };
        if let Some(from) = anchor_point_of(scene, source) {
            scene.set_preview_line(Some(Line::new(from, at)));
        }
    }

    fn update_tooltip(&mut self, scene: &mut dyn SceneQuery, element: Option<ElementId>, at: Point) {
        let view = element
            .and_then(|id| scene.element(id))
            .and_then(|el| el.series.as_ref())
            .and_then(|plot| tooltip::resolve(plot, at));
        self.hover = view.as_ref().and(element);
        scene.set_tooltip(view);
    }

    fn clear_tooltip(&mut self, scene: &mut dyn SceneQuery) {
        self.hover = None;
        scene.set_tooltip(None);
    }

    fn to_scene(&self, scene: &dyn SceneQuery, client: Point) -> Point {
        scene.viewport().to_scene(scene.canvas_rect(), client)
    }
}

fn clear_transforms(scene: &mut dyn SceneQuery, ids: &[ElementId]) {
    for &id in ids {
        if let Some(el) = scene.element_mut(id) {
            el.transform = None;
        }
    }
}

fn is_finite(p: Point) -> bool {
    p.x.is_finite() && p.y.is_finite()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{Modifiers, PointerButton};
    use fc_core::shape::RectBody;
    use fc_core::{Body, ElementGeometry, ElementSnapshot, MemoryScene, SceneSnapshot};
    use kurbo::Rect;
    use pretty_assertions::assert_eq;

    /// 1:1 pixel-to-scene canvas at the origin.
    fn scene() -> MemoryScene {
        let mut scene = MemoryScene::new(
            Rect::new(0.0, 0.0, 1200.0, 800.0),
            Viewport::new(0.0, 0.0, 1200.0, 800.0),
        );
        scene.apply_snapshot(SceneSnapshot {
            elements: vec![ElementSnapshot {
                id: ElementId::intern("u1"),
                geometry: ElementGeometry::new(Body::Rect(RectBody {
                    x: 100.0,
                    y: 100.0,
                    width: 100.0,
                    height: 60.0,
                })),
            }],
            ..Default::default()
        });
        scene
    }

    #[test]
    fn press_during_gesture_is_ignored() {
        let mut scene = scene();
        let mut engine = InteractionEngine::default();
        engine.pointer_down(&mut scene, &PointerEvent::new(10.0, 10.0, 0.0), &PointerHit::CANVAS);
        assert_eq!(engine.gesture().name(), "marquee");
        let second = PointerEvent::new(150.0, 120.0, 5.0);
        assert!(!engine.pointer_down(&mut scene, &second, &PointerHit::element(ElementId::intern("u1"))));
        assert_eq!(engine.gesture().name(), "marquee");
    }

    #[test]
    fn auxiliary_button_starts_nothing() {
        let mut scene = scene();
        let mut engine = InteractionEngine::default();
        let press = PointerEvent::new(10.0, 10.0, 0.0).with_button(PointerButton::Auxiliary);
        engine.pointer_down(&mut scene, &press, &PointerHit::CANVAS);
        assert!(engine.gesture().is_idle());
        assert!(engine.pointer_up(&mut scene, &press).is_empty());
    }

    #[test]
    fn stale_handle_press_is_a_no_op() {
        let mut scene = scene();
        let mut engine = InteractionEngine::default();
        let press = PointerEvent::new(0.0, 0.0, 0.0);
        assert!(!engine.pointer_down(&mut scene, &press, &PointerHit::handle(ElementId::intern("deleted"))));
        assert!(engine.gesture().is_idle());
    }

    #[test]
    fn handle_click_restores_size_silently() {
        let mut scene = scene();
        let mut engine = InteractionEngine::default();
        let u1 = ElementId::intern("u1");
        engine.pointer_down(&mut scene, &PointerEvent::new(195.0, 155.0, 0.0), &PointerHit::handle(u1));
        engine.pointer_move(&mut scene, &PointerEvent::new(196.0, 155.0, 1.0), &PointerHit::handle(u1));
        let out = engine.pointer_up(&mut scene, &PointerEvent::new(196.0, 155.0, 2.0));
        assert!(out.is_empty());
        assert_eq!(
            scene.element(u1).unwrap().body.geometry().bounds(),
            Bounds::new(100.0, 100.0, 100.0, 60.0)
        );
    }

    #[test]
    fn shift_click_selects_additively() {
        let mut scene = scene();
        let mut engine = InteractionEngine::default();
        let u1 = ElementId::intern("u1");
        let press = PointerEvent::new(150.0, 120.0, 0.0).with_modifiers(Modifiers::SHIFT);
        engine.pointer_down(&mut scene, &press, &PointerHit::element(u1));
        let out = engine.pointer_up(&mut scene, &press);
        assert_eq!(out, vec![Command::ElementShiftSelect { id: u1 }]);
    }

    #[test]
    fn malformed_stream_entry_is_dropped() {
        let mut scene = scene();
        let mut engine = InteractionEngine::default();
        let at = PointerEvent::new(5.0, 5.0, 0.0);
        engine.pointer_down(&mut scene, &at, &PointerHit::stream_entry("{not json"));
        assert!(engine.pointer_up(&mut scene, &at).is_empty());

        engine.pointer_down(&mut scene, &at, &PointerHit::stream_entry(r#"{"trace":"t-1"}"#));
        assert_eq!(
            engine.pointer_up(&mut scene, &at),
            vec![Command::StreamEntryClick {
                payload: serde_json::json!({"trace": "t-1"})
            }]
        );
    }

    #[test]
    fn set_viewport_is_clamped_and_echoed() {
        let mut scene = scene();
        let mut engine = InteractionEngine::default();
        let out = engine.on_server_event(
            &mut scene,
            "setViewport",
            &serde_json::json!({"x": 5, "y": 6, "width": 60000, "height": 40}),
        );
        let expected = Viewport::new(5.0, 6.0, 50_000.0, 100.0);
        assert_eq!(out, vec![Command::ZoomCommit(expected)]);
        assert_eq!(scene.viewport(), expected);
        assert_eq!(engine.asserted_viewport(), Some(expected));

        let dropped = engine.on_server_event(&mut scene, "setViewport", &serde_json::json!({"x": 1}));
        assert!(dropped.is_empty());
    }

    #[test]
    fn grid_size_changes_nudge_step() {
        let mut scene = scene();
        let mut engine = InteractionEngine::default();
        engine.set_grid_size(10.0);
        engine.set_grid_size(-3.0);
        let out = engine.key_down(&mut scene, &KeyInput::new("ArrowLeft", Modifiers::NONE));
        assert_eq!(out, vec![Command::ElementNudge { dx: -10.0, dy: 0.0 }]);
    }
}
