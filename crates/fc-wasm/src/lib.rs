//! WASM bridge for FC: exposes the interaction engine to the browser host.
//!
//! Compiled via `wasm-pack build --target web`. The host resolves hit
//! targets against the real display, forwards raw events here, and drains
//! two queues after every call: outbound commands for the server channel,
//! and scene patches to apply to the display.

use fc_core::{ConnectionId, ElementId, MemoryScene, SceneSnapshot, Viewport};
use fc_editor::gesture::InteractionMode;
use fc_editor::{
    Command, EditorConfig, FocusTarget, InteractionEngine, KeyInput, Modifiers, PointerButton,
    PointerEvent, PointerHit, Scrubber, TimelineConfig, TimelineWindow,
};
use kurbo::{Point, Rect};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

/// Hit-test result as the host reports it. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct HitPayload {
    element: Option<String>,
    handle: Option<String>,
    connection: Option<String>,
    stream_entry: Option<String>,
}

impl From<HitPayload> for PointerHit {
    fn from(hit: HitPayload) -> Self {
        PointerHit {
            handle: hit.handle.as_deref().map(ElementId::intern),
            stream_entry: hit.stream_entry,
            connection: hit.connection.as_deref().map(ConnectionId::intern),
            element: hit.element.as_deref().map(ElementId::intern),
        }
    }
}

fn parse_hit(json: &str) -> PointerHit {
    if json.is_empty() {
        return PointerHit::CANVAS;
    }
    match serde_json::from_str::<HitPayload>(json) {
        Ok(hit) => hit.into(),
        Err(e) => {
            log::warn!("unreadable hit payload, treating as canvas: {e}");
            PointerHit::CANVAS
        }
    }
}

fn modifiers(shift: bool, ctrl: bool, alt: bool, meta: bool) -> Modifiers {
    Modifiers {
        shift,
        ctrl,
        alt,
        meta,
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        log::warn!("serialization failed: {e}");
        "null".to_string()
    })
}

// ─── Canvas ──────────────────────────────────────────────────────────────

/// The main WASM-facing canvas controller.
///
/// Holds the mirrored scene, the interaction engine and the queue of
/// commands waiting to be sent to the server.
#[wasm_bindgen]
pub struct FcCanvas {
    scene: MemoryScene,
    engine: InteractionEngine,
    outbox: Vec<Command>,
}

#[wasm_bindgen]
impl FcCanvas {
    /// Create a controller for a canvas of the given client size.
    /// `config_json` may be empty for defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(width: f64, height: f64, config_json: &str) -> Self {
        console_error_panic_hook_setup();

        let config = if config_json.is_empty() {
            EditorConfig::default()
        } else {
            EditorConfig::from_json(config_json).unwrap_or_else(|e| {
                log::warn!("invalid editor config, using defaults: {e}");
                EditorConfig::default()
            })
        };
        let canvas = Rect::new(0.0, 0.0, width, height);
        Self {
            scene: MemoryScene::new(canvas, Viewport::default()),
            engine: InteractionEngine::new(config),
            outbox: Vec::new(),
        }
    }

    /// Apply an authoritative render. Returns `false` if the snapshot
    /// could not be read; the mirror is left untouched in that case.
    pub fn render(&mut self, snapshot_json: &str) -> bool {
        match SceneSnapshot::from_json(snapshot_json) {
            Ok(snapshot) => {
                self.scene.apply_snapshot(snapshot);
                self.engine.on_server_render(&mut self.scene);
                true
            }
            Err(e) => {
                log::warn!("dropping render: {e}");
                false
            }
        }
    }

    /// The canvas element's client rectangle changed.
    pub fn resize(&mut self, left: f64, top: f64, width: f64, height: f64) {
        self.scene
            .set_canvas_rect(Rect::new(left, top, left + width, top + height));
    }

    /// Returns true if the press started a gesture.
    #[allow(clippy::too_many_arguments)]
    pub fn handle_pointer_down(
        &mut self,
        x: f64,
        y: f64,
        button: i16,
        time_ms: f64,
        hit_json: &str,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> bool {
        let event = PointerEvent::new(x, y, time_ms)
            .with_button(PointerButton::from_dom(button))
            .with_modifiers(modifiers(shift, ctrl, alt, meta));
        self.engine
            .pointer_down(&mut self.scene, &event, &parse_hit(hit_json))
    }

    pub fn handle_pointer_move(&mut self, x: f64, y: f64, time_ms: f64, hit_json: &str) {
        let event = PointerEvent::new(x, y, time_ms);
        self.engine
            .pointer_move(&mut self.scene, &event, &parse_hit(hit_json));
    }

    /// Returns the number of commands queued by the release.
    pub fn handle_pointer_up(&mut self, x: f64, y: f64, time_ms: f64) -> usize {
        let event = PointerEvent::new(x, y, time_ms);
        let commands = self.engine.pointer_up(&mut self.scene, &event);
        self.enqueue(commands)
    }

    pub fn handle_pointer_leave(&mut self, x: f64, y: f64, time_ms: f64) -> usize {
        let event = PointerEvent::new(x, y, time_ms);
        let commands = self.engine.pointer_leave(&mut self.scene, &event);
        self.enqueue(commands)
    }

    pub fn handle_wheel(&mut self, x: f64, y: f64, delta_y: f64, time_ms: f64) {
        self.engine
            .wheel(&mut self.scene, Point::new(x, y), delta_y, time_ms);
    }

    /// Handle a key press. `focus_tag` is the tag name of the focused
    /// element (empty for none).
    #[allow(clippy::too_many_arguments)]
    pub fn handle_key(
        &mut self,
        key: &str,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
        focus_tag: &str,
    ) -> usize {
        let mut input = KeyInput::new(key, modifiers(shift, ctrl, alt, meta));
        if !focus_tag.is_empty() {
            input.focus = FocusTarget::from_tag_name(focus_tag);
        }
        let commands = self.engine.key_down(&mut self.scene, &input);
        self.enqueue(commands)
    }

    /// When the host should call [`FcCanvas::tick`] next, or `None`.
    pub fn next_deadline(&self) -> Option<f64> {
        self.engine.next_deadline()
    }

    pub fn tick(&mut self, now_ms: f64) -> usize {
        let commands = self.engine.tick(&mut self.scene, now_ms);
        self.enqueue(commands)
    }

    /// Deliver a named server push. Returns `false` for unreadable JSON.
    pub fn server_event(&mut self, name: &str, payload_json: &str) -> bool {
        let payload: serde_json::Value = match serde_json::from_str(payload_json) {
            Ok(v) => v,
            Err(e) => {
                log::warn!("dropping server event {name:?}: {e}");
                return false;
            }
        };
        let commands = self
            .engine
            .on_server_event(&mut self.scene, name, &payload);
        self.enqueue(commands);
        true
    }

    /// Switch interaction mode by name. Returns `false` for unknown names.
    pub fn set_mode(&mut self, name: &str) -> bool {
        match InteractionMode::from_name(name) {
            Some(mode) => {
                self.engine.set_mode(&mut self.scene, mode);
                true
            }
            None => false,
        }
    }

    /// Empty `id` clears the connection source.
    pub fn set_connect_source(&mut self, id: &str) {
        let source = (!id.is_empty()).then(|| ElementId::intern(id));
        self.engine.set_connect_source(&mut self.scene, source);
    }

    pub fn set_grid_size(&mut self, grid_size: f64) {
        self.engine.set_grid_size(grid_size);
    }

    pub fn get_mode(&self) -> String {
        self.engine.mode().as_str().to_string()
    }

    pub fn get_gesture_name(&self) -> String {
        self.engine.gesture().name().to_string()
    }

    /// Drain queued commands as a JSON array of `{"event","payload"}`.
    pub fn take_commands(&mut self) -> String {
        let commands = std::mem::take(&mut self.outbox);
        to_json(&commands)
    }

    /// Drain local scene edits as JSON. `{}` when nothing changed.
    pub fn take_patches(&mut self) -> String {
        to_json(&self.scene.take_patches())
    }
}

impl FcCanvas {
    fn enqueue(&mut self, commands: Vec<Command>) -> usize {
        let n = commands.len();
        self.outbox.extend(commands);
        n
    }
}

// ─── Timeline ────────────────────────────────────────────────────────────

/// The timeline scrubber widget.
#[wasm_bindgen]
pub struct FcTimeline {
    scrubber: Scrubber,
    outbox: Vec<Command>,
}

#[wasm_bindgen]
impl FcTimeline {
    /// `window_json` is the initial slider state; `config_json` may be empty.
    #[wasm_bindgen(constructor)]
    pub fn new(window_json: &str, config_json: &str) -> Self {
        console_error_panic_hook_setup();

        let config = if config_json.is_empty() {
            TimelineConfig::default()
        } else {
            TimelineConfig::from_json(config_json).unwrap_or_else(|e| {
                log::warn!("invalid timeline config, using defaults: {e}");
                TimelineConfig::default()
            })
        };
        let window = TimelineWindow::from_json(window_json).unwrap_or_else(|e| {
            log::warn!("invalid timeline window, starting empty: {e}");
            TimelineWindow::default()
        });
        Self {
            scrubber: Scrubber::new(config, window),
            outbox: Vec::new(),
        }
    }

    pub fn pointer_down(&mut self, client_x: f64, track_left: f64, track_width: f64, now_ms: f64) {
        let out = self
            .scrubber
            .pointer_down(client_x, track_left, track_width, now_ms);
        self.outbox.extend(out);
    }

    pub fn pointer_move(&mut self, client_x: f64, track_left: f64, track_width: f64, now_ms: f64) {
        let out = self
            .scrubber
            .pointer_move(client_x, track_left, track_width, now_ms);
        self.outbox.extend(out);
    }

    pub fn pointer_up(&mut self, client_x: f64, track_left: f64, track_width: f64) {
        let out = self.scrubber.pointer_up(client_x, track_left, track_width);
        self.outbox.extend(out);
    }

    /// Returns true if the key was consumed.
    pub fn key_down(&mut self, key: &str, shift: bool, ctrl: bool, alt: bool, meta: bool) -> bool {
        match self
            .scrubber
            .key_down(key, &modifiers(shift, ctrl, alt, meta))
        {
            Some(cmd) => {
                self.outbox.push(cmd);
                true
            }
            None => false,
        }
    }

    /// Server push `updateSlider`. Returns `false` for unreadable JSON.
    pub fn update_slider(&mut self, window_json: &str) -> bool {
        match TimelineWindow::from_json(window_json) {
            Ok(window) => {
                self.scrubber.update_slider(window);
                true
            }
            Err(e) => {
                log::warn!("dropping updateSlider: {e}");
                false
            }
        }
    }

    /// Server push `updateDensity`: a JSON array of bucket counts.
    pub fn update_density(&mut self, buckets_json: &str) -> bool {
        match serde_json::from_str::<Vec<f64>>(buckets_json) {
            Ok(buckets) => {
                self.scrubber.update_density(&buckets);
                true
            }
            Err(e) => {
                log::warn!("dropping updateDensity: {e}");
                false
            }
        }
    }

    /// Thumb and window positions as JSON, or `null` for an empty range.
    pub fn layout(&self) -> String {
        to_json(&self.scrubber.layout())
    }

    /// CSS `background` value for the track.
    pub fn density_background(&self) -> String {
        self.scrubber.density_background()
    }

    pub fn take_commands(&mut self) -> String {
        let commands = std::mem::take(&mut self.outbox);
        to_json(&commands)
    }
}

// ─── Panic hook for WASM debugging ───────────────────────────────────────

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("FC WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}
