//! Gesture state machine types.
//!
//! At most one gesture is active at a time; [`GestureState`] makes that a
//! type-level fact. [`classify_press`] decides what a pointer-down starts,
//! and [`ClickHistory`] carries the double-click window between gestures.
//! The transitions themselves live in [`crate::engine`].

use crate::config::PanModifier;
use crate::geometry::ResizeBaseline;
use crate::input::{Modifiers, PointerButton, PointerEvent, PointerHit};
use fc_core::{ConnectionId, ElementId, PrimitiveRef};
use kurbo::{Point, Size, Vec2};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// What a press on empty canvas does, and whether element drags move.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionMode {
    /// Empty canvas starts a marquee.
    #[default]
    Select,
    /// Empty canvas pans.
    Pan,
    /// Element drags are suppressed; the pointer drives a connection preview.
    Connect,
}

impl InteractionMode {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "select" => Some(Self::Select),
            "pan" => Some(Self::Pan),
            "connect" => Some(Self::Connect),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Select => "select",
            Self::Pan => "pan",
            Self::Connect => "connect",
        }
    }
}

/// Elements moved by one drag. Multi-selections are usually small.
pub type DragSet = SmallVec<[ElementId; 4]>;

#[derive(Debug, Clone, PartialEq)]
pub struct DragGesture {
    /// The element under the pointer at press.
    pub primary: ElementId,
    /// Current primitive of `primary`; refreshed after every re-render.
    pub primitive: PrimitiveRef,
    pub ids: DragSet,
    /// Scene point under the pointer at press.
    pub origin: Point,
    /// Displacement from `origin`, recomputed absolutely on every move.
    pub delta: Vec2,
    pub shift: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResizeGesture {
    pub id: ElementId,
    pub baseline: ResizeBaseline,
    /// Unclamped running size; clamped only when rendered or committed.
    pub size: Size,
}

impl ResizeGesture {
    pub fn clamped(&self, min: f64) -> Size {
        Size::new(self.size.width.max(min), self.size.height.max(min))
    }
}

/// The single active gesture.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum GestureState {
    #[default]
    Idle,
    Pan,
    ElementDrag(DragGesture),
    Resize(ResizeGesture),
    Marquee {
        /// Scene point at press.
        origin: Point,
    },
    ConnectionClick(ConnectionId),
    StreamEntryClick(String),
}

impl GestureState {
    pub fn is_idle(&self) -> bool {
        matches!(self, GestureState::Idle)
    }

    pub fn name(&self) -> &'static str {
        match self {
            GestureState::Idle => "idle",
            GestureState::Pan => "pan",
            GestureState::ElementDrag(_) => "drag",
            GestureState::Resize(_) => "resize",
            GestureState::Marquee { .. } => "marquee",
            GestureState::ConnectionClick(_) => "connection",
            GestureState::StreamEntryClick(_) => "stream-entry",
        }
    }
}

/// Client-pixel press/release positions of the active gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerTrack {
    pub start: Point,
    pub last: Point,
}

impl PointerTrack {
    pub fn new(at: Point) -> Self {
        Self {
            start: at,
            last: at,
        }
    }

    /// Whether releasing at `end` counts as a click. The boundary is
    /// strict: exactly `threshold` pixels is a drag.
    pub fn is_click(&self, end: Point, threshold: f64) -> bool {
        (end - self.start).hypot() < threshold
    }
}

/// The target a pointer-down resolves to, before scene state is consulted.
#[derive(Debug, Clone, PartialEq)]
pub enum PressTarget {
    Handle(ElementId),
    StreamEntry(String),
    Connection(ConnectionId),
    Pan,
    Element(ElementId),
    Marquee,
}

/// Classify a press. First match wins: handle, stream entry, connection,
/// pan modifier, element, then the mode's empty-canvas gesture.
///
/// The secondary button always pans; other non-primary buttons start
/// nothing.
pub fn classify_press(
    event: &PointerEvent,
    hit: &PointerHit,
    mode: InteractionMode,
    pan_modifier: PanModifier,
) -> Option<PressTarget> {
    match event.button {
        PointerButton::Primary => {}
        PointerButton::Secondary => return Some(PressTarget::Pan),
        PointerButton::Auxiliary => return None,
    }
    if let Some(id) = hit.handle {
        return Some(PressTarget::Handle(id));
    }
    if let Some(payload) = &hit.stream_entry {
        return Some(PressTarget::StreamEntry(payload.clone()));
    }
    if let Some(id) = hit.connection {
        return Some(PressTarget::Connection(id));
    }
    if pan_modifier_held(pan_modifier, &event.modifiers) {
        return Some(PressTarget::Pan);
    }
    if let Some(id) = hit.element {
        return Some(PressTarget::Element(id));
    }
    Some(match mode {
        InteractionMode::Select => PressTarget::Marquee,
        InteractionMode::Pan | InteractionMode::Connect => PressTarget::Pan,
    })
}

fn pan_modifier_held(modifier: PanModifier, mods: &Modifiers) -> bool {
    match modifier {
        PanModifier::Alt => mods.alt,
        PanModifier::Ctrl => mods.ctrl,
        PanModifier::Meta => mods.meta,
        PanModifier::Shift => mods.shift,
        PanModifier::None => false,
    }
}

/// What an element click resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementClick {
    Single,
    Double,
}

/// Last element click, for double-click detection.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ClickHistory {
    last: Option<(ElementId, f64)>,
}

impl ClickHistory {
    /// Record a click on `id` at `now_ms`. A second click on the same id
    /// strictly within `window_ms` is a double-click and resets history.
    pub fn register(&mut self, id: ElementId, now_ms: f64, window_ms: f64) -> ElementClick {
        match self.last {
            Some((last_id, at)) if last_id == id && now_ms - at < window_ms => {
                self.last = None;
                ElementClick::Double
            }
            _ => {
                self.last = Some((id, now_ms));
                ElementClick::Single
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press() -> PointerEvent {
        PointerEvent::new(10.0, 10.0, 0.0)
    }

    #[test]
    fn handle_wins_over_element() {
        let e = ElementId::intern("h");
        let target = classify_press(&press(), &PointerHit::handle(e), InteractionMode::Select, PanModifier::Alt);
        assert_eq!(target, Some(PressTarget::Handle(e)));
    }

    #[test]
    fn pan_modifier_beats_element_but_not_connection() {
        let alt = Modifiers {
            alt: true,
            ..Modifiers::NONE
        };
        let event = press().with_modifiers(alt);
        let el = ElementId::intern("m");
        assert_eq!(
            classify_press(&event, &PointerHit::element(el), InteractionMode::Select, PanModifier::Alt),
            Some(PressTarget::Pan)
        );
        let conn = ConnectionId::intern("m-c");
        assert_eq!(
            classify_press(&event, &PointerHit::connection(conn), InteractionMode::Select, PanModifier::Alt),
            Some(PressTarget::Connection(conn))
        );
        // Disabled modifier falls through to the element.
        assert_eq!(
            classify_press(&event, &PointerHit::element(el), InteractionMode::Select, PanModifier::None),
            Some(PressTarget::Element(el))
        );
    }

    #[test]
    fn empty_canvas_depends_on_mode() {
        let hit = PointerHit::CANVAS;
        assert_eq!(
            classify_press(&press(), &hit, InteractionMode::Select, PanModifier::Alt),
            Some(PressTarget::Marquee)
        );
        assert_eq!(
            classify_press(&press(), &hit, InteractionMode::Connect, PanModifier::Alt),
            Some(PressTarget::Pan)
        );
    }

    #[test]
    fn buttons() {
        let el = PointerHit::element(ElementId::intern("b"));
        let secondary = press().with_button(PointerButton::Secondary);
        assert_eq!(
            classify_press(&secondary, &el, InteractionMode::Select, PanModifier::Alt),
            Some(PressTarget::Pan)
        );
        let middle = press().with_button(PointerButton::Auxiliary);
        assert_eq!(classify_press(&middle, &el, InteractionMode::Select, PanModifier::Alt), None);
    }

    #[test]
    fn click_threshold_is_strict() {
        let track = PointerTrack::new(Point::new(0.0, 0.0));
        assert!(track.is_click(Point::new(1.999, 0.0), 2.0));
        assert!(!track.is_click(Point::new(2.0, 0.0), 2.0));
        assert!(!track.is_click(Point::new(1.5, 1.5), 2.0));
    }

    #[test]
    fn double_click_window_is_strict() {
        let id = ElementId::intern("dbl");
        let mut history = ClickHistory::default();
        assert_eq!(history.register(id, 1000.0, 400.0), ElementClick::Single);
        assert_eq!(history.register(id, 1399.0, 400.0), ElementClick::Double);
        // History was reset by the double-click.
        assert_eq!(history.register(id, 1500.0, 400.0), ElementClick::Single);
        assert_eq!(history.register(id, 1900.0, 400.0), ElementClick::Single);
    }

    #[test]
    fn different_element_restarts_window() {
        let mut history = ClickHistory::default();
        history.register(ElementId::intern("x1"), 0.0, 400.0);
        assert_eq!(
            history.register(ElementId::intern("x2"), 100.0, 400.0),
            ElementClick::Single
        );
    }
}
