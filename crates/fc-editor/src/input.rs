//! Input abstraction layer.
//!
//! Normalizes the host's pointer, wheel and keyboard events into plain
//! values consumed by the gesture engine and the shortcut dispatcher.
//! Positions are client pixels; times are host milliseconds.

use fc_core::{ConnectionId, ElementId};
use kurbo::Point;

/// Keyboard modifier state at the time of an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const SHIFT: Self = Self {
        shift: true,
        ..Self::NONE
    };

    /// Ctrl on most platforms, Cmd on macOS.
    pub fn accelerator(&self) -> bool {
        self.ctrl || self.meta
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PointerButton {
    #[default]
    Primary,
    Secondary,
    Auxiliary,
}

impl PointerButton {
    /// Map a DOM `MouseEvent.button` code.
    pub fn from_dom(code: i16) -> Self {
        match code {
            0 => Self::Primary,
            2 => Self::Secondary,
            _ => Self::Auxiliary,
        }
    }
}

/// What sits under the pointer, as resolved by the host's scene library.
///
/// Each field is the nearest enclosing primitive of that category, so a
/// press on a resize handle usually also reports the element it belongs to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointerHit {
    pub handle: Option<ElementId>,
    /// Structured data attached to a stream/log entry row.
    pub stream_entry: Option<String>,
    pub connection: Option<ConnectionId>,
    pub element: Option<ElementId>,
}

impl PointerHit {
    pub const CANVAS: Self = Self {
        handle: None,
        stream_entry: None,
        connection: None,
        element: None,
    };

    pub fn element(id: ElementId) -> Self {
        Self {
            element: Some(id),
            ..Self::CANVAS
        }
    }

    pub fn handle(id: ElementId) -> Self {
        Self {
            handle: Some(id),
            element: Some(id),
            ..Self::CANVAS
        }
    }

    pub fn connection(id: ConnectionId) -> Self {
        Self {
            connection: Some(id),
            ..Self::CANVAS
        }
    }

    pub fn stream_entry(payload: impl Into<String>) -> Self {
        Self {
            stream_entry: Some(payload.into()),
            ..Self::CANVAS
        }
    }
}

/// A normalized pointer event.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerEvent {
    pub position: Point,
    pub button: PointerButton,
    pub modifiers: Modifiers,
    pub time_ms: f64,
}

impl PointerEvent {
    pub fn new(x: f64, y: f64, time_ms: f64) -> Self {
        Self {
            position: Point::new(x, y),
            button: PointerButton::Primary,
            modifiers: Modifiers::NONE,
            time_ms,
        }
    }

    pub fn with_button(mut self, button: PointerButton) -> Self {
        self.button = button;
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// Where keyboard focus is when a key is pressed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FocusTarget {
    #[default]
    Canvas,
    /// An `<input>`, `<textarea>` or `<select>`; shortcuts stand down.
    TextControl,
}

impl FocusTarget {
    /// Classify a DOM `tagName`.
    pub fn from_tag_name(tag: &str) -> Self {
        if ["INPUT", "TEXTAREA", "SELECT"]
            .iter()
            .any(|t| t.eq_ignore_ascii_case(tag))
        {
            Self::TextControl
        } else {
            Self::Canvas
        }
    }
}

/// A key press as reported by `KeyboardEvent.key`.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyInput {
    pub key: String,
    pub modifiers: Modifiers,
    pub focus: FocusTarget,
}

impl KeyInput {
    pub fn new(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            key: key.into(),
            modifiers,
            focus: FocusTarget::Canvas,
        }
    }
}
