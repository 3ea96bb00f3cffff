//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s. Accelerator
//! means Ctrl or ⌘, so one table serves every platform.
//!
//! | Keys | Action |
//! |------|--------|
//! | Delete / Backspace | delete selection |
//! | Escape | deselect all, drop connection preview |
//! | Arrows (Shift: fine) | nudge selection |
//! | `+` `=` / `-` | zoom in / out about the viewport center |
//! | Accel+Z, Accel+Shift+Z, Accel+Y | undo, redo, redo |
//! | Accel+A/C/X/V/S | select all, copy, cut, paste, save |
//! | Space | play/pause timeline |
//! | L | jump timeline to live |

use crate::input::{FocusTarget, KeyInput, Modifiers};
use kurbo::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NudgeDirection {
    Up,
    Down,
    Left,
    Right,
}

impl NudgeDirection {
    /// Unit step in scene axes (y grows downward).
    pub fn unit(self) -> Vec2 {
        match self {
            NudgeDirection::Up => Vec2::new(0.0, -1.0),
            NudgeDirection::Down => Vec2::new(0.0, 1.0),
            NudgeDirection::Left => Vec2::new(-1.0, 0.0),
            NudgeDirection::Right => Vec2::new(1.0, 0.0),
        }
    }
}

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    // ── Edit ──
    DeleteSelected,
    Deselect,
    SelectAll,
    Nudge {
        direction: NudgeDirection,
        /// Move by the fine step instead of a grid unit.
        fine: bool,
    },
    Undo,
    Redo,
    Copy,
    Cut,
    Paste,
    Save,

    // ── View ──
    ZoomIn,
    ZoomOut,

    // ── Timeline ──
    PlayPause,
    GoLive,
}

/// Resolves key events into shortcut actions.
pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event, honoring the focus guard: nothing fires while
    /// a text control has focus.
    pub fn dispatch(input: &KeyInput) -> Option<ShortcutAction> {
        if input.focus == FocusTarget::TextControl {
            return None;
        }
        Self::resolve(&input.key, &input.modifiers)
    }

    /// Resolve a key to an action.
    ///
    /// `key` is the `KeyboardEvent.key` value (e.g. `"z"`, `"Delete"`).
    /// Returns `None` if the key combo has no binding.
    pub fn resolve(key: &str, mods: &Modifiers) -> Option<ShortcutAction> {
        let cmd = mods.accelerator();

        // ── Modifier combos first (most specific) ──
        if cmd && mods.shift {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Redo),
                _ => None,
            };
        }

        if cmd {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Undo),
                "y" | "Y" => Some(ShortcutAction::Redo),
                "a" | "A" => Some(ShortcutAction::SelectAll),
                "c" | "C" => Some(ShortcutAction::Copy),
                "x" | "X" => Some(ShortcutAction::Cut),
                "v" | "V" => Some(ShortcutAction::Paste),
                "s" | "S" => Some(ShortcutAction::Save),
                _ => None,
            };
        }

        let nudge = |direction| ShortcutAction::Nudge {
            direction,
            fine: mods.shift,
        };

        // ── Single keys (Shift only refines nudges) ──
        match key {
            "Delete" | "Backspace" => Some(ShortcutAction::DeleteSelected),
            "Escape" => Some(ShortcutAction::Deselect),
            "ArrowUp" => Some(nudge(NudgeDirection::Up)),
            "ArrowDown" => Some(nudge(NudgeDirection::Down)),
            "ArrowLeft" => Some(nudge(NudgeDirection::Left)),
            "ArrowRight" => Some(nudge(NudgeDirection::Right)),
            "+" | "=" => Some(ShortcutAction::ZoomIn),
            "-" => Some(ShortcutAction::ZoomOut),
            " " => Some(ShortcutAction::PlayPause),
            "l" | "L" => Some(ShortcutAction::GoLive),
            _ => None,
        }
    }
}
