pub mod commands;
pub mod config;
pub mod engine;
pub mod geometry;
pub mod gesture;
pub mod input;
pub mod marquee;
pub mod reconcile;
pub mod shortcuts;
pub mod timeline;
pub mod tooltip;

pub use commands::{Command, EventBus, dispatch};
pub use config::{EditorConfig, PanModifier, TimelineConfig};
pub use engine::InteractionEngine;
pub use gesture::{GestureState, InteractionMode};
pub use input::{FocusTarget, KeyInput, Modifiers, PointerButton, PointerEvent, PointerHit};
pub use shortcuts::{ShortcutAction, ShortcutMap};
pub use timeline::{DensityGradient, Scrubber, ScrubberLayout, TimelineWindow};
