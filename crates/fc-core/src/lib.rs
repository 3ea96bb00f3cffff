pub mod error;
pub mod id;
pub mod model;
pub mod scene;
pub mod shape;
pub mod viewport;

pub use error::PayloadError;
pub use id::{ConnectionId, ElementId};
pub use model::*;
pub use scene::{
    ElementSnapshot, MemoryScene, Overlays, PrimitiveRef, SceneQuery, ScenePatches,
    SceneSnapshot, TooltipView,
};
pub use shape::{CYLINDER_CAP, FALLBACK_SIZE, ShapeGeometry, initial_size};
pub use viewport::{MAX_VIEWPORT_EXTENT, MIN_VIEWPORT_EXTENT, Viewport};

// Re-export kurbo geometry so downstream crates speak the same types.
pub use kurbo;
