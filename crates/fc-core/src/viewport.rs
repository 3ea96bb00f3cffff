//! Camera rectangle and screen ↔ scene conversion.
//!
//! The viewport is the slice of scene space currently visible on the
//! canvas. Conversions take the canvas's *rendered* on-screen rectangle on
//! every call: a window resize changes the pixel ↔ scene ratio without
//! touching the viewport itself.

use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Smallest allowed viewport width/height in scene units.
pub const MIN_VIEWPORT_EXTENT: f64 = 100.0;
/// Largest allowed viewport width/height in scene units.
pub const MAX_VIEWPORT_EXTENT: f64 = 50_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    pub min_x: f64,
    pub min_y: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            min_x: 0.0,
            min_y: 0.0,
            width: 1200.0,
            height: 800.0,
        }
    }
}

impl Viewport {
    pub const fn new(min_x: f64, min_y: f64, width: f64, height: f64) -> Self {
        Self {
            min_x,
            min_y,
            width,
            height,
        }
    }

    /// Scene point at the middle of the viewport.
    pub fn center(&self) -> Point {
        Point::new(self.min_x + self.width / 2.0, self.min_y + self.height / 2.0)
    }

    /// Convert a client-pixel point to scene space.
    ///
    /// Returns `(NaN, NaN)` when the canvas has no rendered area; callers
    /// treat that as "skip this frame".
    pub fn to_scene(&self, canvas: Rect, screen: Point) -> Point {
        if !has_area(canvas) {
            return Point::new(f64::NAN, f64::NAN);
        }
        Point::new(
            self.min_x + (screen.x - canvas.x0) * (self.width / canvas.width()),
            self.min_y + (screen.y - canvas.y0) * (self.height / canvas.height()),
        )
    }

    /// Convert a client-pixel delta to a scene-space delta.
    pub fn to_scene_delta(&self, canvas: Rect, dx: f64, dy: f64) -> Vec2 {
        if !has_area(canvas) {
            return Vec2::new(f64::NAN, f64::NAN);
        }
        Vec2::new(
            dx * (self.width / canvas.width()),
            dy * (self.height / canvas.height()),
        )
    }

    /// Move the camera opposite to a scene-space pointer motion. Scale is
    /// untouched.
    pub fn panned(&self, pointer_delta: Vec2) -> Self {
        Self {
            min_x: self.min_x - pointer_delta.x,
            min_y: self.min_y - pointer_delta.y,
            ..*self
        }
    }

    /// Scale about `anchor` so that the scene point under it stays put.
    ///
    /// Returns `None` (leave the viewport alone) when the new width falls
    /// outside `[min_extent, max_extent]`.
    pub fn zoomed_about(
        &self,
        anchor: Point,
        factor: f64,
        min_extent: f64,
        max_extent: f64,
    ) -> Option<Self> {
        let width = self.width * factor;
        let height = self.height * factor;
        if !(min_extent..=max_extent).contains(&width) {
            return None;
        }
        Some(Self {
            min_x: anchor.x - (anchor.x - self.min_x) * factor,
            min_y: anchor.y - (anchor.y - self.min_y) * factor,
            width,
            height,
        })
    }

    /// Clamp width/height into `[min_extent, max_extent]`, keeping the origin.
    pub fn clamped(&self, min_extent: f64, max_extent: f64) -> Self {
        Self {
            width: self.width.clamp(min_extent, max_extent),
            height: self.height.clamp(min_extent, max_extent),
            ..*self
        }
    }

    /// Equality within a small tolerance, for detecting a viewport that has
    /// made the round trip through the authority.
    pub fn approx_eq(&self, other: &Viewport) -> bool {
        const EPS: f64 = 1e-6;
        let close = |a: f64, b: f64| (a - b).abs() <= EPS * a.abs().max(b.abs()).max(1.0);
        close(self.min_x, other.min_x)
            && close(self.min_y, other.min_y)
            && close(self.width, other.width)
            && close(self.height, other.height)
    }
}

fn has_area(canvas: Rect) -> bool {
    canvas.width() > 0.0 && canvas.height() > 0.0
}
