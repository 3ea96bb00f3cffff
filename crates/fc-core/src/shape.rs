//! Per-shape geometry strategies.
//!
//! Every body kind answers the same four questions: its bounding box, its
//! anchor (visual center), its fixed origin during a resize, and how to
//! lay itself out at a new size from that origin. Call sites dispatch
//! through [`crate::model::Body::geometry`] and never inspect the kind.

use crate::model::Bounds;
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};

/// Vertical radius of a cylinder's top and bottom caps.
pub const CYLINDER_CAP: f64 = 15.0;

/// Size assumed when a body exposes no usable measurement.
pub const FALLBACK_SIZE: Size = Size::new(160.0, 80.0);

pub trait ShapeGeometry {
    /// Full visual bounding box in scene units.
    fn bounds(&self) -> Bounds;

    /// Endpoint used for connection lines.
    fn anchor(&self) -> Point {
        self.bounds().center()
    }

    /// Top-left corner; stays fixed while the shape is resized.
    fn origin(&self) -> Point {
        self.bounds().origin()
    }

    /// Raw size as read from the body attributes. May be degenerate.
    fn measured_size(&self) -> Size;

    /// Re-lay the body out at `size` from `origin`.
    fn resize(&mut self, origin: Point, size: Size);
}

/// Size a resize gesture starts from: the measured size with any unusable
/// component replaced by [`FALLBACK_SIZE`].
pub fn initial_size(geometry: &dyn ShapeGeometry) -> Size {
    let m = geometry.measured_size();
    let usable = |v: f64| v.is_finite() && v > 0.0;
    Size::new(
        if usable(m.width) { m.width } else { FALLBACK_SIZE.width },
        if usable(m.height) { m.height } else { FALLBACK_SIZE.height },
    )
}

// ─── Rect ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectBody {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ShapeGeometry for RectBody {
    fn bounds(&self) -> Bounds {
        Bounds::new(self.x, self.y, self.width, self.height)
    }

    fn measured_size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    fn resize(&mut self, origin: Point, size: Size) {
        self.x = origin.x;
        self.y = origin.y;
        self.width = size.width;
        self.height = size.height;
    }
}

// ─── Ellipse ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EllipseBody {
    pub cx: f64,
    pub cy: f64,
    pub rx: f64,
    pub ry: f64,
}

impl ShapeGeometry for EllipseBody {
    fn bounds(&self) -> Bounds {
        Bounds::new(self.cx - self.rx, self.cy - self.ry, self.rx * 2.0, self.ry * 2.0)
    }

    fn anchor(&self) -> Point {
        Point::new(self.cx, self.cy)
    }

    fn measured_size(&self) -> Size {
        Size::new(self.rx * 2.0, self.ry * 2.0)
    }

    fn resize(&mut self, origin: Point, size: Size) {
        self.rx = size.width / 2.0;
        self.ry = size.height / 2.0;
        self.cx = origin.x + self.rx;
        self.cy = origin.y + self.ry;
    }
}

// ─── Cylinder ────────────────────────────────────────────────────────────

/// A database-style cylinder: a body rectangle with an elliptical cap of
/// vertical radius [`CYLINDER_CAP`] centered on its top and bottom edges.
/// The stored rectangle is the body only; the caps overhang it by
/// `CYLINDER_CAP` on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CylinderBody {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CylinderBody {
    /// Center of the top cap ellipse.
    pub fn top_cap_center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y)
    }

    /// Center of the bottom cap ellipse (and its outline twin).
    pub fn bottom_cap_center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height)
    }

    /// Horizontal radius shared by both caps.
    pub fn cap_rx(&self) -> f64 {
        self.width / 2.0
    }
}

impl ShapeGeometry for CylinderBody {
    fn bounds(&self) -> Bounds {
        Bounds::new(
            self.x,
            self.y - CYLINDER_CAP,
            self.width,
            self.height + CYLINDER_CAP * 2.0,
        )
    }

    fn measured_size(&self) -> Size {
        Size::new(self.width, self.height + CYLINDER_CAP * 2.0)
    }

    fn resize(&mut self, origin: Point, size: Size) {
        self.x = origin.x;
        self.y = origin.y + CYLINDER_CAP;
        self.width = size.width;
        // Below twice the cap the caps overlap and the body vanishes.
        self.height = (size.height - CYLINDER_CAP * 2.0).max(0.0);
    }
}
