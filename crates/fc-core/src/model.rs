//! Scene data model as the interaction core sees it.
//!
//! An element is a group of displayed primitives: one body shape plus the
//! decorations that follow it around (label, resize handle, status dot,
//! icon, clip region). Geometry here is the *displayed* geometry: it is
//! authoritative-owned, but while a gesture is in flight the core either
//! layers a translation on top (`transform`) or rewrites the sub-primitives
//! directly (resize). Neither is ever reported back as absolute geometry.

use crate::id::{ConnectionId, ElementId};
use crate::shape::{CylinderBody, EllipseBody, RectBody, ShapeGeometry};
use kurbo::{Point, Size, Vec2};
use serde::{Deserialize, Serialize};

// ─── Bounds ──────────────────────────────────────────────────────────────

/// Axis-aligned box in scene units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Bounds {
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Normalized box spanning two arbitrary corners.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            w: (b.x - a.x).abs(),
            h: (b.y - a.y).abs(),
        }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.w, self.h)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.w && p.y >= self.y && p.y <= self.y + self.h
    }

    /// Open-interval overlap on both axes: boxes that only share an edge
    /// do not intersect.
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.x + self.w > other.x
            && self.x < other.x + other.w
            && self.y + self.h > other.y
            && self.y < other.y + other.h
    }

    pub fn translated(&self, d: Vec2) -> Self {
        Self {
            x: self.x + d.x,
            y: self.y + d.y,
            ..*self
        }
    }
}

// ─── Shapes ──────────────────────────────────────────────────────────────

/// The body primitive(s) of an element. Each variant carries its own
/// geometry strategy (see [`crate::shape`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Body {
    Rect(RectBody),
    Ellipse(EllipseBody),
    Cylinder(CylinderBody),
}

impl Body {
    /// The geometry strategy for this body.
    pub fn geometry(&self) -> &dyn ShapeGeometry {
        match self {
            Body::Rect(b) => b,
            Body::Ellipse(b) => b,
            Body::Cylinder(b) => b,
        }
    }

    pub fn geometry_mut(&mut self) -> &mut dyn ShapeGeometry {
        match self {
            Body::Rect(b) => b,
            Body::Ellipse(b) => b,
            Body::Cylinder(b) => b,
        }
    }
}

/// A decoration positioned by a translate transform instead of x/y
/// attributes. `rest` carries whatever followed the translate (e.g. a
/// `scale(...)`) and is preserved verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IconPlacement {
    pub translate: Vec2,
    #[serde(default)]
    pub rest: String,
}

/// One underlying data sample of a time-series element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    pub time_ms: i64,
    pub value: f64,
}

/// The chart plotted inside a time-series element.
///
/// `points` are the rendered sample positions in scene space, ordered by x;
/// `samples` are the data behind them, same order, one-to-one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesPlot {
    #[serde(default)]
    pub expanded: bool,
    pub region: Bounds,
    #[serde(default)]
    pub points: Vec<Point>,
    #[serde(default)]
    pub samples: Vec<Sample>,
}

/// Everything the core reads or writes on a displayed element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementGeometry {
    pub body: Body,
    /// Text anchor of the label (centered horizontally).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<Point>,
    /// Top-left corner of the resize handle square.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle: Option<Point>,
    /// Center of the status indicator dot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<IconPlacement>,
    /// Size of the clip region(s) of chart/log bodies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clip: Option<Size>,
    /// Size of the transparent hit area over composite bodies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hit_area: Option<Size>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series: Option<SeriesPlot>,
    /// Locally applied drag translation. Never authoritative.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<Vec2>,
}

impl ElementGeometry {
    pub fn new(body: Body) -> Self {
        Self {
            body,
            label: None,
            handle: None,
            status: None,
            icon: None,
            clip: None,
            hit_area: None,
            series: None,
            transform: None,
        }
    }
}

/// A connection between two elements. Opaque to geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub id: ConnectionId,
    pub source_element_id: ElementId,
    pub target_element_id: ElementId,
}
