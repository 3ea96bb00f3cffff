//! The displayed scene, abstracted.
//!
//! [`SceneQuery`] is the only way the interaction core touches what is on
//! screen: look up elements and connections by id, read and write their
//! geometric attributes, reorder paint, and draw the handful of overlays
//! the core owns (marquee, connection preview, tooltip).
//!
//! [`MemoryScene`] is a complete in-memory implementation. The browser
//! bridge keeps one as a mirror of the real display and ships its
//! [`ScenePatches`] back to the host; tests drive the engine against it
//! directly.
//!
//! An authoritative re-render ([`MemoryScene::apply_snapshot`]) replaces
//! every primitive (new generation), resets paint order to the authority's
//! order, drops overlays, and carries over only client-side attributes that
//! the authority never renders (the drag `transform`), the way a morphing
//! DOM patcher leaves unknown attributes alone.

use crate::error::PayloadError;
use crate::id::{ConnectionId, ElementId};
use crate::model::{Bounds, Connection, ElementGeometry};
use crate::viewport::Viewport;
use kurbo::{Line, Point, Rect};
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableDiGraph};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// A handle to one concrete primitive instance. Re-renders replace
/// primitives, so a handle from before a re-render is stale afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PrimitiveRef {
    pub id: ElementId,
    pub generation: u64,
}

/// Hover readout over an expanded time-series element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TooltipView {
    /// Vertical line through the hovered sample, spanning the plot.
    pub crosshair: Line,
    /// Rendered position of the hovered sample.
    pub marker: Point,
    pub value: String,
    pub time: String,
}

pub trait SceneQuery {
    /// All displayed element ids in paint order (last is topmost).
    fn element_ids(&self) -> Vec<ElementId>;

    fn element(&self, id: ElementId) -> Option<&ElementGeometry>;

    fn element_mut(&mut self, id: ElementId) -> Option<&mut ElementGeometry>;

    /// The current primitive instance for `id`.
    fn primitive(&self, id: ElementId) -> Option<PrimitiveRef>;

    /// Move an element to the end of paint order.
    fn raise_to_top(&mut self, id: ElementId);

    fn has_connection(&self, id: ConnectionId) -> bool;

    /// The authority's current selection, as last rendered.
    fn selected_ids(&self) -> Vec<ElementId>;

    /// The canvas's rendered rectangle in client pixels, measured now.
    fn canvas_rect(&self) -> Rect;

    /// The displayed viewport.
    fn viewport(&self) -> Viewport;

    fn set_viewport(&mut self, viewport: Viewport);

    /// The viewport carried by the most recent authoritative render, if
    /// that render carried one.
    fn rendered_viewport(&self) -> Option<Viewport>;

    fn set_marquee(&mut self, rect: Option<Bounds>);

    fn set_preview_line(&mut self, line: Option<Line>);

    fn set_tooltip(&mut self, tooltip: Option<TooltipView>);
}

// ─── Snapshots & patches ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementSnapshot {
    pub id: ElementId,
    #[serde(flatten)]
    pub geometry: ElementGeometry,
}

/// One full authoritative render of the scene.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneSnapshot {
    /// Elements in paint order.
    #[serde(default)]
    pub elements: Vec<ElementSnapshot>,
    #[serde(default)]
    pub connections: Vec<Connection>,
    #[serde(default)]
    pub selected: Vec<ElementId>,
    /// The authority's idea of the viewport, if it rendered one.
    #[serde(default)]
    pub viewport: Option<Viewport>,
}

impl SceneSnapshot {
    pub fn from_json(json: &str) -> Result<Self, PayloadError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Overlays {
    pub marquee: Option<Bounds>,
    pub preview_line: Option<Line>,
    pub tooltip: Option<TooltipView>,
}

/// Local changes since the last drain, for the host to apply to the real
/// display.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenePatches {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub elements: Vec<ElementSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paint_order: Option<Vec<ElementId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewport: Option<Viewport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlays: Option<Overlays>,
}

impl ScenePatches {
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
            && self.paint_order.is_none()
            && self.viewport.is_none()
            && self.overlays.is_none()
    }
}

// ─── MemoryScene ─────────────────────────────────────────────────────────

pub struct MemoryScene {
    elements: HashMap<ElementId, ElementGeometry>,
    order: Vec<ElementId>,
    /// Element → element connection graph.
    links: StableDiGraph<ElementId, ConnectionId>,
    nodes: HashMap<ElementId, NodeIndex>,
    edges: HashMap<ConnectionId, EdgeIndex>,
    selection: Vec<ElementId>,
    viewport: Viewport,
    rendered_viewport: Option<Viewport>,
    canvas: Rect,
    generation: u64,
    overlays: Overlays,

    dirty_elements: BTreeSet<ElementId>,
    order_dirty: bool,
    viewport_dirty: bool,
    overlays_dirty: bool,
}

impl MemoryScene {
    pub fn new(canvas: Rect, viewport: Viewport) -> Self {
        Self {
            elements: HashMap::new(),
            order: Vec::new(),
            links: StableDiGraph::new(),
            nodes: HashMap::new(),
            edges: HashMap::new(),
            selection: Vec::new(),
            viewport,
            rendered_viewport: None,
            canvas,
            generation: 0,
            overlays: Overlays::default(),
            dirty_elements: BTreeSet::new(),
            order_dirty: false,
            viewport_dirty: false,
            overlays_dirty: false,
        }
    }

    /// Build a scene from a JSON snapshot, as the first render.
    pub fn from_json(canvas: Rect, json: &str) -> Result<Self, PayloadError> {
        let snapshot = SceneSnapshot::from_json(json)?;
        let mut scene = Self::new(canvas, snapshot.viewport.unwrap_or_default());
        scene.apply_snapshot(snapshot);
        Ok(scene)
    }

    /// Replace the whole displayed scene with an authoritative render.
    pub fn apply_snapshot(&mut self, snapshot: SceneSnapshot) {
        self.generation += 1;

        let mut previous = std::mem::take(&mut self.elements);
        self.order.clear();
        for ElementSnapshot { id, mut geometry } in snapshot.elements {
            if let Some(old) = previous.remove(&id) {
                geometry.transform = old.transform;
            }
            if self.elements.insert(id, geometry).is_none() {
                self.order.push(id);
            }
        }

        self.links.clear();
        self.nodes.clear();
        self.edges.clear();
        for &id in &self.order {
            let idx = self.links.add_node(id);
            self.nodes.insert(id, idx);
        }
        for conn in snapshot.connections {
            match (
                self.nodes.get(&conn.source_element_id),
                self.nodes.get(&conn.target_element_id),
            ) {
                (Some(&a), Some(&b)) => {
                    let edge = self.links.add_edge(a, b, conn.id);
                    self.edges.insert(conn.id, edge);
                }
                _ => log::debug!("dropping dangling connection {:?}", conn.id),
            }
        }

        self.selection = snapshot
            .selected
            .into_iter()
            .filter(|id| self.elements.contains_key(id))
            .collect();
        if let Some(vp) = snapshot.viewport {
            self.viewport = vp;
        }
        self.rendered_viewport = snapshot.viewport;

        // The render itself is what the host now displays.
        self.overlays = Overlays::default();
        self.dirty_elements.clear();
        self.order_dirty = false;
        self.viewport_dirty = false;
        self.overlays_dirty = false;
    }

    pub fn set_canvas_rect(&mut self, canvas: Rect) {
        self.canvas = canvas;
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn overlays(&self) -> &Overlays {
        &self.overlays
    }

    /// Drain everything changed locally since the last call.
    pub fn take_patches(&mut self) -> ScenePatches {
        let elements = std::mem::take(&mut self.dirty_elements)
            .into_iter()
            .filter_map(|id| {
                self.elements.get(&id).map(|g| ElementSnapshot {
                    id,
                    geometry: g.clone(),
                })
            })
            .collect();
        let paint_order = std::mem::take(&mut self.order_dirty).then(|| self.order.clone());
        let viewport = std::mem::take(&mut self.viewport_dirty).then_some(self.viewport);
        let overlays = std::mem::take(&mut self.overlays_dirty).then(|| self.overlays.clone());
        ScenePatches {
            elements,
            paint_order,
            viewport,
            overlays,
        }
    }
}

impl SceneQuery for MemoryScene {
    fn element_ids(&self) -> Vec<ElementId> {
        self.order.clone()
    }

    fn element(&self, id: ElementId) -> Option<&ElementGeometry> {
        self.elements.get(&id)
    }

    fn element_mut(&mut self, id: ElementId) -> Option<&mut ElementGeometry> {
        let geometry = self.elements.get_mut(&id)?;
        self.dirty_elements.insert(id);
        Some(geometry)
    }

    fn primitive(&self, id: ElementId) -> Option<PrimitiveRef> {
        self.elements.contains_key(&id).then_some(PrimitiveRef {
            id,
            generation: self.generation,
        })
    }

    fn raise_to_top(&mut self, id: ElementId) {
        if let Some(pos) = self.order.iter().position(|e| *e == id)
            && pos + 1 != self.order.len()
        {
            let e = self.order.remove(pos);
            self.order.push(e);
            self.order_dirty = true;
        }
    }

    fn has_connection(&self, id: ConnectionId) -> bool {
        self.edges
            .get(&id)
            .is_some_and(|&edge| self.links.edge_weight(edge).is_some())
    }

    fn selected_ids(&self) -> Vec<ElementId> {
        self.selection.clone()
    }

    fn canvas_rect(&self) -> Rect {
        self.canvas
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        if self.viewport != viewport {
            self.viewport = viewport;
            self.viewport_dirty = true;
        }
    }

    fn rendered_viewport(&self) -> Option<Viewport> {
        self.rendered_viewport
    }

    fn set_marquee(&mut self, rect: Option<Bounds>) {
        if self.overlays.marquee != rect {
            self.overlays.marquee = rect;
            self.overlays_dirty = true;
        }
    }

    fn set_preview_line(&mut self, line: Option<Line>) {
        if self.overlays.preview_line != line {
            self.overlays.preview_line = line;
            self.overlays_dirty = true;
        }
    }

    fn set_tooltip(&mut self, tooltip: Option<TooltipView>) {
        if self.overlays.tooltip != tooltip {
            self.overlays.tooltip = tooltip;
            self.overlays_dirty = true;
        }
    }
}
