//! Optimistic mutator: keeping local edits alive across authoritative
//! re-renders.
//!
//! The protocol has three phases. A gesture applies its effect locally
//! (drag translation, resized sub-primitives, a panned viewport). On
//! release it sends a command and, for drags, arms a
//! [`PendingReconciliation`] naming the moved elements. The next re-render
//! is taken as the acknowledgement: the pending translations are cleared
//! exactly once. Anything still in flight at that moment is re-applied on
//! top of the fresh render.

use crate::gesture::{DragGesture, DragSet, ResizeGesture};
use crate::geometry::apply_resize;
use fc_core::{ElementId, SceneQuery, Viewport};

/// Elements whose drag translation is waiting for the authority to catch up.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PendingReconciliation {
    ids: Option<DragSet>,
}

impl PendingReconciliation {
    /// Add a committed drag. Drops committed back to back before any
    /// re-render accumulate into one set.
    pub fn arm(&mut self, ids: &DragSet) {
        let set = self.ids.get_or_insert_with(DragSet::new);
        for id in ids {
            if !set.contains(id) {
                set.push(*id);
            }
        }
    }

    pub fn is_armed(&self) -> bool {
        self.ids.is_some()
    }

    pub fn ids(&self) -> &[ElementId] {
        self.ids.as_deref().unwrap_or(&[])
    }

    /// Clear the local translation from every pending element and disarm.
    /// Ids that no longer resolve are skipped. Returns how many elements
    /// were cleared.
    pub fn settle(&mut self, scene: &mut dyn SceneQuery) -> usize {
        let Some(ids) = self.ids.take() else {
            return 0;
        };
        let mut cleared = 0;
        for id in ids {
            if let Some(el) = scene.element_mut(id) {
                el.transform = None;
                cleared += 1;
            }
        }
        log::debug!("settled {cleared} pending drop(s)");
        cleared
    }
}

/// Put an in-progress drag back on top of a re-render: raise the moved set,
/// re-apply the translation, and pick up the new primitive for the element
/// under the pointer.
pub fn reapply_drag(scene: &mut dyn SceneQuery, drag: &mut DragGesture) {
    for &id in &drag.ids {
        scene.raise_to_top(id);
        if let Some(el) = scene.element_mut(id) {
            el.transform = Some(drag.delta);
        }
    }
    if let Some(primitive) = scene.primitive(drag.primary) {
        drag.primitive = primitive;
    }
}

/// Re-lay out a resize in progress at its current clamped size.
pub fn reapply_resize(scene: &mut dyn SceneQuery, resize: &ResizeGesture, min_size: f64) {
    apply_resize(scene, resize.id, resize.clamped(min_size), &resize.baseline);
}

/// A viewport the client set locally that the authority has not echoed yet.
///
/// It is confirmed only by a render that carries a matching viewport, and
/// only once the commit for it has been sent. Until then every re-render
/// gets it put back.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ViewportAssertion {
    viewport: Option<Viewport>,
    committed: bool,
}

impl ViewportAssertion {
    pub fn assert(&mut self, viewport: Viewport) {
        self.viewport = Some(viewport);
        self.committed = false;
    }

    /// The commit carrying the asserted viewport went out.
    pub fn commit(&mut self) {
        self.committed = true;
    }

    pub fn current(&self) -> Option<Viewport> {
        self.viewport
    }

    /// After a re-render: put the asserted viewport back, or retire it once
    /// the render echoes it.
    pub fn reassert(&mut self, scene: &mut dyn SceneQuery) {
        let Some(asserted) = self.viewport else {
            return;
        };
        let echoed = scene
            .rendered_viewport()
            .is_some_and(|rendered| rendered.approx_eq(&asserted));
        if self.committed && echoed {
            log::debug!("viewport round-tripped");
            self.viewport = None;
            self.committed = false;
        } else if !scene.viewport().approx_eq(&asserted) {
            scene.set_viewport(asserted);
        }
    }
}
