//! Marquee hit testing over every displayed element.

use crate::geometry::bounds_of;
use fc_core::{Bounds, ElementId, SceneQuery};

/// Ids of displayed elements whose bounds overlap `rect`, in paint order.
///
/// Overlap is open-interval: shared edges do not count. Elements without
/// resolvable bounds are skipped.
pub fn elements_in_rect(scene: &dyn SceneQuery, rect: &Bounds) -> Vec<ElementId> {
    scene
        .element_ids()
        .into_iter()
        .filter(|&id| bounds_of(scene, id).is_some_and(|b| rect.intersects(&b)))
        .collect()
}
