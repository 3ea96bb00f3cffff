//! Shape geometry resolver: per-element measurements over [`SceneQuery`].
//!
//! Stale ids are normal here (the element may have been deleted by a
//! concurrent render), so lookups return `None` and writers return `false`
//! instead of failing.

use fc_core::{Bounds, ElementId, SceneQuery, initial_size};
use kurbo::{Point, Size, Vec2};

/// Distance of the label baseline above the bottom edge.
pub const LABEL_BOTTOM_OFFSET: f64 = 16.0;
/// Inset of the resize handle from the bottom-right corner.
pub const HANDLE_INSET: f64 = 10.0;
/// Inset of the status dot from the right edge.
pub const STATUS_INSET: f64 = 8.0;

/// Displayed bounding box, including any local drag translation.
pub fn bounds_of(scene: &dyn SceneQuery, id: ElementId) -> Option<Bounds> {
    let el = scene.element(id)?;
    let b = el.body.geometry().bounds();
    Some(match el.transform {
        Some(t) => b.translated(t),
        None => b,
    })
}

/// Point connection lines attach to: the shape's visual center.
pub fn anchor_point_of(scene: &dyn SceneQuery, id: ElementId) -> Option<Point> {
    let el = scene.element(id)?;
    let anchor = el.body.geometry().anchor();
    Some(anchor + el.transform.unwrap_or(Vec2::ZERO))
}

/// State captured when a resize starts, needed to lay out decorations
/// relative to where they began.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeBaseline {
    pub original: Size,
    /// Icon translation before the gesture touched it.
    pub icon_origin: Option<Vec2>,
}

pub fn resize_baseline(scene: &dyn SceneQuery, id: ElementId) -> Option<ResizeBaseline> {
    let el = scene.element(id)?;
    Some(ResizeBaseline {
        original: initial_size(el.body.geometry()),
        icon_origin: el.icon.as_ref().map(|i| i.translate),
    })
}

/// Re-lay out every sub-primitive of `id` at `size`, keeping its top-left
/// origin fixed. Callers clamp `size` to the minimum element size first.
pub fn apply_resize(
    scene: &mut dyn SceneQuery,
    id: ElementId,
    size: Size,
    baseline: &ResizeBaseline,
) -> bool {
    let Some(el) = scene.element_mut(id) else {
        return false;
    };
    let origin = el.body.geometry().origin();
    el.body.geometry_mut().resize(origin, size);

    if el.clip.is_some() {
        el.clip = Some(size);
    }
    if el.hit_area.is_some() {
        el.hit_area = Some(size);
    }
    if let Some(label) = el.label.as_mut() {
        *label = Point::new(
            origin.x + size.width / 2.0,
            origin.y + size.height - LABEL_BOTTOM_OFFSET,
        );
    }
    if let Some(handle) = el.handle.as_mut() {
        *handle = Point::new(
            origin.x + size.width - HANDLE_INSET,
            origin.y + size.height - HANDLE_INSET,
        );
    }
    if let Some(status) = el.status.as_mut() {
        status.x = origin.x + size.width - STATUS_INSET;
    }
    // The icon is positioned by transform around the shape's center, so it
    // moves by half the size change to stay centered.
    if let (Some(icon), Some(start)) = (el.icon.as_mut(), baseline.icon_origin) {
        icon.translate = start
            + Vec2::new(
                (size.width - baseline.original.width) / 2.0,
                (size.height - baseline.original.height) / 2.0,
            );
    }
    log::trace!("resize {id:?} → {}×{}", size.width, size.height);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use fc_core::shape::{CylinderBody, EllipseBody, RectBody};
    use fc_core::{Body, ElementGeometry, ElementSnapshot, IconPlacement, MemoryScene, SceneSnapshot, Viewport};
    use kurbo::Rect;
    use pretty_assertions::assert_eq;

    fn scene_with(id: &str, geometry: ElementGeometry) -> MemoryScene {
        let mut scene = MemoryScene::new(Rect::new(0.0, 0.0, 800.0, 600.0), Viewport::default());
        scene.apply_snapshot(SceneSnapshot {
            elements: vec![ElementSnapshot {
                id: ElementId::intern(id),
                geometry,
            }],
            ..Default::default()
        });
        scene
    }

    #[test]
    fn rect_resize_moves_decorations() {
        let mut g = ElementGeometry::new(Body::Rect(RectBody {
            x: 100.0,
            y: 50.0,
            width: 160.0,
            height: 80.0,
        }));
        g.label = Some(Point::new(180.0, 114.0));
        g.handle = Some(Point::new(250.0, 120.0));
        g.status = Some(Point::new(252.0, 58.0));
        g.clip = Some(Size::new(160.0, 80.0));
        g.icon = Some(IconPlacement {
            translate: Vec2::new(170.0, 80.0),
            rest: " scale(0.8)".into(),
        });
        let mut scene = scene_with("card", g);
        let id = ElementId::intern("card");

        let baseline = resize_baseline(&scene, id).unwrap();
        assert_eq!(baseline.original, Size::new(160.0, 80.0));
        assert!(apply_resize(&mut scene, id, Size::new(200.0, 120.0), &baseline));

        let el = scene.element(id).unwrap();
        assert_eq!(el.body.geometry().bounds(), Bounds::new(100.0, 50.0, 200.0, 120.0));
        assert_eq!(el.label, Some(Point::new(200.0, 154.0)));
        assert_eq!(el.handle, Some(Point::new(290.0, 160.0)));
        assert_eq!(el.status, Some(Point::new(292.0, 58.0)));
        assert_eq!(el.clip, Some(Size::new(200.0, 120.0)));
        let icon = el.icon.as_ref().unwrap();
        assert_eq!(icon.translate, Vec2::new(190.0, 100.0));
        assert_eq!(icon.rest, " scale(0.8)");
    }

    #[test]
    fn icon_offset_is_relative_to_gesture_start() {
        let mut g = ElementGeometry::new(Body::Rect(RectBody {
            x: 0.0,
            y: 0.0,
            width: 100.0,
            height: 100.0,
        }));
        g.icon = Some(IconPlacement {
            translate: Vec2::new(50.0, 50.0),
            rest: String::new(),
        });
        let mut scene = scene_with("i", g);
        let id = ElementId::intern("i");
        let baseline = resize_baseline(&scene, id).unwrap();

        // Repeated frames must not compound the offset.
        apply_resize(&mut scene, id, Size::new(120.0, 100.0), &baseline);
        apply_resize(&mut scene, id, Size::new(140.0, 100.0), &baseline);
        let icon = scene.element(id).unwrap().icon.as_ref().unwrap();
        assert_eq!(icon.translate, Vec2::new(70.0, 50.0));
    }

    #[test]
    fn cylinder_measures_with_cap_overhang() {
        let mut g = ElementGeometry::new(Body::Cylinder(CylinderBody {
            x: 10.0,
            y: 30.0,
            width: 120.0,
            height: 50.0,
        }));
        g.hit_area = Some(Size::new(120.0, 80.0));
        let mut scene = scene_with("db", g);
        let id = ElementId::intern("db");

        assert_eq!(bounds_of(&scene, id), Some(Bounds::new(10.0, 15.0, 120.0, 80.0)));
        let baseline = resize_baseline(&scene, id).unwrap();
        assert_eq!(baseline.original, Size::new(120.0, 80.0));

        apply_resize(&mut scene, id, Size::new(150.0, 100.0), &baseline);
        let el = scene.element(id).unwrap();
        assert_eq!(el.body.geometry().bounds(), Bounds::new(10.0, 15.0, 150.0, 100.0));
        assert_eq!(el.hit_area, Some(Size::new(150.0, 100.0)));
    }

    #[test]
    fn anchor_follows_drag_translation() {
        let mut g = ElementGeometry::new(Body::Ellipse(EllipseBody {
            cx: 40.0,
            cy: 40.0,
            rx: 20.0,
            ry: 10.0,
        }));
        g.transform = Some(Vec2::new(5.0, -5.0));
        let scene = scene_with("e", g);
        assert_eq!(
            anchor_point_of(&scene, ElementId::intern("e")),
            Some(Point::new(45.0, 35.0))
        );
    }

    #[test]
    fn missing_element_is_not_an_error() {
        let mut scene = MemoryScene::new(Rect::new(0.0, 0.0, 10.0, 10.0), Viewport::default());
        let ghost = ElementId::intern("ghost");
        assert_eq!(bounds_of(&scene, ghost), None);
        assert_eq!(anchor_point_of(&scene, ghost), None);
        let baseline = ResizeBaseline {
            original: Size::new(10.0, 10.0),
            icon_origin: None,
        };
        assert!(!apply_resize(&mut scene, ghost, Size::new(20.0, 20.0), &baseline));
    }
}
