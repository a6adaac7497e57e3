//! Hit-testing against canvas items.
//!
//! Items are tested topmost first (reverse document order) in world space.
//! Within an item the overlay wins over the content, and the content over the
//! bare container body. A point on the canvas element that misses every item
//! hits the surface itself.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::canvas::Canvas;
use crate::engine::RoutingEngine;
use crate::item::ItemId;
use crate::surface::ElementId;
use crate::viewport::Point;

/// Which part of the canvas was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    /// The canvas element, outside every item.
    Surface,
    /// An item container.
    Body,
    /// The content element of an item.
    Content,
    /// The overlay decoration of an item.
    Overlay,
}

/// Result of a hit test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    pub element: ElementId,
    pub item: Option<ItemId>,
    pub part: HitPart,
}

/// Test which element (if any) is under the screen-space point `screen`.
///
/// Returns `None` when the point lies outside the canvas element.
#[must_use]
pub fn hit_test<E: RoutingEngine>(canvas: &Canvas<E>, screen: Point) -> Option<Hit> {
    let viewport = canvas.viewport();
    if !viewport.contains_screen(screen) {
        return None;
    }
    let world = viewport.screen_to_world(screen);

    let items = canvas.items();
    let topmost = items.iter().rev().find(|item| item.contains_point(world.x, world.y));
    let Some(item) = topmost else {
        return Some(Hit { element: canvas.surface().root(), item: None, part: HitPart::Surface });
    };

    let (element, part) = if let Some(overlay) = item.overlay_element() {
        (overlay, HitPart::Overlay)
    } else if let Some(content) = item.content_element() {
        (content, HitPart::Content)
    } else {
        (item.container(), HitPart::Body)
    };
    Some(Hit { element, item: Some(item.id().clone()), part })
}
