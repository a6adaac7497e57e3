//! The canvas: owner of the surface, the item set and the routing engine.
//!
//! DESIGN
//! ======
//! Items are stored by id and indexed by container element; document order
//! comes from the surface, not the map. Every path that removes items goes
//! through the engine before the surface so the engine never holds endpoints
//! for containers that no longer exist. Serialization is injected: the canvas
//! only hands itself to a [`CanvasSerializer`].

#[cfg(test)]
#[path = "canvas_test.rs"]
mod canvas_test;

use std::collections::HashMap;

use tracing::debug;

use crate::config::CanvasConfig;
use crate::consts::{CLASS_CANVAS, CLASS_CONTENT, CLASS_ITEM};
use crate::engine::{ConnectTarget, ConnectionId, EndpointId, RoutingEngine};
use crate::event::Propagation;
use crate::hit::{self, Hit};
use crate::input::PointerEvent;
use crate::item::{Geometry, Item, ItemContent, ItemId, ItemMut};
use crate::serialize::CanvasSerializer;
use crate::surface::{ElementId, Surface};
use crate::viewport::{Point, Viewport};

/// A diagram canvas bound to one routing engine.
#[derive(Debug)]
pub struct Canvas<E: RoutingEngine> {
    surface: Surface,
    engine: E,
    items: HashMap<ItemId, Item>,
    by_container: HashMap<ElementId, ItemId>,
    viewport: Viewport,
    config: CanvasConfig,
}

impl<E: RoutingEngine> Canvas<E> {
    /// Create a canvas with default configuration.
    pub fn new(engine: E) -> Self {
        Self::with_config(engine, CanvasConfig::default())
    }

    pub fn with_config(engine: E, config: CanvasConfig) -> Self {
        Self {
            surface: Surface::new(CLASS_CANVAS),
            engine,
            items: HashMap::new(),
            by_container: HashMap::new(),
            viewport: Viewport::new(config.viewport_width, config.viewport_height),
            config,
        }
    }

    // --- Accessors ---

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Update the size of the canvas element.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport.width = width;
        self.viewport.height = height;
    }

    /// Update the world coordinate shown at the canvas element's top-left.
    pub fn scroll_to(&mut self, top: f64, left: f64) {
        self.viewport.scroll_top = top;
        self.viewport.scroll_left = left;
    }

    // --- Items ---

    /// Create an item with a fresh id. Width and height default to the
    /// configured item size. The item is centered in the current viewport,
    /// draggable within the canvas, and has no endpoints yet.
    pub fn add(&mut self, handle: &'static str, content: ItemContent, width: Option<f64>, height: Option<f64>) -> ItemId {
        let id = ItemId::new();
        self.attach(id.clone(), handle, content, width, height);
        id
    }

    /// Like [`Canvas::add`] with a caller-chosen id. Returns `None` if the id
    /// is already taken.
    pub fn add_with_id(
        &mut self,
        id: ItemId,
        handle: &'static str,
        content: ItemContent,
        width: Option<f64>,
        height: Option<f64>,
    ) -> Option<ItemId> {
        if self.items.contains_key(&id) {
            return None;
        }
        self.attach(id.clone(), handle, content, width, height);
        Some(id)
    }

    pub(crate) fn attach(&mut self, id: ItemId, handle: &'static str, content: ItemContent, width: Option<f64>, height: Option<f64>) {
        let width = width.unwrap_or(self.config.item_width);
        let height = height.unwrap_or(self.config.item_height);
        let pos = self.viewport.centered(width, height);

        let container = self.surface.append_to_root(CLASS_ITEM);
        let content_element = self.surface.append(container, CLASS_CONTENT);
        self.engine.draggable(container, self.surface.root());

        let geometry = Geometry { top: pos.top, left: pos.left, width, height };
        debug!(item = %id, %handle, %container, "item created");
        self.by_container.insert(container, id.clone());
        self.items.insert(id.clone(), Item::new(id, handle, container, content, content_element, geometry));
    }

    /// Remove an item, deregistering its endpoints before its container goes.
    /// Returns false for unknown ids.
    pub fn remove(&mut self, id: &str) -> bool {
        let Some(mut view) = self.item_mut(id) else {
            return false;
        };
        view.teardown();
        let Some(item) = self.items.remove(id) else {
            return false;
        };
        self.by_container.remove(&item.container());
        self.surface.remove(item.container());
        debug!(item = %id, "item removed");
        true
    }

    /// Remove every item and drop all engine state.
    pub fn clear(&mut self) {
        self.engine.reset();
        self.surface.clear();
        self.items.clear();
        self.by_container.clear();
        debug!("canvas cleared");
    }

    pub fn item(&self, id: &str) -> Option<&Item> {
        self.items.get(id)
    }

    /// Mutable view of an item, bundled with the engine and surface.
    pub fn item_mut(&mut self, id: &str) -> Option<ItemMut<'_, E>> {
        let item = self.items.get_mut(id)?;
        Some(ItemMut { item, engine: &mut self.engine, surface: &mut self.surface })
    }

    /// The item owning a container element.
    pub fn item_by_container(&self, container: ElementId) -> Option<&Item> {
        self.by_container.get(&container).and_then(|id| self.items.get(id))
    }

    /// All items in document order.
    pub fn items(&self) -> Vec<&Item> {
        self.surface
            .children(self.surface.root())
            .iter()
            .filter_map(|el| self.item_by_container(*el))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    // --- Connections ---

    /// Connect `source`'s first output to `target`'s whole container (when it
    /// is a drop target) or first input. Silently does nothing if either side
    /// lacks a usable endpoint or the engine refuses.
    pub fn connect(&mut self, source: &str, target: &str) -> Option<ConnectionId> {
        let from = self.items.get(source)?.outputs().first()?.id;
        let dst = self.items.get(target)?;
        let to = if dst.is_target() {
            ConnectTarget::Container(dst.container())
        } else {
            ConnectTarget::Endpoint(dst.inputs().first()?.id)
        };
        self.engine.connect(from, to)
    }

    /// Ask the engine for a connection between already-resolved ends.
    pub fn connect_endpoints(&mut self, from: EndpointId, to: ConnectTarget) -> Option<ConnectionId> {
        self.engine.connect(from, to)
    }

    // --- Hit-testing / zoom ---

    /// Whether the element under the pointer belongs to this canvas.
    ///
    /// Used by external drag sources to decide whether to accept a drop.
    pub fn hits(&self, event: &PointerEvent) -> bool {
        let element = event
            .to_element
            .or(event.related_target)
            .or_else(|| self.hit_test(event.point()).map(|h| h.element))
            .or(event.target);
        element.is_some_and(|el| self.surface.contains(self.surface.root(), el))
    }

    /// The topmost element at a screen-space point.
    pub fn hit_test(&self, screen: Point) -> Option<Hit> {
        hit::hit_test(self, screen)
    }

    /// Current zoom level.
    pub fn zoom(&self) -> f64 {
        self.viewport.zoom
    }

    /// Animate to a new zoom level. Non-finite or non-positive levels are
    /// ignored.
    pub fn set_zoom(&mut self, level: f64) {
        if !level.is_finite() || level <= 0.0 {
            return;
        }
        self.viewport.zoom = level;
        self.engine.animate_zoom(self.surface.root(), level);
    }

    // --- Pointer routing ---

    pub fn pointer_down(&mut self, id: &str) {
        if let Some(item) = self.items.get_mut(id) {
            item.press();
        }
    }

    pub fn pointer_move(&mut self, id: &str) {
        if let Some(item) = self.items.get_mut(id) {
            item.movement();
        }
    }

    /// Finish a gesture on an item; emits `click` if the pointer never moved.
    pub fn pointer_up(&mut self, id: &str, event: &PointerEvent) -> Propagation {
        self.items.get_mut(id).map_or(Propagation::Continue, |item| item.release(event))
    }

    // --- Serialization ---

    /// Produce a snapshot through `serializer`.
    ///
    /// # Errors
    ///
    /// Whatever the serializer reports.
    pub fn serialize<S: CanvasSerializer<E>>(&self, serializer: &S) -> Result<S::Data, S::Error> {
        serializer.serialize_canvas(self)
    }

    /// Replace the canvas contents with `data` through `serializer`.
    ///
    /// # Errors
    ///
    /// Whatever the serializer reports.
    pub fn deserialize<S: CanvasSerializer<E>>(&mut self, serializer: &S, data: &S::Data) -> Result<(), S::Error> {
        serializer.deserialize_canvas(self, data)
    }
}
