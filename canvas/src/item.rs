//! Item model: diagram nodes, their endpoints, and the mutable view used to
//! change their engine-side state.
//!
//! An [`Item`] holds everything the canvas needs to draw and serialize a node:
//! identity, geometry, content, endpoint lists and the overlay decoration.
//! Operations that only touch the item itself (`set_pos`, `move_by`, event
//! registration) live on `Item`. Operations that must keep the routing engine
//! or the surface in step (`anchor`, `make_target`, `overlay`) go through
//! [`ItemMut`], which the canvas hands out together with those borrows.

#[cfg(test)]
#[path = "item_test.rs"]
mod item_test;

use std::borrow::Borrow;
use std::fmt;
use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};
use snapshot::{Anchor, Anchors};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::consts::{CLASS_OVERLAY, EVENT_CLICK, INPUT_MAX_CONNECTIONS, OUTPUT_MAX_CONNECTIONS};
use crate::engine::{EndpointId, EndpointSpec, Role, RoutingEngine};
use crate::event::{EventHub, Listener, Propagation};
use crate::input::{ClickTracker, PointerEvent};
use crate::surface::{ElementId, Surface};
use crate::viewport::Position;

/// Unique identifier of an item within a canvas.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// A fresh random id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl Borrow<str> for ItemId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// What an item displays inside its container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemContent {
    /// Nothing but the container itself.
    Empty,
    /// A bitmap loaded from `src`.
    Image { src: String },
    /// Pre-built markup supplied by the host.
    Markup(String),
}

/// One registered endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub id: EndpointId,
    pub anchor: Anchor,
}

/// Initial geometry of a new item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

/// A diagram node.
#[derive(Debug)]
pub struct Item {
    id: ItemId,
    handle: &'static str,
    container: ElementId,
    content: ItemContent,
    content_element: Option<ElementId>,
    geometry: Geometry,
    inputs: Vec<Endpoint>,
    outputs: Vec<Endpoint>,
    target_anchor: Option<Anchor>,
    overlay: Option<ElementId>,
    tracker: ClickTracker,
    events: EventHub<Item, PointerEvent>,
}

impl Item {
    pub(crate) fn new(
        id: ItemId,
        handle: &'static str,
        container: ElementId,
        content: ItemContent,
        content_element: Option<ElementId>,
        geometry: Geometry,
    ) -> Self {
        Self {
            id,
            handle,
            container,
            content,
            content_element,
            geometry,
            inputs: Vec::new(),
            outputs: Vec::new(),
            target_anchor: None,
            overlay: None,
            tracker: ClickTracker::default(),
            events: EventHub::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> &ItemId {
        &self.id
    }

    /// Variant discriminator; fixed for the life of the item.
    #[must_use]
    pub fn handle(&self) -> &'static str {
        self.handle
    }

    /// The container element on the canvas surface.
    #[must_use]
    pub fn container(&self) -> ElementId {
        self.container
    }

    #[must_use]
    pub fn content(&self) -> &ItemContent {
        &self.content
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.geometry.width
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.geometry.height
    }

    /// Input endpoints in registration order.
    #[must_use]
    pub fn inputs(&self) -> &[Endpoint] {
        &self.inputs
    }

    /// Output endpoints in registration order.
    #[must_use]
    pub fn outputs(&self) -> &[Endpoint] {
        &self.outputs
    }

    /// Anchor style of the whole-container target, if the item is one.
    #[must_use]
    pub fn target_anchor(&self) -> Option<Anchor> {
        self.target_anchor
    }

    /// Whether the item accepts connections on its whole body.
    #[must_use]
    pub fn is_target(&self) -> bool {
        self.target_anchor.is_some()
    }

    #[must_use]
    pub fn has_overlay(&self) -> bool {
        self.overlay.is_some()
    }

    /// The overlay decoration element, while shown.
    #[must_use]
    pub fn overlay_element(&self) -> Option<ElementId> {
        self.overlay
    }

    /// The element holding the item's content.
    #[must_use]
    pub fn content_element(&self) -> Option<ElementId> {
        self.content_element
    }

    /// Whether a world-space point lies on the item's box.
    #[must_use]
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        let g = &self.geometry;
        x >= g.left && x <= g.left + g.width && y >= g.top && y <= g.top + g.height
    }

    /// Current absolute position.
    #[must_use]
    pub fn pos(&self) -> Position {
        Position { top: self.geometry.top, left: self.geometry.left }
    }

    /// Reposition the item.
    pub fn set_pos(&mut self, top: f64, left: f64) {
        self.geometry.top = top;
        self.geometry.left = left;
    }

    /// Move by the given deltas; `None` leaves that axis alone. Returns the
    /// resulting position.
    pub fn move_by(&mut self, d_top: Option<f64>, d_left: Option<f64>) -> Position {
        let mut pos = self.pos();
        if let Some(d) = d_top {
            pos.top += d;
        }
        if let Some(d) = d_left {
            pos.left += d;
        }
        self.set_pos(pos.top, pos.left);
        pos
    }

    pub(crate) fn set_size(&mut self, width: f64, height: f64) {
        self.geometry.width = width;
        self.geometry.height = height;
    }

    pub(crate) fn endpoint_index(&self, endpoint: EndpointId, role: Role) -> Option<usize> {
        let list = match role {
            Role::Source => &self.outputs,
            Role::Target => &self.inputs,
        };
        list.iter().position(|e| e.id == endpoint)
    }

    /// Register an event listener on this item (e.g. [`EVENT_CLICK`]).
    pub fn on(&mut self, name: &str, listener: Listener<Item, PointerEvent>) {
        self.events.on(name, listener);
    }

    /// Remove a listener registered with [`Item::on`].
    pub fn off(&mut self, name: &str, listener: &Listener<Item, PointerEvent>) {
        self.events.off(name, listener);
    }

    pub(crate) fn press(&mut self) {
        self.tracker.press();
    }

    pub(crate) fn movement(&mut self) {
        self.tracker.movement();
    }

    /// End a pointer gesture, emitting `click` if nothing moved.
    pub(crate) fn release(&mut self, event: &PointerEvent) -> Propagation {
        if !self.tracker.release() {
            return Propagation::Continue;
        }
        self.events.emit(EVENT_CLICK, self, event)
    }
}

/// Mutable view of an item together with the engine and surface it lives on.
pub struct ItemMut<'a, E: RoutingEngine> {
    pub(crate) item: &'a mut Item,
    pub(crate) engine: &'a mut E,
    pub(crate) surface: &'a mut Surface,
}

impl<E: RoutingEngine> ItemMut<'_, E> {
    /// Replace the discrete endpoints.
    ///
    /// All existing input and output endpoints are deregistered first, then
    /// one endpoint is registered per descriptor, in order. Calling this
    /// again with the same arguments yields the same endpoint set. Non-empty
    /// `inputs` cancel a previous [`ItemMut::make_target`].
    pub fn anchor(&mut self, inputs: impl Into<Anchors>, outputs: impl Into<Anchors>) {
        let inputs = inputs.into();
        let outputs = outputs.into();
        let container = self.item.container;

        self.clear_endpoints();
        if !inputs.is_empty() && self.item.target_anchor.take().is_some() {
            self.engine.unmake_target(container);
        }
        self.item.inputs = self.register(&inputs, Role::Target, INPUT_MAX_CONNECTIONS);
        self.item.outputs = self.register(&outputs, Role::Source, OUTPUT_MAX_CONNECTIONS);
        debug!(
            item = %self.item.id,
            inputs = self.item.inputs.len(),
            outputs = self.item.outputs.len(),
            "anchored"
        );
    }

    /// Make the whole container a single drop target instead of discrete
    /// inputs. `None` uses [`Anchor::Continuous`].
    pub fn make_target(&mut self, anchor: Option<Anchor>) {
        let anchor = anchor.unwrap_or(Anchor::Continuous);
        let container = self.item.container;

        for endpoint in self.item.inputs.drain(..) {
            self.engine.remove_endpoint(endpoint.id);
        }
        match self.item.target_anchor {
            Some(current) if current == anchor => return,
            Some(_) => self.engine.unmake_target(container),
            None => {}
        }
        self.engine.make_target(container, anchor);
        self.item.target_anchor = Some(anchor);
    }

    /// Point an image item at another bitmap. Items without image content
    /// are left alone.
    pub fn set_image_src(&mut self, src: impl Into<String>) {
        if let ItemContent::Image { src: current } = &mut self.item.content {
            *current = src.into();
        }
    }

    /// Show (`true`) or hide (`false`) the overlay decoration. Idempotent.
    pub fn overlay(&mut self, show: bool) {
        match (show, self.item.overlay) {
            (true, None) => {
                self.item.overlay = self.surface.append(self.item.container, CLASS_OVERLAY);
            }
            (false, Some(element)) => {
                self.surface.remove(element);
                self.item.overlay = None;
            }
            _ => {}
        }
    }

    /// Release everything the engine and surface hold for this item, ahead of
    /// removing it from the canvas.
    pub(crate) fn teardown(&mut self) {
        let container = self.item.container;
        self.clear_endpoints();
        if self.item.target_anchor.take().is_some() {
            self.engine.unmake_target(container);
        }
        self.overlay(false);
        self.engine.detach(container);
    }

    fn clear_endpoints(&mut self) {
        for endpoint in self.item.inputs.drain(..).chain(self.item.outputs.drain(..)) {
            self.engine.remove_endpoint(endpoint.id);
        }
    }

    fn register(&mut self, anchors: &[Anchor], role: Role, max_connections: Option<u32>) -> Vec<Endpoint> {
        let container = self.item.container;
        let mut registered = Vec::with_capacity(anchors.len());
        for &anchor in anchors {
            match self.engine.add_endpoint(container, EndpointSpec { role, anchor, max_connections }) {
                Some(id) => registered.push(Endpoint { id, anchor }),
                None => warn!(item = %self.item.id, ?anchor, ?role, "engine refused endpoint"),
            }
        }
        registered
    }
}

impl<E: RoutingEngine> Deref for ItemMut<'_, E> {
    type Target = Item;

    fn deref(&self) -> &Item {
        self.item
    }
}

impl<E: RoutingEngine> DerefMut for ItemMut<'_, E> {
    fn deref_mut(&mut self) -> &mut Item {
        self.item
    }
}
