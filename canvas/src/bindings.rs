//! Browser bindings: a [`RoutingEngine`] backed by a host JS object, and the
//! `WasmCanvas` class exported to JavaScript.
//!
//! DESIGN
//! ======
//! The host object owns the DOM and the real drag/connector library. It
//! exposes one method per engine capability:
//!
//! | Method | Arguments | Returns |
//! |--------|-----------|---------|
//! | `addEndpoint` | container, role, anchor, max or `null` | endpoint id or `null` |
//! | `removeEndpoint` | endpoint | |
//! | `makeTarget` / `unmakeTarget` | container (, anchor) | |
//! | `connect` | source endpoint, `"endpoint"`/`"container"`, target id | connection id or `null` |
//! | `connections` | | array of `{id, source, target, container}` |
//! | `draggable` | container, containment | |
//! | `animateZoom` | canvas element, level | |
//! | `detach` / `reset` | container / | |
//!
//! All ids cross the boundary as numbers. Endpoint ownership is tracked on
//! this side since every endpoint is created through [`JsEngine`].
//!
//! ERROR HANDLING
//! ==============
//! A missing host method or a throwing call is logged with `warn!` and
//! treated as a refusal, the same as the engine declining.

use std::collections::HashMap;
use std::rc::Rc;

use js_sys::{Array, Function, Reflect};
use snapshot::{Anchor, Anchors};
use tracing::warn;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::canvas::Canvas;
use crate::consts::EVENT_CLICK;
use crate::engine::{ConnectTarget, Connection, ConnectionId, EndpointId, EndpointSpec, Role, RoutingEngine};
use crate::event::{Listener, Propagation};
use crate::input::PointerEvent;
use crate::item::Item;
use crate::serialize::{CanvasSerializer, JsonSerializer};
use crate::surface::ElementId;

// =============================================================================
// JS ENGINE
// =============================================================================

/// Routing engine that forwards to a host JS object.
#[derive(Debug)]
pub struct JsEngine {
    host: JsValue,
    owners: HashMap<EndpointId, ElementId>,
}

#[allow(clippy::cast_precision_loss)]
fn to_js(id: u64) -> JsValue {
    JsValue::from_f64(id as f64)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn from_js(value: &JsValue) -> Option<u64> {
    value.as_f64().filter(|v| v.is_finite() && *v >= 0.0).map(|v| v as u64)
}

fn field(object: &JsValue, key: &str) -> Option<JsValue> {
    match Reflect::get(object, &JsValue::from_str(key)) {
        Ok(value) if !value.is_undefined() => Some(value),
        _ => None,
    }
}

impl JsEngine {
    #[must_use]
    pub fn new(host: JsValue) -> Self {
        Self { host, owners: HashMap::new() }
    }

    fn call(&self, method: &str, args: &[JsValue]) -> Option<JsValue> {
        let function = match field(&self.host, method).map(|v| v.dyn_into::<Function>()) {
            Some(Ok(function)) => function,
            _ => {
                warn!(%method, "host engine lacks method");
                return None;
            }
        };
        let args: Array = args.iter().collect();
        match function.apply(&self.host, &args) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(%method, error = ?err, "host engine call failed");
                None
            }
        }
    }

    fn parse_connection(value: &JsValue) -> Option<Connection> {
        let id = ConnectionId(from_js(&field(value, "id")?)?);
        let source = EndpointId(from_js(&field(value, "source")?)?);
        let target = from_js(&field(value, "target")?)?;
        let container = field(value, "container").and_then(|v| v.as_bool()).unwrap_or(false);
        let target = if container {
            ConnectTarget::Container(ElementId(target))
        } else {
            ConnectTarget::Endpoint(EndpointId(target))
        };
        Some(Connection { id, source, target })
    }
}

impl RoutingEngine for JsEngine {
    fn add_endpoint(&mut self, container: ElementId, spec: EndpointSpec) -> Option<EndpointId> {
        let role = match spec.role {
            Role::Source => "source",
            Role::Target => "target",
        };
        let max = spec.max_connections.map_or(JsValue::NULL, |m| JsValue::from_f64(f64::from(m)));
        let args = [to_js(container.0), JsValue::from_str(role), JsValue::from_str(spec.anchor.as_str()), max];
        let id = EndpointId(from_js(&self.call("addEndpoint", &args)?)?);
        self.owners.insert(id, container);
        Some(id)
    }

    fn remove_endpoint(&mut self, endpoint: EndpointId) {
        if self.owners.remove(&endpoint).is_some() {
            self.call("removeEndpoint", &[to_js(endpoint.0)]);
        }
    }

    fn make_target(&mut self, container: ElementId, anchor: Anchor) {
        self.call("makeTarget", &[to_js(container.0), JsValue::from_str(anchor.as_str())]);
    }

    fn unmake_target(&mut self, container: ElementId) {
        self.call("unmakeTarget", &[to_js(container.0)]);
    }

    fn connect(&mut self, source: EndpointId, target: ConnectTarget) -> Option<ConnectionId> {
        let (kind, id) = match target {
            ConnectTarget::Endpoint(endpoint) => ("endpoint", endpoint.0),
            ConnectTarget::Container(container) => ("container", container.0),
        };
        let result = self.call("connect", &[to_js(source.0), JsValue::from_str(kind), to_js(id)])?;
        from_js(&result).map(ConnectionId)
    }

    fn connections(&self) -> Vec<Connection> {
        let Some(list) = self.call("connections", &[]) else {
            return Vec::new();
        };
        Array::from(&list).iter().filter_map(|value| Self::parse_connection(&value)).collect()
    }

    fn endpoint_owner(&self, endpoint: EndpointId) -> Option<ElementId> {
        self.owners.get(&endpoint).copied()
    }

    fn endpoint_count(&self) -> usize {
        self.owners.len()
    }

    fn draggable(&mut self, container: ElementId, containment: ElementId) {
        self.call("draggable", &[to_js(container.0), to_js(containment.0)]);
    }

    fn animate_zoom(&mut self, surface: ElementId, level: f64) {
        self.call("animateZoom", &[to_js(surface.0), JsValue::from_f64(level)]);
    }

    fn detach(&mut self, container: ElementId) {
        self.owners.retain(|_, owner| *owner != container);
        self.call("detach", &[to_js(container.0)]);
    }

    fn reset(&mut self) {
        self.owners.clear();
        self.call("reset", &[]);
    }
}

// =============================================================================
// WASM CANVAS
// =============================================================================

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn parse_anchor(value: &JsValue) -> Result<Anchor, JsValue> {
    let name = value.as_string().ok_or_else(|| JsValue::from_str("anchor must be a string"))?;
    serde_json::from_value(serde_json::Value::String(name)).map_err(js_error)
}

/// Single anchor name, array of names, or `null`/`undefined`.
fn parse_anchors(value: &JsValue) -> Result<Anchors, JsValue> {
    if value.is_null() || value.is_undefined() {
        return Ok(Anchors::none());
    }
    if Array::is_array(value) {
        let anchors = Array::from(value).iter().map(|v| parse_anchor(&v)).collect::<Result<Vec<_>, _>>()?;
        return Ok(Anchors::from(anchors));
    }
    parse_anchor(value).map(Anchors::from)
}

fn unknown(id: &str) -> JsValue {
    JsValue::from_str(&format!("unknown item {id}"))
}

/// A flow canvas driven from JavaScript.
#[wasm_bindgen]
pub struct WasmCanvas {
    canvas: Canvas<JsEngine>,
    serializer: JsonSerializer<JsEngine>,
}

#[wasm_bindgen]
impl WasmCanvas {
    /// Bind a canvas to the host engine object.
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new(host: JsValue) -> WasmCanvas {
        WasmCanvas { canvas: Canvas::new(JsEngine::new(host)), serializer: JsonSerializer::default() }
    }

    /// Element id of the canvas root.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn root(&self) -> f64 {
        self.canvas.surface().root().0 as f64
    }

    #[allow(clippy::cast_precision_loss)]
    pub fn container(&self, id: &str) -> Option<f64> {
        self.canvas.item(id).map(|item| item.container().0 as f64)
    }

    /// The item as a snapshot record, for the host to render.
    ///
    /// # Errors
    ///
    /// Unknown ids and unregistered handles.
    pub fn describe(&self, id: &str) -> Result<String, JsValue> {
        let item = self.canvas.item(id).ok_or_else(|| unknown(id))?;
        let record = self.serializer.inner().serialize_record(item).map_err(js_error)?;
        serde_json::to_string(&record).map_err(js_error)
    }

    // --- Items ---

    pub fn add_item(&mut self) -> String {
        self.canvas.add_item().to_string()
    }

    pub fn add_custom(&mut self, markup: String, width: Option<f64>, height: Option<f64>) -> String {
        self.canvas.add_custom(markup, width, height).to_string()
    }

    pub fn add_image(&mut self, src: String, width: Option<f64>, height: Option<f64>) -> String {
        self.canvas.add_image(src, width, height).to_string()
    }

    pub fn add_exclusive_choice(&mut self) -> String {
        self.canvas.add_exclusive_choice().to_string()
    }

    pub fn add_mail(&mut self) -> String {
        self.canvas.add_mail().to_string()
    }

    pub fn add_db(&mut self) -> String {
        self.canvas.add_db().to_string()
    }

    pub fn remove(&mut self, id: &str) -> bool {
        self.canvas.remove(id)
    }

    pub fn clear(&mut self) {
        self.canvas.clear();
    }

    /// Replace the endpoints of an item.
    ///
    /// # Errors
    ///
    /// Unknown ids and unrecognised anchor names.
    pub fn anchor(&mut self, id: &str, inputs: &JsValue, outputs: &JsValue) -> Result<(), JsValue> {
        let inputs = parse_anchors(inputs)?;
        let outputs = parse_anchors(outputs)?;
        self.canvas.item_mut(id).ok_or_else(|| unknown(id))?.anchor(inputs, outputs);
        Ok(())
    }

    /// # Errors
    ///
    /// Unknown ids and unrecognised anchor names.
    pub fn make_target(&mut self, id: &str, anchor: &JsValue) -> Result<(), JsValue> {
        let anchor = if anchor.is_null() || anchor.is_undefined() { None } else { Some(parse_anchor(anchor)?) };
        self.canvas.item_mut(id).ok_or_else(|| unknown(id))?.make_target(anchor);
        Ok(())
    }

    /// Show the overlay (`show` omitted or `true`) or hide it.
    ///
    /// # Errors
    ///
    /// Unknown ids.
    pub fn overlay(&mut self, id: &str, show: Option<bool>) -> Result<(), JsValue> {
        self.canvas.item_mut(id).ok_or_else(|| unknown(id))?.overlay(show.unwrap_or(true));
        Ok(())
    }

    /// `[top, left]` of an item.
    pub fn pos(&self, id: &str) -> Option<Vec<f64>> {
        self.canvas.item(id).map(|item| vec![item.pos().top, item.pos().left])
    }

    /// # Errors
    ///
    /// Unknown ids.
    pub fn set_pos(&mut self, id: &str, top: f64, left: f64) -> Result<(), JsValue> {
        self.canvas.item_mut(id).ok_or_else(|| unknown(id))?.set_pos(top, left);
        Ok(())
    }

    /// Relative move; returns the new `[top, left]`.
    pub fn move_by(&mut self, id: &str, d_top: Option<f64>, d_left: Option<f64>) -> Option<Vec<f64>> {
        let pos = self.canvas.item_mut(id)?.move_by(d_top, d_left);
        Some(vec![pos.top, pos.left])
    }

    pub fn connect(&mut self, source: &str, target: &str) -> bool {
        self.canvas.connect(source, target).is_some()
    }

    /// Call `callback(id)` when the item is clicked. Returning `false` from
    /// the callback stops later listeners.
    ///
    /// # Errors
    ///
    /// Unknown ids.
    pub fn on_click(&mut self, id: &str, callback: Function) -> Result<(), JsValue> {
        let listener: Listener<Item, PointerEvent> = Rc::new(move |item: &Item, _event: &PointerEvent| {
            match callback.call1(&JsValue::NULL, &JsValue::from_str(item.id().as_str())) {
                Ok(value) if value == JsValue::FALSE => Propagation::Halt,
                Ok(_) => Propagation::Continue,
                Err(err) => {
                    warn!(error = ?err, "click callback threw");
                    Propagation::Continue
                }
            }
        });
        self.canvas.item_mut(id).ok_or_else(|| unknown(id))?.on(EVENT_CLICK, listener);
        Ok(())
    }

    // --- Pointer ---

    pub fn pointer_down(&mut self, id: &str) {
        self.canvas.pointer_down(id);
    }

    pub fn pointer_move(&mut self, id: &str) {
        self.canvas.pointer_move(id);
    }

    /// Returns `false` if a click listener halted propagation.
    pub fn pointer_up(&mut self, id: &str, x: f64, y: f64) -> bool {
        self.canvas.pointer_up(id, &PointerEvent::at(x, y)) == Propagation::Continue
    }

    /// Whether a drop at `(x, y)` lands on this canvas. Element ids are
    /// whatever the host resolved from the browser event.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn hits(
        &self,
        x: f64,
        y: f64,
        target: Option<f64>,
        to_element: Option<f64>,
        related_target: Option<f64>,
    ) -> bool {
        let element = |v: Option<f64>| v.filter(|v| *v >= 0.0).map(|v| ElementId(v as u64));
        self.canvas.hits(&PointerEvent {
            x,
            y,
            target: element(target),
            to_element: element(to_element),
            related_target: element(related_target),
        })
    }

    // --- Viewport ---

    pub fn zoom(&self) -> f64 {
        self.canvas.zoom()
    }

    pub fn set_zoom(&mut self, level: f64) {
        self.canvas.set_zoom(level);
    }

    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.canvas.set_viewport(width, height);
    }

    pub fn scroll_to(&mut self, top: f64, left: f64) {
        self.canvas.scroll_to(top, left);
    }

    // --- Persistence ---

    /// # Errors
    ///
    /// Unregistered handles and encoding failures.
    pub fn serialize(&self) -> Result<String, JsValue> {
        self.serializer.serialize_canvas(&self.canvas).map_err(js_error)
    }

    /// Replace the canvas contents with a JSON snapshot.
    ///
    /// # Errors
    ///
    /// Malformed text or a snapshot that cannot be rebuilt; the canvas is
    /// left empty.
    pub fn deserialize(&mut self, text: String) -> Result<(), JsValue> {
        self.serializer.deserialize_canvas(&mut self.canvas, &text).map_err(js_error)
    }
}
