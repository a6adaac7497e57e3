//! The seam to the external diagram rendering/routing engine.
//!
//! The engine draws endpoints and connectors, runs drag physics, and keeps its
//! own authoritative registry of endpoints and connections. The core only
//! talks to it through [`RoutingEngine`]. [`crate::memory::MemoryEngine`] is
//! the in-process implementation used by tests and tooling;
//! [`crate::bindings::JsEngine`] forwards to a host object in the browser.

use serde::{Deserialize, Serialize};
use snapshot::Anchor;

use crate::surface::ElementId;

/// Engine-assigned endpoint identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EndpointId(pub u64);

/// Engine-assigned connection identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(pub u64);

/// Which end of a connection an endpoint can be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Connections start here (an item output).
    Source,
    /// Connections end here (an item input).
    Target,
}

/// Parameters for a new endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointSpec {
    pub role: Role,
    pub anchor: Anchor,
    /// Maximum simultaneous connections; `None` means unlimited.
    pub max_connections: Option<u32>,
}

/// Destination of a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectTarget {
    /// A discrete input endpoint.
    Endpoint(EndpointId),
    /// A container registered with [`RoutingEngine::make_target`].
    Container(ElementId),
}

/// A connection as recorded by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Connection {
    pub id: ConnectionId,
    pub source: EndpointId,
    pub target: ConnectTarget,
}

/// Capabilities the canvas consumes from the routing engine.
///
/// Every container the engine sees first arrives through
/// [`RoutingEngine::draggable`], and leaves through [`RoutingEngine::detach`].
pub trait RoutingEngine {
    /// Register an endpoint on `container`. `None` if the engine refused.
    fn add_endpoint(&mut self, container: ElementId, spec: EndpointSpec) -> Option<EndpointId>;

    /// Delete an endpoint and every connection attached to it.
    fn remove_endpoint(&mut self, endpoint: EndpointId);

    /// Make the whole container a continuous drop target.
    fn make_target(&mut self, container: ElementId, anchor: Anchor);

    /// Undo [`RoutingEngine::make_target`], dropping connections into it.
    fn unmake_target(&mut self, container: ElementId);

    /// Connect an output endpoint to an input endpoint or target container.
    /// `None` if the engine refused (unknown ends, wrong roles, limits).
    fn connect(&mut self, source: EndpointId, target: ConnectTarget) -> Option<ConnectionId>;

    /// All current connections in creation order.
    fn connections(&self) -> Vec<Connection>;

    /// The container an endpoint was registered on.
    fn endpoint_owner(&self, endpoint: EndpointId) -> Option<ElementId>;

    /// Number of live endpoints across all containers.
    fn endpoint_count(&self) -> usize;

    /// Enable dragging of `container`, confined to `containment`.
    fn draggable(&mut self, container: ElementId, containment: ElementId);

    /// Animate the zoom style of the canvas element to `level`.
    fn animate_zoom(&mut self, surface: ElementId, level: f64);

    /// Forget everything about a container being removed.
    fn detach(&mut self, container: ElementId);

    /// Drop all endpoints, targets and connections.
    fn reset(&mut self);
}
