//! In-process routing engine.
//!
//! Keeps the same registry a browser engine would (endpoints per container,
//! whole-container targets, connections) and enforces roles and connection
//! limits, but draws nothing. Used by the tests and the CLI.

#[cfg(test)]
#[path = "memory_test.rs"]
mod memory_test;

use std::collections::HashMap;

use snapshot::Anchor;
use tracing::debug;

use crate::engine::{Connection, ConnectTarget, ConnectionId, EndpointId, EndpointSpec, Role, RoutingEngine};
use crate::surface::ElementId;

#[derive(Debug, Clone, Copy)]
struct EndpointEntry {
    container: ElementId,
    spec: EndpointSpec,
}

/// Routing engine that only keeps state.
#[derive(Debug, Default)]
pub struct MemoryEngine {
    endpoints: HashMap<EndpointId, EndpointEntry>,
    targets: HashMap<ElementId, Anchor>,
    connections: Vec<Connection>,
    draggables: HashMap<ElementId, ElementId>,
    zoom: Option<f64>,
    next_id: u64,
}

impl MemoryEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn connections_from(&self, endpoint: EndpointId) -> usize {
        self.connections.iter().filter(|c| c.source == endpoint).count()
    }

    fn connections_into(&self, target: ConnectTarget) -> usize {
        self.connections.iter().filter(|c| c.target == target).count()
    }

    fn has_room(limit: Option<u32>, used: usize) -> bool {
        limit.is_none_or(|max| used < max as usize)
    }

    /// Endpoints registered on `container`, in registration order.
    #[must_use]
    pub fn endpoints_of(&self, container: ElementId) -> Vec<(EndpointId, EndpointSpec)> {
        let mut found: Vec<_> = self
            .endpoints
            .iter()
            .filter(|(_, e)| e.container == container)
            .map(|(id, e)| (*id, e.spec))
            .collect();
        found.sort_by_key(|(id, _)| *id);
        found
    }

    /// Anchor of a whole-container target, if `container` is one.
    #[must_use]
    pub fn target_anchor(&self, container: ElementId) -> Option<Anchor> {
        self.targets.get(&container).copied()
    }

    /// Element a draggable container is confined to.
    #[must_use]
    pub fn containment(&self, container: ElementId) -> Option<ElementId> {
        self.draggables.get(&container).copied()
    }

    /// Last zoom level requested through [`RoutingEngine::animate_zoom`].
    #[must_use]
    pub fn zoom(&self) -> Option<f64> {
        self.zoom
    }
}

impl RoutingEngine for MemoryEngine {
    fn add_endpoint(&mut self, container: ElementId, spec: EndpointSpec) -> Option<EndpointId> {
        let id = EndpointId(self.next_id());
        self.endpoints.insert(id, EndpointEntry { container, spec });
        Some(id)
    }

    fn remove_endpoint(&mut self, endpoint: EndpointId) {
        if self.endpoints.remove(&endpoint).is_none() {
            return;
        }
        self.connections
            .retain(|c| c.source != endpoint && c.target != ConnectTarget::Endpoint(endpoint));
    }

    fn make_target(&mut self, container: ElementId, anchor: Anchor) {
        self.targets.insert(container, anchor);
    }

    fn unmake_target(&mut self, container: ElementId) {
        if self.targets.remove(&container).is_some() {
            self.connections.retain(|c| c.target != ConnectTarget::Container(container));
        }
    }

    fn connect(&mut self, source: EndpointId, target: ConnectTarget) -> Option<ConnectionId> {
        let from = self.endpoints.get(&source)?;
        if from.spec.role != Role::Source || !Self::has_room(from.spec.max_connections, self.connections_from(source)) {
            debug!(?source, "source endpoint refused connection");
            return None;
        }
        let accepted = match target {
            ConnectTarget::Endpoint(id) => self.endpoints.get(&id).is_some_and(|to| {
                to.spec.role == Role::Target && Self::has_room(to.spec.max_connections, self.connections_into(target))
            }),
            ConnectTarget::Container(container) => self.targets.contains_key(&container),
        };
        if !accepted {
            debug!(?target, "target refused connection");
            return None;
        }
        let id = ConnectionId(self.next_id());
        self.connections.push(Connection { id, source, target });
        Some(id)
    }

    fn connections(&self) -> Vec<Connection> {
        self.connections.clone()
    }

    fn endpoint_owner(&self, endpoint: EndpointId) -> Option<ElementId> {
        self.endpoints.get(&endpoint).map(|e| e.container)
    }

    fn endpoint_count(&self) -> usize {
        self.endpoints.len()
    }

    fn draggable(&mut self, container: ElementId, containment: ElementId) {
        self.draggables.insert(container, containment);
    }

    fn animate_zoom(&mut self, _surface: ElementId, level: f64) {
        self.zoom = Some(level);
    }

    fn detach(&mut self, container: ElementId) {
        let owned: Vec<EndpointId> = self
            .endpoints
            .iter()
            .filter(|(_, e)| e.container == container)
            .map(|(id, _)| *id)
            .collect();
        for endpoint in owned {
            self.remove_endpoint(endpoint);
        }
        self.unmake_target(container);
        self.draggables.remove(&container);
    }

    fn reset(&mut self) {
        self.endpoints.clear();
        self.targets.clear();
        self.connections.clear();
        self.draggables.clear();
    }
}
