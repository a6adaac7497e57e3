//! Structural layer: canvas ↔ [`Snapshot`] through a handle-keyed table.
//!
//! Every variant is an entry `{construct, serialize, deserialize}` keyed by
//! its handle. Entries share the base [`serialize_item`] / [`deserialize_item`]
//! pair and call it explicitly before adding their own fields, so a new
//! variant is added with [`StructuralSerializer::register`] alone.

#[cfg(test)]
#[path = "structural_test.rs"]
mod structural_test;

use std::collections::HashMap;
use std::fmt;

use snapshot::{Anchors, ConnectionTuple, ItemRecord, Snapshot, WHOLE_CONTAINER};
use tracing::{debug, warn};

use super::{CanvasSerializer, SnapshotError};
use crate::canvas::Canvas;
use crate::consts::{HANDLE_CUSTOM, HANDLE_DB, HANDLE_EXCLUSIVE_CHOICE, HANDLE_IMAGE, HANDLE_ITEM, HANDLE_MAIL};
use crate::engine::{ConnectTarget, Connection, EndpointId, Role, RoutingEngine};
use crate::item::{Endpoint, Item, ItemContent, ItemId, ItemMut};
use crate::variants::Variant;

/// Builds a fresh item with the given id from a record.
pub type ConstructFn<E> = fn(&mut Canvas<E>, ItemId, &ItemRecord) -> Result<ItemId, SnapshotError>;
/// Writes an item's fields into a record.
pub type SerializeFn = fn(&Item, &mut ItemRecord);
/// Restores an item's fields from a record after construction.
pub type DeserializeFn<E> = for<'a, 'b> fn(&'b mut ItemMut<'a, E>, &ItemRecord);

/// One row of the dispatch table.
pub struct VariantCodec<E: RoutingEngine> {
    pub construct: ConstructFn<E>,
    pub serialize: SerializeFn,
    pub deserialize: DeserializeFn<E>,
}

/// Maps a canvas to a [`Snapshot`] and back.
pub struct StructuralSerializer<E: RoutingEngine> {
    codecs: HashMap<&'static str, VariantCodec<E>>,
}

impl<E: RoutingEngine> fmt::Debug for StructuralSerializer<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut handles: Vec<&str> = self.codecs.keys().copied().collect();
        handles.sort_unstable();
        f.debug_struct("StructuralSerializer").field("handles", &handles).finish()
    }
}

impl<E: RoutingEngine> Default for StructuralSerializer<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: RoutingEngine> StructuralSerializer<E> {
    /// A serializer knowing every built-in variant.
    #[must_use]
    pub fn new() -> Self {
        let mut serializer = Self { codecs: HashMap::new() };
        serializer.register(
            HANDLE_ITEM,
            VariantCodec { construct: construct_item, serialize: serialize_item, deserialize: deserialize_item },
        );
        serializer.register(
            HANDLE_CUSTOM,
            VariantCodec { construct: construct_custom, serialize: serialize_custom, deserialize: deserialize_item },
        );
        serializer.register(
            HANDLE_IMAGE,
            VariantCodec { construct: construct_image, serialize: serialize_image, deserialize: deserialize_item },
        );
        serializer.register(
            HANDLE_EXCLUSIVE_CHOICE,
            VariantCodec {
                construct: construct_exclusive_choice,
                serialize: serialize_image,
                deserialize: deserialize_item,
            },
        );
        serializer.register(
            HANDLE_MAIL,
            VariantCodec { construct: construct_mail, serialize: serialize_image, deserialize: deserialize_item },
        );
        serializer.register(
            HANDLE_DB,
            VariantCodec { construct: construct_db, serialize: serialize_image, deserialize: deserialize_item },
        );
        serializer
    }

    /// Add or replace the entry for `handle`.
    pub fn register(&mut self, handle: &'static str, codec: VariantCodec<E>) {
        self.codecs.insert(handle, codec);
    }

    /// Whether an entry exists for `handle`.
    #[must_use]
    pub fn handles(&self, handle: &str) -> bool {
        self.codecs.contains_key(handle)
    }

    fn codec(&self, handle: &str) -> Result<&VariantCodec<E>, SnapshotError> {
        self.codecs.get(handle).ok_or_else(|| SnapshotError::UnknownHandle(handle.to_owned()))
    }

    /// Serialize one item through its table entry.
    ///
    /// # Errors
    ///
    /// [`SnapshotError::UnknownHandle`] if the item's handle is not registered.
    pub fn serialize_record(&self, item: &Item) -> Result<ItemRecord, SnapshotError> {
        let codec = self.codec(item.handle())?;
        let mut record = ItemRecord::new(item.handle(), 0.0, 0.0);
        (codec.serialize)(item, &mut record);
        Ok(record)
    }

    fn rebuild(&self, canvas: &mut Canvas<E>, snapshot: &Snapshot) -> Result<(), SnapshotError> {
        for record in &snapshot.items {
            let codec = self.codec(&record.handle)?;
            let id = record.id.as_deref().map_or_else(ItemId::new, ItemId::from);
            if canvas.item(id.as_str()).is_some() {
                return Err(SnapshotError::DuplicateId(id.to_string()));
            }
            let id = (codec.construct)(canvas, id, record)?;
            if let Some(mut item) = canvas.item_mut(id.as_str()) {
                (codec.deserialize)(&mut item, record);
            }
        }
        for tuple in &snapshot.connections {
            replay_connection(canvas, tuple)?;
        }
        debug!(items = snapshot.items.len(), connections = snapshot.connections.len(), "canvas rebuilt");
        Ok(())
    }
}

impl<E: RoutingEngine> CanvasSerializer<E> for StructuralSerializer<E> {
    type Data = Snapshot;
    type Error = SnapshotError;

    fn serialize_canvas(&self, canvas: &Canvas<E>) -> Result<Snapshot, SnapshotError> {
        let items = canvas
            .items()
            .into_iter()
            .map(|item| self.serialize_record(item))
            .collect::<Result<Vec<_>, _>>()?;
        let connections = canvas
            .engine()
            .connections()
            .iter()
            .filter_map(|conn| resolve_connection(canvas, conn))
            .collect();
        Ok(Snapshot { items, connections })
    }

    fn deserialize_canvas(&self, canvas: &mut Canvas<E>, snapshot: &Snapshot) -> Result<(), SnapshotError> {
        canvas.clear();
        let result = self.rebuild(canvas, snapshot);
        if let Err(err) = &result {
            warn!(error = %err, "snapshot rejected; canvas cleared");
            canvas.clear();
        }
        result
    }
}

// =============================================================================
// CONNECTIONS
// =============================================================================

fn index_of(index: usize) -> i32 {
    i32::try_from(index).unwrap_or(i32::MAX)
}

/// Turn an engine connection into a tuple, or `None` if either end is not an
/// item endpoint on this canvas.
fn resolve_connection<E: RoutingEngine>(canvas: &Canvas<E>, conn: &Connection) -> Option<ConnectionTuple> {
    let engine = canvas.engine();
    let owner = |endpoint: EndpointId| engine.endpoint_owner(endpoint).and_then(|el| canvas.item_by_container(el));

    let Some(source) = owner(conn.source) else {
        warn!(endpoint = ?conn.source, "connection source has no owning item");
        return None;
    };
    let source_index = source.endpoint_index(conn.source, Role::Source)?;

    let (target, target_index) = match conn.target {
        ConnectTarget::Endpoint(endpoint) => {
            let target = owner(endpoint)?;
            (target, index_of(target.endpoint_index(endpoint, Role::Target)?))
        }
        ConnectTarget::Container(container) => (canvas.item_by_container(container)?, WHOLE_CONTAINER),
    };
    Some(ConnectionTuple::new(source.id().as_str(), index_of(source_index), target.id().as_str(), target_index))
}

fn endpoint_at(endpoints: &[Endpoint], item: &str, index: i32) -> Result<EndpointId, SnapshotError> {
    let found = match usize::try_from(index) {
        Ok(i) => endpoints.get(i),
        Err(_) => None,
    };
    found.map(|e| e.id).ok_or_else(|| SnapshotError::DanglingEndpoint { item: item.to_owned(), index })
}

fn replay_connection<E: RoutingEngine>(canvas: &mut Canvas<E>, tuple: &ConnectionTuple) -> Result<(), SnapshotError> {
    let lookup = |id: &str| canvas.item(id).ok_or_else(|| SnapshotError::DanglingItem(id.to_owned()));
    let source = lookup(tuple.source())?;
    let target = lookup(tuple.target())?;

    let from = endpoint_at(source.outputs(), tuple.source(), tuple.source_index())?;
    let to = if tuple.targets_container() {
        if !target.is_target() {
            return Err(SnapshotError::DanglingEndpoint { item: tuple.target().to_owned(), index: WHOLE_CONTAINER });
        }
        ConnectTarget::Container(target.container())
    } else {
        ConnectTarget::Endpoint(endpoint_at(target.inputs(), tuple.target(), tuple.target_index())?)
    };

    canvas.connect_endpoints(from, to).map(|_| ()).ok_or_else(|| SnapshotError::ConnectionRejected {
        source_item: tuple.source().to_owned(),
        target_item: tuple.target().to_owned(),
    })
}

// =============================================================================
// BASE ENTRY
// =============================================================================

/// Shared fields: id, geometry, overlay and the endpoint layout.
pub fn serialize_item(item: &Item, record: &mut ItemRecord) {
    let pos = item.pos();
    record.id = Some(item.id().to_string());
    record.top = pos.top;
    record.left = pos.left;
    record.width = Some(item.width());
    record.height = Some(item.height());
    record.overlay = item.has_overlay();
    record.inputs = Some(Anchors::from(item.inputs().iter().map(|e| e.anchor).collect::<Vec<_>>()));
    record.outputs = Some(Anchors::from(item.outputs().iter().map(|e| e.anchor).collect::<Vec<_>>()));
    record.target_anchor = item.target_anchor();
}

/// Restore position and overlay, then any recorded endpoint layout over the
/// variant's defaults.
pub fn deserialize_item<E: RoutingEngine>(item: &mut ItemMut<'_, E>, record: &ItemRecord) {
    item.set_pos(record.top, record.left);
    item.overlay(record.overlay);

    if record.inputs.is_some() || record.outputs.is_some() {
        let current = |list: &[Endpoint]| Anchors::from(list.iter().map(|e| e.anchor).collect::<Vec<_>>());
        let inputs = record.inputs.clone().unwrap_or_else(|| current(item.inputs()));
        let outputs = record.outputs.clone().unwrap_or_else(|| current(item.outputs()));
        item.anchor(inputs, outputs);
    }
    if let Some(anchor) = record.target_anchor {
        item.make_target(Some(anchor));
    }
}

/// Base fields plus the bitmap URL.
pub fn serialize_image(item: &Item, record: &mut ItemRecord) {
    serialize_item(item, record);
    if let ItemContent::Image { src } = item.content() {
        record.src = Some(src.clone());
    }
}

/// Base fields plus the raw markup.
pub fn serialize_custom(item: &Item, record: &mut ItemRecord) {
    serialize_item(item, record);
    if let ItemContent::Markup(markup) = item.content() {
        record.div = Some(markup.clone());
    }
}

// =============================================================================
// CONSTRUCTORS
// =============================================================================

fn construct<E: RoutingEngine>(
    canvas: &mut Canvas<E>,
    id: ItemId,
    record: &ItemRecord,
    variant: Variant,
) -> Result<ItemId, SnapshotError> {
    canvas
        .create_with_id(id.clone(), variant, record.width, record.height)
        .ok_or_else(|| SnapshotError::DuplicateId(id.to_string()))
}

fn required<'r>(record: &'r ItemRecord, field: &'static str, value: Option<&'r String>) -> Result<&'r str, SnapshotError> {
    value
        .map(String::as_str)
        .ok_or_else(|| SnapshotError::MissingField { handle: record.handle.clone(), field })
}

fn construct_item<E: RoutingEngine>(canvas: &mut Canvas<E>, id: ItemId, record: &ItemRecord) -> Result<ItemId, SnapshotError> {
    construct(canvas, id, record, Variant::Item)
}

fn construct_custom<E: RoutingEngine>(canvas: &mut Canvas<E>, id: ItemId, record: &ItemRecord) -> Result<ItemId, SnapshotError> {
    let markup = required(record, "div", record.div.as_ref())?.to_owned();
    construct(canvas, id, record, Variant::Custom { markup })
}

fn construct_image<E: RoutingEngine>(canvas: &mut Canvas<E>, id: ItemId, record: &ItemRecord) -> Result<ItemId, SnapshotError> {
    let src = required(record, "src", record.src.as_ref())?.to_owned();
    construct(canvas, id, record, Variant::Image { src })
}

/// Presets default to the configured icon; a recorded `src` wins.
fn construct_preset<E: RoutingEngine>(
    canvas: &mut Canvas<E>,
    id: ItemId,
    record: &ItemRecord,
    variant: Variant,
) -> Result<ItemId, SnapshotError> {
    let id = construct(canvas, id, record, variant)?;
    if let (Some(src), Some(mut item)) = (&record.src, canvas.item_mut(id.as_str())) {
        item.set_image_src(src.as_str());
    }
    Ok(id)
}

fn construct_exclusive_choice<E: RoutingEngine>(
    canvas: &mut Canvas<E>,
    id: ItemId,
    record: &ItemRecord,
) -> Result<ItemId, SnapshotError> {
    construct_preset(canvas, id, record, Variant::ExclusiveChoice)
}

fn construct_mail<E: RoutingEngine>(canvas: &mut Canvas<E>, id: ItemId, record: &ItemRecord) -> Result<ItemId, SnapshotError> {
    construct_preset(canvas, id, record, Variant::Mail)
}

fn construct_db<E: RoutingEngine>(canvas: &mut Canvas<E>, id: ItemId, record: &ItemRecord) -> Result<ItemId, SnapshotError> {
    construct_preset(canvas, id, record, Variant::Db)
}
