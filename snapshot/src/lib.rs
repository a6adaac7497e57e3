//! Snapshot wire model and codecs for persisted flow diagrams.
//!
//! This crate owns the declarative form of a diagram: the list of item records
//! and the connection tuples linking them. It knows nothing about live canvases
//! or routing engines; the `canvas` crate maps its object graph to and from
//! [`Snapshot`], and this crate turns a [`Snapshot`] into bytes or text.
//!
//! Two codecs ship behind the same [`Codec`] contract: [`JsonCodec`] (the
//! textual form used for persistence) and [`ProtoCodec`] (a compact binary
//! envelope carrying the same tree as a protobuf `Value`).

pub mod codec;
pub mod model;

pub use codec::{Codec, CodecError, JsonCodec, ProtoCodec, SNAPSHOT_WIRE_VERSION};
pub use model::{Anchor, Anchors, ConnectionTuple, Fingerprint, ItemRecord, Snapshot, WHOLE_CONTAINER};
