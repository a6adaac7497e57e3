//! Textual layer: a structural serializer plus a [`Codec`].
//!
//! `serialize_canvas` encodes what the inner layer produces and
//! `deserialize_canvas` decodes before handing the snapshot down. The codec
//! can be swapped without touching the inner layer. Undecodable data clears
//! the canvas just like a rejected snapshot does.

#[cfg(test)]
#[path = "encoded_test.rs"]
mod encoded_test;

use snapshot::{Codec, CodecError, JsonCodec, ProtoCodec, Snapshot};

use super::structural::StructuralSerializer;
use super::{CanvasSerializer, SnapshotError};
use crate::canvas::Canvas;
use crate::engine::RoutingEngine;

#[derive(Debug, thiserror::Error)]
pub enum TextError {
    /// The encoded data could not be decoded into a snapshot.
    #[error(transparent)]
    Decode(#[from] CodecError),
    /// The snapshot decoded but could not be applied to the canvas.
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

/// A structural layer `S` behind codec `C`.
#[derive(Debug, Default)]
pub struct EncodedSerializer<S, C> {
    inner: S,
    codec: C,
}

/// Structural layer behind JSON text.
pub type JsonSerializer<E> = EncodedSerializer<StructuralSerializer<E>, JsonCodec>;
/// Structural layer behind the protobuf envelope.
pub type ProtoSerializer<E> = EncodedSerializer<StructuralSerializer<E>, ProtoCodec>;

impl<S, C> EncodedSerializer<S, C> {
    #[must_use]
    pub fn new(inner: S, codec: C) -> Self {
        Self { inner, codec }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Mutable access to the inner layer, e.g. to register variants.
    pub fn inner_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }
}

impl<E, S, C> CanvasSerializer<E> for EncodedSerializer<S, C>
where
    E: RoutingEngine,
    S: CanvasSerializer<E, Data = Snapshot, Error = SnapshotError>,
    C: Codec,
{
    type Data = C::Encoded;
    type Error = TextError;

    fn serialize_canvas(&self, canvas: &Canvas<E>) -> Result<C::Encoded, TextError> {
        let snapshot = self.inner.serialize_canvas(canvas)?;
        Ok(self.codec.encode(&snapshot)?)
    }

    fn deserialize_canvas(&self, canvas: &mut Canvas<E>, data: &C::Encoded) -> Result<(), TextError> {
        let snapshot = match self.codec.decode(data) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                canvas.clear();
                return Err(err.into());
            }
        };
        self.inner.deserialize_canvas(canvas, &snapshot)?;
        Ok(())
    }
}
