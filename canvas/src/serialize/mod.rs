//! Serializers between a live canvas graph and snapshot data.
//!
//! DESIGN
//! ======
//! Two layers sit behind one two-method contract, [`CanvasSerializer`]:
//! [`structural::StructuralSerializer`] maps the canvas to a
//! [`snapshot::Snapshot`] tree, and [`encoded::EncodedSerializer`] wraps any
//! structural layer with a [`snapshot::Codec`] to produce text or bytes. The
//! canvas itself holds no serialization logic.
//!
//! ERROR HANDLING
//! ==============
//! Deserialization always starts from a cleared canvas. If any record or
//! connection fails, the canvas is cleared again before the error is returned
//! so callers never observe a half-built graph.

pub mod encoded;
pub mod structural;

pub use encoded::{EncodedSerializer, JsonSerializer, ProtoSerializer, TextError};
pub use structural::{StructuralSerializer, VariantCodec};

use crate::canvas::Canvas;
use crate::engine::RoutingEngine;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("no variant registered for handle {0:?}")]
    UnknownHandle(String),
    #[error("{handle} record is missing required field {field:?}")]
    MissingField { handle: String, field: &'static str },
    #[error("item id {0:?} appears more than once")]
    DuplicateId(String),
    #[error("connection refers to unknown item {0:?}")]
    DanglingItem(String),
    #[error("item {item:?} has no endpoint at index {index}")]
    DanglingEndpoint { item: String, index: i32 },
    #[error("engine refused connection from {source_item:?} to {target_item:?}")]
    ConnectionRejected { source_item: String, target_item: String },
}

impl SnapshotError {
    /// Stable machine-readable code for this error.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownHandle(_) => "E_UNKNOWN_HANDLE",
            Self::MissingField { .. } => "E_MISSING_FIELD",
            Self::DuplicateId(_) => "E_DUPLICATE_ID",
            Self::DanglingItem(_) => "E_DANGLING_ITEM",
            Self::DanglingEndpoint { .. } => "E_DANGLING_ENDPOINT",
            Self::ConnectionRejected { .. } => "E_CONNECTION_REJECTED",
        }
    }
}

/// Converts a canvas to some data form and back.
pub trait CanvasSerializer<E: RoutingEngine> {
    /// The produced representation.
    type Data;
    type Error;

    /// Capture every item and connection of `canvas`.
    ///
    /// # Errors
    ///
    /// Implementation-defined.
    fn serialize_canvas(&self, canvas: &Canvas<E>) -> Result<Self::Data, Self::Error>;

    /// Replace the contents of `canvas` with `data`.
    ///
    /// # Errors
    ///
    /// Implementation-defined; on error the canvas is left empty.
    fn deserialize_canvas(&self, canvas: &mut Canvas<E>, data: &Self::Data) -> Result<(), Self::Error>;
}
