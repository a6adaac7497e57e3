//! Snapshot codecs: JSON text and protobuf binary.
//!
//! Both codecs decode in two steps so callers can tell a malformed payload
//! (`Syntax` / `Decode`) apart from a well-formed payload that is not a
//! snapshot (`Shape`).

#[cfg(test)]
#[path = "codec_test.rs"]
mod codec_test;

use prost::Message;
use serde_json::{Map, Value};

use crate::model::Snapshot;

/// Envelope version written by [`ProtoCodec`].
pub const SNAPSHOT_WIRE_VERSION: u32 = 1;

/// Error returned by [`Codec`] implementations.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The text is not valid JSON.
    #[error("malformed snapshot text: {0}")]
    Syntax(#[source] serde_json::Error),
    /// The payload parsed but does not have the shape of a snapshot.
    #[error("payload is not a snapshot: {0}")]
    Shape(#[source] serde_json::Error),
    /// The snapshot could not be written out.
    #[error("failed to encode snapshot: {0}")]
    Encode(#[source] serde_json::Error),
    /// The raw bytes could not be decoded as a protobuf envelope.
    #[error("failed to decode protobuf snapshot: {0}")]
    Decode(#[from] prost::DecodeError),
    /// The envelope was written by a newer or unknown protocol revision.
    #[error("unsupported snapshot wire version: {0}")]
    UnsupportedVersion(u32),
}

/// Converts a [`Snapshot`] to an encoded form and back.
pub trait Codec {
    /// The encoded representation (`String`, `Vec<u8>`, ...).
    type Encoded;

    /// Encode a snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Encode`] if the snapshot cannot be represented.
    fn encode(&self, snapshot: &Snapshot) -> Result<Self::Encoded, CodecError>;

    /// Decode a snapshot.
    ///
    /// # Errors
    ///
    /// Returns a syntax-level error for malformed input and
    /// [`CodecError::Shape`] for well-formed input that is not a snapshot.
    fn decode(&self, data: &Self::Encoded) -> Result<Snapshot, CodecError>;
}

/// JSON text codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec {
    /// Emit indented output instead of a single line.
    pub pretty: bool,
}

impl JsonCodec {
    #[must_use]
    pub fn pretty() -> Self {
        Self { pretty: true }
    }

    /// Decode from a borrowed string.
    ///
    /// # Errors
    ///
    /// [`CodecError::Syntax`] for invalid JSON, [`CodecError::Shape`] otherwise.
    pub fn decode_str(&self, text: &str) -> Result<Snapshot, CodecError> {
        let value: Value = serde_json::from_str(text).map_err(CodecError::Syntax)?;
        serde_json::from_value(value).map_err(CodecError::Shape)
    }
}

impl Codec for JsonCodec {
    type Encoded = String;

    fn encode(&self, snapshot: &Snapshot) -> Result<String, CodecError> {
        let text = if self.pretty {
            serde_json::to_string_pretty(snapshot)
        } else {
            serde_json::to_string(snapshot)
        };
        text.map_err(CodecError::Encode)
    }

    fn decode(&self, data: &String) -> Result<Snapshot, CodecError> {
        self.decode_str(data)
    }
}

/// Protobuf codec: the snapshot tree as a `google.protobuf.Value` inside a
/// versioned envelope.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProtoCodec;

impl ProtoCodec {
    /// Decode from a borrowed byte slice.
    ///
    /// # Errors
    ///
    /// [`CodecError::Decode`] for malformed bytes,
    /// [`CodecError::UnsupportedVersion`] for unknown envelopes and
    /// [`CodecError::Shape`] when the payload is not a snapshot.
    pub fn decode_bytes(&self, bytes: &[u8]) -> Result<Snapshot, CodecError> {
        let wire = WireSnapshot::decode(bytes)?;
        if wire.version != SNAPSHOT_WIRE_VERSION {
            return Err(CodecError::UnsupportedVersion(wire.version));
        }
        let value = wire.data.map_or(Value::Null, |v| proto_to_json_value(&v));
        serde_json::from_value(value).map_err(CodecError::Shape)
    }
}

impl Codec for ProtoCodec {
    type Encoded = Vec<u8>;

    fn encode(&self, snapshot: &Snapshot) -> Result<Vec<u8>, CodecError> {
        let value = serde_json::to_value(snapshot).map_err(CodecError::Encode)?;
        let wire = WireSnapshot { version: SNAPSHOT_WIRE_VERSION, data: Some(json_to_proto_value(&value)) };
        Ok(wire.encode_to_vec())
    }

    fn decode(&self, data: &Vec<u8>) -> Result<Snapshot, CodecError> {
        self.decode_bytes(data)
    }
}

fn json_to_proto_value(value: &Value) -> prost_types::Value {
    let kind = match value {
        Value::Null => prost_types::value::Kind::NullValue(prost_types::NullValue::NullValue as i32),
        Value::Bool(v) => prost_types::value::Kind::BoolValue(*v),
        Value::Number(v) => prost_types::value::Kind::NumberValue(v.as_f64().unwrap_or(0.0)),
        Value::String(v) => prost_types::value::Kind::StringValue(v.clone()),
        Value::Array(v) => prost_types::value::Kind::ListValue(prost_types::ListValue {
            values: v.iter().map(json_to_proto_value).collect(),
        }),
        Value::Object(v) => prost_types::value::Kind::StructValue(prost_types::Struct {
            fields: v.iter().map(|(k, v)| (k.clone(), json_to_proto_value(v))).collect(),
        }),
    };

    prost_types::Value { kind: Some(kind) }
}

/// Largest magnitude at which every integer is exactly representable in `f64`.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

fn proto_to_json_value(value: &prost_types::Value) -> Value {
    let Some(kind) = &value.kind else {
        return Value::Null;
    };

    match kind {
        prost_types::value::Kind::NullValue(_) => Value::Null,
        prost_types::value::Kind::NumberValue(v) => number_to_json(*v),
        prost_types::value::Kind::StringValue(v) => Value::String(v.clone()),
        prost_types::value::Kind::BoolValue(v) => Value::Bool(*v),
        prost_types::value::Kind::StructValue(v) => {
            Value::Object(v.fields.iter().map(|(k, v)| (k.clone(), proto_to_json_value(v))).collect::<Map<_, _>>())
        }
        prost_types::value::Kind::ListValue(v) => Value::Array(v.values.iter().map(proto_to_json_value).collect()),
    }
}

// Protobuf carries every number as a double. Integral values come back as
// JSON integers so integer fields (endpoint indices) still deserialize.
fn number_to_json(v: f64) -> Value {
    if v.fract() == 0.0 && v.abs() <= MAX_SAFE_INTEGER {
        #[allow(clippy::cast_possible_truncation)]
        return Value::from(v as i64);
    }
    serde_json::Number::from_f64(v).map_or(Value::Null, Value::Number)
}

#[derive(Clone, PartialEq, Message)]
struct WireSnapshot {
    #[prost(uint32, tag = "1")]
    version: u32,
    #[prost(message, optional, tag = "2")]
    data: Option<prost_types::Value>,
}
