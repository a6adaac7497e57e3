//! Snapshot data model: item records, connection tuples, anchor descriptors.
//!
//! `ItemRecord` is deliberately sparse. Only `handle`, `top`, `left` and
//! `overlay` are required on the wire; everything else is optional so older
//! snapshots (without ids or endpoint lists) still decode. Unknown keys are kept
//! in `extra` for variants registered outside this crate.

#[cfg(test)]
#[path = "model_test.rs"]
mod model_test;

use std::collections::HashMap;
use std::ops::Deref;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Endpoint index marking a connection that lands on a whole-container target.
pub const WHOLE_CONTAINER: i32 = -1;

/// Placement of an endpoint on an item's boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Anchor {
    TopLeft,
    TopCenter,
    TopRight,
    LeftMiddle,
    Center,
    RightMiddle,
    BottomLeft,
    BottomCenter,
    BottomRight,
    /// Floats around the boundary toward the other end of the connection.
    Continuous,
}

impl Anchor {
    /// The kebab-case wire name, e.g. `"left-middle"`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TopLeft => "top-left",
            Self::TopCenter => "top-center",
            Self::TopRight => "top-right",
            Self::LeftMiddle => "left-middle",
            Self::Center => "center",
            Self::RightMiddle => "right-middle",
            Self::BottomLeft => "bottom-left",
            Self::BottomCenter => "bottom-center",
            Self::BottomRight => "bottom-right",
            Self::Continuous => "continuous",
        }
    }
}

/// Ordered list of anchor descriptors.
///
/// Converts from a single anchor, a list, or `None` (empty). On the wire it
/// always serializes as an array but accepts a bare string too.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Anchors(Vec<Anchor>);

impl Anchors {
    /// An empty list.
    #[must_use]
    pub fn none() -> Self {
        Self(Vec::new())
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<Anchor> {
        self.0.clone()
    }
}

impl Deref for Anchors {
    type Target = [Anchor];

    fn deref(&self) -> &[Anchor] {
        &self.0
    }
}

impl From<Anchor> for Anchors {
    fn from(anchor: Anchor) -> Self {
        Self(vec![anchor])
    }
}

impl From<Option<Anchor>> for Anchors {
    fn from(anchor: Option<Anchor>) -> Self {
        Self(anchor.into_iter().collect())
    }
}

impl From<Vec<Anchor>> for Anchors {
    fn from(anchors: Vec<Anchor>) -> Self {
        Self(anchors)
    }
}

impl From<&[Anchor]> for Anchors {
    fn from(anchors: &[Anchor]) -> Self {
        Self(anchors.to_vec())
    }
}

impl<const N: usize> From<[Anchor; N]> for Anchors {
    fn from(anchors: [Anchor; N]) -> Self {
        Self(anchors.to_vec())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(Anchor),
    Many(Vec<Anchor>),
}

impl<'de> Deserialize<'de> for Anchors {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match OneOrMany::deserialize(deserializer)? {
            OneOrMany::One(anchor) => Self(vec![anchor]),
            OneOrMany::Many(anchors) => Self(anchors),
        })
    }
}

/// One item as stored in a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    /// Variant discriminator (`"mail"`, `"db"`, `"image"`, ...).
    pub handle: String,
    /// Item id; connection tuples refer to items by this value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub top: f64,
    pub left: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// Whether the overlay decoration is shown.
    #[serde(default)]
    pub overlay: bool,
    /// Anchors of the discrete input endpoints, in order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inputs: Option<Anchors>,
    /// Anchors of the output endpoints, in order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outputs: Option<Anchors>,
    /// Anchor style of a whole-container target, when the item is one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_anchor: Option<Anchor>,
    /// Bitmap URL for image-derived variants.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    /// Raw markup for the custom variant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub div: Option<String>,
    /// Fields owned by variants this crate does not know about.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ItemRecord {
    /// A bare record with only the required fields set.
    #[must_use]
    pub fn new(handle: impl Into<String>, top: f64, left: f64) -> Self {
        Self {
            handle: handle.into(),
            id: None,
            top,
            left,
            width: None,
            height: None,
            overlay: false,
            inputs: None,
            outputs: None,
            target_anchor: None,
            src: None,
            div: None,
            extra: Map::new(),
        }
    }
}

/// `[source id, source endpoint index, target id, target endpoint index]`.
///
/// The target index is [`WHOLE_CONTAINER`] when the destination accepts
/// connections on its whole body.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionTuple(pub String, pub i32, pub String, pub i32);

impl ConnectionTuple {
    #[must_use]
    pub fn new(source: impl Into<String>, source_index: i32, target: impl Into<String>, target_index: i32) -> Self {
        Self(source.into(), source_index, target.into(), target_index)
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn source_index(&self) -> i32 {
        self.1
    }

    #[must_use]
    pub fn target(&self) -> &str {
        &self.2
    }

    #[must_use]
    pub fn target_index(&self) -> i32 {
        self.3
    }

    /// Whether the connection lands on a whole-container target.
    #[must_use]
    pub fn targets_container(&self) -> bool {
        self.3 == WHOLE_CONTAINER
    }
}

/// All items and connections of a canvas at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub items: Vec<ItemRecord>,
    #[serde(default)]
    pub connections: Vec<ConnectionTuple>,
}

type ItemKey = (String, u64, u64, bool);

/// Order-independent summary of a snapshot.
///
/// Two snapshots with equal fingerprints describe isomorphic graphs: the same
/// multiset of `(handle, top, left, overlay)` items and the same connections
/// once item ids are replaced by those item keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fingerprint {
    items: Vec<ItemKey>,
    connections: Vec<(Option<ItemKey>, i32, Option<ItemKey>, i32)>,
}

fn item_key(record: &ItemRecord) -> ItemKey {
    // +0.0 folds -0.0 into 0.0 so equal positions hash the same.
    (record.handle.clone(), (record.top + 0.0).to_bits(), (record.left + 0.0).to_bits(), record.overlay)
}

impl Snapshot {
    /// Compute the order-independent [`Fingerprint`] of this snapshot.
    #[must_use]
    pub fn fingerprint(&self) -> Fingerprint {
        let by_id: HashMap<&str, ItemKey> = self
            .items
            .iter()
            .filter_map(|r| r.id.as_deref().map(|id| (id, item_key(r))))
            .collect();

        let mut items: Vec<ItemKey> = self.items.iter().map(item_key).collect();
        items.sort();

        let mut connections: Vec<_> = self
            .connections
            .iter()
            .map(|c| (by_id.get(c.source()).cloned(), c.source_index(), by_id.get(c.target()).cloned(), c.target_index()))
            .collect();
        connections.sort();

        Fingerprint { items, connections }
    }

    /// Whether `other` describes the same graph, ignoring item order and ids.
    #[must_use]
    pub fn is_isomorphic(&self, other: &Snapshot) -> bool {
        self.fingerprint() == other.fingerprint()
    }
}
