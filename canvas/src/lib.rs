//! Core of the flow-diagram editor: items, canvas and serialization.
//!
//! The crate models the diagram graph and its round-trip contract. Pixel
//! rendering, drag physics and connector routing belong to an external engine
//! reached through [`engine::RoutingEngine`]; in the browser that is a host JS
//! object wrapped by [`bindings::JsEngine`], everywhere else the in-process
//! [`memory::MemoryEngine`].
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`canvas`] | Canvas: surface, items, viewport, connections, hit-testing |
//! | [`item`] | Item model, endpoints and the engine-aware [`item::ItemMut`] view |
//! | [`variants`] | Built-in variants (image, custom, mail, db, exclusive choice) |
//! | [`serialize`] | Structural and encoded serializers |
//! | [`event`] | Per-object named events with cancelable dispatch |
//! | [`engine`] | Routing-engine seam |
//! | [`memory`] | In-process routing engine |
//! | [`bindings`] | `wasm-bindgen` exports and the JS-backed engine |
//! | [`surface`] | Element tree of the canvas |
//! | [`viewport`] | Scroll/zoom window and coordinate conversions |
//! | [`input`] | Pointer events and the click-versus-drag tracker |
//! | [`hit`] | Hit-testing against items |
//! | [`config`] | Sizes and icon locations, with environment overrides |
//! | [`consts`] | Handles, element classes and defaults |

pub mod bindings;
pub mod canvas;
pub mod config;
pub mod consts;
pub mod engine;
pub mod event;
pub mod hit;
pub mod input;
pub mod item;
pub mod memory;
pub mod serialize;
pub mod surface;
pub mod variants;
pub mod viewport;

pub use canvas::Canvas;
pub use config::{CanvasConfig, ConfigError};
pub use item::{Item, ItemContent, ItemId, ItemMut};
pub use memory::MemoryEngine;
pub use serialize::{CanvasSerializer, JsonSerializer, ProtoSerializer, SnapshotError, StructuralSerializer, TextError};
pub use variants::Variant;
