//! Shared constants for the canvas crate.

// ── Handles ─────────────────────────────────────────────────────

/// Handle of the plain item (no content-specific payload).
pub const HANDLE_ITEM: &str = "item";
/// Handle of an item wrapping pre-built markup.
pub const HANDLE_CUSTOM: &str = "custom";
/// Handle of an item wrapping a bitmap.
pub const HANDLE_IMAGE: &str = "image";
/// Handle of the binary-branch preset.
pub const HANDLE_EXCLUSIVE_CHOICE: &str = "exclusivechoice";
/// Handle of the mail drop-target preset.
pub const HANDLE_MAIL: &str = "mail";
/// Handle of the database drop-target preset.
pub const HANDLE_DB: &str = "db";

// ── Surface classes ─────────────────────────────────────────────

/// Class of the canvas surface root.
pub const CLASS_CANVAS: &str = "flowcanvas";
/// Class of an item's container element.
pub const CLASS_ITEM: &str = "flowcanvas-item";
/// Class of an item's content element.
pub const CLASS_CONTENT: &str = "flowcanvas-item-content";
/// Class of the overlay decoration element.
pub const CLASS_OVERLAY: &str = "flowcanvas-item-overlay";

// ── Defaults ────────────────────────────────────────────────────

/// Default item width when neither the caller nor the variant sets one.
pub const DEFAULT_ITEM_WIDTH: f64 = 100.0;
/// Default item height when neither the caller nor the variant sets one.
pub const DEFAULT_ITEM_HEIGHT: f64 = 100.0;
/// Edge length of the image presets (mail, db, exclusive choice).
pub const DEFAULT_ICON_SIZE: f64 = 64.0;
/// Where preset icons are served from; the preset URL is `{base}/{handle}.png`.
pub const DEFAULT_ICON_BASE: &str = "images";
/// Viewport size used until the host reports the real one.
pub const DEFAULT_VIEWPORT_WIDTH: f64 = 1024.0;
pub const DEFAULT_VIEWPORT_HEIGHT: f64 = 768.0;

// ── Endpoints ───────────────────────────────────────────────────

/// Connections an input endpoint accepts.
pub const INPUT_MAX_CONNECTIONS: Option<u32> = Some(1);
/// Connections an output endpoint accepts (`None` = unlimited).
pub const OUTPUT_MAX_CONNECTIONS: Option<u32> = None;

// ── Events ──────────────────────────────────────────────────────

/// Emitted by an item on press-release without intervening movement.
pub const EVENT_CLICK: &str = "click";
