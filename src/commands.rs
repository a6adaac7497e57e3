//! Snapshot file operations behind the CLI subcommands.
//!
//! Every command goes through a real rebuild: the file is decoded, replayed
//! into a [`Canvas`] backed by a [`MemoryEngine`], and whatever is printed or
//! written afterwards comes from that canvas rather than from the raw input.
//! A snapshot that decodes but cannot be rebuilt is therefore reported the
//! same way an editor would report it.

#[cfg(test)]
#[path = "commands_test.rs"]
mod commands_test;

use std::fmt::Write as _;
use std::path::Path;

use canvas::{Canvas, CanvasConfig, CanvasSerializer, MemoryEngine, StructuralSerializer};
use clap::ValueEnum;
use snapshot::{Codec, JsonCodec, ProtoCodec, Snapshot};

use crate::CliError;

/// On-disk snapshot encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Json,
    Proto,
}

impl Format {
    /// Guess the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Some(Self::Json),
            Some("pb" | "bin") => Some(Self::Proto),
            _ => None,
        }
    }
}

/// Command-line values layered over `env`, validated like the environment.
pub fn layered_config(
    viewport_width: Option<f64>,
    viewport_height: Option<f64>,
    icon_base: Option<String>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<CanvasConfig, CliError> {
    let overrides = [
        ("FLOWCANVAS_VIEWPORT_WIDTH", viewport_width.map(|v| v.to_string())),
        ("FLOWCANVAS_VIEWPORT_HEIGHT", viewport_height.map(|v| v.to_string())),
        ("FLOWCANVAS_ICON_BASE", icon_base),
    ];
    let config = CanvasConfig::from_lookup(|key| {
        overrides
            .iter()
            .find(|(name, _)| *name == key)
            .and_then(|(_, value)| value.clone())
            .or_else(|| env(key))
    })?;
    Ok(config)
}

/// An explicit `--from`/`--to` wins over the extension.
pub fn resolve_format(path: &Path, explicit: Option<Format>) -> Result<Format, CliError> {
    explicit.or_else(|| Format::from_path(path)).ok_or_else(|| CliError::UnknownFormat(path.to_path_buf()))
}

pub fn read(path: &Path) -> Result<Vec<u8>, CliError> {
    std::fs::read(path).map_err(|source| CliError::Read { path: path.to_path_buf(), source })
}

pub fn decode(bytes: &[u8], format: Format) -> Result<Snapshot, CliError> {
    let snapshot = match format {
        Format::Json => JsonCodec::default().decode_str(std::str::from_utf8(bytes)?)?,
        Format::Proto => ProtoCodec.decode_bytes(bytes)?,
    };
    Ok(snapshot)
}

/// Decode `bytes` and replay them into a fresh canvas.
pub fn rebuild(bytes: &[u8], format: Format, config: CanvasConfig) -> Result<Canvas<MemoryEngine>, CliError> {
    let snapshot = decode(bytes, format)?;
    let mut canvas = Canvas::with_config(MemoryEngine::new(), config);
    canvas.deserialize(&StructuralSerializer::<MemoryEngine>::new(), &snapshot)?;
    tracing::debug!(items = canvas.len(), connections = snapshot.connections.len(), "rebuilt canvas");
    Ok(canvas)
}

/// The canvas as it would be persisted.
pub fn listing(canvas: &Canvas<MemoryEngine>) -> Result<Snapshot, CliError> {
    Ok(canvas.serialize(&StructuralSerializer::<MemoryEngine>::new())?)
}

pub fn encode(canvas: &Canvas<MemoryEngine>, format: Format) -> Result<Vec<u8>, CliError> {
    let snapshot = listing(canvas)?;
    let bytes = match format {
        Format::Json => JsonCodec::pretty().encode(&snapshot)?.into_bytes(),
        Format::Proto => ProtoCodec.encode(&snapshot)?,
    };
    Ok(bytes)
}

/// Human-readable listing: one line per item, then one per connection.
pub fn describe(canvas: &Canvas<MemoryEngine>) -> Result<String, CliError> {
    let snapshot = listing(canvas)?;
    let mut out = String::new();
    for record in &snapshot.items {
        let id = record.id.as_deref().unwrap_or("-");
        let inputs = record.inputs.as_ref().map_or(0, |a| a.len());
        let outputs = record.outputs.as_ref().map_or(0, |a| a.len());
        let target = if record.target_anchor.is_some() { " target" } else { "" };
        let overlay = if record.overlay { " overlay" } else { "" };
        writeln!(
            out,
            "{id} {handle} @ ({top}, {left}) in={inputs} out={outputs}{target}{overlay}",
            handle = record.handle,
            top = record.top,
            left = record.left,
        )?;
    }
    for conn in &snapshot.connections {
        let target = if conn.targets_container() {
            conn.target().to_owned()
        } else {
            format!("{}[{}]", conn.target(), conn.target_index())
        };
        writeln!(out, "{}[{}] -> {target}", conn.source(), conn.source_index())?;
    }
    writeln!(out, "{} items, {} connections", snapshot.items.len(), snapshot.connections.len())?;
    Ok(out)
}

/// Rebuild, re-serialize and compare. Returns the item count on success.
pub fn check(bytes: &[u8], format: Format, config: CanvasConfig) -> Result<usize, CliError> {
    let input = decode(bytes, format)?;
    let mut canvas = Canvas::with_config(MemoryEngine::new(), config);
    let serializer = StructuralSerializer::<MemoryEngine>::new();
    serializer.deserialize_canvas(&mut canvas, &input)?;
    let rebuilt = serializer.serialize_canvas(&canvas)?;
    if !input.is_isomorphic(&rebuilt) {
        tracing::warn!(
            before = input.items.len(),
            after = rebuilt.items.len(),
            "rebuilt snapshot is not isomorphic"
        );
        return Err(CliError::NotIsomorphic);
    }
    Ok(rebuilt.items.len())
}
