//! Canvas configuration with environment overrides.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use tracing::warn;

use crate::consts::{
    DEFAULT_ICON_BASE, DEFAULT_ICON_SIZE, DEFAULT_ITEM_HEIGHT, DEFAULT_ITEM_WIDTH, DEFAULT_VIEWPORT_HEIGHT,
    DEFAULT_VIEWPORT_WIDTH,
};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("{key} must be a positive finite number, got {value}")]
    NotPositive { key: &'static str, value: f64 },
    #[error("{key} must not be empty")]
    Empty { key: &'static str },
}

/// Sizes and resource locations used when items are created.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasConfig {
    /// Viewport size used until the host reports the real one.
    pub viewport_width: f64,
    pub viewport_height: f64,
    /// Size of items whose variant does not fix its own.
    pub item_width: f64,
    pub item_height: f64,
    /// Edge length of the image presets.
    pub icon_size: f64,
    /// Base URL of the preset icons.
    pub icon_base: String,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            viewport_width: DEFAULT_VIEWPORT_WIDTH,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
            item_width: DEFAULT_ITEM_WIDTH,
            item_height: DEFAULT_ITEM_HEIGHT,
            icon_size: DEFAULT_ICON_SIZE,
            icon_base: DEFAULT_ICON_BASE.to_owned(),
        }
    }
}

impl CanvasConfig {
    /// Build config from environment variables.
    ///
    /// Optional:
    /// - `FLOWCANVAS_VIEWPORT_WIDTH` / `FLOWCANVAS_VIEWPORT_HEIGHT`: default 1024 × 768
    /// - `FLOWCANVAS_ITEM_WIDTH` / `FLOWCANVAS_ITEM_HEIGHT`: default 100 × 100
    /// - `FLOWCANVAS_ICON_SIZE`: default 64
    /// - `FLOWCANVAS_ICON_BASE`: default `images`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for non-positive sizes or an empty icon base.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| match std::env::var(key) {
            Ok(value) => Some(value),
            Err(_) => None,
        })
    }

    /// Build config from an arbitrary key lookup. Unparseable numbers fall
    /// back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for non-positive sizes or an empty icon base.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let number = |key: &'static str, default: f64| -> Result<f64, ConfigError> {
            let value = match lookup(key) {
                None => default,
                Some(raw) => match raw.trim().parse::<f64>() {
                    Ok(v) => v,
                    Err(_) => {
                        warn!(%key, %raw, "ignoring unparseable number");
                        default
                    }
                },
            };
            if value.is_finite() && value > 0.0 {
                Ok(value)
            } else {
                Err(ConfigError::NotPositive { key, value })
            }
        };

        let icon_base = lookup("FLOWCANVAS_ICON_BASE").unwrap_or_else(|| DEFAULT_ICON_BASE.to_owned());
        let icon_base = icon_base.trim_end_matches('/').to_owned();
        if icon_base.is_empty() {
            return Err(ConfigError::Empty { key: "FLOWCANVAS_ICON_BASE" });
        }

        Ok(Self {
            viewport_width: number("FLOWCANVAS_VIEWPORT_WIDTH", DEFAULT_VIEWPORT_WIDTH)?,
            viewport_height: number("FLOWCANVAS_VIEWPORT_HEIGHT", DEFAULT_VIEWPORT_HEIGHT)?,
            item_width: number("FLOWCANVAS_ITEM_WIDTH", DEFAULT_ITEM_WIDTH)?,
            item_height: number("FLOWCANVAS_ITEM_HEIGHT", DEFAULT_ITEM_HEIGHT)?,
            icon_size: number("FLOWCANVAS_ICON_SIZE", DEFAULT_ICON_SIZE)?,
            icon_base,
        })
    }

    /// URL of the icon shown by a preset variant.
    #[must_use]
    pub fn icon_url(&self, handle: &str) -> String {
        format!("{}/{handle}.png", self.icon_base)
    }
}
