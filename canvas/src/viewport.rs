#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use serde::{Deserialize, Serialize};

/// A point in either screen or world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Absolute position of an item inside the canvas (origin at top-left).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub top: f64,
    pub left: f64,
}

impl Position {
    #[must_use]
    pub fn new(top: f64, left: f64) -> Self {
        Self { top, left }
    }
}

/// The visible window onto the canvas.
///
/// `width` / `height` are the size of the canvas element in CSS pixels,
/// `scroll_top` / `scroll_left` the world coordinate at its top-left corner,
/// and `zoom` the scale factor (1.0 = no zoom).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub scroll_top: f64,
    pub scroll_left: f64,
    pub zoom: f64,
}

impl Viewport {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height, scroll_top: 0.0, scroll_left: 0.0, zoom: 1.0 }
    }

    /// Convert a screen-space point (CSS pixels relative to the canvas
    /// element) to world coordinates.
    #[must_use]
    pub fn screen_to_world(&self, screen: Point) -> Point {
        Point { x: screen.x / self.zoom + self.scroll_left, y: screen.y / self.zoom + self.scroll_top }
    }

    /// Convert a world-space point to screen coordinates.
    #[must_use]
    pub fn world_to_screen(&self, world: Point) -> Point {
        Point { x: (world.x - self.scroll_left) * self.zoom, y: (world.y - self.scroll_top) * self.zoom }
    }

    /// Whether a screen-space point falls on the canvas element.
    #[must_use]
    pub fn contains_screen(&self, screen: Point) -> bool {
        (0.0..=self.width).contains(&screen.x) && (0.0..=self.height).contains(&screen.y)
    }

    /// Position that centers a `width` × `height` box in the visible area.
    #[must_use]
    pub fn centered(&self, width: f64, height: f64) -> Position {
        Position {
            top: self.scroll_top + self.height / self.zoom / 2.0 - height / 2.0,
            left: self.scroll_left + self.width / self.zoom / 2.0 - width / 2.0,
        }
    }
}
