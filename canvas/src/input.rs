//! Input model: pointer events and the click-versus-drag gesture machine.
//!
//! The host forwards raw pointer callbacks for an item. Between press and
//! release the external drag engine may move the item; any movement in that
//! window turns the gesture into a drag, and only an undisturbed
//! press-release pair counts as a click. No timers are involved.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::surface::ElementId;
use crate::viewport::Point;

/// A pointer event as reported by the host.
///
/// Browsers disagree on which field names the element under the pointer:
/// `to_element` and `related_target` are set by some engines, while `target`
/// is frequently the helper element being dragged. All three are optional.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerEvent {
    /// Screen-space x relative to the canvas element.
    pub x: f64,
    /// Screen-space y relative to the canvas element.
    pub y: f64,
    pub target: Option<ElementId>,
    pub to_element: Option<ElementId>,
    pub related_target: Option<ElementId>,
}

impl PointerEvent {
    /// An event at a screen position with no element information.
    #[must_use]
    pub fn at(x: f64, y: f64) -> Self {
        Self { x, y, ..Self::default() }
    }

    #[must_use]
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Gesture currently tracked for one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Gesture {
    /// No button held.
    #[default]
    Idle,
    /// Button held, no movement yet.
    Pressed,
    /// Button held and the pointer moved.
    Dragging,
}

/// Distinguishes clicks from drags across press/move/release callbacks.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClickTracker {
    gesture: Gesture,
}

impl ClickTracker {
    /// Pointer pressed on the item; re-arms the tracker.
    pub fn press(&mut self) {
        self.gesture = Gesture::Pressed;
    }

    /// Pointer moved. Only counts while the button is held.
    pub fn movement(&mut self) {
        if self.gesture == Gesture::Pressed {
            self.gesture = Gesture::Dragging;
        }
    }

    /// Pointer released. Returns `true` if the gesture was a click.
    pub fn release(&mut self) -> bool {
        let clicked = self.gesture == Gesture::Pressed;
        self.gesture = Gesture::Idle;
        clicked
    }

    #[must_use]
    pub fn gesture(&self) -> Gesture {
        self.gesture
    }
}
