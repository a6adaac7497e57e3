#![allow(clippy::float_cmp)]

use super::*;

// =============================================================
// PointerEvent
// =============================================================

#[test]
fn pointer_event_at_has_no_elements() {
    let ev = PointerEvent::at(3.0, 4.0);
    assert_eq!(ev.point(), Point::new(3.0, 4.0));
    assert!(ev.target.is_none());
    assert!(ev.to_element.is_none());
    assert!(ev.related_target.is_none());
}

// =============================================================
// ClickTracker
// =============================================================

#[test]
fn tracker_starts_idle() {
    assert_eq!(ClickTracker::default().gesture(), Gesture::Idle);
}

#[test]
fn press_release_is_a_click() {
    let mut t = ClickTracker::default();
    t.press();
    assert_eq!(t.gesture(), Gesture::Pressed);
    assert!(t.release());
    assert_eq!(t.gesture(), Gesture::Idle);
}

#[test]
fn press_move_release_is_not_a_click() {
    let mut t = ClickTracker::default();
    t.press();
    t.movement();
    assert_eq!(t.gesture(), Gesture::Dragging);
    assert!(!t.release());
}

#[test]
fn many_moves_still_one_drag() {
    let mut t = ClickTracker::default();
    t.press();
    t.movement();
    t.movement();
    t.movement();
    assert!(!t.release());
}

#[test]
fn release_without_press_is_not_a_click() {
    let mut t = ClickTracker::default();
    assert!(!t.release());
}

#[test]
fn hover_before_press_does_not_cancel_click() {
    let mut t = ClickTracker::default();
    t.movement();
    assert_eq!(t.gesture(), Gesture::Idle);
    t.press();
    assert!(t.release());
}

#[test]
fn new_press_rearms_after_drag() {
    let mut t = ClickTracker::default();
    t.press();
    t.movement();
    assert!(!t.release());
    t.press();
    assert!(t.release());
}
