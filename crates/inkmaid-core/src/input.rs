//! Input events and gesture state for mouse/touch/wheel handling.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    /// Whether this is the button that starts a drag.
    pub fn is_primary(self) -> bool {
        self == MouseButton::Left
    }
}

/// Pointer event type for mouse input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        position: Point,
        button: MouseButton,
    },
    Up {
        position: Point,
        button: MouseButton,
    },
    Move {
        position: Point,
    },
    Scroll {
        position: Point,
        delta: Vec2,
    },
}

/// Lifecycle phase of a touch event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TouchPhase {
    Start,
    Move,
    End,
    Cancel,
}

/// A touch event carrying every touch point still active after it.
///
/// This mirrors the browser's `TouchEvent.touches` list: on `End` the lifted
/// finger is already gone from `touches`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TouchEvent {
    pub phase: TouchPhase,
    pub touches: Vec<Point>,
}

impl TouchEvent {
    pub fn new(phase: TouchPhase, touches: Vec<Point>) -> Self {
        Self { phase, touches }
    }
}

/// Whether the host should suppress native handling of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputResponse {
    /// The viewport used the event; prevent default and stop propagation.
    Consumed,
    /// The viewport had no use for the event.
    Ignored,
}

impl InputResponse {
    pub fn is_consumed(self) -> bool {
        self == InputResponse::Consumed
    }
}

/// Gesture session the viewport is in.
///
/// Dragging and pinching are separate variants so both can never be active
/// at the same time.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    /// Mouse button or single finger down.
    Dragging {
        /// Position where the drag started.
        start: Point,
        /// Last position a pan delta was taken from.
        last: Point,
    },
    /// Two fingers down.
    Pinching {
        /// Finger distance of the previous pinch frame.
        baseline: f64,
    },
}

impl GestureState {
    pub fn is_idle(&self) -> bool {
        matches!(self, GestureState::Idle)
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, GestureState::Dragging { .. })
    }

    pub fn is_pinching(&self) -> bool {
        matches!(self, GestureState::Pinching { .. })
    }
}

/// Euclidean distance between the first two touch points.
pub fn pinch_distance(touches: &[Point]) -> Option<f64> {
    match touches {
        [a, b, ..] => Some(a.distance(*b)),
        _ => None,
    }
}

/// Builds [`TouchEvent`] snapshots from per-finger platform events.
///
/// Windowing backends report one finger at a time; the viewport wants the
/// full list of active fingers, in the order they went down.
#[derive(Debug, Clone, Default)]
pub struct TouchTracker {
    active: Vec<(u64, Point)>,
}

impl TouchTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one finger's event and return the resulting snapshot.
    pub fn update(&mut self, id: u64, phase: TouchPhase, position: Point) -> TouchEvent {
        match phase {
            TouchPhase::Start => {
                if let Some(entry) = self.active.iter_mut().find(|(i, _)| *i == id) {
                    entry.1 = position;
                } else {
                    self.active.push((id, position));
                }
            }
            TouchPhase::Move => {
                if let Some(entry) = self.active.iter_mut().find(|(i, _)| *i == id) {
                    entry.1 = position;
                }
            }
            TouchPhase::End | TouchPhase::Cancel => {
                self.active.retain(|(i, _)| *i != id);
            }
        }
        TouchEvent::new(phase, self.positions())
    }

    /// Positions of all active fingers.
    pub fn positions(&self) -> Vec<Point> {
        self.active.iter().map(|(_, p)| *p).collect()
    }

    /// Forget every finger, e.g. after the window lost focus.
    pub fn clear(&mut self) {
        self.active.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_button() {
        assert!(MouseButton::Left.is_primary());
        assert!(!MouseButton::Right.is_primary());
        assert!(!MouseButton::Middle.is_primary());
    }

    #[test]
    fn test_gesture_state_predicates() {
        assert!(GestureState::default().is_idle());
        let drag = GestureState::Dragging {
            start: Point::ZERO,
            last: Point::ZERO,
        };
        assert!(drag.is_dragging());
        assert!(!drag.is_pinching());
        assert!(GestureState::Pinching { baseline: 10.0 }.is_pinching());
    }

    #[test]
    fn test_pinch_distance() {
        assert_eq!(pinch_distance(&[]), None);
        assert_eq!(pinch_distance(&[Point::ZERO]), None);

        let d = pinch_distance(&[Point::new(0.0, 0.0), Point::new(3.0, 4.0)]).unwrap();
        assert!((d - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_touch_tracker_order_and_removal() {
        let mut tracker = TouchTracker::new();

        let event = tracker.update(7, TouchPhase::Start, Point::new(10.0, 10.0));
        assert_eq!(event.touches, vec![Point::new(10.0, 10.0)]);

        let event = tracker.update(3, TouchPhase::Start, Point::new(50.0, 10.0));
        assert_eq!(event.touches.len(), 2);
        assert_eq!(event.touches[0], Point::new(10.0, 10.0));

        let event = tracker.update(7, TouchPhase::Move, Point::new(0.0, 10.0));
        assert_eq!(event.phase, TouchPhase::Move);
        assert_eq!(event.touches[0], Point::new(0.0, 10.0));

        let event = tracker.update(7, TouchPhase::End, Point::new(0.0, 10.0));
        assert_eq!(event.touches, vec![Point::new(50.0, 10.0)]);

        let event = tracker.update(3, TouchPhase::Cancel, Point::new(50.0, 10.0));
        assert!(event.touches.is_empty());
        assert!(tracker.positions().is_empty());
    }

    #[test]
    fn test_touch_tracker_ignores_unknown_move() {
        let mut tracker = TouchTracker::new();
        let event = tracker.update(1, TouchPhase::Move, Point::new(5.0, 5.0));
        assert!(event.touches.is_empty());
    }
}
