//! Viewport controller: turns pointer, wheel and touch input into pan/zoom.

use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};

use std::time::Duration;

use crate::input::{
    GestureState, InputResponse, PointerEvent, TouchEvent, TouchPhase, pinch_distance,
};
use crate::notice::{NoticeState, NoticeTicket};
use crate::viewport::{ViewportState, ZoomBounds, ZoomClamp, ZoomLimit};

/// Multiplicative zoom steps for buttons and the wheel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ZoomSteps {
    /// Zoom-in button multiplies by this, zoom-out divides by it.
    pub button: f64,
    /// Wheel factor when scrolling up.
    pub wheel_in: f64,
    /// Wheel factor when scrolling down.
    pub wheel_out: f64,
}

impl Default for ZoomSteps {
    fn default() -> Self {
        Self {
            button: 1.2,
            wheel_in: 1.1,
            wheel_out: 0.9,
        }
    }
}

/// Owns the viewport and drives it from user input.
#[derive(Debug, Clone)]
pub struct ViewportController {
    viewport: ViewportState,
    gesture: GestureState,
    notice: NoticeState,
    bounds: ZoomBounds,
    steps: ZoomSteps,
    /// Ticket of the most recently raised notice, until a host takes it.
    raised: Option<NoticeTicket>,
}

impl Default for ViewportController {
    fn default() -> Self {
        Self::new(ZoomBounds::default(), ZoomSteps::default(), NoticeState::default())
    }
}

impl ViewportController {
    /// Create a controller at 100% with no pan.
    pub fn new(bounds: ZoomBounds, steps: ZoomSteps, notice: NoticeState) -> Self {
        Self {
            viewport: ViewportState::default(),
            gesture: GestureState::Idle,
            notice,
            bounds,
            steps,
            raised: None,
        }
    }

    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    pub fn zoom(&self) -> f64 {
        self.viewport.zoom
    }

    pub fn pan(&self) -> Vec2 {
        self.viewport.pan
    }

    pub fn gesture(&self) -> GestureState {
        self.gesture
    }

    pub fn bounds(&self) -> &ZoomBounds {
        &self.bounds
    }

    pub fn steps(&self) -> &ZoomSteps {
        &self.steps
    }

    /// Limit notice currently shown, if any.
    pub fn notice(&self) -> Option<ZoomLimit> {
        self.notice.current()
    }

    /// Text of the current limit notice.
    pub fn notice_message(&self) -> Option<String> {
        self.notice.message(&self.bounds)
    }

    pub fn notice_state(&self) -> &NoticeState {
        &self.notice
    }

    /// Transform for content laid out around the preview centre.
    pub fn transform(&self, origin: Point) -> Affine {
        self.viewport.transform(origin)
    }

    /// CSS form of the current transform.
    pub fn css_transform(&self) -> String {
        self.viewport.css_transform()
    }

    /// Apply the clamp rule to a proposed zoom.
    ///
    /// Out-of-range proposals are pinned to the bound and raise a notice;
    /// in-range ones clear any notice.
    pub fn request_zoom(&mut self, proposed: f64) -> ZoomClamp {
        let clamp = self.bounds.clamp(proposed);
        self.viewport.zoom = clamp.zoom;
        match clamp.limit {
            Some(limit) => {
                let ticket = self.notice.raise(limit);
                log::debug!("Zoom {:.3} clamped to {:.3} ({:?})", proposed, clamp.zoom, limit);
                self.raised = Some(ticket);
            }
            None => self.notice.clear(),
        }
        clamp
    }

    /// Multiply the current zoom by `factor`, subject to the clamp rule.
    pub fn zoom_by(&mut self, factor: f64) -> ZoomClamp {
        self.request_zoom(self.viewport.zoom * factor)
    }

    pub fn zoom_in(&mut self) -> ZoomClamp {
        self.zoom_by(self.steps.button)
    }

    pub fn zoom_out(&mut self) -> ZoomClamp {
        self.zoom_by(1.0 / self.steps.button)
    }

    /// Apply a wheel step. Only the sign of `delta_y` matters.
    pub fn handle_wheel(&mut self, delta_y: f64) -> InputResponse {
        if delta_y > 0.0 {
            self.zoom_by(self.steps.wheel_out);
        } else if delta_y < 0.0 {
            self.zoom_by(self.steps.wheel_in);
        }
        // Even a zero delta must not scroll the page underneath.
        InputResponse::Consumed
    }

    /// Back to 100% with no pan. The gesture session is left as it is.
    pub fn reset(&mut self) {
        self.viewport.reset();
        self.notice.clear();
    }

    /// Process a mouse event.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> InputResponse {
        match event {
            PointerEvent::Down { position, button } => {
                if !button.is_primary() || self.gesture.is_pinching() {
                    return InputResponse::Ignored;
                }
                self.gesture = GestureState::Dragging {
                    start: position,
                    last: position,
                };
                InputResponse::Consumed
            }
            PointerEvent::Move { position } => self.drag_to(position),
            PointerEvent::Up { button, .. } => {
                if button.is_primary() && self.gesture.is_dragging() {
                    self.gesture = GestureState::Idle;
                    InputResponse::Consumed
                } else {
                    InputResponse::Ignored
                }
            }
            PointerEvent::Scroll { delta, .. } => self.handle_wheel(delta.y),
        }
    }

    /// Process a touch event. Touch input is always consumed.
    pub fn handle_touch(&mut self, event: TouchEvent) -> InputResponse {
        let count = event.touches.len();
        match event.phase {
            TouchPhase::Start => match count {
                1 => {
                    let position = event.touches[0];
                    self.gesture = GestureState::Dragging {
                        start: position,
                        last: position,
                    };
                }
                2 => self.begin_pinch(&event.touches),
                // A pinch only exists with exactly two fingers down.
                _ => self.gesture = GestureState::Idle,
            },
            TouchPhase::Move => match (self.gesture, pinch_distance(&event.touches)) {
                (GestureState::Pinching { baseline }, Some(distance)) if count == 2 => {
                    if baseline > 0.0 && distance > 0.0 {
                        self.zoom_by(distance / baseline);
                    }
                    self.gesture = GestureState::Pinching { baseline: distance };
                }
                (GestureState::Dragging { .. }, _) if count == 1 => {
                    self.drag_to(event.touches[0]);
                }
                _ => {}
            },
            TouchPhase::End | TouchPhase::Cancel => match count {
                // The remaining pair starts a fresh pinch from its own distance.
                2 => self.begin_pinch(&event.touches),
                // A finger left over from a pinch does not turn into a drag.
                1 if self.gesture.is_pinching() => self.gesture = GestureState::Idle,
                1 => {}
                _ => self.gesture = GestureState::Idle,
            },
        }
        InputResponse::Consumed
    }

    /// Abandon any drag or pinch, e.g. when the window loses focus.
    pub fn cancel_gesture(&mut self) {
        self.gesture = GestureState::Idle;
    }

    /// How long a raised notice should stay up before its timer fires.
    pub fn notice_delay(&self) -> Duration {
        self.notice.delay()
    }

    /// Timer callback for a notice raised earlier.
    pub fn expire_notice(&mut self, ticket: NoticeTicket) -> bool {
        self.notice.expire(ticket)
    }

    /// Take the ticket of the last raised notice so a timer can be armed.
    pub fn take_raised_notice(&mut self) -> Option<NoticeTicket> {
        self.raised.take()
    }

    fn begin_pinch(&mut self, touches: &[Point]) {
        if let Some(baseline) = pinch_distance(touches) {
            self.gesture = GestureState::Pinching { baseline };
        }
    }

    fn drag_to(&mut self, position: Point) -> InputResponse {
        let GestureState::Dragging { start, last } = self.gesture else {
            return InputResponse::Ignored;
        };
        self.viewport.pan_by(position - last);
        self.gesture = GestureState::Dragging {
            start,
            last: position,
        };
        InputResponse::Consumed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::MouseButton;

    fn down(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Down {
            position: Point::new(x, y),
            button: MouseButton::Left,
        }
    }

    fn moved(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Move {
            position: Point::new(x, y),
        }
    }

    fn up(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Up {
            position: Point::new(x, y),
            button: MouseButton::Left,
        }
    }

    fn touch(phase: TouchPhase, points: &[(f64, f64)]) -> TouchEvent {
        TouchEvent::new(phase, points.iter().map(|&(x, y)| Point::new(x, y)).collect())
    }

    #[test]
    fn test_zoom_in_six_times_then_clamp() {
        let mut controller = ViewportController::default();
        for _ in 0..6 {
            let clamp = controller.zoom_in();
            assert_eq!(clamp.limit, None);
        }
        assert!((controller.zoom() - 1.2f64.powi(6)).abs() < 1e-9);
        assert!(controller.zoom() < 3.0);
        assert_eq!(controller.notice(), None);

        let clamp = controller.zoom_in();
        assert_eq!(clamp.limit, Some(ZoomLimit::Max));
        assert!((controller.zoom() - 3.0).abs() < f64::EPSILON);
        assert_eq!(controller.notice(), Some(ZoomLimit::Max));
        assert_eq!(controller.notice_message().as_deref(), Some("Maximum zoom (300%)"));
    }

    #[test]
    fn test_zoom_out_clamps_to_min() {
        let mut controller = ViewportController::default();
        for _ in 0..20 {
            controller.zoom_out();
        }
        assert!((controller.zoom() - 0.2).abs() < f64::EPSILON);
        assert_eq!(controller.notice(), Some(ZoomLimit::Min));
    }

    #[test]
    fn test_request_zoom_exact_bounds() {
        let mut controller = ViewportController::default();

        controller.request_zoom(0.05);
        assert!((controller.zoom() - 0.2).abs() < f64::EPSILON);
        assert_eq!(controller.notice(), Some(ZoomLimit::Min));

        controller.request_zoom(7.0);
        assert!((controller.zoom() - 3.0).abs() < f64::EPSILON);
        assert_eq!(controller.notice(), Some(ZoomLimit::Max));

        // An in-range request clears the notice.
        controller.request_zoom(1.0);
        assert_eq!(controller.notice(), None);
    }

    #[test]
    fn test_zoom_always_within_bounds() {
        let mut controller = ViewportController::default();
        let bounds = *controller.bounds();
        let ops: [fn(&mut ViewportController); 6] = [
            |c| {
                c.zoom_in();
            },
            |c| {
                c.zoom_out();
            },
            |c| {
                c.handle_wheel(-120.0);
            },
            |c| {
                c.handle_wheel(3.0);
            },
            |c| {
                c.handle_touch(touch(TouchPhase::Start, &[(0.0, 0.0), (100.0, 0.0)]));
                c.handle_touch(touch(TouchPhase::Move, &[(0.0, 0.0), (400.0, 0.0)]));
                c.handle_touch(touch(TouchPhase::End, &[]));
            },
            |c| {
                c.handle_touch(touch(TouchPhase::Start, &[(0.0, 0.0), (400.0, 0.0)]));
                c.handle_touch(touch(TouchPhase::Move, &[(0.0, 0.0), (10.0, 0.0)]));
                c.handle_touch(touch(TouchPhase::End, &[]));
            },
        ];

        // Deterministic pseudo-random walk over the operations.
        let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
        for _ in 0..500 {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            ops[(seed % ops.len() as u64) as usize](&mut controller);
            assert!(bounds.contains(controller.zoom()), "zoom {}", controller.zoom());
        }
    }

    #[test]
    fn test_wheel_fixed_steps() {
        let mut controller = ViewportController::default();

        assert!(controller.handle_wheel(-1.0).is_consumed());
        assert!((controller.zoom() - 1.1).abs() < 1e-12);

        controller.reset();
        controller.handle_wheel(500.0);
        assert!((controller.zoom() - 0.9).abs() < 1e-12);

        // Magnitude does not matter.
        controller.reset();
        controller.handle_wheel(-1000.0);
        assert!((controller.zoom() - 1.1).abs() < 1e-12);
    }

    #[test]
    fn test_wheel_zero_delta_is_consumed_without_zoom() {
        let mut controller = ViewportController::default();
        assert!(controller.handle_wheel(0.0).is_consumed());
        assert!((controller.zoom() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_scroll_pointer_event_routes_to_wheel() {
        let mut controller = ViewportController::default();
        let response = controller.handle_pointer(PointerEvent::Scroll {
            position: Point::ZERO,
            delta: Vec2::new(0.0, -3.0),
        });
        assert!(response.is_consumed());
        assert!((controller.zoom() - 1.1).abs() < 1e-12);
    }

    #[test]
    fn test_reset() {
        let mut controller = ViewportController::default();
        controller.handle_pointer(down(0.0, 0.0));
        controller.handle_pointer(moved(40.0, 30.0));
        controller.handle_pointer(up(40.0, 30.0));
        for _ in 0..10 {
            controller.zoom_in();
        }
        assert!(controller.notice().is_some());

        controller.reset();
        assert!((controller.zoom() - 1.0).abs() < f64::EPSILON);
        assert_eq!(controller.pan(), Vec2::ZERO);
        assert_eq!(controller.notice(), None);
    }

    #[test]
    fn test_reset_mid_drag_continues_from_origin() {
        let mut controller = ViewportController::default();
        controller.handle_pointer(down(0.0, 0.0));
        controller.handle_pointer(moved(30.0, 30.0));

        controller.reset();
        assert!(controller.gesture().is_dragging());

        controller.handle_pointer(moved(40.0, 35.0));
        assert_eq!(controller.pan(), Vec2::new(10.0, 5.0));
    }

    #[test]
    fn test_mouse_drag_scenario() {
        let mut controller = ViewportController::default();
        assert!(controller.handle_pointer(down(100.0, 100.0)).is_consumed());
        assert!(controller.gesture().is_dragging());
        controller.handle_pointer(moved(150.0, 120.0));
        controller.handle_pointer(up(150.0, 120.0));

        assert_eq!(controller.pan(), Vec2::new(50.0, 20.0));
        assert!(controller.gesture().is_idle());
    }

    #[test]
    fn test_drag_is_additive() {
        let mut one_step = ViewportController::default();
        one_step.handle_pointer(down(10.0, 20.0));
        one_step.handle_pointer(moved(-35.0, 95.0));

        let mut two_steps = ViewportController::default();
        two_steps.handle_pointer(down(10.0, 20.0));
        two_steps.handle_pointer(moved(60.0, -5.0));
        two_steps.handle_pointer(moved(-35.0, 95.0));

        assert_eq!(one_step.pan(), Vec2::new(-45.0, 75.0));
        assert!((one_step.pan() - two_steps.pan()).hypot() < 1e-12);
    }

    #[test]
    fn test_move_without_press_is_ignored() {
        let mut controller = ViewportController::default();
        assert_eq!(controller.handle_pointer(moved(50.0, 50.0)), InputResponse::Ignored);
        assert_eq!(controller.pan(), Vec2::ZERO);
    }

    #[test]
    fn test_secondary_button_does_not_drag() {
        let mut controller = ViewportController::default();
        let response = controller.handle_pointer(PointerEvent::Down {
            position: Point::new(5.0, 5.0),
            button: MouseButton::Right,
        });
        assert_eq!(response, InputResponse::Ignored);
        assert!(controller.gesture().is_idle());
    }

    #[test]
    fn test_pan_does_not_change_zoom() {
        let mut controller = ViewportController::default();
        controller.zoom_in();
        let zoom = controller.zoom();
        controller.handle_pointer(down(0.0, 0.0));
        controller.handle_pointer(moved(-500.0, 9000.0));
        assert!((controller.zoom() - zoom).abs() < f64::EPSILON);
        assert_eq!(controller.pan(), Vec2::new(-500.0, 9000.0));
    }

    #[test]
    fn test_single_touch_drag() {
        let mut controller = ViewportController::default();
        controller.handle_touch(touch(TouchPhase::Start, &[(10.0, 10.0)]));
        assert!(controller.gesture().is_dragging());

        controller.handle_touch(touch(TouchPhase::Move, &[(30.0, 5.0)]));
        controller.handle_touch(touch(TouchPhase::Move, &[(35.0, 15.0)]));
        assert_eq!(controller.pan(), Vec2::new(25.0, 5.0));

        controller.handle_touch(touch(TouchPhase::End, &[]));
        assert!(controller.gesture().is_idle());
    }

    #[test]
    fn test_pinch_halves_zoom() {
        let mut controller = ViewportController::default();
        controller.handle_touch(touch(TouchPhase::Start, &[(0.0, 0.0), (200.0, 0.0)]));
        assert_eq!(controller.gesture(), GestureState::Pinching { baseline: 200.0 });

        controller.handle_touch(touch(TouchPhase::Move, &[(0.0, 0.0), (100.0, 0.0)]));
        assert!((controller.zoom() - 0.5).abs() < 1e-12);
        assert_eq!(controller.notice(), None);
    }

    #[test]
    fn test_pinch_ratio_is_frame_relative() {
        let mut controller = ViewportController::default();
        controller.request_zoom(1.5);
        controller.handle_touch(touch(TouchPhase::Start, &[(0.0, 0.0), (0.0, 100.0)]));

        controller.handle_touch(touch(TouchPhase::Move, &[(0.0, 0.0), (0.0, 120.0)]));
        assert!((controller.zoom() - 1.8).abs() < 1e-12);
        assert_eq!(controller.gesture(), GestureState::Pinching { baseline: 120.0 });

        // 120 -> 60 halves whatever the zoom is now.
        controller.handle_touch(touch(TouchPhase::Move, &[(0.0, 0.0), (0.0, 60.0)]));
        assert!((controller.zoom() - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_pinch_clamps_with_notice() {
        let mut controller = ViewportController::default();
        controller.handle_touch(touch(TouchPhase::Start, &[(0.0, 0.0), (10.0, 0.0)]));
        controller.handle_touch(touch(TouchPhase::Move, &[(0.0, 0.0), (500.0, 0.0)]));
        assert!((controller.zoom() - 3.0).abs() < f64::EPSILON);
        assert_eq!(controller.notice(), Some(ZoomLimit::Max));
    }

    #[test]
    fn test_pinch_zero_baseline_is_skipped() {
        let mut controller = ViewportController::default();
        controller.handle_touch(touch(TouchPhase::Start, &[(5.0, 5.0), (5.0, 5.0)]));
        controller.handle_touch(touch(TouchPhase::Move, &[(5.0, 5.0), (105.0, 5.0)]));
        assert!((controller.zoom() - 1.0).abs() < f64::EPSILON);
        assert_eq!(controller.gesture(), GestureState::Pinching { baseline: 100.0 });
    }

    #[test]
    fn test_drag_then_pinch_then_lift() {
        let mut controller = ViewportController::default();
        controller.handle_touch(touch(TouchPhase::Start, &[(0.0, 0.0)]));
        controller.handle_touch(touch(TouchPhase::Start, &[(0.0, 0.0), (50.0, 0.0)]));
        assert!(controller.gesture().is_pinching());

        // Lifting one finger ends the pinch without resuming the drag.
        controller.handle_touch(touch(TouchPhase::End, &[(0.0, 0.0)]));
        assert!(controller.gesture().is_idle());

        controller.handle_touch(touch(TouchPhase::Move, &[(80.0, 80.0)]));
        assert_eq!(controller.pan(), Vec2::ZERO);
    }

    #[test]
    fn test_third_finger_lift_rebases_pinch() {
        let mut controller = ViewportController::default();
        controller.handle_touch(touch(TouchPhase::Start, &[(0.0, 0.0), (100.0, 0.0)]));
        controller.handle_touch(touch(
            TouchPhase::Start,
            &[(0.0, 0.0), (100.0, 0.0), (500.0, 0.0)],
        ));
        assert!(controller.gesture().is_idle());

        // Two fingers remain 400 apart; holding them still must not zoom.
        controller.handle_touch(touch(TouchPhase::End, &[(100.0, 0.0), (500.0, 0.0)]));
        assert_eq!(controller.gesture(), GestureState::Pinching { baseline: 400.0 });
        controller.handle_touch(touch(TouchPhase::Move, &[(100.0, 0.0), (500.0, 0.0)]));
        assert!((controller.zoom() - 1.0).abs() < f64::EPSILON);
        assert_eq!(controller.notice(), None);

        controller.handle_touch(touch(TouchPhase::Move, &[(100.0, 0.0), (300.0, 0.0)]));
        assert!((controller.zoom() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_touch_always_consumed() {
        let mut controller = ViewportController::default();
        assert!(controller.handle_touch(touch(TouchPhase::Move, &[])).is_consumed());
        assert!(controller.handle_touch(touch(TouchPhase::End, &[])).is_consumed());
        assert!(
            controller
                .handle_touch(touch(TouchPhase::Start, &[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)]))
                .is_consumed()
        );
    }

    #[test]
    fn test_mouse_ignored_while_pinching() {
        let mut controller = ViewportController::default();
        controller.handle_touch(touch(TouchPhase::Start, &[(0.0, 0.0), (10.0, 0.0)]));
        assert_eq!(controller.handle_pointer(down(0.0, 0.0)), InputResponse::Ignored);
        assert!(controller.gesture().is_pinching());
    }

    #[test]
    fn test_notice_tickets() {
        let mut controller = ViewportController::default();
        controller.request_zoom(10.0);
        let first = controller.take_raised_notice().unwrap();
        assert_eq!(controller.take_raised_notice(), None);

        controller.request_zoom(0.0);
        let second = controller.take_raised_notice().unwrap();

        // The first timer fires late and must not hide the newer notice.
        assert!(!controller.expire_notice(first));
        assert_eq!(controller.notice(), Some(ZoomLimit::Min));
        assert!(controller.expire_notice(second));
        assert_eq!(controller.notice(), None);

        assert_eq!(controller.notice_delay(), Duration::from_millis(1000));
    }

    #[test]
    fn test_cancel_gesture() {
        let mut controller = ViewportController::default();
        controller.handle_pointer(down(0.0, 0.0));
        controller.cancel_gesture();
        assert!(controller.gesture().is_idle());
        assert_eq!(controller.handle_pointer(moved(10.0, 10.0)), InputResponse::Ignored);
    }
}
