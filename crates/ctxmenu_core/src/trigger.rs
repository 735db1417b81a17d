//! Pointer and touch input delivered to bound targets.
//!
//! [`GestureTracker`] turns touch-start/touch-end pairs into long-press activations;
//! the engine routes every other kind directly.

use std::collections::HashMap;
use std::time::Duration;

use crate::models::Point;

/// Maximum movement, per axis, between touch-start and touch-end of a long press.
pub const LONG_PRESS_TOLERANCE: f32 = 10.0;

/// Kind of input delivered to a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    /// Platform context-menu request (right click).
    ContextMenu,
    /// Primary click.
    Click,
    /// A finger touched the target.
    TouchStart,
    /// The finger left the target.
    TouchEnd,
}

/// One input event in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Input kind.
    pub kind: GestureKind,
    /// Page coordinates.
    pub position: Point,
    /// Page time of the event.
    pub timestamp: Duration,
}

impl PointerEvent {
    /// Create an event.
    pub fn new(kind: GestureKind, position: Point, timestamp: Duration) -> Self {
        Self { kind, position, timestamp }
    }

    /// A right click at `position`.
    pub fn context_menu(position: Point, timestamp: Duration) -> Self {
        Self::new(GestureKind::ContextMenu, position, timestamp)
    }

    /// A primary click at `position`.
    pub fn click(position: Point, timestamp: Duration) -> Self {
        Self::new(GestureKind::Click, position, timestamp)
    }

    /// A touch-start at `position`.
    pub fn touch_start(position: Point, timestamp: Duration) -> Self {
        Self::new(GestureKind::TouchStart, position, timestamp)
    }

    /// A touch-end at `position`.
    pub fn touch_end(position: Point, timestamp: Duration) -> Self {
        Self::new(GestureKind::TouchEnd, position, timestamp)
    }
}

/// What the host should do with the native event after dispatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventResponse {
    /// Suppress the platform's default action.
    pub prevent_default: bool,
    /// Stop the event from reaching ancestors and the document.
    pub stop_propagation: bool,
}

impl EventResponse {
    /// Let the event continue untouched.
    pub const PASS: Self = Self { prevent_default: false, stop_propagation: false };

    /// Prevent the default action but keep bubbling.
    pub const PREVENT: Self = Self { prevent_default: true, stop_propagation: false };

    /// Prevent the default action and stop bubbling.
    pub const SWALLOW: Self = Self { prevent_default: true, stop_propagation: true };
}

/// Whether a touch-start/touch-end pair is a long press.
pub fn is_long_press(start: &PointerEvent, end: &PointerEvent, threshold: Duration) -> bool {
    let held = end.timestamp.saturating_sub(start.timestamp);
    let dx = (end.position.x - start.position.x).abs();
    let dy = (end.position.y - start.position.y).abs();
    held >= threshold && dx <= LONG_PRESS_TOLERANCE && dy <= LONG_PRESS_TOLERANCE
}

/// Touch-start records per target.
#[derive(Debug, Default)]
pub struct GestureTracker {
    starts: HashMap<String, PointerEvent>,
}

impl GestureTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a touch-start on `target`, replacing any earlier record.
    pub fn touch_start(&mut self, target: &str, event: PointerEvent) {
        tracing::trace!(element = target, x = event.position.x, y = event.position.y, "Touch start recorded");
        self.starts.insert(target.to_string(), event);
    }

    /// Finish the touch on `target`.
    ///
    /// Returns the touch-start event when the pair forms a long press. The record is
    /// cleared either way; a touch-end with no record is never a long press.
    pub fn touch_end(&mut self, target: &str, event: &PointerEvent, threshold: Duration) -> Option<PointerEvent> {
        let start = self.starts.remove(target)?;
        is_long_press(&start, event, threshold).then_some(start)
    }

    /// Whether a touch is in progress on `target`.
    pub fn is_tracking(&self, target: &str) -> bool {
        self.starts.contains_key(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn test_long_press_within_tolerance() {
        let mut tracker = GestureTracker::new();
        tracker.touch_start("row1", PointerEvent::touch_start(Point::new(100.0, 100.0), ms(1000)));
        let end = PointerEvent::touch_end(Point::new(103.0, 104.0), ms(1650));
        let start = tracker.touch_end("row1", &end, ms(600)).unwrap();
        assert_eq!(start.position, Point::new(100.0, 100.0));
        assert!(!tracker.is_tracking("row1"));
    }

    #[test]
    fn test_moved_too_far_is_not_long_press() {
        let mut tracker = GestureTracker::new();
        tracker.touch_start("row1", PointerEvent::touch_start(Point::new(100.0, 100.0), ms(0)));
        let end = PointerEvent::touch_end(Point::new(115.0, 100.0), ms(650));
        assert!(tracker.touch_end("row1", &end, ms(600)).is_none());
        assert!(!tracker.is_tracking("row1"));
    }

    #[test]
    fn test_short_tap_is_not_long_press() {
        let mut tracker = GestureTracker::new();
        tracker.touch_start("row1", PointerEvent::touch_start(Point::new(5.0, 5.0), ms(0)));
        let end = PointerEvent::touch_end(Point::new(5.0, 5.0), ms(400));
        assert!(tracker.touch_end("row1", &end, ms(600)).is_none());
    }

    #[test]
    fn test_touch_end_without_start() {
        let mut tracker = GestureTracker::new();
        let end = PointerEvent::touch_end(Point::new(5.0, 5.0), ms(4000));
        assert!(tracker.touch_end("row1", &end, ms(600)).is_none());
    }

    #[test]
    fn test_records_are_per_target() {
        let mut tracker = GestureTracker::new();
        tracker.touch_start("a", PointerEvent::touch_start(Point::new(0.0, 0.0), ms(0)));
        let end = PointerEvent::touch_end(Point::new(0.0, 0.0), ms(700));
        assert!(tracker.touch_end("b", &end, ms(600)).is_none());
        assert!(tracker.touch_end("a", &end, ms(600)).is_some());
    }

    #[test]
    fn test_tolerance_boundary_inclusive() {
        let start = PointerEvent::touch_start(Point::new(0.0, 0.0), ms(0));
        let end = PointerEvent::touch_end(Point::new(10.0, -10.0), ms(600));
        assert!(is_long_press(&start, &end, ms(600)));
    }
}
