#![forbid(unsafe_code)]

//! Adapter boundary between the recognizer and the host environment.
//!
//! The recognizer never touches a DOM. Everything it needs from the outside
//! world goes through [`GestureHost`]: installing and removing the raw input
//! subscription for an element, toggling the visual marker class, and
//! (optionally) arming real timers for long-press detection.
//!
//! Hosts without a timer facility leave the timer hooks as no-ops and call
//! [`GestureRecognizer::tick`](crate::recognizer::GestureRecognizer::tick)
//! periodically instead.

use std::time::Duration;

use crate::event::ElementId;

/// Identifies one scheduled long-press task.
///
/// Tokens are never reused by a recognizer, so a late fire for a cancelled
/// task can always be told apart from the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerToken(pub u64);

/// Services the recognizer requires from its host.
pub trait GestureHost {
    /// Start delivering raw pointer events for `element`.
    fn subscribe(&mut self, element: ElementId);

    /// Stop delivering raw pointer events for `element`.
    fn unsubscribe(&mut self, element: ElementId);

    /// Add (`active == true`) or remove the marker `class` on `element`.
    fn set_visual_marker(&mut self, _element: ElementId, _class: &str, _active: bool) {}

    /// Arm a timer that calls
    /// [`fire_long_press`](crate::recognizer::GestureRecognizer::fire_long_press)
    /// after `delay`.
    fn schedule_long_press(&mut self, _element: ElementId, _token: TimerToken, _delay: Duration) {
    }

    /// Disarm a timer armed by [`schedule_long_press`](Self::schedule_long_press).
    fn cancel_long_press(&mut self, _element: ElementId, _token: TimerToken) {}
}

impl<H: GestureHost + ?Sized> GestureHost for &mut H {
    fn subscribe(&mut self, element: ElementId) {
        (**self).subscribe(element);
    }

    fn unsubscribe(&mut self, element: ElementId) {
        (**self).unsubscribe(element);
    }

    fn set_visual_marker(&mut self, element: ElementId, class: &str, active: bool) {
        (**self).set_visual_marker(element, class, active);
    }

    fn schedule_long_press(&mut self, element: ElementId, token: TimerToken, delay: Duration) {
        (**self).schedule_long_press(element, token, delay);
    }

    fn cancel_long_press(&mut self, element: ElementId, token: TimerToken) {
        (**self).cancel_long_press(element, token);
    }
}

/// Host that ignores every request. Long-press then relies on `tick`.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHost;

impl GestureHost for NoopHost {
    fn subscribe(&mut self, _element: ElementId) {}

    fn unsubscribe(&mut self, _element: ElementId) {}
}
