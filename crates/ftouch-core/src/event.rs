#![forbid(unsafe_code)]

//! Canonical pointer events delivered by a host adapter.
//!
//! Browsers deliver touch and mouse input through two unrelated event
//! families. Adapters fold both into a single [`PointerEvent`] carrying a
//! [`PointerKind`] discriminant, so the recognizer never branches on raw
//! event type strings.
//!
//! # Design
//!
//! - Coordinates are element/client space `f64`, exactly as the host reports.
//! - Timestamps are [`Instant`] (`web-time`), so the same type works natively
//!   and on `wasm32-unknown-unknown`.
//! - Touch events take their coordinates from the first touch point; mouse
//!   events from the direct client coordinates.

use std::fmt;

use web_time::Instant;

/// Stable identity of an observed element, assigned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u64);

impl ElementId {
    /// Create an element id.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Raw id value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A 2D position in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// The origin.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Absolute per-axis distance to another point.
    #[must_use]
    pub fn abs_delta(self, other: Self) -> (f64, f64) {
        ((self.x - other.x).abs(), (self.y - other.y).abs())
    }
}

/// Which input family produced the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerKind {
    Touch,
    Mouse,
}

/// Mouse button associated with a mouse event.
///
/// Touch events always report [`PointerButton::Primary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PointerButton {
    #[default]
    Primary,
    Auxiliary,
    Secondary,
}

/// Lifecycle phase of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerPhase {
    /// Button down / touch start.
    Start,
    /// Pointer moved.
    Move,
    /// Button up / touch end.
    End,
    /// Touch cancelled by the platform.
    Cancel,
    /// Pointer entered the element (hover).
    Enter,
    /// Pointer left the element (hover).
    Leave,
}

/// One raw pointer event, already normalized by the adapter.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    pub kind: PointerKind,
    pub button: PointerButton,
    pub position: Point,
    pub timestamp: Instant,
    /// The element the event was originally dispatched to. `None` means the
    /// host could not tell; the `self` modifier then treats it as a mismatch.
    pub target: Option<ElementId>,
}

impl PointerEvent {
    /// Create an event with the primary button and no recorded target.
    #[must_use]
    pub fn new(phase: PointerPhase, kind: PointerKind, position: Point, timestamp: Instant) -> Self {
        Self {
            phase,
            kind,
            button: PointerButton::Primary,
            position,
            timestamp,
            target: None,
        }
    }

    /// Touch event shorthand.
    #[must_use]
    pub fn touch(phase: PointerPhase, x: f64, y: f64, timestamp: Instant) -> Self {
        Self::new(phase, PointerKind::Touch, Point::new(x, y), timestamp)
    }

    /// Mouse event shorthand.
    #[must_use]
    pub fn mouse(phase: PointerPhase, x: f64, y: f64, timestamp: Instant) -> Self {
        Self::new(phase, PointerKind::Mouse, Point::new(x, y), timestamp)
    }

    /// Set the original event target.
    #[must_use]
    pub fn with_target(mut self, target: ElementId) -> Self {
        self.target = Some(target);
        self
    }

    /// Set the mouse button.
    #[must_use]
    pub fn with_button(mut self, button: PointerButton) -> Self {
        self.button = button;
        self
    }

    #[inline]
    #[must_use]
    pub fn is_touch(&self) -> bool {
        self.kind == PointerKind::Touch
    }

    #[inline]
    #[must_use]
    pub fn is_mouse(&self) -> bool {
        self.kind == PointerKind::Mouse
    }
}
