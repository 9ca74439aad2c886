#![forbid(unsafe_code)]

//! Gesture recognition: turns raw pointer events into gesture notifications.
//!
//! [`GestureRecognizer`] keeps one interaction record per observed element and
//! a per-element dispatch table mapping [`GestureName`]s to handlers. Hosts
//! feed it [`PointerEvent`]s through [`handle`](GestureRecognizer::handle);
//! registered handlers are invoked synchronously for every gesture the
//! event resolves to.
//!
//! # State Machine
//!
//! Per element, one interaction at a time:
//!
//! - **start**: `start` fires and a long-press timer is armed.
//! - **move**: the first move past `tap_tolerance` fires `moved`; every move
//!   after that fires `moving`. Moving past `swipe_tolerance` on *both* axes
//!   latches the interaction outside the swipe box.
//! - **end**: `end` fires, then exactly one of `tap`, `longtap`,
//!   `swipe[.dir]` or `pan[.dir]`, unless no direction can be resolved.
//! - **cancel**: silent abort, nothing fires.
//!
//! # Invariants
//!
//! 1. `end` always precedes the terminal classification of an interaction.
//! 2. `longpress` fires at most once per interaction and only while active.
//! 3. A second start while an interaction is active changes nothing.
//! 4. Every exit from the active state (end, cancel, unregister) cancels the
//!    pending long-press timer.
//! 5. Mouse events within [`SYNTHETIC_MOUSE_WINDOW`] of a touch event of the
//!    same phase are dropped as browser-synthesized duplicates.
//!
//! # Failure Modes
//!
//! - A handler that panics is isolated: the panic is logged, the remaining
//!   handlers still run, and the interaction record is left consistent.
//! - Handlers registered under unknown names are kept but never dispatched.

use std::cell::RefCell;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::rc::Rc;
use std::time::Duration;

use ahash::AHashMap;
use web_time::Instant;

use crate::binding::{Binding, Direction, GestureName, Modifiers};
use crate::config::{GestureConfig, SYNTHETIC_MOUSE_WINDOW};
use crate::event::{ElementId, Point, PointerButton, PointerEvent, PointerPhase};
use crate::host::{GestureHost, NoopHost, TimerToken};
use crate::logging::{debug, trace, warn};

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Callback invoked for a dispatched gesture.
pub type GestureCallback = dyn FnMut(&GestureEvent<'_>);

/// What a handler receives when its gesture fires.
#[derive(Debug, Clone, Copy)]
pub struct GestureEvent<'a> {
    /// Resolved gesture name (`swipe.left` when a compound handler matched).
    pub name: &'a GestureName,
    /// Direction parameter for swipe/pan notifications.
    pub direction: Option<Direction>,
    /// The raw pointer event that triggered the notification.
    pub pointer: &'a PointerEvent,
    /// The element the handler is bound to.
    pub element: ElementId,
}

/// Why an incoming event was dropped without touching interaction state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoredReason {
    /// No handler was ever registered for the element.
    NotRegistered,
    /// Mouse event synthesized by the browser right after a touch event.
    SyntheticMouse,
    /// Mouse button other than the primary one.
    NonPrimaryButton,
    /// Start while another interaction is in progress.
    AlreadyActive,
    /// Move or end without an interaction in progress.
    NotActive,
    /// Long-press fire for a timer that was cancelled or replaced.
    StaleTimer,
}

/// Result of feeding one event to the recognizer.
///
/// The adapter applies `propagation_stopped` / `default_prevented` to the
/// real platform event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub propagation_stopped: bool,
    pub default_prevented: bool,
    /// Gestures for which at least one handler ran, in dispatch order.
    pub fired: Vec<GestureName>,
    pub ignored: Option<IgnoredReason>,
}

impl DispatchOutcome {
    fn ignored(reason: IgnoredReason) -> Self {
        Self {
            ignored: Some(reason),
            ..Self::default()
        }
    }
}

/// Read-only snapshot of an element's interaction state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Interaction {
    pub is_active: bool,
    pub has_moved: bool,
    pub is_outside_swipe_bounds: bool,
    pub start: Point,
    pub current: Point,
    pub start_time: Option<Instant>,
    pub last_touch_start: Option<Instant>,
    pub last_touch_end: Option<Instant>,
}

// ---------------------------------------------------------------------------
// Internal state
// ---------------------------------------------------------------------------

#[derive(Clone)]
struct Handler {
    callback: Rc<RefCell<GestureCallback>>,
    modifiers: Modifiers,
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("modifiers", &self.modifiers)
            .finish_non_exhaustive()
    }
}

type HandlerTable = AHashMap<GestureName, Vec<Handler>>;

#[derive(Debug, Clone)]
struct LongPressTimer {
    token: TimerToken,
    deadline: Instant,
    event: PointerEvent,
}

#[derive(Debug, Default)]
struct InteractionRecord {
    state: Interaction,
    pending_long_press: Option<LongPressTimer>,
    handlers: HandlerTable,
    subscribed: bool,
}

/// Terminal classification of a finished interaction.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Terminal {
    Tap,
    LongTap,
    Swipe(Direction),
    Pan(Direction),
}

// ---------------------------------------------------------------------------
// GestureRecognizer
// ---------------------------------------------------------------------------

/// Stateful recognizer for every element a host observes.
pub struct GestureRecognizer<H: GestureHost = NoopHost> {
    config: GestureConfig,
    host: H,
    records: AHashMap<ElementId, InteractionRecord>,
    touch_classes: AHashMap<ElementId, String>,
    next_timer: u64,
}

impl<H: GestureHost> fmt::Debug for GestureRecognizer<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GestureRecognizer")
            .field("elements", &self.records.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for GestureRecognizer<NoopHost> {
    fn default() -> Self {
        Self::new(GestureConfig::default(), NoopHost)
    }
}

impl<H: GestureHost> GestureRecognizer<H> {
    /// Create a recognizer with the given configuration and host adapter.
    #[must_use]
    pub fn new(config: GestureConfig, host: H) -> Self {
        Self {
            config,
            host,
            records: AHashMap::new(),
            touch_classes: AHashMap::new(),
            next_timer: 1,
        }
    }

    // --- registration ------------------------------------------------------

    /// Register `callback` for `name` on `element`.
    ///
    /// See [`register_binding`](Self::register_binding).
    pub fn register<F>(
        &mut self,
        element: ElementId,
        name: impl Into<GestureName>,
        modifiers: Modifiers,
        callback: F,
    ) where
        F: FnMut(&GestureEvent<'_>) + 'static,
    {
        self.register_binding(element, &Binding::new(name, modifiers), callback);
    }

    /// Register `callback` for a parsed binding on `element`.
    ///
    /// The first registration for an element creates its interaction record
    /// and subscribes it on the host; later registrations reuse both.
    pub fn register_binding<F>(&mut self, element: ElementId, binding: &Binding, callback: F)
    where
        F: FnMut(&GestureEvent<'_>) + 'static,
    {
        let record = self.records.entry(element).or_default();
        let handler = Handler {
            callback: Rc::new(RefCell::new(callback)),
            modifiers: binding.modifiers,
        };

        for name in binding.registration_names() {
            trace!(element = element.get(), gesture = %name, "handler registered");
            record.handlers.entry(name).or_default().push(handler.clone());
        }

        if !record.subscribed {
            record.subscribed = true;
            self.host.subscribe(element);
            debug!(element = element.get(), "element subscribed");
        }
    }

    /// Remove every handler of `element`, its subscription, its record, and
    /// its marker class override.
    ///
    /// Returns `false` if the element was not registered.
    pub fn unregister(&mut self, element: ElementId) -> bool {
        self.touch_classes.remove(&element);
        let Some(mut record) = self.records.remove(&element) else {
            return false;
        };
        cancel_long_press(&mut self.host, element, &mut record);
        if record.subscribed {
            self.host.unsubscribe(element);
        }
        debug!(element = element.get(), "element unregistered");
        true
    }

    /// Override the marker class for one element. An empty class falls back
    /// to `config.touch_class`.
    pub fn set_touch_class(&mut self, element: ElementId, class: impl Into<String>) {
        self.touch_classes.insert(element, class.into());
    }

    /// Drop a per-element marker class override.
    pub fn clear_touch_class(&mut self, element: ElementId) {
        self.touch_classes.remove(&element);
    }

    // --- input -------------------------------------------------------------

    /// Process one raw pointer event for `element`.
    pub fn handle(&mut self, element: ElementId, event: &PointerEvent) -> DispatchOutcome {
        match event.phase {
            PointerPhase::Start => self.on_start(element, event),
            PointerPhase::Move => self.on_move(element, event),
            PointerPhase::End => self.on_end(element, event),
            PointerPhase::Cancel => self.on_cancel(element),
            PointerPhase::Enter => self.on_hover(element, true),
            PointerPhase::Leave => self.on_hover(element, false),
        }
    }

    /// Fire the long-press timer identified by `token`.
    ///
    /// Dispatches `longpress` only if `token` is still the element's pending
    /// timer and the interaction is still active.
    pub fn fire_long_press(&mut self, element: ElementId, token: TimerToken) -> DispatchOutcome {
        let Some(record) = self.records.get_mut(&element) else {
            return DispatchOutcome::ignored(IgnoredReason::NotRegistered);
        };
        let Some(timer) = record.pending_long_press.take_if(|t| t.token == token) else {
            trace!(element = element.get(), token = token.0, "stale long-press timer");
            return DispatchOutcome::ignored(IgnoredReason::StaleTimer);
        };
        if !record.state.is_active {
            return DispatchOutcome::ignored(IgnoredReason::NotActive);
        }

        debug!(element = element.get(), "longpress");
        let mut out = DispatchOutcome::default();
        trigger(
            &record.handlers,
            element,
            &timer.event,
            &GestureName::LongPress,
            None,
            &mut out,
        );
        out
    }

    /// Fire every long-press timer whose deadline is at or before `now`.
    ///
    /// For hosts that poll instead of scheduling real timers. Results are
    /// ordered by element id.
    pub fn tick(&mut self, now: Instant) -> Vec<(ElementId, DispatchOutcome)> {
        let mut due: Vec<(ElementId, TimerToken)> = self
            .records
            .iter()
            .filter_map(|(element, record)| {
                record
                    .pending_long_press
                    .as_ref()
                    .filter(|t| t.deadline <= now)
                    .map(|t| (*element, t.token))
            })
            .collect();
        due.sort_unstable();

        due.into_iter()
            .map(|(element, token)| (element, self.fire_long_press(element, token)))
            .collect()
    }

    // --- queries -----------------------------------------------------------

    /// Whether an interaction is in progress on `element`.
    #[must_use]
    pub fn is_active(&self, element: ElementId) -> bool {
        self.records
            .get(&element)
            .is_some_and(|r| r.state.is_active)
    }

    /// Snapshot of the element's interaction state.
    #[must_use]
    pub fn interaction(&self, element: ElementId) -> Option<Interaction> {
        self.records.get(&element).map(|r| r.state)
    }

    /// Whether `element` has a record (at least one registration).
    #[must_use]
    pub fn is_registered(&self, element: ElementId) -> bool {
        self.records.contains_key(&element)
    }

    /// Whether a long-press timer is armed for `element`.
    #[must_use]
    pub fn long_press_pending(&self, element: ElementId) -> bool {
        self.records
            .get(&element)
            .is_some_and(|r| r.pending_long_press.is_some())
    }

    /// Number of handlers registered under exactly `name`.
    #[must_use]
    pub fn handler_count(&self, element: ElementId, name: &GestureName) -> usize {
        self.records
            .get(&element)
            .and_then(|r| r.handlers.get(name))
            .map_or(0, Vec::len)
    }

    /// Get a reference to the current configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Update the configuration. Applies from the next event on.
    pub fn set_config(&mut self, config: GestureConfig) {
        self.config = config;
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }
}

// ---------------------------------------------------------------------------
// Phase handlers
// ---------------------------------------------------------------------------

impl<H: GestureHost> GestureRecognizer<H> {
    fn on_start(&mut self, element: ElementId, event: &PointerEvent) -> DispatchOutcome {
        let Some(record) = self.records.get_mut(&element) else {
            return DispatchOutcome::ignored(IgnoredReason::NotRegistered);
        };
        let state = &mut record.state;

        if event.is_touch() {
            state.last_touch_start = Some(event.timestamp);
        }
        if event.is_mouse() {
            if is_synthetic_mouse(state.last_touch_start, event.timestamp) {
                trace!(element = element.get(), "synthetic mouse start dropped");
                return DispatchOutcome::ignored(IgnoredReason::SyntheticMouse);
            }
            if event.button != PointerButton::Primary {
                return DispatchOutcome::ignored(IgnoredReason::NonPrimaryButton);
            }
        }
        if state.is_active {
            return DispatchOutcome::ignored(IgnoredReason::AlreadyActive);
        }

        let class = marker_class(&self.config, &self.touch_classes, element);
        set_marker(&mut self.host, element, class, true);

        state.is_active = true;
        state.has_moved = false;
        state.is_outside_swipe_bounds = false;
        state.start = event.position;
        state.current = Point::ZERO;
        state.start_time = Some(event.timestamp);

        cancel_long_press(&mut self.host, element, record);
        let token = TimerToken(self.next_timer);
        self.next_timer += 1;
        let delay = self.config.long_press_duration;
        record.pending_long_press = Some(LongPressTimer {
            token,
            deadline: event.timestamp + delay,
            event: event.clone(),
        });
        self.host.schedule_long_press(element, token, delay);

        trace!(
            element = element.get(),
            x = event.position.x,
            y = event.position.y,
            "interaction started"
        );
        let mut out = DispatchOutcome::default();
        trigger(
            &record.handlers,
            element,
            event,
            &GestureName::Start,
            None,
            &mut out,
        );
        out
    }

    fn on_move(&mut self, element: ElementId, event: &PointerEvent) -> DispatchOutcome {
        let Some(record) = self.records.get_mut(&element) else {
            return DispatchOutcome::ignored(IgnoredReason::NotRegistered);
        };
        let state = &mut record.state;
        if !state.is_active {
            return DispatchOutcome::ignored(IgnoredReason::NotActive);
        }

        state.current = event.position;
        let (dx, dy) = state.start.abs_delta(state.current);
        let mut out = DispatchOutcome::default();

        if !state.has_moved {
            let tolerance = self.config.tap_tolerance;
            if dx > tolerance || dy > tolerance {
                state.has_moved = true;
                trace!(element = element.get(), dx, dy, "moved past tap tolerance");
                trigger(
                    &record.handlers,
                    element,
                    event,
                    &GestureName::Moved,
                    None,
                    &mut out,
                );
            }
        } else if !state.is_outside_swipe_bounds {
            let tolerance = self.config.swipe_tolerance;
            state.is_outside_swipe_bounds = dx > tolerance && dy > tolerance;
        }

        if state.has_moved {
            trigger(
                &record.handlers,
                element,
                event,
                &GestureName::Moving,
                None,
                &mut out,
            );
        }
        out
    }

    fn on_cancel(&mut self, element: ElementId) -> DispatchOutcome {
        let Some(record) = self.records.get_mut(&element) else {
            return DispatchOutcome::ignored(IgnoredReason::NotRegistered);
        };

        let class = marker_class(&self.config, &self.touch_classes, element);
        set_marker(&mut self.host, element, class, false);

        record.state.is_active = false;
        record.state.has_moved = false;
        cancel_long_press(&mut self.host, element, record);
        record.state.start = Point::ZERO;

        trace!(element = element.get(), "interaction cancelled");
        DispatchOutcome::default()
    }

    fn on_end(&mut self, element: ElementId, event: &PointerEvent) -> DispatchOutcome {
        let Some(record) = self.records.get_mut(&element) else {
            return DispatchOutcome::ignored(IgnoredReason::NotRegistered);
        };

        if event.is_touch() {
            record.state.last_touch_end = Some(event.timestamp);
        }
        if event.is_mouse() {
            if is_synthetic_mouse(record.state.last_touch_end, event.timestamp) {
                trace!(element = element.get(), "synthetic mouse end dropped");
                return DispatchOutcome::ignored(IgnoredReason::SyntheticMouse);
            }
            if event.button != PointerButton::Primary {
                return DispatchOutcome::ignored(IgnoredReason::NonPrimaryButton);
            }
        }
        if !record.state.is_active {
            return DispatchOutcome::ignored(IgnoredReason::NotActive);
        }

        record.state.is_active = false;
        cancel_long_press(&mut self.host, element, record);
        let class = marker_class(&self.config, &self.touch_classes, element);
        set_marker(&mut self.host, element, class, false);

        let mut out = DispatchOutcome::default();
        trigger(
            &record.handlers,
            element,
            event,
            &GestureName::End,
            None,
            &mut out,
        );

        let elapsed = record
            .state
            .start_time
            .map_or(Duration::ZERO, |t| event.timestamp.saturating_duration_since(t));
        let has_longtap = record
            .handlers
            .get(&GestureName::LongTap)
            .is_some_and(|h| !h.is_empty());

        let Some(terminal) = classify(&record.state, &self.config, elapsed, has_longtap) else {
            debug!(element = element.get(), "interaction ended without classification");
            return out;
        };
        debug!(element = element.get(), ?terminal, ?elapsed, "interaction classified");

        match terminal {
            Terminal::Tap => trigger(
                &record.handlers,
                element,
                event,
                &GestureName::Tap,
                None,
                &mut out,
            ),
            Terminal::LongTap => {
                out.default_prevented = true;
                trigger(
                    &record.handlers,
                    element,
                    event,
                    &GestureName::LongTap,
                    None,
                    &mut out,
                );
            }
            Terminal::Swipe(direction) | Terminal::Pan(direction) => {
                let bare = if matches!(terminal, Terminal::Swipe(_)) {
                    GestureName::Swipe(None)
                } else {
                    GestureName::Pan(None)
                };
                let compound = bare.with_direction(direction);
                let name = if record.handlers.get(&compound).is_some_and(|h| !h.is_empty()) {
                    compound
                } else {
                    bare
                };
                trigger(
                    &record.handlers,
                    element,
                    event,
                    &name,
                    Some(direction),
                    &mut out,
                );
            }
        }
        out
    }

    fn on_hover(&mut self, element: ElementId, entered: bool) -> DispatchOutcome {
        if !self.records.contains_key(&element) {
            return DispatchOutcome::ignored(IgnoredReason::NotRegistered);
        }
        let class = marker_class(&self.config, &self.touch_classes, element);
        set_marker(&mut self.host, element, class, entered);
        DispatchOutcome::default()
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn is_synthetic_mouse(last_touch: Option<Instant>, now: Instant) -> bool {
    last_touch.is_some_and(|t| now.saturating_duration_since(t) < SYNTHETIC_MOUSE_WINDOW)
}

fn marker_class<'a>(
    config: &'a GestureConfig,
    overrides: &'a AHashMap<ElementId, String>,
    element: ElementId,
) -> &'a str {
    overrides
        .get(&element)
        .filter(|c| !c.is_empty())
        .map_or(config.touch_class.as_str(), String::as_str)
}

fn set_marker<H: GestureHost>(host: &mut H, element: ElementId, class: &str, active: bool) {
    if !class.is_empty() {
        host.set_visual_marker(element, class, active);
    }
}

fn cancel_long_press<H: GestureHost>(
    host: &mut H,
    element: ElementId,
    record: &mut InteractionRecord,
) {
    if let Some(timer) = record.pending_long_press.take() {
        host.cancel_long_press(element, timer.token);
    }
}

/// Resolve the swipe/pan direction and the distance travelled along it.
///
/// The horizontal axis wins whenever its delta reaches the tolerance.
fn resolve_direction(start: Point, current: Point, tolerance: f64) -> Option<(Direction, f64)> {
    let (dx, dy) = start.abs_delta(current);
    if dx < tolerance {
        if dy < tolerance {
            return None;
        }
        let direction = if start.y > current.y {
            Direction::Top
        } else {
            Direction::Bottom
        };
        Some((direction, dy))
    } else {
        let direction = if start.x > current.x {
            Direction::Left
        } else {
            Direction::Right
        };
        Some((direction, dx))
    }
}

fn classify(
    state: &Interaction,
    config: &GestureConfig,
    elapsed: Duration,
    has_longtap: bool,
) -> Option<Terminal> {
    if !state.has_moved {
        if has_longtap && elapsed > config.long_tap_time_interval {
            return Some(Terminal::LongTap);
        }
        return Some(Terminal::Tap);
    }
    if state.is_outside_swipe_bounds {
        return None;
    }

    let (direction, distance) =
        resolve_direction(state.start, state.current, config.swipe_tolerance)?;
    let elapsed_ms = elapsed.as_nanos() as f64 / 1_000_000.0;
    let velocity = distance / elapsed_ms;
    if velocity > config.swipe_velocity {
        Some(Terminal::Swipe(direction))
    } else {
        Some(Terminal::Pan(direction))
    }
}

fn trigger(
    handlers: &HandlerTable,
    element: ElementId,
    pointer: &PointerEvent,
    name: &GestureName,
    direction: Option<Direction>,
    out: &mut DispatchOutcome,
) {
    let Some(list) = handlers.get(name) else {
        return;
    };

    let event = GestureEvent {
        name,
        direction,
        pointer,
        element,
    };
    let mut invoked = false;

    for handler in list {
        if handler.modifiers.contains(Modifiers::STOP) {
            out.propagation_stopped = true;
        }
        if handler.modifiers.contains(Modifiers::PREVENT) {
            out.default_prevented = true;
        }
        if handler.modifiers.contains(Modifiers::SELF) && pointer.target != Some(element) {
            continue;
        }

        invoked = true;
        let result = catch_unwind(AssertUnwindSafe(|| {
            let mut callback = handler.callback.borrow_mut();
            (&mut *callback)(&event);
        }));
        if result.is_err() {
            warn!(element = element.get(), gesture = %name, "gesture handler panicked");
        }
    }

    if invoked {
        out.fired.push(name.clone());
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
