#![forbid(unsafe_code)]

//! `ftouch-web` connects the gesture recognizer to a browser page.
//!
//! Design goals:
//! - **Host-driven I/O**: a thin JS shim forwards DOM events as JSON and
//!   applies the returned commands. This crate never touches the DOM.
//! - **Deterministic time**: timestamps come from the DOM event, mapped onto
//!   [`web_time::Instant`] by a [`WebClock`].
//! - **No blocking / no threads**: suitable for `wasm32-unknown-unknown`.
//!
//! The shim's loop is:
//!
//! 1. Register handlers through [`WebGestureBridge::bind`] and apply
//!    [`drain_commands_json`](WebGestureBridge::drain_commands_json)
//!    (listener subscriptions).
//! 2. For every listened DOM event call
//!    [`handle_encoded`](WebGestureBridge::handle_encoded), call
//!    `stopPropagation()` / `preventDefault()` as the returned
//!    [`EventResponse`] says, then apply the drained commands.
//! 3. When a scheduled timer elapses call
//!    [`fire_timer`](WebGestureBridge::fire_timer).

pub mod command_host;
pub mod input_parser;

pub use command_host::{CommandHost, HostCommand};
pub use input_parser::{InputParseError, WebClock, parse_encoded_pointer};

use ftouch_core::{
    Binding, DispatchOutcome, ElementId, GestureConfig, GestureEvent, GestureRecognizer,
    IgnoredReason, TimerToken,
};
use serde::Serialize;

/// What the shim should do with the DOM event it just forwarded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub stop_propagation: bool,
    pub prevent_default: bool,
    /// Wire names of the gestures that ran at least one handler.
    pub fired: Vec<String>,
    /// Why the event was dropped, if it was.
    pub ignored: Option<&'static str>,
}

impl From<&DispatchOutcome> for EventResponse {
    fn from(outcome: &DispatchOutcome) -> Self {
        Self {
            stop_propagation: outcome.propagation_stopped,
            prevent_default: outcome.default_prevented,
            fired: outcome.fired.iter().map(ToString::to_string).collect(),
            ignored: outcome.ignored.map(ignored_reason_label),
        }
    }
}

impl From<DispatchOutcome> for EventResponse {
    fn from(outcome: DispatchOutcome) -> Self {
        Self::from(&outcome)
    }
}

const fn ignored_reason_label(reason: IgnoredReason) -> &'static str {
    match reason {
        IgnoredReason::NotRegistered => "notRegistered",
        IgnoredReason::SyntheticMouse => "syntheticMouse",
        IgnoredReason::NonPrimaryButton => "nonPrimaryButton",
        IgnoredReason::AlreadyActive => "alreadyActive",
        IgnoredReason::NotActive => "notActive",
        IgnoredReason::StaleTimer => "staleTimer",
    }
}

/// Parser, recognizer and command queue behind one JSON-in/JSON-out facade.
#[derive(Debug)]
pub struct WebGestureBridge {
    recognizer: GestureRecognizer<CommandHost>,
    clock: WebClock,
}

impl Default for WebGestureBridge {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}

impl WebGestureBridge {
    /// Create a bridge whose clock origin is "now".
    #[must_use]
    pub fn new(config: GestureConfig) -> Self {
        Self::with_clock(config, WebClock::default())
    }

    #[must_use]
    pub fn with_clock(config: GestureConfig, clock: WebClock) -> Self {
        Self {
            recognizer: GestureRecognizer::new(config, CommandHost::new()),
            clock,
        }
    }

    /// Create a bridge from a JSON options object (`{"swipe_tolerance": 40}`).
    pub fn from_config_json(json: &str) -> Result<Self, ftouch_core::ConfigError> {
        Ok(Self::new(GestureConfig::load_json(json)?))
    }

    #[must_use]
    pub const fn clock(&self) -> &WebClock {
        &self.clock
    }

    #[must_use]
    pub const fn recognizer(&self) -> &GestureRecognizer<CommandHost> {
        &self.recognizer
    }

    pub fn recognizer_mut(&mut self) -> &mut GestureRecognizer<CommandHost> {
        &mut self.recognizer
    }

    /// Register `callback` for a directive such as `swipe.left.stop`.
    pub fn bind<F>(&mut self, element: ElementId, directive: &str, callback: F)
    where
        F: FnMut(&GestureEvent<'_>) + 'static,
    {
        let binding = Binding::parse(directive);
        self.recognizer.register_binding(element, &binding, callback);
    }

    /// Remove every handler of `element`. Queues `unsubscribe` if it was bound.
    pub fn unbind(&mut self, element: ElementId) -> bool {
        self.recognizer.unregister(element)
    }

    /// Set the marker class for one element. An empty class falls back to the
    /// configured `touch_class`.
    pub fn set_touch_class(&mut self, element: ElementId, class: &str) {
        self.recognizer.set_touch_class(element, class);
    }

    /// Drop the per-element marker class set by [`set_touch_class`](Self::set_touch_class).
    pub fn clear_touch_class(&mut self, element: ElementId) {
        self.recognizer.clear_touch_class(element);
    }

    /// Decode one DOM event and feed it to the recognizer.
    ///
    /// Event types the recognizer does not consume yield an empty response.
    pub fn handle_encoded(
        &mut self,
        element: ElementId,
        json: &str,
    ) -> Result<EventResponse, InputParseError> {
        let event = match parse_encoded_pointer(json, &self.clock) {
            Ok(Some(event)) => event,
            Ok(None) => return Ok(EventResponse::default()),
            Err(err) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(element = element.get(), %err, "rejected encoded pointer event");
                return Err(err);
            }
        };
        Ok(self.recognizer.handle(element, &event).into())
    }

    /// Called by the shim when a `scheduleTimer` command elapses.
    pub fn fire_timer(&mut self, element: ElementId, token: u64) -> EventResponse {
        self.recognizer
            .fire_long_press(element, TimerToken(token))
            .into()
    }

    /// Take every queued host command, oldest first.
    pub fn drain_commands(&mut self) -> Vec<HostCommand> {
        self.recognizer.host_mut().drain()
    }

    /// Drain queued host commands as a JSON array.
    pub fn drain_commands_json(&mut self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.drain_commands())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ftouch_core::{Direction, GestureName};
    use pretty_assertions::assert_eq;

    #[test]
    fn response_mirrors_outcome() {
        let outcome = DispatchOutcome {
            propagation_stopped: true,
            default_prevented: false,
            fired: vec![
                GestureName::End,
                GestureName::Swipe(Some(Direction::Left)),
            ],
            ignored: None,
        };
        let response = EventResponse::from(&outcome);
        assert_eq!(
            serde_json::to_string(&response).expect("serialize"),
            r#"{"stopPropagation":true,"preventDefault":false,"fired":["end","swipe.left"],"ignored":null}"#
        );
    }

    #[test]
    fn ignored_reason_is_reported() {
        let mut bridge = WebGestureBridge::default();
        let response = bridge
            .handle_encoded(
                ElementId(5),
                r#"{"type":"touchstart","timeStamp":1,"touches":[{"clientX":0,"clientY":0}]}"#,
            )
            .expect("valid");
        assert_eq!(response.ignored, Some("notRegistered"));
        assert!(response.fired.is_empty());
    }

    #[test]
    fn unknown_dom_events_yield_empty_response() {
        let mut bridge = WebGestureBridge::default();
        bridge.bind(ElementId(1), "tap", |_| {});
        let response = bridge
            .handle_encoded(ElementId(1), r#"{"type":"keydown","timeStamp":1}"#)
            .expect("valid");
        assert_eq!(response, EventResponse::default());
    }

    #[test]
    fn invalid_config_json_is_rejected() {
        assert!(WebGestureBridge::from_config_json(r#"{"swipe_velocity": 0.0}"#).is_err());
        let bridge =
            WebGestureBridge::from_config_json(r#"{"swipe_tolerance": 40}"#).expect("valid");
        assert_eq!(bridge.recognizer().config().swipe_tolerance, 40.0);
    }
}
