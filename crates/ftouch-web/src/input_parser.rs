#![forbid(unsafe_code)]

//! JSON input parser for DOM touch and mouse events.
//!
//! The JS shim serializes the handful of DOM event fields the recognizer
//! needs and hands the string to [`parse_encoded_pointer`]:
//!
//! ```json
//! {"type":"touchstart","timeStamp":1204.5,"target":3,
//!  "touches":[{"clientX":10,"clientY":20}]}
//! {"type":"mousedown","timeStamp":1900.0,"target":3,
//!  "clientX":10,"clientY":20,"button":0}
//! ```
//!
//! Touch coordinates come from the first entry of `touches` (falling back to
//! `changedTouches` for `touchend`, where `touches` is empty). Mouse
//! coordinates come from `clientX`/`clientY`.
//!
//! Event types the recognizer does not consume return `Ok(None)`.

use std::time::Duration;

use ftouch_core::event::{ElementId, Point, PointerButton, PointerEvent, PointerKind, PointerPhase};
use serde::Deserialize;
use web_time::Instant;

/// Errors from parsing encoded pointer JSON.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputParseError {
    /// Malformed JSON.
    #[error("JSON parse error: {0}")]
    Json(String),
    /// Missing required field.
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    /// DOM `button` value outside primary/auxiliary/secondary.
    #[error("unsupported mouse button: {0}")]
    UnknownButton(i32),
}

/// Maps DOM `timeStamp` milliseconds onto [`Instant`]s.
///
/// DOM timestamps count milliseconds from the page's time origin; the clock
/// pins that origin to an `Instant` captured when the bridge was created.
#[derive(Debug, Clone, Copy)]
pub struct WebClock {
    origin: Instant,
}

impl Default for WebClock {
    fn default() -> Self {
        Self::new(Instant::now())
    }
}

impl WebClock {
    #[must_use]
    pub const fn new(origin: Instant) -> Self {
        Self { origin }
    }

    #[must_use]
    pub const fn origin(&self) -> Instant {
        self.origin
    }

    /// Convert a DOM timestamp. Negative or non-finite values map to the origin.
    #[must_use]
    pub fn instant(&self, time_stamp_ms: f64) -> Instant {
        if !time_stamp_ms.is_finite() || time_stamp_ms <= 0.0 {
            return self.origin;
        }
        let offset = Duration::try_from_secs_f64(time_stamp_ms / 1000.0).unwrap_or(Duration::ZERO);
        self.origin + offset
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTouch {
    client_x: f64,
    client_y: f64,
}

/// Internal deserialization target for the shim's JSON schema.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPointer {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    time_stamp: Option<f64>,
    #[serde(default)]
    target: Option<u64>,
    #[serde(default)]
    client_x: Option<f64>,
    #[serde(default)]
    client_y: Option<f64>,
    #[serde(default)]
    button: Option<i32>,
    #[serde(default)]
    touches: Vec<RawTouch>,
    #[serde(default)]
    changed_touches: Vec<RawTouch>,
}

/// Parse a JSON-encoded DOM event into a [`PointerEvent`].
///
/// Returns `Ok(None)` for event types the recognizer does not consume, and
/// `Err` for malformed JSON or missing required fields.
pub fn parse_encoded_pointer(
    json: &str,
    clock: &WebClock,
) -> Result<Option<PointerEvent>, InputParseError> {
    let raw: RawPointer =
        serde_json::from_str(json).map_err(|e| InputParseError::Json(e.to_string()))?;

    let (phase, kind) = match raw.kind.as_str() {
        "touchstart" => (PointerPhase::Start, PointerKind::Touch),
        "touchmove" => (PointerPhase::Move, PointerKind::Touch),
        "touchend" => (PointerPhase::End, PointerKind::Touch),
        "touchcancel" => (PointerPhase::Cancel, PointerKind::Touch),
        "mousedown" => (PointerPhase::Start, PointerKind::Mouse),
        "mousemove" => (PointerPhase::Move, PointerKind::Mouse),
        "mouseup" => (PointerPhase::End, PointerKind::Mouse),
        "mouseenter" => (PointerPhase::Enter, PointerKind::Mouse),
        "mouseleave" => (PointerPhase::Leave, PointerKind::Mouse),
        _ => return Ok(None),
    };

    let time_stamp = raw
        .time_stamp
        .ok_or(InputParseError::MissingField("timeStamp"))?;

    let position = match (kind, phase) {
        (PointerKind::Touch, PointerPhase::Start | PointerPhase::Move) => raw
            .touches
            .first()
            .map(|t| Point::new(t.client_x, t.client_y))
            .ok_or(InputParseError::MissingField("touches"))?,
        (PointerKind::Touch, _) => raw
            .touches
            .first()
            .or_else(|| raw.changed_touches.first())
            .map_or(Point::ZERO, |t| Point::new(t.client_x, t.client_y)),
        (PointerKind::Mouse, PointerPhase::Enter | PointerPhase::Leave) => Point::new(
            raw.client_x.unwrap_or_default(),
            raw.client_y.unwrap_or_default(),
        ),
        (PointerKind::Mouse, _) => Point::new(
            raw.client_x.ok_or(InputParseError::MissingField("clientX"))?,
            raw.client_y.ok_or(InputParseError::MissingField("clientY"))?,
        ),
    };

    let button = match (kind, raw.button) {
        (PointerKind::Touch, _) | (PointerKind::Mouse, None) => PointerButton::Primary,
        (PointerKind::Mouse, Some(code)) => parse_button(code)?,
    };

    Ok(Some(PointerEvent {
        phase,
        kind,
        button,
        position,
        timestamp: clock.instant(time_stamp),
        target: raw.target.map(ElementId),
    }))
}

fn parse_button(code: i32) -> Result<PointerButton, InputParseError> {
    match code {
        0 => Ok(PointerButton::Primary),
        1 => Ok(PointerButton::Auxiliary),
        2 => Ok(PointerButton::Secondary),
        other => Err(InputParseError::UnknownButton(other)),
    }
}
