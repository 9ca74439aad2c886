#![forbid(unsafe_code)]

//! Core: pointer gesture recognition for interactive elements.
//!
//! # Role in FrankenTouch
//! `ftouch-core` is the recognizer. It consumes normalized pointer events
//! (one logical pointer per element, touch or mouse) and dispatches gesture
//! notifications (`tap`, `longtap`, `longpress`, `swipe`, `pan`, `moved`,
//! `moving`, `start`, `end`) to handlers registered per element.
//!
//! # Primary responsibilities
//! - **GestureRecognizer**: per-element interaction state machine and dispatch table.
//! - **Binding**: gesture names, modifiers, and directive parsing.
//! - **GestureConfig**: thresholds and timeouts, loadable from TOML/JSON.
//! - **GestureHost**: the adapter boundary to the embedding environment.
//!
//! # How it fits in the system
//! `ftouch-web` wraps the recognizer for browser hosts: it decodes DOM events
//! into [`event::PointerEvent`]s and turns host requests into commands for a
//! JS shim. Native hosts implement [`host::GestureHost`] directly.
//!
//! ```
//! use ftouch_core::{ElementId, GestureRecognizer, Modifiers, PointerEvent, PointerPhase};
//! use std::time::Duration;
//! use web_time::Instant;
//!
//! let button = ElementId(1);
//! let mut recognizer = GestureRecognizer::default();
//! recognizer.register(button, "tap", Modifiers::NONE, |ev| {
//!     assert_eq!(ev.name.to_string(), "tap");
//! });
//!
//! let t = Instant::now();
//! recognizer.handle(button, &PointerEvent::touch(PointerPhase::Start, 4.0, 4.0, t));
//! let out = recognizer.handle(
//!     button,
//!     &PointerEvent::touch(PointerPhase::End, 4.0, 4.0, t + Duration::from_millis(80)),
//! );
//! assert_eq!(out.fired.len(), 1);
//! ```

pub mod binding;
pub mod config;
pub mod event;
pub mod host;
mod logging;
pub mod recognizer;

pub use binding::{Binding, Direction, GestureName, Modifiers};
#[cfg(feature = "config")]
pub use config::ConfigError;
pub use config::{GestureConfig, SYNTHETIC_MOUSE_WINDOW};
pub use event::{ElementId, Point, PointerButton, PointerEvent, PointerKind, PointerPhase};
pub use host::{GestureHost, NoopHost, TimerToken};
pub use recognizer::{
    DispatchOutcome, GestureCallback, GestureEvent, GestureRecognizer, IgnoredReason, Interaction,
};
