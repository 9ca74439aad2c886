#![forbid(unsafe_code)]

//! [`GestureHost`] implementation that queues commands for a JS shim.
//!
//! The recognizer's host requests (subscriptions, marker classes, long-press
//! timers) become [`HostCommand`] values. The embedding code drains them after
//! each call into the bridge and applies them to the DOM:
//!
//! ```json
//! [{"op":"subscribe","element":3},
//!  {"op":"addClass","element":3,"class":"touching"},
//!  {"op":"scheduleTimer","element":3,"token":1,"delayMs":800}]
//! ```

use std::collections::VecDeque;
use std::time::Duration;

use ftouch_core::{ElementId, GestureHost, TimerToken};
use serde::Serialize;

/// One DOM-side action requested by the recognizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum HostCommand {
    /// Attach the touch and mouse listeners to `element`.
    Subscribe { element: u64 },
    /// Detach the listeners installed by `Subscribe`.
    Unsubscribe { element: u64 },
    AddClass { element: u64, class: String },
    RemoveClass { element: u64, class: String },
    /// `setTimeout` that calls back into the bridge with `token`.
    ScheduleTimer {
        element: u64,
        token: u64,
        #[serde(rename = "delayMs")]
        delay_ms: u64,
    },
    /// `clearTimeout` for a timer armed by `ScheduleTimer`.
    CancelTimer { element: u64, token: u64 },
}

impl HostCommand {
    /// Element the command applies to.
    #[must_use]
    pub const fn element(&self) -> ElementId {
        match *self {
            Self::Subscribe { element }
            | Self::Unsubscribe { element }
            | Self::AddClass { element, .. }
            | Self::RemoveClass { element, .. }
            | Self::ScheduleTimer { element, .. }
            | Self::CancelTimer { element, .. } => ElementId(element),
        }
    }
}

/// Host adapter that records every request as a [`HostCommand`].
#[derive(Debug, Default, Clone)]
pub struct CommandHost {
    queue: VecDeque<HostCommand>,
}

impl CommandHost {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of queued commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Queued commands, oldest first, without draining.
    pub fn pending(&self) -> impl Iterator<Item = &HostCommand> + '_ {
        self.queue.iter()
    }

    /// Take every queued command, oldest first.
    pub fn drain(&mut self) -> Vec<HostCommand> {
        self.queue.drain(..).collect()
    }

    fn push(&mut self, command: HostCommand) {
        #[cfg(feature = "tracing")]
        tracing::trace!(?command, "host command queued");
        self.queue.push_back(command);
    }
}

impl GestureHost for CommandHost {
    fn subscribe(&mut self, element: ElementId) {
        self.push(HostCommand::Subscribe {
            element: element.get(),
        });
    }

    fn unsubscribe(&mut self, element: ElementId) {
        self.push(HostCommand::Unsubscribe {
            element: element.get(),
        });
    }

    fn set_visual_marker(&mut self, element: ElementId, class: &str, active: bool) {
        let element = element.get();
        let class = class.to_owned();
        self.push(if active {
            HostCommand::AddClass { element, class }
        } else {
            HostCommand::RemoveClass { element, class }
        });
    }

    fn schedule_long_press(&mut self, element: ElementId, token: TimerToken, delay: Duration) {
        self.push(HostCommand::ScheduleTimer {
            element: element.get(),
            token: token.0,
            delay_ms: u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
        });
    }

    fn cancel_long_press(&mut self, element: ElementId, token: TimerToken) {
        self.push(HostCommand::CancelTimer {
            element: element.get(),
            token: token.0,
        });
    }
}
