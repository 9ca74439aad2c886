#![forbid(unsafe_code)]

//! Logging macros used throughout the crate.
//!
//! With the `tracing` feature these are the `tracing` macros. Without it they
//! expand to nothing, so call sites need no `cfg` of their own.

#[cfg(feature = "tracing")]
pub(crate) use tracing::{debug, trace, warn};

#[cfg(not(feature = "tracing"))]
mod noop {
    macro_rules! debug {
        ($($arg:tt)*) => {};
    }

    macro_rules! trace {
        ($($arg:tt)*) => {};
    }

    macro_rules! warn_noop {
        ($($arg:tt)*) => {};
    }

    pub(crate) use {debug, trace, warn_noop as warn};
}

#[cfg(not(feature = "tracing"))]
pub(crate) use noop::{debug, trace, warn};
