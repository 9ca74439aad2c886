#![forbid(unsafe_code)]

//! Recognizer thresholds and timeouts.
//!
//! [`GestureConfig`] holds every tunable of the state machine. With the
//! `config` feature it can be loaded from TOML or JSON; durations are written
//! as integer milliseconds and every field falls back to its default.
//!
//! ```toml
//! tap_tolerance = 10.0
//! swipe_tolerance = 30.0
//! swipe_velocity = 0.3
//! long_press_duration = 800
//! long_tap_time_interval = 400
//! touch_class = "touching"
//! ```

use std::time::Duration;

#[cfg(feature = "config")]
use std::path::Path;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

/// Mouse events arriving this soon after a touch event are treated as the
/// browser's synthesized duplicates and ignored.
pub const SYNTHETIC_MOUSE_WINDOW: Duration = Duration::from_millis(350);

/// Thresholds and timeouts for gesture recognition.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct GestureConfig {
    /// Movement (px, either axis) before an interaction counts as moved (default: 10).
    pub tap_tolerance: f64,
    /// Movement (px, both axes) before an interaction leaves the swipe box (default: 30).
    pub swipe_tolerance: f64,
    /// Velocity (px/ms) separating `swipe` from `pan` (default: 0.3).
    pub swipe_velocity: f64,
    /// Hold time before `longpress` fires (default: 800ms).
    #[cfg_attr(feature = "config", serde(with = "duration_ms"))]
    pub long_press_duration: Duration,
    /// Press duration after which a tap becomes a `longtap` (default: 400ms).
    #[cfg_attr(feature = "config", serde(with = "duration_ms"))]
    pub long_tap_time_interval: Duration,
    /// Visual marker class applied while engaged. Empty disables the marker.
    pub touch_class: String,
    /// Reserved. Accepted for compatibility and not consulted.
    pub disable_click: bool,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            tap_tolerance: 10.0,
            swipe_tolerance: 30.0,
            swipe_velocity: 0.3,
            long_press_duration: Duration::from_millis(800),
            long_tap_time_interval: Duration::from_millis(400),
            touch_class: String::new(),
            disable_click: false,
        }
    }
}

impl GestureConfig {
    /// Set the tap tolerance.
    #[must_use]
    pub fn tap_tolerance(mut self, px: f64) -> Self {
        self.tap_tolerance = px;
        self
    }

    /// Set the swipe tolerance.
    #[must_use]
    pub fn swipe_tolerance(mut self, px: f64) -> Self {
        self.swipe_tolerance = px;
        self
    }

    /// Set the swipe/pan velocity threshold.
    #[must_use]
    pub fn swipe_velocity(mut self, px_per_ms: f64) -> Self {
        self.swipe_velocity = px_per_ms;
        self
    }

    /// Set the long-press duration.
    #[must_use]
    pub fn long_press_duration(mut self, duration: Duration) -> Self {
        self.long_press_duration = duration;
        self
    }

    /// Set the long-tap threshold.
    #[must_use]
    pub fn long_tap_time_interval(mut self, duration: Duration) -> Self {
        self.long_tap_time_interval = duration;
        self
    }

    /// Set the visual marker class.
    #[must_use]
    pub fn touch_class(mut self, class: impl Into<String>) -> Self {
        self.touch_class = class.into();
        self
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !self.tap_tolerance.is_finite() || self.tap_tolerance < 0.0 {
            errors.push(format!(
                "tap_tolerance must be a finite value >= 0, got {}",
                self.tap_tolerance
            ));
        }

        if !self.swipe_tolerance.is_finite() || self.swipe_tolerance < 0.0 {
            errors.push(format!(
                "swipe_tolerance must be a finite value >= 0, got {}",
                self.swipe_tolerance
            ));
        }

        if !self.swipe_velocity.is_finite() || self.swipe_velocity <= 0.0 {
            errors.push(format!(
                "swipe_velocity must be a finite value > 0, got {}",
                self.swipe_velocity
            ));
        }

        if self.long_press_duration.is_zero() {
            errors.push("long_press_duration must be > 0".into());
        }

        // classList.add() rejects tokens containing whitespace.
        if self.touch_class.chars().any(char::is_whitespace) {
            errors.push(format!(
                "touch_class must be a single class token, got {:?}",
                self.touch_class
            ));
        }

        errors
    }
}

#[cfg(feature = "config")]
impl GestureConfig {
    /// Load from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    /// Load from TOML and reject configurations that fail [`validate`](Self::validate).
    pub fn load_toml(s: &str) -> Result<Self, ConfigError> {
        Self::from_toml_str(s)?.into_validated()
    }

    /// Load from JSON and reject configurations that fail [`validate`](Self::validate).
    pub fn load_json(s: &str) -> Result<Self, ConfigError> {
        Self::from_json_str(s)?.into_validated()
    }

    fn into_validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors that can occur when loading a gesture configuration.
#[cfg(feature = "config")]
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parse error.
    #[error("TOML parse error: {0}")]
    Toml(toml::de::Error),
    /// JSON parse error.
    #[error("JSON parse error: {0}")]
    Json(serde_json::Error),
    /// Validation errors.
    #[error("validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}

#[cfg(feature = "config")]
mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let ms = u64::try_from(value.as_millis()).unwrap_or(u64::MAX);
        serializer.serialize_u64(ms)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
