//! Guard configuration.
//!
//! Hosts either take [`GuardConfig::default`] or load a JSON document with
//! [`GuardConfig::from_json`]. Missing fields fall back to their defaults.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Error};

/// Attribute that marks a subtree as exempt from zoom/gesture suppression.
pub const DEFAULT_EXEMPT_MARKER: &str = "data-allow-zoom";

/// Window in which a second `touchend` counts as a double tap.
pub const DEFAULT_DOUBLE_TAP_WINDOW_MS: u64 = 300;

/// Number of decisions a guard's diagnostics trail retains.
pub const DEFAULT_DIAGNOSTICS_CAPACITY: usize = 256;

/// Viewport content forced while the guard is active.
pub const DEFAULT_LOCKED_VIEWPORT: &str =
    "width=device-width, initial-scale=1.0, maximum-scale=1.0, user-scalable=no";

/// Tunables for a [`PolicyGuard`](crate::PolicyGuard).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    /// Label attached to every log record for this surface
    pub surface_label: String,
    /// Attribute name hosts put on subtrees that allow native pinch-zoom
    pub exempt_marker: String,
    /// Maximum gap between two taps, in milliseconds, to count as a double tap
    pub double_tap_window_ms: u64,
    /// Viewport content that disables user scaling
    pub locked_viewport: String,
    /// Decisions kept in the diagnostics trail before the oldest is evicted
    pub diagnostics_capacity: usize,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            surface_label: "root".to_string(),
            exempt_marker: DEFAULT_EXEMPT_MARKER.to_string(),
            double_tap_window_ms: DEFAULT_DOUBLE_TAP_WINDOW_MS,
            locked_viewport: DEFAULT_LOCKED_VIEWPORT.to_string(),
            diagnostics_capacity: DEFAULT_DIAGNOSTICS_CAPACITY,
        }
    }
}

impl GuardConfig {
    /// Parses and validates a JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the document is malformed or any value
    /// fails [`validate`](Self::validate).
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let config: GuardConfig = serde_json::from_str(json)
            .map_err(|e| ConfigError::new("<document>", e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the surface label.
    pub fn with_surface_label(mut self, label: impl Into<String>) -> Self {
        self.surface_label = label.into();
        self
    }

    /// Sets the exemption marker attribute.
    pub fn with_exempt_marker(mut self, marker: impl Into<String>) -> Self {
        self.exempt_marker = marker.into();
        self
    }

    /// Sets the double-tap window.
    pub fn with_double_tap_window_ms(mut self, window_ms: u64) -> Self {
        self.double_tap_window_ms = window_ms;
        self
    }

    /// Sets how many decisions the diagnostics trail retains.
    pub fn with_diagnostics_capacity(mut self, capacity: usize) -> Self {
        self.diagnostics_capacity = capacity;
        self
    }

    /// Checks that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.surface_label.trim().is_empty() {
            return Err(ConfigError::new("surface_label", "must not be empty"));
        }
        if self.exempt_marker.trim().is_empty() {
            return Err(ConfigError::new("exempt_marker", "must not be empty"));
        }
        if self.exempt_marker.chars().any(char::is_whitespace) {
            return Err(ConfigError::new(
                "exempt_marker",
                "attribute names cannot contain whitespace",
            ));
        }
        if self.double_tap_window_ms == 0 {
            return Err(ConfigError::new(
                "double_tap_window_ms",
                "must be greater than zero",
            ));
        }
        if self.locked_viewport.trim().is_empty() {
            return Err(ConfigError::new("locked_viewport", "must not be empty"));
        }
        if self.diagnostics_capacity == 0 {
            return Err(ConfigError::new(
                "diagnostics_capacity",
                "must be greater than zero",
            ));
        }
        Ok(())
    }
}
